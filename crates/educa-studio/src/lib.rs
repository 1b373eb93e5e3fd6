//! EducaKids studio
//!
//! Form views, the navigation shell, the book catalog and the HTTP API that
//! drives them.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod form;
pub mod shell;
pub mod views;

pub use api::{
    create_router, AppState, EditResultRequest, ErrorResponse, LibraryResponse, LibraryTabRequest,
    NavigateRequest, NavigateResponse, ShellResponse,
};
pub use catalog::Book;
pub use config::{Config, ServerConfig};
pub use error::{generation_suggestion, FormError, Result, StudioError};
pub use form::{FieldHint, FormSession, FormSnapshot, FormSpec, FormStatus, Settled, SubmitTicket};
pub use shell::{DashboardCard, LibraryTab, MenuItem, Shell, ViewKind};
pub use views::{
    ActivityForm, ActivityMode, FormId, LessonPlanForm, MoldForm, ReportForm, StoryForm, Studio,
    AGE_GROUP_SUGGESTIONS,
};
