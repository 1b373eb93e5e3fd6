//! Navigation shell: which view is showing, the menu and the dashboard.
//!
//! The shell only tracks the current view. Switching views never touches
//! the state of any form.

use serde::{Deserialize, Serialize};

// ============================================================================
// ViewKind
// ============================================================================

/// The views reachable from the menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewKind {
    /// Landing page with shortcut cards.
    #[default]
    Dashboard,
    /// Book collection and story generator.
    Library,
    /// Lesson plan generator.
    LessonPlans,
    /// Activity ideas, regular mode.
    Activities,
    /// Outline images for molds and wall decorations.
    Molds,
    /// Student report generator.
    Reports,
    /// Activity ideas, inclusive mode.
    Inclusive,
}

impl ViewKind {
    /// Menu label, in pt-BR.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Início",
            Self::Library => "Biblioteca",
            Self::LessonPlans => "Planos de Aula",
            Self::Activities => "Atividades",
            Self::Molds => "Moldes & Mural",
            Self::Reports => "Relatórios",
            Self::Inclusive => "Educação Inclusiva",
        }
    }
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Dashboard => "DASHBOARD",
            Self::Library => "LIBRARY",
            Self::LessonPlans => "LESSON_PLANS",
            Self::Activities => "ACTIVITIES",
            Self::Molds => "MOLDS",
            Self::Reports => "REPORTS",
            Self::Inclusive => "INCLUSIVE",
        };
        f.write_str(name)
    }
}

/// Menu order.
pub const MENU: [ViewKind; 7] = [
    ViewKind::Dashboard,
    ViewKind::Library,
    ViewKind::LessonPlans,
    ViewKind::Activities,
    ViewKind::Molds,
    ViewKind::Reports,
    ViewKind::Inclusive,
];

/// One menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    /// Target view.
    pub view: ViewKind,
    /// pt-BR label.
    pub label: &'static str,
}

/// Menu entries in display order.
#[must_use]
pub fn menu() -> Vec<MenuItem> {
    MENU.iter()
        .map(|&view| MenuItem {
            view,
            label: view.label(),
        })
        .collect()
}

// ============================================================================
// Dashboard
// ============================================================================

/// A shortcut card on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardCard {
    /// Card title.
    pub title: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// View opened on click.
    pub target: ViewKind,
}

/// Greeting shown above the cards.
pub const DASHBOARD_GREETING: &str = "Olá, Professor(a)!";

/// The four dashboard cards, in display order.
pub const DASHBOARD_CARDS: [DashboardCard; 4] = [
    DashboardCard {
        title: "Novo Plano de Aula",
        description: "Crie planos alinhados à BNCC em segundos.",
        target: ViewKind::LessonPlans,
    },
    DashboardCard {
        title: "Relatórios",
        description: "Gere avaliações descritivas individuais.",
        target: ViewKind::Reports,
    },
    DashboardCard {
        title: "Contar Histórias",
        description: "Acesse clássicos ou crie histórias inéditas.",
        target: ViewKind::Library,
    },
    DashboardCard {
        title: "Atividades",
        description: "Banco de ideias para dinâmica em sala.",
        target: ViewKind::Activities,
    },
];

// ============================================================================
// Shell
// ============================================================================

/// Tabs of the library view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LibraryTab {
    /// The static book collection.
    #[default]
    Collection,
    /// The story generator form.
    StoryGenerator,
}

/// Current navigation position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shell {
    /// View on screen.
    pub current: ViewKind,
    /// Tab selected inside the library.
    pub library_tab: LibraryTab,
}

impl Shell {
    /// Creates a shell on the dashboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches to `view`. Returns the previous view.
    pub fn navigate(&mut self, view: ViewKind) -> ViewKind {
        std::mem::replace(&mut self.current, view)
    }

    /// Selects a library tab.
    pub fn select_library_tab(&mut self, tab: LibraryTab) {
        self.library_tab = tab;
    }
}
