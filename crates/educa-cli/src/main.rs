//! EducaKids CLI
//!
//! Runs the studio HTTP API, or generates a single piece of content from
//! the command line.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use educa_genai::{ContentClient, GeminiProvider, ModelSet, Socialization};
use educa_render::json::JsonGenerator;
use educa_render::{catalog_table, mold_file_name, write_image, Artifact, MarkdownGenerator};
use educa_studio::{
    catalog, create_router, ActivityForm, ActivityMode, AppState, Config, FormSession, FormSpec,
    LessonPlanForm, MoldForm, ReportForm, StoryForm,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// EducaKids - Teacher assistant for early-childhood education
///
/// Generates BNCC lesson plans, student reports, activity ideas, stories and
/// outline drawings with Google Gemini.
#[derive(Parser, Debug)]
#[command(name = "educakids")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: educakids.json in current directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON instead of Markdown
    #[arg(long, global = true)]
    json: bool,

    /// Write the result to a file instead of stdout
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP API server
    Serve {
        /// Interface to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate a BNCC lesson plan
    Plan {
        /// Lesson theme
        theme: String,

        /// Target age group
        #[arg(long, default_value = "3 a 4 anos")]
        age_group: String,

        /// Lesson duration
        #[arg(long, default_value = "4 horas")]
        duration: String,
    },

    /// Generate a descriptive student report
    Report {
        /// Student's name
        student_name: String,

        /// Strengths and progress
        #[arg(long)]
        highlights: String,

        /// Points to develop
        #[arg(long, default_value = "")]
        challenges: String,

        /// Socialization: interage, sozinho, lidera or adaptacao
        #[arg(long, default_value = "interage")]
        socialization: Socialization,
    },

    /// Suggest three classroom activities
    Activities {
        /// Activity theme
        topic: String,

        /// Adapt the activities for inclusive education
        #[arg(long)]
        inclusive: bool,
    },

    /// Write a short children's story
    Story {
        /// What the story should be about
        topic: String,
    },

    /// Draw a black-and-white outline for molds and wall decorations
    Mold {
        /// Object to draw
        description: String,

        /// Save the image as molde-<description>.png in this directory
        #[arg(long, value_name = "DIR")]
        save: Option<PathBuf>,
    },

    /// List the book collection
    Library,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(config = ?args.config, "Config file");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let output = Output {
        json: args.json,
        path: args.output,
    };

    match args.command {
        Command::Serve { host, port } => serve(config, host, port).await,
        Command::Plan {
            theme,
            age_group,
            duration,
        } => {
            let form = LessonPlanForm {
                theme,
                age_group,
                duration,
            };
            let client = build_client(&config)?;
            let artifact = generate(form, &client).await?;
            output.emit(&artifact)
        }
        Command::Report {
            student_name,
            highlights,
            challenges,
            socialization,
        } => {
            let form = ReportForm {
                student_name,
                highlights,
                challenges,
                socialization,
            };
            let client = build_client(&config)?;
            let artifact = generate(form, &client).await?;
            output.emit(&artifact)
        }
        Command::Activities { topic, inclusive } => {
            let mode = if inclusive {
                ActivityMode::Inclusive
            } else {
                ActivityMode::Activities
            };
            let form = ActivityForm { topic, mode };
            let client = build_client(&config)?;
            let artifact = generate(form, &client).await?;
            output.emit(&artifact)
        }
        Command::Story { topic } => {
            let client = build_client(&config)?;
            let artifact = generate(StoryForm { topic }, &client).await?;
            output.emit(&artifact)
        }
        Command::Mold { description, save } => {
            let client = build_client(&config)?;
            let artifact = generate(MoldForm { description }, &client).await?;
            if let Some(dir) = save {
                save_mold(&artifact, &dir)?;
            }
            output.emit(&artifact)
        }
        Command::Library => output.emit_text(&catalog_table(catalog::books())),
    }
}

fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => Config::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}

fn build_client(config: &Config) -> anyhow::Result<ContentClient> {
    let provider = GeminiProvider::from_settings(&config.provider).map_err(|e| {
        anyhow::anyhow!("{}", educa_studio::StudioError::generation(e))
    })?;
    Ok(ContentClient::new(
        Arc::new(provider),
        ModelSet::from(&config.provider),
    ))
}

/// Runs one form through its full lifecycle and returns the rendered result.
async fn generate<F: FormSpec>(form: F, client: &ContentClient) -> anyhow::Result<Artifact> {
    let mut session = FormSession::new(form);
    session.submit(client).await?;
    session
        .artifact()
        .ok_or_else(|| anyhow::anyhow!("the provider returned no result"))
}

fn save_mold(artifact: &Artifact, dir: &Path) -> anyhow::Result<()> {
    let Artifact::VisualResource {
        description,
        image: Some(image),
    } = artifact
    else {
        eprintln!("No image was generated; nothing to save");
        return Ok(());
    };

    std::fs::create_dir_all(dir)?;
    let path = dir.join(mold_file_name(description));
    write_image(image, &path)?;
    eprintln!("Mold saved to {}", path.display());
    Ok(())
}

async fn serve(mut config: Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    // Re-validate after overrides
    config.validate()?;
    print_config(&config);

    let client = build_client(&config)?;
    let addr = config.server.bind_address();
    let router = create_router(AppState::new(config, client));

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to bind to {addr}: {e}\n\nSuggestion: Try a different port with --port"
        )
    })?;

    println!("HTTP API server running on http://{addr}");
    println!("Press Ctrl+C to stop");
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
    }
}

fn print_config(config: &Config) {
    println!("Configuration loaded:");
    println!("  Provider: {}", config.provider.base_url);
    println!("  Text model: {}", config.provider.text_model);
    println!("  Image model: {}", config.provider.image_model);
    println!("  API key variable: {}", config.provider.api_key_env);
    println!();
}

/// Where and how results are printed.
struct Output {
    json: bool,
    path: Option<PathBuf>,
}

impl Output {
    fn emit(&self, artifact: &Artifact) -> anyhow::Result<()> {
        if self.json {
            let generator = JsonGenerator::new(artifact);
            match &self.path {
                Some(path) => {
                    generator.write_to_file(path, true)?;
                    eprintln!("Result written to {}", path.display());
                    Ok(())
                }
                None => {
                    println!("{}", generator.generate_pretty()?);
                    Ok(())
                }
            }
        } else {
            let markdown = MarkdownGenerator::new(artifact).generate();
            self.emit_text(&markdown)
        }
    }

    fn emit_text(&self, text: &str) -> anyhow::Result<()> {
        match &self.path {
            Some(path) => {
                std::fs::write(path, text)?;
                eprintln!("Result written to {}", path.display());
            }
            None => print!("{text}"),
        }
        Ok(())
    }
}
