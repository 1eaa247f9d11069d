//! CLI command definitions, routing, and tracing setup.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use coursegen_core::{PipelineOptions, ProgressReporter, build_course};
use coursegen_llm::OpenAiGenerator;
use coursegen_shared::{
    AppConfig, CourseResult, Topic, init_config, load_config, resolve_credentials,
};
use coursegen_videos::YouTubeClient;
use coursegen_web::{AppState, PageView, render_page};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// CourseGen: structured courses with suggested videos, from a single topic.
#[derive(Parser)]
#[command(
    name = "coursegen",
    version,
    about = "Generate a structured course for a topic, with videos for each module.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Course output format for `generate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// The generated Markdown, as returned by the model.
    Markdown,
    /// A standalone HTML page, same as the web front end renders.
    Html,
    /// `{topic, document, videos_by_module}`.
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate one course and print or save it.
    Generate {
        /// Course topic, e.g. "Python programming".
        topic: String,

        /// Output format.
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: OutputFormat,

        /// Write to this file instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Start the web front end.
    Serve {
        /// Bind host (defaults to `[server] host`).
        #[arg(long)]
        host: Option<String>,

        /// Bind port (defaults to `[server] port`).
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory of static assets (defaults to `[server] static_dir`).
        #[arg(long)]
        static_dir: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "coursegen=info",
        1 => "coursegen=debug",
        _ => "coursegen=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate { topic, format, out } => {
            cmd_generate(&topic, format, out.as_deref()).await
        }
        Command::Serve {
            host,
            port,
            static_dir,
        } => cmd_serve(host, port, static_dir).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

async fn cmd_generate(raw_topic: &str, format: OutputFormat, out: Option<&Path>) -> Result<()> {
    let config = load_config()?;
    let topic = Topic::parse(raw_topic, &config.validation)?;
    let credentials = resolve_credentials(&config)?;

    let generator = OpenAiGenerator::new(&config.openai, &credentials)?;
    let search = YouTubeClient::from_credentials(&config.youtube, &credentials)?;
    let options = PipelineOptions::from(&config.pipeline);

    info!(%topic, model = generator.model(), ?format, "generating course");

    let reporter = CliProgress::new();
    let result = build_course(&generator, search.as_ref(), &topic, &options, &reporter).await;
    reporter.clear();
    let result = result?;

    let rendered = render_output(&result, format)?;
    match out {
        Some(path) => {
            std::fs::write(path, &rendered)
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            println!();
            println!("  Course written to {}", path.display());
            println!("  Modules: {}", result.modules.len());
            println!(
                "  Videos:  {}",
                result.modules.iter().map(|m| m.videos.len()).sum::<usize>()
            );
            println!();
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

/// Render a finished course in the requested output format.
fn render_output(result: &CourseResult, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Markdown => result.text().to_string(),
        OutputFormat::Html => render_page(&PageView::course(result)),
        OutputFormat::Json => serde_json::to_string_pretty(result)?,
    })
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }

    fn clear(&self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn module_searched(&self, heading: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Searching videos [{current}/{total}] {heading}"));
    }

    fn done(&self, _result: &CourseResult) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// serve
// ---------------------------------------------------------------------------

async fn cmd_serve(
    host: Option<String>,
    port: Option<u16>,
    static_dir: Option<String>,
) -> Result<()> {
    let mut config = load_config()?;
    apply_server_overrides(&mut config, host, port, static_dir);

    let credentials = resolve_credentials(&config)?;
    let generator = OpenAiGenerator::new(&config.openai, &credentials)?;
    let search = YouTubeClient::from_credentials(&config.youtube, &credentials)?;

    let addr = resolve_addr(&config.server.host, config.server.port).await?;
    let state = AppState::new(&config, generator, search);

    println!("  CourseGen running at http://{addr}");
    coursegen_web::serve(state, addr).await?;
    Ok(())
}

/// Command-line flags win over the `[server]` section.
fn apply_server_overrides(
    config: &mut AppConfig,
    host: Option<String>,
    port: Option<u16>,
    static_dir: Option<String>,
) {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(dir) = static_dir {
        config.server.static_dir = dir;
    }
}

async fn resolve_addr(host: &str, port: u16) -> Result<SocketAddr> {
    tokio::net::lookup_host((host, port))
        .await
        .wrap_err_with(|| format!("cannot resolve '{host}'"))?
        .next()
        .ok_or_else(|| eyre!("no address found for '{host}:{port}'"))
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use coursegen_shared::{
        CourseDocument, ModuleHeading, ModuleVideos, ValidationConfig, VideoDescriptor,
    };

    use super::*;

    fn sample_result() -> CourseResult {
        CourseResult {
            document: CourseDocument {
                topic: Topic::parse("Python programming", &ValidationConfig::default()).unwrap(),
                text: "Module 1: Basics\n\nModule 2: Functions\n".into(),
            },
            modules: vec![
                ModuleVideos {
                    heading: ModuleHeading::new("Module 1: Basics"),
                    videos: vec![VideoDescriptor {
                        title: "Python basics".into(),
                        channel: "Corey Schafer".into(),
                        thumbnail_url: None,
                        embed_url: "https://www.youtube.com/embed/abc".into(),
                        published_at: None,
                    }],
                },
                ModuleVideos {
                    heading: ModuleHeading::new("Module 2: Functions"),
                    videos: vec![],
                },
            ],
        }
    }

    #[test]
    fn generate_defaults_to_markdown_on_stdout() {
        let cli = Cli::try_parse_from(["coursegen", "generate", "Python programming"]).unwrap();
        match cli.command {
            Command::Generate { topic, format, out } => {
                assert_eq!(topic, "Python programming");
                assert_eq!(format, OutputFormat::Markdown);
                assert!(out.is_none());
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "coursegen", "generate", "Rust", "--format", "json", "-vv", "--log-format", "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.log_format, LogFormat::Json));
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["coursegen", "generate", "Rust", "--format", "pdf"]).is_err());
    }

    #[test]
    fn serve_flags_override_config() {
        let cli = Cli::try_parse_from(["coursegen", "serve", "--port", "8080"]).unwrap();
        let Command::Serve {
            host,
            port,
            static_dir,
        } = cli.command
        else {
            panic!("expected serve");
        };

        let mut config = AppConfig::default();
        apply_server_overrides(&mut config, host, port, static_dir);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.static_dir, "public");
    }

    #[test]
    fn markdown_output_is_document_text() {
        let result = sample_result();
        let out = render_output(&result, OutputFormat::Markdown).unwrap();
        assert_eq!(out, result.text());
    }

    #[test]
    fn json_output_groups_videos_by_module() {
        let out = render_output(&sample_result(), OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["topic"], "Python programming");
        assert_eq!(json["videos_by_module"][0]["heading"], "Module 1: Basics");
        assert_eq!(
            json["videos_by_module"][0]["videos"][0]["embed_url"],
            "https://www.youtube.com/embed/abc"
        );
        assert!(json["videos_by_module"][1]["videos"].as_array().unwrap().is_empty());
    }

    #[test]
    fn html_output_is_full_page() {
        let out = render_output(&sample_result(), OutputFormat::Html).unwrap();
        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("<section class=\"module\">"));
    }

    #[tokio::test]
    async fn loopback_host_resolves() {
        let addr = resolve_addr("127.0.0.1", 3000).await.unwrap();
        assert_eq!(addr.port(), 3000);
        assert!(addr.ip().is_loopback());
    }
}
