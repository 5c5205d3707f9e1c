use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use chord_table_core::{AppConfig, KeyAnalyzer, ModePolicy, OutputFormat, Session, TableRenderer};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

fn main() -> chord_table_core::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => run_interactive(&config).map(|()| ExitCode::SUCCESS),
        Commands::Analyze { root, mode } => run_analyze(&config, &root, &mode),
    }
}

fn run_interactive(config: &AppConfig) -> chord_table_core::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(stdin.lock(), stdout.lock(), config);
    session.run()?;
    Ok(())
}

fn run_analyze(config: &AppConfig, root: &str, mode: &str) -> chord_table_core::Result<ExitCode> {
    tracing::info!(root, mode, "analysing single key");

    let mut out = io::stdout().lock();
    if analyze_to(config, root, mode, &mut out)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Renders one key to `out`. Returns `false` when the query itself was
/// rejected; the error has already been written in the configured format.
fn analyze_to<W: Write>(
    config: &AppConfig,
    root: &str,
    mode: &str,
    out: &mut W,
) -> chord_table_core::Result<bool> {
    let analyzer = KeyAnalyzer::new(config.mode_policy);
    let renderer = TableRenderer::new(config.format);

    let succeeded = match analyzer.query(root, mode) {
        Ok(analysis) => {
            renderer.render(&analysis, out)?;
            true
        }
        Err(err) if err.is_recoverable() => {
            tracing::warn!(error = %err, "query failed");
            renderer.render_error(&err, out)?;
            false
        }
        Err(err) => return Err(err),
    };
    out.flush()?;
    Ok(succeeded)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Diatonic chord tables for major and minor keys", long_about = None)]
struct Cli {
    /// JSON configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format, overriding the configuration file.
    #[arg(short, long, value_enum, global = true)]
    format: Option<FormatArg>,

    /// Reject mode characters other than `M` and `m`.
    #[arg(long, global = true)]
    strict: bool,

    /// Do not print the input prompt.
    #[arg(long, global = true)]
    no_prompt: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    fn resolve_config(&self) -> chord_table_core::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_path(path)?,
            None => AppConfig::default(),
        };

        if let Some(format) = self.format {
            config.format = format.into();
        }
        if self.strict {
            config.mode_policy = ModePolicy::Strict;
        }
        if self.no_prompt {
            config.show_prompt = Some(false);
        }
        Ok(config)
    }
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Read `<ROOT> <MODE>` pairs from stdin until end-of-input.
    Interactive,
    /// Print the chord table for a single key.
    Analyze {
        /// Root note, e.g. `C`, `f#` or `G#`.
        root: String,
        /// Mode character: `m` for minor, `M` for major.
        mode: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_interactive_text() {
        let cli = Cli::try_parse_from(["chord-table"]).unwrap();
        assert!(cli.command.is_none());

        let config = cli.resolve_config().unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn flags_override_configuration() {
        let cli =
            Cli::try_parse_from(["chord-table", "--format", "json", "--strict", "--no-prompt"])
                .unwrap();
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.mode_policy, ModePolicy::Strict);
        assert_eq!(config.show_prompt, Some(false));
    }

    #[test]
    fn parses_analyze_subcommand() {
        let cli = Cli::try_parse_from(["chord-table", "analyze", "f#", "m"]).unwrap();
        match cli.command {
            Some(Commands::Analyze { root, mode }) => {
                assert_eq!(root, "f#");
                assert_eq!(mode, "m");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn analyze_renders_the_key() {
        let mut out = Vec::new();
        let succeeded = analyze_to(&AppConfig::default(), "a", "m", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(succeeded);
        assert!(text.starts_with("A min\tB Maj/min\t"));
        assert!(text.ends_with("Easy version :\nA min\nG Maj\nF Maj\nE Maj\n"));
    }

    #[test]
    fn analyze_reports_rejected_query_once() {
        let mut out = Vec::new();
        let succeeded = analyze_to(&AppConfig::default(), "H", "M", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(!succeeded);
        assert_eq!(text.matches("unknown root note").count(), 1);
        assert!(text.starts_with("error: unknown root note `H`"));
    }

    #[test]
    fn analyze_in_strict_json_mode() {
        let config = AppConfig {
            format: OutputFormat::Json,
            mode_policy: ModePolicy::Strict,
            ..AppConfig::default()
        };
        let mut out = Vec::new();
        let succeeded = analyze_to(&config, "C", "x", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(!succeeded);
        assert!(text.contains("\"error\""));
        assert!(text.contains("unsupported mode"));
    }

    #[test]
    fn verifies_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
