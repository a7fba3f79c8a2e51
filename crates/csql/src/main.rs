use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use csql_syntax::projector::render_projection;
use csql_syntax::{
    spans_to_lines, Category, ClassificationSpan, Highlighter, ParserBackend, Snapshot,
    SqlClassifier,
};
use tracing_subscriber::EnvFilter;

use csql::config::{self, Config};
use csql::output::{format_spans, lines_to_ansi, lines_to_plain};

fn print_version() {
    println!("csql {}", env!("CARGO_PKG_VERSION"));
}

fn print_usage() {
    eprintln!("csql - Highlight the SQL embedded in C# source files");
    eprintln!();
    eprintln!("Usage: csql [OPTIONS] <FILE>");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <FILE>              C# source file (or SQL file with --format)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -h, --help          Print this help message");
    eprintln!("  -V, --version       Print version information");
    eprintln!("      --spans         Print classification spans instead of the source");
    eprintln!("      --format        Treat FILE as a whole SQL document");
    eprintln!("      --config <PATH> Use this config file");
    eprintln!("      --theme <NAME>  Built-in theme (visual_studio, one_dark) or theme file");
    eprintln!("      --backend <B>   SQL parser backend (tsql, tree-sitter)");
    eprintln!("      --no-color      Disable ANSI colors");
    eprintln!();
    eprintln!("Environment Variables:");
    eprintln!("  CSQL_LOG            Log filter (e.g. csql_syntax=debug)");
    eprintln!("  CSQL_CONFIG_DIR     Directory holding config.toml");
    eprintln!();
    eprintln!("Configuration:");
    if let Some(path) = config::config_path() {
        eprintln!("  Config file: {}", path.display());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Mode {
    #[default]
    Highlight,
    Spans,
    Format,
}

#[derive(Debug, Default, PartialEq)]
struct Args {
    mode: Mode,
    file: Option<PathBuf>,
    config: Option<PathBuf>,
    theme: Option<String>,
    backend: Option<ParserBackend>,
    no_color: bool,
    help: bool,
    version: bool,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("{name} requires a value"))
        };
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "-V" | "--version" => parsed.version = true,
            "--spans" => parsed.mode = Mode::Spans,
            "--format" => parsed.mode = Mode::Format,
            "--no-color" => parsed.no_color = true,
            "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
            "--theme" => parsed.theme = Some(value("--theme")?),
            "--backend" => {
                parsed.backend = Some(match value("--backend")?.as_str() {
                    "tsql" => ParserBackend::Tsql,
                    "tree-sitter" => ParserBackend::TreeSitter,
                    other => bail!("unknown backend: {other}"),
                })
            }
            flag if flag.starts_with('-') => bail!("unknown option: {flag}"),
            file => {
                if parsed.file.is_some() {
                    bail!("unexpected argument: {file}");
                }
                parsed.file = Some(PathBuf::from(file));
            }
        }
    }
    Ok(parsed)
}

fn setup_tracing() {
    let filter = EnvFilter::try_from_env("CSQL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!();
            print_usage();
            std::process::exit(2);
        }
    };

    if args.help {
        print_usage();
        return Ok(());
    }
    if args.version {
        print_version();
        return Ok(());
    }

    setup_tracing();

    let Some(file) = &args.file else {
        print_usage();
        std::process::exit(2);
    };

    // Load configuration from ~/.config/csql/config.toml
    let mut cfg = match &args.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {:#}", e);
            Config::default()
        }),
    };
    apply_overrides(&mut cfg, &args);

    let source = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let theme = config::resolve_theme(&cfg.display)?;
    let classifier =
        SqlClassifier::new(cfg.classifier.clone()).context("Failed to create SQL classifier")?;
    let mut highlighter = Highlighter::new(theme, classifier);

    let output = match args.mode {
        Mode::Spans => {
            let spans = highlighter.classify(&source);
            tracing::debug!(spans = spans.len(), "classified");
            format_spans(&Snapshot::new(source.as_str()), &spans)
        }
        Mode::Highlight => {
            let lines = highlighter.highlight(&source);
            render(&cfg, &lines)
        }
        Mode::Format => {
            let projection = highlighter.classifier_mut().format_sql(&source);
            let text = render_projection(&projection);
            let mut spans = Vec::new();
            let mut offset = 0;
            for (category, piece) in &projection {
                if *category != Category::Plain {
                    spans.push(ClassificationSpan {
                        range: offset..offset + piece.len(),
                        category: *category,
                    });
                }
                offset += piece.len();
            }
            let lines = spans_to_lines(&text, &spans, highlighter.theme());
            render(&cfg, &lines)
        }
    };

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .context("Failed to write output")?;
    stdout.flush().context("Failed to write output")?;
    Ok(())
}

fn apply_overrides(cfg: &mut Config, args: &Args) {
    if let Some(backend) = args.backend {
        cfg.classifier.backend = backend;
    }
    if let Some(theme) = &args.theme {
        if theme.ends_with(".toml") {
            cfg.display.theme_file = Some(PathBuf::from(theme));
        } else {
            cfg.display.theme = theme.clone();
            cfg.display.theme_file = None;
        }
    }
    if args.no_color {
        cfg.display.color = false;
    }
}

fn render(cfg: &Config, lines: &[ratatui::text::Line<'_>]) -> String {
    if cfg.display.color {
        lines_to_ansi(lines)
    } else {
        lines_to_plain(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        let owned: Vec<String> = list.iter().map(|s| s.to_string()).collect();
        parse_args(&owned)
    }

    #[test]
    fn test_parse_file_and_flags() {
        let parsed = args(&["--spans", "--backend", "tree-sitter", "Query.cs"]).unwrap();
        assert_eq!(parsed.mode, Mode::Spans);
        assert_eq!(parsed.backend, Some(ParserBackend::TreeSitter));
        assert_eq!(parsed.file, Some(PathBuf::from("Query.cs")));
    }

    #[test]
    fn test_parse_errors() {
        assert!(args(&["--theme"]).is_err());
        assert!(args(&["--backend", "oracle", "a.cs"]).is_err());
        assert!(args(&["--bogus"]).is_err());
        assert!(args(&["a.cs", "b.cs"]).is_err());
    }

    #[test]
    fn test_theme_override() {
        let mut cfg = Config::default();
        apply_overrides(&mut cfg, &args(&["--theme", "one_dark", "--no-color"]).unwrap());
        assert_eq!(cfg.display.theme, "one_dark");
        assert!(!cfg.display.color);

        apply_overrides(&mut cfg, &args(&["--theme", "mine.toml"]).unwrap());
        assert_eq!(cfg.display.theme_file, Some(PathBuf::from("mine.toml")));
    }
}
