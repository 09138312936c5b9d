//! Mathdown CLI - extract and restore TeX math around Markdown conversion

#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "cli")]
use serde::Serialize;
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};

#[cfg(feature = "cli")]
use mathdown::{MathConfig, MathExtractor, MathPipeline};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "mdmath")]
#[command(version)]
#[command(about = "Mathdown - math-aware Markdown preprocessing", long_about = None)]
struct Cli {
    /// Input file path (reads from stdin if not provided)
    input_file: Option<String>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    /// Processing mode
    #[arg(short, long, value_enum, default_value_t = Mode::Roundtrip)]
    mode: Mode,

    /// Delimiter for inline math
    #[arg(long, default_value = "$")]
    inline_mark: String,

    /// Delimiter for display math
    #[arg(long, default_value = "$$")]
    display_mark: String,

    /// Treat the math runtime as absent (plain conversion, no extraction)
    #[arg(long)]
    no_math: bool,

    /// Write a JSON report of the captured math spans to this path
    #[arg(long)]
    math_log: Option<String>,
}

#[cfg(feature = "cli")]
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Emit the placeholder-bearing text, math removed
    Extract,
    /// Extract, identity-convert, restore (a normalization pass)
    Roundtrip,
    /// Extract, render Markdown to HTML, restore (needs the `pulldown` feature)
    Render,
}

/// Captured-span report written by `--math-log`.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize)]
struct MathReport {
    count: usize,
    spans: Vec<String>,
}

#[cfg(feature = "cli")]
fn main() -> io::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // Read input
    let input = match cli.input_file {
        Some(ref path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let config = MathConfig::with_marks(&cli.inline_mark, &cli.display_mark);

    // The span report runs its own extraction pass so every mode can
    // produce it, including plain passthrough.
    if let Some(ref path) = cli.math_log {
        let mut extractor = MathExtractor::with_config(config.clone());
        extractor.remove_math(&input);
        let report = MathReport {
            count: extractor.captured().len(),
            spans: extractor.captured().to_vec(),
        };
        let serialized = serde_json::to_string_pretty(&report)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        fs::write(path, serialized)?;
    }

    let result = match cli.mode {
        Mode::Extract => {
            let mut extractor = MathExtractor::with_config(config);
            extractor.remove_math(&input)
        }
        Mode::Roundtrip => run_pipeline(&input, &cli, config, |text: &str| text.to_string()),
        Mode::Render => render(&input, &cli, config),
    };

    // Write output
    match cli.output {
        Some(ref path) => fs::write(path, result)?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", result)?;
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn run_pipeline<C: mathdown::MarkdownConverter>(
    input: &str,
    cli: &Cli,
    config: MathConfig,
    converter: C,
) -> String {
    let pipeline = MathPipeline::new(converter)
        .with_config(config)
        .math_available(!cli.no_math);
    match pipeline.convert(input) {
        Ok(output) => output,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    }
}

#[cfg(all(feature = "cli", feature = "pulldown"))]
fn render(input: &str, cli: &Cli, config: MathConfig) -> String {
    run_pipeline(input, cli, config, mathdown::PulldownConverter::new())
}

#[cfg(all(feature = "cli", not(feature = "pulldown")))]
fn render(_input: &str, _cli: &Cli, _config: MathConfig) -> String {
    eprintln!("Render mode needs the `pulldown` feature. Build with --features pulldown");
    std::process::exit(1);
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install mathdown --features cli");
    eprintln!("  mdmath [OPTIONS] [INPUT_FILE]");
}
