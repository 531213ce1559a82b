use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use episub::config::{Config, StyleProfile};
use episub::pipeline;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "episub")]
#[command(version, about = "Subtitle and chapter post-processing for downloaded episodes")]
#[command(
    long_about = "Convert platform SRT subtitles to styled ASS, rescale existing ASS tracks for muxing, and synthesize OGM chapter files from raw chapter marks."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Convert an SRT subtitle into a styled ASS subtitle
    Convert {
        /// Input subtitle file
        input: PathBuf,

        /// Output file (defaults to the input name with an .ass extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Style profile: latin, thai (defaults to inference from the file name)
        #[arg(short, long)]
        style: Option<String>,
    },
    /// Rescale the styles of an ASS subtitle for muxing
    Rescale {
        /// Input subtitle file (rewritten in place unless --output is given)
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Synthesize an OGM chapter file from raw chapter marks
    Chapters {
        /// JSON file with raw marks: [{"start", "end", "title"}, ...]
        input: PathBuf,

        /// Output file (defaults to the input name with a .chapters.txt extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Total runtime of the media in seconds
        #[arg(short, long)]
        duration: f64,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = Config::load().context("Failed to load configuration")?;

    match cli.command {
        Command::Convert {
            input,
            output,
            style,
        } => {
            let style = style
                .map(|s| s.parse::<StyleProfile>())
                .transpose()
                .map_err(|e: String| anyhow::anyhow!(e))?;

            let outcome =
                pipeline::convert_subtitle(&input, output.as_deref(), style, &config)
                    .context("Subtitle conversion failed")?;

            report_fonts(&outcome.fonts);
        }
        Command::Rescale { input, output } => {
            let outcome = pipeline::rescale_subtitle(&input, output.as_deref(), &config)
                .context("Subtitle rescaling failed")?;

            report_fonts(&outcome.fonts);
        }
        Command::Chapters {
            input,
            output,
            duration,
        } => {
            pipeline::process_chapters(&input, output.as_deref(), duration)
                .context("Chapter synthesis failed")?;
        }
    }

    Ok(())
}

fn report_fonts(fonts: &[String]) {
    if !fonts.is_empty() {
        info!("Fonts in use: {}", fonts.join(", "));
    }
}
