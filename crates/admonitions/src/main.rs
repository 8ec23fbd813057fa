use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use admonitions::config::Config;
use admonitions::discovery::is_markdown;

#[derive(Parser)]
#[command(
    name = "admonitions",
    version,
    about = "Render Markdown with fenced admonition blocks to HTML"
)]
struct Cli {
    /// Log every admonition as it opens and closes.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a Markdown file or directory.
    Render {
        /// Markdown file, or directory to walk for `.md` files.
        input: PathBuf,

        /// Configuration file (defaults apply if it does not exist).
        #[arg(long, default_value = "admonitions.toml")]
        config: PathBuf,

        /// Output directory. Without it a single file is written to stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // --verbose enables DEBUG, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Render { input, config, out } => {
            let config = Config::load(&config).context("failed to load config")?;

            if !input.is_dir() && !is_markdown(&input) {
                warn!(path = %input.display(), "input does not have an .md extension");
            }

            match out {
                Some(out_dir) => {
                    let count = admonitions::build(&input, &out_dir, &config)?;
                    eprintln!("Rendered {count} file(s) into {}.", out_dir.display());
                }
                None => {
                    ensure!(
                        !input.is_dir(),
                        "rendering directory {} requires --out",
                        input.display()
                    );
                    let html = admonitions::render_file(&input, &config)?;
                    io::stdout()
                        .write_all(html.as_bytes())
                        .context("failed to write to stdout")?;
                }
            }
        }
    }

    Ok(())
}
