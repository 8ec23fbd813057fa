use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::discovery::discover_markdown;
use crate::output::{output_path, write_output};
use crate::render::pipeline::render_document;

/// Renders a single Markdown file to HTML.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid UTF-8.
pub fn render_file(path: &Path, config: &Config) -> Result<String> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(render_document(&source, config))
}

/// Renders every Markdown file under `input` into `out_dir`, mirroring the
/// input layout with `.html` extensions.
///
/// Files that are not valid UTF-8 are skipped with a warning. Returns the
/// number of files written.
///
/// # Errors
///
/// Returns an error if discovery, reading, or writing fails.
pub fn build(input: &Path, out_dir: &Path, config: &Config) -> Result<usize> {
    let files = discover_markdown(input)?;
    let mut written = 0;

    for file in &files {
        let bytes = fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
        let Ok(source) = String::from_utf8(bytes) else {
            warn!(path = %file.display(), "skipping file that is not valid UTF-8");
            continue;
        };

        let html = render_document(&source, config);
        let dest = output_path(input, file, out_dir)?;
        write_output(&dest, &html)?;
        info!(source = %file.display(), dest = %dest.display(), "rendered");
        written += 1;
    }

    Ok(written)
}
