use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Maps a source file to its `.html` destination under `out_dir`.
///
/// When `input` is a directory the file's path relative to it is mirrored;
/// when `input` is the file itself only its name is kept.
///
/// # Errors
///
/// Returns an error if `file` is not under `input`.
pub fn output_path(input: &Path, file: &Path, out_dir: &Path) -> Result<PathBuf> {
    let relative = if input == file {
        file.file_name()
            .map(Path::new)
            .with_context(|| format!("{} has no file name", file.display()))?
    } else {
        file.strip_prefix(input).with_context(|| {
            format!("path {} is not under {}", file.display(), input.display())
        })?
    };
    Ok(out_dir.join(relative).with_extension("html"))
}

/// Writes `content` to the given path, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if directory creation or file writing fails.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- output_path --

    #[test]
    fn mirrors_relative_path() {
        let path = output_path(
            Path::new("docs"),
            Path::new("docs/guide/intro.md"),
            Path::new("public"),
        )
        .unwrap();
        assert_eq!(path, Path::new("public/guide/intro.html"));
    }

    #[test]
    fn single_file_keeps_name() {
        let file = Path::new("notes/readme.md");
        let path = output_path(file, file, Path::new("out")).unwrap();
        assert_eq!(path, Path::new("out/readme.html"));
    }

    #[test]
    fn file_outside_input_returns_error() {
        let err = output_path(Path::new("docs"), Path::new("other/a.md"), Path::new("out"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("is not under"), "got: {err}");
    }

    // -- write_output --

    #[test]
    fn creates_parent_dirs_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("test.html");

        write_output(&path, "hello").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.html");

        write_output(&path, "first").unwrap();
        write_output(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn parent_is_a_file_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = write_output(&blocker.join("sub").join("file.html"), "content")
            .unwrap_err()
            .to_string();
        assert!(
            err.contains("failed to create directory"),
            "should report directory creation failure, got: {err}"
        );
    }
}
