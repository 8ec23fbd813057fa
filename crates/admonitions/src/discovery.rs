use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use walkdir::WalkDir;

/// Collects the Markdown files to render from `input`.
///
/// A file is returned as-is. A directory is walked recursively, excluding:
/// - files and directories whose names start with `_`
/// - files without an `.md` extension
///
/// Paths are sorted for deterministic output.
///
/// # Errors
///
/// Returns an error if `input` does not exist or a directory entry cannot be
/// read.
pub fn discover_markdown(input: &Path) -> Result<Vec<PathBuf>> {
    ensure!(input.exists(), "input {} does not exist", input.display());

    if !input.is_dir() {
        return Ok(vec![input.to_owned()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_excluded(e))
    {
        let entry = entry.with_context(|| format!("failed to read entry in {}", input.display()))?;
        if entry.file_type().is_file() && is_markdown(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Whether `path` has an `.md` extension.
#[must_use]
pub fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

/// Returns `true` for entries whose file name starts with `_`.
fn is_excluded(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('_'))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn touch(dir: &Path, rel_path: &str) {
        let path = dir.join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "!!!note\n!!!\n").unwrap();
    }

    fn relative(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn discovers_markdown_files_sorted() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path(), "b.md");
        touch(root.path(), "a.md");
        touch(root.path(), "guide/intro.md");

        let files = discover_markdown(root.path()).unwrap();
        assert_eq!(
            relative(root.path(), &files),
            vec!["a.md", "b.md", "guide/intro.md"]
        );
    }

    #[test]
    fn skips_non_markdown_files() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path(), "page.md");
        touch(root.path(), "notes.txt");
        touch(root.path(), "image.png");

        let files = discover_markdown(root.path()).unwrap();
        assert_eq!(relative(root.path(), &files), vec!["page.md"]);
    }

    #[test]
    fn skips_underscore_prefixed_entries() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path(), "page.md");
        touch(root.path(), "_draft.md");
        touch(root.path(), "_partials/header.md");
        touch(root.path(), "docs/_hidden.md");

        let files = discover_markdown(root.path()).unwrap();
        assert_eq!(relative(root.path(), &files), vec!["page.md"]);
    }

    #[test]
    fn underscore_root_is_still_walked() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("_site");
        touch(&root, "page.md");

        let files = discover_markdown(&root).unwrap();
        assert_eq!(relative(&root, &files), vec!["page.md"]);
    }

    #[test]
    fn single_file_is_returned_as_is() {
        let root = tempfile::tempdir().unwrap();
        touch(root.path(), "notes.markdown");
        let path = root.path().join("notes.markdown");

        assert_eq!(discover_markdown(&path).unwrap(), vec![path]);
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let root = tempfile::tempdir().unwrap();
        assert!(discover_markdown(root.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_input_returns_error() {
        let root = tempfile::tempdir().unwrap();
        let err = discover_markdown(&root.path().join("missing"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("does not exist"), "got: {err}");
    }
}
