//! Content file discovery

use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::error::ContentError;

/// Find every file under `root` whose extension is in `extensions`
///
/// Extensions match case-insensitively and may be given with or without the
/// leading dot. Entries are visited in file-name order, so the result is
/// deterministic. A missing root yields no files; a root that cannot be
/// inspected is an error.
pub fn discover_files<S: AsRef<str>>(
    root: &Path,
    extensions: &[S],
) -> Result<Vec<PathBuf>, ContentError> {
    let root = absolute(root)?;
    match root.try_exists() {
        Ok(true) => {}
        Ok(false) => {
            tracing::debug!("Content root {:?} does not exist", root);
            return Ok(Vec::new());
        }
        Err(e) => return Err(ContentError::filesystem(root, e)),
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(&root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root.as_path()).to_path_buf();
            ContentError::filesystem(path, io::Error::from(e))
        })?;

        let path = entry.path();
        if entry.file_type().is_file() && has_extension(path, extensions) {
            tracing::debug!("Discovered {:?}", path);
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Check if a file has one of the accepted extensions
fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            extensions
                .iter()
                .any(|accepted| accepted.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Run [`discover_files`] on the blocking thread pool
pub async fn discover_files_async(
    root: PathBuf,
    extensions: Vec<String>,
) -> Result<Vec<PathBuf>, ContentError> {
    let fallback = root.clone();
    tokio::task::spawn_blocking(move || discover_files(&root, &extensions))
        .await
        .map_err(|e| ContentError::filesystem(fallback, io::Error::other(e)))?
}

fn absolute(path: &Path) -> Result<PathBuf, ContentError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| ContentError::filesystem(path, e))?;
    Ok(cwd.join(path))
}
