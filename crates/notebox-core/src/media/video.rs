//! Copying picked videos into app storage.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::{Error, Result};

const DEFAULT_VIDEO_EXTENSION: &str = "mov";

/// Copy a video into `media_dir` as `video-<uuid>.<ext>` and return the new path.
pub fn store_video(source: &Path, media_dir: &Path) -> Result<PathBuf> {
    if !source.is_file() {
        return Err(Error::InvalidInput(format!(
            "Video file not found: {}",
            source.display()
        )));
    }

    let extension = source
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map_or_else(
            || DEFAULT_VIDEO_EXTENSION.to_string(),
            str::to_ascii_lowercase,
        );

    std::fs::create_dir_all(media_dir)?;
    let target = media_dir.join(format!("video-{}.{extension}", Uuid::now_v7()));
    std::fs::copy(source, &target)?;

    tracing::debug!("Stored video {} as {}", source.display(), target.display());
    Ok(target)
}

/// Delete a stored video. Paths outside `media_dir` are left alone.
///
/// Returns `true` when a file was removed.
pub fn remove_stored_video(path: &Path, media_dir: &Path) -> Result<bool> {
    let (Ok(path), Ok(media_dir)) = (path.canonicalize(), media_dir.canonicalize()) else {
        return Ok(false);
    };
    if !path.starts_with(&media_dir) || !path.is_file() {
        return Ok(false);
    }

    std::fs::remove_file(&path)?;
    Ok(true)
}
