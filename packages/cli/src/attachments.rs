//! Reads image attachments from disk for report submission.

use std::path::{Path, PathBuf};

use civic_portal_api::PortalError;
use civic_portal_models::ImageAttachment;

/// Reads every image in `paths`.
///
/// Files whose extension does not map to an `image/*` MIME type are
/// skipped with a warning, the same way dropped non-image files are
/// ignored by the upload area.
///
/// # Errors
///
/// Returns [`PortalError::Io`] if an image file cannot be read.
pub fn load_images(paths: &[PathBuf]) -> Result<Vec<ImageAttachment>, PortalError> {
    let mut images = Vec::with_capacity(paths.len());

    for path in paths {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            log::warn!("Skipping {}: not an image ({mime})", path.display());
            continue;
        }

        let bytes = std::fs::read(path)?;
        log::debug!("attaching {} ({} bytes, {mime})", path.display(), bytes.len());

        images.push(ImageAttachment {
            file_name: file_name(path),
            mime_type: mime.essence_str().to_string(),
            bytes,
        });
    }

    Ok(images)
}

/// Splits a comma-separated list of paths as typed at a prompt.
#[must_use]
pub fn parse_path_list(input: &str) -> Vec<PathBuf> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned())
}
