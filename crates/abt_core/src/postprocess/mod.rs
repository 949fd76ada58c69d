//! Post-processing of bundletool output.
//!
//! In universal mode bundletool writes a `.apks` container that is really
//! a zip archive holding the single universal APK. This module renames the
//! container to `.zip`, extracts it next to the bundle, and removes the
//! archive, leaving `universal.apk` (plus metadata) in the directory.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from the rename/unzip/cleanup sequence.
#[derive(Error, Debug)]
pub enum PostProcessError {
    /// The `.apks` container was missing or could not be renamed.
    #[error("Failed to rename {file}")]
    Rename { file: String },

    /// Extraction failed; the renamed archive is left on disk for
    /// inspection.
    #[error("Unzipping failed: {0}")]
    Unzip(String),
}

/// Result type for post-processing operations.
pub type PostProcessResult<T> = Result<T, PostProcessError>;

/// Handle the artifact bundletool left in `directory` for `file_name`.
///
/// `file_name` is the name of the input bundle (e.g. `app.aab`); the
/// artifact is expected at `<directory>/<stem>.apks`. Returns the
/// human-readable summary appended to the conversion log.
///
/// Non-universal modes are a no-op: bundletool already named the output
/// correctly.
pub fn handle_bundletool_output(
    directory: &Path,
    file_name: &str,
    is_universal: bool,
) -> PostProcessResult<String> {
    if !is_universal {
        return Ok("Skipped file operations (not universal mode).".to_string());
    }

    let base_name = file_stem(file_name);
    let apks_path = directory.join(format!("{}.apks", base_name));
    let zip_path = directory.join(format!("{}.zip", base_name));

    rename_artifact(&apks_path, &zip_path)?;

    if let Err(e) = unzip(&zip_path, directory) {
        // Keep the archive around so the user can look at it.
        return Err(PostProcessError::Unzip(e.to_string()));
    }

    let deleted = fs::remove_file(&zip_path).is_ok();
    if !deleted {
        tracing::warn!("Could not delete {}", zip_path.display());
    }

    let mut message = format!(
        "Renamed and unzipped successfully.\nOutput: {}",
        directory.display()
    );
    if !deleted {
        message.push_str("\nWarning: Unable to delete temporary zip file.");
    }
    Ok(message)
}

/// File name with its last extension removed (`app.aab` -> `app`).
fn file_stem(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) => &file_name[..idx],
        None => file_name,
    }
}

fn rename_artifact(source: &Path, destination: &Path) -> PostProcessResult<()> {
    let file = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());

    if !source.exists() {
        return Err(PostProcessError::Rename { file });
    }
    fs::rename(source, destination).map_err(|e| {
        tracing::error!("Rename of {} failed: {}", source.display(), e);
        PostProcessError::Rename { file }
    })
}

/// Extract every entry of `zip_path` into `destination`.
///
/// Entry paths are validated with `enclosed_name` so a crafted archive
/// cannot write outside `destination`.
fn unzip(zip_path: &Path, destination: &Path) -> io::Result<()> {
    let file = File::open(zip_path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let Some(relative) = entry.enclosed_name() else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("archive entry escapes output directory: {}", entry.name()),
            ));
        };
        let out_path: PathBuf = destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
        } else {
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out_file = File::create(&out_path)?;
            io::copy(&mut entry, &mut out_file)?;
        }
    }

    tracing::info!(
        "Extracted {} into {}",
        zip_path.display(),
        destination.display()
    );
    Ok(())
}
