//! Single-file archive creation.
//!
//! Compresses the assembled layout into `<name>.zip` or `<name>.tar.gz`,
//! placed in the output directory's parent. Every entry sits under a single
//! `<name>/` root so the extract-and-run launcher can `cd` into it.

mod tar_gz;
mod zip;

use super::{
    error::{Error, ErrorExt, Result},
    settings::ArchiveFormat,
};
use std::path::{Path, PathBuf};

/// Writes the archive for `source_dir` into `dest_dir`.
///
/// The archive is first written to a temporary file in `dest_dir` and then
/// renamed into place, so an interrupted run never leaves a truncated
/// archive under the final name.
///
/// # Returns
///
/// Path of the created archive, `<dest_dir>/<root_name>.<ext>`.
pub async fn create_archive(
    format: ArchiveFormat,
    source_dir: &Path,
    root_name: &str,
    dest_dir: &Path,
) -> Result<PathBuf> {
    let archive_path = dest_dir.join(format!("{}.{}", root_name, format.extension()));
    log::info!("Packaging single-file archive {}", archive_path.display());

    tokio::fs::create_dir_all(dest_dir)
        .await
        .fs_context("creating archive directory", dest_dir)?;

    let source_dir = source_dir.to_path_buf();
    let dest_dir = dest_dir.to_path_buf();
    let root_name = root_name.to_string();
    let final_path = archive_path.clone();

    // Offload blocking compression to dedicated thread pool
    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut temp = tempfile::Builder::new()
            .prefix(".archive-")
            .tempfile_in(&dest_dir)
            .fs_context("creating temporary archive in", &dest_dir)?;

        match format {
            ArchiveFormat::Zip => zip::write(&source_dir, &root_name, temp.as_file_mut())?,
            ArchiveFormat::TarGz => tar_gz::write(&source_dir, &root_name, temp.as_file_mut())?,
        }

        temp.persist(&final_path)
            .map_err(|e| e.error)
            .fs_context("persisting archive", &final_path)?;
        Ok(())
    })
    .await
    .map_err(|e| Error::GenericError(format!("Archive task panicked: {}", e)))??;

    log::info!("✓ Created archive: {}", archive_path.display());
    Ok(archive_path)
}

/// Entries under `dir` in deterministic order, paired with their relative path.
///
/// Directories are included so empty ones (such as an empty vendor
/// directory) survive the round trip.
fn walk_sorted(dir: &Path) -> Result<Vec<(PathBuf, walkdir::DirEntry)>> {
    let mut entries = Vec::new();
    for entry in walkdir::WalkDir::new(dir)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry?;
        let rel = entry.path().strip_prefix(dir)?.to_path_buf();
        entries.push((rel, entry));
    }
    Ok(entries)
}

/// Archive entry name with forward slashes under `root`.
fn entry_name(root: &str, rel: &Path) -> String {
    let mut name = root.to_string();
    for component in rel.components() {
        name.push('/');
        name.push_str(&component.as_os_str().to_string_lossy());
    }
    name
}
