//! ZIP writer.

use super::{entry_name, walk_sorted};
use crate::bundler::error::{ErrorExt, Result};
use ::zip::{CompressionMethod, DateTime, ZipWriter, write::SimpleFileOptions};
use std::{fs::File, path::Path};

/// Writes `source_dir` as a ZIP archive under `root_name/`.
///
/// Timestamps are pinned to the ZIP epoch; unix permission bits are stored
/// when the host has them.
pub(super) fn write(source_dir: &Path, root_name: &str, out: &mut File) -> Result<()> {
    let mut zip = ZipWriter::new(out);
    let base = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    for (rel, entry) in walk_sorted(source_dir)? {
        let name = entry_name(root_name, &rel);
        let path = entry.path();

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{name}/"), base.unix_permissions(0o755))?;
            continue;
        }
        if entry.file_type().is_symlink() && !path.is_file() {
            log::debug!("Skipping non-file symlink {}", path.display());
            continue;
        }

        let metadata = std::fs::metadata(path).fs_context("reading metadata of", path)?;
        zip.start_file(name, base.unix_permissions(unix_mode(&metadata)))?;
        let mut file = File::open(path).fs_context("opening file for archive", path)?;
        std::io::copy(&mut file, &mut zip).fs_context("compressing", path)?;
    }

    zip.finish()?;
    Ok(())
}

#[cfg(unix)]
fn unix_mode(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn unix_mode(_metadata: &std::fs::Metadata) -> u32 {
    0o644
}
