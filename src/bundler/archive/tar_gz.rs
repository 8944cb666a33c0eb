//! gzip-compressed tar writer.

use super::{entry_name, walk_sorted};
use crate::bundler::error::{ErrorExt, Result};
use flate2::{Compression, write::GzEncoder};
use std::{fs::File, path::Path};

/// Writes `source_dir` as a `.tar.gz` stream under `root_name/`.
///
/// Headers are deterministic: ownership and timestamps are normalised while
/// the executable bit is kept.
pub(super) fn write(source_dir: &Path, root_name: &str, out: &mut File) -> Result<()> {
    let encoder = GzEncoder::new(out, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.mode(tar::HeaderMode::Deterministic);
    builder.follow_symlinks(false);

    for (rel, entry) in walk_sorted(source_dir)? {
        let name = entry_name(root_name, &rel);
        builder
            .append_path_with_name(entry.path(), &name)
            .fs_context("adding to archive", entry.path())?;
    }

    let encoder = builder
        .into_inner()
        .fs_context("finishing tar stream for", source_dir)?;
    encoder
        .finish()
        .fs_context("finishing gzip stream for", source_dir)?;
    Ok(())
}
