//! Artifact checksum calculation.
//!
//! SHA-256 of single files (archives) and of whole directory trees (the
//! package layout), used in the bundle report and to compare runs.

use crate::{bail, bundler::Result, bundler::error::ErrorExt};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Calculates SHA256 checksum of a file or directory.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash (64 characters)
/// * `Err` - If path cannot be read or is neither file nor directory
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("reading metadata for checksum", path)?;

    let mut hasher = Sha256::new();
    if metadata.is_file() {
        hash_file(path, &mut hasher).await?;
    } else if metadata.is_dir() {
        hash_directory(path, &mut hasher).await?;
    } else {
        bail!("Path is neither file nor directory: {}", path.display())
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Streams a file into the hasher in 8KB chunks.
async fn hash_file(file_path: &Path, hasher: &mut Sha256) -> Result<()> {
    let mut file = tokio::fs::File::open(file_path)
        .await
        .fs_context("opening file for hashing", file_path)?;
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for hash calculation", file_path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(())
}

/// Hashes a directory tree.
///
/// Entries are visited in sorted order. Each contributes its relative path,
/// its kind, its permission bits on unix, and for files the content, so two
/// layouts hash equal exactly when they have the same structure, modes and
/// bytes. Timestamps are ignored.
async fn hash_directory(dir_path: &Path, hasher: &mut Sha256) -> Result<()> {
    let mut entries = Vec::new();
    for entry in walkdir::WalkDir::new(dir_path)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        entries.push(entry?);
    }

    for entry in entries {
        let rel_path = entry.path().strip_prefix(dir_path)?;
        hasher.update(rel_path.to_string_lossy().as_bytes());
        hasher.update([0]);

        let file_type = entry.file_type();
        let kind: &[u8] = if file_type.is_dir() {
            b"d"
        } else if file_type.is_symlink() {
            b"l"
        } else {
            b"f"
        };
        hasher.update(kind);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = entry
                .metadata()?
                .permissions()
                .mode()
                & 0o777;
            hasher.update(mode.to_le_bytes());
        }

        if file_type.is_file() {
            hash_file(entry.path(), hasher).await?;
        } else if file_type.is_symlink() {
            let target = tokio::fs::read_link(entry.path())
                .await
                .fs_context("reading symlink for hashing", entry.path())?;
            hasher.update(target.to_string_lossy().as_bytes());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(root: &Path) {
        std::fs::create_dir_all(root.join("lib/empty")).unwrap();
        std::fs::write(root.join("app.py"), b"print('hi')\n").unwrap();
        std::fs::write(root.join("lib/mod.py"), b"x = 1\n").unwrap();
    }

    #[tokio::test]
    async fn file_checksum_matches_known_value() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("empty");
        std::fs::write(&file, b"").unwrap();
        assert_eq!(
            calculate_sha256(&file).await.unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[tokio::test]
    async fn identical_trees_hash_equal() {
        let dir = tempfile::tempdir().unwrap();
        let (a, b) = (dir.path().join("a"), dir.path().join("b"));
        tree(&a);
        tree(&b);
        assert_eq!(
            calculate_sha256(&a).await.unwrap(),
            calculate_sha256(&b).await.unwrap()
        );
    }

    #[tokio::test]
    async fn empty_directories_change_the_digest() {
        let dir = tempfile::tempdir().unwrap();
        let (a, b) = (dir.path().join("a"), dir.path().join("b"));
        tree(&a);
        tree(&b);
        std::fs::create_dir_all(b.join("extra")).unwrap();
        assert_ne!(
            calculate_sha256(&a).await.unwrap(),
            calculate_sha256(&b).await.unwrap()
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn permission_changes_change_the_digest() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let (a, b) = (dir.path().join("a"), dir.path().join("b"));
        tree(&a);
        tree(&b);
        std::fs::set_permissions(b.join("app.py"), std::fs::Permissions::from_mode(0o755))
            .unwrap();
        std::fs::set_permissions(a.join("app.py"), std::fs::Permissions::from_mode(0o644))
            .unwrap();
        assert_ne!(
            calculate_sha256(&a).await.unwrap(),
            calculate_sha256(&b).await.unwrap()
        );
    }
}
