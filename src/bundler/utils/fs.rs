//! File system utilities for packaging.
//!
//! Provides file operations with automatic directory creation, permission
//! handling and path-carrying errors.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{io, path::Path};
use tokio::fs;

/// Creates all of the directories of the specified path.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    // create_dir_all is already idempotent - succeeds even if dir exists
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(e).fs_context("removing directory", path),
    }
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_file() {
        return Err(Error::GenericError(format!("{from:?} is not a file")));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file to", to)?;
    Ok(())
}

/// Moves a file, falling back to copy + remove when the rename crosses
/// filesystems.
pub async fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).await.is_ok() {
        return Ok(());
    }
    copy_file(from, to).await?;
    fs::remove_file(from)
        .await
        .fs_context("removing moved file", from)
}

/// Writes `content` to `path`, replacing any existing file.
pub async fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .fs_context("creating directory", parent)?;
    }
    fs::write(path, content).await.fs_context("writing file", path)
}

/// Sets `rwxr-xr-x` on unix; no-op elsewhere.
pub async fn set_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .await
            .fs_context("setting executable permissions on", path)?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn copy_file_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.txt");
        std::fs::write(&src, b"payload").unwrap();
        let dst = dir.path().join("nested/deeper/a.txt");

        copy_file(&src, &dst).await.unwrap();
        assert_eq!(std::fs::read(&dst).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn copy_file_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_file(dir.path(), &dir.path().join("x")).await.unwrap_err();
        assert!(err.to_string().contains("is not a file"));
    }

    #[tokio::test]
    async fn move_file_removes_source() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("requirements.txt");
        std::fs::write(&src, b"requests\n").unwrap();
        let dst = dir.path().join("out/requirements.txt");
        std::fs::create_dir_all(dst.parent().unwrap()).unwrap();

        move_file(&src, &dst).await.unwrap();
        assert!(!src.exists());
        assert_eq!(std::fs::read(&dst).unwrap(), b"requests\n");
    }

    #[tokio::test]
    async fn create_dir_all_keeps_existing_contents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("layout");
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("kept"), b"x").unwrap();

        create_dir_all(&target.join("nested/deeper")).await.unwrap();
        assert!(target.join("nested/deeper").is_dir());
        assert!(target.join("kept").exists());
    }

    #[tokio::test]
    async fn remove_missing_directory_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        remove_dir_all(&dir.path().join("never-created")).await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn set_executable_sets_mode() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("run.sh");
        std::fs::write(&file, b"#!/bin/sh\n").unwrap();

        set_executable(&file).await.unwrap();
        let mode = std::fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
