//! `requirements.txt` parsing.

use crate::bundler::error::{ErrorExt, Result};
use regex::Regex;
use serde::Serialize;
use std::{fmt, path::Path, sync::LazyLock};

static REQUIREMENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._-]*(?:\[[^\]]*\])?)\s*(.*?)\s*$")
        .expect("requirement pattern is valid")
});

/// One dependency entry.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Requirement {
    /// Distribution name, including extras.
    pub name: String,
    /// Version constraint such as `==2.31.0`, if pinned.
    pub constraint: Option<String>,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.constraint {
            Some(constraint) => write!(f, "{}{}", self.name, constraint),
            None => f.write_str(&self.name),
        }
    }
}

/// Ordered dependency list read from the manifest file.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct DependencyManifest {
    requirements: Vec<Requirement>,
}

impl DependencyManifest {
    /// Parses manifest text.
    ///
    /// Blank lines, `#` comments and pip option lines (`-r`, `--index-url`, ...)
    /// are skipped; trailing comments are dropped.
    pub fn parse(text: &str) -> Self {
        let requirements = text
            .lines()
            .map(|line| line.split_once(" #").map_or(line, |(l, _)| l).trim())
            .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
            .filter_map(|line| {
                let caps = REQUIREMENT_LINE.captures(line)?;
                let constraint = caps
                    .get(2)
                    .map(|m| m.as_str().replace(' ', ""))
                    .filter(|c| !c.is_empty());
                Some(Requirement {
                    name: caps[1].to_string(),
                    constraint,
                })
            })
            .collect();
        Self { requirements }
    }

    /// Reads and parses the manifest at `path`.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .fs_context("reading dependency manifest", path)?;
        Ok(Self::parse(&text))
    }

    /// Entries in file order.
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Whether no dependency is listed.
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.requirements.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pinned_and_bare_entries_in_order() {
        let manifest = DependencyManifest::parse("requests==2.31.0\nnumpy\nPyYAML >= 6.0\n");
        let names: Vec<_> = manifest.requirements().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["requests", "numpy", "PyYAML"]);
        assert_eq!(
            manifest.requirements()[0].constraint.as_deref(),
            Some("==2.31.0")
        );
        assert_eq!(manifest.requirements()[1].constraint, None);
        assert_eq!(manifest.requirements()[2].constraint.as_deref(), Some(">=6.0"));
    }

    #[test]
    fn skips_comments_blank_lines_and_options() {
        let text = "# generated\n\n--index-url https://example.invalid\nflask==3.0.0  # web\n";
        let manifest = DependencyManifest::parse(text);
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.requirements()[0].to_string(), "flask==3.0.0");
    }

    #[test]
    fn keeps_extras_in_name() {
        let manifest = DependencyManifest::parse("uvicorn[standard]==0.30.1\n");
        assert_eq!(manifest.requirements()[0].name, "uvicorn[standard]");
    }

    #[test]
    fn empty_text_is_empty_manifest() {
        assert!(DependencyManifest::parse("\n\n").is_empty());
    }

    #[tokio::test]
    async fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DependencyManifest::load(&dir.path().join("requirements.txt"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("reading dependency manifest"));
    }
}
