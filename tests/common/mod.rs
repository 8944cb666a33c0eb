//! Shared fixtures: a project directory and a stand-in interpreter.
//!
//! The stand-in is a POSIX shell script that answers the three ways the
//! packager and its launchers invoke the interpreter:
//!
//! - `-m pipreqs.pipreqs ... <dir>` writes `<dir>/requirements.txt` and
//!   records its arguments in `pipreqs.args` beside the stand-in
//! - `-m pip install -r <manifest> --target <dir>` creates one package
//!   directory per manifest entry
//! - `<script>.py` prints what it would have run

#![allow(dead_code)]

use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

/// How the stand-in's dependency scan behaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scan {
    /// Write the configured requirements.
    Write,
    /// Exit non-zero.
    Fail,
    /// Exit zero without writing a manifest.
    Skip,
}

/// Behaviour of the stand-in interpreter.
#[derive(Clone, Debug)]
pub struct FakePython {
    pub requirements: String,
    pub scan: Scan,
    pub install_fails: bool,
}

impl Default for FakePython {
    fn default() -> Self {
        Self {
            requirements: "requests==2.31.0".to_string(),
            scan: Scan::Write,
            install_fails: false,
        }
    }
}

impl FakePython {
    pub fn requirements(mut self, requirements: &str) -> Self {
        self.requirements = requirements.to_string();
        self
    }

    pub fn scan(mut self, scan: Scan) -> Self {
        self.scan = scan;
        self
    }

    pub fn install_fails(mut self) -> Self {
        self.install_fails = true;
        self
    }

    /// Writes the stand-in as `<dir>/python3` and returns its path.
    pub fn write(&self, dir: &Path) -> PathBuf {
        let scan = match self.scan {
            Scan::Write => r#"printf '%s\n' "$REQUIREMENTS" > "$dir/requirements.txt""#,
            Scan::Fail => r#"echo "pipreqs: failed to parse $dir" >&2; exit 2"#,
            Scan::Skip => ":",
        };
        let install = if self.install_fails {
            r#"echo "ERROR: No matching distribution found" >&2; exit 1"#
        } else {
            ":"
        };

        let script = format!(
            r#"#!/bin/sh
REQUIREMENTS='{requirements}'
case "$1" in
  -m)
    case "$2" in
      pipreqs.pipreqs)
        printf '%s\n' "$@" > "$(dirname "$0")/pipreqs.args"
        for dir in "$@"; do :; done
        {scan}
        exit 0
        ;;
      pip)
        {install}
        while IFS= read -r line; do
          name=$(printf '%s' "$line" | sed 's/[=<>!~ ].*//')
          if [ -n "$name" ]; then
            mkdir -p "$7/$name"
            : > "$7/$name/__init__.py"
          fi
        done < "$5"
        exit 0
        ;;
    esac
    ;;
  *.py)
    echo "ran $1 with PYTHONPATH=$PYTHONPATH"
    exit 0
    ;;
esac
echo "unexpected invocation: $*" >&2
exit 64
"#,
            requirements = self.requirements,
        );

        let path = dir.join("python3");
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }
}

/// A project directory holding `app.py` plus a separate tools directory.
pub struct Project {
    pub root: tempfile::TempDir,
}

impl Project {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("project")).unwrap();
        fs::create_dir_all(root.path().join("tools")).unwrap();
        fs::write(
            root.path().join("project/app.py"),
            "import requests\nprint(requests.__name__)\n",
        )
        .unwrap();
        Self { root }
    }

    pub fn dir(&self) -> PathBuf {
        self.root.path().join("project")
    }

    pub fn script(&self) -> PathBuf {
        self.dir().join("app.py")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir().join("dist")
    }

    pub fn python(&self, fake: FakePython) -> PathBuf {
        fake.write(&self.root.path().join("tools"))
    }

    /// Arguments of the last dependency scan, one per line.
    pub fn scan_args(&self) -> Vec<String> {
        fs::read_to_string(self.root.path().join("tools/pipreqs.args"))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Names of leftover staging directories next to the output directory.
    pub fn staging_leftovers(&self) -> Vec<String> {
        fs::read_dir(self.dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.contains("-staging-") || n.starts_with(".kodegen-previous-"))
            .collect()
    }
}
