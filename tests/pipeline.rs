//! End-to-end runs of the packaging pipeline through the library API.
#![cfg(unix)]

mod common;

use common::{FakePython, Project, Scan};
use kodegen_bundler_script::bundler::{
    Bundler, Error, Platform, SettingsBuilder, Stage, TargetProfile,
    platform::macos::{APP_ICON_FILE, InfoPlist},
};
use std::{
    fs,
    io::Read,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
    process::Command,
};

fn builder(project: &Project, python: &Path, platform: Platform) -> SettingsBuilder {
    SettingsBuilder::new()
        .script(project.script())
        .output_dir(project.output_dir())
        .name("demo")
        .target(TargetProfile::for_platform(platform))
        .python(python)
}

fn mode(path: &Path) -> u32 {
    fs::metadata(path).unwrap().permissions().mode() & 0o777
}

#[tokio::test]
async fn directory_package_has_expected_layout() {
    let project = Project::new();
    let fake = FakePython::default().requirements("requests==2.31.0\nnumpy>=1.24");
    let python = project.python(fake);
    let settings = builder(&project, &python, Platform::Linux).build().unwrap();

    let report = Bundler::new(settings).bundle().await.unwrap();
    let out = project.output_dir();

    assert_eq!(
        fs::read_to_string(out.join("app.py")).unwrap(),
        fs::read_to_string(project.script()).unwrap()
    );
    assert_eq!(
        fs::read_to_string(out.join("requirements.txt")).unwrap(),
        "requests==2.31.0\nnumpy>=1.24\n"
    );
    assert!(!project.dir().join("requirements.txt").exists());
    assert_eq!(fs::read_to_string(out.join(".kodegen-package")).unwrap(), "demo\n");
    assert!(out.join("lib/requests/__init__.py").is_file());
    assert!(out.join("lib/numpy/__init__.py").is_file());

    let interpreter = out.join("python/python");
    assert_eq!(fs::read(&interpreter).unwrap(), fs::read(&python).unwrap());
    assert_eq!(mode(&interpreter), 0o755);

    let launcher = out.join("demo.sh");
    assert_eq!(
        fs::read_to_string(&launcher).unwrap(),
        "#!/bin/bash\nexport PYTHONPATH=lib\npython/python \"app.py\"\n"
    );
    assert_eq!(mode(&launcher), 0o755);

    assert_eq!(report.launcher, launcher);
    assert_eq!(report.interpreter, interpreter);
    let names: Vec<_> = report.dependencies.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["requests", "numpy"]);
    assert!(report.archive.is_none());
    assert!(report.extract_launcher.is_none());
    assert_eq!(
        report.stages,
        [
            Stage::CopyScript,
            Stage::ResolveDependencies,
            Stage::EmbedInterpreter,
            Stage::GenerateLauncher,
            Stage::PlatformBundle,
            Stage::Commit,
        ]
    );
    assert!(project.staging_leftovers().is_empty());
}

#[tokio::test]
async fn launcher_runs_the_script_from_the_package() {
    let project = Project::new();
    let python = project.python(FakePython::default());
    let settings = builder(&project, &python, Platform::Linux).build().unwrap();
    Bundler::new(settings).bundle().await.unwrap();

    let output = Command::new("bash")
        .arg("demo.sh")
        .current_dir(project.output_dir())
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "ran app.py with PYTHONPATH=lib\n"
    );
}

#[tokio::test]
async fn onefile_tarball_extracts_and_runs() {
    let project = Project::new();
    let python = project.python(FakePython::default());
    let settings = builder(&project, &python, Platform::Linux)
        .onefile(true)
        .build()
        .unwrap();

    let report = Bundler::new(settings).bundle().await.unwrap();

    let archive = project.dir().join("demo.tar.gz");
    let artifact = report.archive.as_ref().unwrap();
    assert_eq!(artifact.path, archive);
    assert_eq!(artifact.size, fs::metadata(&archive).unwrap().len());
    assert_eq!(artifact.sha256.len(), 64);

    let file = fs::File::open(&archive).unwrap();
    let mut tar = tar::Archive::new(flate2::read::GzDecoder::new(file));
    let entries: Vec<PathBuf> = tar
        .entries()
        .unwrap()
        .map(|e| e.unwrap().path().unwrap().into_owned())
        .collect();
    for expected in ["demo/app.py", "demo/demo.sh", "demo/python/python", "demo/requirements.txt"] {
        assert!(
            entries.contains(&PathBuf::from(expected)),
            "{expected} missing from {entries:?}"
        );
    }
    assert!(entries.iter().all(|p| p.starts_with("demo")));

    let extract_launcher = project.dir().join("demo_launcher.sh");
    assert_eq!(report.extract_launcher.as_deref(), Some(extract_launcher.as_path()));
    let text = fs::read_to_string(&extract_launcher).unwrap();
    assert!(text.contains("tar -xzf \"demo.tar.gz\""));
    assert_eq!(mode(&extract_launcher), 0o755);

    let run_dir = tempfile::tempdir().unwrap();
    fs::copy(&archive, run_dir.path().join("demo.tar.gz")).unwrap();
    fs::copy(&extract_launcher, run_dir.path().join("demo_launcher.sh")).unwrap();
    let output = Command::new("bash")
        .arg("demo_launcher.sh")
        .current_dir(run_dir.path())
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    assert!(String::from_utf8_lossy(&output.stdout).contains("ran app.py with PYTHONPATH=lib"));
    assert!(run_dir.path().join("demo/lib/requests/__init__.py").is_file());
}

#[tokio::test]
async fn windows_target_writes_batch_launchers_and_zip() {
    let project = Project::new();
    let python = project.python(FakePython::default());
    let settings = builder(&project, &python, Platform::Windows)
        .onefile(true)
        .build()
        .unwrap();

    let report = Bundler::new(settings).bundle().await.unwrap();
    let out = project.output_dir();

    assert!(out.join("python/python.exe").is_file());
    let launcher = fs::read_to_string(out.join("demo.bat")).unwrap();
    assert_eq!(
        launcher,
        "@echo off\r\nset PYTHONPATH=lib\r\npython\\python.exe \"app.py\"\r\n"
    );

    let archive = project.dir().join("demo.zip");
    assert_eq!(report.archive.unwrap().path, archive);
    let mut zip = zip::ZipArchive::new(fs::File::open(&archive).unwrap()).unwrap();
    let names: Vec<String> = zip.file_names().map(str::to_string).collect();
    assert!(names.iter().any(|n| n == "demo/demo.bat"), "{names:?}");
    assert!(names.iter().any(|n| n == "demo/python/python.exe"), "{names:?}");
    let mut script = String::new();
    zip.by_name("demo/app.py")
        .unwrap()
        .read_to_string(&mut script)
        .unwrap();
    assert_eq!(script, fs::read_to_string(project.script()).unwrap());

    let extract = fs::read_to_string(project.dir().join("demo_launcher.bat")).unwrap();
    assert!(extract.contains("Expand-Archive -Path 'demo.zip'"));
    assert!(extract.contains("call \"demo.bat\"\r\n"));
}

#[tokio::test]
async fn macos_icon_produces_app_bundle() {
    let project = Project::new();
    let python = project.python(FakePython::default());
    let icon = project.root.path().join("tools/app.icns");
    fs::write(&icon, b"icns-bytes").unwrap();
    let settings = builder(&project, &python, Platform::MacOs)
        .icon(&icon)
        .build()
        .unwrap();

    let report = Bundler::new(settings).bundle().await.unwrap();

    let app = project.output_dir().join("demo.app");
    assert_eq!(report.platform_artifact.as_deref(), Some(app.as_path()));
    let info: InfoPlist = plist::from_file(app.join("Contents/Info.plist")).unwrap();
    assert_eq!(info.bundle_name, "demo");
    assert_eq!(info.executable, "demo");
    assert_eq!(info.icon_file, APP_ICON_FILE);
    assert_eq!(
        fs::read(app.join("Contents/Resources").join(APP_ICON_FILE)).unwrap(),
        b"icns-bytes"
    );
    let exe = app.join("Contents/MacOS/demo");
    assert_eq!(
        fs::read(&exe).unwrap(),
        fs::read(project.output_dir().join("demo.sh")).unwrap()
    );
    assert_eq!(mode(&exe), 0o755);
}

#[tokio::test]
async fn mismatched_icon_is_skipped_not_fatal() {
    let project = Project::new();
    let python = project.python(FakePython::default());
    let icon = project.root.path().join("tools/app.ico");
    fs::write(&icon, b"ico-bytes").unwrap();
    let settings = builder(&project, &python, Platform::MacOs)
        .icon(&icon)
        .build()
        .unwrap();

    let report = Bundler::new(settings).bundle().await.unwrap();

    assert!(report.platform_artifact.is_none());
    assert!(!project.output_dir().join("demo.app").exists());
    assert!(project.output_dir().join("demo.sh").is_file());
}

#[tokio::test]
async fn empty_manifest_skips_installation() {
    let project = Project::new();
    let python = project.python(FakePython::default().requirements("").install_fails());
    let settings = builder(&project, &python, Platform::Linux).build().unwrap();

    let report = Bundler::new(settings).bundle().await.unwrap();

    assert!(report.dependencies.is_empty());
    let lib = project.output_dir().join("lib");
    assert!(lib.is_dir());
    assert_eq!(fs::read_dir(lib).unwrap().count(), 0);
}

#[tokio::test]
async fn scan_failure_keeps_previous_output() {
    let project = Project::new();
    let good = project.python(FakePython::default());
    let settings = builder(&project, &good, Platform::Linux).build().unwrap();
    Bundler::new(settings).bundle().await.unwrap();
    let before = fs::read(project.output_dir().join("demo.sh")).unwrap();

    let bad = project.python(FakePython::default().scan(Scan::Fail));
    let settings = builder(&project, &bad, Platform::Linux).build().unwrap();
    let err = Bundler::new(settings).bundle().await.unwrap_err();

    match &err {
        Error::DependencyScan { stderr, .. } => assert!(stderr.contains("failed to parse")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.exit_code(), 1);
    assert_eq!(fs::read(project.output_dir().join("demo.sh")).unwrap(), before);
    assert!(project.staging_leftovers().is_empty());
}

#[tokio::test]
async fn missing_manifest_is_reported() {
    let project = Project::new();
    let python = project.python(FakePython::default().scan(Scan::Skip));
    let settings = builder(&project, &python, Platform::Linux).build().unwrap();

    let err = Bundler::new(settings).bundle().await.unwrap_err();

    assert!(matches!(err, Error::ManifestNotFound(ref p) if p.ends_with("requirements.txt")));
    assert_eq!(err.exit_code(), 1);
    assert!(!project.output_dir().exists());
    assert!(project.staging_leftovers().is_empty());
}

#[tokio::test]
async fn install_failure_is_reported() {
    let project = Project::new();
    let python = project.python(FakePython::default().install_fails());
    let settings = builder(&project, &python, Platform::Linux).build().unwrap();

    let err = Bundler::new(settings).bundle().await.unwrap_err();

    match &err {
        Error::DependencyInstall { stderr, .. } => {
            assert!(stderr.contains("No matching distribution"))
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.exit_code(), 3);
    assert!(!project.output_dir().exists());
}

#[tokio::test]
async fn rerun_is_idempotent_and_replaces_stale_files() {
    let project = Project::new();
    let python = project.python(FakePython::default());

    let settings = builder(&project, &python, Platform::Linux).build().unwrap();
    let first = Bundler::new(settings).bundle().await.unwrap();
    fs::write(project.output_dir().join("stale.txt"), b"old").unwrap();

    let settings = builder(&project, &python, Platform::Linux).build().unwrap();
    let second = Bundler::new(settings).bundle().await.unwrap();

    assert_eq!(first.layout_sha256, second.layout_sha256);
    assert!(!project.output_dir().join("stale.txt").exists());
    assert_eq!(mode(&project.output_dir()), 0o755);
}

#[tokio::test]
async fn unrelated_output_directory_is_never_replaced() {
    let project = Project::new();
    let python = project.python(FakePython::default());
    let documents = project.root.path().join("Documents");
    fs::create_dir_all(&documents).unwrap();
    fs::write(documents.join("thesis.docx"), b"chapter one").unwrap();

    let settings = builder(&project, &python, Platform::Linux)
        .output_dir(&documents)
        .build()
        .unwrap();
    let err = Bundler::new(settings).bundle().await.unwrap_err();

    assert!(matches!(err, Error::InvalidSettings(_)), "{err:?}");
    assert_eq!(err.exit_code(), 2);
    assert_eq!(fs::read(documents.join("thesis.docx")).unwrap(), b"chapter one");
    assert_eq!(fs::read_dir(&documents).unwrap().count(), 1);
    let siblings: Vec<_> = fs::read_dir(project.root.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with('.'))
        .collect();
    assert!(siblings.is_empty(), "{siblings:?}");
}

#[tokio::test]
async fn existing_empty_output_directory_is_used() {
    let project = Project::new();
    let python = project.python(FakePython::default());
    fs::create_dir_all(project.output_dir()).unwrap();
    let settings = builder(&project, &python, Platform::Linux).build().unwrap();

    Bundler::new(settings).bundle().await.unwrap();

    assert!(project.output_dir().join("demo.sh").is_file());
}

#[tokio::test]
async fn unused_missing_icon_does_not_fail_the_run() {
    let project = Project::new();
    let python = project.python(FakePython::default());
    let icon = project.root.path().join("tools/icon.png");
    let settings = builder(&project, &python, Platform::Linux)
        .icon(&icon)
        .build()
        .unwrap();

    let report = Bundler::new(settings).bundle().await.unwrap();

    assert!(report.platform_artifact.is_none());
    assert!(project.output_dir().join("demo.sh").is_file());
}

#[tokio::test]
async fn dependency_scan_skips_previous_package() {
    let project = Project::new();
    let python = project.python(FakePython::default());
    let settings = builder(&project, &python, Platform::Linux).build().unwrap();
    Bundler::new(settings).bundle().await.unwrap();
    let settings = builder(&project, &python, Platform::Linux).build().unwrap();
    Bundler::new(settings).bundle().await.unwrap();

    let args = project.scan_args();
    let flag = args.iter().position(|a| a == "--ignore").expect("--ignore passed");
    let ignored: Vec<&str> = args[flag + 1].split(',').collect();
    assert!(ignored.contains(&project.output_dir().to_str().unwrap()), "{ignored:?}");
    assert!(ignored.iter().any(|d| d.contains(".demo-staging-")), "{ignored:?}");
    assert_eq!(args.last().map(String::as_str), project.dir().to_str());
}

#[test]
fn missing_interpreter_is_a_tooling_error() {
    let project = Project::new();
    let err = builder(&project, &project.dir().join("no-such-python"), Platform::Linux)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::InterpreterNotFound(_)));
    assert_eq!(err.exit_code(), 6);
}
