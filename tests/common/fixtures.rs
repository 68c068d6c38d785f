//! Reusable fixtures.

use std::fs;
use std::path::Path;
use std::process::Command;

use shipyard::Release;
use tempfile::TempDir;

pub fn release(name: &str) -> Release {
    Release::new(name, None)
}

/// Pack `files` (relative path, content) into a `.tar.gz` the way a build would.
pub fn tar_gz(files: &[(&str, &str)]) -> Vec<u8> {
    let staging = TempDir::new().unwrap();
    let content = staging.path().join("content");
    for (path, body) in files {
        let path = content.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }
    fs::create_dir_all(&content).unwrap();

    let archive = staging.path().join("release.tar.gz");
    let status = Command::new("tar")
        .arg("-czf")
        .arg(&archive)
        .arg("-C")
        .arg(&content)
        .arg(".")
        .status()
        .unwrap();
    assert!(status.success(), "tar failed");
    fs::read(archive).unwrap()
}

/// Initialise a git repository at `dir` with one commit tagged `tag`.
///
/// Returns false when git is not installed.
pub fn git_repository(dir: &Path, files: &[(&str, &str)], tag: &str) -> bool {
    let available = Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false);
    if !available {
        return false;
    }

    fs::create_dir_all(dir).unwrap();
    for (path, body) in files {
        fs::write(dir.join(path), body).unwrap();
    }

    let git = |args: &[&str]| {
        let status = Command::new("git")
            .args(["-c", "user.name=Shipyard", "-c", "user.email=ci@shipyard.test"])
            .arg("-C")
            .arg(dir)
            .args(args)
            .output()
            .unwrap()
            .status;
        assert!(status.success(), "git {:?} failed", args);
    };
    git(&["init", "-q"]);
    git(&["add", "."]);
    git(&["commit", "-q", "-m", "initial"]);
    git(&["tag", tag]);
    true
}
