//! Per-session isolated working directories.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{info, warn};

use crate::error::AppError;

/// An exclusively-owned scratch directory for one session. The directory
/// is removed on `release` and unconditionally from `Drop`, so teardown
/// runs on every exit path.
#[derive(Debug)]
pub struct Workspace {
    dir: PathBuf,
    released: bool,
}

impl Workspace {
    /// Create a fresh directory under `root` keyed by the session id.
    /// Fails if the directory already exists: workspaces are never shared
    /// or reused.
    pub fn create(root: &Path, session_id: &str) -> std::io::Result<Self> {
        fs::create_dir_all(root)?;
        let dir = root.join(format!("analyst-{session_id}"));
        fs::create_dir(&dir)?;
        Ok(Self {
            dir,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Persist one artifact into the workspace. Same-name writes
    /// overwrite. Names that would resolve outside the workspace are
    /// rejected.
    pub fn write_artifact(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, AppError> {
        if !is_safe_name(name) {
            return Err(AppError::InvalidArtifactName(name.to_string()));
        }
        let path = self.dir.join(name);
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Recursively delete the directory. Idempotent.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => info!("released workspace {}", self.dir.display()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!("failed to remove workspace {}: {}", self.dir.display(), err),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.release();
    }
}

/// A name is safe when it is exactly one normal path component: no
/// separators, no `..`, no absolute prefix.
fn is_safe_name(name: &str) -> bool {
    if name.is_empty() || name.contains('\\') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_write_release() {
        let root = tempfile::tempdir().unwrap();
        let mut ws = Workspace::create(root.path(), "s1").unwrap();
        let path = ws.write_artifact("data.csv", b"a,b\n1,2\n").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"a,b\n1,2\n");
        let dir = ws.path().to_path_buf();
        ws.release();
        assert!(!dir.exists());
        // second release is a no-op
        ws.release();
    }

    #[test]
    fn drop_removes_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = {
            let ws = Workspace::create(root.path(), "s2").unwrap();
            ws.write_artifact("questions.txt", b"how many rows?").unwrap();
            ws.path().to_path_buf()
        };
        assert!(!dir.exists());
    }

    #[test]
    fn drop_runs_on_early_return() {
        fn fallible(root: &Path) -> Result<(), AppError> {
            let ws = Workspace::create(root, "s3").map_err(AppError::from)?;
            ws.write_artifact("../escape", b"nope")?;
            unreachable!("write above must fail");
        }
        let root = tempfile::tempdir().unwrap();
        assert!(fallible(root.path()).is_err());
        assert!(!root.path().join("analyst-s3").exists());
    }

    #[test]
    fn rejects_traversal_names() {
        let root = tempfile::tempdir().unwrap();
        let ws = Workspace::create(root.path(), "s4").unwrap();
        for name in ["../evil", "a/b.csv", "/etc/passwd", "..", "", "a\\b"] {
            assert!(
                matches!(
                    ws.write_artifact(name, b"x"),
                    Err(AppError::InvalidArtifactName(_))
                ),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn same_id_cannot_be_acquired_twice() {
        let root = tempfile::tempdir().unwrap();
        let _ws = Workspace::create(root.path(), "s5").unwrap();
        assert!(Workspace::create(root.path(), "s5").is_err());
    }

    #[test]
    fn colliding_artifact_names_across_sessions_do_not_interfere() {
        let root = tempfile::tempdir().unwrap();
        let a = Workspace::create(root.path(), "a").unwrap();
        let b = Workspace::create(root.path(), "b").unwrap();
        let pa = a.write_artifact("data.csv", b"from-a").unwrap();
        let pb = b.write_artifact("data.csv", b"from-b").unwrap();
        assert_ne!(pa, pb);
        assert_eq!(fs::read(&pa).unwrap(), b"from-a");
        assert_eq!(fs::read(&pb).unwrap(), b"from-b");
    }
}
