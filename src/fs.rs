use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable overriding the scratch root.
pub const TEST_TMPDIR_ENV: &str = "TEST_TMPDIR";

/// The slice of filesystem behavior the harness depends on.
pub trait FileSystem {
    /// A writable directory for scratch files, created if missing.
    fn test_directory(&self) -> io::Result<PathBuf>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// Scratch root for a given `$TEST_TMPDIR` value. Unset or empty means
/// `<system temp dir>/sst-harness`.
pub fn scratch_root(test_tmpdir: Option<OsString>) -> PathBuf {
    match test_tmpdir {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => env::temp_dir().join("sst-harness"),
    }
}

/// Local disk.
///
/// The scratch root is `$TEST_TMPDIR` when set, otherwise
/// `<system temp dir>/sst-harness`.
#[derive(Debug, Clone, Default)]
pub struct DefaultFileSystem {
    root: Option<PathBuf>,
}

impl DefaultFileSystem {
    /// Pin the scratch root instead of consulting the environment.
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        DefaultFileSystem {
            root: Some(root.into()),
        }
    }
}

impl FileSystem for DefaultFileSystem {
    fn test_directory(&self) -> io::Result<PathBuf> {
        let dir = match &self.root {
            Some(root) => root.clone(),
            None => scratch_root(env::var_os(TEST_TMPDIR_ENV)),
        };
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn rooted_directory_is_created() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("scratch");
        let fs = DefaultFileSystem::rooted(&root);
        assert_eq!(fs.test_directory().unwrap(), root);
        assert!(root.is_dir());
    }

    #[test]
    fn test_tmpdir_overrides_root() {
        assert_eq!(
            scratch_root(Some(OsString::from("/scratch/fuzz"))),
            PathBuf::from("/scratch/fuzz")
        );
    }

    #[test]
    fn unset_or_empty_test_tmpdir_uses_system_temp() {
        let fallback = env::temp_dir().join("sst-harness");
        assert_eq!(scratch_root(None), fallback);
        assert_eq!(scratch_root(Some(OsString::new())), fallback);
    }

    #[test]
    fn remove_missing_file_reports_not_found() {
        let dir = tempdir().unwrap();
        let fs = DefaultFileSystem::rooted(dir.path());
        let err = fs.remove_file(&dir.path().join("absent")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
