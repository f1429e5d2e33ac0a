use std::{fs, io, path::Path};

/// Create a directory and all of its missing parents.
///
/// Succeeds when the directory already exists.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Write `content` to `path`, creating parent directories first.
///
/// An existing file is truncated.
pub fn write_file(path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_write_file_creates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.go");

        write_file(&path, b"package entity").unwrap();

        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "package entity");
    }

    #[test]
    fn test_write_file_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("c").join("test.go");

        write_file(&path, b"nested").unwrap();

        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "nested");
    }

    #[test]
    fn test_write_file_truncates_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.go");

        write_file(&path, b"a much longer first version").unwrap();
        write_file(&path, b"second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("user");

        ensure_dir(&path).unwrap();
        ensure_dir(&path).unwrap();

        assert!(path.is_dir());
    }
}
