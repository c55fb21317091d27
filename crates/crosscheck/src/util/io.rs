//! File writes for scenario output

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Write `content` to `path`, failing with `AlreadyExists` if it is taken.
///
/// The content is staged in a temporary file beside `path` and moved into
/// place with a no-clobber rename, so `path` ends up either complete or absent.
pub fn write_new_file(path: &Path, content: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(content.as_bytes())?;
    staged.as_file().sync_all()?;
    staged.persist_noclobber(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_write_new_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scenario.yaml");

        write_new_file(&path, "name: baseline\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "name: baseline\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_existing_file_is_kept() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scenario.yaml");
        fs::write(&path, "keep").unwrap();

        let err = write_new_file(&path, "replace").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
