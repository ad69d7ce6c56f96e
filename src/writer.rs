use crate::error::{Error, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

//===========================================================================//

/// Writes `data` to `path` so that readers only ever see the old contents or
/// the complete new ones.  The bytes go to a temporary file in the same
/// directory, which is renamed over `path` once fully written; on failure the
/// temporary file is removed and `path` is left untouched.  If `create_dirs`
/// is set, missing parent directories are created first.
pub fn write_atomic(
    path: &Path,
    data: &[u8],
    create_dirs: bool,
) -> Result<()> {
    let write_error =
        |source: io::Error| Error::Write { path: path.to_path_buf(), source };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if create_dirs && !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "creating output directory");
        fs::create_dir_all(dir).map_err(write_error)?;
    }
    let mut tmp = tempfile::Builder::new()
        .prefix(".icoforge")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(write_error)?;
    tmp.write_all(data).map_err(write_error)?;
    tmp.as_file().sync_all().map_err(write_error)?;
    // Dropping a NamedTempFile deletes it, so every early return above
    // discards the partial file.
    tmp.persist(path).map_err(|error| write_error(error.error))?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "wrote file");
    Ok(())
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::write_atomic;
    use crate::error::Error;
    use std::fs;

    #[test]
    fn writes_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.ico");
        write_atomic(&path, b"first", false).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"first");
        write_atomic(&path, b"second", false).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
        // Nothing but the destination is left behind.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn creates_missing_parents_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("app.ico");
        write_atomic(&path, b"icon", true).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"icon");
    }

    #[test]
    fn missing_parent_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("app.ico");
        match write_atomic(&path, b"icon", false) {
            Err(Error::Write { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("Expected Write error, got {:?}", other),
        }
        assert!(!path.exists());
    }

    #[test]
    fn parent_that_is_a_file_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();
        let path = blocker.join("app.ico");
        assert!(matches!(
            write_atomic(&path, b"icon", true),
            Err(Error::Write { .. })
        ));
        assert_eq!(fs::read(&blocker).unwrap(), b"not a directory");
    }

    #[test]
    fn failed_write_keeps_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        // A directory can't be replaced by a file rename.
        let path = dir.path().join("taken");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("inside"), b"keep").unwrap();
        assert!(write_atomic(&path, b"icon", false).is_err());
        assert_eq!(fs::read(path.join("inside")).unwrap(), b"keep");
        // The temporary file was cleaned up.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}

//===========================================================================//
