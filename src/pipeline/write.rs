//! Atomic artifact persistence.
//!
//! Bytes go to a [`tempfile::NamedTempFile`] in the destination directory and
//! are renamed into place, so a reader never sees a half-written PDF. A file
//! that already exists under the target name is replaced.

use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// Write `bytes` to `dest`, creating or replacing it atomically.
///
/// The parent directory must exist.
pub fn write_atomic(dest: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".partial-")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|e| e.error)?;

    debug!("Wrote {} bytes to {}", bytes.len(), dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.pdf");
        write_atomic(&dest, b"%PDF-1.7 first").unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"%PDF-1.7 first");
    }

    #[test]
    fn replaces_existing_file_and_leaves_no_temporaries() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.pdf");
        write_atomic(&dest, b"old contents that are longer").unwrap();
        write_atomic(&dest, b"new").unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("out.pdf")]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nope").join("out.pdf");
        assert!(write_atomic(&dest, b"x").is_err());
        assert!(!dest.exists());
    }
}
