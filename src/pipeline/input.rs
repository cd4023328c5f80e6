//! Source resolution: open the CSV file or fail before any row is read.
//!
//! A missing file is a distinct, caller-visible condition
//! ([`ReportError::DataSourceMissing`]) that the HTTP layer answers with 404.
//! Every other failure to open (permission denied, path is a directory, …)
//! is a read failure and is wrapped with its cause.

use crate::error::ReportError;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Open the sales data source for reading.
pub fn open_source(path: &Path) -> Result<File, ReportError> {
    if !path.exists() {
        return Err(ReportError::DataSourceMissing {
            path: path.to_path_buf(),
        });
    }

    match File::open(path) {
        Ok(file) => {
            debug!("Opened sales data source: {}", path.display());
            Ok(file)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Err(ReportError::DataSourceMissing {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(ReportError::SourceRead {
            path: path.to_path_buf(),
            source: csv::Error::from(e),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_data_source_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ventas.csv");
        match open_source(&path) {
            Err(ReportError::DataSourceMissing { path: p }) => assert_eq!(p, path),
            other => panic!("expected DataSourceMissing, got {other:?}"),
        }
    }

    #[test]
    fn existing_file_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ventas.csv");
        std::fs::write(&path, "Product,Quantity,Price\n").unwrap();
        assert!(open_source(&path).is_ok());
    }
}
