//! JSON output for physics documents
//!
//! Documents are written to any [`Write`] sink, or to a path atomically: the
//! bytes go to a temporary file next to the destination which replaces it
//! only once serialization and flushing succeeded.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::document::Document;
use crate::error::{ExportError, ExportResult};

/// JSON write options
#[derive(Debug, Clone)]
pub struct JsonWriteOptions {
    /// Use pretty-print formatting
    pub pretty: bool,
}

impl Default for JsonWriteOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Writes documents as JSON
#[derive(Debug, Clone, Default)]
pub struct DocumentWriter {
    options: JsonWriteOptions,
}

impl DocumentWriter {
    /// Create new writer with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create writer with custom options
    pub fn with_options(options: JsonWriteOptions) -> Self {
        Self { options }
    }

    /// Serialize `document` into `writer`
    pub fn write(&self, document: &Document, writer: impl Write) -> ExportResult<()> {
        self.write_value(document, writer)
    }

    /// Serialize `document` to a string
    pub fn to_string(&self, document: &Document) -> ExportResult<String> {
        let text = if self.options.pretty {
            serde_json::to_string_pretty(document)?
        } else {
            serde_json::to_string(document)?
        };
        Ok(text)
    }

    /// Write `document` to `path`, replacing any existing file only on success
    pub fn write_to_path(&self, document: &Document, path: impl AsRef<Path>) -> ExportResult<()> {
        self.write_value_to_path(document, path.as_ref())
    }

    fn write_value<T: Serialize + ?Sized>(&self, value: &T, writer: impl Write) -> ExportResult<()> {
        let mut writer = BufWriter::new(writer);

        if self.options.pretty {
            serde_json::to_writer_pretty(&mut writer, value)?;
        } else {
            serde_json::to_writer(&mut writer, value)?;
        }

        writer.flush()?;
        Ok(())
    }

    fn write_value_to_path<T: Serialize + ?Sized>(&self, value: &T, path: &Path) -> ExportResult<()> {
        if path.file_name().is_none() {
            return Err(ExportError::InvalidOutputPath(path.to_path_buf()));
        }
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        // Dropping the temp file on any early return removes it
        let mut temp = NamedTempFile::new_in(dir)?;
        self.write_value(value, temp.as_file_mut())?;
        temp.as_file().sync_all()?;

        temp.persist(path).map_err(|err| ExportError::Persist {
            path: path.to_path_buf(),
            source: err.error,
        })?;

        tracing::debug!(path = %path.display(), "Wrote physics document");
        Ok(())
    }
}
