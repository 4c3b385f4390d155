//! Rotating record writer.
//!
//! [`CsvWriter`] appends pre-serialized lines to its current output part and
//! moves on to a new part when the next line would exceed the configured
//! line count or byte size. On the first rotation the original file is
//! copied to its `_<1>` name, so the emitted path list reads as a uniform
//! series of parts; the unsuffixed original stays on disk.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::charset::Charset;
use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::record::Record;
use crate::report::{Condition, Reporter, TracingReporter};
use crate::rotation::RotationState;

/// Writes lines to a series of size- and line-limited files.
pub struct CsvWriter {
    file: Option<BufWriter<File>>,
    charset: Charset,
    config: CodecConfig,
    state: RotationState,
    reporter: Box<dyn Reporter>,
}

impl CsvWriter {
    /// Open `path` as the first part, in `charset` (default `windows-31j`).
    ///
    /// With `append` the existing contents are kept; the limits still count
    /// only what this writer adds.
    pub fn create(
        path: impl AsRef<Path>,
        charset: Option<&str>,
        append: bool,
        config: &CodecConfig,
    ) -> Result<Self> {
        Self::create_with_reporter(path, charset, append, config, Box::new(TracingReporter))
    }

    pub fn create_with_reporter(
        path: impl AsRef<Path>,
        charset: Option<&str>,
        append: bool,
        config: &CodecConfig,
        reporter: Box<dyn Reporter>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let charset = Charset::resolve(charset).map_err(|e| reporter.surface(e))?;
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)
            .map_err(|e| reporter.surface(CodecError::io(path, e)))?;
        tracing::debug!(path = %path.display(), charset = charset.name(), append, "opened writer");
        Ok(Self {
            file: Some(BufWriter::new(file)),
            charset,
            config: config.clone(),
            state: RotationState::new(path),
            reporter,
        })
    }

    /// Whether writing `text` next would start a new part.
    pub fn is_write_next_file(&self, text: &str) -> bool {
        self.state
            .would_exceed(self.charset.encoded_len(text) as u64, &self.config)
    }

    /// Write `text` verbatim, rotating first if it would not fit.
    ///
    /// `text` should carry its own line terminator.
    pub fn write_line(&mut self, text: &str) -> Result<()> {
        let bytes = self.charset.encode(text);
        let len = bytes.len() as u64;

        if self.state.would_exceed(len, &self.config) {
            self.rotate()?;
        }

        match self.file.as_mut() {
            Some(file) => {
                if let Err(e) = file.write_all(&bytes) {
                    let err = CodecError::io(self.state.current_path(), e);
                    return Err(self.reporter.surface(err));
                }
            }
            None => self.reporter.report(Condition::IoFailure {
                path: self.state.current_path().to_path_buf(),
                message: "no open output part, line dropped".to_string(),
            }),
        }
        self.state.record_write(len);
        Ok(())
    }

    /// Serialize `record`, add the configured line separator, and write it.
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        let mut line = record.to_line();
        line.push_str(self.config.line_separator());
        self.write_line(&line)
    }

    /// Every path this writer has produced, in order.
    ///
    /// After a rotation the first entry is the renamed copy of the original.
    pub fn output_paths(&self) -> &[PathBuf] {
        self.state.parts()
    }

    pub fn current_path(&self) -> &Path {
        self.state.current_path()
    }

    pub fn state(&self) -> &RotationState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Flush and release the current part. Calling it again does nothing.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            if let Err(e) = file.flush() {
                let err = CodecError::io(self.state.current_path(), e);
                return Err(self.reporter.surface(err));
            }
            tracing::debug!(path = %self.state.current_path().display(), "closed part");
        }
        Ok(())
    }

    /// Close the current part and open the next one.
    ///
    /// Nothing in the rotation state changes unless the new part opens, so
    /// a failed rotation is retried by the next write. The first-part copy
    /// is redone on that retry.
    fn rotate(&mut self) -> Result<()> {
        self.close()?;

        let next = self.state.part_index() + 1;
        let padding = self.config.padding_format().clone();

        let mut renamed_first = None;
        if next == 2 {
            let first = self.state.part_path(1, &padding);
            if first.exists() {
                self.reporter
                    .report(Condition::DuplicateOutputPath { path: first.clone() });
            }
            if let Err(e) = fs::copy(self.state.original(), &first) {
                return Err(self.reporter.surface(CodecError::io(&first, e)));
            }
            renamed_first = Some(first);
        }

        if padding.overflows(next) {
            self.reporter.report(Condition::PaddingOverflow {
                part_index: next,
                pattern: padding.pattern().to_string(),
            });
        }

        let path = self.state.part_path(next, &padding);
        if path.exists() {
            self.reporter
                .report(Condition::DuplicateOutputPath { path: path.clone() });
        }
        let file = File::create(&path).map_err(|e| self.reporter.surface(CodecError::io(&path, e)))?;
        tracing::info!(part = next, path = %path.display(), "rotated to next part");

        self.file = Some(BufWriter::new(file));
        if let Some(first) = renamed_first {
            self.state.rename_first(first);
        }
        self.state.start_part(next, path);
        Ok(())
    }
}
