//! File-backed record reader.
//!
//! A [`CsvReader`] owns one input handle from construction until
//! [`CsvReader::close`] (or drop). It offers the raw line, delimited and
//! fixed-width read paths over the same stream.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::charset::Charset;
use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::fixed_width::FixedWidthDecoder;
use crate::line_source::{DecodedLines, LineSource};
use crate::normalize::normalize_special;
use crate::record::Record;
use crate::report::{Condition, Reporter, TracingReporter};
use crate::tokenizer;

/// Reads delimited or fixed-width records from a byte stream.
pub struct CsvReader<R = File> {
    lines: Option<DecodedLines<BufReader<R>>>,
    charset: Charset,
    path: Option<PathBuf>,
    config: CodecConfig,
    reporter: Box<dyn Reporter>,
}

impl CsvReader<File> {
    /// Open `path` for reading in `charset` (default `windows-31j`).
    ///
    /// Failures are reported to a [`TracingReporter`]; use
    /// [`CsvReader::open_with_reporter`] to route them elsewhere.
    pub fn open(path: impl AsRef<Path>, charset: Option<&str>, config: &CodecConfig) -> Result<Self> {
        Self::open_with_reporter(path, charset, config, Box::new(TracingReporter))
    }

    pub fn open_with_reporter(
        path: impl AsRef<Path>,
        charset: Option<&str>,
        config: &CodecConfig,
        reporter: Box<dyn Reporter>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let charset = Charset::resolve(charset).map_err(|e| reporter.surface(e))?;
        let file = File::open(path).map_err(|e| reporter.surface(CodecError::io(path, e)))?;
        tracing::debug!(path = %path.display(), charset = charset.name(), "opened reader");
        let mut reader = Self::build(file, charset, path.to_path_buf(), config, reporter);
        reader.path = Some(path.to_path_buf());
        Ok(reader)
    }
}

impl<R: Read> CsvReader<R> {
    /// Wrap an already-open stream.
    pub fn from_reader(
        inner: R,
        charset: Option<&str>,
        config: &CodecConfig,
        reporter: Box<dyn Reporter>,
    ) -> Result<Self> {
        let charset = Charset::resolve(charset).map_err(|e| reporter.surface(e))?;
        Ok(Self::build(inner, charset, PathBuf::from("<stream>"), config, reporter))
    }

    fn build(
        inner: R,
        charset: Charset,
        origin: PathBuf,
        config: &CodecConfig,
        reporter: Box<dyn Reporter>,
    ) -> Self {
        Self {
            lines: Some(DecodedLines::new(BufReader::new(inner), charset, origin)),
            charset,
            path: None,
            config: config.clone(),
            reporter,
        }
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn is_open(&self) -> bool {
        self.lines.is_some()
    }

    /// Next physical line with numeric references folded to `?`.
    ///
    /// Returns `None` at end of input or once the reader is closed.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let Some(lines) = self.lines.as_mut() else {
            return Ok(None);
        };
        match lines.next_line() {
            Ok(line) => Ok(line.map(|l| normalize_special(&l).into_owned())),
            Err(e) => Err(self.reporter.surface(e)),
        }
    }

    /// Next logical delimited record.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        let Some(lines) = self.lines.as_mut() else {
            return Ok(None);
        };
        tokenizer::read_record(lines).map_err(|e| self.reporter.surface(e))
    }

    /// Next fixed-width record, cut with the configured width unit.
    pub fn read_fixed_record(&mut self, widths: &[usize]) -> Result<Option<Record>> {
        let decoder = self.fixed_decoder(widths);
        let Some(lines) = self.lines.as_mut() else {
            return Ok(None);
        };
        decoder
            .read_record(lines)
            .map_err(|e| self.reporter.surface(e))
    }

    /// Every remaining delimited record.
    pub fn read_all(&mut self) -> Result<Vec<Record>> {
        let mut all = Vec::new();
        while let Some(record) = self.read_record()? {
            all.push(record);
        }
        Ok(all)
    }

    /// Every remaining fixed-width record.
    ///
    /// Lines that do not fit the layout are reported and skipped; I/O errors
    /// stop the loop.
    pub fn read_all_fixed(&mut self, widths: &[usize]) -> Result<Vec<Record>> {
        let mut all = Vec::new();
        loop {
            match self.read_fixed_record(widths) {
                Ok(Some(record)) => all.push(record),
                Ok(None) => break,
                Err(CodecError::Range { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(all)
    }

    /// Whether the input file is strictly smaller than `max_file_size`.
    ///
    /// Always false for stream-backed readers, which have no path.
    pub fn is_correct_file_size(&self) -> bool {
        let Some(path) = self.path.as_ref() else {
            return false;
        };
        match fs::metadata(path) {
            Ok(meta) => self.config.max_file_size() > meta.len(),
            Err(e) => {
                self.reporter.report(Condition::from(&CodecError::io(path, e)));
                false
            }
        }
    }

    /// Whether the remaining records number at most `max_line_count`.
    ///
    /// Consumes the rest of the input.
    pub fn is_correct_line_count(&mut self) -> Result<bool> {
        if self.lines.is_none() {
            return Ok(false);
        }
        let count = self.read_all()?.len() as u64;
        Ok(self.config.max_line_count() >= count)
    }

    /// Release the input handle. Calling it again does nothing.
    pub fn close(&mut self) {
        if self.lines.take().is_some() {
            tracing::debug!(path = ?self.path, "closed reader");
        }
    }

    fn fixed_decoder(&self, widths: &[usize]) -> FixedWidthDecoder {
        FixedWidthDecoder::new(widths.to_vec(), self.config.width_unit(), self.charset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidthUnit;
    use crate::report::MemoryReporter;
    use std::io::Cursor;

    fn reader(text: &str, config: &CodecConfig) -> (CsvReader<Cursor<Vec<u8>>>, MemoryReporter) {
        let reporter = MemoryReporter::new();
        let r = CsvReader::from_reader(
            Cursor::new(text.as_bytes().to_vec()),
            Some("UTF-8"),
            config,
            Box::new(reporter.clone()),
        )
        .unwrap();
        (r, reporter)
    }

    #[test]
    fn test_read_line_normalizes() {
        let (mut r, _) = reader("a&#12;b\nc\n", &CodecConfig::default());
        assert_eq!(r.read_line().unwrap().as_deref(), Some("a?b"));
        assert_eq!(r.read_line().unwrap().as_deref(), Some("c"));
        assert_eq!(r.read_line().unwrap(), None);
    }

    #[test]
    fn test_read_all_multiline() {
        let (mut r, _) = reader("id,note\n1,\"two\nlines\"\n2,x\n", &CodecConfig::default());
        let all = r.read_all().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].fields(), ["1", "two\nlines"]);
    }

    #[test]
    fn test_read_all_fixed_skips_short_lines() {
        let (mut r, reporter) = reader("AABBB\nCC\nDDEEE\n", &CodecConfig::default());
        let all = r.read_all_fixed(&[2, 3]).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].fields(), ["DD", "EEE"]);
        let conditions = reporter.conditions();
        assert_eq!(conditions.len(), 1);
        assert!(matches!(conditions[0], Condition::RangeFailure { .. }));
    }

    #[test]
    fn test_fixed_uses_configured_unit() {
        let config = CodecConfig::default().with_width_unit(WidthUnit::Byte);
        // "é" is two bytes in UTF-8.
        let (mut r, _) = reader("éa\n", &config);
        let record = r.read_fixed_record(&[2, 1]).unwrap().unwrap();
        assert_eq!(record.fields(), ["é", "a"]);
    }

    #[test]
    fn test_close_twice() {
        let (mut r, _) = reader("a\n", &CodecConfig::default());
        r.close();
        r.close();
        assert!(!r.is_open());
        assert_eq!(r.read_record().unwrap(), None);
    }

    #[test]
    fn test_line_count_limit() {
        let config = CodecConfig::default().with_max_line_count(2);
        let (mut r, _) = reader("a\nb\n", &config);
        assert!(r.is_correct_line_count().unwrap());
        let (mut r, _) = reader("a\nb\nc\n", &config);
        assert!(!r.is_correct_line_count().unwrap());
    }

    #[test]
    fn test_stream_has_no_file_size() {
        let (r, _) = reader("a\n", &CodecConfig::default());
        assert!(!r.is_correct_file_size());
    }

    #[test]
    fn test_unsupported_charset_reported() {
        let reporter = MemoryReporter::new();
        let result = CsvReader::from_reader(
            Cursor::new(Vec::new()),
            Some("no-such-charset"),
            &CodecConfig::default(),
            Box::new(reporter.clone()),
        );
        assert!(matches!(result, Err(CodecError::Encoding { .. })));
        assert_eq!(
            reporter.conditions(),
            vec![Condition::UnsupportedEncoding {
                label: "no-such-charset".to_string()
            }]
        );
    }
}
