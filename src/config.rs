//! Codec configuration.
//!
//! A [`CodecConfig`] is built once, usually from a properties file, and then
//! handed to every reader and writer that needs it.
//!
//! ```
//! use csvparts_rs::{CodecConfig, WidthUnit};
//!
//! let config = CodecConfig::from_properties(
//!     "maxLine=500\nmaxFileSize=4096\npaddingFormat=000\nseparateFlg=BYTE\n",
//! )?;
//! assert_eq!(config.max_line_count(), 500);
//! assert_eq!(config.width_unit(), WidthUnit::Byte);
//! assert_eq!(config.padding_format().format(7), "007");
//! # Ok::<(), csvparts_rs::CodecError>(())
//! ```

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{CodecError, Result};

/// Default maximum number of lines per output part.
pub const DEFAULT_MAX_LINE_COUNT: u64 = 1_000_000;

/// Default maximum size of an output part (100 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Default part index padding pattern.
pub const DEFAULT_PADDING_FORMAT: &str = "00";

/// How fixed-width column widths are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidthUnit {
    /// Widths count characters of the decoded line.
    #[default]
    Character,
    /// Widths count bytes of the line encoded in the reader's charset.
    Byte,
}

impl FromStr for WidthUnit {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BYTE" => Ok(WidthUnit::Byte),
            "CHAR" | "CHARACTER" => Ok(WidthUnit::Character),
            other => Err(CodecError::config(
                "separateFlg",
                format!("expected BYTE or CHAR, got {other:?}"),
            )),
        }
    }
}

/// Zero-padding pattern for part indices, in the `DecimalFormat` style.
///
/// The pattern may only contain `0` and `#`. Each `0` is a mandatory digit,
/// so `"000"` renders part 7 as `007` and `"#0"` renders it as `7`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddingFormat {
    pattern: String,
    min_digits: usize,
}

impl PaddingFormat {
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(CodecError::config("paddingFormat", "pattern is empty"));
        }
        if let Some(bad) = pattern.chars().find(|c| *c != '0' && *c != '#') {
            return Err(CodecError::config(
                "paddingFormat",
                format!("unexpected character {bad:?} in {pattern:?}"),
            ));
        }
        Ok(Self {
            pattern: pattern.to_string(),
            min_digits: pattern.chars().filter(|c| *c == '0').count(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Render `index`, left-padded with zeros to the mandatory digit count.
    pub fn format(&self, index: usize) -> String {
        format!("{index:0width$}", width = self.min_digits)
    }

    /// Whether `index` has more decimal digits than the pattern has places.
    pub fn overflows(&self, index: usize) -> bool {
        index.to_string().len() > self.pattern.len()
    }
}

impl Default for PaddingFormat {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PADDING_FORMAT.to_string(),
            min_digits: DEFAULT_PADDING_FORMAT.len(),
        }
    }
}

/// Limits and formats shared by readers and writers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    max_line_count: u64,
    max_file_size: u64,
    padding_format: PaddingFormat,
    width_unit: WidthUnit,
    line_separator: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_line_count: DEFAULT_MAX_LINE_COUNT,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            padding_format: PaddingFormat::default(),
            width_unit: WidthUnit::default(),
            line_separator: "\r\n".to_string(),
        }
    }
}

impl CodecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum lines per output part.
    pub fn max_line_count(&self) -> u64 {
        self.max_line_count
    }

    /// Maximum encoded bytes per output part.
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    pub fn padding_format(&self) -> &PaddingFormat {
        &self.padding_format
    }

    pub fn width_unit(&self) -> WidthUnit {
        self.width_unit
    }

    /// Terminator appended by [`crate::CsvWriter::write_record`].
    pub fn line_separator(&self) -> &str {
        &self.line_separator
    }

    pub fn with_max_line_count(mut self, max: u64) -> Self {
        self.max_line_count = max;
        self
    }

    pub fn with_max_file_size(mut self, max: u64) -> Self {
        self.max_file_size = max;
        self
    }

    pub fn with_padding_format(mut self, pattern: &str) -> Result<Self> {
        self.padding_format = PaddingFormat::new(pattern)?;
        Ok(self)
    }

    pub fn with_width_unit(mut self, unit: WidthUnit) -> Self {
        self.width_unit = unit;
        self
    }

    pub fn with_line_separator(mut self, separator: impl Into<String>) -> Self {
        self.line_separator = separator.into();
        self
    }

    /// Parse `key=value` properties text.
    ///
    /// Blank lines and lines starting with `#` or `!` are ignored, as are
    /// unknown keys. Missing keys keep their defaults.
    pub fn from_properties(text: &str) -> Result<Self> {
        let mut config = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let Some((key, value)) = line.split_once(['=', ':']) else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            match key {
                "maxLine" => config.max_line_count = parse_limit(key, value)?,
                "maxFileSize" => config.max_file_size = parse_limit(key, value)?,
                "paddingFormat" => config.padding_format = PaddingFormat::new(value)?,
                "separateFlg" => config.width_unit = value.parse()?,
                "lineSeparator" => {
                    config.line_separator = match value.to_ascii_uppercase().as_str() {
                        "CRLF" => "\r\n".to_string(),
                        "LF" => "\n".to_string(),
                        _ => {
                            return Err(CodecError::config(key, "expected CRLF or LF"));
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(config)
    }

    /// Read and parse a properties file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| CodecError::io(path, e))?;
        Self::from_properties(&text)
    }
}

fn parse_limit(key: &str, value: &str) -> Result<u64> {
    value
        .parse::<u64>()
        .map_err(|e| CodecError::config(key, format!("{value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_format_pads_to_zero_count() {
        let pad = PaddingFormat::new("000").unwrap();
        assert_eq!(pad.format(1), "001");
        assert_eq!(pad.format(42), "042");
        assert_eq!(pad.format(1234), "1234");
    }

    #[test]
    fn test_padding_format_hash_is_optional_digit() {
        let pad = PaddingFormat::new("#0").unwrap();
        assert_eq!(pad.format(3), "3");
        assert!(!pad.overflows(99));
        assert!(pad.overflows(100));
    }

    #[test]
    fn test_padding_format_rejects_garbage() {
        assert!(PaddingFormat::new("").is_err());
        assert!(PaddingFormat::new("0a").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = CodecConfig::default();
        assert_eq!(config.max_line_count(), DEFAULT_MAX_LINE_COUNT);
        assert_eq!(config.max_file_size(), DEFAULT_MAX_FILE_SIZE);
        assert_eq!(config.padding_format().pattern(), "00");
        assert_eq!(config.width_unit(), WidthUnit::Character);
        assert_eq!(config.line_separator(), "\r\n");
    }

    #[test]
    fn test_from_properties_skips_comments_and_unknown_keys() {
        let config = CodecConfig::from_properties(
            "# limits\n! legacy comment\nmaxLine = 10\nunknown=1\n\nlineSeparator=LF\n",
        )
        .unwrap();
        assert_eq!(config.max_line_count(), 10);
        assert_eq!(config.max_file_size(), DEFAULT_MAX_FILE_SIZE);
        assert_eq!(config.line_separator(), "\n");
    }

    #[test]
    fn test_from_properties_rejects_bad_number() {
        let err = CodecConfig::from_properties("maxFileSize=lots").unwrap_err();
        assert!(matches!(err, CodecError::Config { ref key, .. } if key == "maxFileSize"));
    }

    #[test]
    fn test_width_unit_parse() {
        assert_eq!("byte".parse::<WidthUnit>().unwrap(), WidthUnit::Byte);
        assert_eq!("CHAR".parse::<WidthUnit>().unwrap(), WidthUnit::Character);
        assert!("bits".parse::<WidthUnit>().is_err());
    }
}
