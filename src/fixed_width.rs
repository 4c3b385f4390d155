//! Fixed-width record decoding.
//!
//! Columns are cut from one physical line by an ordered list of widths,
//! measured either in characters or in bytes of the encoded line.

use crate::charset::Charset;
use crate::config::WidthUnit;
use crate::error::{CodecError, Result};
use crate::line_source::LineSource;
use crate::normalize::normalize_special;
use crate::record::Record;

/// Column layout plus the unit its widths are measured in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedWidthDecoder {
    widths: Vec<usize>,
    unit: WidthUnit,
    charset: Charset,
}

impl FixedWidthDecoder {
    pub fn new(widths: impl Into<Vec<usize>>, unit: WidthUnit, charset: Charset) -> Self {
        Self {
            widths: widths.into(),
            unit,
            charset,
        }
    }

    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    /// Split `line` into exactly `widths.len()` columns.
    ///
    /// Anything past the last column is ignored.
    pub fn decode(&self, line: &str) -> Result<Record> {
        match self.unit {
            WidthUnit::Character => self.decode_chars(line),
            WidthUnit::Byte => self.decode_bytes(line),
        }
    }

    /// Read and decode the next line, or `None` at end of input.
    pub fn read_record<S: LineSource + ?Sized>(&self, source: &mut S) -> Result<Option<Record>> {
        match source.next_line()? {
            Some(line) => self.decode(&line).map(Some),
            None => Ok(None),
        }
    }

    fn decode_chars(&self, line: &str) -> Result<Record> {
        // Byte offset of every char boundary, including the end of the line.
        let bounds: Vec<usize> = line
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(line.len()))
            .collect();
        let available = bounds.len() - 1;

        let mut record = Record::new();
        let mut cursor: usize = 0;
        for (column, width) in self.widths.iter().enumerate() {
            let end = match cursor.checked_add(*width) {
                Some(end) if end <= available => end,
                end => {
                    return Err(CodecError::Range {
                        column,
                        end: end.unwrap_or(usize::MAX),
                        available,
                        unit: "chars",
                    });
                }
            };
            let text = &line[bounds[cursor]..bounds[end]];
            record.push(normalize_special(text));
            cursor = end;
        }
        Ok(record)
    }

    fn decode_bytes(&self, line: &str) -> Result<Record> {
        let bytes = self.charset.encode(line);
        let available = bytes.len();

        let mut record = Record::new();
        let mut cursor: usize = 0;
        for (column, width) in self.widths.iter().enumerate() {
            let end = match cursor.checked_add(*width) {
                Some(end) if end <= available => end,
                end => {
                    return Err(CodecError::Range {
                        column,
                        end: end.unwrap_or(usize::MAX),
                        available,
                        unit: "bytes",
                    });
                }
            };
            let text = self.charset.decode(&bytes[cursor..end]);
            record.push(normalize_special(&text));
            cursor = end;
        }
        Ok(record)
    }
}
