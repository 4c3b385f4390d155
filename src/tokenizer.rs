//! Quote-aware tokenizer for delimited records.
//!
//! A physical line is cut into tokens that are either a lone `,` or a
//! maximal run of non-comma characters. Tokens are then folded into fields
//! with a deliberately lenient quote policy:
//!
//! - `"..."` is a quoted field; the outer quotes are removed, nothing is trimmed.
//! - `"ab"cd` ends at the second quote: the field is `ab`, the tail is dropped.
//! - `x"ab"y` yields the text between its first two quotes, `ab`.
//! - A quote that is not closed within its token opens a field that swallows
//!   the following tokens, commas and line breaks included, until a token
//!   ending in `"` closes it.
//! - A quote still open at end of input is closed silently.
//!
//! Unquoted fields are trimmed. Leading, doubled and trailing commas produce
//! empty fields.
//!
//! The multi-line assembly lives in [`TokenizerState`], which the caller
//! threads from one physical line to the next:
//!
//! ```
//! use csvparts_rs::{Record, TokenizerState};
//!
//! let mut state = TokenizerState::new();
//! let mut record = Record::new();
//! state.scan_line(r#"1,"multi"#, &mut record);
//! assert!(state.is_inside_quoted_field());
//! state.continue_line(r#"line",2"#, &mut record);
//! state.finish(&mut record);
//! assert_eq!(record, Record::from_fields(["1", "multi\nline", "2"]));
//! ```

use crate::error::Result;
use crate::line_source::LineSource;
use crate::normalize::normalize_special;
use crate::record::Record;

/// Iterator over the comma and non-comma tokens of one line.
///
/// Never yields an empty token, so an empty line has no tokens at all.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: &'a str,
}

/// Split `line` into tokens.
pub fn tokens(line: &str) -> Tokens<'_> {
    Tokens { rest: line }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let end = match self.rest.find(',') {
            Some(0) => 1,
            Some(i) => i,
            None => self.rest.len(),
        };
        let (token, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(token)
    }
}

/// Scan state carried across the physical lines of one logical record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizerState {
    inside_quoted_field: bool,
    pending: String,
    /// The last boundary seen was a bare comma.
    comma_pending: bool,
    /// At least one token of this record has been scanned.
    seen_token: bool,
}

impl TokenizerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a quoted field is open and more lines are needed.
    pub fn is_inside_quoted_field(&self) -> bool {
        self.inside_quoted_field
    }

    /// Raw text accumulated for the open quoted field.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Scan the first (or any non-continuation) line of a record.
    pub fn scan_line(&mut self, line: &str, record: &mut Record) {
        for raw in tokens(line) {
            let token = normalize_special(raw);
            if self.inside_quoted_field {
                self.append_quoted(&token, record);
            } else {
                self.scan_token(&token, record);
            }
            self.seen_token = true;
        }
    }

    /// Feed the line that follows a line break inside an open quoted field.
    pub fn continue_line(&mut self, line: &str, record: &mut Record) {
        if self.inside_quoted_field {
            self.pending.push('\n');
        }
        self.scan_line(line, record);
    }

    /// Complete the record and reset the state for the next one.
    ///
    /// An unterminated quoted field is emitted with whatever it holds, and a
    /// trailing comma adds one empty field.
    pub fn finish(&mut self, record: &mut Record) {
        if self.inside_quoted_field {
            record.push(strip_quotes(&self.pending));
        }
        if self.comma_pending {
            record.push("");
        }
        *self = Self::default();
    }

    fn scan_token(&mut self, token: &str, record: &mut Record) {
        if token == "," {
            if self.comma_pending {
                record.push("");
            } else if !self.seen_token {
                record.push("");
                self.comma_pending = true;
            } else {
                self.comma_pending = true;
            }
            return;
        }

        if token.starts_with('"') {
            if token.len() > 1 && token.ends_with('"') {
                record.push(strip_quotes(token));
            } else if let Some(end) = find_quote(token, 1) {
                record.push(trim_field(&token[1..end]));
            } else {
                self.open_quoted(token);
                return;
            }
        } else if let Some(start) = find_quote(token, 1) {
            match find_quote(token, start + 1) {
                Some(end) => record.push(trim_field(&token[start + 1..end])),
                None => {
                    self.open_quoted(token);
                    return;
                }
            }
        } else {
            record.push(trim_field(token));
        }
        self.comma_pending = false;
    }

    fn open_quoted(&mut self, token: &str) {
        self.inside_quoted_field = true;
        self.comma_pending = false;
        self.pending.clear();
        self.pending.push_str(token);
    }

    fn append_quoted(&mut self, token: &str, record: &mut Record) {
        self.pending.push_str(token);
        if token.ends_with('"') {
            record.push(strip_quotes(&self.pending));
            self.pending.clear();
            self.inside_quoted_field = false;
            self.comma_pending = false;
        }
    }
}

/// Tokenize a single line as a complete record.
///
/// A quote left open at the end of the line is closed as if input ended.
pub fn tokenize(line: &str) -> Record {
    let mut state = TokenizerState::new();
    let mut record = Record::new();
    state.scan_line(line, &mut record);
    state.finish(&mut record);
    record
}

/// Read one logical record, pulling extra lines while a quoted field is open.
///
/// Returns `Ok(None)` when the source is exhausted before the first line.
pub fn read_record<S: LineSource + ?Sized>(source: &mut S) -> Result<Option<Record>> {
    let Some(line) = source.next_line()? else {
        return Ok(None);
    };
    let mut state = TokenizerState::new();
    let mut record = Record::new();
    state.scan_line(&line, &mut record);
    while state.is_inside_quoted_field() {
        match source.next_line()? {
            Some(next) => state.continue_line(&next, &mut record),
            None => break,
        }
    }
    state.finish(&mut record);
    Ok(Some(record))
}

/// Remove one pair of enclosing quotes.
///
/// Values shorter than two characters collapse to the empty string; values
/// that are not fully enclosed are returned unchanged.
pub(crate) fn strip_quotes(value: &str) -> String {
    if value.chars().nth(1).is_none() {
        return String::new();
    }
    match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(inner) => inner.to_string(),
        None => value.to_string(),
    }
}

/// Trim ASCII control characters and spaces from both ends.
pub(crate) fn trim_field(value: &str) -> &str {
    value.trim_matches(|c: char| c <= ' ')
}

/// Byte offset of the first `"` at or after byte `from`.
fn find_quote(token: &str, from: usize) -> Option<usize> {
    token
        .as_bytes()
        .get(from..)?
        .iter()
        .position(|b| *b == b'"')
        .map(|i| i + from)
}
