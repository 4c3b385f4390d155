//! Physical line sources.
//!
//! A [`LineSource`] yields one physical line at a time, without its
//! terminator. Decoders pull from it, and the tokenizer pulls more than one
//! line when a quoted field spans line breaks.

use std::collections::VecDeque;
use std::io::BufRead;
use std::path::PathBuf;

use crate::charset::Charset;
use crate::error::{CodecError, Result};

/// Something that yields physical lines.
pub trait LineSource {
    /// The next line without its `\n` / `\r\n`, or `None` at end of input.
    fn next_line(&mut self) -> Result<Option<String>>;
}

/// Lines read from a byte stream and decoded with a [`Charset`].
///
/// Splitting happens on raw `\n` bytes before decoding. This is safe for
/// Shift_JIS, EUC-JP and UTF-8, where `0x0A` never occurs inside a
/// multi-byte sequence.
pub struct DecodedLines<R> {
    inner: R,
    charset: Charset,
    origin: PathBuf,
    buf: Vec<u8>,
}

impl<R: BufRead> DecodedLines<R> {
    /// `origin` is only used to label I/O errors.
    pub fn new(inner: R, charset: Charset, origin: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            charset,
            origin: origin.into(),
            buf: Vec::new(),
        }
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }
}

impl<R: BufRead> LineSource for DecodedLines<R> {
    fn next_line(&mut self) -> Result<Option<String>> {
        self.buf.clear();
        let n = self
            .inner
            .read_until(b'\n', &mut self.buf)
            .map_err(|e| CodecError::io(&self.origin, e))?;
        if n == 0 {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(Some(self.charset.decode(&self.buf).into_owned()))
    }
}

/// In-memory lines, mostly for tests and for callers that already hold text.
#[derive(Debug, Default, Clone)]
pub struct MemoryLines {
    lines: VecDeque<String>,
}

impl MemoryLines {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Split `text` the way a line reader would.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines())
    }
}

impl LineSource for MemoryLines {
    fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn drain(src: &mut impl LineSource) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(line) = src.next_line().unwrap() {
            out.push(line);
        }
        out
    }

    #[test]
    fn test_strips_lf_and_crlf() {
        let mut src = DecodedLines::new(Cursor::new(b"a\r\nb\nc".to_vec()), Charset::default(), "mem");
        assert_eq!(drain(&mut src), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let mut src = DecodedLines::new(Cursor::new(b"a\n\nb\n".to_vec()), Charset::default(), "mem");
        assert_eq!(drain(&mut src), vec!["a", "", "b"]);
    }

    #[test]
    fn test_decodes_shift_jis() {
        let cs = Charset::default();
        let bytes = cs.encode("名前,年齢\n").into_owned();
        let mut src = DecodedLines::new(Cursor::new(bytes), cs, "mem");
        assert_eq!(drain(&mut src), vec!["名前,年齢"]);
    }

    #[test]
    fn test_memory_lines() {
        let mut src = MemoryLines::from_text("x\ny\n");
        assert_eq!(drain(&mut src), vec!["x", "y"]);
        assert_eq!(src.next_line().unwrap(), None);
    }
}
