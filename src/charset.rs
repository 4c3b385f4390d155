//! Text encoding for readers and writers.
//!
//! Wraps `encoding_rs` so the rest of the crate only sees a resolved
//! [`Charset`]. Characters the charset cannot represent are encoded as `?`.
//! `&#NNNN;` references already present in the text are left for the read
//! path to fold (see [`crate::normalize`]).

use std::borrow::Cow;

use encoding_rs::{EncoderResult, Encoding};

use crate::error::{CodecError, Result};

/// Charset used when the caller does not name one.
pub const DEFAULT_CHARSET: &str = "windows-31j";

/// A resolved text encoding usable for both decoding and encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charset {
    encoding: &'static Encoding,
}

impl Charset {
    /// Resolve a WHATWG label such as `windows-31j`, `Shift_JIS` or `UTF-8`.
    ///
    /// Encodings that cannot be written back in the same form (UTF-16,
    /// `replacement`) are rejected.
    pub fn for_label(label: &str) -> Result<Self> {
        let encoding =
            Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| CodecError::Encoding {
                label: label.to_string(),
            })?;
        if encoding.output_encoding() != encoding {
            return Err(CodecError::Encoding {
                label: label.to_string(),
            });
        }
        Ok(Self { encoding })
    }

    /// Resolve an optional label, falling back to [`DEFAULT_CHARSET`] when it
    /// is absent or blank.
    pub fn resolve(label: Option<&str>) -> Result<Self> {
        match label {
            Some(l) if !l.trim().is_empty() => Self::for_label(l),
            _ => Self::for_label(DEFAULT_CHARSET),
        }
    }

    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Encode `text`, writing `?` for every character the charset lacks.
    pub fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        let (bytes, _, had_unmappable) = self.encoding.encode(text);
        if !had_unmappable {
            return bytes;
        }

        // encoding_rs substitutes `&#NNNN;`, so redo the pass by hand.
        let mut encoder = self.encoding.new_encoder();
        let mut out = Vec::with_capacity(bytes.len());
        let mut rest = text;
        loop {
            let needed = encoder
                .max_buffer_length_from_utf8_without_replacement(rest.len())
                .unwrap_or(rest.len() * 4 + 8);
            out.reserve(needed);
            let (result, read) =
                encoder.encode_from_utf8_to_vec_without_replacement(rest, &mut out, true);
            rest = &rest[read..];
            match result {
                EncoderResult::InputEmpty => return Cow::Owned(out),
                EncoderResult::OutputFull => {}
                EncoderResult::Unmappable(_) => {
                    let needed = encoder
                        .max_buffer_length_from_utf8_without_replacement(1)
                        .unwrap_or(8);
                    out.reserve(needed);
                    encoder.encode_from_utf8_to_vec_without_replacement("?", &mut out, false);
                }
            }
        }
    }

    /// Number of bytes `text` occupies once encoded.
    pub fn encoded_len(&self, text: &str) -> usize {
        self.encode(text).len()
    }

    /// Decode without BOM sniffing; malformed sequences become U+FFFD.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        self.encoding.decode_without_bom_handling(bytes).0
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self {
            encoding: encoding_rs::SHIFT_JIS,
        }
    }
}
