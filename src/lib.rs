//! # csvparts-rs
//!
//! A lenient CSV and fixed-width record codec with a rotating part writer.
//!
//! The read side turns physical lines into records:
//! - **Delimited**: a quote-aware tokenizer that lets quoted fields carry
//!   commas and line breaks, with a forgiving policy for odd quote placement
//! - **Fixed-width**: columns cut by character or by encoded byte widths
//!
//! The write side appends lines to an output file and rolls over to
//! `name_01.csv`, `name_02.csv`, ... once a line or byte limit would be
//! passed.
//!
//! Text defaults to `windows-31j`. Characters the charset cannot represent
//! are written as `?`, and `&#NNNN;` references found in the input are
//! folded to `?` on read.
//!
//! ## Example
//!
//! ```
//! use csvparts_rs::{MemoryLines, Record, read_record, tokenize};
//!
//! assert_eq!(
//!     tokenize(",a,,\"b,c\""),
//!     Record::from_fields(["", "a", "", "b,c"])
//! );
//!
//! let mut lines = MemoryLines::from_text("id,memo\n7,\"first\nsecond\"\n");
//! let header = read_record(&mut lines)?.unwrap();
//! let row = read_record(&mut lines)?.unwrap();
//! assert_eq!(header.len(), 2);
//! assert_eq!(&row[1], "first\nsecond");
//! # Ok::<(), csvparts_rs::CodecError>(())
//! ```

pub mod charset;
pub mod config;
pub mod error;
pub mod fixed_width;
pub mod line_source;
pub mod normalize;
pub mod reader;
pub mod record;
pub mod report;
pub mod rotation;
pub mod tokenizer;
pub mod writer;

pub use charset::{Charset, DEFAULT_CHARSET};
pub use config::{CodecConfig, PaddingFormat, WidthUnit};
pub use error::{CodecError, Result};
pub use fixed_width::FixedWidthDecoder;
pub use line_source::{DecodedLines, LineSource, MemoryLines};
pub use normalize::normalize_special;
pub use reader::CsvReader;
pub use record::Record;
pub use report::{Condition, MemoryReporter, Reporter, TracingReporter};
pub use rotation::RotationState;
pub use tokenizer::{TokenizerState, read_record, tokenize, tokens};
pub use writer::CsvWriter;
