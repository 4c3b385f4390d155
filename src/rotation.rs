//! Part naming and line/byte accounting for the rotating writer.
//!
//! An output path `out/data.csv` is written as is until the first rotation.
//! From then on parts are named `out/data_<n>.csv`, with `<n>` rendered by
//! the configured [`PaddingFormat`]. Only `.csv` and `.txt` (any case) are
//! recognized as extensions; any other name gets the suffix appended.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::{CodecConfig, PaddingFormat};

const RECOGNIZED_EXTENSIONS: [&str; 2] = [".CSV", ".TXT"];

/// Split `path` into the path without a recognized extension and that
/// extension, case preserved.
///
/// A file name that is nothing but the extension (`.csv`) has none.
pub fn split_extension(path: &Path) -> (PathBuf, Option<String>) {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return (path.to_path_buf(), None);
    };
    let upper = name.to_ascii_uppercase();
    for ext in RECOGNIZED_EXTENSIONS {
        if upper.ends_with(ext) && name.len() > ext.len() {
            let cut = name.len() - ext.len();
            return (path.with_file_name(&name[..cut]), Some(name[cut..].to_string()));
        }
    }
    (path.to_path_buf(), None)
}

/// Line/byte counters and the part list owned by one writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationState {
    line_count: u64,
    byte_count: u64,
    part_index: usize,
    original: PathBuf,
    base: PathBuf,
    extension: Option<String>,
    parts: Vec<PathBuf>,
}

impl RotationState {
    /// State for a writer that has just opened `original` as part 1.
    pub fn new(original: impl Into<PathBuf>) -> Self {
        let original = original.into();
        let (base, extension) = split_extension(&original);
        Self {
            line_count: 0,
            byte_count: 0,
            part_index: 1,
            parts: vec![original.clone()],
            original,
            base,
            extension,
        }
    }

    pub fn line_count(&self) -> u64 {
        self.line_count
    }

    pub fn byte_count(&self) -> u64 {
        self.byte_count
    }

    /// 1-based index of the part currently being written.
    pub fn part_index(&self) -> usize {
        self.part_index
    }

    pub fn original(&self) -> &Path {
        &self.original
    }

    /// Every path written so far, in order.
    pub fn parts(&self) -> &[PathBuf] {
        &self.parts
    }

    /// Path of the part currently being written.
    pub fn current_path(&self) -> &Path {
        self.parts.last().map_or(self.original.as_path(), PathBuf::as_path)
    }

    /// Whether one more line of `encoded_len` bytes would break a limit.
    ///
    /// Reaching a limit exactly is allowed; only going past it rotates.
    pub fn would_exceed(&self, encoded_len: u64, config: &CodecConfig) -> bool {
        self.line_count + 1 > config.max_line_count()
            || self.byte_count + encoded_len > config.max_file_size()
    }

    /// Suffixed path for part `index`.
    pub fn part_path(&self, index: usize, padding: &PaddingFormat) -> PathBuf {
        let mut name = OsString::from(self.base.as_os_str());
        name.push("_");
        name.push(padding.format(index));
        if let Some(ext) = &self.extension {
            name.push(ext);
        }
        PathBuf::from(name)
    }

    /// Replace the first recorded part (the unsuffixed original) with its
    /// renamed copy.
    pub fn rename_first(&mut self, renamed: PathBuf) {
        if let Some(first) = self.parts.first_mut() {
            *first = renamed;
        }
    }

    /// Switch to part `index` at `path` and zero the counters.
    pub fn start_part(&mut self, index: usize, path: PathBuf) {
        self.part_index = index;
        self.parts.push(path);
        self.line_count = 0;
        self.byte_count = 0;
    }

    /// Account for one written line.
    pub fn record_write(&mut self, encoded_len: u64) {
        self.byte_count += encoded_len;
        self.line_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad(pattern: &str) -> PaddingFormat {
        PaddingFormat::new(pattern).unwrap()
    }

    #[test]
    fn test_split_recognized_extensions() {
        assert_eq!(
            split_extension(Path::new("out/data.csv")),
            (PathBuf::from("out/data"), Some(".csv".to_string()))
        );
        assert_eq!(
            split_extension(Path::new("REPORT.TXT")),
            (PathBuf::from("REPORT"), Some(".TXT".to_string()))
        );
        assert_eq!(
            split_extension(Path::new("data.Csv")),
            (PathBuf::from("data"), Some(".Csv".to_string()))
        );
    }

    #[test]
    fn test_split_unrecognized_extension() {
        assert_eq!(
            split_extension(Path::new("data.dat")),
            (PathBuf::from("data.dat"), None)
        );
        assert_eq!(split_extension(Path::new(".csv")), (PathBuf::from(".csv"), None));
    }

    #[test]
    fn test_part_paths() {
        let state = RotationState::new("out/data.csv");
        assert_eq!(state.part_path(1, &pad("00")), PathBuf::from("out/data_01.csv"));
        assert_eq!(state.part_path(12, &pad("000")), PathBuf::from("out/data_012.csv"));
        let state = RotationState::new("log");
        assert_eq!(state.part_path(3, &pad("0")), PathBuf::from("log_3"));
    }

    #[test]
    fn test_would_exceed_line_threshold() {
        let config = CodecConfig::default().with_max_line_count(2);
        let mut state = RotationState::new("a.csv");
        assert!(!state.would_exceed(1, &config));
        state.record_write(1);
        assert!(!state.would_exceed(1, &config));
        state.record_write(1);
        assert!(state.would_exceed(1, &config));
    }

    #[test]
    fn test_would_exceed_byte_threshold() {
        let config = CodecConfig::default().with_max_file_size(10);
        let mut state = RotationState::new("a.csv");
        state.record_write(6);
        assert!(!state.would_exceed(4, &config));
        assert!(state.would_exceed(5, &config));
    }

    #[test]
    fn test_start_part_resets_counters() {
        let mut state = RotationState::new("a.csv");
        state.record_write(100);
        state.rename_first(PathBuf::from("a_01.csv"));
        state.start_part(2, PathBuf::from("a_02.csv"));
        assert_eq!(state.line_count(), 0);
        assert_eq!(state.byte_count(), 0);
        assert_eq!(state.part_index(), 2);
        assert_eq!(state.parts(), [PathBuf::from("a_01.csv"), PathBuf::from("a_02.csv")]);
        assert_eq!(state.current_path(), Path::new("a_02.csv"));
    }
}
