//! Records: ordered lists of string fields.

use std::ops::Index;

/// One logical row.
///
/// Fields are never missing: an empty column is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push(&mut self, field: impl Into<String>) {
        self.fields.push(field.into());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }

    /// Serialize as one delimited line, without a terminator.
    ///
    /// Fields containing a comma, a double quote or a line break are wrapped
    /// in double quotes. Embedded quotes are written as they are, because
    /// the tokenizer does not unescape doubled quotes.
    pub fn to_line(&self) -> String {
        let mut line = String::new();
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                line.push(',');
            }
            if field.contains([',', '"', '\r', '\n']) {
                line.push('"');
                line.push_str(field);
                line.push('"');
            } else {
                line.push_str(field);
            }
        }
        line
    }
}

impl Index<usize> for Record {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.fields[index]
    }
}

impl From<Vec<String>> for Record {
    fn from(fields: Vec<String>) -> Self {
        Self { fields }
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_line_plain() {
        let r = Record::from_fields(["a", "", "b"]);
        assert_eq!(r.to_line(), "a,,b");
    }

    #[test]
    fn test_to_line_quotes_separators() {
        let r = Record::from_fields(["a,b", "x\ny", "plain"]);
        assert_eq!(r.to_line(), "\"a,b\",\"x\ny\",plain");
    }

    #[test]
    fn test_empty_record_is_empty_line() {
        assert_eq!(Record::new().to_line(), "");
    }

    #[test]
    fn test_index_and_get() {
        let r = Record::from_fields(["SMITH", "JOHN"]);
        assert_eq!(&r[1], "JOHN");
        assert_eq!(r.get(2), None);
        assert_eq!(r.len(), 2);
    }
}
