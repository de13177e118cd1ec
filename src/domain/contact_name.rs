use unicode_segmentation::UnicodeSegmentation;

use super::required;
use super::FieldError;

const MAX_GRAPHEMES: usize = 256;

/// The sender's self-declared name. Surrounding whitespace is trimmed; empty
/// names and names longer than 256 graphemes are rejected.
///
/// Must be instantiated with `ContactName::parse`. The subject line is derived
/// from this value, so line breaks are rejected too.
#[derive(Debug, Clone)]
pub struct ContactName(String);

impl ContactName {
    pub fn parse(name: String) -> Result<Self, FieldError> {
        let name = required("name", name)?;
        let too_long = name.graphemes(true).count() > MAX_GRAPHEMES;
        let line_break = name.contains(&['\r', '\n'][..]);
        match (too_long, line_break) {
            (true, _) => Err(FieldError::TooLong("name", MAX_GRAPHEMES)),
            (false, true) => Err(FieldError::LineBreak("name")),
            (false, false) => Ok(Self(name)),
        }
    }
}

impl AsRef<str> for ContactName {
    fn as_ref(&self) -> &str { &self.0 }
}
