use unicode_segmentation::UnicodeSegmentation;

use super::required;
use super::FieldError;

const MAX_GRAPHEMES: usize = 10_000;

/// Free-text message body. Trimmed; must not be empty.
#[derive(Debug, Clone)]
pub struct ContactMessage(String);

impl ContactMessage {
    pub fn parse(message: String) -> Result<Self, FieldError> {
        let message = required("message", message)?;
        match message.graphemes(true).count() > MAX_GRAPHEMES {
            true => Err(FieldError::TooLong("message", MAX_GRAPHEMES)),
            false => Ok(Self(message)),
        }
    }
}

impl AsRef<str> for ContactMessage {
    fn as_ref(&self) -> &str { &self.0 }
}
