use validator::ValidateEmail;

use super::required;
use super::FieldError;

/// The address a visitor asks to be replied to.
///
/// Deliberately lenient: anything non-empty is accepted, since the address is
/// only ever shown to the site owner. Line breaks are rejected because the
/// value may end up in a `Reply-To` header.
#[derive(Debug, Clone)]
pub struct ContactEmail(String);

impl ContactEmail {
    pub fn parse(email: String) -> Result<Self, FieldError> {
        let email = required("email", email)?;
        match email.contains(&['\r', '\n'][..]) {
            true => Err(FieldError::LineBreak("email")),
            false => Ok(Self(email)),
        }
    }

    /// `Some` only if the address is well-formed enough to be used as a
    /// `Reply-To` header.
    pub fn reply_to(&self) -> Option<&str> {
        ValidateEmail::validate_email(&self.0).then_some(self.0.as_str())
    }
}

impl AsRef<str> for ContactEmail {
    fn as_ref(&self) -> &str { &self.0 }
}
