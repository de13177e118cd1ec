use validator::ValidateEmail;

/// A strictly validated address, used for the relay's own sender and
/// recipient. Loaded from configuration, so a bad value is a startup error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailAddress(String);

impl MailAddress {
    pub fn parse(email: String) -> Result<Self, String> {
        ValidateEmail::validate_email(&email)
            .then_some(Self(email.clone()))
            .ok_or(format!("Invalid email: {email:?}"))
    }
}

impl AsRef<str> for MailAddress {
    fn as_ref(&self) -> &str { &self.0 }
}

impl std::fmt::Display for MailAddress {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
