mod contact_email;
mod contact_form;
mod contact_message;
mod contact_name;
mod mail_address;
pub use contact_email::ContactEmail;
pub use contact_form::ContactForm;
pub use contact_form::NewContact;
pub use contact_message::ContactMessage;
pub use contact_name::ContactName;
pub use mail_address::MailAddress;

/// Why a submitted field was rejected. Each variant names the offending field
/// so that it can be logged; the client only ever sees `client_message`.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("missing required field: {0}")]
    Missing(&'static str),
    #[error("{0} exceeds {1} characters")]
    TooLong(&'static str, usize),
    #[error("{0} contains a line break")]
    LineBreak(&'static str),
}

impl FieldError {
    pub fn client_message(&self) -> String {
        match self {
            Self::Missing(_) => "Please enter all fields".to_string(),
            Self::TooLong(field, _) => format!("{} is too long", capitalise(field)),
            Self::LineBreak("email") => "Invalid email address".to_string(),
            Self::LineBreak(field) => format!("Invalid {field}"),
        }
    }
}

fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Trim `value`, rejecting it if nothing is left. Whitespace-only input counts
/// as missing.
fn required(
    field: &'static str,
    value: String,
) -> Result<String, FieldError> {
    let trimmed = value.trim();
    match trimmed.is_empty() {
        true => Err(FieldError::Missing(field)),
        false => Ok(trimmed.to_string()),
    }
}
