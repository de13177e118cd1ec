use serde::Deserialize;

use super::ContactEmail;
use super::ContactMessage;
use super::required;
use super::ContactName;
use super::FieldError;

/// Raw submission as sent by the browser. Absent keys deserialize to `None`
/// and are rejected the same way as empty strings.
#[derive(Debug, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A submission whose fields have all been parsed.
#[derive(Debug, Clone)]
pub struct NewContact {
    pub name: ContactName,
    pub email: ContactEmail,
    pub message: ContactMessage,
}

impl TryFrom<ContactForm> for NewContact {
    type Error = FieldError;
    fn try_from(value: ContactForm) -> Result<Self, Self::Error> {
        // presence first: a missing field wins over any other complaint
        let name = required("name", value.name.unwrap_or_default())?;
        let email = required("email", value.email.unwrap_or_default())?;
        let message = required("message", value.message.unwrap_or_default())?;
        Ok(Self {
            name: ContactName::parse(name)?,
            email: ContactEmail::parse(email)?,
            message: ContactMessage::parse(message)?,
        })
    }
}
