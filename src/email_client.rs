use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::MailAddress;
use crate::utils::error_chain_fmt;

mod api;
mod smtp;
pub use api::ApiMailer;
pub use smtp::SmtpMailer;

/// A fully composed message, independent of how it is delivered.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub sender: MailAddress,
    /// Display name shown next to `sender`
    pub sender_name: String,
    pub recipient: MailAddress,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// The outbound mail capability. Implementations make exactly one delivery
/// attempt per call; retrying is left to whoever submitted the message.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(
        &self,
        email: &OutboundEmail,
    ) -> Result<(), TransportError>;
}

#[derive(thiserror::Error)]
pub enum TransportError {
    #[error("invalid address in outbound email")]
    Address(#[from] lettre::address::AddressError),
    #[error("could not build email message")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP delivery failed")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("email API request failed")]
    Http(#[from] reqwest::Error),
    #[error("email API rejected the message with status {status}: {detail}")]
    Rejected { status: u16, detail: String },
}

impl Debug for TransportError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
