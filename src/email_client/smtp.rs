use std::time::Duration;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::MultiPart;
use lettre::transport::smtp::authentication::Credentials;
use lettre::AsyncSmtpTransport;
use lettre::AsyncTransport;
use lettre::Message;
use lettre::Tokio1Executor;
use secrecy::ExposeSecret;

use super::MailTransport;
use super::OutboundEmail;
use super::TransportError;
use crate::configuration::SmtpSettings;
use crate::configuration::SmtpTls;

/// SMTP submission via `lettre`. A new connection is opened for every message;
/// contact submissions are rare enough that pooling is not worth it.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Does not connect; a bad host or credentials only surface on `send`.
    pub fn new(
        settings: &SmtpSettings,
        timeout: Duration,
    ) -> Result<Self, lettre::transport::smtp::Error> {
        let builder = match settings.tls {
            // local catchers (MailDev, MailHog) speak plain SMTP
            SmtpTls::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host),
            SmtpTls::Starttls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?,
            SmtpTls::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?,
        };
        let mut builder = builder.port(settings.port).timeout(Some(timeout));

        // an empty username means the server does not require authentication
        if !settings.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.username.clone(),
                settings.password.expose_secret().clone(),
            ));
        }

        tracing::info!(
            smtp_host = %settings.host,
            smtp_port = settings.port,
            authenticated = !settings.username.is_empty(),
            "SMTP transport configured"
        );

        Ok(Self {
            transport: builder.build(),
        })
    }
}

/// Convert to a `multipart/alternative` message (plain text first, so that
/// clients which cannot render HTML show the text part).
fn build_message(email: &OutboundEmail) -> Result<Message, TransportError> {
    let sender = Mailbox::new(
        Some(email.sender_name.clone()),
        email.sender.as_ref().parse()?,
    );
    let recipient = Mailbox::new(None, email.recipient.as_ref().parse()?);

    let mut builder = Message::builder()
        .from(sender)
        .to(recipient)
        .subject(email.subject.clone());
    if let Some(reply_to) = &email.reply_to {
        builder = builder.reply_to(Mailbox::new(None, reply_to.parse()?));
    }

    let message = builder.multipart(MultiPart::alternative_plain_html(
        email.text_body.clone(),
        email.html_body.clone(),
    ))?;
    Ok(message)
}

#[async_trait]
impl MailTransport for SmtpMailer {
    #[tracing::instrument(name = "Sending email over SMTP", skip_all)]
    async fn send(
        &self,
        email: &OutboundEmail,
    ) -> Result<(), TransportError> {
        let message = build_message(email)?;
        let response = self.transport.send(message).await?;
        tracing::debug!(smtp_code = %response.code(), "SMTP server accepted message");
        Ok(())
    }
}
