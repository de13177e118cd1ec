use std::fmt::Debug;
use std::sync::Arc;

use htmlescape::encode_minimal;

use crate::domain::ContactForm;
use crate::domain::FieldError;
use crate::domain::MailAddress;
use crate::domain::NewContact;
use crate::email_client::MailTransport;
use crate::email_client::OutboundEmail;
use crate::email_client::TransportError;
use crate::utils::error_chain_fmt;

/// Turns a contact-form submission into an email to the site owner.
///
/// Stateless apart from the (read-only) transport handle, so one instance is
/// shared by every request. Each valid submission makes exactly one delivery
/// attempt; there is no retry, queueing or backoff.
pub struct ContactRelay {
    transport: Arc<dyn MailTransport>,
    sender: MailAddress,
    sender_name: String,
    recipient: MailAddress,
}

#[derive(thiserror::Error)]
pub enum RelayError {
    #[error("invalid submission")]
    Validation(#[from] FieldError),
    #[error("could not deliver contact message")]
    Delivery(#[source] TransportError),
}

impl Debug for RelayError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ContactRelay {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        sender: MailAddress,
        sender_name: String,
        recipient: MailAddress,
    ) -> Self {
        Self {
            transport,
            sender,
            sender_name,
            recipient,
        }
    }

    /// Validate `form` and forward it to the owner. Invalid submissions never
    /// reach the transport.
    #[tracing::instrument(name = "Relaying contact message", skip_all)]
    pub async fn submit(
        &self,
        form: ContactForm,
    ) -> Result<(), RelayError> {
        let contact: NewContact = form.try_into()?;
        let email = self.compose(&contact);

        match self.transport.send(&email).await {
            Ok(()) => {
                tracing::info!("contact message delivered");
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "failed to deliver contact message"
                );
                Err(RelayError::Delivery(e))
            }
        }
    }

    /// Build the notification. The visitor's name and address appear in both
    /// bodies, since `Reply-To` is only set when the address is well-formed.
    pub fn compose(
        &self,
        contact: &NewContact,
    ) -> OutboundEmail {
        let name = contact.name.as_ref();
        let email = contact.email.as_ref();
        let message = contact.message.as_ref();

        let text_body = format!("{message}\n\n--\nFrom: {name} <{email}>\n");

        let html_message = encode_minimal(message).replace('\n', "<br />\n");
        let html_body = format!(
            r#"<p>You have a new contact form submission from your portfolio.</p>
<h3>Contact Details</h3>
<ul>
  <li>Name: {}</li>
  <li>Email: {}</li>
</ul>
<h3>Message</h3>
<p>{}</p>
"#,
            encode_minimal(name),
            encode_minimal(email),
            html_message,
        );

        OutboundEmail {
            sender: self.sender.clone(),
            sender_name: self.sender_name.clone(),
            recipient: self.recipient.clone(),
            reply_to: contact.email.reply_to().map(String::from),
            subject: format!("New message from {name}"),
            text_body,
            html_body,
        }
    }
}
