use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use secrecy::Secret;
use serde::Serialize;

use super::MailTransport;
use super::OutboundEmail;
use super::TransportError;

/// Delivery through an HTTP email provider (Postmark's `/email` endpoint).
///
/// Establishing a connection is expensive, so the `Client` is built once and
/// reused for every message; it is cheap to share across actix workers.
pub struct ApiMailer {
    http_client: Client,
    base_url: String,
    authorization_token: Secret<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: String,
    to: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
}

impl ApiMailer {
    pub fn new(
        base_url: String,
        authorization_token: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url,
            authorization_token,
        })
    }
}

#[async_trait]
impl MailTransport for ApiMailer {
    #[tracing::instrument(name = "Sending email through provider API", skip_all)]
    async fn send(
        &self,
        email: &OutboundEmail,
    ) -> Result<(), TransportError> {
        let url = format!("{}/email", self.base_url.trim_end_matches('/'));
        let body = SendEmailRequest {
            from: format!("{} <{}>", email.sender_name, email.sender),
            to: email.recipient.as_ref(),
            reply_to: email.reply_to.as_deref(),
            subject: &email.subject,
            html_body: &email.html_body,
            text_body: &email.text_body,
        };

        let resp = self
            .http_client
            .post(&url)
            .header(
                "X-Postmark-Server-Token",
                self.authorization_token.expose_secret(),
            )
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            // provider error bodies explain the rejection (bad sender signature,
            // inactive recipient, ...) and are worth keeping for the logs
            let detail = resp.text().await.unwrap_or_default();
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(())
    }
}
