use std::fmt::Debug;

use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::web;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::ResponseError;
use serde::Serialize;

use crate::domain::ContactForm;
use crate::domain::FieldError;
use crate::email_client::TransportError;
use crate::relay::ContactRelay;
use crate::relay::RelayError;
use crate::utils::error_chain_fmt;

/// Every response from `/api/contact` has this shape, success or not.
#[derive(Serialize)]
struct ContactResponse {
    msg: String,
}

#[derive(thiserror::Error)]
pub enum ContactError {
    #[error("invalid submission")]
    InvalidInput(#[source] FieldError),
    #[error("Invalid request body")]
    MalformedBody(#[source] JsonPayloadError),
    #[error("could not deliver contact message")]
    DeliveryFailed(#[source] TransportError),
}

impl Debug for ContactError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<RelayError> for ContactError {
    fn from(e: RelayError) -> Self {
        match e {
            RelayError::Validation(e) => Self::InvalidInput(e),
            RelayError::Delivery(e) => Self::DeliveryFailed(e),
        }
    }
}

impl ContactError {
    /// What the browser is told. Transport details stay in the logs.
    fn client_message(&self) -> String {
        match self {
            Self::InvalidInput(e) => e.client_message(),
            Self::MalformedBody(_) => "Invalid request body".to_string(),
            Self::DeliveryFailed(_) => "Server error".to_string(),
        }
    }
}

impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::DeliveryFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ContactResponse {
            msg: self.client_message(),
        })
    }
}

/// Registered with `web::JsonConfig` so that unparseable bodies get the same
/// JSON error shape as every other failure.
pub fn json_error_handler(
    err: JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    ContactError::MalformedBody(err).into()
}

/// `POST /api/contact`
///
/// # Request example
///
/// ```sh
///     curl -i -H 'Content-Type: application/json' \
///         -d '{"name":"Alice","email":"alice@example.com","message":"Hello"}' \
///         http://127.0.0.1:5000/api/contact
/// ```
///
/// Responds 200 once the transport has accepted the message, 400 if a field
/// is missing or invalid (nothing is sent), 500 if delivery failed.
#[tracing::instrument(
    name = "Handling contact form submission",
    skip(form, relay),
    fields(
        sender_name = %form.name.as_deref().unwrap_or_default(),
        sender_email = %form.email.as_deref().unwrap_or_default(),
    )
)]
pub async fn contact(
    form: web::Json<ContactForm>,
    relay: web::Data<ContactRelay>,
) -> Result<HttpResponse, ContactError> {
    relay.submit(form.into_inner()).await.map_err(|e| {
        if let RelayError::Validation(ref reason) = e {
            tracing::warn!(%reason, "rejected contact submission");
        }
        ContactError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(ContactResponse {
        msg: "Email sent successfully".to_string(),
    }))
}
