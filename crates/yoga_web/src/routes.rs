//! HTTP handlers for the registration form.
//!
//! # Responsibility
//! - Serve the static form and payment pages.
//! - Translate form posts into registration decisions.
//! - Answer with a redirect to the payment page or a plain-text error.

use crate::store::Store;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use log::error;
use serde::Deserialize;
use std::sync::Arc;
use yoga_core::service::registration_service::{
    ALREADY_REGISTERED_MESSAGE, BATCH_CHANGE_TOO_SOON_MESSAGE, INSERT_FAILED_MESSAGE,
    INVALID_INPUT_MESSAGE,
};
use yoga_core::{NewParticipant, RegistrationError, RegistrationOutcome};

pub const FORM_PATH: &str = "/";
pub const SUBMIT_PATH: &str = "/submit";
pub const PAYMENT_PATH: &str = "/payment";

const FORM_HTML: &str = include_str!("../static/form.html");
const PAYMENT_HTML: &str = include_str!("../static/payment.html");

/// Builds the router over a shared store.
pub fn router(store: Arc<Store>) -> Router {
    Router::new()
        .route(FORM_PATH, get(form_page))
        .route(SUBMIT_PATH, post(submit))
        .route(PAYMENT_PATH, get(payment_page))
        .with_state(store)
}

/// Raw form fields. Missing fields deserialize as empty strings so they are
/// answered with the same plain-text message as other invalid input.
#[derive(Debug, Default, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub batch: String,
}

impl RegistrationForm {
    fn into_submission(self) -> Result<NewParticipant, SubmitError> {
        let age = self
            .age
            .trim()
            .parse::<i64>()
            .map_err(|_| SubmitError::InvalidAge)?;
        Ok(NewParticipant::new(self.name, age, self.batch))
    }
}

/// Every way a submission can end other than a redirect.
#[derive(Debug)]
pub enum SubmitError {
    InvalidAge,
    /// Business-rule rejection with its plain-text message.
    Rejected(&'static str),
    Registration(RegistrationError),
    Internal(String),
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::InvalidAge => (StatusCode::BAD_REQUEST, INVALID_INPUT_MESSAGE),
            Self::Rejected(message) => (StatusCode::CONFLICT, *message),
            Self::Registration(err @ RegistrationError::InvalidInput(_)) => {
                (StatusCode::BAD_REQUEST, err.user_message())
            }
            Self::Registration(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.user_message()),
            Self::Internal(details) => {
                error!("event=submit module=web status=error error_code=task_failed error={details}");
                (StatusCode::INTERNAL_SERVER_ERROR, INSERT_FAILED_MESSAGE)
            }
        };
        (status, message).into_response()
    }
}

async fn form_page() -> Html<&'static str> {
    Html(FORM_HTML)
}

async fn payment_page() -> Html<&'static str> {
    Html(PAYMENT_HTML)
}

async fn submit(
    State(store): State<Arc<Store>>,
    Form(form): Form<RegistrationForm>,
) -> Result<Redirect, SubmitError> {
    let submission = form.into_submission()?;

    let outcome = tokio::task::spawn_blocking(move || store.register(&submission))
        .await
        .map_err(|err| SubmitError::Internal(err.to_string()))?
        .map_err(SubmitError::Registration)?;

    match outcome {
        RegistrationOutcome::Registered(_) => Ok(Redirect::to(PAYMENT_PATH)),
        RegistrationOutcome::AlreadyRegistered => {
            Err(SubmitError::Rejected(ALREADY_REGISTERED_MESSAGE))
        }
        RegistrationOutcome::BatchChangeTooSoon { .. } => {
            Err(SubmitError::Rejected(BATCH_CHANGE_TOO_SOON_MESSAGE))
        }
    }
}
