//! Signup route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, Json, extract::State};

use crate::error::{AppError, Result};
use crate::models::Account;
use crate::state::AppState;
use crate::validation::{self, SignupForm};

/// Plain-text greeting at the root.
pub async fn home() -> &'static str {
    "Welcome to Pronto Pizza!"
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "signup.html")]
pub struct SignupTemplate;

/// Display the signup form.
pub async fn signup_page() -> SignupTemplate {
    SignupTemplate
}

/// Handle signup form submission.
///
/// Stages run strictly in order: validate, duplicate pre-check, hash,
/// persist. Validation failures and duplicates reject the request before any
/// account is written; the created account is returned as JSON and never
/// includes the password hash.
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Json<Account>> {
    let valid = validation::validate_signup(&form).map_err(AppError::Validation)?;

    tracing::debug!(email = %valid.email, "signup requested");

    let account = state.signup().register(valid.email, valid.password).await?;

    tracing::info!(account_id = %account.id, "account created");

    Ok(Json(account))
}
