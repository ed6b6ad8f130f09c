//! Account handlers: register, login, logout.
//!
//! These preserve the classic form-post surface: bodies are URL-encoded
//! forms, and successful mutations answer with a `302` redirect to the page
//! the browser should land on next.

use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    CredentialsValidationError, Error, LoginCredentials, RegistrationRequest,
    RegistrationValidationError, UserValidationError,
};

use super::session::SessionContext;
use super::state::HttpState;
use super::{redirect_to, ApiResult};

/// Login form body for `POST /login`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginForm {
    /// Login name.
    pub username: String,
    /// Plaintext password, hashed-and-forgotten server side.
    pub password: String,
}

/// Registration form body for `POST /register`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterForm {
    /// Requested login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Password confirmation; must match `password`.
    pub password2: String,
}

fn map_credentials_validation(err: CredentialsValidationError) -> Error {
    let (field, code) = match err {
        CredentialsValidationError::EmptyUsername => ("username", "empty_username"),
        CredentialsValidationError::EmptyPassword => ("password", "empty_password"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

fn user_validation_code(err: &UserValidationError) -> &'static str {
    match err {
        UserValidationError::EmptyUsername => "empty_username",
        UserValidationError::UsernameTooLong { .. } => "username_too_long",
        UserValidationError::UsernameInvalidCharacters => "username_invalid_characters",
        UserValidationError::EmptyEmail => "empty_email",
        UserValidationError::EmailMissingAt => "email_missing_at",
    }
}

fn map_registration_validation(err: RegistrationValidationError) -> Error {
    let (field, code) = match &err {
        RegistrationValidationError::InvalidUsername(inner) => {
            ("username", user_validation_code(inner))
        }
        RegistrationValidationError::InvalidEmail(inner) => ("email", user_validation_code(inner)),
        RegistrationValidationError::EmptyPassword => ("password", "empty_password"),
        RegistrationValidationError::PasswordMismatch => ("password2", "password_mismatch"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Authenticate and establish a session.
///
/// An unknown username answers 404 and a wrong password 401, matching the
/// store semantics rather than collapsing both into one error.
#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Logged in; redirects to the personal timeline"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid password", body = Error),
        (status = 404, description = "Unknown username", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from_parts(&form.username, &form.password)
        .map_err(map_credentials_validation)?;
    let user = state.accounts.authenticate(&credentials).await?;
    session.persist_user(user.id())?;
    Ok(redirect_to("/"))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/register",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Registered; redirects to the login page"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username already taken", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    form: web::Form<RegisterForm>,
) -> ApiResult<HttpResponse> {
    let request = RegistrationRequest::try_from_parts(
        &form.username,
        &form.email,
        &form.password,
        &form.password2,
    )
    .map_err(map_registration_validation)?;
    state.accounts.register(request).await?;
    Ok(redirect_to("/login"))
}

/// Clear the session.
#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 302, description = "Logged out; redirects to the public timeline")
    ),
    tags = ["accounts"],
    operation_id = "logout",
    security([])
)]
#[get("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    redirect_to("/public")
}
