//! Message posting handler.

use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::Error;

use super::session::SessionContext;
use super::state::HttpState;
use super::{redirect_to, ApiResult};

/// Form body for `POST /add_message`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddMessageForm {
    /// Message body.
    pub text: String,
}

/// Post a new message as the session user.
///
/// The response returns as soon as the message is durable; feed fan-out
/// happens asynchronously behind it.
#[utoipa::path(
    post,
    path = "/add_message",
    request_body(content = AddMessageForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Message recorded; redirects to the personal timeline"),
        (status = 400, description = "Invalid message text", body = Error),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["messages"],
    operation_id = "addMessage"
)]
#[post("/add_message")]
pub async fn add_message(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<AddMessageForm>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let author = state
        .accounts
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| Error::unauthorized("login required"))?;
    state.timelines.post_message(&author, &form.text).await?;
    Ok(redirect_to("/"))
}
