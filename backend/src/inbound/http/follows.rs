//! Follow and unfollow handlers.
//!
//! These are GET endpoints with side effects, preserved from the original
//! route surface; both redirect back to the profile page they acted on.

use actix_web::{get, web, HttpResponse};

use crate::domain::{Error, Username};

use super::session::SessionContext;
use super::state::HttpState;
use super::{redirect_to, ApiResult};

fn parse_username(raw: &str) -> Result<Username, Error> {
    Username::new(raw).map_err(|_| Error::not_found(format!("no such user: {raw}")))
}

/// Make the session user follow `username`.
#[utoipa::path(
    get,
    path = "/{username}/follow",
    params(
        ("username" = String, Path, description = "User to follow")
    ),
    responses(
        (status = 302, description = "Edge created; redirects to the profile"),
        (status = 400, description = "Cannot follow yourself", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "No such user", body = Error),
        (status = 409, description = "Already following", body = Error)
    ),
    tags = ["follows"],
    operation_id = "followUser"
)]
#[get("/{username}/follow")]
pub async fn follow_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let username = parse_username(&path.into_inner())?;
    let followed = state.timelines.follow(&user_id, &username).await?;
    Ok(redirect_to(&format!("/{followed}")))
}

/// Make the session user stop following `username`.
#[utoipa::path(
    get,
    path = "/{username}/unfollow",
    params(
        ("username" = String, Path, description = "User to unfollow")
    ),
    responses(
        (status = 302, description = "Edge removed; redirects to the profile"),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "No such user or not following", body = Error)
    ),
    tags = ["follows"],
    operation_id = "unfollowUser"
)]
#[get("/{username}/unfollow")]
pub async fn unfollow_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let username = parse_username(&path.into_inner())?;
    let unfollowed = state.timelines.unfollow(&user_id, &username).await?;
    Ok(redirect_to(&format!("/{unfollowed}")))
}
