//! Timeline handlers: personal, public, and per-user pages.

use actix_web::{get, web, HttpResponse};

use crate::domain::{Error, Username, FEED_PAGE_SIZE, TIMELINE_PAGE_SIZE};

use super::schemas::{TimelinePage, UserTimelinePage};
use super::session::SessionContext;
use super::state::HttpState;
use super::{redirect_to, ApiResult};

/// Personal timeline: the session user's feed cache.
///
/// Anonymous visitors are redirected to the public timeline, mirroring the
/// classic front-page behaviour.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Personal timeline", body = TimelinePage),
        (status = 302, description = "Anonymous; redirects to /public")
    ),
    tags = ["timelines"],
    operation_id = "personalTimeline",
    security([])
)]
#[get("/")]
pub async fn personal_timeline(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let Some(user_id) = session.user_id()? else {
        return Ok(redirect_to("/public"));
    };
    let entries = state
        .timelines
        .personal_timeline(&user_id, FEED_PAGE_SIZE)
        .await?;
    Ok(HttpResponse::Ok().json(TimelinePage::new(entries)))
}

/// Public timeline: the latest messages of all users.
#[utoipa::path(
    get,
    path = "/public",
    responses(
        (status = 200, description = "Public timeline", body = TimelinePage)
    ),
    tags = ["timelines"],
    operation_id = "publicTimeline",
    security([])
)]
#[get("/public")]
pub async fn public_timeline(state: web::Data<HttpState>) -> ApiResult<web::Json<TimelinePage>> {
    let messages = state.timelines.public_timeline(TIMELINE_PAGE_SIZE).await?;
    Ok(web::Json(TimelinePage::new(messages)))
}

/// One user's messages plus the viewer's follow status.
#[utoipa::path(
    get,
    path = "/{username}",
    params(
        ("username" = String, Path, description = "Page owner's username")
    ),
    responses(
        (status = 200, description = "User timeline", body = UserTimelinePage),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["timelines"],
    operation_id = "userTimeline",
    security([])
)]
#[get("/{username}")]
pub async fn user_timeline(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserTimelinePage>> {
    let raw = path.into_inner();
    let username =
        Username::new(raw.as_str()).map_err(|_| Error::not_found(format!("no such user: {raw}")))?;
    let viewer = session.user_id()?;
    let timeline = state
        .timelines
        .user_timeline(&username, viewer.as_ref(), TIMELINE_PAGE_SIZE)
        .await?;
    Ok(web::Json(timeline.into()))
}
