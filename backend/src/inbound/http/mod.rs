//! HTTP inbound adapter exposing the microblog route surface.

use actix_web::{http::header, HttpResponse};

pub mod accounts;
pub mod error;
pub mod follows;
pub mod health;
pub mod messages;
pub mod schemas;
pub mod session;
pub mod state;
pub mod test_utils;
pub mod timelines;

pub use error::ApiResult;

/// `302 Found` pointing the browser at `path`, the post-action convention
/// across this surface.
pub(crate) fn redirect_to(path: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, path))
        .finish()
}
