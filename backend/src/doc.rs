//! OpenAPI documentation configuration.
//!
//! Defines [`ApiDoc`], the generated OpenAPI specification for the route
//! surface: timelines, accounts, follows, messages, and health probes. The
//! document is served by Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::accounts::{LoginForm, RegisterForm};
use crate::inbound::http::messages::AddMessageForm;
use crate::inbound::http::schemas::{MessageDto, TimelinePage, UserTimelinePage};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /login.",
            ))),
        );
    }
}

/// OpenAPI document for the microblog API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Chirp API",
        description = "Minimal microblog: timelines, follows, messages, accounts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::timelines::personal_timeline,
        crate::inbound::http::timelines::public_timeline,
        crate::inbound::http::timelines::user_timeline,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::follows::follow_user,
        crate::inbound::http::follows::unfollow_user,
        crate::inbound::http::messages::add_message,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoginForm,
        RegisterForm,
        AddMessageForm,
        MessageDto,
        TimelinePage,
        UserTimelinePage,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use utoipa::OpenApi;

    use super::ApiDoc;

    #[test]
    fn document_includes_the_route_surface() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/",
            "/public",
            "/{username}",
            "/{username}/follow",
            "/{username}/unfollow",
            "/add_message",
            "/login",
            "/register",
            "/logout",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing path {expected} in {paths:?}"
            );
        }
    }
}
