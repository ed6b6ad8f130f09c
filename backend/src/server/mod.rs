//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
use state_builders::{build_app_state, AppState};

use actix_session::{
    config::CookieContentSecurity, storage::CookieSessionStore, SessionMiddleware,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};

use chirp::inbound::http::accounts::{login, logout, register};
use chirp::inbound::http::follows::{follow_user, unfollow_user};
use chirp::inbound::http::health::{live, ready, HealthState};
use chirp::inbound::http::messages::add_message;
use chirp::inbound::http::state::HttpState;
use chirp::inbound::http::timelines::{personal_timeline, public_timeline, user_timeline};
use chirp::Trace;
#[cfg(debug_assertions)]
use chirp::ApiDoc;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Build, bind, and start the HTTP server plus its fan-out worker.
pub fn run(config: ServerConfig) -> std::io::Result<Server> {
    let AppState {
        http_state,
        worker,
        deliveries,
    } = build_app_state(&config);
    tokio::spawn(async move { worker.run(deliveries).await });

    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();
    let state = web::Data::new(http_state);
    let key = config.key.clone();
    let cookie_secure = config.cookie_secure;
    let same_site = config.same_site;

    let server = HttpServer::new(move || {
        build_app(
            state.clone(),
            server_health_state.clone(),
            key.clone(),
            cookie_secure,
            same_site,
        )
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    Ok(server.run())
}

fn build_app(
    state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(same_site)
        .cookie_content_security(CookieContentSecurity::Private)
        .build();

    // Fixed paths register before the `/{username}` wildcard so they win.
    let routes = web::scope("")
        .wrap(session)
        .service(personal_timeline)
        .service(public_timeline)
        .service(login)
        .service(register)
        .service(logout)
        .service(add_message)
        .service(follow_user)
        .service(unfollow_user)
        .service(user_timeline);

    #[allow(unused_mut)]
    let mut app = App::new()
        .app_data(state)
        .app_data(health_state)
        .wrap(Trace)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    {
        app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    app.service(routes)
}
