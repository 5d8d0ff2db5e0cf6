//! Arive is the content-managed website and membership portal API of
//! Arive Lab.

#[forbid(unsafe_code)]
#[deny(missing_docs, unused_mut)]
mod content;
mod crypto;
mod database;
pub mod error;
mod guard;
mod notification;
mod router;
mod token;
mod upload;
mod user;

pub mod config;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{Method, header};
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use error::ServerError;
use tower::ServiceBuilder;
use tower_http::LatencyUnit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::sensitive_headers::SetSensitiveHeadersLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};

/// MUST NEVER be used in production.
#[cfg(test)]
pub async fn make_request(
    app: Router,
    method: Method,
    path: &str,
    cookie: Option<&str>,
    content_type: Option<&str>,
    body: String,
) -> axum::http::Response<axum::body::Body> {
    use axum::extract::Request;
    use tower::util::ServiceExt;

    let mut builder = Request::builder().method(method).uri(path).header(
        header::CONTENT_TYPE,
        content_type.unwrap_or("application/json"),
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    app.oneshot(builder.body(axum::body::Body::from(body)).unwrap())
        .await
        .unwrap()
}

/// State sharing between routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Configuration>,
    pub db: database::Database,
    pub users: user::UserService,
    pub notifications: notification::NotificationRepository,
    pub token: token::TokenManager,
}

/// Create router.
pub fn app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        // Add high level tracing/logging to all requests.
        .layer(
            TraceLayer::new_for_http()
                .on_body_chunk(|chunk: &Bytes, latency: Duration, _span: &tracing::Span| {
                    tracing::trace!(size_bytes = chunk.len(), latency = ?latency, "sending body chunk")
                })
                .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                .on_request(DefaultOnRequest::new())
                .on_response(DefaultOnResponse::new().latency_unit(LatencyUnit::Micros)),
        )
        // Set a timeout.
        .layer(TimeoutLayer::new(Duration::from_secs(10)))
        // Remove sensitive headers from trace.
        .layer(SetSensitiveHeadersLayer::new([header::AUTHORIZATION, header::COOKIE]))
        // Add CORS preflight support.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS])
                .allow_headers(Any)
                .vary([header::COOKIE]),
        );

    let uploads_dir = state.config.uploads.directory.clone();

    let api = Router::new()
        // Session and account lifecycle.
        .route("/auth/register", post(router::auth::register::handler))
        .route("/auth/login", post(router::auth::login::handler))
        .route("/auth/logout", post(router::auth::logout::handler))
        .route("/auth/me", get(router::auth::me::handler))
        // Singleton site content.
        .route(
            "/about",
            get(router::about::get_handler).put(router::about::update_handler),
        )
        .route(
            "/homepage",
            get(router::homepage::get_handler)
                .put(router::homepage::update_handler),
        )
        .route(
            "/contact-info",
            get(router::contact::get_info_handler)
                .put(router::contact::update_info_handler),
        )
        // Public contact form.
        .route("/contact", post(router::contact::submit_handler))
        // Ordered site content.
        .route(
            "/categories",
            get(router::categories::list_handler)
                .post(router::categories::create_handler),
        )
        .route(
            "/categories/{id}",
            put(router::categories::update_handler)
                .delete(router::categories::delete_handler),
        )
        .route(
            "/core-values",
            get(router::core_values::list_handler)
                .post(router::core_values::create_handler),
        )
        .route(
            "/core-values/{id}",
            put(router::core_values::update_handler)
                .delete(router::core_values::delete_handler),
        )
        .route(
            "/social-links",
            get(router::social_links::list_handler)
                .post(router::social_links::create_handler),
        )
        .route(
            "/social-links/{id}",
            put(router::social_links::update_handler)
                .delete(router::social_links::delete_handler),
        )
        .route(
            "/team-members",
            get(router::team_members::list_handler)
                .post(router::team_members::create_handler),
        )
        .route(
            "/team-members/{id}",
            put(router::team_members::update_handler)
                .delete(router::team_members::delete_handler),
        )
        .route(
            "/timeline-milestones",
            get(router::milestones::list_handler)
                .post(router::milestones::create_handler),
        )
        .route(
            "/timeline-milestones/{id}",
            put(router::milestones::update_handler)
                .delete(router::milestones::delete_handler),
        )
        // Research and projects, with their dashboard counterparts.
        .route(
            "/research",
            get(router::research::list_handler)
                .post(router::research::create_handler),
        )
        .route(
            "/dashboard/research/{id}",
            get(router::research::get_handler)
                .put(router::research::update_handler)
                .delete(router::research::delete_handler),
        )
        .route(
            "/projects",
            get(router::projects::list_handler)
                .post(router::projects::create_handler),
        )
        .route(
            "/dashboard/projects/{id}",
            get(router::projects::get_handler)
                .put(router::projects::update_handler)
                .delete(router::projects::delete_handler),
        )
        // Uploads.
        .route("/upload/image", post(router::upload::handler))
        // Admin dashboard.
        .route(
            "/admin/notifications",
            get(router::admin::notifications::list_handler)
                .patch(router::admin::notifications::mark_read_handler),
        )
        .route(
            "/admin/registrations",
            get(router::admin::registrations::list_handler),
        )
        .route(
            "/admin/registrations/{user_id}",
            delete(router::admin::registrations::delete_handler),
        )
        .route("/admin/users", get(router::admin::users::list_handler))
        .route(
            "/admin/users/{user_id}/{action}",
            patch(router::admin::users::action_handler),
        )
        .route(
            "/admin/contact-submissions",
            get(router::contact::list_submissions_handler),
        );

    Router::new()
        // `GET /status.json` goes to `status`.
        .route("/status.json", get(router::status::status))
        .nest("/api", api)
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .with_state(state)
        .layer(middleware)
}

/// Initialize the application state.
pub async fn initialize_state() -> Result<AppState, Box<dyn std::error::Error>>
{
    // read configuration file. let it in memory.
    let config = config::Configuration::default().read()?;

    let db = match config.postgres {
        Some(ref config) => {
            database::Database::new(
                &config.address,
                &config
                    .username
                    .clone()
                    .unwrap_or(database::DEFAULT_CREDENTIALS.into()),
                &config
                    .password
                    .clone()
                    .unwrap_or(database::DEFAULT_CREDENTIALS.into()),
                &config
                    .database
                    .clone()
                    .unwrap_or(database::DEFAULT_DATABASE_NAME.into()),
                config.pool_size.unwrap_or(database::DEFAULT_POOL_SIZE),
            )
            .await?
        },
        None => {
            tracing::error!("missing `postgres` entry on `config.yaml` file");
            std::process::exit(0);
        },
    };

    // execute migrations scripts on start.
    sqlx::migrate!().run(&db.postgres).await?;

    let pwd = crypto::PasswordManager::new(config.argon2.clone())?;

    // handle session tokens.
    let Some(token_config) = &config.token else {
        tracing::warn!("missing `token` entry on `config.yaml` file");
        std::process::exit(0);
    };
    let mut token = token::TokenManager::new(&config.url, &token_config.secret);
    if let Some(audience) = &token_config.audience {
        token.audience(audience);
    }

    let users = user::UserService::new(db.postgres.clone(), pwd);
    let notifications =
        notification::NotificationRepository::new(db.postgres.clone());

    Ok(AppState {
        config,
        db,
        users,
        notifications,
        token,
    })
}
