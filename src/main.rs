use std::net::SocketAddr;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post, put};
use axum::Router;
use learnhub::config::AppConfig;
use learnhub::{db, routes, AppState};
use mimalloc::MiMalloc;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Upper bound for request bodies, sized for roster CSV uploads.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "learnhub=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env()?;

    let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
    db::run_migrations(&pool).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(host = %addr, "Starting LearnHub API server");

    let state = AppState {
        db: pool,
        config: config.clone(),
    };

    let cors = match config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => {
            tracing::warn!(url = %config.frontend_url, "Invalid FRONTEND_URL, allowing any origin");
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    let auth_routes = Router::new()
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/refresh", post(routes::auth::refresh))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/users", post(routes::auth::create_user))
        .route("/auth/users/import", post(routes::auth::import_users))
        .route("/auth/me", get(routes::auth::me));

    let course_routes = Router::new()
        .route(
            "/courses",
            get(routes::courses::list).post(routes::courses::create),
        )
        .route(
            "/courses/{id}",
            get(routes::courses::get_by_id).put(routes::courses::update),
        )
        .route("/courses/{id}/lessons", get(routes::courses::list_lessons))
        .route(
            "/courses/{id}/enrollments",
            get(routes::courses::list_enrollments),
        )
        .route(
            "/courses/{id}/subscriptions",
            get(routes::courses::list_subscriptions),
        );

    let lesson_routes = Router::new()
        .route("/lessons", post(routes::lessons::create))
        .route(
            "/lessons/{id}",
            get(routes::lessons::get_by_id).put(routes::lessons::update),
        )
        .route(
            "/lessons/{id}/contents",
            get(routes::lessons::list_contents).post(routes::lessons::add_content),
        )
        .route(
            "/lessons/{id}/assignments",
            get(routes::lessons::list_assignments),
        )
        .route("/contents/{id}", put(routes::lessons::update_content));

    let assignment_routes = Router::new()
        .route("/assignments", post(routes::assignments::create))
        .route(
            "/assignments/{id}",
            get(routes::assignments::get_by_id).put(routes::assignments::update),
        )
        .route(
            "/assignments/{id}/submissions",
            get(routes::assignments::list_submissions).post(routes::assignments::submit),
        )
        .route(
            "/submissions/{id}",
            get(routes::assignments::get_submission).put(routes::assignments::update_submission),
        )
        .route(
            "/submissions/{id}/grade",
            put(routes::assignments::grade),
        );

    let enrollment_routes = Router::new()
        .route("/enrollments", post(routes::enrollments::create))
        .route("/enrollments/mine", get(routes::enrollments::list_mine));

    let subscription_routes = Router::new()
        .route("/subscriptions", post(routes::subscriptions::create))
        .route(
            "/subscriptions/{id}",
            put(routes::subscriptions::update_status),
        )
        .route("/subscriptions/mine", get(routes::subscriptions::list_mine));

    let dashboard_routes = Router::new().route("/dashboard/stats", get(routes::dashboard::stats));

    let app = Router::new()
        .route("/health/live", get(routes::health::live))
        .route("/health/ready", get(routes::health::ready))
        .nest("/api/v1", auth_routes)
        .nest("/api/v1", course_routes)
        .nest("/api/v1", lesson_routes)
        .nest("/api/v1", assignment_routes)
        .nest("/api/v1", enrollment_routes)
        .nest("/api/v1", subscription_routes)
        .nest("/api/v1", dashboard_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
                .layer(cors)
                .layer(CompressionLayer::new()),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
