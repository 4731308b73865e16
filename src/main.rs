use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use redis::Client as RedisClient;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_meals_api::{
    config::Config,
    db,
    middleware::auth::JwtSecret,
    routes,
    services::{assistant::AssistantService, email::EmailService, telegram::TelegramClient},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env()?);

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    let redis_client = RedisClient::open(config.redis_url.as_str())?;
    let redis_conn = redis_client.get_multiplexed_async_connection().await?;
    info!("Redis connected");

    let assistant = Arc::new(AssistantService::new(&config)?);

    let telegram = config
        .telegram_bot_token
        .clone()
        .map(|token| Arc::new(TelegramClient::new(token)));
    if telegram.is_some() {
        info!("Telegram bot configured");
    } else {
        info!("TELEGRAM_BOT_TOKEN not set — Telegram replies disabled");
    }

    let email = EmailService::new(&config).map(Arc::new);
    if email.is_some() {
        info!("SMTP email service configured");
    } else {
        info!("SMTP not configured — email features disabled");
    }

    let state = AppState {
        db: pool,
        redis: redis_conn,
        redis_client: redis_client.clone(),
        config: config.clone(),
        assistant,
        telegram,
        email,
    };

    // Allow the configured app origin plus localhost for development.
    let base_url = config.app_base_url.clone();
    let cors_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        let o = match origin.to_str() {
            Ok(s) => s,
            Err(_) => return false,
        };
        o.starts_with("http://localhost")
            || o.starts_with("http://127.0.0.1")
            || o == base_url
    });

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_origin(cors_origin);

    let jwt_secret = JwtSecret(config.jwt_secret.clone());

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        // Auth
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/me", get(routes::auth::me))
        .route("/auth/change-password", post(routes::auth::change_password))
        .route("/auth/forgot-password", post(routes::auth::forgot_password))
        .route("/auth/reset-password", post(routes::auth::reset_password))
        // Assistant transports
        .route("/assistant/chat", post(routes::assistant::chat))
        .route("/assistant/telegram", post(routes::assistant::telegram_webhook))
        // Students
        .route("/students", get(routes::students::list_students).post(routes::students::create_student))
        .route("/students/{id}", put(routes::students::update_student).delete(routes::students::delete_student))
        // Staff
        .route("/staff", get(routes::staff::list_staff).post(routes::staff::create_staff))
        .route("/staff/{id}", delete(routes::staff::delete_staff))
        // Menus
        .route("/menus", get(routes::menus::list_menus).put(routes::menus::upsert_menu))
        .route("/menus/{id}", delete(routes::menus::delete_menu))
        .route("/menus/templates", get(routes::menus::list_templates).put(routes::menus::upsert_template))
        .route("/menus/templates/{id}", delete(routes::menus::delete_template))
        .route("/schedules", get(routes::menus::list_schedules).put(routes::menus::upsert_schedule))
        // Check-ins
        .route("/checkins", post(routes::checkins::record_checkin))
        .route("/checkins/today", get(routes::checkins::today_checkins))
        .route("/checkins/history", get(routes::checkins::checkin_history))
        .route("/checkins/stats", get(routes::checkins::checkin_stats))
        // Feedback / Student Voice
        .route("/feedback", post(routes::feedback::submit_rating))
        .route("/feedback/voice", get(routes::feedback::voice_feed))
        .route("/feedback/summary", get(routes::feedback::rating_summary))
        .route("/feedback/{id}/like", post(routes::feedback::toggle_like))
        // Announcements
        .route("/announcements", get(routes::announcements::list_announcements).post(routes::announcements::create_announcement))
        .route("/announcements/{id}", delete(routes::announcements::delete_announcement))
        // Knowledge base
        .route("/knowledge", get(routes::knowledge::list_entries).post(routes::knowledge::create_entry))
        .route("/knowledge/{id}", put(routes::knowledge::update_entry).delete(routes::knowledge::delete_entry))
        // Backup
        .route("/backup/full", get(routes::backup::export_all))
        .route("/backup/{table}", get(routes::backup::export_table))
        .layer(axum::Extension(jwt_secret))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("campus-meals API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
