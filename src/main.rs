use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod migrator;
mod models;
mod oauth;
mod routes;
mod tokens;
mod utils;

use config::Config;
use oauth::FacebookClient;
use tokens::{ConsumedTokens, TokenService};

pub struct AppState {
    pub db: DatabaseConnection,
    pub env: Config,
    pub tokens: TokenService,
    pub consumed: ConsumedTokens,
    pub facebook: Option<FacebookClient>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let env = Config::init();

    let db = Database::connect(&env.database_url)
        .await
        .expect("failed to connect to the database");
    migrator::Migrator::up(&db, None)
        .await
        .expect("failed to run database migrations");

    let facebook = FacebookClient::from_config(&env);
    if facebook.is_none() {
        tracing::warn!("facebook oauth is not configured, federated login disabled");
    }

    let state = Arc::new(AppState {
        tokens: TokenService::new(&env),
        consumed: ConsumedTokens::default(),
        db,
        env,
        facebook,
    });

    let user_routes = Router::new()
        .route("/api/user/check", get(routes::user::get_check))
        .route(
            "/api/user/verify",
            get(routes::user::get_verify).post(routes::user::post_verify),
        )
        .route(
            "/api/user/delete",
            get(routes::user::get_delete).post(routes::user::post_delete),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            routes::middlewares::auth::auth,
        ));

    let public_routes = Router::new()
        .route("/api/auth/register", post(routes::auth::post_register))
        .route("/api/auth/login", post(routes::auth::post_login))
        .route("/api/auth/logout", get(routes::auth::get_logout))
        .route("/api/auth/forget", post(routes::auth::post_forget))
        .route("/api/auth/reset", post(routes::auth::post_reset))
        .route("/api/oauth/facebook", get(routes::oauth::get_facebook))
        .route(
            "/api/oauth/facebook/callback",
            get(routes::oauth::get_facebook_callback),
        )
        .route("/api/status", get(routes::status::get_status));

    let addr = format!("{}:{}", state.env.server_address, state.env.server_port);

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", routes::ApiDoc::openapi()))
        .merge(public_routes)
        .merge(user_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("listening on: {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind server address");
    axum::serve(listener, app)
        .await
        .expect("server error");
}
