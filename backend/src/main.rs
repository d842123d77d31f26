use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, Level};

mod db;
mod domain;
mod rest;

use domain::{MenuService, ProfileService, ReceiptService};
use rest::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Setting up database");
    let db = db::DbConnection::init().await?;

    let state = AppState::new(
        ReceiptService::new(db.clone()),
        ProfileService::new(db.clone()),
        MenuService::new(db),
    );

    // CORS setup to allow the dev frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/receipts/:vendor_id",
            post(rest::save_receipt)
                .get(rest::list_receipts)
                .delete(rest::delete_receipts),
        )
        .route("/receipts/:vendor_id/:id", get(rest::get_receipt))
        .route("/receipts/:vendor_id/:id/status", put(rest::update_receipt_status))
        .route("/analytics/:vendor_id/summary", get(rest::sales_summary))
        .route("/profile/:vendor_id", get(rest::get_profile).put(rest::upsert_profile))
        .route("/menu/:vendor_id", get(rest::list_menu_items).post(rest::create_menu_item))
        .route("/menu/:vendor_id/:item_id", delete(rest::delete_menu_item))
        .route("/public/menu/:slug", get(rest::public_menu))
        .route("/logs", post(rest::frontend_log));

    let app = Router::new()
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(PathBuf::from("../frontend/dist")))
        .layer(cors)
        .with_state(state);

    let addr = std::env::var("RECEIPT_STUDIO_ADDR")
        .ok()
        .and_then(|v| v.parse::<SocketAddr>().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
