use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use shared::{
    CreateMenuItemRequest, DeleteReceiptsRequest, ReceiptListRequest, SaveReceiptRequest,
    UpdateProfileRequest, UpdateReceiptStatusRequest,
};
use tracing::info;

use crate::domain::{MenuService, ProfileService, ReceiptService, ValidationError};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub receipt_service: ReceiptService,
    pub profile_service: ProfileService,
    pub menu_service: MenuService,
}

impl AppState {
    pub fn new(
        receipt_service: ReceiptService,
        profile_service: ProfileService,
        menu_service: MenuService,
    ) -> Self {
        Self {
            receipt_service,
            profile_service,
            menu_service,
        }
    }
}

/// Map a service failure to a response: request problems become 400, store
/// failures become 500.
fn error_response(context: &str, error: anyhow::Error) -> axum::response::Response {
    if error.downcast_ref::<ValidationError>().is_some() {
        (StatusCode::BAD_REQUEST, error.to_string()).into_response()
    } else {
        tracing::error!("{}: {:?}", context, error);
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{} failed", context)).into_response()
    }
}

/// Query parameters for the receipt list endpoint
#[derive(Deserialize, Debug)]
pub struct ReceiptListQuery {
    pub after: Option<String>,
    pub limit: Option<u32>,
}

/// POST /api/receipts/:vendor_id
pub async fn save_receipt(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
    Json(request): Json<SaveReceiptRequest>,
) -> impl IntoResponse {
    info!("POST /api/receipts/{} - {} item(s)", vendor_id, request.items.len());

    match state.receipt_service.save_receipt(&vendor_id, request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => error_response("Saving receipt", e),
    }
}

/// GET /api/receipts/:vendor_id
pub async fn list_receipts(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
    Query(query): Query<ReceiptListQuery>,
) -> impl IntoResponse {
    info!("GET /api/receipts/{} - query: {:?}", vendor_id, query);

    let request = ReceiptListRequest {
        after: query.after,
        limit: query.limit,
    };

    match state.receipt_service.list_receipts(&vendor_id, request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("Listing receipts", e),
    }
}

/// GET /api/receipts/:vendor_id/:id
pub async fn get_receipt(
    State(state): State<AppState>,
    Path((vendor_id, id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("GET /api/receipts/{}/{}", vendor_id, id);

    match state.receipt_service.get_receipt(&vendor_id, &id).await {
        Ok(Some(receipt)) => (StatusCode::OK, Json(receipt)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Receipt not found").into_response(),
        Err(e) => error_response("Retrieving receipt", e),
    }
}

/// PUT /api/receipts/:vendor_id/:id/status
pub async fn update_receipt_status(
    State(state): State<AppState>,
    Path((vendor_id, id)): Path<(String, String)>,
    Json(request): Json<UpdateReceiptStatusRequest>,
) -> impl IntoResponse {
    info!("PUT /api/receipts/{}/{}/status -> {}", vendor_id, id, request.status.as_str());

    match state.receipt_service.update_status(&vendor_id, &id, request.status).await {
        Ok(Some(response)) => (StatusCode::OK, Json(response)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Receipt not found").into_response(),
        Err(e) => error_response("Updating receipt status", e),
    }
}

/// DELETE /api/receipts/:vendor_id
pub async fn delete_receipts(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
    Json(request): Json<DeleteReceiptsRequest>,
) -> impl IntoResponse {
    info!("DELETE /api/receipts/{} - {} id(s)", vendor_id, request.receipt_ids.len());

    match state.receipt_service.delete_receipts(&vendor_id, request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("Deleting receipts", e),
    }
}

/// GET /api/analytics/:vendor_id/summary
pub async fn sales_summary(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/analytics/{}/summary", vendor_id);

    match state.receipt_service.sales_summary(&vendor_id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("Computing sales summary", e),
    }
}

/// GET /api/profile/:vendor_id
pub async fn get_profile(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/profile/{}", vendor_id);

    match state.profile_service.get_profile(&vendor_id).await {
        Ok(Some(profile)) => (StatusCode::OK, Json(profile)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Profile not found").into_response(),
        Err(e) => error_response("Retrieving profile", e),
    }
}

/// PUT /api/profile/:vendor_id
pub async fn upsert_profile(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
    Json(request): Json<UpdateProfileRequest>,
) -> impl IntoResponse {
    info!("PUT /api/profile/{} - business: {}", vendor_id, request.business_name);

    match state.profile_service.upsert_profile(&vendor_id, request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("Saving profile", e),
    }
}

/// GET /api/menu/:vendor_id
pub async fn list_menu_items(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/menu/{}", vendor_id);

    match state.menu_service.list_items(&vendor_id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("Listing menu items", e),
    }
}

/// POST /api/menu/:vendor_id
pub async fn create_menu_item(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
    Json(request): Json<CreateMenuItemRequest>,
) -> impl IntoResponse {
    info!("POST /api/menu/{} - item: {}", vendor_id, request.name);

    match state.menu_service.create_item(&vendor_id, request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => error_response("Creating menu item", e),
    }
}

/// DELETE /api/menu/:vendor_id/:item_id
pub async fn delete_menu_item(
    State(state): State<AppState>,
    Path((vendor_id, item_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/menu/{}/{}", vendor_id, item_id);

    match state.menu_service.delete_item(&vendor_id, &item_id).await {
        Ok(true) => (StatusCode::OK, "Menu item deleted").into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Menu item not found").into_response(),
        Err(e) => error_response("Deleting menu item", e),
    }
}

/// GET /api/public/menu/:slug - unauthenticated
pub async fn public_menu(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/public/menu/{}", slug);

    match state.menu_service.public_menu(&slug).await {
        Ok(Some(response)) => (StatusCode::OK, Json(response)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Menu not found").into_response(),
        Err(e) => error_response("Resolving public menu", e),
    }
}

/// Log line forwarded from the frontend logger
#[derive(Debug, Deserialize)]
pub struct FrontendLogRequest {
    pub level: String,
    pub message: String,
    pub component: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FrontendLogResponse {
    pub success: bool,
}

/// POST /api/logs - sink for frontend diagnostics
pub async fn frontend_log(Json(request): Json<FrontendLogRequest>) -> impl IntoResponse {
    let component = request.component.as_deref().unwrap_or("frontend");
    match request.level.as_str() {
        "error" => tracing::error!("[{}] {}", component, request.message),
        "warn" => tracing::warn!("[{}] {}", component, request.message),
        "debug" => tracing::debug!("[{}] {}", component, request.message),
        _ => info!("[{}] {}", component, request.message),
    }
    (StatusCode::OK, Json(FrontendLogResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use axum::response::Response;
    use shared::{LineItem, PresentationSettings, ReceiptStatus};

    async fn setup_test_state() -> AppState {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        AppState::new(
            ReceiptService::new(db.clone()),
            ProfileService::new(db.clone()),
            MenuService::new(db),
        )
    }

    fn sample_request() -> SaveReceiptRequest {
        SaveReceiptRequest {
            receipt_number: None,
            date: None,
            customer_name: Some("Ada".to_string()),
            status: ReceiptStatus::Paid,
            items: vec![LineItem {
                id: LineItem::generate_id(1, 0),
                name: "Jollof rice".to_string(),
                quantity: 2,
                unit_price: "1,500".into(),
            }],
            shipping_fee: None,
            discount_amount: None,
        }
    }

    #[tokio::test]
    async fn test_save_and_get_receipt_handlers() {
        let state = setup_test_state().await;

        let response: Response =
            save_receipt(State(state.clone()), Path("vendor::1".to_string()), Json(sample_request()))
                .await
                .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let list: Response = list_receipts(
            State(state.clone()),
            Path("vendor::1".to_string()),
            Query(ReceiptListQuery { after: None, limit: Some(10) }),
        )
        .await
        .into_response();
        assert_eq!(list.status(), StatusCode::OK);

        let missing: Response = get_receipt(
            State(state),
            Path(("vendor::1".to_string(), "receipt::0".to_string())),
        )
        .await
        .into_response();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bad_cursor_maps_to_bad_request() {
        let state = setup_test_state().await;

        let response: Response = list_receipts(
            State(state),
            Path("vendor::1".to_string()),
            Query(ReceiptListQuery { after: Some("garbage".to_string()), limit: None }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_profile_validation_maps_to_bad_request() {
        let state = setup_test_state().await;

        let response: Response = upsert_profile(
            State(state),
            Path("vendor::1".to_string()),
            Json(UpdateProfileRequest {
                business_name: "  ".to_string(),
                phone: None,
                tagline: None,
                footer_message: None,
                slug: None,
                settings: PresentationSettings::default(),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_public_menu_handler() {
        let state = setup_test_state().await;

        state
            .profile_service
            .upsert_profile(
                "vendor::1",
                UpdateProfileRequest {
                    business_name: "Mama K Kitchen".to_string(),
                    phone: None,
                    tagline: None,
                    footer_message: None,
                    slug: Some("mama-k".to_string()),
                    settings: PresentationSettings::default(),
                },
            )
            .await
            .unwrap();

        let found: Response = public_menu(State(state.clone()), Path("mama-k".to_string()))
            .await
            .into_response();
        assert_eq!(found.status(), StatusCode::OK);

        let missing: Response = public_menu(State(state), Path("nobody".to_string()))
            .await
            .into_response();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_frontend_log_handler() {
        let response: Response = frontend_log(Json(FrontendLogRequest {
            level: "info".to_string(),
            message: "preview rendered".to_string(),
            component: Some("receipt_preview".to_string()),
        }))
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
