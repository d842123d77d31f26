use gloo::net::http::Request;
use shared::{
    BusinessProfile, CreateMenuItemRequest, DeleteReceiptsRequest, DeleteReceiptsResponse,
    MenuItemResponse, MenuListResponse, ProfileResponse, PublicMenuResponse, ReceiptListResponse,
    SalesSummaryResponse, SaveReceiptRequest, SaveReceiptResponse, UpdateProfileRequest,
    UpdateReceiptStatusRequest, UpdateReceiptStatusResponse,
};

/// API client for communicating with the backend server
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// Create a new API client with the default base URL
    pub fn new() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
        }
    }

    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: String) -> Self {
        Self { base_url }
    }

    /// Test connection to the backend
    pub async fn test_connection(&self, vendor_id: &str) -> Result<(), String> {
        match Request::get(&format!("{}/api/receipts/{}?limit=1", self.base_url, vendor_id))
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => Err(format!("Connection failed: {}", e)),
        }
    }

    /// Save a receipt for the vendor
    pub async fn save_receipt(
        &self,
        vendor_id: &str,
        request: SaveReceiptRequest,
    ) -> Result<SaveReceiptResponse, String> {
        let url = format!("{}/api/receipts/{}", self.base_url, vendor_id);

        match Request::post(&url)
            .json(&request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
        {
            Ok(response) => {
                if response.ok() {
                    response
                        .json::<SaveReceiptResponse>()
                        .await
                        .map_err(|e| format!("Failed to parse response: {}", e))
                } else {
                    Err(response.text().await.unwrap_or_else(|_| "Unknown error".to_string()))
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    /// Get a page of saved receipts, newest first
    pub async fn get_receipts(
        &self,
        vendor_id: &str,
        limit: Option<u32>,
        after: Option<&str>,
    ) -> Result<ReceiptListResponse, String> {
        let mut url = format!("{}/api/receipts/{}", self.base_url, vendor_id);
        let mut params = Vec::new();
        if let Some(limit) = limit {
            params.push(format!("limit={}", limit));
        }
        if let Some(after) = after {
            params.push(format!("after={}", after));
        }
        if !params.is_empty() {
            url = format!("{}?{}", url, params.join("&"));
        }

        match Request::get(&url).send().await {
            Ok(response) => {
                if response.ok() {
                    response
                        .json::<ReceiptListResponse>()
                        .await
                        .map_err(|e| format!("Failed to parse receipts: {}", e))
                } else {
                    Err(response.text().await.unwrap_or_else(|_| "Unknown error".to_string()))
                }
            }
            Err(e) => Err(format!("Failed to fetch receipts: {}", e)),
        }
    }

    /// Change the payment status of a saved receipt
    pub async fn update_receipt_status(
        &self,
        vendor_id: &str,
        receipt_id: &str,
        request: UpdateReceiptStatusRequest,
    ) -> Result<UpdateReceiptStatusResponse, String> {
        let url = format!("{}/api/receipts/{}/{}/status", self.base_url, vendor_id, receipt_id);

        match Request::put(&url)
            .json(&request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
        {
            Ok(response) => {
                if response.ok() {
                    response
                        .json::<UpdateReceiptStatusResponse>()
                        .await
                        .map_err(|e| format!("Failed to parse response: {}", e))
                } else {
                    Err(response.text().await.unwrap_or_else(|_| "Unknown error".to_string()))
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    /// Delete multiple receipts
    pub async fn delete_receipts(
        &self,
        vendor_id: &str,
        request: DeleteReceiptsRequest,
    ) -> Result<DeleteReceiptsResponse, String> {
        let url = format!("{}/api/receipts/{}", self.base_url, vendor_id);

        match Request::delete(&url)
            .json(&request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
        {
            Ok(response) => {
                if response.ok() {
                    response
                        .json::<DeleteReceiptsResponse>()
                        .await
                        .map_err(|e| format!("Failed to parse response: {}", e))
                } else {
                    Err(response.text().await.unwrap_or_else(|_| "Unknown error".to_string()))
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    /// Get the vendor's business profile; Ok(None) when none is saved yet
    pub async fn get_profile(&self, vendor_id: &str) -> Result<Option<BusinessProfile>, String> {
        let url = format!("{}/api/profile/{}", self.base_url, vendor_id);

        match Request::get(&url).send().await {
            Ok(response) => {
                if response.status() == 404 {
                    return Ok(None);
                }
                if response.ok() {
                    response
                        .json::<BusinessProfile>()
                        .await
                        .map(Some)
                        .map_err(|e| format!("Failed to parse profile: {}", e))
                } else {
                    Err(response.text().await.unwrap_or_else(|_| "Unknown error".to_string()))
                }
            }
            Err(e) => Err(format!("Failed to fetch profile: {}", e)),
        }
    }

    /// Create or update the vendor's profile
    pub async fn save_profile(
        &self,
        vendor_id: &str,
        request: UpdateProfileRequest,
    ) -> Result<ProfileResponse, String> {
        let url = format!("{}/api/profile/{}", self.base_url, vendor_id);

        match Request::put(&url)
            .json(&request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
        {
            Ok(response) => {
                if response.ok() {
                    response
                        .json::<ProfileResponse>()
                        .await
                        .map_err(|e| format!("Failed to parse response: {}", e))
                } else {
                    Err(response.text().await.unwrap_or_else(|_| "Unknown error".to_string()))
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    /// List the vendor's menu items
    pub async fn get_menu_items(&self, vendor_id: &str) -> Result<MenuListResponse, String> {
        let url = format!("{}/api/menu/{}", self.base_url, vendor_id);

        match Request::get(&url).send().await {
            Ok(response) => {
                if response.ok() {
                    response
                        .json::<MenuListResponse>()
                        .await
                        .map_err(|e| format!("Failed to parse menu items: {}", e))
                } else {
                    Err(response.text().await.unwrap_or_else(|_| "Unknown error".to_string()))
                }
            }
            Err(e) => Err(format!("Failed to fetch menu items: {}", e)),
        }
    }

    /// Add an item to the vendor's menu
    pub async fn create_menu_item(
        &self,
        vendor_id: &str,
        request: CreateMenuItemRequest,
    ) -> Result<MenuItemResponse, String> {
        let url = format!("{}/api/menu/{}", self.base_url, vendor_id);

        match Request::post(&url)
            .json(&request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
        {
            Ok(response) => {
                if response.ok() {
                    response
                        .json::<MenuItemResponse>()
                        .await
                        .map_err(|e| format!("Failed to parse response: {}", e))
                } else {
                    Err(response.text().await.unwrap_or_else(|_| "Unknown error".to_string()))
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    /// Remove an item from the vendor's menu
    pub async fn delete_menu_item(&self, vendor_id: &str, item_id: &str) -> Result<(), String> {
        let url = format!("{}/api/menu/{}/{}", self.base_url, vendor_id, item_id);

        match Request::delete(&url).send().await {
            Ok(response) => {
                if response.ok() {
                    Ok(())
                } else {
                    Err(response.text().await.unwrap_or_else(|_| "Unknown error".to_string()))
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    /// Unauthenticated public menu lookup by slug
    pub async fn get_public_menu(&self, slug: &str) -> Result<Option<PublicMenuResponse>, String> {
        let url = format!("{}/api/public/menu/{}", self.base_url, slug);

        match Request::get(&url).send().await {
            Ok(response) => {
                if response.status() == 404 {
                    return Ok(None);
                }
                if response.ok() {
                    response
                        .json::<PublicMenuResponse>()
                        .await
                        .map(Some)
                        .map_err(|e| format!("Failed to parse public menu: {}", e))
                } else {
                    Err(response.text().await.unwrap_or_else(|_| "Unknown error".to_string()))
                }
            }
            Err(e) => Err(format!("Failed to fetch public menu: {}", e)),
        }
    }

    /// Dashboard sales summary
    pub async fn get_sales_summary(&self, vendor_id: &str) -> Result<SalesSummaryResponse, String> {
        let url = format!("{}/api/analytics/{}/summary", self.base_url, vendor_id);

        match Request::get(&url).send().await {
            Ok(response) => {
                if response.ok() {
                    response
                        .json::<SalesSummaryResponse>()
                        .await
                        .map_err(|e| format!("Failed to parse sales summary: {}", e))
                } else {
                    Err(response.text().await.unwrap_or_else(|_| "Unknown error".to_string()))
                }
            }
            Err(e) => Err(format!("Failed to fetch sales summary: {}", e)),
        }
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
