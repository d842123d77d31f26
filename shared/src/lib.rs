use serde::{Deserialize, Serialize};
use std::fmt;

pub mod calculator;
pub mod render;

/// A price as it arrives from user input: either already numeric, or free
/// text that may carry currency symbols, thousands separators and whitespace.
/// Sanitization happens in [`calculator::sanitize_price`]; invalid input
/// coerces to 0 there, never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(f64),
    Text(String),
}

impl Default for RawPrice {
    fn default() -> Self {
        RawPrice::Text(String::new())
    }
}

impl From<&str> for RawPrice {
    fn from(value: &str) -> Self {
        RawPrice::Text(value.to_string())
    }
}

impl From<f64> for RawPrice {
    fn from(value: f64) -> Self {
        RawPrice::Number(value)
    }
}

/// Line item ID in format: "item::<epoch_millis>::<seq>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    /// Display label, free text; empty renders as a placeholder
    #[serde(default)]
    pub name: String,
    /// Non-negative count; absent or negative input is treated as 0
    #[serde(default)]
    pub quantity: i64,
    /// Raw price as entered; sanitized at computation time
    #[serde(default)]
    pub unit_price: RawPrice,
}

impl LineItem {
    /// Generate a line item ID that is stable within a receipt
    pub fn generate_id(epoch_millis: u64, seq: u32) -> String {
        format!("item::{}::{}", epoch_millis, seq)
    }
}

/// Payment state of a receipt. Drives the total-line label and the
/// "PENDING" watermark overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    Paid,
    Pending,
    Unpaid,
}

impl ReceiptStatus {
    /// Parse a stored status value, tolerating case and surrounding
    /// whitespace; anything unrecognized falls back to Paid.
    pub fn from_value(value: Option<&str>) -> Self {
        match value.map(str::trim).map(str::to_ascii_lowercase).as_deref() {
            Some("pending") => Self::Pending,
            Some("unpaid") => Self::Unpaid,
            _ => Self::Paid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Pending => "pending",
            Self::Unpaid => "unpaid",
        }
    }

    /// Label for the final totals row
    pub fn total_label(&self) -> &'static str {
        match self {
            Self::Pending => "TOTAL DUE",
            _ => "TOTAL PAID",
        }
    }
}

impl Default for ReceiptStatus {
    fn default() -> Self {
        Self::Paid
    }
}

/// Presentation mode controlling item-row verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateVariant {
    Simple,
    Detailed,
}

impl TemplateVariant {
    pub fn from_value(value: Option<&str>) -> Self {
        match value.map(str::trim).map(str::to_ascii_lowercase).as_deref() {
            Some("detailed") => Self::Detailed,
            _ => Self::Simple,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Detailed => "detailed",
        }
    }
}

impl Default for TemplateVariant {
    fn default() -> Self {
        Self::Simple
    }
}

/// Branding and formatting knobs applied by the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationSettings {
    /// CSS color applied to brand chrome in the rendered document
    pub accent_color: String,
    pub show_logo: bool,
    pub logo_url: Option<String>,
    pub template_variant: TemplateVariant,
    /// Configured currency field; the display symbol is the leading token
    pub currency: String,
}

impl Default for PresentationSettings {
    fn default() -> Self {
        Self {
            accent_color: "#0f766e".to_string(),
            show_logo: true,
            logo_url: None,
            template_variant: TemplateVariant::Simple,
            currency: calculator::DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

/// The aggregate handed to the renderer. Subtotal and grand total are never
/// stored here; they are derived fresh by the calculator on every render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReceiptDocument {
    #[serde(default)]
    pub receipt_number: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub business_phone: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub footer_message: Option<String>,
    #[serde(default)]
    pub status: ReceiptStatus,
    /// Insertion order is display order; never reordered
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub shipping_fee: Option<f64>,
    #[serde(default)]
    pub discount_amount: Option<f64>,
}

/// Request to save a receipt for the calling vendor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveReceiptRequest {
    /// Generated server-side when absent
    pub receipt_number: Option<String>,
    pub date: Option<String>,
    pub customer_name: Option<String>,
    #[serde(default)]
    pub status: ReceiptStatus,
    pub items: Vec<LineItem>,
    pub shipping_fee: Option<f64>,
    pub discount_amount: Option<f64>,
}

/// Receipt ID in format: "receipt::<epoch_millis>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedReceipt {
    pub id: String,
    pub vendor_id: String,
    pub receipt_number: String,
    pub date: Option<String>,
    pub customer_name: Option<String>,
    pub status: ReceiptStatus,
    pub items: Vec<LineItem>,
    pub shipping_fee: Option<f64>,
    pub discount_amount: Option<f64>,
    /// Derived on read, never trusted from storage
    pub subtotal: f64,
    /// Derived on read, never trusted from storage
    pub grand_total: f64,
    /// RFC 3339 timestamp
    pub created_at: String,
}

impl SavedReceipt {
    /// Generate a receipt ID from a timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("receipt::{}", epoch_millis)
    }

    /// Parse a receipt ID to extract the timestamp
    pub fn parse_id(id: &str) -> Result<u64, ReceiptIdError> {
        let parts: Vec<&str> = id.split("::").collect();
        if parts.len() != 2 || parts[0] != "receipt" {
            return Err(ReceiptIdError::InvalidFormat);
        }

        parts[1]
            .parse::<u64>()
            .map_err(|_| ReceiptIdError::InvalidTimestamp)
    }

    /// Extract the embedded timestamp for cursor ordering
    pub fn extract_timestamp(&self) -> Result<u64, ReceiptIdError> {
        Self::parse_id(&self.id)
    }

    /// Assemble the renderable document for this receipt under the given
    /// business profile.
    pub fn document(&self, profile: &BusinessProfile) -> ReceiptDocument {
        ReceiptDocument {
            receipt_number: Some(self.receipt_number.clone()),
            date: self.date.clone(),
            customer_name: self.customer_name.clone(),
            business_name: Some(profile.business_name.clone()),
            business_phone: profile.phone.clone(),
            tagline: profile.tagline.clone(),
            footer_message: profile.footer_message.clone(),
            status: self.status,
            items: self.items.clone(),
            shipping_fee: self.shipping_fee,
            discount_amount: self.discount_amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReceiptIdError {
    InvalidFormat,
    InvalidTimestamp,
}

impl fmt::Display for ReceiptIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReceiptIdError::InvalidFormat => write!(f, "Invalid receipt ID format"),
            ReceiptIdError::InvalidTimestamp => write!(f, "Invalid timestamp in receipt ID"),
        }
    }
}

impl std::error::Error for ReceiptIdError {}

/// Response after saving a receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveReceiptResponse {
    pub receipt: SavedReceipt,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

/// Request for a page of saved receipts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptListRequest {
    /// Cursor for pagination - receipt ID to start after
    pub after: Option<String>,
    /// Maximum number of receipts to return
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptListResponse {
    pub receipts: Vec<SavedReceipt>,
    pub pagination: PaginationInfo,
}

/// Request to change the payment status of a saved receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateReceiptStatusRequest {
    pub status: ReceiptStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateReceiptStatusResponse {
    pub receipt: SavedReceipt,
    pub success_message: String,
}

/// Request for deleting multiple receipts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteReceiptsRequest {
    pub receipt_ids: Vec<String>,
}

/// Response after deleting receipts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteReceiptsResponse {
    pub deleted_count: usize,
    pub success_message: String,
    pub not_found_ids: Vec<String>,
}

/// A vendor's business profile plus presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub vendor_id: String,
    pub business_name: String,
    pub phone: Option<String>,
    pub tagline: Option<String>,
    pub footer_message: Option<String>,
    /// URL-safe slug addressing the public menu page
    pub slug: String,
    pub settings: PresentationSettings,
    /// RFC 3339 timestamp
    pub created_at: String,
    /// RFC 3339 timestamp
    pub updated_at: String,
}

/// Request for creating or updating the vendor's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub business_name: String,
    pub phone: Option<String>,
    pub tagline: Option<String>,
    pub footer_message: Option<String>,
    /// Generated from the business name when absent
    pub slug: Option<String>,
    pub settings: PresentationSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: BusinessProfile,
    pub success_message: String,
}

/// Menu item ID in format: "menu::<epoch_millis>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub vendor_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Raw price as entered; same permissive policy as line items
    #[serde(default)]
    pub price: RawPrice,
    /// Display order on the public page
    pub position: i64,
}

impl MenuItem {
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("menu::{}", epoch_millis)
    }
}

/// Request for adding an item to the public menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateMenuItemRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub price: RawPrice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItemResponse {
    pub item: MenuItem,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuListResponse {
    pub items: Vec<MenuItem>,
}

/// Item on the unauthenticated public menu page; price pre-formatted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicMenuItem {
    pub name: String,
    pub description: Option<String>,
    pub price: String,
}

/// Read-only projection of a business and its menu, looked up by slug
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicMenuResponse {
    pub business_name: String,
    pub tagline: Option<String>,
    pub phone: Option<String>,
    pub accent_color: String,
    pub currency_symbol: String,
    pub items: Vec<PublicMenuItem>,
}

/// One time bucket of the sales summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesBucket {
    /// "2026-08-07" for daily buckets, "2026-08" for monthly
    pub label: String,
    pub paid_total: f64,
    pub pending_total: f64,
    pub receipt_count: u32,
}

/// Dashboard aggregation of saved receipts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummaryResponse {
    pub daily: Vec<SalesBucket>,
    pub monthly: Vec<SalesBucket>,
    pub paid_total: f64,
    pub pending_total: f64,
    pub receipt_count: u32,
}

/// Today's date formatted the way new receipts display it, e.g. "August 7, 2026"
pub fn default_receipt_date() -> String {
    chrono::Local::now().format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_receipt_id() {
        let id = SavedReceipt::generate_id(1702516122000);
        assert_eq!(id, "receipt::1702516122000");
    }

    #[test]
    fn test_parse_receipt_id() {
        let timestamp = SavedReceipt::parse_id("receipt::1702516122000").unwrap();
        assert_eq!(timestamp, 1702516122000);

        assert!(SavedReceipt::parse_id("invalid::format").is_err());
        assert!(SavedReceipt::parse_id("receipt").is_err());
        assert!(SavedReceipt::parse_id("not_receipt::123").is_err());
        assert!(SavedReceipt::parse_id("receipt::not_a_number").is_err());
    }

    #[test]
    fn test_line_item_id_is_stable_within_receipt() {
        assert_eq!(LineItem::generate_id(1702516122000, 0), "item::1702516122000::0");
        assert_ne!(
            LineItem::generate_id(1702516122000, 0),
            LineItem::generate_id(1702516122000, 1)
        );
    }

    #[test]
    fn test_status_from_value() {
        assert_eq!(ReceiptStatus::from_value(Some("pending")), ReceiptStatus::Pending);
        assert_eq!(ReceiptStatus::from_value(Some(" PENDING ")), ReceiptStatus::Pending);
        assert_eq!(ReceiptStatus::from_value(Some("unpaid")), ReceiptStatus::Unpaid);
        assert_eq!(ReceiptStatus::from_value(Some("paid")), ReceiptStatus::Paid);
        assert_eq!(ReceiptStatus::from_value(Some("garbage")), ReceiptStatus::Paid);
        assert_eq!(ReceiptStatus::from_value(None), ReceiptStatus::Paid);
    }

    #[test]
    fn test_status_total_label() {
        assert_eq!(ReceiptStatus::Pending.total_label(), "TOTAL DUE");
        assert_eq!(ReceiptStatus::Paid.total_label(), "TOTAL PAID");
        assert_eq!(ReceiptStatus::Unpaid.total_label(), "TOTAL PAID");
    }

    #[test]
    fn test_template_from_value() {
        assert_eq!(TemplateVariant::from_value(Some("detailed")), TemplateVariant::Detailed);
        assert_eq!(TemplateVariant::from_value(Some("Detailed ")), TemplateVariant::Detailed);
        assert_eq!(TemplateVariant::from_value(Some("simple")), TemplateVariant::Simple);
        assert_eq!(TemplateVariant::from_value(None), TemplateVariant::Simple);
    }

    #[test]
    fn test_raw_price_deserializes_from_number_and_text() {
        let item: LineItem =
            serde_json::from_str(r#"{"id":"item::1::0","name":"A","quantity":2,"unit_price":300}"#)
                .unwrap();
        assert_eq!(item.unit_price, RawPrice::Number(300.0));

        let item: LineItem = serde_json::from_str(
            r#"{"id":"item::1::1","name":"B","quantity":1,"unit_price":"1,500"}"#,
        )
        .unwrap();
        assert_eq!(item.unit_price, RawPrice::Text("1,500".to_string()));
    }

    #[test]
    fn test_line_item_defaults_for_missing_fields() {
        let item: LineItem = serde_json::from_str(r#"{"id":"item::1::0"}"#).unwrap();
        assert_eq!(item.name, "");
        assert_eq!(item.quantity, 0);
        assert_eq!(item.unit_price, RawPrice::Text(String::new()));
    }

    #[test]
    fn test_saved_receipt_document_assembly() {
        let profile = BusinessProfile {
            vendor_id: "vendor::1".to_string(),
            business_name: "Mama K Kitchen".to_string(),
            phone: Some("0801 234 5678".to_string()),
            tagline: Some("Good food, fast".to_string()),
            footer_message: Some("Thank you for your patronage!".to_string()),
            slug: "mama-k-kitchen".to_string(),
            settings: PresentationSettings::default(),
            created_at: "2026-08-01T10:00:00+01:00".to_string(),
            updated_at: "2026-08-01T10:00:00+01:00".to_string(),
        };
        let receipt = SavedReceipt {
            id: SavedReceipt::generate_id(1702516122000),
            vendor_id: "vendor::1".to_string(),
            receipt_number: "RCP-122000".to_string(),
            date: Some("August 7, 2026".to_string()),
            customer_name: Some("Ada".to_string()),
            status: ReceiptStatus::Pending,
            items: vec![],
            shipping_fee: Some(200.0),
            discount_amount: None,
            subtotal: 0.0,
            grand_total: 200.0,
            created_at: "2026-08-07T09:00:00+01:00".to_string(),
        };

        let doc = receipt.document(&profile);
        assert_eq!(doc.business_name.as_deref(), Some("Mama K Kitchen"));
        assert_eq!(doc.customer_name.as_deref(), Some("Ada"));
        assert_eq!(doc.status, ReceiptStatus::Pending);
        assert_eq!(doc.shipping_fee, Some(200.0));
    }
}
