use crate::db::{DbConnection, MenuItemRow, ProfileRow, ReceiptRow};
use anyhow::Result;
use chrono::{DateTime, Datelike, Duration, Local};
use shared::calculator::{
    compute_grand_total, compute_subtotal, derive_currency_symbol, format_amount, sanitize_price,
};
use shared::{
    BusinessProfile, CreateMenuItemRequest, DeleteReceiptsRequest, DeleteReceiptsResponse,
    LineItem, MenuItem, MenuItemResponse, MenuListResponse, PaginationInfo, PresentationSettings,
    ProfileResponse, PublicMenuItem, PublicMenuResponse, RawPrice, ReceiptListRequest,
    ReceiptListResponse, ReceiptStatus, SalesBucket, SalesSummaryResponse, SaveReceiptRequest,
    SaveReceiptResponse, SavedReceipt, UpdateProfileRequest, UpdateReceiptStatusResponse,
};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Request problems the caller can fix; everything else is a store failure
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("Business name cannot be empty")]
    EmptyBusinessName,
    #[error("Menu item name cannot be empty")]
    EmptyItemName,
    #[error("Slug may only contain lowercase letters, digits and dashes")]
    InvalidSlug,
    #[error("That menu address is already in use")]
    SlugTaken,
    #[error("Invalid cursor format: {0}")]
    InvalidCursor(String),
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn raw_price_to_storage(price: &RawPrice) -> String {
    match price {
        RawPrice::Number(n) => format!("{}", n),
        RawPrice::Text(t) => t.clone(),
    }
}

#[derive(Clone)]
pub struct ReceiptService {
    db: DbConnection,
}

impl ReceiptService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Save a receipt for the vendor. A receipt number is generated when the
    /// request does not carry one.
    pub async fn save_receipt(
        &self,
        vendor_id: &str,
        request: SaveReceiptRequest,
    ) -> Result<SaveReceiptResponse> {
        info!("Saving receipt for vendor {}", vendor_id);

        let millis = now_millis();
        let receipt_number = request
            .receipt_number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("RCP-{:06}", millis % 1_000_000));

        let row = ReceiptRow {
            id: SavedReceipt::generate_id(millis),
            vendor_id: vendor_id.to_string(),
            receipt_number,
            date: request.date.clone(),
            customer_name: request.customer_name.clone(),
            status: request.status.as_str().to_string(),
            items_json: serde_json::to_string(&request.items)?,
            shipping_fee: request.shipping_fee,
            discount_amount: request.discount_amount,
            created_at: Local::now().to_rfc3339(),
            created_ts: millis as i64,
        };
        self.db.insert_receipt(&row).await?;

        let receipt = Self::row_to_receipt(&row)?;
        let formatted_total = format_amount(receipt.grand_total);
        Ok(SaveReceiptResponse {
            receipt,
            success_message: format!("Receipt saved ({})", formatted_total),
        })
    }

    pub async fn get_receipt(&self, vendor_id: &str, id: &str) -> Result<Option<SavedReceipt>> {
        let row = self.db.get_receipt(vendor_id, id).await?;
        row.as_ref().map(Self::row_to_receipt).transpose()
    }

    /// List receipts newest-first with cursor pagination
    pub async fn list_receipts(
        &self,
        vendor_id: &str,
        request: ReceiptListRequest,
    ) -> Result<ReceiptListResponse> {
        info!("Listing receipts for vendor {} with request: {:?}", vendor_id, request);

        // Default limit 20, capped at 100
        let limit = request.limit.unwrap_or(20).min(100);

        let before_ts = match &request.after {
            Some(cursor) => Some(
                SavedReceipt::parse_id(cursor)
                    .map_err(|e| ValidationError::InvalidCursor(e.to_string()))?
                    as i64,
            ),
            None => None,
        };

        // Query one extra row to determine whether more pages exist
        let mut rows = self.db.list_receipts(vendor_id, limit + 1, before_ts).await?;

        let has_more = rows.len() > limit as usize;
        if has_more {
            rows.pop();
        }

        let receipts: Vec<SavedReceipt> =
            rows.iter().map(Self::row_to_receipt).collect::<Result<_>>()?;

        let next_cursor = if has_more {
            receipts.last().map(|r| r.id.clone())
        } else {
            None
        };

        info!("Returning {} receipts, has_more: {}", receipts.len(), has_more);
        Ok(ReceiptListResponse {
            receipts,
            pagination: PaginationInfo { has_more, next_cursor },
        })
    }

    pub async fn update_status(
        &self,
        vendor_id: &str,
        id: &str,
        status: ReceiptStatus,
    ) -> Result<Option<UpdateReceiptStatusResponse>> {
        info!("Updating receipt {} status to {}", id, status.as_str());

        let updated = self.db.update_receipt_status(vendor_id, id, status.as_str()).await?;
        if !updated {
            return Ok(None);
        }

        let receipt = self
            .get_receipt(vendor_id, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Receipt disappeared after status update"))?;
        Ok(Some(UpdateReceiptStatusResponse {
            receipt,
            success_message: format!("Receipt marked {}", status.as_str()),
        }))
    }

    /// Delete receipts in bulk, reporting the IDs that were not found
    pub async fn delete_receipts(
        &self,
        vendor_id: &str,
        request: DeleteReceiptsRequest,
    ) -> Result<DeleteReceiptsResponse> {
        info!("Deleting {} receipts for vendor {}", request.receipt_ids.len(), vendor_id);

        let found = self.db.check_receipts_exist(vendor_id, &request.receipt_ids).await?;
        let not_found_ids: Vec<String> = request
            .receipt_ids
            .iter()
            .filter(|id| !found.contains(id))
            .cloned()
            .collect();

        let deleted_count = self.db.delete_receipts(vendor_id, &found).await? as usize;

        Ok(DeleteReceiptsResponse {
            deleted_count,
            success_message: format!("Deleted {} receipt(s)", deleted_count),
            not_found_ids,
        })
    }

    /// Bucket saved receipts into the dashboard summary: last 30 days and
    /// last 12 months, paid versus outstanding. Totals are recomputed from
    /// the raw items of every row; stored values are never trusted.
    pub async fn sales_summary(&self, vendor_id: &str) -> Result<SalesSummaryResponse> {
        let rows = self.db.list_all_receipts(vendor_id).await?;

        let mut day_totals: HashMap<String, (f64, f64, u32)> = HashMap::new();
        let mut month_totals: HashMap<String, (f64, f64, u32)> = HashMap::new();
        let mut paid_total = 0.0;
        let mut pending_total = 0.0;

        for row in &rows {
            let receipt = Self::row_to_receipt(row)?;
            let created = match DateTime::parse_from_rfc3339(&receipt.created_at) {
                Ok(dt) => dt,
                // Rows with a mangled timestamp still count toward the
                // overall totals below, just not toward any bucket
                Err(_) => {
                    Self::accumulate(&receipt, &mut paid_total, &mut pending_total);
                    continue;
                }
            };

            let day_key = created.format("%Y-%m-%d").to_string();
            let month_key = created.format("%Y-%m").to_string();
            for entry in [day_totals.entry(day_key), month_totals.entry(month_key)] {
                let bucket = entry.or_insert((0.0, 0.0, 0));
                match receipt.status {
                    ReceiptStatus::Paid => bucket.0 += receipt.grand_total,
                    _ => bucket.1 += receipt.grand_total,
                }
                bucket.2 += 1;
            }
            Self::accumulate(&receipt, &mut paid_total, &mut pending_total);
        }

        let today = Local::now();
        let mut daily = Vec::with_capacity(30);
        for offset in (0..30).rev() {
            let day = today - Duration::days(offset);
            let label = day.format("%Y-%m-%d").to_string();
            daily.push(Self::bucket_for(&day_totals, label));
        }

        let mut monthly = Vec::with_capacity(12);
        let (mut year, mut month) = (today.year(), today.month());
        for _ in 0..12 {
            monthly.push(format!("{:04}-{:02}", year, month));
            if month == 1 {
                month = 12;
                year -= 1;
            } else {
                month -= 1;
            }
        }
        monthly.reverse();
        let monthly = monthly
            .into_iter()
            .map(|label| Self::bucket_for(&month_totals, label))
            .collect();

        Ok(SalesSummaryResponse {
            daily,
            monthly,
            paid_total,
            pending_total,
            receipt_count: rows.len() as u32,
        })
    }

    fn accumulate(receipt: &SavedReceipt, paid_total: &mut f64, pending_total: &mut f64) {
        match receipt.status {
            ReceiptStatus::Paid => *paid_total += receipt.grand_total,
            _ => *pending_total += receipt.grand_total,
        }
    }

    fn bucket_for(totals: &HashMap<String, (f64, f64, u32)>, label: String) -> SalesBucket {
        let (paid, pending, count) = totals.get(&label).copied().unwrap_or((0.0, 0.0, 0));
        SalesBucket {
            label,
            paid_total: paid,
            pending_total: pending,
            receipt_count: count,
        }
    }

    /// Hydrate a stored row, recomputing both totals from the raw items
    fn row_to_receipt(row: &ReceiptRow) -> Result<SavedReceipt> {
        let items: Vec<LineItem> = serde_json::from_str(&row.items_json)?;
        let subtotal = compute_subtotal(&items);
        let grand_total = compute_grand_total(subtotal, row.shipping_fee, row.discount_amount);

        Ok(SavedReceipt {
            id: row.id.clone(),
            vendor_id: row.vendor_id.clone(),
            receipt_number: row.receipt_number.clone(),
            date: row.date.clone(),
            customer_name: row.customer_name.clone(),
            status: ReceiptStatus::from_value(Some(&row.status)),
            items,
            shipping_fee: row.shipping_fee,
            discount_amount: row.discount_amount,
            subtotal,
            grand_total,
            created_at: row.created_at.clone(),
        })
    }
}

#[derive(Clone)]
pub struct ProfileService {
    db: DbConnection,
}

impl ProfileService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn get_profile(&self, vendor_id: &str) -> Result<Option<BusinessProfile>> {
        let row = self.db.get_profile(vendor_id).await?;
        Ok(row.map(Self::row_to_profile))
    }

    /// Create or update the vendor's profile. The slug is validated when
    /// provided, generated from the business name otherwise, and must not
    /// collide with another vendor.
    pub async fn upsert_profile(
        &self,
        vendor_id: &str,
        request: UpdateProfileRequest,
    ) -> Result<ProfileResponse> {
        info!("Upserting profile for vendor {}", vendor_id);

        let business_name = request.business_name.trim().to_string();
        if business_name.is_empty() {
            return Err(ValidationError::EmptyBusinessName.into());
        }

        let slug = match request.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(candidate) => {
                if !Self::is_valid_slug(candidate) {
                    return Err(ValidationError::InvalidSlug.into());
                }
                candidate.to_string()
            }
            None => Self::slugify(&business_name),
        };
        if self.db.slug_taken(&slug, vendor_id).await? {
            return Err(ValidationError::SlugTaken.into());
        }

        let now = Local::now().to_rfc3339();
        let created_at = self
            .db
            .get_profile(vendor_id)
            .await?
            .map(|existing| existing.created_at)
            .unwrap_or_else(|| now.clone());

        let row = ProfileRow {
            vendor_id: vendor_id.to_string(),
            business_name,
            phone: request.phone.clone(),
            tagline: request.tagline.clone(),
            footer_message: request.footer_message.clone(),
            slug,
            settings_json: serde_json::to_string(&request.settings)?,
            created_at,
            updated_at: now,
        };
        self.db.upsert_profile(&row).await?;

        Ok(ProfileResponse {
            profile: Self::row_to_profile(row),
            success_message: "Profile saved".to_string(),
        })
    }

    /// URL-safe: lowercase letters, digits and dashes only
    pub fn is_valid_slug(slug: &str) -> bool {
        !slug.is_empty()
            && slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }

    /// Derive a slug from a display name: alphanumeric runs lowercased and
    /// joined by dashes, e.g. "Mama K's Kitchen!" -> "mama-k-s-kitchen"
    pub fn slugify(name: &str) -> String {
        let mut slug = String::with_capacity(name.len());
        let mut last_dash = true;
        for c in name.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
                last_dash = false;
            } else if !last_dash {
                slug.push('-');
                last_dash = true;
            }
        }
        let slug = slug.trim_end_matches('-').to_string();
        if slug.is_empty() {
            "my-business".to_string()
        } else {
            slug
        }
    }

    fn row_to_profile(row: ProfileRow) -> BusinessProfile {
        // Settings written by older versions may miss fields; fall back to
        // defaults rather than failing the whole profile read
        let settings: PresentationSettings =
            serde_json::from_str(&row.settings_json).unwrap_or_default();
        BusinessProfile {
            vendor_id: row.vendor_id,
            business_name: row.business_name,
            phone: row.phone,
            tagline: row.tagline,
            footer_message: row.footer_message,
            slug: row.slug,
            settings,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct MenuService {
    db: DbConnection,
}

impl MenuService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn list_items(&self, vendor_id: &str) -> Result<MenuListResponse> {
        let rows = self.db.list_menu_items(vendor_id).await?;
        Ok(MenuListResponse {
            items: rows.into_iter().map(Self::row_to_item).collect(),
        })
    }

    pub async fn create_item(
        &self,
        vendor_id: &str,
        request: CreateMenuItemRequest,
    ) -> Result<MenuItemResponse> {
        info!("Creating menu item for vendor {}", vendor_id);

        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyItemName.into());
        }

        let row = MenuItemRow {
            id: MenuItem::generate_id(now_millis()),
            vendor_id: vendor_id.to_string(),
            name,
            description: request.description.clone(),
            price: raw_price_to_storage(&request.price),
            position: self.db.next_menu_position(vendor_id).await?,
        };
        self.db.insert_menu_item(&row).await?;

        Ok(MenuItemResponse {
            item: Self::row_to_item(row),
            success_message: "Menu item added".to_string(),
        })
    }

    pub async fn delete_item(&self, vendor_id: &str, id: &str) -> Result<bool> {
        self.db.delete_menu_item(vendor_id, id).await
    }

    /// Unauthenticated read projection of a business and its menu. Prices
    /// are display-formatted; there is no totals logic here.
    pub async fn public_menu(&self, slug: &str) -> Result<Option<PublicMenuResponse>> {
        info!("Public menu lookup for slug {}", slug);

        let profile = match self.db.get_profile_by_slug(slug).await? {
            Some(row) => row,
            None => return Ok(None),
        };
        let settings: PresentationSettings =
            serde_json::from_str(&profile.settings_json).unwrap_or_default();
        let symbol = derive_currency_symbol(&settings.currency);

        let items = self
            .db
            .list_menu_items(&profile.vendor_id)
            .await?
            .into_iter()
            .map(|row| PublicMenuItem {
                name: row.name,
                description: row.description,
                price: format!(
                    "{}{}",
                    symbol,
                    format_amount(sanitize_price(&RawPrice::Text(row.price)))
                ),
            })
            .collect();

        Ok(Some(PublicMenuResponse {
            business_name: profile.business_name,
            tagline: profile.tagline,
            phone: profile.phone,
            accent_color: settings.accent_color,
            currency_symbol: symbol,
            items,
        }))
    }

    fn row_to_item(row: MenuItemRow) -> MenuItem {
        MenuItem {
            id: row.id,
            vendor_id: row.vendor_id,
            name: row.name,
            description: row.description,
            price: RawPrice::Text(row.price),
            position: row.position,
        }
    }
}
