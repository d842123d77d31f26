use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Row, Sqlite, SqlitePool};
use std::sync::Arc;

// The database URL for the production database
const DATABASE_URL: &str = "sqlite:receipt_studio.db";

/// Raw receipt row as stored; line items are a JSON column and totals are
/// never persisted.
#[derive(Debug, Clone)]
pub struct ReceiptRow {
    pub id: String,
    pub vendor_id: String,
    pub receipt_number: String,
    pub date: Option<String>,
    pub customer_name: Option<String>,
    pub status: String,
    pub items_json: String,
    pub shipping_fee: Option<f64>,
    pub discount_amount: Option<f64>,
    pub created_at: String,
    pub created_ts: i64,
}

/// Raw business profile row; presentation settings are a JSON column.
#[derive(Debug, Clone)]
pub struct ProfileRow {
    pub vendor_id: String,
    pub business_name: String,
    pub phone: Option<String>,
    pub tagline: Option<String>,
    pub footer_message: Option<String>,
    pub slug: String,
    pub settings_json: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct MenuItemRow {
    pub id: String,
    pub vendor_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub position: i64,
}

/// DbConnection manages database operations
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePool::connect(url).await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize the standard database, honoring the RECEIPT_STUDIO_DB
    /// override.
    pub async fn init() -> Result<Self> {
        let url = std::env::var("RECEIPT_STUDIO_DB").unwrap_or_else(|_| DATABASE_URL.to_string());
        Self::new(&url).await
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS receipts (
                id TEXT PRIMARY KEY,
                vendor_id TEXT NOT NULL,
                receipt_number TEXT NOT NULL,
                date TEXT,
                customer_name TEXT,
                status TEXT NOT NULL,
                items TEXT NOT NULL,
                shipping_fee REAL,
                discount_amount REAL,
                created_at TEXT NOT NULL,
                created_ts INTEGER NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                vendor_id TEXT PRIMARY KEY,
                business_name TEXT NOT NULL,
                phone TEXT,
                tagline TEXT,
                footer_message TEXT,
                slug TEXT NOT NULL UNIQUE,
                settings TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS menu_items (
                id TEXT PRIMARY KEY,
                vendor_id TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                price TEXT NOT NULL,
                position INTEGER NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    fn receipt_from_row(row: &sqlx::sqlite::SqliteRow) -> ReceiptRow {
        ReceiptRow {
            id: row.get("id"),
            vendor_id: row.get("vendor_id"),
            receipt_number: row.get("receipt_number"),
            date: row.get("date"),
            customer_name: row.get("customer_name"),
            status: row.get("status"),
            items_json: row.get("items"),
            shipping_fee: row.get("shipping_fee"),
            discount_amount: row.get("discount_amount"),
            created_at: row.get("created_at"),
            created_ts: row.get("created_ts"),
        }
    }

    /// Store a new receipt row
    pub async fn insert_receipt(&self, receipt: &ReceiptRow) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO receipts
                (id, vendor_id, receipt_number, date, customer_name, status,
                 items, shipping_fee, discount_amount, created_at, created_ts)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&receipt.id)
        .bind(&receipt.vendor_id)
        .bind(&receipt.receipt_number)
        .bind(&receipt.date)
        .bind(&receipt.customer_name)
        .bind(&receipt.status)
        .bind(&receipt.items_json)
        .bind(receipt.shipping_fee)
        .bind(receipt.discount_amount)
        .bind(&receipt.created_at)
        .bind(receipt.created_ts)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    /// Retrieve one receipt scoped to its vendor
    pub async fn get_receipt(&self, vendor_id: &str, id: &str) -> Result<Option<ReceiptRow>> {
        let row = sqlx::query("SELECT * FROM receipts WHERE vendor_id = ? AND id = ?")
            .bind(vendor_id)
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;

        Ok(row.as_ref().map(Self::receipt_from_row))
    }

    /// List receipts newest-first; `before_ts` filters to rows created
    /// strictly before the cursor timestamp.
    pub async fn list_receipts(
        &self,
        vendor_id: &str,
        limit: u32,
        before_ts: Option<i64>,
    ) -> Result<Vec<ReceiptRow>> {
        let rows = match before_ts {
            Some(ts) => {
                sqlx::query(
                    r#"
                    SELECT * FROM receipts
                    WHERE vendor_id = ? AND created_ts < ?
                    ORDER BY created_ts DESC
                    LIMIT ?
                    "#,
                )
                .bind(vendor_id)
                .bind(ts)
                .bind(limit)
                .fetch_all(&*self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT * FROM receipts
                    WHERE vendor_id = ?
                    ORDER BY created_ts DESC
                    LIMIT ?
                    "#,
                )
                .bind(vendor_id)
                .bind(limit)
                .fetch_all(&*self.pool)
                .await?
            }
        };

        Ok(rows.iter().map(Self::receipt_from_row).collect())
    }

    /// All receipts for a vendor in chronological order, for aggregation
    pub async fn list_all_receipts(&self, vendor_id: &str) -> Result<Vec<ReceiptRow>> {
        let rows = sqlx::query("SELECT * FROM receipts WHERE vendor_id = ? ORDER BY created_ts ASC")
            .bind(vendor_id)
            .fetch_all(&*self.pool)
            .await?;

        Ok(rows.iter().map(Self::receipt_from_row).collect())
    }

    /// Update the status of a receipt; returns false when no row matched
    pub async fn update_receipt_status(
        &self,
        vendor_id: &str,
        id: &str,
        status: &str,
    ) -> Result<bool> {
        let result = sqlx::query("UPDATE receipts SET status = ? WHERE vendor_id = ? AND id = ?")
            .bind(status)
            .bind(vendor_id)
            .bind(id)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Which of the given receipt IDs exist for this vendor
    pub async fn check_receipts_exist(
        &self,
        vendor_id: &str,
        ids: &[String],
    ) -> Result<Vec<String>> {
        let mut found = Vec::new();
        for id in ids {
            let row = sqlx::query("SELECT id FROM receipts WHERE vendor_id = ? AND id = ?")
                .bind(vendor_id)
                .bind(id)
                .fetch_optional(&*self.pool)
                .await?;
            if row.is_some() {
                found.push(id.clone());
            }
        }
        Ok(found)
    }

    /// Delete receipts by ID; returns the number actually deleted
    pub async fn delete_receipts(&self, vendor_id: &str, ids: &[String]) -> Result<u32> {
        let mut deleted = 0u32;
        for id in ids {
            let result = sqlx::query("DELETE FROM receipts WHERE vendor_id = ? AND id = ?")
                .bind(vendor_id)
                .bind(id)
                .execute(&*self.pool)
                .await?;
            deleted += result.rows_affected() as u32;
        }
        Ok(deleted)
    }

    fn profile_from_row(row: &sqlx::sqlite::SqliteRow) -> ProfileRow {
        ProfileRow {
            vendor_id: row.get("vendor_id"),
            business_name: row.get("business_name"),
            phone: row.get("phone"),
            tagline: row.get("tagline"),
            footer_message: row.get("footer_message"),
            slug: row.get("slug"),
            settings_json: row.get("settings"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    /// Insert or replace the vendor's profile
    pub async fn upsert_profile(&self, profile: &ProfileRow) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO profiles
                (vendor_id, business_name, phone, tagline, footer_message,
                 slug, settings, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&profile.vendor_id)
        .bind(&profile.business_name)
        .bind(&profile.phone)
        .bind(&profile.tagline)
        .bind(&profile.footer_message)
        .bind(&profile.slug)
        .bind(&profile.settings_json)
        .bind(&profile.created_at)
        .bind(&profile.updated_at)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_profile(&self, vendor_id: &str) -> Result<Option<ProfileRow>> {
        let row = sqlx::query("SELECT * FROM profiles WHERE vendor_id = ?")
            .bind(vendor_id)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row.as_ref().map(Self::profile_from_row))
    }

    /// Unauthenticated lookup used by the public menu page
    pub async fn get_profile_by_slug(&self, slug: &str) -> Result<Option<ProfileRow>> {
        let row = sqlx::query("SELECT * FROM profiles WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row.as_ref().map(Self::profile_from_row))
    }

    /// Whether the slug is already claimed by a different vendor
    pub async fn slug_taken(&self, slug: &str, vendor_id: &str) -> Result<bool> {
        let row = sqlx::query("SELECT vendor_id FROM profiles WHERE slug = ? AND vendor_id != ?")
            .bind(slug)
            .bind(vendor_id)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row.is_some())
    }

    fn menu_item_from_row(row: &sqlx::sqlite::SqliteRow) -> MenuItemRow {
        MenuItemRow {
            id: row.get("id"),
            vendor_id: row.get("vendor_id"),
            name: row.get("name"),
            description: row.get("description"),
            price: row.get("price"),
            position: row.get("position"),
        }
    }

    pub async fn insert_menu_item(&self, item: &MenuItemRow) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO menu_items (id, vendor_id, name, description, price, position)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.id)
        .bind(&item.vendor_id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.price)
        .bind(item.position)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    /// Menu items in display order
    pub async fn list_menu_items(&self, vendor_id: &str) -> Result<Vec<MenuItemRow>> {
        let rows =
            sqlx::query("SELECT * FROM menu_items WHERE vendor_id = ? ORDER BY position ASC")
                .bind(vendor_id)
                .fetch_all(&*self.pool)
                .await?;
        Ok(rows.iter().map(Self::menu_item_from_row).collect())
    }

    pub async fn delete_menu_item(&self, vendor_id: &str, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM menu_items WHERE vendor_id = ? AND id = ?")
            .bind(vendor_id)
            .bind(id)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Next free display position for a vendor's menu
    pub async fn next_menu_position(&self, vendor_id: &str) -> Result<i64> {
        let row = sqlx::query("SELECT MAX(position) AS max_position FROM menu_items WHERE vendor_id = ?")
            .bind(vendor_id)
            .fetch_one(&*self.pool)
            .await?;
        let max: Option<i64> = row.get("max_position");
        Ok(max.unwrap_or(0) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> DbConnection {
        DbConnection::init_test().await.expect("Failed to create test database")
    }

    fn sample_receipt(id_ts: i64) -> ReceiptRow {
        ReceiptRow {
            id: format!("receipt::{}", id_ts),
            vendor_id: "vendor::1".to_string(),
            receipt_number: format!("RCP-{:06}", id_ts % 1_000_000),
            date: Some("August 7, 2026".to_string()),
            customer_name: Some("Ada".to_string()),
            status: "paid".to_string(),
            items_json: "[]".to_string(),
            shipping_fee: None,
            discount_amount: None,
            created_at: "2026-08-07T09:00:00+01:00".to_string(),
            created_ts: id_ts,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_receipt() {
        let db = setup_test().await;
        let receipt = sample_receipt(1000);

        db.insert_receipt(&receipt).await.expect("Failed to insert receipt");

        let fetched = db
            .get_receipt("vendor::1", &receipt.id)
            .await
            .expect("Failed to get receipt")
            .expect("Receipt should exist");
        assert_eq!(fetched.receipt_number, receipt.receipt_number);
        assert_eq!(fetched.status, "paid");

        // Scoped to vendor: another vendor cannot see it
        let other = db.get_receipt("vendor::2", &receipt.id).await.expect("Query failed");
        assert!(other.is_none());
    }

    #[tokio::test]
    async fn test_list_receipts_newest_first_with_cursor() {
        let db = setup_test().await;
        for ts in [1000, 2000, 3000] {
            db.insert_receipt(&sample_receipt(ts)).await.expect("insert failed");
        }

        let all = db.list_receipts("vendor::1", 10, None).await.expect("list failed");
        let ids: Vec<&str> = all.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["receipt::3000", "receipt::2000", "receipt::1000"]);

        let after = db.list_receipts("vendor::1", 10, Some(3000)).await.expect("list failed");
        let ids: Vec<&str> = after.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["receipt::2000", "receipt::1000"]);

        let limited = db.list_receipts("vendor::1", 1, None).await.expect("list failed");
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_update_receipt_status() {
        let db = setup_test().await;
        let receipt = sample_receipt(1000);
        db.insert_receipt(&receipt).await.expect("insert failed");

        let updated = db
            .update_receipt_status("vendor::1", &receipt.id, "pending")
            .await
            .expect("update failed");
        assert!(updated);

        let fetched = db.get_receipt("vendor::1", &receipt.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, "pending");

        let missing = db
            .update_receipt_status("vendor::1", "receipt::9999", "paid")
            .await
            .expect("update failed");
        assert!(!missing);
    }

    #[tokio::test]
    async fn test_delete_receipts_and_existence_check() {
        let db = setup_test().await;
        db.insert_receipt(&sample_receipt(1000)).await.expect("insert failed");
        db.insert_receipt(&sample_receipt(2000)).await.expect("insert failed");

        let ids = vec![
            "receipt::1000".to_string(),
            "receipt::2000".to_string(),
            "receipt::9999".to_string(),
        ];
        let found = db.check_receipts_exist("vendor::1", &ids).await.expect("check failed");
        assert_eq!(found.len(), 2);

        let deleted = db.delete_receipts("vendor::1", &found).await.expect("delete failed");
        assert_eq!(deleted, 2);
        assert!(db.get_receipt("vendor::1", "receipt::1000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_profile_upsert_and_slug_lookup() {
        let db = setup_test().await;
        let profile = ProfileRow {
            vendor_id: "vendor::1".to_string(),
            business_name: "Mama K Kitchen".to_string(),
            phone: None,
            tagline: Some("Good food, fast".to_string()),
            footer_message: None,
            slug: "mama-k-kitchen".to_string(),
            settings_json: "{}".to_string(),
            created_at: "2026-08-01T10:00:00+01:00".to_string(),
            updated_at: "2026-08-01T10:00:00+01:00".to_string(),
        };

        db.upsert_profile(&profile).await.expect("upsert failed");

        let by_slug = db
            .get_profile_by_slug("mama-k-kitchen")
            .await
            .expect("lookup failed")
            .expect("profile should exist");
        assert_eq!(by_slug.business_name, "Mama K Kitchen");

        assert!(!db.slug_taken("mama-k-kitchen", "vendor::1").await.unwrap());
        assert!(db.slug_taken("mama-k-kitchen", "vendor::2").await.unwrap());

        // Replacing keeps a single row per vendor
        let mut updated = profile.clone();
        updated.business_name = "Mama K Kitchen & Grill".to_string();
        db.upsert_profile(&updated).await.expect("upsert failed");
        let fetched = db.get_profile("vendor::1").await.unwrap().unwrap();
        assert_eq!(fetched.business_name, "Mama K Kitchen & Grill");
    }

    #[tokio::test]
    async fn test_menu_items_ordered_by_position() {
        let db = setup_test().await;
        for (i, name) in ["Jollof rice", "Suya", "Malt drink"].iter().enumerate() {
            let position = db.next_menu_position("vendor::1").await.expect("position failed");
            assert_eq!(position, i as i64 + 1);
            db.insert_menu_item(&MenuItemRow {
                id: format!("menu::{}", i),
                vendor_id: "vendor::1".to_string(),
                name: name.to_string(),
                description: None,
                price: "1,500".to_string(),
                position,
            })
            .await
            .expect("insert failed");
        }

        let items = db.list_menu_items("vendor::1").await.expect("list failed");
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Jollof rice", "Suya", "Malt drink"]);

        assert!(db.delete_menu_item("vendor::1", "menu::1").await.unwrap());
        assert!(!db.delete_menu_item("vendor::1", "menu::1").await.unwrap());
        assert_eq!(db.list_menu_items("vendor::1").await.unwrap().len(), 2);
    }
}
