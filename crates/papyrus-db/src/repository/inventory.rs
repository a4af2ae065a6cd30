//! # Inventory Repository
//!
//! Database operations for on-hand unit counts and restocking history.
//!
//! ## Stock Mutation Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Inventory Movements                                 │
//! │                                                                         │
//! │  restock(article, qty, unit_cost)                                      │
//! │    ├── UPDATE inventory SET units = units + qty                        │
//! │    └── INSERT purchases row (same transaction)                         │
//! │         The purchase record is what the profit/valuation               │
//! │         reports read back later.                                       │
//! │                                                                         │
//! │  withdraw(article, qty)      ← shrinkage, damage, manual correction    │
//! │    └── UPDATE ... SET units = units - qty                              │
//! │        WHERE article_id = ? AND units >= qty                           │
//! │         Guard in the WHERE clause: if it matches no row the stock      │
//! │         would have gone negative, and the call fails instead.          │
//! │                                                                         │
//! │  Sale decrements live in InvoiceRepository::create (same guard).       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use papyrus_core::validation::{validate_price_cents, validate_quantity};
use papyrus_core::{PurchaseRecord, StockedArticle};

/// Repository for inventory database operations.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Lists all articles joined with their on-hand unit counts, ordered
    /// by code. This is the catalog snapshot the cart engine loads.
    pub async fn list_stocked(&self) -> DbResult<Vec<StockedArticle>> {
        let stocked = sqlx::query_as::<_, StockedArticle>(
            r#"
            SELECT a.id, a.code, a.name, a.description, a.barcode, a.image,
                   a.purchase_price_cents, a.sale_price_cents,
                   a.created_at, a.updated_at,
                   i.units AS units_on_hand
            FROM articles a
            INNER JOIN inventory i ON i.article_id = a.id
            ORDER BY a.code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stocked)
    }

    /// Current on-hand units for an article.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No inventory row for this article
    pub async fn units_for(&self, article_id: &str) -> DbResult<i64> {
        let units: Option<i64> =
            sqlx::query_scalar("SELECT units FROM inventory WHERE article_id = ?1")
                .bind(article_id)
                .fetch_optional(&self.pool)
                .await?;

        units.ok_or_else(|| DbError::not_found("Inventory", article_id))
    }

    /// Restocks an article: increments its unit count and records the
    /// purchase, in one transaction.
    ///
    /// ## Returns
    /// The written purchase record.
    pub async fn restock(
        &self,
        article_id: &str,
        quantity: i64,
        unit_cost_cents: i64,
    ) -> DbResult<PurchaseRecord> {
        validate_quantity(quantity)?;
        validate_price_cents(unit_cost_cents)?;

        debug!(article_id = %article_id, quantity, unit_cost_cents, "Restocking article");

        let mut tx = self.pool.begin().await?;

        let code: Option<String> = sqlx::query_scalar("SELECT code FROM articles WHERE id = ?1")
            .bind(article_id)
            .fetch_optional(&mut *tx)
            .await?;
        let code = code.ok_or_else(|| DbError::not_found("Article", article_id))?;

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE inventory SET units = units + ?2, updated_at = ?3 WHERE article_id = ?1",
        )
        .bind(article_id)
        .bind(quantity)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory", article_id));
        }

        let purchase = PurchaseRecord {
            id: Uuid::new_v4().to_string(),
            article_id: article_id.to_string(),
            code_snapshot: code,
            quantity,
            unit_cost_cents,
            total_cents: quantity * unit_cost_cents,
            purchased_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO purchases (
                id, article_id, code_snapshot, quantity,
                unit_cost_cents, total_cents, purchased_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&purchase.id)
        .bind(&purchase.article_id)
        .bind(&purchase.code_snapshot)
        .bind(purchase.quantity)
        .bind(purchase.unit_cost_cents)
        .bind(purchase.total_cents)
        .bind(purchase.purchased_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(purchase)
    }

    /// Withdraws units outside a sale (shrinkage, damage, corrections).
    ///
    /// The decrement is guarded: stock can never go below zero. A request
    /// for more units than are on hand fails with `StockConflict` and
    /// changes nothing.
    ///
    /// ## Returns
    /// The remaining unit count after the withdrawal.
    pub async fn withdraw(&self, article_id: &str, quantity: i64) -> DbResult<i64> {
        validate_quantity(quantity)?;

        debug!(article_id = %article_id, quantity, "Withdrawing stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE inventory
            SET units = units - ?2, updated_at = ?3
            WHERE article_id = ?1 AND units >= ?2
            "#,
        )
        .bind(article_id)
        .bind(quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Distinguish "no such article" from "not enough units"
            let exists: Option<i64> =
                sqlx::query_scalar("SELECT units FROM inventory WHERE article_id = ?1")
                    .bind(article_id)
                    .fetch_optional(&self.pool)
                    .await?;

            return match exists {
                None => Err(DbError::not_found("Inventory", article_id)),
                Some(_) => Err(DbError::StockConflict {
                    article_id: article_id.to_string(),
                    requested: quantity,
                }),
            };
        }

        self.units_for(article_id).await
    }

    /// Purchase records inside an inclusive datetime range, oldest first.
    /// Input to the profit and movement-valuation reports.
    pub async fn purchases_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<Vec<PurchaseRecord>> {
        let purchases = sqlx::query_as::<_, PurchaseRecord>(
            r#"
            SELECT id, article_id, code_snapshot, quantity,
                   unit_cost_cents, total_cents, purchased_at
            FROM purchases
            WHERE purchased_at >= ?1 AND purchased_at <= ?2
            ORDER BY purchased_at
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(purchases)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::article::NewArticle;
    use chrono::TimeZone;

    async fn seeded_db() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let article = db
            .articles()
            .insert(&NewArticle {
                name: "Cuaderno rayado".to_string(),
                description: None,
                barcode: None,
                image: None,
                purchase_price_cents: 2000,
                sale_price_cents: 3500,
                initial_units: 0,
            })
            .await
            .unwrap();
        (db, article.id)
    }

    #[tokio::test]
    async fn test_restock_increments_and_records_purchase() {
        let (db, article_id) = seeded_db().await;

        let purchase = db.inventory().restock(&article_id, 10, 2000).await.unwrap();

        assert_eq!(purchase.total_cents, 20_000);
        assert_eq!(purchase.code_snapshot, "PRO-0001");
        assert_eq!(db.inventory().units_for(&article_id).await.unwrap(), 10);

        let far_past = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let far_future = Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).unwrap();
        let purchases = db
            .inventory()
            .purchases_between(far_past, far_future)
            .await
            .unwrap();
        assert_eq!(purchases.len(), 1);
    }

    #[tokio::test]
    async fn test_withdraw_guarded_never_negative() {
        let (db, article_id) = seeded_db().await;
        db.inventory().restock(&article_id, 5, 2000).await.unwrap();

        let remaining = db.inventory().withdraw(&article_id, 3).await.unwrap();
        assert_eq!(remaining, 2);

        // Asking for more than on hand fails and changes nothing
        let err = db.inventory().withdraw(&article_id, 3).await.unwrap_err();
        assert!(matches!(err, DbError::StockConflict { requested: 3, .. }));
        assert_eq!(db.inventory().units_for(&article_id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_withdraw_unknown_article_is_not_found() {
        let (db, _) = seeded_db().await;

        let err = db.inventory().withdraw("missing-id", 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_restock_rejects_bad_input() {
        let (db, article_id) = seeded_db().await;

        assert!(db.inventory().restock(&article_id, 0, 2000).await.is_err());
        assert!(db.inventory().restock(&article_id, 5, -1).await.is_err());
        assert!(db.inventory().restock("missing-id", 5, 2000).await.is_err());
    }

    #[tokio::test]
    async fn test_list_stocked_joins_counts() {
        let (db, article_id) = seeded_db().await;
        db.inventory().restock(&article_id, 4, 2000).await.unwrap();

        let stocked = db.inventory().list_stocked().await.unwrap();
        assert_eq!(stocked.len(), 1);
        assert_eq!(stocked[0].article.code, "PRO-0001");
        assert_eq!(stocked[0].units_on_hand, 4);
    }
}
