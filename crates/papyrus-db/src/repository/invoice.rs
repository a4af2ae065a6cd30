//! # Invoice Repository
//!
//! Database operations for finalized invoices.
//!
//! ## Atomic Checkout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   create(draft) — one transaction                       │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ├─ 1. SELECT last invoice number ──► "FAC-0000042"                  │
//! │    │     next_invoice_number ──► "FAC-0000043"                         │
//! │    │     Assigned HERE, inside the transaction. A number computed      │
//! │    │     by the cart before checkout is advisory display only.         │
//! │    │                                                                    │
//! │    ├─ 2. INSERT invoices row                                           │
//! │    │                                                                    │
//! │    ├─ 3. For each line:                                                │
//! │    │      INSERT invoice_lines row                                     │
//! │    │      UPDATE inventory SET units = units - qty                     │
//! │    │        WHERE article_id = ? AND units >= qty                      │
//! │    │      └── guard matched no row? ROLLBACK (StockConflict)           │
//! │    │                                                                    │
//! │  COMMIT — invoice, lines, and stock all move together, or not at all  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Invoices are immutable once committed; there is no update path.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use papyrus_core::sequence::next_invoice_number;
use papyrus_core::{Invoice, InvoiceDraft, InvoiceLine};

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Persists an invoice draft atomically: assigns the next sequential
    /// number, inserts the invoice and its lines, and decrements inventory
    /// per line with a never-below-zero guard.
    ///
    /// ## Returns
    /// * `Ok(Invoice)` - The committed invoice with its assigned number
    /// * `Err(DbError::StockConflict)` - A line asked for more units than
    ///   on hand; nothing was written
    pub async fn create(&self, draft: &InvoiceDraft) -> DbResult<Invoice> {
        let mut tx = self.pool.begin().await?;

        let last: Option<String> = sqlx::query_scalar(
            "SELECT number FROM invoices ORDER BY LENGTH(number) DESC, number DESC LIMIT 1",
        )
        .fetch_optional(&mut *tx)
        .await?;

        let number = next_invoice_number(last.as_deref())?;
        let now = Utc::now();

        let invoice = Invoice {
            id: Uuid::new_v4().to_string(),
            number: number.clone(),
            customer_name: draft.customer.name.trim().to_string(),
            customer_tax_id: draft.customer.tax_id.trim().to_string(),
            customer_type: draft.customer.customer_type,
            subtotal_cents: draft.subtotal_cents,
            tax_cents: draft.tax_cents,
            total_cents: draft.total_cents,
            created_at: now,
        };

        debug!(number = %invoice.number, lines = draft.lines.len(), "Creating invoice");

        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, number, customer_name, customer_tax_id, customer_type,
                subtotal_cents, tax_cents, total_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&invoice.id)
        .bind(&invoice.number)
        .bind(&invoice.customer_name)
        .bind(&invoice.customer_tax_id)
        .bind(invoice.customer_type)
        .bind(invoice.subtotal_cents)
        .bind(invoice.tax_cents)
        .bind(invoice.total_cents)
        .bind(invoice.created_at)
        .execute(&mut *tx)
        .await?;

        for line in &draft.lines {
            sqlx::query(
                r#"
                INSERT INTO invoice_lines (
                    id, invoice_id, article_id, code_snapshot, name_snapshot,
                    quantity, sale_price_cents, purchase_price_cents, sold_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&invoice.id)
            .bind(&line.article_id)
            .bind(&line.code_snapshot)
            .bind(&line.name_snapshot)
            .bind(line.quantity)
            .bind(line.sale_price_cents)
            .bind(line.purchase_price_cents)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            // Guarded decrement: matching no row means the sale would
            // overdraw stock, and the whole invoice rolls back
            let result = sqlx::query(
                r#"
                UPDATE inventory
                SET units = units - ?2, updated_at = ?3
                WHERE article_id = ?1 AND units >= ?2
                "#,
            )
            .bind(&line.article_id)
            .bind(line.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(DbError::StockConflict {
                    article_id: line.article_id.clone(),
                    requested: line.quantity,
                });
            }
        }

        tx.commit().await?;

        info!(
            number = %invoice.number,
            total_cents = invoice.total_cents,
            "Invoice committed"
        );

        Ok(invoice)
    }

    /// Gets an invoice by its business number (e.g. `FAC-0000001`).
    pub async fn get_by_number(&self, number: &str) -> DbResult<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, number, customer_name, customer_tax_id, customer_type,
                   subtotal_cents, tax_cents, total_cents, created_at
            FROM invoices
            WHERE number = ?1
            "#,
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Gets all lines for an invoice, in insertion order.
    pub async fn lines_for(&self, invoice_id: &str) -> DbResult<Vec<InvoiceLine>> {
        let lines = sqlx::query_as::<_, InvoiceLine>(
            r#"
            SELECT id, invoice_id, article_id, code_snapshot, name_snapshot,
                   quantity, sale_price_cents, purchase_price_cents, sold_at
            FROM invoice_lines
            WHERE invoice_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Highest committed invoice number, for advisory next-number display.
    pub async fn last_number(&self) -> DbResult<Option<String>> {
        let number: Option<String> = sqlx::query_scalar(
            "SELECT number FROM invoices ORDER BY LENGTH(number) DESC, number DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(number)
    }

    /// Most recent invoices, newest first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, number, customer_name, customer_tax_id, customer_type,
                   subtotal_cents, tax_cents, total_cents, created_at
            FROM invoices
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    /// Sale lines inside an inclusive datetime range, oldest first.
    /// Input to the profit and movement-valuation reports.
    pub async fn lines_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<Vec<InvoiceLine>> {
        let lines = sqlx::query_as::<_, InvoiceLine>(
            r#"
            SELECT id, invoice_id, article_id, code_snapshot, name_snapshot,
                   quantity, sale_price_cents, purchase_price_cents, sold_at
            FROM invoice_lines
            WHERE sold_at >= ?1 AND sold_at <= ?2
            ORDER BY sold_at
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Counts total invoices (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
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
    use papyrus_core::{Customer, CustomerType, DraftLine};

    async fn db_with_article(units: i64) -> (Database, papyrus_core::Article) {
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
                initial_units: units,
            })
            .await
            .unwrap();
        (db, article)
    }

    fn draft_for(article: &papyrus_core::Article, quantity: i64) -> InvoiceDraft {
        let subtotal = article.sale_price_cents * quantity;
        InvoiceDraft {
            customer: Customer::new("Ana", "900123", CustomerType::Normal),
            subtotal_cents: subtotal,
            tax_cents: 0,
            total_cents: subtotal,
            lines: vec![DraftLine {
                article_id: article.id.clone(),
                code_snapshot: article.code.clone(),
                name_snapshot: article.name.clone(),
                quantity,
                sale_price_cents: article.sale_price_cents,
                purchase_price_cents: article.purchase_price_cents,
                sold_at: Utc::now(),
            }],
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_numbers() {
        let (db, article) = db_with_article(10).await;

        let first = db.invoices().create(&draft_for(&article, 1)).await.unwrap();
        let second = db.invoices().create(&draft_for(&article, 1)).await.unwrap();

        assert_eq!(first.number, "FAC-0000001");
        assert_eq!(second.number, "FAC-0000002");
        assert_eq!(
            db.invoices().last_number().await.unwrap().as_deref(),
            Some("FAC-0000002")
        );
    }

    #[tokio::test]
    async fn test_create_decrements_stock() {
        let (db, article) = db_with_article(10).await;

        db.invoices().create(&draft_for(&article, 3)).await.unwrap();

        assert_eq!(db.inventory().units_for(&article.id).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_overdraw_rolls_back_everything() {
        let (db, article) = db_with_article(2).await;

        let err = db.invoices().create(&draft_for(&article, 3)).await.unwrap_err();
        assert!(matches!(err, DbError::StockConflict { requested: 3, .. }));

        // Nothing committed: no invoice, no lines, stock untouched
        assert_eq!(db.invoices().count().await.unwrap(), 0);
        assert_eq!(db.inventory().units_for(&article.id).await.unwrap(), 2);
        assert!(db.invoices().last_number().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_number_with_lines() {
        let (db, article) = db_with_article(5).await;

        let created = db.invoices().create(&draft_for(&article, 2)).await.unwrap();

        let found = db
            .invoices()
            .get_by_number(&created.number)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.customer_name, "Ana");
        assert_eq!(found.total_cents, 7000);

        let lines = db.invoices().lines_for(&found.id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].code_snapshot, "PRO-0001");
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].purchase_price_cents, 2000);
    }

    #[tokio::test]
    async fn test_lines_between_filters_by_sold_at() {
        use chrono::TimeZone;
        let (db, article) = db_with_article(5).await;
        db.invoices().create(&draft_for(&article, 1)).await.unwrap();

        let past = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let future = Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(db.invoices().lines_between(past, future).await.unwrap().len(), 1);
        assert!(db.invoices().lines_between(past, past).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_recent_newest_first() {
        let (db, article) = db_with_article(10).await;
        db.invoices().create(&draft_for(&article, 1)).await.unwrap();
        db.invoices().create(&draft_for(&article, 1)).await.unwrap();
        db.invoices().create(&draft_for(&article, 1)).await.unwrap();

        let recent = db.invoices().list_recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent[0].created_at >= recent[1].created_at);
    }
}
