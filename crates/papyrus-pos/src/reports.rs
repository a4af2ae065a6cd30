//! # Report Service
//!
//! Fetches sale lines and purchase records for a date range and runs the
//! pure aggregators from papyrus-core.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Report Assembly                                   │
//! │                                                                         │
//! │  balance(2026-03-01, 2026-03-31)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  day_range ──► [2026-03-01 00:00:00.000, 2026-03-31 23:59:59.999]      │
//! │       │                                                                 │
//! │       ├── invoices().lines_between(from, to)                           │
//! │       ├── inventory().purchases_between(from, to)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  profit_by_article + valuation_by_movements + valuation_of_stock       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BalanceSummary (one serializable payload)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use papyrus_core::report::{
    day_range, profit_by_article, valuation_by_movements, valuation_of_stock, ProfitReport,
};
use papyrus_core::{StockedArticle, LOW_STOCK_THRESHOLD};
use papyrus_db::Database;

use crate::error::ServiceResult;

// =============================================================================
// DTOs
// =============================================================================

/// Everything the balance screen needs for one date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    /// Per-article profit rows plus the grand total.
    pub profit: ProfitReport,

    /// Purchases in, net of acquisition cost of sales out, over the range.
    pub movement_valuation_cents: i64,

    /// Current shelf value: units on hand × purchase price (not
    /// range-bound; it is a snapshot of now).
    pub stock_valuation_cents: i64,
}

// =============================================================================
// Service
// =============================================================================

/// Report assembly over the persisted history.
pub struct Reports {
    db: Database,
}

impl Reports {
    /// Creates the report service.
    pub fn new(db: Database) -> Self {
        Reports { db }
    }

    /// Per-article profit over an inclusive calendar date range.
    pub async fn profit(&self, start: NaiveDate, end: NaiveDate) -> ServiceResult<ProfitReport> {
        let (from, to) = day_range(start, end);
        debug!(%from, %to, "Assembling profit report");

        let sales = self.db.invoices().lines_between(from, to).await?;
        let purchases = self.db.inventory().purchases_between(from, to).await?;

        Ok(profit_by_article(&sales, &purchases))
    }

    /// Full balance payload: profit rows plus both valuation strategies.
    pub async fn balance(&self, start: NaiveDate, end: NaiveDate) -> ServiceResult<BalanceSummary> {
        let (from, to) = day_range(start, end);

        let sales = self.db.invoices().lines_between(from, to).await?;
        let purchases = self.db.inventory().purchases_between(from, to).await?;
        let stocked = self.db.inventory().list_stocked().await?;

        Ok(BalanceSummary {
            profit: profit_by_article(&sales, &purchases),
            movement_valuation_cents: valuation_by_movements(&purchases, &sales),
            stock_valuation_cents: valuation_of_stock(&stocked),
        })
    }

    /// Articles at or below the reorder threshold, emptiest first.
    pub async fn low_stock(&self) -> ServiceResult<Vec<StockedArticle>> {
        let mut low: Vec<StockedArticle> = self
            .db
            .inventory()
            .list_stocked()
            .await?
            .into_iter()
            .filter(|s| s.units_on_hand <= LOW_STOCK_THRESHOLD)
            .collect();

        low.sort_by_key(|s| s.units_on_hand);
        Ok(low)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Utc};
    use papyrus_core::{Customer, CustomerType, DraftLine, InvoiceDraft};
    use papyrus_db::{DbConfig, NewArticle};

    async fn db_with_history() -> Database {
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

        // 10 units bought at 2000 each, 3 sold at 3500
        db.inventory().restock(&article.id, 10, 2000).await.unwrap();
        db.invoices()
            .create(&InvoiceDraft {
                customer: Customer::new("Ana", "900123", CustomerType::Normal),
                subtotal_cents: 10_500,
                tax_cents: 0,
                total_cents: 10_500,
                lines: vec![DraftLine {
                    article_id: article.id.clone(),
                    code_snapshot: article.code.clone(),
                    name_snapshot: article.name.clone(),
                    quantity: 3,
                    sale_price_cents: 3500,
                    purchase_price_cents: 2000,
                    sold_at: Utc::now(),
                }],
            })
            .await
            .unwrap();

        db
    }

    fn today() -> NaiveDate {
        let now = Utc::now();
        NaiveDate::from_ymd_opt(now.year(), now.month(), now.day()).unwrap()
    }

    #[tokio::test]
    async fn test_profit_report_over_today() {
        let reports = Reports::new(db_with_history().await);

        let report = reports.profit(today(), today()).await.unwrap();

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].units_sold, 3);
        // (3500 - 2000) × 3
        assert_eq!(report.total_profit_cents, 4500);
    }

    #[tokio::test]
    async fn test_profit_report_empty_outside_range() {
        let reports = Reports::new(db_with_history().await);

        let long_ago = NaiveDate::from_ymd_opt(2001, 1, 1).unwrap();
        let report = reports.profit(long_ago, long_ago).await.unwrap();

        assert!(report.rows.is_empty());
        assert_eq!(report.total_profit_cents, 0);
    }

    #[tokio::test]
    async fn test_balance_carries_both_valuations() {
        let reports = Reports::new(db_with_history().await);

        let summary = reports.balance(today(), today()).await.unwrap();

        // 20_000 purchased in, 6_000 of it sold out
        assert_eq!(summary.movement_valuation_cents, 14_000);
        // 7 units left × 2000 current purchase price
        assert_eq!(summary.stock_valuation_cents, 14_000);
        assert_eq!(summary.profit.total_profit_cents, 4500);
    }

    #[tokio::test]
    async fn test_low_stock_threshold() {
        let db = db_with_history().await;

        // Second article left at zero units
        db.articles()
            .insert(&NewArticle {
                name: "Lapiz HB".to_string(),
                description: None,
                barcode: None,
                image: None,
                purchase_price_cents: 400,
                sale_price_cents: 1000,
                initial_units: 0,
            })
            .await
            .unwrap();

        let reports = Reports::new(db);
        let low = reports.low_stock().await.unwrap();

        // 7 units of notebooks are fine; the empty pencil row is flagged
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].article.name, "Lapiz HB");
    }
}
