//! # Reports Module
//!
//! Profit and inventory-valuation aggregation over sale lines and purchase
//! records, filtered by an inclusive date range.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Report Pipeline                                  │
//! │                                                                         │
//! │  PurchaseRecords ──┐                                                    │
//! │                    ├──► day_range(start, end) filter                    │
//! │  InvoiceLines ─────┘         │                                          │
//! │                              ▼                                          │
//! │              ┌───────────────┴───────────────┐                          │
//! │              ▼                               ▼                          │
//! │      profit_by_article()          valuation_by_movements()              │
//! │      per-code profit rows         purchases in − sale cost out          │
//! │      + grand total                                                      │
//! │                                                                         │
//! │      valuation_of_stock()  ← snapshot strategy, no date range           │
//! │      units_on_hand × purchase_price                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Valuation Strategies
//! The business historically computed inventory value two different ways and
//! never reconciled them. Both are kept as named functions so their outputs
//! can be compared side by side until the owner settles on one:
//! - `valuation_by_movements`: money that entered inventory via purchases,
//!   net of the acquisition cost of everything sold since.
//! - `valuation_of_stock`: what the units currently on the shelf cost.
//! The two agree only when every purchase was made at the article's current
//! purchase price and no stock was withdrawn outside a sale.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{InvoiceLine, PurchaseRecord, StockedArticle};

// =============================================================================
// Date Range
// =============================================================================

/// Expands two calendar dates into an inclusive UTC datetime range:
/// `[start 00:00:00.000, end 23:59:59.999]`.
///
/// A report "from 2026-03-01 to 2026-03-01" covers that whole day.
pub fn day_range(start: NaiveDate, end: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let from = Utc.from_utc_datetime(&start.and_hms_opt(0, 0, 0).unwrap_or_default());
    let to = Utc.from_utc_datetime(&end.and_hms_milli_opt(23, 59, 59, 999).unwrap_or_default());
    (from, to)
}

/// Keeps the sale lines whose `sold_at` falls inside the inclusive range.
pub fn lines_in_range(
    lines: &[InvoiceLine],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<InvoiceLine> {
    lines
        .iter()
        .filter(|l| l.sold_at >= from && l.sold_at <= to)
        .cloned()
        .collect()
}

/// Keeps the purchases whose `purchased_at` falls inside the inclusive range.
pub fn purchases_in_range(
    purchases: &[PurchaseRecord],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<PurchaseRecord> {
    purchases
        .iter()
        .filter(|p| p.purchased_at >= from && p.purchased_at <= to)
        .cloned()
        .collect()
}

// =============================================================================
// Profit Report
// =============================================================================

/// Accumulated profit for one article code over the reporting window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleProfit {
    pub code: String,
    pub name: String,
    pub units_sold: i64,
    /// Σ sale_price × quantity over the window.
    pub revenue_cents: i64,
    /// Σ unit_cost × quantity over the window.
    pub cost_cents: i64,
    /// revenue − cost.
    pub profit_cents: i64,
}

/// The full profit report: one row per article sold, plus the grand total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitReport {
    pub rows: Vec<ArticleProfit>,
    pub total_profit_cents: i64,
}

/// Unit acquisition cost for a sale line: the first purchase record carrying
/// the same article code, read as `total / quantity`. Falls back to the
/// purchase price frozen on the line when no purchase record exists (e.g.
/// stock seeded before purchase tracking started).
fn unit_cost_for(line: &InvoiceLine, purchases: &[PurchaseRecord]) -> i64 {
    purchases
        .iter()
        .find(|p| p.code_snapshot == line.code_snapshot)
        .map(|p| p.derived_unit_cost().cents())
        .unwrap_or(line.purchase_price_cents)
}

/// Aggregates per-article profit from sale lines and purchase records.
///
/// Per line: `(sale_price − unit_cost) × quantity`, where the unit cost is
/// resolved by `unit_cost_for`. Rows appear in first-sold order; the grand
/// total is the sum over all rows.
pub fn profit_by_article(sales: &[InvoiceLine], purchases: &[PurchaseRecord]) -> ProfitReport {
    let mut rows: Vec<ArticleProfit> = Vec::new();

    for line in sales {
        let unit_cost = unit_cost_for(line, purchases);
        let revenue = line.sale_price_cents * line.quantity;
        let cost = unit_cost * line.quantity;

        match rows.iter_mut().find(|r| r.code == line.code_snapshot) {
            Some(row) => {
                row.units_sold += line.quantity;
                row.revenue_cents += revenue;
                row.cost_cents += cost;
                row.profit_cents += revenue - cost;
            }
            None => rows.push(ArticleProfit {
                code: line.code_snapshot.clone(),
                name: line.name_snapshot.clone(),
                units_sold: line.quantity,
                revenue_cents: revenue,
                cost_cents: cost,
                profit_cents: revenue - cost,
            }),
        }
    }

    let total_profit_cents = rows.iter().map(|r| r.profit_cents).sum();

    ProfitReport {
        rows,
        total_profit_cents,
    }
}

// =============================================================================
// Valuation Strategies
// =============================================================================

/// Movement-based valuation: purchase money in, minus the acquisition cost
/// of everything sold. Can go negative when sales outpace recorded purchases
/// (stock that was seeded rather than bought).
pub fn valuation_by_movements(purchases: &[PurchaseRecord], sales: &[InvoiceLine]) -> i64 {
    let cost_in: i64 = purchases.iter().map(|p| p.total_cents).sum();
    let cost_out: i64 = sales
        .iter()
        .map(|l| unit_cost_for(l, purchases) * l.quantity)
        .sum();

    cost_in - cost_out
}

/// Snapshot valuation: what the units currently on hand cost at each
/// article's current purchase price.
pub fn valuation_of_stock(stocked: &[StockedArticle]) -> i64 {
    stocked
        .iter()
        .map(|s| s.units_on_hand * s.article.purchase_price_cents)
        .sum()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Article;

    fn line(code: &str, qty: i64, sale_price: i64, purchase_price: i64) -> InvoiceLine {
        InvoiceLine {
            id: uuid::Uuid::new_v4().to_string(),
            invoice_id: "inv-1".to_string(),
            article_id: format!("id-{}", code),
            code_snapshot: code.to_string(),
            name_snapshot: format!("Article {}", code),
            quantity: qty,
            sale_price_cents: sale_price,
            purchase_price_cents: purchase_price,
            sold_at: Utc::now(),
        }
    }

    fn purchase(code: &str, qty: i64, unit_cost: i64) -> PurchaseRecord {
        PurchaseRecord {
            id: uuid::Uuid::new_v4().to_string(),
            article_id: format!("id-{}", code),
            code_snapshot: code.to_string(),
            quantity: qty,
            unit_cost_cents: unit_cost,
            total_cents: qty * unit_cost,
            purchased_at: Utc::now(),
        }
    }

    #[test]
    fn test_profit_uses_first_matching_purchase() {
        // Two purchases of the same code at different costs: the first wins
        let purchases = vec![purchase("PRO-0001", 10, 2000), purchase("PRO-0001", 5, 9000)];
        let sales = vec![line("PRO-0001", 3, 3500, 1111)];

        let report = profit_by_article(&sales, &purchases);

        assert_eq!(report.rows.len(), 1);
        let row = &report.rows[0];
        assert_eq!(row.units_sold, 3);
        assert_eq!(row.revenue_cents, 10500);
        assert_eq!(row.cost_cents, 6000);
        assert_eq!(row.profit_cents, 4500);
        assert_eq!(report.total_profit_cents, 4500);
    }

    #[test]
    fn test_profit_falls_back_to_line_snapshot() {
        // No purchase record for this code: use the frozen purchase price
        let sales = vec![line("PRO-0002", 2, 5000, 3000)];

        let report = profit_by_article(&sales, &[]);

        assert_eq!(report.rows[0].cost_cents, 6000);
        assert_eq!(report.rows[0].profit_cents, 4000);
    }

    #[test]
    fn test_profit_accumulates_per_code() {
        let purchases = vec![purchase("PRO-0001", 10, 2000)];
        let sales = vec![
            line("PRO-0001", 1, 3500, 2000),
            line("PRO-0002", 2, 1000, 500),
            line("PRO-0001", 2, 3500, 2000),
        ];

        let report = profit_by_article(&sales, &purchases);

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].code, "PRO-0001");
        assert_eq!(report.rows[0].units_sold, 3);
        assert_eq!(report.rows[0].profit_cents, 4500);
        assert_eq!(report.rows[1].profit_cents, 1000);
        assert_eq!(report.total_profit_cents, 5500);
    }

    #[test]
    fn test_empty_window_reports_zero() {
        let report = profit_by_article(&[], &[]);
        assert!(report.rows.is_empty());
        assert_eq!(report.total_profit_cents, 0);
    }

    #[test]
    fn test_valuation_by_movements_nets_cost_out() {
        let purchases = vec![purchase("PRO-0001", 10, 2000)]; // 20_000 in
        let sales = vec![line("PRO-0001", 3, 3500, 2000)]; // 6_000 out at cost

        assert_eq!(valuation_by_movements(&purchases, &sales), 14_000);
    }

    #[test]
    fn test_valuation_by_movements_can_go_negative() {
        // Sales of seeded stock with no recorded purchase
        let sales = vec![line("PRO-0001", 3, 3500, 2000)];
        assert_eq!(valuation_by_movements(&[], &sales), -6000);
    }

    #[test]
    fn test_valuation_of_stock() {
        let stocked = vec![
            StockedArticle {
                article: Article {
                    id: "a1".to_string(),
                    code: "PRO-0001".to_string(),
                    name: "Cuaderno".to_string(),
                    description: None,
                    barcode: "PRO-0001".to_string(),
                    image: None,
                    purchase_price_cents: 2000,
                    sale_price_cents: 3500,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                },
                units_on_hand: 4,
            },
            StockedArticle {
                article: Article {
                    id: "a2".to_string(),
                    code: "PRO-0002".to_string(),
                    name: "Lapiz".to_string(),
                    description: None,
                    barcode: "PRO-0002".to_string(),
                    image: None,
                    purchase_price_cents: 500,
                    sale_price_cents: 1000,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                },
                units_on_hand: 10,
            },
        ];

        assert_eq!(valuation_of_stock(&stocked), 13_000);
    }

    #[test]
    fn test_day_range_is_inclusive_of_both_ends() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let (from, to) = day_range(start, end);

        let first_instant = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let last_sale = Utc.with_ymd_and_hms(2026, 3, 2, 23, 59, 59).unwrap();
        let next_day = Utc.with_ymd_and_hms(2026, 3, 3, 0, 0, 0).unwrap();

        assert!(first_instant >= from && first_instant <= to);
        assert!(last_sale >= from && last_sale <= to);
        assert!(next_day > to);
    }

    #[test]
    fn test_range_filters() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let (from, to) = day_range(start, start);

        let mut inside = line("PRO-0001", 1, 1000, 500);
        inside.sold_at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut outside = line("PRO-0001", 1, 1000, 500);
        outside.sold_at = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 1).unwrap();

        let kept = lines_in_range(&[inside, outside], from, to);
        assert_eq!(kept.len(), 1);

        let mut bought = purchase("PRO-0001", 1, 500);
        bought.purchased_at = Utc.with_ymd_and_hms(2026, 2, 28, 23, 0, 0).unwrap();
        assert!(purchases_in_range(&[bought], from, to).is_empty());
    }
}
