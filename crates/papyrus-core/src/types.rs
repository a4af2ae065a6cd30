//! # Domain Types
//!
//! Core domain types used throughout Papyrus POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Article      │   │    Invoice      │   │  InvoiceLine    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  code PRO-NNNN  │   │  number FAC-..  │   │  invoice_id     │       │
//! │  │  sale_price     │   │  customer (dn)  │   │  article_id     │       │
//! │  │  purchase_price │   │  totals         │   │  qty + prices   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ InventoryRecord │   │    Customer     │   │ PurchaseRecord  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  article_id     │   │  name, tax_id   │   │  article_id     │       │
//! │  │  units >= 0     │   │  CustomerType   │   │  qty, unit cost │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every persisted entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (code, invoice number) - human-readable, sequential

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1900 bps = 19% (Colombian VAT)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Article
// =============================================================================

/// A sellable catalog item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Article {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Business identifier, sequential: `PRO-0001`, `PRO-0002`, ...
    pub code: String,

    /// Display name shown on the sales floor and on invoices.
    pub name: String,

    /// Optional longer description.
    pub description: Option<String>,

    /// Barcode delivered by the scanning peripheral.
    /// Defaults to `code` when the article was never scanned at creation.
    pub barcode: String,

    /// Optional path/URL of the article image.
    pub image: Option<String>,

    /// Acquisition price in minor units (for profit calculations).
    pub purchase_price_cents: i64,

    /// Selling price in minor units.
    pub sale_price_cents: i64,

    /// When the article was created.
    pub created_at: DateTime<Utc>,

    /// When the article was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Returns the sale price as a Money type.
    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_cents(self.sale_price_cents)
    }

    /// Returns the purchase price as a Money type.
    #[inline]
    pub fn purchase_price(&self) -> Money {
        Money::from_cents(self.purchase_price_cents)
    }
}

// =============================================================================
// Inventory
// =============================================================================

/// On-hand unit count for an article.
///
/// One record per article; created with the article and never destroyed
/// independently of it. Mutated only through increment/decrement operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryRecord {
    pub id: String,
    pub article_id: String,
    /// Unit count. Guarded decrements keep this >= 0.
    pub units: i64,
    pub updated_at: DateTime<Utc>,
}

/// An article joined with its on-hand unit count.
///
/// This is the view the cart engine works against: additions and increments
/// are validated against `units_on_hand` at call time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockedArticle {
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub article: Article,
    pub units_on_hand: i64,
}

impl StockedArticle {
    /// Checks whether `requested` total units could be sold right now.
    #[inline]
    pub fn can_sell(&self, requested: i64) -> bool {
        requested <= self.units_on_hand
    }
}

// =============================================================================
// Customer
// =============================================================================

/// Tax treatment of the customer on the invoice being built.
///
/// ## Naming Caveat
/// The naming is inherited from the business it serves and is inverted
/// relative to typical tax terminology: `Normal` customers pay NO tax,
/// `TaxExempt` customers are charged 19% VAT on the invoice. The behavior
/// is load-bearing in historical data, so it is preserved as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    /// No tax applied to the invoice.
    Normal,
    /// 19% VAT applied to the invoice subtotal.
    TaxExempt,
}

impl CustomerType {
    /// Returns the tax rate this customer type is charged.
    pub fn tax_rate(&self) -> TaxRate {
        match self {
            CustomerType::Normal => TaxRate::zero(),
            CustomerType::TaxExempt => TaxRate::from_bps(crate::VAT_RATE_BPS),
        }
    }
}

impl Default for CustomerType {
    fn default() -> Self {
        CustomerType::Normal
    }
}

/// Transient checkout input. Not persisted as its own entity; the fields are
/// denormalized onto the invoice at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub name: String,
    pub tax_id: String,
    pub customer_type: CustomerType,
}

impl Customer {
    pub fn new(
        name: impl Into<String>,
        tax_id: impl Into<String>,
        customer_type: CustomerType,
    ) -> Self {
        Customer {
            name: name.into(),
            tax_id: tax_id.into(),
            customer_type,
        }
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A finalized, persisted sale transaction.
///
/// Created atomically at checkout; immutable afterward (history only).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: String,
    /// Business identifier, sequential: `FAC-0000001`, `FAC-0000002`, ...
    /// Assigned by the persistence layer inside the creating transaction.
    pub number: String,
    pub customer_name: String,
    pub customer_tax_id: String,
    pub customer_type: CustomerType,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

/// A line item of a finalized invoice.
/// Uses snapshot pattern to freeze article data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InvoiceLine {
    pub id: String,
    pub invoice_id: String,
    pub article_id: String,
    /// Article code at time of sale (frozen).
    pub code_snapshot: String,
    /// Article name at time of sale (frozen).
    pub name_snapshot: String,
    /// Units sold.
    pub quantity: i64,
    /// Unit sale price in minor units at time of sale (frozen).
    pub sale_price_cents: i64,
    /// Unit purchase price at time of sale (frozen, for profit reports).
    pub purchase_price_cents: i64,
    pub sold_at: DateTime<Utc>,
}

impl InvoiceLine {
    /// Returns the line total (unit sale price × quantity) as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.sale_price_cents * self.quantity)
    }

    /// Profit contributed by this line: (sale − purchase) × quantity.
    #[inline]
    pub fn profit(&self) -> Money {
        Money::from_cents((self.sale_price_cents - self.purchase_price_cents) * self.quantity)
    }
}

// =============================================================================
// Purchase Record
// =============================================================================

/// A restocking event: units bought into inventory at a unit cost.
///
/// Written alongside each inventory increment; the profit/valuation reports
/// read these back to derive acquisition costs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PurchaseRecord {
    pub id: String,
    pub article_id: String,
    /// Article code at time of purchase (frozen).
    pub code_snapshot: String,
    pub quantity: i64,
    /// Cost per unit in minor units.
    pub unit_cost_cents: i64,
    /// quantity × unit_cost, stored for report convenience.
    pub total_cents: i64,
    pub purchased_at: DateTime<Utc>,
}

impl PurchaseRecord {
    /// Unit cost derived from the stored total, matching how the reports
    /// in the original system computed it (`total / quantity`).
    pub fn derived_unit_cost(&self) -> Money {
        if self.quantity == 0 {
            return Money::zero();
        }
        Money::from_cents(self.total_cents / self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1900);
        assert_eq!(rate.bps(), 1900);
        assert!((rate.percentage() - 19.0).abs() < 0.001);
    }

    #[test]
    fn test_customer_type_tax_rates() {
        assert!(CustomerType::Normal.tax_rate().is_zero());
        assert_eq!(CustomerType::TaxExempt.tax_rate().bps(), 1900);
    }

    #[test]
    fn test_customer_default_is_normal_and_empty() {
        let customer = Customer::default();
        assert_eq!(customer.customer_type, CustomerType::Normal);
        assert!(customer.name.is_empty());
        assert!(customer.tax_id.is_empty());
    }

    #[test]
    fn test_invoice_line_totals() {
        let line = InvoiceLine {
            id: "l1".to_string(),
            invoice_id: "i1".to_string(),
            article_id: "a1".to_string(),
            code_snapshot: "PRO-0001".to_string(),
            name_snapshot: "Cuaderno".to_string(),
            quantity: 3,
            sale_price_cents: 3500,
            purchase_price_cents: 2000,
            sold_at: Utc::now(),
        };
        assert_eq!(line.line_total().cents(), 10500);
        assert_eq!(line.profit().cents(), 4500);
    }

    #[test]
    fn test_stocked_article_can_sell() {
        let stocked = StockedArticle {
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
            units_on_hand: 2,
        };
        assert!(stocked.can_sell(2));
        assert!(!stocked.can_sell(3));
    }

    #[test]
    fn test_customer_serialized_shape() {
        let customer = Customer::new("Ana", "900123", CustomerType::TaxExempt);
        let json = serde_json::to_value(&customer).unwrap();

        assert_eq!(json["name"], "Ana");
        assert_eq!(json["taxId"], "900123");
        assert_eq!(json["customerType"], "tax_exempt");
    }

    #[test]
    fn test_purchase_derived_unit_cost() {
        let purchase = PurchaseRecord {
            id: "p1".to_string(),
            article_id: "a1".to_string(),
            code_snapshot: "PRO-0001".to_string(),
            quantity: 4,
            unit_cost_cents: 2000,
            total_cents: 8000,
            purchased_at: Utc::now(),
        };
        assert_eq!(purchase.derived_unit_cost().cents(), 2000);
    }
}
