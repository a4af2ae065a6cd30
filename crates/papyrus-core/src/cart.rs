//! # Invoice Cart Engine
//!
//! The in-memory, single-session structure that accumulates line items
//! against live inventory counts, computes subtotal/tax/total, and emits a
//! finalized invoice payload.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Engine Operations                               │
//! │                                                                         │
//! │  User Action              Operation               State Change          │
//! │  ───────────              ─────────               ────────────          │
//! │                                                                         │
//! │  Click Article ──────────► add_article() ───────► line qty+1 or new    │
//! │                                                                         │
//! │  Scan Barcode ───────────► scan_barcode() ──────► same as add_article  │
//! │                                                                         │
//! │  Click + / − ────────────► increment() / ───────► qty±1; removal at    │
//! │                            decrement()            quantity 1           │
//! │                                                                         │
//! │  Fill Customer Form ─────► set_customer() ──────► replaces customer    │
//! │                                                                         │
//! │  Click Pay ──────────────► build_draft() ───────► (read only payload)  │
//! │                                                                         │
//! │  Persistence confirmed ──► clear() ─────────────► empty lines,         │
//! │                                                   default customer     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by article `code`; insertion order is preserved
//! - Every line has `quantity >= 1`; decrement at 1 removes the line
//! - No add/increment ever pushes a line past `units_on_hand` at call time
//! - `subtotal = Σ line_total`; `tax = 0` for Normal customers, else 19%
//! - Stock-check or validation failures leave the cart untouched

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Customer, StockedArticle};
use crate::validation::validate_checkout_customer;

// =============================================================================
// Cart Line
// =============================================================================

/// A line of the invoice-in-progress.
///
/// ## Design Notes
/// - `article_id`: Reference to the article (for persistence)
/// - Prices are frozen copies taken when the line is created, so the cart
///   displays consistent totals even if the catalog changes underneath.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Article ID (UUID).
    pub article_id: String,

    /// Business code at time of adding (frozen); also the line's lookup key.
    pub code: String,

    /// Article name at time of adding (frozen).
    pub name: String,

    /// Unit sale price in minor units at time of adding (frozen).
    pub sale_price_cents: i64,

    /// Unit purchase price at time of adding (frozen, carried onto the
    /// invoice line for profit reports).
    pub purchase_price_cents: i64,

    /// Units in the cart. Always >= 1.
    pub quantity: i64,

    /// When this line was first added.
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a quantity-1 line from a stocked article, freezing prices.
    fn from_article(stocked: &StockedArticle) -> Self {
        CartLine {
            article_id: stocked.article.id.clone(),
            code: stocked.article.code.clone(),
            name: stocked.article.name.clone(),
            sale_price_cents: stocked.article.sale_price_cents,
            purchase_price_cents: stocked.article.purchase_price_cents,
            quantity: 1,
            added_at: Utc::now(),
        }
    }

    /// Line total: unit sale price × quantity.
    #[inline]
    pub fn line_total_cents(&self) -> i64 {
        self.sale_price_cents * self.quantity
    }

    /// Line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents())
    }
}

// =============================================================================
// Invoice Draft
// =============================================================================

/// The typed payload `build_draft` emits for the persistence layer.
///
/// The invoice `number` is deliberately absent: it is assigned by the store
/// inside the creating transaction, so two concurrent sessions can never
/// collide on a client-computed value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    pub customer: Customer,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub lines: Vec<DraftLine>,
}

/// A line of an invoice draft, carrying both unit prices and the sale date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftLine {
    pub article_id: String,
    pub code_snapshot: String,
    pub name_snapshot: String,
    pub quantity: i64,
    pub sale_price_cents: i64,
    pub purchase_price_cents: i64,
    pub sold_at: DateTime<Utc>,
}

// =============================================================================
// Cart
// =============================================================================

/// The invoice cart engine.
///
/// Owns the loaded catalog snapshot (articles with on-hand unit counts),
/// the ordered lines of the invoice-in-progress, and the customer fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Currently loaded articles with stock counts. Lookup source for
    /// add/scan/increment stock checks.
    catalog: Vec<StockedArticle>,

    /// Lines in insertion order, unique by article code.
    lines: Vec<CartLine>,

    /// Checkout input; validated only at `build_draft`.
    customer: Customer,
}

impl Cart {
    /// Creates a new empty cart with no catalog loaded.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Replaces the loaded catalog snapshot.
    ///
    /// Existing lines are kept: their prices are already frozen, and their
    /// next increment is re-checked against the new counts.
    pub fn load_catalog(&mut self, catalog: Vec<StockedArticle>) {
        self.catalog = catalog;
    }

    /// Returns the loaded catalog.
    pub fn catalog(&self) -> &[StockedArticle] {
        &self.catalog
    }

    /// Returns the current lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Returns the current customer fields.
    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    /// Replaces the customer state. No validation until checkout.
    pub fn set_customer(&mut self, customer: Customer) {
        self.customer = customer;
    }

    /// Looks up a loaded article by business code.
    pub fn find_article(&self, code: &str) -> Option<&StockedArticle> {
        self.catalog.iter().find(|s| s.article.code == code)
    }

    /// Looks up a loaded article by barcode.
    pub fn find_by_barcode(&self, barcode: &str) -> Option<&StockedArticle> {
        self.catalog.iter().find(|s| s.article.barcode == barcode)
    }

    // -------------------------------------------------------------------------
    // Line mutation
    // -------------------------------------------------------------------------

    /// Adds one unit of an article: increments the existing line, or inserts
    /// a new quantity-1 line. Both paths share the same stock check.
    ///
    /// ## Errors
    /// - `ArticleNotFound` when `code` is not in the loaded catalog
    /// - `InsufficientStock` when one more unit would exceed on-hand units
    pub fn add_article(&mut self, code: &str) -> CoreResult<()> {
        if self.lines.iter().any(|l| l.code == code) {
            return self.increment(code);
        }

        let stocked = self
            .find_article(code)
            .ok_or_else(|| CoreError::ArticleNotFound(code.to_string()))?;

        Self::check_stock(stocked, 1)?;

        let line = CartLine::from_article(stocked);
        self.lines.push(line);
        Ok(())
    }

    /// Primary input path for the barcode-scanning peripheral: the scanner
    /// delivers a decoded string token, out-of-band from keyboard input.
    ///
    /// Found → behaves like `add_article`; not found → `ArticleNotFound`
    /// with no state change.
    pub fn scan_barcode(&mut self, token: &str) -> CoreResult<()> {
        let code = self
            .find_by_barcode(token)
            .map(|s| s.article.code.clone())
            .ok_or_else(|| CoreError::ArticleNotFound(token.to_string()))?;

        self.add_article(&code)
    }

    /// Increments the quantity of an existing line by one.
    ///
    /// Quantity and line total update together; a failed stock check leaves
    /// no partial state visible.
    pub fn increment(&mut self, code: &str) -> CoreResult<()> {
        let current = self
            .lines
            .iter()
            .find(|l| l.code == code)
            .map(|l| l.quantity)
            .ok_or_else(|| CoreError::ArticleNotFound(code.to_string()))?;

        let stocked = self
            .find_article(code)
            .ok_or_else(|| CoreError::ArticleNotFound(code.to_string()))?;

        Self::check_stock(stocked, current + 1)?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.code == code) {
            line.quantity += 1;
        }
        Ok(())
    }

    /// Decrements the quantity of an existing line by one.
    ///
    /// A quantity-1 line is removed entirely: no zero-quantity line ever
    /// exists in the cart.
    pub fn decrement(&mut self, code: &str) -> CoreResult<()> {
        let position = self
            .lines
            .iter()
            .position(|l| l.code == code)
            .ok_or_else(|| CoreError::ArticleNotFound(code.to_string()))?;

        if self.lines[position].quantity > 1 {
            self.lines[position].quantity -= 1;
        } else {
            self.lines.remove(position);
        }
        Ok(())
    }

    /// Shared stock-bound check for add/scan/increment.
    fn check_stock(stocked: &StockedArticle, requested: i64) -> CoreResult<()> {
        if !stocked.can_sell(requested) {
            return Err(CoreError::InsufficientStock {
                code: stocked.article.code.clone(),
                available: stocked.units_on_hand,
                requested,
            });
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Totals
    // -------------------------------------------------------------------------

    /// Subtotal: sum of all line totals.
    pub fn subtotal_cents(&self) -> i64 {
        self.lines.iter().map(|l| l.line_total_cents()).sum()
    }

    /// Tax: zero for Normal customers, 19% of the subtotal otherwise.
    pub fn tax_cents(&self) -> i64 {
        Money::from_cents(self.subtotal_cents())
            .calculate_tax(self.customer.customer_type.tax_rate())
            .cents()
    }

    /// Grand total: subtotal + tax.
    pub fn total_cents(&self) -> i64 {
        self.subtotal_cents() + self.tax_cents()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total unit quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    // -------------------------------------------------------------------------
    // Checkout
    // -------------------------------------------------------------------------

    /// Builds the invoice payload for the persistence layer.
    ///
    /// ## Preconditions
    /// - At least one line (`EmptyCart` otherwise)
    /// - Customer name and tax id non-empty (`ValidationError` otherwise)
    ///
    /// Failure leaves the cart untouched; this method never mutates state.
    /// Clearing happens in `clear()`, which the caller invokes only after
    /// the store confirms persistence.
    pub fn build_draft(&self) -> CoreResult<InvoiceDraft> {
        if self.lines.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        validate_checkout_customer(&self.customer)?;

        let now = Utc::now();
        let lines = self
            .lines
            .iter()
            .map(|l| DraftLine {
                article_id: l.article_id.clone(),
                code_snapshot: l.code.clone(),
                name_snapshot: l.name.clone(),
                quantity: l.quantity,
                sale_price_cents: l.sale_price_cents,
                purchase_price_cents: l.purchase_price_cents,
                sold_at: now,
            })
            .collect();

        Ok(InvoiceDraft {
            customer: self.customer.clone(),
            subtotal_cents: self.subtotal_cents(),
            tax_cents: self.tax_cents(),
            total_cents: self.total_cents(),
            lines,
        })
    }

    /// Drops all lines and resets the customer to the default
    /// (Normal, empty name and tax id). The catalog snapshot is kept.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.customer = Customer::default();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
