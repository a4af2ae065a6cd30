//! # POS Session
//!
//! The single-register session: one cart, one database handle.
//!
//! ## Thread Safety
//! The cart sits behind a `tokio::sync::Mutex` because:
//! 1. Callers may issue operations concurrently
//! 2. Only one operation should mutate the cart at a time
//! 3. Checkout holds the lock across its database await, so no cart
//!    mutation can slip in between draft-building and clearing
//!
//! ## Session Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     PosSession Operations                               │
//! │                                                                         │
//! │  Caller Action            Session Method          Effect                │
//! │  ─────────────            ──────────────          ──────                │
//! │                                                                         │
//! │  Open register ──────────► refresh_catalog() ───► load stocked articles│
//! │                                                                         │
//! │  Click article ──────────► add_article() ───────► cart line +1         │
//! │  Scan barcode ───────────► scan_barcode() ──────► cart line +1         │
//! │  Click + / − ────────────► increment()/ ────────► qty ±1               │
//! │                            decrement()                                  │
//! │  Fill customer form ─────► set_customer()                              │
//! │  Type in search box ─────► search_page() ───────► filtered page of 8   │
//! │                                                                         │
//! │  Click Pay ──────────────► checkout()                                  │
//! │     │                                                                   │
//! │     ├── build_draft (validation; cart untouched on failure)            │
//! │     ├── InvoiceRepository::create (atomic number + lines + stock)      │
//! │     ├── FAILURE? cart preserved for retry ── is_retryable()            │
//! │     └── SUCCESS: clear cart, reload stock counts                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use papyrus_core::search::{filter_articles, paginate};
use papyrus_core::sequence::next_invoice_number;
use papyrus_core::validation::validate_search_query;
use papyrus_core::{Cart, CartLine, Customer, Invoice, Page, StockedArticle};
use papyrus_db::Database;

use crate::error::ServiceResult;

// =============================================================================
// DTOs
// =============================================================================

/// Read-only snapshot of the cart, for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub customer: Customer,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

// =============================================================================
// Session
// =============================================================================

/// A point-of-sale session for one register.
///
/// ## Usage
/// ```rust,ignore
/// let session = PosSession::new(db);
/// session.refresh_catalog().await?;
///
/// session.add_article("PRO-0001").await?;
/// session.set_customer(customer).await;
/// let invoice = session.checkout().await?;
/// ```
pub struct PosSession {
    cart: Mutex<Cart>,
    db: Database,
}

impl PosSession {
    /// Creates a session with an empty cart and no catalog loaded.
    /// Call `refresh_catalog` before selling.
    pub fn new(db: Database) -> Self {
        PosSession {
            cart: Mutex::new(Cart::new()),
            db,
        }
    }

    /// Reloads the catalog snapshot (articles joined with unit counts)
    /// into the cart. Existing lines keep their frozen prices.
    pub async fn refresh_catalog(&self) -> ServiceResult<()> {
        let stocked = self.db.inventory().list_stocked().await?;
        debug!(articles = stocked.len(), "Catalog refreshed");

        let mut cart = self.cart.lock().await;
        cart.load_catalog(stocked);
        Ok(())
    }

    /// Adds one unit of an article by business code.
    pub async fn add_article(&self, code: &str) -> ServiceResult<()> {
        let mut cart = self.cart.lock().await;
        cart.add_article(code)?;
        Ok(())
    }

    /// Adds one unit via a scanned barcode token.
    pub async fn scan_barcode(&self, token: &str) -> ServiceResult<()> {
        let mut cart = self.cart.lock().await;
        cart.scan_barcode(token)?;
        Ok(())
    }

    /// Increments an existing cart line.
    pub async fn increment(&self, code: &str) -> ServiceResult<()> {
        let mut cart = self.cart.lock().await;
        cart.increment(code)?;
        Ok(())
    }

    /// Decrements an existing cart line (removes it at quantity 1).
    pub async fn decrement(&self, code: &str) -> ServiceResult<()> {
        let mut cart = self.cart.lock().await;
        cart.decrement(code)?;
        Ok(())
    }

    /// Replaces the customer fields. Validation happens at checkout.
    pub async fn set_customer(&self, customer: Customer) {
        let mut cart = self.cart.lock().await;
        cart.set_customer(customer);
    }

    /// Current cart snapshot with totals.
    pub async fn cart_view(&self) -> CartView {
        let cart = self.cart.lock().await;
        CartView {
            lines: cart.lines().to_vec(),
            customer: cart.customer().clone(),
            subtotal_cents: cart.subtotal_cents(),
            tax_cents: cart.tax_cents(),
            total_cents: cart.total_cents(),
        }
    }

    /// Filters the loaded catalog and returns one page of 8 results.
    /// Page numbers are clamped at both ends.
    pub async fn search_page(&self, query: &str, page: usize) -> ServiceResult<Page<StockedArticle>> {
        let query = validate_search_query(query).map_err(papyrus_core::CoreError::from)?;

        let cart = self.cart.lock().await;
        let hits: Vec<StockedArticle> = filter_articles(&query, cart.catalog())
            .into_iter()
            .cloned()
            .collect();

        Ok(paginate(&hits, page))
    }

    /// Advisory display of the number the next invoice will likely get.
    /// The real number is assigned inside the checkout transaction.
    pub async fn next_invoice_number_hint(&self) -> ServiceResult<String> {
        let last = self.db.invoices().last_number().await?;
        let next = next_invoice_number(last.as_deref()).map_err(papyrus_core::CoreError::from)?;
        Ok(next)
    }

    /// Finalizes the sale.
    ///
    /// ## Steps
    /// 1. Build the draft (customer validation; failure leaves cart intact)
    /// 2. Persist atomically (number assignment + lines + stock decrements)
    /// 3. Only on success: clear the cart and reload stock counts
    ///
    /// A persistence failure is retryable: the cart is exactly as it was.
    pub async fn checkout(&self) -> ServiceResult<Invoice> {
        let mut cart = self.cart.lock().await;

        let draft = cart.build_draft()?;
        let invoice = self.db.invoices().create(&draft).await?;

        info!(
            number = %invoice.number,
            total_cents = invoice.total_cents,
            "Checkout complete"
        );

        cart.clear();
        let stocked = self.db.inventory().list_stocked().await?;
        cart.load_catalog(stocked);

        Ok(invoice)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use papyrus_core::CustomerType;
    use papyrus_db::{DbConfig, NewArticle};

    async fn session_with_catalog() -> PosSession {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        for (name, purchase, sale, units) in [
            ("Cuaderno rayado", 2000_i64, 3500_i64, 10_i64),
            ("Lapiz HB", 400, 1000, 1),
        ] {
            db.articles()
                .insert(&NewArticle {
                    name: name.to_string(),
                    description: None,
                    barcode: None,
                    image: None,
                    purchase_price_cents: purchase,
                    sale_price_cents: sale,
                    initial_units: units,
                })
                .await
                .unwrap();
        }

        let session = PosSession::new(db);
        session.refresh_catalog().await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_add_and_totals() {
        let session = session_with_catalog().await;

        session.add_article("PRO-0001").await.unwrap();
        session.add_article("PRO-0001").await.unwrap();

        let view = session.cart_view().await;
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.subtotal_cents, 7000);
        assert_eq!(view.tax_cents, 0);
        assert_eq!(view.total_cents, 7000);
    }

    #[tokio::test]
    async fn test_stock_bound_enforced_through_session() {
        let session = session_with_catalog().await;

        // Lapiz has a single unit on hand
        session.add_article("PRO-0002").await.unwrap();
        let err = session.add_article("PRO-0002").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(session.cart_view().await.lines[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_checkout_persists_and_clears() {
        let session = session_with_catalog().await;

        session.add_article("PRO-0001").await.unwrap();
        session
            .set_customer(Customer::new("Ana", "900123", CustomerType::TaxExempt))
            .await;

        let invoice = session.checkout().await.unwrap();
        assert_eq!(invoice.number, "FAC-0000001");
        assert_eq!(invoice.subtotal_cents, 3500);
        assert_eq!(invoice.tax_cents, 665); // 19% of 3500
        assert_eq!(invoice.total_cents, 4165);

        // Cart cleared, customer reset, stock counts reloaded
        let view = session.cart_view().await;
        assert!(view.lines.is_empty());
        assert_eq!(view.customer, Customer::default());

        let page = session.search_page("Cuaderno", 1).await.unwrap();
        assert_eq!(page.items[0].units_on_hand, 9);
    }

    #[tokio::test]
    async fn test_checkout_without_customer_preserves_cart() {
        let session = session_with_catalog().await;
        session.add_article("PRO-0001").await.unwrap();

        let err = session.checkout().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let view = session.cart_view().await;
        assert_eq!(view.lines.len(), 1, "failed checkout must not touch the cart");
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_is_cart_error() {
        let session = session_with_catalog().await;
        session
            .set_customer(Customer::new("Ana", "900123", CustomerType::Normal))
            .await;

        let err = session.checkout().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[tokio::test]
    async fn test_stale_catalog_conflict_preserves_cart() {
        let session = session_with_catalog().await;

        // Cart believes 10 units exist; stock shrinks behind its back
        session.add_article("PRO-0001").await.unwrap();
        let article = session
            .search_page("Cuaderno", 1)
            .await
            .unwrap()
            .items
            .remove(0);
        session
            .db
            .inventory()
            .withdraw(&article.article.id, 10)
            .await
            .unwrap();

        session
            .set_customer(Customer::new("Ana", "900123", CustomerType::Normal))
            .await;

        let err = session.checkout().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        // Cart intact; no invoice was written
        assert_eq!(session.cart_view().await.lines.len(), 1);
        assert_eq!(session.db.invoices().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_scan_barcode_and_number_hint() {
        let session = session_with_catalog().await;

        // Unseeded barcode falls back to the article code
        session.scan_barcode("PRO-0002").await.unwrap();
        assert_eq!(session.cart_view().await.lines[0].code, "PRO-0002");

        assert_eq!(
            session.next_invoice_number_hint().await.unwrap(),
            "FAC-0000001"
        );
    }

    #[tokio::test]
    async fn test_search_pagination_through_session() {
        let session = session_with_catalog().await;

        let all = session.search_page("", 1).await.unwrap();
        assert_eq!(all.total, 2);
        assert_eq!(all.page_count, 1);

        let miss = session.search_page("grapadora", 1).await.unwrap();
        assert_eq!(miss.total, 0);
    }
}
