//! # Article Repository
//!
//! Database operations for catalog articles.
//!
//! ## Key Operations
//! - Typed, validated insert/update contracts
//! - Lookup by id, business code, and barcode
//! - Sequential code assignment inside the inserting transaction
//!
//! ## Code Assignment
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Article Code Assignment                                │
//! │                                                                         │
//! │  insert(NewArticle { name: "Cuaderno", ... })                          │
//! │       │                                                                 │
//! │       ▼  BEGIN TRANSACTION                                              │
//! │  SELECT highest code ──► "PRO-0041"                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  next_article_code ──► "PRO-0042"                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT articles row + inventory row (0 or initial units)              │
//! │       │                                                                 │
//! │       ▼  COMMIT                                                         │
//! │  No two articles can receive the same code.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use papyrus_core::sequence::next_article_code;
use papyrus_core::validation::{
    validate_article_name, validate_barcode, validate_price_cents, ValidationResult,
};
use papyrus_core::{Article, ValidationError};

// =============================================================================
// Typed Contracts
// =============================================================================

/// Validated input for creating an article.
///
/// The business code is NOT part of the contract: it is assigned
/// sequentially inside the inserting transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    pub name: String,
    pub description: Option<String>,
    /// Scanned barcode; `None` means "use the assigned code as barcode".
    pub barcode: Option<String>,
    pub image: Option<String>,
    pub purchase_price_cents: i64,
    pub sale_price_cents: i64,
    /// Starting stock. Articles usually start at 0 and get restocked.
    pub initial_units: i64,
}

impl NewArticle {
    /// Runs all field-level checks.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_article_name(&self.name)?;
        validate_price_cents(self.purchase_price_cents)?;
        validate_price_cents(self.sale_price_cents)?;
        if let Some(barcode) = &self.barcode {
            validate_barcode(barcode)?;
        }
        if self.initial_units < 0 {
            return Err(ValidationError::OutOfRange {
                field: "initial units".to_string(),
                min: 0,
                max: i64::MAX,
            });
        }
        Ok(())
    }
}

/// Validated input for updating an article. The code and id are immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleUpdate {
    pub name: String,
    pub description: Option<String>,
    pub barcode: String,
    pub image: Option<String>,
    pub purchase_price_cents: i64,
    pub sale_price_cents: i64,
}

impl ArticleUpdate {
    /// Runs all field-level checks.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_article_name(&self.name)?;
        validate_barcode(&self.barcode)?;
        validate_price_cents(self.purchase_price_cents)?;
        validate_price_cents(self.sale_price_cents)?;
        Ok(())
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for article database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ArticleRepository::new(pool);
///
/// let article = repo.get_by_code("PRO-0001").await?;
/// let created = repo.insert(&new_article).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ArticleRepository {
    pool: SqlitePool,
}

impl ArticleRepository {
    /// Creates a new ArticleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ArticleRepository { pool }
    }

    /// Lists all articles ordered by code.
    pub async fn list(&self) -> DbResult<Vec<Article>> {
        let articles = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, code, name, description, barcode, image,
                   purchase_price_cents, sale_price_cents,
                   created_at, updated_at
            FROM articles
            ORDER BY code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(articles)
    }

    /// Gets an article by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Article))` - Article found
    /// * `Ok(None)` - Article not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Article>> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, code, name, description, barcode, image,
                   purchase_price_cents, sale_price_cents,
                   created_at, updated_at
            FROM articles
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(article)
    }

    /// Gets an article by its business code (e.g. `PRO-0001`).
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Article>> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, code, name, description, barcode, image,
                   purchase_price_cents, sale_price_cents,
                   created_at, updated_at
            FROM articles
            WHERE code = ?1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(article)
    }

    /// Gets an article by its barcode (the scanner's lookup path).
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Article>> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, code, name, description, barcode, image,
                   purchase_price_cents, sale_price_cents,
                   created_at, updated_at
            FROM articles
            WHERE barcode = ?1
            "#,
        )
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(article)
    }

    /// Highest assigned article code, for advisory "next code" display.
    ///
    /// Ordered by length first so `PRO-10000` ranks above `PRO-9999` once
    /// the suffix outgrows its padding.
    pub async fn last_code(&self) -> DbResult<Option<String>> {
        let code: Option<String> = sqlx::query_scalar(
            "SELECT code FROM articles ORDER BY LENGTH(code) DESC, code DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(code)
    }

    /// Inserts a new article with a freshly assigned sequential code,
    /// creating its inventory row in the same transaction.
    ///
    /// ## Returns
    /// * `Ok(Article)` - Inserted article with its assigned code
    /// * `Err(DbError::QueryFailed)` - Validation failed
    /// * `Err(DbError::UniqueViolation)` - Barcode/code collision
    pub async fn insert(&self, new: &NewArticle) -> DbResult<Article> {
        new.validate()?;

        let mut tx = self.pool.begin().await?;

        let last: Option<String> = sqlx::query_scalar(
            "SELECT code FROM articles ORDER BY LENGTH(code) DESC, code DESC LIMIT 1",
        )
        .fetch_optional(&mut *tx)
        .await?;

        let code = next_article_code(last.as_deref())?;
        let now = Utc::now();

        let article = Article {
            id: Uuid::new_v4().to_string(),
            code: code.clone(),
            name: new.name.trim().to_string(),
            description: new.description.clone(),
            barcode: new.barcode.clone().unwrap_or_else(|| code.clone()),
            image: new.image.clone(),
            purchase_price_cents: new.purchase_price_cents,
            sale_price_cents: new.sale_price_cents,
            created_at: now,
            updated_at: now,
        };

        debug!(code = %article.code, name = %article.name, "Inserting article");

        sqlx::query(
            r#"
            INSERT INTO articles (
                id, code, name, description, barcode, image,
                purchase_price_cents, sale_price_cents,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&article.id)
        .bind(&article.code)
        .bind(&article.name)
        .bind(&article.description)
        .bind(&article.barcode)
        .bind(&article.image)
        .bind(article.purchase_price_cents)
        .bind(article.sale_price_cents)
        .bind(article.created_at)
        .bind(article.updated_at)
        .execute(&mut *tx)
        .await?;

        // Every article carries an inventory row from birth
        sqlx::query(
            "INSERT INTO inventory (id, article_id, units, updated_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&article.id)
        .bind(new.initial_units)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(article)
    }

    /// Updates an existing article's mutable fields.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Article doesn't exist
    pub async fn update(&self, id: &str, update: &ArticleUpdate) -> DbResult<()> {
        update.validate()?;

        debug!(id = %id, "Updating article");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE articles SET
                name = ?2,
                description = ?3,
                barcode = ?4,
                image = ?5,
                purchase_price_cents = ?6,
                sale_price_cents = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(update.name.trim())
        .bind(&update.description)
        .bind(&update.barcode)
        .bind(&update.image)
        .bind(update.purchase_price_cents)
        .bind(update.sale_price_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Article", id));
        }

        Ok(())
    }

    /// Counts total articles (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
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

    fn new_article(name: &str, sale_price: i64) -> NewArticle {
        NewArticle {
            name: name.to_string(),
            description: None,
            barcode: None,
            image: None,
            purchase_price_cents: sale_price / 2,
            sale_price_cents: sale_price,
            initial_units: 0,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_codes() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let first = db.articles().insert(&new_article("Cuaderno", 3500)).await.unwrap();
        let second = db.articles().insert(&new_article("Lapiz", 1000)).await.unwrap();

        assert_eq!(first.code, "PRO-0001");
        assert_eq!(second.code, "PRO-0002");
        assert_eq!(db.articles().last_code().await.unwrap().as_deref(), Some("PRO-0002"));
    }

    #[tokio::test]
    async fn test_barcode_defaults_to_code() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let article = db.articles().insert(&new_article("Borrador", 800)).await.unwrap();
        assert_eq!(article.barcode, article.code);

        let found = db.articles().get_by_barcode("PRO-0001").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_insert_creates_inventory_row() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut with_stock = new_article("Regla", 1200);
        with_stock.initial_units = 7;
        let article = db.articles().insert(&with_stock).await.unwrap();

        let units = db.inventory().units_for(&article.id).await.unwrap();
        assert_eq!(units, 7);
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_input() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let empty_name = new_article("   ", 1000);
        assert!(db.articles().insert(&empty_name).await.is_err());

        let negative_price = NewArticle {
            sale_price_cents: -5,
            ..new_article("Tijeras", 1000)
        };
        assert!(db.articles().insert(&negative_price).await.is_err());
    }

    #[tokio::test]
    async fn test_get_by_code_and_update() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let article = db.articles().insert(&new_article("Grapadora", 9000)).await.unwrap();

        let update = ArticleUpdate {
            name: "Grapadora metalica".to_string(),
            description: Some("Para 20 hojas".to_string()),
            barcode: article.barcode.clone(),
            image: None,
            purchase_price_cents: 5000,
            sale_price_cents: 9500,
        };
        db.articles().update(&article.id, &update).await.unwrap();

        let reloaded = db.articles().get_by_code("PRO-0001").await.unwrap().unwrap();
        assert_eq!(reloaded.name, "Grapadora metalica");
        assert_eq!(reloaded.sale_price_cents, 9500);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let update = ArticleUpdate {
            name: "Nada".to_string(),
            description: None,
            barcode: "0000".to_string(),
            image: None,
            purchase_price_cents: 0,
            sale_price_cents: 0,
        };

        let err = db.articles().update("missing-id", &update).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
