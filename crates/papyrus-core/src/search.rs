//! # Search & Pagination
//!
//! In-memory filtering and paging over the loaded article catalog.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Search & Pagination Flow                             │
//! │                                                                         │
//! │  Loaded catalog (Vec<StockedArticle>)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  filter_articles("cuad")  ──► name contains (case-insensitive)         │
//! │                               OR code contains                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  paginate(results, page)  ──► PAGE_SIZE = 8 per page                   │
//! │                               page clamped to [1, page_count]          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog for a single stationery shop fits comfortably in memory, so
//! filtering and slicing happen client-side over the loaded snapshot rather
//! than as SQL queries per keystroke.

use serde::{Deserialize, Serialize};

use crate::types::StockedArticle;
use crate::PAGE_SIZE;

// =============================================================================
// Filtering
// =============================================================================

/// Filters articles by a search query.
///
/// Matches when the query is a case-insensitive substring of the article
/// name, or a substring of the business code. An empty query matches all.
pub fn filter_articles<'a>(query: &str, items: &'a [StockedArticle]) -> Vec<&'a StockedArticle> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return items.iter().collect();
    }

    items
        .iter()
        .filter(|s| {
            s.article.name.to_lowercase().contains(&query)
                || s.article.code.to_lowercase().contains(&query)
        })
        .collect()
}

// =============================================================================
// Pagination
// =============================================================================

/// One page of results, with enough metadata to render prev/next controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items on this page (at most `PAGE_SIZE`).
    pub items: Vec<T>,

    /// 1-based page index, clamped to `[1, page_count]`.
    pub page: usize,

    /// Total number of pages. At least 1, even with no items.
    pub page_count: usize,

    /// Total items across all pages.
    pub total: usize,
}

impl<T> Page<T> {
    /// Checks if a next page exists.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }

    /// Checks if a previous page exists.
    #[inline]
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Number of pages for `total` items. An empty result still has one page.
pub fn page_count(total: usize) -> usize {
    if total == 0 {
        1
    } else {
        total.div_ceil(PAGE_SIZE)
    }
}

/// Slices one page out of `items`.
///
/// `page` is 1-based and clamped: 0 behaves as 1, anything past the end
/// behaves as the last page. Navigation can never run off either edge.
pub fn paginate<T: Clone>(items: &[T], page: usize) -> Page<T> {
    let total = items.len();
    let pages = page_count(total);
    let page = page.clamp(1, pages);

    let start = (page - 1) * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(total);
    let items = if start < total {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        items,
        page,
        page_count: pages,
        total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Article;
    use chrono::Utc;

    fn stocked(code: &str, name: &str) -> StockedArticle {
        StockedArticle {
            article: Article {
                id: format!("id-{}", code),
                code: code.to_string(),
                name: name.to_string(),
                description: None,
                barcode: code.to_string(),
                image: None,
                purchase_price_cents: 1000,
                sale_price_cents: 2000,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            units_on_hand: 5,
        }
    }

    fn catalog() -> Vec<StockedArticle> {
        vec![
            stocked("PRO-0001", "Cuaderno rayado"),
            stocked("PRO-0002", "Cuaderno cuadriculado"),
            stocked("PRO-0003", "Lapiz HB"),
            stocked("PRO-0004", "Borrador"),
        ]
    }

    #[test]
    fn test_filter_by_name_case_insensitive() {
        let items = catalog();
        let hits = filter_articles("CUADERNO", &items);
        assert_eq!(hits.len(), 2);

        let hits = filter_articles("lapiz", &items);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].article.code, "PRO-0003");
    }

    #[test]
    fn test_filter_by_code_substring() {
        let items = catalog();
        let hits = filter_articles("PRO-0004", &items);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].article.name, "Borrador");

        // Partial code matches too
        let hits = filter_articles("0003", &items);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_empty_query_matches_all() {
        let items = catalog();
        assert_eq!(filter_articles("", &items).len(), 4);
        assert_eq!(filter_articles("   ", &items).len(), 4);
    }

    #[test]
    fn test_no_match_returns_empty() {
        let items = catalog();
        assert!(filter_articles("grapadora", &items).is_empty());
    }

    #[test]
    fn test_paginate_slices_eight_per_page() {
        let items: Vec<i32> = (1..=20).collect();

        let page1 = paginate(&items, 1);
        assert_eq!(page1.items, (1..=8).collect::<Vec<_>>());
        assert_eq!(page1.page_count, 3);
        assert!(page1.has_next());
        assert!(!page1.has_prev());

        let page3 = paginate(&items, 3);
        assert_eq!(page3.items, vec![17, 18, 19, 20]);
        assert!(!page3.has_next());
        assert!(page3.has_prev());
    }

    #[test]
    fn test_paginate_clamps_both_edges() {
        let items: Vec<i32> = (1..=20).collect();

        // Page 0 behaves as page 1
        let clamped_low = paginate(&items, 0);
        assert_eq!(clamped_low.page, 1);

        // Past-the-end behaves as the last page
        let clamped_high = paginate(&items, 99);
        assert_eq!(clamped_high.page, 3);
        assert_eq!(clamped_high.items, vec![17, 18, 19, 20]);
    }

    #[test]
    fn test_paginate_empty_input() {
        let items: Vec<i32> = Vec::new();
        let page = paginate(&items, 1);

        assert!(page.items.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.page_count, 1);
        assert_eq!(page.total, 0);
        assert!(!page.has_next());
        assert!(!page.has_prev());
    }

    #[test]
    fn test_exact_multiple_of_page_size() {
        let items: Vec<i32> = (1..=16).collect();
        assert_eq!(page_count(items.len()), 2);

        let page2 = paginate(&items, 2);
        assert_eq!(page2.items.len(), 8);
        assert!(!page2.has_next());
    }
}
