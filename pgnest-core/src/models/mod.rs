//! Persisted documents and the request shapes that create or change them.

pub mod audit;
pub mod booking;
pub mod promotion;
pub mod property;
pub mod user;
pub mod validate;

pub use audit::*;
pub use booking::*;
pub use promotion::*;
pub use property::*;
pub use user::*;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generate a fresh document id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// One page of a larger result set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

impl<T> Page<T> {
    /// Slice `all` into the requested page. `page` is 1-based.
    pub fn paginate(all: Vec<T>, page: usize, per_page: usize) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let total = all.len();
        let items = all
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();
        Self {
            items,
            total,
            page,
            per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate() {
        let page = Page::paginate((1..=25).collect::<Vec<_>>(), 2, 10);
        assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total, 25);

        let last = Page::paginate((1..=25).collect::<Vec<_>>(), 3, 10);
        assert_eq!(last.items, vec![21, 22, 23, 24, 25]);

        let beyond = Page::paginate((1..=5).collect::<Vec<_>>(), 4, 10);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 5);
    }

    #[test]
    fn test_paginate_clamps_zero() {
        let page = Page::paginate(vec!['a', 'b'], 0, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 1);
        assert_eq!(page.items, vec!['a']);
    }
}
