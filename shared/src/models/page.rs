//! Paginated query result

use serde::{Deserialize, Serialize};

/// One page of a server-side query (zero-based `number`)
///
/// Recreated on every fetch, never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
    pub size: u32,
}

impl<T> Page<T> {
    pub fn empty(number: u32, size: u32) -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            number,
            size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 0
    }
}
