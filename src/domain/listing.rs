//! Paging and ordering shared by every list endpoint.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::domain::errors::DomainError;

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Result<Self, DomainError> {
        if page == 0 {
            return Err(DomainError::validation("page must be greater than 0"));
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(DomainError::validation(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}"
            )));
        }
        Ok(Self { page, per_page })
    }

    pub fn offset(&self) -> usize {
        let pages_before = usize::try_from(self.page.saturating_sub(1)).unwrap_or(usize::MAX);
        let per_page = usize::try_from(self.per_page).unwrap_or(usize::MAX);
        pages_before.saturating_mul(per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

/// Cuts an already filtered and sorted collection down to one page.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = u64::try_from(items.len()).unwrap_or(u64::MAX);
    let total_pages = if total == 0 {
        0
    } else {
        u32::try_from(total.div_ceil(u64::from(request.per_page))).unwrap_or(u32::MAX)
    };

    let per_page = usize::try_from(request.per_page).unwrap_or(usize::MAX);
    let items = items
        .into_iter()
        .skip(request.offset())
        .take(per_page)
        .collect();

    Page {
        items,
        page: request.page,
        per_page: request.per_page,
        total,
        total_pages,
    }
}

/// Case-insensitive substring match used by the `search` parameters.
pub fn contains_ignore_case(haystack: &str, needle_lowercase: &str) -> bool {
    haystack.to_lowercase().contains(needle_lowercase)
}

/// Trims a free-text search term; blank terms disable the filter.
pub fn normalize_search(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_lowercase())
        .filter(|value| !value.is_empty())
}
