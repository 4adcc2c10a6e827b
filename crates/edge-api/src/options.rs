//! Collection query parameters.

use std::fmt;
use std::str::FromStr;

use crate::ApiError;

/// Default number of entities per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortOrder::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Err(format!("invalid sort order '{}', expected 'asc' or 'desc'", s))
        }
    }
}

/// Pagination, sorting and filtering for a list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// 1-based page number.
    pub page: u32,
    /// Maximum entities per page.
    pub page_size: u32,
    pub sort: SortOrder,
    /// Field to order by, when the resource supports it.
    pub order_by: Option<String>,
    /// Free-text name filter, when the resource supports it.
    pub filter: Option<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort: SortOrder::default(),
            order_by: None,
            filter: None,
        }
    }
}

impl ListOptions {
    /// Options for one page of `page_size` entities.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            ..Self::default()
        }
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(field.into());
        self
    }

    /// Set the name filter; blank filters are dropped.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        let filter = filter.into();
        self.filter = if filter.trim().is_empty() {
            None
        } else {
            Some(filter)
        };
        self
    }

    /// Reject non-positive pagination values.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.page == 0 {
            return Err(ApiError::Invalid("page must be at least 1".to_string()));
        }
        if self.page_size == 0 {
            return Err(ApiError::Invalid("page size must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Reject identifiers the service could never have assigned.
pub fn validate_id(id: i64) -> Result<(), ApiError> {
    if id < 1 {
        return Err(ApiError::Invalid(format!(
            "id must be a positive integer, got {}",
            id
        )));
    }
    Ok(())
}
