//! Pagination, sort and filter parameters for list views.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Sort direction as understood by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDir {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDir::Asc),
            "DESC" => Ok(SortDir::Desc),
            other => Err(AppError::validation(format!("unknown sort direction '{other}'"))),
        }
    }
}

/// Active/inactive record filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    /// Value of the `isActive` query parameter; `None` omits it.
    pub fn is_active(&self) -> Option<bool> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Active => Some(true),
            StatusFilter::Inactive => Some(false),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Inactive => "inactive",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "inactive" => Ok(StatusFilter::Inactive),
            other => Err(AppError::validation(format!("unknown status filter '{other}'"))),
        }
    }
}

/// The parameters driving one list fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    pub page: u32,
    pub size: u32,
    pub sort_by: String,
    pub sort_dir: SortDir,
    pub filter: String,
    pub status: StatusFilter,
}

impl QueryState {
    pub fn new(size: u32, sort_by: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            page: 0,
            size: size.max(1),
            sort_by: sort_by.into(),
            sort_dir: SortDir::Asc,
            filter: String::new(),
            status,
        }
    }

    /// Student list starts sorted by first name, showing active students.
    pub fn students(size: u32) -> Self {
        Self::new(size, "firstName", StatusFilter::Active)
    }

    /// Department list starts sorted by name, showing everything.
    pub fn departments(size: u32) -> Self {
        Self::new(size, "name", StatusFilter::All)
    }

    /// Move to another page. Leaves every other parameter alone.
    pub fn set_page(&mut self, page: u32) -> bool {
        replace(&mut self.page, page)
    }

    /// Change rows per page and go back to the first page.
    ///
    /// A zero size is ignored.
    pub fn set_size(&mut self, size: u32) -> bool {
        if size == 0 {
            return false;
        }
        let reset = replace(&mut self.page, 0);
        replace(&mut self.size, size) | reset
    }

    /// Same column flips direction; another column becomes active ascending.
    pub fn toggle_sort(&mut self, column: &str) -> bool {
        if self.sort_by == column {
            self.sort_dir = self.sort_dir.flipped();
        } else {
            self.sort_by = column.to_string();
            self.sort_dir = SortDir::Asc;
        }
        true
    }

    /// Replace the free-text filter and go back to the first page.
    pub fn set_filter(&mut self, filter: impl Into<String>) -> bool {
        let reset = replace(&mut self.page, 0);
        replace(&mut self.filter, filter.into()) | reset
    }

    /// Replace the status filter and go back to the first page.
    pub fn set_status(&mut self, status: StatusFilter) -> bool {
        let reset = replace(&mut self.page, 0);
        replace(&mut self.status, status) | reset
    }

    /// Query string pairs for a paginated list request.
    pub fn list_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
            ("sortBy", self.sort_by.clone()),
            ("sortDir", self.sort_dir.to_string()),
        ];
        params.extend(self.filter_params());
        params
    }

    /// Query string pairs shared by list and export requests.
    pub fn filter_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.filter.is_empty() {
            params.push(("filter", self.filter.clone()));
        }
        if let Some(active) = self.status.is_active() {
            params.push(("isActive", active.to_string()));
        }
        params
    }
}

/// One user action against a list's query state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryChange {
    Page(u32),
    Size(u32),
    Sort(String),
    Filter(String),
    Status(StatusFilter),
}

impl QueryChange {
    /// Apply to `state`, returning whether anything changed.
    pub fn apply(self, state: &mut QueryState) -> bool {
        match self {
            QueryChange::Page(page) => state.set_page(page),
            QueryChange::Size(size) => state.set_size(size),
            QueryChange::Sort(column) => state.toggle_sort(&column),
            QueryChange::Filter(filter) => state.set_filter(filter),
            QueryChange::Status(status) => state.set_status(status),
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_page_three() -> QueryState {
        let mut state = QueryState::students(10);
        state.set_filter("li");
        state.set_page(3);
        state
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut state = on_page_three();
        assert!(state.set_filter("jo"));
        assert_eq!(state.page, 0);
        assert_eq!(state.filter, "jo");
    }

    #[test]
    fn test_status_change_resets_page() {
        let mut state = on_page_three();
        assert!(state.set_status(StatusFilter::Inactive));
        assert_eq!(state.page, 0);
    }

    #[test]
    fn test_size_change_resets_page() {
        let mut state = on_page_three();
        assert!(state.set_size(20));
        assert_eq!((state.page, state.size), (0, 20));
        assert!(!state.set_size(0));
    }

    #[test]
    fn test_page_and_sort_keep_filters() {
        let mut state = on_page_three();
        state.set_status(StatusFilter::Inactive);
        state.set_page(2);
        state.toggle_sort("firstName");
        assert_eq!(state.page, 2);
        assert_eq!(state.filter, "li");
        assert_eq!(state.status, StatusFilter::Inactive);
        assert_eq!(state.sort_dir, SortDir::Desc);
    }

    #[test]
    fn test_toggle_sort() {
        let mut state = QueryState::new(10, "name", StatusFilter::All);
        state.toggle_sort("name");
        assert_eq!((state.sort_by.as_str(), state.sort_dir), ("name", SortDir::Desc));
        state.toggle_sort("email");
        assert_eq!((state.sort_by.as_str(), state.sort_dir), ("email", SortDir::Asc));
    }

    #[test]
    fn test_unchanged_values_are_noops() {
        let mut state = QueryState::departments(10);
        assert!(!state.set_page(0));
        assert!(!state.set_filter(""));
        assert!(!state.set_status(StatusFilter::All));
    }

    #[test]
    fn test_list_params() {
        let mut state = QueryState::students(10);
        assert_eq!(
            state.list_params(),
            vec![
                ("page", "0".to_string()),
                ("size", "10".to_string()),
                ("sortBy", "firstName".to_string()),
                ("sortDir", "ASC".to_string()),
                ("isActive", "true".to_string()),
            ]
        );

        state.set_status(StatusFilter::All);
        state.set_filter("smith");
        assert_eq!(state.filter_params(), vec![("filter", "smith".to_string())]);
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("desc".parse::<SortDir>().unwrap(), SortDir::Desc);
        assert_eq!("Inactive".parse::<StatusFilter>().unwrap(), StatusFilter::Inactive);
        assert!("sideways".parse::<SortDir>().is_err());
    }
}
