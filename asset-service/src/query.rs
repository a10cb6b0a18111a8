//! Shared filter/sort/paginate/search convention used by every listing
//! endpoint.
//!
//! `page` defaults to 1, `limit` to 10, `sort_by` to the entity's timestamp
//! field, `sort_type` to descending. A non-empty `search_term` switches the
//! endpoint into search mode: the limit is forced to 5, the sort is forced
//! back to the default ordering, and a case-insensitive substring
//! OR-condition is added across the entity's name fields.

use mongodb::bson::{doc, Document};
use mongodb::options::FindOptions;
use serde::Deserialize;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
/// Search results are deliberately kept short regardless of the caller's
/// requested limit.
pub const SEARCH_LIMIT: i64 = 5;

/// Raw pagination/search parameters as they arrive on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOptions {
    pub page: Option<u64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub search_term: Option<String>,
}

impl ListOptions {
    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref().filter(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    Pagination,
    Search,
}

impl QueryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryMode::Pagination => "pagination",
            QueryMode::Search => "search",
        }
    }
}

/// The resolved query plan for one listing call.
#[derive(Debug, Clone)]
pub struct ResolvedQuery {
    pub page: u64,
    pub limit: i64,
    pub skip: u64,
    pub sort: Document,
    pub mode: QueryMode,
}

impl ResolvedQuery {
    /// Resolve wire options against the entity's default sort field.
    pub fn resolve(options: &ListOptions, default_sort_by: &str) -> Self {
        let page = options.page.unwrap_or(DEFAULT_PAGE).max(1);

        if options.search_term().is_some() {
            // Search mode overrides limit and sort order.
            return Self {
                page,
                limit: SEARCH_LIMIT,
                skip: (page - 1) * SEARCH_LIMIT as u64,
                sort: doc! { default_sort_by: -1 },
                mode: QueryMode::Search,
            };
        }

        let limit = options.limit.unwrap_or(DEFAULT_LIMIT).max(1);
        let sort_by = options.sort_by.as_deref().unwrap_or(default_sort_by);
        let direction = match options.sort_type.as_deref() {
            Some("asc") | Some("ASC") => 1,
            _ => -1,
        };

        Self {
            page,
            limit,
            skip: (page - 1) * limit as u64,
            sort: doc! { sort_by: direction },
            mode: QueryMode::Pagination,
        }
    }

    pub fn find_options(&self) -> FindOptions {
        FindOptions::builder()
            .sort(self.sort.clone())
            .skip(self.skip)
            .limit(self.limit)
            .build()
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        (total as f64 / self.limit as f64).ceil() as u64
    }
}

/// Escape a user-supplied search term so it matches literally inside a
/// `$regex` condition.
fn escape_regex(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if ".^$*+?()[]{}|\\".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Case-insensitive substring condition for one field.
pub fn regex_condition(field: &str, term: &str) -> Document {
    doc! { field: { "$regex": escape_regex(term), "$options": "i" } }
}

/// Add a case-insensitive substring OR-condition across `fields` when a
/// search term is present; otherwise return the filter untouched.
pub fn with_search(mut filter: Document, fields: &[&str], term: Option<&str>) -> Document {
    if let Some(term) = term {
        let conditions: Vec<Document> = fields
            .iter()
            .map(|field| regex_condition(field, term))
            .collect();
        filter.insert("$or", conditions);
    }
    filter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let resolved = ResolvedQuery::resolve(&ListOptions::default(), "createdAt");
        assert_eq!(resolved.page, 1);
        assert_eq!(resolved.limit, DEFAULT_LIMIT);
        assert_eq!(resolved.skip, 0);
        assert_eq!(resolved.sort, doc! { "createdAt": -1 });
        assert_eq!(resolved.mode, QueryMode::Pagination);
    }

    #[test]
    fn test_skip_math() {
        let options = ListOptions {
            page: Some(3),
            limit: Some(25),
            ..Default::default()
        };
        let resolved = ResolvedQuery::resolve(&options, "createdAt");
        assert_eq!(resolved.skip, 50);
        assert_eq!(resolved.limit, 25);
    }

    #[test]
    fn test_search_mode_forces_limit_and_sort() {
        let options = ListOptions {
            limit: Some(50),
            sort_by: Some("assetName".to_string()),
            sort_type: Some("asc".to_string()),
            search_term: Some("abc".to_string()),
            ..Default::default()
        };
        let resolved = ResolvedQuery::resolve(&options, "createdAt");
        assert_eq!(resolved.limit, SEARCH_LIMIT);
        assert_eq!(resolved.sort, doc! { "createdAt": -1 });
        assert_eq!(resolved.mode, QueryMode::Search);
    }

    #[test]
    fn test_blank_search_term_is_not_search_mode() {
        let options = ListOptions {
            search_term: Some("   ".to_string()),
            ..Default::default()
        };
        let resolved = ResolvedQuery::resolve(&options, "createdAt");
        assert_eq!(resolved.mode, QueryMode::Pagination);
        assert_eq!(resolved.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_ascending_sort() {
        let options = ListOptions {
            sort_by: Some("assetName".to_string()),
            sort_type: Some("asc".to_string()),
            ..Default::default()
        };
        let resolved = ResolvedQuery::resolve(&options, "createdAt");
        assert_eq!(resolved.sort, doc! { "assetName": 1 });
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let resolved = ResolvedQuery::resolve(&ListOptions::default(), "createdAt");
        assert_eq!(resolved.total_pages(0), 0);
        assert_eq!(resolved.total_pages(10), 1);
        assert_eq!(resolved.total_pages(11), 2);
    }

    #[test]
    fn test_with_search_builds_or_condition() {
        let filter = with_search(doc! { "deleted": false }, &["assetName"], Some("lap"));
        let or = filter.get_array("$or").unwrap();
        assert_eq!(or.len(), 1);
        assert_eq!(
            filter.get_array("$or").unwrap()[0],
            mongodb::bson::Bson::Document(
                doc! { "assetName": { "$regex": "lap", "$options": "i" } }
            )
        );
    }

    #[test]
    fn test_regex_metacharacters_are_escaped() {
        let condition = regex_condition("name", "a.b*c");
        let inner = condition.get_document("name").unwrap();
        assert_eq!(inner.get_str("$regex").unwrap(), "a\\.b\\*c");
    }

    #[test]
    fn test_without_search_filter_untouched() {
        let filter = with_search(doc! { "deleted": false }, &["assetName"], None);
        assert!(!filter.contains_key("$or"));
    }
}
