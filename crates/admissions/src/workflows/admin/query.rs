use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::resource::AdminResource;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Query string sent with every list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    /// Extra `key=value` pairs forwarded verbatim, e.g. `status=new`.
    pub filters: BTreeMap<String, String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: None,
            filters: BTreeMap::new(),
        }
    }
}

impl ListQuery {
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.max(1).to_string()),
            ("limit".to_string(), self.limit.max(1).to_string()),
        ];
        if let Some(search) = self.search.as_deref().filter(|value| !value.trim().is_empty()) {
            pairs.push(("search".to_string(), search.trim().to_string()));
        }
        pairs.extend(
            self.filters
                .iter()
                .filter(|(_, value)| !is_unfiltered(value))
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        pairs
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub has_more: bool,
}

/// Standard list response: `{ success, data, pagination }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEnvelope<T> {
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> PageEnvelope<T> {
    /// Pagination metadata, synthesised from the query when the server omits it.
    pub fn pagination_or(&self, query: &ListQuery) -> Pagination {
        self.pagination.unwrap_or(Pagination {
            total: self.data.len() as u64,
            page: query.page,
            limit: query.limit,
            has_more: false,
        })
    }
}

fn is_unfiltered(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("all")
}

/// Client-side predicate applied to the rows already loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub search: String,
    pub facets: BTreeMap<String, String>,
}

impl ListFilter {
    pub fn matches<R: AdminResource>(&self, row: &R) -> bool {
        let needle = self.search.trim().to_lowercase();
        let search_hit = needle.is_empty()
            || row
                .search_text()
                .iter()
                .any(|text| text.to_lowercase().contains(&needle));

        search_hit
            && self
                .facets
                .iter()
                .filter(|(_, wanted)| !is_unfiltered(wanted))
                .all(|(name, wanted)| {
                    row.facet(name)
                        .map(|actual| actual.eq_ignore_ascii_case(wanted.trim()))
                        .unwrap_or(false)
                })
    }
}
