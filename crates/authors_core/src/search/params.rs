//! Search parameter normalization and page result shaping.
//!
//! # Invariants
//! - Resolved `page` and `per_page` are always >= 1, so `skip` never goes
//!   negative.
//! - Sorting only ever targets a whitelisted [`AuthorSortField`]; unknown
//!   names fall back to `createdAt desc`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PER_PAGE: u64 = 15;

/// Ordering direction.
///
/// Deserializes through [`FromStr`], so `"DESC"` and `"desc"` are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unsupported sort direction `{other}`; expected asc|desc")),
        }
    }
}

impl TryFrom<String> for SortDirection {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// Fields an author search may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthorSortField {
    Name,
    Email,
    CreatedAt,
}

impl AuthorSortField {
    /// Every sortable field, in declaration order.
    pub const ALL: [AuthorSortField; 3] = [Self::Name, Self::Email, Self::CreatedAt];

    /// Looks up a field by its external name (`name`, `email`, `createdAt`).
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::CreatedAt => "createdAt",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::CreatedAt => "created_at",
        }
    }
}

/// Resolved ordering handed to a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub field: AuthorSortField,
    pub direction: SortDirection,
}

impl OrderBy {
    /// Ordering used whenever the caller did not ask for a valid field.
    pub const FALLBACK: OrderBy = OrderBy {
        field: AuthorSortField::CreatedAt,
        direction: SortDirection::Desc,
    };
}

/// Raw search input as received from a caller.
///
/// Nothing is validated here; see [`SearchParams::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub sort_dir: Option<SortDirection>,
}

/// Search parameters after defaulting and whitelisting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSearch {
    pub page: u64,
    pub per_page: u64,
    pub filter: Option<String>,
    pub order_by: OrderBy,
}

impl SearchParams {
    /// Applies defaults and the sort whitelist.
    ///
    /// - `page`/`per_page` below 1 (or unset) become 1/15.
    /// - A known `sort` uses `sort_dir`, defaulting to ascending.
    /// - An unknown or missing `sort` uses `createdAt desc`, whatever
    ///   `sort_dir` says.
    /// - An empty `filter` means no filter.
    pub fn resolve(&self) -> ResolvedSearch {
        let order_by = match self.sort.as_deref().and_then(AuthorSortField::parse) {
            Some(field) => OrderBy {
                field,
                direction: self.sort_dir.unwrap_or_default(),
            },
            None => OrderBy::FALLBACK,
        };

        ResolvedSearch {
            page: positive_or(self.page, DEFAULT_PAGE),
            per_page: positive_or(self.per_page, DEFAULT_PER_PAGE),
            filter: self.filter.clone().filter(|text| !text.is_empty()),
            order_by,
        }
    }
}

impl ResolvedSearch {
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn take(&self) -> u64 {
        self.per_page
    }
}

fn positive_or(value: Option<i64>, default: u64) -> u64 {
    match value {
        Some(value) if value >= 1 => value as u64,
        _ => default,
    }
}

/// One page of search results plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub current_page: u64,
    pub per_page: u64,
    pub last_page: u64,
}

impl<T> SearchResult<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, per_page: u64) -> Self {
        let last_page = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page)
        };
        Self {
            items,
            total,
            current_page: page,
            per_page,
            last_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AuthorSortField, OrderBy, SearchParams, SearchResult, SortDirection, DEFAULT_PER_PAGE,
    };

    #[test]
    fn empty_params_resolve_to_defaults() {
        let resolved = SearchParams::default().resolve();
        assert_eq!(resolved.page, 1);
        assert_eq!(resolved.per_page, DEFAULT_PER_PAGE);
        assert_eq!(resolved.filter, None);
        assert_eq!(resolved.order_by, OrderBy::FALLBACK);
        assert_eq!(resolved.skip(), 0);
    }

    #[test]
    fn zero_and_negative_paging_falls_back_to_defaults() {
        let params = SearchParams {
            page: Some(-3),
            per_page: Some(0),
            ..SearchParams::default()
        };
        let resolved = params.resolve();
        assert_eq!(resolved.page, 1);
        assert_eq!(resolved.per_page, 15);
        assert_eq!(resolved.skip(), 0);
    }

    #[test]
    fn unknown_sort_ignores_direction() {
        let params = SearchParams {
            sort: Some("not_a_field".to_string()),
            sort_dir: Some(SortDirection::Asc),
            ..SearchParams::default()
        };
        assert_eq!(params.resolve().order_by, OrderBy::FALLBACK);
    }

    #[test]
    fn known_sort_without_direction_is_ascending() {
        let params = SearchParams {
            sort: Some("createdAt".to_string()),
            ..SearchParams::default()
        };
        assert_eq!(
            params.resolve().order_by,
            OrderBy {
                field: AuthorSortField::CreatedAt,
                direction: SortDirection::Asc,
            }
        );
    }

    #[test]
    fn sort_names_match_exactly() {
        assert_eq!(AuthorSortField::parse("email"), Some(AuthorSortField::Email));
        assert_eq!(AuthorSortField::parse("created_at"), None);
        assert_eq!(AuthorSortField::parse("Name"), None);
    }

    #[test]
    fn empty_filter_is_dropped() {
        let params = SearchParams {
            filter: Some(String::new()),
            ..SearchParams::default()
        };
        assert_eq!(params.resolve().filter, None);
    }

    #[test]
    fn skip_follows_page_and_per_page() {
        let params = SearchParams {
            page: Some(3),
            per_page: Some(4),
            ..SearchParams::default()
        };
        let resolved = params.resolve();
        assert_eq!(resolved.skip(), 8);
        assert_eq!(resolved.take(), 4);
    }

    #[test]
    fn last_page_is_ceiling_of_total() {
        assert_eq!(SearchResult::<()>::new(Vec::new(), 16, 1, 15).last_page, 2);
        assert_eq!(SearchResult::<()>::new(Vec::new(), 15, 1, 15).last_page, 1);
        assert_eq!(SearchResult::<()>::new(Vec::new(), 0, 1, 15).last_page, 0);
    }

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("DESC".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert!("up".parse::<SortDirection>().is_err());
    }

    #[test]
    fn params_deserialize_direction_in_any_case() {
        let params: SearchParams =
            serde_json::from_str(r#"{"sort":"name","sortDir":"DESC","perPage":2}"#).unwrap();
        assert_eq!(params.sort_dir, Some(SortDirection::Desc));
        assert_eq!(params.per_page, Some(2));

        let err = serde_json::from_str::<SearchParams>(r#"{"sortDir":"sideways"}"#).unwrap_err();
        assert!(err.to_string().contains("unsupported sort direction"));
        assert_eq!(serde_json::to_value(SortDirection::Desc).unwrap(), "desc");
    }

    #[test]
    fn result_serializes_with_camel_case_keys() {
        let result = SearchResult::new(vec![1, 2], 2, 1, 15);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["perPage"], 15);
        assert_eq!(json["lastPage"], 1);
    }
}
