//! Query parameters for listing endpoints.

use std::fmt;

/// Name of the query parameter carrying the page number.
pub const PAGE_PARAM: &str = "page";

/// Ordered query parameters sent with a listing request.
///
/// Parameters keep their insertion order. Setting a parameter that is
/// already present replaces its value in place, so a caller-supplied
/// `page` is overwritten when the stream requests a later page.
///
/// # Example
///
/// ```
/// use dotypos_rs::Query;
///
/// let query = Query::new()
///     .filter("deleted", "eq", "false")
///     .filter("categoryId", "eq", 12)
///     .sort("-versionDate")
///     .limit(50);
///
/// assert_eq!(query.get("filter"), Some("deleted|eq|false;categoryId|eq|12"));
/// assert_eq!(query.get("limit"), Some("50"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any previous value under the same name.
    pub fn param(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.set(name.into(), value.to_string());
        self
    }

    /// Add a `field|operator|value` filter.
    ///
    /// Repeated filters are combined into one `filter` parameter separated
    /// by `;`, which the API treats as a conjunction.
    pub fn filter(
        mut self,
        field: impl fmt::Display,
        operator: impl fmt::Display,
        value: impl fmt::Display,
    ) -> Self {
        let clause = format!("{field}|{operator}|{value}");
        let combined = match self.get("filter") {
            Some(existing) if !existing.is_empty() => format!("{existing};{clause}"),
            _ => clause,
        };
        self.set("filter".to_string(), combined);
        self
    }

    /// Sort by a field; prefix with `-` for descending order.
    pub fn sort(self, field: impl fmt::Display) -> Self {
        self.param("sort", field)
    }

    /// Set the page size.
    pub fn limit(self, limit: u32) -> Self {
        self.param("limit", limit)
    }

    /// Return a copy of this query requesting page `page`.
    pub fn with_page(&self, page: u32) -> Self {
        self.clone().param(PAGE_PARAM, page)
    }

    /// Look up a parameter value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns `true` if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The parameters in insertion order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    fn set(&mut self, name: String, value: String) {
        match self.pairs.iter_mut().find(|(key, _)| *key == name) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((name, value)),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: fmt::Display,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Query::new(), |query, (name, value)| query.param(name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query() {
        let query = Query::new();
        assert!(query.is_empty());
        assert_eq!(query.get("page"), None);
    }

    #[test]
    fn test_with_page_overwrites_existing_page() {
        let query = Query::new().param("page", 9).param("limit", 10);
        let paged = query.with_page(3);

        assert_eq!(paged.get("page"), Some("3"));
        assert_eq!(paged.pairs().len(), 2);
        // The source query keeps its own page
        assert_eq!(query.get("page"), Some("9"));
    }

    #[test]
    fn test_with_page_appends_after_existing_params() {
        let paged = Query::new().param("sort", "name").with_page(2);
        assert_eq!(
            paged.pairs(),
            &[
                ("sort".to_string(), "name".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_filters_are_joined() {
        let query = Query::new()
            .filter("deleted", "eq", false)
            .filter("name", "like", "beer");
        assert_eq!(query.get("filter"), Some("deleted|eq|false;name|like|beer"));
    }

    #[test]
    fn test_from_iterator() {
        let query: Query = [("limit", "5"), ("sort", "id")].into_iter().collect();
        assert_eq!(query.get("limit"), Some("5"));
        assert_eq!(query.get("sort"), Some("id"));
    }
}
