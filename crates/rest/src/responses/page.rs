//! List response bodies.
//!
//! A list body carries the total number of matches, links to the
//! neighbouring pages and one page of representations:
//!
//! ```json
//! { "count": 42, "next": "…?page=3", "previous": "…?page=1", "results": [] }
//! ```

use kore_persistence::Page;
use serde::Serialize;
use serde_json::Value;
use url::Url;

/// One page of a list response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListPage {
    /// Number of matches across all pages.
    pub count: u64,
    /// Link to the next page.
    pub next: Option<String>,
    /// Link to the previous page.
    pub previous: Option<String>,
    /// Representations on this page.
    pub results: Vec<Value>,
}

/// Builds next and previous links from the request's own query.
#[derive(Debug, Clone)]
pub struct PageLinks {
    base: Url,
    query: Vec<(String, String)>,
}

impl PageLinks {
    /// Creates links to `collection_url` carrying the request's query
    /// parameters.
    ///
    /// Returns `None` if `collection_url` is not an absolute URL.
    pub fn new(collection_url: &str, query: &[(String, String)]) -> Option<Self> {
        let base = Url::parse(collection_url).ok()?;
        Some(Self {
            base,
            query: query.to_vec(),
        })
    }

    /// The URL of page `page`. The first page carries no `page` parameter.
    pub fn page_url(&self, page: u32) -> String {
        let mut url = self.base.clone();
        let kept: Vec<&(String, String)> =
            self.query.iter().filter(|(key, _)| key != "page").collect();

        if kept.is_empty() && page == 1 {
            return url.to_string();
        }

        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in kept {
                pairs.append_pair(key, value);
            }
            if page > 1 {
                pairs.append_pair("page", &page.to_string());
            }
        }
        url.to_string()
    }

    /// Builds the list body for `page` with its rendered `results`.
    pub fn list(&self, page: &Page<i64>, results: Vec<Value>) -> ListPage {
        let current = page.pagination.page;
        ListPage {
            count: page.total,
            next: page.has_next().then(|| self.page_url(current + 1)),
            previous: page.has_previous().then(|| self.page_url(current - 1)),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use kore_persistence::Pagination;
    use serde_json::json;

    use super::*;

    fn query(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_first_page_has_no_page_parameter() {
        let links = PageLinks::new("http://testserver/v1/school/", &[]).unwrap();
        assert_eq!(links.page_url(1), "http://testserver/v1/school/");
        assert_eq!(links.page_url(2), "http://testserver/v1/school/?page=2");
    }

    #[test]
    fn test_links_keep_filters() {
        let links = PageLinks::new(
            "http://testserver/v1/school/",
            &query(&[("gender", "f"), ("page", "2"), ("page_size", "2")]),
        )
        .unwrap();
        assert_eq!(
            links.page_url(3),
            "http://testserver/v1/school/?gender=f&page_size=2&page=3"
        );
        assert_eq!(
            links.page_url(1),
            "http://testserver/v1/school/?gender=f&page_size=2"
        );
    }

    #[test]
    fn test_links_encode_values() {
        let links = PageLinks::new(
            "http://testserver/v1/school/",
            &query(&[("search", "tyttö koulu")]),
        )
        .unwrap();
        assert_eq!(
            links.page_url(2),
            "http://testserver/v1/school/?search=tytt%C3%B6+koulu&page=2"
        );
    }

    #[test]
    fn test_list_body() {
        let links = PageLinks::new("http://testserver/v1/language/", &[]).unwrap();
        let page = Page::new(vec![3, 4], 5, Pagination::new(2, 2));
        let body = links.list(&page, vec![json!({"id": 3}), json!({"id": 4})]);
        assert_eq!(body.count, 5);
        assert_eq!(
            body.next.as_deref(),
            Some("http://testserver/v1/language/?page=3")
        );
        assert_eq!(body.previous.as_deref(), Some("http://testserver/v1/language/"));
        assert_eq!(body.results.len(), 2);
    }

    #[test]
    fn test_relative_base_is_rejected() {
        assert!(PageLinks::new("/v1/school/", &[]).is_none());
    }
}
