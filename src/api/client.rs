//! HTTP client for the Coles data endpoints

use crate::api::{slug, ApiError};
use crate::config::ApiConfig;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE};
use reqwest::redirect::Policy;
use reqwest::Client;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;
use url::Url;

/// Coles API client
///
/// Headers, cookie and timeout are fixed when the client is built.
#[derive(Debug, Clone)]
pub struct ColesClient {
    base_url: Url,
    client: Client,
}

impl ColesClient {
    /// Build a client from configuration, resolving the cookie if configured
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.data_base_url()).map_err(|e| {
            ApiError::Config(format!(
                "invalid base URL '{}': {e}",
                config.data_base_url()
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "base URL '{base_url}' cannot carry a path"
            )));
        }

        let cookie = config.resolve_cookie()?;
        let headers = Self::build_header_map(&config.headers, cookie.as_deref())?;

        // Redirects surface as HTTP status errors rather than being followed
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .redirect(Policy::none())
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self { base_url, client })
    }

    /// Convert configured headers into a header map (pure function)
    fn build_header_map(
        headers: &BTreeMap<String, String>,
        cookie: Option<&str>,
    ) -> Result<HeaderMap, ApiError> {
        let mut map = HeaderMap::with_capacity(headers.len() + 1);

        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::Config(format!("invalid header name '{name}': {e}")))?;
            let mut header_value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::Config(format!("invalid value for header '{name}': {e}")))?;
            if header_name == COOKIE {
                header_value.set_sensitive(true);
            }
            map.insert(header_name, header_value);
        }

        if let Some(cookie) = cookie {
            let mut value = HeaderValue::from_str(cookie)
                .map_err(|e| ApiError::Config(format!("invalid cookie value: {e}")))?;
            value.set_sensitive(true);
            map.insert(COOKIE, value);
        }

        Ok(map)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Search products by free-text query
    pub async fn search(&self, query: &str) -> Result<Value, ApiError> {
        let url = self.search_url(query)?;
        self.get_json(url).await
    }

    /// Fetch product details (nutrition, ingredients, ...) by slug
    pub async fn fetch_details(&self, product_slug: &str) -> Result<Value, ApiError> {
        let url = self.details_url(product_slug)?;
        self.get_json(url).await
    }

    /// See [`slug::build_slug`]
    pub fn build_slug(brand: &str, name: &str, size: &str, product_id: &str) -> String {
        slug::build_slug(brand, name, size, product_id)
    }

    /// `{base}/search/products.json?q={query}`
    pub fn search_url(&self, query: &str) -> Result<Url, ApiError> {
        if query.is_empty() {
            return Err(ApiError::invalid_input("The query must not be empty."));
        }

        let mut url = self.endpoint(&["search", "products.json"])?;
        url.query_pairs_mut().append_pair("q", query);
        Ok(url)
    }

    /// `{base}/product/{slug}.json?slug={slug}`
    pub fn details_url(&self, product_slug: &str) -> Result<Url, ApiError> {
        if product_slug.is_empty() {
            return Err(ApiError::invalid_input(
                "The product slug must not be empty.",
            ));
        }

        let file = format!("{product_slug}.json");
        let mut url = self.endpoint(&["product", file.as_str()])?;
        url.query_pairs_mut().append_pair("slug", product_slug);
        Ok(url)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ApiError::Config(format!("base URL '{}' cannot carry a path", self.base_url))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> Result<Value, ApiError> {
        debug!(url = %url, "Requesting Coles API");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|source| ApiError::Decode {
                url: url.to_string(),
                source,
            })?;

        debug!(url = %url, status = status.as_u16(), "Coles API request succeeded");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_client() -> ColesClient {
        let config = ApiConfig {
            origin: "https://www.coles.com.au".to_string(),
            build_id: "test-build".to_string(),
            ..Default::default()
        };
        ColesClient::new(&config).unwrap()
    }

    #[test]
    fn test_base_url() {
        let client = test_client();
        assert_eq!(
            client.base_url().as_str(),
            "https://www.coles.com.au/_next/data/test-build/en"
        );
    }

    #[test]
    fn test_search_url() {
        let url = test_client().search_url("milk").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.coles.com.au/_next/data/test-build/en/search/products.json?q=milk"
        );
    }

    #[test]
    fn test_search_url_encodes_spaces() {
        let url = test_client().search_url("full cream milk").unwrap();
        assert_eq!(url.query(), Some("q=full+cream+milk"));

        let (_, value) = url.query_pairs().next().unwrap();
        assert_eq!(value, "full cream milk");
    }

    #[test]
    fn test_details_url() {
        let url = test_client().details_url("acme-milk-1l-123").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.coles.com.au/_next/data/test-build/en/product/acme-milk-1l-123.json?slug=acme-milk-1l-123"
        );
    }

    #[test]
    fn test_details_url_escapes_path_separators() {
        let url = test_client().details_url("a/b").unwrap();
        assert!(url.path().ends_with("/product/a%2Fb.json"));
    }

    #[test]
    fn test_empty_inputs_rejected() {
        let client = test_client();
        assert!(matches!(
            client.search_url(""),
            Err(ApiError::InvalidInput { .. })
        ));
        assert!(matches!(
            client.details_url(""),
            Err(ApiError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_header_map_includes_cookie() {
        let headers = BTreeMap::from([("dnt".to_string(), "1".to_string())]);
        let map = ColesClient::build_header_map(&headers, Some("a=b; c=d")).unwrap();

        assert_eq!(map.get("dnt").unwrap(), "1");
        assert_eq!(map.get(COOKIE).unwrap(), "a=b; c=d");
        assert!(map.get(COOKIE).unwrap().is_sensitive());
    }

    #[test]
    fn test_configured_cookie_header_is_sensitive() {
        let headers = BTreeMap::from([("Cookie".to_string(), "dsch-sessionid=abc".to_string())]);
        let map = ColesClient::build_header_map(&headers, None).unwrap();

        assert_eq!(map.get(COOKIE).unwrap(), "dsch-sessionid=abc");
        assert!(map.get(COOKIE).unwrap().is_sensitive());
        assert!(!format!("{map:?}").contains("dsch-sessionid"));
    }

    #[test]
    fn test_header_map_rejects_bad_name() {
        let headers = BTreeMap::from([("bad header".to_string(), "1".to_string())]);
        let result = ColesClient::build_header_map(&headers, None);
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_build_slug_delegates() {
        assert_eq!(
            ColesClient::build_slug("ACME", "Milk", "1L", "123"),
            "acme-milk-1l-123"
        );
    }

    proptest! {
        #[test]
        fn prop_search_url_contains_query(query in "[A-Za-z0-9._-]{1,32}") {
            let url = test_client().search_url(&query).unwrap();
            prop_assert!(url.as_str().contains(&query));
        }
    }
}
