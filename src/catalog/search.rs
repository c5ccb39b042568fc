//! Text search against the catalog's `cgi/search.pl` endpoint.

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::http_client;

use super::{Nutriments, Product};

const SEARCH_PATH: &str = "cgi/search.pl";

/// Upper bound for a search response; the catalog can return very fat records.
const MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;

/// Errors surfaced to the user as a failed search.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog URL could not be built: {0}")]
    BuildUrl(url::ParseError),
    #[error("Catalog returned HTTP {0}")]
    Status(u16),
    #[error("Catalog request failed: {0}")]
    Transport(String),
    #[error("Could not read catalog response: {0}")]
    Read(#[from] std::io::Error),
    #[error("Catalog response was not valid JSON: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Vec<ProductRecord>,
}

/// Raw catalog record; identifiers arrive as strings or numbers depending on
/// the record's age, and most fields are simply absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProductRecord {
    id: Option<serde_json::Value>,
    code: Option<serde_json::Value>,
    product_name: Option<String>,
    ingredients_text: Option<String>,
    serving_size: Option<String>,
    image_front_url: Option<String>,
    nutriments: Nutriments,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        let id = identifier(record.id).or_else(|| identifier(record.code));
        Product {
            id: id.unwrap_or_default(),
            product_name: record.product_name,
            ingredients_text: record.ingredients_text,
            serving_size: record.serving_size,
            image_front_url: record.image_front_url,
            nutriments: record.nutriments,
        }
    }
}

/// Issue a blocking search request and return the raw (unranked) products.
///
/// Transient failures (transport errors, 5xx) are retried with bounded
/// backoff; anything else fails fast. Callers run this on a worker thread.
pub fn search(base_url: &Url, query: &str) -> Result<Vec<Product>, CatalogError> {
    let url = build_search_url(base_url, query)?;
    tracing::debug!(%url, "catalog search");
    let response = http_client::retry_with_backoff(
        http_client::RetryConfig::default(),
        || perform_get(&url),
        is_transient,
    )?;
    let bytes = http_client::read_response_bytes(response, MAX_RESPONSE_BYTES)?;
    let parsed: SearchResponse = serde_json::from_slice(&bytes)?;
    Ok(parsed.products.into_iter().map(Product::from).collect())
}

fn build_search_url(base_url: &Url, query: &str) -> Result<Url, CatalogError> {
    let mut url = base_url.join(SEARCH_PATH).map_err(CatalogError::BuildUrl)?;
    url.query_pairs_mut()
        .append_pair("search_terms", query)
        .append_pair("search_simple", "1")
        .append_pair("action", "process")
        .append_pair("json", "1");
    Ok(url)
}

fn perform_get(url: &Url) -> Result<ureq::Response, CatalogError> {
    match http_client::agent().request_url("GET", url).call() {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(code, _)) => Err(CatalogError::Status(code)),
        Err(ureq::Error::Transport(transport)) => {
            Err(CatalogError::Transport(transport.to_string()))
        }
    }
}

fn is_transient(error: &CatalogError) -> bool {
    matches!(
        error,
        CatalogError::Transport(_) | CatalogError::Status(500..=599)
    )
}

fn identifier(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(text) if !text.is_empty() => Some(text),
        serde_json::Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    const FIXTURE: &str = r#"{
        "count": 2,
        "products": [
            {
                "id": "5900617002204",
                "product_name": "Oatmeal",
                "serving_size": "50 g",
                "ingredients_text": "whole grain oats",
                "nutriments": {"energy-kcal_100g": 375, "proteins_100g": 13.5}
            },
            {
                "code": 20724696,
                "nutriments": {}
            }
        ]
    }"#;

    fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 2048];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}", addr)
    }

    #[test]
    fn search_url_carries_the_expected_query() {
        let base = Url::parse("https://world.openfoodfacts.org").unwrap();
        let url = build_search_url(&base, "rye bread").unwrap();
        assert_eq!(url.path(), "/cgi/search.pl");
        let query = url.query().unwrap();
        assert!(query.contains("search_terms=rye+bread"));
        assert!(query.contains("json=1"));
        assert!(query.contains("action=process"));
    }

    #[test]
    fn parses_products_and_falls_back_to_code() {
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            FIXTURE.len(),
            FIXTURE
        );
        let base = Url::parse(&serve_once(response)).unwrap();
        let products = search(&base, "oatmeal").unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, "5900617002204");
        assert_eq!(products[0].display_name(), "Oatmeal");
        assert_eq!(products[0].nutriments.energy_kcal_100g, Some(375.0));
        assert_eq!(products[1].id, "20724696");
        assert_eq!(products[1].nutriments, Nutriments::default());
    }

    #[test]
    fn garbage_body_is_a_malformed_response() {
        let response = "HTTP/1.0 200 OK\r\n\r\n<html>oops</html>".to_string();
        let base = Url::parse(&serve_once(response)).unwrap();
        let err = search(&base, "oatmeal").unwrap_err();
        assert!(matches!(err, CatalogError::MalformedResponse(_)));
    }

    #[test]
    fn missing_products_key_yields_empty_list() {
        let body = r#"{"count": 0}"#;
        let response = format!("HTTP/1.0 200 OK\r\n\r\n{body}");
        let base = Url::parse(&serve_once(response)).unwrap();
        let products = search(&base, "nothing").unwrap();
        assert!(products.is_empty());
    }
}
