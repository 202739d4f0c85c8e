//! OpenFoodFacts calorie lookup

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::OutboundError;
use crate::build_info::BuildInfo;

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(8);
const PAGE_SIZE: &str = "6";

/// Nutriment keys that may hold kcal per 100 g, in preference order
const KCAL_KEYS: [&str; 4] = [
    "energy-kcal_100g",
    "energy-kcal",
    "energy-kcal_value",
    "energy-kcal_100g_value",
];

/// First product with calorie data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalorieMatch {
    pub query: String,
    pub matched_name: String,
    pub kcal_per_100g: f64,
    pub source: String,
    pub raw: Value,
}

#[async_trait]
pub trait CalorieLookup: Send + Sync {
    /// `Ok(None)` when no product carries calorie data
    async fn lookup(&self, name: &str) -> Result<Option<CalorieMatch>, OutboundError>;
}

pub struct OpenFoodFactsClient {
    client: Client,
    search_url: String,
}

impl OpenFoodFactsClient {
    pub fn new(search_url: impl Into<String>) -> Result<Self, OutboundError> {
        let client = Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .user_agent(BuildInfo::current().user_agent())
            .build()?;
        Ok(Self {
            client,
            search_url: search_url.into(),
        })
    }
}

#[async_trait]
impl CalorieLookup for OpenFoodFactsClient {
    async fn lookup(&self, name: &str) -> Result<Option<CalorieMatch>, OutboundError> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[
                ("search_terms", name),
                ("search_simple", "1"),
                ("action", "process"),
                ("json", "1"),
                ("page_size", PAGE_SIZE),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(OutboundError::Upstream {
                status: status.as_u16(),
                body: Value::String(text),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| OutboundError::Decode(format!("invalid OpenFoodFacts JSON: {e}")))?;

        Ok(first_match(name, &payload))
    }
}

fn kcal_of(product: &Value) -> Option<f64> {
    let nutriments = product.get("nutriments")?;
    KCAL_KEYS.iter().find_map(|key| match nutriments.get(*key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn display_name(product: &Value) -> String {
    ["product_name", "generic_name", "brands"]
        .iter()
        .filter_map(|key| product.get(*key).and_then(Value::as_str))
        .find(|name| !name.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Pick the first product in a search payload that has calorie data
pub fn first_match(query: &str, payload: &Value) -> Option<CalorieMatch> {
    let products = payload.get("products")?.as_array()?;
    products.iter().find_map(|product| {
        let kcal = kcal_of(product)?;
        Some(CalorieMatch {
            query: query.to_string(),
            matched_name: display_name(product),
            kcal_per_100g: kcal,
            source: "openfoodfacts".to_string(),
            raw: product.clone(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_skips_products_without_kcal() {
        let payload = json!({
            "products": [
                { "product_name": "Tanpa data", "nutriments": {} },
                { "product_name": "", "generic_name": "Nasi goreng",
                  "nutriments": { "energy-kcal": "163" } },
                { "product_name": "Lain", "nutriments": { "energy-kcal_100g": 99 } }
            ]
        });

        let hit = first_match("nasi goreng", &payload).unwrap();
        assert_eq!(hit.matched_name, "Nasi goreng");
        assert_eq!(hit.kcal_per_100g, 163.0);
        assert_eq!(hit.source, "openfoodfacts");
    }

    #[test]
    fn test_prefers_per_100g_key() {
        let payload = json!({
            "products": [
                { "brands": "Indomie",
                  "nutriments": { "energy-kcal": 380, "energy-kcal_100g": 450.5 } }
            ]
        });
        let hit = first_match("mie", &payload).unwrap();
        assert_eq!(hit.kcal_per_100g, 450.5);
        assert_eq!(hit.matched_name, "Indomie");
    }

    #[test]
    fn test_no_products() {
        assert!(first_match("x", &json!({ "products": [] })).is_none());
        assert!(first_match("x", &json!({})).is_none());
    }
}
