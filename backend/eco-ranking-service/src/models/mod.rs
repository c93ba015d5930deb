use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Closed set of packaging materials the footprint table can price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackagingType {
    Plastic,
    Cardboard,
    Glass,
}

impl PackagingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackagingType::Plastic => "plastic",
            PackagingType::Cardboard => "cardboard",
            PackagingType::Glass => "glass",
        }
    }
}

impl fmt::Display for PackagingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog product. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Production footprint in kg CO2e, before packaging and transport.
    pub base_footprint: f64,
    pub packaging: PackagingType,
    pub origin: GeoPoint,
    pub price: f64,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Consumer location all transport costs in a run are computed against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Consumer {
    pub location: GeoPoint,
}

/// One line of a shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Top pick for one user after carbon-aware re-ranking.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub user_id: String,
    pub product_id: String,
    pub score: f64,
}

/// In-category substitute for a cart item.
#[derive(Debug, Clone, Serialize)]
pub struct SwapSuggestion {
    pub original_id: String,
    pub substitute_id: String,
    /// Total footprint of the substitute, kg CO2e per unit.
    pub substitute_footprint: f64,
    /// Carbon saved by taking the swap, scaled by cart quantity.
    /// Negative when the best in-category alternative is worse.
    pub savings: f64,
}

/// Swap suggestions for a whole cart with aggregate savings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SwapReport {
    pub suggestions: Vec<SwapSuggestion>,
    pub total_savings: f64,
}

/// Strictly-lower-footprint alternative to a product.
#[derive(Debug, Clone, Serialize)]
pub struct GreenerAlternative {
    pub product_id: String,
    /// Total footprint of the alternative, kg CO2e per unit.
    pub footprint: f64,
    /// Per-unit carbon saved relative to the original.
    pub savings: f64,
    /// Price delta relative to the original; positive means more expensive.
    pub price_difference: f64,
    /// Similarity to the original in [0, 1].
    pub similarity: f64,
}

/// Category ranking entry.
#[derive(Debug, Clone, Serialize)]
pub struct RankedProduct {
    pub product: Product,
    pub total_footprint: f64,
}

/// One-shot batch input consumed by the runner binary.
///
/// `relevance` is a dense users x products matrix in row-major order, as
/// produced by an offline factorization job.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchInput {
    pub products: Vec<Product>,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub relevance: Vec<Vec<f64>>,
    #[serde(default)]
    pub recent_activity: HashMap<String, String>,
    #[serde(default)]
    pub cart: Vec<CartItem>,
    #[serde(default)]
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packaging_type_as_str() {
        assert_eq!(PackagingType::Plastic.as_str(), "plastic");
        assert_eq!(PackagingType::Cardboard.as_str(), "cardboard");
        assert_eq!(PackagingType::Glass.as_str(), "glass");
    }

    #[test]
    fn test_product_deserialization_defaults() {
        let json = r#"{
            "id": "p1",
            "name": "Apple",
            "category": "Food",
            "base_footprint": 5.0,
            "packaging": "Plastic",
            "origin": { "lat": 40.7128, "lon": -74.006 },
            "price": 1.99
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, "p1");
        assert_eq!(product.packaging, PackagingType::Plastic);
        assert!(product.brand.is_none());
        assert!(product.tags.is_empty());
    }

    #[test]
    fn test_cart_item_default_quantity() {
        let item: CartItem = serde_json::from_str(r#"{ "product_id": "p1" }"#).unwrap();
        assert_eq!(item.quantity, 1);

        let item: CartItem =
            serde_json::from_str(r#"{ "product_id": "p1", "quantity": 3 }"#).unwrap();
        assert_eq!(item.quantity, 3);
    }
}
