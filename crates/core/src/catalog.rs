//! Product catalog records.
//!
//! The catalog is loaded once at startup and treated as immutable for the
//! lifetime of the process; these are plain data shapes with no interior
//! mutability.

use serde::{Deserialize, Serialize};

/// One sellable product inside a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Display name, e.g. "Refrigerador Vitrine 410L".
    pub name: String,
    /// Short marketing/technical description.
    #[serde(default)]
    pub description: String,
    /// Free-form spec lines ("220V", "Compressor Embraco", ...).
    #[serde(default)]
    pub tech_specs: Vec<String>,
}

/// A catalog category grouping related products.
///
/// `title` is the headline ("Linha Refrigeração"), `sub` the one-line
/// elaboration shown under it on product cards and category listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub title: String,
    #[serde(default)]
    pub sub: String,
    #[serde(default)]
    pub products: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_default_empty() {
        let product: Product = serde_json::from_str(r#"{"name":"Estufa 5 bandejas"}"#).unwrap();
        assert!(product.description.is_empty());
        assert!(product.tech_specs.is_empty());

        let category: Category = serde_json::from_str(r#"{"title":"Linha Quente"}"#).unwrap();
        assert!(category.sub.is_empty());
        assert!(category.products.is_empty());
    }
}
