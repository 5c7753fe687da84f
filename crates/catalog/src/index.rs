//! In-memory catalog index with first-match substring search.

use balcao_core::{Category, Product};
use balcao_text::normalize;

/// Minimum normalized query length; shorter queries are treated as noise
/// (stray menu digits) rather than product searches.
const MIN_QUERY_CHARS: usize = 3;

/// Normalized search text for one product, precomputed at build time.
struct SearchEntry {
    category_idx: usize,
    product_idx: usize,
    name: String,
    description: String,
    specs: Vec<String>,
}

impl SearchEntry {
    fn matches(&self, query: &str) -> bool {
        self.name.contains(query)
            || query.contains(&self.name)
            || self.description.contains(query)
            || self.specs.iter().any(|s| s.contains(query))
    }
}

/// A search hit: the product together with the category it lives in, so
/// callers can render the full product card.
#[derive(Debug, Clone, Copy)]
pub struct ProductHit<'a> {
    pub product: &'a Product,
    pub category: &'a Category,
}

/// Read-only product lookup over the loaded catalog.
///
/// Built once at startup and shared immutably; search is a pure function
/// of the query.
pub struct CatalogIndex {
    categories: Vec<Category>,
    entries: Vec<SearchEntry>,
}

impl CatalogIndex {
    /// Build the index, precomputing normalized search text in catalog
    /// order. That order is load-bearing: ambiguous queries resolve to
    /// whichever product appears first in the source file.
    pub fn new(categories: Vec<Category>) -> Self {
        let mut entries = Vec::new();
        for (category_idx, category) in categories.iter().enumerate() {
            for (product_idx, product) in category.products.iter().enumerate() {
                entries.push(SearchEntry {
                    category_idx,
                    product_idx,
                    name: normalize(&product.name),
                    description: normalize(&product.description),
                    specs: product.tech_specs.iter().map(|s| normalize(s)).collect(),
                });
            }
        }
        Self {
            categories,
            entries,
        }
    }

    /// Find the first product whose normalized name, description or any
    /// spec line contains the normalized query, or whose full name appears
    /// inside the query (a complaint sentence naming a product still
    /// resolves). Queries shorter than three characters after
    /// normalization return `None`.
    pub fn find(&self, raw_query: &str) -> Option<ProductHit<'_>> {
        let query = normalize(raw_query);
        if query.chars().count() < MIN_QUERY_CHARS {
            return None;
        }

        self.entries.iter().find(|e| e.matches(&query)).map(|e| {
            let category = &self.categories[e.category_idx];
            ProductHit {
                product: &category.products[e.product_idx],
                category,
            }
        })
    }

    /// Categories in catalog order, for the browsing prompt.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Total number of searchable products.
    pub fn product_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> CatalogIndex {
        CatalogIndex::new(vec![
            Category {
                title: "Linha Refrigeração".to_string(),
                sub: "Conservação e exposição".to_string(),
                products: vec![
                    Product {
                        name: "Geladeira Expositora 410L".to_string(),
                        description: "Expositor vertical para bebidas".to_string(),
                        tech_specs: vec!["220V".to_string(), "Compressor Embraco".to_string()],
                    },
                    Product {
                        name: "Geladeira Expositora 600L".to_string(),
                        description: "Expositor dupla porta".to_string(),
                        tech_specs: vec![],
                    },
                ],
            },
            Category {
                title: "Linha Quente".to_string(),
                sub: "Preparo e cocção".to_string(),
                products: vec![Product {
                    name: "Estufa Elétrica 5 Bandejas".to_string(),
                    description: "Estufa para salgados com vidro curvo".to_string(),
                    tech_specs: vec!["110V".to_string()],
                }],
            },
        ])
    }

    #[test]
    fn test_short_queries_return_none() {
        let index = sample_index();
        assert!(index.find("ge").is_none());
        assert!(index.find("1").is_none());
        assert!(index.find("  ").is_none());
    }

    #[test]
    fn test_first_match_in_catalog_order() {
        let index = sample_index();
        let hit = index.find("geladeira").unwrap();
        assert_eq!(hit.product.name, "Geladeira Expositora 410L");
        assert_eq!(hit.category.title, "Linha Refrigeração");
    }

    #[test]
    fn test_matches_ignore_case_and_accents() {
        let index = sample_index();
        let hit = index.find("ESTUFA ELÉTRICA").unwrap();
        assert_eq!(hit.product.name, "Estufa Elétrica 5 Bandejas");

        let hit = index.find("eletrica").unwrap();
        assert_eq!(hit.product.name, "Estufa Elétrica 5 Bandejas");
    }

    #[test]
    fn test_matches_description_and_specs() {
        let index = sample_index();
        let hit = index.find("dupla porta").unwrap();
        assert_eq!(hit.product.name, "Geladeira Expositora 600L");

        let hit = index.find("embraco").unwrap();
        assert_eq!(hit.product.name, "Geladeira Expositora 410L");
    }

    #[test]
    fn test_sentence_containing_product_name_matches() {
        let index = sample_index();
        let hit = index
            .find("minha Estufa Elétrica 5 Bandejas não esquenta direito")
            .unwrap();
        assert_eq!(hit.product.name, "Estufa Elétrica 5 Bandejas");
    }

    #[test]
    fn test_no_match_returns_none() {
        let index = sample_index();
        assert!(index.find("fritadeira").is_none());
    }

    #[test]
    fn test_counts() {
        let index = sample_index();
        assert_eq!(index.product_count(), 3);
        assert_eq!(index.categories().len(), 2);
        assert!(!index.is_empty());
    }
}
