//! Catalog file loading.

use serde::{Deserialize, Serialize};
use std::path::Path;

use balcao_core::Category;

use crate::{CatalogError, CatalogIndex};

/// On-disk catalog format, YAML or JSON.
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Format version for forward compatibility.
    #[serde(default)]
    pub version: Option<String>,
    pub categories: Vec<Category>,
}

/// Load the catalog file and build the search index.
///
/// Format is chosen by extension (`yaml`/`yml`/`json`). Any failure here
/// is returned to the caller; startup treats it as fatal.
pub fn load_catalog(path: &Path) -> Result<CatalogIndex, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    let file: CatalogFile = match extension {
        "json" => serde_json::from_str(&content).map_err(|e| CatalogError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?,
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| CatalogError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?,
        other => return Err(CatalogError::UnsupportedFormat(other.to_string())),
    };

    let index = CatalogIndex::new(file.categories);
    tracing::info!(
        path = %path.display(),
        categories = index.categories().len(),
        products = index.product_count(),
        "catalog loaded"
    );

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE_YAML: &str = r#"
version: "1.0"
categories:
  - title: Linha Refrigeração
    sub: Conservação e exposição
    products:
      - name: Geladeira Expositora 410L
        description: Expositor vertical para bebidas
        tech_specs: ["220V"]
  - title: Linha Quente
    products:
      - name: Estufa Elétrica 5 Bandejas
"#;

    fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_loads_yaml_catalog() {
        let file = write_temp(".yaml", SAMPLE_YAML);
        let index = load_catalog(file.path()).unwrap();
        assert_eq!(index.product_count(), 2);
        assert!(index.find("geladeira").is_some());
    }

    #[test]
    fn test_loads_json_catalog() {
        let json = r#"{"categories":[{"title":"Linha Quente","products":[{"name":"Fritadeira 5L"}]}]}"#;
        let file = write_temp(".json", json);
        let index = load_catalog(file.path()).unwrap();
        assert_eq!(index.product_count(), 1);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = load_catalog(Path::new("/nonexistent/catalog.yaml")).unwrap_err();
        assert!(matches!(err, CatalogError::FileNotFound(_)));
    }

    #[test]
    fn test_parse_failure_is_reported() {
        let file = write_temp(".yaml", "categories: [not, a, catalog");
        let err = load_catalog(file.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let file = write_temp(".toml", "categories = []");
        let err = load_catalog(file.path()).unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedFormat(_)));
    }
}
