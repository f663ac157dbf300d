//! Product catalog sources.
//!
//! The catalog is read-only: it lists the products a user can put in the
//! cart. [`HttpCatalog`] fetches the list from the products endpoint and
//! [`StaticCatalog`] serves a fixed list (tests, offline use).

use crate::types::{Product, ProductId};
use std::future::Future;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default products endpoint
pub const DEFAULT_CATALOG_URL: &str = "http://localhost:8080/products";

/// Errors fetching the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The HTTP request failed or returned an error status
    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A catalog file could not be read
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        /// File that was read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The catalog payload is not a JSON array of products
    #[error("Malformed catalog: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Source of the products offered for sale
pub trait ProductCatalog: Send + Sync {
    /// Lists every product
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the source cannot be read.
    fn products(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    /// Finds one product by id
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the source cannot be read.
    fn product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<Product>, CatalogError>> + Send {
        let products = self.products();
        async move { Ok(products.await?.into_iter().find(|product| product.id == id)) }
    }
}

/// Catalog fetched with an HTTP GET returning a JSON array of products
#[derive(Clone, Debug)]
pub struct HttpCatalog {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalog {
    /// Creates a catalog reading from `url`
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    /// Creates a catalog with a preconfigured client
    #[must_use]
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// The products endpoint
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ProductCatalog for HttpCatalog {
    fn products(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send {
        let request = self.client.get(&self.url);
        let url = self.url.clone();

        async move {
            tracing::debug!(%url, "Fetching catalog");
            let products: Vec<Product> = request.send().await?.error_for_status()?.json().await?;
            tracing::debug!(%url, count = products.len(), "Fetched catalog");
            Ok(products)
        }
    }
}

/// Catalog backed by a fixed list of products
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    /// Creates a catalog serving `products`
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Parses a JSON array of products
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Decode`] if `raw` is not a product array.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        Ok(Self::new(serde_json::from_str(raw)?))
    }

    /// Reads a JSON array of products from a file
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Io`] if the file cannot be read
    /// - [`CatalogError::Decode`] if its content is not a product array
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }
}

impl ProductCatalog for StaticCatalog {
    fn products(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send {
        let products = self.products.clone();
        async move { Ok(products) }
    }
}

/// Catalog selected by configuration
#[derive(Clone, Debug)]
pub enum ConfiguredCatalog {
    /// Remote products endpoint
    Http(HttpCatalog),
    /// Local product list
    Static(StaticCatalog),
}

impl ProductCatalog for ConfiguredCatalog {
    fn products(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send {
        async move {
            match self {
                Self::Http(catalog) => catalog.products().await,
                Self::Static(catalog) => catalog.products().await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const PRODUCTS: &str = r#"[
        {"id": 1, "name": "Keyboard", "description": "Mechanical keyboard", "price": 50},
        {"id": 2, "name": "Mouse", "description": "Wireless mouse", "price": 20}
    ]"#;

    /// Serves one canned HTTP response and returns its URL
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = vec![0_u8; 4096];
            let _ = socket.read(&mut request).await.unwrap();
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{addr}/products")
    }

    #[tokio::test]
    async fn http_catalog_decodes_product_array() {
        let url = serve_once("200 OK", PRODUCTS).await;
        let catalog = HttpCatalog::new(url);

        let products = catalog.products().await.unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Keyboard");
        assert_eq!(products[1].price, 20);
    }

    #[tokio::test]
    async fn http_catalog_reports_error_status() {
        let url = serve_once("500 Internal Server Error", "[]").await;
        let catalog = HttpCatalog::new(url);

        assert!(matches!(catalog.products().await, Err(CatalogError::Http(_))));
    }

    #[tokio::test]
    async fn http_catalog_reports_malformed_body() {
        let url = serve_once("200 OK", r#"{"products": []}"#).await;
        let catalog = HttpCatalog::new(url);

        assert!(catalog.products().await.is_err());
    }

    #[tokio::test]
    async fn static_catalog_finds_product_by_id() {
        let catalog = StaticCatalog::from_json(PRODUCTS).unwrap();

        let mouse = catalog.product(ProductId::new(2)).await.unwrap();
        let missing = catalog.product(ProductId::new(7)).await.unwrap();

        assert_eq!(mouse.map(|p| p.name), Some("Mouse".to_string()));
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn product_with_null_description_is_listed() {
        let catalog =
            StaticCatalog::from_json(r#"[{"id":1,"name":"Keyboard","description":null,"price":50}]"#).unwrap();

        let products = catalog.products().await.unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].description, "");
    }

    #[test]
    fn static_catalog_rejects_non_array() {
        assert!(matches!(
            StaticCatalog::from_json(r#"{"id": 1}"#),
            Err(CatalogError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn static_catalog_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(&path, PRODUCTS).unwrap();

        let catalog = ConfiguredCatalog::Static(StaticCatalog::from_file(&path).unwrap());

        assert_eq!(catalog.products().await.unwrap().len(), 2);
    }

    #[test]
    fn missing_catalog_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = StaticCatalog::from_file(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }
}
