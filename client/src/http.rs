//! reqwest binding for the catalog store's JSON API.

use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use stockroom_common::identity::Warehouseman;
use stockroom_common::product::{NewProduct, Product, ProductId, Stock};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::CatalogError;
use crate::store::CatalogStore;

/// Body of `PATCH /products/{id}`.
#[derive(Serialize)]
struct StocksPatch<'a> {
    stocks: &'a [Stock],
}

/// Catalog store reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCatalogStore {
    client: Client,
    base_url: Url,
}

impl HttpCatalogStore {
    pub fn new(config: &ClientConfig) -> Result<Self, CatalogError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| CatalogError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "not a hierarchical URL".to_string(),
            });
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn call<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T, CatalogError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments);
        debug!(%method, %url, "catalog store request");

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            debug!(%method, %url, %status, "catalog store refused request");
            return Err(CatalogError::Status {
                method,
                path: url.path().to_string(),
                status,
            });
        }
        Ok(response.json().await?)
    }
}

/// Decode catalog records one at a time. A record that cannot be read is
/// logged and left out instead of failing the whole list.
fn decode_products(records: Vec<serde_json::Value>) -> Vec<Product> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Product>(record) {
            Ok(product) => Some(product),
            Err(error) => {
                warn!(index, %error, "skipping unreadable product record");
                None
            }
        })
        .collect()
}

impl CatalogStore for HttpCatalogStore {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let records = self.call::<(), _>(Method::GET, &["products"], None).await?;
        Ok(decode_products(records))
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        self.call::<(), _>(Method::GET, &["products", id.0.as_str()], None)
            .await
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product, CatalogError> {
        self.call(Method::POST, &["products"], Some(product)).await
    }

    async fn replace_stocks(
        &self,
        id: &ProductId,
        stocks: &[Stock],
    ) -> Result<Product, CatalogError> {
        let patch = StocksPatch { stocks };
        self.call(Method::PATCH, &["products", id.0.as_str()], Some(&patch))
            .await
    }

    async fn list_warehousemen(&self) -> Result<Vec<Warehouseman>, CatalogError> {
        self.call::<(), _>(Method::GET, &["warehousemans"], None)
            .await
    }
}
