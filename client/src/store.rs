use stockroom_common::identity::Warehouseman;
use stockroom_common::product::{NewProduct, Product, ProductId, Stock};

use crate::error::CatalogError;

/// The remote catalog store: the single source of truth for products and
/// warehouse staff.
///
/// Operations map one-to-one onto the store's HTTP endpoints:
/// - `list_products`     → `GET /products`
/// - `get_product`       → `GET /products/{id}`
/// - `create_product`    → `POST /products`
/// - `replace_stocks`    → `PATCH /products/{id}` with `{ "stocks": [...] }`
/// - `list_warehousemen` → `GET /warehousemans`
///
/// The store offers no locking or transactions. `replace_stocks` overwrites
/// the whole array, so concurrent writers race on it.
#[allow(async_fn_in_trait)]
pub trait CatalogStore {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError>;

    async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogError>;

    /// Create a product and return it with its store-assigned id.
    async fn create_product(&self, product: &NewProduct) -> Result<Product, CatalogError>;

    /// Replace the product's `stocks` with `stocks`, returning the stored product.
    async fn replace_stocks(
        &self,
        id: &ProductId,
        stocks: &[Stock],
    ) -> Result<Product, CatalogError>;

    async fn list_warehousemen(&self) -> Result<Vec<Warehouseman>, CatalogError>;
}
