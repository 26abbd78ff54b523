//! In-process catalog store for unit tests.

use std::sync::Mutex;

use reqwest::{Method, StatusCode};
use stockroom_common::identity::{Warehouseman, WarehousemanId};
use stockroom_common::location::Localisation;
use stockroom_common::product::{NewProduct, Product, ProductId, Stock, StockId};

use crate::error::CatalogError;
use crate::store::CatalogStore;

#[derive(Default)]
pub struct MemoryStore {
    pub products: Mutex<Vec<Product>>,
    pub staff: Vec<Warehouseman>,
    /// Every call, in order, e.g. `"GET /products/1"`.
    pub calls: Mutex<Vec<String>>,
    /// When set, `get_product` answers with this snapshot instead of the
    /// current record, as a reader that raced a concurrent writer would see.
    pub stale_read: Mutex<Option<Product>>,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn product(&self, id: &str) -> Product {
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id.0 == id)
            .cloned()
            .expect("product in store")
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn refused(method: Method, path: String, status: StatusCode) -> CatalogError {
    CatalogError::Status {
        method,
        path,
        status,
    }
}

impl CatalogStore for MemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.record("GET /products".into());
        Ok(self.products.lock().unwrap().clone())
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let path = format!("/products/{id}");
        self.record(format!("GET {path}"));
        if let Some(snapshot) = self.stale_read.lock().unwrap().clone() {
            return Ok(snapshot);
        }
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == *id)
            .cloned()
            .ok_or_else(|| refused(Method::GET, path, StatusCode::NOT_FOUND))
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product, CatalogError> {
        self.record("POST /products".into());
        if self.fail_writes {
            return Err(refused(
                Method::POST,
                "/products".into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ));
        }
        let mut products = self.products.lock().unwrap();
        let created = product
            .clone()
            .into_product(ProductId((products.len() + 1).to_string()));
        products.push(created.clone());
        Ok(created)
    }

    async fn replace_stocks(
        &self,
        id: &ProductId,
        stocks: &[Stock],
    ) -> Result<Product, CatalogError> {
        let path = format!("/products/{id}");
        self.record(format!("PATCH {path}"));
        if self.fail_writes {
            return Err(refused(Method::PATCH, path, StatusCode::SERVICE_UNAVAILABLE));
        }
        let mut products = self.products.lock().unwrap();
        let product = products
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or_else(|| refused(Method::PATCH, path, StatusCode::NOT_FOUND))?;
        product.stocks = stocks.to_vec();
        Ok(product.clone())
    }

    async fn list_warehousemen(&self) -> Result<Vec<Warehouseman>, CatalogError> {
        self.record("GET /warehousemans".into());
        Ok(self.staff.clone())
    }
}

pub fn stock(id: &str, city: &str, quantity: u32) -> Stock {
    Stock {
        id: StockId(id.into()),
        name: format!("{city} depot"),
        quantity,
        localisation: Localisation::new(city),
    }
}

pub fn product(id: &str, barcode: &str, name: &str, stocks: Vec<Stock>) -> Product {
    Product {
        id: ProductId(id.into()),
        barcode: barcode.into(),
        name: name.into(),
        kind: "Dairy".into(),
        supplier: "Centrale".into(),
        price: 2.0,
        solde: None,
        image: None,
        stocks,
        edited_by: vec![],
    }
}

pub fn warehouseman(id: &str, key: &str) -> Warehouseman {
    Warehouseman {
        id: WarehousemanId(id.into()),
        name: format!("Staff {id}"),
        city: "Rabat".into(),
        warehouse_id: "W1".into(),
        secret_key: key.into(),
    }
}
