//! A fake catalog store served over real HTTP on an ephemeral port.
//!
//! It speaks the same JSON API as the production store: products and
//! warehouse staff in memory, `PATCH` replacing the whole `stocks` array.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tokio::sync::oneshot;

use stockroom_client::{ClientConfig, HttpCatalogStore};
use stockroom_common::identity::Warehouseman;
use stockroom_common::product::{NewProduct, Product, ProductId, Stock};

struct ServerState {
    products: Mutex<Vec<Product>>,
    staff: Vec<Warehouseman>,
    requests: Mutex<Vec<String>>,
    next_id: AtomicU64,
    fail_writes: AtomicBool,
}

impl ServerState {
    fn record(&self, method: Method, path: &str) {
        self.requests.lock().unwrap().push(format!("{method} {path}"));
    }
}

#[derive(Deserialize)]
struct StocksPatch {
    stocks: Vec<Stock>,
}

/// Handle to a running fake store. Shuts the server down when dropped.
pub struct FakeCatalogStore {
    addr: SocketAddr,
    state: Arc<ServerState>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl FakeCatalogStore {
    pub async fn start(products: Vec<Product>, staff: Vec<Warehouseman>) -> Self {
        let state = Arc::new(ServerState {
            next_id: AtomicU64::new(products.len() as u64 + 1),
            products: Mutex::new(products),
            staff,
            requests: Mutex::new(Vec::new()),
            fail_writes: AtomicBool::new(false),
        });

        let app = Router::new()
            .route("/products", get(list_products).post(create_product))
            .route("/products/{id}", get(get_product).patch(patch_product))
            .route("/warehousemans", get(list_staff))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake catalog store");
        let addr = listener.local_addr().expect("Fake store has no local address");

        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = rx.await;
                })
                .await
                .expect("Fake catalog store failed");
        });
        tracing::debug!(%addr, "fake catalog store listening");

        Self {
            addr,
            state,
            shutdown: Some(tx),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.url()).with_timeout(Duration::from_secs(5))
    }

    pub fn client(&self) -> HttpCatalogStore {
        HttpCatalogStore::new(&self.config()).expect("Fake store URL should be valid")
    }

    /// Current contents of the store.
    pub fn products(&self) -> Vec<Product> {
        self.state.products.lock().unwrap().clone()
    }

    pub fn product(&self, id: &str) -> Option<Product> {
        self.products().into_iter().find(|p| p.id.0 == id)
    }

    /// Every request served so far, as `"METHOD /path"`.
    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Make every `POST`/`PATCH` answer 500 until reset.
    pub fn fail_writes(&self, fail: bool) {
        self.state.fail_writes.store(fail, Ordering::Relaxed);
    }
}

impl Drop for FakeCatalogStore {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn list_products(State(state): State<Arc<ServerState>>) -> Json<Vec<Product>> {
    state.record(Method::GET, "/products");
    Json(state.products.lock().unwrap().clone())
}

async fn get_product(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, StatusCode> {
    state.record(Method::GET, &format!("/products/{id}"));
    state
        .products
        .lock()
        .unwrap()
        .iter()
        .find(|p| p.id.0 == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create_product(
    State(state): State<Arc<ServerState>>,
    Json(new_product): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), StatusCode> {
    state.record(Method::POST, "/products");
    if state.fail_writes.load(Ordering::Relaxed) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let id = state.next_id.fetch_add(1, Ordering::Relaxed);
    let product = new_product.into_product(ProductId(id.to_string()));
    state.products.lock().unwrap().push(product.clone());
    Ok((StatusCode::CREATED, Json(product)))
}

async fn patch_product(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    Json(patch): Json<StocksPatch>,
) -> Result<Json<Product>, StatusCode> {
    state.record(Method::PATCH, &format!("/products/{id}"));
    if state.fail_writes.load(Ordering::Relaxed) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let mut products = state.products.lock().unwrap();
    let product = products
        .iter_mut()
        .find(|p| p.id.0 == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    product.stocks = patch.stocks;
    Ok(Json(product.clone()))
}

async fn list_staff(State(state): State<Arc<ServerState>>) -> Json<Vec<Warehouseman>> {
    state.record(Method::GET, "/warehousemans");
    Json(state.staff.clone())
}
