//! The HTTP catalog store binding against a live fake server.

use chrono::NaiveDate;
use stockroom_client::auth::login;
use stockroom_client::catalog::{create_product_on, find_by_barcode};
use stockroom_client::{CatalogError, CatalogStore, ClientConfig, HttpCatalogStore};
use stockroom_common::identity::WarehousemanId;
use stockroom_common::product::{ProductDraft, ProductId, ValidationError};
use stockroom_store_integration::harness::FakeCatalogStore;
use stockroom_store_integration::{init_tracing, sample_catalog, sample_staff};

async fn start() -> FakeCatalogStore {
    init_tracing();
    FakeCatalogStore::start(sample_catalog(), sample_staff()).await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn lists_and_fetches_products() {
    let fake = start().await;
    let client = fake.client();

    let products = client.list_products().await.unwrap();
    assert_eq!(products.len(), 4);
    assert_eq!(products[2].name, "Cheese");
    assert_eq!(products[2].total_stock(), 10);

    let cheese = client.get_product(&ProductId("3".into())).await.unwrap();
    assert_eq!(cheese, products[2]);

    assert_eq!(fake.requests(), vec!["GET /products", "GET /products/3"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unknown_product_is_not_found() {
    let fake = start().await;

    let err = fake
        .client()
        .get_product(&ProductId("99".into()))
        .await
        .unwrap_err();

    assert!(err.is_not_found(), "unexpected error: {err}");
    assert!(err.is_transport());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn login_matches_key_case_sensitively() {
    let fake = start().await;
    let client = fake.client();

    let session = login(&client, "ABC").await.unwrap();
    assert_eq!(session.id, WarehousemanId("1444".into()));
    assert_eq!(session.name, "Amina");

    let err = login(&client, "abc").await.unwrap_err();
    assert!(matches!(err, CatalogError::InvalidKey));

    assert_eq!(fake.requests(), vec!["GET /warehousemans", "GET /warehousemans"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn empty_key_is_rejected_without_a_request() {
    let fake = start().await;

    let err = login(&fake.client(), "").await.unwrap_err();

    assert!(matches!(err, CatalogError::InvalidKey));
    assert!(fake.requests().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn barcode_lookup() {
    let fake = start().await;
    let client = fake.client();

    let milk = find_by_barcode(&client, "6111245591032").await.unwrap();
    assert_eq!(milk.map(|p| p.name).as_deref(), Some("Milk"));

    assert!(find_by_barcode(&client, "0000000000000").await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn short_barcode_is_refused_before_any_request() {
    let fake = start().await;

    let err = find_by_barcode(&fake.client(), "611124559103").await.unwrap_err();

    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::BarcodeTooShort(_))
    ));
    assert!(fake.requests().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn created_product_lands_in_the_store() {
    let fake = start().await;
    let client = fake.client();
    let session = login(&client, "K3Y-2").await.unwrap();

    let draft = ProductDraft {
        barcode: "6111000000048".into(),
        name: "Olive Oil".into(),
        kind: "Grocery".into(),
        supplier: "Atlas".into(),
        price: 9.5,
        sale_price: Some(8.0),
        location: "Aisle 4".into(),
        quantity: 12,
        city: "Meknes".into(),
        latitude: Some(33.895),
        longitude: Some(-5.5547),
        ..Default::default()
    };
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let created = create_product_on(&client, &session, draft, today).await.unwrap();

    assert_eq!(created.id.0, "5");
    assert_eq!(fake.product("5"), Some(created.clone()));
    assert_eq!(created.solde, Some(8.0));
    assert_eq!(created.stocks.len(), 1);
    assert_eq!(created.stocks[0].id.0, "1");
    assert_eq!(created.stocks[0].localisation.coordinates(), Some((33.895, -5.5547)));
    let edit = created.last_edit().unwrap();
    assert_eq!(edit.warehouseman_id, WarehousemanId("1445".into()));
    assert_eq!(edit.at, "2024-06-01");

    // The store sees camelCase keys.
    let raw: serde_json::Value = reqwest::get(format!("{}/products/5", fake.url()))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(raw["editedBy"][0]["warehousemanId"], "1445");
    assert_eq!(raw["type"], "Grocery");
    assert_eq!(raw["solde"], 8.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn store_failure_on_create_is_reported() {
    let fake = start().await;
    let client = fake.client();
    let session = login(&client, "ABC").await.unwrap();
    fake.fail_writes(true);

    let draft = ProductDraft {
        barcode: "1".into(),
        name: "Tea".into(),
        kind: "Grocery".into(),
        price: 1.5,
        location: "Back".into(),
        quantity: 1,
        ..Default::default()
    };
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let err = create_product_on(&client, &session, draft, today)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CatalogError::Status { status, .. } if status == reqwest::StatusCode::INTERNAL_SERVER_ERROR
    ));
    assert_eq!(fake.products().len(), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unreachable_store_is_a_transport_error() {
    init_tracing();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpCatalogStore::new(&ClientConfig::new(format!("http://{addr}"))).unwrap();
    let err = client.list_products().await.unwrap_err();

    assert!(matches!(err, CatalogError::Http(_)), "unexpected error: {err}");
    assert!(err.is_transport());
}
