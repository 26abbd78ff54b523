use chrono::{NaiveDate, Utc};
use stockroom_common::identity::Session;
use stockroom_common::product::{checked_barcode, Product, ProductDraft};
use tracing::{debug, info};

use crate::error::CatalogError;
use crate::store::CatalogStore;

/// The first product carrying `barcode`, or `None` so the caller can offer
/// to create it.
///
/// The code is trimmed; one shorter than 13 characters is refused without
/// contacting the store.
pub async fn find_by_barcode<S: CatalogStore>(
    store: &S,
    barcode: &str,
) -> Result<Option<Product>, CatalogError> {
    let barcode = checked_barcode(barcode)?;
    let products = store.list_products().await?;
    let found = products.into_iter().find(|p| p.barcode == barcode);
    debug!(barcode, found = found.is_some(), "barcode lookup");
    Ok(found)
}

/// Validate `draft` and create it in the store on behalf of `session`,
/// dated with today's UTC date.
pub async fn create_product<S: CatalogStore>(
    store: &S,
    session: &Session,
    draft: ProductDraft,
) -> Result<Product, CatalogError> {
    create_product_on(store, session, draft, Utc::now().date_naive()).await
}

/// [`create_product`] with an explicit edit date.
pub async fn create_product_on<S: CatalogStore>(
    store: &S,
    session: &Session,
    draft: ProductDraft,
    today: NaiveDate,
) -> Result<Product, CatalogError> {
    let new_product = draft.into_new_product(session.id.clone(), today)?;
    let created = store.create_product(&new_product).await?;
    info!(
        product = %created.id,
        barcode = %created.barcode,
        user = %session.id,
        "product created"
    );
    Ok(created)
}
