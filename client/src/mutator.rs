//! Optimistic stock-quantity changes.
//!
//! A change is applied to the caller's product view first, then written to
//! the catalog store as a read-modify-write of the whole `stocks` array:
//!
//! 1. `begin`: validate, apply the quantity to the view, keep a snapshot
//! 2. `commit`: fetch the current product, replace the one quantity, send
//!    every stock back with `PATCH /products/{id}`, then replace the view
//!    with what the store returned
//! 3. on any failure in `commit` the view is restored from the snapshot
//!
//! The store has no per-field update and no locking. Two clients (or two
//! in-flight changes from one client) that read the same product before
//! either writes will each send a full `stocks` array, and the later write
//! silently discards the earlier one. `QuantityAdjustment::stale_view`
//! flags the cases where the read already showed someone else's change.

use stockroom_common::product::{Product, ProductId, Stock, StockId};
use tracing::{info, warn};

use crate::error::CatalogError;
use crate::store::CatalogStore;

/// Outcome of a quantity change the store accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityAdjustment {
    pub product: ProductId,
    pub stock: StockId,
    /// Quantity the view showed before the change.
    pub previous: u32,
    /// Quantity the store holds after the change.
    pub confirmed: u32,
    /// The store's quantity differed from the view's when it was read back.
    pub stale_view: bool,
}

/// A quantity change already applied to a view but not yet confirmed.
#[derive(Debug)]
#[must_use = "a pending adjustment must be committed or rolled back"]
pub struct PendingAdjustment {
    product: ProductId,
    stock: StockId,
    quantity: u32,
    previous: u32,
    snapshot: Vec<Stock>,
}

impl PendingAdjustment {
    /// Validate the change and apply it to `view`.
    ///
    /// Nothing is touched when `new_quantity` is negative or `stock_id` is not
    /// one of the view's stocks.
    pub fn begin(
        view: &mut Product,
        stock_id: &StockId,
        new_quantity: i64,
    ) -> Result<Self, CatalogError> {
        let quantity = checked_quantity(new_quantity)?;
        let index = view
            .stocks
            .iter()
            .position(|s| s.id == *stock_id)
            .ok_or_else(|| CatalogError::StockNotFound {
                product: view.id.clone(),
                stock: stock_id.clone(),
            })?;

        let snapshot = view.stocks.clone();
        let previous = view.stocks[index].quantity;
        view.stocks[index].quantity = quantity;

        Ok(Self {
            product: view.id.clone(),
            stock: stock_id.clone(),
            quantity,
            previous,
            snapshot,
        })
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Write the change through to the store and reconcile `view` with the
    /// store's answer. On failure `view` is rolled back and the error returned.
    pub async fn commit<S: CatalogStore>(
        self,
        store: &S,
        view: &mut Product,
    ) -> Result<QuantityAdjustment, CatalogError> {
        match self.write_through(store).await {
            Ok((stored, stale_view)) => {
                let confirmed = stored.stock(&self.stock).map(|s| s.quantity);
                *view = stored;
                let confirmed = confirmed.ok_or_else(|| CatalogError::StockNotFound {
                    product: self.product.clone(),
                    stock: self.stock.clone(),
                })?;
                info!(
                    product = %self.product,
                    stock = %self.stock,
                    previous = self.previous,
                    confirmed,
                    "stock quantity updated"
                );
                Ok(QuantityAdjustment {
                    product: self.product,
                    stock: self.stock,
                    previous: self.previous,
                    confirmed,
                    stale_view,
                })
            }
            Err(e) => {
                warn!(
                    product = %self.product,
                    stock = %self.stock,
                    error = %e,
                    "stock update failed, restoring previous quantity"
                );
                self.rollback(view);
                Err(e)
            }
        }
    }

    /// Undo the change in `view`.
    pub fn rollback(self, view: &mut Product) {
        view.stocks = self.snapshot;
    }

    async fn write_through<S: CatalogStore>(
        &self,
        store: &S,
    ) -> Result<(Product, bool), CatalogError> {
        let mut current = store.get_product(&self.product).await?;

        let stock = current
            .stocks
            .iter_mut()
            .find(|s| s.id == self.stock)
            .ok_or_else(|| CatalogError::StockNotFound {
                product: self.product.clone(),
                stock: self.stock.clone(),
            })?;

        let stale_view = stock.quantity != self.previous;
        if stale_view {
            warn!(
                product = %self.product,
                stock = %self.stock,
                viewed = self.previous,
                stored = stock.quantity,
                "product view was stale; overwriting the stored quantity"
            );
        }
        stock.quantity = self.quantity;

        let stored = store.replace_stocks(&self.product, &current.stocks).await?;
        Ok((stored, stale_view))
    }
}

/// Set one stock location of `view` to `new_quantity`, optimistically.
pub async fn adjust_quantity<S: CatalogStore>(
    store: &S,
    view: &mut Product,
    stock_id: &StockId,
    new_quantity: i64,
) -> Result<QuantityAdjustment, CatalogError> {
    PendingAdjustment::begin(view, stock_id, new_quantity)?
        .commit(store, view)
        .await
}

fn checked_quantity(value: i64) -> Result<u32, CatalogError> {
    if value < 0 {
        return Err(CatalogError::InvalidQuantity(value));
    }
    u32::try_from(value).map_err(|_| CatalogError::QuantityTooLarge(value))
}
