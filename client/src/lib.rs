//! Client for the remote catalog store: HTTP binding, login and session,
//! barcode lookup, product creation and optimistic quantity changes.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod mutator;
pub mod session;
pub mod store;

#[cfg(test)]
mod testing;

pub use config::ClientConfig;
pub use error::CatalogError;
pub use http::HttpCatalogStore;
pub use store::CatalogStore;
