use stockroom_common::identity::Session;
use tracing::{info, warn};

use crate::error::CatalogError;
use crate::store::CatalogStore;

/// Exchange a shared key for a session.
///
/// The staff list is fetched from the store and the first member whose key
/// equals `key` exactly (case-sensitive) is logged in. There is no hashing
/// and no server-side session.
pub async fn login<S: CatalogStore>(store: &S, key: &str) -> Result<Session, CatalogError> {
    if key.is_empty() {
        return Err(CatalogError::InvalidKey);
    }

    let staff = store.list_warehousemen().await?;
    match staff.iter().find(|member| member.matches_key(key)) {
        Some(member) => {
            info!(user = %member.id, name = %member.name, "login accepted");
            Ok(Session::from(member))
        }
        None => {
            warn!(candidates = staff.len(), "login rejected: no matching key");
            Err(CatalogError::InvalidKey)
        }
    }
}
