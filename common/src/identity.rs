use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a warehouse staff member, as assigned by the catalog store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WarehousemanId(#[serde(deserialize_with = "string_or_number")] pub String);

impl fmt::Display for WarehousemanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A warehouse staff record from `GET /warehousemans`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouseman {
    pub id: WarehousemanId,
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(deserialize_with = "string_or_number")]
    pub warehouse_id: String,
    pub secret_key: String,
}

impl Warehouseman {
    /// Exact, case-sensitive comparison against the entered key.
    pub fn matches_key(&self, key: &str) -> bool {
        self.secret_key == key
    }
}

// Keeps the shared key out of logs.
impl fmt::Debug for Warehouseman {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Warehouseman")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("city", &self.city)
            .field("warehouse_id", &self.warehouse_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// The identity record persisted at login and removed at logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: WarehousemanId,
    pub name: String,
    pub warehouse_id: String,
    #[serde(default)]
    pub city: String,
}

impl From<&Warehouseman> for Session {
    fn from(user: &Warehouseman) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            warehouse_id: user.warehouse_id.clone(),
            city: user.city.clone(),
        }
    }
}

/// Accept an identifier written either as a JSON string or a JSON integer.
///
/// The catalog store hands out numeric ids for some records and string ids
/// for others; both are kept as strings on our side.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Signed(n) => n.to_string(),
        Raw::Unsigned(n) => n.to_string(),
    })
}
