use std::fmt;

use chrono::NaiveDate;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::identity::{string_or_number, WarehousemanId};
use crate::location::{is_valid_latitude, is_valid_longitude, Localisation};

/// Typed-in barcodes shorter than this (EAN-13) are refused before lookup.
pub const MIN_BARCODE_LEN: usize = 13;

/// Products with a total below this (and above zero) count as low on stock.
pub const LOW_STOCK_THRESHOLD: u64 = 10;

/// Unique product identifier, assigned by the catalog store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(#[serde(deserialize_with = "string_or_number")] pub String);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stock identifier, unique within its product.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StockId(#[serde(deserialize_with = "string_or_number")] pub String);

impl fmt::Display for StockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One physical holding of a product at one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub id: StockId,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub localisation: Localisation,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Quantities the store should never hold but sometimes does (`null`,
/// negative, fractional, numeric strings from form input). Anything that is
/// not a whole number in `u32` range reads as 0.
fn lenient_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let quantity = match RawQuantity::deserialize(deserializer)? {
        RawQuantity::Unsigned(n) => u32::try_from(n).ok(),
        RawQuantity::Float(f) if f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&f) => {
            Some(f as u32)
        }
        RawQuantity::Text(text) => text.trim().parse::<u32>().ok(),
        RawQuantity::Signed(_) | RawQuantity::Float(_) | RawQuantity::Other(_) => None,
    };
    Ok(quantity.unwrap_or_else(|| {
        warn!("unreadable stock quantity in catalog data, counting it as 0");
        0
    }))
}

/// Audit entry: who touched the product, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRecord {
    pub warehouseman_id: WarehousemanId,
    pub at: String,
}

/// A catalog item as held by the catalog store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(deserialize_with = "string_or_number")]
    pub barcode: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub supplier: String,
    pub price: f64,
    /// Sale price, when the product is discounted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solde: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub stocks: Vec<Stock>,
    #[serde(default)]
    pub edited_by: Vec<EditRecord>,
}

impl Product {
    pub fn total_stock(&self) -> u64 {
        total_stock(&self.stocks)
    }

    pub fn stock_level(&self) -> StockLevel {
        StockLevel::classify(self.total_stock())
    }

    pub fn stock(&self, id: &StockId) -> Option<&Stock> {
        self.stocks.iter().find(|s| s.id == *id)
    }

    /// The edit shown as "last edited by". Only the first entry is read.
    pub fn last_edit(&self) -> Option<&EditRecord> {
        self.edited_by.first()
    }
}

/// Sum of quantities across all locations; zero for no stocks.
pub fn total_stock(stocks: &[Stock]) -> u64 {
    stocks.iter().map(|s| u64::from(s.quantity)).sum()
}

/// Stock status of a product, derived from its total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockLevel {
    OutOfStock,
    Low,
    InStock,
}

impl StockLevel {
    pub fn classify(total: u64) -> Self {
        match total {
            0 => StockLevel::OutOfStock,
            t if t < LOW_STOCK_THRESHOLD => StockLevel::Low,
            _ => StockLevel::InStock,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StockLevel::OutOfStock => "out of stock",
            StockLevel::Low => "low stock",
            StockLevel::InStock => "in stock",
        }
    }
}

// ─── Creation ───────────────────────────────────────────────────────────────

/// Body of `POST /products`: a product without a store-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub barcode: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub supplier: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solde: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub stocks: Vec<Stock>,
    pub edited_by: Vec<EditRecord>,
}

impl NewProduct {
    /// Attach the id the store assigned.
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            barcode: self.barcode,
            name: self.name,
            kind: self.kind,
            supplier: self.supplier,
            price: self.price,
            solde: self.solde,
            image: self.image,
            stocks: self.stocks,
            edited_by: self.edited_by,
        }
    }
}

/// Why a product form was rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} must be a non-negative number, got {value}")]
    InvalidPrice { field: &'static str, value: f64 },
    #[error("{field} is out of range: {value}")]
    InvalidCoordinate { field: &'static str, value: f64 },
    #[error("invalid barcode `{0}`: expected at least 13 characters")]
    BarcodeTooShort(String),
}

/// Trim a typed-in barcode and check it is long enough to look up.
pub fn checked_barcode(code: &str) -> Result<&str, ValidationError> {
    let code = code.trim();
    if code.chars().count() < MIN_BARCODE_LEN {
        return Err(ValidationError::BarcodeTooShort(code.to_string()));
    }
    Ok(code)
}

/// User input for a new product with its single initial stock location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub barcode: String,
    pub name: String,
    pub kind: String,
    pub supplier: String,
    pub price: f64,
    pub sale_price: Option<f64>,
    pub image: Option<String>,
    pub location: String,
    pub quantity: u32,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ProductDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("barcode", &self.barcode),
            ("name", &self.name),
            ("type", &self.kind),
            ("stock location", &self.location),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }

        check_price("price", self.price)?;
        if let Some(sale) = self.sale_price {
            check_price("sale price", sale)?;
        }

        if let Some(lat) = self.latitude.filter(|v| !is_valid_latitude(*v)) {
            return Err(ValidationError::InvalidCoordinate {
                field: "latitude",
                value: lat,
            });
        }
        if let Some(lon) = self.longitude.filter(|v| !is_valid_longitude(*v)) {
            return Err(ValidationError::InvalidCoordinate {
                field: "longitude",
                value: lon,
            });
        }
        Ok(())
    }

    /// Validate and build the creation payload, stamped with its editor.
    pub fn into_new_product(
        self,
        editor: WarehousemanId,
        today: NaiveDate,
    ) -> Result<NewProduct, ValidationError> {
        self.validate()?;

        let stock = Stock {
            id: StockId("1".into()),
            name: self.location.trim().to_string(),
            quantity: self.quantity,
            localisation: Localisation {
                city: self.city.trim().to_string(),
                latitude: self.latitude,
                longitude: self.longitude,
            },
        };

        Ok(NewProduct {
            barcode: self.barcode.trim().to_string(),
            name: self.name.trim().to_string(),
            kind: self.kind.trim().to_string(),
            supplier: self.supplier.trim().to_string(),
            price: self.price,
            solde: self.sale_price,
            image: self.image.filter(|uri| !uri.trim().is_empty()),
            stocks: vec![stock],
            edited_by: vec![EditRecord {
                warehouseman_id: editor,
                at: today.format("%Y-%m-%d").to_string(),
            }],
        })
    }
}

fn check_price(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidPrice { field, value })
    }
}
