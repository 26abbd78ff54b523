//! Catalog search, stock-status filtering and sorting for the product list.
//!
//! Everything here is a pure function of the product slice it is handed;
//! the input is never reordered or modified.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::product::{Product, StockLevel};

/// Stock-status constraint applied on top of the search match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockFilter {
    #[default]
    All,
    LowStock,
    OutOfStock,
}

impl StockFilter {
    pub fn all() -> &'static [StockFilter] {
        &[StockFilter::All, StockFilter::LowStock, StockFilter::OutOfStock]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StockFilter::All => "all",
            StockFilter::LowStock => "low-stock",
            StockFilter::OutOfStock => "out-of-stock",
        }
    }

    pub fn admits(self, total_stock: u64) -> bool {
        match self {
            StockFilter::All => true,
            StockFilter::LowStock => StockLevel::classify(total_stock) == StockLevel::Low,
            StockFilter::OutOfStock => StockLevel::classify(total_stock) == StockLevel::OutOfStock,
        }
    }
}

/// Ordering of the filtered product list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Name,
    PriceAsc,
    PriceDesc,
    StockDesc,
}

impl SortKey {
    pub fn all() -> &'static [SortKey] {
        &[
            SortKey::Name,
            SortKey::PriceAsc,
            SortKey::PriceDesc,
            SortKey::StockDesc,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::StockDesc => "stock-desc",
        }
    }

    fn compare(self, a: &ProductView<'_>, b: &ProductView<'_>) -> Ordering {
        match self {
            SortKey::Name => collate(&a.product.name, &b.product.name),
            SortKey::PriceAsc => a.product.price.total_cmp(&b.product.price),
            SortKey::PriceDesc => b.product.price.total_cmp(&a.product.price),
            SortKey::StockDesc => b.total_stock.cmp(&a.total_stock),
        }
    }
}

/// Unknown filter or sort name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}` (expected one of: {expected})")]
pub struct ParseKeyError {
    kind: &'static str,
    value: String,
    expected: String,
}

impl FromStr for StockFilter {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StockFilter::All),
            "low-stock" => Ok(StockFilter::LowStock),
            // `out-stock` is the id older app builds used.
            "out-of-stock" | "out-stock" => Ok(StockFilter::OutOfStock),
            other => Err(ParseKeyError {
                kind: "stock filter",
                value: other.to_string(),
                expected: join(StockFilter::all().iter().map(|f| f.as_str())),
            }),
        }
    }
}

impl FromStr for SortKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortKey::Name),
            "price-asc" => Ok(SortKey::PriceAsc),
            "price-desc" => Ok(SortKey::PriceDesc),
            "stock-desc" | "stock" => Ok(SortKey::StockDesc),
            other => Err(ParseKeyError {
                kind: "sort key",
                value: other.to_string(),
                expected: join(SortKey::all().iter().map(|k| k.as_str())),
            }),
        }
    }
}

impl fmt::Display for StockFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn join<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

/// A product annotated with its derived total stock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductView<'a> {
    pub product: &'a Product,
    pub total_stock: u64,
}

impl<'a> ProductView<'a> {
    pub fn new(product: &'a Product) -> Self {
        Self {
            product,
            total_stock: product.total_stock(),
        }
    }

    pub fn stock_level(&self) -> StockLevel {
        StockLevel::classify(self.total_stock)
    }
}

/// What the product list is currently showing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub search: String,
    pub stock_filter: StockFilter,
    pub sort: SortKey,
}

impl CatalogQuery {
    pub fn new(search: impl Into<String>, stock_filter: StockFilter, sort: SortKey) -> Self {
        Self {
            search: search.into(),
            stock_filter,
            sort,
        }
    }

    /// Case-insensitive substring match on name or type. Empty matches all.
    pub fn matches_search(&self, product: &Product) -> bool {
        let term = self.search.to_lowercase();
        term.is_empty()
            || product.name.to_lowercase().contains(&term)
            || product.kind.to_lowercase().contains(&term)
    }

    /// Filter and order `products` into a fresh list.
    pub fn run<'a>(&self, products: &'a [Product]) -> Vec<ProductView<'a>> {
        let mut views: Vec<ProductView<'a>> = products
            .iter()
            .map(ProductView::new)
            .filter(|v| self.matches_search(v.product) && self.stock_filter.admits(v.total_stock))
            .collect();

        // `sort_by` is stable, so equal keys keep catalog order.
        views.sort_by(|a, b| self.sort.compare(a, b));
        views
    }
}

/// Locale-style collation. Base letters decide first (`É` sorts with `e`),
/// then accents, then case; the raw string breaks any remaining tie.
fn collate(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Decompose, drop combining marks and case-fold.
fn base_letters(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}
