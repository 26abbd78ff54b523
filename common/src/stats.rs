//! Catalog-wide statistics for the dashboard.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::product::Product;

/// Bucket for products with no type.
pub const UNSPECIFIED_TYPE: &str = "Unspecified";

/// Named counts, kept in the order each label was first seen.
///
/// Labels are exact keys: `"Dairy"` and `"Dairy "` are different buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    buckets: Vec<(String, u64)>,
}

impl Histogram {
    pub fn add(&mut self, label: impl Into<String>, amount: u64) {
        let label = label.into();
        match self.buckets.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += amount,
            None => self.buckets.push((label, amount)),
        }
    }

    pub fn get(&self, label: &str) -> u64 {
        self.buckets
            .iter()
            .find(|(l, _)| l == label)
            .map_or(0, |(_, count)| *count)
    }

    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|(_, count)| count).sum()
    }

    pub fn max(&self) -> u64 {
        self.buckets.iter().map(|(_, count)| *count).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.buckets.iter().map(|(label, count)| (label.as_str(), *count))
    }

    /// Share of the histogram total, `None` when the total is zero.
    pub fn percentage(&self, value: u64) -> Option<f64> {
        ratio(value, self.total())
    }

    /// Size relative to the largest bucket, `None` when every bucket is zero.
    pub fn share_of_max(&self, value: u64) -> Option<f64> {
        ratio(value, self.max())
    }
}

fn ratio(value: u64, whole: u64) -> Option<f64> {
    (whole != 0).then(|| 100.0 * value as f64 / whole as f64)
}

/// One decimal place, or a dash when undefined.
pub fn format_percentage(pct: Option<f64>) -> String {
    match pct {
        Some(p) => format!("{p:.1}%"),
        None => "–".to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_products: usize,
    pub total_stock_units: u64,
    pub distinct_city_count: usize,
    pub type_histogram: Histogram,
    pub city_stock_histogram: Histogram,
}

impl CatalogStats {
    pub fn from_products(products: &[Product]) -> Self {
        let mut cities = BTreeSet::new();
        let mut type_histogram = Histogram::default();
        let mut city_stock_histogram = Histogram::default();
        let mut total_stock_units = 0u64;

        for product in products {
            let kind = product.kind.as_str();
            type_histogram.add(if kind.is_empty() { UNSPECIFIED_TYPE } else { kind }, 1);

            for stock in &product.stocks {
                total_stock_units += u64::from(stock.quantity);
                // Stocks without a city count towards the total only.
                if stock.localisation.has_city() {
                    cities.insert(stock.localisation.city.as_str());
                    city_stock_histogram.add(stock.localisation.city.as_str(), u64::from(stock.quantity));
                }
            }
        }

        Self {
            total_products: products.len(),
            total_stock_units,
            distinct_city_count: cities.len(),
            type_histogram,
            city_stock_histogram,
        }
    }
}
