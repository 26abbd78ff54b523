//! Plain-text rendering of catalog data for the terminal.

use std::fmt::Write;

use stockroom_common::identity::Session;
use stockroom_common::product::Product;
use stockroom_common::query::ProductView;
use stockroom_common::stats::{format_percentage, CatalogStats, Histogram};

const BAR_WIDTH: usize = 30;

pub fn price(value: f64) -> String {
    format!("{value:.2}")
}

/// Price with the sale price alongside when there is one.
fn price_line(product: &Product) -> String {
    match product.solde {
        Some(sale) => format!("{} (sale {})", price(product.price), price(sale)),
        None => price(product.price),
    }
}

fn or_dash(text: &str) -> &str {
    if text.trim().is_empty() {
        "-"
    } else {
        text
    }
}

pub fn session(session: &Session) -> String {
    format!(
        "{} (id {}) warehouse {}, {}",
        session.name,
        session.id,
        session.warehouse_id,
        or_dash(&session.city)
    )
}

/// One row per product: name, type, price, total stock and its level.
pub fn product_list(views: &[ProductView<'_>]) -> String {
    if views.is_empty() {
        return "No products match.\n".to_string();
    }

    let name_width = views
        .iter()
        .map(|v| v.product.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());
    let kind_width = views
        .iter()
        .map(|v| or_dash(&v.product.kind).chars().count())
        .max()
        .unwrap_or(0)
        .max("TYPE".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<name_width$}  {:<kind_width$}  {:>10}  {:>8}  {}",
        "NAME", "TYPE", "PRICE", "STOCK", "STATUS"
    );
    for view in views {
        let _ = writeln!(
            out,
            "{:<name_width$}  {:<kind_width$}  {:>10}  {:>8}  {}",
            view.product.name,
            or_dash(&view.product.kind),
            price(view.product.price),
            view.total_stock,
            view.stock_level().label()
        );
    }
    let _ = writeln!(out, "{} product(s)", views.len());
    out
}

pub fn product_detail(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", product.name);
    let _ = writeln!(out, "  barcode   {}", product.barcode);
    let _ = writeln!(out, "  type      {}", or_dash(&product.kind));
    let _ = writeln!(out, "  supplier  {}", or_dash(&product.supplier));
    let _ = writeln!(out, "  price     {}", price_line(product));
    if let Some(image) = &product.image {
        let _ = writeln!(out, "  image     {image}");
    }

    let total = product.total_stock();
    let _ = writeln!(
        out,
        "  stock     {total} unit(s), {}",
        product.stock_level().label()
    );
    for stock in &product.stocks {
        let _ = writeln!(
            out,
            "    [{}] {:<20} {:<24} {:>6}",
            stock.id,
            stock.name,
            or_dash(&stock.localisation.to_string()),
            stock.quantity
        );
    }

    if let Some(edit) = product.last_edit() {
        let _ = writeln!(
            out,
            "  last edited by warehouseman {} on {}",
            edit.warehouseman_id, edit.at
        );
    }
    out
}

fn bar(share: Option<f64>) -> String {
    let filled = share
        .map(|pct| ((pct / 100.0) * BAR_WIDTH as f64).round() as usize)
        .unwrap_or(0)
        .min(BAR_WIDTH);
    "#".repeat(filled)
}

fn histogram(out: &mut String, title: &str, histogram: &Histogram) {
    let _ = writeln!(out, "{title}");
    if histogram.is_empty() {
        let _ = writeln!(out, "  (none)");
        return;
    }
    let width = histogram
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    for (label, value) in histogram.iter() {
        let _ = writeln!(
            out,
            "  {label:<width$}  {value:>8}  {:>6}  {}",
            format_percentage(histogram.percentage(value)),
            bar(histogram.share_of_max(value))
        );
    }
}

pub fn stats(stats: &CatalogStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Products      {}", stats.total_products);
    let _ = writeln!(out, "Stock units   {}", stats.total_stock_units);
    let _ = writeln!(out, "Cities        {}", stats.distinct_city_count);
    out.push('\n');
    histogram(&mut out, "By type (products)", &stats.type_histogram);
    out.push('\n');
    histogram(&mut out, "By city (stock units)", &stats.city_stock_histogram);
    out
}
