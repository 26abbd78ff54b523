//! Per-product inventory report, rendered as a self-contained HTML page.
//!
//! The page is what gets handed to a PDF printer; rasterising it is left to
//! whatever prints it.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::product::Product;

const STYLE: &str = "\
table { width: 100%; border-collapse: collapse; margin: 15px 0; }
th, td { border: 1px solid #ddd; padding: 12px; text-align: left; }
th { background-color: #FF9F43; color: white; }
tr:nth-child(even) { background-color: #f8f9fa; }
.header { text-align: center; margin-bottom: 30px; }
.report-title { color: #FF9F43; margin: 10px 0; }
.total { background: linear-gradient(135deg, #FF9F43, #FF6B6B); color: white; padding: 15px; border-radius: 8px; }
.footer { margin-top: 30px; text-align: center; color: #687076; font-size: 12px; }";

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the report for `product`, stamped with `generated_at`.
pub fn render_product_report(product: &Product, generated_at: DateTime<Utc>) -> String {
    let mut html = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut html, product, generated_at);
    html
}

fn write_report(out: &mut String, product: &Product, generated_at: DateTime<Utc>) -> std::fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html>")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"utf-8\" />")?;
    writeln!(out, "<title>{} - Inventory Report</title>", escape_html(&product.name))?;
    writeln!(out, "<style>\n{STYLE}\n</style>")?;
    writeln!(out, "</head>")?;
    writeln!(
        out,
        "<body style=\"font-family: Helvetica, sans-serif; padding: 40px; max-width: 800px; margin: 0 auto;\">"
    )?;

    writeln!(out, "<div class=\"header\">")?;
    writeln!(out, "<h1 class=\"report-title\">Product Inventory Report</h1>")?;
    writeln!(
        out,
        "<p>Generated on {}</p>",
        generated_at.format("%B %-d, %Y %H:%M UTC")
    )?;
    writeln!(out, "</div>")?;

    writeln!(out, "<table>")?;
    writeln!(out, "<tr><th colspan=\"2\">Product Information</th></tr>")?;
    info_row(out, "Name", &product.name)?;
    info_row(out, "Barcode", &format!("#{}", product.barcode))?;
    info_row(out, "Type", &product.kind)?;
    info_row(out, "Price", &format!("${}", product.price))?;
    if let Some(solde) = product.solde {
        info_row(out, "Sale Price", &format!("${solde}"))?;
    }
    info_row(out, "Supplier", &product.supplier)?;
    writeln!(out, "</table>")?;

    writeln!(
        out,
        "<div class=\"total\"><h2>Total Stock: {} units</h2></div>",
        product.total_stock()
    )?;

    writeln!(out, "<table>")?;
    writeln!(out, "<thead><tr><th>Location</th><th>City</th><th>Quantity</th></tr></thead>")?;
    writeln!(out, "<tbody>")?;
    for stock in &product.stocks {
        writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&stock.name),
            escape_html(&stock.localisation.city),
            stock.quantity
        )?;
    }
    writeln!(out, "</tbody>")?;
    writeln!(out, "</table>")?;

    writeln!(out, "<div class=\"footer\">")?;
    if let Some(edit) = product.last_edit() {
        writeln!(
            out,
            "<p>Last edited by Warehouseman #{} on {}</p>",
            escape_html(&edit.warehouseman_id.0),
            escape_html(&edit.at)
        )?;
    }
    writeln!(
        out,
        "<p>This is an automatically generated report. Please verify all information.</p>"
    )?;
    writeln!(out, "</div>")?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}

fn info_row(out: &mut String, label: &str, value: &str) -> std::fmt::Result {
    writeln!(
        out,
        "<tr><td><strong>{label}</strong></td><td>{}</td></tr>",
        escape_html(value)
    )
}
