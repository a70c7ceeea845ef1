//! Display export: the canonical table rendered with human-readable
//! column labels and formatted numbers, as handed to spreadsheet users.

use std::io::Write;

use crate::error::StockError;
use crate::model::StockRecord;

pub const DISPLAY_HEADERS: [&str; 12] = [
    "Design Number",
    "Product Name",
    "Brand",
    "Location",
    "On Hand",
    "Original Price",
    "Sale Price",
    "Total Stock",
    "Sale Item",
    "Sale %",
    "Stock Value",
    "Sale Value",
];

/// Insert thousands separators into a non-negative integer.
pub fn group_thousands(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Price/value display: thousands-grouped integer, or the `N/A`
/// sentinel for zero-or-absent amounts.
pub fn format_money(value: f64) -> String {
    if value > 0.0 {
        group_thousands(value.round() as i64)
    } else {
        "N/A".into()
    }
}

/// Sale percentage display: whole-number percent with trailing `%`,
/// empty when no sale applies.
pub fn format_percent(pct: Option<f64>) -> String {
    match pct {
        Some(p) => format!("{:.0}%", p),
        None => String::new(),
    }
}

/// Write the display CSV: sale items first, highest stock first within
/// each group, and all numeric fields formatted for reading.
pub fn write_display_csv<W: Write>(rows: &[&StockRecord], writer: W) -> Result<(), StockError> {
    let mut ordered: Vec<&StockRecord> = rows.to_vec();
    ordered.sort_by(|a, b| {
        b.sale_flag
            .cmp(&a.sale_flag)
            .then_with(|| b.on_hand.cmp(&a.on_hand))
    });

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(DISPLAY_HEADERS)
        .map_err(|e| StockError::Io(e.to_string()))?;

    for row in ordered {
        let on_hand = row.on_hand.to_string();
        let original_price = format_money(row.price_lk);
        let sale_price = format_money(row.sale_price);
        let total_stock = group_thousands(row.total_on_hand);
        let sale_pct = format_percent(row.sale_percentage);
        let stock_value = format_money(row.stock_value);
        let sale_value = format_money(row.sale_value);

        wtr.write_record([
            row.design_number.as_str(),
            row.product_name.as_str(),
            row.brand.as_str(),
            row.location.as_str(),
            on_hand.as_str(),
            original_price.as_str(),
            sale_price.as_str(),
            total_stock.as_str(),
            if row.sale_flag { "true" } else { "false" },
            sale_pct.as_str(),
            stock_value.as_str(),
            sale_value.as_str(),
        ])
        .map_err(|e| StockError::Io(e.to_string()))?;
    }

    wtr.flush().map_err(|e| StockError::Io(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::record;

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(2500), "2,500");
        assert_eq!(group_thousands(1250000), "1,250,000");
        assert_eq!(group_thousands(-4500), "-4,500");
    }

    #[test]
    fn money_sentinel() {
        assert_eq!(format_money(2500.0), "2,500");
        assert_eq!(format_money(0.0), "N/A");
        assert_eq!(format_money(-1.0), "N/A");
        assert_eq!(format_money(999.6), "1,000");
    }

    #[test]
    fn percent_display() {
        assert_eq!(format_percent(Some(20.0)), "20%");
        assert_eq!(format_percent(Some(7.5)), "8%");
        assert_eq!(format_percent(None), "");
    }

    #[test]
    fn display_csv_orders_and_formats() {
        let mut on_sale = record("LN2", "Cinnamon Store", 3, 2500.0);
        on_sale.sale_percentage = Some(20.0);
        on_sale.sale_flag = true;
        on_sale.sale_price = 2000.0;
        on_sale.total_on_hand = 3;
        on_sale.stock_value = 7500.0;
        on_sale.sale_value = 6000.0;

        let plain_big = record("LN1", "Warehouse", 10, 0.0);
        let plain_small = record("LN3", "Warehouse", 1, 100.0);

        let rows = [&plain_small, &on_sale, &plain_big];
        let mut out = Vec::new();
        write_display_csv(&rows, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0].split(',').next(), Some("Design Number"));
        // Sale row first, then by on-hand descending.
        assert!(lines[1].starts_with("LN2,"));
        assert!(lines[2].starts_with("LN1,"));
        assert!(lines[3].starts_with("LN3,"));

        assert!(lines[1].contains("\"2,500\""), "price grouped and quoted");
        assert!(lines[1].contains("20%"));
        assert!(lines[1].contains("\"6,000\""));
        assert!(lines[2].contains("N/A"), "unpriced row uses the sentinel");
    }
}
