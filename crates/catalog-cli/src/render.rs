use colored::Colorize;
use serde::Serialize;

use catalog_sdk::{format_brl, Pricing, Product};

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// "Sem estoque" in red, or the unit count.
pub fn stock_badge(p: &Product) -> String {
    if p.is_out_of_stock() {
        "Sem estoque".red().bold().to_string()
    } else {
        format!("estoque {}", p.stock)
    }
}

fn price_label(p: &Product) -> String {
    match &p.pricing {
        Pricing::Tiered(_) => format!("a partir de {}", format_brl(p.display_price())),
        Pricing::Flat(_) => format_brl(p.display_price()),
    }
}

/// One line per product for `list`.
pub fn product_row(p: &Product) -> String {
    format!(
        "{:<10} {} {} {} {}",
        p.id.as_str().dimmed(),
        p.name.bold(),
        format!("[{}]", p.category).cyan(),
        price_label(p).green(),
        stock_badge(p),
    )
}

/// Multi-line view for `show`.
pub fn product_detail(p: &Product) -> String {
    let mut lines = vec![
        format!("{} {}", p.name.bold(), format!("({})", p.id).dimmed()),
        format!("  Category: {}", p.category.cyan()),
        format!("  Stock:    {}", stock_badge(p)),
    ];
    if let Some(image) = &p.image {
        lines.push(format!("  Image:    {image}"));
    }
    match &p.pricing {
        Pricing::Flat(amount) => lines.push(format!("  Price:    {}", format_brl(*amount).green())),
        Pricing::Tiered(tiers) => {
            lines.push("  Sizes:".to_string());
            for t in tiers {
                lines.push(format!("    {:<12} {}", t.label, format_brl(t.price).green()));
            }
        }
    }
    lines.join("\n")
}
