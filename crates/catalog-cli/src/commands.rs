use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use colored::Colorize;
use tracing::debug;

use catalog_sdk::{
    BaseLocation, BaseSource, Catalog, CatalogConfig, CatalogError, CategoryFilter, ConfiguredSource,
    EditorDefaults, FileBackend, Filter, PricingDraft, ProductDraft, ProductId, StockAdjustment,
    TierDraft,
};

use crate::cli::*;
use crate::render;

type CliCatalog = Catalog<FileBackend, ConfiguredSource>;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let catalog = open_catalog(&cli.config, cli.base.as_deref())?;
    let json = matches!(cli.format, OutputFormat::Json);
    match cli.command {
        Command::List(args) => cmd_list(&catalog, args, json).await,
        Command::Show(args) => cmd_show(&catalog, args, json).await,
        Command::Add(args) => cmd_add(&catalog, args, json),
        Command::Edit(args) => cmd_edit(&catalog, args, json).await,
        Command::Stock(args) => cmd_stock(&catalog, args, json).await,
        Command::Delete(args) => cmd_delete(&catalog, args),
        Command::Reset(args) => cmd_reset(&catalog, args),
        Command::Import(args) => cmd_import(&catalog, args),
        Command::Export(args) => cmd_export(&catalog, args).await,
        Command::Status(_) => cmd_status(&catalog, json).await,
        Command::Categories(_) => cmd_categories(&catalog, json).await,
    }
}

fn open_catalog(config_path: &Path, base: Option<&str>) -> anyhow::Result<CliCatalog> {
    let mut config = CatalogConfig::load(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    if let Some(base) = base {
        config.base = base_location(base);
    }
    debug!(base = ?config.base, overlay = %config.overlay_path.display(), "opening catalog");
    Ok(config.open()?)
}

fn base_location(raw: &str) -> BaseLocation {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        BaseLocation::Url(raw.to_string())
    } else {
        BaseLocation::File(PathBuf::from(raw))
    }
}

async fn cmd_list(catalog: &CliCatalog, args: ListArgs, json: bool) -> anyhow::Result<()> {
    let filter = Filter::new(args.query, CategoryFilter::parse(&args.category));
    let products = catalog.view(&filter, args.sort).await?;
    if json {
        return render::print_json(&products);
    }
    if products.is_empty() {
        println!("No products match.");
        return Ok(());
    }
    for p in &products {
        println!("{}", render::product_row(p));
    }
    println!("\n{} {}", products.len().to_string().bold(), "itens".dimmed());
    Ok(())
}

async fn cmd_show(catalog: &CliCatalog, args: ShowArgs, json: bool) -> anyhow::Result<()> {
    let product = catalog
        .find(&args.id)
        .await?
        .ok_or(CatalogError::NotFound(args.id))?;
    if json {
        return render::print_json(&product);
    }
    println!("{}", render::product_detail(&product));
    Ok(())
}

fn cmd_add(catalog: &CliCatalog, args: AddArgs, json: bool) -> anyhow::Result<()> {
    let blank = ProductDraft::new("", PricingDraft::Flat(String::new()));
    let draft = apply_fields(blank, args.fields, catalog.defaults())?;
    let saved = catalog.save(draft)?;
    if json {
        return render::print_json(&saved);
    }
    println!("{} Added {} ({})", "✓".green().bold(), saved.name.bold(), saved.id.to_string().yellow());
    Ok(())
}

async fn cmd_edit(catalog: &CliCatalog, args: EditArgs, json: bool) -> anyhow::Result<()> {
    let current = catalog
        .find(&args.id)
        .await?
        .ok_or(CatalogError::NotFound(args.id))?;
    let draft = apply_fields(ProductDraft::from_product(&current), args.fields, catalog.defaults())?;
    let saved = catalog.save(draft)?;
    if json {
        return render::print_json(&saved);
    }
    println!("{} Saved {} ({})", "✓".green().bold(), saved.name.bold(), saved.id.to_string().yellow());
    Ok(())
}

async fn cmd_stock(catalog: &CliCatalog, args: StockArgs, json: bool) -> anyhow::Result<()> {
    let adjustment = match (args.inc, args.dec, args.zero, args.set) {
        (true, _, _, _) => StockAdjustment::Increment,
        (_, true, _, _) => StockAdjustment::Decrement,
        (_, _, true, _) => StockAdjustment::Zero,
        (_, _, _, Some(n)) => StockAdjustment::Set(n),
        _ => bail!("one of --inc, --dec, --zero or --set is required"),
    };
    let updated = catalog.adjust_stock(&args.id, adjustment).await?;
    if json {
        return render::print_json(&updated);
    }
    println!("{} {}: {}", "✓".green().bold(), updated.name.bold(), render::stock_badge(&updated));
    Ok(())
}

fn cmd_delete(catalog: &CliCatalog, args: DeleteArgs) -> anyhow::Result<()> {
    let id = ProductId::new(args.id)?;
    catalog.delete(&id)?;
    println!("{} Deleted {}", "✓".green().bold(), id.to_string().yellow());
    Ok(())
}

fn cmd_reset(catalog: &CliCatalog, args: ResetArgs) -> anyhow::Result<()> {
    if !args.yes {
        bail!("reset discards every local edit and deletion; pass --yes to confirm");
    }
    catalog.reset()?;
    println!("{} Overlay cleared. Showing the base list again.", "✓".green().bold());
    Ok(())
}

fn cmd_import(catalog: &CliCatalog, args: ImportArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let count = catalog.import_json(&text)?;
    println!("{} Imported {} products as local edits", "✓".green().bold(), count.to_string().bold());
    Ok(())
}

async fn cmd_export(catalog: &CliCatalog, args: ExportArgs) -> anyhow::Result<()> {
    let text = catalog.export().await?;
    if args.stdout {
        println!("{text}");
        return Ok(());
    }
    std::fs::write(&args.out, format!("{text}\n"))
        .with_context(|| format!("writing {}", args.out.display()))?;
    println!("{} Exported to {}", "✓".green().bold(), args.out.display().to_string().bold());
    Ok(())
}

async fn cmd_status(catalog: &CliCatalog, json: bool) -> anyhow::Result<()> {
    let status = catalog.status();
    if json {
        return render::print_json(&status);
    }
    println!("Base: {}", catalog.source().origin().cyan());
    match catalog.merged_with_stats().await {
        Ok((_, stats)) => println!(
            "{} itens ({} base, {} replaced, {} added, {} removed)",
            stats.total.to_string().bold(),
            stats.base,
            stats.replaced,
            stats.added,
            stats.removed,
        ),
        Err(e) => println!("{} base unavailable: {e}", "!".red().bold()),
    }
    println!(
        "Overlay: {} edit(s), {} deleted",
        status.edits.to_string().yellow(),
        status.tombstones.to_string().yellow(),
    );
    Ok(())
}

async fn cmd_categories(catalog: &CliCatalog, json: bool) -> anyhow::Result<()> {
    let categories = catalog.categories().await?;
    if json {
        return render::print_json(&categories);
    }
    for c in &categories {
        println!("{c}");
    }
    Ok(())
}

/// Overlay the flags that were given onto a draft.
fn apply_fields(
    mut draft: ProductDraft,
    fields: ProductFields,
    defaults: &EditorDefaults,
) -> anyhow::Result<ProductDraft> {
    if let Some(name) = fields.name {
        draft.name = name;
    }
    if let Some(category) = fields.category {
        draft.category = category;
    }
    if let Some(stock) = fields.stock {
        draft.stock = stock;
    }
    if let Some(image) = fields.image {
        draft.image = Some(image);
    }
    if let Some(price) = fields.price {
        draft.pricing = PricingDraft::Flat(price);
    } else if !fields.size.is_empty() {
        let rows = fields
            .size
            .iter()
            .map(|raw| parse_size(raw))
            .collect::<anyhow::Result<Vec<_>>>()?;
        draft.pricing = PricingDraft::Tiered(rows);
    } else if let Some(sizes) = fields.sizes {
        let amounts: Vec<String> = sizes.split(',').map(|s| s.trim().to_string()).collect();
        if amounts.len() > defaults.tier_labels.len() {
            bail!(
                "--sizes takes at most {} amounts ({})",
                defaults.tier_labels.len(),
                defaults.tier_labels.join(", ")
            );
        }
        draft.pricing = PricingDraft::tiered_with_labels(&defaults.tier_labels, &amounts);
    }
    Ok(draft)
}

/// `LABEL=AMOUNT`
fn parse_size(raw: &str) -> anyhow::Result<TierDraft> {
    match raw.split_once('=') {
        Some((label, amount)) if !label.trim().is_empty() => {
            Ok(TierDraft::new(label.trim(), amount.trim()))
        }
        _ => bail!("size must look like LABEL=AMOUNT, got {raw:?}"),
    }
}
