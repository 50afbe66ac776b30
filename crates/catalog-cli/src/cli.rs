use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

use catalog_sdk::SortMode;

#[derive(Parser)]
#[command(
    name = "cardapio",
    about = "Cardápio: edit a product catalog as a local overlay on a read-only base list",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Configuration file (TOML). Defaults apply when it does not exist.
    #[arg(long, global = true, default_value = "cardapio.toml")]
    pub config: PathBuf,

    /// Override the base collection: a file path or an http(s) URL.
    #[arg(long, global = true)]
    pub base: Option<String>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the merged catalog
    List(ListArgs),
    /// Show one product
    Show(ShowArgs),
    /// Add a new product
    Add(AddArgs),
    /// Edit an existing product
    Edit(EditArgs),
    /// Adjust the stock of a product
    Stock(StockArgs),
    /// Delete a product from the catalog view
    Delete(DeleteArgs),
    /// Discard every local edit and deletion
    Reset(ResetArgs),
    /// Replace local edits with a JSON array of products
    Import(ImportArgs),
    /// Write the merged catalog as JSON
    Export(ExportArgs),
    /// Show overlay counts
    Status(StatusArgs),
    /// List categories present in the merged catalog
    Categories(CategoriesArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Name filter, ignoring case and accents
    #[arg(short, long, default_value = "")]
    pub query: String,
    /// Category to show, or "all"
    #[arg(long, default_value = "all")]
    pub category: String,
    /// name-asc, name-desc, stock-asc, stock-desc, price-asc, price-desc
    #[arg(short, long, default_value = "none")]
    pub sort: SortMode,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: String,
}

/// Product fields shared by `add` and `edit`.
#[derive(Args)]
pub struct ProductFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub stock: Option<String>,
    #[arg(long)]
    pub image: Option<String>,
    /// Flat price
    #[arg(long, conflicts_with_all = ["size", "sizes"])]
    pub price: Option<String>,
    /// Size price as LABEL=AMOUNT (repeatable)
    #[arg(long, conflicts_with = "sizes")]
    pub size: Vec<String>,
    /// Comma-separated amounts for the default size labels
    #[arg(long)]
    pub sizes: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    #[command(flatten)]
    pub fields: ProductFields,
}

#[derive(Args)]
pub struct EditArgs {
    pub id: String,
    #[command(flatten)]
    pub fields: ProductFields,
}

#[derive(Args)]
#[command(group(ArgGroup::new("change").required(true).args(["inc", "dec", "zero", "set"])))]
pub struct StockArgs {
    pub id: String,
    #[arg(long)]
    pub inc: bool,
    #[arg(long)]
    pub dec: bool,
    #[arg(long)]
    pub zero: bool,
    #[arg(long)]
    pub set: Option<u32>,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: String,
}

#[derive(Args)]
pub struct ResetArgs {
    /// Confirm discarding the overlay
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ImportArgs {
    pub file: PathBuf,
}

#[derive(Args)]
pub struct ExportArgs {
    #[arg(short, long, default_value = "produtos-merged.json")]
    pub out: PathBuf,
    /// Print to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,
}

#[derive(Args)]
pub struct StatusArgs {}

#[derive(Args)]
pub struct CategoriesArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_defaults() {
        let cli = Cli::try_parse_from(["cardapio", "list"]).unwrap();
        let Command::List(args) = cli.command else {
            panic!("wrong command");
        };
        assert_eq!(args.query, "");
        assert_eq!(args.category, "all");
        assert_eq!(args.sort, SortMode::Unsorted);
        assert_eq!(cli.config, PathBuf::from("cardapio.toml"));
    }

    #[test]
    fn parse_list_with_options() {
        let cli = Cli::try_parse_from([
            "cardapio", "list", "-q", "marg", "--category", "salgada", "-s", "nome-desc",
        ])
        .unwrap();
        let Command::List(args) = cli.command else {
            panic!("wrong command");
        };
        assert_eq!(args.query, "marg");
        assert_eq!(args.category, "salgada");
        assert_eq!(args.sort, SortMode::NameDesc);
    }

    #[test]
    fn parse_list_rejects_unknown_sort() {
        assert!(Cli::try_parse_from(["cardapio", "list", "--sort", "random"]).is_err());
    }

    #[test]
    fn parse_add_flat() {
        let cli = Cli::try_parse_from([
            "cardapio", "add", "--name", "Suco", "--category", "bebida", "--price", "8",
        ])
        .unwrap();
        let Command::Add(args) = cli.command else {
            panic!("wrong command");
        };
        assert_eq!(args.fields.name, Some("Suco".into()));
        assert_eq!(args.fields.price, Some("8".into()));
    }

    #[test]
    fn parse_add_sizes() {
        let cli = Cli::try_parse_from([
            "cardapio", "add", "--name", "Calabresa", "--size", "Broto=30", "--size", "Grande=60",
        ])
        .unwrap();
        let Command::Add(args) = cli.command else {
            panic!("wrong command");
        };
        assert_eq!(args.fields.size, vec!["Broto=30", "Grande=60"]);
    }

    #[test]
    fn price_conflicts_with_sizes() {
        assert!(Cli::try_parse_from([
            "cardapio", "add", "--name", "X", "--price", "1", "--sizes", "1,2,3",
        ])
        .is_err());
    }

    #[test]
    fn parse_edit() {
        let cli = Cli::try_parse_from(["cardapio", "edit", "abc", "--stock", "3"]).unwrap();
        let Command::Edit(args) = cli.command else {
            panic!("wrong command");
        };
        assert_eq!(args.id, "abc");
        assert_eq!(args.fields.stock, Some("3".into()));
        assert!(args.fields.name.is_none());
    }

    #[test]
    fn parse_stock_requires_one_change() {
        assert!(Cli::try_parse_from(["cardapio", "stock", "1"]).is_err());
        assert!(Cli::try_parse_from(["cardapio", "stock", "1", "--inc", "--dec"]).is_err());
        let cli = Cli::try_parse_from(["cardapio", "stock", "1", "--set", "7"]).unwrap();
        let Command::Stock(args) = cli.command else {
            panic!("wrong command");
        };
        assert_eq!(args.set, Some(7));
    }

    #[test]
    fn parse_export_defaults() {
        let cli = Cli::try_parse_from(["cardapio", "export"]).unwrap();
        let Command::Export(args) = cli.command else {
            panic!("wrong command");
        };
        assert_eq!(args.out, PathBuf::from("produtos-merged.json"));
        assert!(!args.stdout);
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from([
            "cardapio", "--verbose", "--format", "json", "--base", "http://x/p.json", "status",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.base.as_deref(), Some("http://x/p.json"));
        assert!(matches!(cli.command, Command::Status(_)));
    }

    #[test]
    fn parse_reset_yes() {
        let cli = Cli::try_parse_from(["cardapio", "reset", "-y"]).unwrap();
        let Command::Reset(args) = cli.command else {
            panic!("wrong command");
        };
        assert!(args.yes);
    }
}
