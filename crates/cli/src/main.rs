//! Tany Foods CLI - catalog and order management tools.
//!
//! # Usage
//!
//! ```bash
//! # Replace the catalog from a spreadsheet
//! tany-cli products import catalog.xlsx
//!
//! # Export all orders
//! tany-cli orders export --format xlsx --output orders.xlsx
//!
//! # Hash the administrator password
//! echo -n 'secret' | tany-cli admin hash-password
//! ```
//!
//! # Commands
//!
//! - `products import` - Replace the product catalog
//! - `orders export` - Write the order report as CSV or XLSX
//! - `admin hash-password` - Produce `TANY_ADMIN_PASSWORD_HASH`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use tany_orders_server::services::export::ExportFormat;

mod commands;

#[derive(Parser)]
#[command(name = "tany-cli")]
#[command(author, version, about = "Tany Foods ordering CLI tools")]
struct Cli {
    /// Directory of the JSON collections
    #[arg(long, global = true, env = "TANY_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the product catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Work with submitted orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Administrator credentials
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// Replace the catalog with a CSV or XLSX file
    Import {
        /// Product sheet (.csv or .xlsx)
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// Export the flattened order report
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = FormatArg::Csv)]
        format: FormatArg,

        /// Output file (defaults to `tany_foods_orders.<ext>`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    #[value(alias = "excel")]
    Xlsx,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => Self::Csv,
            FormatArg::Xlsx => Self::Xlsx,
        }
    }
}

#[derive(Subcommand)]
enum AdminAction {
    /// Read a password from stdin and print its Argon2 hash
    HashPassword,
}

#[tokio::main]
async fn main() {
    // Pick up TANY_DATA_DIR from .env before clap reads the environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::Import { file } => {
                let stored = commands::products::import(&cli.data_dir, &file).await?;
                tracing::info!("Uploaded {stored} products successfully!");
            }
        },
        Commands::Orders { action } => match action {
            OrdersAction::Export { format, output } => {
                let path = commands::orders::export(&cli.data_dir, format.into(), output).await?;
                tracing::info!("Orders written to {}", path.display());
            }
        },
        Commands::Admin { action } => match action {
            AdminAction::HashPassword => {
                commands::admin::hash_password(std::io::stdin().lock(), std::io::stdout().lock())?;
            }
        },
    }
    Ok(())
}
