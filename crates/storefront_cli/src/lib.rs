//! Command-line console for the storefront GraphQL API.
//!
//! Each invocation runs exactly one call and prints the result slot it
//! filled, or the error text.
//!
//! # Usage
//!
//! ```bash
//! # Look up a customer
//! storefront customer C-1
//!
//! # List the catalog
//! storefront catalog --category tools --limit 10
//!
//! # Price a quantity of a product
//! storefront quote SKU-1 --quantity 3 --customer C-1
//!
//! # Place an order
//! storefront order --customer C-1 --sku SKU-1 --quantity 3
//!
//! # Schedule a return
//! storefront return --order O-77 --reason damaged
//! ```

pub mod operations;
pub mod session;

use clap::{Parser, Subcommand};
use colored::Colorize;
use operations::{OrderInput, ReturnInput};
use session::{ResultSlot, Session};
use storefront_sdk::{ClientConfig, OutcomeKind};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// GraphQL endpoint URL
    #[arg(long, global = true, env = "STOREFRONT_ENDPOINT", default_value = ClientConfig::DEFAULT_URL)]
    pub endpoint: String,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up a customer by id
    Customer {
        /// Customer id
        id: String,
    },

    /// List catalog products
    Catalog {
        /// Only list products in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Maximum number of products
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Quote a price for a product
    Quote {
        /// Product SKU
        sku: String,

        #[arg(short = 'n', long, default_value = "1")]
        quantity: u32,

        /// Customer id, for customer-specific pricing
        #[arg(short, long)]
        customer: Option<String>,
    },

    /// Place an order
    Order {
        #[arg(long)]
        customer: String,

        #[arg(long)]
        sku: String,

        #[arg(short = 'n', long, default_value = "1")]
        quantity: u32,
    },

    /// Schedule a return for an order
    Return {
        #[arg(long)]
        order: String,

        #[arg(long)]
        reason: String,

        /// Preferred pickup date (YYYY-MM-DD)
        #[arg(long)]
        pickup_date: Option<String>,
    },

    /// Print version information
    Version,
}

impl Commands {
    fn describe(&self) -> &'static str {
        match self {
            Self::Customer { .. } => "customer lookup",
            Self::Catalog { .. } => "catalog listing",
            Self::Quote { .. } => "price quote",
            Self::Order { .. } => "order placement",
            Self::Return { .. } => "return scheduling",
            Self::Version => "version",
        }
    }
}

/// Runs one command and returns the process exit code.
pub async fn run(cli: Cli) -> Result<i32, Box<dyn std::error::Error>> {
    debug!(
        command = cli.command.describe(),
        endpoint = %cli.endpoint,
        "running"
    );
    let connect = || Session::connect(&ClientConfig::new(&cli.endpoint));

    let (session, kind, slot) = match cli.command {
        Commands::Customer { id } => {
            let session = connect()?;
            let kind = session.load_customer(id).await?;
            (session, kind, ResultSlot::Customer)
        }
        Commands::Catalog { category, limit } => {
            let session = connect()?;
            let kind = session.list_products(category, limit).await?;
            (session, kind, ResultSlot::Catalog)
        }
        Commands::Quote {
            sku,
            quantity,
            customer,
        } => {
            let session = connect()?;
            let kind = session.quote_price(sku, quantity, customer).await?;
            (session, kind, ResultSlot::Quote)
        }
        Commands::Order {
            customer,
            sku,
            quantity,
        } => {
            let session = connect()?;
            let kind = session
                .place_order(OrderInput {
                    customer_id: customer,
                    sku,
                    quantity,
                })
                .await?;
            (session, kind, ResultSlot::Order)
        }
        Commands::Return {
            order,
            reason,
            pickup_date,
        } => {
            let session = connect()?;
            let kind = session
                .schedule_return(ReturnInput {
                    order_id: order,
                    reason,
                    pickup_date,
                })
                .await?;
            (session, kind, ResultSlot::Return)
        }
        Commands::Version => {
            println!("storefront {}", env!("CARGO_PKG_VERSION"));
            return Ok(0);
        }
    };
    debug!(outcome = kind.as_str(), "call finished");

    let state = session.state();
    if let Some(text) = state.error() {
        let label = match kind {
            OutcomeKind::TransportError => "Transport error:",
            _ => "Error:",
        };
        eprintln!("{} {}", label.red().bold(), text);
        return Ok(1);
    }

    let value = state.results.slot_json(slot)?;
    if value.is_null() {
        if !cli.quiet {
            println!("{}", "No record found".yellow());
        }
        return Ok(0);
    }

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quote() {
        let cli = Cli::try_parse_from([
            "storefront",
            "--endpoint",
            "http://proxy:8080/graphql",
            "quote",
            "SKU-1",
            "-n",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.endpoint, "http://proxy:8080/graphql");
        match cli.command {
            Commands::Quote {
                sku,
                quantity,
                customer,
            } => {
                assert_eq!(sku, "SKU-1");
                assert_eq!(quantity, 3);
                assert_eq!(customer, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_return_requires_reason() {
        assert!(Cli::try_parse_from(["storefront", "return", "--order", "O-1"]).is_err());

        let cli = Cli::try_parse_from([
            "storefront",
            "return",
            "--order",
            "O-1",
            "--reason",
            "damaged",
            "--pickup-date",
            "2026-10-21",
        ])
        .unwrap();
        assert_eq!(cli.command.describe(), "return scheduling");
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["storefront", "catalog", "--limit", "5", "--verbose"])
            .unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Catalog {
                category: None,
                limit: Some(5)
            }
        ));
    }

    #[tokio::test]
    async fn test_run_reports_unreachable_endpoint() {
        let addr = {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let endpoint = format!("http://{addr}/graphql");
        let cli = Cli::try_parse_from([
            "storefront",
            "--endpoint",
            endpoint.as_str(),
            "customer",
            "C-1",
        ])
        .unwrap();

        assert_eq!(run(cli).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_version_needs_no_endpoint() {
        let cli = Cli::try_parse_from([
            "storefront",
            "--endpoint",
            "https://shop.example/graphql",
            "version",
        ])
        .unwrap();

        assert_eq!(run(cli).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_run_rejects_https_endpoint() {
        let cli = Cli::try_parse_from([
            "storefront",
            "--endpoint",
            "https://shop.example/graphql",
            "customer",
            "C-1",
        ])
        .unwrap();

        assert!(run(cli).await.is_err());
    }
}
