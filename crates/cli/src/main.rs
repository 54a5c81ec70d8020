//! Jaelle CLI - browse the shop, manage a cart and check out from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalogue
//! jaelle products list --sort-by price --asc
//! jaelle products show robe-en-lin
//! jaelle categories show robes
//!
//! # Search
//! jaelle search robe
//! jaelle search --interactive
//!
//! # Cart
//! jaelle cart add robe-en-lin -q 2
//! jaelle cart update 12 3
//! jaelle cart show
//!
//! # Simulated checkout
//! jaelle checkout -f Ana -l Lopez -e ana@example.com --address "1 rue" \
//!     --city Lyon --postal-code 69001 --country France --payment paypal
//! ```
//!
//! # Environment Variables
//!
//! - `JAELLE_API_URL` - Backend base URL (default `http://localhost:8000/api/`)
//! - `JAELLE_CART_PATH` - Cart file (default `.jaelle-cart.json`)
//! - `SENTRY_DSN` - Enables error reporting
//! - `RUST_LOG` - Log filter

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::{Args, Parser, Subcommand, ValueEnum};
use jaelle_core::{ProductId, Slug};
use jaelle_storefront::StorefrontConfig;
use jaelle_storefront::api::types::{ProductQuery, SortField, SortOrder};
use jaelle_storefront::forms::{CheckoutForm, PaymentMethod};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{CommandError, Context};

#[derive(Parser)]
#[command(name = "jaelle")]
#[command(author, version, about = "Jaelle shop from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Browse categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Browse subcategories
    Subcategories {
        #[command(subcommand)]
        action: SubCategoryAction,
    },
    /// Search products by name or description
    Search {
        /// Search text (at least 2 characters)
        #[arg(required_unless_present = "interactive")]
        query: Option<String>,

        /// Read search-box contents line by line from stdin
        #[arg(short, long)]
        interactive: bool,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartCommand,
    },
    /// Register or log in
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Check out the cart (payment is simulated)
    Checkout(CheckoutArgs),
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products
    List(ListArgs),
    /// Show a product
    Show { slug: String },
    /// Show featured products
    Featured {
        /// Show a single product picked at random
        #[arg(short, long)]
        random: bool,
    },
}

#[derive(Args)]
struct ListArgs {
    /// Category slug
    #[arg(short, long)]
    category: Option<Slug>,

    #[arg(long)]
    min_price: Option<Decimal>,

    #[arg(long)]
    max_price: Option<Decimal>,

    /// Text filter on name or description
    #[arg(short, long)]
    search: Option<String>,

    #[arg(long, value_enum)]
    sort_by: Option<SortArg>,

    /// Sort ascending (default is descending)
    #[arg(long)]
    asc: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    CreatedAt,
    Price,
    Name,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::CreatedAt => Self::CreatedAt,
            SortArg::Price => Self::Price,
            SortArg::Name => Self::Name,
        }
    }
}

impl ListArgs {
    fn into_query(self) -> ProductQuery {
        let sort_by = self.sort_by.map(SortField::from);
        let sort_order = match (sort_by, self.asc) {
            (_, true) => Some(SortOrder::Asc),
            (Some(_), false) => Some(SortOrder::Desc),
            (None, false) => None,
        };
        ProductQuery {
            category: self.category,
            min_price: self.min_price,
            max_price: self.max_price,
            search: self.search,
            sort_by,
            sort_order,
        }
    }
}

#[derive(Subcommand)]
enum CategoryAction {
    /// List categories
    List,
    /// Show a category with its subcategories and products
    Show { slug: String },
    /// List the products of a category
    Products { slug: String },
}

#[derive(Subcommand)]
enum SubCategoryAction {
    /// List subcategories
    List {
        /// Only those under this category slug
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show a subcategory and its products
    Show { slug: String },
}

#[derive(Subcommand)]
enum CartCommand {
    /// Add a product by slug
    Add {
        slug: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product line
    Remove { id: ProductId },
    /// Set the quantity of a product line (minimum 1)
    Update { id: ProductId, quantity: u32 },
    /// Empty the cart
    Clear,
    /// Show the cart
    Show {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Create an account (password and confirmation read from stdin)
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        first_name: String,
        #[arg(short, long)]
        last_name: String,
        /// Accept the terms and conditions
        #[arg(long)]
        agree_terms: bool,
    },
    /// Obtain tokens (password read from stdin)
    Login {
        #[arg(short, long)]
        email: String,
    },
    /// Refresh an access token (refresh token read from stdin)
    Refresh,
}

#[derive(Args)]
struct CheckoutArgs {
    #[arg(short, long)]
    first_name: String,
    #[arg(short, long)]
    last_name: String,
    #[arg(short, long)]
    email: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    postal_code: String,
    #[arg(long)]
    country: String,
    /// `credit_card`, `paypal` or `bank_transfer`
    #[arg(long, default_value = "credit_card")]
    payment: PaymentMethod,
    #[arg(long)]
    json: bool,
}

impl From<CheckoutArgs> for CheckoutForm {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            address: args.address,
            city: args.city,
            postal_code: args.postal_code,
            country: args.country,
            payment_method: args.payment,
        }
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry error tracking initialized");
    Some(guard)
}

/// Map tracing levels to Sentry: errors and warnings become events, the rest
/// become breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    let sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "jaelle_storefront=info,jaelle_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        // Flush pending Sentry events before exiting
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), CommandError> {
    let ctx = Context::new(config)?;

    match cli.command {
        Commands::Products { action } => match action {
            ProductAction::List(args) => {
                commands::catalog::list_products(&ctx, &args.into_query()).await?;
            }
            ProductAction::Show { slug } => commands::catalog::show_product(&ctx, &slug).await?,
            ProductAction::Featured { random } => {
                commands::catalog::featured(&ctx, random).await?;
            }
        },
        Commands::Categories { action } => match action {
            CategoryAction::List => commands::catalog::list_categories(&ctx).await?,
            CategoryAction::Show { slug } => commands::catalog::show_category(&ctx, &slug).await?,
            CategoryAction::Products { slug } => {
                commands::catalog::category_products(&ctx, &slug).await?;
            }
        },
        Commands::Subcategories { action } => match action {
            SubCategoryAction::List { category } => {
                commands::catalog::list_subcategories(&ctx, category.as_deref()).await?;
            }
            SubCategoryAction::Show { slug } => {
                commands::catalog::show_subcategory(&ctx, &slug).await?;
            }
        },
        Commands::Search { query, interactive } => {
            if interactive {
                commands::search::interactive(&ctx).await?;
            } else {
                commands::search::once(&ctx, query.as_deref().unwrap_or_default()).await?;
            }
        }
        Commands::Cart { action } => match action {
            CartCommand::Add { slug, quantity } => {
                commands::cart::add(&ctx, &slug, quantity).await?;
            }
            CartCommand::Remove { id } => commands::cart::remove(&ctx, id)?,
            CartCommand::Update { id, quantity } => commands::cart::update(&ctx, id, quantity)?,
            CartCommand::Clear => commands::cart::clear(&ctx)?,
            CartCommand::Show { json } => commands::cart::show(&ctx, json)?,
        },
        Commands::Account { action } => match action {
            AccountAction::Register {
                email,
                first_name,
                last_name,
                agree_terms,
            } => {
                commands::account::register(&ctx, email, first_name, last_name, agree_terms)
                    .await?;
            }
            AccountAction::Login { email } => commands::account::login(&ctx, email).await?,
            AccountAction::Refresh => commands::account::refresh(&ctx).await?,
        },
        Commands::Checkout(args) => {
            let json = args.json;
            commands::checkout::run(&ctx, &CheckoutForm::from(args), json)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_args_sort_order() {
        let cli = Cli::parse_from(["jaelle", "products", "list", "--sort-by", "price"]);
        let Commands::Products {
            action: ProductAction::List(args),
        } = cli.command
        else {
            panic!("expected products list");
        };
        let query = args.into_query();
        assert_eq!(query.sort_by, Some(SortField::Price));
        assert_eq!(query.sort_order, Some(SortOrder::Desc));
    }

    #[test]
    fn test_plain_list_has_no_filters() {
        let cli = Cli::parse_from(["jaelle", "products", "list"]);
        let Commands::Products {
            action: ProductAction::List(args),
        } = cli.command
        else {
            panic!("expected products list");
        };
        assert_eq!(args.into_query(), ProductQuery::default());
    }

    #[test]
    fn test_checkout_payment_parses() {
        let cli = Cli::parse_from([
            "jaelle",
            "checkout",
            "-f",
            "Ana",
            "-l",
            "Lopez",
            "-e",
            "ana@example.com",
            "--address",
            "1 rue",
            "--city",
            "Lyon",
            "--postal-code",
            "69001",
            "--country",
            "France",
            "--payment",
            "bank_transfer",
        ]);
        let Commands::Checkout(args) = cli.command else {
            panic!("expected checkout");
        };
        assert_eq!(CheckoutForm::from(args).payment_method, PaymentMethod::BankTransfer);
    }
}
