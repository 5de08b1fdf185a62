//! Generix CLI - command-line front end for the storefront client.
//!
//! # Usage
//!
//! ```bash
//! # Sign in and keep the printed token for later runs
//! gx login -e juan@example.ph -p secret
//! export GENERIX_API_TOKEN=...
//!
//! # Browse and fill the cart
//! gx products --search para --sort price
//! gx cart add 6650f0c2 -q 2
//! gx cart inc 6650f0c2
//! gx checkout
//!
//! # Administration
//! gx admin add -n Paracetamol -d "500mg tablet" --price 5
//! gx admin toggle 6650f0c2
//! ```
//!
//! # Environment Variables
//!
//! See [`generix_storefront::config`]. `RUST_LOG` overrides the default
//! log filter.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use generix_core::{ProductId, Quantity, SortKey, UserId};
use generix_storefront::{AppState, StorefrontConfig};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "gx")]
#[command(author, version, about = "Generix Drugstore storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for everything in the cart
    Checkout,
    /// List products
    Products {
        /// Include archived products
        #[arg(long)]
        all: bool,

        /// Case-insensitive text matched against name and description
        #[arg(short, long)]
        search: Option<String>,

        /// Minimum price (inclusive)
        #[arg(long)]
        min: Option<Decimal>,

        /// Maximum price (inclusive)
        #[arg(long)]
        max: Option<Decimal>,

        /// Sort order (`name`, `price`, `price-desc`, `newest`)
        #[arg(long)]
        sort: Option<SortKey>,
    },
    /// Show one product
    Product { id: String },
    /// Show your order history
    Orders,
    /// Sign in and print the access token
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Show the signed-in user
    Whoami,
    /// Create an account
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        mobile_no: String,

        #[arg(short, long)]
        password: String,

        #[arg(long)]
        confirm_password: String,
    },
    /// Store administration
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product to the cart
    Add {
        product_id: String,

        #[arg(short, long, default_value = "1", value_parser = parse_quantity)]
        quantity: Quantity,
    },
    /// Increase a line's quantity by one
    Inc { product_id: String },
    /// Decrease a line's quantity by one (never below 1)
    Dec { product_id: String },
    /// Remove a line
    Remove { product_id: String },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum AdminAction {
    /// List every product, archived included
    Products,
    /// Create a product
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        description: String,

        #[arg(long)]
        price: Decimal,
    },
    /// Replace a product's name, description, and price
    Update {
        id: String,

        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        description: String,

        #[arg(long)]
        price: Decimal,
    },
    /// Archive an active product or activate an archived one
    Toggle { id: String },
    /// List every order in the store
    Orders,
    /// Grant administrator rights to a user
    Promote { user_id: String },
}

fn parse_quantity(s: &str) -> Result<Quantity, String> {
    let value: i64 = s.parse().map_err(|e| format!("{e}"))?;
    Quantity::try_from(value).map_err(|e| e.to_string())
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

    tracing::debug!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "generix_storefront=info,generix_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = StorefrontConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let result = match config {
        Ok(config) => match AppState::new(config) {
            Ok(state) => run(cli, &state).await,
            Err(e) => Err(e.into()),
        },
        Err(e) => Err(CommandError::Config(e)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            sentry::capture_error(&e);
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, state: &AppState) -> Result<(), CommandError> {
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(state).await?,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(state, &ProductId::new(product_id), quantity).await?,
            CartAction::Inc { product_id } => {
                commands::cart::change(state, &ProductId::new(product_id), 1).await?;
            }
            CartAction::Dec { product_id } => {
                commands::cart::change(state, &ProductId::new(product_id), -1).await?;
            }
            CartAction::Remove { product_id } => {
                commands::cart::remove(state, &ProductId::new(product_id)).await?;
            }
            CartAction::Clear => commands::cart::clear(state).await?,
        },
        Commands::Checkout => commands::cart::checkout(state).await?,
        Commands::Products {
            all,
            search,
            min,
            max,
            sort,
        } => {
            let query = generix_core::ProductQuery {
                search,
                min_price: min,
                max_price: max,
                active_only: false,
                sort,
            };
            commands::catalog::list(state, all, &query).await?;
        }
        Commands::Product { id } => commands::catalog::show(state, &ProductId::new(id)).await?,
        Commands::Orders => commands::orders::history(state).await?,
        Commands::Login { email, password } => {
            commands::account::login(state, &email, &password).await?;
        }
        Commands::Whoami => commands::account::whoami(state).await?,
        Commands::Register {
            first_name,
            last_name,
            email,
            mobile_no,
            password,
            confirm_password,
        } => {
            let form = generix_core::Registration {
                first_name,
                last_name,
                email,
                mobile_no,
                password,
                confirm_password,
            };
            commands::account::register(state, &form).await?;
        }
        Commands::Admin { action } => match action {
            AdminAction::Products => commands::admin::products(state).await?,
            AdminAction::Add {
                name,
                description,
                price,
            } => {
                let draft = generix_core::ProductDraft {
                    name,
                    description,
                    price,
                };
                commands::admin::add(state, &draft).await?;
            }
            AdminAction::Update {
                id,
                name,
                description,
                price,
            } => {
                let draft = generix_core::ProductDraft {
                    name,
                    description,
                    price,
                };
                commands::admin::update(state, &ProductId::new(id), &draft).await?;
            }
            AdminAction::Toggle { id } => {
                commands::admin::toggle(state, &ProductId::new(id)).await?;
            }
            AdminAction::Orders => commands::admin::orders(state).await?,
            AdminAction::Promote { user_id } => {
                commands::admin::promote(state, &UserId::new(user_id)).await?;
            }
        },
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
    fn test_parse_quantity_rejects_zero() {
        assert!(parse_quantity("0").is_err());
        assert!(parse_quantity("-3").is_err());
        assert_eq!(parse_quantity("4").map(Quantity::get), Ok(4));
    }
}
