//! `stockroom`: command-line front end to the warehouse catalog store.
//!
//! Log in once with a shared key; the session is kept in a local file until
//! `logout`. Everything else reads from or writes to the remote store.

mod render;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use stockroom_client::auth::login;
use stockroom_client::catalog::{create_product, find_by_barcode};
use stockroom_client::config::DEFAULT_BASE_URL;
use stockroom_client::mutator::adjust_quantity;
use stockroom_client::session::SessionStore;
use stockroom_client::{CatalogStore, ClientConfig, HttpCatalogStore};
use stockroom_common::identity::Session;
use stockroom_common::product::{Product, ProductDraft, StockId};
use stockroom_common::query::{CatalogQuery, SortKey, StockFilter};
use stockroom_common::report::render_product_report;
use stockroom_common::stats::CatalogStats;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stockroom", about = "Warehouse inventory catalog client")]
struct Cli {
    /// Base URL of the catalog store.
    #[arg(long, global = true, env = "STOCKROOM_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Per-request timeout in milliseconds.
    #[arg(long, global = true, env = "STOCKROOM_TIMEOUT_MS", default_value_t = 1000)]
    timeout_ms: u64,

    /// Session file (default: <config dir>/stockroom/session.json).
    #[arg(long, global = true, env = "STOCKROOM_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in with a warehouse staff key.
    Login { key: String },
    /// Forget the saved session.
    Logout,
    #[command(flatten)]
    Catalog(CatalogCommand),
}

/// Commands that need a logged-in user.
#[derive(Subcommand)]
enum CatalogCommand {
    /// Show who is logged in.
    Whoami,
    /// List products, filtered and sorted.
    List {
        /// Case-insensitive match on name or type.
        #[arg(long, default_value = "")]
        search: String,
        /// all | low-stock | out-of-stock
        #[arg(long, default_value = "all")]
        filter: StockFilter,
        /// name | price-asc | price-desc | stock-desc
        #[arg(long, default_value = "name")]
        sort: SortKey,
    },
    /// Show one product by barcode.
    Show { barcode: String },
    /// Look a barcode up; suggests `create` when it is unknown.
    Scan { barcode: String },
    /// Create a product with one stock location.
    Create(CreateArgs),
    /// Set the quantity held at one stock location.
    Adjust {
        barcode: String,
        stock_id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Catalog-wide statistics.
    Stats,
    /// Write the HTML inventory report for a product.
    Report {
        barcode: String,
        /// Output file (default: stdout).
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args)]
struct CreateArgs {
    #[arg(long)]
    barcode: String,
    #[arg(long)]
    name: String,
    #[arg(long = "type")]
    kind: String,
    #[arg(long)]
    price: f64,
    #[arg(long)]
    sale_price: Option<f64>,
    #[arg(long, default_value = "")]
    supplier: String,
    #[arg(long)]
    image: Option<String>,
    /// Name of the stock location.
    #[arg(long)]
    location: String,
    #[arg(long)]
    quantity: u32,
    #[arg(long, default_value = "")]
    city: String,
    #[arg(long, allow_negative_numbers = true)]
    latitude: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    longitude: Option<f64>,
}

impl From<CreateArgs> for ProductDraft {
    fn from(args: CreateArgs) -> Self {
        ProductDraft {
            barcode: args.barcode,
            name: args.name,
            kind: args.kind,
            supplier: args.supplier,
            price: args.price,
            sale_price: args.sale_price,
            image: args.image,
            location: args.location,
            quantity: args.quantity,
            city: args.city,
            latitude: args.latitude,
            longitude: args.longitude,
        }
    }
}

fn require_session(sessions: &SessionStore) -> anyhow::Result<Session> {
    match sessions.load()? {
        Some(session) => Ok(session),
        None => bail!("not logged in; run `stockroom login <KEY>` first"),
    }
}

async fn product_by_barcode(store: &HttpCatalogStore, barcode: &str) -> anyhow::Result<Product> {
    find_by_barcode(store, barcode)
        .await
        .context("failed to look up barcode")?
        .with_context(|| format!("no product with barcode {barcode}"))
}

async fn run(command: Command, store: &HttpCatalogStore, sessions: &SessionStore) -> anyhow::Result<()> {
    match command {
        Command::Login { key } => {
            let session = login(store, &key).await.context("login failed")?;
            sessions.save(&session)?;
            println!("Logged in as {}", render::session(&session));
        }
        Command::Logout => {
            if sessions.clear()? {
                println!("Logged out");
            } else {
                println!("Not logged in");
            }
        }
        Command::Catalog(command) => {
            let session = require_session(sessions)?;
            run_as(command, &session, store).await?;
        }
    }
    Ok(())
}

async fn run_as(
    command: CatalogCommand,
    session: &Session,
    store: &HttpCatalogStore,
) -> anyhow::Result<()> {
    match command {
        CatalogCommand::Whoami => println!("{}", render::session(session)),
        CatalogCommand::List {
            search,
            filter,
            sort,
        } => {
            let products = store.list_products().await.context("failed to load products")?;
            let views = CatalogQuery::new(search, filter, sort).run(&products);
            print!("{}", render::product_list(&views));
        }
        CatalogCommand::Show { barcode } => {
            let product = product_by_barcode(store, &barcode).await?;
            print!("{}", render::product_detail(&product));
        }
        CatalogCommand::Scan { barcode } => {
            match find_by_barcode(store, &barcode)
                .await
                .context("failed to look up barcode")?
            {
                Some(product) => print!("{}", render::product_detail(&product)),
                None => println!(
                    "No product with barcode {barcode}.\n\
                     Create it with: stockroom create --barcode {barcode} --name <NAME> --type <TYPE> \
                     --price <PRICE> --location <LOCATION> --quantity <N>"
                ),
            }
        }
        CatalogCommand::Create(args) => {
            let created = create_product(store, session, args.into())
                .await
                .context("failed to create product")?;
            println!("Created product {}", created.id);
            print!("{}", render::product_detail(&created));
        }
        CatalogCommand::Adjust {
            barcode,
            stock_id,
            quantity,
        } => {
            let mut view = product_by_barcode(store, &barcode).await?;
            let outcome = adjust_quantity(store, &mut view, &StockId(stock_id), quantity)
                .await
                .context("failed to update stock quantity")?;
            println!(
                "{} [{}]: {} -> {}",
                view.name, outcome.stock, outcome.previous, outcome.confirmed
            );
            if outcome.stale_view {
                println!("note: the stored quantity had changed since it was read and was overwritten");
            }
            println!(
                "total {} unit(s), {}",
                view.total_stock(),
                view.stock_level().label()
            );
        }
        CatalogCommand::Stats => {
            let products = store.list_products().await.context("failed to load products")?;
            print!("{}", render::stats(&CatalogStats::from_products(&products)));
        }
        CatalogCommand::Report { barcode, out } => {
            let product = product_by_barcode(store, &barcode).await?;
            let html = render_product_report(&product, Utc::now());
            match out {
                Some(path) => {
                    std::fs::write(&path, html)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Report written to {}", path.display());
                }
                None => print!("{html}"),
            }
        }
    }
    Ok(())
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::new(cli.api_url).with_timeout(Duration::from_millis(cli.timeout_ms));
    let store = HttpCatalogStore::new(&config)?;
    let sessions = cli
        .session_file
        .map(SessionStore::new)
        .unwrap_or_else(SessionStore::at_default_location);

    run(cli.command, &store, &sessions).await
}
