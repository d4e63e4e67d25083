use auth::{CredentialVerifier, Credentials};
use clap::{Parser, Subcommand};
use configuration::LoggingSettings;
use database::DbRepository;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod render;

/// bcrypt work factor used when preparing user rows.
const DEFAULT_HASH_COST: u32 = 10;

/// The main entry point for the invoicer command-line tool.
///
/// Owns the connection pool: it is created once here, shared by every
/// command through `DbRepository`, and closed before the process exits.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    let command = match cli.command {
        // Hashing is purely local and needs neither configuration nor a database.
        Commands::HashPassword(args) => {
            println!("{}", auth::hash_password(&args.password, args.cost)?);
            return Ok(());
        }
        Commands::Query(command) => command,
    };

    let config = configuration::load_config_from(&cli.config)?;
    let _log_guard = init_tracing(&config.logging)?;

    // Initialize the database connection and, if asked, the schema
    let db_pool = database::connect(&config.database).await?;
    if config.database.run_migrations {
        database::run_migrations(&db_pool).await?;
        tracing::info!("Database migrations applied.");
    }

    let db_repo = DbRepository::new(db_pool.clone());
    let result = run_command(command, &db_repo, cli.json).await;

    db_pool.close().await;
    tracing::debug!("Database connection pool closed.");
    result
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Query the invoicing dashboard's database from the terminal.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file (optional; env vars also work).
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Print records as JSON instead of a table.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Query(QueryCommand),
    /// Print a bcrypt hash for seeding the users table.
    HashPassword(HashPasswordArgs),
}

/// Commands that read from the database.
#[derive(Subcommand, Debug)]
enum QueryCommand {
    /// Show the monthly revenue series.
    Revenue,
    /// Show the five most recent invoices.
    LatestInvoices,
    /// Show the dashboard card totals.
    Cards,
    /// Search invoices, one page at a time.
    Invoices(InvoicesArgs),
    /// Show a single invoice as its edit form.
    Invoice(InvoiceArgs),
    /// List every customer's id and name.
    Customers,
    /// Search customers with their invoice totals.
    FilteredCustomers(SearchArgs),
    /// Check an email and password against the users table.
    Authorize(AuthorizeArgs),
}

#[derive(Parser, Debug)]
struct InvoicesArgs {
    /// Case-insensitive text to match against name, email, amount, date or status.
    #[arg(long, short, default_value = "")]
    query: String,

    /// The 1-based page to show.
    #[arg(long, short, default_value_t = 1, value_parser = clap::value_parser!(i64).range(1..))]
    page: i64,
}

#[derive(Parser, Debug)]
struct InvoiceArgs {
    /// The invoice id (UUID).
    id: String,
}

#[derive(Parser, Debug)]
struct SearchArgs {
    /// Case-insensitive text to match against customer name or email.
    #[arg(long, short, default_value = "")]
    query: String,
}

#[derive(Parser, Debug)]
struct AuthorizeArgs {
    #[arg(long)]
    email: String,

    #[arg(long)]
    password: String,
}

#[derive(Parser, Debug)]
struct HashPasswordArgs {
    /// The plaintext password to hash.
    password: String,

    /// bcrypt cost factor.
    #[arg(long, default_value_t = DEFAULT_HASH_COST)]
    cost: u32,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Runs one read against the repository and prints the result.
async fn run_command(command: QueryCommand, db_repo: &DbRepository, json: bool) -> anyhow::Result<()> {
    match command {
        QueryCommand::Revenue => {
            let revenue = db_repo.fetch_revenue().await?;
            render::print(revenue.as_slice(), json, render::revenue_table)?;
        }
        QueryCommand::LatestInvoices => {
            let invoices = db_repo.fetch_latest_invoices().await?;
            render::print(invoices.as_slice(), json, render::latest_invoices_table)?;
        }
        QueryCommand::Cards => {
            let cards = db_repo.fetch_card_data().await?;
            render::print(&cards, json, render::card_data_table)?;
        }
        QueryCommand::Invoices(args) => {
            // Both reads are independent; fetch them together like the page does.
            let (invoices, total_pages) = tokio::try_join!(
                db_repo.fetch_filtered_invoices(&args.query, args.page),
                db_repo.fetch_invoices_pages(&args.query)
            )?;
            if json {
                render::print_json(&serde_json::json!({
                    "page": args.page,
                    "total_pages": total_pages,
                    "invoices": invoices,
                }))?;
            } else {
                println!("{}", render::invoices_table(&invoices));
                println!("Page {} of {}", args.page, total_pages);
            }
        }
        QueryCommand::Invoice(args) => match db_repo.fetch_invoice_by_id(&args.id).await? {
            Some(invoice) => render::print(&invoice, json, render::invoice_form_table)?,
            None => println!("Invoice {} not found.", args.id),
        },
        QueryCommand::Customers => {
            let customers = db_repo.fetch_customers().await?;
            render::print(customers.as_slice(), json, render::customers_table)?;
        }
        QueryCommand::FilteredCustomers(args) => {
            let customers = db_repo.fetch_filtered_customers(&args.query).await?;
            render::print(customers.as_slice(), json, render::filtered_customers_table)?;
        }
        QueryCommand::Authorize(args) => {
            let verifier = CredentialVerifier::new(db_repo.clone());
            let credentials = Credentials::new(args.email, args.password);
            match verifier.authorize_credentials(&credentials).await? {
                Some(user) => render::print(&user, json, render::user_table)?,
                None => println!("Invalid credentials."),
            }
        }
    }
    Ok(())
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. Logs go to stderr so table and
/// JSON output on stdout stay clean; with `logging.directory` set they are
/// also written to a daily rolling file, flushed when the guard drops.
fn init_tracing(settings: &LoggingSettings) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))?;
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr));

    match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "invoicer.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()?;
            Ok(Some(guard))
        }
        None => {
            registry.try_init()?;
            Ok(None)
        }
    }
}
