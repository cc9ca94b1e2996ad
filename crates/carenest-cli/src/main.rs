use anyhow::Result;
use carenest_core::booking::{BookingMode, Vertical};
use carenest_core::catalogue::{CatalogueKind, SortOrder};
use carenest_core::conversation::MessageRole;
use carenest_core::provider_link::ServiceType;
use carenest_infrastructure::{CareNestPaths, ConfigService};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;

use commands::AppContext;

#[derive(Parser)]
#[command(name = "carenest")]
#[command(about = "CareNest CLI - book doctors, lab tests, nursing, elderly care and medicines", long_about = None)]
struct Cli {
    /// Storage directory (defaults to $CARENEST_HOME or the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Act as this signed-in user. Without it, bookings are not saved.
    #[arg(long, global = true, env = "CARENEST_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config.toml if none exists
    Init,
    /// Browse the catalogue of a vertical
    Catalogue(CatalogueArgs),
    /// List the bookable time slots
    Slots,
    /// Price a booking without confirming it
    Quote(DraftArgs),
    /// Confirm a booking and save it to history
    Book(BookArgs),
    /// Show the booking history of the current user
    Bookings {
        #[arg(long)]
        json: bool,
    },
    /// Manage linked providers
    Providers {
        #[command(subcommand)]
        action: ProviderAction,
    },
    /// Manage chat conversations
    Chat {
        #[command(subcommand)]
        action: ChatAction,
    },
    /// Trigger an emergency ambulance dispatch
    Sos {
        #[arg(long)]
        location: String,
    },
}

#[derive(Args)]
pub struct CatalogueArgs {
    pub vertical: Vertical,
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub specialization: Option<String>,
    #[arg(long)]
    pub kind: Option<CatalogueKind>,
    /// Hide unavailable entries
    #[arg(long)]
    pub available: bool,
    #[arg(long, default_value = "catalogue")]
    pub sort: SortOrder,
}

#[derive(Args)]
pub struct DraftArgs {
    pub vertical: Vertical,
    /// Catalogue id of the doctor, nurse, pharmacy, caregiver or package
    #[arg(long)]
    pub entity: Option<String>,
    /// Catalogue id of a service, test or medicine, optionally `id:quantity`
    #[arg(long = "item")]
    pub items: Vec<String>,
    #[arg(long)]
    pub mode: Option<BookingMode>,
    /// Hours or days for duration-based modes
    #[arg(long)]
    pub duration: Option<u32>,
    #[arg(long)]
    pub coupon: Option<String>,
}

#[derive(Args)]
pub struct BookArgs {
    #[command(flatten)]
    pub draft: DraftArgs,
    /// YYYY-MM-DD
    #[arg(long)]
    pub date: chrono::NaiveDate,
    /// Slot label, e.g. "10:00 AM"
    #[arg(long)]
    pub slot: String,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub patient: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand)]
pub enum ProviderAction {
    Link {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long = "type")]
        service_type: ServiceType,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        specialization: Option<String>,
        #[arg(long)]
        rating: Option<f32>,
    },
    Unlink {
        id: String,
    },
    List {
        #[arg(long = "type")]
        service_type: Option<ServiceType>,
    },
}

#[derive(Subcommand)]
pub enum ChatAction {
    /// Start a conversation with its first message
    New { message: String },
    /// Append a message to a conversation
    Send {
        conversation: String,
        message: String,
        #[arg(long, default_value = "user")]
        role: MessageRole,
    },
    List,
    Show { conversation: String },
    Delete { conversation: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = CareNestPaths::resolve(cli.data_dir.as_deref())?;
    let config_service = ConfigService::new(paths.config_file());
    let config = config_service.get_config()?;
    logging::init(&config.logging.level);

    let paths = match (&cli.data_dir, &config.storage.data_dir) {
        (None, Some(dir)) => CareNestPaths::new(dir),
        _ => paths,
    };

    let mut ctx = AppContext::new(paths, config, cli.user).await?;

    let result = match cli.command {
        Commands::Init => commands::config::init(&config_service),
        Commands::Catalogue(args) => commands::catalogue::list(&ctx, &args),
        Commands::Slots => commands::booking::slots(),
        Commands::Quote(args) => commands::booking::quote(&ctx, &args),
        Commands::Book(args) => commands::booking::book(&ctx, &args).await,
        Commands::Bookings { json } => commands::booking::history(&ctx, json).await,
        Commands::Providers { action } => commands::providers::run(&ctx, action).await,
        Commands::Chat { action } => commands::chat::run(&ctx, action).await,
        Commands::Sos { location } => commands::sos::run(&ctx, &location).await,
    };

    ctx.flush_notices();
    result
}
