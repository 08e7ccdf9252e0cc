use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use pgnest_cli::{
    CliError, CliResult,
    api_client::ApiClient,
    config::{Credentials, mask_secret},
};
use pgnest_core::models::{
    AuditAction, AuditQuery, BookingStatus, Gender, NewBooking, NewPromotionRequest,
    PromotionFilter, PromotionReview, PromotionStatus, PropertyQuery, PropertyType,
    ReviewDecision, Role, SortOrder, UserFilter,
};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Command-line client for the PGNest API
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API server URL
    #[arg(long, short = 'u', env = "PGNEST_API_URL", global = true)]
    api_url: Option<String>,

    /// API key (identity-provider token)
    #[arg(long, short = 'k', env = "PGNEST_API_KEY", global = true)]
    api_key: Option<String>,

    /// Directory holding credentials.json
    #[arg(long, short = 'd', global = true)]
    credentials_dir: Option<PathBuf>,

    /// Log requests
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or save API credentials
    Login(LoginArgs),

    /// Show the signed-in account
    Me,

    /// Browse listings
    Properties {
        #[command(subcommand)]
        command: PropertyCommands,
    },

    /// Ask the search assistant
    Chat {
        /// Free-text request, e.g. "girls pg in koramangala under 8k"
        message: String,
    },

    /// Manage bookings
    Bookings {
        #[command(subcommand)]
        command: BookingCommands,
    },

    /// Ask to become a property owner
    Promotion(PromotionArgs),

    /// Admin back-office
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Args)]
struct LoginArgs {
    /// Test the connection with the resulting credentials
    #[arg(short, long)]
    test: bool,

    /// Write the credentials to credentials.json
    #[arg(short, long)]
    save: bool,
}

#[derive(Subcommand)]
enum PropertyCommands {
    /// Search approved listings
    Search(SearchArgs),

    /// Show one listing
    Get { id: String },
}

#[derive(Args)]
struct SearchArgs {
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    area: Option<String>,
    #[arg(long)]
    min_rent: Option<u32>,
    #[arg(long)]
    max_rent: Option<u32>,
    /// boys, girls or co_living
    #[arg(long)]
    gender: Option<Gender>,
    /// pg, hostel or flat
    #[arg(long = "type")]
    property_type: Option<PropertyType>,
    /// Comma-separated, e.g. wifi,meals
    #[arg(long)]
    amenities: Option<String>,
    /// Free text
    #[arg(short, long)]
    q: Option<String>,
    /// newest, rent_asc or rent_desc
    #[arg(long, value_parser = parse_sort)]
    sort: Option<SortOrder>,
    #[arg(long)]
    page: Option<usize>,
    #[arg(long)]
    per_page: Option<usize>,
}

impl From<&SearchArgs> for PropertyQuery {
    fn from(args: &SearchArgs) -> Self {
        PropertyQuery {
            city: args.city.clone(),
            area: args.area.clone(),
            min_rent: args.min_rent,
            max_rent: args.max_rent,
            gender: args.gender,
            property_type: args.property_type,
            amenities: args.amenities.clone(),
            q: args.q.clone(),
            sort: args.sort,
            page: args.page,
            per_page: args.per_page,
        }
    }
}

fn parse_sort(value: &str) -> Result<SortOrder, String> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| format!("unknown sort order '{}'", value))
}

#[derive(Subcommand)]
enum BookingCommands {
    /// Bookings you made or received
    List,

    /// Request a booking
    Create {
        property_id: String,
        /// Move-in date, YYYY-MM-DD
        #[arg(long)]
        move_in: NaiveDate,
        /// Stay length in months
        #[arg(long, default_value_t = 1)]
        months: u8,
        #[arg(long)]
        message: Option<String>,
    },

    /// Move a booking to a new status
    Status {
        id: String,
        /// confirmed, rejected, cancelled or completed
        status: BookingStatus,
    },
}

#[derive(Args)]
struct PromotionArgs {
    #[arg(long)]
    business_name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    message: Option<String>,
}

#[derive(Subcommand)]
enum AdminCommands {
    /// List users
    Users {
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        blacklisted: Option<bool>,
        #[arg(short, long)]
        q: Option<String>,
    },

    /// Blacklist a user
    Blacklist {
        id: String,
        #[arg(long)]
        reason: String,
    },

    /// Lift a blacklist
    Unblacklist { id: String },

    /// Approve or reject a pending listing
    ReviewProperty {
        id: String,
        #[arg(long, conflicts_with = "reject")]
        approve: bool,
        #[arg(long, requires = "reason")]
        reject: bool,
        #[arg(long)]
        reason: Option<String>,
    },

    /// Owner promotion requests
    Promotions {
        #[arg(long)]
        status: Option<PromotionStatus>,
    },

    /// Approve or reject a promotion request
    ReviewPromotion {
        id: String,
        #[arg(long, conflicts_with = "reject")]
        approve: bool,
        #[arg(long)]
        reject: bool,
        #[arg(long)]
        note: Option<String>,
    },

    /// Audit trail, newest first
    Audit {
        #[arg(long)]
        action: Option<AuditAction>,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Dashboard counters
    Stats,
}

fn output_json<T: serde::Serialize>(data: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Exactly one of `--approve` / `--reject` must be given.
fn approve_flag(approve: bool, reject: bool) -> CliResult<bool> {
    match (approve, reject) {
        (true, false) => Ok(true),
        (false, true) => Ok(false),
        _ => Err(CliError::Input(
            "pass either --approve or --reject".to_string(),
        )),
    }
}

fn credentials(cli: &Cli) -> Credentials {
    Credentials::initialize(
        cli.credentials_dir.clone(),
        cli.api_url.clone(),
        cli.api_key.clone(),
    )
}

/// Client for endpoints that need a signed-in user.
fn authed_client(cli: &Cli) -> CliResult<ApiClient> {
    let credentials = credentials(cli);
    if !credentials.has_api_key() {
        return Err(CliError::MissingApiKey);
    }
    Ok(ApiClient::new(&credentials.api_url, &credentials.api_key))
}

fn public_client(cli: &Cli) -> ApiClient {
    let credentials = credentials(cli);
    ApiClient::new(&credentials.api_url, &credentials.api_key)
}

async fn handle_login(args: &LoginArgs, cli: &Cli) -> CliResult<()> {
    let credentials = credentials(cli);

    println!("API URL: {}", credentials.api_url);
    if credentials.has_api_key() {
        println!("API Key: {}", mask_secret(&credentials.api_key));
    } else {
        println!("API Key: Not set");
    }

    if args.save {
        let path = credentials.save()?;
        println!("Saved credentials to {}", path.display());
    }

    if args.test {
        let client = ApiClient::new(&credentials.api_url, &credentials.api_key);
        client.health_check().await?;
        println!("Server is reachable");
        let me = client.me().await?;
        println!("Signed in as {} ({})", me.email, me.role);
    }
    Ok(())
}

async fn handle_property_commands(command: &PropertyCommands, cli: &Cli) -> CliResult<()> {
    let client = public_client(cli);
    match command {
        PropertyCommands::Search(args) => {
            output_json(&client.search_properties(&args.into()).await?)
        }
        PropertyCommands::Get { id } => output_json(&client.get_property(id).await?),
    }
}

async fn handle_booking_commands(command: &BookingCommands, cli: &Cli) -> CliResult<()> {
    let client = authed_client(cli)?;
    match command {
        BookingCommands::List => output_json(&client.my_bookings().await?),
        BookingCommands::Create {
            property_id,
            move_in,
            months,
            message,
        } => {
            let booking = NewBooking {
                property_id: property_id.clone(),
                move_in: *move_in,
                duration_months: *months,
                message: message.clone(),
            };
            output_json(&client.create_booking(&booking).await?)
        }
        BookingCommands::Status { id, status } => {
            output_json(&client.update_booking_status(id, *status).await?)
        }
    }
}

async fn handle_admin_commands(command: &AdminCommands, cli: &Cli) -> CliResult<()> {
    let client = authed_client(cli)?;
    match command {
        AdminCommands::Users {
            role,
            blacklisted,
            q,
        } => {
            let filter = UserFilter {
                role: *role,
                blacklisted: *blacklisted,
                q: q.clone(),
            };
            output_json(&client.list_users(&filter).await?)
        }
        AdminCommands::Blacklist { id, reason } => {
            output_json(&client.blacklist_user(id, reason).await?)
        }
        AdminCommands::Unblacklist { id } => output_json(&client.unblacklist_user(id).await?),
        AdminCommands::ReviewProperty {
            id,
            approve,
            reject,
            reason,
        } => {
            let decision = if approve_flag(*approve, *reject)? {
                ReviewDecision::Approve
            } else {
                ReviewDecision::Reject {
                    reason: reason.clone().unwrap_or_default(),
                }
            };
            output_json(&client.review_property(id, &decision).await?)
        }
        AdminCommands::Promotions { status } => {
            let filter = PromotionFilter { status: *status };
            output_json(&client.promotion_requests(&filter).await?)
        }
        AdminCommands::ReviewPromotion {
            id,
            approve,
            reject,
            note,
        } => {
            let review = PromotionReview {
                approve: approve_flag(*approve, *reject)?,
                note: note.clone(),
            };
            output_json(&client.review_promotion(id, &review).await?)
        }
        AdminCommands::Audit { action, limit } => {
            let query = AuditQuery {
                action: *action,
                limit: *limit,
                ..Default::default()
            };
            output_json(&client.audit_logs(&query).await?)
        }
        AdminCommands::Stats => output_json(&client.stats().await?),
    }
}

async fn run(cli: &Cli) -> CliResult<()> {
    debug!("Using API at {:?}", cli.api_url);
    match &cli.command {
        Commands::Login(args) => handle_login(args, cli).await,
        Commands::Me => output_json(&authed_client(cli)?.me().await?),
        Commands::Properties { command } => handle_property_commands(command, cli).await,
        Commands::Chat { message } => output_json(&public_client(cli).chat(message).await?),
        Commands::Bookings { command } => handle_booking_commands(command, cli).await,
        Commands::Promotion(args) => {
            let request = NewPromotionRequest {
                business_name: args.business_name.clone(),
                phone: args.phone.clone(),
                message: args.message.clone(),
            };
            output_json(&authed_client(cli)?.request_promotion(&request).await?)
        }
        Commands::Admin { command } => handle_admin_commands(command, cli).await,
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenv::dotenv();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
