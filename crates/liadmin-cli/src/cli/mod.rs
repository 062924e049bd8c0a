//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use liadmin_core::api::{ApiClient, NavEvent, nav_channel};
use liadmin_core::config::Config;
use liadmin_core::guard::{self, Decision, RouteTarget};
use liadmin_core::session::SessionStore;

mod commands;

#[derive(Parser)]
#[command(name = "liadmin")]
#[command(version)]
#[command(about = "Livingimage admin console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in as an admin
    Login {
        /// Admin email (prompted when omitted)
        #[arg(long)]
        email: Option<String>,

        /// Admin password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign out and clear the stored session
    Logout,

    /// Show the current session
    Status,

    /// Product analytics and traffic report
    Dashboard {
        /// Time range: day, week or month
        #[arg(long, default_value = "day")]
        filter: String,
    },

    /// Manage users
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Browse uploaded and regenerated images
    Images {
        #[command(subcommand)]
        command: ImageCommands,
    },

    /// List payments
    Payments {
        /// Keep only rows matching this term (any column)
        #[arg(long)]
        search: Option<String>,

        /// Sort column: id, email, amount, credits, time, status, gateway
        #[arg(long, default_value = "id")]
        sort: String,

        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum UserCommands {
    /// List all users
    List {
        /// Keep only rows matching this term (any column)
        #[arg(long)]
        search: Option<String>,

        /// Sort column: id, email, name, credits, registered, status
        #[arg(long, default_value = "id")]
        sort: String,

        /// Sort descending
        #[arg(long)]
        desc: bool,
    },
    /// Show one user's profile and image history
    View {
        /// The user's email
        #[arg(value_name = "EMAIL")]
        email: String,
    },
    /// Delete a user
    Delete {
        /// The user's email
        #[arg(value_name = "EMAIL")]
        email: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(clap::Subcommand)]
enum ImageCommands {
    /// List original images, one page at a time
    Original {
        /// Page number (10 rows per page)
        #[arg(long, default_value_t = 1)]
        page: u64,

        /// Keep only rows matching this term (any column)
        #[arg(long)]
        search: Option<String>,

        /// Refresh on an interval until Ctrl-C
        #[arg(long)]
        watch: bool,
    },
    /// List regenerated images, one page at a time
    Regenerated {
        /// Page number (10 rows per page)
        #[arg(long, default_value_t = 1)]
        page: u64,

        /// Keep only rows matching this term (any column)
        #[arg(long)]
        search: Option<String>,

        /// Refresh on an interval until Ctrl-C
        #[arg(long)]
        watch: bool,
    },
    /// Show an original next to its regeneration
    Show {
        /// Original image ID
        #[arg(long)]
        original: u64,

        /// Regenerated image ID
        #[arg(long)]
        regenerated: u64,

        /// Open the image URLs in the browser
        #[arg(long)]
        open: bool,
    },
    /// Delete original images (and their regenerations) by ID
    Delete {
        /// Image IDs
        #[arg(value_name = "ID", required = true)]
        ids: Vec<u64>,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Point the console at a different API base URL
    SetUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

impl Commands {
    /// Which route class this command belongs to, if the guard applies.
    ///
    /// Session management (`logout`, `status`) and local config edits are
    /// not views; everything else is either the login screen or a
    /// protected admin view.
    fn route(&self) -> Option<RouteTarget> {
        match self {
            Commands::Login { .. } => Some(RouteTarget::public_only()),
            Commands::Logout | Commands::Status | Commands::Config { .. } => None,
            _ => Some(RouteTarget::protected()),
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load().context("load config")?;
    let store = SessionStore::new();

    // Local config edits work without a backend or a session.
    if let Commands::Config { command } = &cli.command {
        return match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::SetUrl { url } => commands::config::set_url(url),
        };
    }

    // The guard runs on every dispatch against the session as stored
    // right now; it is never cached across commands.
    if let Some(target) = cli.command.route() {
        match guard::decide(target, &store.get()) {
            Decision::Allow => {}
            Decision::RedirectTo(guard::LOGIN_ROUTE) => {
                anyhow::bail!("Not logged in. Run `liadmin login` first.");
            }
            Decision::RedirectTo(_) => {
                println!("Already logged in. Run `liadmin logout` to switch accounts.");
                return Ok(());
            }
        }
    }

    let base_url = config.effective_base_url().context("resolve base URL")?;
    tracing::debug!("API base URL: {base_url}");
    let (nav_tx, mut nav_rx) = nav_channel();
    let client = ApiClient::new(base_url, store.clone()).with_nav(nav_tx);

    let result = match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&client, email, password).await
        }
        Commands::Logout => commands::auth::logout(&store),
        Commands::Status => commands::auth::status(&store),
        Commands::Dashboard { filter } => commands::dashboard::run(&client, &filter).await,
        Commands::Users { command } => match command {
            UserCommands::List { search, sort, desc } => {
                commands::users::list(&client, search.as_deref(), &sort, desc).await
            }
            UserCommands::View { email } => commands::users::view(&client, &email).await,
            UserCommands::Delete { email, yes } => {
                commands::users::delete(&client, &email, yes).await
            }
        },
        Commands::Images { command } => match command {
            ImageCommands::Original { page, search, watch } => {
                commands::images::original(&client, &config, page, search.as_deref(), watch).await
            }
            ImageCommands::Regenerated { page, search, watch } => {
                commands::images::regenerated(&client, &config, page, search.as_deref(), watch)
                    .await
            }
            ImageCommands::Show {
                original,
                regenerated,
                open,
            } => commands::images::show(&client, original, regenerated, open).await,
            ImageCommands::Delete { ids, yes } => {
                commands::images::delete(&client, &ids, yes).await
            }
        },
        Commands::Payments { search, sort, desc } => {
            commands::payments::list(&client, search.as_deref(), &sort, desc).await
        }
        Commands::Config { .. } => unreachable!("handled above"),
    };

    // Forced logout fires after the store is already cleared, so the
    // next dispatch's guard lands on the login route.
    if let Ok(NavEvent::ForceLogin) = nav_rx.try_recv() {
        eprintln!("Session expired. Run `liadmin login` to sign in again.");
    }

    result
}
