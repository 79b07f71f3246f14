//! `newsdesk` — console for the CMS: sign in, sign out, and manage
//! articles, authors and categories behind the session guard.

mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::CliError;

#[derive(Parser, Debug)]
#[command(name = "newsdesk", about = "News CMS console")]
struct Cli {
    #[arg(long, env = "NEWSDESK_BACKEND_URL")]
    backend_url: Option<String>,

    #[arg(long, env = "NEWSDESK_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the session token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "NEWSDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the session token.
    Logout,
    /// Show the signed-in user.
    Whoami,
    Articles(ContentCommand),
    Authors(ContentCommand),
    Categories(ContentCommand),
}

#[derive(Args, Debug)]
struct ContentCommand {
    #[command(subcommand)]
    command: ContentSubcommand,
}

#[derive(Subcommand, Debug)]
enum ContentSubcommand {
    List {
        /// Raw query string, e.g. `category=3&author=9` (articles only).
        #[arg(long)]
        query: Option<String>,
    },
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        id: String,
        #[arg(long)]
        data: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = commands::resolve_config(cli.backend_url.as_deref(), cli.token_file);
    let console = commands::Console::connect(config).await?;

    match cli.command {
        Command::Login { email, password } => console.login(email, password).await,
        Command::Logout => console.logout().await,
        Command::Whoami => console.whoami().await,
        Command::Articles(cmd) => console.content(session::Resource::Articles, cmd.command.into()).await,
        Command::Authors(cmd) => console.content(session::Resource::Authors, cmd.command.into()).await,
        Command::Categories(cmd) => console.content(session::Resource::Categories, cmd.command.into()).await,
    }
}

impl From<ContentSubcommand> for commands::ContentAction {
    fn from(cmd: ContentSubcommand) -> Self {
        match cmd {
            ContentSubcommand::List { query } => Self::List { query },
            ContentSubcommand::Get { id } => Self::Get { id },
            ContentSubcommand::Create { data } => Self::Create { data },
            ContentSubcommand::Update { id, data } => Self::Update { id, data },
        }
    }
}
