//! Tether CLI - Command-line client for a Tether RPC server

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use futures::future::join_all;
use std::time::Duration;
use tabled::{Table, Tabled};
use tether_sdk::{BatchPolicy, ClientConfig, TetherClient, User};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9527/rpc";

#[derive(Parser)]
#[command(name = "tether")]
#[command(about = "Tether RPC CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC endpoint URL
    #[arg(long, env = "TETHER_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,

    /// Batch calls issued within this many milliseconds (0 = same tick)
    #[arg(long, default_value = "0")]
    batch_window_ms: u64,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// User procedures
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// List all users
    List,

    /// Show one user
    Get {
        /// User ID
        id: String,
    },

    /// Create one or more users; several names go out as one batch
    Create {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[derive(Tabled)]
struct UserRow {
    id: String,
    name: String,
}

impl From<User> for UserRow {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
        }
    }
}

fn connect(cli: &Cli) -> Result<TetherClient> {
    let policy = match cli.batch_window_ms {
        0 => BatchPolicy::tick(),
        ms => BatchPolicy::window(Duration::from_millis(ms)),
    };
    let config = ClientConfig::new(&cli.rpc_url)
        .policy(policy)
        .timeout(Duration::from_secs(cli.timeout_secs));

    TetherClient::with_config(config).context("Failed to create client")
}

fn print_users(users: Vec<User>) {
    let rows: Vec<UserRow> = users.into_iter().map(UserRow::from).collect();
    println!("{}", Table::new(rows));
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = connect(&cli)?;

    match cli.command {
        Commands::Users { command } => match command {
            UserCommands::List => {
                let users = client
                    .user_list()
                    .await
                    .context("Failed to list users")?;

                if users.is_empty() {
                    println!("{}", "No users".yellow());
                } else {
                    println!("{}", format!("{} user(s)", users.len()).cyan().bold());
                    print_users(users);
                }
            }

            UserCommands::Get { id } => {
                match client.user_by_id(&id).await.context("Failed to get user")? {
                    Some(user) => print_users(vec![user]),
                    None => println!("{}", format!("No user with id {}", id).yellow()),
                }
            }

            UserCommands::Create { names } => {
                let results =
                    join_all(names.iter().map(|name| client.user_create(name.as_str()))).await;

                let mut created = Vec::new();
                for (name, result) in names.iter().zip(results) {
                    match result {
                        Ok(user) => created.push(user),
                        Err(e) => println!("  {} {}: {}", "✗".red(), name, e),
                    }
                }

                if !created.is_empty() {
                    println!(
                        "{}",
                        format!("✓ Created {} user(s)", created.len()).green().bold()
                    );
                    print_users(created.clone());
                }

                if created.len() < names.len() {
                    anyhow::bail!("{} of {} creations failed", names.len() - created.len(), names.len());
                }
            }
        },
    }

    Ok(())
}
