//! Operator CLI: schema bootstrap and user creation.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use blog_core::domain::NewUser;
use blog_core::error::RepoError;
use blog_core::ports::{PasswordService, UserRepository};
use blog_infra::database::{DatabaseConfig, SeaOrmUserRepository, connect};
use blog_infra::Argon2PasswordService;

#[derive(Debug, Parser)]
#[command(name = "blog-manage", about = "Manage the blog database")]
struct Cli {
    /// Database to operate on.
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the users and posts tables if they are missing.
    Bootstrap,
    /// Register a user who can author posts.
    CreateUser {
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, env = "BLOG_USER_PASSWORD")]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();

    // Both commands need the tables, so connecting always bootstraps them.
    let db = connect(&DatabaseConfig {
        max_connections: 2,
        min_connections: 1,
        ..DatabaseConfig::new(cli.database_url)
    })
    .await
    .context("connecting to the database")?;

    match cli.command {
        Command::Bootstrap => {
            tracing::info!("Schema bootstrap complete");
        }
        Command::CreateUser {
            username,
            email,
            password,
        } => {
            let hash = Argon2PasswordService::new()
                .hash(&password)
                .context("hashing password")?;

            let users = SeaOrmUserRepository::new(db);
            match users.create(NewUser::new(username, email, hash)).await {
                Ok(user) => {
                    tracing::info!(user_id = user.id, username = %user.username, "User created");
                    println!("{}", user.id);
                }
                Err(RepoError::Validation(errors)) => bail!("invalid user: {errors}"),
                Err(e) => return Err(e).context("creating user"),
            }
        }
    }

    Ok(())
}
