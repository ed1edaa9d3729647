//! Bazar Application CLI

use std::process;

use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use bazar_app::{
    auth::{
        PgAuthService,
        models::{ApiTokenUuid, NewUser, UserUuid},
    },
    database::{self, Db},
};

#[derive(Debug, Parser)]
#[command(name = "bazar-app", about = "Bazar CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    User(UserCommand),
    Token(TokenCommand),
}

#[derive(Debug, Args)]
struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    Create(CreateUserArgs),
}

#[derive(Debug, Args)]
struct CreateUserArgs {
    /// User email address
    #[arg(long)]
    email: String,

    /// User display name
    #[arg(long)]
    name: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Optional user UUID; generated when omitted
    #[arg(long)]
    user_uuid: Option<Uuid>,
}

#[derive(Debug, Args)]
struct TokenCommand {
    #[command(subcommand)]
    command: TokenSubcommand,
}

#[derive(Debug, Subcommand)]
enum TokenSubcommand {
    Create(CreateTokenArgs),
    Revoke(RevokeTokenArgs),
}

#[derive(Debug, Args)]
struct CreateTokenArgs {
    /// User the token authenticates as
    #[arg(long)]
    user_uuid: Uuid,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[derive(Debug, Args)]
struct RevokeTokenArgs {
    /// Token to revoke
    #[arg(long)]
    token_uuid: Uuid,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::User(UserCommand {
            command: UserSubcommand::Create(args),
        }) => create_user(args).await,
        Commands::Token(TokenCommand {
            command: TokenSubcommand::Create(args),
        }) => create_token(args).await,
        Commands::Token(TokenCommand {
            command: TokenSubcommand::Revoke(args),
        }) => revoke_token(args).await,
    }
}

async fn auth_service(database_url: &str) -> Result<PgAuthService, String> {
    let pool = database::connect(database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    Ok(PgAuthService::new(Db::new(pool)))
}

async fn create_user(args: CreateUserArgs) -> Result<(), String> {
    let service = auth_service(&args.database_url).await?;
    let user_uuid = args.user_uuid.unwrap_or_else(Uuid::now_v7);

    let user = service
        .create_user(NewUser {
            uuid: UserUuid::from_uuid(user_uuid),
            email: args.email,
            name: args.name,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("user_email: {}", user.email);

    Ok(())
}

async fn create_token(args: CreateTokenArgs) -> Result<(), String> {
    let service = auth_service(&args.database_url).await?;

    let raw_token = service
        .issue_token(UserUuid::from_uuid(args.user_uuid))
        .await
        .map_err(|error| format!("failed to issue token: {error}"))?;

    println!("api_token: {raw_token}");
    println!("store this token now; it is only shown once");

    Ok(())
}

async fn revoke_token(args: RevokeTokenArgs) -> Result<(), String> {
    let service = auth_service(&args.database_url).await?;

    service
        .revoke_token(ApiTokenUuid::from_uuid(args.token_uuid))
        .await
        .map_err(|error| format!("failed to revoke token: {error}"))?;

    println!("token revoked");

    Ok(())
}
