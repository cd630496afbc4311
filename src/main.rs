// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Countries Explorer CLI
//!
//! Browse countries, manage favorites and the authenticated profile from the
//! terminal. The session persists between invocations in a local store file.

use clap::{Parser, Subcommand};
use countries_explorer::{
    config::Config,
    error::AppError,
    models::ProfileUpdate,
    services::CountryQuery,
    store::FileStore,
    AppState,
};
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Countries Explorer - browse country data with a personal profile
#[derive(Parser, Debug)]
#[command(name = "countries-explorer")]
#[command(about = "Browse countries, favorites and your profile", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and persist the session
    Login { username: String, password: String },
    /// Create an account (does not log in)
    Register {
        username: String,
        #[arg(long, default_value = "")]
        email: String,
        password: String,
        confirm_password: String,
    },
    /// Forget the persisted session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Show the profile
    Profile,
    /// Update profile fields
    UpdateProfile {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
    /// List countries, optionally filtered
    Countries {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        region: Option<String>,
    },
    /// Show one country by 3-letter code
    Country { code: String },
    /// Toggle a country in favorites
    Favorite { code: String },
    /// List favorite countries
    Favorites,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let store = Arc::new(FileStore::open(&config.session_store_path)?);
    let state = AppState::new(config, store);

    match run(&state, cli.command).await {
        Err(e) if e.is_session_expired() => {
            // Refresh already cleared the persisted session.
            eprintln!("Session expired, please log in again");
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Ok(()) => Ok(()),
    }
}

async fn run(state: &AppState, command: Command) -> Result<(), AppError> {
    match command {
        Command::Login { username, password } => {
            let session = state.session.login(&username, &password).await?;
            println!("Logged in as {}", session.username);
        }
        Command::Register {
            username,
            email,
            password,
            confirm_password,
        } => {
            let receipt = state
                .session
                .register(&username, &email, &password, &confirm_password)
                .await?;
            println!("{}", receipt.message);
            let route = receipt.redirect().await;
            println!("Continue at {}: countries-explorer login {} <password>", route, username);
        }
        Command::Logout => {
            state.session.logout()?;
            println!("Logged out");
        }
        Command::Whoami => match state.session.username() {
            Some(username) => println!("{}", username),
            None => println!("Not logged in"),
        },
        Command::Profile => print_json(&state.profile.get_profile().await?)?,
        Command::UpdateProfile { email, bio } => {
            state
                .profile
                .update_profile(&ProfileUpdate { email, bio })
                .await?;
            println!("Profile updated");
        }
        Command::Countries { search, region } => {
            let countries = CountryQuery { search, region }
                .fetch(&state.countries)
                .await?;
            print_json(&countries)?;
        }
        Command::Country { code } => {
            print_json(&state.countries.get_country_by_code(&code).await?)?
        }
        Command::Favorite { code } => {
            let country = state.countries.get_country_by_code(&code).await?;
            let name = country.display_name().to_string();
            if state.favorites.toggle(country)? {
                println!("Added {} to favorites", name);
            } else {
                println!("Removed {} from favorites", name);
            }
        }
        Command::Favorites => print_json(&state.favorites.list())?,
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to render output: {}", e)))?;
    println!("{}", out);
    Ok(())
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("countries_explorer=info,warn"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
