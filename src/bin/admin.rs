//! CLI administration tool for places-api.
//!
//! The HTTP API only manages places. States, cities, users and amenities are
//! created here, against the same storage backend the server uses.
//!
//! # Usage
//!
//! ```bash
//! # Create reference data
//! cargo run --bin admin -- state add California
//! cargo run --bin admin -- city add --state-id <id> "San Francisco"
//! cargo run --bin admin -- user add --email owner@example.com
//! cargo run --bin admin -- amenity add Wifi
//!
//! # Attach an amenity to a place
//! cargo run --bin admin -- place link-amenity <place_id> <amenity_id>
//!
//! # Load a whole dataset
//! cargo run --bin admin -- seed demos/seed.json
//!
//! # Counts per entity type
//! cargo run --bin admin -- stats
//!
//! # Check the storage backend
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `STORAGE_TYPE`, `FILE_STORAGE_PATH`, `DATABASE_URL`, ...

use places_api::config;
use places_api::domain::entities::{Amenity, City, EntityKind, Place, Record, State, User};
use places_api::domain::repositories::Storage;
use places_api::server::build_storage;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Password};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// CLI tool for managing places-api data.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage states
    State {
        #[command(subcommand)]
        action: StateAction,
    },

    /// Manage cities
    City {
        #[command(subcommand)]
        action: CityAction,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage amenities
    Amenity {
        #[command(subcommand)]
        action: AmenityAction,
    },

    /// Manage place relations
    Place {
        #[command(subcommand)]
        action: PlaceAction,
    },

    /// Load states, cities, users, amenities and places from a JSON file
    Seed {
        /// Path to the seed file
        file: PathBuf,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show object counts
    Stats,

    /// Storage operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum StateAction {
    /// Create a state
    Add { name: String },
}

#[derive(Subcommand)]
enum CityAction {
    /// Create a city inside a state
    Add {
        #[arg(long)]
        state_id: String,
        name: String,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a user (prompts for the password unless given)
    Add {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
}

#[derive(Subcommand)]
enum AmenityAction {
    /// Create an amenity
    Add { name: String },
}

#[derive(Subcommand)]
enum PlaceAction {
    /// Attach an existing amenity to an existing place
    LinkAmenity { place_id: String, amenity_id: String },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check that the storage backend answers
    Check,
}

/// Seed file layout. Places refer to cities, users and amenities by name/email.
#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    states: Vec<SeedState>,
    #[serde(default)]
    amenities: Vec<String>,
    #[serde(default)]
    users: Vec<SeedUser>,
    #[serde(default)]
    places: Vec<SeedPlace>,
}

#[derive(Debug, Deserialize)]
struct SeedState {
    name: String,
    #[serde(default)]
    cities: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SeedUser {
    email: String,
    password: String,
    first_name: Option<String>,
    last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeedPlace {
    name: String,
    city: String,
    user: String,
    description: Option<String>,
    #[serde(default)]
    number_rooms: i32,
    #[serde(default)]
    number_bathrooms: i32,
    #[serde(default)]
    max_guest: i32,
    #[serde(default)]
    price_by_night: i32,
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    amenities: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let storage = build_storage(&config).await?;

    match cli.command {
        Commands::State {
            action: StateAction::Add { name },
        } => {
            let state = State::new(name);
            let id = state.id.clone();
            commit(&storage, vec![state.into()]).await?;
            created("State", &id);
        }
        Commands::City {
            action: CityAction::Add { state_id, name },
        } => {
            storage
                .get_state(&state_id)
                .await?
                .with_context(|| format!("State {} not found", state_id))?;
            let city = City::new(state_id, name);
            let id = city.id.clone();
            commit(&storage, vec![city.into()]).await?;
            created("City", &id);
        }
        Commands::User {
            action:
                UserAction::Add {
                    email,
                    password,
                    first_name,
                    last_name,
                },
        } => {
            let password = match password {
                Some(p) => p,
                None => Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Repeat password", "Passwords do not match")
                    .interact()?,
            };
            let user = User::new(email, &password, first_name, last_name);
            let id = user.id.clone();
            commit(&storage, vec![user.into()]).await?;
            created("User", &id);
        }
        Commands::Amenity {
            action: AmenityAction::Add { name },
        } => {
            let amenity = Amenity::new(name);
            let id = amenity.id.clone();
            commit(&storage, vec![amenity.into()]).await?;
            created("Amenity", &id);
        }
        Commands::Place {
            action:
                PlaceAction::LinkAmenity {
                    place_id,
                    amenity_id,
                },
        } => link_amenity(&storage, &place_id, &amenity_id).await?,
        Commands::Seed { file, yes } => seed(&storage, file, yes).await?,
        Commands::Stats => handle_stats(&storage).await?,
        Commands::Db {
            action: DbAction::Check,
        } => {
            println!("{}", "🔍 Checking storage...".bright_blue().bold());
            storage
                .count(EntityKind::Place)
                .await
                .map_err(|e| anyhow::anyhow!("Storage check failed: {}", e))?;
            println!("{}", "✅ Storage is reachable".green().bold());
        }
    }

    Ok(())
}

/// Stages every record and saves once.
async fn commit(storage: &Arc<dyn Storage>, records: Vec<Record>) -> Result<()> {
    for record in records {
        storage.put(record).await?;
    }
    storage
        .save()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to save: {}", e))
}

fn created(kind: &str, id: &str) {
    println!("{} {} {}", "✅".green(), kind.bright_white().bold(), id.cyan());
}

async fn link_amenity(storage: &Arc<dyn Storage>, place_id: &str, amenity_id: &str) -> Result<()> {
    let mut place = storage
        .get_place(place_id)
        .await?
        .with_context(|| format!("Place {} not found", place_id))?;
    storage
        .get_amenity(amenity_id)
        .await?
        .with_context(|| format!("Amenity {} not found", amenity_id))?;

    if place.amenity_ids.iter().any(|a| a == amenity_id) {
        println!("{}", "⚠️  Amenity already linked".yellow());
        return Ok(());
    }

    place.amenity_ids.push(amenity_id.to_string());
    commit(storage, vec![place.into()]).await?;

    println!("{}", "✅ Amenity linked".green().bold());
    Ok(())
}

/// Loads a seed file, resolving place references by name.
async fn seed(storage: &Arc<dyn Storage>, file: PathBuf, skip_confirm: bool) -> Result<()> {
    let raw = tokio::fs::read(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let data: SeedFile = serde_json::from_slice(&raw).context("Invalid seed file")?;

    let city_count: usize = data.states.iter().map(|s| s.cities.len()).sum();

    println!("{}", "🌱 Seed".bright_blue().bold());
    println!("  States:    {}", data.states.len().to_string().cyan());
    println!("  Cities:    {}", city_count.to_string().cyan());
    println!("  Users:     {}", data.users.len().to_string().cyan());
    println!("  Amenities: {}", data.amenities.len().to_string().cyan());
    println!("  Places:    {}", data.places.len().to_string().cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Insert these objects?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let mut records: Vec<Record> = Vec::new();
    let mut cities: HashMap<String, String> = HashMap::new();
    let mut users: HashMap<String, String> = HashMap::new();
    let mut amenities: HashMap<String, String> = HashMap::new();

    for s in data.states {
        let state = State::new(s.name);
        for name in s.cities {
            let city = City::new(&state.id, name.clone());
            cities.insert(name, city.id.clone());
            records.push(city.into());
        }
        // states first so foreign keys hold on insert
        records.insert(0, state.into());
    }

    for name in data.amenities {
        let amenity = Amenity::new(name.clone());
        amenities.insert(name, amenity.id.clone());
        records.push(amenity.into());
    }

    for u in data.users {
        let user = User::new(u.email.clone(), &u.password, u.first_name, u.last_name);
        users.insert(u.email, user.id.clone());
        records.push(user.into());
    }

    for p in data.places {
        let city_id = cities
            .get(&p.city)
            .with_context(|| format!("Place '{}': unknown city '{}'", p.name, p.city))?;
        let user_id = users
            .get(&p.user)
            .with_context(|| format!("Place '{}': unknown user '{}'", p.name, p.user))?;

        let mut place = Place::new(city_id, user_id, p.name.clone());
        place.description = p.description;
        place.number_rooms = p.number_rooms;
        place.number_bathrooms = p.number_bathrooms;
        place.max_guest = p.max_guest;
        place.price_by_night = p.price_by_night;
        place.latitude = p.latitude;
        place.longitude = p.longitude;
        for name in &p.amenities {
            let amenity_id = amenities
                .get(name)
                .with_context(|| format!("Place '{}': unknown amenity '{}'", p.name, name))?;
            place.amenity_ids.push(amenity_id.clone());
        }
        records.push(place.into());
    }

    let total = records.len();
    commit(storage, records).await?;

    println!("{} {} objects stored", "✅".green(), total.to_string().bold());
    Ok(())
}

/// Prints object counts per entity type.
async fn handle_stats(storage: &Arc<dyn Storage>) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    for kind in EntityKind::ALL {
        let n = storage
            .count(kind)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to count {}: {}", kind.class_name(), e))?;
        println!(
            "  {:<10} {}",
            kind.class_name().bright_white(),
            n.to_string().cyan()
        );
    }

    Ok(())
}
