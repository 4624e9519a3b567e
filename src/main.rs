//! Dynamic configuration editor (v0.1)
//!
//! Command-line driver over the config store.
//!
//! # Architecture Overview
//!
//! ```text
//!   dynconf <command>
//!        │
//!        ▼
//!   ┌──────────┐    ┌──────────────┐    ┌──────────────┐    ┌──────────────────────┐
//!   │ settings │───▶│   entities   │───▶│ config store │───▶│ storage backend (fs) │
//!   │ + logging│    │ get/set/del  │    │ mode / load  │    │ dynamic.yml          │
//!   └──────────┘    └──────────────┘    │ save / split │    │ config/routers.yml   │
//!                                       └──────────────┘    │ config/services.yml  │
//!                                                           │ config/middlewares.yml│
//!                                                           └──────────────────────┘
//! ```

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use serde::Serialize;

use dynconf::config::load_config;
use dynconf::entities::{Entities, EntityKind, RouterServiceRequest};
use dynconf::observability::init_logging;
use dynconf::store::{codec, ConfigStore, StorageBackend};

#[derive(Parser)]
#[command(name = "dynconf")]
#[command(about = "Edit a reverse proxy's dynamic routing configuration", long_about = None)]
struct Cli {
    /// Settings file (TOML). Environment variables override it.
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show storage mode, files and entity counts
    Status,
    /// Print the full configuration
    Show {
        #[arg(long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },
    /// Split the configuration into one file per entity kind
    Split,
    /// Manage routers
    Routers {
        #[command(subcommand)]
        action: EntityAction,
    },
    /// Manage services
    Services {
        #[command(subcommand)]
        action: EntityAction,
    },
    /// Manage middlewares
    Middlewares {
        #[command(subcommand)]
        action: EntityAction,
    },
    /// Create a router and its service in one write
    CreateRouterService {
        #[command(flatten)]
        payload: Payload,
    },
}

#[derive(Subcommand)]
enum EntityAction {
    /// List all entries
    List,
    /// Show one entry
    Get { name: String },
    /// Create or replace an entry
    Set {
        name: String,
        #[command(flatten)]
        payload: Payload,
    },
    /// Remove an entry (no error if absent)
    Delete { name: String },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Payload {
    /// Inline JSON payload
    #[arg(long)]
    json: Option<String>,

    /// Path to a JSON payload
    #[arg(long)]
    file: Option<PathBuf>,
}

impl Payload {
    fn parse<T: DeserializeOwned>(&self) -> Result<T, Box<dyn Error>> {
        let text = match (&self.json, &self.file) {
            (Some(json), _) => json.clone(),
            (None, Some(path)) => fs::read_to_string(path)?,
            (None, None) => return Err("either --json or --file is required".into()),
        };
        Ok(serde_json::from_str(&text)?)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.settings.as_deref())?;
    init_logging(&config.observability);

    tracing::debug!(
        dynamic_file = %config.storage.dynamic_file_path.display(),
        config_path = %config.storage.config_path.display(),
        "Settings loaded"
    );

    let store = ConfigStore::from_config(&config.storage);

    match cli.command {
        Commands::Status => print_json(&store.status())?,
        Commands::Show { format } => {
            let doc = store.load();
            match format {
                Format::Yaml => print!("{}", codec::render_document(&doc)?),
                Format::Json => print_json(&doc)?,
            }
        }
        Commands::Split => {
            let doc = store.split_current()?;
            println!(
                "Configuration split into {} ({} routers, {} services, {} middlewares)",
                store.layout().config_dir().display(),
                doc.routers.len(),
                doc.services.len(),
                doc.middlewares.len()
            );
        }
        Commands::Routers { action } => run_entity(store.routers(), action)?,
        Commands::Services { action } => run_entity(store.services(), action)?,
        Commands::Middlewares { action } => run_entity(store.middlewares(), action)?,
        Commands::CreateRouterService { payload } => {
            let request: RouterServiceRequest = payload.parse()?;
            let (router_name, service_name) = (request.router_name.clone(), request.service_name.clone());
            store.create_router_with_service(request)?;
            println!("Router '{}' and service '{}' created", router_name, service_name);
        }
    }

    Ok(())
}

fn run_entity<K, B>(entities: Entities<'_, K, B>, action: EntityAction) -> Result<(), Box<dyn Error>>
where
    K: EntityKind,
    K::Entity: Serialize + DeserializeOwned,
    B: StorageBackend,
{
    match action {
        EntityAction::List => print_json(&entities.all())?,
        EntityAction::Get { name } => print_json(&entities.get(&name)?)?,
        EntityAction::Set { name, payload } => {
            let entity: K::Entity = payload.parse()?;
            entities.save(&name, entity)?;
            println!("{} '{}' saved", K::KIND, name);
        }
        EntityAction::Delete { name } => {
            entities.delete(&name)?;
            println!("{} '{}' deleted", K::KIND, name);
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
