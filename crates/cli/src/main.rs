use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use medrec_core::config::data_dir_from_env_value;
use medrec_core::constants::ENV_DATA_DIR;
use medrec_core::CoreConfig;
use medrec_store::RecordStore;
use medrec_terminology::{CodeLookup, UmlsClient, Vocabulary};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "medrec")]
#[command(about = "medrec record store CLI")]
struct Cli {
    /// Data directory (defaults to MEDREC_DATA_DIR, then `data`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and any missing resource file
    Init,
    /// Print every stored record of one resource type
    List {
        resource: ResourceKind,
    },
    /// Print one stored record
    Show {
        resource: ResourceKind,
        id: String,
    },
    /// Look a term up in ICD-10-CM (free text), LOINC or RxNorm (codes)
    Lookup {
        /// icd10cm, loinc or rxnorm
        vocabulary: Vocabulary,
        term: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ResourceKind {
    Patients,
    Conditions,
    Observations,
    MedicationRequests,
    Encounters,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn list(store: &RecordStore, resource: ResourceKind) -> anyhow::Result<()> {
    match resource {
        ResourceKind::Patients => print_json(&store.patients().read_all()?),
        ResourceKind::Conditions => print_json(&store.conditions().read_all()?),
        ResourceKind::Observations => print_json(&store.observations().read_all()?),
        ResourceKind::MedicationRequests => print_json(&store.medication_requests().read_all()?),
        ResourceKind::Encounters => print_json(&store.encounters().read_all()?),
    }
}

fn show(store: &RecordStore, resource: ResourceKind, id: &str) -> anyhow::Result<()> {
    match resource {
        ResourceKind::Patients => print_json(&store.patients().read_one(id)?),
        ResourceKind::Conditions => print_json(&store.conditions().read_one(id)?),
        ResourceKind::Observations => print_json(&store.observations().read_one(id)?),
        ResourceKind::MedicationRequests => {
            print_json(&store.medication_requests().read_one(id)?)
        }
        ResourceKind::Encounters => print_json(&store.encounters().read_one(id)?),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| data_dir_from_env_value(std::env::var(ENV_DATA_DIR).ok()));

    match cli.command {
        Some(Commands::Init) => {
            RecordStore::open(&data_dir)
                .with_context(|| format!("initialising {}", data_dir.display()))?;
            println!("Initialised record store in {}", data_dir.display());
        }
        Some(Commands::List { resource }) => {
            list(&RecordStore::open(&data_dir)?, resource)?;
        }
        Some(Commands::Show { resource, id }) => {
            show(&RecordStore::open(&data_dir)?, resource, &id)?;
        }
        Some(Commands::Lookup { vocabulary, term }) => {
            let cfg = CoreConfig::from_env()?;
            let client = UmlsClient::new(cfg.umls().clone())?;
            match client.lookup_code(vocabulary, &term).await? {
                Some(found) => print_json(&found.to_coding(vocabulary))?,
                None => println!("No {} match for '{}'", vocabulary, term),
            }
        }
        None => {
            println!("Use 'medrec --help' for commands");
        }
    }

    Ok(())
}
