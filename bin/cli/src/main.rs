use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::GraphLookup;
use config::Settings;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(name = "dbaccess")]
#[clap(about = "Run one query against MongoDB, MySQL or Neo4j and print the results")]
struct Args {
    /// Settings file
    #[clap(long, default_value = "dbaccess.toml", help = "TOML settings file (optional)")]
    config: PathBuf,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find documents in a MongoDB collection
    Mongo {
        #[clap(long, help = "Collection name")]
        collection: String,

        #[clap(long, default_value = "{}", help = "Filter as a JSON object")]
        filter: String,
    },
    /// Execute a literal SQL statement on MySQL
    Mysql {
        #[clap(long, help = "SQL statement, sent as-is")]
        statement: String,
    },
    /// Run one of the fixed Neo4j lookups
    Neo4j {
        #[clap(subcommand)]
        lookup: Neo4jLookup,
    },
}

#[derive(Subcommand, Debug)]
enum Neo4jLookup {
    /// Phones linked to a user's identity card number
    IdCard { id_card: String },
    /// Users linked to a phone number
    Phone { phone_num: String },
    /// Contacts whose emergency contact has one of these numbers
    Emergency {
        #[clap(required = true)]
        phone_nums: Vec<String>,
    },
}

impl From<Neo4jLookup> for GraphLookup {
    fn from(lookup: Neo4jLookup) -> Self {
        match lookup {
            Neo4jLookup::IdCard { id_card } => GraphLookup::IdCard(id_card),
            Neo4jLookup::Phone { phone_num } => GraphLookup::Phone(phone_num),
            Neo4jLookup::Emergency { phone_nums } => GraphLookup::Emergency(phone_nums),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Logs go to stderr so stdout carries only records
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dbaccess=info,dbaccess_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let settings = Settings::load(&args.config)?;
    debug!(?settings, "Loaded settings");

    match args.command {
        Command::Mongo { collection, filter } => {
            commands::mongo(&settings, &collection, &filter).await
        }
        Command::Mysql { statement } => commands::mysql(&settings, &statement).await,
        Command::Neo4j { lookup } => commands::neo4j(&settings, lookup.into()).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_emergency_lookup() {
        let args = Args::parse_from(["dbaccess", "neo4j", "emergency", "111", "222"]);
        let Command::Neo4j { lookup } = args.command else {
            panic!("expected neo4j command");
        };
        match GraphLookup::from(lookup) {
            GraphLookup::Emergency(nums) => assert_eq!(nums, vec!["111", "222"]),
            other => panic!("unexpected lookup: {:?}", other),
        }
        assert_eq!(args.config, PathBuf::from("dbaccess.toml"));
    }

    #[test]
    fn test_mongo_filter_defaults_to_empty_object() {
        let args = Args::parse_from(["dbaccess", "mongo", "--collection", "I_MO_B_B_RISK"]);
        match args.command {
            Command::Mongo { collection, filter } => {
                assert_eq!(collection, "I_MO_B_B_RISK");
                assert_eq!(filter, "{}");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
