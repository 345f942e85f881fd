use anyhow::Context;
use dbaccess_core::document::bson;
use dbaccess_core::{Document, DocumentStoreClient, GraphRecordStream, GraphStoreClient, RelationalStoreClient};
use futures::TryStreamExt;
use tracing::info;

use crate::config::Settings;

/// Parse a JSON object into a BSON filter document
pub fn parse_filter(filter: &str) -> Result<Document, anyhow::Error> {
    let value: serde_json::Value =
        serde_json::from_str(filter).with_context(|| format!("filter is not valid JSON: {}", filter))?;
    bson::to_document(&value).context("filter must be a JSON object")
}

pub async fn mongo(settings: &Settings, collection: &str, filter: &str) -> Result<(), anyhow::Error> {
    let filter = parse_filter(filter)?;
    let client = DocumentStoreClient::connect(settings.mongo()?).await?;

    let mut count = 0usize;
    {
        let mut documents = client.query_by_filter(collection, filter).await?;
        while let Some(document) = documents.try_next().await? {
            println!("{}", document);
            count += 1;
        }
    }
    info!(count, "Documents returned");

    client.close().await;
    Ok(())
}

pub async fn mysql(settings: &Settings, statement: &str) -> Result<(), anyhow::Error> {
    let mut client = RelationalStoreClient::connect(settings.mysql()?).await?;

    let rows = client.query_with_statement(statement).await?;
    for row in &rows {
        println!("{:?}", row);
    }
    info!(count = rows.len(), "Rows returned");

    client.close().await;
    Ok(())
}

/// One of the fixed graph queries
#[derive(Debug, Clone)]
pub enum GraphLookup {
    IdCard(String),
    Phone(String),
    Emergency(Vec<String>),
}

pub async fn neo4j(settings: &Settings, lookup: GraphLookup) -> Result<(), anyhow::Error> {
    let client = GraphStoreClient::connect(settings.neo4j()?).await?;

    let records = match &lookup {
        GraphLookup::IdCard(id_card) => client.query_by_identifier(id_card).await?,
        GraphLookup::Phone(phone_num) => client.query_by_contact_number(phone_num).await?,
        GraphLookup::Emergency(phone_nums) => client.query_emergency_contacts(phone_nums).await?,
    };
    let count = print_records(records).await?;
    info!(count, "Records returned");

    client.close().await;
    Ok(())
}

async fn print_records(mut records: GraphRecordStream) -> Result<usize, anyhow::Error> {
    let mut count = 0;
    while let Some(record) = records.try_next().await? {
        println!("{}", serde_json::to_string(&record)?);
        count += 1;
    }
    Ok(count)
}
