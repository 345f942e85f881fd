/*
Copyright 2024, Zep Software, Inc.

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Document store wrapper
//!
//! [`DocumentStoreClient`] owns one connection to a document database and
//! forwards filters to a named collection. The filter reaches the driver
//! exactly as the caller built it: operators such as `$where` or `$ne` are
//! not stripped, so untrusted filters must be vetted by the caller.

pub mod mongo;

use async_trait::async_trait;
use futures::stream::BoxStream;
use tracing::{debug, info, warn};

pub use mongo::{MongoConnection, MongoConnector};
pub use mongodb::bson;
pub use mongodb::bson::{doc, Document};

use crate::config::DocumentStoreConfig;
use crate::errors::DbAccessResult;

/// Lazy sequence of documents, borrowed from the connection that produced it
pub type DocumentStream<'a> = BoxStream<'a, DbAccessResult<Document>>;

/// An open connection to a document database
#[async_trait]
pub trait DocumentConnection: Send + Sync {
    /// Run `find` against `collection` with `filter` and return the cursor
    async fn find<'a>(
        &'a self,
        collection: &str,
        filter: Document,
    ) -> DbAccessResult<DocumentStream<'a>>;

    /// Release the connection
    async fn close(&mut self) -> DbAccessResult<()>;
}

/// Opens [`DocumentConnection`]s
#[async_trait]
pub trait DocumentConnector: Send + Sync {
    type Connection: DocumentConnection;

    async fn connect(&self, config: &DocumentStoreConfig) -> DbAccessResult<Self::Connection>;
}

/// Scoped connection to a document database.
///
/// The connection is opened once in [`connect`](Self::connect) and released by
/// [`close`](Self::close), or by the driver when the client is dropped.
pub struct DocumentStoreClient<C: DocumentConnection = MongoConnection> {
    connection: C,
    database: String,
}

impl DocumentStoreClient<MongoConnection> {
    /// Connect to MongoDB
    pub async fn connect(config: &DocumentStoreConfig) -> DbAccessResult<Self> {
        Self::connect_with(&MongoConnector, config).await
    }
}

impl<C: DocumentConnection> DocumentStoreClient<C> {
    /// Connect through an explicit connector
    pub async fn connect_with<K>(connector: &K, config: &DocumentStoreConfig) -> DbAccessResult<Self>
    where
        K: DocumentConnector<Connection = C>,
    {
        let connection = connector.connect(config).await?;
        info!(host = %config.host, database = %config.database, "Opened document store connection");

        Ok(Self {
            connection,
            database: config.database.clone(),
        })
    }

    /// Name of the database this client is bound to
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Forward `filter` unmodified to `collection_name` and return the matching documents
    pub async fn query_by_filter(
        &self,
        collection_name: &str,
        filter: Document,
    ) -> DbAccessResult<DocumentStream<'_>> {
        debug!(collection = collection_name, filter = %filter, "Querying document store");
        self.connection.find(collection_name, filter).await
    }

    /// Close the connection. Failures are logged and otherwise ignored.
    pub async fn close(mut self) {
        if let Err(e) = self.connection.close().await {
            warn!(database = %self.database, "Failed to close document store connection: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use futures::{stream, StreamExt, TryStreamExt};

    use super::*;

    /// In-memory document store
    #[derive(Clone, Default)]
    struct FixtureConnector {
        documents: Vec<(String, Document)>,
        opened: Arc<Mutex<Vec<DocumentStoreConfig>>>,
        closes: Arc<AtomicUsize>,
        fail_close: bool,
    }

    struct FixtureConnection {
        documents: Vec<(String, Document)>,
        closes: Arc<AtomicUsize>,
        fail_close: bool,
    }

    #[async_trait]
    impl DocumentConnector for FixtureConnector {
        type Connection = FixtureConnection;

        async fn connect(&self, config: &DocumentStoreConfig) -> DbAccessResult<FixtureConnection> {
            self.opened.lock().unwrap().push(config.clone());
            Ok(FixtureConnection {
                documents: self.documents.clone(),
                closes: self.closes.clone(),
                fail_close: self.fail_close,
            })
        }
    }

    #[async_trait]
    impl DocumentConnection for FixtureConnection {
        async fn find<'a>(
            &'a self,
            collection: &str,
            filter: Document,
        ) -> DbAccessResult<DocumentStream<'a>> {
            let matches: Vec<DbAccessResult<Document>> = self
                .documents
                .iter()
                .filter(|(name, _)| name == collection)
                .filter(|(_, doc)| filter.iter().all(|(key, value)| doc.get(key) == Some(value)))
                .map(|(_, doc)| Ok(doc.clone()))
                .collect();
            Ok(stream::iter(matches).boxed())
        }

        async fn close(&mut self) -> DbAccessResult<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            if self.fail_close {
                let reset = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "server went away");
                return Err(mongodb::error::Error::from(reset).into());
            }
            Ok(())
        }
    }

    fn config() -> DocumentStoreConfig {
        DocumentStoreConfig::new("10.0.0.5:27017", "risk-reader", "I1q#az45$91", "risk")
    }

    fn risk_fixture() -> FixtureConnector {
        FixtureConnector {
            documents: vec![
                (
                    "I_MO_B_B_RISK".to_string(),
                    doc! { "uid": "26576", "score": 71, "tags": ["night", "overdue"] },
                ),
                ("I_MO_B_B_RISK".to_string(), doc! { "uid": "26577", "score": 12 }),
                ("OTHER".to_string(), doc! { "uid": "26576", "score": 99 }),
            ],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_connect_opens_once_with_supplied_values() {
        let connector = FixtureConnector::default();
        let client = DocumentStoreClient::connect_with(&connector, &config())
            .await
            .unwrap();

        let opened = connector.opened.lock().unwrap().clone();
        assert_eq!(opened, vec![config()]);
        assert_eq!(client.database(), "risk");
    }

    #[tokio::test]
    async fn test_query_by_filter_returns_only_matching_document_unmodified() {
        let connector = risk_fixture();
        let client = DocumentStoreClient::connect_with(&connector, &config())
            .await
            .unwrap();

        let docs: Vec<Document> = client
            .query_by_filter("I_MO_B_B_RISK", doc! { "uid": "26576" })
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(
            docs,
            vec![doc! { "uid": "26576", "score": 71, "tags": ["night", "overdue"] }]
        );
    }

    #[tokio::test]
    async fn test_empty_filter_returns_whole_collection() {
        let connector = risk_fixture();
        let client = DocumentStoreClient::connect_with(&connector, &config())
            .await
            .unwrap();

        let count = client
            .query_by_filter("I_MO_B_B_RISK", Document::new())
            .await
            .unwrap()
            .count()
            .await;
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_close_releases_connection_once() {
        let connector = risk_fixture();
        let client = DocumentStoreClient::connect_with(&connector, &config())
            .await
            .unwrap();

        client.close().await;
        assert_eq!(connector.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_close_failure_is_swallowed() {
        let connector = FixtureConnector {
            fail_close: true,
            ..Default::default()
        };
        let client = DocumentStoreClient::connect_with(&connector, &config())
            .await
            .unwrap();

        client.close().await;
        assert_eq!(connector.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drop_without_close_does_not_call_close() {
        let connector = FixtureConnector::default();
        {
            let _client = DocumentStoreClient::connect_with(&connector, &config())
                .await
                .unwrap();
        }
        assert_eq!(connector.closes.load(Ordering::SeqCst), 0);
    }
}
