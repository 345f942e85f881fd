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

//! MongoDB connection backed by the official driver

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use mongodb::bson::Document;
use mongodb::{Client, Database};

use super::{DocumentConnection, DocumentConnector, DocumentStream};
use crate::config::DocumentStoreConfig;
use crate::errors::{DbAccessError, DbAccessResult};

/// Opens MongoDB clients from a [`DocumentStoreConfig`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoConnector;

/// A live MongoDB client bound to one database
#[derive(Debug)]
pub struct MongoConnection {
    client: Client,
    database: Database,
}

#[async_trait]
impl DocumentConnector for MongoConnector {
    type Connection = MongoConnection;

    async fn connect(&self, config: &DocumentStoreConfig) -> DbAccessResult<MongoConnection> {
        let client = Client::with_uri_str(config.connection_uri()).await?;
        let database = client.database(&config.database);

        Ok(MongoConnection { client, database })
    }
}

#[async_trait]
impl DocumentConnection for MongoConnection {
    async fn find<'a>(
        &'a self,
        collection: &str,
        filter: Document,
    ) -> DbAccessResult<DocumentStream<'a>> {
        let cursor = self
            .database
            .collection::<Document>(collection)
            .find(filter, None)
            .await?;

        Ok(cursor.map_err(DbAccessError::from).boxed())
    }

    async fn close(&mut self) -> DbAccessResult<()> {
        // Client is a handle onto shared state; shutting down a clone stops the pool.
        self.client.clone().shutdown().await;
        Ok(())
    }
}
