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

//! Relational store wrapper
//!
//! [`RelationalStoreClient`] owns a single cursor and executes literal SQL.
//! Statements are sent exactly as given; there is no parameter binding and no
//! escaping, so a statement assembled from untrusted input is an injection
//! vector.

pub mod mysql;

use async_trait::async_trait;
use tracing::{debug, info, warn};

pub use mysql::{MySqlConnector, MySqlCursor, CONNECTION_CHARSET};
pub use mysql_async::Value as SqlValue;

use crate::config::RelationalStoreConfig;
use crate::errors::DbAccessResult;

/// Column values of one result row, in column order
pub type Row = Vec<SqlValue>;

/// The single reusable cursor a relational client owns
#[async_trait]
pub trait RelationalCursor: Send {
    /// Execute `statement` and fetch every resulting row
    async fn execute(&mut self, statement: &str) -> DbAccessResult<Vec<Row>>;

    /// Release the cursor
    async fn close(&mut self) -> DbAccessResult<()>;
}

/// Opens [`RelationalCursor`]s
#[async_trait]
pub trait RelationalConnector: Send + Sync {
    type Cursor: RelationalCursor;

    async fn connect(&self, config: &RelationalStoreConfig) -> DbAccessResult<Self::Cursor>;
}

/// Scoped connection to a relational database
pub struct RelationalStoreClient<C: RelationalCursor = MySqlCursor> {
    cursor: C,
    host: String,
}

impl RelationalStoreClient<MySqlCursor> {
    /// Connect to MySQL
    pub async fn connect(config: &RelationalStoreConfig) -> DbAccessResult<Self> {
        Self::connect_with(&MySqlConnector, config).await
    }
}

impl<C: RelationalCursor> RelationalStoreClient<C> {
    /// Connect through an explicit connector
    pub async fn connect_with<K>(connector: &K, config: &RelationalStoreConfig) -> DbAccessResult<Self>
    where
        K: RelationalConnector<Cursor = C>,
    {
        let cursor = connector.connect(config).await?;
        info!(host = %config.host, database = %config.database, "Opened relational store connection");

        Ok(Self {
            cursor,
            host: config.host.clone(),
        })
    }

    /// Execute a literal SQL statement and return all rows at once.
    ///
    /// Takes `&mut self` because the cursor is shared state: results of one
    /// statement must be fully read before the next is issued.
    pub async fn query_with_statement(&mut self, statement: &str) -> DbAccessResult<Vec<Row>> {
        debug!(statement, "Executing statement");
        let rows = self.cursor.execute(statement).await?;
        debug!(rows = rows.len(), "Statement returned");
        Ok(rows)
    }

    /// Close the cursor. Failures are logged and otherwise ignored.
    pub async fn close(mut self) {
        if let Err(e) = self.cursor.close().await {
            warn!(host = %self.host, "Failed to close relational store cursor: {}", e);
        }
    }
}
