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

//! Connection settings for each store
//!
//! Every field is a plain string handed to the driver as-is. Nothing here is
//! validated or escaped.

use std::fmt;

use serde::{Deserialize, Serialize};

/// MongoDB connection settings
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentStoreConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl DocumentStoreConfig {
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            password: password.into(),
            database: database.into(),
        }
    }

    /// Connection URI with the credentials embedded verbatim.
    ///
    /// Reserved characters in the user or password (`@`, `:`, `/`, `%`) are not
    /// percent-encoded, so such credentials produce a URI the driver may reject
    /// or misparse.
    pub fn connection_uri(&self) -> String {
        "mongodb://".to_string()
            + &self.user
            + ":"
            + &self.password
            + "@"
            + &self.host
            + "/"
            + &self.database
    }
}

impl fmt::Debug for DocumentStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStoreConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

/// MySQL connection settings
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct RelationalStoreConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl RelationalStoreConfig {
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            password: password.into(),
            database: database.into(),
        }
    }
}

impl fmt::Debug for RelationalStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationalStoreConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

/// Neo4j connection settings. The graph store has no database name at this layer.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphStoreConfig {
    /// Bolt URI, e.g. `bolt://localhost:7687`
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl GraphStoreConfig {
    pub fn new(
        uri: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            user: user.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for GraphStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphStoreConfig")
            .field("uri", &self.uri)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}
