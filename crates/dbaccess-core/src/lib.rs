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

//! # dbaccess core
//!
//! Thin scoped-connection wrappers over three database drivers:
//!
//! - [`DocumentStoreClient`]: MongoDB, queried by BSON filter
//! - [`RelationalStoreClient`]: MySQL, queried by literal SQL
//! - [`GraphStoreClient`]: Neo4j, queried through fixed Cypher patterns
//!
//! Each client opens one connection when constructed and releases it on
//! `close` or drop. Results come back as the driver produced them.

pub mod config;
pub mod document;
pub mod errors;
pub mod graph;
pub mod relational;

pub use config::{DocumentStoreConfig, GraphStoreConfig, RelationalStoreConfig};
pub use document::{doc, Document, DocumentStoreClient, DocumentStream};
pub use errors::{DbAccessError, DbAccessResult};
pub use graph::{GraphRecord, GraphRecordStream, GraphStoreClient, GraphValue};
pub use relational::{RelationalStoreClient, Row, SqlValue};
