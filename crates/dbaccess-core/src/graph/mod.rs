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

//! Graph store wrapper
//!
//! [`GraphStoreClient`] keeps one session and runs three fixed pattern
//! queries over the user/phone/contact graph:
//!
//! ```text
//! (:USER {idCard})-[:PHONE]->(:PHONE {phoneNum})
//! (:CONTACT)-[:EMERG]->(:CONTACT {phoneNum})
//! ```
//!
//! Caller values are bound as parameters, never spliced into the query text.

pub mod neo4j;
pub mod types;

use async_trait::async_trait;
use futures::stream::BoxStream;
use tracing::{debug, info, warn};

pub use neo4j::{Neo4jDriver, Neo4jSession};
pub use types::{CypherQuery, EdgeData, GraphRecord, GraphValue, NodeData, PropertyValue};

use crate::config::GraphStoreConfig;
use crate::errors::DbAccessResult;

/// Phones linked to the user holding `$idCard`
pub const PHONES_BY_ID_CARD: &str =
    "MATCH (u:USER {idCard: $idCard})-[rel:PHONE]->(p:PHONE) RETURN rel, p";

/// Users linked to the phone numbered `$phoneNum`
pub const USERS_BY_PHONE_NUM: &str =
    "MATCH (u:USER)-[rel:PHONE]->(p:PHONE {phoneNum: $phoneNum}) RETURN rel, u";

/// Contacts whose emergency contact's number is in `$phoneNums`
pub const EMERGENCY_CONTACTS_BY_PHONE_NUMS: &str =
    "MATCH (c1:CONTACT)-[rel:EMERG]->(c2:CONTACT) WHERE c2.phoneNum IN $phoneNums RETURN c1";

/// Lazy sequence of records produced by one query
pub type GraphRecordStream = BoxStream<'static, DbAccessResult<GraphRecord>>;

/// An open session on a graph database
#[async_trait]
pub trait GraphSession: Send + Sync {
    /// Run `query` and stream its records
    async fn run(&self, query: CypherQuery) -> DbAccessResult<GraphRecordStream>;

    /// Release the session
    async fn close(&mut self) -> DbAccessResult<()>;
}

/// Opens [`GraphSession`]s
#[async_trait]
pub trait GraphDriver: Send + Sync {
    type Session: GraphSession;

    async fn open_session(&self, config: &GraphStoreConfig) -> DbAccessResult<Self::Session>;
}

pub fn phones_by_id_card(id_card: &str) -> CypherQuery {
    CypherQuery::new(PHONES_BY_ID_CARD, &["rel", "p"]).param("idCard", id_card)
}

pub fn users_by_phone_num(phone_num: &str) -> CypherQuery {
    CypherQuery::new(USERS_BY_PHONE_NUM, &["rel", "u"]).param("phoneNum", phone_num)
}

pub fn emergency_contacts_by_phone_nums<S: AsRef<str>>(phone_nums: &[S]) -> CypherQuery {
    let phone_nums: Vec<&str> = phone_nums.iter().map(AsRef::as_ref).collect();
    CypherQuery::new(EMERGENCY_CONTACTS_BY_PHONE_NUMS, &["c1"]).param("phoneNums", phone_nums)
}

/// Scoped session on a graph database
pub struct GraphStoreClient<S: GraphSession = Neo4jSession> {
    session: S,
    uri: String,
}

impl GraphStoreClient<Neo4jSession> {
    /// Connect to Neo4j
    pub async fn connect(config: &GraphStoreConfig) -> DbAccessResult<Self> {
        Self::connect_with(&Neo4jDriver, config).await
    }
}

impl<S: GraphSession> GraphStoreClient<S> {
    /// Open a session through an explicit driver
    pub async fn connect_with<D>(driver: &D, config: &GraphStoreConfig) -> DbAccessResult<Self>
    where
        D: GraphDriver<Session = S>,
    {
        let session = driver.open_session(config).await?;
        info!(uri = %config.uri, "Opened graph store session");

        Ok(Self {
            session,
            uri: config.uri.clone(),
        })
    }

    /// Phone relationships and phone nodes of the user with this identity card number.
    ///
    /// Records carry columns `rel` and `p`.
    pub async fn query_by_identifier(&self, id_card: &str) -> DbAccessResult<GraphRecordStream> {
        debug!(id_card, "Querying phones by identity card");
        self.session.run(phones_by_id_card(id_card)).await
    }

    /// Phone relationships and owning users of this phone number.
    ///
    /// Records carry columns `rel` and `u`.
    pub async fn query_by_contact_number(
        &self,
        contact_number: &str,
    ) -> DbAccessResult<GraphRecordStream> {
        debug!(contact_number, "Querying users by phone number");
        self.session.run(users_by_phone_num(contact_number)).await
    }

    /// Contacts that list any of these numbers as an emergency contact.
    ///
    /// Records carry column `c1`.
    pub async fn query_emergency_contacts<T: AsRef<str>>(
        &self,
        contact_list: &[T],
    ) -> DbAccessResult<GraphRecordStream> {
        debug!(count = contact_list.len(), "Querying emergency contacts");
        self.session
            .run(emergency_contacts_by_phone_nums(contact_list))
            .await
    }

    /// Close the session. Failures are logged and otherwise ignored.
    pub async fn close(mut self) {
        if let Err(e) = self.session.close().await {
            warn!(uri = %self.uri, "Failed to close graph store session: {}", e);
        }
    }
}
