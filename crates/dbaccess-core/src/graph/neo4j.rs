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

//! Neo4j session backed by `neo4rs`

use std::collections::HashMap;

use async_trait::async_trait;
use futures::{stream, StreamExt};
use neo4rs::{
    BoltBoolean, BoltFloat, BoltList, BoltMap, BoltNull, BoltString, BoltType,
    ConfigBuilder, Graph, Node, Relation, Row,
};

use super::types::{CypherQuery, EdgeData, GraphRecord, GraphValue, NodeData, PropertyValue};
use super::{GraphDriver, GraphRecordStream, GraphSession};
use crate::config::GraphStoreConfig;
use crate::errors::{DbAccessError, DbAccessResult};

/// Opens Neo4j sessions from a [`GraphStoreConfig`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Neo4jDriver;

/// Session over a `neo4rs` graph handle, released by `close`
pub struct Neo4jSession {
    graph: Option<Graph>,
}

#[async_trait]
impl GraphDriver for Neo4jDriver {
    type Session = Neo4jSession;

    async fn open_session(&self, config: &GraphStoreConfig) -> DbAccessResult<Neo4jSession> {
        let neo4j_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .build()?;

        let graph = Graph::connect(neo4j_config).await?;
        Ok(Neo4jSession { graph: Some(graph) })
    }
}

impl From<PropertyValue> for BoltType {
    fn from(value: PropertyValue) -> Self {
        match value {
            PropertyValue::String(s) => s.into(),
            PropertyValue::Integer(i) => i.into(),
            PropertyValue::Float(f) => BoltType::Float(BoltFloat::new(f)),
            PropertyValue::Boolean(b) => BoltType::Boolean(BoltBoolean::new(b)),
            PropertyValue::Null => BoltType::Null(BoltNull),
            PropertyValue::List(items) => BoltType::List(BoltList {
                value: items.into_iter().map(BoltType::from).collect(),
            }),
            PropertyValue::Map(entries) => BoltType::Map(BoltMap {
                value: entries
                    .into_iter()
                    .map(|(key, value)| (BoltString::new(&key), BoltType::from(value)))
                    .collect(),
            }),
        }
    }
}

impl Neo4jSession {
    fn bolt_to_property(bolt: &BoltType) -> PropertyValue {
        match bolt {
            BoltType::String(s) => PropertyValue::String(s.value.clone()),
            BoltType::Integer(i) => PropertyValue::Integer(i.value),
            BoltType::Float(f) => PropertyValue::Float(f.value),
            BoltType::Boolean(b) => PropertyValue::Boolean(b.value),
            BoltType::Null(_) => PropertyValue::Null,
            BoltType::List(list) => {
                PropertyValue::List(list.value.iter().map(Self::bolt_to_property).collect())
            }
            BoltType::Map(map) => PropertyValue::Map(
                map.value
                    .iter()
                    .map(|(key, value)| (key.value.clone(), Self::bolt_to_property(value)))
                    .collect(),
            ),
            // Temporal and spatial values keep their driver rendering
            other => PropertyValue::String(format!("{:?}", other)),
        }
    }

    fn node_to_data(node: &Node) -> NodeData {
        let properties = node
            .keys()
            .into_iter()
            .filter_map(|key| {
                let value = node.get::<BoltType>(key).ok()?;
                Some((key.to_string(), Self::bolt_to_property(&value)))
            })
            .collect();

        NodeData {
            id: node.id(),
            labels: node.labels().into_iter().map(str::to_string).collect(),
            properties,
        }
    }

    fn relation_to_data(rel: &Relation) -> EdgeData {
        let properties: HashMap<String, PropertyValue> = rel
            .keys()
            .into_iter()
            .filter_map(|key| {
                let value = rel.get::<BoltType>(key).ok()?;
                Some((key.to_string(), Self::bolt_to_property(&value)))
            })
            .collect();

        EdgeData {
            id: rel.id(),
            relationship_type: rel.typ().to_string(),
            source_id: rel.start_node_id(),
            target_id: rel.end_node_id(),
            properties,
        }
    }

    fn row_to_record(row: &Row, columns: &[&str]) -> DbAccessResult<GraphRecord> {
        let mut record = GraphRecord::default();
        for column in columns {
            let value = if let Ok(node) = row.get::<Node>(column) {
                GraphValue::Node(Self::node_to_data(&node))
            } else if let Ok(rel) = row.get::<Relation>(column) {
                GraphValue::Relationship(Self::relation_to_data(&rel))
            } else {
                return Err(DbAccessError::Record {
                    column: column.to_string(),
                });
            };
            record.insert(*column, value);
        }
        Ok(record)
    }
}

#[async_trait]
impl GraphSession for Neo4jSession {
    async fn run(&self, query: CypherQuery) -> DbAccessResult<GraphRecordStream> {
        let Some(graph) = self.graph.as_ref() else {
            return Err(neo4rs::Error::ConnectionError.into());
        };

        let columns = query.columns;
        let statement = query
            .params
            .into_iter()
            .fold(neo4rs::query(query.text), |statement, (key, value)| {
                statement.param(&key, BoltType::from(value))
            });

        let rows = graph.execute(statement).await?;

        let records = stream::try_unfold(rows, move |mut rows| async move {
            let Some(row) = rows.next().await? else {
                return Ok::<_, DbAccessError>(None);
            };
            let record = Self::row_to_record(&row, columns)?;
            Ok(Some((record, rows)))
        });

        Ok(records.boxed())
    }

    async fn close(&mut self) -> DbAccessResult<()> {
        // neo4rs has no explicit shutdown; the pool goes with the last Graph handle
        drop(self.graph.take());
        Ok(())
    }
}
