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

//! Values, queries and records exchanged with the graph store

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A property or parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
    List(Vec<PropertyValue>),
    Map(HashMap<String, PropertyValue>),
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl<T: Into<PropertyValue>> From<Vec<T>> for PropertyValue {
    fn from(values: Vec<T>) -> Self {
        PropertyValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// A node as returned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: i64,
    pub labels: Vec<String>,
    pub properties: HashMap<String, PropertyValue>,
}

impl NodeData {
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }
}

/// A relationship as returned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    pub id: i64,
    pub relationship_type: String,
    pub source_id: i64,
    pub target_id: i64,
    pub properties: HashMap<String, PropertyValue>,
}

/// One returned column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphValue {
    Node(NodeData),
    Relationship(EdgeData),
}

impl GraphValue {
    pub fn as_node(&self) -> Option<&NodeData> {
        match self {
            GraphValue::Node(node) => Some(node),
            GraphValue::Relationship(_) => None,
        }
    }

    pub fn as_relationship(&self) -> Option<&EdgeData> {
        match self {
            GraphValue::Relationship(edge) => Some(edge),
            GraphValue::Node(_) => None,
        }
    }
}

/// One result row, keyed by `RETURN` column name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphRecord {
    pub columns: HashMap<String, GraphValue>,
}

impl GraphRecord {
    pub fn get(&self, column: &str) -> Option<&GraphValue> {
        self.columns.get(column)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: GraphValue) {
        self.columns.insert(column.into(), value);
    }
}

/// A Cypher statement with bound parameters and the columns it returns
#[derive(Debug, Clone, PartialEq)]
pub struct CypherQuery {
    pub text: &'static str,
    pub params: HashMap<String, PropertyValue>,
    pub columns: &'static [&'static str],
}

impl CypherQuery {
    pub fn new(text: &'static str, columns: &'static [&'static str]) -> Self {
        Self {
            text,
            params: HashMap::new(),
            columns,
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }
}
