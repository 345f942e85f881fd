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

//! MySQL connection backed by `mysql_async`

use async_trait::async_trait;
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, OptsBuilder};

use super::{RelationalConnector, RelationalCursor, Row};
use crate::config::RelationalStoreConfig;
use crate::errors::DbAccessResult;

/// Character set every connection is opened with
pub const CONNECTION_CHARSET: &str = "utf8";

/// Opens single MySQL connections (no pool) from a [`RelationalStoreConfig`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlConnector;

/// One MySQL connection, used as the wrapper's only cursor
#[derive(Debug)]
pub struct MySqlCursor {
    conn: Option<Conn>,
}

impl MySqlConnector {
    fn opts(config: &RelationalStoreConfig) -> OptsBuilder {
        OptsBuilder::default()
            .ip_or_hostname(config.host.clone())
            .user(Some(config.user.clone()))
            .pass(Some(config.password.clone()))
            .db_name(Some(config.database.clone()))
            .init(vec![format!("SET NAMES {}", CONNECTION_CHARSET)])
    }
}

#[async_trait]
impl RelationalConnector for MySqlConnector {
    type Cursor = MySqlCursor;

    async fn connect(&self, config: &RelationalStoreConfig) -> DbAccessResult<MySqlCursor> {
        let conn = Conn::new(Self::opts(config)).await?;
        Ok(MySqlCursor { conn: Some(conn) })
    }
}

#[async_trait]
impl RelationalCursor for MySqlCursor {
    async fn execute(&mut self, statement: &str) -> DbAccessResult<Vec<Row>> {
        let Some(conn) = self.conn.as_mut() else {
            return Err(mysql_async::Error::from(mysql_async::DriverError::ConnectionClosed).into());
        };

        let rows: Vec<mysql_async::Row> = conn.query(statement).await?;
        Ok(rows.into_iter().map(mysql_async::Row::unwrap).collect())
    }

    async fn close(&mut self) -> DbAccessResult<()> {
        if let Some(conn) = self.conn.take() {
            conn.disconnect().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mysql_async::Opts;

    use super::*;

    #[test]
    fn test_opts_pass_settings_through_with_fixed_charset() {
        let config = RelationalStoreConfig::new("10.0.0.7", "bank_reader", "_pBK01#19_1", "bank");
        let opts = Opts::from(MySqlConnector::opts(&config));

        assert_eq!(opts.ip_or_hostname(), "10.0.0.7");
        assert_eq!(opts.user(), Some("bank_reader"));
        assert_eq!(opts.pass(), Some("_pBK01#19_1"));
        assert_eq!(opts.db_name(), Some("bank"));
        assert_eq!(opts.init(), ["SET NAMES utf8".to_string()]);
    }

    #[tokio::test]
    async fn test_execute_after_close_reports_closed_connection() {
        let mut cursor = MySqlCursor { conn: None };

        cursor.close().await.unwrap();
        let result = cursor.execute("SELECT 1").await;
        assert!(matches!(
            result,
            Err(crate::errors::DbAccessError::MySql(mysql_async::Error::Driver(
                mysql_async::DriverError::ConnectionClosed
            )))
        ));
    }
}
