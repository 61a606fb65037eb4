use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use serde_json::{Map, Value};
use shared_types::UserSession;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use super::{Gateway, Projection, SelectQuery};
use crate::database::rows::{json_to_sql, row_to_json};
use crate::database::{AsyncDbConnection, Database, Schema};
use crate::error::GatewayError;

pub const LOCAL_USER_ID: &str = "local";

/// Self-contained backend on a SQLite file, for offline use and tests.
///
/// Mirrors the hosted backend's conventions: UUID ids, RFC 3339 timestamps
/// filled in on write, parents embedded under their table name, nullable
/// foreign keys that are cleared rather than cascaded when a parent goes.
pub struct SqliteGateway {
    conn: AsyncDbConnection,
    schema: Arc<Schema>,
    signed_in: AtomicBool,
}

impl SqliteGateway {
    pub fn new(database: Database) -> Self {
        Self {
            conn: database.async_connection,
            schema: database.schema,
            signed_in: AtomicBool::new(true),
        }
    }

    pub fn open(path: &Path) -> anyhow::Result<Self> {
        info!("Opening local backend at {}", path.display());
        Ok(Self::new(Database::new(path)?))
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn select_rows(
    conn: &Connection,
    schema: &Schema,
    query: &SelectQuery,
) -> Result<Vec<Value>, GatewayError> {
    let table = schema.table(query.table)?;

    let mut sql = format!("SELECT * FROM {}", query.table);
    let mut args = Vec::with_capacity(query.filters.len());
    for (index, filter) in query.filters.iter().enumerate() {
        schema.column(query.table, filter.column)?;
        sql.push_str(if index == 0 { " WHERE " } else { " AND " });
        sql.push_str(&format!("{} = ?{}", filter.column, index + 1));
        args.push(filter.value.clone());
    }

    // rowid breaks ties between rows written within the same instant
    let mut order = Vec::with_capacity(query.order.len() + 1);
    for o in &query.order {
        schema.column(query.table, o.column)?;
        order.push(format!("{} {}", o.column, if o.ascending { "ASC" } else { "DESC" }));
    }
    let newest_first = query.order.first().map(|o| !o.ascending).unwrap_or(false);
    order.push(if newest_first { "rowid DESC" } else { "rowid ASC" }.to_string());
    sql.push_str(&format!(" ORDER BY {}", order.join(", ")));

    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    if let Projection::Columns(columns) = &query.projection {
        for column in columns {
            schema.column(query.table, column)?;
        }
    }

    let mut stmt = conn.prepare(&sql)?;
    let column_names: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let mut rows = stmt
        .query_map(params_from_iter(args.iter()), |row| row_to_json(row, &column_names, table))?
        .collect::<Result<Vec<_>, _>>()?;

    for embed in &query.embeds {
        schema.column(query.table, embed.foreign_key)?;
        let parent = schema.table(embed.table)?;
        for column in &embed.columns {
            schema.column(embed.table, column)?;
        }

        let parent_sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            embed.columns.join(", "),
            embed.table
        );
        let mut parent_stmt = conn.prepare_cached(&parent_sql)?;
        let parent_columns: Vec<String> = embed.columns.iter().map(|c| c.to_string()).collect();

        for row in rows.iter_mut() {
            let embedded = match row.get(embed.foreign_key).and_then(Value::as_str) {
                Some(parent_id) => parent_stmt
                    .query_row([parent_id], |r| row_to_json(r, &parent_columns, parent))
                    .optional()?
                    .map(Value::Object)
                    .unwrap_or(Value::Null),
                None => Value::Null,
            };
            row.insert(embed.table.to_string(), embedded);
        }
    }

    if let Projection::Columns(columns) = &query.projection {
        for row in rows.iter_mut() {
            row.retain(|key, _| {
                columns.iter().any(|c| *c == key.as_str())
                    || query.embeds.iter().any(|e| e.table == key.as_str())
            });
        }
    }

    Ok(rows.into_iter().map(Value::Object).collect())
}

fn writable_columns<'a>(
    schema: &Schema,
    table: &str,
    object: &'a Map<String, Value>,
) -> Result<Vec<(&'a str, rusqlite::types::Value)>, GatewayError> {
    object
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "id" | "created_at" | "updated_at"))
        .map(|(key, value)| {
            schema.column(table, key)?;
            Ok::<_, GatewayError>((key.as_str(), json_to_sql(key, value)?))
        })
        .collect()
}

fn insert_row(
    conn: &Connection,
    schema: &Schema,
    table: &'static str,
    row: Value,
) -> Result<Value, GatewayError> {
    let Value::Object(object) = row else {
        return Err(GatewayError::InvalidRow(format!("{table}: expected an object")));
    };
    let table_schema = schema.table(table)?;

    let id = object
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let now = timestamp();

    let mut columns = vec!["id"];
    let mut values = vec![rusqlite::types::Value::Text(id.clone())];
    for stamp in ["created_at", "updated_at"] {
        if table_schema.has(stamp) {
            columns.push(stamp);
            values.push(rusqlite::types::Value::Text(now.clone()));
        }
    }
    for (column, value) in writable_columns(schema, table, &object)? {
        columns.push(column);
        values.push(value);
    }

    let placeholders = (1..=columns.len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders
    );
    conn.execute(&sql, params_from_iter(values.iter()))?;

    select_rows(conn, schema, &SelectQuery::from(table).eq("id", id.clone()))?
        .into_iter()
        .next()
        .ok_or(GatewayError::NotFound {
            table: table.to_string(),
            id,
        })
}

fn update_row(
    conn: &Connection,
    schema: &Schema,
    table: &str,
    id: &str,
    patch: Value,
) -> Result<(), GatewayError> {
    let Value::Object(object) = patch else {
        return Err(GatewayError::InvalidRow(format!("{table}: expected an object")));
    };
    let table_schema = schema.table(table)?;

    let mut assignments = Vec::new();
    let mut values = Vec::new();
    for (column, value) in writable_columns(schema, table, &object)? {
        values.push(value);
        assignments.push(format!("{} = ?{}", column, values.len()));
    }
    if table_schema.has("updated_at") {
        values.push(rusqlite::types::Value::Text(timestamp()));
        assignments.push(format!("updated_at = ?{}", values.len()));
    }
    if assignments.is_empty() {
        return Ok(());
    }

    values.push(rusqlite::types::Value::Text(id.to_string()));
    let sql = format!(
        "UPDATE {} SET {} WHERE id = ?{}",
        table,
        assignments.join(", "),
        values.len()
    );

    let changed = conn.execute(&sql, params_from_iter(values.iter()))?;
    if changed == 0 {
        return Err(GatewayError::NotFound {
            table: table.to_string(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn delete_row(conn: &Connection, schema: &Schema, table: &str, id: &str) -> Result<(), GatewayError> {
    schema.table(table)?;
    let changed = conn.execute(&format!("DELETE FROM {} WHERE id = ?1", table), [id])?;
    if changed == 0 {
        return Err(GatewayError::NotFound {
            table: table.to_string(),
            id: id.to_string(),
        });
    }
    Ok(())
}

const TABLES: [&str; 6] = [
    "companies",
    "contacts",
    "deals",
    "inventory_items",
    "tasks",
    "communications",
];

/// Resolves a runtime table name to its `'static` spelling.
fn static_table(schema: &Schema, table: &str) -> Result<&'static str, GatewayError> {
    schema.table(table)?;
    TABLES
        .iter()
        .copied()
        .find(|t| *t == table)
        .ok_or_else(|| GatewayError::UnknownTable(table.to_string()))
}

#[async_trait]
impl Gateway for SqliteGateway {
    fn kind(&self) -> &'static str {
        "local"
    }

    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, GatewayError> {
        debug!("select {} {:?}", query.table, query.to_params());
        let schema = self.schema.clone();
        let query = query.clone();
        self.conn
            .run(move |conn| select_rows(conn, &schema, &query))
            .await
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, GatewayError> {
        let schema = self.schema.clone();
        let table = static_table(&schema, table)?;
        self.conn
            .run(move |conn| insert_row(conn, &schema, table, row))
            .await
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<(), GatewayError> {
        let schema = self.schema.clone();
        let table = table.to_string();
        let id = id.to_string();
        self.conn
            .run(move |conn| update_row(conn, &schema, &table, &id, patch))
            .await
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), GatewayError> {
        let schema = self.schema.clone();
        let table = table.to_string();
        let id = id.to_string();
        self.conn
            .run(move |conn| delete_row(conn, &schema, &table, &id))
            .await
    }

    async fn current_session(&self) -> Result<Option<UserSession>, GatewayError> {
        if !self.signed_in.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(Some(UserSession {
            user_id: LOCAL_USER_ID.to_string(),
            email: None,
        }))
    }

    async fn sign_out(&self) -> Result<(), GatewayError> {
        self.signed_in.store(false, Ordering::SeqCst);
        info!("Signed out of local backend");
        Ok(())
    }
}
