use rusqlite::Connection;
use std::collections::HashMap;

use crate::error::GatewayError;

/// How a column's values are carried in JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Real,
    Boolean,
}

impl ColumnKind {
    fn from_declared(declared: &str) -> Self {
        let declared = declared.to_ascii_uppercase();
        if declared.contains("BOOL") {
            ColumnKind::Boolean
        } else if declared.contains("INT") {
            ColumnKind::Integer
        } else if declared.contains("REAL") || declared.contains("FLOA") || declared.contains("DOUB") {
            ColumnKind::Real
        } else {
            ColumnKind::Text
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableSchema {
    columns: Vec<(String, ColumnKind)>,
}

impl TableSchema {
    pub fn kind(&self, column: &str) -> Option<ColumnKind> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, kind)| *kind)
    }

    pub fn has(&self, column: &str) -> bool {
        self.kind(column).is_some()
    }
}

/// Column names and kinds of every table, read once after migrations.
/// Identifiers are only ever interpolated into SQL after passing through here.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    tables: HashMap<String, TableSchema>,
}

impl Schema {
    pub fn load(conn: &Connection) -> rusqlite::Result<Self> {
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut tables = HashMap::new();
        for name in names {
            let mut info = conn.prepare("SELECT name, type FROM pragma_table_info(?1)")?;
            let columns = info
                .query_map([&name], |row| {
                    let column: String = row.get(0)?;
                    let declared: String = row.get(1)?;
                    Ok((column, ColumnKind::from_declared(&declared)))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            tables.insert(name, TableSchema { columns });
        }

        Ok(Self { tables })
    }

    pub fn table(&self, name: &str) -> Result<&TableSchema, GatewayError> {
        self.tables
            .get(name)
            .ok_or_else(|| GatewayError::UnknownTable(name.to_string()))
    }

    pub fn column(&self, table: &str, column: &str) -> Result<ColumnKind, GatewayError> {
        self.table(table)?
            .kind(column)
            .ok_or_else(|| GatewayError::UnknownColumn {
                table: table.to_string(),
                column: column.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::migrations;

    #[test]
    fn test_schema_reads_column_kinds() {
        let conn = Connection::open_in_memory().unwrap();
        migrations::run_migrations(&conn).unwrap();
        let schema = Schema::load(&conn).unwrap();

        assert_eq!(schema.column("contacts", "is_primary").unwrap(), ColumnKind::Boolean);
        assert_eq!(schema.column("deals", "value").unwrap(), ColumnKind::Real);
        assert_eq!(schema.column("deals", "probability").unwrap(), ColumnKind::Integer);
        assert_eq!(schema.column("companies", "name").unwrap(), ColumnKind::Text);
    }

    #[test]
    fn test_unknown_identifiers_are_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        migrations::run_migrations(&conn).unwrap();
        let schema = Schema::load(&conn).unwrap();

        assert!(matches!(
            schema.table("users; DROP TABLE companies"),
            Err(GatewayError::UnknownTable(_))
        ));
        assert!(matches!(
            schema.column("companies", "nope"),
            Err(GatewayError::UnknownColumn { .. })
        ));
    }
}
