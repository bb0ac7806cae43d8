// =============================================================================
// INTROSPECT — Reconstruction des colonnes depuis system_schema
// =============================================================================
//
// Cassandra décrit chaque colonne d'une table dans system_schema.columns :
//
//   column_name | kind          | position | type       | clustering_order
//   ------------+---------------+----------+------------+-----------------
//   room        | partition_key |        0 | text       | none
//   sent_at     | clustering    |        0 | timestamp  | desc
//   body        | regular       |       -1 | text       | none
//
// On en déduit la liste de Column dans l'ordre canonique :
//   partition, clustering, puis colonnes ordinaires.
// Une partition mono-colonne sans clustering devient une PrimaryKey.
//
// =============================================================================

use super::column::{Column, ColumnKind};
use super::datatype::ColumnType;
use super::paging::Order;
use super::row::Row;
use crate::error::Result;

/// Une ligne de system_schema.columns, déjà typée.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescription {
    pub name: String,
    pub kind: String,
    pub position: i32,
    pub cql_type: String,
    pub clustering_order: Option<String>,
}

impl ColumnDescription {
    /// Lit une ligne produite par `query::table_columns`
    /// (column_name, kind, position, type, clustering_order).
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(ColumnDescription {
            name: row.get(0)?,
            kind: row.get(1)?,
            position: row.get(2)?,
            cql_type: row.get(3)?,
            clustering_order: row.get(4)?,
        })
    }

    fn column_kind(&self) -> ColumnKind {
        match self.kind.as_str() {
            "partition_key" => ColumnKind::PartitionKey,
            "clustering" => ColumnKind::ClusteringKey,
            _ => ColumnKind::Regular,
        }
    }

    fn order(&self) -> Option<Order> {
        match self.clustering_order.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("asc") => Some(Order::Ascending),
            Some("desc") => Some(Order::Descending),
            _ => None,
        }
    }

    fn to_column(&self) -> Result<Column> {
        let column_type: ColumnType = self.cql_type.parse()?;
        let column = Column::new(&self.name, column_type, self.column_kind());
        Ok(match self.order() {
            Some(order) if column.kind.is_clustering_key() => column.with_order(order),
            _ => column,
        })
    }
}

/// Construit les colonnes d'une table à partir de ses descriptions.
pub fn columns_from_descriptions(mut descriptions: Vec<ColumnDescription>) -> Result<Vec<Column>> {
    // tri stable : les colonnes ordinaires (position -1) gardent leur ordre
    descriptions.sort_by_key(|d| d.position);

    let mut partition = Vec::new();
    let mut clustering = Vec::new();
    let mut regular = Vec::new();
    for description in &descriptions {
        let column = description.to_column()?;
        match column.kind {
            ColumnKind::PartitionKey => partition.push(column),
            ColumnKind::ClusteringKey => clustering.push(column),
            _ => regular.push(column),
        }
    }

    if partition.len() == 1 && clustering.is_empty() {
        partition[0].kind = ColumnKind::PrimaryKey;
    }
    let mut columns = partition;
    columns.extend(clustering);
    columns.extend(regular);
    Ok(columns)
}

/// Raccourci : lignes brutes de system_schema.columns → colonnes.
pub fn columns_from_rows(rows: &[Row]) -> Result<Vec<Column>> {
    let descriptions = rows
        .iter()
        .map(ColumnDescription::from_row)
        .collect::<Result<Vec<_>>>()?;
    columns_from_descriptions(descriptions)
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::datatype::DataType;
    use crate::error::OrmError;

    fn row(name: &str, kind: &str, position: i32, ty: &str, order: &str) -> Row {
        crate::row![name, kind, position, ty, order]
    }

    #[test]
    fn test_single_partition_becomes_primary_key() {
        let rows = vec![
            row("name", "regular", -1, "text", "none"),
            row("id", "partition_key", 0, "uuid", "none"),
            row("tags", "regular", -1, "list<text>", "none"),
        ];
        let columns = columns_from_rows(&rows).unwrap();
        assert_eq!(columns[0], Column::primary_key("id", DataType::Uuid));
        assert_eq!(columns[1].name, "name");
        assert_eq!(columns[2].column_type, ColumnType::List(DataType::Text));
    }

    #[test]
    fn test_composite_key_ordering() {
        let rows = vec![
            row("body", "regular", -1, "text", "none"),
            row("seq", "clustering", 1, "int", "asc"),
            row("shard", "partition_key", 1, "int", "none"),
            row("sent_at", "clustering", 0, "timestamp", "desc"),
            row("room", "partition_key", 0, "text", "none"),
        ];
        let columns = columns_from_rows(&rows).unwrap();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["room", "shard", "sent_at", "seq", "body"]);
        assert_eq!(columns[0].kind, ColumnKind::PartitionKey);
        assert_eq!(columns[2].order, Some(Order::Descending));
        assert_eq!(columns[4].order, None);
    }

    #[test]
    fn test_unknown_type_is_error() {
        let rows = vec![row("geo", "regular", -1, "point", "none")];
        assert!(matches!(columns_from_rows(&rows), Err(OrmError::UnknownType(_))));
    }

    #[test]
    fn test_empty() {
        assert!(columns_from_rows(&[]).unwrap().is_empty());
    }
}
