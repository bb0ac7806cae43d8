// =============================================================================
// TABLE — Descripteur d'une table Cassandra
// =============================================================================
//
// Un TableSchema est pur : keyspace, nom, colonnes ordonnées. Aucune
// connexion ici, c'est session::Table qui l'exécute.
//
// L'ordre des colonnes est significatif : c'est l'ordre des cellules d'une
// Row pour INSERT / UPDATE et l'ordre du SELECT de toutes les colonnes.
//
// =============================================================================

use std::fmt;

use super::column::{Column, ColumnKind};
use crate::error::{OrmError, Result};

/// Description d'une table : keyspace, nom, colonnes ordonnées.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    pub keyspace: String,
    pub name: String,
    pub columns: Vec<Column>,
}

impl TableSchema {
    pub fn new(keyspace: &str, name: &str, columns: Vec<Column>) -> Self {
        TableSchema {
            keyspace: keyspace.to_string(),
            name: name.to_string(),
            columns,
        }
    }

    /// "keyspace.table"
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.keyspace, self.name)
    }

    /// "a, b, c" pour toutes les colonnes
    pub fn column_names(&self) -> String {
        join_names(&self.columns)
    }

    pub fn find_column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.is_named(name))
            .ok_or_else(|| self.not_found(name))
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.is_named(name))
    }

    /// La clé primaire mono-colonne
    pub fn primary_key_column(&self) -> Result<&Column> {
        self.first_of(ColumnKind::PrimaryKey, "<primary key>")
    }

    pub fn primary_key_columns(&self) -> Vec<&Column> {
        self.of_kind(ColumnKind::PrimaryKey)
    }

    /// La première colonne de partition
    pub fn partition_key_column(&self) -> Result<&Column> {
        self.first_of(ColumnKind::PartitionKey, "<partition key>")
    }

    pub fn partition_key_columns(&self) -> Vec<&Column> {
        self.of_kind(ColumnKind::PartitionKey)
    }

    pub fn clustering_key_columns(&self) -> Vec<&Column> {
        self.of_kind(ColumnKind::ClusteringKey)
    }

    /// Colonne qui identifie une ligne : clé primaire simple, sinon la
    /// première colonne de partition
    pub fn identifying_column(&self) -> Result<&Column> {
        self.primary_key_column()
            .or_else(|_| self.partition_key_column())
    }

    /// Colonnes de partition (PrimaryKey ou PartitionKey)
    pub fn partitioning_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.kind.is_partitioning()).collect()
    }

    /// Toutes les colonnes qui ne sont pas ordinaires, dans l'ordre
    pub fn key_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| !c.kind.is_regular()).collect()
    }

    pub fn regular_columns(&self) -> Vec<&Column> {
        self.of_kind(ColumnKind::Regular)
    }

    /// Ajoute une colonne en fin de table (après ALTER TABLE ADD)
    pub fn add_column(&mut self, column: Column) -> &mut Self {
        self.columns.push(column);
        self
    }

    /// Renomme une colonne ; renvoie false si elle n'existe pas
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.columns.iter_mut().find(|c| c.is_named(from)) {
            Some(column) => {
                column.name = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Retire une colonne (insensible à la casse) ; renvoie false si absente
    pub fn remove_column(&mut self, name: &str) -> bool {
        let before = self.columns.len();
        self.columns.retain(|c| !c.is_named(name));
        self.columns.len() != before
    }

    fn of_kind(&self, kind: ColumnKind) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.kind == kind).collect()
    }

    fn first_of(&self, kind: ColumnKind, label: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.kind == kind)
            .ok_or_else(|| self.not_found(label))
    }

    fn not_found(&self, column: &str) -> OrmError {
        OrmError::ColumnNotFound {
            table: self.full_name(),
            column: column.to_string(),
        }
    }
}

impl fmt::Display for TableSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.full_name(), self.column_names())
    }
}

/// "a, b, c"
pub fn join_names<'a>(columns: impl IntoIterator<Item = &'a Column>) -> String {
    columns
        .into_iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::datatype::DataType;
    use crate::core::paging::Order;

    fn messages() -> TableSchema {
        TableSchema::new("chat", "messages", vec![
            Column::partition_key("room", DataType::Text),
            Column::clustering_key("sent_at", DataType::Timestamp, Order::Descending),
            Column::regular("author", DataType::Text),
            Column::regular("body", DataType::Text),
        ])
    }

    #[test]
    fn test_names() {
        let table = messages();
        assert_eq!(table.full_name(), "chat.messages");
        assert_eq!(table.column_names(), "room, sent_at, author, body");
    }

    #[test]
    fn test_key_lookups() {
        let table = messages();
        assert_eq!(table.partition_key_column().unwrap().name, "room");
        assert_eq!(table.clustering_key_columns().len(), 1);
        assert_eq!(join_names(table.key_columns()), "room, sent_at");
        assert_eq!(table.identifying_column().unwrap().name, "room");
        assert!(matches!(
            table.primary_key_column(),
            Err(OrmError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_find_column_case_insensitive() {
        let table = messages();
        assert_eq!(table.find_column("AUTHOR").unwrap().name, "author");
        assert!(table.find_column("missing").is_err());
        assert_eq!(table.column_index("body"), Some(3));
    }

    #[test]
    fn test_local_column_changes() {
        let mut table = messages();
        assert!(table.rename_column("body", "content"));
        assert!(!table.rename_column("nope", "x"));
        assert!(table.remove_column("Author"));
        table.add_column(Column::regular("edited", DataType::Boolean));
        assert_eq!(table.column_names(), "room, sent_at, content, edited");
    }
}
