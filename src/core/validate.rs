// =============================================================================
// VALIDATE — Vérification d'un descripteur de table
// =============================================================================
//
// Avant d'envoyer un CREATE TABLE, on vérifie que la table est bien formée :
//   - Au moins une colonne de clé
//   - Pas deux colonnes du même nom (Cassandra ignore la casse)
//   - Une clé primaire simple est seule : pas de partition ni de clustering
//   - Un ordre de clustering seulement sur une colonne de clustering
//   - Pas de collection dans la clé
//   - Des compteurs seulement en colonnes ordinaires
//
// Toutes les erreurs sont collectées, pas seulement la première.
//
// =============================================================================

use std::collections::HashSet;

use super::table::TableSchema;
use crate::error::{OrmError, Result};

/// Vérifie qu'un TableSchema est bien formé.
pub fn validate_table(table: &TableSchema) -> Result<()> {
    let mut errors = Vec::new();

    if table.key_columns().is_empty() {
        errors.push("la table n'a aucune colonne de clé".to_string());
    }

    // Doublons
    let mut seen = HashSet::new();
    for column in &table.columns {
        if !seen.insert(column.name.to_ascii_lowercase()) {
            errors.push(format!("colonne '{}' déclarée deux fois", column.name));
        }
    }

    let primary = table.primary_key_columns().len();
    if primary > 1 {
        errors.push(format!("{} clés primaires simples, une seule autorisée", primary));
    }
    let composite = table.partition_key_columns().len() + table.clustering_key_columns().len();
    if primary > 0 && composite > 0 {
        errors.push("clé primaire simple mélangée à une clé de partition ou de clustering".to_string());
    }
    if primary == 0 && table.partition_key_columns().is_empty() && !table.clustering_key_columns().is_empty() {
        errors.push("colonnes de clustering sans clé de partition".to_string());
    }

    for column in &table.columns {
        if column.has_order() && !column.kind.is_clustering_key() {
            errors.push(format!(
                "colonne '{}' : ordre de tri sur une colonne qui n'est pas de clustering",
                column.name
            ));
        }
        if !column.kind.is_regular() && column.column_type.is_collection() {
            errors.push(format!("colonne '{}' : une collection ne peut pas être une clé", column.name));
        }
        if !column.kind.is_regular() && column.column_type.is_counter() {
            errors.push(format!("colonne '{}' : un compteur ne peut pas être une clé", column.name));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(OrmError::InvalidSchema {
            table: table.full_name(),
            errors,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::column::{Column, ColumnKind};
    use crate::core::datatype::DataType;
    use crate::core::paging::Order;

    fn errors_of(table: &TableSchema) -> Vec<String> {
        match validate_table(table) {
            Err(OrmError::InvalidSchema { errors, .. }) => errors,
            other => panic!("expected InvalidSchema, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_tables() {
        let simple = TableSchema::new("app", "users", vec![
            Column::primary_key("id", DataType::Uuid),
            Column::regular("name", DataType::Text),
        ]);
        assert!(validate_table(&simple).is_ok());

        let composite = TableSchema::new("chat", "messages", vec![
            Column::partition_key("room", DataType::Text),
            Column::clustering_key("sent_at", DataType::Timestamp, Order::Descending),
            Column::list("tags", DataType::Text, ColumnKind::Regular),
        ]);
        assert!(validate_table(&composite).is_ok());
    }

    #[test]
    fn test_no_key() {
        let table = TableSchema::new("app", "t", vec![Column::regular("x", DataType::Int)]);
        assert_eq!(errors_of(&table).len(), 1);
    }

    #[test]
    fn test_collects_all_errors() {
        let table = TableSchema::new("app", "t", vec![
            Column::primary_key("id", DataType::Int),
            Column::partition_key("ID", DataType::Int),
            Column::regular("x", DataType::Int).with_order(Order::Ascending),
            Column::list("tags", DataType::Text, ColumnKind::ClusteringKey),
        ]);
        let errors = errors_of(&table);
        // doublon, mélange de clés, ordre sur colonne ordinaire, collection en clé
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_counter_key_rejected() {
        let table = TableSchema::new("app", "t", vec![Column::primary_key("c", DataType::Counter)]);
        assert_eq!(errors_of(&table).len(), 1);
    }
}
