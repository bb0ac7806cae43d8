// =============================================================================
// CASSANDRA ORM — Accès typé à Apache Cassandra / ScyllaDB
// =============================================================================
//
// Une table se décrit par ses colonnes ; l'ORM en déduit le CQL (DDL, DML,
// SELECT, index, vues matérialisées, pagination) et l'exécute.
//
// Architecture :
//   core/     → Le modèle pur : types, colonnes, conditions, génération CQL
//   backend/  → L'exécution (driver scylla, enregistreur pour les tests)
//   session/  → Database / Keyspace / Table, l'API asynchrone
//   config    → Fichier JSON de connexion
//   error     → OrmError
//
// Concepts fondamentaux :
//   Row       = cellules positionnelles, dans l'ordre des colonnes
//   Condition = comparaisons jointes par AND, valeurs bindées
//   Page      = une page + le jeton pour reprendre la lecture
//
// =============================================================================

pub mod core;
pub mod backend;
pub mod config;
pub mod error;
pub mod session;

pub use crate::config::DatabaseConfig;
pub use crate::core::column::{Column, ColumnKind};
pub use crate::core::condition::{ComparisonOp, Condition, Filtering};
pub use crate::core::datatype::{ColumnType, DataType};
pub use crate::core::hydrate::{Blob, Entity, FromValue};
pub use crate::core::paging::{Direction, Order, Page};
pub use crate::core::query::{Aggregation, Statement, WriteOptions};
pub use crate::core::row::Row;
pub use crate::core::value::Value;
pub use crate::error::{OrmError, Result};
pub use crate::session::keyspace::Keyspace;
pub use crate::session::table::Table;
pub use crate::session::Database;
