// =============================================================================
// ERROR — Les erreurs de l'ORM
// =============================================================================
//
// Une seule énumération pour toute la crate : configuration, connexion,
// exécution CQL, schéma invalide et hydratation des lignes.
//
// =============================================================================

use std::path::PathBuf;

/// Erreurs de l'ORM.
#[derive(Debug, thiserror::Error)]
pub enum OrmError {
    /// Fichier de configuration illisible.
    #[error("cannot read configuration {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration JSON invalide.
    #[error("invalid configuration {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// La session vers le cluster n'a pas pu être ouverte.
    #[error("connection to cassandra failed: {0}")]
    Connection(String),

    /// Erreur remontée par le driver pendant la préparation ou l'exécution.
    #[error("query failed: {cql}: {message}")]
    Driver { cql: String, message: String },

    /// Colonne absente de la table.
    #[error("column '{column}' not found in table {table}")]
    ColumnNotFound { table: String, column: String },

    /// Type CQL inconnu (introspection).
    #[error("unknown CQL type '{0}'")]
    UnknownType(String),

    /// Le descripteur de table viole une ou plusieurs règles.
    #[error("invalid schema for {table}: {}", .errors.join("; "))]
    InvalidSchema { table: String, errors: Vec<String> },

    /// Argument refusé avant tout envoi au cluster.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// La ligne n'a pas le nombre de cellules attendu.
    #[error("row has {actual} cells, expected {expected}")]
    RowArity { expected: usize, actual: usize },

    /// Cellule d'un autre type que celui demandé.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: String },

    /// Cellule NULL lue dans une cible non optionnelle.
    #[error("unexpected null value for {0}")]
    NullValue(&'static str),
}

impl OrmError {
    /// Raccourci pour une erreur driver liée à une requête.
    pub fn driver(cql: impl Into<String>, message: impl std::fmt::Display) -> Self {
        OrmError::Driver {
            cql: cql.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OrmError>;
