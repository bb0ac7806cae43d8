// =============================================================================
// BACKEND — Exécution des requêtes CQL
// =============================================================================
//
// Le backend reçoit un Statement (texte CQL + valeurs) et renvoie les lignes.
// Grâce au trait Executor, on peut brancher :
//   - driver    → un vrai cluster Cassandra / ScyllaDB (crate scylla)
//   - recording → un exécuteur en mémoire qui enregistre les requêtes et
//                 rejoue des résultats préparés (dry-run, tests)
//
// Le module core ne connaît JAMAIS les backends.
//
// =============================================================================

pub mod driver;
pub mod recording;

use async_trait::async_trait;

use crate::core::hydrate::FromValue;
use crate::core::query::Statement;
use crate::core::row::Row;
use crate::core::value::Value;
use crate::error::Result;

/// Le résultat d'une requête.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryOutput {
    pub rows: Vec<Row>,
    /// Jeton hexadécimal de la page suivante, présent seulement s'il en reste
    pub paging_state: Option<String>,
}

impl QueryOutput {
    pub fn new(rows: Vec<Row>) -> Self {
        QueryOutput { rows, paging_state: None }
    }

    pub fn empty() -> Self {
        QueryOutput::default()
    }

    pub fn with_paging_state(mut self, state: impl Into<String>) -> Self {
        self.paging_state = Some(state.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first_row(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Première cellule de la première ligne (COUNT, agrégats). NULL si vide.
    pub fn single_value(&self) -> Value {
        self.rows
            .first()
            .and_then(|row| row.cell(0))
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Première colonne de chaque ligne, convertie
    pub fn first_column<T: FromValue>(&self) -> Result<Vec<T>> {
        self.rows.iter().map(|row| row.get(0)).collect()
    }
}

/// Trait abstrait pour tout ce qui sait exécuter du CQL.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Exécute une requête. Une requête paginée (page_size) ne renvoie
    /// qu'une page et le jeton de la suivante.
    async fn execute(&self, statement: &Statement) -> Result<QueryOutput>;

    /// Retourne le nom du backend
    fn name(&self) -> &str;
}
