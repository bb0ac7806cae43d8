// =============================================================================
// BACKEND RECORDING — Exécuteur en mémoire
// =============================================================================
//
// N'ouvre aucune connexion. Chaque Statement exécuté est enregistré ; la
// réponse est la prochaine sortie de la file préparée (push_output), ou une
// sortie vide quand la file est épuisée.
//
// Sert au mode démonstration du binaire (afficher le CQL sans cluster) et
// de doublure dans les tests de la couche session.
//
// =============================================================================

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use super::{Executor, QueryOutput};
use crate::core::query::Statement;
use crate::core::row::Row;
use crate::error::{OrmError, Result};

#[derive(Debug, Default)]
struct Journal {
    executed: Vec<Statement>,
    outputs: VecDeque<Result<QueryOutput>>,
}

/// Exécuteur qui enregistre les requêtes et rejoue des réponses.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    journal: Mutex<Journal>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        RecordingExecutor::default()
    }

    /// Ajoute une réponse à la file
    pub fn push_output(&self, output: QueryOutput) -> &Self {
        self.lock().outputs.push_back(Ok(output));
        self
    }

    /// Raccourci : une réponse faite de ces lignes
    pub fn push_rows(&self, rows: Vec<Row>) -> &Self {
        self.push_output(QueryOutput::new(rows))
    }

    /// La prochaine exécution échouera avec cette erreur
    pub fn push_error(&self, error: OrmError) -> &Self {
        self.lock().outputs.push_back(Err(error));
        self
    }

    /// Toutes les requêtes exécutées, dans l'ordre
    pub fn executed(&self) -> Vec<Statement> {
        self.lock().executed.clone()
    }

    /// Le texte CQL de toutes les requêtes exécutées
    pub fn executed_cql(&self) -> Vec<String> {
        self.lock().executed.iter().map(|s| s.cql.clone()).collect()
    }

    pub fn clear(&self) {
        let mut journal = self.lock();
        journal.executed.clear();
        journal.outputs.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Journal> {
        // un test qui panique en tenant le verrou ne doit pas bloquer les autres
        self.journal.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Executor for RecordingExecutor {
    async fn execute(&self, statement: &Statement) -> Result<QueryOutput> {
        debug!(cql = %statement.cql, values = statement.values.len(), "recorded statement");
        let mut journal = self.lock();
        journal.executed.push(statement.clone());
        journal.outputs.pop_front().unwrap_or_else(|| Ok(QueryOutput::empty()))
    }

    fn name(&self) -> &str {
        "recording"
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_and_replays() {
        let executor = RecordingExecutor::new();
        executor.push_rows(vec![crate::row![1i32]]);

        let first = executor.execute(&Statement::new("SELECT a FROM ks.t;")).await.unwrap();
        let second = executor.execute(&Statement::new("TRUNCATE TABLE ks.t;")).await.unwrap();

        assert_eq!(first.rows.len(), 1);
        assert!(second.is_empty());
        assert_eq!(executor.executed_cql(), vec!["SELECT a FROM ks.t;", "TRUNCATE TABLE ks.t;"]);
    }

    #[tokio::test]
    async fn test_replays_errors() {
        let executor = RecordingExecutor::new();
        executor.push_error(OrmError::driver("USE x;", "keyspace x does not exist"));
        let result = executor.execute(&Statement::new("USE x;")).await;
        assert!(matches!(result, Err(OrmError::Driver { .. })));
        assert_eq!(executor.executed().len(), 1);
    }
}
