// =============================================================================
// SESSION — Database, Keyspace, Table : l'API exécutable de l'ORM
// =============================================================================
//
//   Database  → la configuration + l'exécuteur partagé (Arc<dyn Executor>)
//   Keyspace  → un keyspace, son registre de tables, l'introspection
//   Table     → les opérations CRUD, index, vues et pagination
//
// Tout passe par le trait Executor : le même code tourne sur un cluster
// (ScyllaExecutor) ou sur un RecordingExecutor en test.
//
// =============================================================================

pub mod keyspace;
pub mod paging;
pub mod table;
pub mod views;

use std::sync::Arc;

use tracing::info;

use crate::backend::driver::ScyllaExecutor;
use crate::backend::Executor;
use crate::config::DatabaseConfig;
use crate::error::Result;
use keyspace::Keyspace;

/// Point d'entrée : une connexion configurée.
pub struct Database {
    executor: Arc<dyn Executor>,
    config: DatabaseConfig,
}

impl Database {
    /// Ouvre une session sur le cluster décrit par `config`.
    pub async fn connect(config: DatabaseConfig) -> Result<Self> {
        let executor = ScyllaExecutor::connect(&config).await?;
        Ok(Database::with_executor(config, Arc::new(executor)))
    }

    pub fn with_executor(config: DatabaseConfig, executor: Arc<dyn Executor>) -> Self {
        Database { executor, config }
    }

    pub fn executor(&self) -> &Arc<dyn Executor> {
        &self.executor
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Le keyspace de l'application (aucune requête envoyée)
    pub fn keyspace(&self) -> Arc<Keyspace> {
        Arc::new(Keyspace::from_config(self.executor.clone(), &self.config.keyspace))
    }

    /// Connexion + CREATE KEYSPACE IF NOT EXISTS + USE.
    pub async fn bootstrap(config: DatabaseConfig) -> Result<(Database, Arc<Keyspace>)> {
        let database = Database::connect(config).await?;
        let keyspace = database.bootstrap_keyspace().await?;
        Ok((database, keyspace))
    }

    pub async fn bootstrap_keyspace(&self) -> Result<Arc<Keyspace>> {
        let keyspace = self.keyspace();
        keyspace.create_if_not_exists().await?;
        keyspace.use_().await?;
        info!(keyspace = keyspace.name(), executor = self.executor.name(), "keyspace ready");
        Ok(keyspace)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("executor", &self.executor.name())
            .field("config", &self.config)
            .finish()
    }
}
