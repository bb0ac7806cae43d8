// =============================================================================
// KEYSPACE — Un keyspace et son registre de tables
// =============================================================================
//
// Le Keyspace porte l'exécuteur partagé et sa configuration de réplication.
// Il tient aussi un registre des tables créées par l'application (ordre
// d'enregistrement conservé, une entrée par nom).
//
// Le registre est derrière un std::sync::Mutex : aucune section critique ne
// traverse un .await.
//
// =============================================================================

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};

use super::table::Table;
use crate::backend::Executor;
use crate::config::KeyspaceConfig;
use crate::core::column::Column;
use crate::core::introspect;
use crate::core::query;
use crate::core::table::TableSchema;
use crate::error::Result;

/// Un keyspace Cassandra.
pub struct Keyspace {
    executor: Arc<dyn Executor>,
    name: String,
    replication_class: String,
    replication_factor: u32,
    tables: Mutex<Vec<TableSchema>>,
}

impl Keyspace {
    pub fn new(
        executor: Arc<dyn Executor>,
        name: &str,
        replication_class: &str,
        replication_factor: u32,
    ) -> Self {
        Keyspace {
            executor,
            name: name.to_string(),
            replication_class: replication_class.to_string(),
            replication_factor,
            tables: Mutex::new(Vec::new()),
        }
    }

    pub fn from_config(executor: Arc<dyn Executor>, config: &KeyspaceConfig) -> Self {
        Keyspace::new(
            executor,
            &config.name,
            &config.replication_class,
            config.replication_factor,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn replication_class(&self) -> &str {
        &self.replication_class
    }

    pub fn replication_factor(&self) -> u32 {
        self.replication_factor
    }

    pub fn executor(&self) -> &Arc<dyn Executor> {
        &self.executor
    }

    // ─── DDL ─────────────────────────────────────────────────────────────────

    pub async fn create(&self) -> Result<()> {
        self.create_statement(false).await
    }

    pub async fn create_if_not_exists(&self) -> Result<()> {
        self.create_statement(true).await
    }

    async fn create_statement(&self, if_not_exists: bool) -> Result<()> {
        info!(keyspace = %self.name, "create keyspace");
        let statement = query::create_keyspace(
            &self.name,
            &self.replication_class,
            self.replication_factor,
            if_not_exists,
        );
        self.executor.execute(&statement).await?;
        Ok(())
    }

    pub async fn drop(&self) -> Result<()> {
        info!(keyspace = %self.name, "drop keyspace");
        self.executor.execute(&query::drop_keyspace(&self.name, false)).await?;
        Ok(())
    }

    pub async fn drop_if_exists(&self) -> Result<()> {
        self.executor.execute(&query::drop_keyspace(&self.name, true)).await?;
        Ok(())
    }

    /// USE keyspace
    pub async fn use_(&self) -> Result<()> {
        self.executor.execute(&query::use_keyspace(&self.name)).await?;
        Ok(())
    }

    // ─── Métadonnées ─────────────────────────────────────────────────────────

    /// Colonnes d'une table existante, lues dans system_schema.columns.
    /// Une table inconnue donne une liste vide.
    pub async fn find_table_columns(&self, table: &str) -> Result<Vec<Column>> {
        let output = self
            .executor
            .execute(&query::table_columns(&self.name, table))
            .await?;
        debug!(keyspace = %self.name, table, rows = output.rows.len(), "table columns");
        introspect::columns_from_rows(&output.rows)
    }

    pub async fn table_exists(&self, table: &str) -> Result<bool> {
        let output = self
            .executor
            .execute(&query::table_exists(&self.name, table))
            .await?;
        Ok(!output.is_empty())
    }

    /// Noms des vues matérialisées construites sur `table`.
    pub async fn find_views_of(&self, table: &str) -> Result<Vec<String>> {
        let output = self.executor.execute(&query::keyspace_views(&self.name)).await?;
        let mut views = Vec::new();
        for row in &output.rows {
            let view: String = row.get(0)?;
            let base: String = row.get(1)?;
            if base.eq_ignore_ascii_case(table) {
                views.push(view);
            }
        }
        Ok(views)
    }

    // ─── Handles de tables ───────────────────────────────────────────────────

    /// Handle sur une table de ce keyspace (aucune requête envoyée).
    pub fn table(self: &Arc<Self>, name: &str, columns: Vec<Column>) -> Table {
        Table::new(Arc::clone(self), TableSchema::new(&self.name, name, columns))
    }

    /// Handle sur une table existante, colonnes relues depuis le cluster.
    pub async fn open_table(self: &Arc<Self>, name: &str) -> Result<Table> {
        let columns = self.find_table_columns(name).await?;
        Ok(self.table(name, columns))
    }

    // ─── Registre ────────────────────────────────────────────────────────────

    /// Enregistre (ou remplace) une table
    pub fn register(&self, schema: &TableSchema) {
        let mut tables = self.lock();
        match tables.iter_mut().find(|t| t.name == schema.name) {
            Some(existing) => *existing = schema.clone(),
            None => tables.push(schema.clone()),
        }
    }

    /// Retire une table ; renvoie false si elle n'était pas enregistrée
    pub fn unregister(&self, name: &str) -> bool {
        let mut tables = self.lock();
        let before = tables.len();
        tables.retain(|t| t.name != name);
        tables.len() != before
    }

    pub fn tables(&self) -> Vec<TableSchema> {
        self.lock().clone()
    }

    pub fn find_table_by_name(&self, name: &str) -> Option<TableSchema> {
        self.lock().iter().find(|t| t.name == name).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TableSchema>> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for Keyspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keyspace")
            .field("name", &self.name)
            .field("replication_class", &self.replication_class)
            .field("replication_factor", &self.replication_factor)
            .field("executor", &self.executor.name())
            .finish()
    }
}
