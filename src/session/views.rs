// =============================================================================
// VIEWS — Index secondaires, ALTER TABLE et vues matérialisées
// =============================================================================
//
// Une vue matérialisée est nommée <table>_<nom> dans le keyspace de sa table.
// Le Table renvoyé pour une vue décrit ses colonnes : celles de la vue (avec
// leurs rôles de clé) puis les autres colonnes de la table, ordinaires.
//
// Les ALTER TABLE mettent aussi à jour le schéma local du handle et le
// registre du keyspace.
//
// =============================================================================

use futures::future::try_join_all;
use tracing::{info, warn};

use super::table::Table;
use crate::core::column::{Column, ColumnKind};
use crate::core::query;
use crate::core::table::TableSchema;
use crate::error::{OrmError, Result};

// ─── Index ───────────────────────────────────────────────────────────────────

impl Table {
    pub async fn create_index(&self, column: &str) -> Result<()> {
        self.create_custom_index(column, None, false).await
    }

    pub async fn create_index_if_not_exists(&self, column: &str) -> Result<()> {
        self.create_custom_index(column, None, true).await
    }

    /// Index CUSTOM ... USING 'class' (SASI par exemple) ; sans classe,
    /// un index secondaire classique.
    pub async fn create_custom_index(
        &self,
        column: &str,
        class: Option<&str>,
        if_not_exists: bool,
    ) -> Result<()> {
        self.schema().find_column(column)?;
        info!(table = %self.full_name(), column, "create index");
        self.run(&query::create_index(self.schema(), column, class, if_not_exists))
            .await?;
        Ok(())
    }

    pub async fn drop_index(&self, column: &str) -> Result<()> {
        self.run(&query::drop_index(self.schema(), column, false)).await?;
        Ok(())
    }

    pub async fn drop_index_if_exists(&self, column: &str) -> Result<()> {
        self.run(&query::drop_index(self.schema(), column, true)).await?;
        Ok(())
    }
}

// ─── ALTER TABLE ─────────────────────────────────────────────────────────────

impl Table {
    pub async fn add_column(&mut self, column: Column) -> Result<()> {
        if self.schema().column_index(&column.name).is_some() {
            return Err(OrmError::InvalidArgument(format!(
                "column {} already exists in {}",
                column.name,
                self.full_name()
            )));
        }
        self.run(&query::add_column(self.schema(), &column)).await?;
        self.schema_mut().add_column(column);
        self.sync_registry();
        Ok(())
    }

    /// Seules les colonnes de clustering peuvent être renommées côté
    /// Cassandra ; l'erreur du cluster est remontée telle quelle.
    pub async fn rename_column(&mut self, from: &str, to: &str) -> Result<()> {
        self.schema().find_column(from)?;
        self.run(&query::rename_column(self.schema(), from, to)).await?;
        self.schema_mut().rename_column(from, to);
        self.sync_registry();
        Ok(())
    }

    pub async fn drop_column(&mut self, column: &str) -> Result<()> {
        self.schema().find_column(column)?;
        self.run(&query::drop_column(self.schema(), column)).await?;
        self.schema_mut().remove_column(column);
        self.sync_registry();
        Ok(())
    }

    fn sync_registry(&self) {
        if self.keyspace().find_table_by_name(self.name()).is_some() {
            self.keyspace().register(self.schema());
        }
    }
}

// ─── Vues matérialisées ──────────────────────────────────────────────────────

impl Table {
    /// CREATE MATERIALIZED VIEW ks.<table>_<name> ; renvoie le handle de la vue.
    pub async fn create_materialized_view(&self, name: &str, columns: Vec<Column>) -> Result<Table> {
        self.create_view_statement(name, columns, false).await
    }

    pub async fn create_materialized_view_if_not_exists(
        &self,
        name: &str,
        columns: Vec<Column>,
    ) -> Result<Table> {
        self.create_view_statement(name, columns, true).await
    }

    /// Vue qui réindexe la table sur `column`, promue au rôle `kind`.
    pub async fn create_materialized_view_on(
        &self,
        name: &str,
        column: &str,
        kind: ColumnKind,
    ) -> Result<Table> {
        if kind.is_regular() {
            return Err(OrmError::InvalidArgument(format!(
                "view column {} must be a key column",
                column
            )));
        }
        let columns = query::derive_view_columns(self.schema(), column, kind)?;
        self.create_view_statement(name, columns, true).await
    }

    async fn create_view_statement(
        &self,
        name: &str,
        columns: Vec<Column>,
        if_not_exists: bool,
    ) -> Result<Table> {
        for column in &columns {
            self.schema().find_column(&column.name)?;
        }
        let statement = query::create_materialized_view(self.schema(), name, &columns, if_not_exists)?;
        info!(table = %self.full_name(), view = name, "create materialized view");
        self.run(&statement).await?;
        Ok(self.view_handle(name, query::view_table_columns(self.schema(), &columns)))
    }

    /// Handle sur une vue existante ; colonnes relues depuis le cluster.
    pub async fn find_materialized_view(&self, name: &str) -> Result<Table> {
        let view = query::view_name(self.schema(), name);
        let columns = self.keyspace().find_table_columns(&view).await?;
        if columns.is_empty() {
            return Err(OrmError::InvalidArgument(format!(
                "materialized view {}.{} not found",
                self.schema().keyspace,
                view
            )));
        }
        Ok(self.view_handle(name, columns))
    }

    fn view_handle(&self, name: &str, columns: Vec<Column>) -> Table {
        let schema = TableSchema::new(&self.schema().keyspace, &query::view_name(self.schema(), name), columns);
        Table::new(self.keyspace().clone(), schema)
    }

    /// Supprime toutes les vues construites sur cette table, en parallèle.
    pub async fn drop_all_views(&self) -> Result<()> {
        let views = self.keyspace().find_views_of(self.name()).await?;
        if views.is_empty() {
            return Ok(());
        }
        info!(table = %self.full_name(), count = views.len(), "drop materialized views");
        try_join_all(views.iter().map(|view| self.drop_view_named(view, false))).await?;
        Ok(())
    }

    /// Supprime la vue représentée par ce handle.
    pub async fn drop_materialized_view(&self) -> Result<()> {
        self.drop_view_named(self.name(), false).await
    }

    pub async fn drop_materialized_view_if_exists(&self) -> Result<()> {
        self.drop_view_named(self.name(), true).await
    }

    /// DROP MATERIALIZED VIEW d'un nom complet de vue du keyspace
    pub async fn drop_view_named(&self, view: &str, if_exists: bool) -> Result<()> {
        let statement = query::drop_materialized_view(&self.schema().keyspace, view, if_exists);
        self.run(&statement).await.map_err(|e| {
            warn!(view, error = %e, "drop materialized view failed");
            e
        })?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::backend::recording::RecordingExecutor;
    use crate::core::datatype::DataType;
    use crate::core::paging::Order;
    use crate::core::value::Value;
    use crate::session::keyspace::Keyspace;

    fn messages() -> (Arc<RecordingExecutor>, Table) {
        let executor = Arc::new(RecordingExecutor::new());
        let keyspace = Arc::new(Keyspace::new(executor.clone(), "chat", "SimpleStrategy", 1));
        let table = keyspace.table("messages", vec![
            Column::primary_key("id", DataType::Uuid),
            Column::regular("author", DataType::Text),
            Column::regular("body", DataType::Text),
        ]);
        (executor, table)
    }

    #[tokio::test]
    async fn test_indexes() {
        let (executor, table) = messages();
        table.create_index_if_not_exists("author").await.unwrap();
        table
            .create_custom_index("body", Some("org.apache.cassandra.index.sasi.SASIIndex"), false)
            .await
            .unwrap();
        table.drop_index_if_exists("author").await.unwrap();
        assert!(table.create_index("missing").await.is_err());

        assert_eq!(
            executor.executed_cql(),
            vec![
                "CREATE INDEX IF NOT EXISTS ON chat.messages (author);",
                "CREATE CUSTOM INDEX ON chat.messages (body) USING 'org.apache.cassandra.index.sasi.SASIIndex';",
                "DROP INDEX IF EXISTS chat.messages_author_idx;",
            ]
        );
    }

    #[tokio::test]
    async fn test_alter_updates_local_schema() {
        let (executor, mut table) = messages();
        table.add_column(Column::list("tags", DataType::Text, ColumnKind::Regular)).await.unwrap();
        table.drop_column("body").await.unwrap();
        assert!(table.add_column(Column::regular("author", DataType::Text)).await.is_err());

        let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "author", "tags"]);
        assert_eq!(
            executor.executed_cql(),
            vec![
                "ALTER TABLE chat.messages ADD tags LIST<TEXT>;",
                "ALTER TABLE chat.messages DROP body;",
            ]
        );
    }

    #[tokio::test]
    async fn test_view_on_column() {
        let (executor, table) = messages();
        let view = table
            .create_materialized_view_on("by_author", "author", ColumnKind::PartitionKey)
            .await
            .unwrap();

        assert_eq!(view.full_name(), "chat.messages_by_author");
        assert_eq!(view.schema().partition_key_column().unwrap().name, "author");
        assert_eq!(view.columns().len(), 3);
        assert_eq!(
            executor.executed_cql(),
            vec![
                "CREATE MATERIALIZED VIEW IF NOT EXISTS chat.messages_by_author AS SELECT * FROM chat.messages \
                 WHERE author IS NOT NULL AND id IS NOT NULL PRIMARY KEY ((author), id);"
            ]
        );
    }

    #[tokio::test]
    async fn test_view_requires_known_columns() {
        let (executor, table) = messages();
        let result = table
            .create_materialized_view("bad", vec![Column::partition_key("ghost", DataType::Text)])
            .await;
        assert!(matches!(result, Err(OrmError::ColumnNotFound { .. })));
        assert!(executor.executed().is_empty());
    }

    #[tokio::test]
    async fn test_find_materialized_view() {
        let (executor, table) = messages();
        executor.push_rows(vec![
            crate::row!["author", "partition_key", 0i32, "text", "none"],
            crate::row!["id", "clustering", 0i32, "uuid", "asc"],
            crate::row!["body", "regular", -1i32, "text", "none"],
        ]);
        let view = table.find_materialized_view("by_author").await.unwrap();
        assert_eq!(view.name(), "messages_by_author");
        assert_eq!(view.schema().clustering_key_columns()[0].order, Some(Order::Ascending));

        assert!(table.find_materialized_view("nothing").await.is_err());
        assert_eq!(executor.executed()[1].values[1], Value::Text("messages_nothing".into()));
    }

    #[tokio::test]
    async fn test_drop_views() {
        let (executor, table) = messages();
        executor.push_rows(vec![
            crate::row!["messages_by_author", "messages"],
            crate::row!["other_view", "other"],
        ]);
        table.drop_all_views().await.unwrap();

        let view = table
            .create_materialized_view("by_author", vec![Column::partition_key("author", DataType::Text)])
            .await
            .unwrap();
        view.drop_materialized_view_if_exists().await.unwrap();

        let cql = executor.executed_cql();
        assert_eq!(cql[1], "DROP MATERIALIZED VIEW chat.messages_by_author;");
        assert_eq!(cql[3], "DROP MATERIALIZED VIEW IF EXISTS chat.messages_by_author;");
        assert_eq!(cql.len(), 4);
    }
}
