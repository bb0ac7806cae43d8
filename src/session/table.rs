// =============================================================================
// TABLE — Handle exécutable sur une table
// =============================================================================
//
// Un Table = un TableSchema + le Keyspace (donc l'exécuteur) auquel il
// appartient. Chaque opération génère son Statement via core::query puis
// l'exécute.
//
// Les opérations sont regroupées par famille :
//   table.rs  → création, suppression, écriture, lecture, comptage
//   views.rs  → index, ALTER TABLE, vues matérialisées
//   paging.rs → pagination par partition
//
// Les opérations "par clé" utilisent la colonne identifiante : la clé
// primaire simple, sinon la première colonne de partition.
//
// =============================================================================

use std::sync::Arc;

use tracing::{debug, info};

use super::keyspace::Keyspace;
use crate::backend::QueryOutput;
use crate::core::column::Column;
use crate::core::condition::Condition;
use crate::core::hydrate::Entity;
use crate::core::query::{self, Aggregation, Statement, WriteOptions};
use crate::core::row::Row;
use crate::core::table::TableSchema;
use crate::core::validate::validate_table;
use crate::core::value::Value;
use crate::error::{OrmError, Result};

/// Une table Cassandra prête à être interrogée.
#[derive(Debug, Clone)]
pub struct Table {
    keyspace: Arc<Keyspace>,
    schema: TableSchema,
}

impl Table {
    pub fn new(keyspace: Arc<Keyspace>, schema: TableSchema) -> Self {
        Table { keyspace, schema }
    }

    pub fn keyspace(&self) -> &Arc<Keyspace> {
        &self.keyspace
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub(crate) fn schema_mut(&mut self) -> &mut TableSchema {
        &mut self.schema
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    pub fn full_name(&self) -> String {
        self.schema.full_name()
    }

    pub fn columns(&self) -> &[Column] {
        &self.schema.columns
    }

    pub(crate) async fn run(&self, statement: &Statement) -> Result<QueryOutput> {
        self.keyspace.executor().execute(statement).await
    }

    /// `colonne identifiante = value`
    fn key_condition(&self, value: impl Into<Value>) -> Result<Condition> {
        let column = self.schema.identifying_column()?;
        Ok(Condition::equal(&column.name, value))
    }
}

// ─── Création / suppression ──────────────────────────────────────────────────

impl Table {
    /// CREATE TABLE. La table est validée, créée, puis enregistrée dans le
    /// keyspace.
    pub async fn create(&self) -> Result<()> {
        self.create_statement(false).await
    }

    pub async fn create_if_not_exists(&self) -> Result<()> {
        self.create_statement(true).await
    }

    async fn create_statement(&self, if_not_exists: bool) -> Result<()> {
        validate_table(&self.schema)?;
        info!(table = %self.full_name(), "create table");
        self.run(&query::create_table(&self.schema, if_not_exists)?).await?;
        self.keyspace.register(&self.schema);
        Ok(())
    }

    /// Supprime les vues dépendantes, puis la table ; la désenregistre.
    pub async fn drop(&self) -> Result<()> {
        self.drop_statement(false).await
    }

    pub async fn drop_if_exists(&self) -> Result<()> {
        self.drop_statement(true).await
    }

    async fn drop_statement(&self, if_exists: bool) -> Result<()> {
        self.drop_all_views().await?;
        info!(table = %self.full_name(), "drop table");
        self.run(&query::drop_table(&self.schema, if_exists)).await?;
        self.keyspace.unregister(&self.schema.name);
        Ok(())
    }

    pub async fn truncate(&self) -> Result<()> {
        self.run(&query::truncate(&self.schema)).await?;
        Ok(())
    }
}

// ─── Écriture ────────────────────────────────────────────────────────────────

impl Table {
    /// INSERT d'une ligne complète (une cellule par colonne)
    pub async fn insert(&self, row: &Row) -> Result<()> {
        self.insert_with(row, WriteOptions::none()).await
    }

    pub async fn insert_with(&self, row: &Row, options: WriteOptions) -> Result<()> {
        self.run(&query::insert(&self.schema, row, options)?).await?;
        Ok(())
    }

    pub async fn insert_entity<E: Entity>(&self, entity: &E) -> Result<()> {
        self.insert(&entity.to_row()).await
    }

    /// UPDATE par clé
    pub async fn update(&self, key: impl Into<Value>, row: &Row) -> Result<()> {
        let condition = self.key_condition(key)?;
        self.update_where(&condition, row).await
    }

    pub async fn update_where(&self, condition: &Condition, row: &Row) -> Result<()> {
        self.update_with(condition, row, WriteOptions::none()).await
    }

    pub async fn update_with(&self, condition: &Condition, row: &Row, options: WriteOptions) -> Result<()> {
        self.run(&query::update(&self.schema, condition, row, options)?).await?;
        Ok(())
    }

    /// Incrémente / décrémente les compteurs de la ligne `key`
    pub async fn update_counter(&self, key: impl Into<Value>, row: &Row) -> Result<()> {
        let condition = self.key_condition(key)?;
        self.update_counter_where(&condition, row).await
    }

    pub async fn update_counter_where(&self, condition: &Condition, row: &Row) -> Result<()> {
        self.run(&query::update_counter(&self.schema, condition, row)?).await?;
        Ok(())
    }

    pub async fn delete(&self, key: impl Into<Value>) -> Result<()> {
        let condition = self.key_condition(key)?;
        self.delete_where(&condition).await
    }

    pub async fn delete_where(&self, condition: &Condition) -> Result<()> {
        self.run(&query::delete(&self.schema, condition)?).await?;
        Ok(())
    }
}

// ─── Lecture ─────────────────────────────────────────────────────────────────

impl Table {
    /// Une valeur de clé NULL n'existe jamais.
    pub async fn exists(&self, key: impl Into<Value>) -> Result<bool> {
        let key = key.into();
        if key.is_null() {
            return Ok(false);
        }
        let condition = self.key_condition(key)?;
        self.exists_where(&condition).await
    }

    pub async fn exists_where(&self, condition: &Condition) -> Result<bool> {
        let output = self.run(&query::exists(&self.schema, condition)?).await?;
        Ok(!output.is_empty())
    }

    /// Existence d'une ligne complète, d'après ses colonnes de clé
    pub async fn exists_row(&self, row: &Row) -> Result<bool> {
        let condition = query::key_condition(&self.schema, row)?;
        self.exists_where(&condition).await
    }

    pub async fn select_all_rows(&self) -> Result<Vec<Row>> {
        self.select_rows(&Condition::empty()).await
    }

    pub async fn select_all_rows_columns(&self, columns: &[&str]) -> Result<Vec<Row>> {
        self.select_rows_columns(&Condition::empty(), columns).await
    }

    /// La ligne de clé `key`, si elle existe
    pub async fn select_row(&self, key: impl Into<Value>) -> Result<Option<Row>> {
        let condition = self.key_condition(key)?;
        self.select_row_where(&condition).await
    }

    pub async fn select_row_where(&self, condition: &Condition) -> Result<Option<Row>> {
        Ok(self.select_rows(condition).await?.into_iter().next())
    }

    pub async fn select_row_columns(&self, condition: &Condition, columns: &[&str]) -> Result<Option<Row>> {
        Ok(self
            .select_rows_columns(condition, columns)
            .await?
            .into_iter()
            .next())
    }

    pub async fn select_rows(&self, condition: &Condition) -> Result<Vec<Row>> {
        self.select(condition, &self.schema.column_names(), None).await
    }

    pub async fn select_rows_limit(&self, condition: &Condition, limit: u32) -> Result<Vec<Row>> {
        self.select(condition, &self.schema.column_names(), Some(limit)).await
    }

    pub async fn select_rows_columns(&self, condition: &Condition, columns: &[&str]) -> Result<Vec<Row>> {
        self.select(condition, &columns.join(", "), None).await
    }

    async fn select(&self, condition: &Condition, columns: &str, limit: Option<u32>) -> Result<Vec<Row>> {
        let output = self
            .run(&query::select(&self.schema, columns, condition, limit)?)
            .await?;
        debug!(table = %self.full_name(), rows = output.rows.len(), "select");
        Ok(output.rows)
    }

    pub async fn select_entity<E: Entity>(&self, key: impl Into<Value>) -> Result<Option<E>> {
        self.select_row(key)
            .await?
            .map(|row| E::from_row(&row))
            .transpose()
    }

    pub async fn select_entities<E: Entity>(&self, condition: &Condition) -> Result<Vec<E>> {
        self.select_rows(condition)
            .await?
            .iter()
            .map(E::from_row)
            .collect()
    }

    pub async fn count(&self) -> Result<u64> {
        self.count_where(&Condition::empty()).await
    }

    pub async fn count_where(&self, condition: &Condition) -> Result<u64> {
        let output = self.run(&query::count(&self.schema, condition)).await?;
        match output.single_value() {
            Value::Null => Ok(0),
            value => value
                .as_integer()
                .and_then(|n| u64::try_from(n).ok())
                .ok_or_else(|| OrmError::TypeMismatch {
                    expected: "count",
                    found: value.kind_name().to_string(),
                }),
        }
    }

    /// MIN / MAX / SUM / AVG / COUNT d'une colonne ; NULL si aucun résultat
    pub async fn aggregate(&self, aggregation: Aggregation, column: &str) -> Result<Value> {
        self.schema.find_column(column)?;
        let output = self.run(&query::aggregate(&self.schema, aggregation, column)).await?;
        Ok(output.single_value())
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::RecordingExecutor;
    use crate::core::datatype::DataType;
    use crate::core::hydrate::FromValue;
    use uuid::Uuid;

    #[derive(Debug, PartialEq)]
    struct User {
        id: Uuid,
        name: String,
        age: i32,
    }

    impl Entity for User {
        fn to_row(&self) -> Row {
            crate::row![self.id, self.name.as_str(), self.age]
        }

        fn from_row(row: &Row) -> Result<Self> {
            Ok(User { id: row.get(0)?, name: row.get(1)?, age: row.get(2)? })
        }
    }

    fn users() -> (Arc<RecordingExecutor>, Table) {
        let executor = Arc::new(RecordingExecutor::new());
        let keyspace = Arc::new(Keyspace::new(executor.clone(), "app", "SimpleStrategy", 1));
        let table = keyspace.table("users", vec![
            Column::primary_key("id", DataType::Uuid),
            Column::regular("name", DataType::Text),
            Column::regular("age", DataType::Int),
        ]);
        (executor, table)
    }

    #[tokio::test]
    async fn test_create_registers_table() {
        let (executor, table) = users();
        table.create_if_not_exists().await.unwrap();
        assert_eq!(
            executor.executed_cql(),
            vec!["CREATE TABLE IF NOT EXISTS app.users (id UUID, name TEXT, age INT, PRIMARY KEY (id));"]
        );
        assert!(table.keyspace().find_table_by_name("users").is_some());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_table() {
        let executor = Arc::new(RecordingExecutor::new());
        let keyspace = Arc::new(Keyspace::new(executor.clone(), "app", "SimpleStrategy", 1));
        let table = keyspace.table("bad", vec![Column::regular("x", DataType::Int)]);
        assert!(matches!(table.create().await, Err(OrmError::InvalidSchema { .. })));
        assert!(executor.executed().is_empty());
    }

    #[tokio::test]
    async fn test_drop_drops_views_then_table() {
        let (executor, table) = users();
        table.create().await.unwrap();
        executor.clear();
        executor.push_rows(vec![crate::row!["users_by_name", "users"]]);

        table.drop().await.unwrap();

        assert_eq!(
            executor.executed_cql(),
            vec![
                "SELECT view_name, base_table_name FROM system_schema.views WHERE keyspace_name = ?;",
                "DROP MATERIALIZED VIEW app.users_by_name;",
                "DROP TABLE app.users;",
            ]
        );
        assert!(table.keyspace().find_table_by_name("users").is_none());
    }

    #[tokio::test]
    async fn test_failed_create_leaves_registry_untouched() {
        let (executor, table) = users();
        executor.push_error(OrmError::driver("CREATE TABLE app.users", "unavailable"));
        assert!(matches!(table.create().await, Err(OrmError::Driver { .. })));
        assert!(table.keyspace().find_table_by_name("users").is_none());
    }

    #[tokio::test]
    async fn test_failed_drop_keeps_table_registered() {
        let (executor, table) = users();
        table.create().await.unwrap();
        executor.push_rows(Vec::new());
        executor.push_error(OrmError::driver("DROP TABLE app.users;", "timeout"));

        assert!(matches!(table.drop().await, Err(OrmError::Driver { .. })));
        assert!(table.keyspace().find_table_by_name("users").is_some());
    }

    #[tokio::test]
    async fn test_insert_entity_and_select_entity() {
        let (executor, table) = users();
        let user = User { id: Uuid::nil(), name: "alice".into(), age: 30 };
        table.insert_entity(&user).await.unwrap();

        executor.push_rows(vec![user.to_row()]);
        let found: Option<User> = table.select_entity(Uuid::nil()).await.unwrap();
        assert_eq!(found, Some(user));

        let cql = executor.executed_cql();
        assert_eq!(cql[0], "INSERT INTO app.users (id, name, age) VALUES (?, ?, ?);");
        assert_eq!(cql[1], "SELECT id, name, age FROM app.users WHERE id = ?;");
    }

    #[tokio::test]
    async fn test_select_row_missing_is_none() {
        let (_, table) = users();
        assert_eq!(table.select_row(Uuid::nil()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_by_key() {
        let (executor, table) = users();
        let row = crate::row![Uuid::nil(), "bob", 41i32];
        table.update(Uuid::nil(), &row).await.unwrap();
        let statement = &executor.executed()[0];
        assert_eq!(statement.cql, "UPDATE app.users SET name = ?, age = ? WHERE id = ?;");
        assert_eq!(statement.values[2], Value::Uuid(Uuid::nil()));
    }

    #[tokio::test]
    async fn test_exists() {
        let (executor, table) = users();
        assert!(!table.exists(Option::<Uuid>::None).await.unwrap());
        assert!(executor.executed().is_empty());

        executor.push_rows(vec![crate::row![Uuid::nil(), "alice", 30i32]]);
        assert!(table.exists(Uuid::nil()).await.unwrap());
        assert!(!table.exists_row(&crate::row![Uuid::nil(), "x", 1i32]).await.unwrap());
        assert_eq!(
            executor.executed_cql()[0],
            "SELECT id, name, age FROM app.users WHERE id = ? LIMIT 1;"
        );
    }

    #[tokio::test]
    async fn test_count_and_aggregate() {
        let (executor, table) = users();
        executor.push_rows(vec![crate::row![7i64]]);
        assert_eq!(table.count().await.unwrap(), 7);

        executor.push_rows(vec![crate::row![33i32]]);
        let avg = table.aggregate(Aggregation::Avg, "age").await.unwrap();
        assert_eq!(i32::from_value(&avg).unwrap(), 33);

        assert!(table.aggregate(Aggregation::Max, "nope").await.is_err());
        assert_eq!(
            executor.executed_cql(),
            vec!["SELECT COUNT(*) FROM app.users;", "SELECT AVG(age) FROM app.users;"]
        );
    }

    #[tokio::test]
    async fn test_select_columns_and_limit() {
        let (executor, table) = users();
        table.select_all_rows_columns(&["name", "age"]).await.unwrap();
        table.select_rows_limit(&Condition::empty(), 5).await.unwrap();
        assert_eq!(
            executor.executed_cql(),
            vec!["SELECT name, age FROM app.users;", "SELECT id, name, age FROM app.users LIMIT 5;"]
        );
    }

    #[tokio::test]
    async fn test_driver_error_propagates() {
        let (executor, table) = users();
        executor.push_error(OrmError::driver("TRUNCATE TABLE app.users;", "unavailable"));
        assert!(matches!(table.truncate().await, Err(OrmError::Driver { .. })));
    }
}
