// =============================================================================
// QUERY — Génération du CQL
// =============================================================================
//
// Chaque opération de table devient un Statement : le texte CQL (avec des
// marqueurs ?) et les valeurs à binder, dans l'ordre des marqueurs.
//
//   TableSchema + Row        → INSERT INTO ks.t (...) VALUES (?, ...);
//   TableSchema + Condition  → SELECT ... WHERE ... [LIMIT n] [ALLOW FILTERING];
//   TableSchema              → CREATE TABLE ks.t (..., PRIMARY KEY (...));
//
// Aucune exécution ici : ces fonctions sont pures et testées sur le texte
// exact qu'elles produisent.
//
// =============================================================================

use std::fmt;

use super::column::{Column, ColumnKind};
use super::condition::{ComparisonOp, Condition};
use super::paging::Order;
use super::row::Row;
use super::table::{join_names, TableSchema};
use super::value::Value;
use crate::error::{OrmError, Result};

/// Une requête prête à être exécutée.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub cql: String,
    pub values: Vec<Value>,
    /// Taille de page ; None = requête non paginée
    pub page_size: Option<i32>,
    /// Jeton de reprise (hexadécimal)
    pub paging_state: Option<String>,
}

impl Statement {
    pub fn new(cql: impl Into<String>) -> Self {
        Statement {
            cql: cql.into(),
            values: Vec::new(),
            page_size: None,
            paging_state: None,
        }
    }

    pub fn with_values(cql: impl Into<String>, values: Vec<Value>) -> Self {
        Statement {
            values,
            ..Statement::new(cql)
        }
    }

    pub fn paged(mut self, page_size: i32, paging_state: Option<String>) -> Self {
        self.page_size = Some(page_size);
        self.paging_state = paging_state.filter(|s| !s.is_empty());
        self
    }

    pub fn is_paged(&self) -> bool {
        self.page_size.is_some()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.values.is_empty() {
            return write!(f, "{}", self.cql);
        }
        let values: Vec<String> = self.values.iter().map(|v| v.to_string()).collect();
        write!(f, "{} [{}]", self.cql, values.join(", "))
    }
}

/// Options d'écriture : USING TTL / TIMESTAMP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    /// Durée de vie en secondes
    pub ttl: Option<u32>,
    /// Horodatage d'écriture en microsecondes
    pub timestamp: Option<i64>,
}

impl WriteOptions {
    pub fn none() -> Self {
        WriteOptions::default()
    }

    pub fn ttl(seconds: u32) -> Self {
        WriteOptions { ttl: Some(seconds), timestamp: None }
    }

    pub fn with_timestamp(mut self, micros: i64) -> Self {
        self.timestamp = Some(micros);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ttl.is_none() && self.timestamp.is_none()
    }

    /// " USING TTL n AND TIMESTAMP t" ou rien
    pub fn using_clause(&self) -> String {
        let mut parts = Vec::new();
        if let Some(ttl) = self.ttl {
            parts.push(format!("TTL {}", ttl));
        }
        if let Some(ts) = self.timestamp {
            parts.push(format!("TIMESTAMP {}", ts));
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!(" USING {}", parts.join(" AND "))
        }
    }
}

/// Fonctions d'agrégat CQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregation {
    Min,
    Max,
    Sum,
    Avg,
    Count,
}

impl Aggregation {
    pub fn keyword(&self) -> &'static str {
        match self {
            Aggregation::Min => "MIN",
            Aggregation::Max => "MAX",
            Aggregation::Sum => "SUM",
            Aggregation::Avg => "AVG",
            Aggregation::Count => "COUNT",
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

fn if_not_exists(flag: bool) -> &'static str {
    if flag { "IF NOT EXISTS " } else { "" }
}

fn if_exists(flag: bool) -> &'static str {
    if flag { "IF EXISTS " } else { "" }
}

// ─── Keyspace ────────────────────────────────────────────────────────────────

pub fn create_keyspace(
    name: &str,
    replication_class: &str,
    replication_factor: u32,
    if_not_exists_flag: bool,
) -> Statement {
    Statement::new(format!(
        "CREATE KEYSPACE {}{} WITH REPLICATION = {{'class' : '{}', 'replication_factor' : {}}};",
        if_not_exists(if_not_exists_flag),
        name,
        replication_class,
        replication_factor
    ))
}

pub fn drop_keyspace(name: &str, if_exists_flag: bool) -> Statement {
    Statement::new(format!("DROP KEYSPACE {}{};", if_exists(if_exists_flag), name))
}

pub fn use_keyspace(name: &str) -> Statement {
    Statement::new(format!("USE {};", name))
}

// ─── system_schema ───────────────────────────────────────────────────────────

/// Colonnes d'une table, dans l'ordre de `system_schema.columns`
pub const TABLE_COLUMNS_CQL: &str = "SELECT column_name, kind, position, type, clustering_order FROM system_schema.columns WHERE keyspace_name = ? AND table_name = ?;";

pub fn table_columns(keyspace: &str, table: &str) -> Statement {
    Statement::with_values(TABLE_COLUMNS_CQL, vec![keyspace.into(), table.into()])
}

pub fn table_exists(keyspace: &str, table: &str) -> Statement {
    Statement::with_values(
        "SELECT table_name FROM system_schema.tables WHERE keyspace_name = ? AND table_name = ?;",
        vec![keyspace.into(), table.into()],
    )
}

pub fn keyspace_views(keyspace: &str) -> Statement {
    Statement::with_values(
        "SELECT view_name, base_table_name FROM system_schema.views WHERE keyspace_name = ?;",
        vec![keyspace.into()],
    )
}

// ─── DDL table ───────────────────────────────────────────────────────────────

/// Le contenu de PRIMARY KEY (...) :
///   clé simple        → "id"
///   partition seule   → "(a, b)"
///   partition+cluster → "(a, b), c1, c2"
pub fn primary_key_clause(columns: &[&Column]) -> String {
    let primary: Vec<&Column> = columns.iter().copied().filter(|c| c.kind.is_primary_key()).collect();
    let partition: Vec<&Column> = columns.iter().copied().filter(|c| c.kind.is_partition_key()).collect();
    let clustering: Vec<&Column> = columns.iter().copied().filter(|c| c.kind.is_clustering_key()).collect();

    let mut parts = Vec::new();
    if !partition.is_empty() {
        parts.push(format!("({})", join_names(partition)));
    }
    if !primary.is_empty() {
        parts.push(join_names(primary));
    }
    if !clustering.is_empty() {
        parts.push(join_names(clustering));
    }
    parts.join(", ")
}

/// " WITH CLUSTERING ORDER BY (c1 ASC, c2 DESC)" ou rien
pub fn clustering_order_clause(columns: &[Column]) -> String {
    let ordered: Vec<String> = columns
        .iter()
        .filter_map(|c| c.order.map(|o| format!("{} {}", c.name, o)))
        .collect();
    if ordered.is_empty() {
        String::new()
    } else {
        format!(" WITH CLUSTERING ORDER BY ({})", ordered.join(", "))
    }
}

pub fn create_table(table: &TableSchema, if_not_exists_flag: bool) -> Result<Statement> {
    if table.columns.is_empty() {
        return Err(OrmError::InvalidArgument(format!(
            "table {} has no columns",
            table.full_name()
        )));
    }
    let keys = table.key_columns();
    if keys.is_empty() {
        return Err(OrmError::InvalidArgument(format!(
            "table {} has no key column",
            table.full_name()
        )));
    }
    let definitions: Vec<String> = table.columns.iter().map(Column::definition).collect();
    Ok(Statement::new(format!(
        "CREATE TABLE {}{} ({}, PRIMARY KEY ({})){};",
        if_not_exists(if_not_exists_flag),
        table.full_name(),
        definitions.join(", "),
        primary_key_clause(&keys),
        clustering_order_clause(&table.columns)
    )))
}

pub fn drop_table(table: &TableSchema, if_exists_flag: bool) -> Statement {
    Statement::new(format!("DROP TABLE {}{};", if_exists(if_exists_flag), table.full_name()))
}

pub fn truncate(table: &TableSchema) -> Statement {
    Statement::new(format!("TRUNCATE TABLE {};", table.full_name()))
}

pub fn add_column(table: &TableSchema, column: &Column) -> Statement {
    Statement::new(format!("ALTER TABLE {} ADD {};", table.full_name(), column.definition()))
}

pub fn rename_column(table: &TableSchema, from: &str, to: &str) -> Statement {
    Statement::new(format!("ALTER TABLE {} RENAME {} TO {};", table.full_name(), from, to))
}

pub fn drop_column(table: &TableSchema, column: &str) -> Statement {
    Statement::new(format!("ALTER TABLE {} DROP {};", table.full_name(), column))
}

// ─── DML ─────────────────────────────────────────────────────────────────────

fn check_arity(table: &TableSchema, row: &Row) -> Result<()> {
    if row.len() != table.columns.len() {
        return Err(OrmError::RowArity {
            expected: table.columns.len(),
            actual: row.len(),
        });
    }
    Ok(())
}

/// INSERT de toutes les colonnes de la table, dans leur ordre
pub fn insert(table: &TableSchema, row: &Row, options: WriteOptions) -> Result<Statement> {
    check_arity(table, row)?;
    Ok(Statement::with_values(
        format!(
            "INSERT INTO {} ({}) VALUES ({}){};",
            table.full_name(),
            table.column_names(),
            row.placeholders(),
            options.using_clause()
        ),
        row.cells().to_vec(),
    ))
}

/// UPDATE des colonnes ordinaires.
///
/// `row` contient une cellule par colonne de la table ; seules celles des
/// colonnes ordinaires sont bindées, puis les valeurs de la condition.
pub fn update(
    table: &TableSchema,
    condition: &Condition,
    row: &Row,
    options: WriteOptions,
) -> Result<Statement> {
    check_arity(table, row)?;
    let (assignments, mut values) = regular_cells(table, row, |c| format!("{} = ?", c.name));
    if assignments.is_empty() {
        return Err(OrmError::InvalidArgument(format!(
            "table {} has no regular column to update",
            table.full_name()
        )));
    }
    values.extend(condition.values());
    Ok(Statement::with_values(
        format!(
            "UPDATE {}{} SET {}{}{};",
            table.full_name(),
            options.using_clause(),
            assignments.join(", "),
            condition.where_clause(),
            condition.filtering_clause()
        ),
        values,
    ))
}

/// UPDATE de compteurs : chaque cellule ordinaire est un delta entier,
/// son signe choisit + ou -, sa valeur absolue est bindée.
pub fn update_counter(table: &TableSchema, condition: &Condition, row: &Row) -> Result<Statement> {
    check_arity(table, row)?;
    let mut assignments = Vec::new();
    let mut values = Vec::new();
    for (column, cell) in table.columns.iter().zip(row.cells()) {
        if !column.kind.is_regular() {
            continue;
        }
        let delta = cell.as_integer().ok_or_else(|| OrmError::TypeMismatch {
            expected: "counter delta",
            found: cell.kind_name().to_string(),
        })?;
        let magnitude = delta.checked_abs().ok_or_else(|| {
            OrmError::InvalidArgument(format!("counter delta {} out of range for {}", delta, column.name))
        })?;
        let sign = if delta >= 0 { "+" } else { "-" };
        assignments.push(format!("{0} = {0} {1} ?", column.name, sign));
        values.push(Value::Counter(magnitude));
    }
    if assignments.is_empty() {
        return Err(OrmError::InvalidArgument(format!(
            "table {} has no counter column",
            table.full_name()
        )));
    }
    values.extend(condition.values());
    Ok(Statement::with_values(
        format!(
            "UPDATE {} SET {}{}{};",
            table.full_name(),
            assignments.join(", "),
            condition.where_clause(),
            condition.filtering_clause()
        ),
        values,
    ))
}

fn regular_cells(
    table: &TableSchema,
    row: &Row,
    render: impl Fn(&Column) -> String,
) -> (Vec<String>, Vec<Value>) {
    table
        .columns
        .iter()
        .zip(row.cells())
        .filter(|(column, _)| column.kind.is_regular())
        .map(|(column, cell)| (render(column), cell.clone()))
        .unzip()
}

pub fn delete(table: &TableSchema, condition: &Condition) -> Result<Statement> {
    if condition.is_empty() {
        return Err(OrmError::InvalidArgument(format!(
            "refusing DELETE on {} without condition",
            table.full_name()
        )));
    }
    Ok(Statement::with_values(
        format!(
            "DELETE FROM {}{}{};",
            table.full_name(),
            condition.where_clause(),
            condition.filtering_clause()
        ),
        condition.values(),
    ))
}

/// Condition d'égalité sur toutes les colonnes de clé, à partir d'une ligne
/// complète de la table.
pub fn key_condition(table: &TableSchema, row: &Row) -> Result<Condition> {
    check_arity(table, row)?;
    let mut condition = Condition::empty();
    for (column, cell) in table.columns.iter().zip(row.cells()) {
        if !column.kind.is_regular() {
            condition.and(&column.name, ComparisonOp::Equal, cell.clone());
        }
    }
    if condition.is_empty() {
        return Err(OrmError::InvalidArgument(format!(
            "table {} has no key column",
            table.full_name()
        )));
    }
    Ok(condition)
}

// ─── SELECT ──────────────────────────────────────────────────────────────────

/// SELECT cols FROM ks.t [WHERE ...] [LIMIT n] [ALLOW FILTERING];
pub fn select(
    table: &TableSchema,
    columns: &str,
    condition: &Condition,
    limit: Option<u32>,
) -> Result<Statement> {
    if columns.trim().is_empty() {
        return Err(OrmError::InvalidArgument("empty column selection".into()));
    }
    let limit = limit
        .filter(|l| *l > 0)
        .map(|l| format!(" LIMIT {}", l))
        .unwrap_or_default();
    Ok(Statement::with_values(
        format!(
            "SELECT {} FROM {}{}{}{};",
            columns,
            table.full_name(),
            condition.where_clause(),
            limit,
            condition.filtering_clause()
        ),
        condition.values(),
    ))
}

pub fn select_columns(columns: &[Column]) -> String {
    join_names(columns)
}

/// Existence : toutes les colonnes, LIMIT 1
pub fn exists(table: &TableSchema, condition: &Condition) -> Result<Statement> {
    select(table, &table.column_names(), condition, Some(1))
}

pub fn count(table: &TableSchema, condition: &Condition) -> Statement {
    Statement::with_values(
        format!(
            "SELECT COUNT(*) FROM {}{}{};",
            table.full_name(),
            condition.where_clause(),
            condition.filtering_clause()
        ),
        condition.values(),
    )
}

pub fn aggregate(table: &TableSchema, aggregation: Aggregation, column: &str) -> Statement {
    Statement::new(format!("SELECT {}({}) FROM {};", aggregation, column, table.full_name()))
}

/// SELECT paginé trié sur la première colonne de clustering
pub fn paging_select(
    table: &TableSchema,
    condition: &Condition,
    order: Order,
    page_size: i32,
    paging_state: Option<String>,
) -> Result<Statement> {
    let clustering = table
        .clustering_key_columns()
        .into_iter()
        .next()
        .ok_or_else(|| OrmError::ColumnNotFound {
            table: table.full_name(),
            column: "<clustering key>".to_string(),
        })?;
    let cql = format!(
        "SELECT {} FROM {}{} ORDER BY {} {} ALLOW FILTERING;",
        table.column_names(),
        table.full_name(),
        condition.where_clause(),
        clustering.name,
        order
    );
    Ok(Statement::with_values(cql, condition.values()).paged(page_size, paging_state))
}

// ─── Index ───────────────────────────────────────────────────────────────────

/// CREATE [CUSTOM ]INDEX [IF NOT EXISTS ]ON ks.t (col)[ USING 'class'];
pub fn create_index(
    table: &TableSchema,
    column: &str,
    custom_class: Option<&str>,
    if_not_exists_flag: bool,
) -> Statement {
    let custom = if custom_class.is_some() { "CUSTOM " } else { "" };
    let using = custom_class
        .map(|class| format!(" USING '{}'", class.trim_matches('\'')))
        .unwrap_or_default();
    Statement::new(format!(
        "CREATE {}INDEX {}ON {} ({}){};",
        custom,
        if_not_exists(if_not_exists_flag),
        table.full_name(),
        column,
        using
    ))
}

/// Nom par défaut donné par Cassandra à un index : <table>_<colonne>_idx
pub fn index_name(table: &TableSchema, column: &str) -> String {
    format!("{}_{}_idx", table.full_name(), column)
}

pub fn drop_index(table: &TableSchema, column: &str, if_exists_flag: bool) -> Statement {
    Statement::new(format!(
        "DROP INDEX {}{};",
        if_exists(if_exists_flag),
        index_name(table, column)
    ))
}

// ─── Vues matérialisées ──────────────────────────────────────────────────────

/// Nom local d'une vue : <table>_<name>
pub fn view_name(table: &TableSchema, name: &str) -> String {
    format!("{}_{}", table.name, name)
}

pub fn create_materialized_view(
    table: &TableSchema,
    name: &str,
    columns: &[Column],
    if_not_exists_flag: bool,
) -> Result<Statement> {
    let keys: Vec<&Column> = columns.iter().filter(|c| !c.kind.is_regular()).collect();
    if !keys.iter().any(|c| c.kind.is_partitioning()) {
        return Err(OrmError::InvalidArgument(format!(
            "materialized view {} needs a partition key",
            name
        )));
    }
    let not_null: Vec<String> = columns
        .iter()
        .map(|c| format!("{} IS NOT NULL", c.name))
        .collect();
    let partition: Vec<&Column> = keys.iter().copied().filter(|c| c.kind.is_partitioning()).collect();
    let clustering: Vec<&Column> = keys.iter().copied().filter(|c| c.kind.is_clustering_key()).collect();
    let mut key = format!("({})", join_names(partition));
    if !clustering.is_empty() {
        key.push_str(", ");
        key.push_str(&join_names(clustering));
    }
    Ok(Statement::new(format!(
        "CREATE MATERIALIZED VIEW {}{}.{} AS SELECT * FROM {} WHERE {} PRIMARY KEY ({});",
        if_not_exists(if_not_exists_flag),
        table.keyspace,
        view_name(table, name),
        table.full_name(),
        not_null.join(" AND "),
        key
    )))
}

pub fn drop_materialized_view(keyspace: &str, view: &str, if_exists_flag: bool) -> Statement {
    Statement::new(format!(
        "DROP MATERIALIZED VIEW {}{}.{};",
        if_exists(if_exists_flag),
        keyspace,
        view
    ))
}

/// Colonnes d'une vue construite autour de `column` devenue clé `kind`.
///
///   ClusteringKey  → partition de la table, puis `column` en clustering
///   partition      → `column` en partition, puis l'ancienne partition en clustering
///
/// Les autres colonnes de clustering de la table suivent.
pub fn derive_view_columns(table: &TableSchema, column: &str, kind: ColumnKind) -> Result<Vec<Column>> {
    let chosen = table.find_column(column)?;
    let partitioning: Vec<&Column> = table.partitioning_columns();
    let mut columns = Vec::new();
    if kind.is_clustering_key() {
        columns.extend(partitioning.iter().map(|c| (*c).clone()));
    }
    columns.push(chosen.clone().with_kind(kind));
    if kind.is_partitioning() {
        columns.extend(partitioning.iter().filter(|c| !c.is_named(column)).map(|c| {
            Column::new(&c.name, c.column_type, ColumnKind::ClusteringKey)
        }));
    }
    columns.extend(
        table
            .clustering_key_columns()
            .into_iter()
            .filter(|c| !c.is_named(column))
            .cloned(),
    );
    // Clé simple transformée en partition composite : PRIMARY KEY ((x), ...)
    if kind.is_primary_key() {
        for c in columns.iter_mut().filter(|c| c.kind.is_primary_key()) {
            c.kind = ColumnKind::PartitionKey;
        }
    }
    Ok(columns)
}

/// Colonnes du descripteur de la vue : celles de la vue, puis les colonnes
/// de la table qui n'y figurent pas.
pub fn view_table_columns(table: &TableSchema, view_columns: &[Column]) -> Vec<Column> {
    let mut columns = view_columns.to_vec();
    columns.extend(
        table
            .columns
            .iter()
            .filter(|c| !view_columns.iter().any(|v| v.is_named(&c.name)))
            .map(|c| c.clone().with_kind(ColumnKind::Regular)),
    );
    columns
}
