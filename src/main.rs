// =============================================================================
// CASSANDRA ORM — Point d'entrée : démonstration de l'ORM
// =============================================================================
//
// Sans argument, le main.rs déroule un exemple complet sur un exécuteur
// d'enregistrement et affiche le CQL généré :
//   1. Préparer le keyspace
//   2. Décrire et créer une table (clé de partition + clustering)
//   3. Écrire, lire, compter
//   4. Index et vue matérialisée
//   5. Pagination d'une partition
//
// Avec --connect, la configuration par défaut (ou CASSANDRA_ORM_CONFIG) est
// chargée et le keyspace est préparé sur le vrai cluster.
//
// Les logs se règlent avec RUST_LOG (par défaut : info).
//
// =============================================================================

use std::sync::Arc;

use cassandra_orm::backend::recording::RecordingExecutor;
use cassandra_orm::backend::QueryOutput;
use cassandra_orm::core::validate;
use cassandra_orm::{
    row, Aggregation, Column, ColumnKind, ComparisonOp, Condition, DataType, Database,
    DatabaseConfig, Order, Result, Value, WriteOptions,
};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if std::env::args().any(|arg| arg == "--connect") {
        return connect().await;
    }
    demo().await
}

async fn connect() -> Result<()> {
    let config = DatabaseConfig::load_default()?;
    let (_database, keyspace) = Database::bootstrap(config).await?;
    println!("✓ Keyspace {} prêt", keyspace.name());
    for table in keyspace.find_views_of("messages").await? {
        println!("  vue : {}", table);
    }
    Ok(())
}

async fn demo() -> Result<()> {
    println!("╔══════════════════════════════════════════════════╗");
    println!("║      CASSANDRA ORM — Tables typées en Rust       ║");
    println!("║      Génération et exécution de CQL              ║");
    println!("╚══════════════════════════════════════════════════╝\n");

    let recorder = Arc::new(RecordingExecutor::new());
    let database = Database::with_executor(DatabaseConfig::default(), recorder.clone());

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 1 : Keyspace
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 1 : Keyspace ═══\n");

    let keyspace = database.bootstrap_keyspace().await?;
    print_executed(&recorder);

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 2 : Table
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 2 : Table messages ═══\n");

    let messages = keyspace.table("messages", vec![
        Column::partition_key("room", DataType::Text),
        Column::clustering_key("sent_at", DataType::Timestamp, Order::Descending),
        Column::regular("id", DataType::Uuid),
        Column::regular("author", DataType::Text),
        Column::regular("body", DataType::Text),
        Column::list("tags", DataType::Text, ColumnKind::Regular),
    ]);
    println!("{}\n", messages.schema());

    let broken = keyspace.table("broken", vec![Column::regular("x", DataType::Int)]);
    if let Err(e) = validate::validate_table(broken.schema()) {
        println!("✗ {}\n", e);
    }

    messages.create_if_not_exists().await?;
    print_executed(&recorder);

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 3 : Écriture et lecture
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 3 : Écriture et lecture ═══\n");

    let tags = Value::list(["rust", "cql"]);
    let sent_at = Value::Timestamp(1_700_000_000_000);
    let row = row!["general", sent_at, Uuid::nil(), "alice", "bonjour", tags];
    messages.insert_with(&row, WriteOptions::ttl(86_400)).await?;

    let mut recent = Condition::equal("room", "general");
    recent.and("sent_at", ComparisonOp::Greater, Value::Timestamp(1_600_000_000_000));
    messages.select_rows_limit(&recent, 20).await?;

    recorder.push_rows(vec![row![3i64]]);
    println!("  {} messages dans general", messages.count_where(&Condition::equal("room", "general")).await?);
    messages.aggregate(Aggregation::Max, "sent_at").await?;
    messages.delete("general").await?;
    print_executed(&recorder);

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 4 : Index et vue matérialisée
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 4 : Index et vue matérialisée ═══\n");

    messages.create_index_if_not_exists("author").await?;
    let by_author = messages
        .create_materialized_view_on("by_author", "author", ColumnKind::PartitionKey)
        .await?;
    println!("{}\n", by_author.schema());
    print_executed(&recorder);

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 5 : Pagination
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 5 : Pagination ═══\n");

    recorder.push_rows(vec![row![12i64]]);
    recorder.push_output(QueryOutput::new(vec![row.clone()]).with_paging_state("0a0b"));
    let page = messages
        .select_page("general", &Condition::empty(), Order::Descending, 5, 0)
        .await?;
    println!(
        "  page 1/{} : {} ligne(s), jeton '{}'",
        page.page_count,
        page.content.len(),
        page.page_state
    );
    print_executed(&recorder);

    println!("═══════════════════════════════════════════════════");
    println!("Démonstration terminée !");
    println!("  {} table(s) enregistrée(s) dans {}", keyspace.tables().len(), keyspace.name());
    println!("═══════════════════════════════════════════════════");
    Ok(())
}

/// Affiche puis oublie les requêtes enregistrées
fn print_executed(recorder: &RecordingExecutor) {
    for statement in recorder.executed() {
        println!("{}", statement);
    }
    println!();
    recorder.clear();
}
