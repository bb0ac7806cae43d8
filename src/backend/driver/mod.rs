// =============================================================================
// BACKEND DRIVER — Exécution sur un vrai cluster (crate scylla)
// =============================================================================
//
// Le driver scylla parle le protocole CQL natif : il fonctionne aussi bien
// avec Apache Cassandra qu'avec ScyllaDB.
//
// Stratégie d'exécution :
//   - requête sans valeur ni pagination → envoyée telle quelle (DDL, USE...)
//   - sinon → préparée une fois, mise en cache par texte CQL, puis exécutée
//   - page_size présent → une seule page, reprise depuis le jeton hexadécimal
//
// Une erreur du driver est journalisée avec le CQL et les valeurs, puis
// remontée en OrmError::Driver.
//
// =============================================================================

pub mod convert;

use std::collections::HashMap;
use std::fmt::Display;

use async_trait::async_trait;
use scylla::client::execution_profile::ExecutionProfile;
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use scylla::policies::load_balancing::DefaultPolicy;
use scylla::response::query_result::QueryResult;
use scylla::response::{PagingState, PagingStateResponse};
use scylla::statement::prepared::PreparedStatement;
use scylla::value::{CqlValue, Row as DriverRow};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use super::{Executor, QueryOutput};
use crate::config::DatabaseConfig;
use crate::core::query::Statement;
use crate::core::row::Row;
use crate::error::{OrmError, Result};

/// Exécuteur connecté à un cluster.
pub struct ScyllaExecutor {
    session: Session,
    prepared: RwLock<HashMap<String, PreparedStatement>>,
}

impl ScyllaExecutor {
    /// Ouvre une session : point de contact, datacenter local, timeout.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let contact_point = config.contact_point();
        info!(%contact_point, datacenter = %config.datacenter, "connecting to cassandra");

        let policy = DefaultPolicy::builder()
            .prefer_datacenter(config.datacenter.clone())
            .token_aware(true)
            .build();
        let profile = ExecutionProfile::builder()
            .load_balancing_policy(policy)
            .request_timeout(Some(config.request_timeout()))
            .build();

        let session = SessionBuilder::new()
            .known_node(contact_point.as_str())
            .default_execution_profile_handle(profile.into_handle())
            .build()
            .await
            .map_err(|e| {
                error!(%contact_point, error = %e, "connection to cassandra failed");
                OrmError::Connection(e.to_string())
            })?;

        info!(%contact_point, "connected");
        Ok(Self::from_session(session))
    }

    /// Réutilise une session déjà ouverte.
    pub fn from_session(session: Session) -> Self {
        ScyllaExecutor {
            session,
            prepared: RwLock::new(HashMap::new()),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Nombre de requêtes préparées en cache
    pub async fn prepared_count(&self) -> usize {
        self.prepared.read().await.len()
    }

    async fn prepare(&self, statement: &Statement) -> Result<PreparedStatement> {
        if let Some(prepared) = self.prepared.read().await.get(&statement.cql) {
            return Ok(prepared.clone());
        }
        let prepared = self
            .session
            .prepare(statement.cql.as_str())
            .await
            .map_err(|e| fail(statement, e))?;

        let mut cache = self.prepared.write().await;
        // une autre tâche a pu préparer la même requête entre-temps
        let entry = cache
            .entry(statement.cql.clone())
            .or_insert(prepared);
        Ok(entry.clone())
    }

    async fn run(&self, statement: &Statement) -> Result<(QueryResult, Option<String>)> {
        if statement.values.is_empty() && !statement.is_paged() {
            let result = self
                .session
                .query_unpaged(statement.cql.as_str(), ())
                .await
                .map_err(|e| fail(statement, e))?;
            return Ok((result, None));
        }

        let values = bound_values(statement)?;
        let mut prepared = self.prepare(statement).await?;

        let Some(page_size) = statement.page_size else {
            let result = self
                .session
                .execute_unpaged(&prepared, values)
                .await
                .map_err(|e| fail(statement, e))?;
            return Ok((result, None));
        };

        prepared.set_page_size(page_size);
        let paging_state = match &statement.paging_state {
            Some(state) => decode_paging_state(state)?,
            None => PagingState::start(),
        };
        let (result, response) = self
            .session
            .execute_single_page(&prepared, values, paging_state)
            .await
            .map_err(|e| fail(statement, e))?;
        let next = match response {
            PagingStateResponse::HasMorePages { state } => encode_paging_state(&state),
            PagingStateResponse::NoMorePages => None,
        };
        Ok((result, next))
    }
}

#[async_trait]
impl Executor for ScyllaExecutor {
    async fn execute(&self, statement: &Statement) -> Result<QueryOutput> {
        debug!(cql = %statement.cql, values = statement.values.len(), "execute");
        let (result, paging_state) = self.run(statement).await?;
        let rows = collect_rows(statement, result)?;
        Ok(QueryOutput { rows, paging_state })
    }

    fn name(&self) -> &str {
        "scylla"
    }
}

/// Journalise l'échec avec la requête et ses valeurs, puis le convertit.
fn fail(statement: &Statement, e: impl Display) -> OrmError {
    error!(statement = %statement, error = %e, "query failed");
    OrmError::driver(statement.cql.clone(), e)
}

fn bound_values(statement: &Statement) -> Result<Vec<Option<CqlValue>>> {
    statement.values.iter().map(convert::to_bound).collect()
}

/// Une requête qui ne renvoie pas de lignes (INSERT, DDL) donne zéro ligne.
fn collect_rows(statement: &Statement, result: QueryResult) -> Result<Vec<Row>> {
    if !result.is_rows() {
        return Ok(Vec::new());
    }
    let rows_result = result.into_rows_result().map_err(|e| fail(statement, e))?;
    let rows = rows_result
        .rows::<DriverRow>()
        .map_err(|e| fail(statement, e))?;

    let mut collected = Vec::new();
    for row in rows {
        let row = row.map_err(|e| fail(statement, e))?;
        let cells = row
            .columns
            .into_iter()
            .map(convert::from_cell)
            .collect::<Result<Vec<_>>>()?;
        collected.push(Row::new(cells));
    }
    Ok(collected)
}

fn encode_paging_state(state: &PagingState) -> Option<String> {
    state.as_bytes_slice().map(|bytes| hex::encode(&bytes[..]))
}

fn decode_paging_state(state: &str) -> Result<PagingState> {
    let bytes = hex::decode(state)
        .map_err(|e| OrmError::InvalidArgument(format!("invalid page state '{}': {}", state, e)))?;
    Ok(PagingState::new_from_raw_bytes(bytes))
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paging_state_hex_round_trip() {
        let state = decode_paging_state("cafe01").unwrap();
        assert_eq!(encode_paging_state(&state).as_deref(), Some("cafe01"));
    }

    #[test]
    fn test_invalid_paging_state() {
        assert!(matches!(
            decode_paging_state("not-hex"),
            Err(OrmError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_start_state_has_no_bytes() {
        assert_eq!(encode_paging_state(&PagingState::start()), None);
    }
}
