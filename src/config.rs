// =============================================================================
// CONFIG — Configuration de la connexion
// =============================================================================
//
// Un fichier JSON décrit le cluster et le keyspace de l'application :
//
//   {
//     "hostname": "127.0.0.1",
//     "port": 9042,
//     "datacenter": "datacenter1",
//     "request_timeout_secs": 30,
//     "keyspace": { "name": "dulno", "replication_class": "SimpleStrategy",
//                   "replication_factor": 2 }
//   }
//
// Tout champ absent prend sa valeur par défaut.
// Chemin par défaut : configurations/database/database.json, remplacé par
// la variable d'environnement CASSANDRA_ORM_CONFIG si elle est définie.
//
// =============================================================================

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{OrmError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "configurations/database/database.json";
pub const CONFIG_PATH_ENV: &str = "CASSANDRA_ORM_CONFIG";

/// Connexion au cluster.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub hostname: String,
    pub port: u16,
    /// Datacenter local préféré par la répartition de charge
    pub datacenter: String,
    pub request_timeout_secs: u64,
    pub keyspace: KeyspaceConfig,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            hostname: "127.0.0.1".to_string(),
            port: 9042,
            datacenter: "datacenter1".to_string(),
            request_timeout_secs: 30,
            keyspace: KeyspaceConfig::default(),
        }
    }
}

/// Keyspace de l'application et sa réplication.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct KeyspaceConfig {
    pub name: String,
    pub replication_class: String,
    pub replication_factor: u32,
}

impl Default for KeyspaceConfig {
    fn default() -> Self {
        Self {
            name: "dulno".to_string(),
            replication_class: "SimpleStrategy".to_string(),
            replication_factor: 2,
        }
    }
}

impl DatabaseConfig {
    /// Lit et désérialise un fichier de configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| OrmError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| OrmError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Charge depuis le chemin par défaut (ou CASSANDRA_ORM_CONFIG).
    pub fn load_default() -> Result<Self> {
        Self::load(default_path())
    }

    pub fn from_json(raw: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Point de contact "host:port"
    pub fn contact_point(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Le chemin effectif du fichier de configuration.
pub fn default_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = DatabaseConfig::from_json(r#"{ "hostname": "cassandra.local" }"#).unwrap();
        assert_eq!(config.hostname, "cassandra.local");
        assert_eq!(config.port, 9042);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.keyspace, KeyspaceConfig::default());
        assert_eq!(config.contact_point(), "cassandra.local:9042");
    }

    #[test]
    fn test_full_document() {
        let config = DatabaseConfig::from_json(
            r#"{
                "hostname": "10.0.0.5", "port": 19042, "datacenter": "eu-west",
                "request_timeout_secs": 5,
                "keyspace": { "name": "shop", "replication_class": "NetworkTopologyStrategy", "replication_factor": 3 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.datacenter, "eu-west");
        assert_eq!(config.keyspace.name, "shop");
        assert_eq!(config.keyspace.replication_factor, 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = DatabaseConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, OrmError::ConfigIo { .. }));
    }

    #[test]
    fn test_load_invalid_json() {
        let path = std::env::temp_dir().join(format!("cassandra-orm-config-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let err = DatabaseConfig::load(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, OrmError::ConfigParse { .. }));
    }
}
