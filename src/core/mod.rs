// =============================================================================
// CORE — Le modèle et la génération de CQL
// =============================================================================
//
// Ce module regroupe toute la logique pure :
// pas de réseau, pas de driver. Uniquement des descripteurs de tables,
// des conditions et le texte CQL qu'on en tire.
//
// Architecture :
//   datatype   → les types CQL (TEXT, INT, LIST<T>, MAP<K, V>...)
//   column     → une colonne et son rôle dans la clé
//   table      → le descripteur d'une table (keyspace, nom, colonnes)
//   introspect → reconstruction des colonnes depuis system_schema
//   validate   → la vérification de cohérence d'une table
//   condition  → les clauses WHERE
//   paging     → ordre, direction, pages
//   query      → génération des requêtes CQL
//   value      → une cellule typée
//   row        → une ligne de cellules
//   hydrate    → conversions Rust ⇄ cellules, trait Entity
//
// =============================================================================

pub mod datatype;
pub mod column;
pub mod table;
pub mod introspect;
pub mod validate;
pub mod condition;
pub mod paging;
pub mod query;
pub mod value;
pub mod row;
pub mod hydrate;
