// =============================================================================
// COLUMN — Une colonne de table Cassandra
// =============================================================================
//
// Une colonne = un nom, un type CQL et un rôle dans la clé primaire :
//
//   PrimaryKey     → clé primaire mono-colonne : PRIMARY KEY (id)
//   PartitionKey   → composante de la clé de partition : PRIMARY KEY ((a, b), ...)
//   ClusteringKey  → colonne de clustering : PRIMARY KEY ((a), c1, c2)
//   Regular        → colonne ordinaire
//
// Une colonne de clustering peut porter un ordre (ASC / DESC) qui finit dans
// la clause WITH CLUSTERING ORDER BY.
//
// =============================================================================

use super::datatype::{ColumnType, DataType};
use super::paging::Order;

/// Rôle d'une colonne dans la clé primaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    PrimaryKey,
    PartitionKey,
    ClusteringKey,
    Regular,
}

impl ColumnKind {
    pub fn is_primary_key(&self) -> bool {
        *self == ColumnKind::PrimaryKey
    }

    pub fn is_partition_key(&self) -> bool {
        *self == ColumnKind::PartitionKey
    }

    pub fn is_clustering_key(&self) -> bool {
        *self == ColumnKind::ClusteringKey
    }

    pub fn is_regular(&self) -> bool {
        *self == ColumnKind::Regular
    }

    /// Colonne qui décide de la partition (clé primaire simple ou partition)
    pub fn is_partitioning(&self) -> bool {
        matches!(self, ColumnKind::PrimaryKey | ColumnKind::PartitionKey)
    }
}

/// Une colonne.
///
/// L'égalité porte sur le nom, le type et le rôle ; l'ordre de clustering
/// n'en fait pas partie.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub kind: ColumnKind,
    pub order: Option<Order>,
}

impl Column {
    pub fn new(name: &str, column_type: impl Into<ColumnType>, kind: ColumnKind) -> Self {
        Column {
            name: name.to_string(),
            column_type: column_type.into(),
            kind,
            order: None,
        }
    }

    /// Colonne ordinaire
    pub fn regular(name: &str, column_type: impl Into<ColumnType>) -> Self {
        Column::new(name, column_type, ColumnKind::Regular)
    }

    pub fn primary_key(name: &str, column_type: impl Into<ColumnType>) -> Self {
        Column::new(name, column_type, ColumnKind::PrimaryKey)
    }

    pub fn partition_key(name: &str, column_type: impl Into<ColumnType>) -> Self {
        Column::new(name, column_type, ColumnKind::PartitionKey)
    }

    /// Colonne de clustering avec son ordre de tri
    pub fn clustering_key(name: &str, column_type: impl Into<ColumnType>, order: Order) -> Self {
        Column::new(name, column_type, ColumnKind::ClusteringKey).with_order(order)
    }

    /// Colonne LIST<T>
    pub fn list(name: &str, element: DataType, kind: ColumnKind) -> Self {
        Column::new(name, ColumnType::List(element), kind)
    }

    /// Colonne MAP<K, V>
    pub fn map(name: &str, key: DataType, value: DataType, kind: ColumnKind) -> Self {
        Column::new(name, ColumnType::Map(key, value), kind)
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    /// Déclaration de la colonne dans un CREATE TABLE : "name TYPE"
    pub fn definition(&self) -> String {
        format!("{} {}", self.name, self.column_type)
    }

    pub fn has_order(&self) -> bool {
        self.order.is_some()
    }

    /// Comparaison de nom insensible à la casse (Cassandra met les
    /// identifiants non quotés en minuscules)
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.column_type == other.column_type
            && self.kind == other.kind
    }
}

impl Eq for Column {}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.definition())
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column() {
        let column = Column::new("test", DataType::Text, ColumnKind::PrimaryKey);
        assert_eq!(column.name, "test");
        assert_eq!(column.column_type, ColumnType::Scalar(DataType::Text));
        assert_eq!(column.kind, ColumnKind::PrimaryKey);
        assert!(column.kind.is_primary_key());
        assert_eq!(column.definition(), "test TEXT");
    }

    #[test]
    fn test_list_column() {
        let column = Column::list("test", DataType::Text, ColumnKind::PrimaryKey);
        assert_eq!(column.name, "test");
        assert_eq!(column.column_type.keyword(), "LIST");
        assert!(column.kind.is_primary_key());
        assert_eq!(column.definition(), "test LIST<TEXT>");
    }

    #[test]
    fn test_map_column() {
        let column = Column::map("scores", DataType::Text, DataType::Int, ColumnKind::Regular);
        assert_eq!(column.definition(), "scores MAP<TEXT, INT>");
    }

    #[test]
    fn test_equality_ignores_order() {
        let a = Column::clustering_key("ts", DataType::Timestamp, Order::Descending);
        let b = Column::new("ts", DataType::Timestamp, ColumnKind::ClusteringKey);
        assert_eq!(a, b);
        assert_ne!(a, b.with_kind(ColumnKind::Regular));
    }

    #[test]
    fn test_list_differs_from_scalar() {
        let list = Column::list("tags", DataType::Text, ColumnKind::Regular);
        let scalar = Column::regular("tags", DataType::Text);
        assert_ne!(list, scalar);
    }
}
