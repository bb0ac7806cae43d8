// =============================================================================
// DATATYPE — Les types CQL d'une colonne
// =============================================================================
//
// Cassandra distingue les types scalaires (TEXT, INT, UUID...) et les
// collections paramétrées (LIST<T>, MAP<K, V>). Le DataType décrit un
// scalaire, le ColumnType décrit ce qu'on écrit réellement dans le DDL.
//
// EXEMPLES :
//   name TEXT
//   tags LIST<TEXT>
//   scores MAP<TEXT, INT>
//
// Le parsing accepte l'orthographe de system_schema.columns.type
// ("list<text>", "map<text, int>"), insensible à la casse.
//
// =============================================================================

use std::fmt;
use std::str::FromStr;

use crate::error::OrmError;

/// Un type scalaire CQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Ascii,
    BigInt,
    Blob,
    Boolean,
    Counter,
    Date,
    Decimal,
    Double,
    Duration,
    Float,
    Inet,
    Int,
    SmallInt,
    Text,
    Time,
    Timestamp,
    TimeUuid,
    TinyInt,
    Uuid,
    Varchar,
    Varint,
}

impl DataType {
    /// Tous les types scalaires, dans l'ordre alphabétique CQL.
    pub const ALL: [DataType; 21] = [
        DataType::Ascii,
        DataType::BigInt,
        DataType::Blob,
        DataType::Boolean,
        DataType::Counter,
        DataType::Date,
        DataType::Decimal,
        DataType::Double,
        DataType::Duration,
        DataType::Float,
        DataType::Inet,
        DataType::Int,
        DataType::SmallInt,
        DataType::Text,
        DataType::Time,
        DataType::Timestamp,
        DataType::TimeUuid,
        DataType::TinyInt,
        DataType::Uuid,
        DataType::Varchar,
        DataType::Varint,
    ];

    /// Le mot-clé CQL (majuscules)
    pub fn keyword(&self) -> &'static str {
        match self {
            DataType::Ascii => "ASCII",
            DataType::BigInt => "BIGINT",
            DataType::Blob => "BLOB",
            DataType::Boolean => "BOOLEAN",
            DataType::Counter => "COUNTER",
            DataType::Date => "DATE",
            DataType::Decimal => "DECIMAL",
            DataType::Double => "DOUBLE",
            DataType::Duration => "DURATION",
            DataType::Float => "FLOAT",
            DataType::Inet => "INET",
            DataType::Int => "INT",
            DataType::SmallInt => "SMALLINT",
            DataType::Text => "TEXT",
            DataType::Time => "TIME",
            DataType::Timestamp => "TIMESTAMP",
            DataType::TimeUuid => "TIMEUUID",
            DataType::TinyInt => "TINYINT",
            DataType::Uuid => "UUID",
            DataType::Varchar => "VARCHAR",
            DataType::Varint => "VARINT",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

impl FromStr for DataType {
    type Err = OrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        DataType::ALL
            .iter()
            .copied()
            .find(|ty| ty.keyword().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| OrmError::UnknownType(s.to_string()))
    }
}

/// Le type complet d'une colonne : scalaire ou collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Scalar(DataType),
    List(DataType),
    Map(DataType, DataType),
}

impl ColumnType {
    /// Le DataType "de tête" (LIST pour une liste, MAP pour une map)
    pub fn keyword(&self) -> &'static str {
        match self {
            ColumnType::Scalar(ty) => ty.keyword(),
            ColumnType::List(_) => "LIST",
            ColumnType::Map(_, _) => "MAP",
        }
    }

    /// Une collection ne peut pas faire partie d'une clé
    pub fn is_collection(&self) -> bool {
        !matches!(self, ColumnType::Scalar(_))
    }

    pub fn is_counter(&self) -> bool {
        matches!(self, ColumnType::Scalar(DataType::Counter))
    }
}

impl From<DataType> for ColumnType {
    fn from(ty: DataType) -> Self {
        ColumnType::Scalar(ty)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Scalar(ty) => write!(f, "{}", ty),
            ColumnType::List(ty) => write!(f, "LIST<{}>", ty),
            ColumnType::Map(k, v) => write!(f, "MAP<{}, {}>", k, v),
        }
    }
}

impl FromStr for ColumnType {
    type Err = OrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let lower = raw.to_ascii_lowercase();

        // frozen<...> ne change pas la forme de la colonne
        let lower = match lower.strip_prefix("frozen<").and_then(|r| r.strip_suffix('>')) {
            Some(inner) => inner.trim().to_string(),
            None => lower,
        };

        if let Some(inner) = collection_inner(&lower, "list") {
            return Ok(ColumnType::List(inner.parse()?));
        }
        if let Some(inner) = collection_inner(&lower, "map") {
            let (key, value) = inner
                .split_once(',')
                .ok_or_else(|| OrmError::UnknownType(raw.to_string()))?;
            return Ok(ColumnType::Map(key.parse()?, value.parse()?));
        }
        lower
            .parse::<DataType>()
            .map(ColumnType::Scalar)
            .map_err(|_| OrmError::UnknownType(raw.to_string()))
    }
}

/// Extrait "T" de "name<T>" (espaces tolérés)
fn collection_inner<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    let rest = s.strip_prefix(name)?.trim_start();
    let rest = rest.strip_prefix('<')?;
    let rest = rest.trim_end().strip_suffix('>')?;
    Some(rest.trim())
}
