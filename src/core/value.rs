// =============================================================================
// VALUE — Une cellule CQL
// =============================================================================
//
// Chaque cellule d'une ligne contient une Value. C'est le pivot entre le
// monde typé de l'application (i32, String, Uuid...) et le driver.
//
// Les accesseurs typés renvoient Option : une cellule d'un autre type ou
// NULL donne None (jamais de valeur sentinelle du genre -1).
//
// =============================================================================

use std::fmt;
use std::net::IpAddr;

use uuid::Uuid;

use super::datatype::DataType;

/// Une valeur concrète lue ou écrite dans une cellule.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    TinyInt(i8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Counter(i64),
    Float(f32),
    Double(f64),
    Text(String),
    Ascii(String),
    Uuid(Uuid),
    Timeuuid(Uuid),
    Blob(Vec<u8>),
    /// Millisecondes depuis l'epoch Unix
    Timestamp(i64),
    /// Jours, centré sur 2^31 (encodage CQL)
    Date(u32),
    /// Nanosecondes depuis minuit
    Time(i64),
    Inet(IpAddr),
    Duration { months: i32, days: i32, nanoseconds: i64 },
    /// Entier signé big-endian (complément à deux)
    Varint(Vec<u8>),
    /// Mantisse big-endian + échelle
    Decimal { unscaled: Vec<u8>, scale: i32 },
    List(Vec<Value>),
    Set(Vec<Value>),
    Map(Vec<(Value, Value)>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Nom court du variant (messages d'erreur)
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::TinyInt(_) => "tinyint",
            Value::SmallInt(_) => "smallint",
            Value::Int(_) => "int",
            Value::BigInt(_) => "bigint",
            Value::Counter(_) => "counter",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Text(_) => "text",
            Value::Ascii(_) => "ascii",
            Value::Uuid(_) => "uuid",
            Value::Timeuuid(_) => "timeuuid",
            Value::Blob(_) => "blob",
            Value::Timestamp(_) => "timestamp",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::Inet(_) => "inet",
            Value::Duration { .. } => "duration",
            Value::Varint(_) => "varint",
            Value::Decimal { .. } => "decimal",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
        }
    }

    /// Le DataType scalaire correspondant, s'il y en a un
    pub fn data_type(&self) -> Option<DataType> {
        let ty = match self {
            Value::Boolean(_) => DataType::Boolean,
            Value::TinyInt(_) => DataType::TinyInt,
            Value::SmallInt(_) => DataType::SmallInt,
            Value::Int(_) => DataType::Int,
            Value::BigInt(_) => DataType::BigInt,
            Value::Counter(_) => DataType::Counter,
            Value::Float(_) => DataType::Float,
            Value::Double(_) => DataType::Double,
            Value::Text(_) => DataType::Text,
            Value::Ascii(_) => DataType::Ascii,
            Value::Uuid(_) => DataType::Uuid,
            Value::Timeuuid(_) => DataType::TimeUuid,
            Value::Blob(_) => DataType::Blob,
            Value::Timestamp(_) => DataType::Timestamp,
            Value::Date(_) => DataType::Date,
            Value::Time(_) => DataType::Time,
            Value::Inet(_) => DataType::Inet,
            Value::Duration { .. } => DataType::Duration,
            Value::Varint(_) => DataType::Varint,
            Value::Decimal { .. } => DataType::Decimal,
            Value::Null | Value::List(_) | Value::Set(_) | Value::Map(_) => return None,
        };
        Some(ty)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// BIGINT ou COUNTER
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::BigInt(i) | Value::Counter(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// TEXT, VARCHAR ou ASCII
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::Ascii(s) => Some(s),
            _ => None,
        }
    }

    /// UUID ou TIMEUUID
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Value::Uuid(u) | Value::Timeuuid(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(b) => Some(b),
            _ => None,
        }
    }

    /// LIST ou SET
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Valeur entière quelle que soit sa largeur (agrégats, compteurs)
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::TinyInt(i) => Some(i64::from(*i)),
            Value::SmallInt(i) => Some(i64::from(*i)),
            Value::Int(i) => Some(i64::from(*i)),
            Value::BigInt(i) | Value::Counter(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::TinyInt(i) => write!(f, "{}", i),
            Value::SmallInt(i) => write!(f, "{}", i),
            Value::Int(i) => write!(f, "{}", i),
            Value::BigInt(i) | Value::Counter(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Text(s) | Value::Ascii(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Uuid(u) | Value::Timeuuid(u) => write!(f, "{}", u),
            Value::Blob(b) => write!(f, "0x{}", hex::encode(b)),
            Value::Timestamp(ms) => write!(f, "{}", ms),
            Value::Date(d) => write!(f, "{}", d),
            Value::Time(ns) => write!(f, "{}", ns),
            Value::Inet(ip) => write!(f, "'{}'", ip),
            Value::Duration { months, days, nanoseconds } => {
                write!(f, "{}mo{}d{}ns", months, days, nanoseconds)
            }
            Value::Varint(bytes) => write!(f, "varint(0x{})", hex::encode(bytes)),
            Value::Decimal { unscaled, scale } => {
                write!(f, "decimal(0x{}, {})", hex::encode(unscaled), scale)
            }
            Value::List(items) => write!(f, "[{}]", join(items.iter())),
            Value::Set(items) => write!(f, "{{{}}}", join(items.iter())),
            Value::Map(entries) => {
                let parts: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

fn join<'a>(items: impl Iterator<Item = &'a Value>) -> String {
    items.map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        assert_eq!(Value::Int(7).as_int(), Some(7));
        assert_eq!(Value::Int(7).as_long(), None);
        assert_eq!(Value::Counter(3).as_long(), Some(3));
        assert_eq!(Value::Ascii("a".into()).as_str(), Some("a"));
        assert_eq!(Value::Null.as_bool(), None);
    }

    #[test]
    fn test_integer_widening() {
        assert_eq!(Value::TinyInt(-2).as_integer(), Some(-2));
        assert_eq!(Value::SmallInt(300).as_integer(), Some(300));
        assert_eq!(Value::Text("1".into()).as_integer(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Text("it's".into()).to_string(), "'it''s'");
        assert_eq!(Value::Blob(vec![0xca, 0xfe]).to_string(), "0xcafe");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::Int(2)]).to_string(),
            "[1, 2]"
        );
        assert_eq!(
            Value::Map(vec![(Value::Text("a".into()), Value::Int(1))]).to_string(),
            "{'a': 1}"
        );
    }

    #[test]
    fn test_data_type() {
        assert_eq!(Value::Timeuuid(Uuid::nil()).data_type(), Some(DataType::TimeUuid));
        assert_eq!(Value::List(vec![]).data_type(), None);
    }
}
