// =============================================================================
// HYDRATE — Conversions entre types Rust et cellules CQL
// =============================================================================
//
// Deux sens :
//   Rust → Value   : impl From<T> for Value (écriture, bind des requêtes)
//   Value → Rust   : trait FromValue (lecture des lignes)
//
// POLITIQUE NULL :
//   - Option<T> : NULL → None
//   - tout autre type : NULL → OrmError::NullValue
//
// ÉLARGISSEMENT : TINYINT → SMALLINT → INT → BIGINT est accepté en lecture
// (et COUNTER → i64), FLOAT → f64 aussi. Jamais de rétrécissement.
//
// Le trait Entity relie un type applicatif à une ligne complète de table,
// dans l'ordre des colonnes de la table.
//
// =============================================================================

use std::collections::HashMap;
use std::hash::Hash;
use std::net::IpAddr;

use uuid::Uuid;

use super::row::Row;
use super::value::Value;
use crate::error::{OrmError, Result};

/// Conversion d'une cellule vers un type Rust.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self>;
}

/// Une entité applicative stockée dans une table.
///
/// `to_row` doit produire les cellules dans l'ordre des colonnes de la
/// table ; `from_row` relit une ligne complète (SELECT de toutes les
/// colonnes).
pub trait Entity: Sized {
    fn to_row(&self) -> Row;
    fn from_row(row: &Row) -> Result<Self>;
}

/// Contenu d'une colonne BLOB.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Blob(pub Vec<u8>);

fn mismatch(expected: &'static str, found: &Value) -> OrmError {
    if found.is_null() {
        OrmError::NullValue(expected)
    } else {
        OrmError::TypeMismatch {
            expected,
            found: found.kind_name().to_string(),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_bool().ok_or_else(|| mismatch("boolean", value))
    }
}

impl FromValue for i8 {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::TinyInt(i) => Ok(*i),
            other => Err(mismatch("tinyint", other)),
        }
    }
}

impl FromValue for i16 {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::TinyInt(i) => Ok(i16::from(*i)),
            Value::SmallInt(i) => Ok(*i),
            other => Err(mismatch("smallint", other)),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::TinyInt(i) => Ok(i32::from(*i)),
            Value::SmallInt(i) => Ok(i32::from(*i)),
            Value::Int(i) => Ok(*i),
            other => Err(mismatch("int", other)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_integer().ok_or_else(|| mismatch("bigint", value))
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Float(v) => Ok(*v),
            other => Err(mismatch("float", other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Float(v) => Ok(f64::from(*v)),
            Value::Double(v) => Ok(*v),
            other => Err(mismatch("double", other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch("text", value))
    }
}

impl FromValue for Uuid {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_uuid().ok_or_else(|| mismatch("uuid", value))
    }
}

impl FromValue for IpAddr {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Inet(ip) => Ok(*ip),
            other => Err(mismatch("inet", other)),
        }
    }
}

impl FromValue for Blob {
    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_blob()
            .map(|b| Blob(b.to_vec()))
            .ok_or_else(|| mismatch("blob", value))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::from_value(value).map(Some)
    }
}

/// LIST ou SET. Une collection NULL est une collection vide pour Cassandra.
impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::List(items) | Value::Set(items) => items.iter().map(T::from_value).collect(),
            other => Err(mismatch("list", other)),
        }
    }
}

impl<K, V> FromValue for HashMap<K, V>
where
    K: FromValue + Eq + Hash,
    V: FromValue,
{
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(HashMap::new()),
            Value::Map(entries) => entries
                .iter()
                .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            other => Err(mismatch("map", other)),
        }
    }
}

// ─── Rust → Value ────────────────────────────────────────────────────────────

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Boolean,
    i8 => TinyInt,
    i16 => SmallInt,
    i32 => Int,
    i64 => BigInt,
    f32 => Float,
    f64 => Double,
    String => Text,
    Uuid => Uuid,
    IpAddr => Inet,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<Blob> for Value {
    fn from(v: Blob) -> Self {
        Value::Blob(v.0)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl Value {
    /// Construit une LIST à partir de n'importe quels éléments convertibles
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Value {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Construit une MAP ; l'ordre d'itération est conservé
    pub fn map<K: Into<Value>, V: Into<Value>>(entries: impl IntoIterator<Item = (K, V)>) -> Value {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Player {
        id: Uuid,
        name: String,
        level: i32,
        nickname: Option<String>,
        tags: Vec<String>,
    }

    impl Entity for Player {
        fn to_row(&self) -> Row {
            Row::new(vec![
                self.id.into(),
                self.name.clone().into(),
                self.level.into(),
                self.nickname.clone().into(),
                Value::list(self.tags.iter()),
            ])
        }

        fn from_row(row: &Row) -> Result<Self> {
            Ok(Player {
                id: row.get(0)?,
                name: row.get(1)?,
                level: row.get(2)?,
                nickname: row.get(3)?,
                tags: row.get(4)?,
            })
        }
    }

    #[test]
    fn test_entity_round_trip() {
        let player = Player {
            id: Uuid::nil(),
            name: "alice".into(),
            level: 12,
            nickname: None,
            tags: vec!["pro".into()],
        };
        let row = player.to_row();
        assert_eq!(row.cell(3), Some(&Value::Null));
        assert_eq!(Player::from_row(&row).unwrap(), player);
    }

    #[test]
    fn test_null_policy() {
        assert_eq!(Option::<i32>::from_value(&Value::Null).unwrap(), None);
        let err = i32::from_value(&Value::Null).unwrap_err();
        assert!(matches!(err, OrmError::NullValue("int")));
    }

    #[test]
    fn test_widening_only() {
        assert_eq!(i64::from_value(&Value::Int(5)).unwrap(), 5);
        assert_eq!(i64::from_value(&Value::Counter(9)).unwrap(), 9);
        assert_eq!(f64::from_value(&Value::Float(1.5)).unwrap(), 1.5);
        let err = i32::from_value(&Value::BigInt(5)).unwrap_err();
        assert!(matches!(err, OrmError::TypeMismatch { expected: "int", .. }));
    }

    #[test]
    fn test_collections() {
        let map = Value::map([("a", 1i32), ("b", 2i32)]);
        let decoded: HashMap<String, i32> = HashMap::from_value(&map).unwrap();
        assert_eq!(decoded["b"], 2);
        let empty: Vec<String> = Vec::from_value(&Value::Null).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_null_collection_is_empty() {
        let map: HashMap<String, i32> = HashMap::from_value(&Value::Null).unwrap();
        assert!(map.is_empty());
        let list: Vec<i32> = Vec::from_value(&Value::Null).unwrap();
        assert!(list.is_empty());
        assert!(matches!(String::from_value(&Value::Null), Err(OrmError::NullValue(_))));
    }

    #[test]
    fn test_blob() {
        let value: Value = Blob(vec![1, 2]).into();
        assert_eq!(Blob::from_value(&value).unwrap(), Blob(vec![1, 2]));
    }
}
