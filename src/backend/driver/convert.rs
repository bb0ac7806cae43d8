// =============================================================================
// CONVERT — Value ⇄ CqlValue
// =============================================================================
//
// Traduction entre les cellules de l'ORM et les valeurs du driver scylla.
//
//   Value::Null        → None (marqueur NULL au bind)
//   Value::Timeuuid    → CqlValue::Timeuuid
//   Value::Varint      → CqlVarint (big-endian signé)
//   Value::Decimal     → CqlDecimal (mantisse big-endian + échelle)
//
// Un NULL à l'intérieur d'une collection n'existe pas en CQL : c'est une
// erreur au bind.
//
// =============================================================================

use scylla::value::{
    Counter, CqlDate, CqlDecimal, CqlDuration, CqlTime, CqlTimestamp, CqlTimeuuid, CqlValue,
    CqlVarint,
};
use uuid::Uuid;

use crate::core::value::Value;
use crate::error::{OrmError, Result};

/// Valeur à binder : None pour NULL.
pub fn to_bound(value: &Value) -> Result<Option<CqlValue>> {
    if value.is_null() {
        return Ok(None);
    }
    to_cql(value).map(Some)
}

fn to_cql(value: &Value) -> Result<CqlValue> {
    let cql = match value {
        Value::Null => {
            return Err(OrmError::InvalidArgument(
                "NULL is not allowed inside a collection".into(),
            ))
        }
        Value::Boolean(b) => CqlValue::Boolean(*b),
        Value::TinyInt(i) => CqlValue::TinyInt(*i),
        Value::SmallInt(i) => CqlValue::SmallInt(*i),
        Value::Int(i) => CqlValue::Int(*i),
        Value::BigInt(i) => CqlValue::BigInt(*i),
        Value::Counter(i) => CqlValue::Counter(Counter(*i)),
        Value::Float(v) => CqlValue::Float(*v),
        Value::Double(v) => CqlValue::Double(*v),
        Value::Text(s) => CqlValue::Text(s.clone()),
        Value::Ascii(s) => CqlValue::Ascii(s.clone()),
        Value::Uuid(u) => CqlValue::Uuid(*u),
        Value::Timeuuid(u) => CqlValue::Timeuuid(CqlTimeuuid::from(*u)),
        Value::Blob(b) => CqlValue::Blob(b.clone()),
        Value::Timestamp(ms) => CqlValue::Timestamp(CqlTimestamp(*ms)),
        Value::Date(d) => CqlValue::Date(CqlDate(*d)),
        Value::Time(ns) => CqlValue::Time(CqlTime(*ns)),
        Value::Inet(ip) => CqlValue::Inet(*ip),
        Value::Duration { months, days, nanoseconds } => CqlValue::Duration(CqlDuration {
            months: *months,
            days: *days,
            nanoseconds: *nanoseconds,
        }),
        Value::Varint(bytes) => CqlValue::Varint(CqlVarint::from_signed_bytes_be(bytes.clone())),
        Value::Decimal { unscaled, scale } => CqlValue::Decimal(
            CqlDecimal::from_signed_be_bytes_and_exponent(unscaled.clone(), *scale),
        ),
        Value::List(items) => CqlValue::List(items.iter().map(to_cql).collect::<Result<_>>()?),
        Value::Set(items) => CqlValue::Set(items.iter().map(to_cql).collect::<Result<_>>()?),
        Value::Map(entries) => CqlValue::Map(
            entries
                .iter()
                .map(|(k, v)| Ok((to_cql(k)?, to_cql(v)?)))
                .collect::<Result<_>>()?,
        ),
    };
    Ok(cql)
}

/// Cellule lue : None (NULL) devient Value::Null.
pub fn from_cell(cell: Option<CqlValue>) -> Result<Value> {
    match cell {
        None => Ok(Value::Null),
        Some(value) => from_cql(value),
    }
}

fn from_cql(value: CqlValue) -> Result<Value> {
    let converted = match value {
        CqlValue::Empty => Value::Null,
        CqlValue::Boolean(b) => Value::Boolean(b),
        CqlValue::TinyInt(i) => Value::TinyInt(i),
        CqlValue::SmallInt(i) => Value::SmallInt(i),
        CqlValue::Int(i) => Value::Int(i),
        CqlValue::BigInt(i) => Value::BigInt(i),
        CqlValue::Counter(c) => Value::Counter(c.0),
        CqlValue::Float(v) => Value::Float(v),
        CqlValue::Double(v) => Value::Double(v),
        CqlValue::Text(s) => Value::Text(s),
        CqlValue::Ascii(s) => Value::Ascii(s),
        CqlValue::Uuid(u) => Value::Uuid(u),
        CqlValue::Timeuuid(t) => Value::Timeuuid(Uuid::from(t)),
        CqlValue::Blob(b) => Value::Blob(b),
        CqlValue::Timestamp(ts) => Value::Timestamp(ts.0),
        CqlValue::Date(d) => Value::Date(d.0),
        CqlValue::Time(t) => Value::Time(t.0),
        CqlValue::Inet(ip) => Value::Inet(ip),
        CqlValue::Duration(d) => Value::Duration {
            months: d.months,
            days: d.days,
            nanoseconds: d.nanoseconds,
        },
        CqlValue::Varint(v) => Value::Varint(v.as_signed_bytes_be_slice().to_vec()),
        CqlValue::Decimal(d) => {
            let (unscaled, scale) = d.as_signed_be_bytes_slice_and_exponent();
            Value::Decimal { unscaled: unscaled.to_vec(), scale }
        }
        CqlValue::List(items) => Value::List(items.into_iter().map(from_cql).collect::<Result<_>>()?),
        CqlValue::Set(items) => Value::Set(items.into_iter().map(from_cql).collect::<Result<_>>()?),
        CqlValue::Map(entries) => Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| Ok((from_cql(k)?, from_cql(v)?)))
                .collect::<Result<_>>()?,
        ),
        other => {
            return Err(OrmError::TypeMismatch {
                expected: "supported CQL value",
                found: format!("{:?}", other),
            })
        }
    };
    Ok(converted)
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_binds_as_none() {
        assert_eq!(to_bound(&Value::Null).unwrap(), None);
        assert_eq!(from_cell(None).unwrap(), Value::Null);
    }

    #[test]
    fn test_scalars() {
        assert_eq!(to_bound(&Value::Counter(3)).unwrap(), Some(CqlValue::Counter(Counter(3))));
        assert_eq!(
            from_cell(Some(CqlValue::Timestamp(CqlTimestamp(1_000)))).unwrap(),
            Value::Timestamp(1_000)
        );
        let id = Uuid::nil();
        assert_eq!(from_cell(Some(CqlValue::Timeuuid(CqlTimeuuid::from(id)))).unwrap(), Value::Timeuuid(id));
    }

    #[test]
    fn test_collections() {
        let value = Value::Map(vec![(Value::Text("a".into()), Value::List(vec![Value::Int(1)]))]);
        let cql = to_bound(&value).unwrap().unwrap();
        assert_eq!(from_cell(Some(cql)).unwrap(), value);
    }

    #[test]
    fn test_null_inside_collection() {
        let value = Value::List(vec![Value::Null]);
        assert!(matches!(to_bound(&value), Err(OrmError::InvalidArgument(_))));
    }

    #[test]
    fn test_decimal() {
        let value = Value::Decimal { unscaled: vec![0x04, 0xd2], scale: 2 };
        let cql = to_bound(&value).unwrap().unwrap();
        assert_eq!(from_cell(Some(cql)).unwrap(), value);
    }
}
