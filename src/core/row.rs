// =============================================================================
// ROW — Une ligne de résultat ou de données à écrire
// =============================================================================
//
// Une Row est une suite ordonnée de cellules (Value), dans l'ordre des
// colonnes de la requête qui l'a produite ou de la table qui la reçoit.
//
// =============================================================================

use super::hydrate::FromValue;
use super::value::Value;
use crate::error::{OrmError, Result};

/// Une ligne de cellules.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<Value>,
}

impl Row {
    pub fn new(cells: Vec<Value>) -> Self {
        Row { cells }
    }

    pub fn empty() -> Self {
        Row { cells: Vec::new() }
    }

    /// Les marqueurs de bind pour un INSERT : "?, ?, ?"
    pub fn placeholders(&self) -> String {
        placeholders(self.cells.len())
    }

    /// Concatène deux lignes (self puis other)
    pub fn concat(&self, other: &Row) -> Row {
        let mut cells = self.cells.clone();
        cells.extend(other.cells.iter().cloned());
        Row { cells }
    }

    /// Remplace une cellule. Hors bornes → erreur d'arité.
    pub fn update_cell(&mut self, index: usize, value: impl Into<Value>) -> Result<()> {
        let len = self.cells.len();
        let cell = self.cells.get_mut(index).ok_or(OrmError::RowArity {
            expected: index + 1,
            actual: len,
        })?;
        *cell = value.into();
        Ok(())
    }

    pub fn cell(&self, index: usize) -> Option<&Value> {
        self.cells.get(index)
    }

    /// Lit une cellule en la convertissant ; une cellule absente est
    /// traitée comme NULL.
    pub fn get<T: FromValue>(&self, index: usize) -> Result<T> {
        T::from_value(self.cells.get(index).unwrap_or(&Value::Null))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Value] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Value> {
        self.cells
    }
}

impl From<Vec<Value>> for Row {
    fn from(cells: Vec<Value>) -> Self {
        Row { cells }
    }
}

impl FromIterator<Value> for Row {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Row { cells: iter.into_iter().collect() }
    }
}

/// Construit une Row à partir de valeurs hétérogènes :
/// `row![id, "alice", 42]`
#[macro_export]
macro_rules! row {
    ($($value:expr),* $(,)?) => {
        $crate::core::row::Row::new(vec![$($crate::core::value::Value::from($value)),*])
    };
}

/// "?, ?, ?" pour `count` marqueurs
pub fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        let row = Row::new(vec![Value::Int(1), Value::Null, Value::Text("x".into())]);
        assert_eq!(row.placeholders(), "?, ?, ?");
        assert_eq!(Row::empty().placeholders(), "");
    }

    #[test]
    fn test_concat() {
        let a = Row::new(vec![Value::Int(1)]);
        let b = Row::new(vec![Value::Int(2), Value::Int(3)]);
        let c = a.concat(&b);
        assert_eq!(c.len(), 3);
        assert_eq!(c.cell(2), Some(&Value::Int(3)));
        // a n'est pas modifié
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_update_cell() {
        let mut row = Row::new(vec![Value::Int(1), Value::Int(2)]);
        row.update_cell(1, Value::Int(5)).unwrap();
        assert_eq!(row.cell(1), Some(&Value::Int(5)));
        assert!(row.update_cell(4, Value::Int(5)).is_err());
    }

    #[test]
    fn test_row_macro() {
        let row = crate::row![1i32, "alice", true];
        assert_eq!(row.cells(), &[Value::Int(1), Value::Text("alice".into()), Value::Boolean(true)]);
    }

    #[test]
    fn test_get_missing_cell_is_null() {
        let row = Row::new(vec![Value::Int(1)]);
        let missing: Option<i32> = row.get(3).unwrap();
        assert_eq!(missing, None);
        assert!(row.get::<i32>(3).is_err());
    }
}
