// =============================================================================
// CONDITION — Clauses WHERE
// =============================================================================
//
// Une Condition est une conjonction ordonnée de comparaisons :
//
//   id = ? AND age > ? AND tags CONTAINS ?
//
// Les valeurs ne sont jamais écrites dans le CQL : elles sont bindées dans
// l'ordre des comparaisons (values()).
//
// Cassandra refuse les filtres hors clé sans ALLOW FILTERING : c'est le
// drapeau Filtering qui décide de l'ajouter.
//
// =============================================================================

use std::fmt;

use super::value::Value;

/// Opérateur d'une comparaison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Equal,
    Greater,
    Lower,
    GreaterOrEqual,
    LowerOrEqual,
    Contains,
    Like,
}

impl ComparisonOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Equal => "=",
            ComparisonOp::Greater => ">",
            ComparisonOp::Lower => "<",
            ComparisonOp::GreaterOrEqual => ">=",
            ComparisonOp::LowerOrEqual => "<=",
            ComparisonOp::Contains => "CONTAINS",
            ComparisonOp::Like => "LIKE",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Une comparaison `colonne OP ?` avec la valeur à binder.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub column: String,
    pub value: Value,
    pub op: ComparisonOp,
}

impl Comparison {
    pub fn new(column: &str, op: ComparisonOp, value: impl Into<Value>) -> Self {
        Comparison {
            column: column.to_string(),
            value: value.into(),
            op,
        }
    }

    /// Égalité, le cas de loin le plus courant
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Comparison::new(column, ComparisonOp::Equal, value)
    }

    pub fn build(&self) -> String {
        format!("{} {} ?", self.column, self.op)
    }
}

/// Autorise ou non ALLOW FILTERING.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filtering {
    Allowed,
    #[default]
    Denied,
}

/// Conjonction de comparaisons.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Condition {
    comparisons: Vec<Comparison>,
    filtering: Filtering,
}

impl Condition {
    /// Condition vide : pas de clause WHERE
    pub fn empty() -> Self {
        Condition::default()
    }

    pub fn of(comparisons: Vec<Comparison>) -> Self {
        Condition { comparisons, filtering: Filtering::Denied }
    }

    pub fn of_filtered(comparisons: Vec<Comparison>, filtering: Filtering) -> Self {
        Condition { comparisons, filtering }
    }

    /// `col = value`
    pub fn equal(column: &str, value: impl Into<Value>) -> Self {
        Condition::of(vec![Comparison::eq(column, value)])
    }

    /// Ajoute une comparaison (builder)
    pub fn and(&mut self, column: &str, op: ComparisonOp, value: impl Into<Value>) -> &mut Self {
        self.comparisons.push(Comparison::new(column, op, value));
        self
    }

    pub fn allow_filtering(&mut self) -> &mut Self {
        self.filtering = Filtering::Allowed;
        self
    }

    /// Les comparaisons jointes par AND, sans le mot-clé WHERE
    pub fn build(&self) -> String {
        self.comparisons
            .iter()
            .map(Comparison::build)
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// " WHERE ..." ou rien si la condition est vide
    pub fn where_clause(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.build())
        }
    }

    pub fn filtering_clause(&self) -> &'static str {
        if self.is_filtering_allowed() {
            " ALLOW FILTERING"
        } else {
            ""
        }
    }

    pub fn is_filtering_allowed(&self) -> bool {
        self.filtering == Filtering::Allowed
    }

    /// self puis other. Le filtrage est autorisé si l'une des deux l'autorise.
    pub fn concat(&self, other: &Condition) -> Condition {
        let mut comparisons = self.comparisons.clone();
        comparisons.extend(other.comparisons.iter().cloned());
        let filtering = if self.is_filtering_allowed() || other.is_filtering_allowed() {
            Filtering::Allowed
        } else {
            Filtering::Denied
        };
        Condition { comparisons, filtering }
    }

    /// Valeurs à binder, dans l'ordre des comparaisons
    pub fn values(&self) -> Vec<Value> {
        self.comparisons.iter().map(|c| c.value.clone()).collect()
    }

    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    pub fn is_empty(&self) -> bool {
        self.comparisons.is_empty()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.build(), self.filtering_clause())
    }
}
