// =============================================================================
// PAGING — Ordre, direction et pages de résultats
// =============================================================================

use std::fmt;

/// Ordre de tri d'une colonne de clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    Ascending,
    Descending,
}

impl Order {
    /// Le mot-clé CQL (ASC / DESC)
    pub fn keyword(&self) -> &'static str {
        match self {
            Order::Ascending => "ASC",
            Order::Descending => "DESC",
        }
    }

    pub fn reverse(&self) -> Order {
        match self {
            Order::Ascending => Order::Descending,
            Order::Descending => Order::Ascending,
        }
    }

    pub fn is_ascending(&self) -> bool {
        *self == Order::Ascending
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// Sens de parcours des pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn is_forward(&self) -> bool {
        *self == Direction::Forward
    }

    pub fn is_backward(&self) -> bool {
        *self == Direction::Backward
    }

    /// L'ordre effectif de la requête pour ce sens de parcours
    pub fn apply(&self, order: Order) -> Order {
        match self {
            Direction::Forward => order,
            Direction::Backward => order.reverse(),
        }
    }
}

/// Une page de résultats.
///
/// `page_state` est le jeton (hexadécimal) qui permet de reprendre la
/// lecture ; il est vide quand il n'y a plus de page. `page_count` est le
/// nombre total de pages pour la partition parcourue.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_state: String,
    pub page_count: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, page_state: String, page_count: u64) -> Self {
        Page { content, page_state, page_count }
    }

    pub fn empty() -> Self {
        Page {
            content: Vec::new(),
            page_state: String::new(),
            page_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn has_more(&self) -> bool {
        !self.page_state.is_empty()
    }

    /// Transforme le contenu en gardant l'état de pagination
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page_state: self.page_state,
            page_count: self.page_count,
        }
    }
}

/// Nombre de pages nécessaires pour `row_count` lignes.
pub fn page_count(page_size: u32, row_count: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    row_count.div_ceil(u64::from(page_size))
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_reverse() {
        assert_eq!(Order::Ascending.reverse(), Order::Descending);
        assert_eq!(Order::Descending.reverse().keyword(), "ASC");
    }

    #[test]
    fn test_direction_apply() {
        assert_eq!(Direction::Forward.apply(Order::Ascending), Order::Ascending);
        assert_eq!(Direction::Backward.apply(Order::Ascending), Order::Descending);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(10, 0), 0);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(10, 11), 2);
        assert_eq!(page_count(0, 11), 0);
    }

    #[test]
    fn test_empty_page() {
        let page: Page<u8> = Page::empty();
        assert!(page.is_empty());
        assert!(!page.has_more());
        assert_eq!(page.page_count, 0);
    }
}
