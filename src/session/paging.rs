// =============================================================================
// PAGING — Pagination à l'intérieur d'une partition
// =============================================================================
//
// Les lignes d'une partition sont triées sur la première colonne de
// clustering. On ne sait sauter directement qu'à deux pages :
//
//   page 0             → lecture avant, dans l'ordre demandé
//   dernière page      → lecture arrière (ordre inversé), taille réduite au
//                        reste count % page_size, puis remise à l'endroit
//
// Les autres pages s'atteignent de proche en proche avec `shift_page`, à
// partir du jeton de la page courante.
//
// =============================================================================

use tracing::{debug, warn};

use super::table::Table;
use crate::core::condition::{Comparison, Condition, Filtering};
use crate::core::paging::{self, Direction, Order, Page};
use crate::core::query;
use crate::core::row::Row;
use crate::core::value::Value;
use crate::error::{OrmError, Result};

impl Table {
    /// Saute à la page `target_page` (0 ou la dernière) de la partition
    /// `partition_value`. Toute autre page donne une page vide.
    pub async fn select_page(
        &self,
        partition_value: impl Into<Value>,
        condition: &Condition,
        order: Order,
        page_size: u32,
        target_page: u64,
    ) -> Result<Page<Row>> {
        let page_size = checked_page_size(page_size)?;
        let condition = self.paging_condition(partition_value, condition)?;
        let row_count = self.count_where(&condition).await?;
        let page_count = paging::page_count(page_size, row_count);

        let is_last = page_count > 0 && target_page == page_count - 1;
        if target_page != 0 && !is_last {
            debug!(table = %self.full_name(), target_page, page_count, "page out of reach");
            return Ok(Page::empty());
        }

        let direction = if target_page == 0 { Direction::Forward } else { Direction::Backward };
        let size = if is_last {
            match row_count % u64::from(page_size) {
                0 => page_size,
                rest => rest as u32,
            }
        } else {
            page_size
        };

        let (rows, state) = self
            .fetch_page(&condition, direction.apply(order), size, None)
            .await?;
        Ok(build_page(rows, state, page_count, direction))
    }

    /// Page voisine de celle décrite par `page_state`.
    ///
    /// `starting_point` indique le sens dans lequel la page courante a été
    /// lue ; quand il diffère de `direction`, la page voisine chevauche la
    /// courante d'une ligne et demande une seconde lecture.
    #[allow(clippy::too_many_arguments)]
    pub async fn shift_page(
        &self,
        partition_value: impl Into<Value>,
        condition: &Condition,
        order: Order,
        page_size: u32,
        page_state: &str,
        starting_point: Direction,
        direction: Direction,
    ) -> Result<Page<Row>> {
        let page_size = checked_page_size(page_size)?;
        let condition = self.paging_condition(partition_value, condition)?;
        let row_count = self.count_where(&condition).await?;
        let page_count = paging::page_count(page_size, row_count);

        let order = direction.apply(order);
        let resume = Some(page_state.to_string()).filter(|s| !s.is_empty());
        let (first, state) = self.fetch_page(&condition, order, page_size, resume).await?;
        if starting_point == direction {
            return Ok(build_page(first, state, page_count, direction));
        }

        let Some(next_state) = state.clone() else {
            warn!(table = %self.full_name(), "no page after the current one, shift stops here");
            return Ok(build_page(first, state, page_count, direction));
        };
        let (second, _) = self
            .fetch_page(&condition, order, page_size, Some(next_state))
            .await?;

        let mut rows: Vec<Row> = first.into_iter().last().into_iter().collect();
        rows.extend(second.into_iter().take(page_size as usize - 1));
        Ok(build_page(rows, state, page_count, direction))
    }

    /// `partition = value` (ALLOW FILTERING) puis la condition de l'appelant
    fn paging_condition(&self, partition_value: impl Into<Value>, condition: &Condition) -> Result<Condition> {
        let partition = self.schema().identifying_column()?;
        let base = Condition::of_filtered(
            vec![Comparison::eq(&partition.name, partition_value)],
            Filtering::Allowed,
        );
        Ok(base.concat(condition))
    }

    async fn fetch_page(
        &self,
        condition: &Condition,
        order: Order,
        size: u32,
        paging_state: Option<String>,
    ) -> Result<(Vec<Row>, Option<String>)> {
        let size = i32::try_from(size)
            .map_err(|_| OrmError::InvalidArgument(format!("page size {} is too large", size)))?;
        let statement = query::paging_select(self.schema(), condition, order, size, paging_state)?;
        let output = self.run(&statement).await?;
        Ok((output.rows, output.paging_state))
    }
}

fn checked_page_size(page_size: u32) -> Result<u32> {
    if page_size == 0 {
        return Err(OrmError::InvalidArgument("page size must be positive".into()));
    }
    Ok(page_size)
}

/// Une page lue à l'envers est remise dans l'ordre demandé.
fn build_page(mut rows: Vec<Row>, state: Option<String>, page_count: u64, direction: Direction) -> Page<Row> {
    if direction.is_backward() {
        rows.reverse();
    }
    Page::new(rows, state.unwrap_or_default(), page_count)
}
