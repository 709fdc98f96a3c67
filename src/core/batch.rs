//! Chunked bulk insertion.
//!
//! Large row sets are written as a sequence of multi-row `INSERT` statements of
//! at most `batch_size` rows each, rather than one statement per row. There is
//! no enclosing transaction: when a batch fails the error propagates at once,
//! later batches are not attempted and earlier batches stay written.

use crate::errors::{Error, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, IntoActiveModel, Iterable};
use tracing::debug;

/// Rows per statement unless configured otherwise
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Bound parameters SQLite accepts in one statement
pub const MAX_BIND_PARAMETERS: usize = 32_766;

/// Result of a batched insert
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Number of `INSERT` statements issued
    pub batches_written: usize,
    /// Rows the store reports as inserted. Conflicting rows are not counted.
    pub rows_inserted: u64,
    /// Row count of each statement, in order
    pub batch_sizes: Vec<usize>,
}

/// Largest batch whose rows of `columns_per_row` values fit in one statement.
#[must_use]
pub const fn max_batch_size(columns_per_row: usize) -> usize {
    if columns_per_row == 0 {
        MAX_BIND_PARAMETERS
    } else {
        MAX_BIND_PARAMETERS / columns_per_row
    }
}

/// Rejects a zero batch size and one whose statement would exceed the
/// store's bound-parameter limit.
pub fn validate_batch_size(batch_size: usize, columns_per_row: usize) -> Result<()> {
    let max = max_batch_size(columns_per_row);
    if batch_size == 0 || batch_size > max {
        return Err(Error::InvalidBatchSize {
            size: batch_size,
            max,
        });
    }
    Ok(())
}

/// Column count of an entity, the upper bound on values bound per row.
#[must_use]
pub fn columns_per_row<E: EntityTrait>() -> usize {
    E::Column::iter().count()
}

/// Sizes of the statements needed to write `total` rows at `batch_size` rows each.
///
/// `plan_batches(250, 100)` is `[100, 100, 50]`; zero rows need no statement.
/// Only the lower bound is checked here.
pub fn plan_batches(total: usize, batch_size: usize) -> Result<Vec<usize>> {
    validate_batch_size(batch_size, 1)?;
    let full = total / batch_size;
    let mut sizes = vec![batch_size; full];
    if total % batch_size != 0 {
        sizes.push(total % batch_size);
    }
    Ok(sizes)
}

/// Inserts `rows` in statements of at most `batch_size` rows, in order.
///
/// When `on_conflict` is given each statement carries it, so rows colliding with
/// an existing natural key can be skipped instead of failing the batch.
pub async fn insert_in_batches<C, A>(
    db: &C,
    rows: Vec<A>,
    batch_size: usize,
    on_conflict: Option<OnConflict>,
) -> Result<BatchOutcome>
where
    C: ConnectionTrait,
    A: ActiveModelTrait,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    validate_batch_size(batch_size, columns_per_row::<A::Entity>())?;

    let mut outcome = BatchOutcome::default();
    let mut rows = rows.into_iter().peekable();

    while rows.peek().is_some() {
        let batch: Vec<A> = rows.by_ref().take(batch_size).collect();
        let size = batch.len();

        let mut insert = A::Entity::insert_many(batch);
        if let Some(on_conflict) = &on_conflict {
            insert = insert.on_conflict(on_conflict.clone());
        }
        let inserted = insert.exec_without_returning(db).await?;

        outcome.batches_written += 1;
        outcome.rows_inserted += inserted;
        outcome.batch_sizes.push(size);
        debug!(
            "Batch {} written: {} rows sent, {} inserted",
            outcome.batches_written, size, inserted
        );
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::country_language;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, Set};

    fn rows(count: usize) -> Vec<country_language::ActiveModel> {
        let now = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..count)
            .map(|i| country_language::ActiveModel {
                country_id: Set(i64::try_from(i).unwrap() + 1),
                language_id: Set(1),
                is_primary: Set(true),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            })
            .collect()
    }

    fn exec_result(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[test]
    fn test_plan_batches() {
        assert_eq!(plan_batches(250, 100).unwrap(), vec![100, 100, 50]);
        assert_eq!(plan_batches(200, 100).unwrap(), vec![100, 100]);
        assert_eq!(plan_batches(7, 100).unwrap(), vec![7]);
        assert!(plan_batches(0, 100).unwrap().is_empty());
        assert!(matches!(
            plan_batches(10, 0),
            Err(Error::InvalidBatchSize { size: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_250_rows_take_three_statements() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_exec_results([exec_result(100), exec_result(100), exec_result(50)])
            .into_connection();

        let outcome = insert_in_batches(&db, rows(250), 100, None).await?;
        assert_eq!(outcome.batches_written, 3);
        assert_eq!(outcome.batch_sizes, vec![100, 100, 50]);
        assert_eq!(outcome.rows_inserted, 250);
        assert_eq!(db.into_transaction_log().len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_inserted_count_comes_from_store() -> Result<()> {
        // Second batch collides entirely with existing rows
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_exec_results([exec_result(2), exec_result(0)])
            .into_connection();

        let outcome = insert_in_batches(&db, rows(4), 2, None).await?;
        assert_eq!(outcome.batches_written, 2);
        assert_eq!(outcome.rows_inserted, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_batch_aborts_remaining_batches() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_exec_results([exec_result(100)])
            .append_exec_errors([DbErr::Custom("constraint violation".to_string())])
            .into_connection();

        let result = insert_in_batches(&db, rows(250), 100, None).await;
        assert!(matches!(result, Err(Error::Database(_))));
        // The third batch was never sent
        assert_eq!(db.into_transaction_log().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_input_issues_no_statement() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let outcome =
            insert_in_batches(&db, Vec::<country_language::ActiveModel>::new(), 100, None).await?;
        assert_eq!(outcome, BatchOutcome::default());
        assert!(db.into_transaction_log().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_zero_batch_size_rejected_before_writing() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = insert_in_batches(&db, rows(3), 0, None).await;
        assert!(matches!(result, Err(Error::InvalidBatchSize { size: 0, .. })));
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_batch_over_parameter_limit_rejected_before_writing() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let columns = columns_per_row::<country_language::Entity>();
        let max = max_batch_size(columns);
        assert_eq!(max, MAX_BIND_PARAMETERS / columns);

        let result = insert_in_batches(&db, rows(3), max + 1, None).await;
        assert!(matches!(
            result,
            Err(Error::InvalidBatchSize { size, max: limit }) if size == max + 1 && limit == max
        ));
        assert!(db.into_transaction_log().is_empty());
    }
}
