//! Utility functions for SQLite storage operations.
//!
//! Chunking helpers that keep batch statements under SQLite's parameter limit.

/// Maximum number of rows bound into a single SQLite statement.
///
/// Multi-row inserts bind one parameter per column per row, and SQLite caps the
/// number of parameters per statement (SQLITE_MAX_VARIABLE_NUMBER). A 500-row
/// chunk of the widest table (coins, 6 columns) stays well under the bundled
/// library's limit.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Chunk a slice into smaller slices for batch SQLite statements.
///
/// Chunks keep the input order, so a `REPLACE INTO` per chunk still lets a
/// later row win over an earlier one with the same key.
///
/// # Example
///
/// ```ignore
/// for chunk in chunk_for_sqlite(&coin_rows) {
///     diesel::replace_into(coins::table).values(chunk).execute(conn)?;
/// }
/// ```
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}
