//! First-run seeding of the coin tables.
//!
//! A fresh database is filled from a list of `INSERT` statements, one per
//! line, so lookups work before the first remote sync completes. The list is
//! applied statement by statement without a surrounding transaction: the first
//! failing line stops the load, and whatever ran before it stays.

use std::borrow::Cow;
use std::path::Path;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::{debug, info, warn};

use marketkit_core::errors::{Error, Result};

use super::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::{coins, syncer_states};

/// The statement list shipped with the crate.
pub const BUNDLED_INITIAL_COINS: &str = include_str!("../../assets/initial_coins_list");

/// Returns the statements at `path`, or the bundled list when no path is given.
pub fn read_initial_coins(path: Option<&Path>) -> Result<Cow<'static, str>> {
    match path {
        None => Ok(Cow::Borrowed(BUNDLED_INITIAL_COINS)),
        Some(path) => std::fs::read_to_string(path).map(Cow::Owned).map_err(|e| {
            Error::Config(format!(
                "Failed to read initial coins list {}: {}",
                path.display(),
                e
            ))
        }),
    }
}

/// Executes each non-blank line of `statements` in order.
///
/// Returns how many statements ran. A failure is logged as a warning and ends
/// the load; it is not an error for the caller.
pub fn load_initial_coins(conn: &mut SqliteConnection, statements: &str) -> usize {
    let mut executed = 0;

    for (line_no, statement) in statements.lines().enumerate() {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }

        if let Err(e) = conn.batch_execute(statement) {
            warn!(
                "Initial coins load stopped at line {}: {}",
                line_no + 1,
                e
            );
            break;
        }
        executed += 1;
    }

    executed
}

/// Seeds the store when it holds no coins and no sync markers.
///
/// Returns the number of statements executed; 0 when the store was already
/// populated.
pub fn seed_if_empty(pool: &DbPool, statements: &str) -> Result<usize> {
    let mut conn = get_connection(pool)?;

    let coin_count: i64 = coins::table.count().get_result(&mut conn).into_core()?;
    let marker_count: i64 = syncer_states::table
        .count()
        .get_result(&mut conn)
        .into_core()?;

    if coin_count > 0 || marker_count > 0 {
        debug!(
            "Skipping initial coins load ({} coins, {} markers present)",
            coin_count, marker_count
        );
        return Ok(0);
    }

    let loaded = load_initial_coins(&mut conn, statements);
    info!("Loaded coins count: {}", loaded);
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations};
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};

    fn setup() -> (Arc<DbPool>, TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        (pool, temp_dir)
    }

    fn count_coins(pool: &DbPool) -> i64 {
        let mut conn = get_connection(pool).unwrap();
        coins::table.count().get_result(&mut conn).unwrap()
    }

    #[test]
    fn test_bundled_list_loads_completely() {
        let (pool, _dir) = setup();
        let expected = BUNDLED_INITIAL_COINS
            .lines()
            .filter(|l| !l.trim().is_empty())
            .count();

        let loaded = seed_if_empty(&pool, BUNDLED_INITIAL_COINS).unwrap();

        assert_eq!(loaded, expected);
        assert!(count_coins(&pool) > 0);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let (pool, _dir) = setup();
        let statements = "\nINSERT INTO coins (uid, name, code, coin_type) VALUES ('a', 'A', 'A', 0);\n\n   \nINSERT INTO coins (uid, name, code, coin_type) VALUES ('b', 'B', 'B', 0);\n";

        let mut conn = get_connection(&pool).unwrap();
        assert_eq!(load_initial_coins(&mut conn, statements), 2);
        assert_eq!(count_coins(&pool), 2);
    }

    #[test]
    fn test_failure_keeps_earlier_statements() {
        let (pool, _dir) = setup();
        let statements = [
            "INSERT INTO coins (uid, name, code, coin_type) VALUES ('a', 'A', 'A', 0);",
            "INSERT INTO coins (uid, name, code, coin_type) VALUES ('b', 'B', 'B', 0);",
            "INSERT INTO no_such_table VALUES (1);",
            "INSERT INTO coins (uid, name, code, coin_type) VALUES ('c', 'C', 'C', 0);",
        ]
        .join("\n");

        let mut conn = get_connection(&pool).unwrap();
        assert_eq!(load_initial_coins(&mut conn, &statements), 2);
        assert_eq!(count_coins(&pool), 2);
    }

    #[test]
    fn test_populated_store_is_not_reseeded() {
        let (pool, _dir) = setup();
        {
            let mut conn = get_connection(&pool).unwrap();
            conn.batch_execute(
                "INSERT INTO syncer_states (key, value) VALUES ('coin-syncer-coins-last-sync-timestamp', '1');",
            )
            .unwrap();
        }

        assert_eq!(seed_if_empty(&pool, BUNDLED_INITIAL_COINS).unwrap(), 0);
        assert_eq!(count_coins(&pool), 0);
    }

    #[test]
    fn test_read_initial_coins_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("initial_coins_list");
        std::fs::write(&path, "INSERT INTO blockchains (uid, name) VALUES ('x', 'X');\n").unwrap();

        let contents = read_initial_coins(Some(&path)).unwrap();
        assert!(contents.starts_with("INSERT INTO blockchains"));

        assert!(read_initial_coins(Some(&dir.path().join("missing"))).is_err());
        assert_eq!(read_initial_coins(None).unwrap(), BUNDLED_INITIAL_COINS);
    }
}
