//! Database initialization and table definitions
//!
//! The history lives in an embedded redb file. It mirrors a browser's local storage:
//! one table, one well-known key, one JSON string value.

use redb::{Database, TableDefinition};

/// Table holding the persisted history
///
/// Key: storage key name (only [`HISTORY_KEY`] is used)
/// Value: JSON array of ShortLinkRecord, newest first
///
/// Example:
/// - Key: "short_history"
/// - Value: '[{"originalUrl":"https://example.com","shortUrl":"http://sho.rt/abc",...}]'
pub const TABLE_HISTORY: TableDefinition<&str, &str> = TableDefinition::new("history_v1");

/// Fixed name of the history entry
pub const HISTORY_KEY: &str = "short_history";

/// Creates or opens the database file and makes sure the history table exists
///
/// # Example
///
/// ```no_run
/// # use shortener_client::database::init_db;
/// let db = init_db("history.db").expect("Failed to initialize database");
/// ```
pub fn init_db(db_path: &str) -> Result<Database, redb::Error> {
    let db = Database::create(db_path)?;

    let write_txn = db.begin_write()?;
    {
        write_txn.open_table(TABLE_HISTORY)?;
    }
    write_txn.commit()?;

    Ok(db)
}
