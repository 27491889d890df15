/// SQLite store: categories, tags, accounts, transactions and dashboard aggregates.
mod account;
mod category;
mod dashboard;
mod migrations;
mod tag;
mod transaction;

use std::path::Path;

use rusqlite::Connection;

pub use account::{
    check_account_name_taken, count_account_transactions, create_account, delete_account,
    query_account_by_id, query_accounts, update_account,
};
pub use category::{
    check_category_name_taken, create_category, delete_category, query_categories,
    query_category_by_id, update_category,
};
pub use dashboard::month_summary;
pub use tag::{check_tag_name_taken, create_tag, delete_tag, query_tag_by_id, query_tags, update_tag};
pub use transaction::create_transaction;

/// Opens (or creates) the SQLite database and runs migrations.
pub fn init(db_path: &Path) -> rusqlite::Result<Connection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn = Connection::open(db_path)?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// In-memory database with the full schema.
pub fn init_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}
