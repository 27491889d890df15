/// Account database queries.
use rusqlite::{Connection, OptionalExtension, Row};

use crate::types::{Account, AccountId, AccountPayload};

fn from_row(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
        provider: row.get(3)?,
        account_number: row.get(4)?,
    })
}

pub fn create_account(payload: &AccountPayload, conn: &Connection) -> rusqlite::Result<Account> {
    conn.execute(
        "INSERT INTO accounts (name, type, provider, account_number) VALUES (?1, ?2, ?3, ?4)",
        (
            &payload.name,
            &payload.kind,
            &payload.provider,
            &payload.account_number,
        ),
    )?;
    Ok(Account {
        id: conn.last_insert_rowid(),
        name: payload.name.clone(),
        kind: payload.kind.clone(),
        provider: payload.provider.clone(),
        account_number: payload.account_number.clone(),
    })
}

pub fn update_account(
    id: AccountId,
    payload: &AccountPayload,
    conn: &Connection,
) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE accounts SET name = ?1, type = ?2, provider = ?3, account_number = ?4 WHERE id = ?5",
        (
            &payload.name,
            &payload.kind,
            &payload.provider,
            &payload.account_number,
            id,
        ),
    )?;
    Ok(changed > 0)
}

pub fn delete_account(id: AccountId, conn: &Connection) -> rusqlite::Result<bool> {
    let changed = conn.execute("DELETE FROM accounts WHERE id = ?1", [id])?;
    Ok(changed > 0)
}

pub fn query_accounts(conn: &Connection) -> rusqlite::Result<Vec<Account>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, type, provider, account_number FROM accounts ORDER BY name COLLATE NOCASE",
    )?;
    let rows = stmt.query_map([], from_row)?;
    let mut accounts = Vec::new();
    for row in rows {
        accounts.push(row?);
    }
    Ok(accounts)
}

pub fn query_account_by_id(id: AccountId, conn: &Connection) -> rusqlite::Result<Option<Account>> {
    conn.query_row(
        "SELECT id, name, type, provider, account_number FROM accounts WHERE id = ?1",
        [id],
        from_row,
    )
    .optional()
}

pub fn check_account_name_taken(
    name: &str,
    except: Option<AccountId>,
    conn: &Connection,
) -> rusqlite::Result<bool> {
    let existing: Option<AccountId> = conn
        .query_row("SELECT id FROM accounts WHERE name = ?1", [name], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(existing.is_some_and(|id| Some(id) != except))
}

pub fn count_account_transactions(id: AccountId, conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE account_id = ?1",
        [id],
        |row| row.get(0),
    )
}
