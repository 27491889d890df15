/// Transaction database queries.
use chrono::NaiveDateTime;
use rusqlite::{Connection, Row, types::Type};

use crate::types::{Transaction, TransactionKind, TransactionPayload};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub(crate) fn parse_stored_date(idx: usize, value: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let date: String = row.get(1)?;
    let kind: String = row.get(4)?;
    Ok(Transaction {
        id: row.get(0)?,
        txn_date: parse_stored_date(1, &date)?,
        description: row.get(2)?,
        amount: row.get(3)?,
        kind: TransactionKind::parse(&kind).unwrap_or(TransactionKind::Debit),
        account_id: row.get(5)?,
        category_id: row.get(6)?,
    })
}

pub fn create_transaction(
    payload: &TransactionPayload,
    conn: &Connection,
) -> rusqlite::Result<Transaction> {
    conn.execute(
        "INSERT INTO transactions (txn_date, description, amount, type, source, account_id, category_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        (
            payload.txn_date.format(DATE_FORMAT).to_string(),
            &payload.description,
            payload.amount,
            payload.kind.as_str(),
            &payload.source,
            payload.account_id,
            payload.category_id,
        ),
    )?;
    Ok(Transaction {
        id: conn.last_insert_rowid(),
        txn_date: payload.txn_date,
        description: payload.description.clone(),
        amount: payload.amount,
        kind: payload.kind,
        account_id: payload.account_id,
        category_id: payload.category_id,
    })
}

/// Most recent transactions between `start` (inclusive) and `end` (exclusive).
pub fn query_recent_transactions(
    start: NaiveDateTime,
    end: NaiveDateTime,
    limit: usize,
    conn: &Connection,
) -> rusqlite::Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, txn_date, description, amount, type, account_id, category_id
         FROM transactions
         WHERE txn_date >= ?1 AND txn_date < ?2
         ORDER BY txn_date DESC, id DESC
         LIMIT ?3",
    )?;
    let rows = stmt.query_map(
        (
            start.format(DATE_FORMAT).to_string(),
            end.format(DATE_FORMAT).to_string(),
            limit as i64,
        ),
        from_row,
    )?;
    let mut transactions = Vec::new();
    for row in rows {
        transactions.push(row?);
    }
    Ok(transactions)
}
