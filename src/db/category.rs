/// Category database queries.
use rusqlite::{Connection, OptionalExtension, Row};

use crate::types::{Category, CategoryId, CategoryPayload};

fn from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        is_income: row.get(2)?,
        icon_name: row.get(3)?,
    })
}

pub fn create_category(payload: &CategoryPayload, conn: &Connection) -> rusqlite::Result<Category> {
    conn.execute(
        "INSERT INTO categories (name, is_income, icon_name) VALUES (?1, ?2, ?3)",
        (&payload.name, payload.is_income, &payload.icon_name),
    )?;
    let id = conn.last_insert_rowid();
    Ok(Category {
        id,
        name: payload.name.clone(),
        icon_name: payload.icon_name.clone(),
        is_income: payload.is_income,
    })
}

pub fn update_category(
    id: CategoryId,
    payload: &CategoryPayload,
    conn: &Connection,
) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE categories SET name = ?1, is_income = ?2, icon_name = ?3 WHERE id = ?4",
        (&payload.name, payload.is_income, &payload.icon_name, id),
    )?;
    Ok(changed > 0)
}

/// Deletes a category; its transactions become uncategorized.
pub fn delete_category(id: CategoryId, conn: &Connection) -> rusqlite::Result<bool> {
    conn.execute(
        "UPDATE transactions SET category_id = NULL WHERE category_id = ?1",
        [id],
    )?;
    let changed = conn.execute("DELETE FROM categories WHERE id = ?1", [id])?;
    Ok(changed > 0)
}

pub fn query_categories(conn: &Connection) -> rusqlite::Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, is_income, icon_name FROM categories ORDER BY name COLLATE NOCASE",
    )?;
    let rows = stmt.query_map([], from_row)?;
    let mut categories = Vec::new();
    for row in rows {
        categories.push(row?);
    }
    Ok(categories)
}

pub fn query_category_by_id(id: CategoryId, conn: &Connection) -> rusqlite::Result<Option<Category>> {
    conn.query_row(
        "SELECT id, name, is_income, icon_name FROM categories WHERE id = ?1",
        [id],
        from_row,
    )
    .optional()
}

fn query_category_id(name: &str, conn: &Connection) -> rusqlite::Result<Option<CategoryId>> {
    conn.query_row("SELECT id FROM categories WHERE name = ?1", [name], |row| {
        row.get(0)
    })
    .optional()
}

/// Whether `name` is taken by a category other than `except`.
pub fn check_category_name_taken(
    name: &str,
    except: Option<CategoryId>,
    conn: &Connection,
) -> rusqlite::Result<bool> {
    Ok(match query_category_id(name, conn)? {
        Some(id) => Some(id) != except,
        None => false,
    })
}
