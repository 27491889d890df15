use rusqlite::{Connection, OptionalExtension};

use crate::types::{Tag, TagId, TagPayload};

pub fn create_tag(payload: &TagPayload, conn: &Connection) -> rusqlite::Result<Tag> {
    conn.execute("INSERT INTO tags (name) VALUES (?1)", [&payload.name])?;
    Ok(Tag {
        id: conn.last_insert_rowid(),
        name: payload.name.clone(),
    })
}

pub fn update_tag(id: TagId, payload: &TagPayload, conn: &Connection) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE tags SET name = ?1 WHERE id = ?2",
        (&payload.name, id),
    )?;
    Ok(changed > 0)
}

pub fn delete_tag(id: TagId, conn: &Connection) -> rusqlite::Result<bool> {
    let changed = conn.execute("DELETE FROM tags WHERE id = ?1", [id])?;
    Ok(changed > 0)
}

pub fn query_tags(conn: &Connection) -> rusqlite::Result<Vec<Tag>> {
    let mut stmt = conn.prepare("SELECT id, name FROM tags ORDER BY name COLLATE NOCASE")?;
    let rows = stmt.query_map([], |row| {
        Ok(Tag {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;
    let mut tags = Vec::new();
    for row in rows {
        tags.push(row?);
    }
    Ok(tags)
}

pub fn query_tag_by_id(id: TagId, conn: &Connection) -> rusqlite::Result<Option<Tag>> {
    conn.query_row("SELECT id, name FROM tags WHERE id = ?1", [id], |row| {
        Ok(Tag {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })
    .optional()
}

pub fn check_tag_name_taken(
    name: &str,
    except: Option<TagId>,
    conn: &Connection,
) -> rusqlite::Result<bool> {
    let existing: Option<TagId> = conn
        .query_row("SELECT id FROM tags WHERE name = ?1", [name], |row| row.get(0))
        .optional()?;
    Ok(existing.is_some_and(|id| Some(id) != except))
}
