//! DDL for the embedded store (spec §4.3, §6.2).

use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA_VERSION: i64 = 1;

const DDL: &str = r"
CREATE TABLE IF NOT EXISTS docs (
    doc_id TEXT PRIMARY KEY,
    type TEXT NOT NULL,
    path TEXT NOT NULL,
    name TEXT NOT NULL,
    module TEXT,
    asset_type TEXT,
    text TEXT NOT NULL,
    metadata TEXT NOT NULL DEFAULT '{}',
    references_out TEXT NOT NULL DEFAULT '[]',
    typed_references_out TEXT NOT NULL DEFAULT '{}',
    fingerprint TEXT NOT NULL,
    schema_version INTEGER NOT NULL,
    embed_model TEXT,
    embed_version TEXT,
    indexed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_docs_type ON docs(type);
CREATE INDEX IF NOT EXISTS idx_docs_path ON docs(path);
CREATE INDEX IF NOT EXISTS idx_docs_module ON docs(module);
CREATE INDEX IF NOT EXISTS idx_docs_fingerprint ON docs(fingerprint);

CREATE VIRTUAL TABLE IF NOT EXISTS docs_fts USING fts5(
    doc_id UNINDEXED,
    name,
    path,
    text,
    content=''
);

CREATE TRIGGER IF NOT EXISTS docs_ai AFTER INSERT ON docs BEGIN
    INSERT INTO docs_fts(rowid, doc_id, name, path, text)
    VALUES (new.rowid, new.doc_id, new.name, new.path, new.text);
END;

CREATE TRIGGER IF NOT EXISTS docs_ad AFTER DELETE ON docs BEGIN
    INSERT INTO docs_fts(docs_fts, rowid, doc_id, name, path, text)
    VALUES ('delete', old.rowid, old.doc_id, old.name, old.path, old.text);
END;

CREATE TRIGGER IF NOT EXISTS docs_au AFTER UPDATE ON docs BEGIN
    INSERT INTO docs_fts(docs_fts, rowid, doc_id, name, path, text)
    VALUES ('delete', old.rowid, old.doc_id, old.name, old.path, old.text);
    INSERT INTO docs_fts(rowid, doc_id, name, path, text)
    VALUES (new.rowid, new.doc_id, new.name, new.path, new.text);
END;

CREATE TABLE IF NOT EXISTS docs_embeddings (
    doc_id TEXT PRIMARY KEY REFERENCES docs(doc_id) ON DELETE CASCADE,
    embedding BLOB NOT NULL,
    embed_model TEXT NOT NULL,
    embed_version TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS edges (
    from_id TEXT NOT NULL,
    to_id TEXT NOT NULL,
    edge_type TEXT NOT NULL,
    metadata TEXT NOT NULL DEFAULT '{}',
    PRIMARY KEY (from_id, to_id, edge_type)
);

CREATE INDEX IF NOT EXISTS idx_edges_to ON edges(to_id);
CREATE INDEX IF NOT EXISTS idx_edges_type ON edges(edge_type);
CREATE INDEX IF NOT EXISTS idx_edges_from ON edges(from_id);

CREATE TABLE IF NOT EXISTS lightweight_assets (
    path TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    asset_type TEXT,
    references_json TEXT NOT NULL DEFAULT '[]',
    indexed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_lightweight_asset_type ON lightweight_assets(asset_type);

CREATE TABLE IF NOT EXISTS lightweight_refs (
    asset_path TEXT NOT NULL,
    ref_path TEXT NOT NULL,
    PRIMARY KEY (asset_path, ref_path)
);

CREATE INDEX IF NOT EXISTS idx_lightweight_refs_ref ON lightweight_refs(ref_path);

CREATE TABLE IF NOT EXISTS file_meta (
    abs_path TEXT PRIMARY KEY,
    mtime INTEGER NOT NULL,
    size INTEGER NOT NULL,
    asset_type TEXT
);

CREATE TABLE IF NOT EXISTS cpp_class_index (
    class_name TEXT PRIMARY KEY,
    doc_id TEXT NOT NULL,
    source_path TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tags (
    asset_path TEXT NOT NULL,
    tag TEXT NOT NULL,
    PRIMARY KEY (asset_path, tag)
);

CREATE INDEX IF NOT EXISTS idx_tags_tag ON tags(tag);

CREATE TABLE IF NOT EXISTS index_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

/// Create every table/index/trigger if missing, and apply the pragmas
/// required by the concurrency model (spec §5: WAL for concurrent readers,
/// a single writer).
pub fn initialize(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "busy_timeout", 5000)?;
    conn.execute_batch(DDL)?;

    let existing: Option<String> = conn
        .query_row(
            "SELECT value FROM index_meta WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .ok();
    if existing.is_none() {
        conn.execute(
            "INSERT INTO index_meta(key, value) VALUES ('schema_version', ?1)",
            [SCHEMA_VERSION.to_string()],
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        initialize(&conn).unwrap();
        let version: String = conn
            .query_row(
                "SELECT value FROM index_meta WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION.to_string());
    }
}
