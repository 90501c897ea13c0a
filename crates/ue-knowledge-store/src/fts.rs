//! `search_fts`, FTS maintenance (spec §4.3).

use rusqlite::Connection;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::store::Store;
use crate::types::{SearchFilters, SearchResult};

impl Store {
    /// Accepts native FTS5 `MATCH` query syntax. A malformed query returns an
    /// empty result rather than an error (spec §4.3).
    pub fn search_fts(
        &self,
        query: &str,
        filters: &SearchFilters,
        k: usize,
        offset: usize,
    ) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.pool.with_reader(|conn| run_search_fts(conn, query, filters, k, offset))
    }

    /// After a forced full reindex the FTS shadow table may drift from
    /// `docs`; `is_fts_dirty` compares row counts as a cheap signal.
    pub fn is_fts_dirty(&self) -> Result<bool> {
        self.pool.with_reader(|conn| {
            let docs_count: i64 = conn.query_row("SELECT COUNT(*) FROM docs", [], |r| r.get(0))?;
            let fts_count: i64 = conn.query_row("SELECT COUNT(*) FROM docs_fts", [], |r| r.get(0))?;
            Ok(docs_count != fts_count)
        })
    }

    pub fn rebuild_fts(&self) -> Result<()> {
        self.pool.with_writer(|conn| {
            conn.execute("INSERT INTO docs_fts(docs_fts) VALUES ('delete-all')", [])?;
            conn.execute(
                "INSERT INTO docs_fts(rowid, doc_id, name, path, text)
                 SELECT rowid, doc_id, name, path, text FROM docs",
                [],
            )?;
            Ok(())
        })
    }
}

fn run_search_fts(
    conn: &Connection,
    query: &str,
    filters: &SearchFilters,
    k: usize,
    offset: usize,
) -> Result<Vec<SearchResult>> {
    let mut sql = String::from(
        "SELECT d.doc_id, d.type, d.path, d.name, d.module, d.asset_type, d.text, d.metadata,
                bm25(docs_fts) AS rank
         FROM docs_fts
         JOIN docs d ON d.rowid = docs_fts.rowid
         WHERE docs_fts MATCH ?1",
    );
    let mut args: Vec<Box<dyn rusqlite::types::ToSql>> = vec![Box::new(query.to_string())];
    push_filters(&mut sql, &mut args, filters);
    sql.push_str(" ORDER BY rank LIMIT ?");
    args.push(Box::new(k as i64));
    sql.push_str(" OFFSET ?");
    args.push(Box::new(offset as i64));

    let mut stmt = match conn.prepare(&sql) {
        Ok(s) => s,
        Err(_) => return Ok(Vec::new()),
    };
    let param_refs: Vec<&dyn rusqlite::types::ToSql> = args.iter().map(AsRef::as_ref).collect();
    let rows = stmt.query_map(param_refs.as_slice(), |row| {
        let metadata_json: String = row.get(7)?;
        let bm25: f64 = row.get(8)?;
        Ok(SearchResult {
            doc_id: row.get(0)?,
            kind: row.get(1)?,
            path: row.get(2)?,
            name: row.get(3)?,
            module: row.get(4)?,
            asset_type: row.get(5)?,
            text: row.get(6)?,
            metadata: serde_json::from_str::<Map<String, Value>>(&metadata_json).unwrap_or_default(),
            score: -bm25 as f32,
        })
    });
    let rows = match rows {
        Ok(r) => r,
        Err(_) => return Ok(Vec::new()),
    };

    let mut results = Vec::new();
    for row in rows {
        match row {
            Ok(r) => results.push(r),
            Err(_) => return Ok(Vec::new()),
        }
    }
    Ok(results)
}

fn push_filters(
    sql: &mut String,
    args: &mut Vec<Box<dyn rusqlite::types::ToSql>>,
    filters: &SearchFilters,
) {
    if let Some(kind) = &filters.kind {
        sql.push_str(" AND d.type = ?");
        args.push(Box::new(kind.clone()));
    }
    if let Some(prefix) = &filters.path_prefix {
        sql.push_str(" AND d.path LIKE ? ESCAPE '\\'");
        args.push(Box::new(format!("{}%", escape_like(prefix))));
    }
    if let Some(module) = &filters.module {
        sql.push_str(" AND d.module = ?");
        args.push(Box::new(module.clone()));
    }
    if let Some(asset_type) = &filters.asset_type {
        sql.push_str(" AND d.asset_type = ?");
        args.push(Box::new(asset_type.clone()));
    }
}

fn escape_like(input: &str) -> String {
    input.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}
