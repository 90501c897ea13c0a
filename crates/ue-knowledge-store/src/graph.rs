//! Graph traversal operations: `expand_refs`, `find_children_of`,
//! `find_assets_referencing` (spec §4.3).

use std::collections::{HashSet, VecDeque};

use rusqlite::Connection;

use crate::error::Result;
use crate::store::Store;
use crate::types::{ChildResult, GraphEdge, GraphNode, RefDirection, ReferenceGraph, ReferencingAsset};

impl Store {
    /// BFS from `doc_id` over forward/reverse/both edge directions. A node
    /// is included only if it has a backing document and (if set) its type
    /// passes `type_filters` (spec §4.3).
    pub fn expand_refs(
        &self,
        doc_id: &str,
        direction: RefDirection,
        depth: u32,
        max_nodes: usize,
        type_filters: Option<&[String]>,
    ) -> Result<ReferenceGraph> {
        self.pool
            .with_reader(|conn| bfs(conn, doc_id, direction, depth, max_nodes, type_filters))
    }

    /// BFS over `inherits_from` edges in reverse (child -> parent becomes
    /// parent -> child traversal) starting from `parent_ids`, which may mix
    /// `asset:` and `class:` IDs (spec §4.3).
    pub fn find_children_of(&self, parent_ids: &[String], max_depth: u32) -> Result<Vec<ChildResult>> {
        self.pool.with_reader(|conn| {
            let mut seen: std::collections::HashMap<String, u32> = std::collections::HashMap::new();
            let mut frontier: VecDeque<(String, u32)> =
                parent_ids.iter().map(|id| (id.clone(), 0)).collect();
            let mut results = Vec::new();

            while let Some((current, depth)) = frontier.pop_front() {
                if depth >= max_depth {
                    continue;
                }
                let mut stmt = conn.prepare(
                    "SELECT e.from_id FROM edges e WHERE e.to_id = ?1 AND e.edge_type = 'inherits_from'",
                )?;
                let children: Vec<String> = stmt
                    .query_map([&current], |row| row.get(0))?
                    .collect::<rusqlite::Result<_>>()?;

                for child_id in children {
                    if seen.contains_key(&child_id) {
                        continue;
                    }
                    seen.insert(child_id.clone(), depth + 1);
                    if let Some((path, name, asset_type)) = lookup_doc_brief(conn, &child_id)? {
                        results.push(ChildResult {
                            path,
                            name,
                            asset_type,
                            depth: depth + 1,
                        });
                        frontier.push_back((child_id, depth + 1));
                    }
                }
            }
            Ok(results)
        })
    }

    /// `(path, name, asset_type)` for a `doc_id`, or `None` if it has no
    /// backing document (spec §4.7 `trace`/ownership-chain needs this for
    /// every node it walks without pulling the full text body).
    pub fn doc_brief(&self, doc_id: &str) -> Result<Option<(String, String, Option<String>)>> {
        self.pool.with_reader(|conn| lookup_doc_brief(conn, doc_id))
    }

    /// Raw outgoing edges from `doc_id`, unfiltered (spec §4.7 `trace` mode:
    /// splitting into systems/structural/visual is the caller's job).
    pub fn outgoing_edges(&self, doc_id: &str) -> Result<Vec<GraphEdge>> {
        self.pool.with_reader(|conn| {
            let mut stmt = conn.prepare("SELECT from_id, to_id, edge_type FROM edges WHERE from_id = ?1")?;
            let rows = stmt.query_map([doc_id], |row| {
                Ok(GraphEdge { from_id: row.get(0)?, to_id: row.get(1)?, edge_type: row.get(2)? })
            })?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }

    /// Raw incoming edges to `doc_id` (spec §4.7 `trace` mode's inbound
    /// references, feeding `build_ownership_chain`).
    pub fn incoming_edges(&self, doc_id: &str) -> Result<Vec<GraphEdge>> {
        self.pool.with_reader(|conn| {
            let mut stmt = conn.prepare("SELECT from_id, to_id, edge_type FROM edges WHERE to_id = ?1")?;
            let rows = stmt.query_map([doc_id], |row| {
                Ok(GraphEdge { from_id: row.get(0)?, to_id: row.get(1)?, edge_type: row.get(2)? })
            })?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }

    /// Union of `lightweight_assets` rows referencing `target_path` and
    /// `docs` rows with an outgoing edge to `asset:<target_path>`,
    /// deduplicated by path (spec §4.3).
    pub fn find_assets_referencing(&self, target_path: &str, limit: usize) -> Result<Vec<ReferencingAsset>> {
        self.pool.with_reader(|conn| {
            let mut seen = HashSet::new();
            let mut results = Vec::new();

            let mut stmt = conn.prepare(
                "SELECT la.path, la.name, la.asset_type
                 FROM lightweight_refs lr
                 JOIN lightweight_assets la ON la.path = lr.asset_path
                 WHERE lr.ref_path = ?1",
            )?;
            let rows = stmt.query_map([target_path], |row| {
                Ok(ReferencingAsset {
                    path: row.get(0)?,
                    name: row.get(1)?,
                    asset_type: row.get(2)?,
                })
            })?;
            for row in rows {
                let row = row?;
                if seen.insert(row.path.clone()) {
                    results.push(row);
                }
            }

            let target_id = format!("asset:{target_path}");
            let mut stmt = conn.prepare(
                "SELECT d.path, d.name, d.asset_type
                 FROM edges e
                 JOIN docs d ON d.doc_id = e.from_id
                 WHERE e.to_id = ?1",
            )?;
            let rows = stmt.query_map([&target_id], |row| {
                Ok(ReferencingAsset {
                    path: row.get(0)?,
                    name: row.get(1)?,
                    asset_type: row.get(2)?,
                })
            })?;
            for row in rows {
                let row = row?;
                if seen.insert(row.path.clone()) {
                    results.push(row);
                }
            }

            results.truncate(limit);
            Ok(results)
        })
    }
}

fn lookup_doc_brief(conn: &Connection, doc_id: &str) -> Result<Option<(String, String, Option<String>)>> {
    use rusqlite::OptionalExtension;
    Ok(conn
        .query_row(
            "SELECT path, name, asset_type FROM docs WHERE doc_id = ?1",
            [doc_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?)
}

fn edge_rows(conn: &Connection, node: &str, direction: RefDirection) -> Result<Vec<(String, String, String)>> {
    let mut rows = Vec::new();
    if matches!(direction, RefDirection::Forward | RefDirection::Both) {
        let mut stmt = conn.prepare("SELECT from_id, to_id, edge_type FROM edges WHERE from_id = ?1")?;
        let found = stmt
            .query_map([node], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<rusqlite::Result<Vec<(String, String, String)>>>()?;
        rows.extend(found);
    }
    if matches!(direction, RefDirection::Reverse | RefDirection::Both) {
        let mut stmt = conn.prepare("SELECT from_id, to_id, edge_type FROM edges WHERE to_id = ?1")?;
        let found = stmt
            .query_map([node], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<rusqlite::Result<Vec<(String, String, String)>>>()?;
        rows.extend(found);
    }
    Ok(rows)
}

fn bfs(
    conn: &Connection,
    seed: &str,
    direction: RefDirection,
    depth: u32,
    max_nodes: usize,
    type_filters: Option<&[String]>,
) -> Result<ReferenceGraph> {
    let mut graph = ReferenceGraph::default();
    let mut visited = HashSet::new();
    let mut edge_seen = HashSet::new();

    let Some((seed_path, seed_name, seed_type)) = lookup_doc_brief(conn, seed)? else {
        return Ok(graph);
    };
    graph.nodes.push(GraphNode {
        doc_id: seed.to_string(),
        kind: seed_type.unwrap_or_default(),
        path: seed_path,
        name: seed_name,
        depth: 0,
    });
    visited.insert(seed.to_string());

    let mut frontier = VecDeque::new();
    frontier.push_back((seed.to_string(), 0_u32));

    while let Some((node, current_depth)) = frontier.pop_front() {
        if current_depth >= depth || graph.nodes.len() >= max_nodes {
            continue;
        }
        for (from_id, to_id, edge_type) in edge_rows(conn, &node, direction)? {
            if graph.nodes.len() >= max_nodes {
                break;
            }
            let neighbor = if from_id == node { to_id.clone() } else { from_id.clone() };
            let edge_key = (from_id.clone(), to_id.clone(), edge_type.clone());
            if edge_seen.insert(edge_key) {
                graph.edges.push(GraphEdge {
                    from_id: from_id.clone(),
                    to_id: to_id.clone(),
                    edge_type: edge_type.clone(),
                });
            }
            if visited.contains(&neighbor) {
                continue;
            }
            let Some((path, name, asset_type)) = lookup_doc_brief(conn, &neighbor)? else {
                continue;
            };
            if let Some(filters) = type_filters {
                let kind = asset_type.clone().unwrap_or_default();
                if !filters.iter().any(|f| f == &kind) {
                    continue;
                }
            }
            visited.insert(neighbor.clone());
            graph.nodes.push(GraphNode {
                doc_id: neighbor.clone(),
                kind: asset_type.unwrap_or_default(),
                path,
                name,
                depth: current_depth + 1,
            });
            frontier.push_back((neighbor, current_depth + 1));
        }
    }

    Ok(graph)
}
