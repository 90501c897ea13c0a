//! End-to-end `KnowledgeApi` scenarios (spec §8): S3 inherits-query depth
//! and namespace disambiguation, S4 OFPA refs lookup, S5 name-prefix alias
//! search, all driven through a store seeded directly (no parser needed).

use std::collections::BTreeMap;
use std::sync::Arc;

use ue_knowledge_core::Profile;
use ue_knowledge_schema::{DocChunk, DocKind};
use ue_knowledge_search::{KnowledgeApi, SearchRequest};
use ue_knowledge_store::{LightweightAssetRow, Store};

fn doc(path: &str, name: &str, asset_type: &str, refs: Vec<(&str, &str)>) -> DocChunk {
    let mut typed = BTreeMap::new();
    for (target, label) in &refs {
        typed.insert((*target).to_string(), (*label).to_string());
    }
    DocChunk::new(
        format!("asset:{path}"),
        DocKind::AssetSummary,
        path,
        name,
        format!("{name} text"),
        None,
        Some(asset_type.to_string()),
    )
    .with_references(refs.iter().map(|(t, _)| (*t).to_string()).collect())
    .with_typed_references(typed)
}

/// S3: `GE_Damage` inherits `GE_Base`; `GE_Damage_Pistol` inherits
/// `GE_Damage`; `GE_Heal` inherits `class:GameplayEffect`. A "children of
/// GE_Base" query returns the two-generation chain at increasing depth and
/// excludes `GE_Heal`; a "children of GameplayEffect" query returns
/// `GE_Heal` via its own namespaced class edge.
#[test]
fn s3_inherits_query_resolves_depth_and_namespace() {
    let store = Store::open_in_memory().unwrap();
    store.upsert_doc(&doc("/Game/GE_Base", "GE_Base", "GameplayEffect", vec![]), None, false).unwrap();
    store
        .upsert_doc(
            &doc("/Game/GE_Damage", "GE_Damage", "GameplayEffect", vec![("asset:/Game/GE_Base", "inherits_from")]),
            None,
            false,
        )
        .unwrap();
    store
        .upsert_doc(
            &doc(
                "/Game/GE_Damage_Pistol",
                "GE_Damage_Pistol",
                "GameplayEffect",
                vec![("asset:/Game/GE_Damage", "inherits_from")],
            ),
            None,
            false,
        )
        .unwrap();
    store
        .upsert_doc(
            &doc("/Game/GE_Heal", "GE_Heal", "GameplayEffect", vec![("class:GameplayEffect", "inherits_from")]),
            None,
            false,
        )
        .unwrap();

    let api = KnowledgeApi::new(Arc::new(store), Arc::new(Profile::default()));

    let response = api.search(&SearchRequest { query: "children of GE_Base".to_string(), ..SearchRequest::default() });
    assert_eq!(response.search_type, "inherits");
    let paths: Vec<&str> = response.results.iter().map(|h| h.path.as_str()).collect();
    assert!(paths.contains(&"/Game/GE_Damage"));
    assert!(paths.contains(&"/Game/GE_Damage_Pistol"));
    assert!(!paths.contains(&"/Game/GE_Heal"));

    let damage = response.results.iter().find(|h| h.path == "/Game/GE_Damage").unwrap();
    let pistol = response.results.iter().find(|h| h.path == "/Game/GE_Damage_Pistol").unwrap();
    assert!(damage.score > pistol.score, "depth-1 result should outscore depth-2");

    let response =
        api.search(&SearchRequest { query: "children of GameplayEffect".to_string(), ..SearchRequest::default() });
    let paths: Vec<&str> = response.results.iter().map(|h| h.path.as_str()).collect();
    assert!(paths.contains(&"/Game/GE_Heal"));
}

/// S4: an OFPA `__ExternalActors__` row lists `/Game/UI/W_Healthbar` among
/// its references; `where is W_Healthbar used` resolves the bare name to
/// that path and returns the OFPA row via the reverse-reference index.
#[test]
fn s4_refs_mode_finds_ofpa_placement() {
    let store = Store::open_in_memory().unwrap();
    store
        .upsert_doc(
            &doc("/Game/UI/W_Healthbar", "W_Healthbar", "WidgetBlueprint", vec![]),
            None,
            false,
        )
        .unwrap();
    store
        .upsert_lightweight_batch(&[LightweightAssetRow {
            path: "/Game/Maps/__ExternalActors__/Valley/AB/CD/XYZ".to_string(),
            name: "XYZ".to_string(),
            asset_type: Some("Actor".to_string()),
            references: vec!["/Game/UI/W_Healthbar".to_string()],
        }])
        .unwrap();

    let api = KnowledgeApi::new(Arc::new(store), Arc::new(Profile::default()));
    let response =
        api.search(&SearchRequest { query: "where is W_Healthbar used".to_string(), ..SearchRequest::default() });
    assert_eq!(response.search_type, "refs");
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].path, "/Game/Maps/__ExternalActors__/Valley/AB/CD/XYZ");
}

/// S5: a `BP_` prefix query returns both `BP_`- and `B_`-prefixed assets
/// (alias expansion), scores exact-name matches at 1.0, and the narrow
/// `name` mode yields `detail = "full"`.
#[test]
fn s5_name_prefix_search_expands_bp_b_alias() {
    let store = Store::open_in_memory().unwrap();
    store
        .upsert_doc(
            &doc("/Game/BP_Turret", "BP_Turret", "Blueprint", vec![]),
            None,
            false,
        )
        .unwrap();
    store
        .upsert_lightweight_batch(&[LightweightAssetRow {
            path: "/Game/B_OldTurret".to_string(),
            name: "B_OldTurret".to_string(),
            asset_type: Some("Blueprint".to_string()),
            references: vec![],
        }])
        .unwrap();

    let api = KnowledgeApi::new(Arc::new(store), Arc::new(Profile::default()));
    let response = api.search(&SearchRequest { query: "BP_".to_string(), ..SearchRequest::default() });
    assert_eq!(response.search_type, "name");
    assert_eq!(response.detail, "full");
    let paths: Vec<&str> = response.results.iter().map(|h| h.path.as_str()).collect();
    assert!(paths.contains(&"/Game/BP_Turret"));
    assert!(paths.contains(&"/Game/B_OldTurret"));
}
