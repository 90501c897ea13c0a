//! `semantic` mode (spec §4.7): force the retriever's semantic path,
//! except for very short non-interrogative queries, which force exact.

use ue_knowledge_retriever::{QueryType, RetrieveOptions, Retriever};
use ue_knowledge_store::SearchResult;

use crate::error::Result;
use crate::types::SearchHit;

fn is_short_non_interrogative(query: &str) -> bool {
    let token_count = query.split_whitespace().count();
    if token_count == 0 || token_count > 2 {
        return false;
    }
    const INTERROGATIVES: [&str; 7] = ["what", "how", "why", "where", "when", "which", "who"];
    let lower = query.to_ascii_lowercase();
    !INTERROGATIVES.iter().any(|w| lower.contains(w))
}

fn snippet(text: &str) -> String {
    text.chars().take(200).collect()
}

fn to_hit(result: SearchResult) -> SearchHit {
    SearchHit {
        path: result.path,
        name: result.name,
        asset_type: result.asset_type,
        snippet: Some(snippet(&result.text)),
        content: None,
        metadata: None,
        score: result.score,
    }
}

pub fn search(retriever: &Retriever<'_>, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
    let forced_type = if is_short_non_interrogative(query) { QueryType::Exact } else { QueryType::Semantic };
    let options = RetrieveOptions { k: limit, query_type: Some(forced_type), ..RetrieveOptions::default() };
    let bundle = retriever.retrieve(query, &options)?;
    Ok(bundle.results.into_iter().map(to_hit).collect())
}
