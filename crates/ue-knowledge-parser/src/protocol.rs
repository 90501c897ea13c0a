//! Decoding for the two wire shapes the external parser emits (spec §6.1):
//! newline-delimited JSON for batch commands, and XML for a handful of
//! single-asset commands.

use serde_json::Value;

use crate::error::Result;

/// One line of a batch command's NDJSON output. A line carrying an `error`
/// field is a per-file failure, not a whole-batch one (spec §4.4, §7).
#[derive(Debug, Clone)]
pub enum BatchLine {
    Record(Value),
    Error(String),
    Malformed(String),
}

#[must_use]
pub fn decode_ndjson(output: &str) -> Vec<BatchLine> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(map)) => {
                if let Some(err) = map.get("error").and_then(Value::as_str) {
                    BatchLine::Error(err.to_string())
                } else {
                    BatchLine::Record(Value::Object(map))
                }
            }
            Ok(other) => BatchLine::Record(other),
            Err(e) => BatchLine::Malformed(e.to_string()),
        })
        .collect()
}

/// Extracted from `<asset-analysis><asset-refs>/<class-refs>/<script-refs>`
/// (spec §6.1). Any XML parse error is treated as "no references", never a
/// hard failure.
#[derive(Debug, Clone, Default)]
pub struct ParsedReferences {
    pub asset_refs: Vec<String>,
    pub class_refs: Vec<String>,
    pub script_refs: Vec<String>,
}

#[must_use]
pub fn parse_references_xml(xml: &str) -> ParsedReferences {
    let Ok(doc) = roxmltree::Document::parse(xml) else {
        return ParsedReferences::default();
    };
    let mut out = ParsedReferences::default();
    for node in doc.descendants() {
        let bucket = match node.tag_name().name() {
            "asset-refs" => &mut out.asset_refs,
            "class-refs" => &mut out.class_refs,
            "script-refs" => &mut out.script_refs,
            _ => continue,
        };
        for child in node.children().filter(|c| c.is_element()) {
            if let Some(text) = child.text() {
                let text = text.trim();
                if !text.is_empty() {
                    bucket.push(text.to_string());
                }
            }
        }
    }
    out
}

pub fn decode_json(output: &str) -> Result<Value> {
    Ok(serde_json::from_str(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndjson_splits_records_errors_and_malformed() {
        let output = "{\"path\":\"/Game/A\"}\n{\"error\":\"boom\"}\nnot json\n";
        let lines = decode_ndjson(output);
        assert!(matches!(lines[0], BatchLine::Record(_)));
        assert!(matches!(&lines[1], BatchLine::Error(e) if e == "boom"));
        assert!(matches!(lines[2], BatchLine::Malformed(_)));
    }

    #[test]
    fn xml_refs_parse_three_buckets() {
        let xml = r"<asset-analysis>
            <asset-refs><ref>/Game/UI/W_Healthbar</ref></asset-refs>
            <class-refs><ref>Actor</ref></class-refs>
            <script-refs><ref>/Script/Engine</ref></script-refs>
        </asset-analysis>";
        let refs = parse_references_xml(xml);
        assert_eq!(refs.asset_refs, vec!["/Game/UI/W_Healthbar".to_string()]);
        assert_eq!(refs.class_refs, vec!["Actor".to_string()]);
        assert_eq!(refs.script_refs, vec!["/Script/Engine".to_string()]);
    }

    #[test]
    fn malformed_xml_yields_empty_not_error() {
        let refs = parse_references_xml("<not-closed>");
        assert!(refs.asset_refs.is_empty());
        assert!(refs.class_refs.is_empty());
        assert!(refs.script_refs.is_empty());
    }
}
