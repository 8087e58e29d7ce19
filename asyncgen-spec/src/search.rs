//! Search utilities for documents with fuzzy matching

use crate::types::AsyncApi;
use indexmap::IndexMap;
use serde::Serialize;
use strsim::levenshtein;

/// A fuzzy match suggestion with candidate name and edit distance.
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub candidate: String,
    pub distance: usize,
}

/// Which section of the document a search result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentSection {
    Server,
    Channel,
    Schema,
    Message,
    Parameter,
    SecurityScheme,
    CorrelationId,
    Bindings,
}

impl DocumentSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentSection::Server => "servers",
            DocumentSection::Channel => "channels",
            DocumentSection::Schema => "components/schemas",
            DocumentSection::Message => "components/messages",
            DocumentSection::Parameter => "components/parameters",
            DocumentSection::SecurityScheme => "components/securitySchemes",
            DocumentSection::CorrelationId => "components/correlationIds",
            DocumentSection::Bindings => "components/*Bindings",
        }
    }
}

/// How a search result was matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MatchType {
    Exact,
    CaseInsensitive,
    Contains,
}

/// A single search result from `search_document`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub name: String,
    pub section: DocumentSection,
    pub match_type: MatchType,
}

/// Suggest similar names from a list of candidates using fuzzy matching.
///
/// Returns candidates sorted by edit distance (closest first).
/// Exact matches are excluded. Case-insensitive matches get distance 0,
/// substring matches get distance 1, and Levenshtein matches use their
/// actual edit distance.
pub fn suggest_similar(name: &str, candidates: &[&str], max_distance: usize) -> Vec<Suggestion> {
    let name_lower = name.to_lowercase();
    let mut suggestions: Vec<Suggestion> = candidates
        .iter()
        .filter_map(|&candidate| {
            if candidate == name {
                return None;
            }
            let candidate_lower = candidate.to_lowercase();
            if candidate_lower == name_lower {
                return Some(Suggestion {
                    candidate: candidate.to_string(),
                    distance: 0,
                });
            }
            if candidate_lower.contains(&name_lower) || name_lower.contains(&candidate_lower) {
                return Some(Suggestion {
                    candidate: candidate.to_string(),
                    distance: 1,
                });
            }
            let dist = levenshtein(name, candidate);
            if dist <= max_distance {
                Some(Suggestion {
                    candidate: candidate.to_string(),
                    distance: dist,
                })
            } else {
                None
            }
        })
        .collect();
    suggestions.sort_by_key(|s| s.distance);
    suggestions
}

fn match_section<T>(
    entries: &IndexMap<String, T>,
    section: DocumentSection,
    query: &str,
    results: &mut Vec<SearchResult>,
) {
    let q = query.to_lowercase();
    for name in entries.keys() {
        let match_type = if name == query {
            MatchType::Exact
        } else if name.to_lowercase() == q {
            MatchType::CaseInsensitive
        } else if name.to_lowercase().contains(&q) {
            MatchType::Contains
        } else {
            continue;
        };
        results.push(SearchResult {
            name: name.clone(),
            section,
            match_type,
        });
    }
}

/// Search across the named sections of a document.
///
/// Performs case-insensitive substring matching against server names,
/// channel names and every components section. Results keep document
/// order within a section.
pub fn search_document(doc: &AsyncApi, query: &str) -> Vec<SearchResult> {
    let mut results = Vec::new();

    match_section(&doc.servers, DocumentSection::Server, query, &mut results);
    match_section(&doc.channels, DocumentSection::Channel, query, &mut results);

    if let Some(components) = &doc.components {
        match_section(&components.servers, DocumentSection::Server, query, &mut results);
        match_section(&components.channels, DocumentSection::Channel, query, &mut results);
        match_section(&components.schemas, DocumentSection::Schema, query, &mut results);
        match_section(&components.messages, DocumentSection::Message, query, &mut results);
        match_section(
            &components.parameters,
            DocumentSection::Parameter,
            query,
            &mut results,
        );
        match_section(
            &components.security_schemes,
            DocumentSection::SecurityScheme,
            query,
            &mut results,
        );
        match_section(
            &components.correlation_ids,
            DocumentSection::CorrelationId,
            query,
            &mut results,
        );
        let bindings = DocumentSection::Bindings;
        match_section(&components.server_bindings, bindings, query, &mut results);
        match_section(&components.channel_bindings, bindings, query, &mut results);
        match_section(&components.operation_bindings, bindings, query, &mut results);
        match_section(&components.message_bindings, bindings, query, &mut results);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_document_content;

    #[test]
    fn test_fuzzy_suggestions() {
        let candidates = ["UserSignedUp", "UserDeleted", "OrderPlaced"];
        let suggestions = suggest_similar("UserSignedIp", &candidates, 3);
        assert!(!suggestions.is_empty());
        assert_eq!(suggestions[0].candidate, "UserSignedUp");
    }

    #[test]
    fn test_fuzzy_case_insensitive() {
        let candidates = ["OrderPlaced", "close"];
        let suggestions = suggest_similar("orderplaced", &candidates, 3);
        assert!(!suggestions.is_empty());
        assert_eq!(suggestions[0].candidate, "OrderPlaced");
        assert_eq!(suggestions[0].distance, 0);
    }

    #[test]
    fn test_fuzzy_no_exact_match() {
        let candidates = ["OrderPlaced"];
        let suggestions = suggest_similar("OrderPlaced", &candidates, 3);
        assert!(suggestions.is_empty(), "exact matches should be excluded");
    }

    #[test]
    fn test_search_document() {
        let doc = parse_document_content(
            r#"{
                "servers": { "orders-kafka": { "url": "k:9092", "protocol": "kafka" } },
                "channels": { "orders/created": {}, "users/created": {} },
                "components": {
                    "messages": { "OrderCreated": {} },
                    "schemas": { "Order": {}, "User": {} }
                }
            }"#,
        )
        .unwrap();

        let results = search_document(&doc, "order");
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["orders-kafka", "orders/created", "Order", "OrderCreated"]
        );
        assert_eq!(results[2].section, DocumentSection::Schema);
        assert_eq!(results[2].match_type, MatchType::CaseInsensitive);
    }
}
