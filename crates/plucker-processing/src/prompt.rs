//! Prompt text heuristic over an embedded node graph.
//!
//! The `prompt` entry is a JSON object mapping node ids to nodes shaped like
//! `{"class_type": "...", "_meta": {"title": "..."}, "inputs": {...}}`. Only
//! those fields are consulted; anything else in a node is ignored, and nodes
//! that are not objects are skipped.

use crate::error::MetadataError;
use serde_json::{Map, Value};

/// Join separator between distinct prompt texts.
const PROMPT_SEPARATOR: &str = "\n\n";

/// Fallback texts must be longer than this many characters.
const MIN_FALLBACK_TEXT_CHARS: usize = 5;

/// Read-only view of one graph node.
#[derive(Clone, Copy)]
struct Node<'a>(&'a Map<String, Value>);

impl<'a> Node<'a> {
    fn class_type(self) -> &'a str {
        self.0.get("class_type").and_then(Value::as_str).unwrap_or("")
    }

    fn title(self) -> &'a str {
        self.0
            .get("_meta")
            .and_then(|meta| meta.get("title"))
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    fn input(self, name: &str) -> Option<&'a Value> {
        self.0.get("inputs").and_then(|inputs| inputs.get(name))
    }

    fn text(self) -> Option<&'a str> {
        self.input("text").and_then(Value::as_str)
    }

    /// Source node id of a `[node_id, output_index]` link input.
    fn link_source(self, name: &str) -> Option<String> {
        match self.input(name)?.as_array()?.as_slice() {
            [Value::String(id), _] => Some(id.clone()),
            [Value::Number(id), _] => Some(id.to_string()),
            _ => None,
        }
    }
}

struct Graph<'a>(&'a Map<String, Value>);

impl<'a> Graph<'a> {
    fn node(&self, id: &str) -> Option<Node<'a>> {
        let map: &'a Map<String, Value> = self.0;
        map.get(id).and_then(Value::as_object).map(Node)
    }

    fn nodes(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let map: &'a Map<String, Value> = self.0;
        map.values().filter_map(Value::as_object).map(Node)
    }
}

/// Extract the positive prompt text from a serialized node graph.
///
/// Returns `Ok(None)` when the graph parses but no prompt text can be found.
pub fn extract_prompt_text(prompt_json: &str) -> Result<Option<String>, MetadataError> {
    let value: Value = serde_json::from_str(prompt_json)?;
    let map = value
        .as_object()
        .ok_or_else(|| MetadataError::PromptGraph("prompt graph is not a JSON object".to_string()))?;
    let graph = Graph(map);

    let from_samplers = sampler_prompts(&graph);
    if !from_samplers.is_empty() {
        return Ok(Some(join_distinct(from_samplers)));
    }

    let from_encoders = encoder_prompts(&graph);
    if !from_encoders.is_empty() {
        return Ok(Some(join_distinct(from_encoders)));
    }

    Ok(None)
}

/// Texts of the nodes wired into each sampler's `positive` input.
fn sampler_prompts<'a>(graph: &Graph<'a>) -> Vec<&'a str> {
    graph
        .nodes()
        .filter(|node| node.class_type().contains("Sampler"))
        .filter_map(|sampler| sampler.link_source("positive"))
        .filter_map(|source| graph.node(&source))
        .filter_map(|source| source.text())
        .filter(|text| !text.trim().is_empty())
        .collect()
}

/// Texts of every text-encoder node not titled as a negative prompt.
fn encoder_prompts<'a>(graph: &Graph<'a>) -> Vec<&'a str> {
    graph
        .nodes()
        .filter(|node| node.class_type().contains("CLIPTextEncode"))
        .filter(|node| !node.title().to_lowercase().contains("negative"))
        .filter_map(|node| node.text())
        .filter(|text| text.chars().count() > MIN_FALLBACK_TEXT_CHARS)
        .collect()
}

/// Drop repeats (first occurrence wins) and join.
fn join_distinct(texts: Vec<&str>) -> String {
    let mut distinct: Vec<&str> = Vec::with_capacity(texts.len());
    for text in texts {
        if !distinct.contains(&text) {
            distinct.push(text);
        }
    }
    distinct.join(PROMPT_SEPARATOR)
}
