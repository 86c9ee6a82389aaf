//! Name-based attribute inference for local Ollama models.
//!
//! Ollama's tag listing carries no context window or capability data, so these
//! pure functions estimate them from the model name alone. Nothing here does
//! I/O.

use super::local::RawLocalModel;
use super::types::Model;
use crate::constants::{
    LOCAL_CODELLAMA_CONTEXT_WINDOW, LOCAL_DEFAULT_CONTEXT_WINDOW, LOCAL_LLAMA_CONTEXT_WINDOW,
};

/// Context window rules, applied in order; a later match overrides an earlier one.
const CONTEXT_WINDOW_RULES: &[(&str, u64)] = &[
    ("llama", LOCAL_LLAMA_CONTEXT_WINDOW),
    ("mistral", LOCAL_LLAMA_CONTEXT_WINDOW),
    ("codellama", LOCAL_CODELLAMA_CONTEXT_WINDOW),
];

const IMAGE_MARKERS: &[&str] = &["vision", "llava"];
const LARGE_MARKERS: &[&str] = &["70b", "13b"];
const SMALL_MARKERS: &[&str] = &["7b", "3b"];

/// Turns `"codellama:7b"` into `"codellama (7b)"`.
///
/// Splits on the first `:` only, so the whole remainder becomes the tag:
/// `"a:b:c"` gives `"a (b:c)"` where a split on every `:` would drop `c`.
/// Names without a tag are returned unchanged.
pub fn display_name(raw: &str) -> String {
    match raw.split_once(':') {
        Some((base, tag)) => format!("{base} ({tag})"),
        None => raw.to_string(),
    }
}

/// Estimates the context window from the model name.
pub fn context_window(raw: &str) -> u64 {
    let name = raw.to_lowercase();
    CONTEXT_WINDOW_RULES
        .iter()
        .filter(|(needle, _)| name.contains(needle))
        .map(|(_, window)| *window)
        .last()
        .unwrap_or(LOCAL_DEFAULT_CONTEXT_WINDOW)
}

/// Default completion budget: a quarter of the context window.
pub fn default_max_tokens(context_window: u64) -> u64 {
    context_window / 4
}

pub fn supports_images(raw: &str) -> bool {
    let name = raw.to_lowercase();
    IMAGE_MARKERS.iter().any(|marker| name.contains(marker))
}

/// Converts an Ollama tag entry into a catalog [`Model`]. Local models cost nothing.
pub fn convert(raw: &RawLocalModel) -> Model {
    let context_window = context_window(&raw.name);
    Model {
        id: raw.name.clone(),
        name: display_name(&raw.name),
        cost_per_1m_in: 0.0,
        cost_per_1m_out: 0.0,
        cost_per_1m_in_cached: 0.0,
        cost_per_1m_out_cached: 0.0,
        context_window,
        default_max_tokens: default_max_tokens(context_window),
        can_reason: false,
        has_reasoning_efforts: false,
        supports_attachments: supports_images(&raw.name),
    }
}

/// Picks the `(large, small)` default model IDs for the local provider.
///
/// Large is the first model whose name mentions a 70b/13b size and small the
/// first mentioning 7b/3b, each from its own scan. Without a large match the
/// first model is used; without a small match the second model, or the large
/// one when there is only one. Returns `None` for an empty list.
pub fn pick_default_models(models: &[Model]) -> Option<(String, String)> {
    let first = models.first()?;
    let find = |markers: &[&str]| {
        models
            .iter()
            .find(|m| {
                let name = m.name.to_lowercase();
                markers.iter().any(|marker| name.contains(marker))
            })
            .map(|m| m.id.clone())
    };

    let large = find(LARGE_MARKERS).unwrap_or_else(|| first.id.clone());
    let small = find(SMALL_MARKERS)
        .or_else(|| models.get(1).map(|m| m.id.clone()))
        .unwrap_or_else(|| large.clone());
    Some((large, small))
}
