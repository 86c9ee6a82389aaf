//! Provider and model listing.
//!
//! Renders the registry's provider list for the terminal. Isolates
//! display concerns from the catalog core; nothing here mutates providers.

use anyhow::{bail, Result};
use colored::Colorize;
use std::fmt::Write;
use std::path::Path;

use crate::catalog::{CacheStatus, Model, Provider};

/// One line per provider: ID, name, protocol, model count, and default models.
pub fn render_providers(providers: &[Provider]) -> String {
    let mut out = String::from("Available providers:\n\n");
    for provider in providers {
        let local = if provider.is_local() { " (local)" } else { "" };
        let _ = writeln!(
            out,
            "  {}{} {} [{}] {} models",
            provider.id.bold(),
            local,
            provider.name,
            provider.kind,
            provider.models.len()
        );
        let _ = writeln!(
            out,
            "    {} {}  {} {}",
            "large:".dimmed(),
            or_dash(&provider.default_large_model_id),
            "small:".dimmed(),
            or_dash(&provider.default_small_model_id)
        );
    }
    out
}

/// Lists models grouped by provider, optionally restricted to one provider ID.
///
/// # Errors
///
/// Returns an error when `only` names a provider that is not in the list.
pub fn render_models(providers: &[Provider], only: Option<&str>) -> Result<String> {
    let selected: Vec<&Provider> = providers
        .iter()
        .filter(|p| only.map_or(true, |id| p.id.eq_ignore_ascii_case(id)))
        .collect();
    if let (Some(id), true) = (only, selected.is_empty()) {
        let known: Vec<&str> = providers.iter().map(|p| p.id.as_str()).collect();
        bail!("Unknown provider: {id}. Available: {}", known.join(", "));
    }

    let mut out = String::from("Available models:\n");
    for provider in selected {
        let _ = writeln!(out, "\n  {}:", provider.id);
        if provider.models.is_empty() {
            let _ = writeln!(out, "    (no models)");
        }
        for model in &provider.models {
            let _ = writeln!(out, "    {}{}", describe_model(model), markers(provider, model));
        }
    }
    Ok(out)
}

/// Describes the provider cache file for `kaze-catalog cache`.
pub fn render_cache_status(path: &Path, status: CacheStatus) -> String {
    let state = match (status.exists, status.stale) {
        (false, _) => "missing".yellow(),
        (true, true) => "stale".yellow(),
        (true, false) => "fresh".green(),
    };
    format!("cache: {}\nstatus: {}\n", path.display(), state)
}

fn describe_model(model: &Model) -> String {
    let mut line = format!(
        "{}  {}  {}k ctx",
        model.id,
        model.display_name().dimmed(),
        model.context_window / 1_000
    );
    if model.supports_attachments {
        line.push_str("  images");
    }
    if model.is_free() {
        line.push_str("  free");
    } else {
        let _ = write!(
            line,
            "  ${:.2}/${:.2} per 1M",
            model.cost_per_1m_in, model.cost_per_1m_out
        );
    }
    line
}

fn markers(provider: &Provider, model: &Model) -> &'static str {
    let large = model.id == provider.default_large_model_id;
    let small = model.id == provider.default_small_model_id;
    match (large, small) {
        (true, true) => " (default large, small)",
        (true, false) => " (default large)",
        (false, true) => " (default small)",
        (false, false) => "",
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
