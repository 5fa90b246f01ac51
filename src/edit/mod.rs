//! Edit-operation engine.
//!
//! [`apply_edit_ops`] applies a batch of [`EditOp`]s to a model, in order,
//! each op seeing the effect of the ones before it. The input model is never
//! touched: the engine works on a copy and returns it. Ops that cannot apply
//! (unknown key, duplicate add, rename collision) are skipped so that the
//! rest of the batch still lands.

mod ops;

#[cfg(test)]
mod tests;

pub use ops::EditOp;

use crate::model::{ConfigModel, PackageSource, PackageSourceMapping};
use std::collections::HashSet;

/// Apply `ops` to a copy of `model` and return the result.
pub fn apply_edit_ops(model: &ConfigModel, ops: &[EditOp]) -> ConfigModel {
    let mut current = model.clone();
    for op in ops {
        apply_one(&mut current, op);
    }
    current
}

fn apply_one(model: &mut ConfigModel, op: &EditOp) {
    match op {
        EditOp::AddSource { key, url } => add_source(model, key, url),
        EditOp::UpdateSource { key, new_key, url } => {
            update_source(model, key, new_key.as_deref(), url.as_deref())
        }
        EditOp::DeleteSource { key } => delete_source(model, key),
        EditOp::ToggleSource { key, enabled } => {
            if let Some(source) = model.sources.iter_mut().find(|s| &s.key == key) {
                source.enabled = *enabled;
            }
        }
        EditOp::SetMappings { key, patterns } => set_mappings(model, key, patterns),
        EditOp::ReorderSources { keys } => reorder_sources(model, keys),
    }
}

fn add_source(model: &mut ConfigModel, key: &str, url: &str) {
    if model.sources.iter().any(|s| s.key == key) {
        return;
    }
    model.sources.push(PackageSource::new(key, url));
}

fn update_source(model: &mut ConfigModel, key: &str, new_key: Option<&str>, url: Option<&str>) {
    let Some(index) = model.sources.iter().position(|s| s.key == key) else {
        return;
    };
    let new_key = new_key.unwrap_or(key);
    let renaming = new_key != key;
    if renaming && model.sources.iter().any(|s| s.key == new_key) {
        return;
    }

    let source = &mut model.sources[index];
    if let Some(url) = url {
        source.url = url.to_string();
    }
    if renaming {
        source.key = new_key.to_string();
        for mapping in &mut model.mappings {
            if mapping.source_key == key {
                mapping.source_key = new_key.to_string();
            }
        }
    }
}

fn delete_source(model: &mut ConfigModel, key: &str) {
    model.sources.retain(|s| s.key != key);
    model.mappings.retain(|m| m.source_key != key);
}

fn set_mappings(model: &mut ConfigModel, key: &str, patterns: &[String]) {
    match model.mappings.iter_mut().find(|m| m.source_key == key) {
        Some(mapping) => mapping.patterns = patterns.to_vec(),
        None => model
            .mappings
            .push(PackageSourceMapping::new(key, patterns.to_vec())),
    }
}

fn reorder_sources(model: &mut ConfigModel, keys: &[String]) {
    let sources = std::mem::take(&mut model.sources);
    model.sources = reorder_by(sources, keys, |s| &s.key);

    // Mappings follow the new source order; mappings for unknown keys keep
    // their relative order at the end.
    let source_order: Vec<String> = model.sources.iter().map(|s| s.key.clone()).collect();
    let mappings = std::mem::take(&mut model.mappings);
    model.mappings = reorder_by(mappings, &source_order, |m| &m.source_key);
}

/// Stable reorder: items whose key is listed come first in list order (each
/// listed key claims every item with that key), the rest follow in their
/// prior relative order. Nothing is dropped.
fn reorder_by<T>(items: Vec<T>, keys: &[String], key_of: impl Fn(&T) -> &String) -> Vec<T> {
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(slots.len());
    let mut placed = HashSet::new();

    for key in keys {
        if !placed.insert(key.as_str()) {
            continue;
        }
        for slot in slots.iter_mut() {
            if slot.as_ref().is_some_and(|item| key_of(item) == key) {
                ordered.extend(slot.take());
            }
        }
    }
    ordered.extend(slots.into_iter().flatten());
    ordered
}
