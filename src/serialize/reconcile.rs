//! Keyed reconciliation of one parent's entry elements against a desired list.
//!
//! Children of the parent are split into fixed nodes and entry slots. Entries
//! already in the document are reused by key (so unknown attributes survive),
//! a lone renamed entry keeps its element, and the result is laid
//! back into the original slot positions. Surplus slots disappear with their
//! indentation; extra entries follow the last slot.

use super::layout;
use crate::xml::{XmlElement, XmlNode};
use std::collections::HashSet;

/// How one kind of entry element maps onto model items.
pub(crate) trait Entries {
    type Item;

    /// Key of an entry element, or `None` when the element is not an entry.
    fn key_of(&self, element: &XmlElement) -> Option<String>;

    fn item_key<'a>(&self, item: &'a Self::Item) -> &'a str;

    /// Build a fresh element for an item positioned at `indent`.
    fn create(&self, item: &Self::Item, indent: &str) -> XmlElement;

    /// Bring a reused element in line with an item.
    fn update(&self, item: &Self::Item, element: &mut XmlElement, indent: &str);

    /// Whether comments directly above an entry travel with it.
    fn attach_comments(&self) -> bool {
        false
    }
}

enum Segment {
    Fixed(XmlNode),
    Slot,
}

struct Unit {
    lead: Vec<XmlNode>,
    element: XmlElement,
    key: String,
}

impl Unit {
    /// Indentation of the element, from the whitespace right before it.
    fn indent(&self) -> Option<String> {
        match self.lead.last() {
            Some(XmlNode::Text(ws)) => layout::last_line(ws).map(str::to_string),
            _ => None,
        }
    }

    /// Drop the comments carried above the element, keeping its indentation.
    fn detach_comments(&mut self) {
        let indent = match self.lead.pop() {
            Some(ws @ XmlNode::Text(_)) if ws.is_whitespace() => ws,
            _ => XmlNode::Text("\n".to_string()),
        };
        self.lead = vec![indent];
    }
}

/// Reconcile the entries of `parent` with `items`.
///
/// `parent_indent` is the indentation of `parent` itself and `unit` the
/// document's indentation step; both only matter for newly created entries.
pub(crate) fn reconcile<E: Entries>(
    parent: &mut XmlElement,
    entries: &E,
    items: &[E::Item],
    parent_indent: &str,
    unit: &str,
) {
    let fallback_indent = layout::first_child_indent(parent)
        .unwrap_or_else(|| format!("{}{}", parent_indent, unit));
    let (segments, units) = split(parent, entries);
    let slot_count = units.len();

    let child_indent = units
        .iter()
        .rev()
        .find_map(Unit::indent)
        .unwrap_or(fallback_indent);

    let mut placed = assign(units, entries, items, &child_indent);

    if slot_count == 0 {
        let mut fixed: Vec<XmlNode> = segments
            .into_iter()
            .filter_map(|s| match s {
                Segment::Fixed(node) => Some(node),
                Segment::Slot => None,
            })
            .collect();
        let ends_on_newline = matches!(
            fixed.last(),
            Some(XmlNode::Text(ws)) if ws.contains('\n') && ws.trim().is_empty()
        );
        let trailing = if ends_on_newline { fixed.pop() } else { None };
        *parent.children_mut() = fixed;
        if placed.is_empty() {
            parent.children_mut().extend(trailing);
            return;
        }
        for unit in placed {
            parent.children_mut().extend(unit.lead);
            parent.children_mut().push(XmlNode::Element(unit.element));
        }
        parent.children_mut().push(
            trailing.unwrap_or_else(|| XmlNode::Text(format!("\n{}", parent_indent))),
        );
        return;
    }

    let mut rest = placed.split_off(slot_count.min(placed.len()));
    let mut in_slot_order = placed.into_iter();
    let mut children = Vec::new();
    let mut slot = 0;
    for segment in segments {
        match segment {
            Segment::Fixed(node) => children.push(node),
            Segment::Slot => {
                if let Some(unit) = in_slot_order.next() {
                    children.extend(unit.lead);
                    children.push(XmlNode::Element(unit.element));
                }
                slot += 1;
                if slot == slot_count {
                    for unit in rest.drain(..) {
                        children.extend(unit.lead);
                        children.push(XmlNode::Element(unit.element));
                    }
                }
            }
        }
    }
    *parent.children_mut() = children;
}

/// Separate the children of `parent` into fixed segments and entry units.
fn split<E: Entries>(parent: &mut XmlElement, entries: &E) -> (Vec<Segment>, Vec<Unit>) {
    let mut segments = Vec::new();
    let mut units = Vec::new();

    for node in std::mem::take(parent.children_mut()) {
        let key = node
            .as_element()
            .and_then(|e| entries.key_of(e))
            .filter(|k| !k.is_empty());
        let (key, element) = match (key, node) {
            (Some(key), XmlNode::Element(element)) => (key, element),
            (_, other) => {
                segments.push(Segment::Fixed(other));
                continue;
            }
        };

        let mut lead = Vec::new();
        take_whitespace(&mut segments, &mut lead);
        if entries.attach_comments() {
            while !gap_has_blank_line(&lead)
                && matches!(segments.last(), Some(Segment::Fixed(n)) if n.is_comment())
            {
                if let Some(Segment::Fixed(comment)) = segments.pop() {
                    lead.insert(0, comment);
                }
                take_whitespace(&mut segments, &mut lead);
            }
        }

        segments.push(Segment::Slot);
        units.push(Unit { lead, element, key });
    }

    (segments, units)
}

fn take_whitespace(segments: &mut Vec<Segment>, lead: &mut Vec<XmlNode>) {
    if matches!(segments.last(), Some(Segment::Fixed(n)) if n.is_whitespace())
        && let Some(Segment::Fixed(ws)) = segments.pop()
    {
        lead.insert(0, ws);
    }
}

/// A blank line between a comment and what follows it detaches the comment.
fn gap_has_blank_line(lead: &[XmlNode]) -> bool {
    match lead.first() {
        Some(XmlNode::Text(ws)) => ws.matches('\n').count() > 1,
        _ => false,
    }
}

/// Pair every item with a unit: same key first, then newly created ones.
///
/// An element whose key disappeared is reused only for a rename: it must be
/// the single orphan, the item must be the single unmatched one, and both
/// must sit at the same position. Anything else is a delete plus an add, and
/// the deleted element goes away with its attributes and comments.
fn assign<E: Entries>(
    units: Vec<Unit>,
    entries: &E,
    items: &[E::Item],
    child_indent: &str,
) -> Vec<Unit> {
    let wanted: HashSet<&str> = items.iter().map(|i| entries.item_key(i)).collect();
    let mut pool: Vec<Option<Unit>> = units.into_iter().map(Some).collect();
    let mut chosen: Vec<Option<Unit>> = Vec::with_capacity(items.len());

    for item in items {
        let key = entries.item_key(item);
        let found = pool
            .iter()
            .position(|u| u.as_ref().is_some_and(|u| u.key == key));
        chosen.push(found.and_then(|i| pool[i].take()));
    }

    let unmatched: Vec<usize> = (0..chosen.len()).filter(|&i| chosen[i].is_none()).collect();
    let orphans: Vec<usize> = (0..pool.len())
        .filter(|&i| {
            pool[i]
                .as_ref()
                .is_some_and(|u| !wanted.contains(u.key.as_str()))
        })
        .collect();
    if let ([item_index], [orphan_index]) = (unmatched.as_slice(), orphans.as_slice())
        && item_index == orphan_index
        && let Some(mut unit) = pool[*orphan_index].take()
    {
        if entries.attach_comments() {
            unit.detach_comments();
        }
        chosen[*item_index] = Some(unit);
    }

    items
        .iter()
        .zip(chosen)
        .map(|(item, reused)| match reused {
            Some(mut unit) => {
                let indent = unit.indent().unwrap_or_else(|| child_indent.to_string());
                entries.update(item, &mut unit.element, &indent);
                unit.key = entries.item_key(item).to_string();
                unit
            }
            None => Unit {
                lead: vec![XmlNode::Text(format!("\n{}", child_indent))],
                element: entries.create(item, child_indent),
                key: entries.item_key(item).to_string(),
            },
        })
        .collect()
}
