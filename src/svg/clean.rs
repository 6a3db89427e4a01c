//! In-place structural cleanup.
//!
//! Pass order:
//! 1. strip comments (regex, counted)
//! 2. drop metadata subtrees (`title`, `desc`, `metadata`, DC/CC/RDF elements)
//! 3. drop obsolete root attributes
//! 4. drop design-tool and no-op attributes (counted)
//! 5. collapse empty and invisible groups (counted)
//! 6. theme fills and strokes
//!
//! Finally, `xmlns:*` declarations for junk or metadata namespaces that
//! nothing references any more are pruned.

use regex::Regex;
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::OnceLock;

use super::CleanupStats;
use super::dom::{Document, Element, NodeId, XMLNS_NS};
use super::rules::{
    METADATA_TAGS, OBSOLETE_ROOT_ATTRS, SVG_NS, is_junk_ns, is_metadata_ns, is_noop_attr,
};
use crate::config::CleanupConfig;
use crate::debug;
use crate::utils::write_atomic;

fn comment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").unwrap())
}

/// Clean one file in place.
///
/// Markup that does not parse leaves the file untouched and yields zero stats.
/// Only I/O failures are errors.
pub fn clean_file(path: &Path, config: &CleanupConfig) -> io::Result<CleanupStats> {
    let bytes = fs::read(path)?;
    let Ok(source) = String::from_utf8(bytes) else {
        debug!("xml"; "not utf-8, skipped: {}", path.display());
        return Ok(CleanupStats::default());
    };

    let Some((cleaned, stats)) = clean_markup(&source, config) else {
        debug!("xml"; "unparsable, skipped: {}", path.display());
        return Ok(CleanupStats::default());
    };

    if cleaned != source {
        write_atomic(path, cleaned.as_bytes())?;
    }
    Ok(stats)
}

/// Clean markup in memory. `None` when it does not parse.
pub fn clean_markup(source: &str, config: &CleanupConfig) -> Option<(String, CleanupStats)> {
    let comments_removed = comment_regex().find_iter(source).count();
    let stripped = comment_regex().replace_all(source, "");

    let mut doc = Document::parse(&stripped).ok()?;

    strip_metadata(&mut doc);
    normalize_root(&mut doc);
    let attrs_removed = remove_junk_attrs(&mut doc);
    let groups_removed = collapse_groups(&mut doc);
    theme_colors(&mut doc, config);
    prune_namespace_decls(&mut doc);

    let stats = CleanupStats {
        attrs_removed,
        groups_removed,
        comments_removed,
    };
    Some((doc.to_xml(), stats))
}

/// Whether the element is in the SVG namespace (or has none at all).
fn is_svg_element(element: &Element) -> bool {
    element.ns.as_deref().is_none_or(|ns| ns == SVG_NS)
}

// ============================================================================
// Passes
// ============================================================================

fn strip_metadata(doc: &mut Document) {
    for id in doc.elements() {
        let Some(element) = doc.element(id) else { continue };
        let by_tag = is_svg_element(element) && METADATA_TAGS.contains(&element.local_name());
        let by_ns = element.ns.as_deref().is_some_and(is_metadata_ns);
        if by_tag || by_ns {
            doc.detach(id);
        }
    }
}

fn normalize_root(doc: &mut Document) {
    let root = doc.root();
    if let Some(element) = doc.element_mut(root) {
        element.remove_attrs(|a| OBSOLETE_ROOT_ATTRS.contains(&a.name.as_str()));
    }
}

fn remove_junk_attrs(doc: &mut Document) -> usize {
    let mut removed = 0;
    for id in doc.elements() {
        let Some(element) = doc.element_mut(id) else { continue };
        removed += element.remove_attrs(|attr| match attr.ns.as_deref() {
            Some(XMLNS_NS) => false,
            Some(ns) => is_junk_ns(ns),
            None => !attr.name.contains(':') && is_noop_attr(&attr.name, &attr.value),
        });
    }
    removed
}

/// `g` with no element children, or one that can never render.
fn is_collapsible(doc: &Document, id: NodeId) -> bool {
    let Some(element) = doc.element(id) else {
        return false;
    };
    if element.local_name() != "g" || !is_svg_element(element) {
        return false;
    }
    doc.element_children(id).next().is_none() || is_invisible(element)
}

fn is_invisible(element: &Element) -> bool {
    let transparent = element
        .attr("opacity")
        .and_then(|v| v.trim().parse::<f64>().ok())
        .is_some_and(|o| o == 0.0);
    let hidden = element.attr("display").is_some_and(|v| v.trim() == "none");
    transparent || hidden
}

/// Whether `id` still hangs off the root.
fn is_attached(doc: &Document, id: NodeId) -> bool {
    let root = doc.root();
    let mut current = id;
    while current != root {
        match doc.parent(current) {
            Some(parent) => current = parent,
            None => return false,
        }
    }
    true
}

fn collapse_groups(doc: &mut Document) -> usize {
    let mut queue: VecDeque<NodeId> = doc
        .elements()
        .into_iter()
        .filter(|&id| is_collapsible(doc, id))
        .collect();
    let mut removed = 0;

    while let Some(id) = queue.pop_front() {
        // Already gone with an ancestor, or no longer eligible
        if !is_attached(doc, id) || !is_collapsible(doc, id) {
            continue;
        }
        let parent = doc.parent(id);
        if !doc.detach(id) {
            continue;
        }
        removed += 1;

        if let Some(parent) = parent
            && is_collapsible(doc, parent)
        {
            queue.push_back(parent);
        }
    }

    removed
}

fn is_themable(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        let v = v.trim();
        v != "none" && !v.starts_with("var(")
    })
}

fn theme_colors(doc: &mut Document, config: &CleanupConfig) {
    for id in doc.elements() {
        let Some(element) = doc.element_mut(id) else { continue };
        if !is_svg_element(element) {
            continue;
        }
        let local = element.local_name().to_string();
        let is_shape = config.is_shape(&local);
        let is_group = local == "g";
        if !is_shape && !is_group {
            continue;
        }

        let fill = element.attr("fill");
        let theme_fill = if is_shape {
            // Missing fill defaults to black, so it is themed too
            fill.is_none() || is_themable(fill)
        } else {
            is_themable(fill)
        };
        if theme_fill {
            element.set_attr("fill", &config.fill_var);
        }

        if is_themable(element.attr("stroke")) {
            element.set_attr("stroke", &config.stroke_var);
        }
    }
}

/// Whether prefix `p` is used by an element or attribute name in the subtree.
fn prefix_used(doc: &Document, id: NodeId, prefix: &str) -> bool {
    let qualified = format!("{prefix}:");
    let mut stack = vec![id];
    while let Some(current) = stack.pop() {
        let Some(element) = doc.element(current) else { continue };
        if element.name.starts_with(&qualified) {
            return true;
        }
        if element
            .attrs
            .iter()
            .any(|a| a.declared_prefix().is_none() && a.name.starts_with(&qualified))
        {
            return true;
        }
        stack.extend(element.children.iter().copied());
    }
    false
}

fn prune_namespace_decls(doc: &mut Document) {
    for id in doc.elements() {
        let Some(element) = doc.element(id) else { continue };
        let unused: Vec<String> = element
            .attrs
            .iter()
            .filter_map(|a| {
                let prefix = a.declared_prefix().filter(|p| !p.is_empty())?;
                (is_junk_ns(&a.value) || is_metadata_ns(&a.value)).then(|| prefix.to_string())
            })
            .filter(|prefix| !prefix_used(doc, id, prefix))
            .collect();

        if unused.is_empty() {
            continue;
        }
        if let Some(element) = doc.element_mut(id) {
            element.remove_attrs(|a| {
                a.declared_prefix()
                    .is_some_and(|p| unused.iter().any(|u| u == p))
            });
        }
    }
}
