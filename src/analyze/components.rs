//! Component dependency analysis.
//!
//! Walks the directory tree under each whitelisted component root, groups
//! sources into components at the configured depth, and resolves each
//! file's imports into component-level edges. Without a whitelist the whole
//! tree is treated as a single root at depth 1, which is low-precision and
//! reported as such.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::analyze::types::ComponentGraph;
use crate::model::SourceModel;

/// One effective whitelist entry: a component root and how many directory
/// levels below it still belong to the same component before a new
/// sub-component boundary is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitelistEntry {
    pub name: String,
    pub depth: u32,
}

impl WhitelistEntry {
    pub fn segment_count(&self) -> u32 {
        if self.name.is_empty() {
            0
        } else {
            self.name.split('.').count() as u32
        }
    }
}

/// Whether `prefix` is a dot-segment prefix of `name`.
///
/// Prefixes match on dot boundaries: `foo.bar` covers `foo.bar.baz` but
/// not `foo.barista`. An empty prefix covers everything.
pub fn is_segment_prefix(prefix: &str, name: &str) -> bool {
    if prefix.is_empty() {
        return true;
    }
    match name.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with('.'),
        None => false,
    }
}

/// Filter a whitelist by absorbing entries into their dot-prefix parents.
///
/// A surviving parent's depth is enlarged so that it still reaches every
/// package an absorbed child could reach:
/// `parent.depth = max(child.segments + child.depth) - parent.segments`.
/// Entries come back sorted by name.
pub fn filter_whitelist(entries: &BTreeMap<String, u32>) -> Vec<WhitelistEntry> {
    let mut survivors = Vec::new();

    for (name, &depth) in entries {
        let absorbed_by_other = entries
            .keys()
            .any(|other| other != name && is_segment_prefix(other, name));
        if absorbed_by_other {
            continue;
        }

        let own_segments = name.split('.').count() as u32;
        let mut reach = own_segments + depth;
        for (child, &child_depth) in entries {
            if child != name && is_segment_prefix(name, child) {
                let child_reach = child.split('.').count() as u32 + child_depth;
                reach = reach.max(child_reach);
            }
        }

        survivors.push(WhitelistEntry {
            name: name.clone(),
            depth: reach - own_segments,
        });
    }

    survivors
}

/// Immutable traversal state: the component a directory belongs to and how
/// deep below the whitelist root it sits.
#[derive(Debug, Clone)]
struct TraversalContext {
    component: String,
    depth: u32,
}

/// Build the component dependency graph for one source tree.
///
/// `whitelist` maps component roots to their granularity depth; empty means
/// degenerate single-root mode. `blacklist` names component prefixes that
/// are pruned entirely: no nodes, no edges in either direction.
pub fn analyze(
    root: &Path,
    model: &SourceModel,
    whitelist: &BTreeMap<String, u32>,
    blacklist: &BTreeSet<String>,
) -> ComponentGraph {
    let mut graph = ComponentGraph::new();

    if !root.is_dir() {
        log::warn!(
            "component analysis skipped, source root does not exist: {}",
            root.display()
        );
        return graph;
    }

    let degenerate = whitelist.is_empty();
    let entries = if degenerate {
        log::warn!("no component whitelist defined; the results might not be as intended");
        log::warn!("treating the whole tree as one component root at depth 1");
        vec![WhitelistEntry {
            name: String::new(),
            depth: 1,
        }]
    } else {
        filter_whitelist(whitelist)
    };

    for entry in &entries {
        let mut dir = root.to_path_buf();
        if !entry.name.is_empty() {
            for segment in entry.name.split('.') {
                dir.push(segment);
            }
        }
        if !dir.is_dir() {
            log::debug!(
                "whitelisted component {:?} has no directory under {}",
                entry.name,
                root.display()
            );
            continue;
        }

        let ctx = TraversalContext {
            component: entry.name.clone(),
            depth: 0,
        };
        collect_dir(
            root, &dir, ctx, entry, &entries, degenerate, blacklist, model, &mut graph,
        );
    }

    graph
}

#[allow(clippy::too_many_arguments)]
fn collect_dir(
    root: &Path,
    dir: &Path,
    ctx: TraversalContext,
    entry: &WhitelistEntry,
    entries: &[WhitelistEntry],
    degenerate: bool,
    blacklist: &BTreeSet<String>,
    model: &SourceModel,
    graph: &mut ComponentGraph,
) {
    if is_blacklisted(blacklist, &ctx.component) {
        return;
    }

    let mut children: Vec<_> = match fs::read_dir(dir) {
        Ok(rd) => rd.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(err) => {
            log::warn!("could not read directory {}: {}", dir.display(), err);
            return;
        }
    };
    children.sort();

    for child in children {
        if child.is_dir() {
            let child_name = child
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let child_depth = ctx.depth + 1;
            let component = if child_depth <= entry.depth {
                join_component(&ctx.component, &child_name)
            } else {
                ctx.component.clone()
            };
            collect_dir(
                root,
                &child,
                TraversalContext {
                    component,
                    depth: child_depth,
                },
                entry,
                entries,
                degenerate,
                blacklist,
                model,
                graph,
            );
        } else if child.extension().map(|e| e == "java").unwrap_or(false) {
            let rel = child
                .strip_prefix(root)
                .unwrap_or(&child)
                .to_string_lossy()
                .replace('\\', "/");
            let imports = match model.imports_of(&rel) {
                Some(imports) => imports,
                None => {
                    // Already reported by the scanner; siblings continue.
                    log::debug!("no scanned facts for {}, skipping", rel);
                    continue;
                }
            };
            let component = component_key(&ctx.component);
            let edges = relevant_imports(&component, imports, entries, degenerate, blacklist);
            graph.entry(component).or_default().extend(edges);
        }
    }
}

/// Files directly at the scan root in degenerate mode belong to the Java
/// default package.
fn component_key(component: &str) -> String {
    if component.is_empty() {
        "default".to_string()
    } else {
        component.to_string()
    }
}

fn join_component(base: &str, segment: &str) -> String {
    if base.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", base, segment)
    }
}

fn is_blacklisted(blacklist: &BTreeSet<String>, component: &str) -> bool {
    blacklist
        .iter()
        .any(|entry| !entry.is_empty() && is_segment_prefix(entry, component))
}

/// Resolve a file's imports into component-level edge targets.
///
/// An import is relevant only when it falls under a whitelisted root (always
/// true in degenerate mode) and is not blacklisted. The class-name tail is
/// dropped and the remainder capped at the owning entry's maximum base
/// length; imports of the current component itself are dropped.
fn relevant_imports(
    current_component: &str,
    imports: &[String],
    entries: &[WhitelistEntry],
    degenerate: bool,
    blacklist: &BTreeSet<String>,
) -> BTreeSet<String> {
    let mut targets = BTreeSet::new();

    for import in imports {
        if is_blacklisted(blacklist, import) {
            continue;
        }
        let max_base_length = match owning_entry(entries, import) {
            Some(entry) => entry.segment_count() + entry.depth,
            None if degenerate => 1,
            None => continue,
        };

        let mut segments: Vec<&str> = import.split('.').collect();
        segments.pop(); // class-name tail
        if segments.len() as u32 > max_base_length {
            segments.truncate(max_base_length as usize);
        }

        let target = segments.join(".");
        if target.is_empty() || target == current_component {
            continue;
        }
        targets.insert(target);
    }

    targets
}

fn owning_entry<'a>(entries: &'a [WhitelistEntry], import: &str) -> Option<&'a WhitelistEntry> {
    entries
        .iter()
        .find(|entry| !entry.name.is_empty() && is_segment_prefix(&entry.name, import))
}
