//! Sparse adjacency between entries.
//!
//! Two builders:
//! - similarity-ranked: greedy, single pass in input order, then a repair
//!   pass so nobody is left isolated;
//! - pattern: fixed shapes per constellation group (chain, triangle, hub,
//!   ring) plus a chain through each group's first member.
//!
//! Every link is written in both directions. Nothing deduplicates afterwards:
//! when two entries pick each other in the ranked phase the pair is recorded
//! twice, and callers that need a set must dedup themselves.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ConnectionConfig;
use crate::entry::{Entry, EntryId};
use crate::similarity::similarity;

/// Entry id → neighbour ids, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionGraph {
    adjacency: BTreeMap<EntryId, Vec<EntryId>>,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph with an empty neighbour list for each id.
    pub fn with_nodes(ids: impl IntoIterator<Item = EntryId>) -> Self {
        Self {
            adjacency: ids.into_iter().map(|id| (id, Vec::new())).collect(),
        }
    }

    /// Record `a <-> b` in both lists. Self-loops are ignored.
    pub fn link(&mut self, a: EntryId, b: EntryId) {
        if a == b {
            return;
        }
        self.adjacency.entry(a).or_default().push(b);
        self.adjacency.entry(b).or_default().push(a);
    }

    pub fn neighbors(&self, id: EntryId) -> &[EntryId] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Length of `id`'s neighbour list, duplicates included.
    pub fn degree(&self, id: EntryId) -> usize {
        self.neighbors(id).len()
    }

    pub fn contains_edge(&self, a: EntryId, b: EntryId) -> bool {
        self.neighbors(a).contains(&b)
    }

    pub fn nodes(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.adjacency.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Number of recorded links (each counted once, duplicates included).
    pub fn link_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }

    pub fn into_map(self) -> BTreeMap<EntryId, Vec<EntryId>> {
        self.adjacency
    }
}

/// Builds connection graphs under a [`ConnectionConfig`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ConnectionEngine {
    config: ConnectionConfig,
}

impl ConnectionEngine {
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Similarity-ranked graph over `entries`, processed in the given order.
    ///
    /// Groups of two or three are fully connected. Larger sets link each
    /// entry to its best candidates at or above the threshold, admitting a
    /// link only while the target is under the degree cap. Entries left
    /// without neighbours are then tied to their most similar peer, which may
    /// push that peer over the cap.
    pub fn connect_by_similarity(&self, entries: &[Entry]) -> ConnectionGraph {
        let mut graph = ConnectionGraph::with_nodes(entries.iter().map(|e| e.id));
        if entries.len() <= 1 {
            return graph;
        }

        if entries.len() <= 3 {
            for (i, a) in entries.iter().enumerate() {
                for b in &entries[i + 1..] {
                    graph.link(a.id, b.id);
                }
            }
            return graph;
        }

        let cap = self.config.max_connections;
        for (i, current) in entries.iter().enumerate() {
            let mut candidates: Vec<(EntryId, f64)> = entries
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, other)| (other.id, similarity(&current.tags, &other.tags)))
                .filter(|&(_, score)| score >= self.config.similarity_threshold)
                .collect();
            // Stable: equal scores keep input order.
            candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

            for (other, _) in candidates.into_iter().take(cap) {
                if graph.degree(other) < cap {
                    graph.link(current.id, other);
                }
            }
        }

        self.repair_isolated(entries, &mut graph);
        graph
    }

    fn repair_isolated(&self, entries: &[Entry], graph: &mut ConnectionGraph) {
        for (i, entry) in entries.iter().enumerate() {
            if graph.degree(entry.id) > 0 {
                continue;
            }

            let mut best: Option<(EntryId, f64)> = None;
            for (j, other) in entries.iter().enumerate() {
                if j == i || other.id == entry.id {
                    continue;
                }
                let score = similarity(&entry.tags, &other.tags);
                if best.is_none_or(|(_, s)| score > s) {
                    best = Some((other.id, score));
                }
            }

            if let Some((other, score)) = best {
                tracing::debug!(entry = entry.id, other, score, "linked isolated entry");
                graph.link(entry.id, other);
            }
        }
    }

    /// Pattern graph over constellation groups.
    ///
    /// Within a group: 2 → chain, 3 → triangle, 4–5 → hub on the first
    /// member plus a chain through the rest, 6+ → ring. With several groups
    /// the first members of consecutive non-empty groups are chained too.
    pub fn connect_groups(&self, groups: &[Vec<EntryId>]) -> ConnectionGraph {
        let mut graph = ConnectionGraph::with_nodes(groups.iter().flatten().copied());

        for group in groups {
            apply_pattern(group, &mut graph);
        }

        if groups.len() > 1 {
            let representatives: Vec<EntryId> =
                groups.iter().filter_map(|g| g.first().copied()).collect();
            for pair in representatives.windows(2) {
                graph.link(pair[0], pair[1]);
            }
        }

        graph
    }
}

fn apply_pattern(group: &[EntryId], graph: &mut ConnectionGraph) {
    match group.len() {
        0 | 1 => {}
        2 => chain(group, graph),
        3 => {
            chain(group, graph);
            graph.link(group[2], group[0]);
        }
        4 | 5 => {
            let hub = group[0];
            for &member in &group[1..] {
                graph.link(hub, member);
            }
            chain(&group[1..], graph);
        }
        _ => {
            chain(group, graph);
            graph.link(group[group.len() - 1], group[0]);
        }
    }
}

fn chain(ids: &[EntryId], graph: &mut ConnectionGraph) {
    for pair in ids.windows(2) {
        graph.link(pair[0], pair[1]);
    }
}
