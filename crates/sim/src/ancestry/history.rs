//! The ancestral recombination graph and its event log.
//!
//! Nodes live in an append-only arena and refer to each other by index, so
//! the graph (a DAG once transfers are involved) needs no shared ownership
//! and serializes as plain data.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::material::{Assembly, merge};
use crate::errors::InvariantViolation;

/// Index of a node in the arena.
pub type NodeId = usize;

/// A vertex of the ancestral recombination graph.
///
/// The number of children tells what created the node: none for a sampled
/// leaf, one for a lineage derived by transfer, two for a coalescence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Positions at which this lineage is ancestral to the sample.
    pub material: Assembly,
    /// Indices of the nodes this one is ancestral to.
    pub children: Vec<NodeId>,
}

impl Node {
    /// A sampled genome.
    pub fn leaf(material: Assembly) -> Self {
        Self {
            material,
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Two lineages found their common ancestor.
    Coalescence,
    /// A lineage split around a transferred block.
    Transfer,
}

/// One step of the backward simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Time before the present, in generations.
    pub time: f64,
    pub kind: EventKind,
    /// The ancestor for a coalescence; the derived lineages (zero to two)
    /// for a transfer.
    pub participants: Vec<NodeId>,
}

/// Result of the backward simulation: final lineage pool, node arena and
/// the event log in the order events were sampled (nearest to the present
/// first).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvolutionHistory {
    pool: Vec<NodeId>,
    nodes: Vec<Node>,
    events: Vec<Event>,
    sample_size: usize,
}

impl EvolutionHistory {
    /// Seed an arena with `sample_size` leaves, each carrying the whole
    /// genome, and put all of them in the active pool.
    pub fn with_samples(sample_size: usize, genome_length: usize) -> Self {
        let full = Assembly::full(genome_length);
        Self {
            pool: (0..sample_size).collect(),
            nodes: (0..sample_size).map(|_| Node::leaf(full.clone())).collect(),
            events: Vec::new(),
            sample_size,
        }
    }

    /// Lineages still awaiting resolution (exactly one once built).
    #[inline]
    pub fn pool(&self) -> &[NodeId] {
        &self.pool
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[inline]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[inline]
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Indices of the sampled leaves (always `0..sample_size`).
    pub fn leaves(&self) -> std::ops::Range<NodeId> {
        0..self.sample_size
    }

    /// The grand common ancestor, once the pool has shrunk to one lineage.
    pub fn root(&self) -> Option<NodeId> {
        match self.pool.as_slice() {
            [root] => Some(*root),
            _ => None,
        }
    }

    /// Time of the last event, i.e. the age of the root in generations.
    pub fn tmrca(&self) -> f64 {
        self.events.last().map_or(0.0, |e| e.time)
    }

    /// Number of events of the given kind.
    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    /// Append a node and return its index.
    pub(crate) fn push_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub(crate) fn push_event(&mut self, event: Event) {
        self.events.push(event);
    }

    pub(crate) fn pool_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.pool
    }

    /// Audit every structural invariant of a finished history.
    ///
    /// Checks that node references stay inside the arena, every assembly is
    /// normalized and non-empty, the pool holds exactly one lineage, event
    /// times never decrease, and each event matches the shape of the nodes
    /// it created.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let len = self.nodes.len();
        let in_arena = |node: NodeId| {
            if node < len {
                Ok(())
            } else {
                Err(InvariantViolation::DanglingNode { node, len })
            }
        };

        for (id, node) in self.nodes.iter().enumerate() {
            if !node.material.is_normalized() {
                return Err(InvariantViolation::UnnormalizedAssembly { node: id });
            }
            if node.material.is_empty() {
                return Err(InvariantViolation::EmptyLineage { node: id });
            }
            for &child in &node.children {
                in_arena(child)?;
            }
        }

        let mut seen = HashSet::with_capacity(self.pool.len());
        for &node in &self.pool {
            in_arena(node)?;
            if !seen.insert(node) {
                return Err(InvariantViolation::DuplicateLineage { node });
            }
        }
        if self.sample_size > 0 && self.pool.len() != 1 {
            return Err(InvariantViolation::UnresolvedPool {
                size: self.pool.len(),
            });
        }

        let mut previous = 0.0;
        for (idx, event) in self.events.iter().enumerate() {
            if !(event.time >= previous) {
                return Err(InvariantViolation::TimeReversal {
                    event: idx,
                    time: event.time,
                    previous,
                });
            }
            previous = event.time;
            self.validate_event(idx, event)?;
        }

        Ok(())
    }

    fn validate_event(&self, idx: usize, event: &Event) -> Result<(), InvariantViolation> {
        let malformed = |reason| InvariantViolation::MalformedEvent { event: idx, reason };
        let len = self.nodes.len();
        for &p in &event.participants {
            if p >= len {
                return Err(InvariantViolation::DanglingNode { node: p, len });
            }
        }

        match event.kind {
            EventKind::Coalescence => {
                let [ancestor] = event.participants.as_slice() else {
                    return Err(malformed("coalescence must have exactly one participant"));
                };
                let node = &self.nodes[*ancestor];
                let [a, b] = node.children.as_slice() else {
                    return Err(malformed("coalescence ancestor must have two children"));
                };
                if a == b {
                    return Err(malformed("coalescence of a lineage with itself"));
                }
                if merge(&self.nodes[*a].material, &self.nodes[*b].material) != node.material {
                    return Err(malformed("ancestor material is not the union of its children"));
                }
            }
            EventKind::Transfer => {
                if event.participants.len() > 2 {
                    return Err(malformed("transfer has more than two participants"));
                }
                let mut child = None;
                let mut union = Assembly::new();
                for &p in &event.participants {
                    let [c] = self.nodes[p].children.as_slice() else {
                        return Err(malformed("transfer-derived node must have one child"));
                    };
                    if child.is_some_and(|prev| prev != *c) {
                        return Err(malformed(
                            "transfer participants descend from different lineages",
                        ));
                    }
                    child = Some(*c);
                    union = merge(&union, &self.nodes[p].material);
                }
                if let Some(c) = child {
                    if union != self.nodes[c].material {
                        return Err(malformed("transfer does not conserve ancestral material"));
                    }
                }
            }
        }
        Ok(())
    }
}
