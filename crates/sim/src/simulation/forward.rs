//! Forward overlay: paints sequences onto a finished history.
//!
//! The event log is replayed from the root towards the present. The root
//! receives a random genome; coalescences copy a parent into both children,
//! transfers assemble the recipient from the material each derived lineage
//! carries, and every live lineage accumulates point mutations over the
//! interval between consecutive events.

use std::collections::BTreeMap;

use rand::Rng;

use crate::ancestry::{EventKind, EvolutionHistory, NodeId};
use crate::base::Sequence;
use crate::errors::InvariantViolation;
use crate::evolution::PointMutation;

/// Genomes of the sampled leaves after the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledGenomes {
    /// One sequence per leaf, indexed by leaf id.
    pub sequences: Vec<Sequence>,
    /// Total number of point mutations applied across the graph.
    pub mutations: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct ForwardOverlay {
    genome_length: usize,
    mutation: PointMutation,
}

impl ForwardOverlay {
    pub fn new(genome_length: usize, mutation: PointMutation) -> Self {
        Self {
            genome_length,
            mutation,
        }
    }

    /// Replay `history` forward in time and return the sampled genomes.
    ///
    /// Live sequences are kept in node order so that a fixed generator state
    /// always yields the same output.
    pub fn paint<R: Rng + ?Sized>(
        &self,
        history: &EvolutionHistory,
        rng: &mut R,
    ) -> Result<SampledGenomes, InvariantViolation> {
        let mut live: BTreeMap<NodeId, Sequence> = BTreeMap::new();
        let mut mutations = 0;

        let events = history.events();
        if events.is_empty() {
            if let Some(root) = history.root() {
                live.insert(root, Sequence::random(self.genome_length, rng));
            }
        }

        for (idx, event) in events.iter().enumerate().rev() {
            match event.kind {
                EventKind::Coalescence => self.apply_coalescence(history, idx, &mut live, rng)?,
                EventKind::Transfer => self.apply_transfer(history, idx, &mut live)?,
            }

            let previous = if idx == 0 { 0.0 } else { events[idx - 1].time };
            let generations = event.time - previous;
            for sequence in live.values_mut() {
                mutations += self.mutation.mutate_sequence(sequence, generations, rng);
            }
        }

        let sequences = history
            .leaves()
            .map(|leaf| {
                live.remove(&leaf)
                    .ok_or(InvariantViolation::MissingSequence { node: leaf })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SampledGenomes {
            sequences,
            mutations,
        })
    }

    fn apply_coalescence<R: Rng + ?Sized>(
        &self,
        history: &EvolutionHistory,
        idx: usize,
        live: &mut BTreeMap<NodeId, Sequence>,
        rng: &mut R,
    ) -> Result<(), InvariantViolation> {
        let event = &history.events()[idx];
        let &[ancestor] = event.participants.as_slice() else {
            return Err(malformed(idx, "coalescence must have one participant"));
        };
        let node = history
            .node(ancestor)
            .ok_or_else(|| dangling(history, ancestor))?;
        let &[left, right] = node.children.as_slice() else {
            return Err(malformed(idx, "coalescence ancestor must have two children"));
        };

        let sequence = match live.remove(&ancestor) {
            Some(sequence) => sequence,
            None => Sequence::random(self.genome_length, rng),
        };
        live.insert(left, sequence.clone());
        live.insert(right, sequence);
        Ok(())
    }

    fn apply_transfer(
        &self,
        history: &EvolutionHistory,
        idx: usize,
        live: &mut BTreeMap<NodeId, Sequence>,
    ) -> Result<(), InvariantViolation> {
        let event = &history.events()[idx];
        let mut buffer: Option<Sequence> = None;
        let mut recipient = None;

        for &derived in &event.participants {
            let node = history.node(derived).ok_or_else(|| dangling(history, derived))?;
            let &[child] = node.children.as_slice() else {
                return Err(malformed(idx, "transfer-derived node must have one child"));
            };
            recipient = Some(child);

            let source = live
                .remove(&derived)
                .ok_or(InvariantViolation::MissingSequence { node: derived })?;
            match buffer.as_mut() {
                // Positions outside every participant's material are not
                // ancestral to the sample and keep the first donor's bases.
                None => buffer = Some(source),
                Some(target) => {
                    for fragment in &node.material {
                        target
                            .copy_range_from(&source, fragment.begin, fragment.end)
                            .map_err(|_| malformed(idx, "material exceeds genome"))?;
                    }
                }
            }
        }

        if let (Some(child), Some(sequence)) = (recipient, buffer) {
            live.insert(child, sequence);
        }
        Ok(())
    }
}

fn malformed(event: usize, reason: &'static str) -> InvariantViolation {
    InvariantViolation::MalformedEvent { event, reason }
}

fn dangling(history: &EvolutionHistory, node: NodeId) -> InvariantViolation {
    InvariantViolation::DanglingNode {
        node,
        len: history.nodes().len(),
    }
}
