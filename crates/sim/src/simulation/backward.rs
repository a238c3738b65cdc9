//! Backward-in-time construction of the ancestral recombination graph.
//!
//! Starting from the sampled genomes, lineages coalesce and split around
//! transferred blocks until a single common ancestor carries all of the
//! sample's ancestral material.

use rand::Rng;

use crate::ancestry::{
    Assembly, Event, EventKind, EvolutionHistory, Node, NodeId, merge, split_circular,
};
use crate::errors::{ConfigError, InvariantViolation, SimulationError};
use crate::simulation::{PopulationParams, RateModel};

/// Samples one evolution history for a validated set of parameters.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    params: PopulationParams,
    rates: RateModel,
}

impl GraphBuilder {
    /// Create a builder, rejecting invalid parameters before any sampling.
    pub fn new(params: PopulationParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let rates = RateModel::new(&params);
        Ok(Self { params, rates })
    }

    #[inline]
    pub fn params(&self) -> &PopulationParams {
        &self.params
    }

    /// Run the backward process to completion.
    ///
    /// Every step is checked against the structural invariants of the pool
    /// and the ancestral material; a violation aborts the run.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<EvolutionHistory, SimulationError> {
        let mut history =
            EvolutionHistory::with_samples(self.params.sample_size, self.params.genome_length);
        let mut time = 0.0;

        while history.pool().len() > 1 {
            let k = history.pool().len();
            time += self.rates.sample_waiting_time(k, rng);
            match self.rates.sample_kind(k, rng) {
                EventKind::Coalescence => self.coalesce(&mut history, time, rng)?,
                EventKind::Transfer => self.transfer(&mut history, time, rng)?,
            }
            self.check_pool(&history)?;
        }

        tracing::debug!(
            nodes = history.nodes().len(),
            coalescences = history.count(EventKind::Coalescence),
            transfers = history.count(EventKind::Transfer),
            tmrca = history.tmrca(),
            "built ancestral recombination graph"
        );
        Ok(history)
    }

    /// Join two distinct lineages, chosen uniformly, into their ancestor.
    fn coalesce<R: Rng + ?Sized>(
        &self,
        history: &mut EvolutionHistory,
        time: f64,
        rng: &mut R,
    ) -> Result<(), InvariantViolation> {
        let k = history.pool().len();
        let a = rng.random_range(0..k);
        let mut b = rng.random_range(0..k);
        while b == a {
            b = rng.random_range(0..k);
        }

        let (left, right) = (history.pool()[a], history.pool()[b]);
        let material = merge(material_of(history, left)?, material_of(history, right)?);
        let ancestor = history.push_node(Node {
            material,
            children: vec![left, right],
        });
        check_node(history, ancestor)?;

        let pool = history.pool_mut();
        pool.remove(a.max(b));
        pool.remove(a.min(b));
        pool.push(ancestor);

        history.push_event(Event {
            time,
            kind: EventKind::Coalescence,
            participants: vec![ancestor],
        });
        Ok(())
    }

    /// Split one lineage around a transferred block.
    ///
    /// The block starts at a uniform position and spans `fragment_length + 1`
    /// sites, wrapping past the end of the genome. Material outside it stays
    /// with the recipient's own ancestor; material inside it came from the
    /// donor. Each non-empty side becomes a new lineage.
    fn transfer<R: Rng + ?Sized>(
        &self,
        history: &mut EvolutionHistory,
        time: f64,
        rng: &mut R,
    ) -> Result<(), InvariantViolation> {
        let k = history.pool().len();
        let c = rng.random_range(0..k);
        let recipient = history.pool()[c];

        let genome_length = self.params.genome_length;
        let begin = rng.random_range(0..genome_length);
        let end = begin + self.params.fragment_length;
        let material = material_of(history, recipient)?;
        let (retained, transferred) = split_circular(material, begin, end, genome_length);

        let mut participants = Vec::with_capacity(2);
        for side in [retained, transferred] {
            if side.is_empty() {
                continue;
            }
            let id = history.push_node(Node {
                material: side,
                children: vec![recipient],
            });
            check_node(history, id)?;
            participants.push(id);
        }

        let pool = history.pool_mut();
        pool.remove(c);
        pool.extend_from_slice(&participants);

        history.push_event(Event {
            time,
            kind: EventKind::Transfer,
            participants,
        });
        Ok(())
    }

    fn check_pool(&self, history: &EvolutionHistory) -> Result<(), InvariantViolation> {
        let size = history.pool().len();
        let limit = self.params.population_size;
        if size > limit {
            return Err(InvariantViolation::PoolOverflow { size, limit });
        }
        let pool = history.pool();
        for (i, node) in pool.iter().enumerate() {
            if pool[i + 1..].contains(node) {
                return Err(InvariantViolation::DuplicateLineage { node: *node });
            }
        }
        Ok(())
    }
}

fn material_of(history: &EvolutionHistory, node: NodeId) -> Result<&Assembly, InvariantViolation> {
    history
        .node(node)
        .map(|n| &n.material)
        .ok_or(InvariantViolation::DanglingNode {
            node,
            len: history.nodes().len(),
        })
}

fn check_node(history: &EvolutionHistory, id: NodeId) -> Result<(), InvariantViolation> {
    let node = history.node(id).ok_or(InvariantViolation::DanglingNode {
        node: id,
        len: history.nodes().len(),
    })?;
    if !node.material.is_normalized() {
        return Err(InvariantViolation::UnnormalizedAssembly { node: id });
    }
    if node.material.is_empty() {
        return Err(InvariantViolation::EmptyLineage { node: id });
    }
    Ok(())
}
