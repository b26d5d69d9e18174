use crate::core::instances::{DenseInstance, Instance};
use crate::error::ClassifierError;
use crate::utils::memory::MemorySized;
use std::sync::Arc;

/// One retrieved training instance and its distance from the query.
#[derive(Clone, Debug)]
pub struct Neighbour {
    pub instance: Arc<DenseInstance>,
    pub distance: f64,
}

impl Neighbour {
    pub fn new(instance: Arc<DenseInstance>, distance: f64) -> Self {
        Self { instance, distance }
    }
}

/// Ordered nearest-neighbour retrieval over a mutable collection of
/// training instances.
///
/// The search shares the instances with the training window but is never
/// the owner of record: the caller decides what is in the collection and
/// re-indexes through [`set_instances`](Self::set_instances) whenever it
/// drops something.
pub trait NearestNeighbourSearch: MemorySized {
    /// Rebuilds all internal state over `instances`, discarding the old one.
    fn set_instances(&mut self, instances: Vec<Arc<DenseInstance>>);

    /// Adds one instance without rebuilding.
    fn update(&mut self, instance: Arc<DenseInstance>);

    /// Lets the search absorb query-specific context (such as attribute
    /// ranges) before [`k_nearest_neighbours`](Self::k_nearest_neighbours)
    /// is called for `query`.
    fn add_instance_info(&mut self, query: &dyn Instance);

    /// Returns at most `k` instances in non-decreasing distance order. When
    /// `k` covers the whole collection every instance is returned.
    fn k_nearest_neighbours(&mut self, query: &dyn Instance, k: usize) -> Vec<Neighbour>;

    fn num_instances(&self) -> usize;

    fn enumerate_measures(&self) -> Vec<String> {
        Vec::new()
    }

    fn get_measure(&self, name: &str) -> Result<f64, ClassifierError> {
        Err(ClassifierError::UnknownMeasure(name.to_string()))
    }

    /// Identifier and options, for display.
    fn describe(&self) -> String;
}
