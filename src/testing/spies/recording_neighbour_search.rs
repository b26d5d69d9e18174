use crate::core::instances::{DenseInstance, Instance};
use crate::error::ClassifierError;
use crate::neighbour_search::{LinearNNSearch, NearestNeighbourSearch, Neighbour};
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Default)]
struct Counters {
    set_instances: AtomicU64,
    updates: AtomicU64,
    prepares: AtomicU64,
    queries: AtomicU64,
}

/// Read side of a [`RecordingNeighbourSearch`].
#[derive(Clone)]
pub struct SearchCalls(Arc<Counters>);

impl SearchCalls {
    pub fn set_instances(&self) -> u64 {
        self.0.set_instances.load(Ordering::Relaxed)
    }

    pub fn updates(&self) -> u64 {
        self.0.updates.load(Ordering::Relaxed)
    }

    pub fn prepares(&self) -> u64 {
        self.0.prepares.load(Ordering::Relaxed)
    }

    pub fn queries(&self) -> u64 {
        self.0.queries.load(Ordering::Relaxed)
    }
}

/// A linear search that counts how it is driven.
pub struct RecordingNeighbourSearch {
    inner: LinearNNSearch,
    calls: Arc<Counters>,
}

impl RecordingNeighbourSearch {
    pub fn new() -> (Self, SearchCalls) {
        let calls = Arc::new(Counters::default());
        (
            Self {
                inner: LinearNNSearch::default(),
                calls: Arc::clone(&calls),
            },
            SearchCalls(calls),
        )
    }
}

impl NearestNeighbourSearch for RecordingNeighbourSearch {
    fn set_instances(&mut self, instances: Vec<Arc<DenseInstance>>) {
        self.calls.set_instances.fetch_add(1, Ordering::Relaxed);
        self.inner.set_instances(instances);
    }

    fn update(&mut self, instance: Arc<DenseInstance>) {
        self.calls.updates.fetch_add(1, Ordering::Relaxed);
        self.inner.update(instance);
    }

    fn add_instance_info(&mut self, query: &dyn Instance) {
        self.calls.prepares.fetch_add(1, Ordering::Relaxed);
        self.inner.add_instance_info(query);
    }

    fn k_nearest_neighbours(&mut self, query: &dyn Instance, k: usize) -> Vec<Neighbour> {
        self.calls.queries.fetch_add(1, Ordering::Relaxed);
        self.inner.k_nearest_neighbours(query, k)
    }

    fn num_instances(&self) -> usize {
        self.inner.num_instances()
    }

    fn enumerate_measures(&self) -> Vec<String> {
        self.inner.enumerate_measures()
    }

    fn get_measure(&self, name: &str) -> Result<f64, ClassifierError> {
        self.inner.get_measure(name)
    }

    fn describe(&self) -> String {
        format!("recording({})", self.inner.describe())
    }
}

impl MemorySized for RecordingNeighbourSearch {
    fn inline_size(&self) -> usize {
        size_of::<Self>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        self.inner.extra_heap_size(meter)
    }
}
