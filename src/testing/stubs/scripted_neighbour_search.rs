use crate::core::instances::{DenseInstance, Instance};
use crate::neighbour_search::{NearestNeighbourSearch, Neighbour};
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::sync::Arc;

/// Returns its instances in arrival order, paired with a fixed list of
/// distances. Instances past the end of the list are never returned.
pub struct ScriptedNeighbourSearch {
    instances: Vec<Arc<DenseInstance>>,
    distances: Vec<f64>,
}

impl ScriptedNeighbourSearch {
    pub fn new(distances: Vec<f64>) -> Self {
        Self {
            instances: Vec::new(),
            distances,
        }
    }
}

impl NearestNeighbourSearch for ScriptedNeighbourSearch {
    fn set_instances(&mut self, instances: Vec<Arc<DenseInstance>>) {
        self.instances = instances;
    }

    fn update(&mut self, instance: Arc<DenseInstance>) {
        self.instances.push(instance);
    }

    fn add_instance_info(&mut self, _query: &dyn Instance) {}

    fn k_nearest_neighbours(&mut self, _query: &dyn Instance, k: usize) -> Vec<Neighbour> {
        self.instances
            .iter()
            .zip(&self.distances)
            .take(k)
            .map(|(inst, &d)| Neighbour::new(Arc::clone(inst), d))
            .collect()
    }

    fn num_instances(&self) -> usize {
        self.instances.len()
    }

    fn describe(&self) -> String {
        format!("scripted({:?})", self.distances)
    }
}

impl MemorySized for ScriptedNeighbourSearch {
    fn inline_size(&self) -> usize {
        size_of::<Self>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        meter.measure_field(&self.instances) + meter.measure_field(&self.distances)
    }
}
