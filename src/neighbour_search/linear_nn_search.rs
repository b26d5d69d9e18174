use crate::core::instances::{DenseInstance, Instance};
use crate::error::ClassifierError;
use crate::neighbour_search::{EuclideanDistance, NearestNeighbourSearch, Neighbour};
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::sync::Arc;

const MEASURE_NUM_INSTANCES: &str = "measureNumInstances";
const MEASURE_QUERIES: &str = "measureQueries";
const MEASURE_POINTS_VISITED: &str = "measurePointsVisited";
const MEASURE_MEAN_POINTS_VISITED: &str = "measureMeanPointsVisited";

#[derive(Debug, Default, Clone, Copy)]
struct SearchStats {
    queries: u64,
    points_visited: u64,
}

/// Exhaustive scan: every query computes the distance to every stored
/// instance and sorts the lot.
#[derive(Debug)]
pub struct LinearNNSearch {
    instances: Vec<Arc<DenseInstance>>,
    distance_function: EuclideanDistance,
    measure_performance: bool,
    stats: SearchStats,
}

impl Default for LinearNNSearch {
    fn default() -> Self {
        Self::new(EuclideanDistance::new(true), false)
    }
}

impl LinearNNSearch {
    pub fn new(distance_function: EuclideanDistance, measure_performance: bool) -> Self {
        Self {
            instances: Vec::new(),
            distance_function,
            measure_performance,
            stats: SearchStats::default(),
        }
    }

    pub fn distance_function(&self) -> &EuclideanDistance {
        &self.distance_function
    }

    pub fn measure_performance(&self) -> bool {
        self.measure_performance
    }
}

impl NearestNeighbourSearch for LinearNNSearch {
    /// Query counters survive a re-index; they cover the life of the search.
    fn set_instances(&mut self, instances: Vec<Arc<DenseInstance>>) {
        self.instances = instances;

        self.distance_function.clear_ranges();
        for inst in &self.instances {
            self.distance_function.update_ranges(inst.as_ref());
        }
    }

    fn update(&mut self, instance: Arc<DenseInstance>) {
        self.distance_function.update_ranges(instance.as_ref());
        self.instances.push(instance);
    }

    fn add_instance_info(&mut self, query: &dyn Instance) {
        self.distance_function.update_ranges(query);
    }

    fn k_nearest_neighbours(&mut self, query: &dyn Instance, k: usize) -> Vec<Neighbour> {
        let k = k.min(self.instances.len());
        if k == 0 {
            return Vec::new();
        }

        let mut scored: Vec<Neighbour> = self
            .instances
            .iter()
            .map(|inst| {
                let d = self.distance_function.distance(query, inst.as_ref());
                Neighbour::new(Arc::clone(inst), d)
            })
            .collect();

        if self.measure_performance {
            self.stats.queries += 1;
            self.stats.points_visited += scored.len() as u64;
        }

        // stable: equal distances keep arrival order
        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        scored.truncate(k);
        scored
    }

    fn num_instances(&self) -> usize {
        self.instances.len()
    }

    fn enumerate_measures(&self) -> Vec<String> {
        let mut names = vec![MEASURE_NUM_INSTANCES.to_string()];
        if self.measure_performance {
            names.extend(
                [
                    MEASURE_QUERIES,
                    MEASURE_POINTS_VISITED,
                    MEASURE_MEAN_POINTS_VISITED,
                ]
                .map(String::from),
            );
        }
        names
    }

    fn get_measure(&self, name: &str) -> Result<f64, ClassifierError> {
        match name {
            MEASURE_NUM_INSTANCES => Ok(self.instances.len() as f64),
            MEASURE_QUERIES if self.measure_performance => Ok(self.stats.queries as f64),
            MEASURE_POINTS_VISITED if self.measure_performance => {
                Ok(self.stats.points_visited as f64)
            }
            MEASURE_MEAN_POINTS_VISITED if self.measure_performance => {
                if self.stats.queries == 0 {
                    Ok(0.0)
                } else {
                    Ok(self.stats.points_visited as f64 / self.stats.queries as f64)
                }
            }
            other => Err(ClassifierError::UnknownMeasure(other.to_string())),
        }
    }

    fn describe(&self) -> String {
        format!(
            "linear-nn-search (normalize={}, measure_performance={})",
            self.distance_function.normalize(),
            self.measure_performance
        )
    }
}

impl MemorySized for LinearNNSearch {
    fn inline_size(&self) -> usize {
        size_of::<Self>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        let mut total = 0;
        total += meter.measure_field(&self.instances);
        total += self.distance_function.extra_heap_size(meter);
        total
    }
}
