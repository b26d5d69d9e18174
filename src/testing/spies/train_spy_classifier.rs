use crate::classifiers::Classifier;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::error::ClassifierError;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

pub struct TrainSpyHandle(Arc<AtomicU64>);

impl TrainSpyHandle {
    pub fn count(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Oracle votes plus a count of `train_on_instance` calls.
pub struct TrainSpyClassifier {
    count: Arc<AtomicU64>,
    num_classes: usize,
}

impl TrainSpyClassifier {
    pub fn new() -> (Self, TrainSpyHandle) {
        let counter = Arc::new(AtomicU64::new(0));
        (
            Self {
                count: counter.clone(),
                num_classes: 2,
            },
            TrainSpyHandle(counter),
        )
    }
}

impl Classifier for TrainSpyClassifier {
    fn get_votes_for_instance(&mut self, inst: &dyn Instance) -> Result<Vec<f64>, ClassifierError> {
        let y = inst.class_value().unwrap_or_default() as usize;
        let mut v = vec![0.0; self.num_classes.max(2)];
        if y < v.len() {
            v[y] = 1.0;
        }
        Ok(v)
    }

    fn set_model_context(&mut self, h: Arc<InstanceHeader>) {
        self.num_classes = match h.number_of_classes() {
            0 => 2,
            n => n,
        };
    }

    fn train_on_instance(&mut self, _inst: &dyn Instance) -> Result<(), ClassifierError> {
        self.count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn calc_memory_size(&self) -> usize {
        size_of::<Self>()
    }
}
