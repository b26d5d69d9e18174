use crate::classifiers::Classifier;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::error::ClassifierError;
use std::sync::Arc;

/// Reads the answer off the instance it is asked about.
#[derive(Default)]
pub struct OracleClassifier {
    num_classes: usize,
}

impl Classifier for OracleClassifier {
    fn get_votes_for_instance(&mut self, instance: &dyn Instance) -> Result<Vec<f64>, ClassifierError> {
        let y = instance.class_value().unwrap_or_default() as usize;
        let mut v = vec![0.0; self.num_classes.max(2)];
        if y < v.len() {
            v[y] = 1.0;
        }
        Ok(v)
    }

    fn set_model_context(&mut self, header: Arc<InstanceHeader>) {
        self.num_classes = match header.number_of_classes() {
            0 => 2,
            n => n,
        };
    }

    fn train_on_instance(&mut self, _instance: &dyn Instance) -> Result<(), ClassifierError> {
        Ok(())
    }

    fn calc_memory_size(&self) -> usize {
        size_of::<Self>()
    }
}
