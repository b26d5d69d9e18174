use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::error::ClassifierError;
use crate::evaluation::Measurement;
use std::sync::Arc;

/// An incremental learner driven by a stream.
///
/// `set_model_context` must be called once with the stream's schema before
/// any training or prediction.
pub trait Classifier {
    /// Class votes for `instance`, one slot per class label. An empty vector
    /// means the learner has no opinion.
    fn get_votes_for_instance(&mut self, instance: &dyn Instance) -> Result<Vec<f64>, ClassifierError>;
    fn set_model_context(&mut self, header: Arc<InstanceHeader>);
    fn train_on_instance(&mut self, instance: &dyn Instance) -> Result<(), ClassifierError>;
    fn calc_memory_size(&self) -> usize;

    /// Learner-specific measures reported alongside evaluation snapshots.
    fn measurements(&self) -> Vec<Measurement> {
        Vec::new()
    }

    /// Human-readable description of the current model, if the learner has one.
    fn summary(&self) -> Option<String> {
        None
    }
}
