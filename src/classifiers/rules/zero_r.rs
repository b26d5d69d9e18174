use crate::classifiers::classifier::Classifier;
use crate::core::attributes::NominalAttribute;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::error::ClassifierError;
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::fmt;
use std::sync::Arc;

/// Class-frequency baseline. Predicts the observed class distribution,
/// seeded with one pseudo-count per label.
#[derive(Debug, Default)]
pub struct ZeroR {
    header: Option<Arc<InstanceHeader>>,
    class_counts: Vec<f64>,
}

impl ZeroR {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the counts with those of `instances`. Instances without a
    /// class label are skipped.
    pub fn fit(&mut self, header: Arc<InstanceHeader>, instances: &[Box<dyn Instance>]) {
        self.set_model_context(header);
        for inst in instances {
            self.observe(inst.as_ref());
        }
    }

    /// Normalised class counts. Uniform when nothing labelled was seen.
    pub fn predict_distribution(&self) -> Vec<f64> {
        let total: f64 = self.class_counts.iter().sum();
        if total <= 0.0 {
            return self.class_counts.clone();
        }
        self.class_counts.iter().map(|c| c / total).collect()
    }

    /// Index of the most frequent class, lowest index on ties.
    pub fn majority_class(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &c) in self.class_counts.iter().enumerate() {
            if best.is_none_or(|(_, b)| c > b) {
                best = Some((i, c));
            }
        }
        best.map(|(i, _)| i)
    }

    fn observe(&mut self, instance: &dyn Instance) {
        let Some(class) = instance.class_value() else {
            return;
        };
        if let Some(slot) = self.class_counts.get_mut(class as usize) {
            *slot += instance.weight();
        }
    }
}

impl Classifier for ZeroR {
    fn get_votes_for_instance(&mut self, _instance: &dyn Instance) -> Result<Vec<f64>, ClassifierError> {
        if self.header.is_none() {
            return Err(ClassifierError::NotBuilt);
        }
        Ok(self.predict_distribution())
    }

    fn set_model_context(&mut self, header: Arc<InstanceHeader>) {
        self.class_counts = vec![1.0; header.number_of_classes()];
        self.header = Some(header);
    }

    fn train_on_instance(&mut self, instance: &dyn Instance) -> Result<(), ClassifierError> {
        if self.header.is_none() {
            return Err(ClassifierError::NotBuilt);
        }
        self.observe(instance);
        Ok(())
    }

    fn calc_memory_size(&self) -> usize {
        MemoryMeter::measure_root(self)
    }

    fn summary(&self) -> Option<String> {
        self.header.as_ref().map(|_| self.to_string())
    }
}

impl fmt::Display for ZeroR {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(header) = self.header.as_ref() else {
            return write!(f, "ZeroR: No model built yet.");
        };
        let label = self.majority_class().and_then(|i| {
            header
                .class_attribute()
                .and_then(|a| a.as_any().downcast_ref::<NominalAttribute>())
                .and_then(|n| n.value(i))
        });
        match label {
            Some(label) => write!(f, "ZeroR predicts class value: {label}"),
            None => write!(f, "ZeroR: class attribute declares no labels"),
        }
    }
}

impl MemorySized for ZeroR {
    fn inline_size(&self) -> usize {
        size_of::<Self>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        let mut total = 0;
        total += meter.measure_field(&self.header);
        total += meter.measure_field(&self.class_counts);
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attributes::{AttributeRef, NumericAttribute};
    use crate::core::instances::DenseInstance;

    fn header() -> Arc<InstanceHeader> {
        Arc::new(InstanceHeader::new(
            "r".into(),
            vec![
                Arc::new(NumericAttribute::new("x".into())) as AttributeRef,
                Arc::new(NominalAttribute::from_labels("c", &["a", "b", "c"])) as AttributeRef,
            ],
            1,
        ))
    }

    fn inst(h: &Arc<InstanceHeader>, class: f64, weight: f64) -> Box<dyn Instance> {
        Box::new(DenseInstance::new(h.clone(), vec![0.0, class], weight))
    }

    #[test]
    fn empty_data_gives_uniform_distribution() {
        let h = header();
        let mut z = ZeroR::new();
        z.fit(h, &[]);
        assert_eq!(z.predict_distribution(), vec![1.0 / 3.0; 3]);
    }

    #[test]
    fn counts_are_laplace_seeded_and_weighted() {
        let h = header();
        let mut z = ZeroR::new();
        z.fit(
            h.clone(),
            &[inst(&h, 0.0, 1.0), inst(&h, 0.0, 2.0), inst(&h, 2.0, 1.0)],
        );
        // counts 4, 1, 2
        let d = z.predict_distribution();
        assert!((d[0] - 4.0 / 7.0).abs() < 1e-12);
        assert!((d[1] - 1.0 / 7.0).abs() < 1e-12);
        assert!((d[2] - 2.0 / 7.0).abs() < 1e-12);
        assert_eq!(z.majority_class(), Some(0));
        assert_eq!(z.to_string(), "ZeroR predicts class value: a");
    }

    #[test]
    fn missing_class_is_skipped() {
        let h = header();
        let mut z = ZeroR::new();
        z.fit(h.clone(), &[inst(&h, f64::NAN, 5.0), inst(&h, 1.0, 1.0)]);
        assert_eq!(z.predict_distribution(), vec![0.25, 0.5, 0.25]);
    }

    #[test]
    fn incremental_training_matches_fit() {
        let h = header();
        let mut z = ZeroR::new();
        z.set_model_context(h.clone());
        z.train_on_instance(inst(&h, 1.0, 1.0).as_ref()).unwrap();
        let votes = z.get_votes_for_instance(inst(&h, 0.0, 1.0).as_ref()).unwrap();
        assert_eq!(votes, vec![0.25, 0.5, 0.25]);
        assert_eq!(z.summary().as_deref(), Some("ZeroR predicts class value: b"));
    }

    #[test]
    fn unbuilt_model_refuses_work() {
        let h = header();
        let mut z = ZeroR::new();
        let i = inst(&h, 0.0, 1.0);
        assert_eq!(
            z.get_votes_for_instance(i.as_ref()),
            Err(ClassifierError::NotBuilt)
        );
        assert_eq!(z.to_string(), "ZeroR: No model built yet.");
        assert_eq!(z.summary(), None);
    }
}
