use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::streams::Stream;
use std::io::Error;
use std::sync::Arc;

/// In-memory stream over a list of class labels. Each instance has a single
/// numeric feature holding its position in the list.
pub struct VecStream {
    header: Arc<InstanceHeader>,
    labels: Vec<usize>,
    position: usize,
}

impl VecStream {
    pub fn new(labels: Vec<usize>) -> Self {
        let num_classes = labels.iter().max().map_or(2, |&m| (m + 1).max(2));
        let names: Vec<String> = (0..num_classes).map(|i| i.to_string()).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let header = InstanceHeader::new(
            "vec_stream".into(),
            vec![
                Arc::new(NumericAttribute::new("x".into())) as AttributeRef,
                Arc::new(NominalAttribute::from_labels("class", &names)) as AttributeRef,
            ],
            1,
        );
        Self {
            header: Arc::new(header),
            labels,
            position: 0,
        }
    }
}

impl Stream for VecStream {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn has_more_instances(&self) -> bool {
        self.position < self.labels.len()
    }

    fn next_instance(&mut self) -> Option<Box<dyn Instance>> {
        let label = *self.labels.get(self.position)?;
        let x = self.position as f64;
        self.position += 1;
        Some(Box::new(DenseInstance::new(
            Arc::clone(&self.header),
            vec![x, label as f64],
            1.0,
        )))
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.position = 0;
        Ok(())
    }
}
