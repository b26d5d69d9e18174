use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::error::ClassifierError;
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::collections::VecDeque;
use std::sync::Arc;

/// What [`TrainingWindow::append`] did with an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appended {
    /// The class label was missing; nothing changed.
    Ignored,
    /// The instance was stored and `evicted` of the oldest ones dropped.
    Stored { evicted: usize },
}

/// Labelled training instances in arrival order, bounded to the most recent
/// `limit` when `limit > 0`.
#[derive(Debug)]
pub struct TrainingWindow {
    header: Arc<InstanceHeader>,
    instances: VecDeque<Arc<DenseInstance>>,
    limit: usize,
}

impl TrainingWindow {
    /// Window over `instances`, keeping only the last `limit` of them.
    pub fn build(
        header: Arc<InstanceHeader>,
        instances: Vec<Arc<DenseInstance>>,
        limit: usize,
    ) -> Self {
        let mut instances = VecDeque::from(instances);
        if limit > 0 && instances.len() > limit {
            let excess = instances.len() - limit;
            instances.drain(..excess);
        }
        Self {
            header,
            instances,
            limit,
        }
    }

    /// Copies `instance` onto the window's schema and adds it at the back,
    /// evicting from the front past the limit.
    ///
    /// The caller's schema is checked before anything is copied or stored.
    pub fn append(&mut self, instance: &dyn Instance) -> Result<Appended, ClassifierError> {
        self.header
            .equal_headers(instance.header())
            .map_err(ClassifierError::SchemaMismatch)?;

        if instance.is_class_missing() {
            return Ok(Appended::Ignored);
        }

        let stored = DenseInstance::from_instance(Arc::clone(&self.header), instance);
        self.instances.push_back(Arc::new(stored));
        let evicted = self.evict_excess();
        Ok(Appended::Stored { evicted })
    }

    /// Changes the limit and drops the oldest instances past it at once.
    /// Returns how many were dropped.
    pub fn set_limit(&mut self, limit: usize) -> usize {
        self.limit = limit;
        self.evict_excess()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn size(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn header(&self) -> &Arc<InstanceHeader> {
        &self.header
    }

    pub fn instances(&self) -> impl ExactSizeIterator<Item = &Arc<DenseInstance>> {
        self.instances.iter()
    }

    pub fn newest(&self) -> Option<&Arc<DenseInstance>> {
        self.instances.back()
    }

    /// Shared handles to the current contents, oldest first.
    pub fn to_vec(&self) -> Vec<Arc<DenseInstance>> {
        self.instances.iter().cloned().collect()
    }

    fn evict_excess(&mut self) -> usize {
        if self.limit == 0 {
            return 0;
        }
        let mut evicted = 0;
        while self.instances.len() > self.limit {
            self.instances.pop_front();
            evicted += 1;
        }
        evicted
    }
}

impl MemorySized for TrainingWindow {
    fn inline_size(&self) -> usize {
        size_of::<Self>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        let mut total = 0;
        total += meter.measure_field(&self.header);
        total += meter.measure_field(&self.instances);
        total
    }
}
