use super::{DateAttribute, NominalAttribute, NumericAttribute};
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::any::Any;
use std::sync::Arc;

pub type AttributeRef = Arc<dyn Attribute + Send + Sync>;

pub trait Attribute: Any + Send + Sync {
    fn name(&self) -> String;

    fn as_any(&self) -> &dyn Any;

    fn arff_representation(&self) -> String;
    fn calc_memory_size(&self) -> usize;

    #[inline]
    fn is_nominal(&self) -> bool {
        self.as_any().is::<NominalAttribute>()
    }

    /// Date values are kept as epoch milliseconds, so dates count as numeric
    /// for anything that only needs an ordered scale.
    #[inline]
    fn is_numeric(&self) -> bool {
        self.as_any().is::<NumericAttribute>() || self.is_date()
    }

    #[inline]
    fn is_date(&self) -> bool {
        self.as_any().is::<DateAttribute>()
    }
}

impl MemorySized for dyn Attribute + Send + Sync {
    fn inline_size(&self) -> usize {
        std::mem::size_of_val(self)
    }

    fn extra_heap_size(&self, _meter: &mut MemoryMeter) -> usize {
        self.calc_memory_size()
            .saturating_sub(std::mem::size_of_val(self))
    }
}
