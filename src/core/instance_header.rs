use crate::core::attributes::{Attribute, AttributeRef, DateAttribute, NominalAttribute};
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::fmt;

pub struct InstanceHeader {
    relation_name: String,
    pub attributes: Vec<AttributeRef>,
    class_index: usize,
}

impl InstanceHeader {
    pub fn new(
        relation_name: String,
        attributes: Vec<AttributeRef>,
        class_index: usize,
    ) -> InstanceHeader {
        InstanceHeader {
            relation_name,
            attributes,
            class_index,
        }
    }

    pub fn class_attribute(&self) -> Option<&dyn Attribute> {
        self.attribute_at_index(self.class_index)
    }

    pub fn number_of_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn relation_name(&self) -> &str {
        &self.relation_name
    }

    pub fn attribute_at_index(&self, index: usize) -> Option<&dyn Attribute> {
        if index < self.attributes.len() {
            Some(self.attributes[index].as_ref())
        } else {
            None
        }
    }

    pub fn index_of_attribute(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|attr| attr.name() == name)
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    pub fn number_of_classes(&self) -> usize {
        self.class_attribute()
            .and_then(|a| a.as_any().downcast_ref::<NominalAttribute>())
            .map(|n| n.values.len())
            .unwrap_or(0)
    }

    /// Checks that `other` describes the same schema: same class position and
    /// the same attributes, in order, with identical kinds and nominal
    /// domains. The error names the first difference found.
    pub fn equal_headers(&self, other: &InstanceHeader) -> Result<(), String> {
        if self.class_index != other.class_index {
            return Err(format!(
                "Class index differ: {} != {}",
                self.class_index + 1,
                other.class_index + 1
            ));
        }

        if self.attributes.len() != other.attributes.len() {
            return Err(format!(
                "Different number of attributes: {} != {}",
                self.attributes.len(),
                other.attributes.len()
            ));
        }

        for (i, (mine, theirs)) in self.attributes.iter().zip(&other.attributes).enumerate() {
            if mine.name() != theirs.name() {
                return Err(format!(
                    "Attributes differ at position {}: names differ ({} != {})",
                    i + 1,
                    mine.name(),
                    theirs.name()
                ));
            }

            let same_kind = (mine.is_nominal() && theirs.is_nominal())
                || (mine.is_date() && theirs.is_date())
                || (mine.is_numeric()
                    && !mine.is_date()
                    && theirs.is_numeric()
                    && !theirs.is_date());
            if !same_kind {
                return Err(format!(
                    "Attributes differ at position {}: types differ ({} vs {})",
                    i + 1,
                    mine.arff_representation(),
                    theirs.arff_representation()
                ));
            }

            if let (Some(a), Some(b)) = (
                mine.as_any().downcast_ref::<NominalAttribute>(),
                theirs.as_any().downcast_ref::<NominalAttribute>(),
            ) && a.values != b.values
            {
                return Err(format!(
                    "Attributes differ at position {}: labels differ ({{{}}} != {{{}}})",
                    i + 1,
                    a.values.join(","),
                    b.values.join(",")
                ));
            }

            if let (Some(a), Some(b)) = (
                mine.as_any().downcast_ref::<DateAttribute>(),
                theirs.as_any().downcast_ref::<DateAttribute>(),
            ) && a.format != b.format
            {
                return Err(format!(
                    "Attributes differ at position {}: date formats differ ({} != {})",
                    i + 1,
                    a.format,
                    b.format
                ));
            }
        }

        Ok(())
    }

    pub fn calc_memory_size(&self) -> usize {
        MemoryMeter::measure_root(self)
    }
}

impl MemorySized for InstanceHeader {
    fn inline_size(&self) -> usize {
        size_of::<Self>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        let mut total = self.relation_name.capacity();
        total += self.attributes.capacity() * size_of::<AttributeRef>();
        for attr in &self.attributes {
            total += meter.measure_field(attr);
        }
        total
    }
}

impl fmt::Debug for InstanceHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceHeader")
            .field("relation_name", &self.relation_name)
            .field("class_index", &self.class_index)
            .field("n_attributes", &self.attributes.len())
            .finish()
    }
}
