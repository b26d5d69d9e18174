use crate::core::attributes::Attribute;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::error::ClassifierError;
use std::collections::BTreeSet;
use strum_macros::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[strum(serialize_all = "title_case")]
pub enum Capability {
    NominalAttributes,
    NumericAttributes,
    DateAttributes,
    MissingValues,
    NominalClass,
    MissingClassValues,
}

/// What a learner accepts as training data. Checked once per build.
#[derive(Debug, Clone, Default)]
pub struct Capabilities {
    enabled: BTreeSet<Capability>,
    minimum_number_instances: usize,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&mut self, capability: Capability) -> &mut Self {
        self.enabled.insert(capability);
        self
    }

    pub fn disable(&mut self, capability: Capability) -> &mut Self {
        self.enabled.remove(&capability);
        self
    }

    pub fn handles(&self, capability: Capability) -> bool {
        self.enabled.contains(&capability)
    }

    pub fn set_minimum_number_instances(&mut self, n: usize) -> &mut Self {
        self.minimum_number_instances = n;
        self
    }

    pub fn minimum_number_instances(&self) -> usize {
        self.minimum_number_instances
    }

    pub fn test_with_fail(
        &self,
        header: &InstanceHeader,
        instances: &[Box<dyn Instance>],
    ) -> Result<(), ClassifierError> {
        let class_index = header.class_index();
        let Some(class_attr) = header.class_attribute() else {
            return Err(ClassifierError::Configuration(format!(
                "class index {} out of range for {} attributes",
                class_index + 1,
                header.number_of_attributes()
            )));
        };

        if !class_attr.is_nominal() || !self.handles(Capability::NominalClass) {
            return Err(ClassifierError::Configuration(format!(
                "cannot handle class attribute '{}': a nominal class is required",
                class_attr.name()
            )));
        }
        if header.number_of_classes() == 0 {
            return Err(ClassifierError::Configuration(format!(
                "class attribute '{}' declares no labels",
                class_attr.name()
            )));
        }

        for (i, attr) in header.attributes.iter().enumerate() {
            if i == class_index {
                continue;
            }
            let required = required_capability(attr.as_ref());
            if !required.is_some_and(|cap| self.handles(cap)) {
                return Err(ClassifierError::Configuration(format!(
                    "cannot handle attribute '{}' ({})",
                    attr.name(),
                    required.map_or_else(|| "unknown type".to_string(), |c| c.to_string())
                )));
            }
        }

        if instances.len() < self.minimum_number_instances {
            return Err(ClassifierError::Configuration(format!(
                "not enough training instances (required: {}, provided: {})",
                self.minimum_number_instances,
                instances.len()
            )));
        }

        let missing_values_ok = self.handles(Capability::MissingValues);
        let missing_class_ok = self.handles(Capability::MissingClassValues);
        for inst in instances {
            if !missing_class_ok && inst.is_class_missing() {
                return Err(ClassifierError::Configuration(
                    "cannot handle missing class values".into(),
                ));
            }
            if !missing_values_ok {
                let any_missing = (0..inst.number_of_attributes())
                    .filter(|&i| i != class_index)
                    .any(|i| inst.is_missing_at_index(i).unwrap_or(true));
                if any_missing {
                    return Err(ClassifierError::Configuration(
                        "cannot handle missing values".into(),
                    ));
                }
            }
        }

        Ok(())
    }
}

fn required_capability(attr: &dyn Attribute) -> Option<Capability> {
    if attr.is_nominal() {
        Some(Capability::NominalAttributes)
    } else if attr.is_date() {
        Some(Capability::DateAttributes)
    } else if attr.is_numeric() {
        Some(Capability::NumericAttributes)
    } else {
        None
    }
}
