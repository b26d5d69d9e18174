use crate::core::attributes::Attribute;
use std::any::Any;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct NominalAttribute {
    pub name: String,
    pub values: Vec<String>,
    pub label_to_index: HashMap<String, usize>,
}

impl NominalAttribute {
    pub fn new(name: String) -> NominalAttribute {
        NominalAttribute {
            name,
            values: Vec::new(),
            label_to_index: HashMap::new(),
        }
    }

    pub fn with_values(
        name: String,
        values: Vec<String>,
        label_to_index: HashMap<String, usize>,
    ) -> NominalAttribute {
        NominalAttribute {
            name,
            values,
            label_to_index,
        }
    }

    /// Builds the label map from the declaration order of `values`.
    pub fn from_labels(name: &str, values: &[&str]) -> NominalAttribute {
        let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        let label_to_index = values
            .iter()
            .enumerate()
            .map(|(i, v)| (v.clone(), i))
            .collect();
        NominalAttribute::with_values(name.to_string(), values, label_to_index)
    }

    pub fn number_of_values(&self) -> usize {
        self.values.len()
    }

    pub fn index_of_value(&self, v: &str) -> Option<usize> {
        self.label_to_index.get(v).copied()
    }

    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn enumerate_values(&self) -> impl Iterator<Item = (usize, &String)> {
        self.values.iter().enumerate()
    }
}

impl Attribute for NominalAttribute {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn arff_representation(&self) -> String {
        format!("@attribute {} {{ {} }}", self.name, self.values.join(", "))
    }

    fn calc_memory_size(&self) -> usize {
        let mut total: usize = 0;

        total += size_of::<Self>();

        total += self.name.capacity();

        total += self.values.capacity() * size_of::<String>();
        total += self.values.iter().map(|s| s.capacity()).sum::<usize>();

        total += self.label_to_index.capacity() * size_of::<(String, usize)>();
        total += self
            .label_to_index
            .keys()
            .map(|k| k.capacity())
            .sum::<usize>();

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_labels_keeps_declaration_order() {
        let a = NominalAttribute::from_labels("play", &["yes", "no"]);
        assert_eq!(a.number_of_values(), 2);
        assert_eq!(a.index_of_value("no"), Some(1));
        assert_eq!(a.value(0), Some("yes"));
        assert_eq!(a.index_of_value("maybe"), None);
    }

    #[test]
    fn arff_representation_lists_domain() {
        let a = NominalAttribute::from_labels("windy", &["TRUE", "FALSE"]);
        assert_eq!(a.arff_representation(), "@attribute windy { TRUE, FALSE }");
    }
}
