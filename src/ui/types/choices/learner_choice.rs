use crate::ui::types::choices::UIChoice;
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

fn default_normalize() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct LinearNNSearchParameters {
    #[serde(default = "default_normalize")]
    #[schemars(
        title = "Normalize",
        description = "Scale numeric attributes into [0, 1] by their observed range",
        default = "default_normalize"
    )]
    pub normalize: bool,

    #[serde(default)]
    #[schemars(
        title = "Measure Performance",
        description = "Count queries and visited points"
    )]
    pub measure_performance: bool,
}

impl Default for LinearNNSearchParameters {
    fn default() -> Self {
        Self {
            normalize: default_normalize(),
            measure_performance: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants, PartialEq)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(NNSearchKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum NNSearchChoice {
    #[strum_discriminants(strum(
        message = "Linear NN Search",
        detailed_message = "Brute-force scan over every stored instance."
    ))]
    LinearNNSearch(LinearNNSearchParameters),
}

impl Default for NNSearchChoice {
    fn default() -> Self {
        NNSearchChoice::LinearNNSearch(LinearNNSearchParameters::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct CivdParameters {
    #[serde(default)]
    #[schemars(
        title = "Window Size",
        description = "Training instances kept, oldest evicted first (0 = unbounded)"
    )]
    pub window_size: u64,

    #[serde(default)]
    #[schemars(title = "Neighbour Search", description = "Nearest neighbour search algorithm")]
    pub nn_search: NNSearchChoice,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(LearnerKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum LearnerChoice {
    #[strum_discriminants(strum(
        message = "CIVD",
        detailed_message = "All-neighbour classifier with inverse squared distance voting."
    ))]
    Civd(CivdParameters),

    #[strum_discriminants(strum(
        message = "Majority Class",
        detailed_message = "Always predicts the class distribution seen so far."
    ))]
    MajorityClass,
}

impl UIChoice for LearnerChoice {
    type Kind = LearnerKind;

    fn schema() -> Schema {
        schema_for!(LearnerChoice)
    }

    fn default_params(kind: Self::Kind) -> Value {
        match kind {
            LearnerKind::Civd => {
                serde_json::to_value(CivdParameters::default()).unwrap_or(Value::Null)
            }
            LearnerKind::MajorityClass => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strum::{EnumMessage, IntoEnumIterator};

    #[test]
    fn civd_defaults_are_unbounded_and_normalized() {
        let p: CivdParameters =
            serde_json::from_value(LearnerChoice::default_params(LearnerKind::Civd)).unwrap();
        assert_eq!(p.window_size, 0);
        assert_eq!(p.nn_search, NNSearchChoice::default());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let p: CivdParameters = serde_json::from_value(json!({})).unwrap();
        assert_eq!(p, CivdParameters::default());

        let p: CivdParameters = serde_json::from_value(json!({
            "window_size": 25,
            "nn_search": { "type": "linear-nn-search", "params": { "normalize": false } }
        }))
        .unwrap();
        assert_eq!(p.window_size, 25);
        assert_eq!(
            p.nn_search,
            NNSearchChoice::LinearNNSearch(LinearNNSearchParameters {
                normalize: false,
                measure_performance: false,
            })
        );
    }

    #[test]
    fn from_parts_handles_unit_and_struct_variants() {
        let civd = LearnerChoice::from_parts(
            LearnerKind::Civd,
            LearnerChoice::default_params(LearnerKind::Civd),
        )
        .unwrap();
        assert!(matches!(civd, LearnerChoice::Civd(_)));

        let mc = LearnerChoice::from_parts(
            LearnerKind::MajorityClass,
            LearnerChoice::default_params(LearnerKind::MajorityClass),
        )
        .unwrap();
        assert!(matches!(mc, LearnerChoice::MajorityClass));
    }

    #[test]
    fn tagged_serialization() {
        let v = serde_json::to_value(LearnerChoice::Civd(CivdParameters::default())).unwrap();
        assert_eq!(v["type"], "civd");
        assert_eq!(v["params"]["nn_search"]["type"], "linear-nn-search");
        assert_eq!(v["params"]["nn_search"]["params"]["normalize"], true);

        let v = serde_json::to_value(LearnerChoice::MajorityClass).unwrap();
        assert_eq!(v["type"], "majority-class");
    }

    #[test]
    fn kinds_parse_from_kebab_case() {
        assert_eq!("civd".parse::<LearnerKind>().unwrap(), LearnerKind::Civd);
        assert_eq!(
            "majority-class".parse::<LearnerKind>().unwrap(),
            LearnerKind::MajorityClass
        );
        assert_eq!(LearnerKind::iter().count(), 2);
        assert!(LearnerKind::Civd.get_detailed_message().is_some());
    }

    #[test]
    fn schema_lists_both_learners() {
        let s = serde_json::to_string(&LearnerChoice::schema()).unwrap();
        assert!(s.contains("\"civd\""));
        assert!(s.contains("\"majority-class\""));
        assert!(s.contains("Window Size"));
    }
}
