use crate::ui::types::choices::UIChoice;
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct ArffParameters {
    #[schemars(
        with = "String",
        title = "ARFF Path",
        description = "Path to .arff file",
        extend(
            "format" = "path",
            "x-file" = true,
            "x-must-exist" = true,
            "x-extensions" = ["arff"]
        )
    )]
    pub path: PathBuf,

    #[serde(default)]
    #[schemars(
        title = "Class Index",
        description = "1-based index of the class column. (None = last attribute in file)",
        range(min = 1)
    )]
    pub class_index: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(StreamKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum StreamChoice {
    #[strum_discriminants(strum(
        message = "Arff File Stream",
        detailed_message = "A stream read from an ARFF file."
    ))]
    ArffFile(ArffParameters),
}

impl UIChoice for StreamChoice {
    type Kind = StreamKind;

    fn schema() -> Schema {
        schema_for!(StreamChoice)
    }

    fn default_params(kind: Self::Kind) -> Value {
        match kind {
            StreamKind::ArffFile => {
                serde_json::to_value(ArffParameters::default()).unwrap_or(Value::Null)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::schema_for;
    use serde_json::{Value, json};
    use strum::EnumMessage;

    fn root_props_of<T: JsonSchema>() -> Value {
        let v = serde_json::to_value(schema_for!(T)).expect("schema to JSON");
        v.get("schema")
            .cloned()
            .unwrap_or(v)
            .get("properties")
            .cloned()
            .unwrap_or_else(|| json!({}))
    }

    #[test]
    fn serde_roundtrip_arff() {
        let p0 = ArffParameters {
            path: PathBuf::from("data/a.arff"),
            class_index: Some(1),
        };
        let j = serde_json::to_string(&p0).unwrap();
        let p1: ArffParameters = serde_json::from_str(&j).unwrap();
        assert_eq!(p0, p1);
    }

    #[test]
    fn class_index_may_be_omitted() {
        let p: ArffParameters = serde_json::from_value(json!({ "path": "x.arff" })).unwrap();
        assert_eq!(p.class_index, None);
    }

    #[test]
    fn from_parts_rebuilds_enum() {
        let params = json!({ "path": "data/a.arff", "class_index": 3 });
        let e = StreamChoice::from_parts(StreamKind::ArffFile, params).unwrap();
        let StreamChoice::ArffFile(p) = e;
        assert_eq!(p.path, PathBuf::from("data/a.arff"));
        assert_eq!(p.class_index, Some(3));
    }

    #[test]
    fn tagged_enum_serialization() {
        let v = serde_json::to_value(StreamChoice::ArffFile(ArffParameters::default())).unwrap();
        assert_eq!(v.get("type").and_then(Value::as_str), Some("arff-file"));
        assert!(v.get("params").is_some());
    }

    #[test]
    fn arff_schema_path_has_vendor_extensions() {
        let props = root_props_of::<ArffParameters>();
        let obj = props.as_object().unwrap();
        let path = obj.get("path").unwrap().as_object().unwrap();

        assert_eq!(path.get("type").and_then(Value::as_str), Some("string"));
        assert_eq!(path.get("format").and_then(Value::as_str), Some("path"));
        assert_eq!(path.get("x-file").and_then(Value::as_bool), Some(true));

        let exts = path.get("x-extensions").and_then(Value::as_array).unwrap();
        assert!(exts.iter().any(|v| v.as_str() == Some("arff")));

        let cls = obj.get("class_index").unwrap().as_object().unwrap();
        assert_eq!(cls.get("minimum").and_then(Value::as_u64), Some(1));
    }

    #[test]
    fn streamkind_messages_exist() {
        assert_eq!(StreamKind::ArffFile.get_message(), Some("Arff File Stream"));
        assert!(StreamKind::ArffFile.get_detailed_message().is_some());
    }
}
