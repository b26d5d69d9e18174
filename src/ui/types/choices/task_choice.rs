use crate::evaluation::CurveFormat;
use crate::ui::types::choices::{EvaluatorChoice, LearnerChoice, StreamChoice, UIChoice};
use anyhow::ensure;
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::PathBuf;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

pub const DEFAULT_SAMPLE_FREQUENCY: u64 = 100_000;
pub const DEFAULT_MEM_CHECK_FREQUENCY: u64 = 100_000;

fn default_sample_frequency() -> u64 {
    DEFAULT_SAMPLE_FREQUENCY
}

fn default_mem_check_frequency() -> u64 {
    DEFAULT_MEM_CHECK_FREQUENCY
}

/// Where the learning curve goes once the run is over.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CurveOutput {
    #[schemars(
        with = "String",
        title = "Curve file",
        extend("format" = "path", "x-file" = true, "x-must-exist" = false)
    )]
    pub path: PathBuf,

    #[serde(default)]
    #[schemars(title = "Curve format")]
    pub format: CurveFormat,
}

/// Test-then-train run over one stream.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PrequentialParams {
    #[schemars(skip)]
    pub learner: LearnerChoice,
    #[schemars(skip)]
    pub stream: StreamChoice,
    #[schemars(skip)]
    pub evaluator: EvaluatorChoice,

    #[serde(default)]
    #[schemars(title = "Instance limit", description = "Omit to read the whole stream")]
    pub max_instances: Option<u64>,

    #[serde(default)]
    #[schemars(title = "CPU seconds limit", description = "Omit to run without a time limit")]
    pub max_seconds: Option<u64>,

    #[serde(default = "default_sample_frequency")]
    #[schemars(title = "Snapshot every N instances", range(min = 1))]
    pub sample_frequency: u64,

    #[serde(default = "default_mem_check_frequency")]
    #[schemars(title = "Model size every N instances", range(min = 1))]
    pub mem_check_frequency: u64,

    #[serde(default)]
    pub curve: Option<CurveOutput>,

    #[serde(default)]
    #[schemars(
        title = "Show model",
        description = "Print the learner's own summary after the run"
    )]
    pub show_model: bool,
}

impl PrequentialParams {
    /// Rejects settings the evaluator cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.sample_frequency > 0, "sample_frequency must be at least 1");
        ensure!(
            self.mem_check_frequency > 0,
            "mem_check_frequency must be at least 1"
        );
        if let Some(out) = &self.curve {
            ensure!(!out.path.as_os_str().is_empty(), "curve path is empty");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(TaskKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum TaskChoice {
    #[strum_discriminants(strum(
        message = "Prequential evaluation",
        detailed_message = "Predict each instance, then train on it."
    ))]
    EvaluatePrequential(PrequentialParams),
}

impl UIChoice for TaskChoice {
    type Kind = TaskKind;

    fn schema() -> Schema {
        schema_for!(TaskChoice)
    }

    fn default_params(kind: Self::Kind) -> Value {
        match kind {
            TaskKind::EvaluatePrequential => json!({
                "sample_frequency": DEFAULT_SAMPLE_FREQUENCY,
                "mem_check_frequency": DEFAULT_MEM_CHECK_FREQUENCY,
                "show_model": false,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::types::choices::{EvaluatorKind, LearnerKind, StreamKind};

    fn parts() -> Value {
        let learner = LearnerChoice::from_parts(
            LearnerKind::MajorityClass,
            LearnerChoice::default_params(LearnerKind::MajorityClass),
        )
        .unwrap();
        let stream = StreamChoice::from_parts(
            StreamKind::ArffFile,
            json!({ "path": "in.arff" }),
        )
        .unwrap();
        let evaluator = EvaluatorChoice::from_parts(
            EvaluatorKind::BasicClassification,
            EvaluatorChoice::default_params(EvaluatorKind::BasicClassification),
        )
        .unwrap();
        json!({ "learner": learner, "stream": stream, "evaluator": evaluator })
    }

    fn params(extra: Value) -> PrequentialParams {
        let mut v = parts();
        if let (Some(dst), Some(src)) = (v.as_object_mut(), extra.as_object()) {
            dst.extend(src.clone());
        }
        let TaskChoice::EvaluatePrequential(p) =
            TaskChoice::from_parts(TaskKind::EvaluatePrequential, v).unwrap();
        p
    }

    #[test]
    fn omitted_settings_fall_back_to_defaults() {
        let p = params(json!({}));
        assert_eq!(p.sample_frequency, DEFAULT_SAMPLE_FREQUENCY);
        assert_eq!(p.mem_check_frequency, DEFAULT_MEM_CHECK_FREQUENCY);
        assert_eq!(p.max_instances, None);
        assert!(p.curve.is_none());
        assert!(!p.show_model);
        p.validate().unwrap();
    }

    #[test]
    fn curve_output_defaults_to_csv() {
        let p = params(json!({ "curve": { "path": "out/curve.csv" } }));
        assert_eq!(
            p.curve,
            Some(CurveOutput {
                path: PathBuf::from("out/curve.csv"),
                format: CurveFormat::Csv,
            })
        );

        let p = params(json!({ "curve": { "path": "c.json", "format": "json" } }));
        assert_eq!(p.curve.map(|c| c.format), Some(CurveFormat::Json));
    }

    #[test]
    fn validate_catches_zero_frequencies_and_blank_path() {
        let err = params(json!({ "sample_frequency": 0 })).validate().unwrap_err();
        assert!(err.to_string().contains("sample_frequency"));

        let err = params(json!({ "mem_check_frequency": 0 })).validate().unwrap_err();
        assert!(err.to_string().contains("mem_check_frequency"));

        let err = params(json!({ "curve": { "path": "" } })).validate().unwrap_err();
        assert_eq!(err.to_string(), "curve path is empty");
    }

    #[test]
    fn serialized_task_nests_its_components() {
        let v = serde_json::to_value(TaskChoice::EvaluatePrequential(params(json!({
            "max_instances": 500
        }))))
        .unwrap();
        assert_eq!(v["type"], "evaluate-prequential");
        assert_eq!(v["params"]["max_instances"], 500);
        assert_eq!(v["params"]["learner"]["type"], "majority-class");
        assert_eq!(v["params"]["stream"]["params"]["path"], "in.arff");
    }

    #[test]
    fn schema_hides_components_and_bounds_frequencies() {
        let schema = serde_json::to_value(schema_for!(PrequentialParams)).unwrap();
        let props = schema["properties"].as_object().unwrap();
        for hidden in ["learner", "stream", "evaluator"] {
            assert!(!props.contains_key(hidden), "{hidden} should be skipped");
        }
        assert_eq!(props["sample_frequency"]["minimum"], 1);
        assert_eq!(props["mem_check_frequency"]["minimum"], 1);
        assert!(props.contains_key("curve"));
        assert!(props.contains_key("show_model"));
    }
}
