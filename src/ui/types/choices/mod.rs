mod evaluator_choice;
mod learner_choice;
mod stream_choice;
mod task_choice;

pub use evaluator_choice::{BasicClassificationParameters, EvaluatorChoice, EvaluatorKind};
pub use learner_choice::{
    CivdParameters, LearnerChoice, LearnerKind, LinearNNSearchParameters, NNSearchChoice,
    NNSearchKind,
};
pub use stream_choice::{ArffParameters, StreamChoice, StreamKind};
pub use task_choice::{
    CurveOutput, DEFAULT_MEM_CHECK_FREQUENCY, DEFAULT_SAMPLE_FREQUENCY, PrequentialParams,
    TaskChoice, TaskKind,
};

use schemars::Schema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// A tagged configuration enum: `{"type": <kind>, "params": {...}}`.
pub trait UIChoice: Sized + Serialize + DeserializeOwned {
    type Kind: Copy + Into<&'static str>;

    fn schema() -> Schema;

    /// Parameters a freshly chosen `kind` starts from.
    fn default_params(kind: Self::Kind) -> Value;

    fn from_parts(kind: Self::Kind, params: Value) -> anyhow::Result<Self> {
        let tag: &'static str = kind.into();
        let value = if params.is_null() {
            json!({ "type": tag })
        } else {
            json!({ "type": tag, "params": params })
        };
        Ok(serde_json::from_value(value)?)
    }
}
