use anyhow::{Context, Result, anyhow};

use crate::classifiers::{Civd, Classifier, ZeroR};
use crate::evaluation::{BasicClassificationEvaluator, BasicEstimator, PerformanceEvaluator};
use crate::neighbour_search::{EuclideanDistance, LinearNNSearch, NearestNeighbourSearch};
use crate::streams::{ArffFileStream, Stream};
use crate::ui::types::choices::{EvaluatorChoice, LearnerChoice, NNSearchChoice, StreamChoice};

pub fn build_learner(choice: LearnerChoice) -> Result<Box<dyn Classifier>> {
    match choice {
        LearnerChoice::Civd(p) => {
            let window_size = usize::try_from(p.window_size)
                .with_context(|| format!("window_size {} does not fit in memory", p.window_size))?;
            Ok(Box::new(Civd::new(window_size, build_nn_search(p.nn_search))))
        }
        LearnerChoice::MajorityClass => Ok(Box::new(ZeroR::new())),
    }
}

pub fn build_nn_search(choice: NNSearchChoice) -> Box<dyn NearestNeighbourSearch> {
    match choice {
        NNSearchChoice::LinearNNSearch(p) => Box::new(LinearNNSearch::new(
            EuclideanDistance::new(p.normalize),
            p.measure_performance,
        )),
    }
}

pub fn build_stream(choice: StreamChoice) -> Result<Box<dyn Stream>> {
    match choice {
        StreamChoice::ArffFile(p) => {
            let class_index = match p.class_index {
                Some(i) => Some(
                    i.checked_sub(1)
                        .ok_or_else(|| anyhow!("class_index is 1-based, got 0"))?,
                ),
                None => None,
            };
            let stream = ArffFileStream::new(p.path.clone(), class_index)
                .with_context(|| format!("failed to open {}", p.path.display()))?;
            Ok(Box::new(stream))
        }
    }
}

pub fn build_evaluator(choice: EvaluatorChoice) -> Result<Box<dyn PerformanceEvaluator>> {
    match choice {
        EvaluatorChoice::BasicClassification(p) => Ok(Box::new(BasicClassificationEvaluator::<
            BasicEstimator,
        >::new(0, p.precision_recall))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::types::choices::{
        ArffParameters, BasicClassificationParameters, CivdParameters, LinearNNSearchParameters,
    };
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn civd_learner_wires_its_neighbour_search() {
        let learner = build_learner(LearnerChoice::Civd(CivdParameters {
            window_size: 7,
            nn_search: NNSearchChoice::LinearNNSearch(LinearNNSearchParameters {
                normalize: false,
                measure_performance: true,
            }),
        }))
        .unwrap();
        let names: Vec<String> = learner.measurements().into_iter().map(|m| m.name).collect();
        assert!(names.iter().any(|n| n == "measureQueries"));
    }

    #[test]
    fn majority_class_learner_reports_no_measures() {
        let learner = build_learner(LearnerChoice::MajorityClass).unwrap();
        assert!(learner.measurements().is_empty());
    }

    #[test]
    fn arff_stream_uses_one_based_class_index() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(
            f,
            "@relation r\n@attribute c {{a,b}}\n@attribute x numeric\n@data\na,1.0"
        )
        .unwrap();

        let s = build_stream(StreamChoice::ArffFile(ArffParameters {
            path: f.path().to_path_buf(),
            class_index: Some(1),
        }))
        .unwrap();
        assert_eq!(s.header().class_index(), 0);

        let err = build_stream(StreamChoice::ArffFile(ArffParameters {
            path: f.path().to_path_buf(),
            class_index: Some(0),
        }))
        .err()
        .unwrap();
        assert!(err.to_string().contains("1-based"));
    }

    #[test]
    fn missing_arff_file_is_reported() {
        let err = build_stream(StreamChoice::ArffFile(ArffParameters {
            path: "/definitely/not/here.arff".into(),
            class_index: None,
        }))
        .err()
        .unwrap();
        assert!(err.to_string().contains("failed to open"));
    }

    #[test]
    fn evaluator_starts_empty() {
        let e = build_evaluator(EvaluatorChoice::BasicClassification(
            BasicClassificationParameters {
                precision_recall: true,
            },
        ))
        .unwrap();
        let names: Vec<String> = e.performance().into_iter().map(|m| m.name).collect();
        assert_eq!(names, ["accuracy", "kappa", "precision", "recall", "f1"]);
    }
}
