use crate::classifiers::classifier::Classifier;
use crate::classifiers::lazy::gravity_vote::gravity_vote;
use crate::classifiers::lazy::training_window::{Appended, TrainingWindow};
use crate::classifiers::rules::ZeroR;
use crate::core::capabilities::{Capabilities, Capability};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::error::ClassifierError;
use crate::evaluation::Measurement;
use crate::neighbour_search::{LinearNNSearch, NearestNeighbourSearch};
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// State fixed by a build and carried through updates.
#[derive(Debug)]
struct Model {
    window: TrainingWindow,
    num_classes: usize,
    num_attributes_used: usize,
    default_model: ZeroR,
}

/// Online all-nearest-neighbour classifier with gravity voting.
///
/// Every stored instance votes for its class with `weight / distance²`;
/// votes are averaged per class and the strongest class gets the whole
/// distribution. Training instances live in a sliding window of the most
/// recent `window_size` labelled instances (0 keeps everything). With an
/// empty window predictions come from a class-frequency baseline.
pub struct Civd {
    window_size: usize,
    nn_search: Box<dyn NearestNeighbourSearch>,
    model: Option<Model>,
}

impl Default for Civd {
    fn default() -> Self {
        Self::new(0, Box::new(LinearNNSearch::default()))
    }
}

impl Civd {
    pub fn new(window_size: usize, nn_search: Box<dyn NearestNeighbourSearch>) -> Self {
        Self {
            window_size,
            nn_search,
            model: None,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::new();
        caps.enable(Capability::NominalAttributes)
            .enable(Capability::NumericAttributes)
            .enable(Capability::DateAttributes)
            .enable(Capability::MissingValues)
            .enable(Capability::NominalClass)
            .enable(Capability::MissingClassValues)
            .set_minimum_number_instances(0);
        caps
    }

    /// Discards any previous model and trains on `instances`.
    ///
    /// Instances without a class label are left out of the window but still
    /// count for the fallback model. On error the previous model is kept.
    pub fn build_classifier(
        &mut self,
        header: Arc<InstanceHeader>,
        instances: &[Box<dyn Instance>],
    ) -> Result<(), ClassifierError> {
        self.capabilities().test_with_fail(&header, instances)?;
        for inst in instances {
            header
                .equal_headers(inst.header())
                .map_err(ClassifierError::SchemaMismatch)?;
        }

        let labelled: Vec<Arc<DenseInstance>> = instances
            .iter()
            .filter(|inst| !inst.is_class_missing())
            .map(|inst| Arc::new(DenseInstance::from_instance(Arc::clone(&header), inst.as_ref())))
            .collect();

        let num_attributes_used = header
            .attributes
            .iter()
            .enumerate()
            .filter(|(i, attr)| *i != header.class_index() && (attr.is_nominal() || attr.is_numeric()))
            .count();

        let mut default_model = ZeroR::new();
        default_model.fit(Arc::clone(&header), instances);

        let window = TrainingWindow::build(Arc::clone(&header), labelled, self.window_size);
        self.nn_search.set_instances(window.to_vec());

        debug!(
            window = window.size(),
            limit = self.window_size,
            dropped = instances.len() - window.size(),
            "built CIVD model"
        );

        self.model = Some(Model {
            window,
            num_classes: header.number_of_classes(),
            num_attributes_used,
            default_model,
        });
        Ok(())
    }

    /// Adds one training instance. Unlabelled instances are ignored.
    pub fn update_classifier(&mut self, instance: &dyn Instance) -> Result<(), ClassifierError> {
        let model = self.model.as_mut().ok_or(ClassifierError::NotBuilt)?;

        match model.window.append(instance)? {
            Appended::Ignored => {}
            Appended::Stored { evicted: 0 } => {
                if let Some(newest) = model.window.newest() {
                    self.nn_search.update(Arc::clone(newest));
                }
            }
            Appended::Stored { evicted } => {
                debug!(evicted, window = model.window.size(), "window full, re-indexing");
                self.nn_search.set_instances(model.window.to_vec());
            }
        }
        Ok(())
    }

    /// One-hot class distribution for `instance`, or the fallback
    /// distribution while the window is empty.
    pub fn distribution_for_instance(
        &mut self,
        instance: &dyn Instance,
    ) -> Result<Vec<f64>, ClassifierError> {
        let model = self.model.as_ref().ok_or(ClassifierError::NotBuilt)?;
        model
            .window
            .header()
            .equal_headers(instance.header())
            .map_err(ClassifierError::SchemaMismatch)?;

        let num_training = model.window.size();
        if num_training == 0 {
            return Ok(model.default_model.predict_distribution());
        }

        self.nn_search.add_instance_info(instance);
        let neighbours = self.nn_search.k_nearest_neighbours(instance, num_training);
        let distribution = gravity_vote(&neighbours, model.num_classes, num_training);

        debug!(neighbours = neighbours.len(), ?distribution, "CIVD prediction");
        Ok(distribution)
    }

    /// Current number of stored training instances.
    pub fn num_training(&self) -> usize {
        self.model.as_ref().map_or(0, |m| m.window.size())
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// A built model is trimmed to the new size right away.
    pub fn set_window_size(&mut self, window_size: usize) {
        self.window_size = window_size;
        let Some(model) = self.model.as_mut() else {
            return;
        };
        let evicted = model.window.set_limit(window_size);
        if evicted > 0 {
            debug!(evicted, window = model.window.size(), "window shrunk, re-indexing");
            self.nn_search.set_instances(model.window.to_vec());
        }
    }

    pub fn nearest_neighbour_search(&self) -> &dyn NearestNeighbourSearch {
        self.nn_search.as_ref()
    }

    /// Swaps the search strategy. A built model re-indexes its window with it.
    pub fn set_nearest_neighbour_search(&mut self, mut nn_search: Box<dyn NearestNeighbourSearch>) {
        if let Some(model) = self.model.as_ref() {
            nn_search.set_instances(model.window.to_vec());
        }
        self.nn_search = nn_search;
    }

    /// Non-class attributes taking part in the distance, as of the last build.
    pub fn num_attributes_used(&self) -> usize {
        self.model.as_ref().map_or(0, |m| m.num_attributes_used)
    }

    pub fn is_built(&self) -> bool {
        self.model.is_some()
    }

    pub fn enumerate_measures(&self) -> Vec<String> {
        self.nn_search.enumerate_measures()
    }

    pub fn get_measure(&self, name: &str) -> Result<f64, ClassifierError> {
        self.nn_search.get_measure(name)
    }
}

impl Classifier for Civd {
    fn get_votes_for_instance(&mut self, instance: &dyn Instance) -> Result<Vec<f64>, ClassifierError> {
        self.distribution_for_instance(instance)
    }

    /// Starts from an empty training set over `header`.
    fn set_model_context(&mut self, header: Arc<InstanceHeader>) {
        if let Err(e) = self.build_classifier(header, &[]) {
            warn!(error = %e, "cannot build CIVD model for this schema");
        }
    }

    fn train_on_instance(&mut self, instance: &dyn Instance) -> Result<(), ClassifierError> {
        self.update_classifier(instance)
    }

    fn calc_memory_size(&self) -> usize {
        MemoryMeter::measure_root(self)
    }

    fn measurements(&self) -> Vec<Measurement> {
        self.enumerate_measures()
            .into_iter()
            .filter_map(|name| {
                let value = self.get_measure(&name).ok()?;
                Some(Measurement::new(name, value))
            })
            .collect()
    }

    fn summary(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl fmt::Display for Civd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(model) = self.model.as_ref() else {
            return write!(f, "CIVD: No model built yet.");
        };
        if model.window.is_empty() {
            return write!(f, "Warning: no training instances - ZeroR model used.");
        }

        let limit = match model.window.limit() {
            0 => "unbounded".to_string(),
            n => n.to_string(),
        };
        write!(
            f,
            "CIVD classifier: {} training instances (window {limit}), {} classes, {} attributes, {}",
            model.window.size(),
            model.num_classes,
            model.num_attributes_used,
            self.nn_search.describe()
        )
    }
}

impl fmt::Debug for Civd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Civd")
            .field("window_size", &self.window_size)
            .field("nn_search", &self.nn_search.describe())
            .field("num_training", &self.num_training())
            .finish()
    }
}

impl MemorySized for Model {
    fn inline_size(&self) -> usize {
        size_of::<Self>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        let mut total = 0;
        total += self.window.extra_heap_size(meter);
        total += self.default_model.extra_heap_size(meter);
        total
    }
}

impl MemorySized for Civd {
    fn inline_size(&self) -> usize {
        size_of::<Self>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        let mut total = 0;
        total += meter.measure_field(&self.nn_search);
        total += meter.measure_field(&self.model);
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
    use crate::testing::{RecordingNeighbourSearch, ScriptedNeighbourSearch};

    fn header() -> Arc<InstanceHeader> {
        Arc::new(InstanceHeader::new(
            "r".into(),
            vec![
                Arc::new(NumericAttribute::new("f".into())) as AttributeRef,
                Arc::new(NominalAttribute::from_labels("label", &["A", "B"])) as AttributeRef,
            ],
            1,
        ))
    }

    fn inst(h: &Arc<InstanceHeader>, f: f64, class: f64) -> Box<dyn Instance> {
        Box::new(DenseInstance::new(h.clone(), vec![f, class], 1.0))
    }

    fn query(h: &Arc<InstanceHeader>, f: f64) -> Box<dyn Instance> {
        inst(h, f, f64::NAN)
    }

    fn window_features(c: &Civd) -> Vec<f64> {
        c.model
            .as_ref()
            .map(|m| m.window.instances().map(|i| i.values()[0]).collect())
            .unwrap_or_default()
    }

    #[test]
    fn equidistant_neighbours_favour_first_label() {
        let h = header();
        let mut c = Civd::default();
        c.build_classifier(h.clone(), &[inst(&h, 1.0, 0.0), inst(&h, 2.0, 1.0)])
            .unwrap();
        let q = query(&h, 1.5);
        assert_eq!(c.distribution_for_instance(q.as_ref()).unwrap(), vec![1.0, 0.0]);
    }

    #[test]
    fn scripted_equal_distances_favour_first_label() {
        let h = header();
        let mut c = Civd::new(0, Box::new(ScriptedNeighbourSearch::new(vec![0.5, 0.5])));
        c.build_classifier(h.clone(), &[inst(&h, 1.0, 0.0), inst(&h, 2.0, 1.0)])
            .unwrap();
        let q = query(&h, 1.5);
        assert_eq!(c.distribution_for_instance(q.as_ref()).unwrap(), vec![1.0, 0.0]);
    }

    #[test]
    fn nearer_neighbour_wins() {
        let h = header();
        let mut c = Civd::default();
        c.build_classifier(
            h.clone(),
            &[inst(&h, 0.0, 0.0), inst(&h, 10.0, 1.0), inst(&h, 9.0, 1.0)],
        )
        .unwrap();
        let q = query(&h, 8.0);
        assert_eq!(c.distribution_for_instance(q.as_ref()).unwrap(), vec![0.0, 1.0]);
    }

    #[test]
    fn window_of_one_holds_latest_update() {
        let h = header();
        let mut c = Civd::new(1, Box::new(LinearNNSearch::default()));
        c.build_classifier(h.clone(), &[inst(&h, 1.0, 0.0)]).unwrap();
        c.update_classifier(inst(&h, 2.0, 1.0).as_ref()).unwrap();
        c.update_classifier(inst(&h, 3.0, 0.0).as_ref()).unwrap();

        assert_eq!(c.num_training(), 1);
        assert_eq!(window_features(&c), vec![3.0]);
        assert_eq!(c.nearest_neighbour_search().num_instances(), 1);
    }

    #[test]
    fn build_keeps_last_window_size_instances() {
        let h = header();
        let mut c = Civd::new(2, Box::new(LinearNNSearch::default()));
        let data: Vec<_> = (0..5).map(|i| inst(&h, i as f64, (i % 2) as f64)).collect();
        c.build_classifier(h.clone(), &data).unwrap();
        assert_eq!(window_features(&c), vec![3.0, 4.0]);
    }

    #[test]
    fn updates_keep_most_recent_labelled_in_order() {
        let h = header();
        let mut c = Civd::new(3, Box::new(LinearNNSearch::default()));
        c.build_classifier(h.clone(), &[]).unwrap();
        for i in 0..7 {
            let class = if i == 5 { f64::NAN } else { (i % 2) as f64 };
            c.update_classifier(inst(&h, i as f64, class).as_ref()).unwrap();
            assert!(c.num_training() <= 3);
        }
        assert_eq!(window_features(&c), vec![3.0, 4.0, 6.0]);
    }

    #[test]
    fn eviction_reindexes_and_plain_append_inserts() {
        let h = header();
        let (search, calls) = RecordingNeighbourSearch::new();
        let mut c = Civd::new(2, Box::new(search));
        c.build_classifier(h.clone(), &[inst(&h, 0.0, 0.0)]).unwrap();
        assert_eq!(calls.set_instances(), 1);

        c.update_classifier(inst(&h, 1.0, 1.0).as_ref()).unwrap();
        assert_eq!(calls.updates(), 1);
        assert_eq!(calls.set_instances(), 1);

        c.update_classifier(inst(&h, 2.0, 0.0).as_ref()).unwrap();
        assert_eq!(calls.updates(), 1);
        assert_eq!(calls.set_instances(), 2);
        assert_eq!(c.nearest_neighbour_search().num_instances(), 2);
    }

    #[test]
    fn empty_training_set_uses_fallback_verbatim() {
        let h = header();
        let (search, calls) = RecordingNeighbourSearch::new();
        let mut c = Civd::new(0, Box::new(search));
        c.build_classifier(h.clone(), &[inst(&h, 1.0, f64::NAN)]).unwrap();

        let mut fallback = ZeroR::new();
        fallback.fit(h.clone(), &[inst(&h, 1.0, f64::NAN)]);

        let q = query(&h, 0.0);
        assert_eq!(
            c.distribution_for_instance(q.as_ref()).unwrap(),
            fallback.predict_distribution()
        );
        assert_eq!(calls.prepares(), 0);
        assert_eq!(calls.queries(), 0);
        assert_eq!(
            c.to_string(),
            "Warning: no training instances - ZeroR model used."
        );
    }

    #[test]
    fn fallback_sees_unfiltered_data() {
        let h = header();
        let mut c = Civd::default();
        // every instance is unlabelled: the window stays empty
        c.build_classifier(h.clone(), &[query(&h, 1.0), query(&h, 2.0)])
            .unwrap();
        assert_eq!(c.num_training(), 0);
        let q = query(&h, 1.0);
        assert_eq!(c.distribution_for_instance(q.as_ref()).unwrap(), vec![0.5, 0.5]);
    }

    #[test]
    fn unlabelled_update_is_a_no_op() {
        let h = header();
        let (search, calls) = RecordingNeighbourSearch::new();
        let mut c = Civd::new(0, Box::new(search));
        c.build_classifier(h.clone(), &[inst(&h, 1.0, 0.0)]).unwrap();
        c.update_classifier(query(&h, 5.0).as_ref()).unwrap();
        assert_eq!(c.num_training(), 1);
        assert_eq!(calls.updates(), 0);
    }

    #[test]
    fn schema_mismatch_changes_nothing() {
        let h = header();
        let other = Arc::new(InstanceHeader::new(
            "r".into(),
            vec![
                Arc::new(NumericAttribute::new("g".into())) as AttributeRef,
                Arc::new(NominalAttribute::from_labels("label", &["A", "B"])) as AttributeRef,
            ],
            1,
        ));
        let mut c = Civd::default();
        c.build_classifier(h.clone(), &[inst(&h, 1.0, 0.0)]).unwrap();

        let err = c.update_classifier(inst(&other, 2.0, 1.0).as_ref()).unwrap_err();
        assert!(matches!(err, ClassifierError::SchemaMismatch(_)));
        assert_eq!(c.num_training(), 1);
        assert_eq!(c.nearest_neighbour_search().num_instances(), 1);

        let err = c
            .distribution_for_instance(query(&other, 2.0).as_ref())
            .unwrap_err();
        assert!(matches!(err, ClassifierError::SchemaMismatch(_)));
    }

    #[test]
    fn update_with_extra_label_leaves_search_alone() {
        let h = header();
        let wider = Arc::new(InstanceHeader::new(
            "r".into(),
            vec![
                Arc::new(NumericAttribute::new("f".into())) as AttributeRef,
                Arc::new(NominalAttribute::from_labels("label", &["A", "B", "C"])) as AttributeRef,
            ],
            1,
        ));
        let (search, calls) = RecordingNeighbourSearch::new();
        let mut c = Civd::new(2, Box::new(search));
        c.build_classifier(h.clone(), &[inst(&h, 1.0, 0.0), inst(&h, 2.0, 1.0)])
            .unwrap();

        let err = c.update_classifier(inst(&wider, 3.0, 2.0).as_ref()).unwrap_err();
        assert!(matches!(err, ClassifierError::SchemaMismatch(_)));
        assert_eq!(window_features(&c), vec![1.0, 2.0]);
        assert_eq!(c.nearest_neighbour_search().num_instances(), 2);
        assert_eq!(calls.updates(), 0);
        assert_eq!(calls.set_instances(), 1);
    }

    #[test]
    fn sliding_window_keeps_search_and_counters_in_step() {
        let h = header();
        let mut c = Civd::new(3, Box::new(LinearNNSearch::new(
            crate::neighbour_search::EuclideanDistance::new(true),
            true,
        )));
        c.build_classifier(h.clone(), &[]).unwrap();

        for i in 0..10 {
            c.update_classifier(inst(&h, i as f64, (i % 2) as f64).as_ref())
                .unwrap();
            c.distribution_for_instance(query(&h, i as f64 + 0.5).as_ref())
                .unwrap();

            let stored = c.num_training();
            assert_eq!(stored, (i + 1).min(3));
            assert_eq!(c.nearest_neighbour_search().num_instances(), stored);
            assert_eq!(c.get_measure("measureNumInstances").unwrap(), stored as f64);
            assert_eq!(c.get_measure("measureQueries").unwrap(), (i + 1) as f64);
        }
        assert_eq!(window_features(&c), vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn shrinking_window_trims_model_and_search() {
        let h = header();
        let (search, calls) = RecordingNeighbourSearch::new();
        let mut c = Civd::new(0, Box::new(search));
        let data: Vec<_> = (0..5).map(|i| inst(&h, i as f64, (i % 2) as f64)).collect();
        c.build_classifier(h.clone(), &data).unwrap();

        c.set_window_size(2);
        assert_eq!(c.num_training(), 2);
        assert_eq!(window_features(&c), vec![3.0, 4.0]);
        assert_eq!(c.nearest_neighbour_search().num_instances(), 2);
        assert_eq!(calls.set_instances(), 2);

        // growing never needs a re-index
        c.set_window_size(10);
        assert_eq!(calls.set_instances(), 2);
        assert_eq!(c.window_size(), 10);
    }

    #[test]
    fn rebuild_on_new_schema_switches_over() {
        let h = header();
        let three = Arc::new(InstanceHeader::new(
            "s".into(),
            vec![
                Arc::new(NumericAttribute::new("g".into())) as AttributeRef,
                Arc::new(NominalAttribute::from_labels("label", &["X", "Y", "Z"])) as AttributeRef,
            ],
            1,
        ));
        let mut c = Civd::default();
        c.build_classifier(h.clone(), &[inst(&h, 1.0, 0.0)]).unwrap();
        c.build_classifier(three.clone(), &[inst(&three, 1.0, 2.0)])
            .unwrap();

        let err = c.update_classifier(inst(&h, 2.0, 1.0).as_ref()).unwrap_err();
        assert!(matches!(err, ClassifierError::SchemaMismatch(_)));
        assert_eq!(c.num_training(), 1);

        let votes = c.distribution_for_instance(query(&three, 1.5).as_ref()).unwrap();
        assert_eq!(votes, vec![0.0, 0.0, 1.0]);
        assert_eq!(c.nearest_neighbour_search().num_instances(), 1);
    }

    #[test]
    fn prediction_is_repeatable() {
        let h = header();
        let mut c = Civd::default();
        let data: Vec<_> = (0..6).map(|i| inst(&h, i as f64, (i / 3) as f64)).collect();
        c.build_classifier(h.clone(), &data).unwrap();
        let q = query(&h, 2.4);
        let first = c.distribution_for_instance(q.as_ref()).unwrap();
        let second = c.distribution_for_instance(q.as_ref()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.iter().filter(|&&v| v == 1.0).count(), 1);
    }

    #[test]
    fn unbuilt_classifier_refuses_work() {
        let h = header();
        let mut c = Civd::default();
        assert_eq!(
            c.update_classifier(inst(&h, 1.0, 0.0).as_ref()),
            Err(ClassifierError::NotBuilt)
        );
        assert_eq!(
            c.distribution_for_instance(query(&h, 1.0).as_ref()),
            Err(ClassifierError::NotBuilt)
        );
        assert_eq!(c.to_string(), "CIVD: No model built yet.");
    }

    #[test]
    fn failed_build_keeps_previous_model() {
        let h = header();
        let numeric_class = Arc::new(InstanceHeader::new(
            "r".into(),
            vec![
                Arc::new(NumericAttribute::new("f".into())) as AttributeRef,
                Arc::new(NumericAttribute::new("y".into())) as AttributeRef,
            ],
            1,
        ));
        let mut c = Civd::default();
        c.build_classifier(h.clone(), &[inst(&h, 1.0, 0.0), inst(&h, 2.0, 1.0)])
            .unwrap();

        let bad: Vec<Box<dyn Instance>> = vec![Box::new(DenseInstance::new(
            numeric_class.clone(),
            vec![1.0, 3.5],
            1.0,
        ))];
        let err = c.build_classifier(numeric_class, &bad).unwrap_err();
        assert!(matches!(err, ClassifierError::Configuration(_)));
        assert_eq!(c.num_training(), 2);
        assert_eq!(c.nearest_neighbour_search().num_instances(), 2);
    }

    #[test]
    fn rebuild_discards_previous_training_data() {
        let h = header();
        let mut c = Civd::default();
        c.build_classifier(h.clone(), &[inst(&h, 1.0, 0.0), inst(&h, 2.0, 1.0)])
            .unwrap();
        c.build_classifier(h.clone(), &[inst(&h, 7.0, 1.0)]).unwrap();
        assert_eq!(window_features(&c), vec![7.0]);
    }

    #[test]
    fn model_context_starts_empty_and_learns() {
        let h = header();
        let mut c = Civd::default();
        c.set_model_context(h.clone());
        assert!(c.is_built());
        assert_eq!(c.num_training(), 0);

        c.train_on_instance(inst(&h, 0.0, 1.0).as_ref()).unwrap();
        let votes = c.get_votes_for_instance(query(&h, 0.2).as_ref()).unwrap();
        assert_eq!(votes, vec![0.0, 1.0]);
    }

    #[test]
    fn counts_attributes_used() {
        let h = header();
        let mut c = Civd::default();
        c.build_classifier(h, &[]).unwrap();
        assert_eq!(c.num_attributes_used(), 1);
    }

    #[test]
    fn measures_come_from_the_search() {
        let h = header();
        let mut c = Civd::new(0, Box::new(LinearNNSearch::new(
            crate::neighbour_search::EuclideanDistance::new(true),
            true,
        )));
        c.build_classifier(h.clone(), &[inst(&h, 1.0, 0.0), inst(&h, 2.0, 1.0)])
            .unwrap();
        c.distribution_for_instance(query(&h, 1.2).as_ref()).unwrap();

        assert_eq!(c.get_measure("measureNumInstances").unwrap(), 2.0);
        assert_eq!(c.get_measure("measureQueries").unwrap(), 1.0);
        assert!(matches!(
            c.get_measure("measureNothing"),
            Err(ClassifierError::UnknownMeasure(_))
        ));
        let names: Vec<String> = c.measurements().into_iter().map(|m| m.name).collect();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn swapping_search_reindexes_window() {
        let h = header();
        let mut c = Civd::default();
        c.build_classifier(h.clone(), &[inst(&h, 1.0, 0.0), inst(&h, 2.0, 1.0)])
            .unwrap();
        c.set_nearest_neighbour_search(Box::new(LinearNNSearch::default()));
        assert_eq!(c.nearest_neighbour_search().num_instances(), 2);
    }

    #[test]
    fn summary_mentions_window_and_classes() {
        let h = header();
        let mut c = Civd::new(5, Box::new(LinearNNSearch::default()));
        c.build_classifier(h.clone(), &[inst(&h, 1.0, 0.0)]).unwrap();
        let s = c.to_string();
        assert_eq!(c.summary().as_deref(), Some(s.as_str()));
        assert!(s.starts_with("CIVD classifier"), "{s}");
        assert!(s.contains("window 5"), "{s}");
        assert!(s.contains("2 classes"), "{s}");
    }

    #[test]
    fn memory_size_counts_shared_instances_once() {
        let h = header();
        let mut c = Civd::default();
        c.build_classifier(h.clone(), &[]).unwrap();
        let empty = c.calc_memory_size();
        let data: Vec<_> = (0..50).map(|i| inst(&h, i as f64, (i % 2) as f64)).collect();
        c.build_classifier(h, &data).unwrap();
        assert!(c.calc_memory_size() > empty);
    }
}
