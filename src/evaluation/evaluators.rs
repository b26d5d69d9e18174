use crate::core::instances::Instance;
use crate::evaluation::{Estimator, Measurement};

/// Accumulates prediction outcomes and reports measures over them.
pub trait PerformanceEvaluator {
    fn reset(&mut self);
    /// Records the learner's `votes` for `instance`, whose class label is the
    /// truth. Empty votes count as no prediction.
    fn add_result(&mut self, instance: &dyn Instance, votes: Vec<f64>);
    fn performance(&self) -> Vec<Measurement>;
}

pub trait PerformanceEvaluatorExt {
    /// Looks one measure up by name.
    fn measurement(&self, name: &str) -> Option<f64>;
}

impl<T: PerformanceEvaluator + ?Sized> PerformanceEvaluatorExt for T {
    fn measurement(&self, name: &str) -> Option<f64> {
        self.performance()
            .into_iter()
            .find(|m| m.name == name)
            .map(|m| m.value)
    }
}

/// Accuracy and Cohen's kappa over every prediction so far, optionally with
/// macro-averaged precision, recall and F1.
#[derive(Debug, Clone)]
pub struct BasicClassificationEvaluator<E: Estimator> {
    num_classes: usize,
    precision_recall: bool,
    weight_correct: E,
    row_kappa: Vec<E>,
    column_kappa: Vec<E>,
    precision: Vec<E>,
    recall: Vec<E>,
}

impl<E: Estimator> BasicClassificationEvaluator<E> {
    pub fn new(num_classes: usize, precision_recall: bool) -> Self {
        Self {
            num_classes,
            precision_recall,
            weight_correct: E::default(),
            row_kappa: (0..num_classes).map(|_| E::default()).collect(),
            column_kappa: (0..num_classes).map(|_| E::default()).collect(),
            precision: (0..num_classes).map(|_| E::default()).collect(),
            recall: (0..num_classes).map(|_| E::default()).collect(),
        }
    }

    /// Accuracy and kappa only.
    pub fn new_with_default_flags(num_classes: usize) -> Self {
        Self::new(num_classes, false)
    }

    pub fn accuracy(&self) -> f64 {
        self.weight_correct.estimation()
    }

    pub fn kappa(&self) -> f64 {
        if self.weight_correct.total_weight() <= 0.0 {
            return 0.0;
        }
        let p0 = self.accuracy();
        let pc: f64 = self
            .row_kappa
            .iter()
            .zip(&self.column_kappa)
            .map(|(r, c)| r.estimation() * c.estimation())
            .sum();
        if (1.0 - pc).abs() < f64::EPSILON {
            return 0.0;
        }
        (p0 - pc) / (1.0 - pc)
    }

    fn macro_average(estimators: &[E]) -> f64 {
        let seen: Vec<f64> = estimators
            .iter()
            .map(E::estimation)
            .filter(|v| !v.is_nan())
            .collect();
        if seen.is_empty() {
            f64::NAN
        } else {
            seen.iter().sum::<f64>() / seen.len() as f64
        }
    }

    fn ensure_classes(&mut self, n: usize) {
        if n > self.num_classes {
            self.num_classes = n;
            for v in [
                &mut self.row_kappa,
                &mut self.column_kappa,
                &mut self.precision,
                &mut self.recall,
            ] {
                v.resize_with(n, E::default);
            }
        }
    }
}

impl<E: Estimator> PerformanceEvaluator for BasicClassificationEvaluator<E> {
    fn reset(&mut self) {
        *self = Self::new(self.num_classes, self.precision_recall);
    }

    fn add_result(&mut self, instance: &dyn Instance, votes: Vec<f64>) {
        let weight = instance.weight();
        if weight <= 0.0 || votes.is_empty() {
            return;
        }
        let Some(truth) = instance.class_value() else {
            return;
        };
        let truth = truth as usize;

        let mut predicted = 0;
        for (i, &v) in votes.iter().enumerate() {
            if v > votes[predicted] {
                predicted = i;
            }
        }

        self.ensure_classes(votes.len().max(truth + 1));

        let correct = predicted == truth;
        self.weight_correct.add(if correct { 1.0 } else { 0.0 }, weight);
        for c in 0..self.num_classes {
            self.row_kappa[c].add(if c == predicted { 1.0 } else { 0.0 }, weight);
            self.column_kappa[c].add(if c == truth { 1.0 } else { 0.0 }, weight);
        }
        if self.precision_recall {
            self.precision[predicted].add(if correct { 1.0 } else { 0.0 }, weight);
            self.recall[truth].add(if correct { 1.0 } else { 0.0 }, weight);
        }
    }

    fn performance(&self) -> Vec<Measurement> {
        let mut out = vec![
            Measurement::new("accuracy", self.accuracy()),
            Measurement::new("kappa", self.kappa()),
        ];
        if self.precision_recall {
            let p = Self::macro_average(&self.precision);
            let r = Self::macro_average(&self.recall);
            let f1 = if p + r > 0.0 { 2.0 * p * r / (p + r) } else { f64::NAN };
            out.push(Measurement::new("precision", p));
            out.push(Measurement::new("recall", r));
            out.push(Measurement::new("f1", f1));
        }
        out
    }
}
