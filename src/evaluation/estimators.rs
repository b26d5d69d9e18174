/// Running estimate of a weighted mean.
pub trait Estimator: Default {
    fn add(&mut self, value: f64, weight: f64);
    /// Current estimate; `NaN` until something was added.
    fn estimation(&self) -> f64;
    fn total_weight(&self) -> f64;
}

/// Plain weighted mean over everything seen.
#[derive(Debug, Clone, Default)]
pub struct BasicEstimator {
    sum: f64,
    weight: f64,
}

impl Estimator for BasicEstimator {
    #[inline]
    fn add(&mut self, value: f64, weight: f64) {
        self.sum += value * weight;
        self.weight += weight;
    }

    #[inline]
    fn estimation(&self) -> f64 {
        if self.weight > 0.0 {
            self.sum / self.weight
        } else {
            f64::NAN
        }
    }

    #[inline]
    fn total_weight(&self) -> f64 {
        self.weight
    }
}
