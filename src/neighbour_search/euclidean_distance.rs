use crate::core::attributes::Attribute;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::utils::memory::{MemoryMeter, MemorySized};

#[derive(Clone, Copy, Debug)]
struct Range {
    min: f64,
    max: f64,
}

impl Range {
    const UNKNOWN: Range = Range {
        min: f64::NAN,
        max: f64::NAN,
    };

    #[inline]
    fn widen(&mut self, v: f64) {
        if v.is_nan() {
            return;
        }
        if self.min.is_nan() {
            self.min = v;
            self.max = v;
        } else {
            self.min = self.min.min(v);
            self.max = self.max.max(v);
        }
    }

    #[inline]
    fn width(&self) -> f64 {
        if self.min.is_nan() {
            0.0
        } else {
            self.max - self.min
        }
    }
}

/// Euclidean distance over mixed attributes, skipping the class.
///
/// Nominal attributes contribute 0 when equal and 1 otherwise. Numeric and
/// date attributes are scaled into `[0, 1]` using the running min/max of
/// every instance seen so far (training data and prepared queries). A
/// missing numeric value is taken to be as far as possible from the present
/// one.
#[derive(Clone, Debug)]
pub struct EuclideanDistance {
    normalize: bool,
    ranges: Vec<Range>,
}

impl EuclideanDistance {
    pub fn new(normalize: bool) -> Self {
        Self {
            normalize,
            ranges: Vec::new(),
        }
    }

    pub fn normalize(&self) -> bool {
        self.normalize
    }

    fn reset_ranges(&mut self, header: &InstanceHeader) {
        self.ranges = vec![Range::UNKNOWN; header.number_of_attributes()];
    }

    /// Forgets every range; the next instance seen sizes them again.
    pub fn clear_ranges(&mut self) {
        self.ranges.clear();
    }

    /// Widens the ranges to cover `instance`.
    pub fn update_ranges(&mut self, instance: &dyn Instance) {
        let header = instance.header();
        if self.ranges.len() != header.number_of_attributes() {
            self.reset_ranges(header);
        }
        for (i, attr) in header.attributes.iter().enumerate() {
            if i == header.class_index() || !attr.is_numeric() {
                continue;
            }
            if let Some(v) = instance.value_at_index(i) {
                self.ranges[i].widen(v);
            }
        }
    }

    /// `(min, max)` of attribute `index`, or `None` when nothing was seen.
    pub fn range(&self, index: usize) -> Option<(f64, f64)> {
        self.ranges
            .get(index)
            .filter(|r| !r.min.is_nan())
            .map(|r| (r.min, r.max))
    }

    pub fn distance(&self, first: &dyn Instance, second: &dyn Instance) -> f64 {
        let header = first.header();
        let class_index = header.class_index();
        let n = first.number_of_attributes().min(second.number_of_attributes());

        let mut sum = 0.0;
        for i in 0..n {
            if i == class_index {
                continue;
            }
            let Some(attr) = header.attribute_at_index(i) else {
                continue;
            };
            let v1 = first.value_at_index(i).unwrap_or(f64::NAN);
            let v2 = second.value_at_index(i).unwrap_or(f64::NAN);
            let diff = self.difference(attr, i, v1, v2);
            sum += diff * diff;
        }
        sum.sqrt()
    }

    fn difference(&self, attr: &dyn Attribute, index: usize, v1: f64, v2: f64) -> f64 {
        if attr.is_nominal() {
            return if v1.is_nan() || v2.is_nan() || v1 as usize != v2 as usize {
                1.0
            } else {
                0.0
            };
        }

        let range = self.ranges.get(index).copied().unwrap_or(Range::UNKNOWN);

        match (v1.is_nan(), v2.is_nan()) {
            (true, true) => {
                if self.normalize {
                    1.0
                } else {
                    range.width()
                }
            }
            (false, false) => {
                if self.normalize {
                    self.norm(v1, range) - self.norm(v2, range)
                } else {
                    v1 - v2
                }
            }
            (v1_missing, _) => {
                let present = if v1_missing { v2 } else { v1 };
                if self.normalize {
                    let diff = self.norm(present, range);
                    if diff < 0.5 { 1.0 - diff } else { diff }
                } else if range.min.is_nan() {
                    0.0
                } else {
                    (range.max - present).max(present - range.min)
                }
            }
        }
    }

    #[inline]
    fn norm(&self, x: f64, range: Range) -> f64 {
        let width = range.width();
        if range.min.is_nan() || width == 0.0 {
            0.0
        } else {
            (x - range.min) / width
        }
    }
}

impl MemorySized for EuclideanDistance {
    fn inline_size(&self) -> usize {
        size_of::<Self>()
    }

    fn extra_heap_size(&self, _meter: &mut MemoryMeter) -> usize {
        self.ranges.capacity() * size_of::<Range>()
    }
}
