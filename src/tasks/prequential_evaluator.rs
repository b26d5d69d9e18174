use crate::classifiers::Classifier;
use crate::core::instance_header::InstanceHeader;
use crate::evaluation::{LearningCurve, PerformanceEvaluator, Snapshot};
use crate::streams::Stream;
use std::collections::BTreeMap;
use std::io::{Error, ErrorKind};
use std::sync::Arc;
use std::sync::mpsc::Sender;

use anyhow::Context;
use cpu_time::ThreadTime;
use tracing::{debug, info};

/// Test-then-train evaluation: every instance is first predicted, then used
/// for training. Snapshots are taken every `sample_frequency` instances and
/// once at the end.
pub struct PrequentialEvaluator {
    learner: Box<dyn Classifier>,
    stream: Box<dyn Stream>,
    evaluator: Box<dyn PerformanceEvaluator>,

    curve: LearningCurve,

    max_instances: Option<u64>,
    max_seconds: Option<u64>,
    sample_frequency: u64,
    mem_check_frequency: u64,

    processed: u64,

    start_cpu: ThreadTime,
    last_cpu_sample: ThreadTime,
    last_cpu_mem: ThreadTime,

    ram_hours: f64,
    progress_tx: Option<Sender<Snapshot>>,
}

impl PrequentialEvaluator {
    pub fn new(
        mut learner: Box<dyn Classifier>,
        stream: Box<dyn Stream>,
        evaluator: Box<dyn PerformanceEvaluator>,
        max_instances: Option<u64>,
        max_seconds: Option<u64>,
        sample_frequency: u64,
        mem_check_frequency: u64,
    ) -> Result<Self, Error> {
        if sample_frequency == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "sample_frequency must be > 0",
            ));
        }
        if mem_check_frequency == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "mem_check_frequency must be > 0",
            ));
        }

        let header = stream.header();
        let header_arc = Arc::new(InstanceHeader::new(
            header.relation_name().to_string(),
            header.attributes.clone(),
            header.class_index(),
        ));
        learner.set_model_context(Arc::clone(&header_arc));

        let now = ThreadTime::now();
        Ok(Self {
            learner,
            stream,
            evaluator,
            curve: LearningCurve::default(),
            max_instances,
            max_seconds,
            sample_frequency,
            mem_check_frequency,
            processed: 0,
            start_cpu: now,
            last_cpu_sample: now,
            last_cpu_mem: now,
            ram_hours: 0.0,
            progress_tx: None,
        })
    }

    pub fn with_progress(mut self, tx: Sender<Snapshot>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Consumes the stream until it ends or a limit is hit. A learner error
    /// aborts the run.
    pub fn run(&mut self) -> anyhow::Result<()> {
        self.start_cpu = ThreadTime::now();
        self.last_cpu_sample = self.start_cpu;
        self.last_cpu_mem = self.start_cpu;

        while self.stream.has_more_instances() {
            if let Some(n) = self.max_instances {
                if self.processed >= n {
                    break;
                }
            }
            if let Some(s) = self.max_seconds {
                if self.start_cpu.elapsed().as_secs() >= s {
                    break;
                }
            }

            let Some(instance) = self.stream.next_instance() else {
                break;
            };
            self.processed += 1;

            let votes = self
                .learner
                .get_votes_for_instance(instance.as_ref())
                .with_context(|| format!("prediction failed on instance {}", self.processed))?;
            self.evaluator.add_result(instance.as_ref(), votes);
            self.learner
                .train_on_instance(instance.as_ref())
                .with_context(|| format!("training failed on instance {}", self.processed))?;

            if self.processed % self.mem_check_frequency == 0 {
                self.bump_ram_hours_cpu();
            }
            if self.processed % self.sample_frequency == 0 {
                self.push_snapshot_cpu();
            }
        }

        self.bump_ram_hours_cpu();
        self.push_snapshot_cpu();
        info!(
            instances = self.processed,
            cpu_seconds = self.start_cpu.elapsed().as_secs_f64(),
            "prequential evaluation finished"
        );
        Ok(())
    }

    pub fn curve(&self) -> &LearningCurve {
        &self.curve
    }

    pub fn learner(&self) -> &dyn Classifier {
        self.learner.as_ref()
    }

    /// Drops the progress sender so a listener sees the channel close.
    pub fn detach_progress(&mut self) {
        self.progress_tx = None;
    }

    fn push_snapshot_cpu(&mut self) {
        let secs = self.start_cpu.elapsed().as_secs_f64(); // CPU seconds
        let perf = self.evaluator.performance();

        let mut acc = f64::NAN;
        let mut kap = f64::NAN;
        let mut extras = BTreeMap::new();

        for m in perf {
            match m.name.as_str() {
                "accuracy" => acc = m.value,
                "kappa" => kap = m.value,
                other => {
                    extras.insert(other.to_string(), m.value);
                }
            }
        }
        for m in self.learner.measurements() {
            extras.insert(m.name, m.value);
        }

        let snapshot = Snapshot {
            instances_seen: self.processed,
            accuracy: acc,
            kappa: kap,
            ram_hours: self.ram_hours,
            seconds: secs,
            extras,
        };

        debug!(%snapshot, "snapshot");
        if let Some(tx) = &self.progress_tx {
            let _ = tx.send(snapshot.clone());
        }

        self.curve.push(snapshot);
        self.last_cpu_sample = ThreadTime::now();
    }

    fn bump_ram_hours_cpu(&mut self) {
        let dt = self.last_cpu_mem.elapsed();
        self.last_cpu_mem = ThreadTime::now();

        let dt_h = dt.as_secs_f64() / 3600.0;

        let model_gb = (self.learner.calc_memory_size() as f64) / (1024.0 * 1024.0 * 1024.0);
        self.ram_hours += model_gb * dt_h;
    }
}
