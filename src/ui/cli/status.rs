//! One-line live view of a running evaluation.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use chrono::{Local, SecondsFormat};

use crate::evaluation::Snapshot;

const BAR_WIDTH: usize = 15;
const CLEAR_TO_EOL: &str = "\x1b[K";

/// Extras shown after kappa, with their short labels.
const EXTRA_COLUMNS: [(&str, &str); 3] = [("precision", "P"), ("recall", "R"), ("f1", "F1")];

#[derive(Debug, Clone, Copy)]
struct Ansi(bool);

impl Ansi {
    fn paint(self, sgr: &str, text: impl Display) -> String {
        if self.0 {
            format!("\x1b[{sgr}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn label(self, text: &str) -> String {
        self.paint("2", text)
    }
}

/// Formats snapshots against the run's instance and time limits.
#[derive(Debug, Clone)]
pub struct StatusLine {
    max_instances: Option<u64>,
    max_seconds: Option<u64>,
    ansi: Ansi,
}

impl StatusLine {
    /// Colours are used only when stdout is a terminal.
    pub fn new(max_instances: Option<u64>, max_seconds: Option<u64>) -> Self {
        Self {
            max_instances,
            max_seconds,
            ansi: Ansi(io::stdout().is_terminal()),
        }
    }

    pub fn plain(mut self) -> Self {
        self.ansi = Ansi(false);
        self
    }

    pub fn banner(&self, title: &str, sample_frequency: u64, mem_check_frequency: u64) -> Vec<String> {
        let started = Local::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        vec![
            self.ansi.paint("1;36", format!("▶ {title}")),
            self.ansi.label(&format!(
                "snapshot every {sample_frequency}, model size every {mem_check_frequency}, started {started}"
            )),
            self.ansi.paint("90", "─".repeat(72)),
        ]
    }

    /// `prev` is the snapshot before `s`; with it the line gains a rate.
    pub fn format(&self, s: &Snapshot, prev: Option<&Snapshot>) -> String {
        let a = self.ansi;
        let mut fields = vec![
            format!("{} {:>9}", a.paint("1;32", "seen"), s.instances_seen),
            format!("{} {}%", a.paint("1;36", "acc"), self.number(s.accuracy * 100.0, 2)),
            format!("{} {}%", a.paint("1;35", "κ"), self.number(s.kappa * 100.0, 2)),
        ];

        for (key, label) in EXTRA_COLUMNS {
            if let Some(v) = s.extras.get(key) {
                fields.push(format!("{} {}", a.label(label), self.number(*v, 4)));
            }
        }
        if let Some(v) = s.extras.get("measureNumInstances") {
            fields.push(format!("{} {:>7}", a.label("win"), *v as u64));
        }

        fields.push(format!("{} {:.3e}", a.label("ram_h"), s.ram_hours));
        fields.push(format!("{} {:.2}s", a.label("t"), s.seconds));

        if let Some(ips) = prev.and_then(|p| throughput(p, s)) {
            fields.push(format!("{} {:>9.0}", a.paint("34", "ips"), ips));
        }
        if let Some(limit) = self.max_instances {
            let bar = progress_bar(s.instances_seen as f64, limit as f64, BAR_WIDTH);
            fields.push(format!("{} {bar}", a.label("[inst]")));
        }
        if let Some(limit) = self.max_seconds {
            let bar = progress_bar(s.seconds, limit as f64, BAR_WIDTH);
            fields.push(format!("{} {bar}", a.label("[time]")));
        }

        fields.join("  ")
    }

    /// Prints `banner` once, then redraws the latest snapshot in place at
    /// most once per `every` until the sender hangs up.
    pub fn render(&self, rx: Receiver<Snapshot>, banner: &[String], every: Duration) {
        let mut out = io::stdout();
        for line in banner {
            let _ = writeln!(out, "{line}");
        }
        let _ = writeln!(out);

        let mut latest: Option<Snapshot> = None;
        let mut previous: Option<Snapshot> = None;
        let mut drawn_at = Instant::now();

        loop {
            match rx.recv_timeout(every) {
                Ok(s) => previous = latest.replace(s),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            if drawn_at.elapsed() >= every {
                if let Some(s) = &latest {
                    let _ = write!(out, "\r{}{CLEAR_TO_EOL}", self.format(s, previous.as_ref()));
                    let _ = out.flush();
                }
                drawn_at = Instant::now();
            }
        }

        if let Some(s) = &latest {
            let _ = writeln!(out, "\r{}{CLEAR_TO_EOL}", self.format(s, previous.as_ref()));
            let _ = out.flush();
        }
    }

    fn number(&self, x: f64, decimals: usize) -> String {
        if x.is_nan() {
            self.ansi.label("NaN")
        } else {
            format!("{x:>6.decimals$}")
        }
    }
}

/// Instances per second between two snapshots.
fn throughput(earlier: &Snapshot, later: &Snapshot) -> Option<f64> {
    let dt = later.seconds - earlier.seconds;
    (dt > 0.0).then(|| later.instances_seen.saturating_sub(earlier.instances_seen) as f64 / dt)
}

/// Filled bar with a percentage, or an empty string without a usable total.
pub fn progress_bar(current: f64, total: f64, width: usize) -> String {
    if !(total.is_finite() && total > 0.0) {
        return String::new();
    }
    let ratio = (current / total).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    format!(
        "[{}{}] {:>3.0}%",
        "█".repeat(filled),
        "░".repeat(width.saturating_sub(filled)),
        ratio * 100.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn snap(seen: u64, seconds: f64, extras: &[(&str, f64)]) -> Snapshot {
        Snapshot {
            instances_seen: seen,
            accuracy: 0.875,
            kappa: 0.5,
            ram_hours: 0.0,
            seconds,
            extras: extras
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn plain_line_lists_metrics_and_window() {
        let line = StatusLine::new(None, None)
            .plain()
            .format(&snap(40, 2.0, &[("measureNumInstances", 25.0), ("f1", 0.5)]), None);

        assert!(line.starts_with("seen        40  acc  87.50%  κ  50.00%"), "{line}");
        assert!(line.contains("F1 0.5000"), "{line}");
        assert!(line.contains("win      25"), "{line}");
        assert!(!line.contains("ips"), "{line}");
        assert!(!line.contains('\x1b'), "{line}");
    }

    #[test]
    fn rate_needs_time_to_pass() {
        let status = StatusLine::new(None, None).plain();
        let line = status.format(&snap(300, 3.0, &[]), Some(&snap(100, 1.0, &[])));
        assert!(line.contains("ips       100"), "{line}");

        let line = status.format(&snap(300, 1.0, &[]), Some(&snap(100, 1.0, &[])));
        assert!(!line.contains("ips"), "{line}");
    }

    #[test]
    fn limits_add_progress_bars() {
        let line = StatusLine::new(Some(80), Some(4))
            .plain()
            .format(&snap(40, 1.0, &[]), None);
        assert!(line.contains("[inst] [████████░░░░░░░]  50%"), "{line}");
        assert!(line.contains("[time] [████░░░░░░░░░░░]  25%"), "{line}");
    }

    #[test]
    fn nan_accuracy_is_spelled_out() {
        let mut s = snap(0, 0.0, &[]);
        s.accuracy = f64::NAN;
        let line = StatusLine::new(None, None).plain().format(&s, None);
        assert!(line.contains("acc NaN%"), "{line}");
    }

    #[test]
    fn progress_bar_clamps_and_skips_bad_totals() {
        assert_eq!(progress_bar(5.0, 0.0, 4), "");
        assert_eq!(progress_bar(5.0, f64::INFINITY, 4), "");
        assert_eq!(progress_bar(9.0, 3.0, 4), "[████] 100%");
        assert_eq!(progress_bar(0.0, 3.0, 4), "[░░░░]   0%");
    }

    #[test]
    fn banner_names_the_task() {
        let lines = StatusLine::new(None, None).plain().banner("Prequential", 10, 20);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "▶ Prequential");
        assert!(lines[1].starts_with("snapshot every 10, model size every 20, started "));
    }
}
