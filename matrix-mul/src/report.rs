//! Timing comparison of the serial, local-parallel and distributed runs.

use std::fmt;
use std::time::Duration;

/// How one method's run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Completed {
        elapsed: Duration,
        matches_serial: bool,
    },
    Failed(String),
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub method: String,
    pub outcome: Outcome,
}

/// Collected timings, relative to the serial baseline.
///
/// Speedup is `serial / elapsed`; efficiency is speedup divided by the number
/// of parallel units (threads or workers).
#[derive(Debug, Clone)]
pub struct Report {
    serial: Duration,
    units: usize,
    entries: Vec<Entry>,
}

impl Report {
    pub fn new(serial: Duration, units: usize) -> Self {
        Self {
            serial,
            units: units.max(1),
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, method: impl Into<String>, outcome: Outcome) {
        self.entries.push(Entry {
            method: method.into(),
            outcome,
        });
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn speedup(&self, elapsed: Duration) -> Option<f64> {
        let secs = elapsed.as_secs_f64();
        (secs > 0.0).then(|| self.serial.as_secs_f64() / secs)
    }

    pub fn efficiency(&self, elapsed: Duration) -> Option<f64> {
        self.speedup(elapsed).map(|s| s / self.units as f64)
    }

    /// Every completed run agreed with the serial result.
    pub fn all_match(&self) -> bool {
        self.entries.iter().all(|e| match e.outcome {
            Outcome::Completed { matches_serial, .. } => matches_serial,
            _ => true,
        })
    }

    /// Methods whose result differs from the serial result.
    pub fn mismatches(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| {
                matches!(
                    e.outcome,
                    Outcome::Completed {
                        matches_serial: false,
                        ..
                    }
                )
            })
            .map(|e| e.method.as_str())
            .collect()
    }

    /// The quickest method, serial included.
    pub fn fastest(&self) -> (&str, Duration) {
        self.entries
            .iter()
            .filter_map(|e| match e.outcome {
                Outcome::Completed { elapsed, .. } => Some((e.method.as_str(), elapsed)),
                _ => None,
            })
            .fold(("Serial", self.serial), |best, candidate| {
                if candidate.1 < best.1 { candidate } else { best }
            })
    }
}

fn ratio(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.*}", precision, v))
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "================ VALIDATION ================")?;
        for entry in &self.entries {
            let status = match &entry.outcome {
                Outcome::Completed { matches_serial, .. } => matches_serial.to_string(),
                Outcome::Failed(reason) => format!("failed ({})", reason),
                Outcome::Skipped => "skipped".to_string(),
            };
            writeln!(f, "Serial == {:<22}: {}", entry.method, status)?;
        }

        writeln!(f)?;
        writeln!(f, "================ RESULTS ================")?;
        writeln!(
            f,
            "{:<25} {:<12} {:<12} {:<12}",
            "Method", "Time (s)", "Speedup", "Efficiency"
        )?;
        writeln!(f, "{}", "-".repeat(65))?;
        writeln!(
            f,
            "{:<25} {:<12.6} {:<12} {:<12}",
            "Serial",
            self.serial.as_secs_f64(),
            "-",
            "-"
        )?;
        for entry in &self.entries {
            match entry.outcome {
                Outcome::Completed { elapsed, .. } => writeln!(
                    f,
                    "{:<25} {:<12.6} {:<12} {:<12}",
                    entry.method,
                    elapsed.as_secs_f64(),
                    ratio(self.speedup(elapsed), 3),
                    ratio(self.efficiency(elapsed), 3),
                )?,
                _ => writeln!(f, "{:<25} {:<12} {:<12} {:<12}", entry.method, "-", "-", "-")?,
            }
        }

        writeln!(f)?;
        writeln!(f, "================ ANALYSIS ================")?;
        let (method, elapsed) = self.fastest();
        writeln!(f, "- Fastest method: {} ({:.6}s)", method, elapsed.as_secs_f64())?;
        writeln!(f)?;
        for entry in &self.entries {
            if let Outcome::Completed { elapsed, .. } = entry.outcome {
                writeln!(
                    f,
                    "- {:<22} speedup {}x, efficiency {}%",
                    entry.method,
                    ratio(self.speedup(elapsed), 2),
                    ratio(self.efficiency(elapsed).map(|e| e * 100.0), 1),
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> Report {
        let mut report = Report::new(Duration::from_secs(4), 2);
        report.record(
            "Parallel (local)",
            Outcome::Completed {
                elapsed: Duration::from_secs(2),
                matches_serial: true,
            },
        );
        report.record(
            "Distributed",
            Outcome::Completed {
                elapsed: Duration::from_secs(8),
                matches_serial: true,
            },
        );
        report
    }

    #[test]
    fn test_speedup_and_efficiency() {
        let report = report();
        assert_eq!(report.speedup(Duration::from_secs(2)), Some(2.0));
        assert_eq!(report.efficiency(Duration::from_secs(2)), Some(1.0));
        assert_eq!(report.speedup(Duration::from_secs(8)), Some(0.5));
        assert_eq!(report.speedup(Duration::ZERO), None);
    }

    #[test]
    fn test_fastest_includes_serial() {
        assert_eq!(report().fastest(), ("Parallel (local)", Duration::from_secs(2)));

        let mut slow = Report::new(Duration::from_millis(1), 2);
        slow.record("Distributed", Outcome::Failed("refused".to_string()));
        assert_eq!(slow.fastest(), ("Serial", Duration::from_millis(1)));
    }

    #[test]
    fn test_mismatch_detection() {
        let mut report = report();
        assert!(report.all_match());

        report.record(
            "Broken",
            Outcome::Completed {
                elapsed: Duration::from_secs(1),
                matches_serial: false,
            },
        );
        report.record("Distributed (down)", Outcome::Skipped);
        assert!(!report.all_match());
        assert_eq!(report.mismatches(), vec!["Broken"]);
    }

    #[test]
    fn test_display_lists_every_method() {
        let text = report().to_string();
        assert!(text.contains("Serial"));
        assert!(text.contains("Parallel (local)"));
        assert!(text.contains("Distributed"));
        assert!(text.contains("Fastest method: Parallel (local)"));
        assert!(text.contains("efficiency 100.0%"));
    }
}
