//! Samplers — where utilization readings come from.
//!
//! The controller consumes one `Option<u8>` per tick and nothing else, so
//! the sampler seam is a single-method trait. A real host plugs its vendor
//! query in behind [`UsageSampler`]; the implementations here cover
//! replayed traces, fixed readings, and a synthetic load wave for demos.

use thiserror::Error;

/// Produces one utilization reading per tick. `None` means the backend
/// had nothing to report; the controller treats that tick as a no-op.
pub trait UsageSampler: Send {
    fn sample(&mut self) -> Option<u8>;
}

/// Trace input the parser cannot make sense of.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    #[error("line {line}: unreadable sample {value:?} (expected 0-255 or `-`)")]
    BadSample { line: usize, value: String },
}

/// Parse the plain-text trace format: one reading per line, `-` for an
/// unavailable sample, `#` starts a comment, blank lines are skipped.
///
/// Readings above 100 are kept as-is; the controller already treats them
/// as unavailable, and recorded traces from flaky sensors do contain them.
pub fn parse_trace(input: &str) -> Result<Vec<Option<u8>>, TraceError> {
    let mut samples = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        if line == "-" {
            samples.push(None);
            continue;
        }
        let value = line.parse::<u8>().map_err(|_| TraceError::BadSample {
            line: idx + 1,
            value: line.to_string(),
        })?;
        samples.push(Some(value));
    }
    Ok(samples)
}

/// Replays a recorded sequence of readings, one per tick, then reports
/// unavailable forever.
pub struct ReplaySampler {
    samples: Vec<Option<u8>>,
    cursor: usize,
}

impl ReplaySampler {
    pub fn new(samples: Vec<Option<u8>>) -> Self {
        Self { samples, cursor: 0 }
    }

    pub fn from_trace(input: &str) -> Result<Self, TraceError> {
        Ok(Self::new(parse_trace(input)?))
    }

    /// Readings left before the replay runs dry.
    pub fn remaining(&self) -> usize {
        self.samples.len().saturating_sub(self.cursor)
    }
}

impl UsageSampler for ReplaySampler {
    fn sample(&mut self) -> Option<u8> {
        let sample = self.samples.get(self.cursor).copied().flatten();
        if self.cursor < self.samples.len() {
            self.cursor += 1;
        }
        sample
    }
}

/// Reports the same reading every tick. Handy in tests and for pinning a
/// load level while tuning thresholds.
pub struct SteadySampler {
    usage: Option<u8>,
}

impl SteadySampler {
    pub fn new(usage: Option<u8>) -> Self {
        Self { usage }
    }
}

impl UsageSampler for SteadySampler {
    fn sample(&mut self) -> Option<u8> {
        self.usage
    }
}

/// Deterministic triangle wave between 60% and 100% utilization, crossing
/// both default bounds each period. Lets a demo exercise both controller
/// directions without real GPU load.
pub struct SyntheticSampler {
    tick: u64,
    period: u64,
}

impl SyntheticSampler {
    /// `period` is the full wave length in ticks; values below 2 are
    /// rounded up to 2.
    pub fn new(period: u64) -> Self {
        Self {
            tick: 0,
            period: period.max(2),
        }
    }
}

impl UsageSampler for SyntheticSampler {
    fn sample(&mut self) -> Option<u8> {
        let phase = self.tick % self.period;
        self.tick += 1;
        let half = self.period / 2;
        let value = if phase < half {
            60 + 40 * phase / half
        } else {
            100 - 40 * (phase - half) / (self.period - half)
        };
        Some(value as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_values_dashes_comments_and_blanks() {
        let trace = "\
# warmup
80
80

-          # sensor dropped out
95
100 # pegged
";
        assert_eq!(
            parse_trace(trace).unwrap(),
            vec![Some(80), Some(80), None, Some(95), Some(100)]
        );
    }

    #[test]
    fn reports_bad_line_with_its_number() {
        let err = parse_trace("80\nnot-a-number\n90").unwrap_err();
        assert_eq!(
            err,
            TraceError::BadSample {
                line: 2,
                value: "not-a-number".to_string(),
            }
        );
    }

    #[test]
    fn rejects_values_beyond_a_byte() {
        assert!(parse_trace("300").is_err());
        // 255 fits the on-disk format; the controller discards it later.
        assert_eq!(parse_trace("255").unwrap(), vec![Some(255)]);
    }

    #[test]
    fn replay_runs_dry_into_unavailable() {
        let mut sampler = ReplaySampler::new(vec![Some(80), None, Some(95)]);
        assert_eq!(sampler.remaining(), 3);
        assert_eq!(sampler.sample(), Some(80));
        assert_eq!(sampler.sample(), None);
        assert_eq!(sampler.sample(), Some(95));
        assert_eq!(sampler.remaining(), 0);
        assert_eq!(sampler.sample(), None);
        assert_eq!(sampler.sample(), None);
    }

    #[test]
    fn steady_repeats_forever() {
        let mut sampler = SteadySampler::new(Some(85));
        for _ in 0..10 {
            assert_eq!(sampler.sample(), Some(85));
        }
    }

    #[test]
    fn synthetic_wave_sweeps_across_both_bounds() {
        let mut sampler = SyntheticSampler::new(40);
        let wave: Vec<u8> = (0..80).map(|_| sampler.sample().unwrap()).collect();
        assert!(wave.iter().all(|&v| (60..=100).contains(&v)));
        // Crosses below the default lower bound and reaches saturation.
        assert!(wave.iter().any(|&v| v <= 82));
        assert!(wave.iter().any(|&v| v >= 92));
        assert_eq!(wave.iter().max(), Some(&100));
        // Second period repeats the first.
        assert_eq!(wave[..40], wave[40..]);
    }
}
