//! Trial enumeration and per-trial seeds.
//!
//! A trial is one `(N, D, sigma_X, sigma_f, repetition)` combination. The
//! enumeration mirrors the runner's loop nest, from outermost to innermost:
//! repetition, `sigma_f`, `D`, `sigma_X`, `N`. Nothing here executes a trial;
//! downstream tools consume the descriptors.

use nsim_core::errors::{ErrorInfo, NsimError};
use nsim_core::rng::RngHandle;
use serde::{Deserialize, Serialize};

use crate::record::ExperimentRecord;

/// Position of a trial along each sweep axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrialIndex {
    /// Index into `N`.
    pub sample_size: usize,
    /// Index into `D`.
    pub dimension: usize,
    /// Index into `sigma_X`.
    pub input_noise: usize,
    /// Index into `sigma_f`.
    pub output_noise: usize,
    /// Repetition counter.
    pub repetition: usize,
}

/// Table of per-trial seeds with shape `(|N|, |D|, |sigma_X|, |sigma_f|, repetitions)`.
///
/// Seeds are drawn from `[0, 2^32 - 1)` and laid out row-major, so the
/// repetition axis is contiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedTable {
    master_seed: u64,
    shape: [usize; 5],
    seeds: Vec<u32>,
}

impl SeedTable {
    /// Draws a table sized for `record` from a `StdRng` seeded with `master_seed`.
    pub fn generate(record: &ExperimentRecord, master_seed: u64) -> Self {
        let shape = shape_of(record);
        let len = record.trial_count();
        let mut rng = RngHandle::from_seed(master_seed);
        let seeds = (0..len).map(|_| rng.next_trial_seed()).collect();
        Self {
            master_seed,
            shape,
            seeds,
        }
    }

    /// Seed the table was drawn from.
    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Axis lengths in `(N, D, sigma_X, sigma_f, repetition)` order.
    pub fn shape(&self) -> [usize; 5] {
        self.shape
    }

    /// Total number of seeds.
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    /// True when the table holds no seeds.
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// Flat row-major view of the seeds.
    pub fn seeds(&self) -> &[u32] {
        &self.seeds
    }

    /// Seed for a single trial, or `None` when the index is out of bounds.
    pub fn get(&self, index: TrialIndex) -> Option<u32> {
        let coords = [
            index.sample_size,
            index.dimension,
            index.input_noise,
            index.output_noise,
            index.repetition,
        ];
        let mut flat = 0;
        for (coord, extent) in coords.iter().zip(self.shape.iter()) {
            if coord >= extent {
                return None;
            }
            flat = flat * extent + coord;
        }
        self.seeds.get(flat).copied()
    }

    /// True when the table was sized for `record`.
    pub fn fits(&self, record: &ExperimentRecord) -> bool {
        self.shape == shape_of(record)
    }
}

fn shape_of(record: &ExperimentRecord) -> [usize; 5] {
    [
        record.sample_sizes().len(),
        record.dimensions().len(),
        record.input_noise_scale().len(),
        record.output_noise_scale().len(),
        record.repetitions() as usize,
    ]
}

/// Fully resolved description of a single trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    /// Position along each sweep axis.
    pub index: TrialIndex,
    /// Total number of samples drawn.
    pub n_samples: u64,
    /// Samples kept for training.
    pub n_train: u64,
    /// Samples held out for cross-validation.
    pub n_cv: u64,
    /// Ambient dimension.
    pub dimension: u64,
    /// Input noise level.
    pub input_noise: f64,
    /// Output noise level.
    pub output_noise: f64,
    /// Repetition counter.
    pub repetition: u32,
    /// Seed for the trial's sampler.
    pub seed: u32,
}

impl Trial {
    /// Run label, e.g. `helixrep0N2000D4sigX0.25sigf0.0`.
    pub fn label(&self, manifold_id: &str) -> String {
        format!(
            "{manifold_id}rep{}N{}D{}sigX{:?}sigf{:?}",
            self.repetition, self.n_samples, self.dimension, self.input_noise, self.output_noise
        )
    }

    /// Name of the archive the runner stores the sampled data in.
    pub fn data_file_name(&self, manifold_id: &str) -> String {
        format!("syntheticdata{}.npz", self.label(manifold_id))
    }
}

/// Iterator over the trials of a record, in runner loop order.
#[derive(Debug, Clone)]
pub struct Trials<'a> {
    record: &'a ExperimentRecord,
    seeds: &'a SeedTable,
    next: usize,
    len: usize,
}

impl Trials<'_> {
    fn trial_at(&self, position: usize) -> Option<Trial> {
        let record = self.record;
        let mut rest = position;
        let take = |rest: &mut usize, extent: usize| {
            let coord = *rest % extent;
            *rest /= extent;
            coord
        };
        let sample_size = take(&mut rest, record.sample_sizes().len());
        let input_noise = take(&mut rest, record.input_noise_scale().len());
        let dimension = take(&mut rest, record.dimensions().len());
        let output_noise = take(&mut rest, record.output_noise_scale().len());
        let repetition = rest;
        let index = TrialIndex {
            sample_size,
            dimension,
            input_noise,
            output_noise,
            repetition,
        };
        let n_samples = record.sample_sizes()[sample_size];
        let (n_train, n_cv) = record.split_sizes(n_samples);
        Some(Trial {
            index,
            n_samples,
            n_train,
            n_cv,
            dimension: record.dimensions()[dimension],
            input_noise: record.input_noise_scale()[input_noise],
            output_noise: record.output_noise_scale()[output_noise],
            repetition: u32::try_from(repetition).ok()?,
            seed: self.seeds.get(index)?,
        })
    }
}

impl Iterator for Trials<'_> {
    type Item = Trial;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let trial = self.trial_at(self.next);
        self.next += 1;
        trial
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Trials<'_> {}

impl ExperimentRecord {
    /// Enumerates the trials, pairing each with its seed from `seeds`.
    pub fn trials<'a>(&'a self, seeds: &'a SeedTable) -> Result<Trials<'a>, NsimError> {
        if !seeds.fits(self) {
            return Err(NsimError::Config(
                ErrorInfo::new("trials.seed-shape", "seed table was drawn for another record")
                    .with_context("expected", format!("{:?}", shape_of(self)))
                    .with_context("actual", format!("{:?}", seeds.shape())),
            ));
        }
        Ok(Trials {
            record: self,
            seeds,
            next: 0,
            len: self.trial_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_matches_runner_format() {
        let trial = Trial {
            index: TrialIndex {
                sample_size: 0,
                dimension: 0,
                input_noise: 0,
                output_noise: 0,
                repetition: 0,
            },
            n_samples: 2000,
            n_train: 1800,
            n_cv: 200,
            dimension: 4,
            input_noise: 0.25,
            output_noise: 0.0,
            repetition: 0,
            seed: 7,
        };
        assert_eq!(trial.label("helix"), "helixrep0N2000D4sigX0.25sigf0.0");
        assert_eq!(
            trial.data_file_name("helix"),
            "syntheticdatahelixrep0N2000D4sigX0.25sigf0.0.npz"
        );
    }

    #[test]
    fn seed_lookup_is_row_major() {
        let record = ExperimentRecord::runner_default();
        let table = SeedTable::generate(&record, 11);
        assert_eq!(table.shape(), [4, 3, 1, 1, 5]);
        let index = TrialIndex {
            sample_size: 1,
            dimension: 2,
            input_noise: 0,
            output_noise: 0,
            repetition: 3,
        };
        assert_eq!(table.get(index), Some(table.seeds()[(3 + 2) * 5 + 3]));
        let out_of_bounds = TrialIndex {
            repetition: 5,
            ..index
        };
        assert_eq!(table.get(out_of_bounds), None);
    }
}
