//! Everything a single render needs to know, gathered in one place
//! and passed down explicitly.

use crate::errors::RenderError;
use crate::jitter::JitterMode;
use log::warn;

/// The parameters of one render.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Iteration cap per sample.
    pub max_iterations: usize,
    /// Jittered samples averaged into each pixel.
    pub samples: usize,
    /// Average samples in linear light instead of gamma space.
    pub linear: bool,
    /// Let `sweep_factor` drive the colour density.
    pub color_sweep: bool,
    /// The sweep multiplier for the current frame.
    pub sweep_factor: f64,
    /// Requested worker threads.
    pub workers: usize,
    /// Where sub-pixel offsets come from.
    pub jitter: JitterMode,
    /// Seed for the per-row jitter generators.
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: 1024,
            height: 1024,
            max_iterations: 1024,
            samples: 512,
            linear: true,
            color_sweep: false,
            sweep_factor: 0.0,
            workers: 1,
            jitter: JitterMode::Random,
            seed: 0,
        }
    }
}

impl RenderConfig {
    /// Rejects configurations no render could succeed with.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::config(format!(
                "image dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.max_iterations == 0 {
            return Err(RenderError::config("iteration count must be positive"));
        }
        if self.samples == 0 {
            return Err(RenderError::config("sample count must be positive"));
        }
        if self.workers == 0 {
            return Err(RenderError::config("worker count must be positive"));
        }
        if let JitterMode::Fixed(v) = self.jitter {
            if !(v >= 0.0 && v < 1.0) {
                return Err(RenderError::config(format!(
                    "fixed jitter must lie in [0, 1), got {}",
                    v
                )));
            }
        }
        Ok(())
    }

    /// The number of workers to actually start: the requested count,
    /// clamped to the available hardware concurrency.
    pub fn workers(&self) -> usize {
        let cpus = num_cpus::get();
        if self.workers > cpus {
            warn!(
                "{} workers requested but only {} CPUs available, using {}",
                self.workers, cpus, cpus
            );
            cpus
        } else {
            self.workers
        }
    }

    /// The colour density for this render.
    pub fn density(&self) -> f64 {
        crate::colorize::density(self.color_sweep, self.sweep_factor)
    }
}
