#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Supersampled Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points c on the complex plane for
//! which repeatedly squaring z and adding c, starting from zero,
//! never sends z off to infinity.  Points outside the set escape, and
//! how quickly they escape is what gives the picture its colour: the
//! escape time is turned into a hue and pushed through HSL to RGB.
//! Points inside the set are painted white.
//!
//! A single point per pixel produces a jagged, noisy image near the
//! boundary, where neighbouring points can escape at wildly different
//! speeds.  So each pixel is sampled many times at random offsets
//! inside its footprint and the colours are averaged, optionally in
//! linear light, so the average isn't darkened by the sRGB gamma
//! curve.
//!
//! Rows of the image are handed out to a pool of worker threads, each
//! of which writes only to the rows it was given.  An optional sweep
//! renders a sequence of frames while pulling the camera back and
//! shifting the colour density.

extern crate crossbeam;
extern crate image;
extern crate num;
extern crate num_cpus;

pub mod colorize;
pub mod colour;
pub mod config;
pub mod errors;
pub mod escape;
pub mod framebuffer;
pub mod jitter;
pub mod progress;
pub mod sampler;
pub mod scheduler;
pub mod sink;
pub mod sweep;
pub mod viewport;

pub use config::RenderConfig;
pub use errors::RenderError;
pub use framebuffer::Framebuffer;
pub use scheduler::{render, render_frame};
pub use sweep::{Sweep, SweepConfig};
pub use viewport::{Pixel, Viewport};
