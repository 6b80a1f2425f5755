// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The ways a render can fail.  The arithmetic at the heart of the
//! renderer is total, so everything here happens at the edges: bad
//! configuration before any work is scheduled, running out of memory
//! for the framebuffer, or the image sink refusing a frame.

use failure::Fail;

/// Every failure the renderer surfaces to its caller.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// A configuration value that no render could succeed with.
    /// Detected before any row is scheduled.
    #[fail(display = "Invalid configuration: {}", _0)]
    Config(String),

    /// The framebuffer could not be allocated.  No partial output is
    /// ever written when this happens.
    #[fail(display = "Could not allocate a framebuffer of {} bytes", bytes)]
    Allocation {
        /// How much we asked for.
        bytes: usize,
    },

    /// The image sink could not create or encode the output file.
    /// The framebuffer is untouched, so the caller may retry.
    #[fail(display = "Could not write {}: {}", path, reason)]
    Sink {
        /// Where we tried to write.
        path: String,
        /// What the filesystem or encoder said.
        reason: String,
    },

    /// A render worker panicked.
    #[fail(display = "A render worker failed: {}", _0)]
    Worker(String),
}

impl RenderError {
    /// Shorthand for configuration failures.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        RenderError::Config(msg.into())
    }

    /// True for errors that the user can fix by changing their input.
    pub fn is_config(&self) -> bool {
        match self {
            RenderError::Config(_) => true,
            _ => false,
        }
    }
}
