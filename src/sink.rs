//! Writing finished frames to disk as PNG.

use image::png::PNGEncoder;
use image::ColorType;
use log::info;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::errors::RenderError;
use crate::framebuffer::Framebuffer;

/// Somewhere for finished frames to go.
pub trait FrameSink {
    /// Store `fb`, rendered at sweep position `multiplier`, and say
    /// where it went.
    fn write(&mut self, fb: &Framebuffer, multiplier: f64) -> Result<PathBuf, RenderError>;
}

fn sink_error(path: &Path, reason: impl ToString) -> RenderError {
    RenderError::Sink {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Encodes `fb` as an 8-bit RGBA PNG at `path`.
pub fn write_png(path: &Path, fb: &Framebuffer) -> Result<(), RenderError> {
    let output = File::create(path).map_err(|e| sink_error(path, e))?;
    let encoder = PNGEncoder::new(BufWriter::new(output));
    encoder
        .encode(
            fb.as_bytes(),
            fb.width() as u32,
            fb.height() as u32,
            ColorType::RGBA(8),
        )
        .map_err(|e| sink_error(path, e))?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Writes numbered PNG frames into a directory.  Files are named
/// `{prefix}-{frame}-{multiplier}.png`; with no prefix, the Unix time
/// at which the frame was written stands in for it.
pub struct PngSink {
    dir: PathBuf,
    prefix: Option<String>,
    frame: usize,
}

impl PngSink {
    /// A sink writing into `dir`.
    pub fn new<P: Into<PathBuf>>(dir: P, prefix: Option<String>) -> Self {
        PngSink {
            dir: dir.into(),
            prefix,
            frame: 0,
        }
    }

    /// The name the next frame will get.
    pub fn file_name(&self, multiplier: f64) -> String {
        let prefix = match self.prefix {
            Some(ref p) => p.clone(),
            None => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
                .to_string(),
        };
        format!("{}-{:04}-{:.6}.png", prefix, self.frame, multiplier)
    }
}

impl FrameSink for PngSink {
    fn write(&mut self, fb: &Framebuffer, multiplier: f64) -> Result<PathBuf, RenderError> {
        let path = self.dir.join(self.file_name(multiplier));
        write_png(&path, fb)?;
        self.frame += 1;
        Ok(path)
    }
}
