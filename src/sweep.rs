//! The sweep: a sequence of frames in which a multiplier climbs from
//! a start value to a maximum, pulling the camera back a little each
//! step.  An optional reverse pass walks the same schedule backwards,
//! starting from the camera the forward pass ended on and undoing one
//! step after each frame, which leaves the camera exactly where it
//! began.

use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;

use crate::config::RenderConfig;
use crate::errors::RenderError;
use crate::framebuffer::Framebuffer;
use crate::progress::Progress;
use crate::scheduler::render_frame;
use crate::sink::FrameSink;
use crate::viewport::Viewport;

/// The shape of a sweep.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SweepConfig {
    /// First multiplier.
    pub start: f64,
    /// Last multiplier; the sweep stops once it is exceeded.
    pub max: f64,
    /// Multiplier and camera increment per frame.
    pub step: f64,
    /// Follow the forward pass with a reverse pass.
    pub reverse: bool,
}

impl SweepConfig {
    /// A sweep must terminate.
    pub fn validate(&self) -> Result<(), RenderError> {
        if !(self.start.is_finite() && self.max.is_finite() && self.step.is_finite()) {
            return Err(RenderError::config("sweep bounds and step must be finite"));
        }
        if self.step <= 0.0 {
            return Err(RenderError::config(format!(
                "sweep step must be positive, got {}",
                self.step
            )));
        }
        // Past a certain magnitude, adding the step no longer moves the
        // multiplier and the schedule would never end.
        if self.start + self.step == self.start || self.max + self.step == self.max {
            return Err(RenderError::config(format!(
                "sweep step {} is too small to move a multiplier between {} and {}",
                self.step, self.start, self.max
            )));
        }
        if self.start > self.max {
            return Err(RenderError::config(format!(
                "sweep start {} is past its maximum {}",
                self.start, self.max
            )));
        }
        Ok(())
    }
}

/// Which way the camera is travelling.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Direction {
    /// Pulling back: the corner moves down-left, the view grows.
    Forward,
    /// Undoing the forward pass.
    Reverse,
}

/// The camera and multiplier, carried from frame to frame.
#[derive(Clone, Debug)]
pub struct Sweep {
    /// The multiplier for the frame about to be rendered.
    pub multiplier: f64,
    /// The camera for the frame about to be rendered.
    pub viewport: Viewport,
    /// Which pass we are in.
    pub direction: Direction,
    config: SweepConfig,
}

impl Sweep {
    /// A sweep starting from `viewport`.
    pub fn new(viewport: Viewport, config: SweepConfig) -> Result<Sweep, RenderError> {
        config.validate()?;
        Ok(Sweep {
            multiplier: config.start,
            viewport,
            direction: Direction::Forward,
            config,
        })
    }

    /// The forward schedule of multipliers, accumulated the same way
    /// the forward pass accumulates them.
    pub fn multipliers(&self) -> Vec<f64> {
        let mut out = vec![];
        let mut m = self.config.start;
        while m <= self.config.max {
            out.push(m);
            m += self.config.step;
        }
        out
    }

    /// Moves the camera one step forward.
    pub fn advance(&mut self) {
        let step = self.config.step;
        self.viewport.origin.re -= step * 2.0;
        self.viewport.origin.im -= step * 2.0;
        self.viewport.height += step;
    }

    /// Moves the camera one step back; the exact inverse of
    /// `advance`.
    pub fn retreat(&mut self) {
        let step = self.config.step;
        self.viewport.origin.re += step * 2.0;
        self.viewport.origin.im += step * 2.0;
        self.viewport.height -= step;
    }

    fn frame(
        &self,
        fb: &mut Framebuffer,
        config: &RenderConfig,
        sink: &mut dyn FrameSink,
        progress: &mut dyn Progress,
    ) -> Result<PathBuf, RenderError> {
        debug!(
            "px = {}, py = {}, ph = {}, multiplier = {}, step = {}",
            self.viewport.origin.re,
            self.viewport.origin.im,
            self.viewport.height,
            self.multiplier,
            self.config.step
        );
        let config = RenderConfig {
            sweep_factor: self.multiplier,
            ..config.clone()
        };
        render_frame(fb, &self.viewport, &config, progress)?;
        sink.write(fb, self.multiplier)
    }

    /// Renders every frame of the sweep, strictly one after another,
    /// and returns the paths the sink wrote them to.
    pub fn run(
        &mut self,
        config: &RenderConfig,
        sink: &mut dyn FrameSink,
        progress: &mut dyn Progress,
    ) -> Result<Vec<PathBuf>, RenderError> {
        config.validate()?;
        let mut fb = Framebuffer::new(config.width, config.height)?;
        let schedule = self.multipliers();
        let mut written = Vec::with_capacity(schedule.len() * 2);
        let began = Instant::now();

        self.direction = Direction::Forward;
        for &m in &schedule {
            self.multiplier = m;
            let start = Instant::now();
            written.push(self.frame(&mut fb, config, sink, progress)?);
            info!("Frame {} took {:?}, {:?} so far", m, start.elapsed(), began.elapsed());
            self.advance();
        }

        if self.config.reverse {
            self.direction = Direction::Reverse;
            for &m in schedule.iter().rev() {
                self.multiplier = m;
                let start = Instant::now();
                written.push(self.frame(&mut fb, config, sink, progress)?);
                info!("Frame {} took {:?}, {:?} so far", m, start.elapsed(), began.elapsed());
                self.retreat();
            }
        }

        info!("Sweep of {} frames completed in {:?}", written.len(), began.elapsed());
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jitter::JitterMode;
    use crate::progress::Silent;
    use num::Complex;

    fn sweep(reverse: bool) -> SweepConfig {
        SweepConfig {
            start: 0.0,
            max: 1.0,
            step: 0.25,
            reverse,
        }
    }

    fn camera() -> Viewport {
        Viewport::new(Complex::new(-1.0, -1.0), 0.08125, 16, 16)
    }

    /// Remembers what it was asked to write.
    struct Recorder {
        frames: Vec<(f64, [u8; 4])>,
    }

    impl FrameSink for Recorder {
        fn write(&mut self, fb: &Framebuffer, multiplier: f64) -> Result<PathBuf, RenderError> {
            self.frames.push((multiplier, fb.get(8, 8)));
            Ok(PathBuf::from(format!("frame-{}", self.frames.len())))
        }
    }

    struct Refusing;

    impl FrameSink for Refusing {
        fn write(&mut self, _fb: &Framebuffer, _m: f64) -> Result<PathBuf, RenderError> {
            Err(RenderError::Sink {
                path: "nowhere".to_string(),
                reason: "refused".to_string(),
            })
        }
    }

    fn config() -> RenderConfig {
        RenderConfig {
            width: 16,
            height: 16,
            max_iterations: 20,
            samples: 1,
            jitter: JitterMode::Fixed(0.5),
            ..RenderConfig::default()
        }
    }

    #[test]
    fn schedule_is_inclusive_of_max() {
        let s = Sweep::new(camera(), sweep(false)).unwrap();
        assert_eq!(s.multipliers(), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn reverse_steps_undo_forward_steps() {
        let mut s = Sweep::new(camera(), SweepConfig { step: 0.1, ..sweep(true) }).unwrap();
        let n = 37;
        for _ in 0..n {
            s.advance();
        }
        assert!(s.viewport.height > camera().height);
        for _ in 0..n {
            s.retreat();
        }
        let (a, b) = (s.viewport, camera());
        assert!((a.origin.re - b.origin.re).abs() < 1e-9);
        assert!((a.origin.im - b.origin.im).abs() < 1e-9);
        assert!((a.height - b.height).abs() < 1e-9);
    }

    #[test]
    fn forward_only_leaves_the_camera_pulled_back() {
        let mut s = Sweep::new(camera(), sweep(false)).unwrap();
        let mut rec = Recorder { frames: vec![] };
        let paths = s.run(&config(), &mut rec, &mut Silent).unwrap();
        assert_eq!(paths.len(), 5);
        assert!((s.viewport.origin.re - (-1.0 - 5.0 * 0.5)).abs() < 1e-9);
        assert!((s.viewport.height - (0.08125 + 5.0 * 0.25)).abs() < 1e-9);
    }

    #[test]
    fn full_sweep_returns_home() {
        let mut s = Sweep::new(camera(), sweep(true)).unwrap();
        let mut rec = Recorder { frames: vec![] };
        s.run(&config(), &mut rec, &mut Silent).unwrap();
        let ms: Vec<f64> = rec.frames.iter().map(|f| f.0).collect();
        assert_eq!(ms, vec![0.0, 0.25, 0.5, 0.75, 1.0, 1.0, 0.75, 0.5, 0.25, 0.0]);
        assert_eq!(s.direction, Direction::Reverse);
        assert!((s.viewport.origin.re - camera().origin.re).abs() < 1e-9);
        assert!((s.viewport.origin.im - camera().origin.im).abs() < 1e-9);
        assert!((s.viewport.height - camera().height).abs() < 1e-9);
    }

    #[test]
    fn reverse_frames_revisit_forward_cameras() {
        let mut s = Sweep::new(camera(), sweep(true)).unwrap();
        let mut rec = Recorder { frames: vec![] };
        s.run(&config(), &mut rec, &mut Silent).unwrap();
        let n = rec.frames.len() / 2;
        // Reverse frame j shows the camera of forward frame n - j.
        for j in 1..n {
            assert_eq!(rec.frames[n + j].1, rec.frames[n - j].1, "reverse frame {}", j);
        }
    }

    #[test]
    fn reverse_pass_starts_from_the_pulled_back_camera() {
        // Pixel (8, 8) is inside the set here, and well outside it once
        // the camera has been pulled back by one step.
        let home = Viewport::new(Complex::new(-0.3, -0.1), 0.2, 16, 16);
        let one_step = SweepConfig {
            start: 0.0,
            max: 0.0,
            step: 1.0,
            reverse: true,
        };
        let mut s = Sweep::new(home, one_step).unwrap();
        let mut rec = Recorder { frames: vec![] };
        s.run(&config(), &mut rec, &mut Silent).unwrap();
        assert_eq!(rec.frames.len(), 2);
        assert_eq!(rec.frames[0].1, [255, 255, 255, 255]);
        assert_ne!(rec.frames[1].1, [255, 255, 255, 255]);
        assert!((s.viewport.origin.re - home.origin.re).abs() < 1e-9);
        assert!((s.viewport.origin.im - home.origin.im).abs() < 1e-9);
        assert!((s.viewport.height - home.height).abs() < 1e-9);
    }

    #[test]
    fn bad_sweeps_are_rejected() {
        assert!(Sweep::new(camera(), SweepConfig { step: 0.0, ..sweep(false) }).is_err());
        assert!(Sweep::new(camera(), SweepConfig { step: -1.0, ..sweep(false) }).is_err());
        assert!(Sweep::new(camera(), SweepConfig { start: 2.0, ..sweep(false) }).is_err());
    }

    #[test]
    fn steps_lost_to_rounding_are_rejected() {
        let huge = SweepConfig {
            start: 1e20,
            max: 2e20,
            step: 1.0,
            reverse: false,
        };
        assert!(huge.validate().unwrap_err().is_config());
        let climbs_out_of_range = SweepConfig {
            start: 0.0,
            max: 1e20,
            step: 1.0,
            reverse: false,
        };
        assert!(climbs_out_of_range.validate().is_err());
    }

    #[test]
    fn sink_failures_stop_the_sweep() {
        let mut s = Sweep::new(camera(), sweep(true)).unwrap();
        match s.run(&config(), &mut Refusing, &mut Silent) {
            Err(RenderError::Sink { .. }) => {}
            other => panic!("expected a sink error, got {:?}", other),
        }
    }
}
