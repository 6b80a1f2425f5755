//! The parallel render.  A fixed pool of workers drains a queue of
//! rows; every row is a disjoint slice of the framebuffer, so the
//! pixel writes need no locking at all.

use crossbeam::channel;
use log::{debug, info};
use std::time::Instant;

use crate::config::RenderConfig;
use crate::errors::RenderError;
use crate::framebuffer::Framebuffer;
use crate::progress::Progress;
use crate::sampler::render_row;
use crate::viewport::Viewport;

/// Renders one frame into `fb`.  The row queue is filled top to
/// bottom and then closed; workers pull rows until the queue is
/// empty, and this call returns once every worker has finished.
pub fn render_frame(
    fb: &mut Framebuffer,
    viewport: &Viewport,
    config: &RenderConfig,
    progress: &mut dyn Progress,
) -> Result<(), RenderError> {
    config.validate()?;
    if fb.width() != config.width || fb.height() != config.height {
        return Err(RenderError::config(format!(
            "framebuffer is {}x{} but the render is {}x{}",
            fb.width(),
            fb.height(),
            config.width,
            config.height
        )));
    }

    let workers = config.workers();
    let total = config.height;
    debug!("Rendering {} rows on {} workers", total, workers);
    let start = Instant::now();

    let (jobs_tx, jobs_rx) = channel::unbounded::<(usize, &mut [u8])>();
    let (done_tx, done_rx) = channel::unbounded::<usize>();
    let rows: Vec<(usize, &mut [u8])> = fb.rows_mut().enumerate().collect();

    crossbeam::scope(|spawner| {
        for _ in 0..workers {
            let jobs = jobs_rx.clone();
            let done = done_tx.clone();
            spawner.spawn(move |_| {
                for (y, row) in jobs.iter() {
                    let mut jitter = config.jitter.for_row(config.seed, y);
                    render_row(y, row, viewport, config, &mut *jitter);
                    // The receiver outlives every worker.
                    let _ = done.send(y);
                }
            });
        }
        drop(jobs_rx);
        drop(done_tx);

        for job in rows {
            if jobs_tx.send(job).is_err() {
                break;
            }
        }
        drop(jobs_tx);

        let mut finished = 0;
        for _ in done_rx.iter() {
            finished += 1;
            progress.tick(finished, total);
        }
        finished
    })
    .map_err(|_| RenderError::Worker("a render thread panicked".to_string()))
    .and_then(|finished| {
        if finished == total {
            Ok(())
        } else {
            Err(RenderError::Worker(format!(
                "only {} of {} rows were rendered",
                finished, total
            )))
        }
    })?;

    progress.finish(total);
    info!("Rendered {}x{} in {:?}", config.width, config.height, start.elapsed());
    Ok(())
}

/// Allocates a framebuffer for `config` and renders into it.
pub fn render(
    viewport: &Viewport,
    config: &RenderConfig,
    progress: &mut dyn Progress,
) -> Result<Framebuffer, RenderError> {
    config.validate()?;
    let mut fb = Framebuffer::new(config.width, config.height)?;
    render_frame(&mut fb, viewport, config, progress)?;
    Ok(fb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::WHITE;
    use crate::jitter::JitterMode;
    use crate::progress::Silent;
    use itertools::iproduct;
    use num::Complex;

    struct Counting {
        ticks: Vec<usize>,
        finished: Option<usize>,
    }

    impl Progress for Counting {
        fn tick(&mut self, done: usize, _total: usize) {
            self.ticks.push(done);
        }
        fn finish(&mut self, total: usize) {
            self.finished = Some(total);
        }
    }

    fn config(workers: usize) -> RenderConfig {
        RenderConfig {
            width: 48,
            height: 32,
            max_iterations: 60,
            samples: 3,
            workers,
            seed: 1234,
            ..RenderConfig::default()
        }
    }

    fn view() -> Viewport {
        Viewport::new(Complex::new(-2.0, -1.2), 2.5, 48, 32)
    }

    #[test]
    fn every_pixel_is_written() {
        let fb = render(&view(), &config(2), &mut Silent).unwrap();
        for (x, y) in iproduct!(0..48, 0..32) {
            assert_eq!(fb.get(x, y)[3], 255, "({}, {}) not written", x, y);
        }
    }

    #[test]
    fn worker_count_does_not_change_the_image() {
        let reference = render(&view(), &config(1), &mut Silent).unwrap();
        for workers in 2..=num_cpus::get().min(8) {
            let fb = render(&view(), &config(workers), &mut Silent).unwrap();
            assert_eq!(fb.as_bytes(), reference.as_bytes(), "{} workers", workers);
        }
    }

    #[test]
    fn xorshift_is_also_worker_independent() {
        let cfg = |workers| RenderConfig {
            jitter: JitterMode::XorShift,
            ..config(workers)
        };
        let a = render(&view(), &cfg(1), &mut Silent).unwrap();
        let b = render(&view(), &cfg(num_cpus::get()), &mut Silent).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn progress_sees_every_row() {
        let mut p = Counting {
            ticks: vec![],
            finished: None,
        };
        render(&view(), &config(2), &mut p).unwrap();
        assert_eq!(p.ticks, (1..=32).collect::<Vec<_>>());
        assert_eq!(p.finished, Some(32));
    }

    #[test]
    fn bad_config_schedules_nothing() {
        let mut p = Counting {
            ticks: vec![],
            finished: None,
        };
        let err = render(&view(), &RenderConfig { workers: 0, ..config(1) }, &mut p).unwrap_err();
        assert!(err.is_config());
        assert!(p.ticks.is_empty());
    }

    #[test]
    fn mismatched_framebuffer_is_rejected() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        assert!(render_frame(&mut fb, &view(), &config(1), &mut Silent)
            .unwrap_err()
            .is_config());
    }

    #[test]
    fn deep_interior_zoom_is_white() {
        let cfg = RenderConfig {
            width: 64,
            height: 64,
            max_iterations: 50,
            samples: 1,
            jitter: JitterMode::Fixed(0.0),
            workers: 2,
            ..RenderConfig::default()
        };
        let vp = Viewport::new(Complex::new(-0.555_750_6, -0.5560), 1e-9, 64, 64);
        let fb = render(&vp, &cfg, &mut Silent).unwrap();
        for (x, y) in iproduct!(0..64, 0..64) {
            assert_eq!(fb.get(x, y), WHITE.to_rgba());
        }
    }

    #[test]
    fn wide_view_has_coloured_corners() {
        let cfg = RenderConfig {
            width: 256,
            height: 256,
            max_iterations: 100,
            samples: 2,
            workers: num_cpus::get(),
            seed: 99,
            ..RenderConfig::default()
        };
        let vp = Viewport::new(Complex::new(-2.0, -1.2), 2.5, 256, 256);
        let fb = render(&vp, &cfg, &mut Silent).unwrap();
        for &(x, y) in &[(0, 0), (255, 0), (0, 255), (255, 255)] {
            assert_ne!(fb.get(x, y), WHITE.to_rgba(), "corner ({}, {})", x, y);
        }
    }
}
