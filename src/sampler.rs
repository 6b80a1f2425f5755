//! Stochastic supersampling: each pixel is the average colour of a
//! number of jittered points inside its footprint.

use crate::colorize::colorize;
use crate::colour::{linear_to_rgb, rgb_to_linear, Rgb};
use crate::config::RenderConfig;
use crate::escape::escape;
use crate::framebuffer::CHANNELS;
use crate::jitter::Jitter;
use crate::viewport::{Pixel, Viewport};

/// Computes the colour of one pixel.  With `config.linear` the
/// samples are summed in linear light and the mean converted back to
/// gamma space; otherwise the gamma-encoded channels are averaged
/// directly.
pub fn sample_pixel(
    pixel: Pixel,
    viewport: &Viewport,
    config: &RenderConfig,
    density: f64,
    jitter: &mut dyn Jitter,
) -> Rgb {
    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
    for _ in 0..config.samples {
        let offset = (jitter.offset(), jitter.offset());
        let point = viewport.pixel_to_point(pixel, offset, config.width, config.height);
        let c = colorize(escape(point, config.max_iterations), config.max_iterations, density);
        if config.linear {
            r += u64::from(rgb_to_linear(c.0));
            g += u64::from(rgb_to_linear(c.1));
            b += u64::from(rgb_to_linear(c.2));
        } else {
            r += u64::from(c.0);
            g += u64::from(c.1);
            b += u64::from(c.2);
        }
    }
    let n = config.samples as f64;
    if config.linear {
        Rgb(
            linear_to_rgb((r as f64 / n) as u16),
            linear_to_rgb((g as f64 / n) as u16),
            linear_to_rgb((b as f64 / n) as u16),
        )
    } else {
        Rgb((r as f64 / n) as u8, (g as f64 / n) as u8, (b as f64 / n) as u8)
    }
}

/// Fills row `y` of the image.  `row` is that row's RGBA bytes.
pub fn render_row(
    y: usize,
    row: &mut [u8],
    viewport: &Viewport,
    config: &RenderConfig,
    jitter: &mut dyn Jitter,
) {
    let density = config.density();
    for (x, out) in row.chunks_mut(CHANNELS).enumerate() {
        let c = sample_pixel(Pixel(x, y), viewport, config, density, jitter);
        out.copy_from_slice(&c.to_rgba());
    }
}
