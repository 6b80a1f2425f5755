//! Contains the Viewport struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a rectangle on the complex plane anchored at an arbitrary
//! corner, with a given height and aspect ratio.
use num::Complex;

/// Describes the x, y of a pixel in the output image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The region of the complex plane mapped onto the image.  The
/// `origin` is the complex coordinate of pixel (0, 0); `height` is
/// the extent of the imaginary axis covered by the image, and the
/// real axis covers `height * aspect`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// The corner of the view, where pixel (0, 0) lands.
    pub origin: Complex<f64>,
    /// Extent of the view along the imaginary axis.
    pub height: f64,
    /// Width over height of the output image.
    pub aspect: f64,
}

impl Viewport {
    /// A view anchored at `origin`, `height` tall, for an image of the
    /// given pixel dimensions.
    pub fn new(origin: Complex<f64>, height: f64, width_px: usize, height_px: usize) -> Viewport {
        Viewport {
            origin,
            height,
            aspect: (width_px as f64) / (height_px as f64),
        }
    }

    /// Given a pixel on the integral plane, an image size, and a
    /// sub-pixel offset in [0, 1) along each axis, return the
    /// corresponding point on the complex plane.
    #[inline]
    pub fn pixel_to_point(
        &self,
        pixel: Pixel,
        jitter: (f64, f64),
        width_px: usize,
        height_px: usize,
    ) -> Complex<f64> {
        Complex::new(
            self.height * self.aspect * ((pixel.0 as f64 + jitter.0) / width_px as f64)
                + self.origin.re,
            self.height * ((pixel.1 as f64 + jitter.1) / height_px as f64) + self.origin.im,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_follows_image_shape() {
        let vp = Viewport::new(Complex::new(0.0, 0.0), 2.0, 800, 400);
        assert_eq!(vp.aspect, 2.0);
    }

    #[test]
    fn pixel_to_point_on_positive_planes() {
        let vp = Viewport::new(Complex::new(0.0, 0.0), 4.0, 4, 4);
        assert_eq!(vp.pixel_to_point(Pixel(0, 0), (0.0, 0.0), 4, 4), Complex::new(0.0, 0.0));
        assert_eq!(vp.pixel_to_point(Pixel(2, 2), (0.0, 0.0), 4, 4), Complex::new(2.0, 2.0));
        assert_eq!(vp.pixel_to_point(Pixel(4, 4), (0.0, 0.0), 4, 4), Complex::new(4.0, 4.0));
    }

    #[test]
    fn pixel_to_point_on_mixed_planes() {
        let vp = Viewport::new(Complex::new(-2.0, -2.0), 4.0, 4, 4);
        assert_eq!(vp.pixel_to_point(Pixel(2, 2), (0.0, 0.0), 4, 4), Complex::new(0.0, 0.0));
        assert_eq!(vp.pixel_to_point(Pixel(0, 0), (0.0, 0.0), 4, 4), Complex::new(-2.0, -2.0));
    }

    #[test]
    fn jitter_moves_within_the_pixel() {
        let vp = Viewport::new(Complex::new(0.0, 0.0), 4.0, 4, 4);
        assert_eq!(vp.pixel_to_point(Pixel(1, 1), (0.5, 0.5), 4, 4), Complex::new(1.5, 1.5));
    }

    #[test]
    fn wide_images_stretch_the_real_axis() {
        let vp = Viewport::new(Complex::new(0.0, 0.0), 1.0, 200, 100);
        assert_eq!(vp.pixel_to_point(Pixel(100, 50), (0.0, 0.0), 200, 100), Complex::new(1.0, 0.5));
    }
}
