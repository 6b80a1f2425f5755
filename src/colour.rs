//! Colour space helpers: HSL to 8-bit RGB, and the sRGB transfer
//! curve between 8-bit gamma-encoded channels and 16-bit linear
//! light.  Averaging supersamples in linear light avoids the
//! darkening you get from averaging gamma-encoded values.

use num::clamp;
use once_cell::sync::Lazy;

/// An opaque 8-bit RGB colour.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// The colour of points inside the set.
pub const WHITE: Rgb = Rgb(255, 255, 255);

impl Rgb {
    /// The channels as an RGBA quad with full alpha.
    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.0, self.1, self.2, 255]
    }
}

fn hue_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Converts hue, saturation, and lightness to RGB.  Hue is taken
/// modulo 1, so any finite hue is acceptable.  Saturation and
/// lightness are expected in [0, 1].  Channels are truncated, not
/// rounded.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let h = h - h.floor();
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_channel(p, q, h + 1.0 / 3.0),
            hue_channel(p, q, h),
            hue_channel(p, q, h - 1.0 / 3.0),
        )
    };
    Rgb(to_channel(r), to_channel(g), to_channel(b))
}

#[inline]
fn to_channel(v: f64) -> u8 {
    // `as` saturates, and turns NaN into 0.
    (clamp(v, 0.0, 1.0) * 255.0) as u8
}

fn srgb_to_linear(v: f64) -> f64 {
    if v <= 0.040_45 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

static TO_LINEAR: Lazy<[u16; 256]> = Lazy::new(|| {
    let mut table = [0u16; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        *entry = (srgb_to_linear(i as f64 / 255.0) * 65535.0).round() as u16;
    }
    table
});

/// Gamma-encoded 8-bit channel to 16-bit linear light.
#[inline]
pub fn rgb_to_linear(c: u8) -> u16 {
    TO_LINEAR[c as usize]
}

/// 16-bit linear light back to the nearest gamma-encoded 8-bit
/// channel.
pub fn linear_to_rgb(v: u16) -> u8 {
    let table = &*TO_LINEAR;
    match table.binary_search(&v) {
        Ok(i) => i as u8,
        Err(0) => 0,
        Err(256) => 255,
        Err(i) => {
            if v - table[i - 1] <= table[i] - v {
                (i - 1) as u8
            } else {
                i as u8
            }
        }
    }
}
