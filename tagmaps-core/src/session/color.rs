use serde::{Deserialize, Serialize};

use crate::algorithm::clustering::NOISE;

/// an 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// colour of points that belong to no cluster
pub const NOISE_COLOR: Rgb = Rgb(128, 128, 128);

const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_749_895;
const SATURATION: f64 = 0.65;
const VALUE: f64 = 0.9;

/// one colour per label. noise is grey; clusters get hues spaced by the golden ratio so
/// neighbouring labels are easy to tell apart.
pub fn cluster_colors(labels: &[i32]) -> Vec<Rgb> {
    labels
        .iter()
        .map(|label| {
            if *label == NOISE {
                NOISE_COLOR
            } else {
                let hue = (*label as f64 * GOLDEN_RATIO_CONJUGATE).fract();
                hsv_to_rgb(hue, SATURATION, VALUE)
            }
        })
        .collect()
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    let (r, g, b) = match sector as i64 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    let to_u8 = |c: f64| (c * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb(to_u8(r), to_u8(g), to_u8(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_is_grey() {
        let colors = cluster_colors(&[NOISE, 0, NOISE]);
        assert_eq!(colors[0], NOISE_COLOR);
        assert_eq!(colors[2], NOISE_COLOR);
        assert_ne!(colors[1], NOISE_COLOR);
    }

    #[test]
    fn test_same_label_same_color() {
        let colors = cluster_colors(&[0, 1, 2, 1, 0]);
        assert_eq!(colors[0], colors[4]);
        assert_eq!(colors[1], colors[3]);
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
    }

    #[test]
    fn test_hex() {
        assert_eq!(NOISE_COLOR.to_hex(), "#808080");
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Rgb(255, 0, 0));
    }
}
