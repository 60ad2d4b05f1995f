use rand::Rng;
use serde::{Deserialize, Serialize};

/// Linear RGB color with components in 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Brightest channel, used as a cheap luminance proxy
    pub fn max_channel(&self) -> f32 {
        self.r.max(self.g).max(self.b)
    }

    pub fn to_bytes(self) -> [u8; 3] {
        [
            color_component(self.r * 255.0),
            color_component(self.g * 255.0),
            color_component(self.b * 255.0),
        ]
    }
}

/// RGB color with an opacity used for translucent fills
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Rgba {
    pub fn new(rgb: Rgb, alpha: f32) -> Self {
        Self { rgb, alpha }
    }
}

#[inline]
fn color_component(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Hue (degrees), saturation and lightness (percent)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Hsl {
    pub fn new(hue: f32, saturation: f32, lightness: f32) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    pub fn to_rgb(&self) -> Rgb {
        let h = self.hue.rem_euclid(360.0);
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let l = (self.lightness / 100.0).clamp(0.0, 1.0);

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let secondary = chroma * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let match_value = l - chroma / 2.0;

        let (r, g, b) = match (h / 60.0) as u32 {
            0 => (chroma, secondary, 0.0),
            1 => (secondary, chroma, 0.0),
            2 => (0.0, chroma, secondary),
            3 => (0.0, secondary, chroma),
            4 => (secondary, 0.0, chroma),
            _ => (chroma, 0.0, secondary),
        };

        Rgb::new(r + match_value, g + match_value, b + match_value)
    }
}

/// Ranges each HSL component is drawn from. Lower bound inclusive, upper exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaletteBand {
    pub hue: (f32, f32),
    pub saturation: (f32, f32),
    pub lightness: (f32, f32),
}

impl PaletteBand {
    /// Pick a color from the band, each component floored to a whole number
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Hsl {
        Hsl::new(
            sample_floor(rng, self.hue),
            sample_floor(rng, self.saturation),
            sample_floor(rng, self.lightness),
        )
    }
}

fn sample_floor<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f32, f32)) -> f32 {
    let v = rng.gen_range(lo..hi).floor();
    // floor can land below lo when lo is fractional
    v.max(lo.floor())
}

/// Named palettes particles are colored from
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ColorScheme {
    /// Pinks and magentas
    #[default]
    Blossom,
    Ocean,
    Ember,
    Forest,
    Aurora,
}

impl ColorScheme {
    pub fn name(&self) -> &str {
        match self {
            ColorScheme::Blossom => "Blossom",
            ColorScheme::Ocean => "Ocean",
            ColorScheme::Ember => "Ember",
            ColorScheme::Forest => "Forest",
            ColorScheme::Aurora => "Aurora",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ColorScheme::Blossom => ColorScheme::Ocean,
            ColorScheme::Ocean => ColorScheme::Ember,
            ColorScheme::Ember => ColorScheme::Forest,
            ColorScheme::Forest => ColorScheme::Aurora,
            ColorScheme::Aurora => ColorScheme::Blossom,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            ColorScheme::Blossom => ColorScheme::Aurora,
            ColorScheme::Ocean => ColorScheme::Blossom,
            ColorScheme::Ember => ColorScheme::Ocean,
            ColorScheme::Forest => ColorScheme::Ember,
            ColorScheme::Aurora => ColorScheme::Forest,
        }
    }

    pub fn band(&self) -> PaletteBand {
        let hue = match self {
            ColorScheme::Blossom => (300.0, 350.0),
            ColorScheme::Ocean => (180.0, 230.0),
            ColorScheme::Ember => (0.0, 45.0),
            ColorScheme::Forest => (90.0, 150.0),
            ColorScheme::Aurora => (150.0, 280.0),
        };
        PaletteBand {
            hue,
            saturation: (60.0, 100.0),
            lightness: (40.0, 80.0),
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "blossom" | "pink" => Some(ColorScheme::Blossom),
            "ocean" | "blue" => Some(ColorScheme::Ocean),
            "ember" | "fire" => Some(ColorScheme::Ember),
            "forest" | "green" => Some(ColorScheme::Forest),
            "aurora" => Some(ColorScheme::Aurora),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn approx(a: Rgb, b: Rgb) -> bool {
        (a.r - b.r).abs() < 1e-4 && (a.g - b.g).abs() < 1e-4 && (a.b - b.b).abs() < 1e-4
    }

    #[test]
    fn test_hsl_primaries() {
        assert!(approx(Hsl::new(0.0, 100.0, 50.0).to_rgb(), Rgb::new(1.0, 0.0, 0.0)));
        assert!(approx(Hsl::new(120.0, 100.0, 50.0).to_rgb(), Rgb::new(0.0, 1.0, 0.0)));
        assert!(approx(Hsl::new(240.0, 100.0, 50.0).to_rgb(), Rgb::new(0.0, 0.0, 1.0)));
        assert!(approx(Hsl::new(300.0, 100.0, 50.0).to_rgb(), Rgb::new(1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_hsl_greys_ignore_hue() {
        assert!(approx(Hsl::new(321.0, 0.0, 50.0).to_rgb(), Rgb::new(0.5, 0.5, 0.5)));
        assert!(approx(Hsl::new(10.0, 80.0, 100.0).to_rgb(), Rgb::new(1.0, 1.0, 1.0)));
        assert!(approx(Hsl::new(10.0, 80.0, 0.0).to_rgb(), Rgb::BLACK));
    }

    #[test]
    fn test_blossom_band_sampling() {
        let band = ColorScheme::Blossom.band();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let c = band.sample(&mut rng);
            assert!(c.hue >= 300.0 && c.hue < 350.0);
            assert!(c.saturation >= 60.0 && c.saturation < 100.0);
            assert!(c.lightness >= 40.0 && c.lightness < 80.0);
            assert_eq!(c.hue, c.hue.floor());
        }
    }

    #[test]
    fn test_scheme_cycle_round_trips() {
        let mut scheme = ColorScheme::default();
        for _ in 0..5 {
            assert_eq!(scheme.next().prev(), scheme);
            scheme = scheme.next();
        }
        assert_eq!(scheme, ColorScheme::Blossom);
        assert_eq!(ColorScheme::from_name("Fire"), Some(ColorScheme::Ember));
        assert_eq!(ColorScheme::from_name("plaid"), None);
    }

    #[test]
    fn test_to_bytes_clamps() {
        assert_eq!(Rgb::new(1.2, -0.1, 0.5).to_bytes(), [255, 0, 128]);
    }
}
