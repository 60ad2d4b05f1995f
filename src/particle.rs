use crate::color::{Hsl, PaletteBand};
use crate::pointer::PointerState;
use crate::settings::FieldSettings;
use crate::surface::Surface;
use rand::Rng;

/// Motion constants a particle needs each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub return_divisor: f32,
    pub snap_epsilon: f32,
}

impl Motion {
    pub fn from_settings(settings: &FieldSettings) -> Self {
        Self {
            return_divisor: settings.return_divisor.max(1.0),
            snap_epsilon: settings.snap_epsilon.max(0.0),
        }
    }
}

impl Default for Motion {
    fn default() -> Self {
        Self::from_settings(&FieldSettings::default())
    }
}

/// Repulsion strength at distance `d`, in (0, 1] inside the radius
pub fn force(d: f32, radius: f32) -> Option<f32> {
    if d < radius && radius > 0.0 {
        Some((radius - d) / radius)
    } else {
        None
    }
}

/// A single point that rests at `home` and is pushed away by the pointer
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: (f32, f32),
    home: (f32, f32),
    pub size: f32,
    /// Multiplies how far the particle is pushed by a given force
    pub density: f32,
    pub color: Hsl,
}

impl Particle {
    pub fn new(home: (f32, f32), size: f32, density: f32, color: Hsl) -> Self {
        Self {
            position: home,
            home,
            size,
            density,
            color,
        }
    }

    /// Random size, density and color drawn from the configured ranges
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        home: (f32, f32),
        settings: &FieldSettings,
        band: &PaletteBand,
    ) -> Self {
        let (size_lo, size_hi) = settings.size_range;
        let (density_lo, density_hi) = settings.density_range;
        Self::new(
            home,
            rng.gen_range(size_lo..size_hi),
            rng.gen_range(density_lo..density_hi),
            band.sample(rng),
        )
    }

    pub fn home(&self) -> (f32, f32) {
        self.home
    }

    /// Distance from home
    pub fn displacement(&self) -> f32 {
        let dx = self.position.0 - self.home.0;
        let dy = self.position.1 - self.home.1;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn update(&mut self, pointer: &PointerState, motion: &Motion) {
        let Some((px, py)) = pointer.position() else {
            self.return_home(motion);
            return;
        };

        let dx = px - self.position.0;
        let dy = py - self.position.1;
        let distance = (dx * dx + dy * dy).sqrt();

        let Some(force) = force(distance, pointer.radius()) else {
            self.return_home(motion);
            return;
        };

        // Unit vector from the particle toward the pointer; +x push when they coincide
        let (dir_x, dir_y) = if distance > 0.0 {
            (dx / distance, dy / distance)
        } else {
            (-1.0, 0.0)
        };

        self.position.0 -= dir_x * force * self.density;
        self.position.1 -= dir_y * force * self.density;
    }

    pub fn return_home(&mut self, motion: &Motion) {
        self.position.0 = relax(self.position.0, self.home.0, motion);
        self.position.1 = relax(self.position.1, self.home.1, motion);
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.fill_circle(self.position.0, self.position.1, self.size, self.color.to_rgb());
    }
}

/// Close 1/divisor of the gap toward `home` on one axis
fn relax(value: f32, home: f32, motion: &Motion) -> f32 {
    if value == home {
        return value;
    }
    let next = value - (value - home) / motion.return_divisor;
    if (next - home).abs() < motion.snap_epsilon {
        home
    } else {
        next
    }
}
