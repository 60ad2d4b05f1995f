use crate::color::{Rgb, Rgba};
use crate::particle::{Motion, Particle};
use crate::pointer::PointerState;
use crate::settings::FieldSettings;
use crate::surface::Surface;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Size class of the drawing surface, decided at seed time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceClass {
    Compact,
    #[default]
    Standard,
}

impl SurfaceClass {
    pub fn classify(width: f32, threshold: f32) -> Self {
        if width < threshold {
            SurfaceClass::Compact
        } else {
            SurfaceClass::Standard
        }
    }

    pub fn is_compact(&self) -> bool {
        *self == SurfaceClass::Compact
    }

    pub fn name(&self) -> &str {
        match self {
            SurfaceClass::Compact => "Compact",
            SurfaceClass::Standard => "Standard",
        }
    }
}

/// All particles on one surface plus the settings that drive them
pub struct ParticleField {
    particles: Vec<Particle>,
    count: usize,
    surface_class: SurfaceClass,
    /// Bumped on every seed
    generation: u64,
    pub settings: FieldSettings,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(settings: FieldSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Reproducible layouts for a fixed seed
    pub fn with_seed(settings: FieldSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: FieldSettings, rng: StdRng) -> Self {
        Self {
            particles: Vec::new(),
            count: 0,
            surface_class: SurfaceClass::default(),
            generation: 0,
            settings,
            rng,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn surface_class(&self) -> SurfaceClass {
        self.surface_class
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Discard every particle and populate the surface from scratch
    pub fn seed(&mut self, width: usize, height: usize, pointer: &mut PointerState) {
        self.particles.clear();

        let class = SurfaceClass::classify(width as f32, self.settings.compact_threshold);
        self.surface_class = class;
        self.count = match class {
            SurfaceClass::Compact => self.settings.compact_count,
            SurfaceClass::Standard => self.settings.standard_count,
        };

        pointer.set_radii(self.settings.compact_radius, self.settings.standard_radius);
        pointer.set_radius_for_surface_class(class.is_compact());

        let band = self.settings.color_scheme.band();
        self.particles.reserve(self.count);
        for _ in 0..self.count {
            let home = (
                random_coord(&mut self.rng, width),
                random_coord(&mut self.rng, height),
            );
            let particle = Particle::random(&mut self.rng, home, &self.settings, &band);
            self.particles.push(particle);
        }

        self.generation += 1;
        log::info!(
            "seeded {} particles on {}x{} ({} surface, radius {})",
            self.count,
            width,
            height,
            class.name(),
            pointer.radius()
        );
    }

    /// Advance and paint one frame
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S, pointer: &PointerState) {
        let (w, h) = (surface.width() as f32, surface.height() as f32);
        surface.fill_rect(0.0, 0.0, w, h, Rgba::new(Rgb::BLACK, self.settings.fade_alpha));

        let motion = Motion::from_settings(&self.settings);
        for particle in &mut self.particles {
            particle.update(pointer, &motion);
            particle.draw(surface);
        }
    }

    /// Largest distance any particle currently sits from home
    pub fn max_displacement(&self) -> f32 {
        self.particles
            .iter()
            .map(Particle::displacement)
            .fold(0.0, f32::max)
    }
}

/// Uniform in [0, extent), or 0 for an empty axis
fn random_coord<R: Rng + ?Sized>(rng: &mut R, extent: usize) -> f32 {
    if extent == 0 {
        0.0
    } else {
        rng.gen_range(0.0..extent as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::PixelBuffer;

    fn field() -> ParticleField {
        ParticleField::with_seed(FieldSettings::default(), 42)
    }

    #[test]
    fn test_compact_seed() {
        let mut field = field();
        let mut pointer = PointerState::default();
        field.seed(500, 400, &mut pointer);

        assert_eq!(field.surface_class(), SurfaceClass::Compact);
        assert_eq!(field.count(), 1200);
        assert_eq!(field.particles().len(), 1200);
        assert_eq!(pointer.radius(), 100.0);
        for p in field.particles() {
            let (x, y) = p.home();
            assert!((0.0..500.0).contains(&x));
            assert!((0.0..400.0).contains(&y));
            assert_eq!(p.position, p.home());
        }
    }

    #[test]
    fn test_standard_seed() {
        let mut field = field();
        let mut pointer = PointerState::default();
        field.seed(1200, 800, &mut pointer);

        assert_eq!(field.surface_class(), SurfaceClass::Standard);
        assert_eq!(field.particles().len(), 2500);
        assert_eq!(pointer.radius(), 170.0);
    }

    #[test]
    fn test_threshold_boundary() {
        assert_eq!(SurfaceClass::classify(767.9, 768.0), SurfaceClass::Compact);
        assert_eq!(SurfaceClass::classify(768.0, 768.0), SurfaceClass::Standard);
    }

    #[test]
    fn test_reseed_discards_previous_particles() {
        let mut field = field();
        let mut pointer = PointerState::default();
        field.seed(1200, 800, &mut pointer);
        let first: Vec<(f32, f32)> = field.particles().iter().map(Particle::home).collect();
        assert_eq!(field.generation(), 1);

        field.seed(500, 300, &mut pointer);
        assert_eq!(field.generation(), 2);
        assert_eq!(field.particles().len(), 1200);
        assert_eq!(pointer.radius(), 100.0);
        for p in field.particles() {
            assert!(!first.contains(&p.home()));
            assert!(p.home().0 < 500.0 && p.home().1 < 300.0);
        }
    }

    #[test]
    fn test_zero_sized_surface() {
        let mut field = field();
        let mut pointer = PointerState::default();
        field.seed(0, 0, &mut pointer);
        assert_eq!(field.particles().len(), 1200);
        let mut buf = PixelBuffer::new(0, 0);
        field.tick(&mut buf, &pointer);
        assert!(field.particles().iter().all(|p| p.home() == (0.0, 0.0)));
    }

    #[test]
    fn test_tick_fades_then_draws() {
        let mut field = field();
        let mut pointer = PointerState::default();
        let mut buf = PixelBuffer::new(300, 200);
        field.seed(300, 200, &mut pointer);

        // A white pixel far from everything fades by exactly alpha
        buf.fill_rect(0.0, 0.0, 300.0, 200.0, Rgba::new(Rgb::new(1.0, 1.0, 1.0), 1.0));
        let mut settings = field.settings.clone();
        settings.compact_count = 0;
        let mut empty = ParticleField::with_seed(settings, 1);
        empty.seed(300, 200, &mut pointer);
        empty.tick(&mut buf, &pointer);
        let p = buf.get(150, 100).unwrap();
        assert!((p.r - 0.8).abs() < 1e-6);

        // Every particle's center pixel carries its color after a tick
        let mut buf = PixelBuffer::new(300, 200);
        field.tick(&mut buf, &pointer);
        let lit = field
            .particles()
            .iter()
            .filter(|p| {
                let (x, y) = p.position;
                buf.get(x as usize, y as usize).map_or(false, |c| c.max_channel() > 0.3)
            })
            .count();
        assert_eq!(lit, field.particles().len());
    }

    #[test]
    fn test_positions_stay_finite_under_pointer() {
        let mut field = field();
        let mut pointer = PointerState::default();
        let mut buf = PixelBuffer::new(640, 480);
        field.seed(640, 480, &mut pointer);

        // Park the pointer exactly on a particle
        let target = field.particles()[0].position;
        pointer.set_position(target.0, target.1);
        for frame in 0..120 {
            if frame > 0 && frame % 30 == 0 {
                pointer.set_position(frame as f32 * 5.0, 240.0);
            }
            field.tick(&mut buf, &pointer);
            for p in field.particles() {
                assert!(p.position.0.is_finite() && p.position.1.is_finite());
            }
        }
    }

    #[test]
    fn test_particles_settle_after_pointer_leaves() {
        let mut field = field();
        let mut pointer = PointerState::default();
        let mut buf = PixelBuffer::new(640, 480);
        field.seed(640, 480, &mut pointer);

        pointer.set_position(320.0, 240.0);
        for _ in 0..20 {
            field.tick(&mut buf, &pointer);
        }
        assert!(field.max_displacement() > 1.0);

        pointer.clear();
        for _ in 0..400 {
            field.tick(&mut buf, &pointer);
        }
        assert!(field.max_displacement() < 1e-3);
    }
}
