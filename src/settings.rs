use crate::color::ColorScheme;
use serde::{Deserialize, Serialize};

/// Surfaces narrower than this (logical pixels) are compact
pub const COMPACT_WIDTH_THRESHOLD: f32 = 768.0;
pub const COMPACT_PARTICLE_COUNT: usize = 1200;
pub const STANDARD_PARTICLE_COUNT: usize = 2500;
pub const COMPACT_RADIUS: f32 = 100.0;
pub const STANDARD_RADIUS: f32 = 170.0;

/// Tunable constants of the particle field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    // === Population ===
    /// Width below which a surface counts as compact
    pub compact_threshold: f32,
    /// Particle count on compact surfaces
    pub compact_count: usize,
    /// Particle count on standard surfaces
    pub standard_count: usize,

    // === Pointer ===
    /// Influence radius on compact surfaces
    pub compact_radius: f32,
    /// Influence radius on standard surfaces
    pub standard_radius: f32,

    // === Motion ===
    /// Fraction divisor of the home gap closed each frame
    pub return_divisor: f32,
    /// Gap below which a particle snaps home (0 disables)
    pub snap_epsilon: f32,

    // === Particle shape ===
    /// Drawn radius range [lo, hi)
    pub size_range: (f32, f32),
    /// Density range [lo, hi)
    pub density_range: (f32, f32),

    // === Visual ===
    /// Opacity of the black fill painted each frame (trail length)
    pub fade_alpha: f32,
    pub color_scheme: ColorScheme,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            compact_threshold: COMPACT_WIDTH_THRESHOLD,
            compact_count: COMPACT_PARTICLE_COUNT,
            standard_count: STANDARD_PARTICLE_COUNT,

            compact_radius: COMPACT_RADIUS,
            standard_radius: STANDARD_RADIUS,

            return_divisor: 15.0,
            snap_epsilon: 1e-3,

            size_range: (1.0, 3.0),
            density_range: (5.0, 35.0),

            fade_alpha: 0.2,
            color_scheme: ColorScheme::default(),
        }
    }
}

impl FieldSettings {
    /// Adjust fade alpha within bounds
    pub fn adjust_fade_alpha(&mut self, delta: f32) {
        self.fade_alpha = (self.fade_alpha + delta).clamp(0.02, 1.0);
    }

    /// Adjust return divisor within bounds
    pub fn adjust_return_divisor(&mut self, delta: f32) {
        self.return_divisor = (self.return_divisor + delta).clamp(2.0, 60.0);
    }

    pub fn adjust_compact_radius(&mut self, delta: f32) {
        self.compact_radius = (self.compact_radius + delta).clamp(10.0, 1000.0);
    }

    pub fn adjust_standard_radius(&mut self, delta: f32) {
        self.standard_radius = (self.standard_radius + delta).clamp(10.0, 1000.0);
    }

    /// Clamp every value into the range the runtime adjusters allow
    pub fn clamp_all(&mut self) {
        self.adjust_fade_alpha(0.0);
        self.adjust_return_divisor(0.0);
        self.adjust_compact_radius(0.0);
        self.adjust_standard_radius(0.0);
        self.compact_threshold = self.compact_threshold.clamp(0.0, 100_000.0);
        self.compact_count = self.compact_count.clamp(1, 50_000);
        self.standard_count = self.standard_count.clamp(1, 50_000);
        self.snap_epsilon = self.snap_epsilon.clamp(0.0, 1.0);
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), String> {
        if !(self.compact_radius > 0.0 && self.standard_radius > 0.0) {
            return Err("Influence radius must be positive".to_string());
        }
        if !(self.return_divisor >= 1.0) {
            return Err("Return divisor must be at least 1".to_string());
        }
        if !(self.fade_alpha > 0.0 && self.fade_alpha <= 1.0) {
            return Err("Fade alpha must be in (0, 1]".to_string());
        }
        if !(self.snap_epsilon >= 0.0) {
            return Err("Snap epsilon must not be negative".to_string());
        }
        if !(self.compact_threshold >= 0.0) {
            return Err("Compact threshold must not be negative".to_string());
        }
        for (name, (lo, hi)) in [("size", self.size_range), ("density", self.density_range)] {
            if !(lo.is_finite() && hi.is_finite() && lo >= 0.0 && lo < hi) {
                return Err(format!("Invalid {} range: [{}, {})", name, lo, hi));
            }
        }
        Ok(())
    }
}
