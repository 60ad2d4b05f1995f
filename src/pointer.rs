/// Latest pointer location and the radius it repels particles within.
///
/// Written by input events, read by every particle update. Input and frames
/// run on the same thread, so the last write simply wins.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerState {
    position: Option<(f32, f32)>,
    radius: f32,
    compact_radius: f32,
    standard_radius: f32,
}

impl PointerState {
    /// Starts absent, with the standard radius until the first seed
    pub fn new(compact_radius: f32, standard_radius: f32) -> Self {
        let compact_radius = positive_or(compact_radius, crate::settings::COMPACT_RADIUS);
        let standard_radius = positive_or(standard_radius, crate::settings::STANDARD_RADIUS);
        Self {
            position: None,
            radius: standard_radius,
            compact_radius,
            standard_radius,
        }
    }

    pub fn position(&self) -> Option<(f32, f32)> {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Record an active pointer. Non-finite coordinates are dropped.
    pub fn set_position(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.position = Some((x, y));
        }
    }

    pub fn clear(&mut self) {
        self.position = None;
    }

    pub fn set_radius_for_surface_class(&mut self, is_compact: bool) {
        self.radius = if is_compact {
            self.compact_radius
        } else {
            self.standard_radius
        };
    }

    /// Replace the two candidate radii; takes effect on the next seed
    pub fn set_radii(&mut self, compact_radius: f32, standard_radius: f32) {
        self.compact_radius = positive_or(compact_radius, self.compact_radius);
        self.standard_radius = positive_or(standard_radius, self.standard_radius);
    }
}

fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new(crate::settings::COMPACT_RADIUS, crate::settings::STANDARD_RADIUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_absent() {
        let pointer = PointerState::default();
        assert_eq!(pointer.position(), None);
        assert!(pointer.radius() > 0.0);
    }

    #[test]
    fn test_set_and_clear() {
        let mut pointer = PointerState::default();
        pointer.set_position(10.0, 20.0);
        assert_eq!(pointer.position(), Some((10.0, 20.0)));
        pointer.set_position(11.0, 21.0);
        assert_eq!(pointer.position(), Some((11.0, 21.0)));
        pointer.clear();
        assert_eq!(pointer.position(), None);
        pointer.clear();
        assert_eq!(pointer.position(), None);
    }

    #[test]
    fn test_non_finite_position_ignored() {
        let mut pointer = PointerState::default();
        pointer.set_position(5.0, 5.0);
        pointer.set_position(f32::NAN, 1.0);
        pointer.set_position(1.0, f32::INFINITY);
        assert_eq!(pointer.position(), Some((5.0, 5.0)));
    }

    #[test]
    fn test_radius_by_surface_class() {
        let mut pointer = PointerState::new(100.0, 170.0);
        pointer.set_radius_for_surface_class(true);
        assert_eq!(pointer.radius(), 100.0);
        pointer.set_radius_for_surface_class(false);
        assert_eq!(pointer.radius(), 170.0);
    }

    #[test]
    fn test_radius_stays_positive() {
        let mut pointer = PointerState::new(-1.0, 0.0);
        pointer.set_radius_for_surface_class(true);
        assert!(pointer.radius() > 0.0);
        pointer.set_radii(f32::NAN, 50.0);
        pointer.set_radius_for_surface_class(false);
        assert_eq!(pointer.radius(), 50.0);
    }
}
