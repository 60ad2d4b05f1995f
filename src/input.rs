use crate::pointer::PointerState;
use ratatui::layout::Rect;

/// Pointer input as delivered by the host platform.
///
/// The terminal host only produces `Moved` and `Left`; the touch variants
/// are for hosts with a touch screen.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// Mouse moved to a surface position
    Moved { x: f32, y: f32 },
    /// Touches began; points in surface pixels
    #[allow(dead_code)]
    TouchStart(Vec<(f32, f32)>),
    /// Active touches moved
    #[allow(dead_code)]
    TouchMove(Vec<(f32, f32)>),
    /// A touch ended with `remaining` touches still down
    #[allow(dead_code)]
    TouchEnd { remaining: usize },
    /// Pointer left the surface
    Left,
}

impl PointerState {
    /// Apply a host event. Only the first touch point is tracked.
    pub fn apply(&mut self, event: &PointerEvent) {
        match event {
            PointerEvent::Moved { x, y } => self.set_position(*x, *y),
            PointerEvent::TouchStart(points) | PointerEvent::TouchMove(points) => {
                if let Some(&(x, y)) = points.first() {
                    self.set_position(x, y);
                }
            }
            PointerEvent::TouchEnd { remaining } => {
                if *remaining == 0 {
                    self.clear();
                }
            }
            PointerEvent::Left => self.clear(),
        }
    }
}

/// Maps terminal cells inside the canvas area to surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMapper {
    pub area: Rect,
    pub cell_width: f32,
    pub cell_height: f32,
}

impl CellMapper {
    pub fn new(area: Rect, cell_width: f32, cell_height: f32) -> Self {
        Self {
            area,
            cell_width,
            cell_height,
        }
    }

    /// Surface size in logical pixels
    pub fn surface_size(&self) -> (usize, usize) {
        (
            (self.area.width as f32 * self.cell_width) as usize,
            (self.area.height as f32 * self.cell_height) as usize,
        )
    }

    /// Center of the pixel block under a cell, or None outside the canvas
    pub fn to_surface(&self, column: u16, row: u16) -> Option<(f32, f32)> {
        let a = self.area;
        if column < a.x || row < a.y || column >= a.x + a.width || row >= a.y + a.height {
            return None;
        }
        let x = (column - a.x) as f32 * self.cell_width + self.cell_width / 2.0;
        let y = (row - a.y) as f32 * self.cell_height + self.cell_height / 2.0;
        Some((x, y))
    }

    /// Turn a terminal mouse position into the matching pointer event
    pub fn event_at(&self, column: u16, row: u16) -> PointerEvent {
        match self.to_surface(column, row) {
            Some((x, y)) => PointerEvent::Moved { x, y },
            None => PointerEvent::Left,
        }
    }
}
