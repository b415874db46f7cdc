//! Trim markers over a waveform and the pointer gestures that move them.
//!
//! Marker positions live in pixel space; times are derived on demand so a
//! trim always maps to the same fraction of the sound.

use crate::{
    config::TrimSettings,
    error::{Result, SamplerError},
};

const MIN_GAP_FLOOR: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Hovering(Marker),
    Dragging(Marker),
}

/// The played sub-interval of one sound.
///
/// Holds `0 <= left < right <= width` at all times.
#[derive(Clone, Debug)]
pub struct TrimRegion {
    total_duration: f64,
    width: f32,
    left: f32,
    right: f32,
    hover_threshold: f32,
    min_gap: f32,
    state: DragState,
}

impl TrimRegion {
    /// Full-length trim over a canvas of `settings.canvas_width` pixels.
    pub fn new(total_duration: f64, settings: &TrimSettings) -> Result<Self> {
        let width = settings.canvas_width;
        if !(width.is_finite() && width > 0.0) {
            return Err(SamplerError::InvalidCanvasWidth(width));
        }
        let total_duration = if total_duration.is_finite() {
            total_duration.max(0.0)
        } else {
            0.0
        };
        // A zero gap would let the markers meet; one wider than half the
        // canvas could trap a marker outside its range.
        let floor = MIN_GAP_FLOOR.max(width * 1e-6);
        let min_gap = settings.min_marker_gap_px.max(floor).min(width / 2.0);
        Ok(Self {
            total_duration,
            width,
            left: 0.0,
            right: width,
            hover_threshold: settings.hover_threshold_px.max(0.0),
            min_gap,
            state: DragState::Idle,
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn left_px(&self) -> f32 {
        self.left
    }

    pub fn right_px(&self) -> f32 {
        self.right
    }

    pub fn marker_px(&self, marker: Marker) -> f32 {
        match marker {
            Marker::Left => self.left,
            Marker::Right => self.right,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn pixel_to_time(&self, px: f32) -> f64 {
        px as f64 / self.width as f64 * self.total_duration
    }

    pub fn time_to_pixel(&self, t: f64) -> f32 {
        if self.total_duration <= 0.0 {
            return 0.0;
        }
        (t / self.total_duration * self.width as f64) as f32
    }

    /// `(start, end)` in seconds.
    pub fn trim_times(&self) -> (f64, f64) {
        (self.pixel_to_time(self.left), self.pixel_to_time(self.right))
    }

    /// Hover tracking while idle, marker movement while dragging.
    pub fn pointer_moved(&mut self, x: f32) {
        if !x.is_finite() {
            return;
        }
        match self.state {
            DragState::Dragging(marker) => self.move_marker(marker, x),
            DragState::Idle | DragState::Hovering(_) => {
                self.state = match self.marker_near(x) {
                    Some(marker) => DragState::Hovering(marker),
                    None => DragState::Idle,
                };
            }
        }
    }

    /// Starts dragging the hovered marker; ignored otherwise.
    pub fn drag_started(&mut self) {
        if let DragState::Hovering(marker) = self.state {
            self.state = DragState::Dragging(marker);
        }
    }

    pub fn drag_ended(&mut self) {
        if let DragState::Dragging(_) = self.state {
            self.state = DragState::Idle;
        }
    }

    fn marker_near(&self, x: f32) -> Option<Marker> {
        let dl = (x - self.left).abs();
        let dr = (x - self.right).abs();
        let (marker, dist) = if dl <= dr {
            (Marker::Left, dl)
        } else {
            (Marker::Right, dr)
        };
        (dist <= self.hover_threshold).then_some(marker)
    }

    fn move_marker(&mut self, marker: Marker, x: f32) {
        match marker {
            Marker::Left => {
                let max = (self.right - self.min_gap).max(0.0);
                self.left = x.clamp(0.0, max);
            }
            Marker::Right => {
                let min = (self.left + self.min_gap).min(self.width);
                self.right = x.clamp(min, self.width);
            }
        }
    }

    // Bypasses the gesture path so tests can build inconsistent regions.
    #[cfg(test)]
    pub(crate) fn force_markers(&mut self, left: f32, right: f32) {
        self.left = left;
        self.right = right;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(width: f32, gap: f32) -> TrimSettings {
        TrimSettings {
            canvas_width: width,
            hover_threshold_px: 10.0,
            min_marker_gap_px: gap,
        }
    }

    #[test]
    fn zero_gap_is_raised_to_floor() {
        let mut t = TrimRegion::new(1.0, &settings(100.0, 0.0)).unwrap();
        assert_eq!(t.min_gap, MIN_GAP_FLOOR);

        t.pointer_moved(0.0);
        t.drag_started();
        t.pointer_moved(150.0);
        assert!(t.left_px() < t.right_px());
    }

    #[test]
    fn oversized_gap_is_capped() {
        let t = TrimRegion::new(1.0, &settings(10.0, 50.0)).unwrap();
        assert_eq!(t.min_gap, 5.0);
    }
}
