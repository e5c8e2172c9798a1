//! Drag gesture handling for the crop frame.
//!
//! ```text
//! IDLE --press--> DRAGGING --release--> IDLE
//!                   |  ^
//!                   +--+ move (updates CropState)
//! ```
//!
//! Only the slack axis moves: x for [`Orientation::Landscape`], y for
//! [`Orientation::Portrait`]. The other ratio is never written.

use crate::transform::Orientation;
use crate::viewport::ViewportGeometry;

use super::{CropLimits, CropState};

/// Gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging {
        press_x: i32,
        press_y: i32,
        /// Display-space frame offset along the drag axis at press time.
        press_offset: i64,
    },
}

/// Turns pointer events into crop position updates.
#[derive(Debug, Clone, Copy)]
pub struct CropController {
    orientation: Orientation,
    state: GestureState,
}

impl CropController {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            state: GestureState::Idle,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Start a drag at pointer `(x, y)`.
    ///
    /// A press while already dragging restarts the gesture from the new point.
    pub fn press(&mut self, crop: &CropState, geometry: &ViewportGeometry, x: i32, y: i32) {
        let press_offset = match self.orientation {
            Orientation::Landscape => geometry.offset_x(crop),
            Orientation::Portrait => geometry.offset_y(crop),
        };
        self.state = GestureState::Dragging {
            press_x: x,
            press_y: y,
            press_offset: press_offset as i64,
        };
    }

    /// Move the pointer to `(x, y)`.
    ///
    /// Returns `true` if `crop` changed. Ignored unless dragging.
    pub fn drag_to(
        &mut self,
        crop: &mut CropState,
        geometry: &ViewportGeometry,
        limits: &CropLimits,
        x: i32,
        y: i32,
    ) -> bool {
        let GestureState::Dragging {
            press_x,
            press_y,
            press_offset,
        } = self.state
        else {
            return false;
        };

        match self.orientation {
            Orientation::Landscape => {
                let Some(ratio) = drag_ratio(
                    press_offset,
                    x as i64 - press_x as i64,
                    geometry.max_rect_x,
                    geometry.scaled_width,
                ) else {
                    return false;
                };
                let ratio = limits.clamp_x(ratio);
                let changed = ratio != crop.x_ratio;
                crop.x_ratio = ratio;
                changed
            }
            Orientation::Portrait => {
                let Some(ratio) = drag_ratio(
                    press_offset,
                    y as i64 - press_y as i64,
                    geometry.max_rect_y,
                    geometry.scaled_height,
                ) else {
                    return false;
                };
                let ratio = limits.clamp_y(ratio);
                let changed = ratio != crop.y_ratio;
                crop.y_ratio = ratio;
                changed
            }
        }
    }

    /// End the gesture.
    pub fn release(&mut self) {
        self.state = GestureState::Idle;
    }
}

/// New ratio along one axis, or `None` when the display bitmap has no extent.
fn drag_ratio(press_offset: i64, delta: i64, max_rect: u32, scaled: u32) -> Option<f64> {
    if scaled == 0 {
        return None;
    }
    let offset = (press_offset + delta).clamp(0, max_rect as i64);
    Some(offset as f64 / scaled as f64)
}
