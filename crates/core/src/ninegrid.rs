//! Nine-grid storyboard geometry and plan validation.
//!
//! A nine-grid decomposition renders one composite image divided into an
//! exact 3x3 grid, panels ordered left-to-right then top-to-bottom. This
//! module holds the pure parts: the panel count contract and the
//! index-to-rectangle mapping used for panel selection.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Panels per decomposition. The planning call must return exactly this many.
pub const PANEL_COUNT: usize = 9;

/// Cells per grid side.
pub const GRID_SIDE: u32 = 3;

/// Validate that a planning response carries exactly [`PANEL_COUNT`] panels.
pub fn validate_panel_count(count: usize) -> Result<(), CoreError> {
    if count != PANEL_COUNT {
        return Err(CoreError::Validation(format!(
            "Nine-grid plan must contain exactly {PANEL_COUNT} panels (got {count})"
        )));
    }
    Ok(())
}

/// Validate a panel index selected by the user.
pub fn validate_panel_index(index: usize) -> Result<(), CoreError> {
    if index >= PANEL_COUNT {
        return Err(CoreError::Validation(format!(
            "Panel index must be 0..={} (got {index})",
            PANEL_COUNT - 1
        )));
    }
    Ok(())
}

/// A panel's sub-rectangle within the composite, in unit coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Map a panel index to its unit-coordinate rectangle.
///
/// Row-major: row = index / 3, column = index % 3; each cell spans one
/// third of the composite's width and height.
pub fn panel_rect(index: usize) -> Result<PanelRect, CoreError> {
    validate_panel_index(index)?;
    let side = GRID_SIDE as f64;
    let row = (index as u32 / GRID_SIDE) as f64;
    let col = (index as u32 % GRID_SIDE) as f64;
    Ok(PanelRect {
        x: col / side,
        y: row / side,
        width: 1.0 / side,
        height: 1.0 / side,
    })
}

/// Convert a unit-coordinate rectangle to pixel bounds for a composite of
/// the given dimensions. Returns `(x, y, width, height)`.
pub fn pixel_bounds(rect: PanelRect, image_width: u32, image_height: u32) -> (u32, u32, u32, u32) {
    let x = (rect.x * image_width as f64).round() as u32;
    let y = (rect.y * image_height as f64).round() as u32;
    let w = (rect.width * image_width as f64).round() as u32;
    let h = (rect.height * image_height as f64).round() as u32;
    // Clamp so rounding can never push the crop past the image edge.
    let w = w.min(image_width.saturating_sub(x));
    let h = h.min(image_height.saturating_sub(y));
    (x, y, w, h)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
