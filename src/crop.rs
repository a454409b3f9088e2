use egui::Pos2;

/// Crop rectangle in preview pixels, relative to the image's top-left corner.
///
/// Values are captured from drag gestures over the scaled preview and sent to
/// the backend unconverted; see DESIGN.md for the coordinate-space caveat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    /// Covers an entire image of the given dimensions.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// A region with a zero side is incomplete and cannot be submitted.
    pub fn is_complete(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Normalizes a drag gesture into a region: the anchor is wherever the drag
/// started, and the rectangle follows the pointer in any direction.
pub fn region_from_drag(start: Pos2, current: Pos2) -> CropRegion {
    let x = start.x.min(current.x).max(0.0);
    let y = start.y.min(current.y).max(0.0);
    let width = (current.x - start.x).abs();
    let height = (current.y - start.y).abs();
    CropRegion {
        x: x.round() as u32,
        y: y.round() as u32,
        width: width.round() as u32,
        height: height.round() as u32,
    }
}

/// Manual coordinate entry: non-negative integers only, anything else is 0.
pub fn coerce_coord(text: &str) -> u32 {
    text.trim().parse().unwrap_or(0)
}
