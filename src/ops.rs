use crate::screen::{Feature, Filter};

/// One backend operation. Both crop modes share an endpoint and differ only in
/// the `circular` form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    RemoveBackground,
    Crop { circular: bool },
    Sharpen,
    BlackAndWhite,
    Hue,
    Contrast,
    Saturation,
    InvertColors,
}

impl Operation {
    pub fn endpoint(self) -> &'static str {
        match self {
            Operation::RemoveBackground => "/remove-background",
            Operation::Crop { .. } => "/crop-image",
            Operation::Sharpen => "/sharpen-image",
            Operation::BlackAndWhite => "/black-and-white",
            Operation::Hue => "/adjust-hue",
            Operation::Contrast => "/adjust-contrast",
            Operation::Saturation => "/adjust-saturation",
            Operation::InvertColors => "/invert-colors",
        }
    }

    /// Fixed default filename offered when saving this operation's result.
    pub fn download_filename(self) -> &'static str {
        match self {
            Operation::RemoveBackground => "kreate_bg_removed.png",
            Operation::Crop { .. } => "kreate_cropped.png",
            Operation::Sharpen => "kreate_sharpened.png",
            Operation::BlackAndWhite => "kreate_black_white.png",
            Operation::Hue => "kreate_hue_adjusted.png",
            Operation::Contrast => "kreate_contrast_adjusted.png",
            Operation::Saturation => "kreate_saturation_adjusted.png",
            Operation::InvertColors => "kreate_inverted.png",
        }
    }

    /// Heading shown above the result preview.
    pub fn result_title(self) -> &'static str {
        match self {
            Operation::RemoveBackground => "Processed Image (Background Removed)",
            Operation::Crop { .. } => "Cropped Image",
            Operation::Sharpen => "Sharpened Image",
            Operation::BlackAndWhite => "Black & White Image",
            Operation::Hue => "Hue Adjusted Image",
            Operation::Contrast => "Contrast Adjusted Image",
            Operation::Saturation => "Saturation Adjusted Image",
            Operation::InvertColors => "Inverted Image",
        }
    }
}

/// Title shown in the workflow header for the active feature/filter.
pub fn operation_title(feature: Feature, filter: Option<Filter>) -> &'static str {
    match (feature, filter) {
        (Feature::BackgroundRemoval, _) => "Background Removal",
        (Feature::Cropping, _) => "Image Cropping",
        (Feature::Filters, Some(Filter::BlackAndWhite)) => "Black & White Conversion",
        (Feature::Filters, Some(Filter::Sharpening)) => "Image Sharpening",
        (Feature::Filters, Some(Filter::Hue)) => "Hue Adjustment",
        (Feature::Filters, Some(Filter::Contrast)) => "Contrast Adjustment",
        (Feature::Filters, Some(Filter::Saturation)) => "Saturation Adjustment",
        (Feature::Filters, Some(Filter::InvertColors)) => "Invert Colors",
        (Feature::Filters, None) => "Image Filters",
    }
}

/// Per-filter slider values in 0..=100, with the backend's documented defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterIntensity {
    pub sharpening: u8,
    pub black_and_white: u8,
    pub hue: u8,
    pub contrast: u8,
    pub saturation: u8,
}

impl Default for FilterIntensity {
    fn default() -> Self {
        Self {
            sharpening: 100,
            black_and_white: 100,
            hue: 0,
            contrast: 100,
            saturation: 100,
        }
    }
}

impl FilterIntensity {
    pub fn get(&self, filter: Filter) -> u8 {
        match filter {
            Filter::Sharpening => self.sharpening,
            Filter::BlackAndWhite => self.black_and_white,
            Filter::Hue => self.hue,
            Filter::Contrast => self.contrast,
            Filter::Saturation => self.saturation,
            Filter::InvertColors => 0,
        }
    }

    pub fn get_mut(&mut self, filter: Filter) -> Option<&mut u8> {
        match filter {
            Filter::Sharpening => Some(&mut self.sharpening),
            Filter::BlackAndWhite => Some(&mut self.black_and_white),
            Filter::Hue => Some(&mut self.hue),
            Filter::Contrast => Some(&mut self.contrast),
            Filter::Saturation => Some(&mut self.saturation),
            Filter::InvertColors => None,
        }
    }
}

/// Slider 0..=100 to the backend's 0.0..=1.0 intensity.
pub fn map_intensity(value: u8) -> f64 {
    value as f64 / 100.0
}

/// Slider 0..=100 to a hue shift in degrees, -180..=180.
pub fn map_hue(value: u8) -> f64 {
    (value as f64 / 100.0) * 360.0 - 180.0
}

/// Slider 0..=100 to a 0.0..=2.0 factor; 50 leaves the image unchanged.
/// Used by both contrast and saturation.
pub fn map_factor(value: u8) -> f64 {
    value as f64 / 50.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_maps_to_unit_range() {
        assert_eq!(map_intensity(0), 0.0);
        assert_eq!(map_intensity(75), 0.75);
        assert_eq!(map_intensity(100), 1.0);
    }

    #[test]
    fn hue_maps_to_signed_degrees() {
        assert_eq!(map_hue(0), -180.0);
        assert_eq!(map_hue(50), 0.0);
        assert_eq!(map_hue(100), 180.0);
    }

    #[test]
    fn factor_is_neutral_at_midpoint() {
        assert_eq!(map_factor(0), 0.0);
        assert_eq!(map_factor(50), 1.0);
        assert_eq!(map_factor(75), 1.5);
        assert_eq!(map_factor(100), 2.0);
    }

    #[test]
    fn intensity_defaults_match_backend_expectations() {
        let i = FilterIntensity::default();
        assert_eq!(i.sharpening, 100);
        assert_eq!(i.black_and_white, 100);
        assert_eq!(i.hue, 0);
        assert_eq!(i.contrast, 100);
        assert_eq!(i.saturation, 100);
    }

    #[test]
    fn crop_modes_share_endpoint_and_filename() {
        let rect = Operation::Crop { circular: false };
        let circ = Operation::Crop { circular: true };
        assert_eq!(rect.endpoint(), circ.endpoint());
        assert_eq!(rect.download_filename(), "kreate_cropped.png");
        assert_eq!(circ.download_filename(), "kreate_cropped.png");
    }
}
