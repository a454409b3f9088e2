/// Top-level feature selected from the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    BackgroundRemoval,
    Cropping,
    Filters,
}

impl Feature {
    pub const ALL: [Feature; 3] = [
        Feature::BackgroundRemoval,
        Feature::Cropping,
        Feature::Filters,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::BackgroundRemoval => "Background remover",
            Feature::Cropping => "Crop Image",
            Feature::Filters => "Image Filters",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Feature::BackgroundRemoval => {
                "Automatically remove the background from your images. \
                 And download in original resolution"
            }
            Feature::Cropping => "Crop your images to a specific size or area. Use x and y coordinates",
            Feature::Filters => {
                "Apply various artistic and corrective filters to your images. Cool and basic filters"
            }
        }
    }
}

/// Specific filter under the Filters feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    BlackAndWhite,
    Sharpening,
    Hue,
    Contrast,
    Saturation,
    InvertColors,
}

impl Filter {
    pub const ALL: [Filter; 6] = [
        Filter::BlackAndWhite,
        Filter::Sharpening,
        Filter::Hue,
        Filter::Contrast,
        Filter::Saturation,
        Filter::InvertColors,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Filter::BlackAndWhite => "Black & White",
            Filter::Sharpening => "Sharpen Image",
            Filter::Hue => "Adjust Hue",
            Filter::Contrast => "Adjust Contrast",
            Filter::Saturation => "Adjust Saturation",
            Filter::InvertColors => "Invert Colors",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Filter::BlackAndWhite => "Convert to monochrome with adjustable intensity.",
            Filter::Sharpening => "Enhance details with adjustable intensity.",
            Filter::Hue => "Shift the color tones of your image.",
            Filter::Contrast => {
                "Increase or decrease the difference between light and dark areas."
            }
            Filter::Saturation => "Control the vividness or dullness of colors.",
            Filter::InvertColors => "Create a negative effect by inverting all colors.",
        }
    }

    /// Label shown above the intensity slider, for filters that have one.
    pub fn slider_label(self) -> Option<&'static str> {
        match self {
            Filter::BlackAndWhite => Some("Black & White Intensity"),
            Filter::Sharpening => Some("Sharpening Intensity"),
            Filter::Hue => Some("Hue Shift"),
            Filter::Contrast => Some("Contrast Adjustment"),
            Filter::Saturation => Some("Saturation Adjustment"),
            Filter::InvertColors => None,
        }
    }
}

/// The closed set of application screens. Entering a `Workflow` variant is the
/// lifecycle boundary for a fresh session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    Menu,
    FilterMenu,
    Workflow {
        feature: Feature,
        filter: Option<Filter>,
    },
}

impl Screen {
    /// Welcome -> main menu.
    pub fn get_started(&mut self) {
        if *self == Screen::Welcome {
            *self = Screen::Menu;
        }
    }

    /// Main menu -> either the filter submenu or a feature workflow.
    pub fn select_feature(&mut self, feature: Feature) {
        *self = match feature {
            Feature::Filters => Screen::FilterMenu,
            other => Screen::Workflow {
                feature: other,
                filter: None,
            },
        };
    }

    /// Filter submenu -> a filter workflow.
    pub fn select_filter(&mut self, filter: Filter) {
        *self = Screen::Workflow {
            feature: Feature::Filters,
            filter: Some(filter),
        };
    }

    /// One step back: filter workflows return to the filter submenu, feature
    /// workflows and the submenu return to the main menu.
    pub fn go_back(&mut self) {
        *self = match *self {
            Screen::Workflow { filter: Some(_), .. } => Screen::FilterMenu,
            Screen::Workflow { filter: None, .. } => Screen::Menu,
            Screen::FilterMenu => Screen::Menu,
            other => other,
        };
    }

    pub fn back_label(&self) -> &'static str {
        match self {
            Screen::Workflow { filter: Some(_), .. } => "\u{2190} Back to Filters",
            _ => "\u{2190} Back to Features",
        }
    }
}
