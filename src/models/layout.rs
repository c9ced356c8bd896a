//! Page, system, and staff layout carriers, plus the print entry

use serde::{Deserialize, Serialize};

/// Tenths-to-millimeters scaling for the whole score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaling {
    pub millimeters: f32,
    pub tenths: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_height: Option<f32>,
    pub page_width: Option<f32>,
    pub margins: Vec<PageMargins>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMargins {
    /// "odd", "even", or "both".
    pub margin_type: Option<String>,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemLayout {
    pub system_margins: Option<SystemMargins>,
    pub system_distance: Option<f32>,
    pub top_system_distance: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMargins {
    pub left: f32,
    pub right: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaffLayout {
    pub number: Option<u32>,
    pub staff_distance: Option<f32>,
}

/// Engraving appearance defaults: line widths and note sizes in tenths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub line_widths: Vec<LineWidth>,
    pub note_sizes: Vec<NoteSize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineWidth {
    /// What the width applies to: "stem", "beam", "staff", and so on.
    pub line_type: String,
    pub value: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteSize {
    /// "cue", "grace", or "large".
    pub size_type: String,
    /// Percentage of the regular note size.
    pub value: f32,
}

/// The `<print>` measure entry: layout changes taking effect at this
/// measure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Print {
    pub new_system: Option<bool>,
    pub new_page: Option<bool>,
    /// Number of blank pages inserted before this measure.
    pub blank_page: Option<u32>,
    pub page_number: Option<String>,
    pub page_layout: Option<PageLayout>,
    pub system_layout: Option<SystemLayout>,
    pub staff_layouts: Vec<StaffLayout>,
}
