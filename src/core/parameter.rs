//! Editor control descriptions
//!
//! Each block kind is edited through a small set of controls. This module
//! describes them (widget kind, label, numeric range) so a UI host can render
//! them, and provides the clamping the slider controls apply to numeric input.

use serde::{Deserialize, Serialize};

/// Slider bounds for image width, in pixels.
pub const IMAGE_WIDTH_RANGE: SliderRange = SliderRange::new(100, 1200, 1);
/// Slider bounds for video width, in pixels.
pub const VIDEO_WIDTH_RANGE: SliderRange = SliderRange::new(240, 1280, 1);

/// Control definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlSpec {
    /// Field the control edits, in wire naming
    pub field: String,
    /// Human-readable label
    pub label: String,
    /// Widget to render
    pub widget: WidgetType,
    /// Bounds for slider controls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<SliderRange>,
    /// Unit label shown next to the value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Placeholder text for inputs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl ControlSpec {
    pub fn new(field: &str, label: &str, widget: WidgetType) -> Self {
        Self {
            field: field.to_string(),
            label: label.to_string(),
            widget,
            range: None,
            unit: None,
            placeholder: None,
        }
    }

    /// Set slider bounds
    pub fn with_range(mut self, range: SliderRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Set unit label
    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    /// Set placeholder text
    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }
}

/// Widget types for UI rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetType {
    /// Single-line text input
    Input,
    /// Bounded numeric slider
    Slider,
    /// Select dropdown
    Select,
    /// Checkbox
    Checkbox,
    /// Rich-text surface producing HTML markup
    RichText,
    /// Ordered list of URL inputs with add/remove
    UrlList,
    /// Draggable, resizable panel grid
    Grid,
    /// File picker feeding the media upload
    Upload,
}

/// Inclusive numeric range of a slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliderRange {
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

impl SliderRange {
    pub const fn new(min: u32, max: u32, step: u32) -> Self {
        Self { min, max, step }
    }

    /// Pull a value into range, the way the slider itself would.
    pub fn clamp(&self, value: i64) -> u32 {
        value.clamp(self.min as i64, self.max as i64) as u32
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}
