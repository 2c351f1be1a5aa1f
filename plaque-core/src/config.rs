use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const WHITE: [u8; 3] = [255, 255, 255];

/// Layout of one of the four text lines.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LineLayout {
    /// Starting point size, before the scale factor and width fitting.
    pub base_size_pt: f64,
    /// Fill color as RGB.
    pub color: [u8; 3],
    /// Vertical center of the line, mm from the top edge.
    pub center_y_mm: f64,
}

/// Process-wide plaque layout, immutable once constructed. The defaults are
/// the 210×80 mm / 300 DPI plaque the tool was built around. Deserialises
/// with `#[serde(default)]`, so a JSON overlay only needs the fields it
/// changes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Physical plaque width in millimeters.
    pub plaque_width_mm: f64,
    /// Physical plaque height in millimeters.
    pub plaque_height_mm: f64,
    /// Raster resolution; drives both the canvas size and the saved metadata.
    pub dpi: f64,
    /// Preferred font file, tried first.
    pub primary_font_path: PathBuf,
    /// Tried in order when the primary is unusable.
    pub fallback_font_paths: Vec<PathBuf>,
    /// Uniform multiplier applied to every base size.
    pub size_scale: f64,
    pub org: LineLayout,
    pub surname: LineLayout,
    pub given: LineLayout,
    pub role: LineLayout,
    pub left_margin_mm: f64,
    pub right_margin_mm: f64,
    /// Extra inter-glyph spacing in pixels; 0 disables glyph-by-glyph drawing.
    pub tracking_px: i32,
    /// Center tracked text by its actual spaced width instead of the
    /// whole-string width. Off by default: the historical renderer centers by
    /// the unspaced width, so nonzero tracking drifts right of center.
    pub recenter_tracked_text: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            plaque_width_mm: 210.0,
            plaque_height_mm: 80.0,
            dpi: 300.0,
            primary_font_path: PathBuf::from("PPRightGroteskTextWide-Regular.otf"),
            fallback_font_paths: vec![
                PathBuf::from("bahnschrift.ttf"),
                PathBuf::from("arial.ttf"),
            ],
            size_scale: 1.10,
            org: LineLayout {
                base_size_pt: 100.0,
                color: WHITE,
                center_y_mm: 20.0,
            },
            surname: LineLayout {
                base_size_pt: 160.0,
                color: WHITE,
                center_y_mm: 37.0,
            },
            given: LineLayout {
                base_size_pt: 120.0,
                color: WHITE,
                center_y_mm: 54.0,
            },
            role: LineLayout {
                base_size_pt: 60.0,
                color: WHITE,
                center_y_mm: 72.0,
            },
            left_margin_mm: 12.0,
            right_margin_mm: 12.0,
            tracking_px: 0,
            recenter_tracked_text: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_overlays_defaults() {
        let cfg: LayoutConfig =
            serde_json::from_str(r#"{"dpi": 150.0, "tracking_px": 4}"#).unwrap();
        assert_eq!(cfg.dpi, 150.0);
        assert_eq!(cfg.tracking_px, 4);
        assert_eq!(cfg.plaque_width_mm, 210.0);
        assert_eq!(cfg.surname.base_size_pt, 160.0);
        assert!(!cfg.recenter_tracked_text);
    }

    #[test]
    fn line_layouts_can_be_overridden_individually() {
        let cfg: LayoutConfig = serde_json::from_str(
            r#"{"role": {"base_size_pt": 48.0, "color": [20, 20, 20], "center_y_mm": 70.0}}"#,
        )
        .unwrap();
        assert_eq!(cfg.role.base_size_pt, 48.0);
        assert_eq!(cfg.role.color, [20, 20, 20]);
        assert_eq!(cfg.org.base_size_pt, 100.0);
    }
}
