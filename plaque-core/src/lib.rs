//! Core rendering library for the `plaque` batch tool.
//!
//! One component does the work: [`PlaqueRenderer`]. It consumes a
//! [`PlaqueRequest`] (the text fields of one spreadsheet row plus file
//! paths) together with an immutable [`LayoutConfig`] and writes one
//! print-resolution PNG: the background stretched to the plaque
//! dimensions with four auto-fitted text lines composited on top.
//!
//! ```no_run
//! use plaque_core::{LayoutConfig, PlaqueRenderer, PlaqueRequest};
//!
//! let renderer = PlaqueRenderer::new(LayoutConfig::default());
//! renderer.render_plate(&PlaqueRequest {
//!     full_name: "Петров Сергей Ильич".into(),
//!     organization: "ООО РОМАШКА".into(),
//!     role: "Директор".into(),
//!     background_image: "background.jpg".into(),
//!     output_path: "out/img/000_plate.png".into(),
//! })?;
//! # Ok::<(), plaque_core::RenderError>(())
//! ```

pub mod config;
pub mod error;
pub mod render;
pub mod text;

pub use config::{LayoutConfig, LineLayout};
pub use error::{RenderError, Result};
pub use render::PlaqueRenderer;
pub use text::{FontResolver, SizedFont, measure_text};

use std::path::PathBuf;

/// One unit of work: the text fields of a single spreadsheet row plus the
/// background to draw on and the file to write. Read-only once constructed.
#[derive(Clone, Debug)]
pub struct PlaqueRequest {
    pub full_name: String,
    pub organization: String,
    pub role: String,
    pub background_image: PathBuf,
    pub output_path: PathBuf,
}

/// Nearest-integer pixel count for a physical length at the given raster
/// resolution.
pub fn mm_to_px(mm: f64, dpi: f64) -> i32 {
    (mm * dpi / 25.4).round() as i32
}

/// Split a raw full name into the surname line and the given/patronymic
/// line, both uppercased: token 0 is the surname, the remaining tokens are
/// joined by single spaces.
pub fn split_full_name(raw: &str) -> (String, String) {
    let mut tokens = raw.split_whitespace();
    let Some(surname) = tokens.next() else {
        return (String::new(), String::new());
    };
    let rest = tokens.collect::<Vec<_>>().join(" ");
    (surname.to_uppercase(), rest.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mm_to_px_matches_print_resolutions() {
        assert_eq!(mm_to_px(25.4, 300.0), 300);
        assert_eq!(mm_to_px(0.0, 300.0), 0);
        assert_eq!(mm_to_px(0.0, 72.0), 0);
        // the default 210×80 mm plaque at 300 DPI
        assert_eq!(mm_to_px(210.0, 300.0), 2480);
        assert_eq!(mm_to_px(80.0, 300.0), 945);
    }

    #[test]
    fn full_name_splits_into_surname_and_given_lines() {
        assert_eq!(
            split_full_name("Иванов Иван Иванович"),
            ("ИВАНОВ".to_string(), "ИВАН ИВАНОВИЧ".to_string())
        );
        assert_eq!(
            split_full_name("Иванов"),
            ("ИВАНОВ".to_string(), String::new())
        );
        assert_eq!(split_full_name(""), (String::new(), String::new()));
        assert_eq!(split_full_name("  \t "), (String::new(), String::new()));
    }

    #[test]
    fn full_name_splitting_collapses_repeated_whitespace() {
        assert_eq!(
            split_full_name("  Петров   Сергей  Ильич "),
            ("ПЕТРОВ".to_string(), "СЕРГЕЙ ИЛЬИЧ".to_string())
        );
    }
}
