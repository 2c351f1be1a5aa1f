use std::env;
use std::fs;
use std::path::PathBuf;

// Well-known locations of a sans face with Cyrillic coverage. The first
// readable hit becomes the embedded terminal fallback.
const SYSTEM_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn main() {
    // Output font path
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let target_font = out_dir.join("fallback.ttf");

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=FALLBACK_TTF");

    // If already exists (incremental build), skip
    if target_font.exists() {
        return;
    }

    // Allow overriding via env: FALLBACK_TTF
    if let Ok(path) = env::var("FALLBACK_TTF") {
        let src = PathBuf::from(path);
        match fs::copy(&src, &target_font) {
            Ok(_) => return,
            Err(e) => eprintln!("warning: failed to copy FALLBACK_TTF: {e}"),
        }
    }

    for cand in SYSTEM_CANDIDATES {
        if fs::copy(cand, &target_font).is_ok() {
            return;
        }
    }

    panic!(
        "No fallback font found on this system. Set FALLBACK_TTF to a TrueType file readable at build time."
    );
}
