//! Terminal-fallback font embedded at build time.
//!
//! `build.rs` locates a TrueType face (env override first, then well-known
//! system paths) and copies it into `OUT_DIR`; the bytes are compiled into
//! the binary so font resolution never depends on the runtime filesystem.

/// Raw bytes of the embedded TrueType face.
pub static FONT_BYTES: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/fallback.ttf"));
