//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// `vibe-arena 0.1.0 (abc1234 2026-01-01)`
pub fn version_string() -> String {
    format!(
        "vibe-arena {} ({} {})",
        env!("CARGO_PKG_VERSION"),
        BUILD_COMMIT,
        BUILD_DATE
    )
}
