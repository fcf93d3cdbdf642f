//! Test fixture loading utilities

use std::path::PathBuf;

use bibfront_core::Settings;

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Path of a BibTeX fixture
pub fn bibtex_fixture(name: &str) -> PathBuf {
    fixture_path(&format!("bibtex/{}", name))
}

/// The sample settings, mirroring a typical site setup
pub fn sample_settings() -> Settings {
    Settings::load(fixture_path("config/bibfront.toml"))
        .unwrap_or_else(|e| panic!("Failed to load sample settings: {}", e))
}
