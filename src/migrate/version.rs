//! Legacy version tag to Composer constraint translation.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Prefix of a Drupal 8-era contrib version (`8.x-1.5`).
pub const LEGACY_MARKER: &str = "8.x-";

fn prerelease_suffix() -> &'static Regex {
    static PRERELEASE: OnceLock<Regex> = OnceLock::new();
    PRERELEASE.get_or_init(|| Regex::new(r"-(alpha|beta)\d+").expect("valid pre-release pattern"))
}

/// A legacy version and the constraint it translates to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    /// Version as declared in the module's info file.
    pub raw: String,
    /// Composer constraint.
    pub constraint: String,
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.constraint)
    }
}

/// Translates a legacy version tag into a Composer constraint.
///
/// `8.x-` becomes `^` and a `-alphaN` / `-betaN` suffix becomes the
/// `@alpha` / `@beta` stability flag. Versions without the legacy marker
/// are returned unchanged.
#[must_use]
pub fn translate(legacy: &str) -> VersionConstraint {
    let constraint = if legacy.contains(LEGACY_MARKER) {
        let caret = legacy.replace(LEGACY_MARKER, "^");
        prerelease_suffix().replace(&caret, "@$1").into_owned()
    } else {
        legacy.to_string()
    };
    VersionConstraint { raw: legacy.to_string(), constraint }
}
