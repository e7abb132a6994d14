//! Built-in defaults for flags and settings.

/// Organization scanned when none is given.
pub const DEFAULT_ORGANIZATION: &str = "GTNewHorizons";

/// Release branch compared against when none is given.
pub const DEFAULT_RELEASE_BRANCH: &str = "release/2.7.x";

/// Start date used when none is given.
pub const DEFAULT_START_DATE: &str = "2024-12-08";

/// Repositories that are not shipped as part of a release.
pub const EXCLUDED_REPOSITORIES: &[&str] = &[
    "DreamAssemblerXXL",
    "GT-New-Horizons-Modpack",
    "GTNH-Translations",
    "RetroFuturaGradle",
    "GTNHGradle",
    "Twist-Space-Technology-Mod",
    "GTNH-Web-Map",
    "CustomGTCapeHook-Cape-List",
    "JustEnoughCalculation",
    "GTNHIssueHelper",
    "StructureLib",
    "worldedit-gtnh",
];

/// Title fragments of pull requests that never need reporting, such as
/// automated formatting PRs.
pub const EXCLUDED_PR_TITLES: &[&str] = &["Spotless apply for branch"];

/// Status check every protected release branch must pass.
pub const DEFAULT_REQUIRED_STATUS_CHECK: &str = "build-and-test / build-and-test";
