// src/constants.rs

/// The name of the manifest file that marks a folder as a tiny-game workspace.
pub const PROJECT_FILENAME: &str = "project.tiny";

/// The name of the settings file (inside ~/.config/tinypanel/).
pub const SETTINGS_FILENAME: &str = "settings.toml";

/// Template repository the `create` wizard clones from when the user has not
/// configured one.
pub const DEFAULT_TEMPLATE_REPO: &str = "https://git.tinyfun.studio/tinyfun/tiny-game-kit.git";

/// Basename of the UI bundle shipped by the template project.
pub const TEMPLATE_UI_BUNDLE: &str = "tiny-game-kit";
