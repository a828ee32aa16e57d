//! Fixed entries of a scaffolded project root.

use std::path::Path;

/// Files and directories the scaffolder manages at the project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaffoldPath {
    /// `index.php`, the web entry bootstrap (regenerated on every install)
    Index,
    /// `wp-config.php`, the config bootstrap (regenerated on every install)
    Config,
    /// `.build-script`, user-owned once created
    BuildScript,
    /// `.gitignore`, user-owned once created
    GitIgnore,
    /// `content`
    ContentDir,
    /// `content/plugins`
    PluginsDir,
    /// `content/themes`
    ThemesDir,
}

impl ScaffoldPath {
    /// The bootstrap files copied from the template directory, in install order.
    pub const TEMPLATES: [ScaffoldPath; 3] = [Self::Index, Self::Config, Self::BuildScript];

    /// The content directories, parents first.
    pub const CONTENT_DIRS: [ScaffoldPath; 3] =
        [Self::ContentDir, Self::PluginsDir, Self::ThemesDir];

    /// Get the root-relative path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Index => "index.php",
            Self::Config => "wp-config.php",
            Self::BuildScript => ".build-script",
            Self::GitIgnore => ".gitignore",
            Self::ContentDir => "content",
            Self::PluginsDir => "content/plugins",
            Self::ThemesDir => "content/themes",
        }
    }

    /// Whether an existing copy at the destination must be left alone.
    pub fn is_user_owned(&self) -> bool {
        !matches!(self, Self::Index | Self::Config)
    }
}

impl AsRef<Path> for ScaffoldPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for ScaffoldPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ScaffoldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
