use serde::{Deserialize, Serialize};

/// Extensions offered by the "Add Files" picker when no config overrides them
pub const DEFAULT_CODE_EXTENSIONS: &[&str] = &[
    "py", "js", "html", "css", "ts", "tsx", "jsx", "c", "cpp", "h", "java", "php", "rb", "go",
    "rs", "swift",
];

/// Number of lines shown per file in the preview
pub const DEFAULT_PREVIEW_LINES: usize = 10;

/// User configuration from CodeCollector Config.yaml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(rename = "Collector_Settings", default)]
    pub collector_settings: CollectorSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorSettings {
    /// Lines kept per file in the preview; 0 disables truncation
    #[serde(rename = "Preview Lines", default = "default_preview_lines")]
    pub preview_lines: usize,

    #[serde(rename = "Code Extensions", default = "default_code_extensions")]
    pub code_extensions: Vec<String>,

    #[serde(rename = "Debug Mode", default)]
    pub debug_mode: bool,

    #[serde(rename = "Console Logging", default = "default_console_logging")]
    pub console_logging: bool,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            preview_lines: DEFAULT_PREVIEW_LINES,
            code_extensions: default_code_extensions(),
            debug_mode: false,
            console_logging: true,
        }
    }
}

fn default_preview_lines() -> usize {
    DEFAULT_PREVIEW_LINES
}

fn default_code_extensions() -> Vec<String> {
    DEFAULT_CODE_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_console_logging() -> bool {
    true
}

impl CollectorSettings {
    /// Preview limit as used by the renderer, `None` meaning "no truncation"
    pub fn preview_limit(&self) -> Option<usize> {
        (self.preview_lines > 0).then_some(self.preview_lines)
    }
}
