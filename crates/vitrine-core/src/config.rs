use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub capabilities: CapabilityOverrides,
    #[serde(default)]
    pub menu: MenuConfig,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub header: HeaderConfig,
    #[serde(default)]
    pub number: NumberConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (inquiry log, TUI log file)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Timing constants for the reveal and counter animations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Visible fraction at which a reveal target counts as seen
    #[serde(default = "default_reveal_threshold")]
    pub reveal_threshold: f64,
    /// Visible fraction at which a counter starts animating
    #[serde(default = "default_counter_threshold")]
    pub counter_threshold: f64,
    /// Per-position stagger step within a batch
    #[serde(default = "default_stagger_step")]
    pub stagger_step_ms: u64,
    /// Upper bound on any stagger delay
    #[serde(default = "default_stagger_cap")]
    pub stagger_cap_ms: u64,
    /// Transition duration applied to every revealed element
    #[serde(default = "default_reveal_duration")]
    pub reveal_duration_ms: u64,
    /// Count-up duration
    #[serde(default = "default_counter_duration")]
    pub counter_duration_ms: u64,
    /// Count-up curve
    #[serde(default = "default_counter_easing")]
    pub counter_easing: EasingType,
    /// Frame rate the host drives animations at
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            reveal_threshold: default_reveal_threshold(),
            counter_threshold: default_counter_threshold(),
            stagger_step_ms: default_stagger_step(),
            stagger_cap_ms: default_stagger_cap(),
            reveal_duration_ms: default_reveal_duration(),
            counter_duration_ms: default_counter_duration(),
            counter_easing: default_counter_easing(),
            animation_fps: default_animation_fps(),
        }
    }
}

/// Forced capability values. `None` means "ask the environment".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapabilityOverrides {
    #[serde(default)]
    pub reduced_motion: Option<bool>,
    #[serde(default)]
    pub fine_pointer: Option<bool>,
    #[serde(default)]
    pub observer_supported: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuConfig {
    /// Viewport width above which the mobile menu is forced closed
    #[serde(default = "default_breakpoint")]
    pub breakpoint_px: u32,
    /// Logical pixels per terminal column
    #[serde(default = "default_cell_width")]
    pub cell_width_px: u32,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: default_breakpoint(),
            cell_width_px: default_cell_width(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    /// Name of the free-text field that carries the project brief
    #[serde(default = "default_brief_field")]
    pub brief_field: String,
    /// Minimum trimmed length of the brief, in characters
    #[serde(default = "default_min_brief_chars")]
    pub min_brief_chars: usize,
    #[serde(default = "default_required_message")]
    pub required_message: String,
    #[serde(default = "default_brief_message")]
    pub brief_message: String,
    #[serde(default = "default_success_message")]
    pub success_message: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            brief_field: default_brief_field(),
            min_brief_chars: default_min_brief_chars(),
            required_message: default_required_message(),
            brief_message: default_brief_message(),
            success_message: default_success_message(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderConfig {
    /// Scroll offset beyond which the header is marked as scrolled
    #[serde(default = "default_scrolled_threshold")]
    pub scrolled_threshold_px: u32,
    /// Logical pixels per terminal line
    #[serde(default = "default_line_height")]
    pub line_height_px: u32,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            scrolled_threshold_px: default_scrolled_threshold(),
            line_height_px: default_line_height(),
        }
    }
}

/// Separators used when formatting counter values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberConfig {
    #[serde(default = "default_group_separator")]
    pub group_separator: String,
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,
}

impl Default for NumberConfig {
    fn default() -> Self {
        Self {
            group_separator: default_group_separator(),
            decimal_separator: default_decimal_separator(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds while idle
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Theme configuration
    #[serde(default)]
    pub theme: ThemeConfig,
    /// Smooth scrolling of the preview viewport
    #[serde(default)]
    pub scroll: ScrollConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            theme: ThemeConfig::default(),
            scroll: ScrollConfig::default(),
        }
    }
}

/// Easing curve selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EasingType {
    /// Jump straight to the end
    None,
    Linear,
    /// 1 - (1-t)^3
    #[default]
    Cubic,
    /// 1 - (1-t)^5
    Quintic,
    /// Exponential ease-out
    EaseOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    #[serde(default = "default_scroll_duration")]
    pub animation_duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    /// Lines moved per step when smooth scrolling is off
    #[serde(default = "default_scroll_lines")]
    pub scroll_lines: u16,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_scroll_duration(),
            easing: EasingType::default(),
            scroll_lines: default_scroll_lines(),
        }
    }
}

/// Theme configuration
/// Can be specified as a simple string (theme name) or as a full struct with overrides
#[derive(Debug, Clone, Serialize)]
pub struct ThemeConfig {
    /// Theme name (e.g., "gruvbox-dark", "nord")
    pub name: String,
    /// Optional color overrides for semantic colors
    pub colors: ThemeColorOverrides,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: default_theme_name(),
            colors: ThemeColorOverrides::default(),
        }
    }
}

// Accept either a bare theme name or a table with 'name' and 'colors'
impl<'de> Deserialize<'de> for ThemeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, Visitor};
        use std::fmt;

        struct ThemeConfigVisitor;

        impl<'de> Visitor<'de> for ThemeConfigVisitor {
            type Value = ThemeConfig;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string (theme name) or a map with 'name' and optional 'colors'")
            }

            fn visit_str<E>(self, value: &str) -> Result<ThemeConfig, E>
            where
                E: de::Error,
            {
                Ok(ThemeConfig {
                    name: value.to_string(),
                    colors: ThemeColorOverrides::default(),
                })
            }

            fn visit_map<M>(self, mut map: M) -> Result<ThemeConfig, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut name: Option<String> = None;
                let mut colors: Option<ThemeColorOverrides> = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "name" => name = Some(map.next_value()?),
                        "colors" => colors = Some(map.next_value()?),
                        _ => {
                            let _: serde::de::IgnoredAny = map.next_value()?;
                        }
                    }
                }

                Ok(ThemeConfig {
                    name: name.unwrap_or_else(default_theme_name),
                    colors: colors.unwrap_or_default(),
                })
            }
        }

        deserializer.deserialize_any(ThemeConfigVisitor)
    }
}

fn default_theme_name() -> String {
    "gruvbox-dark".to_string()
}

/// Optional color overrides; each value is a hex string ("#ff0000" or "ff0000")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeColorOverrides {
    pub bg0: Option<String>,
    pub bg1: Option<String>,
    pub fg0: Option<String>,
    pub fg1: Option<String>,
    pub accent: Option<String>,
    pub muted: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vitrine")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_reveal_threshold() -> f64 {
    0.18
}

fn default_counter_threshold() -> f64 {
    0.4
}

fn default_stagger_step() -> u64 {
    60
}

fn default_stagger_cap() -> u64 {
    150
}

fn default_reveal_duration() -> u64 {
    200
}

fn default_counter_duration() -> u64 {
    900
}

fn default_counter_easing() -> EasingType {
    EasingType::Cubic
}

fn default_animation_fps() -> u32 {
    60
}

fn default_breakpoint() -> u32 {
    896
}

fn default_cell_width() -> u32 {
    8
}

fn default_brief_field() -> String {
    "project".to_string()
}

fn default_min_brief_chars() -> usize {
    20
}

fn default_required_message() -> String {
    "Please complete all required fields.".to_string()
}

fn default_brief_message() -> String {
    "Please add a little more detail in your project brief.".to_string()
}

fn default_success_message() -> String {
    "Thank you. Your message has been captured.".to_string()
}

fn default_scrolled_threshold() -> u32 {
    8
}

fn default_line_height() -> u32 {
    16
}

fn default_group_separator() -> String {
    ",".to_string()
}

fn default_decimal_separator() -> String {
    ".".to_string()
}

fn default_tick_rate() -> u64 {
    100
}

fn default_scroll_duration() -> u64 {
    150
}

fn default_scroll_lines() -> u16 {
    1
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path; a missing file yields defaults
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/vitrine/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("vitrine")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Path of the append-only inquiry log
    pub fn inquiry_log_path(&self) -> PathBuf {
        self.data_dir().join("inquiries.jsonl")
    }

    /// Path of the log file used while the terminal preview owns the screen
    pub fn log_file_path(&self) -> PathBuf {
        self.data_dir().join("vitrine.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_page_constants() {
        let config = AppConfig::default();
        assert_eq!(config.motion.stagger_step_ms, 60);
        assert_eq!(config.motion.stagger_cap_ms, 150);
        assert_eq!(config.motion.reveal_duration_ms, 200);
        assert_eq!(config.motion.counter_duration_ms, 900);
        assert_eq!(config.motion.counter_easing, EasingType::Cubic);
        assert_eq!(config.menu.breakpoint_px, 896);
        assert_eq!(config.form.min_brief_chars, 20);
        assert_eq!(config.form.brief_field, "project");
        assert_eq!(config.header.scrolled_threshold_px, 8);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [motion]
            stagger_cap_ms = 90

            [ui]
            theme = "nord"
            "#,
        )
        .unwrap();
        assert_eq!(config.motion.stagger_cap_ms, 90);
        assert_eq!(config.motion.stagger_step_ms, 60);
        assert_eq!(config.ui.theme.name, "nord");
        assert!(config.capabilities.reduced_motion.is_none());
    }

    #[test]
    fn test_theme_table_form() {
        let config: AppConfig = toml::from_str(
            r##"
            [ui.theme]
            name = "dracula"
            colors = { accent = "#ff0000" }
            "##,
        )
        .unwrap();
        assert_eq!(config.ui.theme.name, "dracula");
        assert_eq!(config.ui.theme.colors.accent.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_easing_names() {
        let scroll: ScrollConfig = toml::from_str(r#"easing = "easeout""#).unwrap();
        assert_eq!(scroll.easing, EasingType::EaseOut);
        let scroll: ScrollConfig = toml::from_str(r#"easing = "quintic""#).unwrap();
        assert_eq!(scroll.easing, EasingType::Quintic);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.capabilities.reduced_motion = Some(true);
        config.form.min_brief_chars = 32;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.capabilities.reduced_motion, Some(true));
        assert_eq!(loaded.form.min_brief_chars, 32);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.motion.reveal_threshold, 0.18);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[motion\nbroken").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(crate::Error::Config(_))
        ));
    }
}
