use crate::document::{DocumentFormat, RunColor};
use crate::error::SettingsError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Heuristic policy for redmark
///
/// Every phrase, prefix and sentinel the extraction relies on lives here so
/// retuning them never touches control flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub anchors: Anchors,
    pub placeholders: Placeholders,
    pub file_name: FileNameConvention,
    pub red: RedSentinel,
    pub filter: Filter,
    pub report: ReportLayout,
    pub strategies: Strategies,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Anchors {
    /// First-cell phrase of the row naming the table
    pub table_name: String,
    /// First-cell phrase of the row holding the release
    pub release_marker: String,
    /// Regex whose first group is the release, matched over the whole text
    pub release_pattern: String,
    /// Keyword introducing the table name in a prose paragraph
    pub table_name_keyword: String,
}

impl Default for Anchors {
    fn default() -> Self {
        Anchors {
            table_name: "Tabellenname/View".to_string(),
            release_marker: "Releasestand".to_string(),
            release_pattern: r"Stand:\s*([^,]+),".to_string(),
            table_name_keyword: "Wenn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Placeholders {
    pub table_name: String,
    pub release_marker: String,
    pub mapping_name: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Placeholders {
            table_name: "Unknown Table Name".to_string(),
            release_marker: "Unknown Releasestand".to_string(),
            mapping_name: "Unknown Mapping".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileNameConvention {
    pub module_prefix: String,
    pub mapping_prefix: String,
    /// Office writes lock files next to open documents with this prefix
    pub temp_marker: String,
}

impl Default for FileNameConvention {
    fn default() -> Self {
        FileNameConvention {
            module_prefix: "MOD_".to_string(),
            mapping_prefix: "MAP_".to_string(),
            temp_marker: "~$".to_string(),
        }
    }
}

/// Which raw color values count as the red change color.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RedSentinel {
    /// `RRGGBB` values, compared case-insensitively
    pub hex: Vec<String>,
    /// Word 97 `ico` indices; 6 is red in the default palette
    pub palette: Vec<u8>,
}

impl Default for RedSentinel {
    fn default() -> Self {
        RedSentinel {
            hex: vec!["FF0000".to_string()],
            palette: vec![6],
        }
    }
}

impl RedSentinel {
    pub fn is_red(&self, color: &RunColor) -> bool {
        match color {
            RunColor::Auto => false,
            RunColor::Rgb(hex) => self
                .hex
                .iter()
                .any(|candidate| normalize_hex(candidate).eq_ignore_ascii_case(hex)),
            RunColor::Palette(index) => self.palette.contains(index),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Filter {
    /// Change numbers dropped after aggregation, compared case-insensitively
    pub excluded_change_numbers: Vec<String>,
}

impl Default for Filter {
    fn default() -> Self {
        Filter {
            excluded_change_numbers: vec!["Join-Bedingungen".to_string()],
        }
    }
}

impl Filter {
    pub fn excludes(&self, change_number: &str) -> bool {
        self.excluded_change_numbers
            .iter()
            .any(|excluded| excluded.to_lowercase() == change_number.to_lowercase())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportLayout {
    pub data_model_sheet: String,
    pub logic_sheet: String,
    pub headers: [String; 7],
    pub addition_label: String,
    pub removal_label: String,
    pub row_delimiter: String,
}

impl Default for ReportLayout {
    fn default() -> Self {
        ReportLayout {
            data_model_sheet: "Datenmodelländerungen".to_string(),
            logic_sheet: "Logikänderungen".to_string(),
            headers: [
                "Tabellenname".to_string(),
                "Feldname".to_string(),
                "Änderung".to_string(),
                "Releasestand".to_string(),
                "Logik".to_string(),
                "Mappingname".to_string(),
                "Ganze Reihe".to_string(),
            ],
            addition_label: "Neue Logik".to_string(),
            removal_label: "Rückbau Logik".to_string(),
            row_delimiter: " | ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TableNameStrategy {
    AnchorRow,
    PrecedingParagraph,
    LeadingKeyword,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseStrategy {
    AnchorRow,
    Pattern,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StrategyChain {
    pub table_name: Vec<TableNameStrategy>,
    pub release_marker: Vec<ReleaseStrategy>,
}

/// Resolver strategies per format, tried in order until one hits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Strategies {
    pub doc: StrategyChain,
    pub docx: StrategyChain,
}

impl Default for Strategies {
    fn default() -> Self {
        Strategies {
            doc: StrategyChain {
                table_name: vec![
                    TableNameStrategy::AnchorRow,
                    TableNameStrategy::PrecedingParagraph,
                    TableNameStrategy::LeadingKeyword,
                ],
                release_marker: vec![ReleaseStrategy::AnchorRow, ReleaseStrategy::Pattern],
            },
            docx: StrategyChain {
                table_name: vec![TableNameStrategy::AnchorRow],
                release_marker: vec![ReleaseStrategy::AnchorRow],
            },
        }
    }
}

impl Default for StrategyChain {
    fn default() -> Self {
        StrategyChain {
            table_name: vec![TableNameStrategy::AnchorRow],
            release_marker: vec![ReleaseStrategy::AnchorRow],
        }
    }
}

impl Strategies {
    pub fn for_format(&self, format: DocumentFormat) -> &StrategyChain {
        match format {
            DocumentFormat::Doc => &self.doc,
            DocumentFormat::Docx => &self.docx,
        }
    }
}

impl Settings {
    /// Load settings from the config directory, falling back to defaults
    pub fn load() -> Result<Self, SettingsError> {
        if let Some(config_path) = Self::get_config_path() {
            if config_path.exists() {
                return Self::load_from(&config_path);
            }
        }

        Ok(Settings::default())
    }

    /// Load settings from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings: Settings =
            toml::from_str(&content).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.red.hex = settings.red.hex.iter().map(|hex| normalize_hex(hex)).collect();
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to the given file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get the path to the settings file
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("redmark").join("config.toml"))
    }

    /// Write the default settings to `path`, or the config directory
    pub fn init_default(path: Option<&Path>) -> Result<PathBuf, SettingsError> {
        let target = match path {
            Some(path) => path.to_path_buf(),
            None => Self::get_config_path().unwrap_or_else(|| PathBuf::from("redmark.toml")),
        };
        Settings::default().save_to(&target)?;
        Ok(target)
    }

    /// Compile the release marker pattern
    pub fn release_regex(&self) -> Result<Regex, SettingsError> {
        Regex::new(&self.anchors.release_pattern).map_err(|source| SettingsError::Pattern {
            pattern: self.anchors.release_pattern.clone(),
            source,
        })
    }

    fn validate(&self) -> Result<(), SettingsError> {
        self.release_regex()?;
        Ok(())
    }
}

/// Strip a leading `#` and upper-case a hex color
pub fn normalize_hex(hex: &str) -> String {
    hex.trim().trim_start_matches('#').to_ascii_uppercase()
}
