//! umlgen — turn loosely C-family class source into a UML-style outline.
//!
//! The pipeline is heuristic and line based: no grammar is validated, malformed
//! input yields a partial outline rather than an error.
//!
//! # Modules
//!
//! - [`preprocess`] — Strip localized filler words and comments
//! - [`classify`] — Line classification and brace-depth body stripping
//! - [`header`] — Class name and `abstract` flag from the first class line
//! - [`format`] — Field/method formatting and accessor stereotypes
//! - [`render`] — Output sink contract and styled-run renderer
//! - [`present`] — Plain, ANSI, HTML and JSON presentation of runs
//! - [`types`] — Core types shared across the crate

pub mod classify;
pub mod format;
pub mod header;
pub mod present;
pub mod preprocess;
pub mod render;
pub mod types;

use std::path::Path;

use tracing::{debug, warn};

use render::{OutputSink, StyledDocument};
use types::*;

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// One configured transformation. Holds no per-call state, so a single
/// generator can serve any number of sequential or concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct UmlGenerator {
    config: UmlConfig,
}

impl UmlGenerator {
    pub fn new(config: UmlConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &UmlConfig {
        &self.config
    }

    /// Classify the cleaned input without formatting it.
    pub fn classify(&self, code: &str) -> Classification {
        let cleaned = preprocess::preprocess(code, self.config.strip_localized);
        classify::classify(&cleaned, &self.config)
    }

    /// Clear `sink`, then write the class header, fields and methods of `code`.
    pub fn translate(&self, code: &str, sink: &mut dyn OutputSink) {
        sink.clear();

        let cleaned = preprocess::preprocess(code, self.config.strip_localized);
        let header = header::extract_class_header(&cleaned);
        let classification = classify::classify(&cleaned, &self.config);
        let fields = format::format_fields(&classification.fields, &classification.accessors);
        let methods = format::format_methods(&classification.methods, &self.config);

        debug!(
            class = header.as_ref().map(|h| h.name.as_str()),
            fields = fields.len(),
            methods = methods.len(),
            "Outline built"
        );

        render::render(
            header.as_ref(),
            &fields,
            &methods,
            self.config.show_parameters,
            sink,
        );
    }

    /// Convenience wrapper rendering into a fresh [`StyledDocument`].
    pub fn outline(&self, code: &str) -> StyledDocument {
        let mut doc = StyledDocument::new();
        self.translate(code, &mut doc);
        doc
    }
}

/// Translate with the default configuration.
pub fn translate(code: &str, sink: &mut dyn OutputSink) {
    UmlGenerator::default().translate(code, sink);
}

// ---------------------------------------------------------------------------
// .umlgen.toml config loading
// ---------------------------------------------------------------------------

pub const CONFIG_FILE_NAME: &str = ".umlgen.toml";

/// Known keys in `.umlgen.toml` for config validation.
const KNOWN_CONFIG_KEYS: &[&str] = &[
    "skip_markers",
    "method_modifiers",
    "empty_return_types",
    "strip_localized",
    "show_parameters",
];

/// Simple Levenshtein edit distance for typo suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn string_array(table: &toml::Table, key: &str) -> Option<Vec<String>> {
    table
        .get(key)
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect()
        })
}

/// Merge a parsed `.umlgen.toml` table into the defaults.
///
/// `skip_markers` and `method_modifiers` extend the defaults;
/// `empty_return_types` replaces them. Unknown keys trigger a warning with a
/// typo suggestion.
pub fn apply_config_table(config: &mut UmlConfig, table: &toml::Table) {
    for key in table.keys() {
        if KNOWN_CONFIG_KEYS.contains(&key.as_str()) {
            continue;
        }
        let suggestion = KNOWN_CONFIG_KEYS.iter().min_by_key(|k| edit_distance(key, k));
        match suggestion {
            Some(s) if edit_distance(key, s) <= 3 => warn!(
                key = key.as_str(),
                suggestion = *s,
                "Unknown key in {CONFIG_FILE_NAME} — did you mean '{s}'?"
            ),
            _ => warn!(
                key = key.as_str(),
                "Unknown key in {CONFIG_FILE_NAME} (known keys: {})",
                KNOWN_CONFIG_KEYS.join(", ")
            ),
        }
    }

    if let Some(markers) = string_array(table, "skip_markers") {
        config.skip_markers.extend(markers);
    }
    if let Some(modifiers) = string_array(table, "method_modifiers") {
        config.method_modifiers.extend(modifiers);
    }
    if let Some(types) = string_array(table, "empty_return_types") {
        config.empty_return_types = types.into_iter().collect();
    }
    if let Some(strip) = table.get("strip_localized").and_then(|v| v.as_bool()) {
        config.strip_localized = strip;
    }
    if let Some(show) = table.get("show_parameters").and_then(|v| v.as_bool()) {
        config.show_parameters = show;
    }
}

/// Load an explicitly requested config file. Unreadable or unparsable files are errors.
pub fn load_config_file(path: &Path) -> Result<UmlConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Could not read {}: {e}", path.display()))?;
    let table: toml::Table = content
        .parse()
        .map_err(|e| format!("Could not parse {}: {e}", path.display()))?;
    let mut config = UmlConfig::default();
    apply_config_table(&mut config, &table);
    debug!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Load `.umlgen.toml` from `dir`.
///
/// Returns defaults when the file doesn't exist. A file that can't be read or
/// parsed yields defaults with a warning.
pub fn load_umlgen_config(dir: &Path) -> UmlConfig {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return UmlConfig::default();
    }
    match load_config_file(&config_path) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Ignoring {CONFIG_FILE_NAME}");
            UmlConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("skip_marker", "skip_markers"), 1);
        assert_eq!(edit_distance("abc", "abc"), 0);
    }

    #[test]
    fn test_apply_config_table_merges() {
        let table: toml::Table = r#"
            skip_markers = ["[Inject]"]
            method_modifiers = ["unsafe"]
            empty_return_types = ["void", "Unit"]
            strip_localized = false
            show_parameters = true
            shw_parameters = true
        "#
        .parse()
        .unwrap();
        let mut config = UmlConfig::default();
        apply_config_table(&mut config, &table);

        assert!(config.skip_markers.contains("[Inject]"));
        assert!(
            config.skip_markers.contains("using "),
            "defaults must survive the merge"
        );
        assert!(config.method_modifiers.contains("unsafe"));
        assert!(config.method_modifiers.contains("virtual"));
        assert_eq!(config.empty_return_types.len(), 2);
        assert!(!config.strip_localized);
        assert!(config.show_parameters);
    }

    #[test]
    fn test_missing_config_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_umlgen_config(dir.path());
        assert!(config.strip_localized);
        assert!(!config.show_parameters);
    }

    #[test]
    fn test_config_file_loaded_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "show_parameters = true\n",
        )
        .unwrap();
        assert!(load_umlgen_config(dir.path()).show_parameters);
    }

    #[test]
    fn test_broken_config_falls_back_or_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "show_parameters = [").unwrap();
        assert!(!load_umlgen_config(dir.path()).show_parameters);
        let err = load_config_file(&path).unwrap_err();
        assert!(err.contains("Could not parse"), "got {err}");
    }

    #[test]
    fn test_translate_clears_sink_first() {
        let mut doc = StyledDocument::new();
        doc.append_plain("stale\n");
        translate("private int x;", &mut doc);
        assert_eq!(doc.text(), "- x: int\n");
    }
}
