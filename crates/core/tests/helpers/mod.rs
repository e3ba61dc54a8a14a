//! Fixture loading and outline helpers for pipeline integration tests.

use umlgen_core::render::StyledDocument;
use umlgen_core::types::StyledRun;
use umlgen_core::UmlGenerator;

/// Read a source fixture from `tests/fixtures`.
pub fn fixture(name: &str) -> String {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Fixture '{name}' not readable at {}: {e}", path.display()))
}

/// Outline `code` with the default configuration.
pub fn outline(code: &str) -> StyledDocument {
    UmlGenerator::default().outline(code)
}

/// Run texts without their trailing newline, for compact assertions.
pub fn lines(doc: &StyledDocument) -> Vec<String> {
    doc.runs().iter().map(|r| r.text.trim_end_matches('\n').to_string()).collect()
}

pub fn run<'a>(doc: &'a StyledDocument, text: &str) -> &'a StyledRun {
    doc.runs()
        .iter()
        .find(|r| r.text.trim_end_matches('\n') == text)
        .unwrap_or_else(|| panic!("No run '{text}' in outline:\n{}", doc.text()))
}
