//! Filename keyword hints
//!
//! Content hints come from the filename stem alone, never from pixels.

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Content categories suggested by a filename
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentHint {
    Screenshot,
    Photo,
    Download,
    Edited,
    Scan,
    Avatar,
    Logo,
    Diagram,
}

/// Keyword table, checked in this order
pub const HINT_PATTERNS: &[(ContentHint, &[&str])] = &[
    (ContentHint::Screenshot, &["screenshot", "screen", "capture", "scr"]),
    (ContentHint::Photo, &["photo", "img", "pic", "picture", "dsc"]),
    (ContentHint::Download, &["download", "temp", "untitled"]),
    (ContentHint::Edited, &["edit", "modified", "copy", "final"]),
    (ContentHint::Scan, &["scan", "document", "doc"]),
    (ContentHint::Avatar, &["avatar", "profile", "headshot"]),
    (ContentHint::Logo, &["logo", "brand", "icon"]),
    (ContentHint::Diagram, &["diagram", "chart", "graph", "flowchart"]),
];

impl ContentHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentHint::Screenshot => "screenshot",
            ContentHint::Photo => "photo",
            ContentHint::Download => "download",
            ContentHint::Edited => "edited",
            ContentHint::Scan => "scan",
            ContentHint::Avatar => "avatar",
            ContentHint::Logo => "logo",
            ContentHint::Diagram => "diagram",
        }
    }
}

impl fmt::Display for ContentHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Match a lower-cased stem against the keyword table
pub fn filename_hints(stem: &str) -> Vec<ContentHint> {
    HINT_PATTERNS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|keyword| stem.contains(keyword)))
        .map(|(hint, _)| *hint)
        .collect()
}

/// Hints for a file path (extension dropped, stem lower-cased)
pub fn hints_for_path(path: &Path) -> Vec<ContentHint> {
    let stem = path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_lowercase();
    filename_hints(&stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_hints() {
        assert!(filename_hints("vacation_2024").is_empty());
    }

    #[test]
    fn test_multiple_hints_in_table_order() {
        // "copy" (edited) appears before "screenshot" in the name
        let hints = filename_hints("copy of screenshot");
        assert_eq!(hints, vec![ContentHint::Screenshot, ContentHint::Edited]);
    }

    #[test]
    fn test_substring_match() {
        assert_eq!(filename_hints("img_2345"), vec![ContentHint::Photo]);
        // "description" contains "scr"
        assert_eq!(filename_hints("description"), vec![ContentHint::Screenshot]);
        // "icon" is a logo keyword, "document" a scan keyword
        assert_eq!(
            filename_hints("document_icon"),
            vec![ContentHint::Scan, ContentHint::Logo]
        );
    }

    #[test]
    fn test_each_category_reported_once() {
        let hints = filename_hints("screenshot_screen_capture");
        assert_eq!(hints, vec![ContentHint::Screenshot]);
    }

    #[test]
    fn test_hints_for_path_lowercases_and_drops_extension() {
        let hints = hints_for_path(Path::new("/tmp/Screenshot_2025.PNG"));
        assert_eq!(hints, vec![ContentHint::Screenshot]);

        // Extension is not part of the stem
        assert!(hints_for_path(Path::new("holiday.pic")).is_empty());
    }
}
