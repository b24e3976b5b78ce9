//! Folder reference parsing.

use crate::storage::blob::FolderId;
use once_cell::sync::Lazy;
use regex::Regex;

static FOLDER_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"folders/([^/?#&]+)").expect("valid folder path regex"));
static ID_PARAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[?&]id=([^&#]+)").expect("valid id param regex"));
static BARE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("valid bare id regex"));

/// Extracts a folder id from a share URL or a bare id.
///
/// Accepted shapes:
/// - `https://host/drive/folders/<id>?usp=sharing`
/// - `https://host/open?id=<id>&x=y`
/// - `<id>`
///
/// Returns `None` for blank or unrecognised input.
pub fn extract_folder_id(input: &str) -> Option<FolderId> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let captured = FOLDER_PATH_RE
        .captures(input)
        .or_else(|| ID_PARAM_RE.captures(input))
        .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()));
    if let Some(id) = captured {
        return Some(FolderId::new(id));
    }

    if BARE_ID_RE.is_match(input) && input != "." && input != ".." {
        return Some(FolderId::new(input));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::extract_folder_id;

    #[test]
    fn extracts_id_from_folder_url() {
        let id = extract_folder_id("https://drive.example.com/drive/folders/abc_123?usp=sharing")
            .expect("folder url should parse");
        assert_eq!(id.as_str(), "abc_123");
    }

    #[test]
    fn extracts_id_from_query_parameter() {
        let id = extract_folder_id("https://drive.example.com/open?id=XyZ-9&authuser=0")
            .expect("id param should parse");
        assert_eq!(id.as_str(), "XyZ-9");
    }

    #[test]
    fn accepts_bare_id_and_rejects_garbage() {
        assert_eq!(
            extract_folder_id("  quotes  ").map(|id| id.as_str().to_string()),
            Some("quotes".to_string())
        );
        assert!(extract_folder_id("   ").is_none());
        assert!(extract_folder_id("https://example.com/nothing here").is_none());
        assert!(extract_folder_id("..").is_none());
    }
}
