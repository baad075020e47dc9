//! Game manifest and source providers

use crate::error::{Error, Result};
use crate::source::{protect_strings, strip_comments, unprotect_strings};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Source identifier used for failures that concern the manifest itself
pub const MANIFEST_ID: &str = "game.json";

/// Extension of mode files named by the short manifest form
pub const MODE_EXTENSION: &str = ".pyx";

lazy_static! {
    static ref TRAILING_COMMA: Regex = Regex::new(r",(\s*[\]}])").expect("trailing comma pattern");
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z][A-Za-z_0-9]*$").expect("identifier pattern");
}

/// Program structure: global scripts and modes, in order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameManifest {
    #[serde(default)]
    pub scripts: Vec<String>,
    #[serde(default)]
    pub modes: Vec<ModeEntry>,
    #[serde(default, rename = "flipY")]
    pub flip_y: bool,
}

/// One entry of the manifest's mode list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModeEntry {
    /// `"Name"`, or `"Name*"` for the start mode
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        source: Option<String>,
        #[serde(default)]
        start: bool,
    },
}

/// A resolved mode: its name, the source that holds its sections, and
/// whether the program starts in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeDescriptor {
    pub name: String,
    pub source: String,
    pub start: bool,
}

impl ModeEntry {
    fn descriptor(&self) -> ModeDescriptor {
        match self {
            ModeEntry::Name(entry) => {
                let (name, start) = match entry.strip_suffix('*') {
                    Some(name) => (name.trim(), true),
                    None => (entry.trim(), false),
                };
                ModeDescriptor {
                    name: name.to_string(),
                    source: format!("{}{}", name, MODE_EXTENSION),
                    start,
                }
            }
            ModeEntry::Full {
                name,
                source,
                start,
            } => ModeDescriptor {
                name: name.clone(),
                source: source
                    .clone()
                    .unwrap_or_else(|| format!("{}{}", name, MODE_EXTENSION)),
                start: *start,
            },
        }
    }
}

impl GameManifest {
    /// Parses the permissive JSON dialect: comments and trailing commas are
    /// accepted outside of strings
    pub fn from_json(text: &str) -> Result<Self> {
        let text = text.replace('\r', "");
        let (protected, map) =
            protect_strings(&text).map_err(|e| Error::ManifestError(e.to_string()))?;
        let stripped = strip_comments(&protected);
        let cleaned = TRAILING_COMMA.replace_all(&stripped, "$1");
        let json = unprotect_strings(&cleaned, &map);

        let manifest: GameManifest =
            serde_json::from_str(&json).map_err(|e| Error::ManifestError(e.to_string()))?;
        if manifest.scripts.is_empty() {
            tracing::warn!("manifest lists no global scripts");
        }
        Ok(manifest)
    }

    /// Resolved modes in manifest order
    pub fn mode_descriptors(&self) -> Result<Vec<ModeDescriptor>> {
        let mut seen = Vec::with_capacity(self.modes.len());
        for entry in &self.modes {
            let mode = entry.descriptor();
            if !IDENTIFIER.is_match(&mode.name) {
                return Err(Error::ManifestError(format!(
                    "Illegal mode name: \"{}\"",
                    mode.name
                )));
            }
            if seen.iter().any(|m: &ModeDescriptor| m.name == mode.name) {
                return Err(Error::ManifestError(format!(
                    "Duplicate mode name: \"{}\"",
                    mode.name
                )));
            }
            seen.push(mode);
        }
        Ok(seen)
    }
}

/// The mode the program starts in
///
/// A lone mode is the start mode even when unflagged; otherwise exactly one
/// mode must carry the flag.
pub fn find_start_mode(modes: &[ModeDescriptor]) -> Result<&ModeDescriptor> {
    if let [only] = modes {
        return Ok(only);
    }

    let mut flagged = modes.iter().filter(|m| m.start);
    match (flagged.next(), flagged.next()) {
        (Some(start), None) => Ok(start),
        (None, _) => Err(Error::source(MANIFEST_ID, "No starting mode defined")),
        (Some(_), Some(_)) => Err(Error::source(
            MANIFEST_ID,
            "More than one starting mode defined",
        )),
    }
}

/// Supplies raw source text by identifier
pub trait SourceProvider {
    fn fetch(&self, id: &str) -> Result<String>;
}

impl SourceProvider for HashMap<String, String> {
    fn fetch(&self, id: &str) -> Result<String> {
        self.get(id)
            .map(|text| text.replace('\r', ""))
            .ok_or_else(|| Error::MissingSource(id.to_string()))
    }
}

/// Reads sources from files under a root directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectorySource { root: root.into() }
    }
}

impl SourceProvider for DirectorySource {
    fn fetch(&self, id: &str) -> Result<String> {
        let path = self.root.join(id);
        tracing::debug!(path = %path.display(), "reading source");
        std::fs::read_to_string(&path)
            .map(|text| text.replace('\r', ""))
            .map_err(|_| Error::MissingSource(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissive_json() {
        let manifest = GameManifest::from_json(
            r#"{
                // globals
                "scripts": ["util.pyx", "http://x/y.pyx",],
                /* modes */
                "modes": ["Title*", {"name": "Play", "source": "play/Play.pyx"},],
                "flipY": true,
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.scripts, vec!["util.pyx", "http://x/y.pyx"]);
        assert!(manifest.flip_y);
        assert_eq!(
            manifest.mode_descriptors().unwrap(),
            vec![
                ModeDescriptor {
                    name: "Title".to_string(),
                    source: "Title.pyx".to_string(),
                    start: true
                },
                ModeDescriptor {
                    name: "Play".to_string(),
                    source: "play/Play.pyx".to_string(),
                    start: false
                },
            ]
        );
    }

    #[test]
    fn test_json_cleanup_patterns() {
        assert_eq!(TRAILING_COMMA.replace_all("[1, 2,\n]", "$1"), "[1, 2\n]");
        assert!(IDENTIFIER.is_match("Title2"));
        assert!(!IDENTIFIER.is_match("2fast"));
    }

    #[test]
    fn test_malformed_manifest() {
        assert!(matches!(
            GameManifest::from_json("{\"scripts\": [}"),
            Err(Error::ManifestError(_))
        ));
        let manifest = GameManifest::from_json(r#"{"modes": ["2fast"]}"#).unwrap();
        assert!(matches!(
            manifest.mode_descriptors(),
            Err(Error::ManifestError(_))
        ));
    }

    #[test]
    fn test_start_mode_selection() {
        let mode = |name: &str, start| ModeDescriptor {
            name: name.to_string(),
            source: format!("{}.pyx", name),
            start,
        };

        let single = vec![mode("Play", false)];
        assert_eq!(find_start_mode(&single).unwrap().name, "Play");

        let flagged = vec![mode("Title", false), mode("Play", true)];
        assert_eq!(find_start_mode(&flagged).unwrap().name, "Play");

        let none = vec![mode("Title", false), mode("Play", false)];
        assert_eq!(
            find_start_mode(&none).unwrap_err(),
            Error::source(MANIFEST_ID, "No starting mode defined")
        );

        let both = vec![mode("Title", true), mode("Play", true)];
        assert!(find_start_mode(&both).is_err());
    }

    #[test]
    fn test_memory_provider() {
        let mut sources = HashMap::new();
        sources.insert("a.pyx".to_string(), "x = 1\r\ny = 2".to_string());
        assert_eq!(sources.fetch("a.pyx").unwrap(), "x = 1\ny = 2");
        assert_eq!(
            sources.fetch("b.pyx").unwrap_err(),
            Error::MissingSource("b.pyx".to_string())
        );
    }
}
