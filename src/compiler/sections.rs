//! Mode section splitting
//!
//! A mode file is divided by headers: a name on its own line followed by a
//! rule of at least five dash or double-line characters.
//!
//! ```text
//! Play                 ← double rule: the mode's own code, i.e. `init`
//! ════════════
//! let score = 0
//!
//! frame
//! ────────────
//! draw()
//! ```

use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SECTION_NAME: Regex =
        Regex::new(r"^[ \t]*([A-Za-z][A-Za-z_0-9]*)[ \t]*$").expect("section name pattern");
    static ref SECTION_RULE: Regex =
        Regex::new(r"^[ \t]*([-─—━⎯=═⚌]{5,})[ \t]*$").expect("section rule pattern");
}

/// Rule characters that mark the mode's own section
const DOUBLE_RULE_CHARS: &str = "=═⚌";

/// The four lifecycle sections of a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionName {
    Init,
    Enter,
    Leave,
    Frame,
}

impl SectionName {
    pub const ALL: [SectionName; 4] = [
        SectionName::Init,
        SectionName::Enter,
        SectionName::Leave,
        SectionName::Frame,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionName::Init => "init",
            SectionName::Enter => "enter",
            SectionName::Leave => "leave",
            SectionName::Frame => "frame",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        SectionName::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

/// Source text of one section and where it sits in its file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub source: String,
    /// Number of file lines before the section's first line
    pub offset: usize,
}

impl Section {
    pub fn is_blank(&self) -> bool {
        self.source.trim().is_empty()
    }
}

/// The Mode Section Table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionTable {
    sections: [Section; 4],
    explicit: [bool; 4],
}

impl SectionTable {
    fn index(name: SectionName) -> usize {
        name as usize
    }

    pub fn get(&self, name: SectionName) -> &Section {
        &self.sections[Self::index(name)]
    }

    /// Sections in emission order with their names
    pub fn iter(&self) -> impl Iterator<Item = (SectionName, &Section)> {
        SectionName::ALL.into_iter().map(move |name| (name, self.get(name)))
    }

    fn insert(&mut self, name: SectionName, section: Section, line: usize) -> Result<()> {
        let i = Self::index(name);
        if self.explicit[i] {
            return Err(Error::syntax(
                line,
                format!("Duplicate \"{}\" section", name.as_str()),
            ));
        }
        self.explicit[i] = true;
        self.sections[i] = section;
        Ok(())
    }
}

struct Header {
    /// 0-based index of the name line
    index: usize,
    name: String,
    double: bool,
}

fn header_at(lines: &[&str], index: usize) -> Option<Header> {
    let name = SECTION_NAME.captures(lines.get(index)?)?.get(1)?.as_str();
    let rule = SECTION_RULE.captures(lines.get(index + 1)?)?.get(1)?.as_str();

    Some(Header {
        index,
        name: name.to_string(),
        double: rule.chars().next().map_or(false, |c| DOUBLE_RULE_CHARS.contains(c)),
    })
}

/// Splits a mode file into its sections
///
/// A file without headers is entirely `frame`. Diagnostics carry file line
/// numbers.
pub fn split_sections(text: &str) -> Result<SectionTable> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut table = SectionTable::default();

    let mut headers = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        match header_at(&lines, i) {
            Some(header) => {
                i = header.index + 2;
                headers.push(header);
            }
            None => i += 1,
        }
    }

    let Some(first) = headers.first() else {
        tracing::warn!("mode has no section headers; compiling it all as frame");
        table.sections[SectionTable::index(SectionName::Frame)] = Section {
            source: text.to_string(),
            offset: 0,
        };
        return Ok(table);
    };

    if let Some(stray) = lines[..first.index].iter().position(|l| !l.trim().is_empty()) {
        return Err(Error::syntax(
            stray + 1,
            "Code must appear inside a section",
        ));
    }

    for (k, header) in headers.iter().enumerate() {
        let body_start = header.index + 2;
        let body_end = headers.get(k + 1).map_or(lines.len(), |next| next.index);

        if body_end == body_start && k + 1 < headers.len() {
            return Err(Error::syntax(
                body_end + 1,
                "There must be at least one line between sections.",
            ));
        }

        let name = if header.double {
            SectionName::Init
        } else {
            SectionName::parse(&header.name).ok_or_else(|| {
                Error::syntax(
                    header.index + 1,
                    format!("Illegal section name: \"{}\"", header.name),
                )
            })?
        };

        tracing::trace!(section = name.as_str(), offset = body_start, "section");
        table.insert(
            name,
            Section {
                source: lines[body_start..body_end].join("\n"),
                offset: body_start,
            },
            header.index + 1,
        )?;
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsectioned_file_is_frame() {
        let table = split_sections("x = 1\ny = 2").unwrap();
        assert_eq!(table.get(SectionName::Frame).source, "x = 1\ny = 2");
        assert!(table.get(SectionName::Init).is_blank());
        assert!(table.get(SectionName::Enter).is_blank());
        assert!(table.get(SectionName::Leave).is_blank());
    }

    #[test]
    fn test_sections_and_offsets() {
        let text = "Play\n═════\nlet s = 0\n\nframe\n-----\ndraw()\nupdate()";
        let table = split_sections(text).unwrap();
        assert_eq!(
            table.get(SectionName::Init),
            &Section {
                source: "let s = 0\n".to_string(),
                offset: 2
            }
        );
        assert_eq!(
            table.get(SectionName::Frame),
            &Section {
                source: "draw()\nupdate()".to_string(),
                offset: 6
            }
        );
    }

    #[test]
    fn test_header_patterns() {
        assert!(SECTION_NAME.is_match("  frame "));
        assert!(!SECTION_NAME.is_match("draw()"));
        for rule in ["-----", "═══════", "⚌⚌⚌⚌⚌", " ───── "] {
            assert!(SECTION_RULE.is_match(rule), "{}", rule);
        }
        assert!(!SECTION_RULE.is_match("----"));
    }

    #[test]
    fn test_illegal_section_name() {
        assert_eq!(
            split_sections("draw\n-----\nx()").unwrap_err(),
            Error::syntax(1, "Illegal section name: \"draw\"")
        );
    }

    #[test]
    fn test_sections_need_a_line_between_them() {
        assert_eq!(
            split_sections("enter\n-----\nframe\n-----\nx()").unwrap_err(),
            Error::syntax(3, "There must be at least one line between sections.")
        );
    }

    #[test]
    fn test_duplicate_and_stray_code() {
        assert!(split_sections("frame\n-----\na()\nframe\n-----\nb()").is_err());
        assert_eq!(
            split_sections("x = 1\nframe\n-----\na()").unwrap_err(),
            Error::syntax(1, "Code must appear inside a section")
        );
    }
}
