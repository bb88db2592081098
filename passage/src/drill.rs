use std::path::{Path, PathBuf};

use derive_more::From;
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use thiserror::Error;

#[derive(Debug, From, Error)]
pub enum DrillError {
    #[error("Failed to read drill '{path}': {error}")]
    #[from(skip)]
    ReadFile { path: PathBuf, error: std::io::Error },

    #[error("Failed to parse drill: {0}")]
    ParseFile(toml::de::Error),

    #[error("Event {index} at {at_ms}ms happens before the previous event at {previous_ms}ms")]
    #[from(skip)]
    TimeTravel {
        index: usize,
        at_ms: u64,
        previous_ms: u64,
    },
}

/// An article to practice on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Opaque identity, a new id replaces the session
    pub id: String,
    pub paragraphs: Vec<String>,
}

/// One scripted host event
///
/// Every event carries the milliseconds since the replay started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Event {
    /// The input surface of `segment` now holds `value`
    Input {
        segment: usize,
        value: String,
        at_ms: u64,
    },
    /// The input surface moved its selection start
    Select { offset: usize, at_ms: u64 },
    /// The user clicked outside the active input
    Pointer { at_ms: u64 },
    /// The host's live clock fired
    Tick { at_ms: u64 },
    /// The user asked to start over
    Reset { at_ms: u64 },
    /// A (possibly identical) article was loaded
    Load {
        id: String,
        paragraphs: Vec<String>,
        at_ms: u64,
    },
}

impl Event {
    pub const fn at_ms(&self) -> u64 {
        match self {
            Self::Input { at_ms, .. }
            | Self::Select { at_ms, .. }
            | Self::Pointer { at_ms }
            | Self::Tick { at_ms }
            | Self::Reset { at_ms }
            | Self::Load { at_ms, .. } => *at_ms,
        }
    }

    /// Short name used in traces
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

/// An article plus the events to replay against it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drill {
    pub article: Article,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Drill {
    /// Read a drill from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, DrillError> {
        let content = read(path)?;
        Self::parse(&content)
    }

    /// Parse a drill and check its events are in chronological order
    pub fn parse(content: &str) -> Result<Self, DrillError> {
        let drill: Self = toml::from_str(content)?;

        let mut previous_ms = 0;
        for (index, event) in drill.events.iter().enumerate() {
            let at_ms = event.at_ms();
            if at_ms < previous_ms {
                return Err(DrillError::TimeTravel {
                    index,
                    at_ms,
                    previous_ms,
                });
            }
            previous_ms = at_ms;
        }

        Ok(drill)
    }
}

/// Read an article from a plain text file
///
/// Paragraphs are separated by blank lines. Lines within a paragraph are joined with a
/// single space.
pub fn article_from_text(path: &Path) -> Result<Article, DrillError> {
    let content = read(path)?;
    let id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Article {
        id,
        paragraphs: split_paragraphs(&content),
    })
}

fn split_paragraphs(content: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }

    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs
}

fn read(path: &Path) -> Result<String, DrillError> {
    std::fs::read_to_string(path).map_err(|error| DrillError::ReadFile {
        path: path.to_path_buf(),
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRILL: &str = r#"
[article]
id = "fox"
paragraphs = ["The fox.", "", "It jumps!"]

[[events]]
kind = "input"
segment = 0
value = "thefox"
at_ms = 0

[[events]]
kind = "tick"
at_ms = 1000

[[events]]
kind = "load"
id = "fox"
paragraphs = ["The fox.", "It jumps!"]
at_ms = 1500
"#;

    #[test]
    fn test_parse_drill() {
        let drill = Drill::parse(DRILL).unwrap();

        assert_eq!(drill.article.id, "fox");
        assert_eq!(drill.article.paragraphs.len(), 3);
        assert_eq!(drill.events.len(), 3);
        assert_eq!(
            drill.events[0],
            Event::Input {
                segment: 0,
                value: "thefox".to_string(),
                at_ms: 0
            }
        );
        assert_eq!(drill.events[1].kind(), "tick");
        assert_eq!(drill.events[2].at_ms(), 1500);
    }

    #[test]
    fn test_events_are_optional() {
        let drill = Drill::parse("[article]\nid = \"a\"\nparagraphs = []\n").unwrap();
        assert!(drill.events.is_empty());
    }

    #[test]
    fn test_events_must_be_chronological() {
        let content = r#"
[article]
id = "a"
paragraphs = ["a"]

[[events]]
kind = "tick"
at_ms = 500

[[events]]
kind = "pointer"
at_ms = 200
"#;

        let error = Drill::parse(content).unwrap_err();
        assert!(matches!(
            error,
            DrillError::TimeTravel {
                index: 1,
                at_ms: 200,
                previous_ms: 500
            }
        ));
    }

    #[test]
    fn test_unknown_event_kind() {
        let content = r#"
[article]
id = "a"
paragraphs = ["a"]

[[events]]
kind = "teleport"
at_ms = 0
"#;

        assert!(matches!(
            Drill::parse(content),
            Err(DrillError::ParseFile(_))
        ));
    }

    #[test]
    fn test_split_paragraphs() {
        let content = "First line\nstill first\n\n\n  Second  \n\nThird";

        assert_eq!(
            split_paragraphs(content),
            vec!["First line still first", "Second", "Third"]
        );
        assert!(split_paragraphs("\n\n").is_empty());
    }

    #[test]
    fn test_missing_file() {
        let error = Drill::from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(error, DrillError::ReadFile { .. }));
    }
}
