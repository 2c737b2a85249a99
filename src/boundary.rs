use clap::ValueEnum;
use serde::Deserialize;

use crate::error::StripError;

/// Where a section ends once its start marker has been seen.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndCondition {
    /// Track `<tag` / `</tag>` balance and stop on a separator line once the
    /// section's root element has closed back down to `release_depth`.
    Depth {
        separator: String,
        #[serde(default = "default_tag")]
        tag: String,
        #[serde(default)]
        release_depth: i32,
    },
    /// Stop right before the first line containing this marker.
    NextMarker(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Boundary {
    pub start: String,
    pub end: EndCondition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Policy {
    /// Balance markup tags and stop at the separator line
    Depth,
    /// Stop at the next section's marker
    NextMarker,
}

const SEPARATOR: &str = "═══";

fn default_tag() -> String {
    "div".to_string()
}

// (start marker, next marker) pairs for the knowledge-base landing page
const KNOWLEDGE_BASE_SECTIONS: [(&str, &str); 5] = [
    ("SECTION 2: PROBLEM", "SECTION 3: SOLUTION"),
    ("SECTION 3: SOLUTION", "SECTION 4: PROOF"),
    ("SECTION 4: PROOF", "SECTION 5: CTA"),
    ("SECTION 5: CTA", "Theme Colors"),
    ("Theme Colors & Footer", "Policies Section"),
];

impl Boundary {
    pub fn depth(start: &str, separator: &str) -> Self {
        Self {
            start: start.to_string(),
            end: EndCondition::Depth {
                separator: separator.to_string(),
                tag: default_tag(),
                release_depth: 0,
            },
        }
    }

    pub fn next_marker(start: &str, marker: &str) -> Self {
        Self {
            start: start.to_string(),
            end: EndCondition::NextMarker(marker.to_string()),
        }
    }
}

#[must_use]
pub fn with_policy(policy: Policy) -> Vec<Boundary> {
    KNOWLEDGE_BASE_SECTIONS
        .iter()
        .map(|(start, next)| match policy {
            Policy::Depth => Boundary::depth(start, SEPARATOR),
            Policy::NextMarker => Boundary::next_marker(start, next),
        })
        .collect()
}

pub fn validate(boundaries: &[Boundary]) -> Result<(), StripError> {
    for boundary in boundaries {
        if boundary.start.is_empty() {
            return Err(StripError::InvalidBoundary(
                "start marker must not be empty".to_string(),
            ));
        }
        let empty_end = match &boundary.end {
            EndCondition::Depth { separator, tag, .. } => separator.is_empty() || tag.is_empty(),
            EndCondition::NextMarker(marker) => marker.is_empty(),
        };
        if empty_end {
            return Err(StripError::InvalidBoundary(format!(
                "end condition of `{}` has an empty marker",
                boundary.start
            )));
        }
    }
    Ok(())
}
