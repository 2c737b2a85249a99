use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;

use crate::{
    boundary::{self, Boundary, EndCondition},
    error::StripError,
};

lazy_static! {
    static ref DIV_TAGS: TagCounter = TagCounter::compile("div").unwrap();
}

#[derive(Clone)]
struct TagCounter {
    open: Regex,
    close: Regex,
}

impl TagCounter {
    fn compile(tag: &str) -> Result<Self, regex::Error> {
        let tag = regex::escape(tag);
        Ok(Self {
            open: Regex::new(&format!(r"<{tag}(?:[\s>/]|$)"))?,
            close: Regex::new(&format!(r"</{tag}\s*>"))?,
        })
    }

    fn for_tag(tag: &str) -> Result<Self, StripError> {
        if tag == "div" {
            return Ok(DIV_TAGS.clone());
        }
        Self::compile(tag).map_err(|e| StripError::InvalidBoundary(e.to_string()))
    }

    /// Returns (opening tags, closing tags) found on the line.
    fn count(&self, line: &str) -> (usize, usize) {
        (
            self.open.find_iter(line).count(),
            self.close.find_iter(line).count(),
        )
    }
}

enum End<'b> {
    Depth {
        separator: &'b str,
        tags: TagCounter,
        release_depth: i32,
    },
    NextMarker(&'b str),
}

/// A boundary with its tag patterns compiled, ready for scanning.
pub struct Matcher<'b> {
    start: &'b str,
    end: End<'b>,
}

impl<'b> Matcher<'b> {
    fn new(boundary: &'b Boundary) -> Result<Self, StripError> {
        let end = match &boundary.end {
            EndCondition::Depth {
                separator,
                tag,
                release_depth,
            } => End::Depth {
                separator,
                tags: TagCounter::for_tag(tag)?,
                release_depth: *release_depth,
            },
            EndCondition::NextMarker(marker) => End::NextMarker(marker),
        };
        Ok(Self {
            start: &boundary.start,
            end,
        })
    }
}

pub fn compile(boundaries: &[Boundary]) -> Result<Vec<Matcher<'_>>, StripError> {
    boundary::validate(boundaries)?;
    boundaries.iter().map(Matcher::new).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Keeping,
    Skipping {
        boundary: usize,
        depth: i32,
        entered: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanState {
    pub mode: Mode,
    last_matched: Option<usize>,
    sections_opened: usize,
}

impl Default for ScanState {
    fn default() -> Self {
        Self {
            mode: Mode::Keeping,
            last_matched: None,
            sections_opened: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Keep,
    Discard,
}

fn find_start(table: &[Matcher], line: &str) -> Option<usize> {
    table.iter().position(|m| line.contains(m.start))
}

/// Advance the scan by one line, returning the next state and what to do
/// with the line. `line_no` is 1-based and only used for error reporting.
pub fn step(
    state: ScanState,
    line_no: usize,
    line: &str,
    table: &[Matcher],
) -> Result<(ScanState, Decision), StripError> {
    let Mode::Skipping {
        boundary,
        depth,
        entered,
    } = state.mode
    else {
        let Some(index) = find_start(table, line) else {
            return Ok((state, Decision::Keep));
        };
        if let Some(last) = state.last_matched.filter(|&last| index < last) {
            return Err(StripError::OutOfOrder {
                line: line_no,
                found: table[index].start.to_string(),
                after: table[last].start.to_string(),
            });
        }
        let next = ScanState {
            mode: Mode::Skipping {
                boundary: index,
                depth: 0,
                entered: false,
            },
            last_matched: Some(index),
            sections_opened: state.sections_opened + 1,
        };
        return Ok((next, Decision::Discard));
    };

    let active = &table[boundary];

    // the next section's marker ends this one, so it is not an intrusion
    if let End::NextMarker(marker) = &active.end {
        if line.contains(*marker) {
            let released = ScanState {
                mode: Mode::Keeping,
                ..state
            };
            return step(released, line_no, line, table);
        }
    }

    if let Some(found) = find_start(table, line) {
        return Err(StripError::MalformedInput {
            line: line_no,
            found: table[found].start.to_string(),
            open: active.start.to_string(),
        });
    }

    match &active.end {
        End::NextMarker(_) => Ok((state, Decision::Discard)),
        End::Depth {
            separator,
            tags,
            release_depth,
        } => {
            let (opened, closed) = tags.count(line);
            let depth = depth + opened as i32 - closed as i32;
            let entered = entered || opened > 0;

            let mode = if entered && depth <= *release_depth && line.contains(*separator) {
                Mode::Keeping
            } else {
                Mode::Skipping {
                    boundary,
                    depth,
                    entered,
                }
            };
            Ok((ScanState { mode, ..state }, Decision::Discard))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReport {
    pub start: String,
    /// 1-based line of the start marker.
    pub line: usize,
    pub removed: usize,
    /// The end condition never matched, so the document tail was removed.
    pub open_ended: bool,
}

#[derive(Debug)]
pub struct StripOutcome<'a> {
    pub kept: Vec<&'a str>,
    pub sections: Vec<SectionReport>,
    pub original: usize,
}

impl StripOutcome<'_> {
    #[must_use]
    pub fn removed(&self) -> usize {
        self.sections.iter().map(|s| s.removed).sum()
    }

    #[must_use]
    pub fn content(&self) -> String {
        self.kept.concat()
    }
}

/// Remove every configured section from `lines`, leaving all other lines
/// untouched and in order.
pub fn strip_sections<'a>(
    lines: &[&'a str],
    boundaries: &[Boundary],
) -> Result<StripOutcome<'a>, StripError> {
    let table = compile(boundaries)?;
    let mut state = ScanState::default();
    let mut kept = Vec::with_capacity(lines.len());
    let mut sections: Vec<SectionReport> = Vec::new();

    for (index, &line) in lines.iter().enumerate() {
        let line_no = index + 1;
        let (next, decision) = step(state, line_no, line, &table)?;

        if next.sections_opened > state.sections_opened {
            if let Mode::Skipping { boundary, .. } = next.mode {
                debug!("line {line_no}: opening section `{}`", table[boundary].start);
                sections.push(SectionReport {
                    start: table[boundary].start.to_string(),
                    line: line_no,
                    removed: 0,
                    open_ended: false,
                });
            }
        } else if matches!(state.mode, Mode::Skipping { .. }) && next.mode == Mode::Keeping {
            debug!("line {line_no}: section closed");
        }

        match decision {
            Decision::Keep => kept.push(line),
            Decision::Discard => {
                if let Some(section) = sections.last_mut() {
                    section.removed += 1;
                }
            }
        }
        state = next;
    }

    if let (Mode::Skipping { .. }, Some(section)) = (state.mode, sections.last_mut()) {
        warn!(
            "section `{}` starting at line {} never ended; removed everything to end of file",
            section.start, section.line
        );
        section.open_ended = true;
    }

    Ok(StripOutcome {
        kept,
        sections,
        original: lines.len(),
    })
}
