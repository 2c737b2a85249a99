use std::fmt;

use console::Style;
use similar::{ChangeTag, TextDiff};

struct LineNo(Option<usize>);

// layout follows similar's terminal-inline example

impl fmt::Display for LineNo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            None => write!(f, "    "),
            Some(idx) => write!(f, "{:<4}", idx + 1),
        }
    }
}

/// Render a coloured line diff of `old` against `new`, three lines of context
/// per hunk. Empty when nothing changed.
#[must_use]
pub fn render(old: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut out = String::new();

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            out.push_str(&format!("{:-^1$}\n", "-", 80));
        }
        for op in group {
            for change in diff.iter_inline_changes(op) {
                let (sign, s) = match change.tag() {
                    ChangeTag::Delete => ("-", Style::new().red()),
                    ChangeTag::Insert => ("+", Style::new().green()),
                    ChangeTag::Equal => (" ", Style::new().dim()),
                };
                out.push_str(&format!(
                    "{}{} |{}",
                    s.apply_to(LineNo(change.old_index())).dim(),
                    s.apply_to(LineNo(change.new_index())).dim(),
                    s.apply_to(sign).bold(),
                ));
                for (emphasized, value) in change.iter_strings_lossy() {
                    if emphasized {
                        out.push_str(&s.apply_to(value).underlined().on_black().to_string());
                    } else {
                        out.push_str(&s.apply_to(value).to_string());
                    }
                }
                if change.missing_newline() {
                    out.push('\n');
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn unchanged_content_renders_nothing() {
        assert_eq!(render("a\nb\n", "a\nb\n"), "");
    }

    #[test]
    fn removed_lines_are_marked() {
        let old = indoc! {"
            keep
            {/* SECTION 2: PROBLEM */}
            <div>gone</div>
            tail
        "};
        let new = "keep\ntail\n";

        let rendered = console::strip_ansi_codes(&render(old, new)).to_string();

        assert!(rendered.contains("|-{/* SECTION 2: PROBLEM */}"));
        assert!(rendered.contains("|-<div>gone</div>"));
        assert!(rendered.contains("| keep"));
        assert!(!rendered.contains("|+"));
    }
}
