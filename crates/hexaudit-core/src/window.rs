//! Context-window extraction around code findings.

use std::path::Path;

use tracing::warn;

use crate::types::{AnalysisReport, AnnotatedFinding, AnnotatedReport, Window, WindowLine};

/// Default number of context lines shown above and below a flagged range.
pub const DEFAULT_PAD: usize = 5;

/// Extracts padded windows of source lines for display next to findings.
pub struct SnippetWindowExtractor {
    pad: usize,
}

impl Default for SnippetWindowExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_PAD)
    }
}

impl SnippetWindowExtractor {
    /// Creates an extractor with the given padding.
    #[must_use]
    pub fn new(pad: usize) -> Self {
        Self { pad }
    }

    /// Loads `path` and returns the padded window around the range.
    ///
    /// If the file cannot be read (missing, renamed, permission) the
    /// window degrades to a single empty line numbered 1; the finding
    /// itself must still be shown, only its display context degrades.
    #[must_use]
    pub fn window(&self, path: &Path, start_line: usize, end_line: usize) -> Window {
        match std::fs::read_to_string(path) {
            Ok(content) => self.window_of(&content, start_line, end_line),
            Err(e) => {
                warn!("window extraction degraded for {}: {e}", path.display());
                placeholder_window()
            }
        }
    }

    /// Pure window computation over already-loaded content.
    ///
    /// Clamps the range into the file, then returns the 1-indexed lines
    /// `max(1, start - pad) ..= min(line_count, end + pad)` with their
    /// line numbers. Same inputs always yield the same window.
    #[must_use]
    pub fn window_of(&self, content: &str, start_line: usize, end_line: usize) -> Window {
        let lines: Vec<&str> = content.lines().collect();
        if lines.is_empty() {
            return placeholder_window();
        }

        let count = lines.len();
        let start = start_line.max(1).min(count);
        let end = end_line.clamp(start, count);
        let first = start.saturating_sub(self.pad).max(1);
        let last = (end + self.pad).min(count);

        (first..=last)
            .map(|n| WindowLine {
                line_number: n,
                text: lines[n - 1].to_string(),
            })
            .collect()
    }

    /// Decorates every code finding of a report with its window.
    ///
    /// A cheap sequential post-pass; each extraction is independent.
    #[must_use]
    pub fn annotate(&self, root: &Path, report: &AnalysisReport) -> AnnotatedReport {
        let code_findings = report
            .code_findings
            .iter()
            .map(|finding| {
                let lines = match (&finding.filepath, finding.start_line, finding.end_line) {
                    (Some(path), Some(start), Some(end)) => {
                        self.window(&root.join(path), start, end)
                    }
                    _ => placeholder_window(),
                };
                AnnotatedFinding {
                    finding: finding.clone(),
                    lines,
                }
            })
            .collect();

        AnnotatedReport {
            titles: report.titles.clone(),
            code_findings,
            project_findings: report.project_findings.clone(),
        }
    }
}

fn placeholder_window() -> Window {
    vec![WindowLine {
        line_number: 1,
        text: String::new(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Finding, FindingKind};

    fn numbered_file(lines: usize) -> String {
        (1..=lines).map(|n| format!("line{n}\n")).collect()
    }

    #[test]
    fn pads_around_the_flagged_range() {
        // 10-line file, range 5..=5, pad 2 -> lines 3..=7 inclusive.
        let window = SnippetWindowExtractor::new(2).window_of(&numbered_file(10), 5, 5);

        let numbers: Vec<usize> = window.iter().map(|l| l.line_number).collect();
        assert_eq!(numbers, vec![3, 4, 5, 6, 7]);
        assert_eq!(window[0].text, "line3");
        assert_eq!(window[4].text, "line7");
    }

    #[test]
    fn clamps_to_file_bounds() {
        // 3-line file, range 1..=1, pad 5 -> the whole file, nothing
        // negative or out of range.
        let window = SnippetWindowExtractor::new(5).window_of(&numbered_file(3), 1, 1);

        let numbers: Vec<usize> = window.iter().map(|l| l.line_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn extraction_is_pure() {
        let content = numbered_file(10);
        let extractor = SnippetWindowExtractor::new(2);
        assert_eq!(
            extractor.window_of(&content, 5, 6),
            extractor.window_of(&content, 5, 6)
        );
    }

    #[test]
    fn out_of_range_start_is_clamped() {
        let window = SnippetWindowExtractor::new(0).window_of(&numbered_file(4), 0, 99);
        let numbers: Vec<usize> = window.iter().map(|l| l.line_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn empty_content_degrades_to_placeholder() {
        let window = SnippetWindowExtractor::default().window_of("", 1, 1);
        assert_eq!(window, vec![WindowLine { line_number: 1, text: String::new() }]);
    }

    #[test]
    fn unreadable_file_degrades_to_placeholder() {
        let dir = tempfile::tempdir().expect("tempdir");
        let window =
            SnippetWindowExtractor::default().window(&dir.path().join("missing.py"), 3, 4);
        assert_eq!(window, vec![WindowLine { line_number: 1, text: String::new() }]);
    }

    #[test]
    fn annotate_keeps_findings_and_attaches_windows() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("a.py"), numbered_file(10)).expect("write");

        let report = AnalysisReport {
            titles: vec!["Logging".to_string()],
            code_findings: vec![
                Finding::code(FindingKind::Logging, 5, 5, "print used").with_filepath("a.py"),
                Finding::code(FindingKind::Logging, 1, 1, "gone").with_filepath("missing.py"),
            ],
            project_findings: vec![],
        };

        let annotated = SnippetWindowExtractor::new(2).annotate(dir.path(), &report);
        assert_eq!(annotated.code_findings.len(), 2);
        assert_eq!(annotated.code_findings[0].lines.len(), 5);
        // The finding over an unreadable file is retained with a
        // placeholder window.
        assert_eq!(annotated.code_findings[1].lines.len(), 1);
        assert_eq!(annotated.code_findings[1].lines[0].line_number, 1);
    }
}
