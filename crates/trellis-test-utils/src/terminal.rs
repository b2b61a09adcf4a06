use anyhow::Result;
use similar::{ChangeTag, TextDiff};

/// Compares rendered screens while ignoring styling and trailing blanks
pub struct TerminalComparator;

impl Default for TerminalComparator {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalComparator {
    pub fn new() -> Self {
        Self
    }

    /// Compare two screens, failing with a line diff when they differ
    pub fn compare_output(&self, expected: &str, actual: &str) -> Result<()> {
        let expected = self.normalize_output(expected);
        let actual = self.normalize_output(actual);
        if expected == actual {
            return Ok(());
        }

        let diff = TextDiff::from_lines(&expected, &actual);
        let mut rendered = String::new();
        for change in diff.iter_all_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => '-',
                ChangeTag::Insert => '+',
                ChangeTag::Equal => ' ',
            };
            rendered.push(sign);
            rendered.push_str(change.value().trim_end_matches('\n'));
            rendered.push('\n');
        }

        anyhow::bail!("Screen mismatch:\n{rendered}")
    }

    /// Compare row by row, reporting the first differing row
    pub fn compare_lines(&self, expected: &[&str], actual: &[String]) -> Result<()> {
        anyhow::ensure!(
            expected.len() == actual.len(),
            "Expected {} rows, got {}",
            expected.len(),
            actual.len()
        );

        let rows = expected.iter().zip(actual).enumerate();
        for (row, (want, got)) in rows {
            let (want, got) = (self.normalize_line(want), self.normalize_line(got));
            anyhow::ensure!(want == got, "Row {row} differs:\n  expected: {want:?}\n  actual:   {got:?}");
        }
        Ok(())
    }

    /// Strip escapes and trailing whitespace, and drop trailing empty lines
    pub fn normalize_output(&self, output: &str) -> String {
        let mut lines: Vec<String> = output.lines().map(|line| self.normalize_line(line)).collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }

    fn normalize_line(&self, line: &str) -> String {
        let stripped = strip_ansi_escapes::strip(line);
        let clean = String::from_utf8_lossy(&stripped);
        clean.trim_end().to_string()
    }

    /// Fail unless `haystack` contains `needle`, both normalised
    pub fn assert_contains(&self, haystack: &str, needle: &str) -> Result<()> {
        let haystack = self.normalize_output(haystack);
        let needle = self.normalize_output(needle);
        anyhow::ensure!(
            haystack.contains(&needle),
            "Output does not contain {needle:?}:\n{haystack}"
        );
        Ok(())
    }
}
