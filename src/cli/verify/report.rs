//! Verification report types and formatting.

use std::collections::BTreeMap;
use std::fmt;

use owo_colors::OwoColorize;

use crate::utils::plural_s;

/// Problems fail `verify`; warnings are printed but never fail it.
#[derive(Debug, Default)]
pub struct VerifyReport {
    /// Problems grouped by file (or check name).
    pub problems: BTreeMap<String, Vec<String>>,
    pub warnings: BTreeMap<String, Vec<String>>,
    /// Pages found in the output directory.
    pub pages: usize,
}

impl VerifyReport {
    pub fn add_problem(&mut self, source: impl Into<String>, message: impl Into<String>) {
        self.problems.entry(source.into()).or_default().push(message.into());
    }

    pub fn add_warning(&mut self, source: impl Into<String>, message: impl Into<String>) {
        self.warnings.entry(source.into()).or_default().push(message.into());
    }

    pub fn problem_count(&self) -> usize {
        self.problems.values().map(Vec::len).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.values().map(Vec::len).sum()
    }

    /// Print the full report to stderr (warnings -> problems).
    pub fn print(&self) {
        print_section("warnings", &self.warnings, false);
        print_section("problems", &self.problems, true);
    }

    /// All messages recorded for `source`, problems first.
    #[cfg(test)]
    pub fn messages(&self, source: &str) -> Vec<&str> {
        self.problems
            .get(source)
            .into_iter()
            .chain(self.warnings.get(source))
            .flatten()
            .map(String::as_str)
            .collect()
    }
}

fn print_section(name: &str, entries: &BTreeMap<String, Vec<String>>, is_error: bool) {
    if entries.is_empty() {
        return;
    }
    eprintln!();

    let count: usize = entries.values().map(Vec::len).sum();
    let header = format!("({} file{}, {count})", entries.len(), plural_s(entries.len()));
    if is_error {
        eprintln!("{} {}", name.red().bold(), header.dimmed());
    } else {
        eprintln!("{} {}", name.magenta().bold(), header.dimmed());
    }

    for (source, messages) in entries {
        eprintln!("{}{}{}", "[".dimmed(), source.cyan(), "]".dimmed());
        for message in messages {
            if is_error {
                eprintln!("{} {}", "→".red(), message);
            } else {
                eprintln!("{} {}", "→".magenta(), message);
            }
        }
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let problems = self.problem_count();
        let warnings = self.warning_count();

        if problems == 0 && warnings == 0 {
            write!(f, "{}", "all checks passed".green())
        } else {
            write!(
                f,
                "{} problem{}, {} warning{}",
                problems,
                plural_s(problems),
                warnings,
                plural_s(warnings)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut report = VerifyReport::default();
        report.add_problem("dist/index.html", "missing canonical");
        report.add_problem("dist/index.html", "missing <title>");
        report.add_warning("dist/about/index.html", "description is 40 characters");

        assert_eq!(report.problem_count(), 2);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.problems.len(), 1);
        assert_eq!(report.to_string(), "2 problems, 1 warning");
    }

    #[test]
    fn test_messages() {
        let mut report = VerifyReport::default();
        report.add_warning("robots.txt", "b");
        report.add_problem("robots.txt", "a");
        assert_eq!(report.messages("robots.txt"), ["a", "b"]);
        assert!(report.messages("sitemap.xml").is_empty());
    }
}
