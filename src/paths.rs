//! Input and output path selection
//!
//! Pipelines never open dialogs or read the console themselves; they ask a
//! [`PathProvider`]. `None` means the user made no selection, which ends the
//! run normally.

use crate::Result;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Source of the paths a pipeline works on
pub trait PathProvider {
    /// Pick the CSV to process
    fn select_input(&mut self, title: &str) -> Result<Option<PathBuf>>;

    /// Pick where the text report is written
    fn select_report_output(&mut self, title: &str) -> Result<Option<PathBuf>>;
}

/// Paths fixed up front, from command-line arguments or tests
#[derive(Debug, Clone, Default)]
pub struct FixedPaths {
    input: Option<PathBuf>,
    report: Option<PathBuf>,
}

impl FixedPaths {
    pub fn new(input: Option<PathBuf>, report: Option<PathBuf>) -> Self {
        Self { input, report }
    }

    pub fn input(path: impl Into<PathBuf>) -> Self {
        Self::new(Some(path.into()), None)
    }

    pub fn with_report(mut self, path: impl Into<PathBuf>) -> Self {
        self.report = Some(path.into());
        self
    }
}

impl PathProvider for FixedPaths {
    fn select_input(&mut self, _title: &str) -> Result<Option<PathBuf>> {
        Ok(self.input.clone())
    }

    fn select_report_output(&mut self, _title: &str) -> Result<Option<PathBuf>> {
        Ok(self.report.clone())
    }
}

/// Answers from `primary`, asking `fallback` for whatever it leaves open
#[derive(Debug, Clone)]
pub struct WithFallback<A, B> {
    primary: A,
    fallback: B,
}

impl<A: PathProvider, B: PathProvider> WithFallback<A, B> {
    pub fn new(primary: A, fallback: B) -> Self {
        Self { primary, fallback }
    }
}

impl<A: PathProvider, B: PathProvider> PathProvider for WithFallback<A, B> {
    fn select_input(&mut self, title: &str) -> Result<Option<PathBuf>> {
        match self.primary.select_input(title)? {
            Some(path) => Ok(Some(path)),
            None => self.fallback.select_input(title),
        }
    }

    fn select_report_output(&mut self, title: &str) -> Result<Option<PathBuf>> {
        match self.primary.select_report_output(title)? {
            Some(path) => Ok(Some(path)),
            None => self.fallback.select_report_output(title),
        }
    }
}

/// Interactive console prompt; an empty line is no selection
#[derive(Debug)]
pub struct PromptPaths<R, W> {
    reader: R,
    writer: W,
}

impl PromptPaths<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr and read answers from stdin
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

/// `path` with a `.txt` extension when it has none
pub fn with_report_extension(mut path: PathBuf) -> PathBuf {
    if path.extension().is_none() {
        path.set_extension("txt");
    }
    path
}

impl<R: BufRead, W: Write> PromptPaths<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    fn ask(&mut self, title: &str) -> Result<Option<PathBuf>> {
        write!(self.writer, "{title}: ")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let answer = line.trim().trim_matches('"');
        if answer.is_empty() {
            Ok(None)
        } else {
            Ok(Some(PathBuf::from(answer)))
        }
    }
}

impl<R: BufRead, W: Write> PathProvider for PromptPaths<R, W> {
    fn select_input(&mut self, title: &str) -> Result<Option<PathBuf>> {
        self.ask(title)
    }

    /// A name without an extension gets `.txt`
    fn select_report_output(&mut self, title: &str) -> Result<Option<PathBuf>> {
        Ok(self.ask(title)?.map(with_report_extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_fixed_paths() {
        let mut paths = FixedPaths::input("subject.csv").with_report("out/report.txt");
        assert_eq!(paths.select_input("ignored").unwrap(), Some(PathBuf::from("subject.csv")));
        assert_eq!(
            paths.select_report_output("ignored").unwrap(),
            Some(PathBuf::from("out/report.txt"))
        );
        assert_eq!(FixedPaths::default().select_input("x").unwrap(), None);
    }

    #[test]
    fn test_prompt_reads_one_answer_per_question() {
        let input = Cursor::new("  \"data/a file.csv\"  \nresults\n");
        let mut prompt_out = Vec::new();
        let mut paths = PromptPaths::new(input, &mut prompt_out);

        assert_eq!(
            paths.select_input("Select CSV file").unwrap(),
            Some(PathBuf::from("data/a file.csv"))
        );
        assert_eq!(
            paths.select_report_output("Save results as").unwrap(),
            Some(PathBuf::from("results.txt"))
        );
        drop(paths);
        assert_eq!(
            String::from_utf8(prompt_out).unwrap(),
            "Select CSV file: Save results as: "
        );
    }

    #[test]
    fn test_fallback_only_asks_for_missing_paths() {
        let prompt = PromptPaths::new(Cursor::new("report\n"), Vec::new());
        let mut paths = WithFallback::new(FixedPaths::input("data.csv"), prompt);

        assert_eq!(paths.select_input("Select the data file").unwrap(), Some(PathBuf::from("data.csv")));
        assert_eq!(
            paths.select_report_output("Save results as").unwrap(),
            Some(PathBuf::from("report.txt"))
        );
    }

    #[test]
    fn test_prompt_empty_line_and_eof_are_no_selection() {
        let mut paths = PromptPaths::new(Cursor::new("\n"), Vec::new());
        assert_eq!(paths.select_input("Select CSV file").unwrap(), None);
        assert_eq!(paths.select_input("Select CSV file").unwrap(), None);
    }
}
