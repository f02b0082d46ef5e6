use log::debug;
use std::rc::Rc;

use crate::console::Console;
use crate::error::{Result, WttError};
use crate::traits::{CommandRunner, CommandSpec, Stdio};

/// fzf's exit status when the user presses ESC or Ctrl-C.
const FZF_CANCELLED: i32 = 130;

/// What the user did with a [`PickList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Index into [`PickList::rows`].
    Chosen(usize),
    Cancelled,
    /// The "clear" sentinel row was picked.
    Cleared,
}

/// Candidates to choose from, each row a list of display columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickList {
    pub prompt: String,
    pub rows: Vec<Vec<String>>,
    /// Label of an extra first entry meaning "none of these".
    pub clear_label: Option<String>,
    /// Message of the [`WttError::NoCandidates`] raised for an empty list.
    pub empty_message: String,
}

impl PickList {
    pub fn new(prompt: impl Into<String>, empty_message: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            rows: Vec::new(),
            clear_label: None,
            empty_message: empty_message.into(),
        }
    }

    #[must_use]
    pub fn row<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row = columns.into_iter().map(Into::into).collect();
        self.rows.push(row);
        self
    }

    #[must_use]
    pub fn with_clear(mut self, label: impl Into<String>) -> Self {
        self.clear_label = Some(label.into());
        self
    }
}

/// Trait for presenting a pick list to the user.
/// This allows us to swap fzf for a numbered prompt, or a canned answer in tests.
pub trait SelectionProvider {
    /// Presents a non-empty list.
    ///
    /// # Errors
    /// Returns [`WttError::Picker`] if the picker fails or the answer is
    /// invalid.
    fn pick(&self, list: &PickList) -> Result<Selection>;

    /// Presents `list`, refusing up front when there is nothing to pick.
    ///
    /// # Errors
    /// Returns [`WttError::NoCandidates`] for an empty list, otherwise
    /// whatever [`SelectionProvider::pick`] returns.
    fn select(&self, list: &PickList) -> Result<Selection> {
        if list.rows.is_empty() {
            return Err(WttError::NoCandidates(list.empty_message.clone()));
        }
        self.pick(list)
    }
}

/// Interactive fuzzy picker backed by the `fzf` binary.
pub struct FzfPicker {
    runner: Rc<dyn CommandRunner>,
    program: String,
}

impl FzfPicker {
    pub fn new(runner: Rc<dyn CommandRunner>, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    fn feed(list: &PickList) -> String {
        let mut input = String::new();
        if let Some(label) = &list.clear_label {
            input.push_str(&format!("-1\t{label}\n"));
        }
        for (i, columns) in list.rows.iter().enumerate() {
            input.push_str(&format!("{i}\t{}\n", columns.join("\t")));
        }
        input
    }
}

impl SelectionProvider for FzfPicker {
    fn pick(&self, list: &PickList) -> Result<Selection> {
        let header = format!("--header={}", list.prompt);
        let spec = CommandSpec::new(&self.program)
            .args([
                "--with-nth=2..",
                "--delimiter=\t",
                "--ansi",
                header.as_str(),
            ])
            .stdin(Self::feed(list))
            .stdio(Stdio::CaptureStdout);

        let output = self
            .runner
            .run(&spec)
            .map_err(|e| WttError::Picker(format!("failed to start fzf: {e}")))?;

        match output.status {
            Some(0) => {}
            Some(FZF_CANCELLED) => return Ok(Selection::Cancelled),
            status => {
                return Err(WttError::Picker(format!(
                    "fzf exited with status {}",
                    status.map_or_else(|| "signal".to_string(), |code| code.to_string())
                )));
            }
        }

        let line = output.stdout.trim();
        let index = line.split('\t').next().unwrap_or_default();
        debug!("fzf picked {line:?}");

        match index.parse::<i64>() {
            Ok(-1) if list.clear_label.is_some() => Ok(Selection::Cleared),
            Ok(i) => usize::try_from(i)
                .ok()
                .filter(|&i| i < list.rows.len())
                .map(Selection::Chosen)
                .ok_or_else(|| WttError::Picker(format!("unexpected fzf index: {index:?}"))),
            Err(_) => Err(WttError::Picker(format!("unexpected fzf output: {line:?}"))),
        }
    }
}

/// Fallback picker: prints a numbered list and reads a number.
pub struct NumberedPicker {
    console: Rc<Console>,
}

impl NumberedPicker {
    pub fn new(console: Rc<Console>) -> Self {
        Self { console }
    }
}

impl SelectionProvider for NumberedPicker {
    fn pick(&self, list: &PickList) -> Result<Selection> {
        self.console.say(&list.prompt);
        if let Some(label) = &list.clear_label {
            self.console.say(format_args!("  [0] {label}"));
        }
        for (i, columns) in list.rows.iter().enumerate() {
            self.console
                .say(format_args!("  [{}] {}", i + 1, columns.join("  ")));
        }
        self.console.prompt("Enter number: ");

        let text = match self.console.read_line()? {
            Some(text) if !text.is_empty() => text,
            _ => return Ok(Selection::Cancelled),
        };

        match text.parse::<usize>() {
            Ok(0) if list.clear_label.is_some() => Ok(Selection::Cleared),
            Ok(n) if (1..=list.rows.len()).contains(&n) => Ok(Selection::Chosen(n - 1)),
            _ => Err(WttError::Picker(format!("invalid selection {text:?}"))),
        }
    }
}

/// Uses fzf when it is installed and allowed, the numbered prompt otherwise.
pub fn picker_for(
    runner: Rc<dyn CommandRunner>,
    console: Rc<Console>,
    no_fzf: bool,
) -> Box<dyn SelectionProvider> {
    if !no_fzf && let Ok(fzf) = which::which("fzf") {
        debug!("using fzf at {}", fzf.display());
        return Box::new(FzfPicker::new(runner, fzf.to_string_lossy()));
    }
    debug!("using numbered picker");
    Box::new(NumberedPicker::new(console))
}

/// Mock implementation for testing that returns a predetermined answer
pub struct MockSelectionProvider {
    response: Selection,
}

impl MockSelectionProvider {
    pub fn new(response: Selection) -> Self {
        Self { response }
    }
}

impl SelectionProvider for MockSelectionProvider {
    fn pick(&self, list: &PickList) -> Result<Selection> {
        // Validate that the response is actually one of the options
        match self.response {
            Selection::Chosen(i) if i >= list.rows.len() => Err(WttError::Picker(format!(
                "mock response {i} out of range for {} rows",
                list.rows.len()
            ))),
            Selection::Cleared if list.clear_label.is_none() => Err(WttError::Picker(
                "mock response Cleared without a clear option".to_string(),
            )),
            response => Ok(response),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::testing::scripted;
    use crate::runner::FakeRunner;

    fn repos() -> PickList {
        PickList::new("Select a repo:", "no repos")
            .row(["foo", "/home/u/foo"])
            .row(["bar", "/home/u/bar"])
    }

    fn fzf_with(output: crate::traits::CommandOutput) -> (Rc<FakeRunner>, FzfPicker) {
        let fake = Rc::new(FakeRunner::new());
        fake.on(
            "fzf",
            &[
                "--with-nth=2..",
                "--delimiter=\t",
                "--ansi",
                "--header=Select a repo:",
            ],
            output,
        );
        let picker = FzfPicker::new(Rc::clone(&fake) as Rc<dyn CommandRunner>, "fzf");
        (fake, picker)
    }

    #[test]
    fn test_empty_list_fails_before_prompting() {
        let (console, transcript) = scripted("1\n");
        let picker = NumberedPicker::new(Rc::new(console));
        let empty = PickList::new("Select a worktree:", "no worktrees to remove");
        let result = picker.select(&empty);

        assert!(matches!(result, Err(WttError::NoCandidates(ref m)) if m == &empty.empty_message));
        assert!(transcript.text().is_empty());
    }

    #[test]
    fn test_numbered_choice() -> Result<()> {
        let (console, transcript) = scripted("2\n");
        let picker = NumberedPicker::new(Rc::new(console));

        assert_eq!(picker.select(&repos())?, Selection::Chosen(1));
        assert_eq!(
            transcript.text(),
            "Select a repo:\n  [1] foo  /home/u/foo\n  [2] bar  /home/u/bar\nEnter number: "
        );
        Ok(())
    }

    #[test]
    fn test_numbered_empty_input_cancels() -> Result<()> {
        for input in ["\n", ""] {
            let (console, _) = scripted(input);
            let picker = NumberedPicker::new(Rc::new(console));
            assert_eq!(picker.select(&repos())?, Selection::Cancelled);
        }
        Ok(())
    }

    #[test]
    fn test_numbered_rejects_garbage_and_out_of_range() {
        for input in ["abc\n", "3\n", "0\n", "-1\n"] {
            let (console, _) = scripted(input);
            let picker = NumberedPicker::new(Rc::new(console));
            let result = picker.select(&repos());
            assert!(
                matches!(result, Err(WttError::Picker(ref m)) if m.starts_with("invalid")),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_numbered_zero_clears_when_offered() -> Result<()> {
        let (console, transcript) = scripted("0\n");
        let picker = NumberedPicker::new(Rc::new(console));
        let list = repos().with_clear("(none) - clear repo context");

        assert_eq!(picker.select(&list)?, Selection::Cleared);
        let text = transcript.text();
        assert!(text.contains("  [0] (none) - clear repo context\n"));
        Ok(())
    }

    #[test]
    fn test_fzf_feeds_indexed_rows() -> Result<()> {
        let (fake, picker) = fzf_with(FakeRunner::ok("1\tbar\t/home/u/bar\n"));
        let list = repos().with_clear("(none)");

        assert_eq!(picker.select(&list)?, Selection::Chosen(1));
        let calls = fake.calls();
        assert_eq!(
            calls[0].stdin.as_deref(),
            Some("-1\t(none)\n0\tfoo\t/home/u/foo\n1\tbar\t/home/u/bar\n")
        );
        assert_eq!(calls[0].stdio, Stdio::CaptureStdout);
        Ok(())
    }

    #[test]
    fn test_fzf_sentinel_and_cancel() -> Result<()> {
        let (_, picker) = fzf_with(FakeRunner::ok("-1\t(none)\n"));
        let list = repos().with_clear("(none)");
        assert_eq!(picker.select(&list)?, Selection::Cleared);

        let (_, picker) = fzf_with(FakeRunner::exit(130, ""));
        assert_eq!(picker.select(&repos())?, Selection::Cancelled);
        Ok(())
    }

    #[test]
    fn test_fzf_failures() {
        let (_, picker) = fzf_with(FakeRunner::exit(2, "boom"));
        assert!(matches!(picker.select(&repos()), Err(WttError::Picker(_))));

        let (_, picker) = fzf_with(FakeRunner::ok("7\tghost\n"));
        let result = picker.select(&repos());
        assert!(matches!(result, Err(WttError::Picker(ref m)) if m.contains("index")));

        // No sentinel offered, so -1 is just out of range.
        let (_, picker) = fzf_with(FakeRunner::ok("-1\t(none)\n"));
        assert!(matches!(picker.select(&repos()), Err(WttError::Picker(_))));
    }

    #[test]
    fn test_mock_selection_provider_validates_response() {
        let provider = MockSelectionProvider::new(Selection::Chosen(5));
        assert!(provider.select(&repos()).is_err());

        let provider = MockSelectionProvider::new(Selection::Chosen(0));
        assert!(matches!(provider.select(&repos()), Ok(Selection::Chosen(0))));
    }

    #[test]
    fn test_no_fzf_forces_numbered_picker() -> Result<()> {
        let (console, _) = scripted("1\n");
        let fake: Rc<dyn CommandRunner> = Rc::new(FakeRunner::new());
        let picker = picker_for(fake, Rc::new(console), true);
        assert_eq!(picker.select(&repos())?, Selection::Chosen(0));
        Ok(())
    }
}
