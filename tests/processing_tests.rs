// End-to-end matching and renaming with a scripted prompt

use std::collections::VecDeque;
use std::fs;

use tempfile::TempDir;
use tvdb_rename::error::{ProcessError, PromptError};
use tvdb_rename::processing::{CONFIRM_MESSAGE, process_files};
use tvdb_rename::prompt::Prompt;
use tvdb_rename::rename_engine::{ExecutionReport, MediaFile};

#[derive(Default)]
struct ScriptedPrompt {
    selections: VecDeque<usize>,
    confirmation: Option<bool>,
    questions: Vec<(String, Vec<String>)>,
    confirmations: Vec<String>,
}

impl ScriptedPrompt {
    fn new(selections: &[usize], confirmation: Option<bool>) -> Self {
        Self {
            selections: selections.iter().copied().collect(),
            confirmation,
            ..Default::default()
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn select(&mut self, message: &str, labels: &[String], default: usize) -> Result<usize, PromptError> {
        assert_eq!(default, 0, "the first option is always the default");
        self.questions.push((message.to_string(), labels.to_vec()));
        self.selections.pop_front().ok_or(PromptError::Cancelled)
    }

    fn confirm(&mut self, message: &str, _default: bool) -> Result<bool, PromptError> {
        self.confirmations.push(message.to_string());
        self.confirmation.ok_or(PromptError::Cancelled)
    }
}

fn setup(names: &[&str]) -> (TempDir, Vec<MediaFile>) {
    let dir = TempDir::new().unwrap();
    let files = names
        .iter()
        .map(|name| {
            let path = dir.path().join(name);
            fs::write(&path, b"").unwrap();
            MediaFile::new(path)
        })
        .collect();
    (dir, files)
}

fn listing(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

fn episodes() -> Vec<String> {
    vec!["Pilot".to_string(), "Second Chances".to_string()]
}

#[test]
fn test_match_confirm_and_rename() {
    let (dir, files) = setup(&["pilot.mkv", "second chances.mkv"]);
    let mut prompt = ScriptedPrompt::new(&[0, 0], Some(true));

    let report = process_files(&files, &episodes(), &mut prompt, Vec::new(), false).unwrap();

    assert!(matches!(report, ExecutionReport::Applied(ref results) if results.iter().all(|r| r.is_success())));
    assert_eq!(listing(&dir), vec!["Pilot.mkv", "Second Chances.mkv"]);

    // Confident first match puts skip last, and the second file no longer sees "Pilot"
    assert_eq!(prompt.questions[0].1.last().map(String::as_str), Some("skip"));
    assert_eq!(prompt.questions[1].1, vec!["Second Chances 0.75", "skip"]);
    assert_eq!(prompt.confirmations, vec![CONFIRM_MESSAGE]);
}

#[test]
fn test_declining_leaves_files_alone() {
    let (dir, files) = setup(&["pilot.mkv", "second chances.mkv"]);
    let mut prompt = ScriptedPrompt::new(&[0, 0], Some(false));

    let report = process_files(&files, &episodes(), &mut prompt, Vec::new(), false).unwrap();

    assert!(matches!(report, ExecutionReport::Declined));
    assert_eq!(listing(&dir), vec!["pilot.mkv", "second chances.mkv"]);
}

#[test]
fn test_cancelling_mid_session_renames_nothing() {
    let (dir, files) = setup(&["pilot.mkv", "second chances.mkv"]);
    let mut prompt = ScriptedPrompt::new(&[0], Some(true));

    let result = process_files(&files, &episodes(), &mut prompt, Vec::new(), false);

    assert!(matches!(result, Err(ref e) if e.is_cancelled()));
    assert!(matches!(result, Err(ProcessError::Prompt(PromptError::Cancelled))));
    assert!(prompt.confirmations.is_empty());
    assert_eq!(listing(&dir), vec!["pilot.mkv", "second chances.mkv"]);
}

#[test]
fn test_all_skipped_never_asks_to_confirm() {
    let (dir, files) = setup(&["pilot.mkv"]);
    // skip sits last for a confident match
    let mut prompt = ScriptedPrompt::new(&[2], Some(true));

    let report = process_files(&files, &episodes(), &mut prompt, Vec::new(), false).unwrap();

    assert!(matches!(report, ExecutionReport::Empty));
    assert!(prompt.confirmations.is_empty());
    assert_eq!(listing(&dir), vec!["pilot.mkv"]);
}

#[test]
fn test_dry_run_only_prints_the_plan() {
    let (dir, files) = setup(&["pilot.mkv"]);
    let mut prompt = ScriptedPrompt::new(&[0], Some(true));
    let mut out = Vec::new();

    let report = process_files(&files, &episodes(), &mut prompt, &mut out, true).unwrap();

    assert!(matches!(report, ExecutionReport::DryRun));
    assert!(prompt.confirmations.is_empty());
    assert_eq!(listing(&dir), vec!["pilot.mkv"]);
    assert!(String::from_utf8(out).unwrap().contains("Pilot.mkv"));
}
