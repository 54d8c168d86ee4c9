use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::PromptError;
use crate::matcher::{self, ChoiceOption, ChoiceValue};
use crate::prompt::Prompt;
use crate::rename_engine::MediaFile;

/// Per-run answers, one entry per file in the order the files were asked about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    entries: Vec<(MediaFile, ChoiceValue)>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the answer for `file`. Returns `false` and keeps the existing
    /// entry if the file was already answered.
    pub fn record(&mut self, file: MediaFile, value: ChoiceValue) -> bool {
        if self.get(&file).is_some() {
            return false;
        }
        self.entries.push((file, value));
        true
    }

    pub fn get(&self, file: &MediaFile) -> Option<&ChoiceValue> {
        self.entries
            .iter()
            .find(|(f, _)| f.original_path == file.original_path)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MediaFile, &ChoiceValue)> {
        self.entries.iter().map(|(f, v)| (f, v))
    }

    /// Episode titles taken so far, skips excluded.
    pub fn assigned_titles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|(_, v)| match v {
            ChoiceValue::Episode(title) => Some(title.as_str()),
            ChoiceValue::Skip => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Asks about each file in turn. Every episode can be given to one file only,
/// so the pool for a file depends on the answers before it.
pub struct AssignmentSession<'a> {
    episodes: &'a [String],
    assignment: Assignment,
}

impl<'a> AssignmentSession<'a> {
    pub fn new(episodes: &'a [String]) -> Self {
        Self {
            episodes,
            assignment: Assignment::new(),
        }
    }

    /// All episodes minus the ones already assigned, in their original order.
    pub fn available_episodes(&self) -> Vec<&'a str> {
        let taken: HashSet<&str> = self.assignment.assigned_titles().collect();
        self.episodes
            .iter()
            .map(String::as_str)
            .filter(|title| !taken.contains(title))
            .collect()
    }

    pub fn choices_for(&self, file: &MediaFile) -> Vec<ChoiceOption> {
        let pool = self.available_episodes();
        let candidates = matcher::rank(&file.name, &pool);
        matcher::build_choices(&candidates)
    }

    /// Runs the whole session. Any prompt error, cancellation included, drops
    /// the answers collected so far.
    pub fn run<P: Prompt + ?Sized>(mut self, files: &[MediaFile], prompt: &mut P) -> Result<Assignment, PromptError> {
        for file in files {
            if self.assignment.get(file).is_some() {
                warn!(file = %file.original_path.display(), "file listed twice, asking once");
                continue;
            }

            let options = self.choices_for(file);
            let labels: Vec<String> = options.iter().map(|o| o.label.clone()).collect();
            let message = format!("match for {}?", file.file_name());

            let index = prompt.select(&message, &labels, 0)?;
            let count = options.len();
            let value = options
                .into_iter()
                .nth(index)
                .map(|o| o.value)
                .ok_or(PromptError::OutOfRange { index, count })?;

            debug!(file = %file.file_name(), choice = ?value, "answered");
            self.assignment.record(file.clone(), value);
        }

        Ok(self.assignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Picks scripted indexes and remembers every question it was asked.
    struct ScriptedPrompt {
        answers: VecDeque<usize>,
        asked: Vec<(String, Vec<String>)>,
    }

    impl ScriptedPrompt {
        fn new(answers: &[usize]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                asked: Vec::new(),
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn select(&mut self, message: &str, labels: &[String], _default: usize) -> Result<usize, PromptError> {
            self.asked.push((message.to_string(), labels.to_vec()));
            self.answers.pop_front().ok_or(PromptError::Cancelled)
        }

        fn confirm(&mut self, _message: &str, _default: bool) -> Result<bool, PromptError> {
            Ok(false)
        }
    }

    fn episodes(titles: &[&str]) -> Vec<String> {
        titles.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_assigned_episode_leaves_the_pool() {
        let episodes = episodes(&["Pilot", "Second Chances"]);
        let files = vec![MediaFile::new("/tv/pilot.mkv"), MediaFile::new("/tv/second chances.mkv")];
        let mut prompt = ScriptedPrompt::new(&[0, 0]);

        let assignment = AssignmentSession::new(&episodes).run(&files, &mut prompt).unwrap();

        assert_eq!(prompt.asked[0].0, "match for pilot.mkv?");
        assert_eq!(prompt.asked[0].1, vec!["Pilot 0.75", "Second Chances 0.00", "skip"]);
        assert_eq!(prompt.asked[1].1, vec!["Second Chances 0.75", "skip"]);

        assert_eq!(assignment.get(&files[0]), Some(&ChoiceValue::Episode("Pilot".into())));
        assert_eq!(
            assignment.get(&files[1]),
            Some(&ChoiceValue::Episode("Second Chances".into()))
        );
    }

    #[test]
    fn test_skip_does_not_consume_an_episode() {
        let episodes = episodes(&["Pilot"]);
        let files = vec![MediaFile::new("pilot.mkv"), MediaFile::new("pilot (1).mkv")];
        // file 1: "Pilot" first, skip second; file 2 sees the same list
        let mut prompt = ScriptedPrompt::new(&[1, 0]);

        let assignment = AssignmentSession::new(&episodes).run(&files, &mut prompt).unwrap();

        assert_eq!(assignment.get(&files[0]), Some(&ChoiceValue::Skip));
        assert_eq!(prompt.asked[1].1, vec!["Pilot 0.55", "skip"]);
        assert_eq!(assignment.get(&files[1]), Some(&ChoiceValue::Episode("Pilot".into())));
        assert_eq!(assignment.len(), 2);
        assert_eq!(assignment.assigned_titles().count(), 1);
    }

    #[test]
    fn test_no_episode_assigned_twice() {
        let episodes = episodes(&["Alpha", "Beta", "Gamma"]);
        let files: Vec<MediaFile> = ["a.mkv", "b.mkv", "c.mkv", "d.mkv"].iter().map(MediaFile::new).collect();
        // Nothing scores, so skip leads and index 1 is the first episode left
        let mut prompt = ScriptedPrompt::new(&[1, 1, 1, 0]);

        let assignment = AssignmentSession::new(&episodes).run(&files, &mut prompt).unwrap();

        let titles: Vec<&str> = assignment.assigned_titles().collect();
        let unique: HashSet<&str> = titles.iter().copied().collect();
        assert_eq!(titles.len(), unique.len());
        assert_eq!(titles.len(), 3);
        // Pool exhausted, only skip left
        assert_eq!(prompt.asked[3].1, vec!["skip"]);
    }

    #[test]
    fn test_cancellation_discards_partial_answers() {
        let episodes = episodes(&["Pilot", "Finale"]);
        let files = vec![MediaFile::new("a.mkv"), MediaFile::new("b.mkv")];
        let mut prompt = ScriptedPrompt::new(&[1]);

        let result = AssignmentSession::new(&episodes).run(&files, &mut prompt);

        assert!(matches!(result, Err(PromptError::Cancelled)));
    }

    #[test]
    fn test_duplicate_file_is_asked_once() {
        let episodes = episodes(&["Pilot"]);
        let files = vec![MediaFile::new("a.mkv"), MediaFile::new("a.mkv")];
        let mut prompt = ScriptedPrompt::new(&[0]);

        let assignment = AssignmentSession::new(&episodes).run(&files, &mut prompt).unwrap();

        assert_eq!(prompt.asked.len(), 1);
        assert_eq!(assignment.len(), 1);
    }

    #[test]
    fn test_out_of_range_answer_is_an_error_not_a_skip() {
        let episodes = episodes(&["Pilot"]);
        let files = vec![MediaFile::new("pilot.mkv")];
        // Only "Pilot" and skip are offered
        let mut prompt = ScriptedPrompt::new(&[2]);

        let result = AssignmentSession::new(&episodes).run(&files, &mut prompt);

        assert!(matches!(result, Err(PromptError::OutOfRange { index: 2, count: 2 })));
    }
}
