use crate::similarity;

/// Maximum number of candidates offered for a single file.
pub const MAX_CANDIDATES: usize = 20;

/// Score above which the best candidate becomes the pre-selected choice.
pub const CONFIDENCE_THRESHOLD: f64 = 0.5;

pub const SKIP_LABEL: &str = "skip";

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub episode_title: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceValue {
    Episode(String),
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub label: String,
    pub value: ChoiceValue,
}

impl ChoiceOption {
    pub fn skip() -> Self {
        Self {
            label: SKIP_LABEL.to_string(),
            value: ChoiceValue::Skip,
        }
    }

    fn from_candidate(candidate: &Candidate) -> Self {
        Self {
            label: format!("{} {:.2}", candidate.episode_title, candidate.score),
            value: ChoiceValue::Episode(candidate.episode_title.clone()),
        }
    }
}

/// Ranks `pool` against `query`, best first, keeping at most [`MAX_CANDIDATES`].
///
/// Equal scores keep their pool order. Episodes that must not be offered
/// again have to be removed from `pool` by the caller.
pub fn rank<S: AsRef<str>>(query: &str, pool: &[S]) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = pool
        .iter()
        .map(|title| Candidate {
            episode_title: title.as_ref().to_string(),
            score: similarity::score(query, title.as_ref()),
        })
        .collect();

    // sort_by is stable
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.truncate(MAX_CANDIDATES);
    candidates
}

/// Builds the option list shown for one file. The first option is the default.
///
/// A confident top candidate puts skip last so the best match is
/// pre-selected, otherwise skip comes first.
pub fn build_choices(candidates: &[Candidate]) -> Vec<ChoiceOption> {
    let mut options: Vec<ChoiceOption> = candidates.iter().map(ChoiceOption::from_candidate).collect();

    let confident = candidates
        .first()
        .is_some_and(|top| top.score > CONFIDENCE_THRESHOLD);

    if confident {
        options.push(ChoiceOption::skip());
    } else {
        options.insert(0, ChoiceOption::skip());
    }
    options
}
