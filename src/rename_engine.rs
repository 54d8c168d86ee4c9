use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{InputError, ProcessError, PromptError, RenameError};
use crate::matcher::ChoiceValue;
use crate::session::Assignment;

pub const DEFAULT_BASE_URL: &str = "https://api.thetvdb.com/";

static INVALID_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("valid filename regex"));

/// A file named on the command line, split into the parts a rename needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaFile {
    pub original_path: PathBuf,
    pub directory: PathBuf,
    /// Base name without extension; this is what gets matched against titles.
    pub name: String,
    pub extension: Option<String>,
}

impl MediaFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        Self {
            original_path: path.to_path_buf(),
            directory: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            name: path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            extension: path.extension().map(|e| e.to_string_lossy().into_owned()),
        }
    }

    pub fn file_name(&self) -> String {
        self.original_path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }

    /// Same directory and extension, new base name.
    pub fn with_name(&self, base_name: &str) -> PathBuf {
        let mut file_name = sanitize_filename(base_name);
        if let Some(ext) = &self.extension {
            file_name.push('.');
            file_name.push_str(ext);
        }
        self.directory.join(file_name)
    }
}

#[derive(Debug, Clone)]
pub struct RenameConfig {
    pub series: String,
    pub files: Vec<MediaFile>,
    pub api_key: String,
    pub base_url: String,
    pub dry_run: bool,
}

pub struct ConfigBuilder {
    series: Option<String>,
    files: Vec<PathBuf>,
    api_key: Option<String>,
    base_url: Option<String>,
    dry_run: bool,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            series: None,
            files: Vec::new(),
            api_key: None,
            base_url: None,
            dry_run: false,
        }
    }

    pub fn series<S: Into<String>>(mut self, series: S) -> Self {
        self.series = Some(series.into());
        self
    }

    pub fn files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.files = files.into_iter().map(|p| p.as_ref().to_path_buf()).collect();
        self
    }

    pub fn api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn build(self) -> Result<RenameConfig, InputError> {
        let series = self
            .series
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(InputError::MissingSeries)?;

        // A path named twice is still one file
        let mut seen = HashSet::new();
        let files: Vec<MediaFile> = self
            .files
            .into_iter()
            .filter(|p| seen.insert(p.clone()))
            .map(MediaFile::new)
            .collect();

        if files.is_empty() {
            return Err(InputError::NoFiles);
        }

        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(InputError::MissingApiKey)?;

        Ok(RenameConfig {
            series,
            files,
            api_key,
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            dry_run: self.dry_run,
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRename {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenamePlan {
    entries: Vec<PlannedRename>,
}

impl RenamePlan {
    pub fn entries(&self) -> &[PlannedRename] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<PlannedRename> for RenamePlan {
    fn from_iter<I: IntoIterator<Item = PlannedRename>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Turns accepted matches into concrete renames, in assignment order.
/// Skipped files are left out.
pub fn plan(assignment: &Assignment) -> RenamePlan {
    assignment
        .iter()
        .filter_map(|(file, value)| match value {
            ChoiceValue::Episode(title) => Some(PlannedRename {
                from: file.original_path.clone(),
                to: file.with_name(title),
            }),
            ChoiceValue::Skip => None,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed,
    /// Old and new path are the same, nothing to do.
    Unchanged,
    Failed(RenameError),
}

#[derive(Debug, Clone)]
pub struct RenameResult {
    pub rename: PlannedRename,
    pub outcome: RenameOutcome,
}

impl RenameResult {
    pub fn is_success(&self) -> bool {
        !matches!(self.outcome, RenameOutcome::Failed(_))
    }
}

#[derive(Debug, Clone)]
pub enum ExecutionReport {
    /// The plan had no entries, confirmation was not requested.
    Empty,
    Declined,
    /// Plan shown only, `--dry-run`.
    DryRun,
    Applied(Vec<RenameResult>),
}

/// Shows a plan, asks once, then renames entry by entry.
pub struct RenameExecutor<W: Write> {
    out: W,
}

impl<W: Write> RenameExecutor<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn display(&mut self, plan: &RenamePlan) -> std::io::Result<()> {
        for entry in plan.entries() {
            writeln!(self.out, "mv \"{}\"", entry.from.display())?;
            writeln!(self.out, "=> \"{}\"", entry.to.display())?;
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    /// `confirm` is called exactly once for a non-empty plan. Nothing touches
    /// the filesystem unless it returns `true`. A failed entry does not stop
    /// the ones after it, and earlier renames are kept.
    ///
    /// After the answer, output errors are only logged; the batch runs to the
    /// end and the per-entry results always come back.
    pub fn execute<F>(&mut self, plan: RenamePlan, confirm: F) -> Result<ExecutionReport, ProcessError>
    where
        F: FnOnce() -> Result<bool, PromptError>,
    {
        if plan.is_empty() {
            writeln!(self.out, "Nothing to rename.")?;
            return Ok(ExecutionReport::Empty);
        }

        self.display(&plan)?;

        if !confirm()? {
            info!(entries = plan.len(), "rename plan declined");
            self.report(format_args!("No files were renamed."));
            return Ok(ExecutionReport::Declined);
        }

        let mut results = Vec::with_capacity(plan.len());
        for entry in plan.entries {
            self.report(format_args!("mv \"{}\" \"{}\"", entry.from.display(), entry.to.display()));

            let outcome = match rename_file(&entry) {
                Ok(outcome) => outcome,
                Err(e) => RenameOutcome::Failed(e),
            };

            match &outcome {
                RenameOutcome::Renamed => {
                    debug!(from = %entry.from.display(), to = %entry.to.display(), "renamed");
                    self.report(format_args!("✓ Renamed"));
                }
                RenameOutcome::Unchanged => {
                    self.report(format_args!("ℹ Already named correctly"));
                }
                RenameOutcome::Failed(e) => {
                    warn!(from = %entry.from.display(), error = %e, "rename failed");
                    self.report(format_args!("✗ Error: {e}"));
                }
            }

            results.push(RenameResult { rename: entry, outcome });
        }

        let successful = results.iter().filter(|r| r.is_success()).count();
        self.report(format_args!("\nSummary: {} of {} files renamed successfully", successful, results.len()));
        if let Err(e) = self.out.flush() {
            warn!(error = %e, "could not flush rename report");
        }

        Ok(ExecutionReport::Applied(results))
    }

    fn report(&mut self, line: fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{line}") {
            warn!(error = %e, "could not write rename report");
        }
    }
}

fn rename_file(entry: &PlannedRename) -> Result<RenameOutcome, RenameError> {
    if entry.from == entry.to {
        return Ok(RenameOutcome::Unchanged);
    }

    // fs::rename silently replaces an existing target on unix
    if fs::symlink_metadata(&entry.to).is_ok() {
        return Err(RenameError::AlreadyExists);
    }

    fs::rename(&entry.from, &entry.to)?;
    Ok(RenameOutcome::Renamed)
}

pub fn sanitize_filename(filename: &str) -> String {
    INVALID_FILENAME_CHARS.replace_all(filename, "_").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Test: File/Name"), "Test_ File_Name");
        assert_eq!(sanitize_filename("Show - S01E01 - Pilot"), "Show - S01E01 - Pilot");
    }

    #[test]
    fn test_media_file_parts() {
        let file = MediaFile::new("/tv/show.s01e01.mkv");
        assert_eq!(file.directory, PathBuf::from("/tv"));
        assert_eq!(file.name, "show.s01e01");
        assert_eq!(file.extension.as_deref(), Some("mkv"));
        assert_eq!(file.file_name(), "show.s01e01.mkv");
    }

    #[test]
    fn test_media_file_without_directory_or_extension() {
        let file = MediaFile::new("episode");
        assert_eq!(file.directory, PathBuf::new());
        assert_eq!(file.extension, None);
        assert_eq!(file.with_name("Pilot"), PathBuf::from("Pilot"));
    }

    #[test]
    fn test_with_name_keeps_directory_and_extension() {
        let file = MediaFile::new("/tv/a.mkv");
        assert_eq!(file.with_name("Pilot"), PathBuf::from("/tv/Pilot.mkv"));
        assert_eq!(
            file.with_name("Show - S01E03 - Part 1/2"),
            PathBuf::from("/tv/Show - S01E03 - Part 1_2.mkv")
        );
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .series("The Expanse")
            .files(["/tv/a.mkv", "/tv/b.mkv", "/tv/a.mkv"])
            .api_key(Some("key".to_string()))
            .build()
            .unwrap();

        assert_eq!(config.series, "The Expanse");
        assert_eq!(config.files.len(), 2);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_config_builder_rejects_missing_input() {
        let no_files: [&str; 0] = [];
        let err = ConfigBuilder::new()
            .series("Show")
            .files(no_files)
            .api_key(Some("key".to_string()))
            .build()
            .unwrap_err();
        assert_eq!(err, InputError::NoFiles);

        let err = ConfigBuilder::new()
            .series("   ")
            .files(["a.mkv"])
            .api_key(Some("key".to_string()))
            .build()
            .unwrap_err();
        assert_eq!(err, InputError::MissingSeries);

        let err = ConfigBuilder::new().series("Show").files(["a.mkv"]).build().unwrap_err();
        assert_eq!(err, InputError::MissingApiKey);
    }

    #[test]
    fn test_rename_error_from_io() {
        let err: RenameError = std::io::Error::from(std::io::ErrorKind::NotFound).into();
        assert_eq!(err, RenameError::SourceNotFound);
        let err: RenameError = std::io::Error::from(std::io::ErrorKind::PermissionDenied).into();
        assert_eq!(err, RenameError::NoPermission);
    }

    #[test]
    fn test_empty_plan_never_asks() {
        let mut executor = RenameExecutor::new(Vec::new());
        let report = executor
            .execute(RenamePlan::default(), || panic!("confirm must not be called"))
            .unwrap();

        assert!(matches!(report, ExecutionReport::Empty));
    }

    #[test]
    fn test_display_lists_every_entry() {
        let plan: RenamePlan = [
            PlannedRename {
                from: PathBuf::from("/tv/a.mkv"),
                to: PathBuf::from("/tv/Pilot.mkv"),
            },
            PlannedRename {
                from: PathBuf::from("/tv/b.mkv"),
                to: PathBuf::from("/tv/Finale.mkv"),
            },
        ]
        .into_iter()
        .collect();

        let mut executor = RenameExecutor::new(Vec::new());
        executor.display(&plan).unwrap();
        let text = String::from_utf8(executor.into_inner()).unwrap();

        assert_eq!(
            text,
            "mv \"/tv/a.mkv\"\n=> \"/tv/Pilot.mkv\"\n\nmv \"/tv/b.mkv\"\n=> \"/tv/Finale.mkv\"\n\n"
        );
    }
}
