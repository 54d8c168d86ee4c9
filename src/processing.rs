use std::io::Write;

use tracing::info;

use crate::error::ProcessError;
use crate::prompt::Prompt;
use crate::rename_engine::{self, ExecutionReport, MediaFile, RenameExecutor};
use crate::session::AssignmentSession;

pub const CONFIRM_MESSAGE: &str = "move files?";

/// Matches every file, then shows the resulting plan and renames on
/// confirmation. A cancelled prompt returns before anything is renamed.
pub fn process_files<P, W>(
    files: &[MediaFile],
    episodes: &[String],
    prompt: &mut P,
    out: W,
    dry_run: bool,
) -> Result<ExecutionReport, ProcessError>
where
    P: Prompt + ?Sized,
    W: Write,
{
    let assignment = AssignmentSession::new(episodes).run(files, prompt)?;
    let plan = rename_engine::plan(&assignment);
    info!(files = files.len(), planned = plan.len(), "matching finished");

    let mut executor = RenameExecutor::new(out);
    if dry_run {
        executor.display(&plan)?;
        return Ok(ExecutionReport::DryRun);
    }

    executor.execute(plan, || prompt.confirm(CONFIRM_MESSAGE, false))
}
