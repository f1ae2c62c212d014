//! Optional external scanning delegate.
//!
//! The engine can hand a scan off to an external Python script as an
//! alternate indexing path. A machine without Python, or without the script,
//! is a perfectly normal state: that's an "unavailable" outcome, not an
//! error.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::path::Path;
use tokio::process::Command;

/// Outcome of attempting to run the external scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelegateOutcome {
    /// The Python interpreter or the script itself is missing.
    Unavailable,
    /// The script ran to completion; `success` mirrors its exit status.
    Finished { success: bool },
}

/// Run the external scanner script against `root`.
///
/// Looks for `python3` (then `python`) on the PATH. Only a failure to spawn
/// or wait on an interpreter that *does* exist is surfaced as an error.
pub async fn delegate_scan(script: &Path, root: &Path) -> Result<DelegateOutcome> {
    let Ok(python) = which::which("python3").or_else(|_| which::which("python")) else {
        tracing::debug!("no python interpreter on PATH, delegate unavailable");
        return Ok(DelegateOutcome::Unavailable);
    };
    if !script.is_file() {
        tracing::debug!(script = %script.display(), "delegate script missing");
        return Ok(DelegateOutcome::Unavailable);
    }
    let status = Command::new(python)
        .arg(script)
        .arg(root)
        .status()
        .await
        .or_raise(|| ErrorKind::Delegate)?;
    tracing::debug!(script = %script.display(), %status, "delegate scanner finished");
    Ok(DelegateOutcome::Finished { success: status.success() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_script_is_unavailable() {
        let outcome = delegate_scan(Path::new("/nonexistent/scanner.py"), Path::new("/tmp")).await.unwrap();
        assert_eq!(outcome, DelegateOutcome::Unavailable);
    }
}
