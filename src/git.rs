// Clone transport: shells out to the system `git`. Output from a failed
// clone is surfaced verbatim so the user sees what git itself said.

use std::process::Command;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CloneError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("git clone failed: {0}")]
    Git(String),
}

/// Clone `url` into the current directory. Returns the directory name git
/// created on success.
pub fn clone(url: &str) -> Result<String, CloneError> {
    debug!(%url, "git clone");
    let output = Command::new("git").args(["clone", url]).output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(CloneError::Git(stderr));
    }
    Ok(dest_dir(url))
}

/// Directory name git derives from a clone URL: the final path segment
/// with any `.git` suffix dropped.
fn dest_dir(url: &str) -> String {
    let tail = url
        .trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(url);
    tail.trim_end_matches(".git").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dest_dir_matches_git_defaults() {
        assert_eq!(dest_dir("git@gitlab.com:alpha/svc.git"), "svc");
        assert_eq!(dest_dir("https://gitlab.com/alpha/beta/svc.git"), "svc");
        assert_eq!(dest_dir("https://gitlab.com/alpha/svc"), "svc");
        assert_eq!(dest_dir("https://gitlab.com/alpha/svc/"), "svc");
    }
}
