//! Read-modify-write updates of the `.env` file
//!
//! Provisioning records the team and channel it created so later runs and
//! restarts reuse them. Updates replace matching `KEY=value` lines in place
//! and append missing keys; every other line (comments, blanks, unrelated
//! keys) is written back verbatim and in order.

use std::path::{Path, PathBuf};

use teamlink_domain::{Result, TeamLinkError};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Handle on an env file; writes through one handle are serialized
#[derive(Debug)]
pub struct EnvFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl EnvFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Merge `updates` into the file, creating it if absent.
    ///
    /// The new content is written to a sibling temp file and renamed over the
    /// original so readers never see a half-written file.
    ///
    /// # Errors
    /// Returns `TeamLinkError::Io` if the file cannot be read or written.
    pub async fn merge(&self, updates: &[(&str, &str)]) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let current = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "env file missing, creating");
                String::new()
            }
            Err(e) => return Err(io_error("read", &self.path, &e)),
        };

        let merged = merge_content(&current, updates);

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, merged).await.map_err(|e| io_error("write", &tmp, &e))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| io_error("replace", &self.path, &e))?;

        let keys: Vec<&str> = updates.iter().map(|(k, _)| *k).collect();
        info!(path = %self.path.display(), ?keys, "env file updated");
        Ok(())
    }

    /// Current value of `key` in the file, if present
    ///
    /// # Errors
    /// Returns `TeamLinkError::Io` if the file exists but cannot be read.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(content.lines().find_map(|line| match parse_line(line) {
                Some((k, v)) if k == key => Some(v.to_string()),
                _ => None,
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("read", &self.path, &e)),
        }
    }
}

fn io_error(action: &str, path: &Path, err: &std::io::Error) -> TeamLinkError {
    TeamLinkError::Io(format!("failed to {action} {}: {err}", path.display()))
}

/// Split `KEY=value` (optionally prefixed with `export `); comments and
/// blank lines yield `None`.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let body = trimmed.strip_prefix("export ").unwrap_or(trimmed);
    let (key, value) = body.split_once('=')?;
    Some((key.trim(), value))
}

fn merge_content(current: &str, updates: &[(&str, &str)]) -> String {
    let mut written = vec![false; updates.len()];
    let mut out = String::with_capacity(current.len() + 64);

    for line in current.lines() {
        let replacement = parse_line(line)
            .and_then(|(key, _)| updates.iter().position(|(k, _)| *k == key))
            .filter(|&idx| !written[idx]);

        match replacement {
            Some(idx) => {
                written[idx] = true;
                let (key, value) = updates[idx];
                out.push_str(&format!("{key}={value}"));
            }
            None => out.push_str(line),
        }
        out.push('\n');
    }

    for (idx, (key, value)) in updates.iter().enumerate() {
        if !written[idx] {
            out.push_str(&format!("{key}={value}\n"));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_replaces_in_place_and_keeps_everything_else() {
        let current = "# app registration\nCLIENT_ID=abc\n\nTEAM_ID=old-team\nOTHER=1\n";
        let merged = merge_content(current, &[("TEAM_ID", "team-9"), ("CHANNEL_ID", "chan-1")]);

        assert_eq!(merged, "# app registration\nCLIENT_ID=abc\n\nTEAM_ID=team-9\nOTHER=1\nCHANNEL_ID=chan-1\n");
    }

    #[test]
    fn merge_ignores_commented_keys() {
        let merged = merge_content("# TEAM_ID=commented\n", &[("TEAM_ID", "t")]);
        assert_eq!(merged, "# TEAM_ID=commented\nTEAM_ID=t\n");
    }

    #[test]
    fn merge_preserves_values_containing_equals() {
        let merged = merge_content("SECRET=a=b=c\n", &[("TEAM_ID", "t")]);
        assert_eq!(merged, "SECRET=a=b=c\nTEAM_ID=t\n");
    }

    #[tokio::test]
    async fn merge_writes_file_and_get_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = EnvFileStore::new(dir.path().join(".env"));

        store.merge(&[("TEAM_ID", "team-1")]).await.unwrap();
        store.merge(&[("CHANNEL_ID", "chan-1")]).await.unwrap();
        store.merge(&[("TEAM_ID", "team-2")]).await.unwrap();

        assert_eq!(store.get("TEAM_ID").await.unwrap().as_deref(), Some("team-2"));
        assert_eq!(store.get("CHANNEL_ID").await.unwrap().as_deref(), Some("chan-1"));
        assert_eq!(store.get("MISSING").await.unwrap(), None);

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "TEAM_ID=team-2\nCHANNEL_ID=chan-1\n");
    }
}
