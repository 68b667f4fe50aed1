//! Session file persistence
//!
//! Snapshots are stored as sorted-key JSON indented by four spaces, one file
//! per session. Overwriting a session first copies the old file into the
//! backup store.

use crate::config::Config;
use crate::sessions::{errors::SessionError, types::*};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
const BACKUP_ID_FORMAT: &str = "%Y%m%d%H%M%S%6f";

pub fn ensure_directory(dir: &Path) -> Result<(), SessionError> {
    fs::create_dir_all(dir).map_err(|e| SessionError::IoError { source: e })?;
    Ok(())
}

/// Session names become file names directly under the sessions directory.
pub fn validate_session_name(name: &str) -> Result<(), SessionError> {
    let reason = if name.trim().is_empty() {
        Some("cannot be empty")
    } else if name.contains('/') || name.contains('\0') {
        Some("must not contain '/'")
    } else if name == "." || name == ".." {
        Some("must not be a relative directory name")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(SessionError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

pub fn format_timestamp(time: DateTime<Local>) -> String {
    time.format(DISPLAY_TIME_FORMAT).to_string()
}

fn cleanup_temp_file(temp_file: &Path, original_error: &std::io::Error) {
    if let Err(cleanup_err) = fs::remove_file(temp_file) {
        tracing::warn!(
            event = "core.session.temp_file_cleanup_failed",
            temp_file = %temp_file.display(),
            original_error = %original_error,
            cleanup_error = %cleanup_err,
            message = "Failed to clean up temp file after operation error"
        );
    }
}

/// Serialize with sorted keys and four-space indentation.
pub fn to_session_json(snapshot: &SessionSnapshot) -> Result<String, SessionError> {
    let serialization_error = |e: serde_json::Error| SessionError::SerializationFailed {
        name: snapshot.session_name.clone(),
        message: e.to_string(),
    };

    // serde_json's Value map is ordered by key.
    let value = serde_json::to_value(snapshot).map_err(serialization_error)?;

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(serialization_error)?;

    String::from_utf8(buffer).map_err(|e| SessionError::SerializationFailed {
        name: snapshot.session_name.clone(),
        message: e.to_string(),
    })
}

/// Write a snapshot to `path` through a temp file in the same directory.
pub fn write_snapshot(path: &Path, snapshot: &SessionSnapshot) -> Result<(), SessionError> {
    let json = to_session_json(snapshot).inspect_err(|e| {
        tracing::error!(
            event = "core.session.serialization_failed",
            session_name = %snapshot.session_name,
            error = %e,
        );
    })?;

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_file = path.with_file_name(temp_name);

    if let Err(e) = fs::write(&temp_file, json) {
        cleanup_temp_file(&temp_file, &e);
        return Err(SessionError::IoError { source: e });
    }

    if let Err(e) = fs::rename(&temp_file, path) {
        cleanup_temp_file(&temp_file, &e);
        return Err(SessionError::IoError { source: e });
    }

    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<SessionSnapshot, SessionError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SessionError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(SessionError::IoError { source: e }),
    };

    serde_json::from_str(&content).map_err(|e| SessionError::Malformed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Copy an existing session file into `backups_dir`, stamped with `now`.
///
/// The backup file is named `<name>.backup-<YYYYmmddHHMMSSffffff>` and
/// carries `backup_time`. An unparsable original is copied byte for byte.
/// The original is left in place.
pub fn backup_session(
    original: &Path,
    backups_dir: &Path,
    now: DateTime<Local>,
) -> Result<PathBuf, SessionError> {
    ensure_directory(backups_dir)?;

    let file_name = original
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = format!("{}.backup-{}", file_name, now.format(BACKUP_ID_FORMAT));
    let mut backup_path = backups_dir.join(&stem);
    let mut suffix = 1;
    while backup_path.exists() {
        backup_path = backups_dir.join(format!("{}-{}", stem, suffix));
        suffix += 1;
    }

    match read_snapshot(original) {
        Ok(mut snapshot) => {
            snapshot.backed_up_at = Some(format_timestamp(now));
            write_snapshot(&backup_path, &snapshot)?;
        }
        Err(SessionError::Malformed { message, .. }) => {
            tracing::warn!(
                event = "core.session.backup_raw_copy",
                original = %original.display(),
                error = message,
            );
            fs::copy(original, &backup_path)?;
        }
        Err(e) => return Err(e),
    }

    tracing::info!(
        event = "core.session.backup_completed",
        original = %original.display(),
        backup = %backup_path.display(),
    );
    Ok(backup_path)
}

/// Save `snapshot` as `<sessions_dir>/<session_name>`, backing up whatever
/// was there strictly before the new content is written.
pub fn save_snapshot(
    config: &Config,
    snapshot: &mut SessionSnapshot,
) -> Result<SaveOutcome, SessionError> {
    validate_session_name(&snapshot.session_name)?;
    ensure_directory(&config.sessions_dir)?;

    let now = Local::now();
    let path = config.session_path(&snapshot.session_name);

    let backup_path = if path.is_file() {
        Some(backup_session(&path, &config.backups_dir, now)?)
    } else {
        None
    };

    snapshot.created_at = format_timestamp(now);
    snapshot.backed_up_at = None;
    write_snapshot(&path, snapshot)?;

    Ok(SaveOutcome {
        path,
        backup_path,
        windows_saved: snapshot.windows.len(),
    })
}

pub fn load_snapshot(config: &Config, session_name: &str) -> Result<SessionSnapshot, SessionError> {
    validate_session_name(session_name)?;
    read_snapshot(&config.session_path(session_name))
}

/// Session files (not directories) in `sessions_dir`, oldest first by
/// modification time. Unreadable files are counted and skipped.
pub fn list_session_files(
    sessions_dir: &Path,
) -> Result<(Vec<SessionFileEntry>, usize), SessionError> {
    let mut found: Vec<(SystemTime, SessionFileEntry)> = Vec::new();
    let mut skipped_count = 0;

    if !sessions_dir.exists() {
        return Ok((Vec::new(), 0));
    }

    for entry in fs::read_dir(sessions_dir)? {
        let entry = entry?;
        let path = entry.path();
        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                skipped_count += 1;
                tracing::warn!(
                    event = "core.session.list_metadata_error",
                    file = %path.display(),
                    error = %e,
                );
                continue;
            }
        };
        if !metadata.is_file() || is_temp_file(&path) {
            continue;
        }

        let snapshot = match read_snapshot(&path) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                skipped_count += 1;
                tracing::warn!(
                    event = "core.session.list_invalid_file",
                    file = %path.display(),
                    error = %e,
                    message = "Failed to read session file, skipping"
                );
                continue;
            }
        };

        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        found.push((
            modified,
            SessionFileEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                path,
                created_at: snapshot.created_at,
                windows_count: snapshot.windows.len(),
            },
        ));
    }

    found.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.name.cmp(&b.1.name)));
    Ok((found.into_iter().map(|(_, e)| e).collect(), skipped_count))
}

fn is_temp_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("tmp")
}
