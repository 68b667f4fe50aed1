use tracing::{info, warn};

use crate::config::{Config, XsmConfig};
use crate::desktop::Desktop;
use crate::sessions::capture::{CaptureOptions, get_session_details};
use crate::sessions::filter::SessionFilter;
use crate::sessions::{errors::SessionError, persistence, types::*};

/// Capture the live session, narrow it by `filters` and save it under
/// `session_name`, backing up any previous save of the same name.
pub fn save_session(
    desktop: &Desktop,
    config: &Config,
    settings: &XsmConfig,
    session_name: &str,
    filters: &[Option<SessionFilter>],
) -> Result<SaveOutcome, SessionError> {
    info!(event = "core.session.save_started", session_name = session_name);
    persistence::validate_session_name(session_name)?;

    let options = CaptureOptions {
        remove_duplicates_by_pid: false,
        enumeration_retry_delay: settings.restore.enumeration_retry_delay(),
    };
    let windows = get_session_details(
        desktop.windows.as_ref(),
        desktop.processes.as_ref(),
        options,
        filters,
    )?;

    let mut snapshot = SessionSnapshot::new(session_name, windows);
    let outcome = persistence::save_snapshot(config, &mut snapshot)?;

    info!(
        event = "core.session.save_completed",
        session_name = session_name,
        path = %outcome.path.display(),
        windows = outcome.windows_saved,
        backed_up = outcome.backup_path.is_some()
    );
    Ok(outcome)
}

pub fn list_sessions(config: &Config) -> Result<SessionList, SessionError> {
    info!(event = "core.session.list_started");

    let (entries, skipped) = persistence::list_session_files(&config.sessions_dir)?;

    if skipped > 0 {
        warn!(
            event = "core.session.list_skipped_sessions",
            skipped_count = skipped,
            message = "Some session files were skipped due to errors"
        );
    }

    info!(event = "core.session.list_completed", count = entries.len());
    Ok(SessionList { entries, skipped })
}

pub fn get_session(config: &Config, session_name: &str) -> Result<SessionSnapshot, SessionError> {
    info!(event = "core.session.get_started", session_name = session_name);

    let snapshot = persistence::load_snapshot(config, session_name)?;

    info!(
        event = "core.session.get_completed",
        session_name = session_name,
        windows = snapshot.windows.len()
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessInfo;
    use crate::test_support::{FakeDesktop, raw_window};

    #[test]
    fn test_save_then_get_session() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::in_dir(dir.path().to_path_buf());
        let fake = FakeDesktop::new(vec![
            raw_window(0x1, 0, 100, "Terminal"),
            raw_window(0x2, 2, 200, "Browser"),
        ]);
        fake.processes
            .add(ProcessInfo::new(100, vec!["gnome-terminal".into()]));
        fake.processes.add(ProcessInfo::new(200, vec!["firefox".into()]));

        let filters = vec![Some(SessionFilter::exclude(&["browser"]))];
        let outcome = save_session(
            &fake.desktop(),
            &config,
            &XsmConfig::default(),
            DEFAULT_SESSION_NAME,
            &filters,
        )
        .unwrap();
        assert_eq!(outcome.windows_saved, 1);
        assert_eq!(outcome.path, config.session_path(DEFAULT_SESSION_NAME));

        let snapshot = get_session(&config, DEFAULT_SESSION_NAME).unwrap();
        assert_eq!(snapshot.session_name, DEFAULT_SESSION_NAME);
        assert_eq!(snapshot.windows.len(), 1);
        assert_eq!(snapshot.windows[0].command, vec!["gnome-terminal"]);
        assert!(!snapshot.created_at.is_empty());

        let listed = list_sessions(&config).unwrap();
        assert_eq!(listed.entries.len(), 1);
        assert_eq!(listed.entries[0].name, DEFAULT_SESSION_NAME);
        assert_eq!(listed.skipped, 0);
    }

    #[test]
    fn test_get_missing_session_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::in_dir(dir.path().to_path_buf());
        let result = get_session(&config, "missing");
        assert!(matches!(result, Err(SessionError::NotFound { .. })));
    }
}
