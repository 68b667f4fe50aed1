//! Installed application catalog from XDG `.desktop` files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::launcher::errors::LaunchError;
use crate::launcher::types::DesktopEntry;

/// `$XDG_DATA_HOME/applications` then each `$XDG_DATA_DIRS/applications`.
pub fn application_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(data_dir) = dirs::data_dir() {
        dirs.push(data_dir.join("applications"));
    }

    let data_dirs = std::env::var("XDG_DATA_DIRS")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());
    for dir in data_dirs.split(':').filter(|d| !d.is_empty()) {
        let applications = Path::new(dir).join("applications");
        if !dirs.contains(&applications) {
            dirs.push(applications);
        }
    }
    dirs
}

/// Visible applications found under `dirs`. The first directory providing
/// a desktop file id wins.
pub fn load_catalog(dirs: &[PathBuf]) -> Vec<DesktopEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for dir in dirs {
        collect_dir(dir, dir, &mut seen, &mut entries);
    }
    debug!(event = "core.launcher.catalog_loaded", count = entries.len());
    entries
}

fn collect_dir(
    root: &Path,
    dir: &Path,
    seen: &mut HashSet<String>,
    entries: &mut Vec<DesktopEntry>,
) {
    let Ok(read_dir) = fs::read_dir(dir) else {
        return;
    };
    let mut paths: Vec<PathBuf> = read_dir.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            collect_dir(root, &path, seen, entries);
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some("desktop") {
            continue;
        }

        // Subdirectories become '-' separated prefixes of the id.
        let id = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .with_extension("")
            .to_string_lossy()
            .replace('/', "-");
        if !seen.insert(id.clone()) {
            continue;
        }

        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        if let Some(entry) = parse_desktop_entry(&content, &id, &path) {
            entries.push(entry);
        }
    }
}

/// Parse the `[Desktop Entry]` group. Hidden, `NoDisplay` and non-application
/// entries, and entries without a usable `Exec`, yield `None`.
pub fn parse_desktop_entry(content: &str, id: &str, path: &Path) -> Option<DesktopEntry> {
    let mut in_main_group = false;
    let mut name = None;
    let mut exec = None;
    let mut entry_type = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') {
            in_main_group = line == "[Desktop Entry]";
            continue;
        }
        if !in_main_group {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "Name" => name = Some(value.to_string()),
            "Exec" => exec = Some(value.to_string()),
            "Type" => entry_type = Some(value.to_string()),
            "NoDisplay" | "Hidden" if value.eq_ignore_ascii_case("true") => return None,
            _ => {}
        }
    }

    if entry_type.as_deref().is_some_and(|t| t != "Application") {
        return None;
    }
    let exec = split_exec(&exec?);
    if exec.is_empty() {
        return None;
    }

    Some(DesktopEntry {
        id: id.to_string(),
        name: name.unwrap_or_else(|| id.to_string()),
        exec,
        path: path.to_path_buf(),
    })
}

/// Split an `Exec` value into arguments, honouring double quotes and
/// dropping field codes such as `%U`.
pub fn split_exec(exec: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;
    let mut chars = exec.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            '\\' if in_quotes => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            '%' => match chars.next() {
                Some('%') => {
                    current.push('%');
                    has_token = true;
                }
                // Field code: dropped
                Some(_) | None => {}
            },
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        args.push(current);
    }
    args.retain(|a| !a.is_empty());
    args
}

/// Entries whose id or name contains `app_name`, ignoring case.
pub fn search_apps_fuzzily<'a>(entries: &'a [DesktopEntry], app_name: &str) -> Vec<&'a DesktopEntry> {
    let needle = app_name.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    entries
        .iter()
        .filter(|e| e.id.to_lowercase().contains(&needle) || e.name.to_lowercase().contains(&needle))
        .collect()
}

/// The single application `app_name` designates.
///
/// Several matches that launch the same command count as one. Matches with
/// different commands are [`LaunchError::MoreThanOneResultFound`], listing
/// candidate ids in catalog order.
pub fn resolve_by_name<'a>(
    entries: &'a [DesktopEntry],
    app_name: &str,
) -> Result<&'a DesktopEntry, LaunchError> {
    let matches = search_apps_fuzzily(entries, app_name);
    let Some(first) = matches.first() else {
        return Err(LaunchError::NoMatch {
            app_name: app_name.to_string(),
        });
    };

    if matches.iter().all(|m| m.exec == first.exec) {
        return Ok(first);
    }

    Err(LaunchError::MoreThanOneResultFound {
        app_name: app_name.to_string(),
        candidates: matches.iter().map(|m| m.id.clone()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str, exec: &[&str]) -> DesktopEntry {
        DesktopEntry {
            id: id.to_string(),
            name: name.to_string(),
            exec: exec.iter().map(|s| s.to_string()).collect(),
            path: PathBuf::from(format!("/usr/share/applications/{id}.desktop")),
        }
    }

    #[test]
    fn test_parse_desktop_entry() {
        let content = "\
[Desktop Entry]
Name=Text Editor
Exec=gedit %U
Type=Application

[Desktop Action new-window]
Name=New Window
Exec=gedit --new-window
";
        let parsed =
            parse_desktop_entry(content, "org.gnome.gedit", Path::new("/x.desktop")).unwrap();
        assert_eq!(parsed.name, "Text Editor");
        assert_eq!(parsed.exec, vec!["gedit"]);
    }

    #[test]
    fn test_hidden_and_nodisplay_entries_skipped() {
        let hidden = "[Desktop Entry]\nName=A\nExec=a\nHidden=true\n";
        let no_display = "[Desktop Entry]\nName=B\nExec=b\nNoDisplay=true\n";
        let link = "[Desktop Entry]\nName=C\nType=Link\nURL=https://example.org\nExec=c\n";
        let no_exec = "[Desktop Entry]\nName=D\n";
        for content in [hidden, no_display, link, no_exec] {
            assert!(parse_desktop_entry(content, "x", Path::new("/x")).is_none());
        }
    }

    #[test]
    fn test_split_exec() {
        assert_eq!(
            split_exec(r#"env "FOO=a b" /opt/app/bin/app --flag %F"#),
            vec!["env", "FOO=a b", "/opt/app/bin/app", "--flag"]
        );
        assert_eq!(split_exec("app 100%%"), vec!["app", "100%"]);
        assert_eq!(split_exec(r#""/opt/My App/run" %u"#), vec!["/opt/My App/run"]);
        assert!(split_exec("  %U ").is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let entries = vec![
            entry("com.spotify.Client", "Spotify", &["spotify"]),
            entry("org.gnome.gedit", "Text Editor", &["gedit"]),
        ];
        let found = search_apps_fuzzily(&entries, "SPOTIFY");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "com.spotify.Client");
        assert!(search_apps_fuzzily(&entries, "").is_empty());
    }

    #[test]
    fn test_resolve_unique_match() {
        let entries = vec![
            entry("com.spotify.Client", "Spotify", &["spotify"]),
            entry("org.gnome.gedit", "Text Editor", &["gedit"]),
        ];
        assert_eq!(resolve_by_name(&entries, "gedit").unwrap().exec, vec!["gedit"]);
    }

    #[test]
    fn test_resolve_duplicates_with_same_command_count_as_one() {
        let entries = vec![
            entry("spotify_spotify", "Spotify", &["spotify"]),
            entry("com.spotify.Client", "Spotify", &["spotify"]),
        ];
        let resolved = resolve_by_name(&entries, "spotify").unwrap();
        assert_eq!(resolved.id, "spotify_spotify");
    }

    #[test]
    fn test_resolve_different_commands_is_ambiguous() {
        let entries = vec![
            entry("libreoffice-writer", "LibreOffice Writer", &["libreoffice", "--writer"]),
            entry("libreoffice-calc", "LibreOffice Calc", &["libreoffice", "--calc"]),
        ];
        match resolve_by_name(&entries, "libreoffice") {
            Err(LaunchError::MoreThanOneResultFound { candidates, .. }) => {
                assert_eq!(candidates, vec!["libreoffice-writer", "libreoffice-calc"]);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_no_match() {
        let entries = vec![entry("org.gnome.gedit", "Text Editor", &["gedit"])];
        assert!(matches!(
            resolve_by_name(&entries, "spotify"),
            Err(LaunchError::NoMatch { .. })
        ));
    }

    #[test]
    fn test_load_catalog_first_dir_wins() {
        let user = tempfile::tempdir().unwrap();
        let system = tempfile::tempdir().unwrap();
        fs::create_dir_all(system.path().join("kde")).unwrap();
        fs::write(
            user.path().join("gedit.desktop"),
            "[Desktop Entry]\nName=My Gedit\nExec=gedit --user\n",
        )
        .unwrap();
        fs::write(
            system.path().join("gedit.desktop"),
            "[Desktop Entry]\nName=Gedit\nExec=gedit\n",
        )
        .unwrap();
        fs::write(
            system.path().join("kde").join("konsole.desktop"),
            "[Desktop Entry]\nName=Konsole\nExec=konsole\n",
        )
        .unwrap();

        let catalog = load_catalog(&[user.path().to_path_buf(), system.path().to_path_buf()]);
        assert_eq!(catalog.len(), 2);
        let gedit = catalog.iter().find(|e| e.id == "gedit").unwrap();
        assert_eq!(gedit.exec, vec!["gedit", "--user"]);
        assert!(catalog.iter().any(|e| e.id == "kde-konsole"));
    }
}
