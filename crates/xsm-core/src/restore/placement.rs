//! One placement pass: find the live windows of every launched or adopted
//! descriptor and put them on their saved desktops.

use std::collections::{HashMap, HashSet};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::process::{ProcessError, ProcessTable};
use crate::restore::context::{EventSink, RestoreJob};
use crate::restore::matching::{TitleMatcher, is_same_command};
use crate::restore::types::{PlacementOutcome, RestoreEvent};
use crate::sessions::{WindowDescriptor, WindowState};
use crate::windows::{RawWindow, WindowId, WindowSystem, list_windows_with_retry};

pub struct Placer<'a> {
    pub windows: &'a dyn WindowSystem,
    pub processes: &'a dyn ProcessTable,
    pub matcher: &'a TitleMatcher,
    pub events: &'a EventSink,
    pub move_settle: Duration,
    pub enumeration_retry_delay: Duration,
}

impl Placer<'_> {
    /// Run one pass over every descriptor awaiting placement. Returns the
    /// number of windows moved.
    pub fn run_pass(&self, job: &RestoreJob) -> usize {
        let candidates = job.placement_candidates();
        if candidates.is_empty() {
            return 0;
        }

        let live = match list_windows_with_retry(self.windows, self.enumeration_retry_delay) {
            Ok(live) => live,
            Err(e) => {
                warn!(event = "core.restore.pass_enumeration_failed", error = %e);
                return 0;
            }
        };

        let mut windows_per_pid: HashMap<u32, usize> = HashMap::new();
        for window in &live {
            *windows_per_pid.entry(window.pid).or_default() += 1;
        }

        let restore_geometry = job.restore_geometry();
        let mut moved = 0;
        for (index, saved) in candidates {
            match self.place(job, index, &saved, &live, &windows_per_pid, restore_geometry) {
                PlacementOutcome::Placed { moved: n } => moved += n,
                PlacementOutcome::NeedsRetry => debug!(
                    event = "core.restore.placement_deferred",
                    app_name = saved.app_name,
                    title = saved.title
                ),
            }
        }
        moved
    }

    /// Apply saved geometry to windows placed while it was still switched
    /// off. Returns the number of descriptors handled.
    pub fn restore_placed_geometry(&self, job: &RestoreJob) -> usize {
        let backlog = job.geometry_backlog();
        for (index, saved, windows) in &backlog {
            for id in windows {
                self.apply_geometry(saved, *id, true);
            }
            job.mark_geometry_applied(*index);
        }
        if !backlog.is_empty() {
            debug!(
                event = "core.restore.placed_geometry_restored",
                descriptors = backlog.len()
            );
        }
        backlog.len()
    }

    fn place(
        &self,
        job: &RestoreJob,
        index: usize,
        saved: &WindowDescriptor,
        live: &[RawWindow],
        windows_per_pid: &HashMap<u32, usize>,
        restore_geometry: bool,
    ) -> PlacementOutcome {
        let pids = self.candidate_pids(saved);
        if pids.is_empty() {
            return PlacementOutcome::NeedsRetry;
        }

        let owned: Vec<&RawWindow> = live
            .iter()
            .filter(|w| pids.contains(&w.pid))
            .filter(|w| !job.is_window_placed(w.id))
            .collect();
        let owners: HashSet<u32> = owned.iter().map(|w| w.pid).collect();

        let matched: Vec<&RawWindow> = if owners.len() > 1 {
            // Several processes run this command: the title decides, and
            // without a title match only one window is claimed.
            let by_title: Vec<&RawWindow> = owned
                .iter()
                .copied()
                .filter(|w| self.is_same_window(w, saved))
                .collect();
            if by_title.is_empty() {
                owned.into_iter().take(1).collect()
            } else {
                by_title
            }
        } else {
            owned
                .into_iter()
                .filter(|w| {
                    windows_per_pid.get(&w.pid).copied().unwrap_or(0) == 1
                        || self.is_same_window(w, saved)
                })
                .collect()
        };
        if matched.is_empty() {
            return PlacementOutcome::NeedsRetry;
        }

        let mut placed = Vec::with_capacity(matched.len());
        let mut moved = 0;
        for window in matched {
            if window.desktop == saved.desktop_number {
                self.apply_geometry(saved, window.id, restore_geometry);
                self.fix_state(saved.window_state, window.id);
                self.events.emit(RestoreEvent::WindowAlreadyPlaced {
                    title: window.title.clone(),
                    window_id: window.id,
                    desktop: window.desktop,
                });
                placed.push(window.id);
            } else if self.move_window(window, saved, restore_geometry) {
                placed.push(window.id);
                moved += 1;
            }
        }

        if placed.is_empty() {
            return PlacementOutcome::NeedsRetry;
        }
        job.mark_placed(index, &placed, moved, restore_geometry);
        PlacementOutcome::Placed { moved }
    }

    /// The process tree to search: the known pid and its children, or
    /// every process running the saved command line.
    fn candidate_pids(&self, saved: &WindowDescriptor) -> HashSet<u32> {
        if let Some(pid) = saved.pid {
            match self.processes.inspect(pid) {
                Err(ProcessError::NotFound { .. }) => {
                    debug!(event = "core.restore.launched_process_gone", pid = pid);
                }
                _ => {
                    let mut pids: HashSet<u32> =
                        self.processes.children(pid).into_iter().collect();
                    pids.insert(pid);
                    return pids;
                }
            }
        }

        if saved.command.is_empty() {
            return HashSet::new();
        }
        self.processes
            .enumerate()
            .into_iter()
            .filter(|p| is_same_command(&p.command, &saved.command))
            .map(|p| p.pid.as_u32())
            .collect()
    }

    fn is_same_window(&self, window: &RawWindow, saved: &WindowDescriptor) -> bool {
        let app_name = self.windows.app_name(window.id).unwrap_or_default();
        self.matcher.is_same_window(&app_name, &window.title, saved)
    }

    fn move_window(&self, window: &RawWindow, saved: &WindowDescriptor, restore_geometry: bool) -> bool {
        let was_sticky = self.windows.is_sticky(window.id).unwrap_or(false);

        if let Err(e) = self.windows.move_to_desktop(window.id, saved.desktop_number) {
            warn!(
                event = "core.restore.move_failed",
                window_id = %window.id,
                desktop = saved.desktop_number,
                error = %e
            );
            return false;
        }
        thread::sleep(self.move_settle);

        self.fix_state(saved.window_state, window.id);
        // Some window managers drop stickiness on a desktop change.
        if was_sticky && !self.windows.is_sticky(window.id).unwrap_or(true) {
            if let Err(e) = self.windows.make_sticky(window.id) {
                warn!(event = "core.restore.restick_failed", window_id = %window.id, error = %e);
            }
        }
        self.apply_geometry(saved, window.id, restore_geometry);

        self.events.emit(RestoreEvent::WindowMoved {
            title: window.title.clone(),
            window_id: window.id,
            desktop: saved.desktop_number,
        });
        true
    }

    fn apply_geometry(&self, saved: &WindowDescriptor, id: WindowId, enabled: bool) {
        if !enabled {
            return;
        }
        let Some(position) = &saved.geometry else {
            return;
        };
        if position.provider != self.windows.geometry_provider() {
            debug!(
                event = "core.restore.geometry_provider_mismatch",
                saved = position.provider,
                live = self.windows.geometry_provider()
            );
            return;
        }
        if let Err(e) = self.windows.set_geometry(id, position.geometry()) {
            warn!(event = "core.restore.geometry_failed", window_id = %id, error = %e);
        }
    }

    fn fix_state(&self, state: Option<WindowState>, id: WindowId) {
        let Some(state) = state else {
            return;
        };
        if state.is_sticky {
            if let Err(e) = self.windows.make_sticky(id) {
                warn!(event = "core.restore.make_sticky_failed", window_id = %id, error = %e);
            }
        }
        if state.is_above {
            if let Err(e) = self.windows.make_above(id) {
                warn!(event = "core.restore.make_above_failed", window_id = %id, error = %e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessInfo;
    use crate::restore::types::DescriptorState;
    use crate::sessions::WindowPosition;
    use crate::test_support::{FakeProcessTable, FakeWindowSystem, raw_window};
    use crate::windows::Geometry;

    fn saved(desktop: i32, app: &str, title: &str, command: &[&str]) -> WindowDescriptor {
        serde_json::from_value(serde_json::json!({
            "window_id": "0xdead",
            "desktop_number": desktop,
            "app_name": app,
            "window_title": title,
            "cmd": command,
        }))
        .unwrap()
    }

    struct Harness {
        windows: FakeWindowSystem,
        processes: FakeProcessTable,
        matcher: TitleMatcher,
        events: EventSink,
    }

    impl Harness {
        fn new(windows: FakeWindowSystem, processes: FakeProcessTable) -> Self {
            Self {
                windows,
                processes,
                matcher: TitleMatcher::default(),
                events: EventSink::none(),
            }
        }

        fn placer(&self) -> Placer<'_> {
            Placer {
                windows: &self.windows,
                processes: &self.processes,
                matcher: &self.matcher,
                events: &self.events,
                move_settle: Duration::ZERO,
                enumeration_retry_delay: Duration::ZERO,
            }
        }
    }

    #[test]
    fn test_moves_single_window_found_by_command() {
        let windows = FakeWindowSystem::new(vec![raw_window(0x10, 0, 100, "notes.txt - gedit")]);
        let processes = FakeProcessTable::new();
        processes.add(ProcessInfo::new(100, vec!["gedit".into()]));
        let h = Harness::new(windows, processes);

        let job = RestoreJob::for_move(vec![saved(2, "gedit", "other title", &["gedit"])]);
        let moved = h.placer().run_pass(&job);

        assert_eq!(moved, 1);
        assert_eq!(h.windows.moves(), vec![(WindowId::new(0x10), 2)]);
        assert_eq!(job.pending(), 0);
    }

    #[test]
    fn test_already_on_desktop_is_placed_without_move() {
        let windows = FakeWindowSystem::new(vec![raw_window(0x10, 2, 100, "gedit")]);
        let processes = FakeProcessTable::new();
        processes.add(ProcessInfo::new(100, vec!["gedit".into()]));
        let h = Harness::new(windows, processes);

        let job = RestoreJob::for_move(vec![saved(2, "gedit", "gedit", &["gedit"])]);
        assert_eq!(h.placer().run_pass(&job), 0);
        assert!(h.windows.moves().is_empty());
        assert_eq!(job.pending(), 0);
    }

    #[test]
    fn test_multi_window_process_matches_by_title() {
        let windows = FakeWindowSystem::new(vec![
            raw_window(0x10, 0, 100, "Inbox"),
            raw_window(0x11, 0, 100, "Calendar"),
        ]);
        let processes = FakeProcessTable::new();
        processes.add(ProcessInfo::new(100, vec!["mail".into()]));
        let h = Harness::new(windows, processes);

        let job = RestoreJob::for_move(vec![saved(3, "mail", "Calendar", &["mail"])]);
        h.placer().run_pass(&job);
        assert_eq!(h.windows.moves(), vec![(WindowId::new(0x11), 3)]);
    }

    #[test]
    fn test_no_candidate_process_needs_retry() {
        let h = Harness::new(FakeWindowSystem::new(vec![]), FakeProcessTable::new());
        let job = RestoreJob::for_move(vec![saved(1, "gedit", "gedit", &["gedit"])]);
        assert_eq!(h.placer().run_pass(&job), 0);
        assert_eq!(job.pending(), 1);
        assert_eq!(job.placement_candidates().len(), 1);
    }

    #[test]
    fn test_launched_pid_searches_children() {
        let windows = FakeWindowSystem::new(vec![raw_window(0x20, 0, 501, "Browser")]);
        let processes = FakeProcessTable::new();
        processes.add(ProcessInfo::new(500, vec!["browser-launcher".into()]));
        processes.add(ProcessInfo::new(501, vec!["browser".into()]));
        processes.add_child(500, 501);
        let h = Harness::new(windows, processes);

        let job = RestoreJob::new(vec![saved(1, "browser", "Browser", &["browser-launcher"])]);
        let group = job.pending_group_leaders()[0].0;
        job.set_group_state(group, DescriptorState::Launched, Some(500));

        h.placer().run_pass(&job);
        assert_eq!(h.windows.moves(), vec![(WindowId::new(0x20), 1)]);
    }

    #[test]
    fn test_geometry_only_when_enabled_and_provider_matches() {
        let windows = FakeWindowSystem::new(vec![raw_window(0x10, 0, 100, "gedit")]);
        let processes = FakeProcessTable::new();
        processes.add(ProcessInfo::new(100, vec!["gedit".into()]));
        let h = Harness::new(windows, processes);

        let geometry = Geometry {
            x: 10,
            y: 20,
            width: 300,
            height: 200,
        };
        let mut with_geometry = saved(0, "gedit", "gedit", &["gedit"]);
        with_geometry.geometry = Some(WindowPosition::new("wmctrl", geometry));

        let job = RestoreJob::for_move(vec![with_geometry.clone()]);
        h.placer().run_pass(&job);
        assert!(h.windows.geometry_calls().is_empty());

        let job = RestoreJob::for_move(vec![with_geometry.clone()]);
        job.set_restore_geometry(true);
        h.placer().run_pass(&job);
        assert_eq!(h.windows.geometry_calls(), vec![(WindowId::new(0x10), geometry)]);

        let mut foreign = with_geometry;
        foreign.geometry = Some(WindowPosition::new("other", geometry));
        let job = RestoreJob::for_move(vec![foreign]);
        job.set_restore_geometry(true);
        h.placer().run_pass(&job);
        assert_eq!(h.windows.geometry_calls().len(), 1);
    }

    #[test]
    fn test_same_command_in_two_processes_matched_by_title() {
        let windows = FakeWindowSystem::new(vec![
            raw_window(0x10, 0, 100, "xterm-a"),
            raw_window(0x11, 0, 101, "xterm-b"),
        ]);
        let processes = FakeProcessTable::new();
        processes.add(ProcessInfo::new(100, vec!["xterm".into()]));
        processes.add(ProcessInfo::new(101, vec!["xterm".into()]));
        let h = Harness::new(windows, processes);

        let job = RestoreJob::for_move(vec![
            saved(1, "xterm", "xterm-a", &["xterm"]),
            saved(2, "xterm", "xterm-b", &["xterm"]),
        ]);
        assert_eq!(h.placer().run_pass(&job), 2);
        assert_eq!(
            h.windows.moves(),
            vec![(WindowId::new(0x10), 1), (WindowId::new(0x11), 2)]
        );
        assert_eq!(job.pending(), 0);
    }

    #[test]
    fn test_same_command_without_title_match_claims_one_window_each() {
        let windows = FakeWindowSystem::new(vec![
            raw_window(0x10, 0, 100, "renamed-a"),
            raw_window(0x11, 0, 101, "renamed-b"),
        ]);
        let processes = FakeProcessTable::new();
        processes.add(ProcessInfo::new(100, vec!["xterm".into()]));
        processes.add(ProcessInfo::new(101, vec!["xterm".into()]));
        let h = Harness::new(windows, processes);

        let job = RestoreJob::for_move(vec![
            saved(1, "xterm", "xterm-a", &["xterm"]),
            saved(2, "xterm", "xterm-b", &["xterm"]),
        ]);
        h.placer().run_pass(&job);
        assert_eq!(
            h.windows.moves(),
            vec![(WindowId::new(0x10), 1), (WindowId::new(0x11), 2)]
        );
        assert_eq!(job.pending(), 0);
    }

    #[test]
    fn test_exited_launched_pid_falls_back_to_command_scan() {
        let windows = FakeWindowSystem::new(vec![raw_window(0x30, 0, 601, "Player")]);
        let processes = FakeProcessTable::new();
        processes.add(ProcessInfo::new(600, vec!["player".into()]));
        processes.add(ProcessInfo::new(601, vec!["player".into()]));
        let h = Harness::new(windows, processes);

        let job = RestoreJob::new(vec![saved(2, "player", "Player", &["player"])]);
        let group = job.pending_group_leaders()[0].0;
        job.set_group_state(group, DescriptorState::Launched, Some(600));
        // The launched process handed over to an existing instance and exited.
        h.processes.remove(600);

        h.placer().run_pass(&job);
        assert_eq!(h.windows.moves(), vec![(WindowId::new(0x30), 2)]);
        assert_eq!(job.pending(), 0);
    }

    #[test]
    fn test_geometry_restored_later_for_windows_placed_without_it() {
        let windows = FakeWindowSystem::new(vec![raw_window(0x10, 0, 100, "gedit")]);
        let processes = FakeProcessTable::new();
        processes.add(ProcessInfo::new(100, vec!["gedit".into()]));
        let h = Harness::new(windows, processes);

        let geometry = Geometry {
            x: 5,
            y: 5,
            width: 640,
            height: 480,
        };
        let mut with_geometry = saved(1, "gedit", "gedit", &["gedit"]);
        with_geometry.geometry = Some(WindowPosition::new("wmctrl", geometry));

        let job = RestoreJob::for_move(vec![with_geometry]);
        h.placer().run_pass(&job);
        assert_eq!(job.pending(), 0);
        assert!(h.windows.geometry_calls().is_empty());

        assert_eq!(h.placer().restore_placed_geometry(&job), 1);
        assert_eq!(h.windows.geometry_calls(), vec![(WindowId::new(0x10), geometry)]);
        assert_eq!(h.placer().restore_placed_geometry(&job), 0);
        assert_eq!(h.windows.geometry_calls().len(), 1);
    }

    #[test]
    fn test_sticky_window_is_restuck_after_move() {
        let windows = FakeWindowSystem::new(vec![raw_window(0x10, 0, 100, "clock")]);
        windows.set_sticky(0x10, true);
        windows.set_drops_sticky_on_move(true);
        let processes = FakeProcessTable::new();
        processes.add(ProcessInfo::new(100, vec!["clock".into()]));
        let h = Harness::new(windows, processes);

        let job = RestoreJob::for_move(vec![saved(1, "clock", "clock", &["clock"])]);
        h.placer().run_pass(&job);
        assert!(h.windows.is_sticky(WindowId::new(0x10)).unwrap());
    }
}
