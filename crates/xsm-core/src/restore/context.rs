//! Shared state of one restore, owned by the engine and lent to the
//! placement worker. One lock guards it and is never held across a call
//! into the window system, the process table or the launcher.

use std::collections::{HashMap, HashSet};
use std::sync::mpsc::Sender;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::restore::types::{DescriptorState, RestoreEvent};
use crate::sessions::WindowDescriptor;
use crate::windows::WindowId;

#[derive(Debug, Clone)]
pub struct RestoreEntry {
    pub descriptor: WindowDescriptor,
    /// Descriptors saved with the same pid share a group and one launch.
    pub group: usize,
    pub state: DescriptorState,
    pub failure: Option<String>,
    /// Live windows claimed when the descriptor was placed.
    pub windows: Vec<WindowId>,
    pub geometry_applied: bool,
}

#[derive(Debug)]
struct JobState {
    entries: Vec<RestoreEntry>,
    pending: usize,
    placed_windows: HashSet<WindowId>,
    restore_geometry: bool,
    windows_moved: usize,
}

#[derive(Debug)]
pub struct RestoreJob {
    state: Mutex<JobState>,
}

impl RestoreJob {
    /// Working copy of `descriptors`: heaviest memory users first, grouped
    /// by saved pid, pids cleared.
    pub fn new(mut descriptors: Vec<WindowDescriptor>) -> Self {
        descriptors.sort_by(|a, b| b.memory_percent.total_cmp(&a.memory_percent));

        let mut groups: HashMap<u32, usize> = HashMap::new();
        let mut next_group = 0;
        let entries = descriptors
            .into_iter()
            .map(|mut descriptor| {
                let group = match descriptor.pid.take() {
                    Some(pid) => *groups.entry(pid).or_insert_with(|| {
                        next_group += 1;
                        next_group - 1
                    }),
                    None => {
                        next_group += 1;
                        next_group - 1
                    }
                };
                RestoreEntry {
                    descriptor,
                    group,
                    state: DescriptorState::Pending,
                    failure: None,
                    windows: Vec::new(),
                    geometry_applied: false,
                }
            })
            .collect();

        Self::from_entries(entries)
    }

    /// Working copy for placement only: every descriptor is assumed to be
    /// running already and is found by command line.
    pub fn for_move(descriptors: Vec<WindowDescriptor>) -> Self {
        let entries = descriptors
            .into_iter()
            .enumerate()
            .map(|(group, mut descriptor)| {
                descriptor.pid = None;
                RestoreEntry {
                    descriptor,
                    group,
                    state: DescriptorState::RunningAlready,
                    failure: None,
                    windows: Vec::new(),
                    geometry_applied: false,
                }
            })
            .collect();
        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<RestoreEntry>) -> Self {
        let pending = entries.len();
        Self {
            state: Mutex::new(JobState {
                entries,
                pending,
                placed_windows: HashSet::new(),
                restore_geometry: false,
                windows_moved: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, JobState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn pending(&self) -> usize {
        self.lock().pending
    }

    pub fn desktops(&self) -> Vec<i32> {
        self.lock()
            .entries
            .iter()
            .map(|e| e.descriptor.desktop_number)
            .collect()
    }

    /// `windows_count` of the heaviest saved app.
    pub fn heaviest_windows_count(&self) -> Option<usize> {
        self.lock()
            .entries
            .first()
            .map(|e| e.descriptor.windows_count)
    }

    pub fn restore_geometry(&self) -> bool {
        self.lock().restore_geometry
    }

    pub fn set_restore_geometry(&self, enabled: bool) {
        self.lock().restore_geometry = enabled;
    }

    /// First descriptor of every group still waiting to be launched.
    pub fn pending_group_leaders(&self) -> Vec<(usize, WindowDescriptor)> {
        let state = self.lock();
        let mut seen = HashSet::new();
        state
            .entries
            .iter()
            .filter(|e| seen.insert(e.group))
            .filter(|e| e.state == DescriptorState::Pending)
            .map(|e| (e.group, e.descriptor.clone()))
            .collect()
    }

    /// Move a whole group to `state`, adopting `pid` when given.
    pub fn set_group_state(&self, group: usize, new_state: DescriptorState, pid: Option<u32>) {
        let mut state = self.lock();
        for entry in state.entries.iter_mut().filter(|e| e.group == group) {
            entry.state = new_state;
            if pid.is_some() {
                entry.descriptor.pid = pid;
            }
        }
    }

    pub fn fail_group(&self, group: usize, reason: &str) {
        let mut state = self.lock();
        let mut closed = 0;
        for entry in state.entries.iter_mut().filter(|e| e.group == group) {
            if entry.state.is_open() {
                closed += 1;
            }
            entry.state = DescriptorState::Failed;
            entry.failure = Some(reason.to_string());
        }
        state.pending = state.pending.saturating_sub(closed);
    }

    /// Descriptors launched or adopted but not placed yet, by index.
    pub fn placement_candidates(&self) -> Vec<(usize, WindowDescriptor)> {
        self.lock()
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.state.awaits_placement())
            .map(|(i, e)| (i, e.descriptor.clone()))
            .collect()
    }

    pub fn is_window_placed(&self, id: WindowId) -> bool {
        self.lock().placed_windows.contains(&id)
    }

    /// Confirm a descriptor on its desktop and claim its windows.
    /// `geometry_applied` tells whether its saved geometry went out with the
    /// placement.
    pub fn mark_placed(
        &self,
        index: usize,
        windows: &[WindowId],
        moved: usize,
        geometry_applied: bool,
    ) {
        let mut state = self.lock();
        let Some(entry) = state.entries.get_mut(index) else {
            return;
        };
        if !entry.state.is_open() {
            return;
        }
        entry.state = DescriptorState::Placed;
        entry.windows = windows.to_vec();
        entry.geometry_applied = geometry_applied;
        state.pending = state.pending.saturating_sub(1);
        state.placed_windows.extend(windows.iter().copied());
        state.windows_moved += moved;
        debug!(
            event = "core.restore.descriptor_placed",
            index = index,
            pending = state.pending
        );
    }

    /// Placed descriptors with a saved geometry that was not applied yet,
    /// with the windows they claimed.
    pub fn geometry_backlog(&self) -> Vec<(usize, WindowDescriptor, Vec<WindowId>)> {
        self.lock()
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.state == DescriptorState::Placed && !e.geometry_applied)
            .filter(|(_, e)| e.descriptor.geometry.is_some())
            .map(|(i, e)| (i, e.descriptor.clone(), e.windows.clone()))
            .collect()
    }

    pub fn mark_geometry_applied(&self, index: usize) {
        if let Some(entry) = self.lock().entries.get_mut(index) {
            entry.geometry_applied = true;
        }
    }

    pub fn windows_moved(&self) -> usize {
        self.lock().windows_moved
    }

    /// Close the job: anything still open becomes `Unplaced`.
    pub fn finish(&self) -> Vec<RestoreEntry> {
        let mut state = self.lock();
        for entry in state.entries.iter_mut().filter(|e| e.state.is_open()) {
            entry.state = DescriptorState::Unplaced;
        }
        state.pending = 0;
        state.entries.clone()
    }
}

/// Optional event channel; sends never fail the restore.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    sender: Option<Sender<RestoreEvent>>,
}

impl EventSink {
    pub fn new(sender: Sender<RestoreEvent>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: RestoreEvent) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(event);
        }
    }
}
