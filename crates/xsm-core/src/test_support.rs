//! In-memory fakes of the desktop collaborators.
//!
//! The fakes are linked the way a real desktop is: a [`FakeAppLauncher`]
//! attached to a [`FakeWindowSystem`] and [`FakeProcessTable`] makes the
//! process and windows of a registered program appear when it is spawned.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::desktop::Desktop;
use crate::launcher::{AppLauncher, DesktopEntry, LaunchError};
use crate::process::{ProcessError, ProcessInfo, ProcessTable};
use crate::windows::{Geometry, RawWindow, WindowError, WindowId, WindowSystem};
use crate::workspaces::{WorkspaceError, WorkspaceSettings};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

pub fn raw_window(id: u64, desktop: i32, pid: u32, title: &str) -> RawWindow {
    RawWindow {
        id: WindowId::new(id),
        desktop,
        pid,
        geometry: Geometry {
            x: 0,
            y: 0,
            width: 800,
            height: 600,
        },
        machine: "desktop".to_string(),
        title: title.to_string(),
    }
}

#[derive(Default)]
struct WindowsState {
    windows: Vec<RawWindow>,
    app_names: HashMap<WindowId, String>,
    sticky: HashSet<WindowId>,
    above: HashSet<WindowId>,
    failing_enumerations: usize,
    window_manager: String,
    workspace_count: usize,
    drops_sticky_on_move: bool,
    moves: Vec<(WindowId, i32)>,
    closed: Vec<WindowId>,
    geometry_calls: Vec<(WindowId, Geometry)>,
}

pub struct FakeWindowSystem {
    state: Mutex<WindowsState>,
}

impl FakeWindowSystem {
    pub fn new(windows: Vec<RawWindow>) -> Self {
        Self {
            state: Mutex::new(WindowsState {
                windows,
                window_manager: "Xfwm4".to_string(),
                workspace_count: 4,
                ..Default::default()
            }),
        }
    }

    pub fn fail_next_enumerations(&self, count: usize) {
        lock(&self.state).failing_enumerations = count;
    }

    pub fn set_app_name(&self, id: u64, app_name: &str) {
        lock(&self.state)
            .app_names
            .insert(WindowId::new(id), app_name.to_string());
    }

    pub fn set_sticky(&self, id: u64, sticky: bool) {
        let mut state = lock(&self.state);
        if sticky {
            state.sticky.insert(WindowId::new(id));
        } else {
            state.sticky.remove(&WindowId::new(id));
        }
    }

    pub fn set_window_manager(&self, name: &str) {
        lock(&self.state).window_manager = name.to_string();
    }

    pub fn set_workspace_count(&self, count: usize) {
        lock(&self.state).workspace_count = count;
    }

    /// Model a window manager that unsticks windows sent to a desktop.
    pub fn set_drops_sticky_on_move(&self, drops: bool) {
        lock(&self.state).drops_sticky_on_move = drops;
    }

    pub fn add_window(&self, window: RawWindow, app_name: &str) {
        let mut state = lock(&self.state);
        state.app_names.insert(window.id, app_name.to_string());
        state.windows.push(window);
    }

    pub fn windows(&self) -> Vec<RawWindow> {
        lock(&self.state).windows.clone()
    }

    pub fn desktop_of(&self, id: u64) -> Option<i32> {
        lock(&self.state)
            .windows
            .iter()
            .find(|w| w.id == WindowId::new(id))
            .map(|w| w.desktop)
    }

    pub fn moves(&self) -> Vec<(WindowId, i32)> {
        lock(&self.state).moves.clone()
    }

    pub fn closed(&self) -> Vec<WindowId> {
        lock(&self.state).closed.clone()
    }

    pub fn geometry_calls(&self) -> Vec<(WindowId, Geometry)> {
        lock(&self.state).geometry_calls.clone()
    }

    fn not_found(id: WindowId) -> WindowError {
        WindowError::WindowNotFound {
            window_id: id.to_string(),
        }
    }
}

impl WindowSystem for FakeWindowSystem {
    fn list_windows(&self) -> Result<Vec<RawWindow>, WindowError> {
        let mut state = lock(&self.state);
        if state.failing_enumerations > 0 {
            state.failing_enumerations -= 1;
            return Err(WindowError::EnumerationFailed {
                message: "display busy".to_string(),
            });
        }
        Ok(state.windows.clone())
    }

    fn close(&self, id: WindowId) -> Result<(), WindowError> {
        let mut state = lock(&self.state);
        let before = state.windows.len();
        state.windows.retain(|w| w.id != id);
        if state.windows.len() == before {
            return Err(Self::not_found(id));
        }
        state.closed.push(id);
        Ok(())
    }

    fn move_to_desktop(&self, id: WindowId, desktop: i32) -> Result<(), WindowError> {
        let mut state = lock(&self.state);
        let window = state
            .windows
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        window.desktop = desktop;
        state.moves.push((id, desktop));
        if state.drops_sticky_on_move {
            state.sticky.remove(&id);
        }
        Ok(())
    }

    fn geometry(&self, id: WindowId) -> Result<Option<Geometry>, WindowError> {
        Ok(lock(&self.state)
            .windows
            .iter()
            .find(|w| w.id == id)
            .map(|w| w.geometry))
    }

    fn set_geometry(&self, id: WindowId, geometry: Geometry) -> Result<(), WindowError> {
        let mut state = lock(&self.state);
        let window = state
            .windows
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        window.geometry = geometry;
        state.geometry_calls.push((id, geometry));
        Ok(())
    }

    fn is_sticky(&self, id: WindowId) -> Result<bool, WindowError> {
        Ok(lock(&self.state).sticky.contains(&id))
    }

    fn make_sticky(&self, id: WindowId) -> Result<(), WindowError> {
        lock(&self.state).sticky.insert(id);
        Ok(())
    }

    fn is_above(&self, id: WindowId) -> Result<bool, WindowError> {
        Ok(lock(&self.state).above.contains(&id))
    }

    fn make_above(&self, id: WindowId) -> Result<(), WindowError> {
        lock(&self.state).above.insert(id);
        Ok(())
    }

    fn app_name(&self, id: WindowId) -> Result<String, WindowError> {
        Ok(lock(&self.state)
            .app_names
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }

    fn workspace_count(&self) -> Result<usize, WindowError> {
        Ok(lock(&self.state).workspace_count)
    }

    fn window_manager_name(&self) -> Result<String, WindowError> {
        Ok(lock(&self.state).window_manager.clone())
    }
}

#[derive(Default)]
struct ProcessState {
    processes: Vec<ProcessInfo>,
    children: HashMap<u32, Vec<u32>>,
}

#[derive(Default)]
pub struct FakeProcessTable {
    state: Mutex<ProcessState>,
}

impl FakeProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, process: ProcessInfo) {
        let mut state = lock(&self.state);
        state.processes.retain(|p| p.pid != process.pid);
        state.processes.push(process);
    }

    pub fn remove(&self, pid: u32) {
        lock(&self.state).processes.retain(|p| p.pid.as_u32() != pid);
    }

    pub fn add_child(&self, parent: u32, child: u32) {
        lock(&self.state)
            .children
            .entry(parent)
            .or_default()
            .push(child);
    }
}

impl ProcessTable for FakeProcessTable {
    fn inspect(&self, pid: u32) -> Result<ProcessInfo, ProcessError> {
        lock(&self.state)
            .processes
            .iter()
            .find(|p| p.pid.as_u32() == pid)
            .cloned()
            .ok_or(ProcessError::NotFound { pid })
    }

    fn enumerate(&self) -> Vec<ProcessInfo> {
        lock(&self.state).processes.clone()
    }

    fn children(&self, pid: u32) -> Vec<u32> {
        lock(&self.state)
            .children
            .get(&pid)
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Default)]
struct LauncherState {
    /// Program → windows (title, app name) it opens.
    programs: HashMap<String, Vec<(String, String)>>,
    snaps: HashSet<String>,
    installed: Vec<DesktopEntry>,
    spawned: Vec<Vec<String>>,
    next_pid: u32,
    next_window: u64,
}

pub struct FakeAppLauncher {
    windows: Arc<FakeWindowSystem>,
    processes: Arc<FakeProcessTable>,
    state: Mutex<LauncherState>,
}

impl FakeAppLauncher {
    pub fn new() -> Self {
        Self::attached(
            Arc::new(FakeWindowSystem::new(vec![])),
            Arc::new(FakeProcessTable::new()),
        )
    }

    pub fn attached(windows: Arc<FakeWindowSystem>, processes: Arc<FakeProcessTable>) -> Self {
        Self {
            windows,
            processes,
            state: Mutex::new(LauncherState {
                next_pid: 5000,
                next_window: 0x1000,
                ..Default::default()
            }),
        }
    }

    /// Make `program` spawnable; each spawn opens one window per
    /// `(title, app_name)` on desktop 0.
    pub fn register_program(&self, program: &str, windows: &[(&str, &str)]) {
        let windows = windows
            .iter()
            .map(|(title, app)| (title.to_string(), app.to_string()))
            .collect();
        lock(&self.state)
            .programs
            .insert(program.to_string(), windows);
    }

    pub fn register_snap(&self, name: &str) {
        lock(&self.state).snaps.insert(name.to_string());
    }

    pub fn add_installed(&self, id: &str, name: &str, exec: &[&str]) {
        lock(&self.state).installed.push(DesktopEntry {
            id: id.to_string(),
            name: name.to_string(),
            exec: exec.iter().map(|s| s.to_string()).collect(),
            path: format!("/usr/share/applications/{id}.desktop").into(),
        });
    }

    pub fn spawned(&self) -> Vec<Vec<String>> {
        lock(&self.state).spawned.clone()
    }

    fn start(&self, command: Vec<String>, windows: Vec<(String, String)>) -> u32 {
        let (pid, first_window) = {
            let mut state = lock(&self.state);
            let pid = state.next_pid;
            let first_window = state.next_window;
            state.next_pid += 1;
            state.next_window += windows.len() as u64;
            state.spawned.push(command.clone());
            (pid, first_window)
        };

        self.processes.add(ProcessInfo::new(pid, command));
        for (offset, (title, app_name)) in windows.iter().enumerate() {
            self.windows
                .add_window(raw_window(first_window + offset as u64, 0, pid, title), app_name);
        }
        pid
    }
}

impl AppLauncher for FakeAppLauncher {
    fn spawn(&self, command: &[String]) -> Result<u32, LaunchError> {
        let program = command.first().ok_or(LaunchError::EmptyCommand)?;
        let windows = lock(&self.state)
            .programs
            .get(program)
            .cloned()
            .ok_or_else(|| LaunchError::NotFound {
                program: program.clone(),
            })?;
        Ok(self.start(command.to_vec(), windows))
    }

    fn launch_snap(&self, name: &str) -> Result<Option<u32>, LaunchError> {
        if !lock(&self.state).snaps.contains(name) {
            return Ok(None);
        }
        let command = vec![format!("/snap/{name}/1/usr/bin/{name}")];
        Ok(Some(self.start(command, Vec::new())))
    }

    fn installed_apps(&self) -> Vec<DesktopEntry> {
        lock(&self.state).installed.clone()
    }
}

#[derive(Default)]
struct SettingsState {
    dynamic: bool,
    number: usize,
    fail_set_number: bool,
    calls: Vec<String>,
}

pub struct FakeWorkspaceSettings {
    state: Mutex<SettingsState>,
}

impl FakeWorkspaceSettings {
    pub fn new(dynamic: bool, number: usize) -> Self {
        Self {
            state: Mutex::new(SettingsState {
                dynamic,
                number,
                ..Default::default()
            }),
        }
    }

    pub fn fail_set_number(&self) {
        lock(&self.state).fail_set_number = true;
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.state).calls.clone()
    }

    pub fn dynamic(&self) -> bool {
        lock(&self.state).dynamic
    }

    pub fn number(&self) -> usize {
        lock(&self.state).number
    }
}

impl WorkspaceSettings for FakeWorkspaceSettings {
    fn is_dynamic(&self) -> Result<bool, WorkspaceError> {
        Ok(lock(&self.state).dynamic)
    }

    fn set_dynamic(&self, dynamic: bool) -> Result<(), WorkspaceError> {
        let mut state = lock(&self.state);
        state.calls.push(format!("set_dynamic({dynamic})"));
        state.dynamic = dynamic;
        Ok(())
    }

    fn workspace_number(&self) -> Result<usize, WorkspaceError> {
        Ok(lock(&self.state).number)
    }

    fn set_workspace_number(&self, count: usize) -> Result<(), WorkspaceError> {
        let mut state = lock(&self.state);
        state.calls.push(format!("set_workspace_number({count})"));
        if state.fail_set_number {
            return Err(WorkspaceError::CommandFailed {
                command: "set num-workspaces".to_string(),
                stderr: "not writable".to_string(),
            });
        }
        state.number = count;
        Ok(())
    }
}

/// A full fake desktop with linked collaborators.
pub struct FakeDesktop {
    pub windows: Arc<FakeWindowSystem>,
    pub processes: Arc<FakeProcessTable>,
    pub launcher: Arc<FakeAppLauncher>,
    pub workspaces: Arc<FakeWorkspaceSettings>,
}

impl FakeDesktop {
    pub fn new(windows: Vec<RawWindow>) -> Self {
        let windows = Arc::new(FakeWindowSystem::new(windows));
        let processes = Arc::new(FakeProcessTable::new());
        let launcher = Arc::new(FakeAppLauncher::attached(
            Arc::clone(&windows),
            Arc::clone(&processes),
        ));
        Self {
            windows,
            processes,
            launcher,
            workspaces: Arc::new(FakeWorkspaceSettings::new(false, 4)),
        }
    }

    pub fn desktop(&self) -> Desktop {
        Desktop {
            windows: self.windows.clone(),
            processes: self.processes.clone(),
            launcher: self.launcher.clone(),
            workspaces: self.workspaces.clone(),
        }
    }
}
