//! Reconciliation of a saved session against the live desktop.
//!
//! The calling thread launches applications while a scoped placement
//! worker moves their windows as they appear. Both share one
//! [`RestoreJob`]; the worker is signalled every few launches and once
//! more when launching is over, after which it runs a bounded number of
//! retry passes with geometry restoration switched on.

use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::{Config, RestoreConfig, XsmConfig};
use crate::desktop::Desktop;
use crate::restore::context::{EventSink, RestoreEntry, RestoreJob};
use crate::restore::errors::RestoreError;
use crate::restore::launch::LaunchChain;
use crate::restore::matching::{TitleMatcher, is_same_command};
use crate::restore::placement::Placer;
use crate::restore::types::{DescriptorState, FailedDescriptor, RestoreEvent, RestoreReport};
use crate::sessions::{
    CaptureOptions, SessionFilter, SessionSnapshot, WindowDescriptor, apply_filters, get_session,
    get_session_details,
};
use crate::workspaces::{provision_workspaces, required_workspaces, with_enough_workspaces};

#[derive(Debug, Clone, Copy)]
pub struct RestoreOptions {
    /// Pause after each successful launch.
    pub restoring_interval: Duration,
    /// Run a placement pass after this many launches.
    pub placement_every: u32,
    pub retry_passes: u32,
    /// Used instead of `retry_passes` when the heaviest app has one window.
    pub short_retry_passes: u32,
    pub retry_interval: Duration,
    pub move_settle: Duration,
    pub enumeration_retry_delay: Duration,
}

impl RestoreOptions {
    pub fn from_config(config: &RestoreConfig) -> Self {
        Self {
            restoring_interval: config.restoring_interval(),
            placement_every: config.placement_every.max(1),
            retry_passes: config.retry_passes,
            short_retry_passes: config.short_retry_passes,
            retry_interval: config.retry_interval(),
            move_settle: config.move_settle(),
            enumeration_retry_delay: config.enumeration_retry_delay(),
        }
    }

    pub fn with_restoring_interval(mut self, interval: Duration) -> Self {
        self.restoring_interval = interval;
        self
    }
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self::from_config(&RestoreConfig::default())
    }
}

enum PlacementSignal {
    Pass,
    LaunchesComplete,
}

pub struct RestoreEngine<'a> {
    desktop: &'a Desktop,
    options: RestoreOptions,
    matcher: TitleMatcher,
    events: EventSink,
}

impl<'a> RestoreEngine<'a> {
    pub fn new(
        desktop: &'a Desktop,
        options: RestoreOptions,
        matcher: TitleMatcher,
        events: EventSink,
    ) -> Self {
        Self {
            desktop,
            options,
            matcher,
            events,
        }
    }

    fn placer(&self) -> Placer<'_> {
        Placer {
            windows: self.desktop.windows.as_ref(),
            processes: self.desktop.processes.as_ref(),
            matcher: &self.matcher,
            events: &self.events,
            move_settle: self.options.move_settle,
            enumeration_retry_delay: self.options.enumeration_retry_delay,
        }
    }

    /// Bring the live desktop in line with `snapshot`: adopt what already
    /// runs, launch the rest, and move every window to its saved desktop.
    pub fn restore(
        &self,
        snapshot: SessionSnapshot,
        filters: &[Option<SessionFilter>],
    ) -> RestoreReport {
        let session_name = snapshot.session_name.clone();
        let descriptors = apply_filters(filters, snapshot.windows);
        info!(
            event = "core.restore.started",
            session_name = session_name,
            descriptors = descriptors.len()
        );
        self.events.emit(RestoreEvent::Started {
            session_name: session_name.clone(),
            descriptors: descriptors.len(),
        });

        let mut report = RestoreReport {
            session_name,
            total: descriptors.len(),
            ..Default::default()
        };
        if descriptors.is_empty() {
            self.events.emit(RestoreEvent::NothingToRestore);
            return report;
        }

        let job = RestoreJob::new(descriptors);
        report.already_running = self.adopt_running(&job, filters);

        let required = required_workspaces(job.desktops());
        let guard = match provision_workspaces(
            self.desktop.windows.as_ref(),
            self.desktop.workspaces.as_ref(),
            required,
        ) {
            Ok(guard) => Some(guard),
            Err(e) => {
                warn!(event = "core.restore.workspace_provision_failed", required = required, error = %e);
                self.events.emit(RestoreEvent::WorkspaceProvisionFailed {
                    required,
                    error: e.to_string(),
                });
                report.workspace_error = Some(e.to_string());
                None
            }
        };

        let trailing_passes = if job.heaviest_windows_count() == Some(1) {
            self.options.short_retry_passes
        } else {
            self.options.retry_passes
        };

        thread::scope(|scope| {
            let (tx, rx) = mpsc::channel();
            let job = &job;
            let worker = scope.spawn(move || self.placement_worker(job, rx, trailing_passes));

            let placement_every = self.options.placement_every as usize;
            let chain = LaunchChain::new(self.desktop.launcher.as_ref());
            let mut launches = 0;
            for (group, leader) in job.pending_group_leaders() {
                if self.launch_group(&chain, job, group, &leader) {
                    report.launched.push(leader.app_name.clone());
                    launches += 1;
                    if launches % placement_every == 0 {
                        let _ = tx.send(PlacementSignal::Pass);
                    }
                    thread::sleep(self.options.restoring_interval);
                }
            }
            let _ = tx.send(PlacementSignal::LaunchesComplete);

            if worker.join().is_err() {
                error!(event = "core.restore.placement_worker_panicked");
            }
        });
        drop(guard);

        report.windows_moved = job.windows_moved();
        summarize(&mut report, job.finish());
        info!(
            event = "core.restore.completed",
            session_name = report.session_name,
            placed = report.placed,
            launched = report.launched.len(),
            failed = report.failed.len(),
            unplaced = report.unplaced.len()
        );
        report
    }

    /// Only move windows of apps already running to their saved desktops.
    /// Nothing is launched.
    pub fn move_windows(
        &self,
        snapshot: SessionSnapshot,
        filters: &[Option<SessionFilter>],
    ) -> RestoreReport {
        let session_name = snapshot.session_name.clone();
        let mut descriptors = apply_filters(filters, snapshot.windows);
        descriptors.sort_by_key(|d| d.desktop_number);
        info!(
            event = "core.restore.move_started",
            session_name = session_name,
            descriptors = descriptors.len()
        );
        self.events.emit(RestoreEvent::Started {
            session_name: session_name.clone(),
            descriptors: descriptors.len(),
        });

        let mut report = RestoreReport {
            session_name,
            total: descriptors.len(),
            ..Default::default()
        };
        if descriptors.is_empty() {
            self.events.emit(RestoreEvent::NothingToRestore);
            return report;
        }

        let job = RestoreJob::for_move(descriptors);
        job.set_restore_geometry(true);
        let required = required_workspaces(job.desktops());
        with_enough_workspaces(
            self.desktop.windows.as_ref(),
            self.desktop.workspaces.as_ref(),
            required,
            || self.placer().run_pass(&job),
        );

        report.windows_moved = job.windows_moved();
        summarize(&mut report, job.finish());
        info!(
            event = "core.restore.move_completed",
            session_name = report.session_name,
            moved = report.windows_moved,
            unplaced = report.unplaced.len()
        );
        report
    }

    /// Mark groups whose application is already running, adopting the live
    /// pid. Each live process is claimed by one group at most.
    fn adopt_running(&self, job: &RestoreJob, filters: &[Option<SessionFilter>]) -> Vec<String> {
        let options = CaptureOptions {
            remove_duplicates_by_pid: true,
            enumeration_retry_delay: self.options.enumeration_retry_delay,
        };
        let live = match get_session_details(
            self.desktop.windows.as_ref(),
            self.desktop.processes.as_ref(),
            options,
            filters,
        ) {
            Ok(live) => live,
            Err(e) => {
                warn!(event = "core.restore.live_capture_failed", error = %e);
                return Vec::new();
            }
        };

        let mut claimed = HashSet::new();
        let mut adopted = Vec::new();
        for (group, leader) in job.pending_group_leaders() {
            let running = live.iter().find_map(|l| {
                let pid = l.pid?;
                let same = !claimed.contains(&pid)
                    && l.app_name == leader.app_name
                    && is_same_command(&l.command, &leader.command);
                same.then_some(pid)
            });
            let Some(pid) = running else {
                continue;
            };

            claimed.insert(pid);
            job.set_group_state(group, DescriptorState::RunningAlready, Some(pid));
            info!(
                event = "core.restore.already_running",
                app_name = leader.app_name,
                pid = pid
            );
            self.events.emit(RestoreEvent::AlreadyRunning {
                app_name: leader.app_name.clone(),
                pid,
            });
            adopted.push(leader.app_name.clone());
        }
        adopted
    }

    /// Launch one group leader. A failure is recorded on the whole group
    /// and never stops the restore.
    fn launch_group(
        &self,
        chain: &LaunchChain<'_>,
        job: &RestoreJob,
        group: usize,
        leader: &WindowDescriptor,
    ) -> bool {
        let app_name = leader.app_name.as_str();
        job.set_group_state(group, DescriptorState::Launching, None);
        self.events.emit(RestoreEvent::Launching {
            app_name: app_name.to_string(),
        });

        match chain.launch(leader) {
            Ok(outcome) => {
                if !outcome.ambiguous_candidates.is_empty() {
                    self.events.emit(RestoreEvent::AmbiguousMatch {
                        app_name: app_name.to_string(),
                        candidates: outcome.ambiguous_candidates.clone(),
                    });
                }
                job.set_group_state(group, DescriptorState::Launched, Some(outcome.pid));
                info!(
                    event = "core.restore.launched",
                    app_name = app_name,
                    pid = outcome.pid,
                    method = %outcome.method
                );
                self.events.emit(RestoreEvent::Launched {
                    app_name: app_name.to_string(),
                    pid: outcome.pid,
                    method: outcome.method,
                });
                true
            }
            Err(e) => {
                error!(event = "core.restore.launch_failed", app_name = app_name, error = %e);
                job.fail_group(group, &e.to_string());
                self.events.emit(RestoreEvent::LaunchFailed {
                    app_name: app_name.to_string(),
                    error: e.to_string(),
                });
                false
            }
        }
    }

    fn placement_worker(
        &self,
        job: &RestoreJob,
        signals: Receiver<PlacementSignal>,
        trailing_passes: u32,
    ) {
        let placer = self.placer();
        let mut pass = 0;

        // Launch phase: one pass per signal, geometry left alone.
        while let Ok(PlacementSignal::Pass) = signals.recv() {
            pass += 1;
            placer.run_pass(job);
            self.pass_completed(job, pass);
        }

        // Windows placed above still need their saved geometry, even if
        // nothing is left pending.
        job.set_restore_geometry(true);
        placer.restore_placed_geometry(job);
        for attempt in 0..trailing_passes {
            if job.pending() == 0 {
                break;
            }
            if attempt > 0 {
                thread::sleep(self.options.retry_interval);
            }
            pass += 1;
            placer.run_pass(job);
            self.pass_completed(job, pass);
        }
    }

    fn pass_completed(&self, job: &RestoreJob, pass: usize) {
        let pending = job.pending();
        info!(event = "core.restore.pass_completed", pass = pass, pending = pending);
        self.events.emit(RestoreEvent::PassCompleted { pass, pending });
    }
}

fn summarize(report: &mut RestoreReport, entries: Vec<RestoreEntry>) {
    for entry in entries {
        match entry.state {
            DescriptorState::Placed => report.placed += 1,
            DescriptorState::Failed => report.failed.push(FailedDescriptor {
                app_name: entry.descriptor.display_name().to_string(),
                reason: entry.failure.unwrap_or_default(),
            }),
            _ => report
                .unplaced
                .push(entry.descriptor.display_name().to_string()),
        }
    }
}

/// Load `session_name` and restore it.
pub fn restore_session(
    desktop: &Desktop,
    config: &Config,
    settings: &XsmConfig,
    options: RestoreOptions,
    session_name: &str,
    filters: &[Option<SessionFilter>],
    events: EventSink,
) -> Result<RestoreReport, RestoreError> {
    let snapshot = get_session(config, session_name)?;
    let engine = RestoreEngine::new(
        desktop,
        options,
        TitleMatcher::from_config(&settings.matching),
        events,
    );
    Ok(engine.restore(snapshot, filters))
}

/// Load `session_name` and move already running windows to their saved
/// desktops.
pub fn move_session(
    desktop: &Desktop,
    config: &Config,
    settings: &XsmConfig,
    session_name: &str,
    filters: &[Option<SessionFilter>],
    events: EventSink,
) -> Result<RestoreReport, RestoreError> {
    let snapshot = get_session(config, session_name)?;
    let engine = RestoreEngine::new(
        desktop,
        RestoreOptions::from_config(&settings.restore),
        TitleMatcher::from_config(&settings.matching),
        events,
    );
    Ok(engine.move_windows(snapshot, filters))
}
