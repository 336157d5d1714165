use std::{collections::BTreeMap, time::Duration};

use crate::app::command::{Cmd, Msg, Notification, Resource};

pub const TIMEOUT_WARNING: &str = "Could not load all resources in time";

/// Readiness of each lazily loaded resource since the last reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadStatus {
    ready: BTreeMap<Resource, bool>,
}

impl Default for LoadStatus {
    fn default() -> Self {
        Self {
            ready: Resource::LAZY.into_iter().map(|r| (r, false)).collect(),
        }
    }
}

impl LoadStatus {
    pub fn reset(&mut self) {
        self.ready.values_mut().for_each(|ready| *ready = false);
    }

    /// Marks a tracked resource ready; untracked resources are ignored.
    pub fn mark_ready(&mut self, resource: Resource) {
        if let Some(ready) = self.ready.get_mut(&resource) {
            *ready = true;
        }
    }

    pub fn is_ready(&self, resource: Resource) -> bool {
        self.ready.get(&resource).copied().unwrap_or(false)
    }

    pub fn all_ready(&self) -> bool {
        self.ready.values().all(|ready| *ready)
    }

    pub fn pending(&self) -> Vec<Resource> {
        self.ready
            .iter()
            .filter(|(_, ready)| !**ready)
            .map(|(resource, _)| *resource)
            .collect()
    }
}

/// Waits for every lazy resource before revealing the dependent views.
///
/// Polls are cooperative: an unresolved poll schedules the next one after
/// `delay` with one attempt less, until the ceiling is exhausted. Each
/// `refresh_all` starts a new run; polls left over from an older run are
/// ignored.
#[derive(Debug, Clone)]
pub struct LazyLoader {
    status: LoadStatus,
    run: u64,
    attempts: u32,
    ceiling: u32,
    delay: Duration,
}

impl LazyLoader {
    pub fn new(ceiling: u32, delay: Duration) -> Self {
        Self {
            status: LoadStatus::default(),
            run: 0,
            attempts: 0,
            ceiling,
            delay,
        }
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn run(&self) -> u64 {
        self.run
    }

    /// Polls performed since the counter was last reset.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }

    pub fn mark_ready(&mut self, resource: Resource) {
        self.status.mark_ready(resource);
    }

    /// Resets readiness and asks every lazy resource to refresh.
    pub fn refresh_all(&mut self) -> Cmd {
        self.status.reset();
        self.run += 1;
        let refreshes = Resource::LAZY
            .into_iter()
            .map(|resource| Cmd::msg(Msg::Refresh(resource)));
        Cmd::batch(refreshes.chain(std::iter::once(Cmd::msg(Msg::LazyLoadPoll {
            run: self.run,
            remaining: self.ceiling,
        }))))
    }

    pub fn poll(&mut self, run: u64, remaining: u32) -> Cmd {
        if run < self.run {
            tracing::debug!(run, current = self.run, "dropping poll from superseded run");
            return Cmd::None;
        }

        if self.status.all_ready() {
            self.attempts = 0;
            tracing::debug!("all resources loaded");
            return Cmd::batch([
                Cmd::msg(Msg::Refresh(Resource::Transactions)),
                Cmd::msg(Msg::Refresh(Resource::Summary)),
            ]);
        }

        if remaining > 0 {
            self.attempts = self.attempts.saturating_add(1).min(self.ceiling);
            tracing::debug!(
                remaining,
                pending = ?self.status.pending(),
                "resources still loading"
            );
            return Cmd::after(
                self.delay,
                Msg::LazyLoadPoll {
                    run,
                    remaining: remaining - 1,
                },
            );
        }

        self.attempts = 0;
        tracing::warn!(pending = ?self.status.pending(), "lazy load gave up");
        Cmd::notify(Notification::warning(TIMEOUT_WARNING))
    }
}
