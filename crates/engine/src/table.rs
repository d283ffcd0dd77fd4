// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracking table of launched agents.
//!
//! A job occupies one slot from the moment capacity is reserved until its
//! process is observed to exit. A slot is either `Reserved` (start in
//! flight) or `Running`. Every slot counts against capacity, so admission
//! only needs `len()` under the table lock.

use hatch_core::JobId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Instant;

/// An agent process the launcher started and has not yet seen exit
#[derive(Debug)]
pub struct TrackedLaunch<H> {
    pub job_id: JobId,
    pub handle: H,
    pub started_at: Instant,
}

#[derive(Debug)]
enum Slot<H> {
    Reserved,
    Running(TrackedLaunch<H>),
}

/// Why a reservation was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Refusal {
    Duplicate,
    Full { current_count: usize },
}

#[derive(Debug)]
pub(crate) struct LaunchTable<H> {
    slots: HashMap<JobId, Slot<H>>,
}

impl<H> Default for LaunchTable<H> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<H> LaunchTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slots held, reserved or running
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn reserved(&self) -> usize {
        self.slots
            .values()
            .filter(|s| matches!(s, Slot::Reserved))
            .count()
    }

    pub fn contains(&self, job_id: &JobId) -> bool {
        self.slots.contains_key(job_id)
    }

    /// Reserve a slot for `job_id` if local slots plus `remote` leave room under `max`.
    pub fn try_reserve(&mut self, job_id: &JobId, remote: usize, max: usize) -> Result<(), Refusal> {
        if self.slots.contains_key(job_id) {
            return Err(Refusal::Duplicate);
        }
        let current_count = self.slots.len().saturating_add(remote);
        if current_count >= max {
            return Err(Refusal::Full { current_count });
        }
        self.slots.insert(job_id.clone(), Slot::Reserved);
        Ok(())
    }

    /// Turn a reservation into a running entry.
    pub fn commit(&mut self, launch: TrackedLaunch<H>) {
        self.slots
            .insert(launch.job_id.clone(), Slot::Running(launch));
    }

    /// Drop a reservation. Running entries are left alone.
    pub fn release(&mut self, job_id: &JobId) -> bool {
        if matches!(self.slots.get(job_id), Some(Slot::Reserved)) {
            self.slots.remove(job_id);
            return true;
        }
        false
    }

    pub fn get(&self, job_id: &JobId) -> Option<&TrackedLaunch<H>> {
        match self.slots.get(job_id) {
            Some(Slot::Running(launch)) => Some(launch),
            _ => None,
        }
    }

    /// Remove a running entry
    pub fn remove(&mut self, job_id: &JobId) -> Option<TrackedLaunch<H>> {
        match self.slots.get(job_id) {
            Some(Slot::Running(_)) => match self.slots.remove(job_id) {
                Some(Slot::Running(launch)) => Some(launch),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn running(&self) -> impl Iterator<Item = &TrackedLaunch<H>> {
        self.slots.values().filter_map(|slot| match slot {
            Slot::Running(launch) => Some(launch),
            Slot::Reserved => None,
        })
    }

    /// Keep only the running entries for which `keep` returns true.
    /// Reservations are never touched.
    pub fn retain_running(&mut self, mut keep: impl FnMut(&TrackedLaunch<H>) -> bool) {
        self.slots.retain(|_, slot| match slot {
            Slot::Running(launch) => keep(launch),
            Slot::Reserved => true,
        });
    }
}

/// A reserved slot that is released on drop unless committed.
///
/// Held across the process start so that a cancelled `launch` future, a
/// failed start and a timed-out start all give the slot back.
pub(crate) struct Reservation<'a, H> {
    table: &'a Mutex<LaunchTable<H>>,
    job_id: JobId,
    committed: bool,
}

impl<'a, H> Reservation<'a, H> {
    /// Reserve under the table lock, see [`LaunchTable::try_reserve`].
    pub fn acquire(
        table: &'a Mutex<LaunchTable<H>>,
        job_id: &JobId,
        remote: usize,
        max: usize,
    ) -> Result<Self, Refusal> {
        table.lock().try_reserve(job_id, remote, max)?;
        Ok(Self {
            table,
            job_id: job_id.clone(),
            committed: false,
        })
    }

    pub fn commit(mut self, handle: H, started_at: Instant) {
        self.table.lock().commit(TrackedLaunch {
            job_id: self.job_id.clone(),
            handle,
            started_at,
        });
        self.committed = true;
    }
}

impl<H> Drop for Reservation<'_, H> {
    fn drop(&mut self) {
        if !self.committed {
            self.table.lock().release(&self.job_id);
        }
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
