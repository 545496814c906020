//! Bounded log of recent deaths, kept for diagnostics only.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::agent::{AgentId, AgentKind};

/// Why an agent was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Eaten by a predator.
    Predation,
    /// Health ran out.
    Starvation,
    /// Consumed as a parent when breeding.
    Breeding,
}

/// A logged death.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathRecord {
    /// Tick in which the agent died.
    pub tick: u64,
    /// Generation the agent belonged to.
    pub generation: u32,
    /// Identity of the dead agent.
    pub id: AgentId,
    /// Kind of the dead agent.
    pub kind: AgentKind,
    /// Ticks survived.
    pub time_alive: u32,
    /// Fitness at the moment of death.
    pub fitness: f32,
    /// Removal reason.
    pub cause: DeathCause,
}

/// Death log that keeps the most recent records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeathLog {
    /// Recent deaths, newest first
    records: VecDeque<DeathRecord>,
    /// Maximum number of records to keep
    max_records: usize,
    /// Deaths ever logged, including evicted records
    total: u64,
}

impl Default for DeathLog {
    fn default() -> Self {
        Self::new(256)
    }
}

impl DeathLog {
    /// Creates a new log with specified capacity
    pub fn new(max_records: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(max_records),
            max_records,
            total: 0,
        }
    }

    /// Adds a new record to the log
    pub fn log(&mut self, record: DeathRecord) {
        self.total += 1;
        self.records.push_front(record);

        while self.records.len() > self.max_records {
            self.records.pop_back();
        }
    }

    /// Returns the kept records, newest first
    pub fn records(&self) -> &VecDeque<DeathRecord> {
        &self.records
    }

    /// Number of deaths ever logged.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Whether `id` appears among the kept records.
    pub fn contains(&self, id: AgentId) -> bool {
        self.records.iter().any(|r| r.id == id)
    }
}
