//! Per-dependency readiness report.

use std::fmt;

use serde::Serialize;

use super::types::DependencyStatus;

/// Statuses of one check cycle, keyed by dependency name, in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReadinessReport {
    entries: Vec<DependencyStatus>,
}

impl ReadinessReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a status, keeping names unique. For a name already present the
    /// first failure is kept: a later success never hides it.
    pub fn insert(&mut self, status: DependencyStatus) {
        match self.entries.iter_mut().find(|s| s.name == status.name) {
            Some(existing) if !existing.ok => {}
            Some(existing) => *existing = status,
            None => self.entries.push(status),
        }
    }

    pub fn get(&self, name: &str) -> Option<&DependencyStatus> {
        self.entries.iter().find(|s| s.name == name)
    }

    pub fn detail(&self, name: &str) -> Option<&str> {
        self.get(name).map(|s| s.detail.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &DependencyStatus> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when every dependency answered. Vacuously true when empty.
    pub fn is_ready(&self) -> bool {
        self.entries.iter().all(|s| s.ok)
    }

    /// Names of the dependencies that failed, in check order.
    pub fn failing(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|s| !s.ok)
            .map(|s| s.name.clone())
            .collect()
    }
}

impl FromIterator<DependencyStatus> for ReadinessReport {
    fn from_iter<I: IntoIterator<Item = DependencyStatus>>(iter: I) -> Self {
        let mut report = Self::new();
        for status in iter {
            report.insert(status);
        }
        report
    }
}

/// One `<name>: <detail>` line per dependency.
impl fmt::Display for ReadinessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for status in &self.entries {
            writeln!(f, "{}: {}", status.name, status.detail)?;
        }
        Ok(())
    }
}
