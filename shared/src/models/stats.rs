//! Roster counters shown above the table and in the export footer

use super::{Employee, Page};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

impl EmployeeStats {
    pub fn from_rows(rows: &[Employee]) -> Self {
        let active = rows.iter().filter(|e| e.activo).count();
        Self {
            total: rows.len(),
            active,
            inactive: rows.len() - active,
        }
    }
}

impl Page<Employee> {
    pub fn active_count(&self) -> usize {
        self.content.iter().filter(|e| e.activo).count()
    }
}

impl From<&Page<Employee>> for EmployeeStats {
    fn from(page: &Page<Employee>) -> Self {
        Self::from_rows(&page.content)
    }
}
