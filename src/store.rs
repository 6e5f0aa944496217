//! Persistence seam. The real store lives outside this crate; components
//! here only need `save`/`load_last` plus an append-only routine history.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::SkinsightError;
use crate::model::{AnalysisReport, RoutineDocument};

/// Storage boundary for analysis reports and routine history.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn save_report(
        &self,
        user: &str,
        report: &AnalysisReport,
    ) -> Result<(), SkinsightError>;

    /// Most recently saved report for a user, if any.
    async fn load_last_report(&self, user: &str)
        -> Result<Option<AnalysisReport>, SkinsightError>;

    /// Routines are appended to history and never mutated afterwards.
    async fn append_routine(
        &self,
        user: &str,
        routine: &RoutineDocument,
    ) -> Result<(), SkinsightError>;
}

/// In-memory store for tests and the CLI.
#[derive(Default)]
pub struct MemoryStore {
    reports: Mutex<HashMap<String, Vec<AnalysisReport>>>,
    routines: Mutex<HashMap<String, Vec<RoutineDocument>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routine_history(&self, user: &str) -> Vec<RoutineDocument> {
        self.routines
            .lock()
            .map(|routines| routines.get(user).cloned().unwrap_or_default())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn save_report(
        &self,
        user: &str,
        report: &AnalysisReport,
    ) -> Result<(), SkinsightError> {
        if let Ok(mut reports) = self.reports.lock() {
            reports
                .entry(user.to_string())
                .or_default()
                .push(report.clone());
        }
        Ok(())
    }

    async fn load_last_report(
        &self,
        user: &str,
    ) -> Result<Option<AnalysisReport>, SkinsightError> {
        Ok(self
            .reports
            .lock()
            .ok()
            .and_then(|reports| reports.get(user).and_then(|list| list.last().cloned())))
    }

    async fn append_routine(
        &self,
        user: &str,
        routine: &RoutineDocument,
    ) -> Result<(), SkinsightError> {
        if let Ok(mut routines) = self.routines.lock() {
            routines
                .entry(user.to_string())
                .or_default()
                .push(routine.clone());
        }
        Ok(())
    }
}
