//! The single owning coordinator for workflow state.
//!
//! The scan and clean components are stateless; everything that persists
//! across calls — current phase, the reviewed report, the pending summary,
//! the stores — lives here, passed explicitly rather than published as
//! ambient observable state.

use tracing::warn;

use crate::clean::CleanupEngine;
use crate::common::errors::Error;
use crate::model::{CategoryResult, CleanHistory, Report, Summary};
use crate::progress::Progress;
use crate::safety::PathSafetyGuard;
use crate::scan::{ScanOrchestrator, ScanOutcome};
use crate::store::history::HistoryStore;
use crate::store::whitelist::WhitelistStore;

/// Where a clean workflow currently stands.
///
/// ```text
/// idle → scanning → scanned → executing → pendingConfirm → completed
///                      ↑__________________________|   (restore)
/// ```
/// The direct delete path goes from `executing` straight to `completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPhase {
    Idle,
    Scanning,
    Scanned,
    Executing,
    PendingConfirm,
    Completed,
}

/// Drives one scan-review-clean cycle end to end.
pub struct Workflow {
    phase: WorkflowPhase,
    orchestrator: ScanOrchestrator,
    engine: CleanupEngine,
    whitelist: WhitelistStore,
    history: HistoryStore,
    outcome: Option<ScanOutcome>,
    report: Option<Report>,
    summary: Option<Summary>,
}

impl Workflow {
    /// A workflow over the real user home and the default store locations
    pub fn new() -> Result<Self, Error> {
        let guard = PathSafetyGuard::new()?;
        let whitelist = WhitelistStore::open()?;
        let history = HistoryStore::open()?;
        Ok(Self::with_parts(guard, whitelist, history))
    }

    pub fn with_parts(
        guard: PathSafetyGuard,
        whitelist: WhitelistStore,
        history: HistoryStore,
    ) -> Self {
        Self {
            phase: WorkflowPhase::Idle,
            orchestrator: ScanOrchestrator::new(guard.clone()),
            engine: CleanupEngine::new(guard),
            whitelist,
            history,
            outcome: None,
            report: None,
            summary: None,
        }
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    pub fn whitelist(&mut self) -> &mut WhitelistStore {
        &mut self.whitelist
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Last scan outcome, while one is held
    pub fn results(&self) -> Option<&ScanOutcome> {
        self.outcome.as_ref()
    }

    /// Mutable access to scanned categories for selection editing
    pub fn categories_mut(&mut self) -> Option<&mut Vec<CategoryResult>> {
        match self.phase {
            WorkflowPhase::Scanned => self.outcome.as_mut().map(|o| &mut o.categories),
            _ => None,
        }
    }

    /// The summary awaiting confirmation, in `PendingConfirm`
    pub fn pending_summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    /// Run a full discovery pass against the current whitelist.
    pub fn scan(&mut self, progress: &Progress) -> Result<&ScanOutcome, Error> {
        match self.phase {
            WorkflowPhase::Idle | WorkflowPhase::Scanned | WorkflowPhase::Completed => {}
            phase => {
                return Err(Error::InvalidPhase {
                    operation: "scan",
                    phase,
                })
            }
        }

        self.phase = WorkflowPhase::Scanning;
        self.report = None;
        self.summary = None;

        let outcome = self.orchestrator.scan(self.whitelist.entries(), progress);
        self.phase = WorkflowPhase::Scanned;
        Ok(self.outcome.insert(outcome))
    }

    /// Move the selected items to the trash and await confirmation.
    pub fn clean(&mut self, progress: &Progress) -> Result<&Summary, Error> {
        let report = self.snapshot_report("clean")?;

        self.phase = WorkflowPhase::Executing;
        let summary = self.engine.move_to_trash(&report, progress);
        self.report = Some(report);
        self.phase = WorkflowPhase::PendingConfirm;
        Ok(self.summary.insert(summary))
    }

    /// Permanently delete the selected items, skipping the trash entirely.
    pub fn delete(&mut self, progress: &Progress) -> Result<&Summary, Error> {
        let report = self.snapshot_report("delete")?;

        self.phase = WorkflowPhase::Executing;
        let summary = self.engine.delete_items(&report, progress);
        self.record_history(&report, &summary);
        self.report = Some(report);
        self.phase = WorkflowPhase::Completed;
        Ok(self.summary.insert(summary))
    }

    /// Undo the pending trash batch and return to the reviewed state.
    pub fn restore(&mut self) -> Result<usize, Error> {
        let summary = match self.phase {
            WorkflowPhase::PendingConfirm => self.summary.take(),
            _ => None,
        };
        let Some(summary) = summary else {
            return Err(Error::InvalidPhase {
                operation: "restore",
                phase: self.phase,
            });
        };

        let restored = self.engine.restore(&summary);
        self.report = None;
        self.phase = WorkflowPhase::Scanned;
        Ok(restored)
    }

    /// Make the pending trash batch permanent.
    pub fn confirm(&mut self, progress: &Progress) -> Result<usize, Error> {
        let summary = match self.phase {
            WorkflowPhase::PendingConfirm => self.summary.take(),
            _ => None,
        };
        let Some(summary) = summary else {
            return Err(Error::InvalidPhase {
                operation: "confirm",
                phase: self.phase,
            });
        };

        let deleted = self.engine.confirm_permanent_delete(&summary, progress);
        if let Some(report) = self.report.take() {
            self.record_history(&report, &summary);
            self.report = Some(report);
        }
        self.summary = Some(summary);
        self.phase = WorkflowPhase::Completed;
        Ok(deleted)
    }

    /// Abandon any held state and return to idle.
    pub fn reset(&mut self) {
        self.phase = WorkflowPhase::Idle;
        self.outcome = None;
        self.report = None;
        self.summary = None;
    }

    /// Snapshot the reviewed categories as the immutable report the engine
    /// acts on; valid only from `Scanned`.
    fn snapshot_report(&mut self, operation: &'static str) -> Result<Report, Error> {
        let outcome = match self.phase {
            WorkflowPhase::Scanned => self.outcome.as_ref(),
            _ => None,
        };
        match outcome {
            Some(outcome) => Ok(Report::new(outcome.categories.clone())),
            None => Err(Error::InvalidPhase {
                operation,
                phase: self.phase,
            }),
        }
    }

    /// A failed history write must not undo a finished clean
    fn record_history(&mut self, report: &Report, summary: &Summary) {
        let entry = CleanHistory::from_clean(report, summary);
        if let Err(e) = self.history.add(entry) {
            warn!(error = %e, "history entry not recorded");
        }
    }
}
