//! # declutter
//!
//! A safety-gated disk-space reclamation engine.
//!
//! declutter scans a Mac home directory for known categories of reclaimable
//! data (caches, logs, stale backups, installer leftovers, trash) and deletes
//! the user-selected subset through a reversible, two-phase pipeline:
//!
//! - **Concurrent discovery**: ten catalog-driven modules scanned in parallel,
//!   merged and deduplicated against each other and a user whitelist
//! - **Safety-first**: every irreversible delete re-checks a home-rooted path
//!   guard; Desktop, Documents and friends are never eligible
//! - **Two-phase commit**: move to trash first, permanently delete only on a
//!   later explicit confirmation, with restore as the undo path
//! - **Embedded engine**: no CLI, no network — callers own the workflow state
//!   and receive progress over a fire-and-forget channel
//!
//! The `analyze` module hosts the specialized detectors (idle applications,
//! oversized files, abandoned build artifacts) that feed the same cleanup
//! pipeline through the shared item model.

pub mod analyze;
pub mod clean;
pub mod common;
pub mod model;
pub mod progress;
pub mod safety;
pub mod scan;
pub mod store;
pub mod workflow;

pub use common::errors::Error;
pub use workflow::{Workflow, WorkflowPhase};
