//! Heuristic sequencing backend for Gatewalk built on `vrp-core`.
//!
//! [`VrpBackend`] implements
//! [`SequenceSolverBackend`](gatewalk_core::SequenceSolverBackend) by
//! modelling the visit order as a single-vehicle routing problem: one walker
//! starts at node `0`, must serve every POI node, and returns to node `0`.
//! The return leg is part of the objective (a closed tour) but is dropped
//! when the order is read back, so the result is an open path from the start.
//!
//! Searches are bounded by a wall-clock budget (five seconds by default).
//! Every failure is reported as a
//! [`BackendError`](gatewalk_core::BackendError) so the caller can fall back
//! to the greedy order.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod backend;
mod vrp;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use backend::{VrpBackend, VrpBackendConfig};
