//! Test helpers for writing plan requests into temporary workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use gatewalk_core::{Gate, PlanRequest, Poi, SequenceSolver};
use geo::Coord;
use tempfile::TempDir;

use crate::plan::{PlanConfig, SequenceSolverFactory};

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

/// A temporary directory with a UTF-8 root.
pub(super) struct Workspace {
    _tmp: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self { _tmp: tmp, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

/// Greedy-only sequencing so tests never wait on a search budget.
pub(super) struct GreedyFactory;

impl SequenceSolverFactory for GreedyFactory {
    fn build(&self, _config: &PlanConfig) -> SequenceSolver {
        SequenceSolver::greedy_only()
    }
}

/// Three stops east of the start, the last one a two-gate park.
pub(super) fn sample_request() -> PlanRequest {
    let start = Coord { x: 116.30, y: 39.90 };
    let park = Poi::new(3, "Lakeside Park", Coord { x: 116.33, y: 39.90 }, "scenic park")
        .with_gates(vec![
            Gate::new("West Gate", Coord { x: 116.325, y: 39.90 }),
            Gate::new("East Gate", Coord { x: 116.335, y: 39.90 }),
        ]);
    PlanRequest::new(
        start,
        vec![
            Poi::new(1, "City Museum", Coord { x: 116.31, y: 39.90 }, "museum"),
            Poi::new(2, "Old Square", Coord { x: 116.32, y: 39.90 }, "square"),
            park,
        ],
    )
}

pub(super) fn write_request(path: &Utf8Path, request: &PlanRequest) {
    let payload = serde_json::to_string_pretty(request).expect("serialise request");
    write_utf8(path, payload.as_bytes());
}
