//! Read/write snapshot JSON files.
//!
//! Snapshot JSON is the portable record of one recomputation:
//! - the inputs (seed, coefficients, sample count)
//! - cohort summary statistics
//! - the three fitted models and their derived headline outputs
//!
//! The schema is defined by `domain::SnapshotFile`.

use std::fs::File;
use std::path::Path;

use crate::app::pipeline::Snapshot;
use crate::domain::SnapshotFile;
use crate::error::AppError;

/// Write a snapshot JSON file.
pub fn write_snapshot_json(path: &Path, snapshot: &Snapshot) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::io(format!(
            "Failed to create snapshot JSON '{}': {e}",
            path.display()
        ))
    })?;

    let record = SnapshotFile {
        tool: "collider".to_string(),
        seed: snapshot.dataset.seed,
        sample_count: snapshot.dataset.stats.n_rows,
        params: snapshot.dataset.params,
        stats: snapshot.dataset.stats.clone(),
        fits: snapshot.fits.clone(),
        derived: snapshot.derived.clone(),
    };

    serde_json::to_writer_pretty(file, &record)
        .map_err(|e| AppError::io(format!("Failed to write snapshot JSON: {e}")))?;

    Ok(())
}

/// Read a snapshot JSON file.
pub fn read_snapshot_json(path: &Path) -> Result<SnapshotFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::io(format!(
            "Failed to open snapshot JSON '{}': {e}",
            path.display()
        ))
    })?;
    let record: SnapshotFile = serde_json::from_reader(file)
        .map_err(|e| AppError::io(format!("Invalid snapshot JSON: {e}")))?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::Controller;
    use crate::domain::StructuralParams;

    #[test]
    fn snapshot_json_round_trips() {
        let ctl = Controller::new(777, StructuralParams::new(0.5, 0.05), 100).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        write_snapshot_json(&path, ctl.snapshot()).unwrap();

        let record = read_snapshot_json(&path).unwrap();
        assert_eq!(record.tool, "collider");
        assert_eq!(record.seed, 777);
        assert_eq!(record.sample_count, 100);
        assert_eq!(record.fits.len(), 3);
        assert_eq!(record.derived.len(), 3);
        assert_eq!(
            record.derived[0].sodium_coefficient,
            ctl.snapshot().fits[0].sodium_coefficient()
        );
    }
}
