//! Export the generated cohort to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts. Formatting is fixed-precision so exporting twice under the same
//! coefficients is byte-identical.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::Dataset;
use crate::error::AppError;

/// Render the full cohort as CSV text, header row first.
pub fn dataset_csv(dataset: &Dataset) -> String {
    let mut out = String::with_capacity(32 + dataset.rows.len() * 48);
    out.push_str("sbp,sodium,age,proteinuria\n");
    for row in &dataset.rows {
        out.push_str(&format!(
            "{:.6},{:.6},{:.6},{:.6}\n",
            row.sbp, row.sodium, row.age, row.proteinuria
        ));
    }
    out
}

/// Write the cohort CSV to a file.
pub fn write_dataset_csv(path: &Path, dataset: &Dataset) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::io(format!(
            "Failed to create export CSV '{}': {e}",
            path.display()
        ))
    })?;

    file.write_all(dataset_csv(dataset).as_bytes())
        .map_err(|e| AppError::io(format!("Failed to write export CSV: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate;
    use crate::domain::StructuralParams;

    #[test]
    fn csv_has_header_and_one_line_per_row() {
        let data = generate(777, StructuralParams::new(0.5, 0.05), 50).unwrap();
        let csv = dataset_csv(&data);

        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("sbp,sodium,age,proteinuria"));
        assert_eq!(lines.count(), 50);
    }

    #[test]
    fn export_is_idempotent() {
        let data = generate(777, StructuralParams::new(0.5, 0.05), 100).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.csv");
        let second = dir.path().join("b.csv");
        write_dataset_csv(&first, &data).unwrap();
        write_dataset_csv(&second, &data).unwrap();

        let a = std::fs::read(&first).unwrap();
        let b = std::fs::read(&second).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, dataset_csv(&data).into_bytes());
    }

    #[test]
    fn regenerated_dataset_exports_identically() {
        let a = generate(42, StructuralParams::new(2.0, 3.0), 80).unwrap();
        let b = generate(42, StructuralParams::new(2.0, 3.0), 80).unwrap();
        assert_eq!(dataset_csv(&a), dataset_csv(&b));
    }
}
