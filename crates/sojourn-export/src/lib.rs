//! # sojourn-export
//!
//! Turns one program's application timeline into a downloadable `.xlsx`
//! checklist. The adapter's only responsibilities are shaping the row data
//! and the filename; the workbook writing itself is `rust_xlsxwriter`.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use sojourn_core::error::{Result, SojournError};
use sojourn_core::types::{Program, ProgramMatch};

/// Column headers of the exported sheet.
const HEADERS: [&str; 4] = ["No.", "Task", "Due Date", "Status"];

/// One row of the exported timeline sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub no: u32,
    pub task: String,
    pub due_date: String,
    pub status: String,
}

/// Shape a program's timeline into export rows, numbered from 1.
///
/// Every exported task starts as "Pending" regardless of any server-side
/// status; the sheet is a to-do checklist for the applicant.
pub fn timeline_rows(selected: &ProgramMatch) -> Vec<ExportRow> {
    selected
        .timeline
        .iter()
        .enumerate()
        .map(|(i, task)| ExportRow {
            no: (i + 1) as u32,
            task: task.title.clone(),
            due_date: task.due_date.clone(),
            status: "Pending".to_string(),
        })
        .collect()
}

/// Build the workbook filename from the university and program name.
///
/// Runs of non-alphanumeric characters collapse to a single underscore:
/// `TU Munich` + `M.Sc. Informatics` becomes
/// `TU_Munich_M_Sc_Informatics_Timeline.xlsx`.
pub fn export_filename(program: &Program) -> String {
    let raw = format!("{} {}", program.university, program.name);
    let mut sanitized = String::with_capacity(raw.len());
    let mut last_was_sep = true;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            sanitized.push(c);
            last_was_sep = false;
        } else if !last_was_sep {
            sanitized.push('_');
            last_was_sep = true;
        }
    }
    let sanitized = sanitized.trim_end_matches('_');
    format!("{sanitized}_Timeline.xlsx")
}

/// Write the selected program's timeline workbook into `dir`.
///
/// Returns the path of the written file for the status line.
pub fn export_timeline(selected: &ProgramMatch, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(export_filename(&selected.program));
    let rows = timeline_rows(selected);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet
        .set_name("Application Timeline")
        .map_err(|e| export_error(&path, e))?;

    let header_format = Format::new().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| export_error(&path, e))?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet
            .write_number(r, 0, f64::from(row.no))
            .map_err(|e| export_error(&path, e))?;
        sheet
            .write_string(r, 1, &row.task)
            .map_err(|e| export_error(&path, e))?;
        sheet
            .write_string(r, 2, &row.due_date)
            .map_err(|e| export_error(&path, e))?;
        sheet
            .write_string(r, 3, &row.status)
            .map_err(|e| export_error(&path, e))?;
    }

    workbook.save(&path).map_err(|e| export_error(&path, e))?;

    info!(path = %path.display(), rows = rows.len(), "timeline exported");
    Ok(path)
}

fn export_error(path: &Path, e: rust_xlsxwriter::XlsxError) -> SojournError {
    SojournError::ExportWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sojourn_core::types::TimelineTask;

    fn sample_match() -> ProgramMatch {
        ProgramMatch {
            program: Program {
                name: "M.Sc. Informatics".to_string(),
                university: "TU Munich".to_string(),
                country: "Germany".to_string(),
                tuition_range: "EUR 0 - 300/semester".to_string(),
                application_deadline: "2025-01-15".to_string(),
                eligibility_criteria: String::new(),
                match_reasoning: None,
            },
            requirements: None,
            timeline: vec![
                TimelineTask {
                    title: "Submit transcripts".to_string(),
                    description: String::new(),
                    due_date: "2024-01-10".to_string(),
                    dependency: None,
                    status: "Pending".to_string(),
                },
                TimelineTask {
                    title: "Request LORs".to_string(),
                    description: String::new(),
                    due_date: "2024-02-01".to_string(),
                    dependency: Some("Submit transcripts".to_string()),
                    status: "Done".to_string(),
                },
            ],
            warnings: vec![],
        }
    }

    #[test]
    fn test_timeline_rows_shape() {
        let rows = timeline_rows(&sample_match());
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            ExportRow {
                no: 1,
                task: "Submit transcripts".to_string(),
                due_date: "2024-01-10".to_string(),
                status: "Pending".to_string(),
            }
        );
        assert_eq!(rows[1].no, 2);
        // Export always says Pending, even if the server marked it otherwise
        assert_eq!(rows[1].status, "Pending");
    }

    #[test]
    fn test_timeline_rows_empty_timeline() {
        let mut m = sample_match();
        m.timeline.clear();
        assert!(timeline_rows(&m).is_empty());
    }

    #[test]
    fn test_export_filename_collapses_non_alphanumerics() {
        let m = sample_match();
        assert_eq!(
            export_filename(&m.program),
            "TU_Munich_M_Sc_Informatics_Timeline.xlsx"
        );
    }

    #[test]
    fn test_export_filename_trailing_punctuation() {
        let mut m = sample_match();
        m.program.name = "AI & Robotics (M.Sc.)".to_string();
        assert_eq!(
            export_filename(&m.program),
            "TU_Munich_AI_Robotics_M_Sc_Timeline.xlsx"
        );
    }

    #[test]
    fn test_export_timeline_writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_timeline(&sample_match(), dir.path()).unwrap();
        assert!(path.exists());
        assert!(path.metadata().unwrap().len() > 0);
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "TU_Munich_M_Sc_Informatics_Timeline.xlsx"
        );
    }
}
