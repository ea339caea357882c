//! Integration tests for the graphics inspector.

mod common;

use std::fs;

use common::sample_exam;
use exampdf::{inspect_file, GraphicsReport, PageSelection};

#[test]
fn test_inspect_file_reports_each_page() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("exam.pdf");
    fs::write(&path, sample_exam()).unwrap();

    let reports = inspect_file(&path, PageSelection::first(5)).unwrap();
    assert_eq!(
        reports,
        vec![
            GraphicsReport {
                page: 1,
                drawings: 1,
                images: 1,
                mentions_figure: true,
            },
            GraphicsReport {
                page: 2,
                drawings: 0,
                images: 0,
                mentions_figure: false,
            },
        ]
    );
}

#[test]
fn test_inspect_rejects_non_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "plain text").unwrap();

    assert!(matches!(
        inspect_file(&path, PageSelection::All),
        Err(exampdf::Error::UnknownFormat)
    ));
}
