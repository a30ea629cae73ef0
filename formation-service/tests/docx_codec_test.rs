mod common;

use common::{template_marker, write_template};
use formation_service::docx::{Document, DocxError};

#[test]
fn round_trip_preserves_written_text() {
    let tempdir = tempfile::tempdir().expect("Failed to create temp dir");
    let template = tempdir.path().join("template.docx");
    write_template(&template);

    let mut document = Document::open(&template).expect("Failed to open template");
    assert_eq!(document.table_count(), 4);

    document
        .set_cell_text(0, 2, 1, "Semaine 13 & 14 <mars>\navec\ttabulation")
        .expect("Failed to set cell text");

    let output = tempdir.path().join("filled.docx");
    document.save(&output).expect("Failed to save document");

    let reopened = Document::open(&output).expect("Failed to reopen document");
    assert_eq!(
        reopened.cell_text(0, 2, 1).unwrap(),
        "Semaine 13 & 14 <mars>\navec\ttabulation"
    );
    // Neighbouring cells keep their template text.
    assert_eq!(reopened.cell_text(0, 2, 0).unwrap(), template_marker(0, 2, 0));
    assert_eq!(reopened.cell_text(0, 3, 1).unwrap(), template_marker(0, 3, 1));
}

#[test]
fn last_write_wins_for_a_cell() {
    let tempdir = tempfile::tempdir().expect("Failed to create temp dir");
    let template = tempdir.path().join("template.docx");
    write_template(&template);

    let mut document = Document::open(&template).expect("Failed to open template");
    document.set_cell_text(2, 0, 1, "first").unwrap();
    document.set_cell_text(2, 0, 1, "second").unwrap();
    assert_eq!(document.cell_text(2, 0, 1).unwrap(), "second");

    let output = tempdir.path().join("filled.docx");
    document.save(&output).expect("Failed to save document");
    let reopened = Document::open(&output).expect("Failed to reopen document");
    assert_eq!(reopened.cell_text(2, 0, 1).unwrap(), "second");
}

#[test]
fn out_of_range_indices_error() {
    let tempdir = tempfile::tempdir().expect("Failed to create temp dir");
    let template = tempdir.path().join("template.docx");
    write_template(&template);

    let mut document = Document::open(&template).expect("Failed to open template");

    let table_err = document.set_cell_text(9, 0, 0, "x").unwrap_err();
    assert!(matches!(
        table_err,
        DocxError::TableIndex { table: 9, count: 4 }
    ));

    let row_err = document.set_cell_text(0, 99, 1, "x").unwrap_err();
    assert!(matches!(
        row_err,
        DocxError::CellIndex {
            table: 0,
            row: 99,
            col: 1
        }
    ));

    let col_err = document.cell_text(3, 1, 7).unwrap_err();
    assert!(matches!(
        col_err,
        DocxError::CellIndex {
            table: 3,
            row: 1,
            col: 7
        }
    ));
}

#[test]
fn open_rejects_non_docx_input() {
    let tempdir = tempfile::tempdir().expect("Failed to create temp dir");
    let not_a_docx = tempdir.path().join("garbage.docx");
    std::fs::write(&not_a_docx, b"this is not a zip archive").unwrap();

    assert!(Document::open(&not_a_docx).is_err());
    assert!(Document::open(&tempdir.path().join("absent.docx")).is_err());
}

#[test]
fn open_rejects_archive_without_document_part() {
    use std::io::Write;

    let tempdir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = tempdir.path().join("empty.docx");
    let file = std::fs::File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    zip.start_file("word/styles.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"<w:styles/>").unwrap();
    zip.finish().unwrap();

    let error = Document::open(&path).unwrap_err();
    assert!(matches!(error, DocxError::MissingPart(_)));
}
