use formation_service::config::FormationConfig;
use formation_service::docx::Document;
use formation_service::startup::Application;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestApp {
    pub address: String,
    pub template_path: PathBuf,
    _tempdir: TempDir,
}

impl TestApp {
    /// Spawns the application against a freshly generated template.
    pub async fn spawn() -> Self {
        let tempdir = tempfile::tempdir().expect("Failed to create temp dir");
        let template_path = tempdir.path().join("SUIVI_DE_FORMATION_VIERGE.docx");
        write_template(&template_path);
        Self::spawn_at(template_path, tempdir).await
    }

    /// Spawns the application pointing at a template path that does not exist.
    pub async fn spawn_without_template() -> Self {
        let tempdir = tempfile::tempdir().expect("Failed to create temp dir");
        let template_path = tempdir.path().join("missing.docx");
        Self::spawn_at(template_path, tempdir).await
    }

    async fn spawn_at(template_path: PathBuf, tempdir: TempDir) -> Self {
        let mut config = FormationConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing
        config.template.path = template_path.display().to_string();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let port = app.port();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let address = format!("http://127.0.0.1:{}", port);

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            template_path,
            _tempdir: tempdir,
        }
    }
}

/// Opens a DOCX response body through the crate's own codec.
pub fn open_response_docx(bytes: &[u8]) -> Document {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(bytes).expect("Failed to write document bytes");
    Document::open(file.path()).expect("Failed to open generated document")
}

/// Writes a blank template with the production table layout: a 9x2 general
/// metadata table, an unused table, a 2x2 themes table, and a 10x3 learner
/// table. Every cell is seeded with a `tpl-{table}-{row}-{col}` marker so
/// tests can tell untouched cells apart.
pub fn write_template(path: &Path) {
    let file = std::fs::File::create(path).expect("Failed to create template file");
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options)
        .expect("Failed to start content types part");
    zip.write_all(CONTENT_TYPES.as_bytes())
        .expect("Failed to write content types part");

    zip.start_file("_rels/.rels", options)
        .expect("Failed to start rels part");
    zip.write_all(RELS.as_bytes())
        .expect("Failed to write rels part");

    zip.start_file("word/document.xml", options)
        .expect("Failed to start document part");
    zip.write_all(document_xml().as_bytes())
        .expect("Failed to write document part");

    zip.finish().expect("Failed to finish template archive");
}

pub fn template_marker(table: usize, row: usize, col: usize) -> String {
    format!("tpl-{}-{}-{}", table, row, col)
}

fn document_xml() -> String {
    let mut body = String::new();
    body.push_str(&table_xml(0, 9, 2));
    body.push_str("<w:p/>");
    body.push_str(&table_xml(1, 1, 1));
    body.push_str("<w:p/>");
    body.push_str(&table_xml(2, 2, 2));
    body.push_str("<w:p/>");
    body.push_str(&table_xml(3, 10, 3));
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{}<w:sectPr/></w:body></w:document>",
        body
    )
}

fn table_xml(table: usize, rows: usize, cols: usize) -> String {
    let mut xml =
        String::from("<w:tbl><w:tblPr><w:tblW w:w=\"0\" w:type=\"auto\"/></w:tblPr>");
    for row in 0..rows {
        xml.push_str("<w:tr>");
        for col in 0..cols {
            xml.push_str(&format!(
                "<w:tc><w:tcPr><w:tcW w:w=\"0\" w:type=\"auto\"/></w:tcPr>\
                 <w:p><w:r><w:t>{}</w:t></w:r></w:p></w:tc>",
                template_marker(table, row, col)
            ));
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
    xml
}

const CONTENT_TYPES: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
<Default Extension=\"xml\" ContentType=\"application/xml\"/>\
<Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
</Types>";

const RELS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"word/document.xml\"/>\
</Relationships>";
