use super::DocxError;
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// In-memory snapshot of a DOCX ZIP container.
#[derive(Debug)]
pub(crate) struct DocxPackage {
    parts: Vec<(String, Vec<u8>)>,
}

impl DocxPackage {
    pub(crate) fn open(path: &Path) -> Result<Self, DocxError> {
        let bytes = fs::read(path)?;
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;

        let mut parts = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            parts.push((entry.name().to_owned(), data));
        }

        Ok(Self { parts })
    }

    pub(crate) fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(part_name, _)| part_name == name)
            .map(|(_, data)| data.as_slice())
    }

    /// Writes the package to `path`, substituting `replacement` for the part
    /// named `name`. All other parts are copied through unchanged.
    pub(crate) fn save_with(
        &self,
        path: &Path,
        name: &str,
        replacement: &[u8],
    ) -> Result<(), DocxError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (part_name, data) in &self.parts {
            writer.start_file(part_name.as_str(), options)?;
            if part_name == name {
                writer.write_all(replacement)?;
            } else {
                writer.write_all(data)?;
            }
        }

        let cursor = writer.finish()?;
        fs::write(path, cursor.into_inner())?;
        Ok(())
    }
}
