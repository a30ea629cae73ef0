use super::package::DocxPackage;
use super::DocxError;
use quick_xml::escape::{escape, resolve_xml_entity};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::Path;

const DOCUMENT_PART: &str = "word/document.xml";

/// One cell of a body-level table: where its content sits inside
/// `word/document.xml`, the text it currently holds, and the replacement
/// queued for it, if any.
#[derive(Debug)]
struct Cell {
    /// First byte of replaceable content, just past the `w:tcPr` block.
    write_start: usize,
    /// Byte offset of the cell's closing tag.
    content_end: usize,
    text: String,
    pending: Option<String>,
}

#[derive(Default, Debug)]
struct Row {
    cells: Vec<Cell>,
}

#[derive(Default, Debug)]
struct Table {
    rows: Vec<Row>,
}

/// A DOCX document opened from a template file. Cell writes are queued in
/// memory and spliced into the body part on `save`; the source file is never
/// modified.
#[derive(Debug)]
pub struct Document {
    package: DocxPackage,
    xml: Vec<u8>,
    tables: Vec<Table>,
}

impl Document {
    pub fn open(path: &Path) -> Result<Self, DocxError> {
        let package = DocxPackage::open(path)?;
        let xml = package
            .part(DOCUMENT_PART)
            .ok_or_else(|| DocxError::MissingPart(DOCUMENT_PART.to_owned()))?
            .to_vec();
        let tables = parse_tables(&xml)?;
        Ok(Self {
            package,
            xml,
            tables,
        })
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Current text of a cell: queued replacement if one exists, otherwise
    /// the text parsed from the template. Paragraphs and line breaks read
    /// back as `\n`, tabs as `\t`.
    pub fn cell_text(&self, table: usize, row: usize, col: usize) -> Result<&str, DocxError> {
        let cell = self.cell(table, row, col)?;
        Ok(cell.pending.as_deref().unwrap_or(&cell.text))
    }

    /// Queues a full replacement of the cell's content with a single
    /// paragraph holding `text`. `\n` becomes a line break, `\t` a tab.
    pub fn set_cell_text(
        &mut self,
        table: usize,
        row: usize,
        col: usize,
        text: &str,
    ) -> Result<(), DocxError> {
        let cell = self.cell_mut(table, row, col)?;
        cell.pending = Some(text.to_owned());
        Ok(())
    }

    /// Writes the package to `path` with all queued cell edits applied.
    pub fn save(&self, path: &Path) -> Result<(), DocxError> {
        let mut edits: Vec<(usize, usize, String)> = Vec::new();
        for table in &self.tables {
            for row in &table.rows {
                for cell in &row.cells {
                    if let Some(text) = &cell.pending {
                        edits.push((cell.write_start, cell.content_end, cell_content_xml(text)));
                    }
                }
            }
        }
        edits.sort_by_key(|(start, _, _)| *start);

        let mut patched = Vec::with_capacity(self.xml.len());
        let mut cursor = 0;
        for (start, end, fragment) in &edits {
            patched.extend_from_slice(&self.xml[cursor..*start]);
            patched.extend_from_slice(fragment.as_bytes());
            cursor = *end;
        }
        patched.extend_from_slice(&self.xml[cursor..]);

        self.package.save_with(path, DOCUMENT_PART, &patched)
    }

    fn cell(&self, table: usize, row: usize, col: usize) -> Result<&Cell, DocxError> {
        let found = self.tables.get(table).ok_or(DocxError::TableIndex {
            table,
            count: self.tables.len(),
        })?;
        found
            .rows
            .get(row)
            .and_then(|r| r.cells.get(col))
            .ok_or(DocxError::CellIndex { table, row, col })
    }

    fn cell_mut(&mut self, table: usize, row: usize, col: usize) -> Result<&mut Cell, DocxError> {
        let count = self.tables.len();
        let found = self
            .tables
            .get_mut(table)
            .ok_or(DocxError::TableIndex { table, count })?;
        found
            .rows
            .get_mut(row)
            .and_then(|r| r.cells.get_mut(col))
            .ok_or(DocxError::CellIndex { table, row, col })
    }
}

/// Streams over the body part once, recording the content byte range and
/// current text of every cell of every body-level table. Tables nested
/// inside cells are not indexed.
fn parse_tables(xml: &[u8]) -> Result<Vec<Table>, DocxError> {
    let mut reader = Reader::from_reader(xml);
    let config = reader.config_mut();
    config.check_comments = false;
    config.check_end_names = false;

    let mut tables: Vec<Table> = Vec::new();
    let mut buffer = Vec::with_capacity(1024);
    let mut in_table = false;
    let mut nested = 0usize;
    let mut in_cell = false;
    let mut in_run = false;
    let mut in_text = false;
    let mut paragraphs = 0usize;

    loop {
        buffer.clear();
        let event_start = reader.buffer_position() as usize;
        let event = match reader.read_event_into(&mut buffer) {
            Ok(Event::Eof) => break,
            Ok(event) => event,
            Err(error) => return Err(error.into()),
        };
        let event_end = reader.buffer_position() as usize;

        match event {
            Event::Start(ref element) => match element.name().as_ref() {
                b"w:tbl" if in_table => nested += 1,
                b"w:tbl" => {
                    in_table = true;
                    tables.push(Table::default());
                }
                b"w:tr" if in_table && nested == 0 => {
                    if let Some(table) = tables.last_mut() {
                        table.rows.push(Row::default());
                    }
                }
                b"w:tc" if in_table && nested == 0 => {
                    if let Some(row) = tables.last_mut().and_then(|t| t.rows.last_mut()) {
                        row.cells.push(Cell {
                            write_start: event_end,
                            content_end: event_end,
                            text: String::new(),
                            pending: None,
                        });
                        in_cell = true;
                        paragraphs = 0;
                    }
                }
                b"w:p" if in_cell && nested == 0 => {
                    if paragraphs > 0 {
                        if let Some(cell) = last_cell(&mut tables) {
                            cell.text.push('\n');
                        }
                    }
                    paragraphs += 1;
                }
                b"w:r" if in_cell && nested == 0 => in_run = true,
                b"w:t" if in_run => in_text = true,
                b"w:br" | b"w:cr" if in_run && in_cell && nested == 0 => {
                    if let Some(cell) = last_cell(&mut tables) {
                        cell.text.push('\n');
                    }
                }
                b"w:tab" if in_run && in_cell && nested == 0 => {
                    if let Some(cell) = last_cell(&mut tables) {
                        cell.text.push('\t');
                    }
                }
                _ => (),
            },
            Event::Empty(ref element) => match element.name().as_ref() {
                b"w:p" if in_cell && nested == 0 => {
                    if paragraphs > 0 {
                        if let Some(cell) = last_cell(&mut tables) {
                            cell.text.push('\n');
                        }
                    }
                    paragraphs += 1;
                }
                b"w:br" | b"w:cr" if in_run && in_cell && nested == 0 => {
                    if let Some(cell) = last_cell(&mut tables) {
                        cell.text.push('\n');
                    }
                }
                b"w:tab" if in_run && in_cell && nested == 0 => {
                    if let Some(cell) = last_cell(&mut tables) {
                        cell.text.push('\t');
                    }
                }
                _ => (),
            },
            Event::End(ref element) => match element.name().as_ref() {
                b"w:tbl" if nested > 0 => nested -= 1,
                b"w:tbl" => in_table = false,
                b"w:tcPr" if in_cell && nested == 0 => {
                    if let Some(cell) = last_cell(&mut tables) {
                        cell.write_start = event_end;
                    }
                }
                b"w:tc" if in_cell && nested == 0 => {
                    if let Some(cell) = last_cell(&mut tables) {
                        cell.content_end = event_start;
                    }
                    in_cell = false;
                }
                b"w:r" => in_run = false,
                b"w:t" => in_text = false,
                _ => (),
            },
            Event::Text(ref text) if in_text && in_cell && nested == 0 => {
                if let Some(cell) = last_cell(&mut tables) {
                    cell.text.push_str(&text.xml_content()?);
                }
            }
            Event::CData(ref text) if in_text && in_cell && nested == 0 => {
                if let Some(cell) = last_cell(&mut tables) {
                    cell.text.push_str(&text.xml_content()?);
                }
            }
            Event::GeneralRef(ref entity) if in_text && in_cell && nested == 0 => {
                if let Some(cell) = last_cell(&mut tables) {
                    push_entity(&mut cell.text, &entity.xml_content()?)?;
                }
            }
            _ => (),
        }
    }

    Ok(tables)
}

fn last_cell(tables: &mut [Table]) -> Option<&mut Cell> {
    tables.last_mut()?.rows.last_mut()?.cells.last_mut()
}

/// Resolves an entity or character reference, e.g. `amp` or `#233`.
fn push_entity(text: &mut String, raw: &str) -> Result<(), DocxError> {
    if let Some(number) = raw.strip_prefix('#') {
        let code = if let Some(hex) = number.strip_prefix('x') {
            u32::from_str_radix(hex, 16)
        } else {
            number.parse::<u32>()
        }
        .map_err(|_| DocxError::Entity(raw.to_owned()))?;
        if let Some(character) = char::from_u32(code) {
            text.push(character);
        }
    } else if let Some(entity) = resolve_xml_entity(raw) {
        text.push_str(entity);
    } else {
        return Err(DocxError::Entity(raw.to_owned()));
    }
    Ok(())
}

/// Renders replacement cell content: a single paragraph with one run, `\n`
/// as line breaks and `\t` as tabs.
fn cell_content_xml(text: &str) -> String {
    let mut xml = String::with_capacity(text.len() + 64);
    xml.push_str("<w:p><w:r>");
    for (line_index, line) in text.split('\n').enumerate() {
        if line_index > 0 {
            xml.push_str("<w:br/>");
        }
        for (segment_index, segment) in line.split('\t').enumerate() {
            if segment_index > 0 {
                xml.push_str("<w:tab/>");
            }
            if !segment.is_empty() {
                xml.push_str("<w:t xml:space=\"preserve\">");
                xml.push_str(&escape(segment));
                xml.push_str("</w:t>");
            }
        }
    }
    xml.push_str("</w:r></w:p>");
    xml
}
