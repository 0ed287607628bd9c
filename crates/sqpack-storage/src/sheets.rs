//! Sheet access over an open archive
//!
//! Sheets live under `exd/`: the list at `exd/root.exl`, one header per
//! sheet at `exd/{sheet}.exh` and one page per (page range, language) at
//! `exd/{sheet}_{start}[_{lang}].exd`.

use crate::reader::ArchiveReader;
use crate::writer::ArchiveWriter;
use crate::Result;
use sqpack_formats::index::Location;
use sqpack_formats::sheet::{
    Field, Language, PageRange, SHEET_LIST_PATH, SheetHeader, SheetList, SheetPage, header_path,
    page_path,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Read-side sheet API
///
/// Parsed headers are cached per sheet name for the lifetime of the reader.
#[derive(Debug)]
pub struct SheetReader<'a> {
    archive: &'a ArchiveReader,
    headers: Mutex<HashMap<String, Arc<SheetHeader>>>,
}

impl<'a> SheetReader<'a> {
    /// Wrap an open archive
    pub fn new(archive: &'a ArchiveReader) -> Self {
        Self {
            archive,
            headers: Mutex::new(HashMap::new()),
        }
    }

    /// Parse `exd/root.exl`, `None` if the archive does not carry it
    pub async fn list_sheets(&self) -> Result<Option<SheetList>> {
        let Some(data) = self.archive.read_file(SHEET_LIST_PATH).await? else {
            return Ok(None);
        };
        Ok(Some(SheetList::parse(&data)?))
    }

    /// Header of `sheet`, `None` if the archive does not carry it
    pub async fn read_sheet_header(&self, sheet: &str) -> Result<Option<Arc<SheetHeader>>> {
        let mut headers = self.headers.lock().await;
        if let Some(header) = headers.get(sheet) {
            return Ok(Some(Arc::clone(header)));
        }

        let path = header_path(sheet);
        let Some(data) = self.archive.read_file(&path).await? else {
            return Ok(None);
        };
        let header = Arc::new(SheetHeader::from_bytes(&data)?);
        debug!(
            "Loaded header for {sheet}: {} columns, {} pages",
            header.columns.len(),
            header.pages.len()
        );
        headers.insert(sheet.to_string(), Arc::clone(&header));
        Ok(Some(header))
    }

    /// Parse one page of `sheet`
    ///
    /// `None` when the sheet, the language or the page file is absent.
    pub async fn read_page(
        &self,
        sheet: &str,
        page: &PageRange,
        language: Language,
    ) -> Result<Option<SheetPage>> {
        let Some(header) = self.read_sheet_header(sheet).await? else {
            return Ok(None);
        };
        if !header.has_language(language) {
            debug!("{sheet} is not stored in language {language}");
            return Ok(None);
        }

        let path = page_path(sheet, page.start_id, language)?;
        let Some(data) = self.archive.read_file(&path).await? else {
            return Ok(None);
        };
        Ok(Some(SheetPage::parse(&header, &data)?))
    }

    /// Fields of a row in a single-layout sheet
    pub async fn read_row(
        &self,
        sheet: &str,
        page: &PageRange,
        language: Language,
        row_id: u32,
    ) -> Result<Option<Vec<Field>>> {
        if !page.contains(row_id) {
            return Ok(None);
        }
        let Some(parsed) = self.read_page(sheet, page, language).await? else {
            return Ok(None);
        };
        Ok(parsed.get_row(row_id)?.map(<[Field]>::to_vec))
    }

    /// Fields of one sub-row in a grouped-layout sheet
    pub async fn read_subrow(
        &self,
        sheet: &str,
        page: &PageRange,
        language: Language,
        row_id: u32,
        sub_row_id: u16,
    ) -> Result<Option<Vec<Field>>> {
        if !page.contains(row_id) {
            return Ok(None);
        }
        let Some(parsed) = self.read_page(sheet, page, language).await? else {
            return Ok(None);
        };
        Ok(parsed.get_subrow(row_id, sub_row_id)?.map(<[Field]>::to_vec))
    }
}

/// Write-side sheet API
#[derive(Debug)]
pub struct SheetWriter<'a> {
    archive: &'a mut ArchiveWriter,
}

impl<'a> SheetWriter<'a> {
    /// Wrap an archive being written
    pub fn new(archive: &'a mut ArchiveWriter) -> Self {
        Self { archive }
    }

    /// Store `list` at `exd/root.exl`
    pub async fn write_sheet_list(&mut self, list: &SheetList) -> Result<Location> {
        self.archive.add_file(SHEET_LIST_PATH, &list.build()).await
    }

    /// Store the header of `sheet`
    pub async fn write_sheet_header(&mut self, sheet: &str, header: &SheetHeader) -> Result<Location> {
        header.validate_columns()?;
        let bytes = header.to_bytes()?;
        self.archive.add_file(&header_path(sheet), &bytes).await
    }

    /// Store one page of `sheet` for `language`
    pub async fn write_page(
        &mut self,
        sheet: &str,
        start_id: u32,
        language: Language,
        page: &SheetPage,
    ) -> Result<Location> {
        let path = page_path(sheet, start_id, language)?;
        let bytes = page.build()?;
        debug!("Writing {path} with {} rows", page.len());
        self.archive.add_file(&path, &bytes).await
    }
}
