//! Sheets written through `SheetWriter` and read back through `SheetReader`.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use pretty_assertions::assert_eq;
use sqpack_formats::container::BuildStamp;
use sqpack_formats::sheet::{
    ColumnDefinition, ColumnType, Field, Language, PageRange, RowLayout, SheetHeader, SheetList,
    SheetPage,
};
use sqpack_storage::{
    ArchiveConfig, ArchiveReader, ArchiveWriter, SheetReader, SheetWriter, StorageError,
};
use std::path::{Path, PathBuf};

fn item_header() -> SheetHeader {
    SheetHeader::new(
        RowLayout::Single,
        8,
        vec![
            ColumnDefinition::new(ColumnType::String, 0),
            ColumnDefinition::new(ColumnType::UInt16, 4),
            ColumnDefinition::new(ColumnType::packed_bool(0).expect("bit"), 6),
            ColumnDefinition::new(ColumnType::packed_bool(1).expect("bit"), 6),
        ],
        vec![PageRange::new(0, 100), PageRange::new(100, 100)],
        vec![Language::English, Language::German],
    )
}

fn quest_header() -> SheetHeader {
    SheetHeader::new(
        RowLayout::Grouped,
        4,
        vec![ColumnDefinition::new(ColumnType::String, 0)],
        vec![PageRange::new(0, 50)],
        vec![Language::None],
    )
}

fn item_row(name: &str, price: u16, flags: (bool, bool)) -> Vec<Field> {
    vec![
        Field::from(name),
        Field::UInt16(price),
        Field::PackedBool(flags.0),
        Field::PackedBool(flags.1),
    ]
}

async fn build_archive(prefix: &Path) {
    let config = ArchiveConfig::default().with_build_stamp(BuildStamp::new(20240131, 0));
    let mut archive = ArchiveWriter::create(prefix, config).await.expect("create");
    let mut sheets = SheetWriter::new(&mut archive);

    let mut list = SheetList::new();
    list.push("Item", 0);
    list.push("Quest", 1);
    sheets.write_sheet_list(&list).await.expect("list");

    let item = item_header();
    sheets.write_sheet_header("Item", &item).await.expect("header");
    for (language, potion) in [(Language::English, "Potion"), (Language::German, "Trank")] {
        let mut first = SheetPage::new(&item).expect("page");
        first.write_row(1, item_row(potion, 20, (true, false))).expect("row");
        first.write_row(2, item_row("Ether", 150, (false, true))).expect("row");
        sheets.write_page("Item", 0, language, &first).await.expect("page");

        let mut second = SheetPage::new(&item).expect("page");
        second.write_row(100, item_row("Elixir", 999, (true, true))).expect("row");
        sheets.write_page("Item", 100, language, &second).await.expect("page");
    }

    let quest = quest_header();
    sheets.write_sheet_header("Quest", &quest).await.expect("header");
    let mut page = SheetPage::new(&quest).expect("page");
    page.write_subrow(7, 0, vec![Field::from("Start")]).expect("subrow");
    page.write_subrow(7, 1, vec![Field::from("Finish")]).expect("subrow");
    sheets.write_page("Quest", 0, Language::None, &page).await.expect("page");

    archive.close().await.expect("close");
}

fn prefix(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("0a0000.win32")
}

#[tokio::test]
async fn sheet_list_and_headers_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let prefix = prefix(&dir);
    build_archive(&prefix).await;

    let archive = ArchiveReader::open(&prefix).await.expect("open");
    let sheets = SheetReader::new(&archive);

    let list = sheets.list_sheets().await.expect("list").expect("present");
    assert_eq!(list.names().collect::<Vec<_>>(), vec!["Item", "Quest"]);
    assert_eq!(list.get("Quest"), Some(1));

    let header = sheets.read_sheet_header("Item").await.expect("read").expect("present");
    assert_eq!(*header, item_header());
    assert_eq!(header.total_row_count, 200);
    assert!(sheets.read_sheet_header("Missing").await.expect("read").is_none());
}

#[tokio::test]
async fn single_rows_per_language() {
    let dir = tempfile::tempdir().expect("tempdir");
    let prefix = prefix(&dir);
    build_archive(&prefix).await;

    let archive = ArchiveReader::open(&prefix).await.expect("open");
    let sheets = SheetReader::new(&archive);
    let header = sheets.read_sheet_header("Item").await.expect("read").expect("present");
    let first = header.page_for(1).copied().expect("page");
    let second = header.page_for(100).copied().expect("page");

    let english = sheets
        .read_row("Item", &first, Language::English, 1)
        .await
        .expect("read");
    assert_eq!(english, Some(item_row("Potion", 20, (true, false))));

    let german = sheets
        .read_row("Item", &first, Language::German, 1)
        .await
        .expect("read");
    assert_eq!(german, Some(item_row("Trank", 20, (true, false))));

    let elixir = sheets
        .read_row("Item", &second, Language::English, 100)
        .await
        .expect("read");
    assert_eq!(elixir, Some(item_row("Elixir", 999, (true, true))));

    // Absent row, row outside the page range, language the sheet lacks
    assert!(sheets.read_row("Item", &first, Language::English, 3).await.expect("read").is_none());
    assert!(sheets.read_row("Item", &first, Language::English, 100).await.expect("read").is_none());
    assert!(sheets.read_row("Item", &first, Language::French, 1).await.expect("read").is_none());
}

#[tokio::test]
async fn grouped_subrows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let prefix = prefix(&dir);
    build_archive(&prefix).await;

    let archive = ArchiveReader::open(&prefix).await.expect("open");
    let sheets = SheetReader::new(&archive);
    let range = PageRange::new(0, 50);

    let page = sheets
        .read_page("Quest", &range, Language::None)
        .await
        .expect("read")
        .expect("present");
    assert_eq!(page.row_ids().collect::<Vec<_>>(), vec![7]);

    let finish = sheets
        .read_subrow("Quest", &range, Language::None, 7, 1)
        .await
        .expect("read");
    assert_eq!(finish, Some(vec![Field::from("Finish")]));
    assert!(sheets.read_subrow("Quest", &range, Language::None, 7, 2).await.expect("read").is_none());

    let err = sheets
        .read_row("Quest", &range, Language::None, 7)
        .await
        .expect_err("layout");
    assert!(matches!(err, StorageError::Sheet(_)));
}

#[tokio::test]
async fn missing_sheet_list_reads_as_none() {
    let dir = tempfile::tempdir().expect("tempdir");
    let prefix = prefix(&dir);
    let mut writer = ArchiveWriter::create(&prefix, ArchiveConfig::default())
        .await
        .expect("create");
    writer.add_file("exd/other.exh", b"x").await.expect("add");
    writer.close().await.expect("close");

    let archive = ArchiveReader::open(&prefix).await.expect("open");
    let list = SheetReader::new(&archive).list_sheets().await.expect("read");
    assert!(list.is_none());
}
