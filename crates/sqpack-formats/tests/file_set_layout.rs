//! Integration tests assembling a small file set in memory
//!
//! Builds a `.dat0` image and both index files from the format types alone,
//! then resolves paths through each index and decodes the stored records.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use sqpack_formats::block::{FileInfoHeader, decode_stored_file, encode_stored_file};
use sqpack_formats::container::{
    BuildStamp, ContainerHeader, DataHeader, FileKind, PREAMBLE_SIZE, Platform,
};
use sqpack_formats::index::{IndexFile, IndexKind, IndexTable, Location};
use sqpack_formats::sheet::{
    ColumnDefinition, ColumnType, Field, Language, PageRange, RowLayout, SheetHeader, SheetList,
    SheetPage, header_path, page_path,
};
use sqpack_hash::sha1_field;

const STAMP: BuildStamp = BuildStamp::new(20240131, 12_345_600);

struct FileSet {
    dat0: Vec<u8>,
    index: Vec<u8>,
    index2: Vec<u8>,
}

fn assemble(files: &[(&str, Vec<u8>)]) -> FileSet {
    let mut payload = Vec::new();
    let mut index = IndexTable::new(IndexKind::Index);
    let mut index2 = IndexTable::new(IndexKind::Index2);

    for (path, data) in files {
        let location = Location::new(0, (PREAMBLE_SIZE + payload.len()) as u64);
        payload.extend_from_slice(&encode_stored_file(data, 6).expect("encode"));
        index
            .insert(IndexKind::Index.key_for(path).expect("key"), location)
            .expect("insert");
        index2
            .insert(IndexKind::Index2.key_for(path).expect("key"), location)
            .expect("insert");
    }

    let mut dat0 = ContainerHeader::new(FileKind::Data, Platform::Win32, STAMP)
        .to_bytes()
        .expect("container")
        .to_vec();
    let data_header = DataHeader::new(0, payload.len() as u64, sha1_field(&payload));
    dat0.extend_from_slice(&data_header.to_bytes().expect("data header"));
    dat0.extend_from_slice(&payload);

    let build = |table| {
        IndexFile::new(table, 1, Platform::Win32, STAMP)
            .to_bytes()
            .expect("index")
    };
    FileSet {
        dat0,
        index: build(index),
        index2: build(index2),
    }
}

fn read(set: &FileSet, path: &str, kind: IndexKind) -> Option<Vec<u8>> {
    let bytes = match kind {
        IndexKind::Index => &set.index,
        IndexKind::Index2 => &set.index2,
    };
    let file = IndexFile::parse(bytes, kind).expect("parse index");
    let location = file.table.get(kind.key_for(path).expect("key"))?;
    assert_eq!(location.data_file_id, 0);

    let record = &set.dat0[location.offset as usize..];
    let header = FileInfoHeader::from_bytes(record).expect("file info");
    Some(decode_stored_file(&record[..header.record_size()]).expect("decode"))
}

#[test]
fn both_indexes_resolve_every_path() {
    let blob: Vec<u8> = (0..50_000u32).map(|i| (i * 31 % 251) as u8).collect();
    let files = vec![
        ("exd/root.exl", b"EXLT,2".to_vec()),
        ("common/font/font1.tex", Vec::new()),
        ("music/ffxiv/bgm_title.scd", blob),
    ];
    let set = assemble(&files);

    for (path, data) in &files {
        for kind in [IndexKind::Index, IndexKind::Index2] {
            assert_eq!(read(&set, path, kind).as_ref(), Some(data), "{path} via {kind:?}");
        }
    }
    assert_eq!(read(&set, "exd/missing.exh", IndexKind::Index), None);
    assert_eq!(read(&set, "EXD/ROOT.EXL", IndexKind::Index2).as_deref(), Some(&b"EXLT,2"[..]));
}

#[test]
fn data_file_headers_describe_payload() {
    let set = assemble(&[("exd/root.exl", b"EXLT,2".to_vec())]);
    let container =
        ContainerHeader::from_bytes_expecting(&set.dat0, FileKind::Data).expect("container");
    assert_eq!(container.stamp(), STAMP);

    let data_header = DataHeader::from_bytes(&set.dat0[1024..]).expect("data header");
    let payload = &set.dat0[PREAMBLE_SIZE..];
    assert_eq!(data_header.data_size, payload.len() as u64);
    assert_eq!(data_header.data_digest, sha1_field(payload));
    assert_eq!(data_header.spanned_file, 1);
    assert_eq!(payload.len() % 128, 0);
}

#[test]
fn sheets_stored_as_files() {
    let header = SheetHeader::new(
        RowLayout::Single,
        8,
        vec![
            ColumnDefinition::new(ColumnType::String, 0),
            ColumnDefinition::new(ColumnType::Int32, 4),
        ],
        vec![PageRange::new(0, 10)],
        vec![Language::English, Language::German],
    );
    let mut english = SheetPage::new(&header).expect("page");
    english
        .write_row(3, vec![Field::from("Potion"), Field::Int32(40)])
        .expect("row");
    let mut german = SheetPage::new(&header).expect("page");
    german
        .write_row(3, vec![Field::from("Trank"), Field::Int32(40)])
        .expect("row");

    let mut list = SheetList::new();
    list.push("Item", 10);

    let en_path = page_path("Item", 0, Language::English).unwrap();
    let de_path = page_path("Item", 0, Language::German).unwrap();
    let set = assemble(&[
        ("exd/root.exl", list.build()),
        (header_path("Item").as_str(), header.to_bytes().expect("header")),
        (en_path.as_str(), english.build().expect("page")),
        (de_path.as_str(), german.build().expect("page")),
    ]);

    let list = SheetList::parse(&read(&set, "exd/root.exl", IndexKind::Index).unwrap()).unwrap();
    assert_eq!(list.names().collect::<Vec<_>>(), vec!["Item"]);

    let header =
        SheetHeader::from_bytes(&read(&set, "exd/Item.exh", IndexKind::Index2).unwrap()).unwrap();
    let page = SheetPage::parse(&header, &read(&set, "exd/item_0_de.exd", IndexKind::Index).unwrap())
        .expect("page");
    assert_eq!(
        page.get_row(3).unwrap(),
        Some(&[Field::from("Trank"), Field::Int32(40)][..])
    );
}
