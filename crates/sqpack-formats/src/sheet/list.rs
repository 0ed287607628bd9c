//! Sheet list (`exd/root.exl`)

use super::error::{SheetError, SheetResult};

/// First field of the list's first line
pub const SHEET_LIST_MAGIC: &str = "EXLT";

/// List version written by [`SheetList::new`]
pub const SHEET_LIST_VERSION: u32 = 2;

/// Names and ids of every sheet in an archive
///
/// Stored as text: a `EXLT,{version}` line followed by `{name},{id}` lines,
/// joined with CRLF. An id of `-1` marks a sheet without a numeric id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetList {
    /// List version
    pub version: u32,
    entries: Vec<(String, i32)>,
}

impl Default for SheetList {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetList {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            version: SHEET_LIST_VERSION,
            entries: Vec::new(),
        }
    }

    /// Append a sheet
    pub fn push(&mut self, name: impl Into<String>, id: i32) {
        self.entries.push((name.into(), id));
    }

    /// Id of the sheet called `name`
    pub fn get(&self, name: &str) -> Option<i32> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, id)| *id)
    }

    /// Whether a sheet called `name` is listed
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Sheet names in list order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// `(name, id)` pairs in list order
    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> + '_ {
        self.entries.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Number of listed sheets
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no sheets are listed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse list text; lines whose id is not an integer are skipped
    pub fn parse(data: &[u8]) -> SheetResult<Self> {
        let text = std::str::from_utf8(data)
            .map_err(|e| SheetError::InvalidSheetList(format!("not UTF-8: {e}")))?;
        let mut lines = text.split('\n').map(|line| line.trim_end_matches('\r'));

        let first = lines.next().unwrap_or_default();
        let version = first
            .split_once(',')
            .filter(|(magic, _)| *magic == SHEET_LIST_MAGIC)
            .and_then(|(_, version)| version.trim().parse::<u32>().ok())
            .ok_or_else(|| SheetError::InvalidSheetList(format!("bad first line {first:?}")))?;

        let entries = lines
            .filter_map(|line| {
                let (name, id) = line.rsplit_once(',')?;
                let id = id.trim().parse::<i32>().ok()?;
                Some((name.to_string(), id))
            })
            .collect();

        Ok(Self { version, entries })
    }

    /// Serialize to CRLF-joined text
    pub fn build(&self) -> Vec<u8> {
        let mut lines = Vec::with_capacity(self.entries.len() + 1);
        lines.push(format!("{SHEET_LIST_MAGIC},{}", self.version));
        lines.extend(self.entries.iter().map(|(name, id)| format!("{name},{id}")));
        lines.join("\r\n").into_bytes()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_skips_bad_ids() {
        let text = b"EXLT,2\r\nAchievement,209\r\nItem,10\r\ncustom/000/Broken,x\r\nquest/Hello,-1\r\n";
        let list = SheetList::parse(text).expect("parse");
        assert_eq!(list.version, 2);
        assert_eq!(
            list.iter().collect::<Vec<_>>(),
            vec![("Achievement", 209), ("Item", 10), ("quest/Hello", -1)]
        );
        assert_eq!(list.get("Item"), Some(10));
        assert!(!list.contains("custom/000/Broken"));
    }

    #[test]
    fn test_build_is_crlf_joined() {
        let mut list = SheetList::new();
        list.push("Item", 10);
        list.push("Action", 4);
        assert_eq!(list.build(), b"EXLT,2\r\nItem,10\r\nAction,4".to_vec());
        assert_eq!(SheetList::parse(&list.build()).expect("parse"), list);
    }

    #[test]
    fn test_empty_list() {
        let list = SheetList::new();
        assert_eq!(list.build(), b"EXLT,2".to_vec());
        assert!(SheetList::parse(b"EXLT,2").expect("parse").is_empty());
    }

    #[test]
    fn test_bad_first_line() {
        assert!(matches!(
            SheetList::parse(b"Item,10\r\n"),
            Err(SheetError::InvalidSheetList(_))
        ));
        assert!(SheetList::parse(b"").is_err());
    }
}
