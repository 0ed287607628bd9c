//! Language variants and page paths

use super::error::{SheetError, SheetResult};
use std::fmt;

/// Directory holding every sheet file
pub const SHEET_DIRECTORY: &str = "exd";

/// Logical path of the sheet list
pub const SHEET_LIST_PATH: &str = "exd/root.exl";

/// Language variant of a sheet page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Language {
    /// Language-independent data
    None = 0,
    /// Japanese
    Japanese = 1,
    /// English
    English = 2,
    /// German
    German = 3,
    /// French
    French = 4,
    /// Simplified Chinese
    ChineseSimplified = 5,
    /// Traditional Chinese
    ChineseTraditional = 6,
    /// Korean
    Korean = 7,
    /// Second traditional Chinese variant; has no path code
    ChineseTraditional2 = 8,
}

impl TryFrom<u8> for Language {
    type Error = SheetError;

    fn try_from(value: u8) -> SheetResult<Self> {
        Ok(match value {
            0 => Self::None,
            1 => Self::Japanese,
            2 => Self::English,
            3 => Self::German,
            4 => Self::French,
            5 => Self::ChineseSimplified,
            6 => Self::ChineseTraditional,
            7 => Self::Korean,
            8 => Self::ChineseTraditional2,
            other => return Err(SheetError::InvalidLanguage(other)),
        })
    }
}

impl Language {
    /// Path suffix, `None` for language-independent pages
    pub fn code(self) -> SheetResult<Option<&'static str>> {
        let code = match self {
            Self::None => return Ok(None),
            Self::Japanese => "ja",
            Self::English => "en",
            Self::German => "de",
            Self::French => "fr",
            Self::ChineseSimplified => "chs",
            Self::ChineseTraditional => "cht",
            Self::Korean => "ko",
            Self::ChineseTraditional2 => return Err(SheetError::InvalidLanguage(self as u8)),
        };
        Ok(Some(code))
    }

    /// Parse a path suffix back into a language
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ja" => Some(Self::Japanese),
            "en" => Some(Self::English),
            "de" => Some(Self::German),
            "fr" => Some(Self::French),
            "chs" => Some(Self::ChineseSimplified),
            "cht" => Some(Self::ChineseTraditional),
            "ko" => Some(Self::Korean),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code() {
            Ok(Some(code)) => f.write_str(code),
            Ok(None) => f.write_str("none"),
            Err(_) => f.write_str("cht2"),
        }
    }
}

/// Logical path of one page: `exd/{sheet}_{start_id}[_{code}].exd`
///
/// # Examples
///
/// ```
/// use sqpack_formats::sheet::{Language, page_path};
///
/// assert_eq!(page_path("Item", 0, Language::None)?, "exd/Item_0.exd");
/// assert_eq!(page_path("Item", 0, Language::English)?, "exd/Item_0_en.exd");
/// # Ok::<(), sqpack_formats::sheet::SheetError>(())
/// ```
pub fn page_path(sheet: &str, start_id: u32, language: Language) -> SheetResult<String> {
    Ok(match language.code()? {
        Some(code) => format!("{SHEET_DIRECTORY}/{sheet}_{start_id}_{code}.exd"),
        None => format!("{SHEET_DIRECTORY}/{sheet}_{start_id}.exd"),
    })
}

/// Page path for a raw language value
pub fn page_path_for_value(sheet: &str, start_id: u32, language: u8) -> SheetResult<String> {
    page_path(sheet, start_id, Language::try_from(language)?)
}

/// Logical path of a sheet header: `exd/{sheet}.exh`
pub fn header_path(sheet: &str) -> String {
    format!("{SHEET_DIRECTORY}/{sheet}.exh")
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_page_paths() {
        assert_eq!(page_path("Item", 0, Language::None).unwrap(), "exd/Item_0.exd");
        assert_eq!(
            page_path("Item", 0, Language::English).unwrap(),
            "exd/Item_0_en.exd"
        );
        assert_eq!(
            page_path("quest/001/ClsHrv001_00001", 500, Language::ChineseSimplified).unwrap(),
            "exd/quest/001/ClsHrv001_00001_500_chs.exd"
        );
    }

    #[test]
    fn test_invalid_languages() {
        assert!(matches!(
            page_path_for_value("Item", 0, 9),
            Err(SheetError::InvalidLanguage(9))
        ));
        assert!(matches!(
            page_path("Item", 0, Language::ChineseTraditional2),
            Err(SheetError::InvalidLanguage(8))
        ));
        assert_eq!(page_path_for_value("Item", 0, 7).unwrap(), "exd/Item_0_ko.exd");
    }

    #[test]
    fn test_codes_round_trip() {
        for value in 1..=7 {
            let language = Language::try_from(value).unwrap();
            let code = language.code().unwrap().expect("code");
            assert_eq!(Language::from_code(code), Some(language));
        }
        assert_eq!(Language::from_code("cht2"), None);
    }

    #[test]
    fn test_header_path() {
        assert_eq!(header_path("Item"), "exd/Item.exh");
    }
}
