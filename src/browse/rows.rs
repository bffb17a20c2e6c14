use crate::catalog::CatalogItem;
use crate::surface::{ListRow, RowImage};

// Real catalog ids never start with a NUL, so sentinel ids cannot collide with them
const SENTINEL_PREFIX: &str = "\u{0}carbrowse:";

/// Synthetic rows that report list state inline instead of catalog content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    Loading,
    Empty,
    Searching,
    NoResults,
    PlayFromSearch,
}

impl Sentinel {
    const ALL: [Sentinel; 5] = [
        Sentinel::Loading,
        Sentinel::Empty,
        Sentinel::Searching,
        Sentinel::NoResults,
        Sentinel::PlayFromSearch,
    ];

    fn key(self) -> &'static str {
        match self {
            Sentinel::Loading => "loading",
            Sentinel::Empty => "empty",
            Sentinel::Searching => "searching",
            Sentinel::NoResults => "no-results",
            Sentinel::PlayFromSearch => "play-from-search",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sentinel::Loading => "Loading…",
            Sentinel::Empty => "No items",
            Sentinel::Searching => "Searching…",
            Sentinel::NoResults => "No results",
            Sentinel::PlayFromSearch => "Play from search",
        }
    }

    pub fn id(self) -> String {
        format!("{}{}", SENTINEL_PREFIX, self.key())
    }

    pub fn item(self) -> CatalogItem {
        CatalogItem {
            id: self.id(),
            title: self.label().to_string(),
            ..Default::default()
        }
    }

    /// Which sentinel `item` is, `None` for real catalog entries
    pub fn of(item: &CatalogItem) -> Option<Sentinel> {
        let key = item.id.strip_prefix(SENTINEL_PREFIX)?;
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    /// Sentinels that only report state and must never be acted on
    pub fn is_inert(self) -> bool {
        !matches!(self, Sentinel::PlayFromSearch)
    }
}

fn is_symbol(c: char) -> bool {
    matches!(c as u32,
        0x2190..=0x21FF     // arrows
        | 0x2300..=0x23FF   // misc technical
        | 0x2460..=0x27BF   // enclosed, shapes, dingbats
        | 0x2B00..=0x2BFF   // misc symbols and arrows
        | 0xE000..=0xF8FF   // private use
        | 0xFE00..=0xFE0F   // variation selectors
        | 0x1F000..=0x1FAFF // emoji, pictographs, flags
        | 0x200D            // zero width joiner
    )
}

/// Strip emoji and other symbols the display font can't draw, collapse runs of spaces
pub fn clean_text(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| !is_symbol(*c) && (*c == '\n' || !c.is_control()))
        .collect();
    kept.split('\n')
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Safely truncate string to max characters, appending "…" if truncated 🛡️
pub fn truncate(s: &str, max_width: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() > max_width {
        chars
            .into_iter()
            .take(max_width.saturating_sub(1))
            .collect::<String>()
            + "…"
    } else {
        s.to_string()
    }
}

/// Render one catalog entry as a list row
///
/// The checkmark marks the entry the user picked last time on this page. The
/// subtitle, when present, goes on a second line; without one there is no
/// second line at all.
pub fn convert_row(
    item: &CatalogItem,
    previously_selected: Option<&CatalogItem>,
    max_title_len: usize,
) -> ListRow {
    let image = match (&item.cover_art, item.browseable) {
        (Some(art), _) => RowImage::CoverArt(art.clone()),
        (None, true) => RowImage::Folder,
        (None, false) => RowImage::Track,
    };

    let title = truncate(&clean_text(&item.title), max_title_len);
    let text = match item.subtitle.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(subtitle) => format!("{}\n{}", title, clean_text(subtitle)),
        None => title,
    };

    ListRow {
        checkmark: previously_selected == Some(item),
        image,
        text,
    }
}

/// Suggestion text for the filter screen: the cleaned title only
pub fn filter_row(item: &CatalogItem) -> String {
    clean_text(&item.title)
}

/// Suggestion text for the search screen: title plus subtitle line
pub fn search_row(item: &CatalogItem) -> String {
    match &item.subtitle {
        Some(subtitle) => clean_text(&format!("{}\n{}", item.title, subtitle)),
        None => clean_text(&item.title),
    }
}
