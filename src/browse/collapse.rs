use crate::catalog::CatalogItem;

/// The folder to descend into instead of showing `items`, if any.
///
/// A listing collapses when its only browseable entry is also its last one.
/// Playable entries in front of it are usually a "Play All" shortcut and are
/// dropped along with the rest of the listing.
pub fn single_folder(items: &[CatalogItem]) -> Option<&CatalogItem> {
    let first_browseable = items.iter().position(|item| item.browseable)?;
    if first_browseable == items.len() - 1 {
        items.last()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_all_then_folder_collapses() {
        let items = vec![
            CatalogItem::track("all", "Play All"),
            CatalogItem::track("shuffle", "Shuffle"),
            CatalogItem::folder("albums", "Albums"),
        ];
        assert_eq!(single_folder(&items).map(|f| f.id.as_str()), Some("albums"));
    }

    #[test]
    fn test_lone_folder_collapses() {
        let items = vec![CatalogItem::folder("only", "Only")];
        assert_eq!(single_folder(&items).map(|f| f.id.as_str()), Some("only"));
    }

    #[test]
    fn test_folder_before_tracks_is_kept() {
        let items = vec![
            CatalogItem::folder("albums", "Albums"),
            CatalogItem::track("t1", "Song"),
        ];
        assert!(single_folder(&items).is_none());
    }

    #[test]
    fn test_two_folders_are_kept() {
        let items = vec![
            CatalogItem::track("all", "Play All"),
            CatalogItem::folder("a", "A"),
            CatalogItem::folder("b", "B"),
        ];
        assert!(single_folder(&items).is_none());
    }

    #[test]
    fn test_tracks_only_and_empty_are_kept() {
        assert!(single_folder(&[CatalogItem::track("t", "Song")]).is_none());
        assert!(single_folder(&[]).is_none());
    }
}
