//! View layer: filter → sort → paginate.
//!
//! Pure, stateless transformation of a record listing plus a [`ViewState`]
//! into one displayed page. Sorting is stable — equal keys keep their
//! relative input order — so pagination is reproducible across re-renders.

use crate::types::EmotionRecord;

/// Fixed number of records per displayed page.
pub const PAGE_SIZE: usize = 20;

/// Key the view sorts by. Numeric keys compare numerically, string keys
/// lexically; `None` leaves the listing in its aggregate order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    None,
    Valence,
    Arousal,
    Emotion,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Client-held display criteria; discarded with the presentation session.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Emotion label to keep, or `None` for the "all" sentinel.
    pub category: Option<String>,
    pub sort_key: SortKey,
    pub direction: SortDirection,
    /// 1-based page index; clamped into range by [`render_page`].
    pub page: usize,
}

/// One displayed page plus the figures the footer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub records: Vec<EmotionRecord>,
    /// Effective (clamped) 1-based page index.
    pub page: usize,
    pub total_pages: usize,
    /// Record count after filtering, before slicing.
    pub total_records: usize,
}

/// Keep records whose emotion label equals `category`; `None` keeps all.
pub fn filter_by_category(records: &[EmotionRecord], category: Option<&str>) -> Vec<EmotionRecord> {
    match category {
        None => records.to_vec(),
        Some(label) => records
            .iter()
            .filter(|r| r.emotion_name == label)
            .cloned()
            .collect(),
    }
}

/// Stable in-place sort by the selected key and direction.
pub fn sort_records(records: &mut [EmotionRecord], key: SortKey, direction: SortDirection) {
    use std::cmp::Ordering;

    let compare = |a: &EmotionRecord, b: &EmotionRecord| -> Ordering {
        match key {
            SortKey::None => Ordering::Equal,
            SortKey::Valence => a.valence.total_cmp(&b.valence),
            SortKey::Arousal => a.arousal.total_cmp(&b.arousal),
            SortKey::Emotion => a.emotion_name.cmp(&b.emotion_name),
            SortKey::Image => a.image.cmp(&b.image),
        }
    };

    // sort_by is stable: ties (and SortKey::None entirely) keep input order.
    match direction {
        SortDirection::Ascending => records.sort_by(compare),
        SortDirection::Descending => records.sort_by(|a, b| compare(b, a)),
    }
}

/// Number of pages needed for `total` records; an empty listing still has
/// one (empty) page so a clamped index is always valid.
pub fn total_pages(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE).max(1)
}

/// The slice `[(page-1)*PAGE_SIZE, page*PAGE_SIZE)` of the listing.
///
/// `page` is 1-based and not clamped here: an out-of-range index yields an
/// empty slice, never an error.
pub fn paginate(records: &[EmotionRecord], page: usize) -> &[EmotionRecord] {
    if page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(PAGE_SIZE);
    if start >= records.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(records.len());
    &records[start..end]
}

/// Apply the full view pipeline and return one page.
///
/// The page index is clamped into `[1, total_pages]` before slicing, so a
/// stale index from a shrunken listing lands on the last page.
pub fn render_page(records: &[EmotionRecord], view: &ViewState) -> Page {
    let mut filtered = filter_by_category(records, view.category.as_deref());
    sort_records(&mut filtered, view.sort_key, view.direction);

    let total_records = filtered.len();
    let total_pages = total_pages(total_records);
    let page = view.page.clamp(1, total_pages);

    Page {
        records: paginate(&filtered, page).to_vec(),
        page,
        total_pages,
        total_records,
    }
}
