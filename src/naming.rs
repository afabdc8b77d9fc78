//! Naming policy: how source path segments become published names.
//!
//! Source trees are organised for the photographer, not the visitor. Roll and
//! frame numbers (`01`, `17`), ordering prefixes (`03_Paris`) and hidden
//! markers (`_drafts`) all appear in segment names. This module classifies
//! segments and derives every human-facing string from them:
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `"01"` | [`is_boring`] | `true` (numbers are not meaningful names) |
//! | `"2020"` | [`is_boring`] | `false` (years always are) |
//! | `"_drafts"` | [`is_hidden`] | `true` |
//! | `"03_Paris"` | [`target_segment`] | `"Paris"` |
//! | `["2020", "Paris", "01"]` | [`NamingPolicy::disambiguated_name`] | `"Paris_2020_01"` |
//! | `"01 Paris"` | [`NamingPolicy::title`] | `"Paris"` |
//!
//! ## Disambiguation
//!
//! Many leaves are numbered frames published one level removed from their
//! roll. A bare `01.jpeg` would collide across rolls once downloaded, so boring
//! leaves are renamed after their provenance: category, year, every
//! intermediate directory, then the leaf itself.

/// Prefix marking a source segment as unlisted.
pub const HIDDEN_MARKER: char = '_';

/// `true` iff the segment is entirely numeric and is not a four-digit year.
///
/// The empty string counts as numeric.
pub fn is_boring(segment: &str) -> bool {
    let numeric = segment.chars().all(|c| c.is_ascii_digit());
    numeric && segment.len() != 4
}

/// `true` iff the untransformed source segment carries the hidden marker.
pub fn is_hidden(segment: &str) -> bool {
    segment.starts_with(HIDDEN_MARKER)
}

/// Strip one `NN` + separator ordering prefix, if present.
fn strip_ordering_prefix(segment: &str, separator: char) -> Option<&str> {
    let mut chars = segment.char_indices();
    match (chars.next(), chars.next(), chars.next()) {
        (Some((_, a)), Some((_, b)), Some((i, sep)))
            if a.is_ascii_digit() && b.is_ascii_digit() && sep == separator =>
        {
            Some(&segment[i + sep.len_utf8()..])
        }
        _ => None,
    }
}

/// Transform one source segment into its published form.
///
/// Leading hidden markers and `NN_` ordering prefixes are stripped until
/// neither remains, so applying the transform to its own output is a no-op.
pub fn target_segment(segment: &str) -> String {
    let mut current = segment;
    loop {
        if let Some(rest) = current.strip_prefix(HIDDEN_MARKER) {
            current = rest;
        } else if let Some(rest) = strip_ordering_prefix(current, '_') {
            current = rest;
        } else {
            return current.to_string();
        }
    }
}

fn is_word(part: &str) -> bool {
    part.chars().all(|c| c.is_alphanumeric())
}

fn is_year_20xx(part: &str) -> bool {
    part.len() == 4 && part.starts_with("20") && part.chars().all(|c| c.is_ascii_digit())
}

/// Recognise names produced by [`NamingPolicy::disambiguated_name`]:
/// `token_20YY_token_digits`, with any number of tokens around the year.
fn is_disambiguated(name: &str) -> bool {
    let parts: Vec<&str> = name.split('_').collect();
    if parts.len() < 4 || !parts.iter().all(|p| is_word(p)) {
        return false;
    }
    let Some(last) = parts.last() else {
        return false;
    };
    if !last.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    // year needs a non-empty token before it and two components after it
    (1..parts.len() - 2).any(|i| {
        is_year_20xx(parts[i]) && parts[..i].iter().any(|p| !p.is_empty())
    })
}

/// Naming rules bound to one gallery.
///
/// The gallery name is the only configurable input: it titles the top-level
/// page and the first breadcrumb.
#[derive(Debug, Clone, PartialEq)]
pub struct NamingPolicy {
    gallery_name: String,
}

impl NamingPolicy {
    pub fn new(gallery_name: impl Into<String>) -> Self {
        Self {
            gallery_name: gallery_name.into(),
        }
    }

    pub fn gallery_name(&self) -> &str {
        &self.gallery_name
    }

    /// Published filename stem for a photo, given its bundle directory's
    /// segments relative to the target root.
    ///
    /// Non-boring leaves are returned unchanged. Boring leaves are joined
    /// with their provenance: `[category, year, ...intermediates, leaf]`,
    /// where the category (second segment) is only present for paths of
    /// more than two segments.
    pub fn disambiguated_name<S: AsRef<str>>(&self, segments: &[S]) -> String {
        let Some(leaf) = segments.last().map(AsRef::as_ref) else {
            return String::new();
        };
        if !is_boring(leaf) {
            return leaf.to_string();
        }

        let year = segments[0].as_ref();
        let mut parts: Vec<&str> = Vec::with_capacity(segments.len() + 1);
        if segments.len() > 2 {
            parts.push(segments[1].as_ref());
        }
        parts.push(year);
        if segments.len() > 3 {
            parts.extend(segments[2..segments.len() - 1].iter().map(AsRef::as_ref));
        }
        parts.push(leaf);
        parts.join("_")
    }

    /// Human title for a published name.
    pub fn title(&self, name: &str) -> String {
        if name.is_empty() {
            return self.gallery_name.clone();
        }
        if is_disambiguated(name) {
            return name.rsplit('_').next().unwrap_or(name).to_string();
        }
        let spaced = name.replace('_', " ").replace('\'', "\u{2019}");
        match strip_ordering_prefix(&spaced, ' ') {
            Some(rest) => rest.to_string(),
            None => spaced,
        }
    }

    /// Caption shown under thumbnails: empty for boring names.
    pub fn caption(&self, name: &str) -> String {
        if is_boring(name) {
            String::new()
        } else {
            self.title(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> NamingPolicy {
        NamingPolicy::new("Hall of Light")
    }

    // =========================================================================
    // Classification
    // =========================================================================

    #[test]
    fn numbers_are_boring() {
        assert!(is_boring("01"));
        assert!(is_boring("7"));
        assert!(is_boring("12345"));
    }

    #[test]
    fn years_are_not_boring() {
        assert!(!is_boring("2020"));
        assert!(!is_boring("1999"));
        assert!(!is_boring("0000"));
    }

    #[test]
    fn words_are_not_boring() {
        assert!(!is_boring("Paris"));
        assert!(!is_boring("01_Paris"));
        assert!(!is_boring("a1"));
    }

    #[test]
    fn hidden_marker_is_a_leading_underscore() {
        assert!(is_hidden("_drafts"));
        assert!(!is_hidden("drafts"));
        assert!(!is_hidden("my_drafts"));
    }

    // =========================================================================
    // Segment transform
    // =========================================================================

    #[test]
    fn target_segment_strips_ordering_prefix() {
        assert_eq!(target_segment("01_Paris"), "Paris");
        assert_eq!(target_segment("99_Last_Trip"), "Last_Trip");
    }

    #[test]
    fn target_segment_strips_hidden_marker() {
        assert_eq!(target_segment("_drafts"), "drafts");
        assert_eq!(target_segment("_03_drafts"), "drafts");
    }

    #[test]
    fn target_segment_leaves_plain_names() {
        assert_eq!(target_segment("2020"), "2020");
        assert_eq!(target_segment("Paris"), "Paris");
        assert_eq!(target_segment("01"), "01");
        assert_eq!(target_segment("1_Paris"), "1_Paris");
    }

    #[test]
    fn target_segment_is_a_fixed_point() {
        for raw in ["01_02_x", "__a", "_01__b", "12_Rome", "x", "2021"] {
            let once = target_segment(raw);
            assert_eq!(target_segment(&once), once, "not idempotent for {raw}");
        }
    }

    // =========================================================================
    // Disambiguation
    // =========================================================================

    #[test]
    fn disambiguates_boring_leaf_with_category_and_year() {
        assert_eq!(
            policy().disambiguated_name(&["2020", "Paris", "01"]),
            "Paris_2020_01"
        );
    }

    #[test]
    fn disambiguation_keeps_intermediate_segments() {
        assert_eq!(
            policy().disambiguated_name(&["2019", "Film", "Roll3", "Night", "12"]),
            "Film_2019_Roll3_Night_12"
        );
    }

    #[test]
    fn disambiguation_without_category_for_short_paths() {
        assert_eq!(policy().disambiguated_name(&["2020", "05"]), "2020_05");
    }

    #[test]
    fn non_boring_leaf_is_unchanged() {
        assert_eq!(policy().disambiguated_name(&["2020", "Paris", "a"]), "a");
        assert_eq!(policy().disambiguated_name(&["2020", "Paris", "2021"]), "2021");
    }

    // =========================================================================
    // Titles and captions
    // =========================================================================

    #[test]
    fn empty_name_titles_as_gallery() {
        assert_eq!(policy().title(""), "Hall of Light");
    }

    #[test]
    fn title_strips_ordering_prefix() {
        assert_eq!(policy().title("01 Paris"), "Paris");
        assert_eq!(policy().title("01_Paris"), "Paris");
    }

    #[test]
    fn title_replaces_underscores_and_quotes() {
        assert_eq!(policy().title("Notre_Dame"), "Notre Dame");
        assert_eq!(policy().title("Rick's_Cafe"), "Rick\u{2019}s Cafe");
    }

    #[test]
    fn title_of_disambiguated_name_is_its_frame() {
        assert_eq!(policy().title("Film_2019_Roll3_12"), "12");
        assert_eq!(policy().title("Paris_2020_Night_07"), "07");
    }

    #[test]
    fn short_disambiguated_name_falls_back_to_spacing() {
        // Three components do not form the token_year_token_digits pattern.
        assert_eq!(policy().title("Paris_2020_01"), "Paris 2020 01");
    }

    #[test]
    fn caption_is_empty_for_boring_names() {
        assert_eq!(policy().caption("01"), "");
        assert_eq!(policy().caption("a"), "a");
        assert_eq!(policy().caption("2020"), "2020");
        assert_eq!(policy().caption("03_Louvre"), "Louvre");
    }
}
