use std::cmp::Ordering;

/// Case-insensitive tag ordering. Tags equal under lowercasing fall back to
/// raw string order so the result is total and deterministic.
#[must_use]
pub fn compare_tags(left: &str, right: &str) -> Ordering {
    fold(left)
        .cmp(fold(right))
        .then_with(|| left.cmp(right))
}

#[must_use]
pub fn same_tag_ignoring_case(left: &str, right: &str) -> bool {
    fold(left).eq(fold(right))
}

pub(crate) fn sort_tags(tags: &mut [String]) {
    tags.sort_unstable_by(|a, b| compare_tags(a, b));
}

/// Position at which `tag` sits (`Ok`) or would be inserted (`Err`).
pub(crate) fn locate(tags: &[String], tag: &str) -> Result<usize, usize> {
    tags.binary_search_by(|probe| compare_tags(probe, tag))
}

pub(crate) fn is_sorted(tags: &[String]) -> bool {
    tags.is_sorted_by(|a, b| compare_tags(a, b) != Ordering::Greater)
}

fn fold(value: &str) -> impl Iterator<Item = char> + '_ {
    value.chars().flat_map(char::to_lowercase)
}
