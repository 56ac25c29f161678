//! Subset tests over ascending, duplicate-free item slices.

use super::sequence::Item;

/// Whether every item of `needle` occurs in `haystack[..=last_index]`.
///
/// Both slices must be strictly ascending. An empty `needle` never matches:
/// the root prefix has no last itemset to extend.
#[inline]
pub fn is_subset_upto(needle: &[Item], haystack: &[Item], last_index: usize) -> bool {
    if needle.is_empty() || last_index >= haystack.len() || last_index + 1 < needle.len() {
        return false;
    }
    let mut matched = 0;
    for &item in &haystack[..=last_index] {
        if item != needle[matched] {
            continue;
        }
        matched += 1;
        if matched == needle.len() {
            return true;
        }
    }
    false
}

/// Whether every item of `needle` occurs in `haystack`.
#[inline]
pub fn is_subset(needle: &[Item], haystack: &[Item]) -> bool {
    !haystack.is_empty() && is_subset_upto(needle, haystack, haystack.len() - 1)
}

/// Checks that an itemset is strictly ascending.
pub(crate) fn is_strictly_ascending(itemset: &[Item]) -> bool {
    itemset.windows(2).all(|pair| pair[0] < pair[1])
}
