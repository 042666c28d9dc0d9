// ── Subtable reconciliation ──
//
// FortiOS returns subtable entries in its own order. To keep refreshes
// diff-free, entries are first re-aligned with the prior state
// (`merge_block`) and then optionally sorted (`dynamic_sort_subtable`).

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

use crate::convert::scalar_to_string;

/// How subtable entries are ordered in state.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Keep the (merged) API order.
    #[default]
    False,
    /// Lexicographic by key.
    True,
    /// Digit runs compared numerically (`port2` < `port10`).
    Natural,
}

pub(crate) fn key_of(item: &Map<String, Value>, key: &str) -> String {
    item.get(key).and_then(scalar_to_string).unwrap_or_default()
}

/// Sort subtable entries by `key` according to `mode`.
pub fn dynamic_sort_subtable(items: &mut [Map<String, Value>], key: &str, mode: SortMode) {
    match mode {
        SortMode::False => {}
        SortMode::True => items.sort_by_key(|item| key_of(item, key)),
        SortMode::Natural => items.sort_by(|a, b| natural_cmp(&key_of(a, key), &key_of(b, key))),
    }
}

/// Re-order API entries to follow the prior state.
///
/// Entries whose key appears in `prior` come first, in prior order; entries
/// new to the API follow in API order. Prior entries the API no longer has
/// are dropped.
pub fn merge_block(
    api_items: Vec<Map<String, Value>>,
    prior: &[Value],
    key: &str,
) -> Vec<Map<String, Value>> {
    let rank: HashMap<String, usize> = prior
        .iter()
        .filter_map(Value::as_object)
        .enumerate()
        .map(|(pos, item)| (key_of(item, key), pos))
        .collect();

    let (mut known, fresh): (Vec<_>, Vec<_>) = api_items
        .into_iter()
        .partition(|item| rank.contains_key(&key_of(item, key)));

    known.sort_by_key(|item| rank.get(&key_of(item, key)).copied().unwrap_or(usize::MAX));
    known.extend(fresh);
    known
}

/// Find the prior entry whose `key` renders as `wanted`.
pub fn prior_entry<'a>(
    wanted: &str,
    prior: &'a [Value],
    key: &str,
) -> Option<&'a Map<String, Value>> {
    prior
        .iter()
        .filter_map(Value::as_object)
        .find(|p| key_of(p, key) == wanted)
}

/// Compare strings treating runs of ASCII digits as numbers.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.as_bytes();
    let mut b = b.as_bytes();
    loop {
        match (a.first(), b.first()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let (da, ra) = split_digits(a);
                let (db, rb) = split_digits(b);
                let ta = trim_zeros(da);
                let tb = trim_zeros(db);
                let ord = ta.len().cmp(&tb.len()).then_with(|| ta.cmp(tb));
                if ord != Ordering::Equal {
                    return ord;
                }
                a = ra;
                b = rb;
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(y);
                }
                a = &a[1..];
                b = &b[1..];
            }
        }
    }
}

fn split_digits(s: &[u8]) -> (&[u8], &[u8]) {
    let end = s.iter().position(|c| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

fn trim_zeros(s: &[u8]) -> &[u8] {
    let start = s.iter().position(|c| *c != b'0').unwrap_or(s.len());
    &s[start..]
}
