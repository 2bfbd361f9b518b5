//! Collapse duplicate-keyed rows into one row per key.

use std::collections::BTreeMap;

use crate::domain::KeyedRow;

struct Group {
    source_row: usize,
    members: Vec<Vec<f64>>,
}

/// Group rows by key and sum quantity columns elementwise.
///
/// Output is sorted by key. Rows shorter than the widest member of their group
/// are treated as zero-padded. Each column is summed over its values in sorted
/// order, so the result does not depend on input row order.
pub fn aggregate(rows: impl IntoIterator<Item = KeyedRow>) -> Vec<KeyedRow> {
    let mut groups: BTreeMap<String, Group> = BTreeMap::new();

    for row in rows {
        let group = groups.entry(row.key).or_insert_with(|| Group {
            source_row: row.source_row,
            members: Vec::new(),
        });
        group.source_row = group.source_row.min(row.source_row);
        group.members.push(row.quantities);
    }

    groups
        .into_iter()
        .map(|(key, group)| KeyedRow {
            key,
            quantities: sum_columns(&group.members),
            source_row: group.source_row,
        })
        .collect()
}

fn sum_columns(members: &[Vec<f64>]) -> Vec<f64> {
    if let [only] = members {
        return only.clone();
    }

    let width = members.iter().map(Vec::len).max().unwrap_or(0);
    (0..width)
        .map(|col| {
            let mut values: Vec<f64> = members
                .iter()
                .map(|m| m.get(col).copied().unwrap_or(0.0))
                .collect();
            values.sort_by(f64::total_cmp);
            values.iter().fold(0.0, |acc, v| acc + v)
        })
        .collect()
}
