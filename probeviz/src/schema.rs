use std::fmt;
use std::sync::OnceLock;

use probemodel::ResizePolicy;
use rustc_hash::FxHashMap;

/// Canonical dataset column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Q,
    Resize(ResizePolicy),
    LoadFactor,
    SuccessTime,
    FailTime,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Q => "q",
            Field::Resize(ResizePolicy::NoRehash) => "NoRehash",
            Field::Resize(ResizePolicy::Doubling) => "Doubling",
            Field::Resize(ResizePolicy::AddFixedIncrement) => "AddFixedIncrement",
            Field::LoadFactor => "LoadFactor",
            Field::SuccessTime => "SuccessTime",
            Field::FailTime => "FailTime",
        };
        f.write_str(name)
    }
}

/// Every column name the benchmark variants are known to emit
const ALIASES: &[(&str, Field)] = &[
    ("q", Field::Q),
    ("NoRehashTime", Field::Resize(ResizePolicy::NoRehash)),
    ("NoRehash", Field::Resize(ResizePolicy::NoRehash)),
    ("no_rehash", Field::Resize(ResizePolicy::NoRehash)),
    ("RehashDoubleTime", Field::Resize(ResizePolicy::Doubling)),
    ("Doubling", Field::Resize(ResizePolicy::Doubling)),
    ("doubling", Field::Resize(ResizePolicy::Doubling)),
    ("RehashAdd10000Time", Field::Resize(ResizePolicy::AddFixedIncrement)),
    ("Add10000", Field::Resize(ResizePolicy::AddFixedIncrement)),
    ("AddFixedIncrement", Field::Resize(ResizePolicy::AddFixedIncrement)),
    ("add_fixed_increment", Field::Resize(ResizePolicy::AddFixedIncrement)),
    ("addition", Field::Resize(ResizePolicy::AddFixedIncrement)),
    ("LoadFactor", Field::LoadFactor),
    ("load_factor", Field::LoadFactor),
    ("SuccessfulSearchTime", Field::SuccessTime),
    ("SuccessfulSearch", Field::SuccessTime),
    ("success_time", Field::SuccessTime),
    ("UnsuccessfulSearchTime", Field::FailTime),
    ("UnsuccessfulSearch", Field::FailTime),
    ("fail_time", Field::FailTime),
];

struct AliasTable {
    exact: FxHashMap<&'static str, Field>,
    folded: FxHashMap<String, Field>,
}

fn alias_table() -> &'static AliasTable {
    static TABLE: OnceLock<AliasTable> = OnceLock::new();
    TABLE.get_or_init(|| AliasTable {
        exact: ALIASES.iter().copied().collect(),
        folded: ALIASES
            .iter()
            .map(|&(name, field)| (name.to_ascii_lowercase(), field))
            .collect(),
    })
}

/// Maps one header name onto its canonical field.
/// Exact names win over case-insensitive matches.
pub fn canonical_field(header: &str) -> Option<Field> {
    let header = header.trim();
    let table = alias_table();
    table
        .exact
        .get(header)
        .or_else(|| table.folded.get(&header.to_ascii_lowercase()))
        .copied()
}

/// Column positions of the canonical fields present in a header row
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    indices: FxHashMap<Field, usize>,
    headers: Vec<String>,
}

impl ColumnMap {
    /// The first column mapping to a field wins; unknown columns are ignored.
    pub fn resolve<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut map = ColumnMap::default();
        for (idx, header) in headers.into_iter().enumerate() {
            if let Some(field) = canonical_field(header) {
                map.indices.entry(field).or_insert(idx);
            }
            map.headers.push(header.to_string());
        }
        map
    }

    pub fn index(&self, field: Field) -> Option<usize> {
        self.indices.get(&field).copied()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.indices.contains_key(&field)
    }

    /// Header names as they appeared in the file
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_variants() {
        let resize = ColumnMap::resolve(["q", "NoRehash", "Doubling", "Add10000"]);
        assert_eq!(resize.index(Field::Q), Some(0));
        assert_eq!(resize.index(Field::Resize(ResizePolicy::NoRehash)), Some(1));
        assert_eq!(resize.index(Field::Resize(ResizePolicy::Doubling)), Some(2));
        assert_eq!(
            resize.index(Field::Resize(ResizePolicy::AddFixedIncrement)),
            Some(3)
        );

        let legacy = ColumnMap::resolve([
            "q",
            "NoRehashTime",
            "RehashDoubleTime",
            "RehashAdd10000Time",
        ]);
        assert!(legacy.contains(Field::Resize(ResizePolicy::AddFixedIncrement)));

        let snake = ColumnMap::resolve(["load_factor", "success_time", "fail_time"]);
        assert_eq!(snake.index(Field::LoadFactor), Some(0));
        assert_eq!(snake.index(Field::SuccessTime), Some(1));
        assert_eq!(snake.index(Field::FailTime), Some(2));
    }

    #[test]
    fn test_case_and_whitespace() {
        assert_eq!(canonical_field(" LoadFactor "), Some(Field::LoadFactor));
        assert_eq!(canonical_field("LOAD_FACTOR"), Some(Field::LoadFactor));
        assert_eq!(canonical_field("Q"), Some(Field::Q));
        assert_eq!(canonical_field("elapsed"), None);
    }

    #[test]
    fn test_unknown_columns_are_kept_in_headers() {
        let map = ColumnMap::resolve(["run", "LoadFactor", "notes"]);
        assert_eq!(map.index(Field::LoadFactor), Some(1));
        assert!(!map.contains(Field::SuccessTime));
        assert_eq!(map.headers(), &["run", "LoadFactor", "notes"]);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let map = ColumnMap::resolve(["SuccessfulSearch", "success_time"]);
        assert_eq!(map.index(Field::SuccessTime), Some(0));
    }

    #[test]
    fn every_alias_resolves_in_any_position() {
        let aliases = proptest::sample::subsequence(ALIASES.to_vec(), 1..6).prop_shuffle();

        proptest!(|(columns in aliases)| {
            let names: Vec<&str> = columns.iter().map(|(n, _)| *n).collect();
            let map = ColumnMap::resolve(names.iter().copied());
            for (idx, (_, field)) in columns.iter().enumerate() {
                let first = columns.iter().position(|(_, f)| f == field).unwrap();
                prop_assert_eq!(map.index(*field), Some(first));
                prop_assert!(first <= idx);
            }
        });
    }
}
