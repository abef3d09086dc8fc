// abif: Decoding ABIF sequencer trace files and re-calling bases.
//
// Copyright 2025 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//

//! Collection of decoded records keyed by tag name and number.
use crate::decoder::Directory;

use std::collections::BTreeMap;

use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKeyError {
    pub name: String,
    pub number: i32,
}

impl std::fmt::Display for DuplicateKeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "tag {}#{} is already in the directory", self.name, self.number)
    }
}

impl std::error::Error for DuplicateKeyError {}

/// All decoded records of one file.
///
/// Records are grouped by tag name, and names are kept in sorted order.
/// Records sharing a name keep the order they were added in. Adding a
/// record whose (name, number) is already present fails; replacing a record
/// means removing it first.
///
/// ## Usage
///
/// ```rust
/// use abif::decoder::Directory;
/// use abif::headers::entry::{DirectoryEntry, ElementTypeCode};
/// use abif::parser::ElementValue;
/// use abif::store::DirectoryStore;
///
/// let entry = DirectoryEntry {
///     name: "LANE".to_string(), number: 1, element_type: ElementTypeCode::Short,
///     element_size: 2, element_count: 1, data_size: 2, data_offset: 0x00070000, data_handle: 0,
/// };
/// let mut store = DirectoryStore::new();
/// store.add(Directory::new(entry, vec![ElementValue::Short(7)])).unwrap();
///
/// assert_eq!(store.get("LANE", 1).unwrap().elements(), &[ElementValue::Short(7)]);
/// assert!(store.get("LANE", 2).is_none());
/// ```
///
#[derive(Debug, Clone, Default)]
pub struct DirectoryStore {
    records: BTreeMap<String, IndexMap<i32, Directory>>,
    n_records: usize,
}

impl DirectoryStore {
    pub fn new() -> Self {
        DirectoryStore::default()
    }

    /// Insert `record`, failing if its key is already taken.
    pub fn add(
        &mut self,
        record: Directory,
    ) -> Result<(), DuplicateKeyError> {
        let numbers = self.records.entry(record.name().to_string()).or_default();
        if numbers.contains_key(&record.number()) {
            return Err(DuplicateKeyError { name: record.name().to_string(), number: record.number() });
        }
        numbers.insert(record.number(), record);
        self.n_records += 1;
        Ok(())
    }

    pub fn get(
        &self,
        name: &str,
        number: i32,
    ) -> Option<&Directory> {
        self.records.get(name)?.get(&number)
    }

    pub fn contains(
        &self,
        name: &str,
        number: i32,
    ) -> bool {
        self.get(name, number).is_some()
    }

    /// Every record named `name`, in the order they were added.
    pub fn get_all(
        &self,
        name: &str,
    ) -> Vec<&Directory> {
        self.records.get(name).map(|numbers| numbers.values().collect()).unwrap_or_default()
    }

    /// Drop the record at (name, number). Returns false if there was none.
    pub fn remove(
        &mut self,
        name: &str,
        number: i32,
    ) -> bool {
        let Some(numbers) = self.records.get_mut(name) else {
            return false;
        };
        if numbers.shift_remove(&number).is_none() {
            return false;
        }
        if numbers.is_empty() {
            self.records.remove(name);
        }
        self.n_records -= 1;
        true
    }

    /// Iterate over all records sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &Directory> {
        self.records.values().flat_map(|numbers| numbers.values())
    }

    /// All records sorted by name, in insertion order within a name.
    pub fn all(&self) -> Vec<&Directory> {
        self.iter().collect()
    }

    /// Distinct tag names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(|name| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.n_records
    }

    pub fn is_empty(&self) -> bool {
        self.n_records == 0
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.n_records = 0;
    }
}

impl<'a> IntoIterator for &'a DirectoryStore {
    type Item = &'a Directory;
    type IntoIter = Box<dyn Iterator<Item = &'a Directory> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

// Tests
#[cfg(test)]
mod tests {

    fn record(name: &str, number: i32, value: i32) -> crate::decoder::Directory {
        use crate::decoder::Directory;
        use crate::headers::entry::{DirectoryEntry, ElementTypeCode};
        use crate::parser::ElementValue;

        let entry = DirectoryEntry {
            name: name.to_string(), number, element_type: ElementTypeCode::Long,
            element_size: 4, element_count: 1, data_size: 4, data_offset: value, data_handle: 0,
        };
        Directory::new(entry, vec![ElementValue::Long(value)])
    }

    #[test]
    fn add_and_get() {
        use super::DirectoryStore;
        use crate::parser::ElementValue;

        let mut store = DirectoryStore::new();
        store.add(record("DATA", 1, 10)).unwrap();
        store.add(record("DATA", 2, 20)).unwrap();
        store.add(record("CTNM", 1, 30)).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.get("DATA", 2).unwrap().elements(), &[ElementValue::Long(20)]);
        assert!(store.contains("CTNM", 1));
        assert!(!store.contains("CTNM", 2));
        assert!(store.get("PBAS", 1).is_none());
    }

    #[test]
    fn add_duplicate_is_error() {
        use super::{DirectoryStore, DuplicateKeyError};
        use crate::parser::ElementValue;

        let mut store = DirectoryStore::new();
        store.add(record("DATA", 1, 10)).unwrap();
        let got = store.add(record("DATA", 1, 99)).unwrap_err();

        assert_eq!(got, DuplicateKeyError { name: "DATA".to_string(), number: 1 });
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("DATA", 1).unwrap().elements(), &[ElementValue::Long(10)]);
    }

    #[test]
    fn all_is_sorted_by_name_then_insertion() {
        use super::DirectoryStore;

        let mut store = DirectoryStore::new();
        store.add(record("PBAS", 2, 0)).unwrap();
        store.add(record("DATA", 9, 0)).unwrap();
        store.add(record("CTNM", 1, 0)).unwrap();
        store.add(record("DATA", 1, 0)).unwrap();
        store.add(record("PBAS", 1, 0)).unwrap();

        let got: Vec<(String, i32)> = store.all().iter().map(|x| (x.name().to_string(), x.number())).collect();
        let expected: Vec<(String, i32)> = vec![
            ("CTNM".to_string(), 1),
            ("DATA".to_string(), 9),
            ("DATA".to_string(), 1),
            ("PBAS".to_string(), 2),
            ("PBAS".to_string(), 1),
        ];

        assert_eq!(got, expected);
        assert_eq!(store.names().collect::<Vec<&str>>(), vec!["CTNM", "DATA", "PBAS"]);
    }

    #[test]
    fn remove_then_add() {
        use super::DirectoryStore;
        use crate::parser::ElementValue;

        let mut store = DirectoryStore::new();
        store.add(record("DATA", 1, 10)).unwrap();
        store.add(record("DATA", 2, 20)).unwrap();

        assert!(store.remove("DATA", 1));
        assert!(!store.remove("DATA", 1));
        assert!(!store.remove("NONE", 1));
        assert_eq!(store.len(), 1);

        store.add(record("DATA", 1, 11)).unwrap();
        assert_eq!(store.get("DATA", 1).unwrap().elements(), &[ElementValue::Long(11)]);
        let numbers: Vec<i32> = store.get_all("DATA").iter().map(|x| x.number()).collect();
        assert_eq!(numbers, vec![2, 1]);
    }

    #[test]
    fn remove_last_drops_name() {
        use super::DirectoryStore;

        let mut store = DirectoryStore::new();
        store.add(record("DATA", 1, 10)).unwrap();
        store.remove("DATA", 1);

        assert!(store.is_empty());
        assert_eq!(store.names().count(), 0);
        assert!(store.get_all("DATA").is_empty());
    }

    #[test]
    fn clear() {
        use super::DirectoryStore;

        let mut store = DirectoryStore::new();
        store.add(record("DATA", 1, 10)).unwrap();
        store.add(record("CTNM", 1, 10)).unwrap();
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.iter().count(), 0);
    }
}
