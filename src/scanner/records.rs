//! Cached client records

use std::collections::HashMap;

use serde::Serialize;

use crate::instant_on::ClientSummaryEntry;

/// A known client device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientRecord {
    pub mac: String,
    pub name: String,
}

/// Client records keyed by identifier, iterated in fetch order.
///
/// A duplicate identifier keeps its first position and takes the last name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientTable {
    order: Vec<String>,
    by_mac: HashMap<String, ClientRecord>,
}

impl ClientTable {
    pub fn from_entries(entries: Vec<ClientSummaryEntry>) -> Self {
        let mut table = Self::default();

        for entry in entries {
            let record = ClientRecord {
                mac: entry.id.clone(),
                name: entry.name,
            };
            if table.by_mac.insert(entry.id.clone(), record).is_none() {
                table.order.push(entry.id);
            }
        }

        table
    }

    pub fn get(&self, mac: &str) -> Option<&ClientRecord> {
        self.by_mac.get(mac)
    }

    pub fn ids(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClientRecord> {
        self.order.iter().filter_map(|mac| self.by_mac.get(mac))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str) -> ClientSummaryEntry {
        ClientSummaryEntry {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_preserves_fetch_order() {
        let table = ClientTable::from_entries(vec![
            entry("cc:dd", "Laptop"),
            entry("aa:bb", "Phone"),
            entry("ee:ff", "TV"),
        ]);

        assert_eq!(table.ids(), vec!["cc:dd", "aa:bb", "ee:ff"]);
        let names: Vec<&str> = table.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Laptop", "Phone", "TV"]);
    }

    #[test]
    fn test_duplicate_id_keeps_position_takes_last_name() {
        let table = ClientTable::from_entries(vec![
            entry("aa:bb", "Old name"),
            entry("cc:dd", "Laptop"),
            entry("aa:bb", "Phone"),
        ]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.ids(), vec!["aa:bb", "cc:dd"]);
        assert_eq!(table.get("aa:bb").unwrap().name, "Phone");
    }

    #[test]
    fn test_record_mac_mirrors_id() {
        let table = ClientTable::from_entries(vec![entry("aa:bb", "Phone")]);
        assert_eq!(
            table.get("aa:bb"),
            Some(&ClientRecord {
                mac: "aa:bb".to_string(),
                name: "Phone".to_string(),
            })
        );
        assert!(table.get("unknown-id").is_none());
    }
}
