// Online Accounts GTK - Provider List
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Ordered list of providers offered for "add account".

use std::cmp::Ordering;

use crate::models::Provider;

#[derive(Debug, Clone)]
struct Entry {
    /// Rows are prepended as they arrive, so a larger value sits nearer
    /// the head of the unsorted list.
    inserted_at: usize,
    provider: Provider,
}

/// Display order: branded first, then reverse insertion position.
fn compare(a: &Entry, b: &Entry) -> Ordering {
    b.provider
        .is_branded()
        .cmp(&a.provider.is_branded())
        .then_with(|| a.inserted_at.cmp(&b.inserted_at))
}

/// Providers in display order.
#[derive(Debug, Default)]
pub struct ProviderList {
    entries: Vec<Entry>,
    inserted: usize,
}

impl ProviderList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one enumerated provider. Returns its row position.
    pub fn append(&mut self, provider: Provider) -> usize {
        let entry = Entry {
            inserted_at: self.inserted,
            provider,
        };
        self.inserted += 1;

        let pos = self
            .entries
            .partition_point(|existing| compare(existing, &entry) != Ordering::Greater);
        self.entries.insert(pos, entry);
        pos
    }

    /// Add a whole enumeration result, returning the row position of each
    /// provider in arrival order.
    pub fn extend(&mut self, providers: impl IntoIterator<Item = Provider>) -> Vec<usize> {
        providers.into_iter().map(|p| self.append(p)).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Provider> {
        self.entries.get(position).map(|entry| &entry.provider)
    }

    pub fn find(&self, provider_type: &str) -> Option<&Provider> {
        self.iter().find(|p| p.provider_type == provider_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Provider> {
        self.entries.iter().map(|entry| &entry.provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::provider::builtin_catalog;

    fn names(list: &ProviderList) -> Vec<&str> {
        list.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_branded_first_example() {
        let mut list = ProviderList::new();
        list.extend([
            Provider::new("p1", "P1").branded(),
            Provider::new("p2", "P2"),
            Provider::new("p3", "P3").branded(),
        ]);
        assert_eq!(names(&list), vec!["P1", "P3", "P2"]);
    }

    #[test]
    fn test_append_reports_row_position() {
        let mut list = ProviderList::new();
        assert_eq!(list.append(Provider::new("u1", "U1")), 0);
        assert_eq!(list.append(Provider::new("b1", "B1").branded()), 0);
        assert_eq!(list.append(Provider::new("u2", "U2")), 2);
        assert_eq!(list.append(Provider::new("b2", "B2").branded()), 1);
        assert_eq!(names(&list), vec!["B1", "B2", "U1", "U2"]);
    }

    #[test]
    fn test_tiers_never_interleave() {
        let mut list = ProviderList::new();
        list.extend(builtin_catalog());

        let first_unbranded = list
            .iter()
            .position(|p| !p.is_branded())
            .expect("catalog has unbranded providers");
        assert!(list.iter().take(first_unbranded).all(Provider::is_branded));
        assert!(list.iter().skip(first_unbranded).all(|p| !p.is_branded()));
        assert_eq!(list.len(), builtin_catalog().len());
    }

    #[test]
    fn test_lookup() {
        let mut list = ProviderList::new();
        list.extend(builtin_catalog());
        assert_eq!(list.find("webdav").map(|p| p.name.as_str()), Some("WebDAV"));
        assert!(list.find("myspace").is_none());
        assert_eq!(list.get(0).map(|p| p.provider_type.as_str()), Some("google"));
    }
}
