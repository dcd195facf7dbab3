//! In-process record cache of the iterative resolver.
//!
//! Three independent tables map names to learned nameservers (NS), IPv4
//! addresses (A) and IPv6 addresses (AAAA). Keys are matched exactly as
//! given: no case folding, no trailing dot handling.
//!
//! Every table is first-write-wins: once a name has a value, later writes
//! for it are ignored until the entry is removed or the cache is cleared.
//! A nameserver that moves or a record that expires during a session stays
//! stale until someone runs `.remove` on it.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::net::{Ipv4Addr, Ipv6Addr};

/// One name → value table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table<V> {
    entries: BTreeMap<String, V>,
}

impl<V> Default for Table<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V> Table<V> {
    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Stores `value` unless `name` already has an entry.
    /// Returns whether the value was stored.
    pub fn put(&mut self, name: &str, value: V) -> bool {
        if self.entries.contains_key(name) {
            return false;
        }

        self.entries.insert(name.to_owned(), value);
        true
    }

    pub fn remove(&mut self, name: &str) -> Option<V> {
        self.entries.remove(name)
    }

    /// Empties the table, returning how many entries it held
    pub fn clear(&mut self) -> usize {
        let len = self.entries.len();
        self.entries.clear();
        len
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Value of the A table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ipv4Entry {
    Address(Ipv4Addr),
    /// The name was looked up and no server could answer for it
    Unresolvable,
}

impl Ipv4Entry {
    pub fn address(&self) -> Option<Ipv4Addr> {
        match self {
            Self::Address(addr) => Some(*addr),
            Self::Unresolvable => None,
        }
    }
}

impl Display for Ipv4Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Address(addr) => addr.fmt(f),
            Self::Unresolvable => f.write_str("UNRECOGNIZED"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveStatus {
    Removed,
    NotStored,
}

impl<V> From<Option<V>> for RemoveStatus {
    fn from(value: Option<V>) -> Self {
        match value {
            Some(_) => Self::Removed,
            None => Self::NotStored,
        }
    }
}

/// Outcome of removing a name from every table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removal {
    pub a: RemoveStatus,
    pub ns: RemoveStatus,
    pub aaaa: RemoveStatus,
}

/// Addresses known for a fully resolved name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addresses {
    pub ipv4: Ipv4Addr,
    pub ipv6: Option<Ipv6Addr>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordCache {
    /// Zone → nameserver, either a host name or an address
    pub ns: Table<String>,
    pub a: Table<Ipv4Entry>,
    pub aaaa: Table<Ipv6Addr>,
}

impl RecordCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a terminal failure for `name`, replacing whatever the A table
    /// held for it.
    pub fn mark_unresolvable(&mut self, name: &str) {
        self.a.remove(name);
        self.a.put(name, Ipv4Entry::Unresolvable);
    }

    pub fn is_unresolvable(&self, name: &str) -> bool {
        matches!(self.a.get(name), Some(Ipv4Entry::Unresolvable))
    }

    /// The cached IPv4 address of `name` along with its IPv6 address, if any.
    /// An unresolvable marker doesn't count as an address.
    pub fn addresses(&self, name: &str) -> Option<Addresses> {
        let ipv4 = self.a.get(name)?.address()?;
        let ipv6 = self.aaaa.get(name).copied();

        Some(Addresses { ipv4, ipv6 })
    }

    pub fn remove_name(&mut self, name: &str) -> Removal {
        Removal {
            a: self.a.remove(name).into(),
            ns: self.ns.remove(name).into(),
            aaaa: self.aaaa.remove(name).into(),
        }
    }

    /// Empties all three tables, returning how many entries were dropped
    pub fn clear(&mut self) -> usize {
        self.a.clear() + self.ns.clear() + self.aaaa.clear()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty() && self.ns.is_empty() && self.aaaa.is_empty()
    }
}
