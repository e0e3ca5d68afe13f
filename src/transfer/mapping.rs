//! Positional UID mapping between source and target device lists

use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

use crate::snapshot::{FieldKey, Peripheral};

/// UID a transferred device adopts in the output document
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub key: FieldKey,
    /// Raw value written back, `None` if the UID key is absent
    pub value: Option<Value>,
}

impl Destination {
    fn of(device: &Peripheral) -> Self {
        Self {
            key: device.uid(),
            value: device.uid_value().cloned(),
        }
    }
}

/// Source UID → destination UID, in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UidMapping {
    entries: IndexMap<FieldKey, Destination>,
    mapped: usize,
    requested: usize,
}

impl UidMapping {
    pub fn get(&self, source_uid: &FieldKey) -> Option<&Destination> {
        self.entries.get(source_uid)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &Destination)> {
        self.entries.iter()
    }

    /// Devices that found a target slot at their position
    pub fn mapped_count(&self) -> usize {
        self.mapped
    }

    /// Selected devices the mapping was asked to cover
    pub fn requested_count(&self) -> usize {
        self.requested
    }

    /// Some devices fell back to keeping their own UID
    pub fn is_partial(&self) -> bool {
        self.mapped < self.requested
    }

    /// Entries whose destination differs from the source UID
    pub fn remapped_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(source, destination)| **source != destination.key)
            .count()
    }
}

/// Map each selected source device to the target device at the same index
///
/// Devices past the end of the target list keep their own UID. Matching is by
/// position only, never by UID value, so duplicate target UIDs are not special.
pub fn build_uid_mapping(
    source: &[Peripheral],
    selected: &HashSet<FieldKey>,
    target: &[Peripheral],
) -> UidMapping {
    let mut mapping = UidMapping::default();

    for (index, device) in source.iter().enumerate() {
        let uid = device.uid();
        if !selected.contains(&uid) {
            continue;
        }
        mapping.requested += 1;

        let destination = match target.get(index) {
            Some(slot) => {
                mapping.mapped += 1;
                Destination::of(slot)
            }
            None => Destination::of(device),
        };
        debug!(index = index, source = %uid, destination = %destination.key, "Mapped device UID");
        mapping.entries.insert(uid, destination);
    }

    mapping
}
