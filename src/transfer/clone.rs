//! Copying selected devices into the output document

use crate::snapshot::Peripheral;

use super::mapping::UidMapping;

/// Deep-copy the selected devices and apply the UID mapping
///
/// Output order is selection order. Every field other than the UID is carried
/// over verbatim.
pub fn clone_selected(selected: &[&Peripheral], mapping: &UidMapping) -> Vec<Peripheral> {
    selected
        .iter()
        .map(|device| {
            let mut copy = (*device).clone();
            if let Some(destination) = mapping.get(&device.uid()) {
                copy.set_uid(destination.value.clone());
            }
            copy
        })
        .collect()
}
