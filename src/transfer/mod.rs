//! Device settings transfer between two base station setups
//!
//! The source setup holds the configured devices, the target setup holds the
//! same devices re-paired to another base station (with new UIDs). A transfer
//! produces a copy of the target where the selected source devices replace the
//! target's device list, take over the target UIDs by position, and bring
//! their audio routing along.
//!
//! The pipeline is pure: both inputs are borrowed, the output is a fresh deep
//! copy of the target.

mod clone;
mod mapping;
mod report;
mod routing;

pub use report::{Condition, TransferReport};

use std::collections::HashSet;
use thiserror::Error;
use tracing::{info, warn};

use crate::snapshot::{FieldKey, Peripheral, Snapshot};

/// Which source devices take part in a transfer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransferMode {
    /// Only the devices named in the selection
    #[default]
    Selected,
    /// Every device of the source, the selection is ignored
    All,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferRequest {
    pub mode: TransferMode,
    pub selection: Vec<FieldKey>,
}

impl TransferRequest {
    pub fn selected(selection: Vec<FieldKey>) -> Self {
        Self { mode: TransferMode::Selected, selection }
    }

    pub fn all() -> Self {
        Self { mode: TransferMode::All, selection: Vec::new() }
    }
}

/// Reasons a transfer refuses to produce output
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("Please select at least one device to transfer")]
    EmptySelection,

    #[error("Device UID(s) not found in source file: {}", .0.join(", "))]
    UnknownSelection(Vec<String>),
}

/// Merged output document plus what happened to it
#[derive(Debug, Clone)]
pub struct Transfer {
    pub snapshot: Snapshot,
    pub report: TransferReport,
}

/// Turn user-typed UIDs into source keys
///
/// A UID matches a device when it equals the text shown in device listings, so
/// `5` selects a device whose UID is either `5` or `"5"`.
pub fn resolve_selection(source: &Snapshot, uids: &[String]) -> Result<Vec<FieldKey>, TransferError> {
    let known = source.peripheral_uids();
    let mut keys: Vec<FieldKey> = Vec::new();
    let mut unknown = Vec::new();

    for uid in uids {
        let matches: Vec<&FieldKey> = known.iter().filter(|key| key.display_text() == uid).collect();
        if matches.is_empty() {
            unknown.push(uid.clone());
            continue;
        }
        for key in matches {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
    }

    if unknown.is_empty() {
        Ok(keys)
    } else {
        Err(TransferError::UnknownSelection(unknown))
    }
}

/// Run the transfer of `request` from `source` into a copy of `target`
pub fn transfer(source: &Snapshot, target: &Snapshot, request: &TransferRequest) -> Result<Transfer, TransferError> {
    let selection: HashSet<FieldKey> = match request.mode {
        TransferMode::All => source.peripheral_uids().into_iter().collect(),
        TransferMode::Selected => request.selection.iter().cloned().collect(),
    };

    let source_uids: HashSet<FieldKey> = source.peripheral_uids().into_iter().collect();
    let mut unknown: Vec<String> = selection
        .difference(&source_uids)
        .map(|key| key.display_text().to_string())
        .collect();
    if !unknown.is_empty() {
        unknown.sort();
        return Err(TransferError::UnknownSelection(unknown));
    }

    let selected: Vec<&Peripheral> = source
        .peripherals
        .iter()
        .filter(|device| selection.contains(&device.uid()))
        .collect();
    if selected.is_empty() {
        return Err(TransferError::EmptySelection);
    }

    let mut conditions = Vec::new();
    if target.peripherals.is_empty() {
        warn!("Target has no paired devices, all UIDs keep their source value");
        conditions.push(Condition::NoTargetPeripherals);
    }

    let mapping = mapping::build_uid_mapping(&source.peripherals, &selection, &target.peripherals);
    if mapping.is_partial() {
        warn!(
            mapped = mapping.mapped_count(),
            requested = mapping.requested_count(),
            "Not every selected device could be mapped to a target UID"
        );
        conditions.push(Condition::PartialMapping {
            mapped: mapping.mapped_count(),
            requested: mapping.requested_count(),
        });
    }

    let mut output = target.clone();
    output.peripherals = clone::clone_selected(&selected, &mapping);
    let routing = routing::merge_routing(source, &selected, &mut output);

    info!(
        devices = output.peripherals.len(),
        remapped = mapping.remapped_count(),
        links_added = routing.links_added,
        inputs_added = routing.inputs.added,
        inputs_updated = routing.inputs.updated,
        outputs_added = routing.outputs.added,
        outputs_updated = routing.outputs.updated,
        "Transfer complete"
    );

    let report = TransferReport {
        transferred: output.peripherals.len(),
        mapping,
        routing,
        conditions,
    };

    Ok(Transfer { snapshot: output, report })
}
