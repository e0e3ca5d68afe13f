//! Audio routing that travels with transferred devices
//!
//! Devices point at audiolinks through `iemAudiolinkId`/`micAudiolinkId`;
//! audio inputs and outputs point at the same links. Links are key-space
//! separate from device UIDs, so routing is resolved against the *source*
//! devices before any UID remapping.
//!
//! Conflict rules differ per collection:
//! - links: an existing link in the target is never replaced
//! - inputs/outputs: source fields overwrite the target entry with the same key

use indexmap::map::Entry;
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, warn};

use crate::snapshot::{Keyed, Link, LinkId, Peripheral, Snapshot};

/// Added/updated counts for one keyed collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeCounts {
    pub added: usize,
    pub updated: usize,
}

/// What the routing merge changed in the output document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingMerge {
    pub reachable: BTreeSet<LinkId>,
    pub links_added: usize,
    pub inputs: MergeCounts,
    pub outputs: MergeCounts,
}

/// Every link referenced by the given devices
pub fn reachable_links(devices: &[&Peripheral]) -> BTreeSet<LinkId> {
    devices
        .iter()
        .flat_map(|device| [device.iem_link(), device.mic_link()])
        .flatten()
        .collect()
}

/// Append reachable source links the output does not have yet
///
/// Returns the number of links appended. Running this twice is a no-op the
/// second time.
pub fn merge_links(source: &[Link], output: &mut Vec<Link>, reachable: &BTreeSet<LinkId>) -> usize {
    let mut present: HashSet<_> = output.iter().map(Keyed::key).collect();
    let mut added = 0;

    for link in source {
        let Some(id) = link.id() else { continue };
        if !reachable.contains(&id) {
            continue;
        }
        if present.insert(link.key()) {
            debug!(audiolink = %id, "Adding audiolink");
            output.push(link.clone());
            added += 1;
        } else {
            debug!(audiolink = %id, "Audiolink already present in target, keeping target entry");
        }
    }

    added
}

/// Merge incoming records into `existing` by key, incoming fields winning
///
/// Existing entries keep their position; a field absent from the incoming
/// record is left as it was. New keys are appended in incoming order.
pub fn merge_overwrite<'a, R>(existing: Vec<R>, incoming: impl IntoIterator<Item = &'a R>) -> (Vec<R>, MergeCounts)
where
    R: Keyed + Clone + 'a,
{
    let mut by_key: IndexMap<_, R> = IndexMap::with_capacity(existing.len());
    for record in existing {
        let key = record.key();
        if by_key.contains_key(&key) {
            warn!(key = %key, "Duplicate key in target collection, later entry wins");
        }
        by_key.insert(key, record);
    }

    let mut counts = MergeCounts::default();
    for record in incoming {
        match by_key.entry(record.key()) {
            Entry::Occupied(mut slot) => {
                let fields = slot.get_mut().fields_mut();
                for (name, value) in record.fields() {
                    fields.insert(name.clone(), value.clone());
                }
                counts.updated += 1;
            }
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                counts.added += 1;
            }
        }
    }

    (by_key.into_values().collect(), counts)
}

/// Bring the routing of `selected` source devices into `output`
pub fn merge_routing(source: &Snapshot, selected: &[&Peripheral], output: &mut Snapshot) -> RoutingMerge {
    let reachable = reachable_links(selected);
    debug!(links = ?reachable, "Collected reachable audiolinks");

    let links_added = merge_links(&source.links, &mut output.links, &reachable);

    let incoming_inputs = source
        .inputs
        .iter()
        .filter(|input| input.iem_link().is_some_and(|id| reachable.contains(&id)));
    let (inputs, input_counts) = merge_overwrite(std::mem::take(&mut output.inputs), incoming_inputs);
    output.inputs = inputs;

    let incoming_outputs = source
        .outputs
        .iter()
        .filter(|out| out.mic_link().is_some_and(|id| reachable.contains(&id)));
    let (outputs, output_counts) = merge_overwrite(std::mem::take(&mut output.outputs), incoming_outputs);
    output.outputs = outputs;

    RoutingMerge {
        reachable,
        links_added,
        inputs: input_counts,
        outputs: output_counts,
    }
}
