use std::fmt;

use super::mapping::UidMapping;
use super::routing::RoutingMerge;

/// Noteworthy states of a finished transfer
///
/// These never stop the transfer; the caller decides how to present them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Target has no paired devices, every UID was kept as-is
    NoTargetPeripherals,
    /// Only `mapped` of `requested` devices found a target slot
    PartialMapping { mapped: usize, requested: usize },
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::NoTargetPeripherals => f.write_str("The target file has no paired devices"),
            Condition::PartialMapping { mapped, requested } => write!(
                f,
                "Only {mapped} of {requested} devices could be mapped to target UIDs. \
                 The remaining devices will keep their original UIDs."
            ),
        }
    }
}

/// Outcome of one transfer run
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReport {
    pub transferred: usize,
    pub mapping: UidMapping,
    pub routing: RoutingMerge,
    pub conditions: Vec<Condition>,
}

impl TransferReport {
    /// One-line description shown to the user, e.g. `Transferred 2 device(s), 2 UIDs mapped`
    pub fn summary(&self) -> String {
        format!(
            "Transferred {} device(s), {} UIDs mapped",
            self.transferred,
            self.mapping.remapped_count()
        )
    }

    pub fn has_no_target_peripherals(&self) -> bool {
        self.conditions.contains(&Condition::NoTargetPeripherals)
    }

    pub fn partial_mapping(&self) -> Option<(usize, usize)> {
        self.conditions.iter().find_map(|condition| match condition {
            Condition::PartialMapping { mapped, requested } => Some((*mapped, *requested)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(conditions: Vec<Condition>) -> TransferReport {
        TransferReport {
            transferred: 3,
            mapping: UidMapping::default(),
            routing: RoutingMerge::default(),
            conditions,
        }
    }

    #[test]
    fn test_summary_text() {
        assert_eq!(report(vec![]).summary(), "Transferred 3 device(s), 0 UIDs mapped");
    }

    #[test]
    fn test_condition_lookups() {
        let report = report(vec![
            Condition::NoTargetPeripherals,
            Condition::PartialMapping { mapped: 0, requested: 3 },
        ]);

        assert!(report.has_no_target_peripherals());
        assert_eq!(report.partial_mapping(), Some((0, 3)));
    }

    #[test]
    fn test_partial_mapping_message() {
        let text = Condition::PartialMapping { mapped: 1, requested: 2 }.to_string();
        assert!(text.starts_with("Only 1 of 2 devices could be mapped"));
    }
}
