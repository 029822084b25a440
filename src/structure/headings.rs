//! Heading hierarchy normalization and section numbering.

use crate::model::Section;
use std::collections::{BTreeMap, BTreeSet};

/// Deepest level kept after normalization.
pub const MAX_NORMALIZED_LEVEL: u32 = 3;

/// Compress the heading levels in use to `1, 2, 3`.
///
/// Distinct levels are sorted and renumbered from 1, so a document that
/// jumps from H1 to H3 loses the gap. Anything past the third distinct level
/// collapses into level 3. Running it twice changes nothing.
pub fn normalize_levels(sections: &mut [Section]) {
    let used: BTreeSet<u32> = sections.iter().map(|s| s.level).collect();
    let level_map: BTreeMap<u32, u32> = used
        .iter()
        .enumerate()
        .map(|(i, &level)| (level, (i as u32 + 1).min(MAX_NORMALIZED_LEVEL)))
        .collect();

    if level_map.iter().any(|(from, to)| from != to) {
        log::debug!("Heading level mapping: {:?}", level_map);
    }

    for section in sections.iter_mut() {
        let original = section.level;
        section.level = level_map
            .get(&original)
            .copied()
            .unwrap_or_else(|| original.min(MAX_NORMALIZED_LEVEL));
        if section.level != original {
            log::debug!(
                "Remapped heading '{}' from level {} to {}",
                section.heading,
                original,
                section.level
            );
        }
    }
}

/// Number level-1 sections `1..=K` in order; clear every other number.
pub fn assign_numbers(sections: &mut [Section]) {
    let mut counter = 0;
    for section in sections.iter_mut() {
        if section.level == 1 {
            counter += 1;
            section.number = Some(counter);
            log::debug!("Assigned number {} to section '{}'", counter, section.heading);
        } else {
            section.number = None;
        }
    }
}
