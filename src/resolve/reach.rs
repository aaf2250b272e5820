//! Convoy route search.
//!
//! Finds every coastal province an army can be carried to through a chain
//! of convoying fleets. The chain starts at a sea province next to the
//! army, steps only through sea provinces that hold one of the given fleets,
//! and uses each fleet at most once.

use std::collections::{BTreeSet, VecDeque};

use crate::board::map::MapGraph;
use crate::board::province::{ProvinceCode, ProvinceKind};
use crate::board::unit::{Unit, UnitType};

/// Returns all coastal provinces reachable from `unit`'s province through
/// the provinces of `fleets`. Non-fleet units and fleets outside sea
/// provinces never carry. The unit's own province is never included.
pub fn reachable_coasts<M: MapGraph + ?Sized>(
    map: &M,
    unit: &Unit,
    fleets: &[Unit],
) -> BTreeSet<ProvinceCode> {
    let mut coasts = BTreeSet::new();
    let carriers: BTreeSet<ProvinceCode> = fleets
        .iter()
        .filter(|f| f.unit_type == UnitType::Fleet)
        .map(|f| f.province)
        .filter(|&p| map.province_kind(p) == Some(ProvinceKind::Sea))
        .collect();
    if carriers.is_empty() {
        return coasts;
    }

    let origin = unit.province;
    let mut visited = BTreeSet::new();
    let mut queue = VecDeque::new();
    for &sea in &carriers {
        if map.is_adjacent(origin, sea, Some(UnitType::Fleet)) {
            visited.insert(sea);
            queue.push_back(sea);
        }
    }

    while let Some(current) = queue.pop_front() {
        let Some(neighbors) = map.adjacents(current) else {
            continue;
        };
        for (&next, passage) in neighbors {
            if !passage.fleet || next == origin {
                continue;
            }
            if carriers.contains(&next) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            } else if map.province_kind(next) == Some(ProvinceKind::Coastal) {
                coasts.insert(next);
            }
        }
    }

    coasts
}

/// Returns true if `dest` is reachable from `unit` through `fleets`.
pub fn can_convoy<M: MapGraph + ?Sized>(
    map: &M,
    unit: &Unit,
    fleets: &[Unit],
    dest: ProvinceCode,
) -> bool {
    reachable_coasts(map, unit, fleets).contains(&dest)
}
