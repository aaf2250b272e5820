//! Randomized consistency checks.
//!
//! Generates seeded random positions with a mix of holds, moves, supports
//! and convoys, then checks properties every resolution must satisfy.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use adjudicator::board::{
    GameMap, Order, OrderKind, OrderStatus, ProvinceCode, ProvinceData, ProvinceKind,
    Unit, UnitType, ALL_POWERS,
};
use adjudicator::resolve::{adjudicate, adjudicate_batch, Resolution};

const SEEDS: u64 = 300;

fn neighbors(data: &ProvinceData, unit_type: UnitType) -> Vec<ProvinceCode> {
    data.adjacents
        .iter()
        .filter(|(_, passage)| passage.allows(unit_type))
        .map(|(&code, _)| code)
        .collect()
}

/// Places random units and gives each a random order.
fn random_position(seed: u64) -> Vec<Order> {
    let map = GameMap::standard();
    let mut rng = SmallRng::seed_from_u64(seed);
    let provinces: Vec<&ProvinceData> = map.provinces().collect();

    let count = rng.gen_range(2..=30);
    let mut units: Vec<Unit> = Vec::with_capacity(count);
    for data in provinces.choose_multiple(&mut rng, count) {
        let unit_type = match data.kind {
            ProvinceKind::Sea => UnitType::Fleet,
            ProvinceKind::Inland => UnitType::Army,
            ProvinceKind::Coastal if rng.gen_bool(0.5) => UnitType::Fleet,
            ProvinceKind::Coastal => UnitType::Army,
        };
        let power = *ALL_POWERS.choose(&mut rng).unwrap();
        units.push(Unit::new(unit_type, power, data.code));
    }

    let coasts: Vec<ProvinceCode> = provinces
        .iter()
        .filter(|d| d.kind == ProvinceKind::Coastal)
        .map(|d| d.code)
        .collect();

    // Draft a move for every unit first so supports and convoys can name them.
    let drafted: Vec<Order> = units
        .iter()
        .map(|unit| {
            let data = map.province(unit.province).unwrap();
            let far_coast = unit.unit_type == UnitType::Army
                && data.kind == ProvinceKind::Coastal
                && rng.gen_bool(0.2);
            let dest = if far_coast {
                coasts.choose(&mut rng).copied()
            } else {
                neighbors(data, unit.unit_type).choose(&mut rng).copied()
            };
            match dest {
                Some(dest) if dest != unit.province => Order::move_to(*unit, dest),
                _ => Order::hold(*unit),
            }
        })
        .collect();

    units
        .iter()
        .enumerate()
        .map(|(i, unit)| {
            let other = &drafted[rng.gen_range(0..drafted.len())];
            let sea_fleet = unit.unit_type == UnitType::Fleet
                && map.province(unit.province).unwrap().kind == ProvinceKind::Sea;
            match rng.gen_range(0..10) {
                0..=1 => Order::hold(*unit),
                2..=5 => drafted[i].clone(),
                6..=8 if other.unit != *unit => {
                    if rng.gen_bool(0.3) {
                        Order::support(*unit, Order::hold(other.unit).key())
                    } else {
                        Order::support(*unit, other.key())
                    }
                }
                _ if sea_fleet && other.is_move() && other.unit.unit_type == UnitType::Army => {
                    Order::convoy(*unit, other.key())
                }
                _ => drafted[i].clone(),
            }
        })
        .collect()
}

fn resolve(orders: Vec<Order>) -> Resolution {
    adjudicate(GameMap::standard(), orders).unwrap()
}

#[test]
fn resolution_is_deterministic() {
    for seed in 0..SEEDS {
        let orders = random_position(seed);
        let first = resolve(orders.clone());
        let second = resolve(orders);
        assert_eq!(first, second, "seed {seed}");
    }
}

#[test]
fn resolution_does_not_depend_on_order_sequence() {
    let outcome = |res: &Resolution| -> BTreeMap<ProvinceCode, (OrderStatus, Option<ProvinceCode>)> {
        res.orders
            .iter()
            .map(|o| (o.unit.province, (o.status, o.retreat_prohibition)))
            .collect()
    };
    for seed in 0..SEEDS {
        let orders = random_position(seed);
        let baseline = resolve(orders.clone());
        let mut rng = SmallRng::seed_from_u64(seed ^ 0x5eed);
        for _ in 0..4 {
            let mut shuffled = orders.clone();
            shuffled.shuffle(&mut rng);
            let res = resolve(shuffled);
            assert_eq!(outcome(&res), outcome(&baseline), "seed {seed}");
            let standoffs: BTreeSet<_> = res.standoffs.iter().collect();
            let expected: BTreeSet<_> = baseline.standoffs.iter().collect();
            assert_eq!(standoffs, expected, "seed {seed}");
        }
    }
}

#[test]
fn every_order_is_resolved() {
    for seed in 0..SEEDS {
        let res = resolve(random_position(seed));
        for order in &res.orders {
            assert_ne!(order.status, OrderStatus::Unresolved, "seed {seed}: {order:?}");
            let allowed: &[OrderStatus] = match order.kind {
                OrderKind::Hold => &[OrderStatus::Succeeded, OrderStatus::Dislodged],
                OrderKind::Move { .. } => &[
                    OrderStatus::Succeeded,
                    OrderStatus::Failed,
                    OrderStatus::Dislodged,
                    OrderStatus::Rejected,
                ],
                OrderKind::Support { .. } | OrderKind::Convoy { .. } => &[
                    OrderStatus::Applied,
                    OrderStatus::Rejected,
                    OrderStatus::Cut,
                    OrderStatus::Unmatched,
                    OrderStatus::Dislodged,
                ],
            };
            assert!(allowed.contains(&order.status), "seed {seed}: {order:?}");
        }
    }
}

#[test]
fn at_most_one_unit_enters_each_province() {
    for seed in 0..SEEDS {
        let res = resolve(random_position(seed));
        let mut entered = BTreeSet::new();
        for order in &res.orders {
            if order.status == OrderStatus::Succeeded {
                if let Some(dest) = order.dest() {
                    assert!(entered.insert(dest), "seed {seed}: two units entered {dest}");
                }
            }
        }
    }
}

#[test]
fn dislodgements_come_from_a_foreign_successful_attack() {
    for seed in 0..SEEDS {
        let res = resolve(random_position(seed));
        let winners: HashMap<ProvinceCode, &Order> = res
            .orders
            .iter()
            .filter(|o| o.status == OrderStatus::Succeeded)
            .filter_map(|o| o.dest().map(|d| (d, o)))
            .collect();

        for order in &res.orders {
            if order.status != OrderStatus::Dislodged {
                assert_eq!(order.retreat_prohibition, None, "seed {seed}: {order:?}");
                continue;
            }
            let attacker = winners
                .get(&order.unit.province)
                .unwrap_or_else(|| panic!("seed {seed}: no attacker for {order:?}"));
            assert_eq!(order.retreat_prohibition, Some(attacker.unit.province), "seed {seed}");
            assert_ne!(attacker.unit.power, order.unit.power, "seed {seed}: self-dislodgement");
        }
    }
}

#[test]
fn occupied_destinations_are_vacated_or_dislodged() {
    for seed in 0..SEEDS {
        let res = resolve(random_position(seed));
        for order in &res.orders {
            if order.status != OrderStatus::Succeeded || !order.is_move() {
                continue;
            }
            let dest = order.dest().unwrap();
            if let Some(occupant) = res.order_at(dest) {
                let left = occupant.is_move() && occupant.status == OrderStatus::Succeeded;
                assert!(
                    left || occupant.status == OrderStatus::Dislodged,
                    "seed {seed}: {order:?} entered occupied {occupant:?}"
                );
            }
        }
    }
}

#[test]
fn support_counts_match_applied_supports() {
    for seed in 0..SEEDS {
        let res = resolve(random_position(seed));
        for order in &res.orders {
            if order.is_support() || order.is_convoy() {
                continue;
            }
            let key = order.key();
            let applied = res
                .orders
                .iter()
                .filter(|s| s.status == OrderStatus::Applied)
                .filter(|s| matches!(s.kind, OrderKind::Support { target } if target == key))
                .count();
            assert_eq!(order.support_count as usize, applied, "seed {seed}: {order:?}");
        }
    }
}

#[test]
fn standoffs_are_listed_once() {
    for seed in 0..SEEDS {
        let res = resolve(random_position(seed));
        let unique: BTreeSet<_> = res.standoffs.iter().collect();
        assert_eq!(unique.len(), res.standoffs.len(), "seed {seed}");
        for province in &res.standoffs {
            let entered = res
                .orders
                .iter()
                .any(|o| o.dest() == Some(*province) && o.status == OrderStatus::Succeeded);
            assert!(!entered, "seed {seed}: standoff at {province} was entered");
        }
    }
}

#[test]
fn batch_matches_sequential_resolution() {
    let batches: Vec<Vec<Order>> = (0..64).map(random_position).collect();
    let sequential: Vec<Resolution> = batches.iter().cloned().map(resolve).collect();
    let parallel = adjudicate_batch(GameMap::standard(), batches);
    assert_eq!(parallel.len(), sequential.len());
    for (par, seq) in parallel.into_iter().zip(sequential) {
        assert_eq!(par.unwrap(), seq);
    }
}

#[test]
fn generator_covers_every_order_kind() {
    let mut kinds = [false; 4];
    for seed in 0..SEEDS {
        for order in random_position(seed) {
            let slot = match order.kind {
                OrderKind::Hold => 0,
                OrderKind::Move { .. } => 1,
                OrderKind::Support { .. } => 2,
                OrderKind::Convoy { .. } => 3,
            };
            kinds[slot] = true;
        }
    }
    assert_eq!(kinds, [true; 4]);
}
