//! Multi-pass movement adjudication.
//!
//! Orders live in an arena of slots addressed by index. The passes run in a
//! fixed sequence: support cuts, support application, convoy viability,
//! head-to-head battles, contention at convoying and supporting units, and
//! finally a fixpoint over every remaining destination.
//!
//! Moves into a province whose occupant is still moving away succeed
//! provisionally. If the occupant later fails, the provisional mover is
//! either confirmed against it or sent back to `Unresolved`. Dislodging a
//! supporter withdraws its support and reopens every move that contended
//! for the supported destination.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::board::map::MapGraph;
use crate::board::order::{Order, OrderKey, OrderStatus};
use crate::board::province::{Power, ProvinceCode};
use crate::board::unit::Unit;
use crate::resolve::reach::can_convoy;

/// Precondition violations detected before any pass runs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdjudicationError {
    #[error("order for a unit in unknown province '{0}'")]
    UnknownProvince(ProvinceCode),

    #[error("unit in '{unit}' is ordered to unknown province '{dest}'")]
    UnknownDestination { unit: ProvinceCode, dest: ProvinceCode },

    #[error("unit in '{unit}' names order '{target}' outside the map")]
    UnknownTarget { unit: ProvinceCode, target: OrderKey },

    #[error("more than one order for the unit in '{0}'")]
    DuplicateUnit(ProvinceCode),
}

/// A unit displaced during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DislodgedUnit {
    pub unit: Unit,
    /// Origin of the successful attacker; the unit may not retreat there.
    pub attacker_from: ProvinceCode,
}

/// The outcome of one adjudication run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Every order with its final status, in input order.
    pub orders: Vec<Order>,
    /// Provinces where tied movers bounced, each listed once.
    pub standoffs: Vec<ProvinceCode>,
}

impl Resolution {
    /// Returns the order issued by the unit in `province`.
    pub fn order_at(&self, province: ProvinceCode) -> Option<&Order> {
        self.orders.iter().find(|o| o.unit.province == province)
    }

    /// Returns the final status of the order issued from `province`.
    pub fn status_of(&self, province: ProvinceCode) -> Option<OrderStatus> {
        self.order_at(province).map(|o| o.status)
    }

    /// Lists dislodged units with the province each may not retreat into.
    pub fn dislodged(&self) -> Vec<DislodgedUnit> {
        self.orders
            .iter()
            .filter(|o| o.status == OrderStatus::Dislodged)
            .filter_map(|o| {
                o.retreat_prohibition.map(|attacker_from| DislodgedUnit {
                    unit: o.unit,
                    attacker_from,
                })
            })
            .collect()
    }

    /// Returns true if tied movers bounced in `province`.
    pub fn is_standoff(&self, province: ProvinceCode) -> bool {
        self.standoffs.contains(&province)
    }
}

/// Per-order bookkeeping that only lives for one run.
#[derive(Debug, Clone)]
struct Slot {
    order: Order,
    /// Arena index of the order a support or convoy names.
    target: Option<usize>,
    /// Status held just before the unit was dislodged.
    prior: Option<OrderStatus>,
    dislodged_by: Option<usize>,
    /// The move lost its convoy route; it is never reopened.
    route_broken: bool,
}

/// Reusable adjudicator bound to one map.
///
/// Allocate once and call [`Adjudicator::adjudicate`] for each turn; the
/// arena and lookup tables are cleared and reused between calls.
pub struct Adjudicator<'m, M: MapGraph + ?Sized> {
    map: &'m M,
    slots: Vec<Slot>,
    by_province: HashMap<ProvinceCode, usize>,
    by_key: HashMap<OrderKey, usize>,
    standoffs: Vec<ProvinceCode>,
}

impl<'m, M: MapGraph + ?Sized> Adjudicator<'m, M> {
    pub fn new(map: &'m M) -> Self {
        Adjudicator {
            map,
            slots: Vec::new(),
            by_province: HashMap::new(),
            by_key: HashMap::new(),
            standoffs: Vec::new(),
        }
    }

    /// Resolves one turn of movement orders.
    ///
    /// Fails without resolving anything if an order names a province the
    /// map does not know or two orders are issued for the same unit.
    pub fn adjudicate(&mut self, orders: Vec<Order>) -> Result<Resolution, AdjudicationError> {
        self.init(orders)?;
        debug!(orders = self.slots.len(), "adjudication started");

        self.eliminate_unmatched();
        self.cut_supports();
        self.apply_supports();
        self.apply_convoys();
        self.resolve_head_to_head_moves();
        self.resolve_convoy_provinces();
        self.resolve_support_provinces();
        self.resolve_remaining_moves();
        self.finalize_holds();

        let orders = self.slots.drain(..).map(|s| s.order).collect();
        let standoffs = std::mem::take(&mut self.standoffs);
        debug!(standoffs = standoffs.len(), "adjudication finished");
        Ok(Resolution { orders, standoffs })
    }

    fn init(&mut self, orders: Vec<Order>) -> Result<(), AdjudicationError> {
        self.slots.clear();
        self.by_province.clear();
        self.by_key.clear();
        self.standoffs.clear();

        for (i, order) in orders.iter().enumerate() {
            self.validate(order)?;
            if self.by_province.insert(order.unit.province, i).is_some() {
                return Err(AdjudicationError::DuplicateUnit(order.unit.province));
            }
            self.by_key.insert(order.key(), i);
        }

        for (i, mut order) in orders.into_iter().enumerate() {
            order.status = OrderStatus::Unresolved;
            order.support_count = 0;
            order.retreat_prohibition = None;
            let target = order
                .target()
                .and_then(|key| self.by_key.get(&key).copied())
                .filter(|&t| t != i);
            self.slots.push(Slot {
                order,
                target,
                prior: None,
                dislodged_by: None,
                route_broken: false,
            });
        }
        Ok(())
    }

    fn validate(&self, order: &Order) -> Result<(), AdjudicationError> {
        let unit = order.unit.province;
        if !self.map.contains(unit) {
            return Err(AdjudicationError::UnknownProvince(unit));
        }
        if let Some(dest) = order.dest() {
            if !self.map.contains(dest) {
                return Err(AdjudicationError::UnknownDestination { unit, dest });
            }
        }
        if let Some(target) = order.target() {
            let known = self.map.contains(target.province)
                && target.dest.map_or(true, |d| self.map.contains(d));
            if !known {
                return Err(AdjudicationError::UnknownTarget { unit, target });
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    fn order(&self, i: usize) -> &Order {
        &self.slots[i].order
    }

    fn status(&self, i: usize) -> OrderStatus {
        self.slots[i].order.status
    }

    fn set_status(&mut self, i: usize, status: OrderStatus) {
        self.slots[i].order.status = status;
    }

    fn origin(&self, i: usize) -> ProvinceCode {
        self.slots[i].order.unit.province
    }

    fn occupant(&self, province: ProvinceCode) -> Option<usize> {
        self.by_province.get(&province).copied()
    }

    fn unresolved_moves(&self) -> Vec<usize> {
        (0..self.slots.len())
            .filter(|&i| self.order(i).is_move() && self.order(i).is_unresolved())
            .collect()
    }

    fn moves_into(&self, dest: ProvinceCode) -> Vec<usize> {
        (0..self.slots.len())
            .filter(|&i| self.order(i).dest() == Some(dest))
            .collect()
    }

    fn unresolved_moves_into(&self, dest: ProvinceCode) -> Vec<usize> {
        self.moves_into(dest)
            .into_iter()
            .filter(|&i| self.order(i).is_unresolved())
            .collect()
    }

    fn supports_for(&self, target: usize) -> Vec<usize> {
        (0..self.slots.len())
            .filter(|&i| self.order(i).is_support() && self.slots[i].target == Some(target))
            .collect()
    }

    fn convoys_for(&self, mover: usize) -> Vec<usize> {
        (0..self.slots.len())
            .filter(|&i| self.order(i).is_convoy() && self.slots[i].target == Some(mover))
            .collect()
    }

    fn units(&self, idxs: &[usize]) -> Vec<Unit> {
        idxs.iter().map(|&i| self.order(i).unit).collect()
    }

    /// Distinct provinces of units issuing the matching kind of order.
    fn provinces_issuing(&self, pred: impl Fn(&Order) -> bool) -> Vec<ProvinceCode> {
        let mut out: Vec<ProvinceCode> = Vec::new();
        for slot in &self.slots {
            if pred(&slot.order) && !out.contains(&slot.order.unit.province) {
                out.push(slot.order.unit.province);
            }
        }
        out
    }

    /// Returns true if the move can be made without a convoy.
    fn land_passable(&self, mover: usize) -> bool {
        let order = self.order(mover);
        order.dest().is_some_and(|dest| {
            self.map
                .is_adjacent(order.unit.province, dest, Some(order.unit.unit_type))
        })
    }

    /// Returns true if the move is carried by its applied convoys.
    fn sea_route_effective(&self, mover: usize) -> bool {
        let Some(dest) = self.order(mover).dest() else {
            return false;
        };
        let applied: Vec<usize> = self
            .convoys_for(mover)
            .into_iter()
            .filter(|&c| self.status(c) == OrderStatus::Applied)
            .collect();
        if applied.is_empty() {
            return false;
        }
        can_convoy(self.map, &self.order(mover).unit, &self.units(&applied), dest)
    }

    // ------------------------------------------------------------------
    // Supports and convoys
    // ------------------------------------------------------------------

    fn eliminate_unmatched(&mut self) {
        for i in 0..self.slots.len() {
            // A convoy only matches a move; stationary keys are shared with
            // holds and supports.
            if self.order(i).is_convoy()
                && self.slots[i].target.is_some_and(|t| !self.order(t).is_move())
            {
                self.slots[i].target = None;
            }
            let order = self.order(i);
            if (order.is_support() || order.is_convoy()) && self.slots[i].target.is_none() {
                trace!(unit = %order.unit.province, "no matching order");
                self.set_status(i, OrderStatus::Unmatched);
            }
        }
    }

    fn cut_supports(&mut self) {
        for s in 0..self.slots.len() {
            let order = self.order(s);
            if !order.is_support() || !order.is_unresolved() {
                continue;
            }
            let province = order.unit.province;
            let power = order.unit.power;
            let enemies: Vec<usize> = self
                .unresolved_moves_into(province)
                .into_iter()
                .filter(|&m| self.order(m).unit.power != power)
                .collect();

            let cut = match enemies.as_slice() {
                [] => false,
                [enemy] => self.is_cut_by(s, *enemy),
                _ => true,
            };
            if cut {
                debug!(supporter = %province, "support cut");
                self.set_status(s, OrderStatus::Cut);
            }
        }
    }

    /// Decides whether a single enemy move into the supporter's province
    /// cuts the support.
    fn is_cut_by(&self, support: usize, enemy: usize) -> bool {
        let province = self.origin(support);
        let Some(target) = self.slots[support].target else {
            return true;
        };
        let Some(supported_dest) = self.order(target).dest() else {
            return true;
        };
        let attacker = self.order(enemy).unit;
        if supported_dest == attacker.province {
            return false;
        }
        if self
            .map
            .is_adjacent(attacker.province, province, Some(attacker.unit_type))
        {
            return true;
        }

        // Remote attack: only a convoy-borne army can cut from afar.
        let route = self.convoys_for(enemy);
        if !can_convoy(self.map, &attacker, &self.units(&route), province) {
            return false;
        }
        let Some(attacked) = self.occupant(supported_dest) else {
            return true;
        };
        let attacked_convoys_enemy =
            self.order(attacked).is_convoy() && self.slots[attacked].target == Some(enemy);
        if !attacked_convoys_enemy {
            return true;
        }
        let others: Vec<usize> = route.into_iter().filter(|&c| c != attacked).collect();
        can_convoy(self.map, &attacker, &self.units(&others), province)
    }

    fn apply_supports(&mut self) {
        for s in 0..self.slots.len() {
            if !self.order(s).is_support() || !self.order(s).is_unresolved() {
                continue;
            }
            match self.slots[s].target {
                Some(t) => {
                    self.slots[t].order.support_count += 1;
                    self.set_status(s, OrderStatus::Applied);
                }
                None => self.set_status(s, OrderStatus::Rejected),
            }
        }
    }

    fn apply_convoys(&mut self) {
        for m in self.unresolved_moves() {
            let convoys: Vec<usize> = self
                .convoys_for(m)
                .into_iter()
                .filter(|&c| self.order(c).is_unresolved())
                .collect();
            if convoys.is_empty() {
                continue;
            }
            let Some(dest) = self.order(m).dest() else {
                continue;
            };
            let reachable = can_convoy(self.map, &self.order(m).unit, &self.units(&convoys), dest);
            let status = if reachable {
                OrderStatus::Applied
            } else {
                OrderStatus::Rejected
            };
            trace!(mover = %self.origin(m), %dest, reachable, "convoy route");
            for c in convoys {
                self.set_status(c, status);
            }
        }

        for m in self.unresolved_moves() {
            if self.land_passable(m) || self.sea_route_effective(m) {
                continue;
            }
            debug!(mover = %self.origin(m), "move has no route");
            self.set_status(m, OrderStatus::Rejected);
        }
    }

    /// Fails every move that needed a convoy and no longer has one.
    fn recheck_convoy_routes(&mut self) {
        for m in 0..self.slots.len() {
            let order = self.order(m);
            if !order.is_move()
                || !matches!(order.status, OrderStatus::Unresolved | OrderStatus::Succeeded)
                || self.land_passable(m)
                || self.convoys_for(m).is_empty()
                || self.sea_route_effective(m)
            {
                continue;
            }
            debug!(mover = %order.unit.province, "convoy route disrupted");
            if self.status(m) == OrderStatus::Succeeded {
                self.unwind_success(m);
            }
            self.slots[m].route_broken = true;
            self.fail_move(m);
        }
    }

    // ------------------------------------------------------------------
    // Move resolution
    // ------------------------------------------------------------------

    fn resolve_head_to_head_moves(&mut self) {
        for m in self.unresolved_moves() {
            if !self.order(m).is_unresolved() {
                continue;
            }
            let Some(dest) = self.order(m).dest() else {
                continue;
            };
            let Some(other) = self.occupant(dest) else {
                continue;
            };
            if self.is_head_to_head(m, other) {
                self.head_to_head(m, other);
            }
        }
    }

    /// Two unresolved moves into each other's province, neither by convoy.
    fn is_head_to_head(&self, a: usize, b: usize) -> bool {
        let (oa, ob) = (self.order(a), self.order(b));
        ob.is_move()
            && ob.is_unresolved()
            && oa.dest() == Some(ob.unit.province)
            && ob.dest() == Some(oa.unit.province)
            && !self.sea_route_effective(a)
            && !self.sea_route_effective(b)
    }

    fn head_to_head(&mut self, a: usize, b: usize) {
        let (power_a, power_b) = (self.order(a).unit.power, self.order(b).unit.power);
        self.disqualify_supports(a, |p| p == power_b);
        self.disqualify_supports(b, |p| p == power_a);

        let (sa, sb) = (self.order(a).support_count, self.order(b).support_count);
        trace!(a = %self.origin(a), b = %self.origin(b), sa, sb, "head-to-head");
        if sa == sb || power_a == power_b {
            self.fail_move(a);
            self.fail_move(b);
            return;
        }

        let (winner, loser) = if sa > sb { (a, b) } else { (b, a) };
        self.fail_move(loser);
        let contested = self.origin(loser);
        if self.unresolved_moves_into(contested).len() == 1 {
            self.succeed(winner);
            self.dislodge(loser, winner);
        }
        // Otherwise the winner still has to beat the other movers into the
        // loser's province; the fixpoint settles it against a failed holder.
    }

    fn resolve_convoy_provinces(&mut self) {
        for dest in self.provinces_issuing(Order::is_convoy) {
            self.resolve_destination(dest);
        }
        self.recheck_convoy_routes();
    }

    fn resolve_support_provinces(&mut self) {
        for dest in self.provinces_issuing(Order::is_support) {
            self.resolve_destination(dest);
        }
    }

    fn resolve_remaining_moves(&mut self) {
        let limit = 64 + self.slots.len() * 4;
        for _ in 0..limit {
            let mut dests: Vec<ProvinceCode> = Vec::new();
            for m in self.unresolved_moves() {
                if let Some(dest) = self.order(m).dest() {
                    if !dests.contains(&dest) {
                        dests.push(dest);
                    }
                }
            }
            if dests.is_empty() {
                return;
            }
            for dest in dests {
                self.resolve_destination(dest);
            }
        }

        let stuck = self.unresolved_moves();
        warn!(moves = stuck.len(), "fixpoint did not converge, failing remaining moves");
        for m in stuck {
            self.fail_move(m);
        }
    }

    /// Resolves contention among the unresolved moves into `dest`.
    fn resolve_destination(&mut self, dest: ProvinceCode) {
        let mut movers = self.unresolved_moves_into(dest);
        if movers.is_empty() {
            return;
        }
        let settled = self
            .moves_into(dest)
            .into_iter()
            .any(|m| self.status(m) == OrderStatus::Succeeded);
        if settled {
            self.reopen_destination(dest);
            movers = self.unresolved_moves_into(dest);
        }
        trace!(%dest, movers = movers.len(), "resolving destination");

        if movers.len() > 1 {
            let max = movers
                .iter()
                .map(|&m| self.order(m).support_count)
                .max()
                .unwrap_or(0);
            let top: Vec<usize> = movers
                .iter()
                .copied()
                .filter(|&m| self.order(m).support_count == max)
                .collect();
            if let [winner] = top.as_slice() {
                for m in movers.iter().copied().filter(|m| m != winner) {
                    self.fail_move(m);
                }
            } else {
                for m in movers {
                    self.fail_move(m);
                }
                self.record_standoff(dest);
            }
            return;
        }

        let mover = movers[0];
        let Some(occupant) = self.occupant(dest) else {
            self.succeed(mover);
            return;
        };
        if occupant == mover {
            self.fail_move(mover);
            return;
        }

        let (held_moves, held_status) = {
            let held = self.order(occupant);
            (held.is_move(), held.status)
        };
        if held_moves {
            match held_status {
                OrderStatus::Unresolved if self.is_head_to_head(mover, occupant) => {
                    self.head_to_head(mover, occupant);
                }
                OrderStatus::Unresolved | OrderStatus::Succeeded => self.succeed(mover),
                _ => self.contest_holder(mover, occupant),
            }
        } else {
            self.contest_holder(mover, occupant);
        }
    }

    /// A single mover against a unit that stays in place.
    fn contest_holder(&mut self, mover: usize, holder: usize) {
        if self.overpowers(mover, holder) {
            self.succeed(mover);
            self.dislodge(holder, mover);
        } else {
            self.fail_move(mover);
        }
    }

    /// Returns true if `mover` dislodges `holder`. Supports lent to the mover
    /// by the holder's power are withdrawn first; a power never dislodges
    /// its own unit.
    fn overpowers(&mut self, mover: usize, holder: usize) -> bool {
        let holder_power = self.order(holder).unit.power;
        self.disqualify_supports(mover, |p| p == holder_power);
        if holder_power == self.order(mover).unit.power {
            self.disqualify_supports(mover, |_| true);
            return false;
        }
        self.order(mover).support_count > self.hold_strength(holder, mover)
    }

    /// Support counted in the holder's favor against `mover`. A unit whose
    /// own move failed only keeps its support when it was a head-to-head
    /// attack on the mover.
    fn hold_strength(&self, holder: usize, mover: usize) -> i32 {
        let held = self.order(holder);
        if !held.is_move() {
            return held.support_count;
        }
        let facing = held.dest() == Some(self.origin(mover))
            && !self.sea_route_effective(holder)
            && !self.sea_route_effective(mover);
        if facing {
            held.support_count
        } else {
            0
        }
    }

    fn disqualify_supports(&mut self, mover: usize, by_power: impl Fn(Power) -> bool) {
        for s in self.supports_for(mover) {
            if self.status(s) == OrderStatus::Applied && by_power(self.order(s).unit.power) {
                trace!(supporter = %self.origin(s), "support rejected");
                self.set_status(s, OrderStatus::Rejected);
                self.slots[mover].order.support_count -= 1;
            }
        }
    }

    fn succeed(&mut self, mover: usize) {
        trace!(mover = %self.origin(mover), "move succeeded");
        self.set_status(mover, OrderStatus::Succeeded);
    }

    /// Marks a move failed. If another move already entered the mover's
    /// origin, that move is either confirmed (dislodging the mover) or sent
    /// back for re-resolution against it.
    fn fail_move(&mut self, mover: usize) {
        if self.status(mover) == OrderStatus::Dislodged {
            return;
        }
        trace!(mover = %self.origin(mover), "move failed");
        self.set_status(mover, OrderStatus::Failed);

        let origin = self.origin(mover);
        let entered = self
            .moves_into(origin)
            .into_iter()
            .find(|&m| self.status(m) == OrderStatus::Succeeded);
        let Some(attacker) = entered else {
            return;
        };
        if self.overpowers(attacker, mover) {
            self.dislodge(mover, attacker);
        } else {
            trace!(mover = %self.origin(attacker), "provisional move reopened");
            self.set_status(attacker, OrderStatus::Unresolved);
        }
    }

    fn dislodge(&mut self, victim: usize, attacker: usize) {
        let prior = self.status(victim);
        let from = self.origin(attacker);
        debug!(unit = %self.origin(victim), attacker = %from, "unit dislodged");

        let slot = &mut self.slots[victim];
        slot.prior = Some(prior);
        slot.dislodged_by = Some(attacker);
        slot.order.status = OrderStatus::Dislodged;
        slot.order.retreat_prohibition = Some(from);

        if prior == OrderStatus::Applied {
            if self.order(victim).is_support() {
                self.withdraw_support(victim);
            } else if self.order(victim).is_convoy() {
                self.recheck_convoy_routes();
            }
        }
    }

    /// Removes a dislodged supporter's contribution and reopens the
    /// contention it influenced.
    fn withdraw_support(&mut self, support: usize) {
        let Some(target) = self.slots[support].target else {
            return;
        };
        debug!(supporter = %self.origin(support), target = %self.origin(target), "support withdrawn");
        self.slots[target].order.support_count -= 1;
        self.reopen_for(target);
    }

    /// Restores a support whose supporter turned out not to be dislodged.
    fn reinstate_support(&mut self, support: usize) {
        let Some(target) = self.slots[support].target else {
            return;
        };
        debug!(supporter = %self.origin(support), target = %self.origin(target), "support reinstated");
        self.slots[target].order.support_count += 1;
        self.reopen_for(target);
    }

    fn reopen_for(&mut self, target: usize) {
        let contested = self
            .order(target)
            .dest()
            .unwrap_or_else(|| self.origin(target));
        self.reopen_destination(contested);
    }

    /// Returns every decided move into `dest` to `Unresolved`. A reopened
    /// move that had failed may yet leave, so the moves it blocked from
    /// entering its own province are reopened as well.
    fn reopen_destination(&mut self, dest: ProvinceCode) {
        self.standoffs.retain(|&p| p != dest);
        let mut unblocked = Vec::new();
        for m in self.moves_into(dest) {
            if self.slots[m].route_broken {
                continue;
            }
            match self.status(m) {
                OrderStatus::Succeeded => self.unwind_success(m),
                OrderStatus::Failed => unblocked.push(self.origin(m)),
                OrderStatus::Dislodged => {
                    let slot = &mut self.slots[m];
                    slot.prior = None;
                    slot.dislodged_by = None;
                    slot.order.retreat_prohibition = None;
                }
                _ => continue,
            }
            self.requalify_supports(m);
            self.set_status(m, OrderStatus::Unresolved);
        }
        for origin in unblocked {
            let blocked = self
                .moves_into(origin)
                .into_iter()
                .any(|m| self.status(m) == OrderStatus::Failed && !self.slots[m].route_broken);
            if blocked {
                trace!(province = %origin, "blocked moves reopened");
                self.reopen_destination(origin);
            }
        }
    }

    /// Restores supports rejected while `mover` contested a holder. The
    /// re-resolution rejects them again if the same holder still stands.
    fn requalify_supports(&mut self, mover: usize) {
        for s in self.supports_for(mover) {
            if self.status(s) == OrderStatus::Rejected {
                trace!(supporter = %self.origin(s), "support requalified");
                self.set_status(s, OrderStatus::Applied);
                self.slots[mover].order.support_count += 1;
            }
        }
    }

    /// Undoes the dislodgement caused by a move that is being reopened.
    fn unwind_success(&mut self, mover: usize) {
        let Some(dest) = self.order(mover).dest() else {
            return;
        };
        let Some(victim) = self.occupant(dest) else {
            return;
        };
        if self.slots[victim].dislodged_by != Some(mover) {
            return;
        }
        let prior = self.slots[victim].prior.take().unwrap_or(OrderStatus::Unresolved);
        let slot = &mut self.slots[victim];
        slot.dislodged_by = None;
        slot.order.retreat_prohibition = None;
        slot.order.status = prior;
        trace!(unit = %self.origin(victim), "dislodgement undone");

        if prior == OrderStatus::Applied && self.order(victim).is_support() {
            self.reinstate_support(victim);
        }
    }

    fn record_standoff(&mut self, dest: ProvinceCode) {
        if !self.standoffs.contains(&dest) {
            debug!(province = %dest, "standoff");
            self.standoffs.push(dest);
        }
    }

    fn finalize_holds(&mut self) {
        for slot in &mut self.slots {
            if slot.order.status == OrderStatus::Unresolved {
                slot.order.status = OrderStatus::Succeeded;
            }
        }
    }
}

/// Convenience function that creates an adjudicator and resolves one turn.
pub fn adjudicate<M: MapGraph + ?Sized>(
    map: &M,
    orders: Vec<Order>,
) -> Result<Resolution, AdjudicationError> {
    Adjudicator::new(map).adjudicate(orders)
}

/// Resolves independent turns in parallel, returning results in input order.
pub fn adjudicate_batch<M: MapGraph + Sync + ?Sized>(
    map: &M,
    batches: Vec<Vec<Order>>,
) -> Vec<Result<Resolution, AdjudicationError>> {
    batches
        .into_par_iter()
        .map_init(|| Adjudicator::new(map), |adj, orders| adj.adjudicate(orders))
        .collect()
}
