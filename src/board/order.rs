//! Movement-phase orders and their resolution state.
//!
//! Every order is issued by exactly one unit and is addressed by an
//! [`OrderKey`]: the issuing unit plus, for moves, the destination. Supports
//! and convoys name the order they assist by its key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::province::{InvalidProvinceCode, ProvinceCode};
use super::unit::{Unit, UnitType};

/// Errors from parsing a compact order key such as `a-mar-bur`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("malformed order key '{0}'")]
    Malformed(String),

    #[error("unknown unit type in order key '{0}'")]
    UnknownUnitType(String),

    #[error(transparent)]
    Province(#[from] InvalidProvinceCode),
}

/// Identifies an order by its issuing unit and, for moves, its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderKey {
    pub unit_type: UnitType,
    pub province: ProvinceCode,
    pub dest: Option<ProvinceCode>,
}

impl OrderKey {
    /// Key of a non-move order (hold, support or convoy) issued by the unit.
    pub fn stationary(unit_type: UnitType, province: ProvinceCode) -> Self {
        OrderKey {
            unit_type,
            province,
            dest: None,
        }
    }

    /// Key of a move order.
    pub fn movement(unit_type: UnitType, province: ProvinceCode, dest: ProvinceCode) -> Self {
        OrderKey {
            unit_type,
            province,
            dest: Some(dest),
        }
    }

    /// Renders the compact form, e.g. `a-mar-bur` or `f-tys`.
    pub fn compact(&self) -> String {
        match self.dest {
            Some(dest) => format!("{}-{}-{}", self.unit_type.key_char(), self.province, dest),
            None => format!("{}-{}", self.unit_type.key_char(), self.province),
        }
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dest {
            Some(dest) => write!(f, "{} {} - {}", self.unit_type.notation_char(), self.province, dest),
            None => write!(f, "{} {} H", self.unit_type.notation_char(), self.province),
        }
    }
}

impl FromStr for OrderKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('-').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(KeyError::Malformed(s.to_string()));
        }
        let mut type_chars = parts[0].chars();
        let unit_type = match (type_chars.next(), type_chars.next()) {
            (Some(c), None) => {
                UnitType::from_char(c).ok_or_else(|| KeyError::UnknownUnitType(s.to_string()))?
            }
            _ => return Err(KeyError::UnknownUnitType(s.to_string())),
        };
        let province = ProvinceCode::new(parts[1])?;
        let dest = match parts.get(2) {
            Some(d) => Some(ProvinceCode::new(d)?),
            None => None,
        };
        Ok(OrderKey {
            unit_type,
            province,
            dest,
        })
    }
}

impl TryFrom<String> for OrderKey {
    type Error = KeyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<OrderKey> for String {
    fn from(key: OrderKey) -> String {
        key.compact()
    }
}

/// What an order asks its unit to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum OrderKind {
    /// Hold: `A vie H`
    Hold,

    /// Move: `A bud - rum`
    Move { dest: ProvinceCode },

    /// Support: `A gal S A bud - rum` or `A tyr S A vie H`
    Support { target: OrderKey },

    /// Convoy: `F mao C A bre - spa`
    Convoy { target: OrderKey },
}

/// Resolution status of an order.
///
/// Every order starts `Unresolved`. Holds and moves end `Succeeded`,
/// `Failed`, `Dislodged` or (for moves with no route) `Rejected`; supports and
/// convoys end `Applied`, `Rejected`, `Cut`, `Unmatched` or `Dislodged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Unresolved,
    Succeeded,
    Failed,
    Dislodged,
    Applied,
    Rejected,
    Cut,
    Unmatched,
}

impl OrderStatus {
    /// Returns the lowercase label used in text output.
    pub const fn label(self) -> &'static str {
        match self {
            OrderStatus::Unresolved => "unresolved",
            OrderStatus::Succeeded => "succeeded",
            OrderStatus::Failed => "failed",
            OrderStatus::Dislodged => "dislodged",
            OrderStatus::Applied => "applied",
            OrderStatus::Rejected => "rejected",
            OrderStatus::Cut => "cut",
            OrderStatus::Unmatched => "unmatched",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An order together with its per-run resolution state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub unit: Unit,
    pub kind: OrderKind,
    pub status: OrderStatus,
    /// Number of applied supports. Only meaningful for holds and moves.
    pub support_count: i32,
    /// Set when the unit is dislodged: the attacker's origin province.
    pub retreat_prohibition: Option<ProvinceCode>,
}

impl Order {
    fn with_kind(unit: Unit, kind: OrderKind) -> Self {
        Order {
            unit,
            kind,
            status: OrderStatus::Unresolved,
            support_count: 0,
            retreat_prohibition: None,
        }
    }

    pub fn hold(unit: Unit) -> Self {
        Order::with_kind(unit, OrderKind::Hold)
    }

    pub fn move_to(unit: Unit, dest: ProvinceCode) -> Self {
        Order::with_kind(unit, OrderKind::Move { dest })
    }

    pub fn support(unit: Unit, target: OrderKey) -> Self {
        Order::with_kind(unit, OrderKind::Support { target })
    }

    pub fn convoy(unit: Unit, target: OrderKey) -> Self {
        Order::with_kind(unit, OrderKind::Convoy { target })
    }

    /// Returns the key other orders use to refer to this one.
    pub fn key(&self) -> OrderKey {
        OrderKey {
            unit_type: self.unit.unit_type,
            province: self.unit.province,
            dest: self.dest(),
        }
    }

    /// Destination of a move, `None` for every other order.
    pub fn dest(&self) -> Option<ProvinceCode> {
        match self.kind {
            OrderKind::Move { dest } => Some(dest),
            _ => None,
        }
    }

    /// Target key of a support or convoy.
    pub fn target(&self) -> Option<OrderKey> {
        match self.kind {
            OrderKind::Support { target } | OrderKind::Convoy { target } => Some(target),
            _ => None,
        }
    }

    pub fn is_move(&self) -> bool {
        matches!(self.kind, OrderKind::Move { .. })
    }

    pub fn is_support(&self) -> bool {
        matches!(self.kind, OrderKind::Support { .. })
    }

    pub fn is_convoy(&self) -> bool {
        matches!(self.kind, OrderKind::Convoy { .. })
    }

    pub fn is_unresolved(&self) -> bool {
        self.status == OrderStatus::Unresolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::province::Power;

    fn p(code: &str) -> ProvinceCode {
        ProvinceCode::new(code).unwrap()
    }

    #[test]
    fn move_key_includes_destination() {
        let order = Order::move_to(Unit::army(Power::France, p("mar")), p("bur"));
        assert_eq!(order.key(), OrderKey::movement(UnitType::Army, p("mar"), p("bur")));
        assert_eq!(order.key().compact(), "a-mar-bur");
        assert_eq!(order.key().to_string(), "A mar - bur");
    }

    #[test]
    fn stationary_orders_share_hold_key() {
        let unit = Unit::fleet(Power::Italy, p("tys"));
        let hold = Order::hold(unit);
        let convoy = Order::convoy(unit, OrderKey::movement(UnitType::Army, p("tun"), p("nap")));
        assert_eq!(hold.key(), convoy.key());
        assert_eq!(hold.key().compact(), "f-tys");
        assert_eq!(hold.key().to_string(), "F tys H");
    }

    #[test]
    fn compact_key_parses() {
        let key: OrderKey = "a-mar-bur".parse().unwrap();
        assert_eq!(key, OrderKey::movement(UnitType::Army, p("mar"), p("bur")));
        let key: OrderKey = "F-TYS".parse().unwrap();
        assert_eq!(key, OrderKey::stationary(UnitType::Fleet, p("tys")));
    }

    #[test]
    fn malformed_keys_are_rejected() {
        assert_eq!("a".parse::<OrderKey>(), Err(KeyError::Malformed("a".to_string())));
        assert!(matches!("x-mar".parse::<OrderKey>(), Err(KeyError::UnknownUnitType(_))));
        assert!(matches!("a-marseille".parse::<OrderKey>(), Err(KeyError::Province(_))));
        assert!("a-mar-bur-par".parse::<OrderKey>().is_err());
    }

    #[test]
    fn new_orders_start_unresolved() {
        let order = Order::support(
            Unit::army(Power::France, p("gas")),
            OrderKey::movement(UnitType::Army, p("mar"), p("bur")),
        );
        assert_eq!(order.status, OrderStatus::Unresolved);
        assert_eq!(order.support_count, 0);
        assert_eq!(order.retreat_prohibition, None);
        assert!(order.is_support());
        assert_eq!(order.dest(), None);
    }

    #[test]
    fn order_serializes_with_action_tag() {
        let order = Order::move_to(Unit::army(Power::Germany, p("ber")), p("sil"));
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["kind"]["action"], "move");
        assert_eq!(json["kind"]["dest"], "sil");
        assert_eq!(json["status"], "UNRESOLVED");
        let back: Order = serde_json::from_value(json).unwrap();
        assert_eq!(back, order);
    }
}
