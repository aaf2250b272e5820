//! Power-prefixed order notation.
//!
//! Each order is written as the issuing power followed by the unit and
//! its action:
//!
//! ```text
//! france A mar - bur
//! france A gas S A mar - bur
//! italy F tys S F tys H
//! england F nth C A lon - nwy
//! germany A ber H
//! ```
//!
//! Powers are accepted by full name or by their single-letter symbol.
//! Province ids are three letters, unit types `A`/`F`, both case-insensitive.

use thiserror::Error;

use crate::board::order::{Order, OrderKey, OrderKind};
use crate::board::province::{InvalidProvinceCode, Power, ProvinceCode};
use crate::board::unit::{Unit, UnitType};

/// Errors that can occur when parsing order text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("empty input")]
    EmptyInput,

    #[error("unknown power '{0}'")]
    UnknownPower(String),

    #[error("unknown unit type '{0}'")]
    UnknownUnitType(String),

    #[error(transparent)]
    InvalidProvince(#[from] InvalidProvinceCode),

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("unexpected end of input, expected {0}")]
    UnexpectedEnd(&'static str),

    #[error("unexpected token '{found}', expected {expected}")]
    UnexpectedToken { expected: &'static str, found: String },

    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<NotationError>,
    },
}

/// Cursor over the whitespace-separated tokens of one order.
struct Tokens<'a> {
    items: Vec<&'a str>,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(s: &'a str) -> Self {
        Tokens {
            items: s.split_whitespace().collect(),
            pos: 0,
        }
    }

    fn next(&mut self, expected: &'static str) -> Result<&'a str, NotationError> {
        let token = self
            .items
            .get(self.pos)
            .copied()
            .ok_or(NotationError::UnexpectedEnd(expected))?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, want: &str, expected: &'static str) -> Result<(), NotationError> {
        let token = self.next(expected)?;
        if token.eq_ignore_ascii_case(want) {
            Ok(())
        } else {
            Err(NotationError::UnexpectedToken {
                expected,
                found: token.to_string(),
            })
        }
    }

    fn finish(&self) -> Result<(), NotationError> {
        match self.items.get(self.pos) {
            None => Ok(()),
            Some(extra) => Err(NotationError::UnexpectedToken {
                expected: "end of order",
                found: extra.to_string(),
            }),
        }
    }

    fn unit_type(&mut self) -> Result<UnitType, NotationError> {
        let token = self.next("unit type (A or F)")?;
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                UnitType::from_char(c).ok_or_else(|| NotationError::UnknownUnitType(token.to_string()))
            }
            _ => Err(NotationError::UnknownUnitType(token.to_string())),
        }
    }

    fn province(&mut self) -> Result<ProvinceCode, NotationError> {
        Ok(ProvinceCode::new(self.next("province")?)?)
    }

    /// Parses the `A mar - bur` / `F tys H` form of a target order.
    fn target(&mut self) -> Result<OrderKey, NotationError> {
        let unit_type = self.unit_type()?;
        let province = self.province()?;
        match self.next("H or - after target unit")? {
            "H" | "h" => Ok(OrderKey::stationary(unit_type, province)),
            "-" => Ok(OrderKey::movement(unit_type, province, self.province()?)),
            other => Err(NotationError::UnexpectedToken {
                expected: "H or -",
                found: other.to_string(),
            }),
        }
    }
}

/// Parses a single order such as `france A gas S A mar - bur`.
pub fn parse_order(s: &str) -> Result<Order, NotationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(NotationError::EmptyInput);
    }
    let mut tokens = Tokens::new(s);

    let power_token = tokens.next("power")?;
    let power = Power::parse(power_token)
        .ok_or_else(|| NotationError::UnknownPower(power_token.to_string()))?;
    let unit_type = tokens.unit_type()?;
    let province = tokens.province()?;
    let unit = Unit::new(unit_type, power, province);

    let order = match tokens.next("action (H, -, S, C)")? {
        "H" | "h" => Order::hold(unit),
        "-" => Order::move_to(unit, tokens.province()?),
        "S" | "s" => Order::support(unit, tokens.target()?),
        "C" | "c" => {
            // Only armies are convoyed, and only along a move.
            tokens.expect("A", "A (convoyed army)")?;
            let from = tokens.province()?;
            tokens.expect("-", "- (convoy route)")?;
            let to = tokens.province()?;
            Order::convoy(unit, OrderKey::movement(UnitType::Army, from, to))
        }
        other => return Err(NotationError::UnknownAction(other.to_string())),
    };
    tokens.finish()?;
    Ok(order)
}

/// Parses a block of orders, one per line or separated by `;`.
///
/// Blank lines and anything after `#` are ignored. Errors carry the
/// 1-based line number.
pub fn parse_orders(s: &str) -> Result<Vec<Order>, NotationError> {
    let mut orders = Vec::new();
    for (idx, line) in s.lines().enumerate() {
        let content = line.split('#').next().unwrap_or_default();
        for part in content.split(';') {
            if part.trim().is_empty() {
                continue;
            }
            let order = parse_order(part).map_err(|e| NotationError::AtLine {
                line: idx + 1,
                source: Box::new(e),
            })?;
            orders.push(order);
        }
    }
    Ok(orders)
}

/// Formats an order in canonical notation, e.g. `france A gas S A mar - bur`.
pub fn format_order(order: &Order) -> String {
    let unit = format!(
        "{} {} {}",
        order.unit.power,
        order.unit.unit_type.notation_char(),
        order.unit.province
    );
    match order.kind {
        OrderKind::Hold => format!("{unit} H"),
        OrderKind::Move { dest } => format!("{unit} - {dest}"),
        OrderKind::Support { target } => format!("{unit} S {target}"),
        OrderKind::Convoy { target } => format!("{unit} C {target}"),
    }
}

/// Formats orders one per line.
pub fn format_orders(orders: &[Order]) -> String {
    orders.iter().map(format_order).collect::<Vec<_>>().join("\n")
}
