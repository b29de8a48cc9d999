//! Operand parsing and address-mode resolution.
//!
//! An operand token is zero or more `*` markers followed by a decimal literal.
//! The marker count selects the addressing mode:
//!
//! | markers | mode      | address                          | value             |
//! |---------|-----------|----------------------------------|-------------------|
//! | 0       | immediate | literal                          | literal           |
//! | 1       | direct    | literal                          | `r[literal]`      |
//! | k >= 2  | indirect  | `k - 1` lookups from the literal | `r[address]`      |
//!
//! So `**3` designates register `r[3]` and yields `r[r[3]]`. Address and value
//! walk the same chain; the value is always one lookup past the address once
//! any marker is present.

use std::fmt;
use std::str::FromStr;

use crate::registers::{Address, RegisterStore, Value};
use crate::CompileErrorKind;

/// Marker that adds one level of indirection.
pub const INDIRECTION_MARKER: char = '*';

/// Deepest indirection chain accepted by the parser.
pub const MAX_INDIRECTION_DEPTH: u32 = 32;

/// Addressing mode selected by the marker count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// No markers: the literal is the value.
    Immediate,
    /// One marker: the literal names the register.
    Direct,
    /// Two or more markers: registers hold the address.
    Indirect,
}

/// An indirection chain passed through a register holding a negative number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegativeAddress(pub Value);

/// Both projections of an operand against the current register contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    /// Register the operand designates.
    pub address: Address,
    /// Number the operand yields when read.
    pub value: Value,
}

/// A parsed operand: a literal index plus an indirection count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Operand {
    literal: Address,
    dereference_count: u32,
}

impl Default for Operand {
    fn default() -> Self {
        Self::immediate(0)
    }
}

impl Operand {
    /// Builds an operand from its parts.
    #[must_use]
    pub const fn new(literal: Address, dereference_count: u32) -> Self {
        Self {
            literal,
            dereference_count,
        }
    }

    /// An operand with no markers.
    #[must_use]
    pub const fn immediate(literal: Address) -> Self {
        Self::new(literal, 0)
    }

    /// The trailing integer literal.
    #[must_use]
    pub const fn literal_index(&self) -> Address {
        self.literal
    }

    /// Number of leading indirection markers.
    #[must_use]
    pub const fn dereference_count(&self) -> u32 {
        self.dereference_count
    }

    /// Addressing mode implied by the marker count.
    #[must_use]
    pub const fn mode(&self) -> AddressingMode {
        match self.dereference_count {
            0 => AddressingMode::Immediate,
            1 => AddressingMode::Direct,
            _ => AddressingMode::Indirect,
        }
    }

    /// Whether any indirection marker is present.
    #[must_use]
    pub const fn is_indirect(&self) -> bool {
        self.dereference_count > 0
    }

    /// Register address designated by the operand.
    ///
    /// # Errors
    ///
    /// Returns [`NegativeAddress`] when a register on the chain holds a
    /// negative number.
    pub fn address(&self, registers: &RegisterStore) -> Result<Address, NegativeAddress> {
        let mut address = self.literal;
        for _ in 1..self.dereference_count {
            address = to_address(registers.get(address))?;
        }
        Ok(address)
    }

    /// Number the operand yields when read.
    ///
    /// # Errors
    ///
    /// Returns [`NegativeAddress`] when a register on the chain holds a
    /// negative number.
    pub fn value(&self, registers: &RegisterStore) -> Result<Value, NegativeAddress> {
        if self.dereference_count == 0 {
            return Ok(self.immediate_value());
        }
        Ok(registers.get(self.address(registers)?))
    }

    /// Computes address and value in one pass over the chain.
    ///
    /// # Errors
    ///
    /// Returns [`NegativeAddress`] when a register on the chain holds a
    /// negative number.
    pub fn resolve(&self, registers: &RegisterStore) -> Result<Resolved, NegativeAddress> {
        let address = self.address(registers)?;
        let value = if self.dereference_count == 0 {
            self.immediate_value()
        } else {
            registers.get(address)
        };
        Ok(Resolved { address, value })
    }

    fn immediate_value(&self) -> Value {
        // The parser caps literals at `Value::MAX`.
        Value::try_from(self.literal).unwrap_or(Value::MAX)
    }
}

fn to_address(value: Value) -> Result<Address, NegativeAddress> {
    Address::try_from(value).map_err(|_| NegativeAddress(value))
}

impl FromStr for Operand {
    type Err = CompileErrorKind;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || CompileErrorKind::InvalidOperand(token.to_string());

        let digits = token.trim_start_matches(INDIRECTION_MARKER);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let markers = u32::try_from(token.len() - digits.len()).map_err(|_| invalid())?;
        if markers > MAX_INDIRECTION_DEPTH {
            return Err(invalid());
        }

        let literal = digits.parse::<Value>().map_err(|_| invalid())?;
        let literal = Address::try_from(literal).map_err(|_| invalid())?;

        Ok(Self::new(literal, markers))
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.dereference_count {
            write!(f, "{INDIRECTION_MARKER}")?;
        }
        write!(f, "{}", self.literal)
    }
}

#[cfg(test)]
mod tests {
    use super::{AddressingMode, NegativeAddress, Operand, Resolved, MAX_INDIRECTION_DEPTH};
    use crate::{CompileErrorKind, RegisterStore};

    fn registers(pairs: &[(u64, i64)]) -> RegisterStore {
        let mut store = RegisterStore::new();
        for &(address, value) in pairs {
            store.set(address, value);
        }
        store
    }

    #[test]
    fn parses_markers_and_literal() {
        let operand: Operand = "**12".parse().expect("valid operand");
        assert_eq!(operand.literal_index(), 12);
        assert_eq!(operand.dereference_count(), 2);
        assert_eq!(operand.mode(), AddressingMode::Indirect);
        assert_eq!(operand.to_string(), "**12");
    }

    #[test]
    fn rejects_malformed_tokens() {
        for token in ["", "*", "x1", "1*", "-3", "*+2", "1.5", "* 1", "99999999999999999999"] {
            let err = token
                .parse::<Operand>()
                .expect_err("malformed operand must be rejected");
            assert_eq!(err, CompileErrorKind::InvalidOperand(token.to_string()));
        }
    }

    #[test]
    fn rejects_chains_deeper_than_the_cap() {
        let at_cap = format!("{}1", "*".repeat(MAX_INDIRECTION_DEPTH as usize));
        let over_cap = format!("*{at_cap}");
        assert!(at_cap.parse::<Operand>().is_ok());
        assert!(over_cap.parse::<Operand>().is_err());
    }

    #[test]
    fn immediate_operand_ignores_register_contents() {
        let store = registers(&[(5, 99)]);
        let operand = Operand::immediate(5);
        assert_eq!(
            operand.resolve(&store),
            Ok(Resolved {
                address: 5,
                value: 5
            })
        );
    }

    #[test]
    fn direct_operand_reads_named_register() {
        let store = registers(&[(5, 99)]);
        let operand = Operand::new(5, 1);
        assert_eq!(operand.address(&store), Ok(5));
        assert_eq!(operand.value(&store), Ok(99));
    }

    #[test]
    fn each_extra_marker_follows_one_more_register() {
        // r1 -> 2, r2 -> 3, r3 -> 40
        let store = registers(&[(1, 2), (2, 3), (3, 40)]);

        let two = Operand::new(1, 2);
        assert_eq!(two.address(&store), Ok(2));
        assert_eq!(two.value(&store), Ok(3));

        let three = Operand::new(1, 3);
        assert_eq!(three.address(&store), Ok(3));
        assert_eq!(three.value(&store), Ok(40));
    }

    #[test]
    fn self_referential_chain_terminates() {
        let store = registers(&[(7, 7)]);
        let operand = Operand::new(7, MAX_INDIRECTION_DEPTH);
        assert_eq!(operand.address(&store), Ok(7));
        assert_eq!(operand.value(&store), Ok(7));
    }

    #[test]
    fn negative_register_on_chain_is_reported() {
        let store = registers(&[(1, -4)]);
        assert_eq!(Operand::new(1, 2).address(&store), Err(NegativeAddress(-4)));
        // Direct reads never use register contents as an address.
        assert_eq!(Operand::new(1, 1).value(&store), Ok(-4));
    }
}
