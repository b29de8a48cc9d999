use std::collections::BTreeMap;
use std::fmt;

/// Register address. Address 0 is the accumulator.
pub type Address = u64;
/// Register content.
pub type Value = i64;

/// Address of the accumulator.
pub const ACCUMULATOR: Address = 0;

/// Sparse register file for one simulation session.
///
/// Unset registers read as 0. The accumulator entry always exists and is never
/// removed, so a fresh store renders as `{0=0}`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterStore {
    cells: BTreeMap<Address, Value>,
}

impl Default for RegisterStore {
    fn default() -> Self {
        Self {
            cells: BTreeMap::from([(ACCUMULATOR, 0)]),
        }
    }
}

impl RegisterStore {
    /// Creates a store holding only a zeroed accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a register; unset registers read as 0.
    #[must_use]
    pub fn get(&self, address: Address) -> Value {
        self.cells.get(&address).copied().unwrap_or(0)
    }

    /// Writes a register.
    pub fn set(&mut self, address: Address, value: Value) {
        self.cells.insert(address, value);
    }

    /// Reads the accumulator.
    #[must_use]
    pub fn accumulator(&self) -> Value {
        self.get(ACCUMULATOR)
    }

    /// Writes the accumulator.
    pub fn set_accumulator(&mut self, value: Value) {
        self.set(ACCUMULATOR, value);
    }

    /// Copies the accumulator into `address`.
    pub fn store_accumulator(&mut self, address: Address) {
        self.set(address, self.accumulator());
    }

    /// Iterates explicitly written registers in address order.
    pub fn iter(&self) -> impl Iterator<Item = (Address, Value)> + '_ {
        self.cells.iter().map(|(address, value)| (*address, *value))
    }

    /// Number of explicitly written registers, accumulator included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: the accumulator is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl fmt::Display for RegisterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (address, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{address}={value}")?;
        }
        f.write_str("}")
    }
}
