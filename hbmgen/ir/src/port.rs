use hbmgen_utils::{Error, GenResult};
use serde::Serialize;
use std::fmt;

/// Index of one instance of the repeated AXI port.
///
/// Displays zero-padded to two digits, which is how the index appears inside
/// signal names (`AXI_07_ARADDR`). Use [PortIdx::index] where the plain
/// number is needed, e.g. as an array index into a VHDL package array.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
#[serde(transparent)]
pub struct PortIdx(u32);

impl PortIdx {
    pub const fn new(idx: u32) -> Self {
        Self(idx)
    }

    /// The unpadded index.
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Name of the AXI port with this index, e.g. `AXI_07`.
    pub fn axi(self) -> String {
        format!("AXI_{self}")
    }

    /// The port `delta` positions away from this one.
    pub fn offset(self, delta: i64) -> GenResult<PortIdx> {
        let target = i64::from(self.0) + delta;
        u32::try_from(target).map(PortIdx).map_err(|_| {
            Error::invalid_range(format!(
                "port {} shifted by {delta} is not a valid port index",
                self.0
            ))
        })
    }
}

impl fmt::Display for PortIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// An inclusive range of port indices, `first..=last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortRange {
    first: u32,
    last: u32,
}

impl PortRange {
    /// Construct a range, rejecting empty ones.
    pub fn new(first: u32, last: u32) -> GenResult<Self> {
        Self::inclusive(first, last).checked()
    }

    /// Construct a range without checking it. Used for the literal defaults.
    pub(crate) const fn inclusive(first: u32, last: u32) -> Self {
        Self { first, last }
    }

    /// Returns the range unchanged if it contains at least one port.
    pub fn checked(self) -> GenResult<Self> {
        if self.is_empty() {
            return Err(Error::invalid_range(format!(
                "first port {} is after last port {}",
                self.first, self.last
            )));
        }
        Ok(self)
    }

    pub fn first(&self) -> PortIdx {
        PortIdx(self.first)
    }

    pub fn last(&self) -> PortIdx {
        PortIdx(self.last)
    }

    /// Builder style method that moves the start of the range.
    pub fn with_first(mut self, first: u32) -> Self {
        self.first = first;
        self
    }

    /// Builder style method that moves the end of the range.
    pub fn with_last(mut self, last: u32) -> Self {
        self.last = last;
        self
    }

    /// Number of ports in the range.
    pub fn len(&self) -> usize {
        if self.first > self.last {
            0
        } else {
            (self.last - self.first) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, port: PortIdx) -> bool {
        (self.first..=self.last).contains(&port.0)
    }

    /// Iterate over the ports in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = PortIdx> + use<> {
        (self.first..=self.last).map(PortIdx)
    }
}

impl fmt::Display for PortRange {
    /// Formats as `AXI_00..AXI_15`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.first().axi(), self.last().axi())
    }
}
