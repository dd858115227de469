use crate::signal::{SignalDescriptor, lookup};
use hbmgen_utils::GenResult;

/// How a signal in a layout is connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tie {
    /// Connected to the corresponding signal on the other side.
    Live,
    /// Left unconnected; rendered as the dialect's open sentinel.
    Open,
}

/// One row of a per-port layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Signal(&'static str, Tie),
    /// A blank separator line.
    Gap,
}

impl Row {
    pub const fn live(name: &'static str) -> Self {
        Row::Signal(name, Tie::Live)
    }

    pub const fn open(name: &'static str) -> Self {
        Row::Signal(name, Tie::Open)
    }

    /// Resolve every signal row of `rows` against the descriptor table.
    pub fn resolve_all(
        rows: &[Row],
    ) -> GenResult<Vec<(&'static SignalDescriptor, Tie)>> {
        rows.iter()
            .filter_map(|row| match row {
                Row::Signal(name, tie) => Some((name, tie)),
                Row::Gap => None,
            })
            .map(|(name, tie)| Ok((lookup(name)?, *tie)))
            .collect()
    }
}
