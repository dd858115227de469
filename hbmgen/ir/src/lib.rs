//! Static description of the HBM AXI bus: signal descriptor tables, port
//! indices and the declarative configuration table shared by every generator.
mod config;
mod layout;
mod port;
mod signal;

pub use config::{
    BusWidths, ClockConfig, HbmConfig, RangeKey, Ranges, SelectConfig,
    SelectMode, TfheConfig, show_freq,
};
pub use layout::{Row, Tie};
pub use port::{PortIdx, PortRange};
pub use signal::{
    AXI_SIGNALS, Category, Channel, Direction, Side, SignalDescriptor, Width,
    channel_signals, lookup,
};
