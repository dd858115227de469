//! Verilog port lists, instance connections and sideband tie-offs.
mod axi_meta;
mod block_inst;
mod sideband;

pub use axi_meta::AxiMetaBackend;
pub use block_inst::BlockInstBackend;
pub use sideband::{SidebandPortsBackend, SidebandTieoffBackend};

use hbmgen_ir::{BusWidths, PortIdx, SignalDescriptor};

/// Width of the dashed comment rules between blocks.
const RULE_WIDTH: usize = 50;

/// A `//` comment of dashes.
fn rule(indent: &str, width: usize) -> String {
    format!("{indent}// {}", "-".repeat(width))
}

/// The full port name of `sig`, e.g. `AXI_03_ARADDR`.
fn port_signal(port: PortIdx, sig: &SignalDescriptor) -> String {
    format!("{}_{}", port.axi(), sig.name)
}

/// `input [32:0]AXI_03_ARADDR`. Scalars carry no range.
fn declaration(
    port: PortIdx,
    sig: &SignalDescriptor,
    bus: &BusWidths,
) -> String {
    format!(
        "{} {}{}",
        sig.direction.verilog(),
        sig.width.verilog_range(bus).unwrap_or_default(),
        port_signal(port, sig)
    )
}
