//! VHDL declarations, port maps and the host/TFHE routing fabric.
mod hbm_inst;
mod hbm_interface;
mod mux_debug;
mod mux_demux;
mod tfhe;

pub use hbm_inst::HbmInstBackend;
pub use hbm_interface::HbmInterfaceBackend;
pub use mux_debug::MuxDebugBackend;
pub use mux_demux::{MuxDemux, MuxDemuxBackend};
pub use tfhe::TfheRoutes;

use hbmgen_ir::{PortIdx, SignalDescriptor};

/// Width of the comment rules between blocks.
const RULE_WIDTH: usize = 50;

/// A `--` comment filled with `fill`.
fn rule(fill: char) -> String {
    format!("-- {}", fill.to_string().repeat(RULE_WIDTH))
}

/// A section header: blank line, rule, title, rule.
fn section(title: &str) -> Vec<String> {
    vec![
        String::new(),
        rule('='),
        format!("-- {title}"),
        rule('='),
    ]
}

/// `-- -------------------- AXI_nn --------------------`
fn port_banner(port: PortIdx) -> String {
    format!("-- -------------------- {} --------------------", port.axi())
}

/// The external port, e.g. `AXI_03_ARADDR`.
fn host(port: PortIdx, sig: &SignalDescriptor) -> String {
    format!("{}_{}", port.axi(), sig.name)
}

/// The internal wire between the fabric and the HBM IP, e.g. `hbm_03_araddr`.
fn hbm(port: PortIdx, sig: &SignalDescriptor) -> String {
    format!("hbm_{port}_{}", sig.field())
}

/// The all-zero value of the signal's type.
fn zero(sig: &SignalDescriptor) -> &'static str {
    if sig.is_scalar() {
        "'0'"
    } else {
        "(others => '0')"
    }
}
