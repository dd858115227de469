//! Backends for the hbmgen driver. Each backend expands one template over a
//! range of HBM AXI ports.
mod backend_opt;
mod expander;
mod traits;
pub mod verilog;
pub mod vhdl;

pub use backend_opt::BackendOpt;
pub use expander::{Block, Expander, write_blocks, write_lines};
pub use traits::Backend;

#[cfg(feature = "xilinx")]
pub mod xilinx;
