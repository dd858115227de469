//! Xilinx packaging metadata.
mod ip_xact;

pub use ip_xact::IpXactBackend;
