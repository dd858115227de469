use crate::traits::Backend;
use crate::{verilog, vhdl};
use itertools::Itertools;
use std::fmt::{self, Display};
use std::str::FromStr;

/// Enumeration of valid backends
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendOpt {
    AxiMeta,
    BlockInst,
    SidebandPorts,
    SidebandTieoff,
    HbmInterface,
    HbmInst,
    #[default]
    MuxDemux,
    MuxDebug,
    #[cfg(feature = "xilinx")]
    IpXact,
}

/// Return a vector that maps strings to Backends.
#[inline(always)]
fn backends() -> Vec<(&'static str, BackendOpt)> {
    vec![
        ("axi-meta", BackendOpt::AxiMeta),
        ("block-inst", BackendOpt::BlockInst),
        ("sideband-ports", BackendOpt::SidebandPorts),
        ("sideband-tieoff", BackendOpt::SidebandTieoff),
        ("hbm-interface", BackendOpt::HbmInterface),
        ("hbm-inst", BackendOpt::HbmInst),
        ("mux-demux", BackendOpt::MuxDemux),
        ("mux-debug", BackendOpt::MuxDebug),
        #[cfg(feature = "xilinx")]
        ("ip-xact", BackendOpt::IpXact),
    ]
}

impl BackendOpt {
    /// Every backend, in listing order.
    pub fn all() -> impl Iterator<Item = BackendOpt> {
        backends().into_iter().map(|(_, opt)| opt)
    }

    /// Comma-separated names of all backends.
    pub fn show_names() -> String {
        backends().iter().map(|(name, _)| *name).join(", ")
    }

    /// Instantiate the generator for this option.
    pub fn backend(&self) -> Box<dyn Backend> {
        match self {
            Self::AxiMeta => Box::new(verilog::AxiMetaBackend),
            Self::BlockInst => Box::new(verilog::BlockInstBackend),
            Self::SidebandPorts => Box::new(verilog::SidebandPortsBackend),
            Self::SidebandTieoff => Box::new(verilog::SidebandTieoffBackend),
            Self::HbmInterface => Box::new(vhdl::HbmInterfaceBackend),
            Self::HbmInst => Box::new(vhdl::HbmInstBackend),
            Self::MuxDemux => Box::new(vhdl::MuxDemuxBackend),
            Self::MuxDebug => Box::new(vhdl::MuxDebugBackend),
            #[cfg(feature = "xilinx")]
            Self::IpXact => Box::new(crate::xilinx::IpXactBackend),
        }
    }
}

/// Command line parsing for the Backend enum
impl FromStr for BackendOpt {
    type Err = String;
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let backends = backends();
        backends
            .iter()
            .find(|(name, _)| &input == name)
            .map(|(_, opt)| *opt)
            .ok_or_else(|| {
                format!(
                    "`{}` is not a valid backend.\nValid backends: {}",
                    input,
                    Self::show_names()
                )
            })
    }
}

impl Display for BackendOpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AxiMeta => "axi-meta",
            Self::BlockInst => "block-inst",
            Self::SidebandPorts => "sideband-ports",
            Self::SidebandTieoff => "sideband-tieoff",
            Self::HbmInterface => "hbm-interface",
            Self::HbmInst => "hbm-inst",
            Self::MuxDemux => "mux-demux",
            Self::MuxDebug => "mux-debug",
            #[cfg(feature = "xilinx")]
            Self::IpXact => "ip-xact",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for opt in BackendOpt::all() {
            let name = opt.to_string();
            assert_eq!(name.parse::<BackendOpt>().unwrap(), opt);
            assert_eq!(opt.backend().name(), name);
        }
    }

    #[test]
    fn unknown_backend_lists_valid_ones() {
        let err = "vhdl".parse::<BackendOpt>().unwrap_err();
        assert!(err.starts_with("`vhdl` is not a valid backend."));
        assert!(err.contains("mux-demux"));
        assert!(err.contains("sideband-tieoff"));
    }

    #[test]
    fn default_is_mux_demux() {
        assert_eq!(BackendOpt::default(), BackendOpt::MuxDemux);
    }
}
