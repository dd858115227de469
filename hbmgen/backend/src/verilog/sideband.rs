//! Sideband signals (protection, cache, lock and QoS) that the HBM ports do
//! not consume: port declarations, and tie-offs that reduce each to a wire.
use super::{RULE_WIDTH, port_signal, rule};
use crate::expander::{Block, Expander, write_blocks};
use crate::traits::Backend;
use hbmgen_ir::{
    Channel, Direction, HbmConfig, PortIdx, RangeKey, SignalDescriptor,
    channel_signals,
};
use hbmgen_utils::GenResult;
use std::io::Write;

fn sideband() -> impl Iterator<Item = &'static SignalDescriptor> {
    channel_signals(Channel::Sideband, Direction::Input)
}

/// `input  wire [2:0] AXI_nn_ARPROT,` declarations.
#[derive(Default)]
pub struct SidebandPortsBackend;

impl SidebandPortsBackend {
    pub fn blocks(&self, conf: &HbmConfig) -> GenResult<Vec<Block>> {
        let range = conf.ranges.get(RangeKey::Sideband);
        Expander::new(range).expand(|port, block| {
            block.line(rule("", RULE_WIDTH));
            block.line(format!("// {} sideband signals", port.axi()));
            block.line(rule("", RULE_WIDTH));
            for sig in sideband() {
                block.line(format!(
                    "{:<6} wire {:<5} {},",
                    sig.direction.verilog(),
                    sig.width.verilog_range(&conf.bus).unwrap_or_default(),
                    port_signal(port, sig)
                ));
            }
            block.gap();
            Ok(())
        })
    }
}

impl Backend for SidebandPortsBackend {
    fn name(&self) -> &'static str {
        "sideband-ports"
    }

    fn range_key(&self) -> RangeKey {
        RangeKey::Sideband
    }

    fn emit(&self, conf: &HbmConfig, out: &mut dyn Write) -> GenResult<()> {
        write_blocks(out, &self.blocks(conf)?)?;
        Ok(())
    }
}

/// Vectors are AND-reduced to one bit, scalars are taken as is.
fn tieoff(port: PortIdx, sig: &SignalDescriptor) -> String {
    let reduce = if sig.is_scalar() { "" } else { "&" };
    format!(
        "wire _unused_axi_{port}_{:<7} = {reduce}{};",
        sig.field(),
        port_signal(port, sig)
    )
}

/// `wire _unused_axi_nn_arprot  = &AXI_nn_ARPROT;` tie-offs.
#[derive(Default)]
pub struct SidebandTieoffBackend;

impl SidebandTieoffBackend {
    pub fn blocks(&self, conf: &HbmConfig) -> GenResult<Vec<Block>> {
        let range = conf.ranges.get(RangeKey::Sideband);
        Expander::new(range).expand(|port, block| {
            block.line(format!("// {} sideband unused tie-offs", port.axi()));
            sideband().for_each(|sig| block.line(tieoff(port, sig)));
            block.gap();
            Ok(())
        })
    }
}

impl Backend for SidebandTieoffBackend {
    fn name(&self) -> &'static str {
        "sideband-tieoff"
    }

    fn range_key(&self) -> RangeKey {
        RangeKey::Sideband
    }

    fn emit(&self, conf: &HbmConfig, out: &mut dyn Write) -> GenResult<()> {
        write_blocks(out, &self.blocks(conf)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_port() -> HbmConfig {
        let mut conf = HbmConfig::default();
        conf.ranges.sideband = conf.ranges.sideband.with_first(2).with_last(2);
        conf
    }

    #[test]
    fn port_declarations() {
        let blocks = SidebandPortsBackend.blocks(&one_port()).unwrap();
        assert_eq!(blocks.len(), 1);
        let lines = blocks[0].lines();
        assert_eq!(lines[1], "// AXI_02 sideband signals");
        assert_eq!(lines[3], "input  wire [2:0] AXI_02_ARPROT,");
        assert_eq!(lines[5], "input  wire       AXI_02_ARLOCK,");
        assert_eq!(lines[10], "input  wire [3:0] AXI_02_AWQOS,");
        assert_eq!(lines[11], "");
    }

    #[test]
    fn tieoffs_reduce_vectors() {
        let text = SidebandTieoffBackend.render(&one_port()).unwrap();
        insta::assert_snapshot!(text.trim_end(), @r"
        // AXI_02 sideband unused tie-offs
        wire _unused_axi_02_arprot  = &AXI_02_ARPROT;
        wire _unused_axi_02_arcache = &AXI_02_ARCACHE;
        wire _unused_axi_02_arlock  = AXI_02_ARLOCK;
        wire _unused_axi_02_arqos   = &AXI_02_ARQOS;
        wire _unused_axi_02_awprot  = &AXI_02_AWPROT;
        wire _unused_axi_02_awcache = &AXI_02_AWCACHE;
        wire _unused_axi_02_awlock  = AXI_02_AWLOCK;
        wire _unused_axi_02_awqos   = &AXI_02_AWQOS;
        ");
    }

    #[test]
    fn default_range_covers_all_ports() {
        let conf = HbmConfig::default();
        assert_eq!(SidebandTieoffBackend.blocks(&conf).unwrap().len(), 32);
        assert_eq!(SidebandPortsBackend.blocks(&conf).unwrap().len(), 32);
    }
}
