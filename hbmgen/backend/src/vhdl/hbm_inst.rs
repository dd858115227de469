//! Port map associations that forward one range of HBM ports onto another,
//! e.g. the first HBM stack's ports onto the second's.
use super::RULE_WIDTH;
use crate::expander::{Block, Expander, write_blocks};
use crate::traits::Backend;
use hbmgen_ir::{HbmConfig, RangeKey, Row, Tie, lookup};
use hbmgen_utils::GenResult;
use std::io::Write;

const LAYOUT: &[Row] = &[
    Row::live("ARADDR"),
    Row::live("ARBURST"),
    Row::live("ARID"),
    Row::live("ARLEN"),
    Row::live("ARSIZE"),
    Row::live("ARVALID"),
    Row::live("ARREADY"),
    Row::Gap,
    Row::live("AWADDR"),
    Row::live("AWBURST"),
    Row::live("AWID"),
    Row::live("AWLEN"),
    Row::live("AWSIZE"),
    Row::live("AWVALID"),
    Row::live("AWREADY"),
    Row::Gap,
    Row::live("RREADY"),
    Row::live("BREADY"),
    Row::live("WDATA"),
    Row::live("WLAST"),
    Row::live("WSTRB"),
    Row::open("WDATA_PARITY"),
    Row::live("WVALID"),
    Row::live("WREADY"),
    Row::Gap,
    Row::live("RDATA"),
    Row::open("RDATA_PARITY"),
    Row::live("RID"),
    Row::live("RLAST"),
    Row::live("RRESP"),
    Row::live("RVALID"),
    Row::Gap,
    Row::live("BID"),
    Row::live("BRESP"),
    Row::live("BVALID"),
];

/// `AXI_00_ARADDR => AXI_16_ARADDR,` associations. The source port runs
/// over the range and the destination is shifted to start at `remap-dst`.
#[derive(Default)]
pub struct HbmInstBackend;

impl HbmInstBackend {
    pub fn blocks(&self, conf: &HbmConfig) -> GenResult<Vec<Block>> {
        let range = conf.ranges.get(RangeKey::HbmInst);
        let offset = conf.remap_offset();
        let rule = format!("\t\t\t-- {}", "-".repeat(RULE_WIDTH));
        Expander::new(range).expand(|src, block| {
            let dst = src.offset(offset)?;
            block.line(rule.clone());
            block.line(format!("\t\t\t-- {}", src.axi()));
            block.line(rule.clone());
            for row in LAYOUT {
                let Row::Signal(name, tie) = row else {
                    block.gap();
                    continue;
                };
                let sig = lookup(name)?;
                let lhs = format!("{}_{}", src.axi(), sig.name);
                let rhs = match tie {
                    Tie::Open => "open".to_string(),
                    Tie::Live => format!("{}_{}", dst.axi(), sig.name),
                };
                block.line(format!("\t\t\t{lhs:<22} => {rhs},"));
            }
            block.gap();
            Ok(())
        })
    }
}

impl Backend for HbmInstBackend {
    fn name(&self) -> &'static str {
        "hbm-inst"
    }

    fn range_key(&self) -> RangeKey {
        RangeKey::HbmInst
    }

    fn validate(&self, conf: &HbmConfig) -> GenResult<()> {
        let range = conf.ranges.get(self.range_key()).checked()?;
        range.last().offset(conf.remap_offset())?;
        Row::resolve_all(LAYOUT)?;
        Ok(())
    }

    fn emit(&self, conf: &HbmConfig, out: &mut dyn Write) -> GenResult<()> {
        write_blocks(out, &self.blocks(conf)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hbmgen_ir::PortIdx;

    #[test]
    fn sources_map_onto_second_stack() {
        let blocks = HbmInstBackend.blocks(&HbmConfig::default()).unwrap();
        assert_eq!(blocks.len(), 16);
        let lines = blocks[15].lines();
        assert_eq!(lines[1], "\t\t\t-- AXI_15");
        assert_eq!(lines[3], "\t\t\tAXI_15_ARADDR          => AXI_31_ARADDR,");
        assert!(!blocks[15].text().contains("AXI_32"));
    }

    #[test]
    fn parity_is_open() {
        let blocks = HbmInstBackend.blocks(&HbmConfig::default()).unwrap();
        let open: Vec<_> = blocks[0]
            .lines()
            .iter()
            .filter(|l| l.ends_with("=> open,"))
            .collect();
        assert_eq!(
            open,
            [
                "\t\t\tAXI_00_WDATA_PARITY    => open,",
                "\t\t\tAXI_00_RDATA_PARITY    => open,"
            ]
        );
    }

    #[test]
    fn destination_follows_remap() {
        let mut conf = HbmConfig::default();
        conf.set("remap-dst", "4").unwrap();
        conf.ranges.hbm_inst = conf.ranges.hbm_inst.with_first(2).with_last(3);
        let blocks = HbmInstBackend.blocks(&conf).unwrap();
        assert_eq!(blocks[0].port(), PortIdx::new(2));
        assert!(blocks[0].text().contains("AXI_02_BVALID          => AXI_04_BVALID,"));
        assert!(blocks[1].text().contains("AXI_03_BVALID          => AXI_05_BVALID,"));
    }
}
