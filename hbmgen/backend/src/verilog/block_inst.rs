//! Named port connections for instantiating the HBM block.
use super::{RULE_WIDTH, port_signal, rule};
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
    Row::Gap,
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

/// `.AXI_nn_SIG (AXI_nn_SIG),` connections, parity left open.
#[derive(Default)]
pub struct BlockInstBackend;

impl BlockInstBackend {
    pub fn blocks(&self, conf: &HbmConfig) -> GenResult<Vec<Block>> {
        let range = conf.ranges.get(RangeKey::BlockInst);
        Expander::new(range).expand(|port, block| {
            let axi = port.axi();
            block.line(rule("\t\t", RULE_WIDTH));
            block.line(format!("\t\t// {axi}"));
            block.line(rule("\t\t", RULE_WIDTH));
            for row in LAYOUT {
                let Row::Signal(name, tie) = row else {
                    block.gap();
                    continue;
                };
                let sig = lookup(name)?;
                let rhs = match tie {
                    Tie::Open => "()".to_string(),
                    Tie::Live => format!("({})", port_signal(port, sig)),
                };
                block.line(format!("\t\t.{axi}_{name:<22}{rhs},"));
            }
            block.gap();
            Ok(())
        })
    }
}

impl Backend for BlockInstBackend {
    fn name(&self) -> &'static str {
        "block-inst"
    }

    fn range_key(&self) -> RangeKey {
        RangeKey::BlockInst
    }

    fn validate(&self, conf: &HbmConfig) -> GenResult<()> {
        conf.ranges.get(self.range_key()).checked()?;
        Row::resolve_all(LAYOUT)?;
        Ok(())
    }

    fn emit(&self, conf: &HbmConfig, out: &mut dyn Write) -> GenResult<()> {
        write_blocks(out, &self.blocks(conf)?)?;
        Ok(())
    }
}
