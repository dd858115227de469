//! Port list carrying Xilinx interface attributes, so the block design
//! infers every port as an AXI3 slave together with its clock and reset.
use super::{declaration, rule};
use crate::expander::{Block, Expander, write_blocks, write_lines};
use crate::traits::Backend;
use hbmgen_ir::{HbmConfig, PortIdx, RangeKey, lookup};
use hbmgen_utils::GenResult;
use itertools::Itertools;
use std::io::Write;

const AXIMM: &str = "xilinx.com:interface:aximm:1.0";
const CLOCK: &str = "xilinx.com:signal:clock:1.0";
const RESET: &str = "xilinx.com:signal:reset:1.0";

/// How a signal of the port list is annotated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tag {
    /// Tagged, and carries the parameters of the whole interface.
    Params,
    Tagged,
    /// Not part of the aximm interface.
    Untagged,
}

const LAYOUT: &[(&str, Tag)] = &[
    ("ARADDR", Tag::Params),
    ("ARBURST", Tag::Tagged),
    ("ARID", Tag::Tagged),
    ("ARLEN", Tag::Tagged),
    ("ARSIZE", Tag::Tagged),
    ("ARVALID", Tag::Tagged),
    ("ARREADY", Tag::Tagged),
    ("AWADDR", Tag::Tagged),
    ("AWBURST", Tag::Tagged),
    ("AWID", Tag::Tagged),
    ("AWLEN", Tag::Tagged),
    ("AWSIZE", Tag::Tagged),
    ("AWVALID", Tag::Tagged),
    ("AWREADY", Tag::Tagged),
    ("WDATA", Tag::Tagged),
    ("WSTRB", Tag::Tagged),
    ("WLAST", Tag::Tagged),
    ("WDATA_PARITY", Tag::Untagged),
    ("WVALID", Tag::Tagged),
    ("WREADY", Tag::Tagged),
    ("RDATA", Tag::Tagged),
    ("RID", Tag::Tagged),
    ("RRESP", Tag::Tagged),
    ("RLAST", Tag::Tagged),
    ("RVALID", Tag::Tagged),
    ("RREADY", Tag::Tagged),
    ("BID", Tag::Tagged),
    ("BRESP", Tag::Tagged),
    ("BVALID", Tag::Tagged),
    ("BREADY", Tag::Tagged),
];

/// Interface and wire names of one port.
struct Interfaces {
    bus: String,
    clk_if: String,
    rst_if: String,
    clk: String,
    rst: String,
}

impl Interfaces {
    fn new(port: PortIdx) -> Self {
        Self {
            bus: format!("SAXI_{port}_RT"),
            clk_if: format!("ACLK_{port}_RT"),
            rst_if: format!("ARST_{port}_N"),
            clk: format!("{}_ACLK", port.axi()),
            rst: format!("{}_ARESET_N", port.axi()),
        }
    }
}

fn parameters(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key} {value}"))
        .join(", ")
}

fn bus_parameters(conf: &HbmConfig, ifs: &Interfaces) -> String {
    let zero = || "0".to_string();
    let one = || "1".to_string();
    parameters(&[
        ("XIL_INTERFACENAME", ifs.bus.clone()),
        ("DATA_WIDTH", conf.bus.data.to_string()),
        ("PROTOCOL", "AXI3".to_string()),
        ("FREQ_HZ", conf.clock.freq_hz.to_string()),
        ("ID_WIDTH", conf.bus.id.to_string()),
        ("ADDR_WIDTH", conf.bus.addr.to_string()),
        ("AWUSER_WIDTH", zero()),
        ("ARUSER_WIDTH", zero()),
        ("WUSER_WIDTH", zero()),
        ("RUSER_WIDTH", zero()),
        ("BUSER_WIDTH", zero()),
        ("READ_WRITE_MODE", "READ_WRITE".to_string()),
        ("HAS_BURST", one()),
        ("HAS_LOCK", zero()),
        ("HAS_PROT", zero()),
        ("HAS_CACHE", zero()),
        ("HAS_QOS", zero()),
        ("HAS_REGION", zero()),
        ("HAS_WSTRB", one()),
        ("HAS_BRESP", one()),
        ("HAS_RRESP", one()),
        ("SUPPORTS_NARROW_BURST", one()),
        ("NUM_READ_OUTSTANDING", "2".to_string()),
        ("NUM_WRITE_OUTSTANDING", "2".to_string()),
        ("MAX_BURST_LENGTH", conf.bus.max_burst_length().to_string()),
        ("PHASE", "0.0".to_string()),
        ("CLK_DOMAIN", conf.clock.domain.clone()),
        ("NUM_READ_THREADS", one()),
        ("NUM_WRITE_THREADS", one()),
        ("RUSER_BITS_PER_BYTE", zero()),
        ("WUSER_BITS_PER_BYTE", zero()),
        ("INSERT_VIP", zero()),
    ])
}

fn clock_parameters(conf: &HbmConfig, ifs: &Interfaces) -> String {
    parameters(&[
        ("XIL_INTERFACENAME", ifs.clk_if.clone()),
        ("ASSOCIATED_BUSIF", ifs.bus.clone()),
        ("FREQ_HZ", conf.clock.freq_hz.to_string()),
        ("FREQ_TOLERANCE_HZ", "0".to_string()),
        ("PHASE", "0.0".to_string()),
        ("CLK_DOMAIN", conf.clock.domain.clone()),
        ("ASSOCIATED_RESET", ifs.rst.clone()),
        ("INSERT_VIP", "0".to_string()),
    ])
}

fn reset_parameters(ifs: &Interfaces) -> String {
    parameters(&[
        ("XIL_INTERFACENAME", ifs.rst_if.clone()),
        ("POLARITY", "ACTIVE_LOW".to_string()),
        ("INSERT_VIP", "0".to_string()),
    ])
}

fn info(vlnv: &str, iface: &str, logical: &str) -> String {
    format!(r#"(* X_INTERFACE_INFO = "{vlnv} {iface} {logical}" *)"#)
}

fn slave(params: &str) -> String {
    format!(
        r#" (* X_INTERFACE_MODE = "slave" *) (* X_INTERFACE_PARAMETER = "{params}" *)"#
    )
}

/// Verilog port list with interface metadata.
#[derive(Default)]
pub struct AxiMetaBackend;

impl AxiMetaBackend {
    pub fn blocks(&self, conf: &HbmConfig) -> GenResult<Vec<Block>> {
        let range = conf.ranges.get(RangeKey::AxiMeta);
        Expander::new(range).expand(|port, block| {
            let ifs = Interfaces::new(port);
            block.line(format!(
                "// -------------------- {} --------------------",
                ifs.bus
            ));
            block.line(format!(
                "  {}{} input {} /* synthesis syn_isclock = 1 */,",
                info(CLOCK, &ifs.clk_if, "CLK"),
                slave(&clock_parameters(conf, &ifs)),
                ifs.clk
            ));
            block.line(format!(
                "  {}{} input {},",
                info(RESET, &ifs.rst_if, "RST"),
                slave(&reset_parameters(&ifs)),
                ifs.rst
            ));
            for (name, tag) in LAYOUT {
                let sig = lookup(name)?;
                let decl = declaration(port, sig, &conf.bus);
                let tagged = info(AXIMM, &ifs.bus, name);
                block.line(match tag {
                    Tag::Params => format!(
                        "  {tagged}{} {decl},",
                        slave(&bus_parameters(conf, &ifs))
                    ),
                    Tag::Tagged => {
                        let pad = " ".repeat(8usize.saturating_sub(name.len()).max(1));
                        format!("  {tagged}{pad}{decl},")
                    }
                    Tag::Untagged => format!("  {decl},"),
                });
            }
            block.gap();
            Ok(())
        })
    }
}

impl Backend for AxiMetaBackend {
    fn name(&self) -> &'static str {
        "axi-meta"
    }

    fn range_key(&self) -> RangeKey {
        RangeKey::AxiMeta
    }

    fn validate(&self, conf: &HbmConfig) -> GenResult<()> {
        conf.ranges.get(self.range_key()).checked()?;
        LAYOUT.iter().try_for_each(|(name, _)| lookup(name).map(|_| ()))
    }

    fn emit(&self, conf: &HbmConfig, out: &mut dyn Write) -> GenResult<()> {
        let range = conf.ranges.get(self.range_key());
        let banner = rule("", 68);
        write_lines(
            out,
            &[
                banner.clone(),
                format!(
                    "// Auto-generated AXI3 (HBM-style) interface metadata for SAXI_{}_RT..{}",
                    range.first(),
                    range.last()
                ),
                "// Paste into your module port list (or wrapper) and adjust names if needed"
                    .to_string(),
                banner,
                String::new(),
            ],
        )?;
        write_blocks(out, &self.blocks(conf)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conf() -> HbmConfig {
        HbmConfig::default()
    }

    #[test]
    fn clock_and_reset_lead_each_block() {
        let blocks = AxiMetaBackend.blocks(&conf()).unwrap();
        assert_eq!(blocks.len(), 32);
        let lines = blocks[3].lines();
        assert_eq!(
            lines[0],
            "// -------------------- SAXI_03_RT --------------------"
        );
        assert!(lines[1].starts_with(
            r#"  (* X_INTERFACE_INFO = "xilinx.com:signal:clock:1.0 ACLK_03_RT CLK" *)"#
        ));
        assert!(lines[1].contains(
            "ASSOCIATED_BUSIF SAXI_03_RT, FREQ_HZ 250000000, FREQ_TOLERANCE_HZ 0"
        ));
        assert!(lines[1].ends_with(
            r#"INSERT_VIP 0" *) input AXI_03_ACLK /* synthesis syn_isclock = 1 */,"#
        ));
        assert_eq!(
            lines[2],
            r#"  (* X_INTERFACE_INFO = "xilinx.com:signal:reset:1.0 ARST_03_N RST" *) (* X_INTERFACE_MODE = "slave" *) (* X_INTERFACE_PARAMETER = "XIL_INTERFACENAME ARST_03_N, POLARITY ACTIVE_LOW, INSERT_VIP 0" *) input AXI_03_ARESET_N,"#
        );
    }

    #[test]
    fn araddr_carries_bus_parameters() {
        let blocks = AxiMetaBackend.blocks(&conf()).unwrap();
        let araddr = &blocks[0].lines()[3];
        assert!(araddr.contains("XIL_INTERFACENAME SAXI_00_RT, DATA_WIDTH 256, PROTOCOL AXI3"));
        assert!(araddr.contains("ID_WIDTH 6, ADDR_WIDTH 33"));
        assert!(araddr.contains("MAX_BURST_LENGTH 16, PHASE 0.0, CLK_DOMAIN xdma_axi_aclk"));
        assert!(araddr.ends_with(r#"INSERT_VIP 0" *) input [32:0]AXI_00_ARADDR,"#));
    }

    #[test]
    fn tagged_signals_are_aligned() {
        let blocks = AxiMetaBackend.blocks(&conf()).unwrap();
        let lines = blocks[0].lines();
        assert_eq!(
            lines[4],
            r#"  (* X_INTERFACE_INFO = "xilinx.com:interface:aximm:1.0 SAXI_00_RT ARBURST" *) input [1:0]AXI_00_ARBURST,"#
        );
        assert_eq!(
            lines[5],
            r#"  (* X_INTERFACE_INFO = "xilinx.com:interface:aximm:1.0 SAXI_00_RT ARID" *)    input [5:0]AXI_00_ARID,"#
        );
        assert!(lines.contains(&"  input [31:0]AXI_00_WDATA_PARITY,".to_string()));
        assert!(lines.contains(&r#"  (* X_INTERFACE_INFO = "xilinx.com:interface:aximm:1.0 SAXI_00_RT RDATA" *)   output [255:0]AXI_00_RDATA,"#.to_string()));
        assert!(lines.contains(&r#"  (* X_INTERFACE_INFO = "xilinx.com:interface:aximm:1.0 SAXI_00_RT ARVALID" *) input AXI_00_ARVALID,"#.to_string()));
        assert_eq!(lines.last().map(String::as_str), Some(""));
        // banner, clock, reset, signals, gap
        assert_eq!(lines.len(), 3 + LAYOUT.len() + 1);
    }

    #[test]
    fn header_names_the_range() {
        let mut conf = conf();
        conf.ranges.axi_meta = conf.ranges.axi_meta.with_first(4).with_last(5);
        let text = AxiMetaBackend.render(&conf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[1],
            "// Auto-generated AXI3 (HBM-style) interface metadata for SAXI_04_RT..05"
        );
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "// -------------------- SAXI_04_RT --------------------");
        assert!(!text.contains("AXI_06"));
    }

    #[test]
    fn widths_follow_config() {
        let mut conf = conf();
        conf.set("data-width", "512").unwrap();
        let text = AxiMetaBackend.render(&conf).unwrap();
        assert!(text.contains("output [511:0]AXI_00_RDATA,"));
        assert!(text.contains("input [63:0]AXI_00_WSTRB,"));
        assert!(text.contains("DATA_WIDTH 512"));
    }
}
