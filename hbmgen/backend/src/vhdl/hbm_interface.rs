//! Entity port declarations for the host-facing AXI ports.
use super::{host, rule};
use crate::expander::{Block, Expander, write_blocks};
use crate::traits::Backend;
use hbmgen_ir::{
    HbmConfig, PortIdx, RangeKey, SignalDescriptor, lookup, show_freq,
};
use hbmgen_utils::GenResult;
use std::io::Write;

/// Column at which trailing comments start.
const COMMENT_COLUMN: usize = 68;

enum Decl {
    Port(&'static str, Option<&'static str>),
    /// The port clock, noted with its configured frequency.
    Clock(&'static str),
    Comment(&'static str),
    Gap,
}

const fn plain(name: &'static str) -> Decl {
    Decl::Port(name, None)
}

const fn noted(name: &'static str, note: &'static str) -> Decl {
    Decl::Port(name, Some(note))
}

const LAYOUT: &[Decl] = &[
    Decl::Clock("ACLK"),
    noted(
        "ARESET_N",
        "set to 0 to reset. Reset before start of data traffic",
    ),
    Decl::Comment(
        "start addr. must be 128-bit aligned, size must be multiple of 128bit",
    ),
    noted(
        "ARADDR",
        "bit 32 selects hbm stack, 31:28 selects AXI port, 27:5 addr, 4:0 unused",
    ),
    noted("ARBURST", "read burst"),
    noted("ARID", "read addr id"),
    noted("ARLEN", "burst length"),
    noted("ARSIZE", "burst size"),
    plain("ARVALID"),
    plain("ARREADY"),
    Decl::Gap,
    plain("AWADDR"),
    plain("AWBURST"),
    plain("AWID"),
    plain("AWLEN"),
    plain("AWSIZE"),
    plain("AWVALID"),
    plain("AWREADY"),
    Decl::Gap,
    plain("RREADY"),
    plain("BREADY"),
    Decl::Gap,
    plain("WDATA"),
    plain("WLAST"),
    plain("WSTRB"),
    plain("WDATA_PARITY"),
    plain("WVALID"),
    Decl::Gap,
    plain("RDATA_PARITY"),
    plain("RDATA"),
    plain("RID"),
    plain("RLAST"),
    plain("RRESP"),
    plain("RVALID"),
    Decl::Gap,
    plain("WREADY"),
    Decl::Gap,
    plain("BID"),
    plain("BRESP"),
    plain("BVALID"),
];

/// `AXI_16_ACLK         : in  std_logic;`
fn declaration(port: PortIdx, sig: &SignalDescriptor) -> String {
    format!(
        "{:<20}: {:<4}{};",
        host(port, sig),
        sig.direction.vhdl(),
        sig.width.vhdl_type()
    )
}

/// Port declarations of the HBM-facing entity, one commented block per port.
#[derive(Default)]
pub struct HbmInterfaceBackend;

impl HbmInterfaceBackend {
    pub fn blocks(&self, conf: &HbmConfig) -> GenResult<Vec<Block>> {
        let range = conf.ranges.get(RangeKey::HbmInterface);
        let freq = show_freq(conf.clock.hbm_freq_hz);
        Expander::new(range).expand(|port, block| {
            block.gap();
            block.line(rule('='));
            block.line(format!("-- {}", port.axi()));
            block.line(rule('='));
            block.gap();
            for decl in LAYOUT {
                match decl {
                    Decl::Port(name, note) => {
                        let line = declaration(port, lookup(name)?);
                        block.line(match note {
                            Some(note) => {
                                format!("{line:<COMMENT_COLUMN$} -- {note}")
                            }
                            None => line,
                        });
                    }
                    Decl::Clock(name) => {
                        let line = declaration(port, lookup(name)?);
                        block.line(format!("{line:<COMMENT_COLUMN$} -- {freq}"));
                    }
                    Decl::Comment(text) => block.line(format!("-- {text}")),
                    Decl::Gap => block.gap(),
                }
            }
            Ok(())
        })
    }
}

impl Backend for HbmInterfaceBackend {
    fn name(&self) -> &'static str {
        "hbm-interface"
    }

    fn range_key(&self) -> RangeKey {
        RangeKey::HbmInterface
    }

    fn validate(&self, conf: &HbmConfig) -> GenResult<()> {
        conf.ranges.get(self.range_key()).checked()?;
        LAYOUT.iter().try_for_each(|decl| match decl {
            Decl::Port(name, _) | Decl::Clock(name) => lookup(name).map(|_| ()),
            _ => Ok(()),
        })
    }

    fn emit(&self, conf: &HbmConfig, out: &mut dyn Write) -> GenResult<()> {
        write_blocks(out, &self.blocks(conf)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range_is_16_to_33() {
        let blocks = HbmInterfaceBackend.blocks(&HbmConfig::default()).unwrap();
        assert_eq!(blocks.len(), 18);
        assert_eq!(blocks[0].port(), PortIdx::new(16));
        assert_eq!(blocks[17].lines()[2], "-- AXI_33");
    }

    #[test]
    fn declarations_are_aligned() {
        let blocks = HbmInterfaceBackend.blocks(&HbmConfig::default()).unwrap();
        let lines = blocks[0].lines();
        let rule = format!("-- {}", "=".repeat(50));
        assert_eq!(lines[..5], ["", rule.as_str(), "-- AXI_16", rule.as_str(), ""]);
        assert_eq!(
            lines[5],
            format!("{:<68} -- 450 MHz", "AXI_16_ACLK         : in  std_logic;")
        );
        assert_eq!(
            lines[7],
            "-- start addr. must be 128-bit aligned, size must be multiple of 128bit"
        );
        assert!(lines.contains(
            &"AXI_16_ARREADY      : out std_logic;".to_string()
        ));
        assert!(lines.contains(
            &"AXI_16_WDATA_PARITY : in  std_logic_vector(hbm_bytes_per_ps_port-1 downto 0);"
                .to_string()
        ));
        assert_eq!(
            lines.last().map(String::as_str),
            Some("AXI_16_BVALID       : out std_logic;")
        );
    }

    #[test]
    fn clock_note_follows_config() {
        let mut conf = HbmConfig::default();
        conf.set("hbm-freq-hz", "400000000").unwrap();
        let blocks = HbmInterfaceBackend.blocks(&conf).unwrap();
        assert!(blocks.iter().all(|b| b.lines()[5].ends_with(" -- 400 MHz")));
    }
}
