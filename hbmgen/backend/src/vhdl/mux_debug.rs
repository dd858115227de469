//! Host-only variant of the routing fabric: every HBM port is wired
//! straight to the host and the TFHE outputs are optionally held at zero.
use super::{TfheRoutes, hbm, host, port_banner, rule, zero};
use crate::expander::{Block, Expander, write_blocks, write_lines};
use crate::traits::Backend;
use hbmgen_ir::{Direction, HbmConfig, PortIdx, RangeKey, Side, SignalDescriptor};
use hbmgen_utils::GenResult;
use std::io::Write;

fn both_sides(
    direction: Direction,
) -> impl Iterator<Item = &'static SignalDescriptor> {
    [Side::Read, Side::Write]
        .into_iter()
        .flat_map(move |side| side.signals(direction))
}

/// Direct HBM to host connection, TFHE disabled.
#[derive(Default)]
pub struct MuxDebugBackend;

impl MuxDebugBackend {
    pub fn blocks(&self, conf: &HbmConfig) -> GenResult<Vec<Block>> {
        let routes = TfheRoutes::new(&conf.tfhe);
        let range = conf.ranges.get(RangeKey::Mux);
        Expander::new(range).expand(|port, block| {
            block.line(port_banner(port));
            for sig in both_sides(Direction::Input) {
                block.line(format!("{} <= {};", hbm(port, sig), host(port, sig)));
            }
            block.gap();
            for sig in both_sides(Direction::Output) {
                block.line(format!("{} <= {};", host(port, sig), hbm(port, sig)));
            }
            block.gap();
            if conf.tfhe.drive_defaults {
                for sig in both_sides(Direction::Output) {
                    block.line(format!(
                        "{} <= {};",
                        routes.route(sig.name, port)?,
                        zero(sig)
                    ));
                }
                block.gap();
            }
            block.gap();
            Ok(())
        })
    }
}

impl Backend for MuxDebugBackend {
    fn name(&self) -> &'static str {
        "mux-debug"
    }

    fn range_key(&self) -> RangeKey {
        RangeKey::Mux
    }

    fn validate(&self, conf: &HbmConfig) -> GenResult<()> {
        conf.ranges.get(self.range_key()).checked()?;
        let routes = TfheRoutes::new(&conf.tfhe);
        both_sides(Direction::Output).try_for_each(|sig| {
            routes.route(sig.name, PortIdx::new(0)).map(|_| ())
        })
    }

    fn emit(&self, conf: &HbmConfig, out: &mut dyn Write) -> GenResult<()> {
        write_lines(
            out,
            &[
                rule('='),
                "-- HOST-ONLY DIRECT CONNECT (HBM <-> HOST), TFHE DISABLED"
                    .to_string(),
                rule('='),
                String::new(),
            ],
        )?;
        write_blocks(out, &self.blocks(conf)?)?;
        Ok(())
    }
}
