//! Routing fabric that lets either the host or the TFHE engine own each
//! HBM port. Inputs into the HBM are multiplexed on the select, outputs out
//! of the HBM are demultiplexed to whichever side owns the channel and the
//! other side sees zeros.
use super::{TfheRoutes, hbm, host, port_banner, section, zero};
use crate::expander::{Block, Expander, write_blocks, write_lines};
use crate::traits::Backend;
use hbmgen_ir::{
    Channel, Direction, HbmConfig, PortIdx, RangeKey, Side, SignalDescriptor,
    channel_signals,
};
use hbmgen_utils::GenResult;
use std::io::Write;

/// Every bus signal of a port, channel by channel, inputs before outputs.
fn bus_signals() -> impl Iterator<Item = &'static SignalDescriptor>
{
    Channel::BUS.iter().flat_map(|ch| {
        [Direction::Input, Direction::Output]
            .into_iter()
            .flat_map(move |dir| channel_signals(*ch, dir))
    })
}

/// The three sections generated for a range of ports.
pub struct MuxDemux {
    pub declarations: Vec<Block>,
    pub port_map: Vec<Block>,
    pub routing: Vec<Block>,
}

#[derive(Default)]
pub struct MuxDemuxBackend;

impl MuxDemuxBackend {
    /// `signal hbm_nn_sig : type;` for every internal wire.
    fn declarations(&self, expander: &Expander) -> GenResult<Vec<Block>> {
        expander.expand(|port, block| {
            for sig in bus_signals() {
                block.line(format!(
                    "signal {} : {};",
                    hbm(port, sig),
                    sig.width.vhdl_type()
                ));
            }
            block.gap();
            Ok(())
        })
    }

    /// `AXI_nn_SIG => hbm_nn_sig,` for the HBM IP instantiation.
    fn port_map(&self, expander: &Expander) -> GenResult<Vec<Block>> {
        expander.expand(|port, block| {
            block.line(format!("-- ---- {} ----", port.axi()));
            for sig in bus_signals() {
                block.line(format!("{:<18} => {},", host(port, sig), hbm(port, sig)));
            }
            block.gap();
            Ok(())
        })
    }

    fn routing(
        &self,
        conf: &HbmConfig,
        expander: &Expander,
    ) -> GenResult<Vec<Block>> {
        let routes = TfheRoutes::new(&conf.tfhe);
        expander.expand(|port, block| {
            block.line(port_banner(port));
            for side in [Side::Read, Side::Write] {
                route_side(block, &routes, side, select(conf, side, port), port)?;
            }
            block.gap();
            Ok(())
        })
    }

    pub fn sections(&self, conf: &HbmConfig) -> GenResult<MuxDemux> {
        let expander = Expander::new(conf.ranges.get(RangeKey::Mux));
        Ok(MuxDemux {
            declarations: self.declarations(&expander)?,
            port_map: self.port_map(&expander)?,
            routing: self.routing(conf, &expander)?,
        })
    }
}

fn select(conf: &HbmConfig, side: Side, port: PortIdx) -> String {
    match side {
        Side::Read => conf.select.read_select(port),
        Side::Write => conf.select.write_select(port),
    }
}

/// Mux the inputs of one side into the HBM, then demux its outputs.
fn route_side(
    block: &mut Block,
    routes: &TfheRoutes,
    side: Side,
    sel: String,
    port: PortIdx,
) -> GenResult<()> {
    for sig in side.signals(Direction::Input) {
        block.line(format!(
            "{} <= {} when {sel}='0' else {};",
            hbm(port, sig),
            host(port, sig),
            routes.route(sig.name, port)?
        ));
    }
    block.gap();
    for sig in side.signals(Direction::Output) {
        let zero = zero(sig);
        block.line(format!(
            "{} <= {} when {sel}='0' else {zero};",
            host(port, sig),
            hbm(port, sig)
        ));
        block.line(format!(
            "{} <= {} when {sel}='1' else {zero};",
            routes.route(sig.name, port)?,
            hbm(port, sig)
        ));
    }
    block.gap();
    Ok(())
}

impl Backend for MuxDemuxBackend {
    fn name(&self) -> &'static str {
        "mux-demux"
    }

    fn range_key(&self) -> RangeKey {
        RangeKey::Mux
    }

    fn validate(&self, conf: &HbmConfig) -> GenResult<()> {
        conf.ranges.get(self.range_key()).checked()?;
        let routes = TfheRoutes::new(&conf.tfhe);
        bus_signals()
            .try_for_each(|sig| routes.route(sig.name, PortIdx::new(0)).map(|_| ()))
    }

    fn emit(&self, conf: &HbmConfig, out: &mut dyn Write) -> GenResult<()> {
        let range = conf.ranges.get(self.range_key());
        let MuxDemux {
            declarations,
            port_map,
            routing,
        } = self.sections(conf)?;

        let mut header = section(&format!(
            "INTERNAL HBM SIGNAL DECLARATIONS ({range})"
        ));
        header.push(String::new());
        write_lines(out, &header)?;
        write_blocks(out, &declarations)?;

        let mut header =
            section("HBM IP PORT MAP (CONNECT INTERNAL SIGNALS ONLY)");
        header.push(String::new());
        header.push(
            "-- In your HBM IP instantiation, connect like this (snippet):"
                .to_string(),
        );
        write_lines(out, &header)?;
        write_blocks(out, &port_map)?;
        write_lines(
            out,
            &["-- Remove trailing comma on the final association in your real port map."],
        )?;

        let mut header =
            section("MUX INPUTS INTO HBM + DEMUX OUTPUTS OUT OF HBM");
        header.extend([
            String::new(),
            "-- Convention: select='0' => HOST owns that channel, select='1' => TFHE owns that channel"
                .to_string(),
            String::new(),
        ]);
        write_lines(out, &header)?;
        write_blocks(out, &routing)?;
        Ok(())
    }
}
