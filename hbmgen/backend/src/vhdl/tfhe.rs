use hbmgen_ir::{PortIdx, TfheConfig};
use hbmgen_utils::{Error, GenResult};
use linked_hash_map::LinkedHashMap;

/// Placeholder replaced by the port index in route templates.
const PORT: &str = "(p)";

/// Route each of `sigs` to the field of the same name in `pkg`.
fn insert_fields(
    routes: &mut LinkedHashMap<&'static str, String>,
    pkg: &str,
    sigs: &[&'static str],
) {
    for sig in sigs {
        routes.insert(*sig, format!("{pkg}{PORT}.{}", sig.to_lowercase()));
    }
}

/// Where the TFHE side of every routed signal comes from (HBM inputs) or
/// goes to (HBM outputs). Templates are kept in insertion order.
#[derive(Debug, Clone)]
pub struct TfheRoutes {
    routes: LinkedHashMap<&'static str, String>,
}

impl TfheRoutes {
    pub fn new(tfhe: &TfheConfig) -> Self {
        let mut routes = LinkedHashMap::new();
        insert_fields(
            &mut routes,
            &tfhe.read_in,
            &["ARADDR", "ARID", "ARLEN", "ARVALID", "RREADY"],
        );
        insert_fields(
            &mut routes,
            &tfhe.read_out,
            &["ARREADY", "RDATA", "RDATA_PARITY", "RID", "RLAST", "RRESP", "RVALID"],
        );
        insert_fields(
            &mut routes,
            &tfhe.write_in,
            &[
                "AWADDR", "AWID", "AWLEN", "AWVALID", "WDATA", "WLAST",
                "WDATA_PARITY", "WVALID", "BREADY",
            ],
        );
        insert_fields(
            &mut routes,
            &tfhe.write_out,
            &["AWREADY", "WREADY", "BID", "BRESP", "BVALID"],
        );

        // Addresses are unsigned on the TFHE side.
        for addr in ["ARADDR", "AWADDR"] {
            if let Some(field) = routes.get_mut(addr) {
                *field = format!("std_logic_vector({field})");
            }
        }
        // Burst shape and strobes are constants.
        for (sig, src) in [
            ("ARBURST", &tfhe.burstmode_src),
            ("AWBURST", &tfhe.burstmode_src),
            ("ARSIZE", &tfhe.burstsize_src),
            ("AWSIZE", &tfhe.burstsize_src),
            ("WSTRB", &tfhe.wstrb_src),
        ] {
            routes.insert(sig, src.clone());
        }
        Self { routes }
    }

    /// The TFHE expression for `sig` at `port`.
    pub fn route(&self, sig: &str, port: PortIdx) -> GenResult<String> {
        self.routes
            .get(sig)
            .map(|template| {
                template.replace(PORT, &format!("({})", port.index()))
            })
            .ok_or_else(|| Error::undefined(sig, "TFHE route"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hbmgen_ir::{AXI_SIGNALS, Channel};
    use hbmgen_utils::ErrorKind;

    fn routes() -> TfheRoutes {
        TfheRoutes::new(&TfheConfig::default())
    }

    #[test]
    fn every_bus_signal_is_routed() {
        let routes = routes();
        let bus: Vec<_> = AXI_SIGNALS
            .iter()
            .filter(|s| Channel::BUS.contains(&s.channel))
            .collect();
        for sig in &bus {
            assert!(routes.route(sig.name, PortIdx::new(0)).is_ok(), "{}", sig.name);
        }
        assert_eq!(bus.len(), 31);
    }

    #[test]
    fn port_index_is_unpadded() {
        let routes = routes();
        assert_eq!(
            routes.route("ARADDR", PortIdx::new(3)).unwrap(),
            "std_logic_vector(i_read_pkgs(3).araddr)"
        );
        assert_eq!(
            routes.route("RDATA_PARITY", PortIdx::new(12)).unwrap(),
            "o_read_pkgs(12).rdata_parity"
        );
        assert_eq!(
            routes.route("AWSIZE", PortIdx::new(12)).unwrap(),
            "std_logic_vector(hbm_burstsize)"
        );
        assert_eq!(
            routes.route("WSTRB", PortIdx::new(1)).unwrap(),
            "std_logic_vector(hbm_strobe_setting)"
        );
    }

    #[test]
    fn unknown_signal() {
        let err = routes().route("ACLK", PortIdx::new(0)).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::Undefined { name, .. } if name == "ACLK"
        ));
    }
}
