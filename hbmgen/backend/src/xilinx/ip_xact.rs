use crate::expander::Expander;
use crate::traits::Backend;
use hbmgen_ir::{HbmConfig, PortIdx, RangeKey};
use hbmgen_utils::{Error, GenResult};
use serde::Serialize;
use std::io::Write;

/// Backend that generates the IP-XACT memory maps of a packaged IP, one
/// address window per AXI port.
#[derive(Default)]
pub struct IpXactBackend;

/// The `<spirit:memoryMaps>` element of an IP-XACT `component.xml`.
#[derive(Debug)]
pub struct MemoryMaps {
    pub memory_map: Vec<MemoryMap>,
}

#[derive(Serialize, Debug)]
pub struct MemoryMap {
    #[serde(rename = "spirit:name")]
    pub name: String,
    #[serde(rename = "spirit:displayName")]
    pub display_name: String,
    #[serde(rename = "spirit:addressBlock")]
    pub address_block: AddressBlock,
}

#[derive(Serialize, Debug)]
pub struct AddressBlock {
    #[serde(rename = "spirit:name")]
    pub name: String,
    #[serde(rename = "spirit:displayName")]
    pub display_name: &'static str,
    #[serde(rename = "spirit:baseAddress")]
    pub base_address: BaseAddress,
    #[serde(rename = "spirit:range")]
    pub range: Range,
    #[serde(rename = "spirit:width")]
    pub width: BitWidth,
    #[serde(rename = "spirit:usage")]
    pub usage: &'static str,
}

#[derive(Serialize, Debug)]
pub struct BaseAddress {
    #[serde(rename = "@spirit:format")]
    format: &'static str,
    #[serde(rename = "@spirit:bitStringLength")]
    bit_string_length: u32,
    #[serde(rename = "$text")]
    value: String,
}

#[derive(Serialize, Debug)]
pub struct Range {
    #[serde(rename = "@spirit:format")]
    format: &'static str,
    #[serde(rename = "@spirit:minimum")]
    minimum: u64,
    #[serde(rename = "@spirit:rangeType")]
    range_type: &'static str,
    #[serde(rename = "$text")]
    pub bytes: u64,
}

#[derive(Serialize, Debug)]
pub struct BitWidth {
    #[serde(rename = "@spirit:format")]
    format: &'static str,
    #[serde(rename = "$text")]
    pub bits: u32,
}

impl MemoryMap {
    fn new(port: PortIdx, base: u64, conf: &HbmConfig) -> Self {
        MemoryMap {
            name: port.axi(),
            display_name: port.axi(),
            address_block: AddressBlock {
                name: format!("HBM_MEM_{port}"),
                display_name: "memory",
                base_address: BaseAddress {
                    format: "bitString",
                    bit_string_length: 1,
                    value: format!("0x{base:X}"),
                },
                range: Range {
                    format: "long",
                    minimum: conf.min_window,
                    range_type: "long",
                    bytes: conf.window_size,
                },
                width: BitWidth {
                    format: "long",
                    bits: conf.bus.data,
                },
                usage: "memory",
            },
        }
    }
}

impl BaseAddress {
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl IpXactBackend {
    /// One window of `window-size` bytes per port, laid out back to back
    /// from address zero.
    pub fn memory_maps(&self, conf: &HbmConfig) -> GenResult<MemoryMaps> {
        let range = conf.ranges.get(RangeKey::IpXact);
        let memory_map = Expander::new(range).map(|port| {
            let base = u64::from(port.index())
                .checked_mul(conf.window_size)
                .ok_or_else(|| {
                    Error::invalid_range(format!(
                        "base address of {} overflows with window size {}",
                        port.axi(),
                        conf.window_size
                    ))
                })?;
            log::debug!("{}: base 0x{base:X}", port.axi());
            Ok(MemoryMap::new(port, base, conf))
        })?;
        Ok(MemoryMaps { memory_map })
    }
}

impl Backend for IpXactBackend {
    fn name(&self) -> &'static str {
        "ip-xact"
    }

    fn range_key(&self) -> RangeKey {
        RangeKey::IpXact
    }

    /// Each `<spirit:memoryMap>` is serialized unindented on a line of its
    /// own, keeping element text inline.
    fn emit(&self, conf: &HbmConfig, out: &mut dyn Write) -> GenResult<()> {
        let maps = self.memory_maps(conf)?;
        writeln!(out, "<spirit:memoryMaps>")?;
        for map in &maps.memory_map {
            let xml = quick_xml::se::to_string_with_root("spirit:memoryMap", map)
                .map_err(|e| {
                    Error::write_error(format!(
                        "XML serialization of {} failed: {e}",
                        map.name
                    ))
                })?;
            writeln!(out, "  {xml}")?;
        }
        writeln!(out, "</spirit:memoryMaps>")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hbmgen_ir::PortRange;
    use proptest::prelude::*;

    #[test]
    fn windows_are_back_to_back() {
        let maps = IpXactBackend.memory_maps(&HbmConfig::default()).unwrap();
        assert_eq!(maps.memory_map.len(), 32);
        let bases: Vec<_> = maps
            .memory_map
            .iter()
            .map(|m| m.address_block.base_address.value())
            .collect();
        assert_eq!(bases[0], "0x0");
        assert_eq!(bases[1], "0x10000000");
        assert_eq!(bases[31], "0x1F0000000");
        assert_eq!(maps.memory_map[31].address_block.name, "HBM_MEM_31");
        assert_eq!(maps.memory_map[5].address_block.range.bytes, 268435456);
        assert_eq!(maps.memory_map[5].address_block.width.bits, 256);
    }

    #[test]
    fn xml_shape() {
        let mut conf = HbmConfig::default();
        conf.ranges.ip_xact = PortRange::new(1, 1).unwrap();
        let xml = IpXactBackend.render(&conf).unwrap();
        assert!(xml.starts_with("<spirit:memoryMaps>\n  <spirit:memoryMap>"));
        assert_eq!(xml.lines().count(), 3);
        assert!(xml.contains("<spirit:name>AXI_01</spirit:name>"));
        assert!(xml.contains("<spirit:displayName>memory</spirit:displayName>"));
        assert!(xml.contains(
            r#"<spirit:baseAddress spirit:format="bitString" spirit:bitStringLength="1">0x10000000</spirit:baseAddress>"#
        ));
        assert!(xml.contains(
            r#"<spirit:range spirit:format="long" spirit:minimum="4096" spirit:rangeType="long">268435456</spirit:range>"#
        ));
        assert!(xml.contains(r#"<spirit:width spirit:format="long">256</spirit:width>"#));
        assert!(xml.contains("<spirit:usage>memory</spirit:usage>"));
        assert!(xml.ends_with("</spirit:memoryMap>\n</spirit:memoryMaps>\n"));
    }

    #[test]
    fn element_text_stays_inline() {
        let mut conf = HbmConfig::default();
        conf.ranges.ip_xact = PortRange::new(0, 2).unwrap();
        conf.min_window = 8192;
        let xml = IpXactBackend.render(&conf).unwrap();
        assert_eq!(xml.lines().count(), 5);
        for line in xml.lines() {
            assert_eq!(line.trim(), line.trim_start());
            assert!(line.starts_with("<") || line.starts_with("  <"));
        }
        assert!(xml.contains(">0x20000000</spirit:baseAddress>"));
        assert!(xml.contains(r#"spirit:minimum="8192""#));
        assert!(!xml.contains(">\n        0x"));
    }

    #[test]
    fn overflowing_base_is_rejected() {
        let mut conf = HbmConfig::default();
        conf.window_size = u64::MAX / 2;
        assert!(IpXactBackend.memory_maps(&conf).is_err());
    }

    proptest! {
        #[test]
        fn windows_never_overlap(
            first in 0u32..32,
            span in 0u32..8,
            window in 1u64..(1 << 32),
        ) {
            let mut conf = HbmConfig::default();
            conf.ranges.ip_xact = PortRange::new(first, first + span).unwrap();
            conf.window_size = window;
            let maps = IpXactBackend.memory_maps(&conf).unwrap();
            let bases: Vec<u64> = maps
                .memory_map
                .iter()
                .map(|m| {
                    u64::from_str_radix(
                        m.address_block.base_address.value().trim_start_matches("0x"),
                        16,
                    )
                    .unwrap()
                })
                .collect();
            for pair in bases.windows(2) {
                prop_assert_eq!(pair[1] - pair[0], window);
            }
            prop_assert_eq!(bases[0], u64::from(first) * window);
        }
    }
}
