//! The declarative table of constants shared by every generator.
//!
//! All defaults are literals matching the HBM IP configuration the glue code
//! is written for. The driver can override individual entries with
//! `-x key=value`; see [HbmConfig::set] for the accepted keys.
use crate::port::{PortIdx, PortRange};
use hbmgen_utils::{Error, GenResult};
use itertools::Itertools;
use serde::Serialize;
use std::{fmt::Display, str::FromStr};

/// Widths of the HBM AXI3 pseudo-channel ports in bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusWidths {
    pub addr: u32,
    pub data: u32,
    pub id: u32,
    pub burst_len: u32,
    pub burst_size: u32,
    pub burst_mode: u32,
    pub resp: u32,
}

impl Default for BusWidths {
    fn default() -> Self {
        Self {
            addr: 33,
            data: 256,
            id: 6,
            burst_len: 4,
            burst_size: 3,
            burst_mode: 2,
            resp: 2,
        }
    }
}

impl BusWidths {
    /// One strobe (or parity) bit per data byte.
    pub fn byte_lanes(&self) -> u32 {
        self.data / 8
    }

    /// Longest burst expressible in the burst length field.
    pub fn max_burst_length(&self) -> u32 {
        1 << self.burst_len
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockConfig {
    /// Frequency of the host-side AXI clock reported in the Xilinx interface
    /// parameters.
    pub freq_hz: u64,
    /// Clock domain name reported in the Xilinx interface parameters.
    pub domain: String,
    /// Frequency of the HBM-side `AXI_nn_ACLK`, noted in the entity ports.
    pub hbm_freq_hz: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            freq_hz: 250_000_000,
            domain: "xdma_axi_aclk".to_string(),
            hbm_freq_hz: 450_000_000,
        }
    }
}

/// Human readable frequency, `450 MHz` when it is a whole number of MHz.
pub fn show_freq(hz: u64) -> String {
    if hz % 1_000_000 == 0 {
        format!("{} MHz", hz / 1_000_000)
    } else {
        format!("{hz} Hz")
    }
}

/// Names the port range a generator expands over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKey {
    AxiMeta,
    BlockInst,
    Sideband,
    HbmInterface,
    /// Source ports of the remapping instance.
    HbmInst,
    Mux,
    IpXact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranges {
    pub axi_meta: PortRange,
    pub block_inst: PortRange,
    pub sideband: PortRange,
    pub hbm_interface: PortRange,
    pub hbm_inst: PortRange,
    pub mux: PortRange,
    pub ip_xact: PortRange,
}

impl Default for Ranges {
    fn default() -> Self {
        Self {
            axi_meta: PortRange::inclusive(0, 31),
            block_inst: PortRange::inclusive(0, 31),
            sideband: PortRange::inclusive(0, 31),
            hbm_interface: PortRange::inclusive(16, 33),
            hbm_inst: PortRange::inclusive(0, 15),
            mux: PortRange::inclusive(0, 15),
            ip_xact: PortRange::inclusive(0, 31),
        }
    }
}

impl Ranges {
    pub fn get(&self, key: RangeKey) -> PortRange {
        *self.get_ref(key)
    }

    fn get_ref(&self, key: RangeKey) -> &PortRange {
        match key {
            RangeKey::AxiMeta => &self.axi_meta,
            RangeKey::BlockInst => &self.block_inst,
            RangeKey::Sideband => &self.sideband,
            RangeKey::HbmInterface => &self.hbm_interface,
            RangeKey::HbmInst => &self.hbm_inst,
            RangeKey::Mux => &self.mux,
            RangeKey::IpXact => &self.ip_xact,
        }
    }

    pub fn get_mut(&mut self, key: RangeKey) -> &mut PortRange {
        match key {
            RangeKey::AxiMeta => &mut self.axi_meta,
            RangeKey::BlockInst => &mut self.block_inst,
            RangeKey::Sideband => &mut self.sideband,
            RangeKey::HbmInterface => &mut self.hbm_interface,
            RangeKey::HbmInst => &mut self.hbm_inst,
            RangeKey::Mux => &mut self.mux,
            RangeKey::IpXact => &mut self.ip_xact,
        }
    }
}

/// How the owner of a channel (host or TFHE) is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectMode {
    /// One select vector for all ports: bit 1 for reads, bit 0 for writes.
    Shared,
    /// One select bit per port and direction.
    PerPort,
}

impl FromStr for SelectMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shared" => Ok(SelectMode::Shared),
            "per-port" => Ok(SelectMode::PerPort),
            _ => Err(format!(
                "`{s}` is not a select mode. Valid modes: shared, per-port"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectConfig {
    pub mode: SelectMode,
    pub shared: String,
    pub read: String,
    pub write: String,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            mode: SelectMode::Shared,
            shared: "HBM_RW_SELECT".to_string(),
            read: "HBM_R_SELECT".to_string(),
            write: "HBM_W_SELECT".to_string(),
        }
    }
}

impl SelectConfig {
    /// Select expression owning the read channels of `port`.
    pub fn read_select(&self, port: PortIdx) -> String {
        match self.mode {
            SelectMode::Shared => format!("{}(1)", self.shared),
            SelectMode::PerPort => format!("{}({})", self.read, port.index()),
        }
    }

    /// Select expression owning the write channels of `port`.
    pub fn write_select(&self, port: PortIdx) -> String {
        match self.mode {
            SelectMode::Shared => format!("{}(0)", self.shared),
            SelectMode::PerPort => format!("{}({})", self.write, port.index()),
        }
    }
}

/// Names of the TFHE record arrays and the constants it drives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TfheConfig {
    pub read_in: String,
    pub read_out: String,
    pub write_in: String,
    pub write_out: String,
    pub burstmode_src: String,
    pub burstsize_src: String,
    pub wstrb_src: String,
    /// Drive the TFHE outputs to zero when the host owns every port.
    pub drive_defaults: bool,
}

impl Default for TfheConfig {
    fn default() -> Self {
        Self {
            read_in: "i_read_pkgs".to_string(),
            read_out: "o_read_pkgs".to_string(),
            write_in: "i_write_pkgs".to_string(),
            write_out: "o_write_pkgs".to_string(),
            burstmode_src: "std_logic_vector(hbm_burstmode)".to_string(),
            burstsize_src: "std_logic_vector(hbm_burstsize)".to_string(),
            wstrb_src: "std_logic_vector(hbm_strobe_setting)".to_string(),
            drive_defaults: true,
        }
    }
}

/// Every constant the generators consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HbmConfig {
    pub bus: BusWidths,
    pub clock: ClockConfig,
    /// Size of each port's address window in bytes.
    pub window_size: u64,
    /// Smallest address block the IP packager accepts.
    pub min_window: u64,
    pub ranges: Ranges,
    /// First destination port of the remapping instance.
    pub remap_dst: u32,
    pub select: SelectConfig,
    pub tfhe: TfheConfig,
}

impl Default for HbmConfig {
    fn default() -> Self {
        Self {
            bus: BusWidths::default(),
            clock: ClockConfig::default(),
            window_size: 256 * 1024 * 1024,
            min_window: 4096,
            ranges: Ranges::default(),
            remap_dst: 16,
            select: SelectConfig::default(),
            tfhe: TfheConfig::default(),
        }
    }
}

fn parse<T>(key: &str, value: &str) -> GenResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse().map_err(|e| {
        Error::invalid_option(format!("`{key}={value}`: {e}"))
    })
}

/// Widths of shifted fields must leave the shift within a `u32`.
const MAX_BURST_LEN_WIDTH: u32 = 31;

fn positive(key: &str, value: &str) -> GenResult<u32> {
    match parse(key, value)? {
        0 => Err(Error::invalid_option(format!("`{key}` must be positive"))),
        n => Ok(n),
    }
}

impl HbmConfig {
    /// Keys accepted by [HbmConfig::set].
    pub const KEYS: &'static [&'static str] = &[
        "addr-width",
        "data-width",
        "id-width",
        "burst-len-width",
        "burst-size-width",
        "burst-mode-width",
        "resp-width",
        "freq-hz",
        "clk-domain",
        "hbm-freq-hz",
        "window-size",
        "min-window",
        "remap-dst",
        "select",
        "shared-select",
        "read-select",
        "write-select",
        "i-read-pkgs",
        "o-read-pkgs",
        "i-write-pkgs",
        "o-write-pkgs",
        "burstmode-src",
        "burstsize-src",
        "wstrb-src",
        "tfhe-defaults",
    ];

    /// Override one constant.
    pub fn set(&mut self, key: &str, value: &str) -> GenResult<()> {
        match key {
            "addr-width" => self.bus.addr = positive(key, value)?,
            "data-width" => {
                let data = positive(key, value)?;
                if data % 8 != 0 {
                    return Err(Error::invalid_option(format!(
                        "`{key}` must be a whole number of bytes, got {data}"
                    )));
                }
                self.bus.data = data;
            }
            "id-width" => self.bus.id = positive(key, value)?,
            "burst-len-width" => match positive(key, value)? {
                n if n > MAX_BURST_LEN_WIDTH => {
                    return Err(Error::invalid_option(format!(
                        "`{key}` must be at most {MAX_BURST_LEN_WIDTH}, got {n}"
                    )));
                }
                n => self.bus.burst_len = n,
            },
            "burst-size-width" => self.bus.burst_size = positive(key, value)?,
            "burst-mode-width" => self.bus.burst_mode = positive(key, value)?,
            "resp-width" => self.bus.resp = positive(key, value)?,
            "freq-hz" => self.clock.freq_hz = parse(key, value)?,
            "clk-domain" => self.clock.domain = value.to_string(),
            "hbm-freq-hz" => self.clock.hbm_freq_hz = parse(key, value)?,
            "window-size" => match parse::<u64>(key, value)? {
                0 => {
                    return Err(Error::invalid_option(
                        "`window-size` must be positive",
                    ));
                }
                size => self.window_size = size,
            },
            "min-window" => self.min_window = parse(key, value)?,
            "remap-dst" => self.remap_dst = parse(key, value)?,
            "select" => self.select.mode = parse(key, value)?,
            "shared-select" => self.select.shared = value.to_string(),
            "read-select" => self.select.read = value.to_string(),
            "write-select" => self.select.write = value.to_string(),
            "i-read-pkgs" => self.tfhe.read_in = value.to_string(),
            "o-read-pkgs" => self.tfhe.read_out = value.to_string(),
            "i-write-pkgs" => self.tfhe.write_in = value.to_string(),
            "o-write-pkgs" => self.tfhe.write_out = value.to_string(),
            "burstmode-src" => self.tfhe.burstmode_src = value.to_string(),
            "burstsize-src" => self.tfhe.burstsize_src = value.to_string(),
            "wstrb-src" => self.tfhe.wstrb_src = value.to_string(),
            "tfhe-defaults" => self.tfhe.drive_defaults = parse(key, value)?,
            _ => {
                return Err(Error::invalid_option(format!(
                    "unknown key `{key}`"
                ))
                .with_post_msg(Some(format!(
                    "Valid keys: {}",
                    Self::KEYS.iter().join(", ")
                ))));
            }
        }
        log::debug!("config: {key} = {value}");
        Ok(())
    }

    /// Apply a list of `key=value` overrides in order.
    pub fn apply_extra_opts<S: AsRef<str>>(
        &mut self,
        opts: &[S],
    ) -> GenResult<()> {
        for opt in opts {
            let opt = opt.as_ref();
            let Some((key, value)) = opt.split_once('=') else {
                return Err(Error::invalid_option(format!(
                    "`{opt}` is not of the form key=value"
                )));
            };
            self.set(key.trim(), value.trim())?;
        }
        Ok(())
    }

    /// Distance from a source port of the remapping instance to its
    /// destination port.
    pub fn remap_offset(&self) -> i64 {
        i64::from(self.remap_dst) - i64::from(self.ranges.hbm_inst.first().index())
    }
}
