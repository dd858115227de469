//! The signal descriptor table for one HBM pseudo-channel AXI port.
use crate::config::BusWidths;
use hbmgen_utils::{Error, GenResult};
use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;

/// Direction of a signal from the perspective of the HBM slave port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Driven by the bus master into the memory.
    Input,
    /// Driven by the memory.
    Output,
}

impl Direction {
    /// The Verilog port keyword.
    pub fn verilog(self) -> &'static str {
        match self {
            Direction::Input => "input",
            Direction::Output => "output",
        }
    }

    /// The VHDL port mode.
    pub fn vhdl(self) -> &'static str {
        match self {
            Direction::Input => "in",
            Direction::Output => "out",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Scalar,
    Vector,
}

/// The AXI channel a signal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Channel {
    /// Clock and reset shared by all channels of a port.
    Global,
    ReadAddress,
    ReadData,
    WriteAddress,
    WriteData,
    WriteResponse,
    /// AXI signals the memory does not use (protection, cache, lock, QoS).
    Sideband,
}

impl Channel {
    /// The five AXI channels in declaration order.
    pub const BUS: [Channel; 5] = [
        Channel::ReadAddress,
        Channel::ReadData,
        Channel::WriteAddress,
        Channel::WriteData,
        Channel::WriteResponse,
    ];
}

/// Channels are routed in two groups, each with its own owner select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    Read,
    Write,
}

impl Side {
    pub fn channels(self) -> &'static [Channel] {
        match self {
            Side::Read => &[Channel::ReadAddress, Channel::ReadData],
            Side::Write => &[
                Channel::WriteAddress,
                Channel::WriteData,
                Channel::WriteResponse,
            ],
        }
    }

    /// All bus signals on this side going in `direction`, channel by
    /// channel in table order.
    pub fn signals(
        self,
        direction: Direction,
    ) -> impl Iterator<Item = &'static SignalDescriptor> {
        self.channels()
            .iter()
            .flat_map(move |ch| channel_signals(*ch, direction))
    }
}

/// Abstract width of a signal. The HBM widths are VHDL generics on one side
/// and concrete numbers from [BusWidths] on the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Width {
    Bit,
    Addr,
    BurstMode,
    Id,
    BurstLen,
    BurstSize,
    Data,
    /// One bit per data byte (strobes and parity).
    ByteLanes,
    Resp,
    /// Width fixed by the AXI protocol.
    Fixed(u32),
}

impl Width {
    pub fn category(self) -> Category {
        match self {
            Width::Bit | Width::Fixed(1) => Category::Scalar,
            _ => Category::Vector,
        }
    }

    /// Name of the VHDL generic holding this width, if there is one.
    pub fn generic(self) -> Option<&'static str> {
        Some(match self {
            Width::Addr => "hbm_addr_width",
            Width::BurstMode => "hbm_burstmode_bit_width",
            Width::Id => "hbm_id_bit_width",
            Width::BurstLen => "hbm_burstlen_bit_width",
            Width::BurstSize => "hbm_burstsize_bit_width",
            Width::Data => "hbm_data_width",
            Width::ByteLanes => "hbm_bytes_per_ps_port",
            Width::Resp => "hbm_resp_bit_width",
            Width::Bit | Width::Fixed(_) => return None,
        })
    }

    /// Concrete number of bits.
    pub fn bits(self, bus: &BusWidths) -> u32 {
        match self {
            Width::Bit => 1,
            Width::Addr => bus.addr,
            Width::BurstMode => bus.burst_mode,
            Width::Id => bus.id,
            Width::BurstLen => bus.burst_len,
            Width::BurstSize => bus.burst_size,
            Width::Data => bus.data,
            Width::ByteLanes => bus.byte_lanes(),
            Width::Resp => bus.resp,
            Width::Fixed(n) => n,
        }
    }

    /// VHDL type, e.g. `std_logic_vector(hbm_id_bit_width-1 downto 0)`.
    pub fn vhdl_type(self) -> String {
        match (self, self.generic()) {
            (_, Some(generic)) => {
                format!("std_logic_vector({generic}-1 downto 0)")
            }
            (Width::Fixed(n), None) if n > 1 => {
                format!("std_logic_vector({} downto 0)", n - 1)
            }
            _ => "std_logic".to_string(),
        }
    }

    /// Verilog packed range, e.g. `[32:0]`. Scalars have none.
    pub fn verilog_range(self, bus: &BusWidths) -> Option<String> {
        match self.category() {
            Category::Scalar => None,
            Category::Vector => Some(format!("[{}:0]", self.bits(bus) - 1)),
        }
    }
}

/// Static metadata describing one named wire of an AXI port. The name is the
/// suffix after the port prefix: `ARADDR` in `AXI_00_ARADDR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SignalDescriptor {
    pub name: &'static str,
    pub channel: Channel,
    pub width: Width,
    pub direction: Direction,
}

impl SignalDescriptor {
    const fn new(
        name: &'static str,
        channel: Channel,
        width: Width,
        direction: Direction,
    ) -> Self {
        Self {
            name,
            channel,
            width,
            direction,
        }
    }

    pub fn category(&self) -> Category {
        self.width.category()
    }

    pub fn is_scalar(&self) -> bool {
        self.category() == Category::Scalar
    }

    /// The name in lower case, as used for internal wires and record fields.
    pub fn field(&self) -> String {
        self.name.to_lowercase()
    }
}

use Channel::*;
use Direction::*;

const fn sig(
    name: &'static str,
    channel: Channel,
    width: Width,
    direction: Direction,
) -> SignalDescriptor {
    SignalDescriptor::new(name, channel, width, direction)
}

/// Every signal of one AXI port. Within a channel, the order is the order in
/// which generators emit the signals.
pub const AXI_SIGNALS: &[SignalDescriptor] = &[
    sig("ACLK", Global, Width::Bit, Input),
    sig("ARESET_N", Global, Width::Bit, Input),
    // read address
    sig("ARADDR", ReadAddress, Width::Addr, Input),
    sig("ARBURST", ReadAddress, Width::BurstMode, Input),
    sig("ARID", ReadAddress, Width::Id, Input),
    sig("ARLEN", ReadAddress, Width::BurstLen, Input),
    sig("ARSIZE", ReadAddress, Width::BurstSize, Input),
    sig("ARVALID", ReadAddress, Width::Bit, Input),
    sig("ARREADY", ReadAddress, Width::Bit, Output),
    // read data
    sig("RDATA_PARITY", ReadData, Width::ByteLanes, Output),
    sig("RDATA", ReadData, Width::Data, Output),
    sig("RID", ReadData, Width::Id, Output),
    sig("RLAST", ReadData, Width::Bit, Output),
    sig("RRESP", ReadData, Width::Resp, Output),
    sig("RVALID", ReadData, Width::Bit, Output),
    sig("RREADY", ReadData, Width::Bit, Input),
    // write address
    sig("AWADDR", WriteAddress, Width::Addr, Input),
    sig("AWBURST", WriteAddress, Width::BurstMode, Input),
    sig("AWID", WriteAddress, Width::Id, Input),
    sig("AWLEN", WriteAddress, Width::BurstLen, Input),
    sig("AWSIZE", WriteAddress, Width::BurstSize, Input),
    sig("AWVALID", WriteAddress, Width::Bit, Input),
    sig("AWREADY", WriteAddress, Width::Bit, Output),
    // write data
    sig("WDATA", WriteData, Width::Data, Input),
    sig("WLAST", WriteData, Width::Bit, Input),
    sig("WSTRB", WriteData, Width::ByteLanes, Input),
    sig("WDATA_PARITY", WriteData, Width::ByteLanes, Input),
    sig("WVALID", WriteData, Width::Bit, Input),
    sig("WREADY", WriteData, Width::Bit, Output),
    // write response
    sig("BID", WriteResponse, Width::Id, Output),
    sig("BRESP", WriteResponse, Width::Resp, Output),
    sig("BVALID", WriteResponse, Width::Bit, Output),
    sig("BREADY", WriteResponse, Width::Bit, Input),
    // unused by the memory, tied off at the top level
    sig("ARPROT", Sideband, Width::Fixed(3), Input),
    sig("ARCACHE", Sideband, Width::Fixed(4), Input),
    sig("ARLOCK", Sideband, Width::Bit, Input),
    sig("ARQOS", Sideband, Width::Fixed(4), Input),
    sig("AWPROT", Sideband, Width::Fixed(3), Input),
    sig("AWCACHE", Sideband, Width::Fixed(4), Input),
    sig("AWLOCK", Sideband, Width::Bit, Input),
    sig("AWQOS", Sideband, Width::Fixed(4), Input),
];

lazy_static! {
    static ref SIGNAL_INDEX: HashMap<&'static str, &'static SignalDescriptor> =
        AXI_SIGNALS.iter().map(|s| (s.name, s)).collect();
}

/// Find the descriptor for `name`.
pub fn lookup(name: &str) -> GenResult<&'static SignalDescriptor> {
    SIGNAL_INDEX
        .get(name)
        .copied()
        .ok_or_else(|| Error::undefined(name, "AXI signal"))
}

/// Signals of `channel` going in `direction`, in table order.
pub fn channel_signals(
    channel: Channel,
    direction: Direction,
) -> impl Iterator<Item = &'static SignalDescriptor> {
    AXI_SIGNALS
        .iter()
        .filter(move |s| s.channel == channel && s.direction == direction)
}
