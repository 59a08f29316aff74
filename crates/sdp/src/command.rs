use bytes::Bytes;

use crate::header::{encode_control, SdpHeader};

/// SDP port the heat-map application listens on for control packets.
pub const HEAT_CONTROL_PORT: u8 = 0x21;

/// Control commands understood by the heat-map application on each chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum HeatCommand {
    Stop = 0,
    Set = 1,
    Pause = 2,
    Resume = 3,
}

impl HeatCommand {
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(Self::Stop),
            1 => Some(Self::Set),
            2 => Some(Self::Pause),
            3 => Some(Self::Resume),
            _ => None,
        }
    }
}

/// 16.16 fixed point, rounded to nearest. Negative values wrap to two's complement.
pub fn to_fixed_16_16(value: f32) -> u32 {
    (value as f64 * 65536.0).round() as i32 as u32
}

/// Encodes a heat command for the chip at `dest_addr`. The four edge values
/// follow the header; they are zero for everything except `Set`.
pub fn encode_command(dest_addr: u16, command: HeatCommand, edges: [f32; 4]) -> Bytes {
    let header = SdpHeader::control(dest_addr, HEAT_CONTROL_PORT, command.code());
    let words = match command {
        HeatCommand::Set => edges.map(to_fixed_16_16),
        _ => [0; 4],
    };
    encode_control(&header, &words)
}
