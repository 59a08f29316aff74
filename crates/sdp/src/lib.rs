//! SDP: the SpiNNaker Datagram Protocol frames exchanged between the board and
//! the visualisers.
//!
//! Frame layout inside a UDP datagram:
//!   00  : u8      ip_time_out
//!   01  : u8      pad
//!   02  : u8      flags
//!   03  : u8      tag
//!   04  : u8      dest_port
//!   05  : u8      src_port
//!   06  : u16     dest_addr           (big-endian)
//!   08  : u16     src_addr            (big-endian)
//!   0A  : u16     command             (little-endian)
//!   0C  : u16     seq                 (little-endian)
//!   0E  : u32[3]  arg1, arg2, arg3    (little-endian)
//!   1A  : payload
//!
//! Heat payload: trailing little-endian u32 words, fixed point with a
//! configurable number of fractional bits.
//!
//! Pixel payload: `arg1` records of 7 bytes, big-endian
//!   [u16 x][u16 y][u8 r][u8 g][u8 b]
//!
//! Unbooted boards announce themselves with "hello" datagrams carrying
//! `SPINN_HELLO` as a big-endian u32 at offset 2; these are not SDP frames.

mod command;
mod error;
mod header;
mod payload;

pub use command::{encode_command, to_fixed_16_16, HeatCommand, HEAT_CONTROL_PORT};
pub use error::{Error, Result};
pub use header::{encode_control, is_hello, SdpHeader, HEADER_LEN, MTU, SPINN_HELLO};
pub use payload::{
    decode_heat_payload, decode_pixel_records, heat_word_count, FixedPoint, HeatWords,
    PixelRecord, PixelRecords, PIXEL_DATA_COMMAND, PIXEL_RECORD_LEN,
};
