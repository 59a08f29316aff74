use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Error, Result};

/// Fixed SDP header length, including the two leading padding bytes.
pub const HEADER_LEN: usize = 26;

/// Largest datagram the board will send.
pub const MTU: usize = 1515;

/// Marker found at offset 2 of the bootstrap datagrams sent by unbooted boards.
pub const SPINN_HELLO: u32 = 0x41;

const HELLO_OFFSET: usize = 2;

const CONTROL_FLAGS: u8 = 0x07;
const CONTROL_TAG: u8 = 0xFF;
const CONTROL_SRC_PORT: u8 = 0xFF;

/// Returns true for an unbooted-board hello datagram.
pub fn is_hello(buf: &[u8]) -> bool {
    match buf.get(HELLO_OFFSET..HELLO_OFFSET + 4) {
        Some(mut word) => word.get_u32() == SPINN_HELLO,
        None => false,
    }
}

/// Decoded SDP header. Unknown command codes are carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SdpHeader {
    pub ip_time_out: u8,
    pub flags: u8,
    pub tag: u8,
    pub dest_port: u8,
    pub src_port: u8,
    pub dest_addr: u16,
    pub src_addr: u16,
    pub command: u16,
    pub seq: u16,
    pub arg1: u32,
    pub arg2: u32,
    pub arg3: u32,
}

impl SdpHeader {
    /// Header for a host-to-board control packet.
    pub fn control(dest_addr: u16, dest_port: u8, command: u16) -> Self {
        Self {
            ip_time_out: 0,
            flags: CONTROL_FLAGS,
            tag: CONTROL_TAG,
            dest_port,
            src_port: CONTROL_SRC_PORT,
            dest_addr,
            src_addr: 0,
            command,
            seq: 0,
            arg1: 0,
            arg2: 0,
            arg3: 0,
        }
    }

    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_LEN {
            return Err(Error::MalformedPacket {
                len: buf.len(),
                need: HEADER_LEN,
            });
        }
        let mut b = &buf[..HEADER_LEN];
        let ip_time_out = b.get_u8();
        let _pad = b.get_u8();
        Ok(Self {
            ip_time_out,
            flags: b.get_u8(),
            tag: b.get_u8(),
            dest_port: b.get_u8(),
            src_port: b.get_u8(),
            dest_addr: b.get_u16(),
            src_addr: b.get_u16(),
            command: b.get_u16_le(),
            seq: b.get_u16_le(),
            arg1: b.get_u32_le(),
            arg2: b.get_u32_le(),
            arg3: b.get_u32_le(),
        })
    }

    pub fn encode(&self, out: &mut BytesMut) {
        out.reserve(HEADER_LEN);
        out.put_u8(self.ip_time_out);
        out.put_u8(0);
        out.put_u8(self.flags);
        out.put_u8(self.tag);
        out.put_u8(self.dest_port);
        out.put_u8(self.src_port);
        out.put_u16(self.dest_addr);
        out.put_u16(self.src_addr);
        out.put_u16_le(self.command);
        out.put_u16_le(self.seq);
        out.put_u32_le(self.arg1);
        out.put_u32_le(self.arg2);
        out.put_u32_le(self.arg3);
    }
}

/// Encodes a control packet: a control header followed by `words` as
/// little-endian u32s.
pub fn encode_control(header: &SdpHeader, words: &[u32]) -> Bytes {
    let mut out = BytesMut::with_capacity(HEADER_LEN + 4 * words.len());
    header.encode(&mut out);
    for w in words {
        out.put_u32_le(*w);
    }
    out.freeze()
}
