use bytes::Buf;

use crate::error::{Error, Result};
use crate::header::HEADER_LEN;

/// Command code carried by path-tracer pixel datagrams.
pub const PIXEL_DATA_COMMAND: u16 = 3;

/// Size of one encoded pixel record.
pub const PIXEL_RECORD_LEN: usize = 7;

/// Number of whole heat words following the header.
pub fn heat_word_count(buf: &[u8]) -> usize {
    buf.len().saturating_sub(HEADER_LEN) / 4
}

/// Converts raw wire words into readings: `value = raw * 2^-bits`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPoint {
    bits: u32,
    factor: f32,
}

impl FixedPoint {
    pub fn new(bits: u32) -> Self {
        Self {
            bits,
            factor: (-(bits as f64)).exp2() as f32,
        }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn to_float(&self, raw: u32) -> f32 {
        (raw as f64 * self.factor as f64) as f32
    }
}

impl Default for FixedPoint {
    fn default() -> Self {
        Self::new(16)
    }
}

/// Iterator over `(cell_index, raw_word)` pairs of a heat payload.
#[derive(Debug, Clone)]
pub struct HeatWords<'a> {
    words: &'a [u8],
    next_index: usize,
}

impl Iterator for HeatWords<'_> {
    type Item = (usize, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.words.len() < 4 {
            return None;
        }
        let raw = self.words.get_u32_le();
        let index = self.next_index;
        self.next_index += 1;
        Some((index, raw))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.words.len() / 4;
        (n, Some(n))
    }
}

impl ExactSizeIterator for HeatWords<'_> {}

/// Reads `count` little-endian words after the header. Indices start at `offset`.
pub fn decode_heat_payload(buf: &[u8], offset: usize, count: usize) -> Result<HeatWords<'_>> {
    let available = heat_word_count(buf);
    if count > available {
        return Err(Error::TruncatedPayload {
            declared: count,
            available,
        });
    }
    Ok(HeatWords {
        words: &buf[HEADER_LEN..HEADER_LEN + 4 * count],
        next_index: offset,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRecord {
    pub x: u16,
    pub y: u16,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone)]
pub struct PixelRecords<'a> {
    records: &'a [u8],
}

impl Iterator for PixelRecords<'_> {
    type Item = PixelRecord;

    fn next(&mut self) -> Option<PixelRecord> {
        if self.records.len() < PIXEL_RECORD_LEN {
            return None;
        }
        let rec = &mut self.records;
        Some(PixelRecord {
            x: rec.get_u16(),
            y: rec.get_u16(),
            r: rec.get_u8(),
            g: rec.get_u8(),
            b: rec.get_u8(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.records.len() / PIXEL_RECORD_LEN;
        (n, Some(n))
    }
}

impl ExactSizeIterator for PixelRecords<'_> {}

/// Decodes `count` pixel records following the header. The count comes from the
/// header's `arg1`; a datagram too short to hold them is rejected whole.
pub fn decode_pixel_records(buf: &[u8], count: usize) -> Result<PixelRecords<'_>> {
    let available = buf.len().saturating_sub(HEADER_LEN) / PIXEL_RECORD_LEN;
    if count > available {
        return Err(Error::TruncatedPayload {
            declared: count,
            available,
        });
    }
    Ok(PixelRecords {
        records: &buf[HEADER_LEN..HEADER_LEN + PIXEL_RECORD_LEN * count],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datagram(payload: &[u8]) -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_LEN];
        buf.extend_from_slice(payload);
        buf
    }

    #[test]
    fn heat_words_are_little_endian_and_offset() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&65536u32.to_le_bytes());
        payload.extend_from_slice(&131072u32.to_le_bytes());
        payload.push(0xAA); // trailing partial word is ignored
        let buf = datagram(&payload);

        assert_eq!(heat_word_count(&buf), 2);
        let words: Vec<_> = decode_heat_payload(&buf, 16, 2).unwrap().collect();
        assert_eq!(words, vec![(16, 65536), (17, 131072)]);
    }

    #[test]
    fn heat_payload_count_beyond_buffer_is_truncated() {
        let buf = datagram(&[0u8; 8]);
        let err = decode_heat_payload(&buf, 0, 3).unwrap_err();
        assert_eq!(err, Error::TruncatedPayload { declared: 3, available: 2 });
    }

    #[test]
    fn fixed_point_scaling() {
        let fp = FixedPoint::new(16);
        assert_eq!(fp.to_float(65536), 1.0);
        assert_eq!(fp.to_float(131072), 2.0);
        assert_eq!(fp.to_float(32768), 0.5);
        assert_eq!(FixedPoint::new(0).to_float(7), 7.0);
    }

    #[test]
    fn pixel_records_are_big_endian() {
        let buf = datagram(&[0x01, 0x02, 0x00, 0x0A, 100, 150, 200, 0, 1, 0, 2, 1, 2, 3]);
        let recs: Vec<_> = decode_pixel_records(&buf, 2).unwrap().collect();
        assert_eq!(
            recs,
            vec![
                PixelRecord { x: 0x0102, y: 10, r: 100, g: 150, b: 200 },
                PixelRecord { x: 1, y: 2, r: 1, g: 2, b: 3 },
            ]
        );
    }

    #[test]
    fn pixel_count_from_header_must_fit() {
        let buf = datagram(&[0u8; 13]);
        let err = decode_pixel_records(&buf, 2).unwrap_err();
        assert_eq!(err, Error::TruncatedPayload { declared: 2, available: 1 });
        assert_eq!(decode_pixel_records(&buf, 0).unwrap().count(), 0);
    }

    #[test]
    fn headerless_buffer_has_no_words() {
        assert_eq!(heat_word_count(&[0u8; 10]), 0);
        assert!(decode_pixel_records(&[0u8; 10], 1).is_err());
    }
}
