//! Opcode-driven float decoding.

use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::trace;

use crate::{Error, Result};

/// Followed by a little-endian `f32`.
pub const OP_RAW: u8 = 0xFF;

/// Followed by a little-endian `u16` count `c`; repeats the last value `c + 1` times.
pub const OP_REPEAT: u8 = 0xFE;

/// Reserved; never produced by the game's encoder.
pub const OP_RESERVED: u8 = 0xFD;

const DELTA_SCALE: f64 = 3.9676e-10;

/// Cap on up-front allocation; `count` comes from outside the stream.
const MAX_PREALLOC: usize = 1 << 16;

/// The signed step a delta code adds to the previous value.
///
/// The curve is quartic around 126, giving fine resolution for small moves:
/// code 126 is zero, 127 is about `4e-10` and 0 is about `-0.1`.
#[inline]
pub fn delta(code: u8) -> f64 {
    let x = f64::from(code) - 126.0;
    DELTA_SCALE * x.powi(3) * x.abs()
}

/// Decode exactly `count` floats.
///
/// Values are accumulated in `f64` and narrowed on output. The reader is
/// consumed strictly forward and left just past the last opcode used.
///
/// # Errors
///
/// - [`Error::InvalidState`] if a repeat or delta precedes the first raw value.
/// - [`Error::UnsupportedOpcode`] on `0xFD`.
/// - [`Error::LengthMismatch`] if a repeat would run past `count`.
/// - [`Error::Truncated`] if the input ends first.
///
/// # Example
///
/// ```
/// use simsfile_cfp::read_compressed_floats;
///
/// let mut data: &[u8] = &[0xFF, 0x00, 0x00, 0x80, 0x3F, 0xFE, 0x01, 0x00];
/// let values = read_compressed_floats(&mut data, 3).unwrap();
/// assert_eq!(values, [1.0, 1.0, 1.0]);
/// ```
pub fn read_compressed_floats<R: Read + ?Sized>(reader: &mut R, count: usize) -> Result<Vec<f32>> {
    let mut values = Vec::with_capacity(count.min(MAX_PREALLOC));
    let mut last: Option<f64> = None;

    while values.len() < count {
        let decoded = values.len();
        let opcode = reader.read_u8().map_err(|e| truncated(e, decoded))?;

        match opcode {
            OP_RAW => {
                let value = reader
                    .read_f32::<LittleEndian>()
                    .map_err(|e| truncated(e, decoded))?;
                last = Some(f64::from(value));
                values.push(value);
            }
            OP_REPEAT => {
                let repeats = usize::from(
                    reader
                        .read_u16::<LittleEndian>()
                        .map_err(|e| truncated(e, decoded))?,
                ) + 1;
                let value = last.ok_or(Error::InvalidState { opcode, decoded })?;
                if decoded + repeats > count {
                    return Err(Error::LengthMismatch {
                        expected: count,
                        actual: decoded + repeats,
                    });
                }
                values.resize(decoded + repeats, value as f32);
            }
            OP_RESERVED => return Err(Error::UnsupportedOpcode(opcode)),
            code => {
                let previous = last.ok_or(Error::InvalidState { opcode, decoded })?;
                let value = previous + delta(code);
                last = Some(value);
                values.push(value as f32);
            }
        }
    }

    trace!(count, "decoded compressed floats");
    Ok(values)
}

fn truncated(err: io::Error, decoded: usize) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        Error::Truncated { decoded }
    } else {
        Error::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn raw(value: f32) -> Vec<u8> {
        let mut out = vec![OP_RAW];
        out.extend_from_slice(&value.to_le_bytes());
        out
    }

    fn repeat(extra: u16) -> Vec<u8> {
        let mut out = vec![OP_REPEAT];
        out.extend_from_slice(&extra.to_le_bytes());
        out
    }

    #[test]
    fn test_raw_then_repeat_once() {
        let mut data = raw(1.0);
        data.extend(repeat(0));
        assert_eq!(read_compressed_floats(&mut data.as_slice(), 2).unwrap(), [1.0, 1.0]);
    }

    #[test]
    fn test_zero_delta() {
        let mut data = raw(2.0);
        data.push(0x7E);
        assert_eq!(read_compressed_floats(&mut data.as_slice(), 2).unwrap(), [2.0, 2.0]);
    }

    #[test]
    fn test_delta_without_previous_value() {
        let data = [0x7Eu8];
        assert!(matches!(
            read_compressed_floats(&mut &data[..], 1),
            Err(Error::InvalidState { opcode: 0x7E, decoded: 0 })
        ));

        let data = repeat(3);
        assert!(matches!(
            read_compressed_floats(&mut data.as_slice(), 4),
            Err(Error::InvalidState { opcode: OP_REPEAT, .. })
        ));
    }

    #[test]
    fn test_reserved_opcode() {
        let mut data = raw(0.5);
        data.push(OP_RESERVED);
        assert!(matches!(
            read_compressed_floats(&mut data.as_slice(), 2),
            Err(Error::UnsupportedOpcode(0xFD))
        ));
    }

    #[test]
    fn test_repeat_overshoot() {
        let mut data = raw(1.0);
        data.extend(repeat(4));
        assert!(matches!(
            read_compressed_floats(&mut data.as_slice(), 3),
            Err(Error::LengthMismatch { expected: 3, actual: 6 })
        ));
    }

    #[test]
    fn test_truncated_input() {
        let data = raw(1.0);
        assert!(matches!(
            read_compressed_floats(&mut data.as_slice(), 2),
            Err(Error::Truncated { decoded: 1 })
        ));

        let data = [OP_RAW, 0x00, 0x00];
        assert!(matches!(
            read_compressed_floats(&mut &data[..], 1),
            Err(Error::Truncated { decoded: 0 })
        ));
    }

    #[test]
    fn test_delta_curve() {
        assert_eq!(delta(126), 0.0);
        assert!(delta(127) > 0.0 && delta(127) < 1e-9);
        assert!(delta(125) < 0.0);
        assert!((delta(0) + 3.9676e-10 * 126f64.powi(4)).abs() < 1e-12);
        assert_eq!(delta(130), -delta(122));
    }

    #[test]
    fn test_small_deltas_accumulate() {
        // A single +1 step is below f32 resolution at 1.0; many of them are not.
        let mut data = raw(1.0);
        data.extend(std::iter::repeat(0x7F).take(1000));
        let values = read_compressed_floats(&mut data.as_slice(), 1001).unwrap();
        let expected = 1.0 + 1000.0 * delta(0x7F);
        assert_ne!(values[1000], 1.0);
        assert_eq!(values[1000], expected as f32);
    }

    #[test]
    fn test_reader_left_after_last_opcode() {
        let mut data = raw(3.0);
        data.extend(raw(4.0));
        let mut slice = data.as_slice();
        assert_eq!(read_compressed_floats(&mut slice, 1).unwrap(), [3.0]);
        assert_eq!(slice.len(), 5);
    }

    #[test]
    fn test_zero_count_reads_nothing() {
        let data = [OP_RESERVED];
        let mut slice = &data[..];
        assert!(read_compressed_floats(&mut slice, 0).unwrap().is_empty());
        assert_eq!(slice.len(), 1);
    }

    proptest! {
        #[test]
        fn raw_values_round_trip(values in prop::collection::vec(-1e6f32..1e6, 0..64)) {
            let data: Vec<u8> = values.iter().flat_map(|&v| raw(v)).collect();
            let decoded = read_compressed_floats(&mut data.as_slice(), values.len()).unwrap();
            prop_assert_eq!(decoded, values);
        }

        #[test]
        fn repeats_fill_exactly(start in -10f32..10.0, runs in prop::collection::vec(0u16..50, 1..8)) {
            let mut data = raw(start);
            let mut count = 1;
            for extra in &runs {
                data.extend(repeat(*extra));
                count += usize::from(*extra) + 1;
            }
            let decoded = read_compressed_floats(&mut data.as_slice(), count).unwrap();
            prop_assert_eq!(decoded.len(), count);
            prop_assert!(decoded.iter().all(|&v| v == start));
        }
    }
}
