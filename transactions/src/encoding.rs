//! Compact variable-width encodings.
//!
//! Every transaction carries a signed delegate reference, so it is encoded
//! zigzag-then-varint: small magnitudes of either sign take one byte.

use slate_types::DelegateId;

use crate::error::TxError;

/// Append a LEB128 varint to `buf`.
pub fn write_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            return;
        }
        buf.push(byte | 0x80);
    }
}

/// Decode a LEB128 varint from the front of `buf`.
///
/// Returns the value and the number of bytes consumed.
pub fn read_varint(buf: &[u8]) -> Result<(u64, usize), TxError> {
    let mut value: u64 = 0;
    for (i, &byte) in buf.iter().enumerate().take(10) {
        value |= ((byte & 0x7f) as u64) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(TxError::TruncatedVarint)
}

fn zigzag(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

fn unzigzag(v: u64) -> i64 {
    ((v >> 1) as i64) ^ -((v & 1) as i64)
}

/// Append a delegate reference in its compact signed encoding.
pub fn write_delegate_id(id: DelegateId, buf: &mut Vec<u8>) {
    write_varint(zigzag(id.raw() as i64), buf);
}

/// Decode a delegate reference from the front of `buf`.
pub fn read_delegate_id(buf: &[u8]) -> Result<(DelegateId, usize), TxError> {
    let (raw, used) = read_varint(buf)?;
    let signed = unzigzag(raw);
    let narrowed =
        i32::try_from(signed).map_err(|_| TxError::DelegateIdOutOfRange(signed))?;
    Ok((DelegateId::from_raw(narrowed), used))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn small_ids_take_one_byte() {
        for raw in [-63, -1, 0, 1, 63] {
            let mut buf = Vec::new();
            write_delegate_id(DelegateId::from_raw(raw), &mut buf);
            assert_eq!(buf.len(), 1, "id {raw} should fit one byte");
        }
    }

    #[test]
    fn known_varint_bytes() {
        let mut buf = Vec::new();
        write_varint(300, &mut buf);
        assert_eq!(buf, vec![0xac, 0x02]);
        assert_eq!(read_varint(&buf).unwrap(), (300, 2));
    }

    #[test]
    fn truncated_input_is_an_error() {
        assert!(matches!(read_varint(&[0x80]), Err(TxError::TruncatedVarint)));
        assert!(matches!(read_varint(&[]), Err(TxError::TruncatedVarint)));
    }

    #[test]
    fn out_of_range_delegate_id_rejected() {
        let mut buf = Vec::new();
        write_varint(zigzag(i64::from(i32::MAX) + 1), &mut buf);
        assert!(matches!(
            read_delegate_id(&buf),
            Err(TxError::DelegateIdOutOfRange(_))
        ));
    }

    proptest! {
        #[test]
        fn varint_roundtrip(v in any::<u64>()) {
            let mut buf = Vec::new();
            write_varint(v, &mut buf);
            let (decoded, used) = read_varint(&buf).unwrap();
            prop_assert_eq!(decoded, v);
            prop_assert_eq!(used, buf.len());
        }

        #[test]
        fn delegate_id_roundtrip(raw in any::<i32>()) {
            let id = DelegateId::from_raw(raw);
            let mut buf = Vec::new();
            write_delegate_id(id, &mut buf);
            let (decoded, used) = read_delegate_id(&buf).unwrap();
            prop_assert_eq!(decoded, id);
            prop_assert_eq!(used, buf.len());
        }
    }
}
