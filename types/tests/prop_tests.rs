use proptest::prelude::*;

use slate_types::{BlockHash, DelegateId, ShareAmount, Timestamp, TxHash};

proptest! {
    /// BlockHash roundtrip: new -> as_bytes produces identical bytes.
    #[test]
    fn block_hash_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = BlockHash::new(bytes);
        prop_assert_eq!(hash.as_bytes(), &bytes);
    }

    /// BlockHash::is_zero is true only for all-zero bytes.
    #[test]
    fn block_hash_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        let hash = BlockHash::new(bytes);
        prop_assert_eq!(hash.is_zero(), bytes == [0u8; 32]);
    }

    /// TxHash bincode serialization roundtrip.
    #[test]
    fn tx_hash_bincode_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = TxHash::new(bytes);
        let encoded = bincode::serialize(&hash).unwrap();
        let decoded: TxHash = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded.as_bytes(), hash.as_bytes());
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// Timestamp elapsed_since: elapsed_since(now) = now - self (saturating).
    #[test]
    fn timestamp_elapsed_since(base in 0u64..1_000_000, offset in 0u64..1_000_000) {
        let t = Timestamp::new(base);
        let now = Timestamp::new(base + offset);
        prop_assert_eq!(t.elapsed_since(now), offset);
    }

    /// ShareAmount: checked_add(a, b) == Some(a + b) when no overflow.
    #[test]
    fn share_amount_checked_add(a in 0u64..u64::MAX / 2, b in 0u64..u64::MAX / 2) {
        let sum = ShareAmount::new(a).checked_add(ShareAmount::new(b));
        prop_assert_eq!(sum, Some(ShareAmount::new(a + b)));
    }

    /// ShareAmount: checked_sub returns None exactly when b > a.
    #[test]
    fn share_amount_checked_sub_underflow(a in 0u64..1_000_000, b in 0u64..1_000_000) {
        let result = ShareAmount::new(a).checked_sub(ShareAmount::new(b));
        if b > a {
            prop_assert!(result.is_none());
        } else {
            prop_assert_eq!(result, Some(ShareAmount::new(a - b)));
        }
    }

    /// DelegateId: base magnitude and polarity survive the signed encoding.
    #[test]
    fn delegate_id_sign_split(raw in -1_000_000i32..1_000_000) {
        let id = DelegateId::from_raw(raw);
        prop_assert_eq!(id.is_none(), raw == 0);
        if let Some(base) = id.base() {
            prop_assert_eq!(base.get(), raw.unsigned_abs());
        }
    }

    /// DelegateId bincode roundtrip.
    #[test]
    fn delegate_id_bincode_roundtrip(raw in any::<i32>()) {
        let id = DelegateId::from_raw(raw);
        let encoded = bincode::serialize(&id).unwrap();
        let decoded: DelegateId = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, id);
    }
}
