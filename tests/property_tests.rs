use framesrv::buffer::{DynBuf, MIN_CAPACITY};
use framesrv::echo::session::extract_message;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: appends never lose bytes and consume returns them in order.
    #[test]
    fn buffer_preserves_bytes_across_appends(
        chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..16)
    ) {
        let mut buf = DynBuf::new();
        let mut expected = Vec::new();
        for chunk in &chunks {
            buf.append(chunk);
            expected.extend_from_slice(chunk);
        }
        prop_assert_eq!(buf.len(), expected.len());
        prop_assert_eq!(buf.unconsumed(), &expected[..]);

        let out = buf.consume(expected.len()).unwrap();
        prop_assert_eq!(&out[..], &expected[..]);
        prop_assert!(buf.is_empty());
    }

    /// Property: length accounting holds under interleaved appends and
    /// partial consumes, and consumed bytes come back in order.
    #[test]
    fn buffer_accounting_survives_partial_consumes(
        chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..32), 1..12),
        steps in prop::collection::vec(1usize..16, 1..32)
    ) {
        let mut buf = DynBuf::new();
        let mut expected = Vec::new();
        let mut collected = Vec::new();

        let mut steps = steps.into_iter();
        for chunk in &chunks {
            buf.append(chunk);
            expected.extend_from_slice(chunk);

            if let Some(step) = steps.next() {
                let n = step.min(buf.len());
                let out = buf.consume(n).unwrap();
                collected.extend_from_slice(&out);
            }
        }
        collected.extend_from_slice(buf.unconsumed());
        prop_assert_eq!(&collected[..], &expected[..]);
    }

    /// Property: capacity is a power-of-two multiple of the floor, large
    /// enough for everything buffered.
    #[test]
    fn buffer_capacity_grows_by_doubling(
        total in 0usize..4096
    ) {
        let mut buf = DynBuf::new();
        buf.append(&vec![0u8; total]);

        let capacity = buf.capacity();
        prop_assert!(capacity >= total);
        prop_assert!(capacity >= MIN_CAPACITY);
        prop_assert!(capacity % MIN_CAPACITY == 0);
        prop_assert!((capacity / MIN_CAPACITY).is_power_of_two());

        // smallest such value: halving would no longer fit
        if capacity > MIN_CAPACITY {
            prop_assert!(capacity / 2 < total);
        }
    }

    /// Property: line framing recovers every message, in order, however the
    /// input was chunked on arrival.
    #[test]
    fn line_framing_recovers_all_messages(
        messages in prop::collection::vec(
            prop::collection::vec(any::<u8>().prop_filter("no terminator", |b| *b != b'\n'), 0..32),
            1..16
        ),
        split in 1usize..64
    ) {
        let mut wire = Vec::new();
        for message in &messages {
            wire.extend_from_slice(message);
            wire.push(b'\n');
        }

        let mut buf = DynBuf::new();
        let mut framed = Vec::new();
        for chunk in wire.chunks(split) {
            buf.append(chunk);
            while let Some(message) = extract_message(&mut buf).unwrap() {
                framed.push(message.to_vec());
            }
        }

        prop_assert_eq!(framed.len(), messages.len());
        for (got, sent) in framed.iter().zip(&messages) {
            prop_assert_eq!(&got[..got.len() - 1], &sent[..]);
            prop_assert_eq!(got[got.len() - 1], b'\n');
        }
        prop_assert!(buf.is_empty());
    }
}
