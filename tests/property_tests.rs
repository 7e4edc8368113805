//! Property-based tests for rust_telemetry_logger using proptest

use proptest::prelude::*;
use rust_telemetry_logger::core::{BufferedSink, Sink};
use rust_telemetry_logger::destinations::MemoryDestination;
use rust_telemetry_logger::prelude::*;
use std::time::Duration;

fn any_level() -> impl Strategy<Value = Level> {
    prop::sample::select(Level::ALL.to_vec())
}

/// Random upper/lower casing of `text`
fn mixed_case(text: &'static str) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<bool>(), text.len()).prop_map(move |upper| {
        text.chars()
            .zip(upper)
            .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
            .collect()
    })
}

// ============================================================================
// Level Tests
// ============================================================================

proptest! {
    /// Level order matches the underlying integer order
    #[test]
    fn test_level_ordering(level1 in any_level(), level2 in any_level()) {
        let val1 = level1 as i8;
        let val2 = level2 as i8;

        prop_assert_eq!(level1 <= level2, val1 <= val2);
        prop_assert_eq!(level1 < level2, val1 < val2);
    }

    /// A threshold admits exactly the levels at or above it
    #[test]
    fn test_filter_admits_at_or_above(min in any_level(), level in any_level()) {
        prop_assert_eq!(LevelFilter::At(min).admits(level), level >= min);
        prop_assert!(!LevelFilter::Off.admits(level));
    }

    /// Parsing ignores case
    #[test]
    fn test_level_parse_any_casing(
        (level, text) in any_level().prop_flat_map(|level| (Just(level), mixed_case(level.as_str())))
    ) {
        let parsed: Level = text.parse().unwrap();
        prop_assert_eq!(parsed, level);

        let mut slot = Level::Fatal;
        slot.unmarshal_text(text.as_bytes()).unwrap();
        prop_assert_eq!(slot, level);
    }

    /// Text outside the known names never parses
    #[test]
    fn test_unknown_level_text_rejected(text in "[a-z]{1,10}") {
        prop_assume!(Level::ALL.iter().all(|level| level.as_str() != text));

        let err = text.parse::<Level>().unwrap_err();
        prop_assert!(err.to_string().contains("unrecognized level"));
    }

    /// Lowercase rendering parses back to the same level
    #[test]
    fn test_level_text_roundtrip(level in any_level()) {
        let text = level.marshal_text();
        let mut parsed = Level::default();
        parsed.unmarshal_text(&text).unwrap();
        prop_assert_eq!(parsed, level);
    }
}

// ============================================================================
// BufferedSink Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Everything written comes out once, in order, and no write is split
    #[test]
    fn test_drain_completeness(
        capacity in 1usize..256,
        writes in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..64), 0..40),
    ) {
        let memory = MemoryDestination::new();
        let handle = memory.handle();
        let sink = BufferedSink::new(Box::new(memory), capacity, Duration::from_secs(3600)).unwrap();

        for write in &writes {
            sink.write(write).unwrap();
        }
        sink.close().unwrap();

        prop_assert_eq!(handle.contents(), writes.concat());

        // every batch is a run of whole writes
        let mut remaining = writes.iter();
        for batch in handle.batches() {
            let mut consumed = 0;
            while consumed < batch.len() {
                let write = remaining.next().expect("batch holds more than was written");
                prop_assert_eq!(&batch[consumed..consumed + write.len()], write.as_slice());
                consumed += write.len();
            }
        }
        prop_assert!(remaining.next().is_none());
    }

    /// A failed sync loses nothing and duplicates nothing
    #[test]
    fn test_drain_survives_failed_sync(
        writes in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..32), 1..20),
        fail_at in 0usize..20,
    ) {
        let memory = MemoryDestination::new();
        let handle = memory.handle();
        let sink = BufferedSink::new(Box::new(memory), 128, Duration::from_secs(3600)).unwrap();

        for (i, write) in writes.iter().enumerate() {
            if i == fail_at {
                handle.set_failing(true);
                prop_assert!(sink.sync().is_err());
                handle.set_failing(false);
            }
            sink.write(write).unwrap();
        }
        sink.close().unwrap();

        prop_assert_eq!(handle.contents(), writes.concat());
    }
}

// ============================================================================
// Field Tests
// ============================================================================

proptest! {
    /// Accumulated fields of a child never leak into its parent
    #[test]
    fn test_child_fields_do_not_leak(
        parent_keys in prop::collection::vec("[a-z]{1,8}", 0..8),
        child_keys in prop::collection::vec("[a-z]{1,8}", 0..8),
    ) {
        let mut parent = Logger::nop();
        parent.with(None, parent_keys.iter().map(|k| Field::bool(k.as_str(), true)));

        let child = parent.new_child(None, child_keys.iter().map(|k| Field::bool(k.as_str(), false)));
        parent.with(None, [Field::string("late", "x")]);

        let child_seen: Vec<&str> = child.fields().iter().map(|f| f.key()).collect();
        let child_expected: Vec<&str> = parent_keys
            .iter()
            .chain(child_keys.iter())
            .map(String::as_str)
            .collect();
        prop_assert_eq!(child_seen, child_expected);
        prop_assert_eq!(parent.fields().len(), parent_keys.len() + 1);
    }
}
