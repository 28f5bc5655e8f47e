//! Integration test: set/get round trips for every unit family on every
//! strategy, plus bulk loading and unit export through the dispatcher.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use hoard_core::{
    Allocatable, Coder, Container, Element, IndexedStore, StorageError, StorageKind,
    StorageStrategy,
};
use hoard_store::{Storage, StorageConfig};
use hoard_test_utils::{Amount, Complex, Flags, Glyph, Label, Point, Rgba, ShortPair, Tally};
use num_bigint::BigInt;

/// Config whose array tier holds nothing, forcing the extended tier.
fn extended_only() -> Storage {
    Storage::new(StorageConfig {
        max_array_units: 0,
        extended_chunk_units: 8,
        ..StorageConfig::new()
    })
    .unwrap()
}

fn containers<T: Element>(proto: &T, n: i64) -> Vec<Container<T>> {
    let storage = Storage::default();
    let mut out = vec![
        storage.allocate(proto, n).unwrap(),
        extended_only().allocate(proto, n).unwrap(),
    ];
    for strategy in [StorageStrategy::Sparse, StorageStrategy::Virtual] {
        out.push(storage.allocate_with(strategy, proto, n).unwrap());
    }
    out
}

fn assert_round_trip<T>(proto: &T, values: &[T])
where
    T: Element + std::fmt::Debug,
{
    let n = values.len() as i64;
    for mut c in containers(proto, n) {
        let kind = c.storage_kind();
        assert_eq!(c.size(), n as u64, "{kind}");
        for (i, v) in values.iter().enumerate() {
            c.set(i as u64, v).unwrap();
        }
        let mut out = proto.construct();
        for (i, v) in values.iter().enumerate() {
            c.get(i as u64, &mut out).unwrap();
            assert_eq!(&out, v, "{kind} slot {i}");
        }
    }
}

#[test]
fn every_strategy_yields_its_kind() {
    let kinds: Vec<_> = containers(&Rgba::default(), 3)
        .iter()
        .map(|c| c.storage_kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            StorageKind::Array,
            StorageKind::Extended,
            StorageKind::Sparse,
            StorageKind::Virtual
        ]
    );
}

#[test]
fn byte_family() {
    assert_round_trip(
        &Rgba::default(),
        &[Rgba::new(1, 2, 3, 4), Rgba::default(), Rgba::new(255, 0, 128, 7)],
    );
}

#[test]
fn short_family() {
    assert_round_trip(
        &ShortPair::default(),
        &[ShortPair(i16::MIN, i16::MAX), ShortPair(-1, 1)],
    );
}

#[test]
fn int_family_with_shaped_prototype() {
    assert_round_trip(
        &Point::zeros(3),
        &[
            Point::new(vec![1, -2, 3]),
            Point::new(vec![i32::MAX, 0, i32::MIN]),
            Point::zeros(3),
        ],
    );
}

#[test]
fn long_family() {
    assert_round_trip(
        &Complex::default(),
        &[Complex::new(1.5, -2.25), Complex::new(f64::MAX, f64::MIN_POSITIVE)],
    );
}

#[test]
fn bool_family() {
    let mut flags = [false; 8];
    flags[0] = true;
    flags[7] = true;
    assert_round_trip(&Flags::default(), &[Flags(flags), Flags([true; 8])]);
}

#[test]
fn char_family() {
    assert_round_trip(&Glyph::default(), &[Glyph('a'), Glyph('é'), Glyph('🦀')]);
}

#[test]
fn string_family() {
    assert_round_trip(
        &Label::default(),
        &[Label::from("alpha"), Label::from(""), Label::from("ünïcödé")],
    );
}

#[test]
fn big_integer_family() {
    assert_round_trip(
        &Tally::default(),
        &[
            Tally::parse("-123456789012345678901234567890").unwrap(),
            Tally::parse("42").unwrap(),
        ],
    );
}

#[test]
fn big_decimal_family() {
    assert_round_trip(
        &Amount::default(),
        &[
            Amount::parse("3.14159265358979323846264338327950288").unwrap(),
            Amount::parse("-0.001").unwrap(),
        ],
    );
}

#[test]
fn zero_sized_containers_reject_all_access() {
    for mut c in containers(&Rgba::default(), 0) {
        let mut out = Rgba::default();
        assert!(matches!(
            c.get(0, &mut out),
            Err(StorageError::IndexOutOfBounds { index: 0, size: 0 })
        ));
    }
}

#[test]
fn bulk_loaders_cover_each_family() {
    let storage = Storage::default();

    let c = storage.from_shorts(&ShortPair::default(), &[1, 2, 3, 4]).unwrap();
    assert_eq!(c.size(), 2);

    let mut c = storage.from_ints(&Point::zeros(2), &[1, 2, 3, 4, 5, 6]).unwrap();
    let mut p = Point::zeros(2);
    c.get(2, &mut p).unwrap();
    assert_eq!(p, Point::new(vec![5, 6]));

    let c = storage
        .from_longs(&Complex::default(), &[0, 0, 0, 0])
        .unwrap();
    assert_eq!(c.size(), 2);

    let c = storage.from_bools(&Flags::default(), &[true; 16]).unwrap();
    assert_eq!(c.size(), 2);

    let mut c = storage.from_chars(&Glyph::default(), &['x', 'y']).unwrap();
    let mut g = Glyph::default();
    c.get(1, &mut g).unwrap();
    assert_eq!(g, Glyph('y'));

    let mut c = storage
        .from_strings(&Label::default(), &["a".to_owned(), "b".to_owned()])
        .unwrap();
    let mut l = Label::default();
    c.get(0, &mut l).unwrap();
    assert_eq!(l, Label::from("a"));

    let c = storage
        .from_big_integers(&Tally::default(), &[BigInt::from(7), BigInt::from(-7)])
        .unwrap();
    assert_eq!(c.size(), 2);

    let mut c = storage
        .from_big_decimals(&Amount::default(), &[BigDecimal::from_str("9.99").unwrap()])
        .unwrap();
    let mut a = Amount::default();
    c.get(0, &mut a).unwrap();
    assert_eq!(a, Amount::parse("9.99").unwrap());
}

#[test]
fn bulk_load_alignment() {
    let storage = Storage::default();
    let c = storage.from_bytes(&Rgba::default(), &[0u8; 12]).unwrap();
    assert_eq!(c.size(), 3);
    assert!(matches!(
        storage.from_bytes(&Rgba::default(), &[0u8; 10]),
        Err(StorageError::MisalignedInput {
            len: 10,
            unit_count: 4
        })
    ));
    assert!(matches!(
        storage.from_ints(&Point::zeros(0), &[]),
        Err(StorageError::InvalidArgument { .. })
    ));
}

#[test]
fn export_inverts_bulk_load_on_every_tier() {
    let raw: Vec<i32> = (0..12).collect();
    for storage in [Storage::default(), extended_only()] {
        let mut c = storage.from_ints(&Point::zeros(3), &raw).unwrap();
        assert_eq!(c.size(), 4);
        let units = storage.export_units(c.as_mut(), &Point::zeros(3)).unwrap();
        assert_eq!(units, raw);
    }
    let storage = Storage::default();
    let mut c = storage
        .allocate_with(StorageStrategy::Virtual, &Point::zeros(3), 4)
        .unwrap();
    let mut p = Point::zeros(3);
    for i in 0..4 {
        p.from_units(&raw, i * 3);
        c.set(i as u64, &p).unwrap();
    }
    assert_eq!(
        storage.export_units(c.as_mut(), &Point::zeros(3)).unwrap(),
        raw
    );
}

