//! Fixture element types for hoard development.
//!
//! One small element per unit family, each implementing the allocatable and
//! coder contracts so stores can be exercised across every family:
//!
//! | fixture | unit | units per element |
//! |---|---|---|
//! | [`Rgba`] | `u8` | 4 |
//! | [`ShortPair`] | `i16` | 2 |
//! | [`Point`] | `i32` | dimension (shape-carrying) |
//! | [`Complex`] | `i64` | 2 |
//! | [`Flags`] | `bool` | 8 |
//! | [`Glyph`] | `char` | 1 |
//! | [`Label`] | `String` | 1 |
//! | [`Tally`] | `BigInt` | 1 |
//! | [`Amount`] | `BigDecimal` | 1 |

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::str::FromStr;

use bigdecimal::BigDecimal;
use hoard_core::{Allocatable, Coder};
use num_bigint::BigInt;

/// Implements `Allocatable` for a fixture whose zero value is `Default`.
macro_rules! default_allocatable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Allocatable for $ty {
                fn construct(&self) -> Self {
                    Self::default()
                }

                fn construct_from(other: &Self) -> Self {
                    other.clone()
                }
            }
        )*
    };
}

default_allocatable!(Rgba, ShortPair, Complex, Flags, Glyph, Label, Tally, Amount);

/// Four byte channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Coder for Rgba {
    type Unit = u8;

    fn unit_count(&self) -> usize {
        4
    }

    fn to_units(&self, buf: &mut [u8], offset: usize) {
        buf[offset..offset + 4].copy_from_slice(&[self.r, self.g, self.b, self.a]);
    }

    fn from_units(&mut self, buf: &[u8], offset: usize) {
        self.r = buf[offset];
        self.g = buf[offset + 1];
        self.b = buf[offset + 2];
        self.a = buf[offset + 3];
    }
}

/// Two shorts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShortPair(pub i16, pub i16);

impl Coder for ShortPair {
    type Unit = i16;

    fn unit_count(&self) -> usize {
        2
    }

    fn to_units(&self, buf: &mut [i16], offset: usize) {
        buf[offset] = self.0;
        buf[offset + 1] = self.1;
    }

    fn from_units(&mut self, buf: &[i16], offset: usize) {
        self.0 = buf[offset];
        self.1 = buf[offset + 1];
    }
}

/// Integer point whose dimension is fixed by its prototype.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub coords: Vec<i32>,
}

impl Point {
    pub fn zeros(dim: usize) -> Self {
        Self {
            coords: vec![0; dim],
        }
    }

    pub fn new(coords: Vec<i32>) -> Self {
        Self { coords }
    }
}

impl Allocatable for Point {
    fn construct(&self) -> Self {
        Self::zeros(self.coords.len())
    }

    fn construct_from(other: &Self) -> Self {
        other.clone()
    }
}

impl Coder for Point {
    type Unit = i32;

    fn unit_count(&self) -> usize {
        self.coords.len()
    }

    fn to_units(&self, buf: &mut [i32], offset: usize) {
        buf[offset..offset + self.coords.len()].copy_from_slice(&self.coords);
    }

    fn from_units(&mut self, buf: &[i32], offset: usize) {
        let dim = self.coords.len();
        self.coords.copy_from_slice(&buf[offset..offset + dim]);
    }
}

/// Complex number stored as the bit patterns of its two parts.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

impl Coder for Complex {
    type Unit = i64;

    fn unit_count(&self) -> usize {
        2
    }

    fn to_units(&self, buf: &mut [i64], offset: usize) {
        buf[offset] = self.re.to_bits() as i64;
        buf[offset + 1] = self.im.to_bits() as i64;
    }

    fn from_units(&mut self, buf: &[i64], offset: usize) {
        self.re = f64::from_bits(buf[offset] as u64);
        self.im = f64::from_bits(buf[offset + 1] as u64);
    }
}

/// Eight boolean flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags(pub [bool; 8]);

impl Coder for Flags {
    type Unit = bool;

    fn unit_count(&self) -> usize {
        8
    }

    fn to_units(&self, buf: &mut [bool], offset: usize) {
        buf[offset..offset + 8].copy_from_slice(&self.0);
    }

    fn from_units(&mut self, buf: &[bool], offset: usize) {
        self.0.copy_from_slice(&buf[offset..offset + 8]);
    }
}

/// A single character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Glyph(pub char);

impl Coder for Glyph {
    type Unit = char;

    fn unit_count(&self) -> usize {
        1
    }

    fn to_units(&self, buf: &mut [char], offset: usize) {
        buf[offset] = self.0;
    }

    fn from_units(&mut self, buf: &[char], offset: usize) {
        self.0 = buf[offset];
    }
}

/// A text label.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Label(pub String);

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl Coder for Label {
    type Unit = String;

    fn unit_count(&self) -> usize {
        1
    }

    fn to_units(&self, buf: &mut [String], offset: usize) {
        buf[offset].clone_from(&self.0);
    }

    fn from_units(&mut self, buf: &[String], offset: usize) {
        self.0.clone_from(&buf[offset]);
    }
}

/// An arbitrary-precision counter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally(pub BigInt);

impl Tally {
    /// Parse a base-10 integer.
    pub fn parse(s: &str) -> Option<Self> {
        BigInt::parse_bytes(s.as_bytes(), 10).map(Self)
    }
}

impl Coder for Tally {
    type Unit = BigInt;

    fn unit_count(&self) -> usize {
        1
    }

    fn to_units(&self, buf: &mut [BigInt], offset: usize) {
        buf[offset].clone_from(&self.0);
    }

    fn from_units(&mut self, buf: &[BigInt], offset: usize) {
        self.0.clone_from(&buf[offset]);
    }
}

/// An arbitrary-precision decimal amount.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Amount(pub BigDecimal);

impl Amount {
    /// Parse a decimal literal such as `"12.50"`.
    pub fn parse(s: &str) -> Option<Self> {
        BigDecimal::from_str(s).ok().map(Self)
    }
}

impl Coder for Amount {
    type Unit = BigDecimal;

    fn unit_count(&self) -> usize {
        1
    }

    fn to_units(&self, buf: &mut [BigDecimal], offset: usize) {
        buf[offset].clone_from(&self.0);
    }

    fn from_units(&mut self, buf: &[BigDecimal], offset: usize) {
        self.0.clone_from(&buf[offset]);
    }
}
