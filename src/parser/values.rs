// abif: Decoding ABIF sequencer trace files and re-calling bases.
//
// Copyright 2025 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//
use serde::Serialize;

/// Calendar date, 4 bytes: int16 year, uint8 month, uint8 day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Date {
    pub year: i16,
    pub month: u8,
    pub day: u8,
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

/// Time of day, 4 bytes: hour, minute, second, hundredths of a second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub hsecond: u8,
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}.{:02}", self.hour, self.minute, self.second, self.hsecond)
    }
}

/// Thumbprint, 10 bytes: int32 d, int32 u, uint8 c, uint8 n.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ThumbPrint {
    pub d: i32,
    pub u: i32,
    pub c: u8,
    pub n: u8,
}

impl std::fmt::Display for ThumbPrint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {}, {}, {})", self.d, self.u, self.c, self.n)
    }
}

/// A rational number kept in lowest terms with a non-negative denominator.
///
/// A zero denominator is allowed: 1/0, -1/0 and 0/0 stand for positive
/// infinity, negative infinity and NaN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct IntegerFraction {
    numerator: i32,
    denominator: i32,
}

fn gcd(
    mut left: i64,
    mut right: i64,
) -> i64 {
    while right != 0 {
        let remainder = left % right;
        left = right;
        right = remainder;
    }
    left.abs()
}

impl IntegerFraction {
    pub fn new(
        numerator: i32,
        denominator: i32,
    ) -> Self {
        let (mut n, mut d) = (numerator as i64, denominator as i64);
        if d == 0 {
            n = n.signum();
        } else if n == 0 {
            d = 1;
        } else if d < 0 {
            n = -n;
            d = -d;
        }
        let div = gcd(n, d);
        if div > 1 {
            n /= div;
            d /= div;
        }
        // -2^31 negated does not fit back into i32.
        let bound = |x: i64| x.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
        IntegerFraction { numerator: bound(n), denominator: bound(d) }
    }

    pub fn numerator(&self) -> i32 {
        self.numerator
    }

    pub fn denominator(&self) -> i32 {
        self.denominator
    }

    pub fn to_f64(&self) -> f64 {
        if self.denominator == 0 {
            return match self.numerator {
                n if n > 0 => f64::INFINITY,
                n if n < 0 => f64::NEG_INFINITY,
                _ => f64::NAN,
            }
        }
        self.numerator as f64 / self.denominator as f64
    }
}

impl std::fmt::Display for IntegerFraction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} / {}", self.numerator, self.denominator)
    }
}

/// 16-bit point, 4 bytes: int16 v, int16 h.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    pub v: i16,
    pub h: i16,
}

/// 32-bit point, 8 bytes: int32 v, int32 h.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct VPoint {
    pub v: i32,
    pub h: i32,
}

impl From<Point> for VPoint {
    fn from(point: Point) -> Self {
        VPoint { v: point.v as i32, h: point.h as i32 }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {})", self.v, self.h)
    }
}

impl std::fmt::Display for VPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {})", self.v, self.h)
    }
}

/// 16-bit rectangle, 8 bytes: int16 top, left, bottom, right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Rect {
    pub top: i16,
    pub left: i16,
    pub bottom: i16,
    pub right: i16,
}

/// 32-bit rectangle, 16 bytes: int32 top, left, bottom, right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct VRect {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl From<Rect> for VRect {
    fn from(rect: Rect) -> Self {
        VRect { top: rect.top as i32, left: rect.left as i32, bottom: rect.bottom as i32, right: rect.right as i32 }
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {}, {}, {})", self.top, self.left, self.bottom, self.right)
    }
}

impl std::fmt::Display for VRect {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {}, {}, {})", self.top, self.left, self.bottom, self.right)
    }
}

/// Reference to another tag, 8 bytes: 4 character name, int32 number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Tag {
    pub name: String,
    pub number: i32,
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}#{}", self.name, self.number)
    }
}
