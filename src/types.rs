use std::fmt;
use std::ops::{Add, Div};

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// A 2D integer vector. Used both for sizes and for offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const ZERO: Point = Point::new(0, 0);

    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl From<[u32; 2]> for Point {
    fn from([x, y]: [u32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for [u32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Div<u32> for Point {
    type Output = Point;

    fn div(self, rhs: u32) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// A rectangle to be packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Item {
    pub size: Point,
}

impl Item {
    pub fn new(size: Point) -> Self {
        Self { size }
    }

    pub fn area(&self) -> u64 {
        self.size.x as u64 * self.size.y as u64
    }

    /// Palette index in `0..=255`, a pure function of the item size.
    ///
    /// Only rendering looks at this.
    pub fn color_index(&self) -> u8 {
        const FNV_OFFSET: u32 = 0x811c_9dc5;
        const FNV_PRIME: u32 = 0x0100_0193;

        let hash = self
            .size
            .x
            .to_le_bytes()
            .iter()
            .chain(&self.size.y.to_le_bytes())
            .fold(FNV_OFFSET, |h, &b| (h ^ b as u32).wrapping_mul(FNV_PRIME));
        (hash & 0xff) as u8
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.size.x, self.size.y)
    }
}

/// One entry of the demand mapping: `count` copies of an item of `size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demand {
    pub size: Point,
    #[serde(deserialize_with = "deserialize_count")]
    pub count: u32,
}

/// Accepts only non-negative integral JSON numbers, with a readable message otherwise.
pub fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    struct CountVisitor;

    impl<'de> Visitor<'de> for CountVisitor {
        type Value = u32;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer count")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u32, E> {
            u32::try_from(v).map_err(|_| E::custom(format!("count {v} is too large")))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u32, E> {
            if v < 0 {
                return Err(E::custom(format!("count must be non-negative, got {v}")));
            }
            self.visit_u64(v as u64)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<u32, E> {
            Err(E::custom(format!("count must be an integer, got {v}")))
        }
    }

    deserializer.deserialize_any(CountVisitor)
}
