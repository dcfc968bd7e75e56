use serde::Serialize;

use crate::types::{Item, Point};

/// A row of fixed height spanning the full width of its bin.
///
/// The height is taken from the item that opened the shelf and never changes.
#[derive(Debug, Clone, Serialize)]
pub struct Shelf {
    size: Point,
    filled_to_x: u32,
    items: Vec<(Item, Point)>,
}

impl Shelf {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Point::new(width, height),
            filled_to_x: 0,
            items: Vec::new(),
        }
    }

    pub fn size(&self) -> Point {
        self.size
    }

    pub fn filled_to_x(&self) -> u32 {
        self.filled_to_x
    }

    /// Packed items with their offsets inside the shelf, in packing order.
    pub fn items(&self) -> &[(Item, Point)] {
        &self.items
    }

    /// Caller guarantees `item.size.x <= self.empty_x()`.
    pub fn pack(&mut self, item: Item, x: u32, y: u32) {
        debug_assert!(item.size.x <= self.empty_x());
        self.items.push((item, Point::new(x, y)));
        self.filled_to_x += item.size.x;
    }

    pub fn empty_x(&self) -> u32 {
        self.size.x - self.filled_to_x
    }

    pub fn filled_area(&self) -> u64 {
        self.items.iter().map(|(item, _)| item.area()).sum()
    }
}

/// A fixed-size container stacking shelves bottom to top.
#[derive(Debug, Clone, Serialize)]
pub struct Bin {
    size: Point,
    filled_to_y: u32,
    shelves: Vec<(Shelf, Point)>,
}

impl Bin {
    pub fn new(size: Point) -> Self {
        Self {
            size,
            filled_to_y: 0,
            shelves: Vec::new(),
        }
    }

    pub fn size(&self) -> Point {
        self.size
    }

    pub fn filled_to_y(&self) -> u32 {
        self.filled_to_y
    }

    /// Shelves with their offsets inside the bin, in creation order.
    pub fn shelves(&self) -> &[(Shelf, Point)] {
        &self.shelves
    }

    pub(crate) fn shelf_mut(&mut self, idx: usize) -> &mut Shelf {
        &mut self.shelves[idx].0
    }

    /// Caller guarantees `shelf.size().y <= self.empty_y()`.
    pub fn pack(&mut self, shelf: Shelf, x: u32, y: u32) {
        debug_assert!(shelf.size.y <= self.empty_y());
        self.filled_to_y += shelf.size.y;
        self.shelves.push((shelf, Point::new(x, y)));
    }

    pub fn empty_y(&self) -> u32 {
        self.size.y - self.filled_to_y
    }

    pub fn filled_area(&self) -> u64 {
        self.shelves.iter().map(|(shelf, _)| shelf.filled_area()).sum()
    }

    pub fn filled_area_ratio(&self) -> f64 {
        let area = self.size.x as u64 * self.size.y as u64;
        if area == 0 {
            return 0.0;
        }
        self.filled_area() as f64 / area as f64
    }

    pub fn item_count(&self) -> usize {
        self.shelves.iter().map(|(shelf, _)| shelf.items.len()).sum()
    }

    /// Every packed item with its absolute position in the bin.
    pub fn placements(&self) -> impl Iterator<Item = (&Item, Point)> {
        self.shelves.iter().flat_map(|(shelf, shelf_offset)| {
            shelf
                .items
                .iter()
                .map(move |(item, item_offset)| (item, *shelf_offset + *item_offset))
        })
    }
}
