use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::demand::DemandList;
use crate::error::PackError;
use crate::policy;
use crate::shelf::{Bin, Shelf};
use crate::types::{Demand, Item, Point};

/// Address of a shelf in a [`BinList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShelfRef {
    pub bin: usize,
    pub shelf: usize,
}

/// Width-only fit test.
///
/// Items reach the packer in non-increasing height order, so a shelf is never
/// shorter than an item offered to it.
pub fn fits(shelf: &Shelf, item: &Item) -> bool {
    shelf.empty_x() >= item.size.x
}

/// The two placement decisions that distinguish one shelf heuristic from another.
pub trait ShelfPolicy {
    /// Returns the index of a bin with at least `shelf.size().y` height left,
    /// opening a new one with [`BinList::create_bin`] if needed.
    fn select_or_create_bin(&mut self, bins: &mut BinList, shelf: &Shelf) -> usize;

    /// Returns a shelf with room for `item`, opening a new one with
    /// [`BinList::create_and_pack_shelf`] if needed.
    fn select_or_create_shelf(&mut self, bins: &mut BinList, item: &Item) -> ShelfRef;
}

/// Arena of bins built during one packing run.
#[derive(Debug, Clone)]
pub struct BinList {
    bin_size: Point,
    bins: Vec<Bin>,
}

impl BinList {
    pub fn new(bin_size: Point) -> Self {
        Self {
            bin_size,
            bins: Vec::new(),
        }
    }

    pub fn bin_size(&self) -> Point {
        self.bin_size
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn shelf(&self, r: ShelfRef) -> &Shelf {
        &self.bins[r.bin].shelves()[r.shelf].0
    }

    /// All shelves, by bin creation order and then shelf creation order.
    pub fn shelves(&self) -> impl Iterator<Item = (ShelfRef, &Shelf)> {
        self.bins.iter().enumerate().flat_map(|(bin, b)| {
            b.shelves()
                .iter()
                .enumerate()
                .map(move |(shelf, (s, _))| (ShelfRef { bin, shelf }, s))
        })
    }

    pub fn create_bin(&mut self) -> usize {
        self.bins.push(Bin::new(self.bin_size));
        let idx = self.bins.len() - 1;
        tracing::debug!(bin = idx, "opened bin");
        idx
    }

    /// Opens a shelf as tall as `item` and stacks it in the bin chosen by `policy`.
    pub fn create_and_pack_shelf<P>(&mut self, policy: &mut P, item: &Item) -> ShelfRef
    where
        P: ShelfPolicy + ?Sized,
    {
        let shelf = Shelf::new(self.bin_size.x, item.size.y);
        let bin = policy.select_or_create_bin(self, &shelf);

        let target = &mut self.bins[bin];
        let y = target.filled_to_y();
        target.pack(shelf, 0, y);
        let shelf = target.shelves().len() - 1;

        tracing::debug!(bin, shelf, y, height = item.size.y, "opened shelf");
        ShelfRef { bin, shelf }
    }

    pub(crate) fn pack_item(&mut self, r: ShelfRef, item: Item) {
        let shelf = self.bins[r.bin].shelf_mut(r.shelf);
        let x = shelf.filled_to_x();
        shelf.pack(item, x, 0);
    }

    pub fn into_bins(self) -> Vec<Bin> {
        self.bins
    }
}

/// Shared packing loop, parameterized by the placement policy.
pub struct Packer<P> {
    bins: BinList,
    policy: P,
    last_height: Option<u32>,
}

impl<P: ShelfPolicy> Packer<P> {
    pub fn new(bin_size: Point, policy: P) -> Self {
        Self {
            bins: BinList::new(bin_size),
            policy,
            last_height: None,
        }
    }

    /// Sorts `demand` tallest first and places every item in that order.
    pub fn run(mut self, mut demand: DemandList) -> Vec<Bin> {
        demand.sort_by_height();
        for item in demand {
            self.place(item);
        }
        self.bins.into_bins()
    }

    fn place(&mut self, item: Item) {
        if let Some(last) = self.last_height {
            assert!(
                item.size.y <= last,
                "item {item} placed after an item of height {last}: input must be sorted by descending height"
            );
        }
        self.last_height = Some(item.size.y);

        let r = self.policy.select_or_create_shelf(&mut self.bins, &item);
        self.bins.pack_item(r, item);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    NextFit,
    FirstFit,
    #[default]
    BestFit,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::NextFit, Strategy::FirstFit, Strategy::BestFit];

    pub fn pack(self, bin_size: Point, demand: DemandList) -> Vec<Bin> {
        match self {
            Strategy::NextFit => Packer::new(bin_size, policy::NextFit::default()).run(demand),
            Strategy::FirstFit => Packer::new(bin_size, policy::FirstFit).run(demand),
            Strategy::BestFit => Packer::new(bin_size, policy::BestFit).run(demand),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::NextFit => "next-fit",
            Strategy::FirstFit => "first-fit",
            Strategy::BestFit => "best-fit",
        })
    }
}

impl FromStr for Strategy {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "next-fit" => Ok(Strategy::NextFit),
            "first-fit" => Ok(Strategy::FirstFit),
            "best-fit" => Ok(Strategy::BestFit),
            _ => Err(PackError::UnknownStrategy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Solution {
    pub bins: Vec<Bin>,
    pub bin_size: Point,
    pub strategy: Strategy,
}

impl Solution {
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    pub fn item_count(&self) -> usize {
        self.bins.iter().map(Bin::item_count).sum()
    }

    pub fn filled_area(&self) -> u64 {
        self.bins.iter().map(Bin::filled_area).sum()
    }

    /// Item area over total bin area, as a percentage.
    pub fn filled_percent(&self) -> f64 {
        let bin_area = self.bin_size.x as u64 * self.bin_size.y as u64;
        let total = bin_area * self.bins.len() as u64;
        if total == 0 {
            return 0.0;
        }
        self.filled_area() as f64 / total as f64 * 100.0
    }
}

pub struct Solver {
    bin_size: Point,
    strategy: Strategy,
    demands: Vec<Demand>,
}

impl Solver {
    pub fn new(bin_size: Point, strategy: Strategy, demands: Vec<Demand>) -> Self {
        Self {
            bin_size,
            strategy,
            demands,
        }
    }

    /// Validates the demand against the bin size, then packs it.
    pub fn solve(&self) -> Result<Solution, PackError> {
        let demand = DemandList::new(self.bin_size, &self.demands)?;
        let items = demand.len();

        let bins = self.strategy.pack(self.bin_size, demand);
        tracing::info!(
            strategy = %self.strategy,
            items,
            bins = bins.len(),
            "packing finished"
        );

        Ok(Solution {
            bins,
            bin_size: self.bin_size,
            strategy: self.strategy,
        })
    }
}
