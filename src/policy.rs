//! Shelf placement heuristics.
//!
//! All three share the packing loop in [`crate::solver::Packer`] and differ
//! only in how they pick a bin for a new shelf and a shelf for an item.

use crate::shelf::Shelf;
use crate::solver::{BinList, ShelfPolicy, ShelfRef, fits};
use crate::types::Item;

/// Finite Next-Fit: only the most recently opened bin and shelf are candidates.
///
/// Once a bin or shelf stops being current it is never looked at again.
#[derive(Debug, Clone, Default)]
pub struct NextFit {
    current_bin: Option<usize>,
    current_shelf: Option<ShelfRef>,
}

impl ShelfPolicy for NextFit {
    fn select_or_create_bin(&mut self, bins: &mut BinList, shelf: &Shelf) -> usize {
        if let Some(bin) = self.current_bin
            && bins.bins()[bin].empty_y() >= shelf.size().y
        {
            return bin;
        }
        let bin = bins.create_bin();
        self.current_bin = Some(bin);
        bin
    }

    fn select_or_create_shelf(&mut self, bins: &mut BinList, item: &Item) -> ShelfRef {
        if let Some(r) = self.current_shelf
            && fits(bins.shelf(r), item)
        {
            return r;
        }
        let r = bins.create_and_pack_shelf(self, item);
        self.current_shelf = Some(r);
        r
    }
}

/// Finite First-Fit: the first bin or shelf, in creation order, with enough room.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFit;

impl ShelfPolicy for FirstFit {
    fn select_or_create_bin(&mut self, bins: &mut BinList, shelf: &Shelf) -> usize {
        let found = bins
            .bins()
            .iter()
            .position(|b| b.empty_y() >= shelf.size().y);
        match found {
            Some(idx) => idx,
            None => bins.create_bin(),
        }
    }

    fn select_or_create_shelf(&mut self, bins: &mut BinList, item: &Item) -> ShelfRef {
        let found = bins.shelves().find(|(_, s)| fits(s, item)).map(|(r, _)| r);
        match found {
            Some(r) => r,
            None => bins.create_and_pack_shelf(self, item),
        }
    }
}

/// Finite Best-Fit: the bin or shelf left with the least room after packing.
///
/// Ties go to the earliest candidate in creation order.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestFit;

impl ShelfPolicy for BestFit {
    fn select_or_create_bin(&mut self, bins: &mut BinList, shelf: &Shelf) -> usize {
        let height = shelf.size().y;
        let mut best: Option<(usize, u32)> = None;

        for (idx, bin) in bins.bins().iter().enumerate() {
            let Some(leftover) = bin.empty_y().checked_sub(height) else {
                continue;
            };
            if best.is_none_or(|(_, min)| leftover < min) {
                best = Some((idx, leftover));
            }
        }

        match best {
            Some((idx, _)) => idx,
            None => bins.create_bin(),
        }
    }

    fn select_or_create_shelf(&mut self, bins: &mut BinList, item: &Item) -> ShelfRef {
        let mut best: Option<(ShelfRef, u32)> = None;

        for (r, shelf) in bins.shelves() {
            if !fits(shelf, item) {
                continue;
            }
            let leftover = shelf.empty_x() - item.size.x;
            if best.is_none_or(|(_, min)| leftover < min) {
                best = Some((r, leftover));
            }
        }

        match best {
            Some((r, _)) => r,
            None => bins.create_and_pack_shelf(self, item),
        }
    }
}
