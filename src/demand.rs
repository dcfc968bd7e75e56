use crate::error::PackError;
use crate::types::{Demand, Item, Point};

/// Upper bound on the expanded item count of one demand.
pub const MAX_ITEMS: u64 = 1_000_000;

/// The flat list of items to pack, expanded from the demand mapping.
#[derive(Debug, Clone, Default)]
pub struct DemandList {
    items: Vec<Item>,
}

impl DemandList {
    /// Expands `demands` in input order, `count` copies per entry.
    ///
    /// Every entry is validated against `bin_size` before anything is expanded
    /// into the list, so an item that can never be packed is reported here rather
    /// than during packing.
    pub fn new(bin_size: Point, demands: &[Demand]) -> Result<Self, PackError> {
        if bin_size.x == 0 || bin_size.y == 0 {
            return Err(PackError::InvalidBin(bin_size));
        }

        for (i, d) in demands.iter().enumerate() {
            if d.size.x == 0 || d.size.y == 0 {
                return Err(PackError::InvalidItem(d.size));
            }
            if demands[..i].iter().any(|prev| prev.size == d.size) {
                return Err(PackError::DuplicateSize(d.size));
            }
            if d.size.x > bin_size.x || d.size.y > bin_size.y {
                return Err(PackError::ItemExceedsBin {
                    item: d.size,
                    bin: bin_size,
                });
            }
        }

        let total: u64 = demands.iter().map(|d| d.count as u64).sum();
        if total > MAX_ITEMS {
            return Err(PackError::TooManyItems {
                total,
                limit: MAX_ITEMS,
            });
        }

        let mut items = Vec::with_capacity(total as usize);
        for d in demands {
            items.extend(std::iter::repeat_n(Item::new(d.size), d.count as usize));
        }
        Ok(Self { items })
    }

    /// Tallest first. The sort is stable: equal heights keep their expansion order.
    pub fn sort_by_height(&mut self) {
        self.items.sort_by(|a, b| b.size.y.cmp(&a.size.y));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }
}

impl IntoIterator for DemandList {
    type Item = Item;
    type IntoIter = std::vec::IntoIter<Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demand(w: u32, h: u32, count: u32) -> Demand {
        Demand {
            size: Point::new(w, h),
            count,
        }
    }

    fn sizes(list: &DemandList) -> Vec<String> {
        list.iter().map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_expansion_preserves_input_order() {
        let list = DemandList::new(
            Point::new(10, 10),
            &[demand(6, 5, 2), demand(4, 5, 1), demand(10, 10, 1)],
        )
        .unwrap();
        assert_eq!(sizes(&list), vec!["6x5", "6x5", "4x5", "10x10"]);
    }

    #[test]
    fn test_sort_is_stable_descending_height() {
        let mut list = DemandList::new(
            Point::new(10, 10),
            &[demand(6, 5, 2), demand(4, 5, 1), demand(10, 10, 1)],
        )
        .unwrap();
        list.sort_by_height();
        assert_eq!(sizes(&list), vec!["10x10", "6x5", "6x5", "4x5"]);

        // Reversing the input order of equal-height sizes reverses their tie order.
        let mut list = DemandList::new(
            Point::new(10, 10),
            &[demand(4, 5, 1), demand(2, 7, 1), demand(6, 5, 2)],
        )
        .unwrap();
        list.sort_by_height();
        assert_eq!(sizes(&list), vec!["2x7", "4x5", "6x5", "6x5"]);
    }

    #[test]
    fn test_zero_count_contributes_nothing() {
        let list =
            DemandList::new(Point::new(10, 10), &[demand(3, 3, 0), demand(2, 2, 2)]).unwrap();
        assert_eq!(list.len(), 2);
        assert!(DemandList::new(Point::new(10, 10), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_bin() {
        let err = DemandList::new(Point::new(0, 10), &[demand(1, 1, 1)]).unwrap_err();
        assert!(matches!(err, PackError::InvalidBin(_)));
    }

    #[test]
    fn test_invalid_item() {
        let err = DemandList::new(Point::new(10, 10), &[demand(3, 0, 1)]).unwrap_err();
        assert!(matches!(err, PackError::InvalidItem(p) if p == Point::new(3, 0)));
    }

    #[test]
    fn test_duplicate_size() {
        let err = DemandList::new(Point::new(10, 10), &[demand(3, 3, 1), demand(3, 3, 2)])
            .unwrap_err();
        assert!(matches!(err, PackError::DuplicateSize(_)));
    }

    #[test]
    fn test_oversized_count_is_rejected() {
        let err = DemandList::new(Point::new(1, 1), &[demand(1, 1, u32::MAX)]).unwrap_err();
        assert!(
            matches!(err, PackError::TooManyItems { total, .. } if total == u32::MAX as u64)
        );

        // The limit applies to the sum across entries.
        let half = (MAX_ITEMS / 2 + 1) as u32;
        let err = DemandList::new(Point::new(2, 2), &[demand(1, 1, half), demand(1, 2, half)])
            .unwrap_err();
        assert!(matches!(err, PackError::TooManyItems { .. }));

        let at_limit = DemandList::new(Point::new(2, 2), &[demand(1, 1, MAX_ITEMS as u32)]);
        assert_eq!(at_limit.unwrap().len(), MAX_ITEMS as usize);
    }

    #[test]
    fn test_item_exceeds_bin() {
        let too_wide = DemandList::new(Point::new(10, 10), &[demand(11, 1, 1)]).unwrap_err();
        assert!(matches!(too_wide, PackError::ItemExceedsBin { .. }));

        // Height is checked up front too, even with a zero count.
        let too_tall = DemandList::new(Point::new(10, 10), &[demand(1, 11, 0)]).unwrap_err();
        assert_eq!(
            too_tall.to_string(),
            "item (1,11) exceeds bin capacity (10,10)"
        );
    }
}
