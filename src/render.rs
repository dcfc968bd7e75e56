use crate::shelf::Bin;
use crate::types::Point;

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

/// Fill glyphs, picked by [`crate::types::Item::color_index`].
const PALETTE: &[char] = &['.', ':', '~', '*', '#', '%', 'o', '=', '^', '"'];

/// Draws `bin` with its origin at the bottom left: shelf 0 is the bottom row.
///
/// Each shelf is outlined across the full bin width, and each item is filled
/// with its palette glyph and labelled `WxH` at its centre.
pub fn render_bin(bin: &Bin) -> String {
    let size = bin.size();
    let scale = f64::min(MAX_WIDTH / size.x as f64, MAX_HEIGHT / size.y as f64);
    let (_, _, grid_w, grid_h) = to_cells(Point::ZERO, size, scale);

    if grid_w == 0 || grid_h == 0 {
        return String::new();
    }

    let mut grid = vec![vec![' '; grid_w + 1]; grid_h + 1];
    outline(&mut grid, 0, 0, grid_w, grid_h);

    for (shelf, offset) in bin.shelves() {
        let (x, y, w, h) = to_cells(*offset, shelf.size(), scale);
        outline(&mut grid, x, y, w, h);
    }

    for (item, pos) in bin.placements() {
        let (x, y, w, h) = to_cells(pos, item.size, scale);
        if w == 0 || h == 0 {
            continue;
        }

        let glyph = PALETTE[item.color_index() as usize % PALETTE.len()];
        fill(&mut grid, x, y, w, h, glyph);
        outline(&mut grid, x, y, w, h);

        if w > 2 {
            let (cx, cy, _, _) = to_cells(pos + item.size / 2, Point::ZERO, scale);
            let label: Vec<char> = item.to_string().chars().collect();
            let start_x = cx.saturating_sub(label.len() / 2);
            for (i, &ch) in label.iter().enumerate() {
                let lx = start_x + i;
                if lx > x && lx < x + w && cy > y && cy < y + h {
                    grid[cy][lx] = ch;
                }
            }
        }
    }

    let mut result = String::new();
    for row in grid.iter().rev() {
        let line: String = row.iter().collect();
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}

/// `WxH @ (x,y)` label for a rectangle at an absolute position.
pub fn describe(pos: Point, size: Point) -> String {
    format!("{}x{} @ {}", size.x, size.y, pos)
}

fn to_cells(pos: Point, size: Point, scale: f64) -> (usize, usize, usize, usize) {
    let cell = |v: u32| (v as f64 * scale).round() as usize;
    (cell(pos.x), cell(pos.y), cell(size.x), cell(size.y))
}

fn fill(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize, glyph: char) {
    for row in grid.iter_mut().skip(y + 1).take(h.saturating_sub(1)) {
        for cell in row.iter_mut().skip(x + 1).take(w.saturating_sub(1)) {
            *cell = glyph;
        }
    }
}

fn outline(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    for i in x..=x + w {
        join(grid, i, y, '-');
        join(grid, i, y + h, '-');
    }
    for j in y..=y + h {
        join(grid, x, j, '|');
        join(grid, x + w, j, '|');
    }
}

/// Writes an edge glyph, turning crossings with a different edge into `+`.
fn join(grid: &mut [Vec<char>], x: usize, y: usize, line: char) {
    let Some(cell) = grid.get_mut(y).and_then(|row| row.get_mut(x)) else {
        return;
    };
    *cell = match *cell {
        c if c == line => line,
        '-' | '|' | '+' => '+',
        _ => line,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shelf::Shelf;
    use crate::solver::{Solver, Strategy};
    use crate::types::{Demand, Item};

    fn bin_with(items: &[(u32, u32)]) -> Bin {
        let mut bin = Bin::new(Point::new(10, 10));
        let height = items.iter().map(|&(_, h)| h).max().unwrap_or(1);
        let mut shelf = Shelf::new(10, height);
        for &(w, h) in items {
            let x = shelf.filled_to_x();
            shelf.pack(Item::new(Point::new(w, h)), x, 0);
        }
        bin.pack(shelf, 0, 0);
        bin
    }

    #[test]
    fn test_render_single_item() {
        let bin = bin_with(&[(10, 10)]);
        let output = render_bin(&bin);
        assert!(output.contains('+'));
        assert!(output.contains('-'));
        assert!(output.contains('|'));
        assert!(output.contains("10x10"));

        let item = Item::new(Point::new(10, 10));
        let glyph = PALETTE[item.color_index() as usize % PALETTE.len()];
        assert!(output.contains(glyph));
    }

    #[test]
    fn test_render_two_items() {
        let output = render_bin(&bin_with(&[(6, 5), (4, 5)]));
        assert!(output.contains("6x5"));
        assert!(output.contains("4x5"));
    }

    #[test]
    fn test_render_empty() {
        let output = render_bin(&Bin::new(Point::new(10, 10)));
        // Should still draw the bin border
        assert!(output.contains('+'));
        assert!(!output.contains("x"));
    }

    #[test]
    fn test_first_shelf_is_drawn_at_the_bottom() {
        let sol = Solver::new(
            Point::new(10, 10),
            Strategy::FirstFit,
            vec![
                Demand { size: Point::new(6, 6), count: 1 },
                Demand { size: Point::new(5, 4), count: 1 },
            ],
        )
        .solve()
        .unwrap();
        assert_eq!(sol.bins[0].shelves().len(), 2);

        let output = render_bin(&sol.bins[0]);
        let line_of = |label: &str| output.lines().position(|l| l.contains(label)).unwrap();
        assert!(line_of("5x4") < line_of("6x6"), "{output}");
    }

    #[test]
    fn test_shelf_rows_are_outlined() {
        // A lone 2x2 item on a 10x2 shelf, at 4 cells per unit: the shelf top
        // edge spans the bin and meets the item's right edge at column 8.
        let output = render_bin(&bin_with(&[(2, 2)]));
        let shelf_top = output.lines().rev().nth(8).unwrap();
        assert_eq!(shelf_top, format!("+{}+{}+", "-".repeat(7), "-".repeat(31)));
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(Point::new(6, 5), Point::new(4, 5)), "4x5 @ (6,5)");
    }
}
