//! Grid layouts.
//!
//! Both grids place children row-major, `columns` per row. Children with an
//! explicit cell are placed first; the rest flow into the next free cell.
//! [`Layout::Grid`](crate::layout::Layout::Grid) sizes every track the same,
//! [`Layout::AdvancedGrid`](crate::layout::Layout::AdvancedGrid) sizes each
//! column and row to its largest child and shares leftover space between
//! weighted tracks.

use std::collections::HashSet;

use crate::geometry::{Point, Rect, Size};
use crate::layout::resolve::{Arrangement, LayoutItem};
use crate::layout::Axis;

/// Track sizing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tracks {
    Uniform,
    PerTrack,
}

/// Explicit rows at or past this are ignored and the view is auto-placed.
pub const MAX_EXPLICIT_ROW: u32 = 4096;

/// Cell `(column, row)` of every item, in item order.
///
/// Two items may end up in the same cell when both ask for it explicitly;
/// that is reported through `tracing` when `report` is set. A cell whose
/// column is outside the grid or whose row is at least [`MAX_EXPLICIT_ROW`]
/// is ignored.
pub fn assign_cells(columns: u32, items: &[LayoutItem], report: bool) -> Vec<(u32, u32)> {
    let columns = columns.max(1);
    let mut occupied: HashSet<(u32, u32)> = HashSet::new();
    let mut cells: Vec<Option<(u32, u32)>> = vec![None; items.len()];

    for (index, item) in items.iter().enumerate() {
        let Some((column, row)) = item.cell else { continue };
        if column >= columns {
            if report {
                tracing::warn!(column, row, columns, "grid cell column out of range, placing automatically");
            }
            continue;
        }
        if row >= MAX_EXPLICIT_ROW {
            if report {
                tracing::warn!(column, row, "grid cell row out of range, placing automatically");
            }
            continue;
        }
        if !occupied.insert((column, row)) && report {
            tracing::warn!(column, row, "two views claim the same grid cell; both are placed there");
        }
        cells[index] = Some((column, row));
    }

    let mut next = 0u32;
    cells
        .into_iter()
        .map(|cell| {
            cell.unwrap_or_else(|| {
                while occupied.contains(&(next % columns, next / columns)) {
                    next += 1;
                }
                let cell = (next % columns, next / columns);
                occupied.insert(cell);
                next += 1;
                cell
            })
        })
        .collect()
}

fn row_count(cells: &[(u32, u32)]) -> u32 {
    cells.iter().map(|&(_, row)| row.saturating_add(1)).max().unwrap_or(0)
}

fn gaps(tracks: usize, spacing: i32) -> i32 {
    spacing * (tracks as i32 - 1).max(0)
}

/// Largest outer size per track along `axis`.
fn track_maxima(axis: Axis, count: usize, items: &[LayoutItem], cells: &[(u32, u32)]) -> Vec<i32> {
    let mut tracks = vec![0; count];
    for (item, &cell) in items.iter().zip(cells) {
        let index = axis.pick(cell) as usize;
        if let Some(track) = tracks.get_mut(index) {
            *track = (*track).max(axis.main(item.outer()));
        }
    }
    tracks
}

/// Size of each track along `axis`, given the space available for them.
fn track_sizes(
    axis: Axis,
    mode: Tracks,
    count: usize,
    available: Option<i32>,
    items: &[LayoutItem],
    cells: &[(u32, u32)],
    spacing: i32,
) -> Vec<i32> {
    let maxima = track_maxima(axis, count, items, cells);
    if count == 0 {
        return maxima;
    }
    match mode {
        Tracks::Uniform => {
            let largest = maxima.iter().copied().max().unwrap_or(0);
            let share = available.map_or(0, |a| (a - gaps(count, spacing)) / count as i32);
            vec![largest.max(share); count]
        }
        Tracks::PerTrack => {
            let mut sizes = maxima;
            let Some(available) = available else { return sizes };
            let leftover = available - gaps(count, spacing) - sizes.iter().sum::<i32>();

            let mut weights = vec![0i64; count];
            for (item, &cell) in items.iter().zip(cells) {
                if let Some(weight) = weights.get_mut(axis.pick(cell) as usize) {
                    *weight += i64::from(item.params.weight(axis));
                }
            }
            let total: i64 = weights.iter().sum();
            if leftover > 0 && total > 0 {
                let mut given = 0;
                let mut last = None;
                for (index, &weight) in weights.iter().enumerate() {
                    if weight > 0 {
                        let share = (i64::from(leftover) * weight / total) as i32;
                        sizes[index] += share;
                        given += share;
                        last = Some(index);
                    }
                }
                if let Some(last) = last {
                    sizes[last] += leftover - given;
                }
            }
            sizes
        }
    }
}

pub fn content_minimum(columns: u32, mode: Tracks, items: &[LayoutItem], spacing: i32) -> Size {
    if items.is_empty() {
        return Size::ZERO;
    }
    let columns = columns.max(1) as usize;
    let cells = assign_cells(columns as u32, items, false);
    let rows = row_count(&cells) as usize;

    let widths = track_sizes(Axis::Horizontal, mode, columns, None, items, &cells, spacing);
    let heights = track_sizes(Axis::Vertical, mode, rows, None, items, &cells, spacing);
    Size::new(
        widths.iter().sum::<i32>() + gaps(columns, spacing),
        heights.iter().sum::<i32>() + gaps(rows, spacing),
    )
}

/// Start offsets of each track.
fn offsets(start: i32, sizes: &[i32], spacing: i32) -> Vec<i32> {
    let mut cursor = start;
    sizes
        .iter()
        .map(|&size| {
            let at = cursor;
            cursor += size + spacing;
            at
        })
        .collect()
}

pub fn arrange(columns: u32, mode: Tracks, content: Rect, items: &[LayoutItem], spacing: i32) -> Arrangement {
    if items.is_empty() {
        return Arrangement::default();
    }
    let column_count = columns.max(1) as usize;
    let cells = assign_cells(column_count as u32, items, true);
    let row_count = row_count(&cells) as usize;

    let widths = track_sizes(Axis::Horizontal, mode, column_count, Some(content.width), items, &cells, spacing);
    let heights = track_sizes(Axis::Vertical, mode, row_count, Some(content.height), items, &cells, spacing);
    let xs = offsets(content.x, &widths, spacing);
    let ys = offsets(content.y, &heights, spacing);

    let placements = items
        .iter()
        .zip(&cells)
        .map(|(item, &(column, row))| {
            let (column, row) = (column as usize, row as usize);
            let cell = Rect::new(xs[column], ys[row], widths[column], heights[row]);
            (item.id, fill_cell(cell, item))
        })
        .collect();

    let used = Size::new(
        widths.iter().sum::<i32>() + gaps(column_count, spacing),
        heights.iter().sum::<i32>() + gaps(row_count, spacing),
    );
    Arrangement { placements, overflow: (used - content.size()).non_negative() }
}

/// The cell minus the child's margins, honoring fixed sizes and maxima.
fn fill_cell(cell: Rect, item: &LayoutItem) -> Rect {
    let inner = cell.shrink(item.params.margin);
    let size_on = |axis: Axis| match item.params.fixed_on(axis) {
        Some(fixed) => fixed,
        None => axis.main(inner.size()).min(item.params.max_on(axis)),
    };
    Rect::from_parts(
        Point::new(inner.x, inner.y),
        Size::new(size_on(Axis::Horizontal), size_on(Axis::Vertical)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::resolve::LayoutParams;
    use crate::view::{ViewBuilder, ViewTree};
    use pretty_assertions::assert_eq;

    fn item(tree: &mut ViewTree, width: i32, height: i32, cell: Option<(u32, u32)>) -> LayoutItem {
        LayoutItem {
            id: tree.insert(ViewBuilder::new("Cell").build()),
            preferred: Size::new(width, height),
            params: LayoutParams::default(),
            cell,
        }
    }

    #[test]
    fn auto_flow_is_row_major_and_skips_claimed_cells() {
        let mut tree = ViewTree::new();
        let items = [
            item(&mut tree, 1, 1, None),
            item(&mut tree, 1, 1, Some((1, 0))),
            item(&mut tree, 1, 1, None),
            item(&mut tree, 1, 1, None),
        ];
        assert_eq!(assign_cells(2, &items, false), vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn conflicting_cells_share_the_spot() {
        let mut tree = ViewTree::new();
        let items = [item(&mut tree, 1, 1, Some((0, 0))), item(&mut tree, 1, 1, Some((0, 0)))];
        assert_eq!(assign_cells(3, &items, true), vec![(0, 0), (0, 0)]);
    }

    #[test]
    fn far_away_row_is_auto_placed() {
        let mut tree = ViewTree::new();
        let items = [
            item(&mut tree, 10, 10, Some((0, u32::MAX))),
            item(&mut tree, 10, 10, Some((1, MAX_EXPLICIT_ROW))),
            item(&mut tree, 10, 10, Some((1, MAX_EXPLICIT_ROW - 1))),
        ];
        let cells = assign_cells(2, &items, true);
        assert_eq!(cells, vec![(0, 0), (1, 0), (1, MAX_EXPLICIT_ROW - 1)]);
        assert_eq!(row_count(&cells), MAX_EXPLICIT_ROW);
        assert_eq!(row_count(&[(0, u32::MAX)]), u32::MAX);

        let result = arrange(2, Tracks::Uniform, Rect::new(0, 0, 20, 10), &items[..2], 0);
        assert_eq!(result.placements[0].1, Rect::new(0, 0, 10, 10));
        assert_eq!(result.placements[1].1, Rect::new(10, 0, 10, 10));
    }

    #[test]
    fn uniform_tracks_split_available_space() {
        let mut tree = ViewTree::new();
        let items: Vec<_> = (0..4).map(|_| item(&mut tree, 10, 10, None)).collect();
        let result = arrange(2, Tracks::Uniform, Rect::new(0, 0, 100, 60), &items, 0);
        let rects: Vec<Rect> = result.placements.iter().map(|(_, r)| *r).collect();
        assert_eq!(
            rects,
            vec![
                Rect::new(0, 0, 50, 30),
                Rect::new(50, 0, 50, 30),
                Rect::new(0, 30, 50, 30),
                Rect::new(50, 30, 50, 30),
            ]
        );
    }

    #[test]
    fn uniform_tracks_grow_to_largest_child() {
        let mut tree = ViewTree::new();
        let items = [item(&mut tree, 80, 10, None), item(&mut tree, 10, 10, None)];
        let result = arrange(2, Tracks::Uniform, Rect::new(0, 0, 100, 10), &items, 0);
        assert_eq!(result.placements[1].1, Rect::new(80, 0, 80, 10));
        assert_eq!(result.overflow, Size::new(60, 0));
        assert_eq!(content_minimum(2, Tracks::Uniform, &items, 5), Size::new(165, 10));
    }

    #[test]
    fn per_track_sizes_and_weighted_leftover() {
        let mut tree = ViewTree::new();
        let mut wide = item(&mut tree, 30, 10, None);
        wide.params.expanding = (1, 0);
        let items = [item(&mut tree, 10, 20, None), wide];
        assert_eq!(content_minimum(2, Tracks::PerTrack, &items, 2), Size::new(42, 20));

        let result = arrange(2, Tracks::PerTrack, Rect::new(0, 0, 100, 20), &items, 0);
        assert_eq!(result.placements[0].1, Rect::new(0, 0, 10, 20));
        assert_eq!(result.placements[1].1, Rect::new(10, 0, 90, 20));
    }

    #[test]
    fn empty_grid_collapses() {
        assert_eq!(content_minimum(3, Tracks::Uniform, &[], 4), Size::ZERO);
        assert_eq!(arrange(3, Tracks::PerTrack, Rect::new(0, 0, 10, 10), &[], 4), Arrangement::default());
    }
}
