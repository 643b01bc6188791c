//! Vertical and horizontal layouts.
//!
//! Fixed children (no weight on the main axis, or a fixed main size) take
//! their preferred size. Expanding children share what is left in proportion
//! to their weight; a share below the child's preferred size or above its
//! maximum is pinned there and the rest is shared again. When there is not
//! enough room, every child keeps its preferred size and the excess is
//! reported as overflow.

use crate::geometry::{Rect, Size};
use crate::layout::resolve::{Arrangement, LayoutItem};
use crate::layout::Axis;

/// Smallest content size that fits every child at its preferred size.
pub fn content_minimum(axis: Axis, items: &[LayoutItem], spacing: i32) -> Size {
    if items.is_empty() {
        return Size::ZERO;
    }
    let gaps = spacing * (items.len() as i32 - 1);
    let main: i32 = items.iter().map(|item| axis.main(item.outer())).sum::<i32>() + gaps;
    let cross = items.iter().map(|item| axis.cross(item.outer())).max().unwrap_or(0);
    axis.size(main, cross)
}

/// Main-axis sizes, in item order.
pub fn distribute(axis: Axis, available: i32, items: &[LayoutItem], spacing: i32) -> Vec<i32> {
    let mut sizes: Vec<i32> = items.iter().map(|item| axis.main(item.preferred)).collect();
    if items.is_empty() {
        return sizes;
    }

    let gaps = spacing * (items.len() as i32 - 1);
    let margins: i32 = items
        .iter()
        .map(|item| {
            let (lead, trail) = axis.margins(item.params.margin);
            lead + trail
        })
        .sum();

    let mut free: Vec<usize> = (0..items.len()).filter(|&i| items[i].params.weight(axis) > 0).collect();
    let fixed_total: i32 = (0..items.len())
        .filter(|i| !free.contains(i))
        .map(|i| sizes[i])
        .sum();
    let mut space = available - gaps - margins - fixed_total;

    while !free.is_empty() {
        let total_weight: i64 = free.iter().map(|&i| i64::from(items[i].params.weight(axis))).sum();
        let pool = i64::from(space.max(0));
        let shares: Vec<i32> = free
            .iter()
            .map(|&i| (pool * i64::from(items[i].params.weight(axis)) / total_weight) as i32)
            .collect();

        let below: Vec<usize> = free
            .iter()
            .zip(&shares)
            .filter(|&(&i, &share)| share < sizes[i])
            .map(|(&i, _)| i)
            .collect();
        let pinned = if below.is_empty() {
            free.iter()
                .zip(&shares)
                .filter(|&(&i, &share)| share > items[i].params.max_on(axis))
                .map(|(&i, _)| {
                    sizes[i] = items[i].params.max_on(axis);
                    i
                })
                .collect::<Vec<_>>()
        } else {
            below
        };

        if pinned.is_empty() {
            let mut used = 0;
            for (&i, &share) in free.iter().zip(&shares) {
                sizes[i] = share;
                used += share;
            }
            if let Some(&last) = free.last() {
                let leftover = (space - used).max(0);
                sizes[last] = (sizes[last] + leftover).min(items[last].params.max_on(axis));
            }
            break;
        }

        for i in &pinned {
            space -= sizes[*i];
        }
        free.retain(|i| !pinned.contains(i));
    }

    sizes
}

/// Place `items` one after another along `axis` inside `content`.
pub fn arrange(axis: Axis, content: Rect, items: &[LayoutItem], spacing: i32) -> Arrangement {
    let cross_axis = axis.other();
    let main_avail = axis.main(content.size());
    let cross_avail = axis.cross(content.size());
    let sizes = distribute(axis, main_avail, items, spacing);

    let main_start = axis.start(content);
    let cross_start = cross_axis.start(content);
    let mut cursor = main_start;
    let mut cross_extent = 0;
    let mut placements = Vec::with_capacity(items.len());

    for (index, (item, &main_size)) in items.iter().zip(&sizes).enumerate() {
        if index > 0 {
            cursor += spacing;
        }
        let (lead, trail) = axis.margins(item.params.margin);
        let (cross_lead, cross_trail) = cross_axis.margins(item.params.margin);

        let cross_size = match item.params.fixed_on(cross_axis) {
            Some(fixed) => fixed,
            None => (cross_avail - cross_lead - cross_trail)
                .min(item.params.max_on(cross_axis))
                .max(axis.cross(item.preferred)),
        };

        cursor += lead;
        let origin = axis.point(cursor, cross_start + cross_lead);
        placements.push((item.id, Rect::from_parts(origin, axis.size(main_size, cross_size))));
        cursor += main_size + trail;
        cross_extent = cross_extent.max(cross_lead + cross_size + cross_trail);
    }

    let overflow = axis.size(
        (cursor - main_start - main_avail).max(0),
        (cross_extent - cross_avail).max(0),
    );
    Arrangement { placements, overflow }
}
