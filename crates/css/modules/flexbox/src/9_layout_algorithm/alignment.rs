//! §9.5 Main-axis alignment and §9.6 cross-axis alignment.
//! Spec: <https://www.w3.org/TR/css-flexbox-1/#main-alignment>

use css_orchestrator::style_model::{AlignContent, AlignSelf, JustifyContent};
use log::debug;

use super::lines::{FlexLine, sum_axis_gaps};
use crate::chapter4::AlgoConstants;
use crate::chapter6::FlexItem;

/// The offset of one alignment subject (item or line) from the previous one.
///
/// The first subject absorbs the leading free space; later subjects get the gap plus their share
/// of distributed space. Negative free space is never distributed between subjects.
pub fn compute_alignment_offset(
    free_space: f32,
    num_items: usize,
    gap: f32,
    alignment_mode: AlignContent,
    layout_is_flex_reversed: bool,
    is_first: bool,
) -> f32 {
    if is_first {
        match alignment_mode {
            AlignContent::Start | AlignContent::Stretch | AlignContent::SpaceBetween => 0.0,
            AlignContent::FlexStart => {
                if layout_is_flex_reversed {
                    free_space
                } else {
                    0.0
                }
            }
            AlignContent::End => free_space,
            AlignContent::FlexEnd => {
                if layout_is_flex_reversed {
                    0.0
                } else {
                    free_space
                }
            }
            AlignContent::Center => free_space / 2.0,
            AlignContent::SpaceAround => {
                if free_space >= 0.0 {
                    (free_space / num_items as f32) / 2.0
                } else {
                    free_space / 2.0
                }
            }
            AlignContent::SpaceEvenly => {
                if free_space >= 0.0 {
                    free_space / (num_items + 1) as f32
                } else {
                    free_space / 2.0
                }
            }
        }
    } else {
        let free_space = free_space.max(0.0);
        gap + match alignment_mode {
            AlignContent::Start
            | AlignContent::FlexStart
            | AlignContent::End
            | AlignContent::FlexEnd
            | AlignContent::Center
            | AlignContent::Stretch => 0.0,
            AlignContent::SpaceBetween => free_space / num_items.saturating_sub(1).max(1) as f32,
            AlignContent::SpaceAround => free_space / num_items as f32,
            AlignContent::SpaceEvenly => free_space / (num_items + 1) as f32,
        }
    }
}

/// Give positive free space to auto main-axis margins. Returns whether any margin absorbed it.
fn resolve_main_axis_auto_margins(
    line: &mut FlexLine<'_>,
    free_space: f32,
    constants: &AlgoConstants,
) -> bool {
    let dir = constants.dir;
    let is_row = constants.is_row;
    let num_auto_margins: usize = line
        .items
        .iter()
        .map(|child| {
            usize::from(child.margin_is_auto.main_start(dir))
                + usize::from(child.margin_is_auto.main_end(dir))
        })
        .sum();
    if free_space <= 0.0 || num_auto_margins == 0 {
        return false;
    }

    let margin = free_space / num_auto_margins as f32;
    for child in line.items.iter_mut() {
        if child.margin_is_auto.main_start(dir) {
            if is_row {
                child.margin.left = margin;
            } else {
                child.margin.top = margin;
            }
        }
        if child.margin_is_auto.main_end(dir) {
            if is_row {
                child.margin.right = margin;
            } else {
                child.margin.bottom = margin;
            }
        }
    }
    true
}

/// 9.5.12 Distribute any remaining free space: auto margins first, then `justify-content`.
pub fn distribute_remaining_free_space(flex_lines: &mut [FlexLine<'_>], constants: &AlgoConstants) {
    let dir = constants.dir;
    let gap = constants.gap.main(dir);
    for line in flex_lines.iter_mut() {
        let used_space: f32 = sum_axis_gaps(gap, line.items.len())
            + line
                .items
                .iter()
                .map(|child| child.outer_target_size.main(dir))
                .sum::<f32>();
        let free_space = constants.inner_container_size.main(dir) - used_space;

        if resolve_main_axis_auto_margins(line, free_space, constants) {
            continue;
        }

        let num_items = line.items.len();
        let layout_reverse = dir.is_reverse();
        let justify_content_mode = constants
            .justify_content
            .unwrap_or(JustifyContent::FlexStart)
            .with_fallback(free_space, num_items);
        debug!(
            target: "css::flexbox::single_line",
            "[FLEX-JUSTIFY] free_space={free_space} mode={justify_content_mode:?} items={num_items}"
        );

        let justify_item = |(index, child): (usize, &mut FlexItem)| {
            child.offset_main = compute_alignment_offset(
                free_space,
                num_items,
                gap,
                justify_content_mode,
                layout_reverse,
                index == 0,
            );
        };
        if layout_reverse {
            line.items.iter_mut().rev().enumerate().for_each(justify_item);
        } else {
            line.items.iter_mut().enumerate().for_each(justify_item);
        }
    }
}

/// 9.6.14 The cross-axis offset of an item inside its line.
fn align_flex_item_along_cross_axis(
    child: &FlexItem,
    free_space: f32,
    max_baseline: f32,
    constants: &AlgoConstants,
) -> f32 {
    match child.align_self {
        AlignSelf::Start => 0.0,
        AlignSelf::End => free_space,
        AlignSelf::Center => free_space / 2.0,
        AlignSelf::FlexEnd => {
            if constants.is_wrap_reverse {
                0.0
            } else {
                free_space
            }
        }
        // Baseline alignment only applies to rows; in columns it behaves as flex-start.
        AlignSelf::Baseline if constants.is_row => max_baseline - child.baseline,
        AlignSelf::FlexStart | AlignSelf::Stretch | AlignSelf::Baseline => {
            if constants.is_wrap_reverse {
                free_space
            } else {
                0.0
            }
        }
    }
}

/// 9.6.13 Resolve cross-axis auto margins, then (14) align the remaining items with
/// `align-self`.
pub fn resolve_cross_axis_auto_margins(flex_lines: &mut [FlexLine<'_>], constants: &AlgoConstants) {
    let dir = constants.dir;
    let is_row = constants.is_row;
    for line in flex_lines.iter_mut() {
        let line_cross_size = line.cross_size;
        let max_baseline = line
            .items
            .iter()
            .map(|child| child.baseline)
            .fold(0.0, f32::max);

        for child in line.items.iter_mut() {
            let free_space = line_cross_size - child.outer_target_size.cross(dir);
            let auto_start = child.margin_is_auto.cross_start(dir);
            let auto_end = child.margin_is_auto.cross_end(dir);
            let (start, end) = match (auto_start, auto_end) {
                (true, true) => (Some(free_space / 2.0), Some(free_space / 2.0)),
                (true, false) => (Some(free_space), None),
                (false, true) => (None, Some(free_space)),
                (false, false) => {
                    child.offset_cross =
                        align_flex_item_along_cross_axis(child, free_space, max_baseline, constants);
                    continue;
                }
            };
            if let Some(start) = start {
                if is_row {
                    child.margin.top = start;
                } else {
                    child.margin.left = start;
                }
            }
            if let Some(end) = end {
                if is_row {
                    child.margin.bottom = end;
                } else {
                    child.margin.right = end;
                }
            }
        }
    }
}

/// 9.6.16 Align the flex lines per `align-content`.
pub fn align_flex_lines_per_align_content(
    flex_lines: &mut [FlexLine<'_>],
    constants: &AlgoConstants,
    total_cross_size: f32,
) {
    let dir = constants.dir;
    let num_lines = flex_lines.len();
    let gap = constants.gap.cross(dir);
    let free_space = constants.inner_container_size.cross(dir)
        - total_cross_size
        - sum_axis_gaps(gap, num_lines);
    let align_content_mode = constants.align_content.with_fallback(free_space, num_lines);

    let align_line = |(index, line): (usize, &mut FlexLine<'_>)| {
        line.offset_cross = compute_alignment_offset(
            free_space,
            num_lines,
            gap,
            align_content_mode,
            constants.is_wrap_reverse,
            index == 0,
        );
    };
    if constants.is_wrap_reverse {
        flex_lines.iter_mut().rev().enumerate().for_each(align_line);
    } else {
        flex_lines.iter_mut().enumerate().for_each(align_line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// # Panics
    /// Panics if space-between does not push the first item to the start and share the rest.
    fn space_between_offsets() {
        let first = compute_alignment_offset(90.0, 4, 10.0, AlignContent::SpaceBetween, false, true);
        let later = compute_alignment_offset(90.0, 4, 10.0, AlignContent::SpaceBetween, false, false);
        assert!(first.abs() < f32::EPSILON);
        assert!((later - 40.0).abs() < f32::EPSILON);
    }

    #[test]
    /// # Panics
    /// Panics if flex-start does not flip to the far end for reversed layouts.
    fn flex_start_respects_reversal() {
        let forward = compute_alignment_offset(50.0, 2, 0.0, AlignContent::FlexStart, false, true);
        let reversed = compute_alignment_offset(50.0, 2, 0.0, AlignContent::FlexStart, true, true);
        assert!(forward.abs() < f32::EPSILON);
        assert!((reversed - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    /// # Panics
    /// Panics if negative free space is distributed between items.
    fn negative_space_only_shifts_first_item() {
        let first = compute_alignment_offset(-20.0, 3, 5.0, AlignContent::SpaceEvenly, false, true);
        let later = compute_alignment_offset(-20.0, 3, 5.0, AlignContent::SpaceEvenly, false, false);
        assert!((first + 10.0).abs() < f32::EPSILON);
        assert!((later - 5.0).abs() < f32::EPSILON);
    }
}
