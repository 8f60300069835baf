//! §9.7 Resolving flexible lengths.
//! Spec: <https://www.w3.org/TR/css-flexbox-1/#resolve-flexible-lengths>

use css_orchestrator::MaybeMath as _;
use log::trace;

use super::lines::{FlexLine, sum_axis_gaps};
use crate::chapter4::AlgoConstants;
use crate::chapter6::FlexItem;

/// Outer main size of every item, using the target size of frozen items and the flex base size
/// of the others, plus the gaps between them.
fn used_main_space(line: &FlexLine<'_>, constants: &AlgoConstants) -> f32 {
    let dir = constants.dir;
    let items_space: f32 = line
        .items
        .iter()
        .map(|child| {
            if child.frozen {
                child.outer_target_size.main(dir)
            } else {
                child.flex_basis + child.margin.main_axis_sum(dir)
            }
        })
        .sum();
    items_space + sum_axis_gaps(constants.gap.main(dir), line.items.len())
}

/// Clamp the target main size of every unfrozen item and return the total adjustment.
fn fix_min_max_violations(unfrozen: &mut [&mut FlexItem], constants: &AlgoConstants) -> f32 {
    let dir = constants.dir;
    unfrozen.iter_mut().fold(0.0, |total_violation, child| {
        let target = child.target_size.main(dir);
        let clamped = target
            .maybe_min(child.max_size.main(dir))
            .max(child.resolved_minimum_main_size)
            .max(0.0);
        child.violation = clamped - target;
        child.target_size.set_main(dir, clamped);
        child
            .outer_target_size
            .set_main(dir, clamped + child.margin.main_axis_sum(dir));
        total_violation + child.violation
    })
}

/// 9.7 Resolve the flexible lengths of the items on one line.
pub fn resolve_flexible_lengths(line: &mut FlexLine<'_>, constants: &AlgoConstants) {
    let dir = constants.dir;
    let inner_main_size = constants.node_inner_size.main(dir);

    // 1. Determine the used flex factor.
    let total_hypothetical_outer_main_size: f32 = line
        .items
        .iter()
        .map(|child| child.hypothetical_outer_size.main(dir))
        .sum::<f32>()
        + sum_axis_gaps(constants.gap.main(dir), line.items.len());
    let container_main = inner_main_size.unwrap_or(0.0);
    let growing = total_hypothetical_outer_main_size < container_main;
    let shrinking = total_hypothetical_outer_main_size > container_main;
    let exactly_sized = !growing && !shrinking;

    // 2. Size inflexible items.
    for child in line.items.iter_mut() {
        let inner_target_size = child.hypothetical_inner_size.main(dir);
        child.target_size.set_main(dir, inner_target_size);
        child.frozen = false;

        if exactly_sized
            || (growing && (child.flex_grow == 0.0 || child.flex_basis > inner_target_size))
            || (shrinking && (child.flex_shrink == 0.0 || child.flex_basis < inner_target_size))
        {
            child.frozen = true;
            child
                .outer_target_size
                .set_main(dir, inner_target_size + child.margin.main_axis_sum(dir));
        }
    }

    if exactly_sized {
        return;
    }

    // 3. Calculate initial free space.
    let initial_free_space = inner_main_size
        .maybe_sub(used_main_space(line, constants))
        .unwrap_or(0.0);

    // 4. Loop until every item is frozen.
    while line.items.iter().any(|child| !child.frozen) {
        // b. Calculate the remaining free space.
        let remaining_free_space = inner_main_size
            .maybe_sub(used_main_space(line, constants))
            .unwrap_or(0.0);
        let mut unfrozen: Vec<&mut FlexItem> =
            line.items.iter_mut().filter(|child| !child.frozen).collect();
        let (sum_flex_grow, sum_flex_shrink) = unfrozen
            .iter()
            .fold((0.0, 0.0), |(grow, shrink), child| {
                (grow + child.flex_grow, shrink + child.flex_shrink)
            });

        // Factors summing below one only take that fraction of the initial free space.
        let free_space = if growing && sum_flex_grow < 1.0 {
            (initial_free_space * sum_flex_grow).min(remaining_free_space)
        } else if shrinking && sum_flex_shrink < 1.0 {
            (initial_free_space * sum_flex_shrink).max(remaining_free_space)
        } else {
            remaining_free_space
        };

        // c. Distribute free space proportional to the flex factors.
        if free_space.is_normal() {
            if growing && sum_flex_grow > 0.0 {
                for child in &mut unfrozen {
                    let target = child.flex_basis + free_space * (child.flex_grow / sum_flex_grow);
                    child.target_size.set_main(dir, target);
                }
            } else if shrinking && sum_flex_shrink > 0.0 {
                let sum_scaled_shrink_factor: f32 = unfrozen
                    .iter()
                    .map(|child| child.inner_flex_basis * child.flex_shrink)
                    .sum();
                if sum_scaled_shrink_factor > 0.0 {
                    for child in &mut unfrozen {
                        let scaled_shrink_factor = child.inner_flex_basis * child.flex_shrink;
                        let target = child.flex_basis
                            + free_space * (scaled_shrink_factor / sum_scaled_shrink_factor);
                        child.target_size.set_main(dir, target);
                    }
                }
            }
        }

        // d. Fix min/max violations.
        let total_violation = fix_min_max_violations(&mut unfrozen, constants);

        // e. Freeze over-flexed items.
        for child in &mut unfrozen {
            child.frozen = if total_violation > 0.0 {
                child.violation > 0.0
            } else if total_violation < 0.0 {
                child.violation < 0.0
            } else {
                true
            };
        }

        trace!(
            target: "css::flexbox",
            "[FLEX-RESOLVE] free_space={free_space} violation={total_violation}"
        );
    }
}
