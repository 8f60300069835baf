//! Flex Layout Algorithm
//! Spec: <https://www.w3.org/TR/css-flexbox-1/#layout-algorithm>
//!
//! Steps 5 to 16 of §9 plus the final placement pass. Every step works on the flex lines
//! collected in step 5; lines borrow disjoint runs of the item list.

mod alignment;
mod cross_size;
mod flexible_lengths;
mod lines;
mod placement;

#[cfg(test)]
mod tests;

pub use alignment::{
    align_flex_lines_per_align_content, distribute_remaining_free_space,
    resolve_cross_axis_auto_margins,
};
pub use cross_size::{
    calculate_children_base_lines, calculate_cross_size, determine_container_cross_size,
    determine_hypothetical_cross_size, determine_used_cross_size, handle_align_content_stretch,
};
pub use flexible_lengths::resolve_flexible_lengths;
pub use lines::{FlexLine, collect_flex_lines, determine_container_main_size};
pub use placement::{
    final_layout_pass, first_baseline, perform_absolute_layout_on_absolute_children,
    perform_hidden_layout_on_children,
};
