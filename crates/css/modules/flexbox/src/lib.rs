//! CSS Flexible Box Layout Module Level 1: Flex formatting context.
//! Spec: <https://www.w3.org/TR/css-flexbox-1/>

// Chapter modules mapped to the Flexbox Level 1 spec structure.
// Spec: §4: Flex Formatting Context
#[path = "4_flex_formatting_context/mod.rs"]
mod chapter4;
// Spec: §6: Flex Items
#[path = "6_flex_items/mod.rs"]
mod chapter6;
// Spec: §9: Flex Layout Algorithm
#[path = "9_layout_algorithm/mod.rs"]
/// Line collection, flexible lengths, cross sizing and alignment (§9.3 to §9.9)
mod chapter9;

pub use chapter4::{compute_flexbox_layout, establishes_flex_formatting_context};
