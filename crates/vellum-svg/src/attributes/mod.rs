//! Standard attributes shared by every element.
//!
//! Each module adds one `apply_*` step to [`Element`](crate::elements::Element);
//! the lifecycle runs them in a fixed order before the tag's own calls.

mod clip_path;
mod marker;
mod opacity;
mod stroke;
pub mod transform;
