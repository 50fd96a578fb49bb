//! Style handling for the vellum converter.
//!
//! # Scope
//!
//! This crate implements:
//! - **Property Model** - which attribute names are style properties, which
//!   of them inherit, and their initial values
//! - **Declaration blocks** - `name: value; ...` parsing
//! - **Style sources** - the [`StyleSource`] lookup used by the cascade, and
//!   [`Stylesheet`], built from `<style>` element text
//! - **Cascade** - merging presentation attributes, selector blocks and the
//!   inline style into one property bag
//! - **Computed properties** - inheritance-resolved values for a node
//! - **Colors** - hex, `rgb()`/`rgba()` and named colors
//!
//! # Not Implemented
//!
//! - Selector matching and specificity (blocks are looked up by exact selector text)
//! - Media queries and other at-rules

/// Declaration merging per presentation attribute < tag < class < id < inline style.
pub mod cascade;
/// Color values and parsing.
pub mod color;
/// Inheritance-resolved property values.
pub mod computed;
/// Declaration block parsing.
pub mod declaration;
/// The property model and per-node property bags.
pub mod property;
/// Style sources and the `<style>` stylesheet reader.
pub mod stylesheet;

pub use cascade::{ResolvedStyle, resolve_style};
pub use color::ColorValue;
pub use computed::ComputedProperties;
pub use declaration::{Declaration, DeclarationBlock, parse_declarations};
pub use property::{Properties, Property};
pub use stylesheet::{StyleRule, StyleSource, Stylesheet, parse_stylesheet};
