//! Grouping elements: `g`, `defs`, `symbol`, `clipPath` and `marker`.

use super::{Element, ElementHandler};
use crate::document::Document;
use crate::error::ElementResult;

/// A plain container. Hidden containers are processed for their side
/// effects (ids, gradients, completed calls for later replay) but draw
/// nothing in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Container {
    hidden: bool,
    clip: bool,
}

impl Container {
    /// `g`.
    pub(crate) const fn group() -> Self {
        Self {
            hidden: false,
            clip: false,
        }
    }

    /// `defs`, `symbol` and `marker`.
    pub(crate) const fn hidden() -> Self {
        Self {
            hidden: true,
            clip: false,
        }
    }

    /// `clipPath`: hidden, and its branch records geometry only.
    pub(crate) const fn clip_path() -> Self {
        Self {
            hidden: true,
            clip: true,
        }
    }
}

impl ElementHandler for Container {
    fn parse(&mut self, element: &mut Element, _doc: &mut Document<'_>) -> ElementResult {
        if self.hidden {
            element.hide();
        }
        if self.clip {
            element.state_mut().disable_drawing();
        }
        Ok(())
    }

    fn is_container(&self) -> bool {
        true
    }
}
