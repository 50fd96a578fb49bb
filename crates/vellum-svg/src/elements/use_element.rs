//! `<use>`: re-process a referenced element in place.

use vellum_dom::NodeId;

use super::{Element, ElementHandler};
use crate::calls::{Argument, Opcode};
use crate::document::Document;
use crate::error::{ElementError, ElementResult};
use crate::geometry::Matrix;
use crate::length::Axis;

fn cycle() -> ElementError {
    ElementError::Skip("use tag references itself through its target; skipping tag".to_string())
}

/// A `<use>` element. Its target must already be registered.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Use {
    target: Option<NodeId>,
    symbol: bool,
    x: f64,
    y: f64,
}

impl ElementHandler for Use {
    fn parse(&mut self, element: &mut Element, doc: &mut Document<'_>) -> ElementResult {
        let href = element
            .attribute("href")
            .or_else(|| element.attribute("xlink:href"));
        let Some(href) = href else {
            return Err(ElementError::Skip(
                "Must have attributes xlink:href on tag use; skipping tag".to_string(),
            ));
        };
        let Some(id) = href.strip_prefix('#') else {
            return Err(ElementError::Skip(
                "use tag has an href that is not a reference to an id; this is not supported"
                    .to_string(),
            ));
        };
        let Some(registered) = doc.element_by_id(id) else {
            return Err(ElementError::Skip(format!(
                "no tag with ID '{id}' was found, referenced by use tag"
            )));
        };

        if doc.is_expanding(registered.node) {
            return Err(cycle());
        }

        self.target = Some(registered.node);
        self.symbol = registered.tag_name == "symbol";
        self.x = element.length_or("x", Axis::X, 0.0)?;
        self.y = element.length_or("y", Axis::Y, 0.0)?;
        Ok(())
    }

    fn apply(&mut self, element: &mut Element, _doc: &mut Document<'_>) -> ElementResult {
        let offset = Matrix::translate(self.x, self.y);
        if !offset.is_identity() {
            element
                .calls_mut()
                .emit_and_enter(Opcode::TransformationMatrix, vec![Argument::Matrix(offset)]);
        }
        Ok(())
    }

    fn is_container(&self) -> bool {
        true
    }

    fn process_children(&mut self, element: &mut Element, doc: &mut Document<'_>) -> ElementResult {
        let Some(target) = self.target else {
            return Ok(());
        };
        if !doc.begin_expansion(target) {
            return Err(cycle());
        }
        let tree = doc.tree();
        let result = if self.symbol {
            element.process_child_elements(doc, tree.children(target))
        } else {
            element.process_child_elements(doc, &[target])
        };
        doc.end_expansion(target);
        result
    }
}
