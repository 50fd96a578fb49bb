//! The element lifecycle.
//!
//! An element is created when its parent recurses into it, registers its id
//! straight away, and then runs:
//!
//! 1. cascade and computed properties
//! 2. the handler's `parse`
//! 3. standard attributes: transform, opacity, clip-path, stroke, paint,
//!    then the draw mode
//! 4. the handler's `apply`, then markers
//! 5. children, each bracketed by `save`/`restore`
//!
//! The finished buffer goes to the parent unless `display` is `none`. Any
//! skip discards the whole buffer; the parent carries on with the next child.

use vellum_css::{Properties, Property, resolve_style};
use vellum_dom::{AttributesMap, NodeId};

use super::{ElementHandler, ElementKind};
use crate::calls::{Call, CallBuilder, Opcode};
use crate::document::Document;
use crate::error::{ConvertError, ElementError, ElementResult};
use crate::length::Axis;
use crate::state::RenderState;

/// One element being processed.
#[derive(Debug)]
pub(crate) struct Element {
    source: NodeId,
    name: String,
    attributes: AttributesMap,
    properties: Properties,
    state: RenderState,
    calls: CallBuilder,
}

impl Element {
    /// Create an element for `source` and register its id.
    pub(crate) fn new(
        doc: &mut Document<'_>,
        source: NodeId,
        state: RenderState,
    ) -> Result<Self, ConvertError> {
        let data = doc
            .tree()
            .as_element(source)
            .ok_or(ConvertError::MissingNode(source))?;
        if let Some(id) = data.id() {
            doc.register_element(id, source, &data.tag_name);
        }
        Ok(Self {
            source,
            name: data.tag_name.clone(),
            attributes: AttributesMap::new(),
            properties: Properties::new(),
            state,
            calls: CallBuilder::new(),
        })
    }

    /// Run the lifecycle. `Ok(None)` means the element finished but is not
    /// displayed.
    pub(crate) fn process(
        mut self,
        doc: &mut Document<'_>,
        handler: &mut dyn ElementHandler,
    ) -> ElementResult<Option<CallBuilder>> {
        if self.state.depth() > doc.options().max_depth {
            return Err(ElementError::Skip(format!(
                "Maximum nesting depth exceeded on tag {}; skipping tag",
                self.name
            )));
        }

        self.resolve_properties(doc)?;
        handler.parse(&mut self, doc)?;
        self.apply_standard_attributes(doc, handler)?;
        handler.apply(&mut self, doc)?;
        if handler.is_container() {
            handler.process_children(&mut self, doc)?;
        } else {
            self.apply_markers(doc, &handler.marker_vertices())?;
        }

        let Self {
            source,
            attributes,
            state,
            calls,
            ..
        } = self;
        if let Some(id) = attributes.get("id") {
            doc.complete_element(id, source, calls.calls().to_vec());
        }
        if state.computed().display() == "none" {
            return Ok(None);
        }
        Ok(Some(calls))
    }

    fn resolve_properties(&mut self, doc: &Document<'_>) -> Result<(), ConvertError> {
        let data = doc
            .tree()
            .as_element(self.source)
            .ok_or(ConvertError::MissingNode(self.source))?;
        let resolved = resolve_style(data, doc.styles());
        self.attributes = resolved.attributes;
        self.properties = resolved.properties;
        self.state.apply(&self.properties);
        Ok(())
    }

    fn apply_standard_attributes(
        &mut self,
        doc: &mut Document<'_>,
        handler: &dyn ElementHandler,
    ) -> Result<(), ConvertError> {
        self.apply_transform(doc);
        self.apply_opacity();
        self.apply_clip_path(doc)?;
        self.apply_stroke(doc);
        self.apply_paint(doc, handler.bounding_box());
        if !handler.is_container() {
            self.open_draw_mode();
        }
        Ok(())
    }

    /// Completed calls of the `tag_name` element referenced by `url(#id)`.
    ///
    /// An entry left by the id pre-pass that has not been reached yet is
    /// processed here, under this element's state, so it can be replayed.
    /// Its skips are not reported; that happens when it is reached in
    /// document order.
    pub(crate) fn definition_calls(
        &self,
        doc: &mut Document<'_>,
        value: &str,
        tag_name: &str,
    ) -> Result<Option<Vec<Call>>, ConvertError> {
        let Some(registered) = doc.element_by_url(value, tag_name) else {
            return Ok(None);
        };
        if registered.calls.is_some() || !doc.options().pre_register_ids {
            return Ok(registered.calls.clone());
        }

        let node = registered.node;
        let Some(kind) = ElementKind::from_tag(tag_name) else {
            return Ok(None);
        };
        if !doc.begin_expansion(node) {
            return Ok(None);
        }
        let outcome = match Self::new(doc, node, self.state.derive_child()) {
            Ok(element) => element.process(doc, kind.handler().as_mut()),
            Err(error) => Err(error.into()),
        };
        doc.end_expansion(node);
        if let Err(ElementError::Fatal(error)) = outcome {
            return Err(error);
        }
        Ok(doc
            .element_by_url(value, tag_name)
            .and_then(|registered| registered.calls.clone()))
    }

    /// Process `children` as this element's children: unknown tags are
    /// reported and skipped, every other child is bracketed by
    /// `save`/`restore` in the currently open scope.
    pub(crate) fn process_child_elements(
        &mut self,
        doc: &mut Document<'_>,
        children: &[NodeId],
    ) -> ElementResult {
        let tree = doc.tree();
        for &child in children {
            let Some(data) = tree.as_element(child) else {
                continue;
            };
            let Some(kind) = ElementKind::from_tag(&data.tag_name) else {
                doc.warn(format!("Unknown tag '{}'; ignoring", data.tag_name));
                continue;
            };

            self.calls.emit(Opcode::Save, vec![]);
            let element = Self::new(doc, child, self.state.derive_child())?;
            let mut handler = kind.handler();
            let outcome = element.process(doc, handler.as_mut());
            splice_outcome(outcome, doc, &mut self.calls)?;
            self.calls.emit(Opcode::Restore, vec![]);
        }
        Ok(())
    }

    /// The element's node in the source tree.
    pub(crate) const fn source(&self) -> NodeId {
        self.source
    }

    /// Tag name.
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// A structural attribute.
    pub(crate) fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    /// The element's own property bag.
    pub(crate) const fn properties(&self) -> &Properties {
        &self.properties
    }

    pub(crate) const fn state(&self) -> &RenderState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut RenderState {
        &mut self.state
    }

    pub(crate) fn calls_mut(&mut self) -> &mut CallBuilder {
        &mut self.calls
    }

    /// Hide this element: it is still processed, but its calls are dropped.
    pub(crate) fn hide(&mut self) {
        self.state.set_computed(Property::Display, "none");
    }

    /// `Skip` unless every attribute in `names` is present.
    pub(crate) fn require_attributes(&self, names: &[&str]) -> ElementResult {
        if names.iter().all(|name| self.attributes.contains_key(name)) {
            return Ok(());
        }
        Err(ElementError::Skip(format!(
            "Must have attributes {} on tag {}; skipping tag",
            names.join(", "),
            self.name
        )))
    }

    /// The skip raised for unusable attribute values.
    pub(crate) fn invalid_attributes(&self) -> ElementError {
        ElementError::Skip(format!("Invalid attributes on tag {}; skipping tag", self.name))
    }

    /// Length attribute in user units; `None` if absent, `Skip` if invalid.
    pub(crate) fn length(&self, name: &str, axis: Axis) -> ElementResult<Option<f64>> {
        match self.attribute(name) {
            None => Ok(None),
            Some(value) => self
                .state
                .distance(value, axis)
                .map(Some)
                .ok_or_else(|| self.invalid_attributes()),
        }
    }

    /// Length attribute with a default for when it is absent.
    pub(crate) fn length_or(&self, name: &str, axis: Axis, default: f64) -> ElementResult<f64> {
        Ok(self.length(name, axis)?.unwrap_or(default))
    }

    /// Zero dimensions skip quietly, negative ones with a warning.
    pub(crate) fn require_positive(&self, values: &[f64]) -> ElementResult {
        if values.iter().any(|&v| v < 0.0) {
            return Err(self.invalid_attributes());
        }
        if values.iter().any(|&v| v == 0.0) {
            return Err(ElementError::SkipQuietly);
        }
        Ok(())
    }
}

/// Hand a finished child to `target`: splice displayed calls, record skip
/// warnings, and let fatal errors through.
pub(crate) fn splice_outcome(
    outcome: ElementResult<Option<CallBuilder>>,
    doc: &mut Document<'_>,
    target: &mut CallBuilder,
) -> Result<(), ConvertError> {
    match outcome {
        Ok(Some(calls)) => calls.splice_into(target),
        Ok(None) | Err(ElementError::SkipQuietly) => {}
        Err(ElementError::Skip(message)) => doc.warn(message),
        Err(ElementError::Fatal(error)) => return Err(error),
    }
    Ok(())
}
