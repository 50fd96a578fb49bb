//! The `clip-path` property.

use vellum_css::Property;

use crate::calls::Opcode;
use crate::document::Document;
use crate::elements::Element;
use crate::error::ConvertError;

impl Element {
    /// Replay the referenced `clipPath`'s geometry, then `clip`.
    pub(crate) fn apply_clip_path(&mut self, doc: &mut Document<'_>) -> Result<(), ConvertError> {
        let Some(value) = self.properties().get(Property::ClipPath) else {
            return Ok(());
        };
        if value == "none" || value == "inherit" {
            return Ok(());
        }

        let value = value.to_string();
        match self.definition_calls(doc, &value, "clipPath")? {
            Some(calls) => {
                let builder = self.calls_mut();
                builder.extend(calls);
                builder.emit(Opcode::Clip, vec![]);
            }
            None => doc.warn("Could not resolve clip-path URI to a clipPath element"),
        }
        Ok(())
    }
}
