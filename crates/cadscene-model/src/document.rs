// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Assembly document abstraction
//!
//! A document is a tree of labels produced by a document reader. Assembly
//! labels own ordered component labels; a component references another label
//! and carries the local placement of that reference. Simple-shape labels own
//! a base shape and optional sub-shape labels.

use crate::{Color, LabelId, Transform};
use serde::{Deserialize, Serialize};

/// Independent color slots of the color tool
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSlot {
    Generic,
    Surface,
    Curve,
}

impl ColorSlot {
    /// All slots in lookup order
    pub const ALL: [ColorSlot; 3] = [ColorSlot::Generic, ColorSlot::Surface, ColorSlot::Curve];

    /// Position in [`ColorSlot::ALL`]
    pub fn index(&self) -> usize {
        match self {
            ColorSlot::Generic => 0,
            ColorSlot::Surface => 1,
            ColorSlot::Curve => 2,
        }
    }
}

/// A node of the assembly tree
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssemblyLabel {
    pub id: LabelId,
    pub name: String,
    pub is_assembly: bool,
    /// Component label pointing at another label
    pub is_reference: bool,
    pub is_simple_shape: bool,
    /// Ordered sub-shape labels (simple shapes only)
    #[serde(default)]
    pub sub_shapes: Vec<LabelId>,
    /// Ordered component labels (assemblies only)
    #[serde(default)]
    pub components: Vec<LabelId>,
}

impl AssemblyLabel {
    /// Label with no role
    pub fn new(id: LabelId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_assembly: false,
            is_reference: false,
            is_simple_shape: false,
            sub_shapes: Vec::new(),
            components: Vec::new(),
        }
    }
}

/// Read access to an assembly document and its color tool
///
/// Only the color tool's instance slots are writable; the label tree itself
/// is read-only.
pub trait AssemblyDocument {
    /// Shape handle type
    type Shape;

    /// Top-level labels, in document order
    fn free_labels(&self) -> Vec<LabelId>;

    /// Look up a label
    fn label(&self, id: LabelId) -> Option<AssemblyLabel>;

    /// Label referenced by a component label
    fn referred_label(&self, component: LabelId) -> Option<LabelId>;

    /// Local placement carried by a component label
    fn location(&self, component: LabelId) -> Transform;

    /// Base shape of a simple-shape label
    fn shape(&self, label: LabelId) -> Option<Self::Shape>;

    /// Instance color recorded against a specific placed shape
    fn instance_color(&self, shape: &Self::Shape, slot: ColorSlot) -> Option<Color>;

    /// Record an instance color against a placed shape
    fn set_instance_color(&mut self, shape: &Self::Shape, slot: ColorSlot, color: Color);

    /// Definition color attached to a label
    fn label_color(&self, label: LabelId, slot: ColorSlot) -> Option<Color>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_order() {
        assert_eq!(ColorSlot::ALL[0], ColorSlot::Generic);
        assert_eq!(ColorSlot::ALL.len(), 3);
    }

    #[test]
    fn test_label_json_defaults() {
        let json = r#"{"id":3,"name":"bolt","is_assembly":false,"is_reference":false,"is_simple_shape":true}"#;
        let label: AssemblyLabel = serde_json::from_str(json).unwrap();
        assert_eq!(label.id, LabelId(3));
        assert!(label.sub_shapes.is_empty());
        assert!(label.components.is_empty());
    }
}
