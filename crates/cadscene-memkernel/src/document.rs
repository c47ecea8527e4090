// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Labelled assembly document with a color tool

use crate::{MemKernel, MemShape};
use cadscene_model::{
    AssemblyDocument, AssemblyLabel, Color, ColorSlot, GeometryKernel, LabelId, Transform,
};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Colors per slot, indexed by [`ColorSlot::index`]
type SlotColors = [Option<Color>; 3];

#[derive(Clone, Debug, Serialize, Deserialize)]
struct LabelEntry {
    label: AssemblyLabel,
    #[serde(default)]
    shape: Option<MemShape>,
    /// Target of a reference component
    #[serde(default)]
    referred: Option<LabelId>,
    #[serde(default)]
    location: Transform,
    #[serde(default)]
    colors: SlotColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct InstanceColors {
    shape: MemShape,
    colors: SlotColors,
}

/// In-memory assembly document
///
/// Labels are addressed by their insertion index. Instance colors are keyed
/// by placed shape handles compared with [`MemKernel::same_shape`].
///
/// ```ignore
/// let mut doc = MemDocument::new();
/// let bolt = doc.add_shape("bolt", MemShape::make_cylinder(1.0, 10.0));
/// let asm = doc.add_assembly("frame");
/// doc.add_component(asm, bolt, Transform::from_translation(5.0, 0.0, 0.0));
/// assert_eq!(doc.free_labels(), vec![asm]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemDocument {
    labels: Vec<LabelEntry>,
    #[serde(default)]
    instance_colors: Vec<InstanceColors>,
    #[serde(skip)]
    kernel: MemKernel,
}

impl MemDocument {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, label: AssemblyLabel) -> LabelId {
        let id = label.id;
        self.labels.push(LabelEntry {
            label,
            shape: None,
            referred: None,
            location: Transform::identity(),
            colors: [None; 3],
        });
        id
    }

    fn next_id(&self) -> LabelId {
        LabelId(self.labels.len() as u32)
    }

    fn entry(&self, id: LabelId) -> Option<&LabelEntry> {
        self.labels.get(id.0 as usize)
    }

    fn entry_mut(&mut self, id: LabelId) -> Option<&mut LabelEntry> {
        self.labels.get_mut(id.0 as usize)
    }

    /// Add a label with no role
    pub fn add_label(&mut self, name: &str) -> LabelId {
        let label = AssemblyLabel::new(self.next_id(), name);
        self.push(label)
    }

    /// Add a simple-shape label
    pub fn add_shape(&mut self, name: &str, shape: MemShape) -> LabelId {
        let mut label = AssemblyLabel::new(self.next_id(), name);
        label.is_simple_shape = true;
        let id = self.push(label);
        if let Some(entry) = self.entry_mut(id) {
            entry.shape = Some(shape);
        }
        id
    }

    /// Add an empty assembly label
    pub fn add_assembly(&mut self, name: &str) -> LabelId {
        let mut label = AssemblyLabel::new(self.next_id(), name);
        label.is_assembly = true;
        self.push(label)
    }

    /// Place `target` inside `assembly` with a local location
    ///
    /// Returns the new component label, or `None` if `assembly` is unknown.
    pub fn add_component(
        &mut self,
        assembly: LabelId,
        target: LabelId,
        location: Transform,
    ) -> Option<LabelId> {
        self.entry(assembly)?;
        let name = self
            .entry(target)
            .map(|e| e.label.name.clone())
            .unwrap_or_default();
        let mut label = AssemblyLabel::new(self.next_id(), name);
        label.is_reference = true;
        let id = self.push(label);
        if let Some(entry) = self.entry_mut(id) {
            entry.referred = Some(target);
            entry.location = location;
        }
        if let Some(parent) = self.entry_mut(assembly) {
            parent.label.components.push(id);
        }
        Some(id)
    }

    /// Attach a component that is not a reference
    pub fn add_unreferenced_component(&mut self, assembly: LabelId, name: &str) -> Option<LabelId> {
        self.entry(assembly)?;
        let id = self.add_label(name);
        if let Some(parent) = self.entry_mut(assembly) {
            parent.label.components.push(id);
        }
        Some(id)
    }

    /// Attach a sub-shape label to a simple-shape label
    pub fn add_sub_shape(&mut self, parent: LabelId, name: &str, shape: MemShape) -> Option<LabelId> {
        self.entry(parent)?;
        let id = self.add_shape(name, shape);
        if let Some(entry) = self.entry_mut(parent) {
            entry.label.sub_shapes.push(id);
        }
        Some(id)
    }

    /// Set a definition color on a label
    pub fn set_label_color(&mut self, label: LabelId, slot: ColorSlot, color: Color) {
        if let Some(entry) = self.entry_mut(label) {
            entry.colors[slot.index()] = Some(color);
        }
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn instance_entry(&self, shape: &MemShape) -> Option<&InstanceColors> {
        self.instance_colors
            .iter()
            .find(|entry| self.kernel.same_shape(&entry.shape, shape))
    }
}

impl AssemblyDocument for MemDocument {
    type Shape = MemShape;

    /// Labels that are neither components nor sub-shapes nor referenced
    fn free_labels(&self) -> Vec<LabelId> {
        let mut used = FxHashSet::default();
        for entry in &self.labels {
            used.extend(entry.label.components.iter().copied());
            used.extend(entry.label.sub_shapes.iter().copied());
            used.extend(entry.referred);
        }
        self.labels
            .iter()
            .map(|entry| entry.label.id)
            .filter(|id| !used.contains(id))
            .collect()
    }

    fn label(&self, id: LabelId) -> Option<AssemblyLabel> {
        self.entry(id).map(|e| e.label.clone())
    }

    fn referred_label(&self, component: LabelId) -> Option<LabelId> {
        self.entry(component).and_then(|e| e.referred)
    }

    fn location(&self, component: LabelId) -> Transform {
        self.entry(component)
            .map(|e| e.location)
            .unwrap_or_default()
    }

    fn shape(&self, label: LabelId) -> Option<MemShape> {
        self.entry(label).and_then(|e| e.shape.clone())
    }

    fn instance_color(&self, shape: &MemShape, slot: ColorSlot) -> Option<Color> {
        self.instance_entry(shape)
            .and_then(|entry| entry.colors[slot.index()])
    }

    fn set_instance_color(&mut self, shape: &MemShape, slot: ColorSlot, color: Color) {
        let kernel = self.kernel;
        match self
            .instance_colors
            .iter_mut()
            .find(|entry| kernel.same_shape(&entry.shape, shape))
        {
            Some(entry) => entry.colors[slot.index()] = Some(color),
            None => {
                let mut colors = [None; 3];
                colors[slot.index()] = Some(color);
                self.instance_colors.push(InstanceColors {
                    shape: shape.clone(),
                    colors,
                });
            }
        }
    }

    fn label_color(&self, label: LabelId, slot: ColorSlot) -> Option<Color> {
        self.entry(label).and_then(|e| e.colors[slot.index()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_labels_exclude_components_and_targets() {
        let mut doc = MemDocument::new();
        let part = doc.add_shape("part", MemShape::make_box(1.0, 1.0, 1.0));
        let asm = doc.add_assembly("asm");
        let comp = doc
            .add_component(asm, part, Transform::from_translation(1.0, 0.0, 0.0))
            .unwrap();
        let loose = doc.add_shape("loose", MemShape::make_cylinder(1.0, 1.0));

        assert_eq!(doc.free_labels(), vec![asm, loose]);
        assert_eq!(doc.referred_label(comp), Some(part));
        assert_eq!(doc.location(comp).translation(), [1.0, 0.0, 0.0]);
        assert_eq!(doc.label(asm).unwrap().components, vec![comp]);
    }

    #[test]
    fn test_instance_colors_keyed_by_placed_shape() {
        let mut doc = MemDocument::new();
        let part = MemShape::make_box(1.0, 1.0, 1.0);
        let here = part.moved(&Transform::from_translation(1.0, 0.0, 0.0));
        let there = part.moved(&Transform::from_translation(2.0, 0.0, 0.0));
        let red = Color::rgb(1.0, 0.0, 0.0);

        doc.set_instance_color(&here, ColorSlot::Surface, red);

        assert_eq!(doc.instance_color(&here, ColorSlot::Surface), Some(red));
        assert_eq!(doc.instance_color(&here, ColorSlot::Generic), None);
        assert_eq!(doc.instance_color(&there, ColorSlot::Surface), None);
    }

    #[test]
    fn test_sub_shapes_are_not_free() {
        let mut doc = MemDocument::new();
        let part = doc.add_shape("part", MemShape::make_box(1.0, 1.0, 1.0));
        let face = doc
            .add_sub_shape(part, "face", MemShape::make_box(1.0, 1.0, 0.0))
            .unwrap();
        assert_eq!(doc.free_labels(), vec![part]);
        assert_eq!(doc.label(part).unwrap().sub_shapes, vec![face]);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut doc = MemDocument::new();
        let part = doc.add_shape("part", MemShape::make_box(1.0, 2.0, 3.0));
        doc.set_label_color(part, ColorSlot::Generic, Color::rgb(0.1, 0.2, 0.3));

        let json = serde_json::to_string(&doc).unwrap();
        let back: MemDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(
            back.label_color(part, ColorSlot::Generic),
            Some(Color::rgb(0.1, 0.2, 0.3))
        );
        assert!(back.shape(part).is_some());
    }
}
