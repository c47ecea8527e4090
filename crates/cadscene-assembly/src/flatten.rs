// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Depth-first assembly traversal

use crate::{resolve_color, FlattenedAssembly, FlattenedInstance, InsertOutcome};
use cadscene_model::{AssemblyDocument, AssemblyLabel, Color, GeometryKernel, LabelId, Transform};

/// Flattens an assembly document into placed, colored instances
///
/// Each recursive call receives the composed placement of its ancestors by
/// value; nothing is pushed or popped on shared state.
pub struct AssemblyFlattener<'a, K: GeometryKernel> {
    kernel: &'a K,
    default_color: Color,
}

impl<'a, K: GeometryKernel> AssemblyFlattener<'a, K> {
    /// Create a flattener falling back to gray
    pub fn new(kernel: &'a K) -> Self {
        Self {
            kernel,
            default_color: Color::DEFAULT_GRAY,
        }
    }

    /// Use a different fallback color
    pub fn with_default_color(mut self, color: Color) -> Self {
        self.default_color = color;
        self
    }

    /// Flatten every free label of `document`
    ///
    /// The document is mutable only so resolved colors can be written back
    /// into its instance color slots. Anomalies (unknown labels, labels with
    /// no role, missing or null shapes) are logged and skipped.
    pub fn flatten<D>(&self, document: &mut D) -> FlattenedAssembly<K::Shape>
    where
        D: AssemblyDocument<Shape = K::Shape>,
    {
        let mut result = FlattenedAssembly::new();
        let roots = document.free_labels();
        log::debug!("flattening {} free labels", roots.len());

        for root in roots {
            self.visit(document, root, Transform::identity(), &[], &mut result);
        }

        log::debug!("flattened into {} instances", result.len());
        result
    }

    fn visit<D>(
        &self,
        document: &mut D,
        id: LabelId,
        placement: Transform,
        ancestors: &[LabelId],
        out: &mut FlattenedAssembly<K::Shape>,
    ) where
        D: AssemblyDocument<Shape = K::Shape>,
    {
        let Some(label) = document.label(id) else {
            log::warn!("label {} not found, skipped", id);
            return;
        };

        if label.is_assembly {
            let mut chain = ancestors.to_vec();
            chain.push(id);

            for &component in &label.components {
                let is_reference = document
                    .label(component)
                    .map(|c| c.is_reference)
                    .unwrap_or(false);
                if !is_reference {
                    log::debug!("component {} of '{}' is not a reference, skipped", component, label.name);
                    continue;
                }
                let Some(target) = document.referred_label(component) else {
                    log::warn!("component {} of '{}' refers to nothing, skipped", component, label.name);
                    continue;
                };
                if chain.contains(&target) {
                    log::warn!("component {} of '{}' closes a cycle, skipped", component, label.name);
                    continue;
                }
                let location = document.location(component);
                self.visit(document, target, placement.multiplied(&location), &chain, out);
            }
        } else if label.is_simple_shape {
            self.place_instance(document, &label, &placement, out);
            for &sub in &label.sub_shapes {
                match document.label(sub) {
                    Some(sub_label) => self.place_instance(document, &sub_label, &placement, out),
                    None => log::warn!("sub-shape {} of '{}' not found, skipped", sub, label.name),
                }
            }
        } else {
            log::debug!("label {} ('{}') has no assembly or shape role, skipped", id, label.name);
        }
    }

    fn place_instance<D>(
        &self,
        document: &mut D,
        label: &AssemblyLabel,
        placement: &Transform,
        out: &mut FlattenedAssembly<K::Shape>,
    ) where
        D: AssemblyDocument<Shape = K::Shape>,
    {
        let Some(base) = document.shape(label.id) else {
            log::warn!("label {} ('{}') has no shape, skipped", label.id, label.name);
            return;
        };
        if self.kernel.is_null(&base) {
            log::warn!("label {} ('{}') has a null shape, skipped", label.id, label.name);
            return;
        }

        let placed = self.kernel.apply_transform(&base, placement);
        if self.kernel.is_null(&placed) {
            log::warn!("placing '{}' produced a null shape, skipped", label.name);
            return;
        }

        let resolved = resolve_color(document, &placed, label.id, self.default_color);
        let instance = FlattenedInstance {
            shape: placed,
            name: label.name.clone(),
            color: resolved.color,
            color_source: resolved.source,
            source_label: label.id,
        };

        let kernel = self.kernel;
        if out.insert_or_overwrite(instance, |a, b| kernel.same_shape(a, b)) == InsertOutcome::Overwrote {
            log::warn!(
                "'{}' places a shape equal to an earlier instance; the earlier name and color were replaced",
                label.name
            );
        }
    }
}
