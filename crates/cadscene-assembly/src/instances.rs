// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Flattened instance storage keyed by kernel shape equality

use crate::ColorSource;
use cadscene_model::{Color, LabelId};

/// One positioned, colored shape
#[derive(Clone, Debug)]
pub struct FlattenedInstance<S> {
    /// Shape with the full composed placement applied
    pub shape: S,
    /// Display name of the source label
    pub name: String,
    pub color: Color,
    pub color_source: ColorSource,
    /// Label the shape was taken from
    pub source_label: LabelId,
}

/// Result of [`FlattenedAssembly::insert_or_overwrite`]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InsertOutcome {
    Inserted,
    /// An equal shape was already present; its name and color were replaced
    Overwrote,
}

/// Ordered collection of flattened instances
///
/// Keys are placed shape handles compared with a caller-supplied equality,
/// normally the kernel's `same_shape`. Two instances whose placed shapes
/// compare equal collapse into one entry: the entry keeps its first shape
/// handle and position, and takes the name, color and label of the last
/// insert. With a tolerance-based kernel this can merge instances that look
/// distinct.
#[derive(Clone, Debug)]
pub struct FlattenedAssembly<S> {
    instances: Vec<FlattenedInstance<S>>,
}

impl<S> Default for FlattenedAssembly<S> {
    fn default() -> Self {
        Self {
            instances: Vec::new(),
        }
    }
}

impl<S> FlattenedAssembly<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new instance, or overwrite the entry whose shape is equal
    pub fn insert_or_overwrite(
        &mut self,
        instance: FlattenedInstance<S>,
        same_shape: impl Fn(&S, &S) -> bool,
    ) -> InsertOutcome {
        match self
            .instances
            .iter_mut()
            .find(|existing| same_shape(&existing.shape, &instance.shape))
        {
            Some(existing) => {
                existing.name = instance.name;
                existing.color = instance.color;
                existing.color_source = instance.color_source;
                existing.source_label = instance.source_label;
                InsertOutcome::Overwrote
            }
            None => {
                self.instances.push(instance);
                InsertOutcome::Inserted
            }
        }
    }

    /// Entry whose shape equals `shape`
    pub fn find(&self, shape: &S, same_shape: impl Fn(&S, &S) -> bool) -> Option<&FlattenedInstance<S>> {
        self.instances
            .iter()
            .find(|existing| same_shape(&existing.shape, shape))
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Instances in first-insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, FlattenedInstance<S>> {
        self.instances.iter()
    }

    pub fn get(&self, index: usize) -> Option<&FlattenedInstance<S>> {
        self.instances.get(index)
    }
}

impl<S> IntoIterator for FlattenedAssembly<S> {
    type Item = FlattenedInstance<S>;
    type IntoIter = std::vec::IntoIter<FlattenedInstance<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.instances.into_iter()
    }
}

impl<'a, S> IntoIterator for &'a FlattenedAssembly<S> {
    type Item = &'a FlattenedInstance<S>;
    type IntoIter = std::slice::Iter<'a, FlattenedInstance<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.instances.iter()
    }
}
