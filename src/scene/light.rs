//! Light sources and the light-list shape consumed by the variant resolver.
//!
//! The renderer hands the material system a *sorted* light list (grouped by
//! kind). The shader variant does not depend on the individual lights, only
//! on the shape of that list — how many of each kind, and how many cast
//! shadows — so [`LightingShape`] is what ends up in the variant key.

use glam::Vec3;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Key into a [`LightPool`].
    pub struct LightKey;
}

/// Light kind with kind-specific parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Infinitely distant light along a direction.
    Directional,
    /// Point light with a falloff range.
    Omni {
        /// Falloff range in world units.
        range: f32,
    },
    /// Cone light with a falloff range and cone angles.
    Spot {
        /// Falloff range in world units.
        range: f32,
        /// Inner cone half-angle in radians.
        inner_cone: f32,
        /// Outer cone half-angle in radians.
        outer_cone: f32,
    },
}

/// A light source. Placement comes from the node it is associated with;
/// the light itself is pure parameter data.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Vec3,
    pub intensity: f32,
    pub cast_shadows: bool,
    pub enabled: bool,
}

impl Light {
    /// Creates an enabled white light of the given kind.
    #[must_use]
    pub fn new(kind: LightKind) -> Self {
        Self {
            kind,
            color: Vec3::ONE,
            intensity: 1.0,
            cast_shadows: false,
            enabled: true,
        }
    }
}

/// Keyed storage for the lights of a scene.
#[derive(Default)]
pub struct LightPool {
    lights: SlotMap<LightKey, Light>,
}

impl LightPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, light: Light) -> LightKey {
        self.lights.insert(light)
    }

    pub fn remove(&mut self, key: LightKey) -> Option<Light> {
        self.lights.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: LightKey) -> Option<&Light> {
        self.lights.get(key)
    }

    pub fn get_mut(&mut self, key: LightKey) -> Option<&mut Light> {
        self.lights.get_mut(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LightKey, &Light)> {
        self.lights.iter()
    }

    /// Collects the enabled lights sorted by kind (directional, omni, spot)
    /// — the order draw-call batching expects.
    #[must_use]
    pub fn sorted_enabled(&self) -> Vec<&Light> {
        let mut out: Vec<&Light> = self.lights.values().filter(|l| l.enabled).collect();
        out.sort_by_key(|l| match l.kind {
            LightKind::Directional => 0u8,
            LightKind::Omni { .. } => 1,
            LightKind::Spot { .. } => 2,
        });
        out
    }
}

/// The shape of a sorted light list: everything the shader variant depends
/// on, and nothing it does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LightingShape {
    pub directional: u16,
    pub omni: u16,
    pub spot: u16,
    pub shadow_casters: u16,
}

impl LightingShape {
    /// Derives the shape from a light list, counting enabled lights only.
    #[must_use]
    pub fn from_lights<'a>(lights: impl IntoIterator<Item = &'a Light>) -> Self {
        let mut shape = Self::default();
        for light in lights {
            if !light.enabled {
                continue;
            }
            match light.kind {
                LightKind::Directional => shape.directional += 1,
                LightKind::Omni { .. } => shape.omni += 1,
                LightKind::Spot { .. } => shape.spot += 1,
            }
            if light.cast_shadows {
                shape.shadow_casters += 1;
            }
        }
        shape
    }

    /// Total number of lights in the shape.
    #[must_use]
    pub fn total(&self) -> u32 {
        u32::from(self.directional) + u32::from(self.omni) + u32::from(self.spot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_counts_enabled_lights_by_kind() {
        let mut pool = LightPool::new();
        pool.insert(Light::new(LightKind::Directional));
        pool.insert(Light::new(LightKind::Omni { range: 10.0 }));
        let mut spot = Light::new(LightKind::Spot {
            range: 5.0,
            inner_cone: 0.4,
            outer_cone: 0.6,
        });
        spot.cast_shadows = true;
        pool.insert(spot);
        let mut disabled = Light::new(LightKind::Omni { range: 1.0 });
        disabled.enabled = false;
        pool.insert(disabled);

        let sorted = pool.sorted_enabled();
        let shape = LightingShape::from_lights(sorted.iter().copied());
        assert_eq!(shape.directional, 1);
        assert_eq!(shape.omni, 1);
        assert_eq!(shape.spot, 1);
        assert_eq!(shape.shadow_casters, 1);
        assert_eq!(shape.total(), 3);
    }

    #[test]
    fn sorted_enabled_groups_by_kind() {
        let mut pool = LightPool::new();
        pool.insert(Light::new(LightKind::Spot {
            range: 1.0,
            inner_cone: 0.1,
            outer_cone: 0.2,
        }));
        pool.insert(Light::new(LightKind::Directional));
        pool.insert(Light::new(LightKind::Omni { range: 2.0 }));

        let kinds: Vec<u8> = pool
            .sorted_enabled()
            .iter()
            .map(|l| match l.kind {
                LightKind::Directional => 0,
                LightKind::Omni { .. } => 1,
                LightKind::Spot { .. } => 2,
            })
            .collect();
        assert_eq!(kinds, vec![0, 1, 2]);
    }
}
