/// Skeletal hierarchy and absolute transform resolution
use crate::transform::Transform;

/// One node of a model's bone hierarchy
#[derive(Debug, Clone)]
pub struct Bone {
    pub index: usize,
    pub name: String,
    pub parent: Option<usize>,
    transform: Transform,
    local_transform: Transform,
    absolute_transform: Transform,
}

impl Bone {
    pub fn new(index: usize, name: impl Into<String>, parent: Option<usize>, transform: Transform) -> Self {
        Self {
            index,
            name: name.into(),
            parent,
            transform,
            local_transform: Transform::identity(),
            absolute_transform: Transform::identity(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Places this bone relative to its parent, as stored in the model
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Animation transform applied after the stored transform. Identity
    /// unless set.
    pub fn local_transform(&self) -> &Transform {
        &self.local_transform
    }

    pub fn set_local_transform(&mut self, t: Transform) {
        self.local_transform = t;
    }

    /// World transform as of the last call to [`resolve_absolute_transforms`]
    pub fn absolute_transform(&self) -> &Transform {
        &self.absolute_transform
    }

    fn compute_absolute(&mut self, parent: &Transform) {
        self.absolute_transform = *parent * self.transform * self.local_transform;
    }
}

/// Compose every bone with its parent chain, rooted at `placement`.
///
/// Bones must be ordered so that each parent precedes its children; a
/// parent that comes later (or does not exist) contributes whatever
/// absolute transform it currently holds, or `placement` if the index is
/// out of range.
pub fn resolve_absolute_transforms(bones: &mut [Bone], placement: &Transform) {
    for i in 0..bones.len() {
        let parent = match bones[i].parent {
            Some(p) if p < bones.len() => bones[p].absolute_transform,
            _ => *placement,
        };
        bones[i].compute_absolute(&parent);
    }
}

/// First bone whose parent does not precede it, as `(bone, parent)`
pub fn validate_bone_order(bones: &[Bone]) -> Result<(), (usize, usize)> {
    for (i, bone) in bones.iter().enumerate() {
        if let Some(p) = bone.parent {
            if p >= i {
                return Err((i, p));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector;

    fn chain() -> Vec<Bone> {
        let step = Transform::translate(1.0, 0.0, 0.0);
        vec![
            Bone::new(0, "a", None, step),
            Bone::new(1, "b", Some(0), step),
            Bone::new(2, "c", Some(1), step),
        ]
    }

    #[test]
    fn test_chain_accumulates() {
        let mut bones = chain();
        resolve_absolute_transforms(&mut bones, &Transform::identity());
        assert_eq!(*bones[0].absolute_transform(), Transform::translate(1.0, 0.0, 0.0));
        assert_eq!(*bones[1].absolute_transform(), Transform::translate(2.0, 0.0, 0.0));
        assert_eq!(*bones[2].absolute_transform(), Transform::translate(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_placement_roots_the_chain() {
        let mut bones = chain();
        resolve_absolute_transforms(&mut bones, &Transform::translate(0.0, 5.0, 0.0));
        assert_eq!(
            bones[2].absolute_transform().translation(),
            Vector::point(3.0, 5.0, 0.0)
        );
    }

    #[test]
    fn test_local_transform_applies_after_stored() {
        let mut bones = chain();
        bones[1].set_local_transform(Transform::rotate_z(90.0));
        resolve_absolute_transforms(&mut bones, &Transform::identity());

        // c's offset is rotated by b's local rotation
        let p = bones[2].absolute_transform().translation();
        assert!((p.x - 2.0).abs() < 1e-12);
        assert!((p.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_repeated_resolution_is_stable() {
        let mut bones = chain();
        resolve_absolute_transforms(&mut bones, &Transform::identity());
        let first: Vec<_> = bones.iter().map(|b| *b.absolute_transform()).collect();
        resolve_absolute_transforms(&mut bones, &Transform::identity());
        let second: Vec<_> = bones.iter().map(|b| *b.absolute_transform()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_order_validation() {
        assert!(validate_bone_order(&chain()).is_ok());

        let mut bones = chain();
        bones[0].parent = Some(2);
        assert_eq!(validate_bone_order(&bones), Err((0, 2)));
    }
}
