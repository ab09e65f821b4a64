//! Material spline batch (C5).
//!
//! Binds up to four component curves to a material parameter and evaluates
//! them once per frame, decoupled from how many instances later read the
//! result (spec.md §4.5: "one evaluation per frame to feed many per-instance
//! material applications").
//!
//! Material parameter targets are external collaborators (asset-side GPU
//! upload is out of scope, spec.md §1) — rather than a void-pointer target
//! cast at apply time, each record holds a typed [`MaterialParamHandle`]
//! indexing into a parameter array the caller owns (spec.md §9's typed-handle
//! note).

use glam::Vec4;

use crate::curve::Curve;

/// Index into a caller-owned material parameter array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaterialParamHandle(pub u32);

/// An opaque grouping identifier, compared for equality; `Any` matches
/// every record regardless of its tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupingTag {
    Tag(u64),
    Any,
}

impl GroupingTag {
    fn matches(self, record_tag: u64) -> bool {
        match self {
            GroupingTag::Tag(t) => t == record_tag,
            GroupingTag::Any => true,
        }
    }
}

/// One material-spline binding: 1 component curve for a scalar parameter,
/// or 4 parallel component curves for a color.
pub struct MaterialSplineRecord {
    pub components: Vec<Curve>,
    pub target: MaterialParamHandle,
    pub grouping_tag: u64,
}

/// A collection of material-spline records evaluated together each frame.
#[derive(Default)]
pub struct MaterialSplineBatch {
    records: Vec<MaterialSplineRecord>,
}

impl MaterialSplineBatch {
    pub fn new(records: Vec<MaterialSplineRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MaterialSplineRecord] {
        &self.records
    }

    /// Evaluate every component curve of every record at `t`; each curve
    /// caches its own result (see [`Curve::value`]). Does not write to
    /// parameters.
    pub fn calculate_values(&self, t: f32) {
        for record in &self.records {
            for component in &record.components {
                component.evaluate(t);
            }
        }
    }

    /// Write the last-evaluated values of every record matching `tag` into
    /// `params`, indexed by each record's [`MaterialParamHandle`].
    pub fn apply_to_parameters(&self, tag: GroupingTag, params: &mut [Vec4]) {
        for record in &self.records {
            if !tag.matches(record.grouping_tag) {
                continue;
            }
            let idx = record.target.0 as usize;
            if idx >= params.len() {
                continue;
            }
            params[idx] = match record.components.len() {
                0 => Vec4::ZERO,
                1 => Vec4::new(record.components[0].value().x, 0.0, 0.0, 0.0),
                _ => Vec4::new(
                    record.components[0].value().x,
                    record.components.get(1).map(|c| c.value().x).unwrap_or(0.0),
                    record.components.get(2).map(|c| c.value().x).unwrap_or(0.0),
                    record.components.get(3).map(|c| c.value().x).unwrap_or(0.0),
                ),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{DefaultKind, ValueKind};

    #[test]
    fn scalar_record_broadcasts_into_param() {
        let curve = Curve::new_default(DefaultKind::ConstantValue(0.75), ValueKind::Scalar);
        let batch = MaterialSplineBatch::new(vec![MaterialSplineRecord {
            components: vec![curve],
            target: MaterialParamHandle(2),
            grouping_tag: 1,
        }]);
        batch.calculate_values(0.5);
        let mut params = vec![Vec4::ZERO; 4];
        batch.apply_to_parameters(GroupingTag::Any, &mut params);
        assert_eq!(params[2].x, 0.75);
    }

    #[test]
    fn grouping_tag_filters_records() {
        let curve = Curve::new_default(DefaultKind::One, ValueKind::Scalar);
        let batch = MaterialSplineBatch::new(vec![MaterialSplineRecord {
            components: vec![curve],
            target: MaterialParamHandle(0),
            grouping_tag: 99,
        }]);
        batch.calculate_values(0.0);
        let mut params = vec![Vec4::ZERO; 1];
        batch.apply_to_parameters(GroupingTag::Tag(1), &mut params);
        assert_eq!(params[0], Vec4::ZERO);
        batch.apply_to_parameters(GroupingTag::Tag(99), &mut params);
        assert_eq!(params[0].x, 1.0);
    }

    #[test]
    fn color_record_packs_four_components() {
        let r = Curve::new_default(DefaultKind::ConstantValue(0.1), ValueKind::Scalar);
        let g = Curve::new_default(DefaultKind::ConstantValue(0.2), ValueKind::Scalar);
        let b = Curve::new_default(DefaultKind::ConstantValue(0.3), ValueKind::Scalar);
        let a = Curve::new_default(DefaultKind::ConstantValue(1.0), ValueKind::Scalar);
        let batch = MaterialSplineBatch::new(vec![MaterialSplineRecord {
            components: vec![r, g, b, a],
            target: MaterialParamHandle(0),
            grouping_tag: 0,
        }]);
        batch.calculate_values(0.0);
        let mut params = vec![Vec4::ZERO; 1];
        batch.apply_to_parameters(GroupingTag::Any, &mut params);
        assert_eq!(params[0], Vec4::new(0.1, 0.2, 0.3, 1.0));
    }
}
