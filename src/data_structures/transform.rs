//! Transform algebra for scene nodes and mesh edits.
//!
//! A [`Transform`] is a translation, rotation and scale applied in the order
//! scale, rotate, translate. Composing `parent * local` yields the child's
//! world transform. The module also provides the fixed frame changes used by
//! the composite builders and the GPU packing of a world transform.

use std::ops::Mul;

use cgmath::{
    InnerSpace, Matrix, Matrix3, Matrix4, One, Rad, Rotation3, SquareMatrix, Vector3, Vector4,
};

use crate::resources::mesh::Vertex;

/// Translation, rotation (as quaternion) and scale of a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    /// Identity transform (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: cgmath::Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn from_translation(translation: Vector3<f32>) -> Self {
        Self {
            translation,
            ..Self::new()
        }
    }

    /// Rotation of `angle` radians around `axis`. The axis does not need to be normalized.
    pub fn from_axis_angle(axis: Vector3<f32>, angle: f32) -> Self {
        Self {
            rotation: rotation(axis, angle),
            ..Self::new()
        }
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.set_uniform_scale(scale);
        self
    }

    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.scale = Vector3::new(scale, scale, scale);
    }

    pub fn set_rotation(&mut self, axis: Vector3<f32>, angle: f32) {
        self.rotation = rotation(axis, angle);
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn transform_point(&self, point: Vector3<f32>) -> Vector3<f32> {
        let scaled = Vector3::new(
            self.scale.x * point.x,
            self.scale.y * point.y,
            self.scale.z * point.z,
        );
        self.translation + self.rotation * scaled
    }

    /**
     * Matrix mapping object space normals to world space: the inverse transpose
     * of rotation times scale. Falls back to the rotation when a scale
     * component is zero and the node is flattened.
     */
    pub fn normal_matrix(&self) -> Matrix3<f32> {
        let rotation = Matrix3::from(self.rotation);
        (rotation * Matrix3::from_diagonal(self.scale))
            .invert()
            .map_or(rotation, |inverse| inverse.transpose())
    }

    pub fn to_raw(&self) -> InstanceRaw {
        let world_matrix = self.to_matrix();
        let handedness = world_matrix.determinant().signum();
        InstanceRaw {
            model: world_matrix.into(),
            normal: self.normal_matrix().into(),
            handedness,
        }
    }
}

/// Unit quaternion for `angle` radians around `axis`; a zero axis yields the identity.
pub fn rotation(axis: Vector3<f32>, angle: f32) -> cgmath::Quaternion<f32> {
    if axis.magnitude2() <= f32::EPSILON {
        return cgmath::Quaternion::one();
    }
    cgmath::Quaternion::from_axis_angle(axis.normalize(), Rad(angle))
}

fn compose(parent: &Transform, local: &Transform) -> Transform {
    let scaled_local = Vector3::new(
        parent.scale.x * local.translation.x,
        parent.scale.y * local.translation.y,
        parent.scale.z * local.translation.z,
    );
    Transform {
        translation: parent.translation + parent.rotation * scaled_local,
        rotation: parent.rotation * local.rotation,
        scale: Vector3::new(
            parent.scale.x * local.scale.x,
            parent.scale.y * local.scale.y,
            parent.scale.z * local.scale.z,
        ),
    }
}

impl Mul<Transform> for Transform {
    type Output = Self;

    fn mul(self, rhs: Transform) -> Self::Output {
        compose(&self, &rhs)
    }
}

impl<'a, 'b> Mul<&'b Transform> for &'a Transform {
    type Output = Transform;

    fn mul(self, rhs: &'b Transform) -> Self::Output {
        compose(self, rhs)
    }
}

impl From<Vector3<f32>> for Transform {
    fn from(translation: Vector3<f32>) -> Self {
        Transform::from_translation(translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

fn rows(r0: [f32; 4], r1: [f32; 4], r2: [f32; 4], r3: [f32; 4]) -> Matrix4<f32> {
    // cgmath matrices are built from columns
    Matrix4::from_cols(
        Vector4::new(r0[0], r1[0], r2[0], r3[0]),
        Vector4::new(r0[1], r1[1], r2[1], r3[1]),
        Vector4::new(r0[2], r1[2], r2[2], r3[2]),
        Vector4::new(r0[3], r1[3], r2[3], r3[3]),
    )
}

/// Quarter turn around x taking `+z` to `+y` (and `+y` to `-z`).
///
/// Primitives grow along z; bodies that travel along y are turned with this.
pub fn axis_swap_z_to_y() -> Matrix4<f32> {
    rows(
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    )
}

/// Quarter turn around x taking `+z` to `-y` (and `+y` to `+z`).
pub fn axis_swap_z_to_neg_y() -> Matrix4<f32> {
    rows(
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, -1.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    )
}

/// Gain of the mosquito head tilt: every non-trivial entry is exactly 0.7.
const HEAD_TILT_GAIN: f32 = 0.7 * std::f32::consts::SQRT_2;

/// 45 degree turn around x, shrunk so the rotated entries are 0.7.
pub fn head_tilt() -> Matrix4<f32> {
    Matrix4::from_angle_x(Rad(std::f32::consts::FRAC_PI_4))
        * Matrix4::from_nonuniform_scale(1.0, HEAD_TILT_GAIN, HEAD_TILT_GAIN)
}

/// Which side of a symmetric body a part sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// `+1` for the left side, `-1` for the right side.
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }
}

/// Frame of a flat wing lying in the xy plane.
///
/// The wing is turned a quarter around z (clockwise for the left side) and
/// lifted in z by its original y coordinate so it leans upwards. The right
/// frame is the left one with the turn direction mirrored.
pub fn mirrored_wing_frame(side: Side) -> Matrix4<f32> {
    let s = side.sign();
    rows(
        [0.0, s, 0.0, 0.0],
        [-s, 0.0, 0.0, 0.0],
        [0.0, 1.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    )
}

/**
 * The raw instance is the world transform as it is stored in a GPU instance buffer.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 3]; 3],
    pub handedness: f32,
}

impl InstanceRaw {
    /// Model columns at 5..=8, normal columns at 9..=11, handedness at 12.
    /// Slots 0..=4 belong to the model vertex.
    const ATTRIBUTES: [wgpu::VertexAttribute; 8] = wgpu::vertex_attr_array![
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
        8 => Float32x4,
        9 => Float32x3,
        10 => Float32x3,
        11 => Float32x3,
        12 => Float32
    ];
}

impl Vertex for InstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Matrix, Transform as _};

    fn approx(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-5
    }

    #[test]
    fn child_translation_composes_with_parent() {
        let parent = Transform::from_translation(Vector3::new(1.0, 0.0, 0.0));
        let child = Transform::from_translation(Vector3::new(0.0, 1.0, 0.0));
        let world = parent * child;
        assert!(approx(world.translation, Vector3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn composition_matches_matrix_product_for_uniform_scale() {
        let parent = Transform {
            translation: Vector3::new(2.0, -1.0, 0.5),
            rotation: rotation(Vector3::unit_z(), 0.7),
            scale: Vector3::new(1.5, 1.5, 1.5),
        };
        let child = Transform {
            translation: Vector3::new(0.0, 3.0, 1.0),
            rotation: rotation(Vector3::unit_x(), -0.3),
            scale: Vector3::new(0.5, 0.5, 0.5),
        };
        let composed = (&parent * &child).to_matrix();
        let expected = parent.to_matrix() * child.to_matrix();
        for col in 0..4 {
            for row in 0..4 {
                assert!((composed[col][row] - expected[col][row]).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn local_scale_is_applied_before_rotation_and_translation() {
        let transform = Transform {
            translation: Vector3::new(0.0, 0.0, 1.0),
            rotation: rotation(Vector3::unit_z(), std::f32::consts::FRAC_PI_2),
            scale: Vector3::new(2.0, 2.0, 2.0),
        };
        let point = transform.transform_point(Vector3::new(1.0, 0.0, 0.0));
        assert!(approx(point, Vector3::new(0.0, 2.0, 1.0)));
    }

    #[test]
    fn axis_swaps_are_exact_quarter_turns() {
        let z = cgmath::Point3::new(0.0, 0.0, 1.0);
        assert_eq!(
            axis_swap_z_to_y().transform_point(z),
            cgmath::Point3::new(0.0, 1.0, 0.0)
        );
        assert_eq!(
            axis_swap_z_to_neg_y().transform_point(z),
            cgmath::Point3::new(0.0, -1.0, 0.0)
        );
        let turned: Matrix4<f32> = Matrix4::from_angle_x(Deg(90.0));
        let swap = axis_swap_z_to_neg_y();
        for col in 0..4 {
            for row in 0..4 {
                assert!((turned[col][row] - swap[col][row]).abs() < 1e-6);
            }
        }
        assert_eq!(axis_swap_z_to_y(), axis_swap_z_to_neg_y().transpose());
    }

    #[test]
    fn head_tilt_entries_are_point_seven() {
        let m = head_tilt();
        // row 1 is (0, 0.7, -0.7), row 2 is (0, 0.7, 0.7)
        assert!((m[1][1] - 0.7).abs() < 1e-6);
        assert!((m[2][1] + 0.7).abs() < 1e-6);
        assert!((m[1][2] - 0.7).abs() < 1e-6);
        assert!((m[2][2] - 0.7).abs() < 1e-6);
        assert_eq!(m[0][0], 1.0);
    }

    #[test]
    fn wing_frames_mirror_each_other() {
        let p = cgmath::Point3::new(0.1, 0.2, 0.0);
        let left = mirrored_wing_frame(Side::Left).transform_point(p);
        let right = mirrored_wing_frame(Side::Right).transform_point(p);
        assert!((left.x - 0.2).abs() < 1e-6 && (left.y + 0.1).abs() < 1e-6);
        assert!((right.x + 0.2).abs() < 1e-6 && (right.y - 0.1).abs() < 1e-6);
        assert_eq!(left.z, right.z);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let transform = Transform {
            translation: Vector3::new(3.0, 0.0, 0.0),
            rotation: rotation(Vector3::unit_z(), 0.4),
            scale: Vector3::new(0.5, 2.0, 1.0),
        };
        // a surface spanned by the two tangents keeps the transformed normal perpendicular
        let tangent_u = Vector3::new(1.0, 1.0, 0.0);
        let tangent_v = Vector3::new(0.0, 1.0, 1.0);
        let normal = tangent_u.cross(tangent_v);
        let linear = Matrix3::from(transform.rotation) * Matrix3::from_diagonal(transform.scale);
        let world_normal = transform.normal_matrix() * normal;
        assert!(world_normal.dot(linear * tangent_u).abs() < 1e-5);
        assert!(world_normal.dot(linear * tangent_v).abs() < 1e-5);

        let raw = transform.to_raw();
        let stored: Matrix3<f32> = raw.normal.into();
        assert_eq!(stored, transform.normal_matrix());
    }

    #[test]
    fn normal_matrix_is_the_rotation_for_uniform_or_flat_scale() {
        let mut transform = Transform::from_axis_angle(Vector3::unit_x(), 0.9);
        let normal = transform.normal_matrix();
        let rotation = Matrix3::from(transform.rotation);
        for col in 0..3 {
            assert!((normal[col] - rotation[col]).magnitude() < 1e-6);
        }
        transform.scale = Vector3::new(1.0, 0.0, 1.0);
        assert_eq!(transform.normal_matrix(), Matrix3::from(transform.rotation));
    }

    #[test]
    fn instance_layout_matches_the_struct() {
        let layout = InstanceRaw::desc();
        assert_eq!(layout.array_stride as usize, std::mem::size_of::<InstanceRaw>());
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
        let offsets: Vec<_> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 16, 32, 48, 64, 76, 88, 100]);
        let locations: Vec<_> = layout.attributes.iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, (5..=12).collect::<Vec<_>>());
        assert_eq!(
            layout.attributes.last().map(|a| a.offset + a.format.size()),
            Some(layout.array_stride)
        );
    }

    #[test]
    fn raw_instance_flags_mirrored_scale() {
        let mut transform = Transform::new();
        assert_eq!(transform.to_raw().handedness, 1.0);
        transform.scale = Vector3::new(-1.0, 1.0, 1.0);
        assert_eq!(transform.to_raw().handedness, -1.0);
    }
}
