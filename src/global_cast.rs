//! 全局类型转换
//!
//! nalgebra 类型与普通数组之间的转换，以及打印用的包装类型

use nalgebra::{Matrix4, Matrix6, Quaternion, Vector3};
use std::fmt::Display;

use crate::global_types::Isometry3f;

/// 4x4 齐次矩阵，按行打印
#[derive(Debug, Clone, Copy)]
pub struct Matrix4f(pub Matrix4<f32>);

impl Display for Matrix4f {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        for row in self.0.row_iter() {
            for v in row.iter() {
                write!(f, "{:>12.6}, ", v)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl From<Isometry3f> for Matrix4f {
    fn from(isometry: Isometry3f) -> Self {
        Matrix4f(isometry.to_homogeneous())
    }
}

/// 转换为行优先数组
impl From<Matrix4f> for [[f32; 4]; 4] {
    fn from(matrix: Matrix4f) -> Self {
        let mut rows = [[0.0; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = matrix.0[(i, j)];
            }
        }
        rows
    }
}

/// 6x6 协方差矩阵，打印对角线
#[derive(Debug, Clone, Copy)]
pub struct Matrix6d(pub Matrix6<f64>);

impl Display for Matrix6d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "diag{}", self.0.diagonal().transpose())
    }
}

/// 平移 `[x, y, z]` 和四元数 `[qx, qy, qz, qw]`，与轨迹文件顺序一致
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseParts {
    pub translation: [f32; 3],
    pub rotation: [f32; 4],
}

impl From<&Isometry3f> for PoseParts {
    fn from(isometry: &Isometry3f) -> Self {
        let t = isometry.translation.vector;
        let q = isometry.rotation.quaternion();
        Self {
            translation: [t.x, t.y, t.z],
            rotation: [q.i, q.j, q.k, q.w],
        }
    }
}

impl From<PoseParts> for Isometry3f {
    fn from(parts: PoseParts) -> Self {
        let [x, y, z] = parts.translation;
        let [qx, qy, qz, qw] = parts.rotation;
        crate::utility::Utility::pretranslate_rotate(
            Vector3::new(x, y, z),
            Quaternion::new(qw, qx, qy, qz),
        )
    }
}

#[test]
fn test_matrix4_to_rows() {
    let isometry = Isometry3f::translation(1.0, 2.0, 3.0);
    let rows: [[f32; 4]; 4] = Matrix4f::from(isometry).into();
    assert_eq!(rows[0], [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(rows[1], [0.0, 1.0, 0.0, 2.0]);
    assert_eq!(rows[2], [0.0, 0.0, 1.0, 3.0]);
    assert_eq!(rows[3], [0.0, 0.0, 0.0, 1.0]);
    println!("matrix: {}", Matrix4f::from(isometry));
}

#[test]
fn test_pose_parts() {
    let h = std::f32::consts::FRAC_1_SQRT_2;
    let parts = PoseParts {
        translation: [1.0, 0.0, 0.0],
        rotation: [0.0, 0.0, h, h],
    };
    let isometry = Isometry3f::from(parts);
    let back = PoseParts::from(&isometry);
    assert_eq!(back.translation, parts.translation);
    for (a, b) in back.rotation.iter().zip(parts.rotation.iter()) {
        assert!((a - b).abs() < 1e-6);
    }
}
