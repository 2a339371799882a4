use anyhow::{bail, Result};
use nalgebra::{Quaternion, Translation3, UnitQuaternion, Vector3};

use crate::config::{TRAJECTORY_FIELDS, UTIME_SCALE};
use crate::global_types::{Isometry3f, TimestampedPose};

pub struct Utility {}

impl Utility {
    /// 先平移后旋转：`p -> q * p + t`，平移量不被旋转
    ///
    /// 零四元数无法归一化，按单位旋转处理。
    #[inline]
    pub fn pretranslate_rotate(t: Vector3<f32>, q: Quaternion<f32>) -> Isometry3f {
        let rotation = UnitQuaternion::try_new(q, 0.0).unwrap_or_else(UnitQuaternion::identity);
        Isometry3f::from_parts(Translation3::from(t), rotation)
    }

    /// 解析一行 `utime x y z qx qy qz qw`
    ///
    /// 按顺序逐个解析字段，遇到第一个失败即停止计数。
    /// 字段数不是 8 时返回错误，错误信息中带有成功解析的字段数。
    pub fn parse_trajectory_line(line: &str) -> Result<TimestampedPose> {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let mut values = [0f32; TRAJECTORY_FIELDS - 1];
        let (utime, parsed) = match tokens.first().and_then(|s| s.parse::<u64>().ok()) {
            Some(utime) => {
                let floats = values
                    .iter_mut()
                    .zip(tokens.iter().skip(1))
                    .map_while(|(value, token)| token.parse::<f32>().ok().map(|v| *value = v))
                    .count();
                (utime, 1 + floats)
            }
            None => (0, 0),
        };

        if parsed != TRAJECTORY_FIELDS || tokens.len() != TRAJECTORY_FIELDS {
            bail!(
                "expected {} fields, parsed {} of {} tokens",
                TRAJECTORY_FIELDS,
                parsed,
                tokens.len()
            );
        }
        let Some(timestamp) = utime.checked_mul(UTIME_SCALE) else {
            bail!("utime {} overflows when scaled by {}", utime, UTIME_SCALE);
        };

        let [x, y, z, qx, qy, qz, qw] = values;
        let pose = Self::pretranslate_rotate(
            Vector3::new(x, y, z),
            Quaternion::new(qw, qx, qy, qz),
        );
        Ok(TimestampedPose::new(timestamp, pose))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identity_line() {
        let pose = Utility::parse_trajectory_line("1000 0 0 0 0 0 0 1").unwrap();
        assert_eq!(pose.timestamp, 1000 * UTIME_SCALE);
        assert_eq!(pose.pose.to_homogeneous(), nalgebra::Matrix4::identity());
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        let pose = Utility::parse_trajectory_line("  7\t1.5  2 3 0 0 0 1 ").unwrap();
        assert_eq!(pose.utime(), 7);
        assert_eq!(pose.pose.translation.vector, Vector3::new(1.5, 2.0, 3.0));
    }

    #[test]
    fn test_parse_counts_fields() {
        let err = Utility::parse_trajectory_line("1000 0 0 0 0 0 1").unwrap_err();
        assert!(err.to_string().contains("parsed 7 of 7"), "{}", err);

        let err = Utility::parse_trajectory_line("1000 0 0 abc 0 0 0 1").unwrap_err();
        assert!(err.to_string().contains("parsed 3 of 8"), "{}", err);

        let err = Utility::parse_trajectory_line("-5 0 0 0 0 0 0 1").unwrap_err();
        assert!(err.to_string().contains("parsed 0 of 8"), "{}", err);

        assert!(Utility::parse_trajectory_line("1 0 0 0 0 0 0 1 9").is_err());
        assert!(Utility::parse_trajectory_line("").is_err());
    }

    #[test]
    fn test_parse_scale_overflow() {
        let line = format!("{} 0 0 0 0 0 0 1", u64::MAX);
        assert!(Utility::parse_trajectory_line(&line).is_err());
    }

    #[test]
    fn test_pretranslate_rotate() {
        let h = std::f32::consts::FRAC_1_SQRT_2;
        let iso = Utility::pretranslate_rotate(
            Vector3::new(1.0, 0.0, 0.0),
            Quaternion::new(h, 0.0, 0.0, h),
        );
        assert_eq!(iso.translation.vector, Vector3::new(1.0, 0.0, 0.0));
        // x 轴旋转到 y 轴后再平移
        let p = iso.transform_point(&nalgebra::Point3::new(1.0, 0.0, 0.0));
        assert!((p.coords - Vector3::new(1.0, 1.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_pretranslate_rotate_zero_quaternion() {
        let iso = Utility::pretranslate_rotate(
            Vector3::new(1.0, 2.0, 3.0),
            Quaternion::new(0.0, 0.0, 0.0, 0.0),
        );
        assert_eq!(iso.rotation, UnitQuaternion::identity());
        assert!(iso.to_homogeneous().iter().all(|v| v.is_finite()));
    }
}
