pub type Isometry3f = nalgebra::Isometry3<f32>;

/// 带时间戳的位姿，`timestamp` 已乘以 [crate::config::UTIME_SCALE]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimestampedPose {
    pub timestamp: u64,
    pub pose: Isometry3f,
}

impl TimestampedPose {
    pub fn new(timestamp: u64, pose: Isometry3f) -> Self {
        Self { timestamp, pose }
    }

    /// 还原为轨迹文件中的时间戳
    pub fn utime(&self) -> u64 {
        self.timestamp / crate::config::UTIME_SCALE
    }
}

#[test]
fn test_timestamped_pose_utime() {
    let pose = TimestampedPose::new(1000 * crate::config::UTIME_SCALE, Isometry3f::identity());
    assert_eq!(pose.utime(), 1000);
}
