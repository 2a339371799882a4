use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::UTIME_SCALE;
use crate::global_cast::PoseParts;
use crate::global_types::TimestampedPose;
use crate::odometry::GroundTruthOdometry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseSave {
    pub timestamp: u64,
    /// x, y, z
    pub translation: [f32; 3],
    /// qx, qy, qz, qw
    pub rotation: [f32; 4],
}

impl From<TimestampedPose> for PoseSave {
    fn from(pose: TimestampedPose) -> Self {
        let parts = PoseParts::from(&pose.pose);
        Self {
            timestamp: pose.timestamp,
            translation: parts.translation,
            rotation: parts.rotation,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TrajectorySave {
    pub utime_scale: u64,
    pub poses: Vec<PoseSave>,
}

impl From<&GroundTruthOdometry> for TrajectorySave {
    fn from(odometry: &GroundTruthOdometry) -> Self {
        Self {
            utime_scale: UTIME_SCALE,
            poses: odometry.iter().map(PoseSave::from).collect(),
        }
    }
}

impl TrajectorySave {
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).with_context(|| format!("create {:?}", path))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        log::info!("saved {} poses to {:?}", self.poses.len(), path);
        Ok(())
    }

    /// 写回 `utime x y z qx qy qz qw` 格式，时间戳除以 [UTIME_SCALE]
    ///
    /// `utime_scale` 与 [UTIME_SCALE] 不一致时返回错误，否则写出的文件无法读回相同的键。
    pub fn write_log(&self, path: impl AsRef<Path>) -> Result<()> {
        if self.utime_scale != UTIME_SCALE {
            bail!(
                "utime_scale {} does not match {}",
                self.utime_scale,
                UTIME_SCALE
            );
        }
        let path = path.as_ref();
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .from_path(path)
            .with_context(|| format!("create {:?}", path))?;
        for pose in &self.poses {
            let [x, y, z] = pose.translation;
            let [qx, qy, qz, qw] = pose.rotation;
            writer.serialize((pose.timestamp / UTIME_SCALE, x, y, z, qx, qy, qz, qw))?;
        }
        writer.flush()?;
        log::info!("saved {} poses to {:?}", self.poses.len(), path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odometry::OdometryTrait;
    use std::io::Cursor;

    const LOG: &str = "1 1 2 3 0 0 0.7071 0.7071\n2 -4.5 0.25 6 0.1 0.2 0.3 0.9\n";

    #[test]
    fn test_write_log_reload() {
        let mut odometry = GroundTruthOdometry::from_reader(Cursor::new(LOG));
        let save = TrajectorySave::from(&odometry);
        assert_eq!(save.poses.len(), 2);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trajectory.txt");
        save.write_log(&path).unwrap();

        let mut reloaded = GroundTruthOdometry::try_new(&path).unwrap();
        assert_eq!(
            reloaded.timestamps().collect::<Vec<_>>(),
            odometry.timestamps().collect::<Vec<_>>()
        );
        for timestamp in [UTIME_SCALE, 2 * UTIME_SCALE] {
            let a = odometry.get_transformation(timestamp);
            let b = reloaded.get_transformation(timestamp);
            assert!((a - b).amax() < 1e-6, "{} != {}", a, b);
        }
    }

    #[test]
    fn test_write_log_rejects_scale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trajectory.txt");
        for utime_scale in [0, 1000] {
            let save = TrajectorySave {
                utime_scale,
                poses: vec![PoseSave {
                    timestamp: UTIME_SCALE,
                    translation: [0.0; 3],
                    rotation: [0.0, 0.0, 0.0, 1.0],
                }],
            };
            let err = save.write_log(&path).unwrap_err();
            assert!(err.to_string().contains("does not match"), "{}", err);
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_write_json() {
        let odometry = GroundTruthOdometry::from_reader(Cursor::new(LOG));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trajectory.json");
        TrajectorySave::from(&odometry).write_json(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let save: TrajectorySave = serde_json::from_str(&text).unwrap();
        assert_eq!(save.utime_scale, UTIME_SCALE);
        assert_eq!(save.poses[0].timestamp, UTIME_SCALE);
        assert_eq!(save.poses[0].translation, [1.0, 2.0, 3.0]);
        assert_eq!(save.poses[1].translation, [-4.5, 0.25, 6.0]);
    }
}
