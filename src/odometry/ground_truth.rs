use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use nalgebra::{Matrix4, Matrix6, Vector6};

use super::OdometryTrait;
use crate::config::{ROTATION_VARIANCE, TRANSLATION_VARIANCE};
use crate::global_types::{Isometry3f, TimestampedPose};
use crate::utility::Utility;

/// 真值轨迹里程计
///
/// 构造时一次性读入整个轨迹文件，之后只读。
/// 查询只做精确匹配，不插值。
#[derive(Debug, Default)]
pub struct GroundTruthOdometry {
    /// 时间戳（已乘以 [crate::config::UTIME_SCALE]）到位姿的映射
    camera_trajectory: BTreeMap<u64, Isometry3f>,
    /// 最近一次查询的时间戳，无论是否命中
    last_utime: u64,
}

impl GroundTruthOdometry {
    /// 读取轨迹文件
    ///
    /// 文件打不开时得到空轨迹，之后的查询全部未命中。
    ///
    /// # Panics
    /// 除末尾空行外，任何一行不是 8 个字段都会 panic。
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match File::open(path) {
            Ok(file) => Self::from_reader(BufReader::new(file)),
            Err(e) => {
                log::warn!("cannot open trajectory {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// 与 [Self::new] 相同，但文件打不开或格式错误时返回错误
    pub fn try_new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("open trajectory {:?}", path))?;
        Self::try_from_reader(BufReader::new(file))
            .with_context(|| format!("load trajectory {:?}", path))
    }

    /// # Panics
    /// 格式错误或无法读取（如非 UTF-8）的行会 panic。
    pub fn from_reader<R: BufRead>(reader: R) -> Self {
        let mut odometry = Self::default();
        let mut lines = reader.lines().enumerate().peekable();
        while let Some((i, line)) = lines.next() {
            let line = match line {
                Ok(line) => line,
                Err(e) => panic!("malformed trajectory line {}: {}", i + 1, e),
            };
            if lines.peek().is_none() && line.trim().is_empty() {
                break;
            }
            match Utility::parse_trajectory_line(&line) {
                Ok(pose) => odometry.insert(pose),
                Err(e) => panic!("malformed trajectory line {}: {:#}", i + 1, e),
            }
        }
        odometry.log_loaded();
        odometry
    }

    /// 读取失败或格式错误的行返回错误，错误信息带行号
    pub fn try_from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut odometry = Self::default();
        let mut lines = reader.lines().enumerate().peekable();
        while let Some((i, line)) = lines.next() {
            let line = line.with_context(|| format!("malformed trajectory line {}", i + 1))?;
            if lines.peek().is_none() && line.trim().is_empty() {
                break;
            }
            let pose = Utility::parse_trajectory_line(&line)
                .with_context(|| format!("malformed trajectory line {}", i + 1))?;
            odometry.insert(pose);
        }
        odometry.log_loaded();
        Ok(odometry)
    }

    fn insert(&mut self, pose: TimestampedPose) {
        if self
            .camera_trajectory
            .insert(pose.timestamp, pose.pose)
            .is_some()
        {
            log::debug!("duplicate timestamp {}, keeping the later pose", pose.timestamp);
        }
    }

    fn log_loaded(&self) {
        match (self.first_utime(), self.last_utime_in_table()) {
            (Some(first), Some(last)) => log::info!(
                "loaded {} poses, timestamps [{}, {}]",
                self.len(),
                first,
                last
            ),
            _ => log::info!("loaded empty trajectory"),
        }
    }

    /// 精确查询位姿，未命中返回 `None`
    ///
    /// 同时更新 [Self::last_utime]。
    pub fn query_pose(&mut self, timestamp: u64) -> Option<Isometry3f> {
        self.last_utime = timestamp;
        self.camera_trajectory.get(&timestamp).copied()
    }

    /// 最近一次查询的时间戳
    pub fn last_utime(&self) -> u64 {
        self.last_utime
    }

    pub fn len(&self) -> usize {
        self.camera_trajectory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.camera_trajectory.is_empty()
    }

    /// 按时间戳升序
    pub fn timestamps(&self) -> impl Iterator<Item = u64> + '_ {
        self.camera_trajectory.keys().copied()
    }

    /// 按时间戳升序
    pub fn iter(&self) -> impl Iterator<Item = TimestampedPose> + '_ {
        self.camera_trajectory
            .iter()
            .map(|(&timestamp, &pose)| TimestampedPose::new(timestamp, pose))
    }

    pub fn first_utime(&self) -> Option<u64> {
        self.camera_trajectory.keys().next().copied()
    }

    pub fn last_utime_in_table(&self) -> Option<u64> {
        self.camera_trajectory.keys().next_back().copied()
    }
}

impl OdometryTrait for GroundTruthOdometry {
    /// 未命中时返回单位阵
    fn get_transformation(&mut self, timestamp: u64) -> Matrix4<f32> {
        self.query_pose(timestamp)
            .map(|pose| pose.to_homogeneous())
            .unwrap_or_else(Matrix4::identity)
    }

    fn get_covariance(&self) -> Matrix6<f64> {
        Matrix6::from_diagonal(&Vector6::new(
            TRANSLATION_VARIANCE,
            TRANSLATION_VARIANCE,
            TRANSLATION_VARIANCE,
            ROTATION_VARIANCE,
            ROTATION_VARIANCE,
            ROTATION_VARIANCE,
        ))
    }
}
