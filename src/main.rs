use gt_odometry::global_cast::{Matrix4f, Matrix6d};
use gt_odometry::save::TrajectorySave;
use gt_odometry::{GroundTruthOdometry, OdometryTrait};

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_nanos()
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        anyhow::bail!("usage: gt-odometry <trajectory.txt> [out.json]");
    };
    log::info!("path: {:?}", path);

    let mut odometry = GroundTruthOdometry::try_new(&path)?;
    let timestamps: Vec<u64> = odometry.timestamps().collect();
    for timestamp in timestamps {
        let pose = odometry.get_transformation(timestamp);
        log::debug!("t = {}{}", timestamp, Matrix4f(pose));
    }
    log::info!(
        "queried {} poses, last utime {}",
        odometry.len(),
        odometry.last_utime()
    );
    log::info!("covariance: {}", Matrix6d(odometry.get_covariance()));

    if let Some(out) = args.next() {
        TrajectorySave::from(&odometry).write_json(out)?;
    }
    Ok(())
}
