use seq_sort::{
    BBox, ConstantVelocityPredictor, Detection, FrameGeometry, SortTracker, TrackerConfig,
};

fn main() -> seq_sort::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let geometry = FrameGeometry::new(768.0, 576.0, 7.0, 1920.0, 1080.0, 30.0)?;
    let mut sort = SortTracker::new(TrackerConfig::default(), geometry, ConstantVelocityPredictor)?;

    // one pedestrian walking right, one standing still that leaves after frame 4
    for frame in 0..8 {
        let x = 100.0 + 6.0 * frame as f64;
        let mut detections = vec![Detection::new(BBox::new(x, 200.0, x + 40.0, 300.0), 0.9)];
        if frame < 4 {
            detections.push(Detection::new(BBox::new(500.0, 150.0, 540.0, 260.0), 0.8));
        }

        let tracks = sort.update(&detections);
        log::info!(
            "frame {}: number of tracks {}, Tracks: {:?}",
            frame + 1,
            tracks.len(),
            tracks.iter().map(|t| t.to_array()).collect::<Vec<_>>()
        );
    }

    Ok(())
}
