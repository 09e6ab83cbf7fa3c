use slicesim_core::bucket::{Bucket, Tick};
use slicesim_testutils::bucket::TraceBucket;

#[test]
fn hooks_track_the_current_tick() {
    let mut bucket = TraceBucket::default();
    bucket.initialize(Tick(0));
    assert!(bucket.initialized);
    assert_eq!(bucket.now, Tick(0));

    bucket.before_agents(Tick(1));
    bucket.after_agents();
    bucket.before_agents(Tick(2));
    assert_eq!(bucket.now, Tick(2));
    assert_eq!(bucket.completed_ticks, 1);
}
