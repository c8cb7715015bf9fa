//! Simulated training thread
//!
//! Stands in for the real optimizer at the same interface boundary: a
//! background thread that mutates the shared cloud under its mutex. Each
//! step jitters existing positions and occasionally densifies; critical
//! sections stay short so the render thread is never starved.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use splat_core::splat::Splat;
use splat_core::{SharedCloud, with_cloud_mut};

const STEP_INTERVAL: Duration = Duration::from_millis(5);
const JITTER_SCALE: f32 = 0.002;
const DENSIFY_CHANCE: f64 = 0.05;
const DENSIFY_BATCH: usize = 8;

pub struct Trainer {
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl Trainer {
    /// Spawn the training thread. It runs until `stop` is called or the
    /// trainer is dropped.
    pub fn spawn(cloud: SharedCloud, max_splats: usize) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();

        let handle = thread::spawn(move || {
            log::info!("Trainer started, max {} splats", max_splats);
            let mut rng = StdRng::from_entropy();

            while !thread_stop.load(Ordering::Relaxed) {
                train_step(&cloud, &mut rng, max_splats);
                thread::sleep(STEP_INTERVAL);
            }
            log::info!("Trainer stopped");
        });

        Self {
            handle: Some(handle),
            stop,
        }
    }

    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Trainer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One optimization step. The lock is held only for this mutation.
fn train_step(cloud: &SharedCloud, rng: &mut StdRng, max_splats: usize) {
    let jitter = |rng: &mut StdRng| {
        Vec3::new(
            rng.gen_range(-JITTER_SCALE..=JITTER_SCALE),
            rng.gen_range(-JITTER_SCALE..=JITTER_SCALE),
            rng.gen_range(-JITTER_SCALE..=JITTER_SCALE),
        )
    };

    let densify = rng.gen_bool(DENSIFY_CHANCE);

    with_cloud_mut(cloud, |c| {
        for splat in c.splats_mut() {
            splat.position += jitter(rng);
        }

        if densify && c.len() < max_splats {
            // Split off children near random existing splats.
            let len = c.len();
            for _ in 0..DENSIFY_BATCH.min(max_splats - c.len()) {
                let parent = if len > 0 {
                    c.splats()[rng.gen_range(0..len)]
                } else {
                    Splat::new(Vec3::ZERO, [0.8, 0.8, 0.8, 0.6], 0.05)
                };
                let mut child = parent;
                child.position += jitter(rng) * 20.0;
                c.push(child);
            }
        }
    });
}

/// Seed an initial cluster around the origin.
pub fn seed_cloud(cloud: &SharedCloud, count: usize) {
    let mut rng = StdRng::seed_from_u64(7);
    with_cloud_mut(cloud, |c| {
        for _ in 0..count {
            let position = Vec3::new(
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-0.5..=0.5),
                rng.gen_range(-1.0..=1.0),
            );
            let tint = rng.gen_range(0.4..=1.0);
            c.push(Splat::new(
                position,
                [tint, tint * 0.9, tint * 0.7, 0.7],
                rng.gen_range(0.02..=0.08),
            ));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use splat_core::splat::SplatCloud;
    use splat_core::{shared_cloud, with_cloud};

    #[test]
    fn test_seed_cloud_count() {
        let cloud = shared_cloud(SplatCloud::new());
        seed_cloud(&cloud, 100);
        assert_eq!(with_cloud(&cloud, |c| c.len()), 100);
    }

    #[test]
    fn test_train_step_moves_positions() {
        let cloud = shared_cloud(SplatCloud::new());
        seed_cloud(&cloud, 50);
        let before = with_cloud(&cloud, |c| c.positions());

        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            train_step(&cloud, &mut rng, 100);
        }

        let after = with_cloud(&cloud, |c| c.positions());
        assert!(before.iter().zip(&after).any(|(a, b)| a != b));
    }

    #[test]
    fn test_densify_respects_cap() {
        let cloud = shared_cloud(SplatCloud::new());
        seed_cloud(&cloud, 10);

        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..500 {
            train_step(&cloud, &mut rng, 32);
        }
        assert!(with_cloud(&cloud, |c| c.len()) <= 32);
    }

    #[test]
    fn test_trainer_stops_cleanly() {
        let cloud = shared_cloud(SplatCloud::new());
        seed_cloud(&cloud, 20);

        let mut trainer = Trainer::spawn(cloud.clone(), 100);
        thread::sleep(Duration::from_millis(30));
        trainer.stop();

        // Stopped: the cloud no longer changes.
        let snapshot = with_cloud(&cloud, |c| c.positions());
        thread::sleep(Duration::from_millis(20));
        assert_eq!(with_cloud(&cloud, |c| c.positions()), snapshot);
    }
}
