//! Test-time engine: per-device time, total run time and throughput

use serde::Serialize;

use crate::core::collection::Collection;
use crate::core::error::Result;
use crate::core::identity::EntityId;
use crate::core::store::SharedStore;
use crate::entities::test_profile::TestProfile;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Sum of step durations, in seconds
pub fn total_step_time(profile: &TestProfile) -> f64 {
    profile.test_steps.iter().map(|s| s.duration).sum()
}

/// Seconds to test one device
pub fn time_per_device(profile: &TestProfile) -> f64 {
    total_step_time(profile)
}

/// Seconds to test `devices` devices serially
pub fn total_test_time(devices: u64, time_per_device: f64) -> f64 {
    devices as f64 * time_per_device
}

pub fn total_test_time_for_profile(devices: u64, profile: &TestProfile) -> f64 {
    total_test_time(devices, time_per_device(profile))
}

/// Devices per hour; 0 when `total_time <= 0`
pub fn throughput(devices: u64, total_time: f64) -> f64 {
    if total_time <= 0.0 {
        return 0.0;
    }
    devices as f64 / (total_time / SECONDS_PER_HOUR)
}

/// Wall time with `slots` sites in parallel; `slots <= 0` leaves it unchanged
pub fn time_with_parallel(total_time: f64, slots: i64) -> f64 {
    if slots <= 0 {
        return total_time;
    }
    total_time / slots as f64
}

pub fn throughput_with_parallel(devices: u64, total_time: f64, slots: i64) -> f64 {
    throughput(devices, time_with_parallel(total_time, slots))
}

/// Everything the test-time screen shows for one profile and lot size
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestTimeEstimate {
    pub devices: u64,
    pub slots: i64,
    pub time_per_device: f64,
    pub total_test_time: f64,
    pub parallel_time: f64,
    pub throughput: f64,
    pub parallel_throughput: f64,
}

impl TestTimeEstimate {
    pub fn compute(profile: &TestProfile, devices: u64, slots: i64) -> Self {
        let per_device = time_per_device(profile);
        let total = total_test_time(devices, per_device);
        Self {
            devices,
            slots,
            time_per_device: per_device,
            total_test_time: total,
            parallel_time: time_with_parallel(total, slots),
            throughput: throughput(devices, total),
            parallel_throughput: throughput_with_parallel(devices, total, slots),
        }
    }
}

/// Owner of the stored test profiles
pub struct TestTimeEngine {
    profiles: Collection<TestProfile>,
}

impl TestTimeEngine {
    pub fn open(store: SharedStore) -> Self {
        Self {
            profiles: Collection::load(store),
        }
    }

    pub fn profiles(&self) -> &[TestProfile] {
        self.profiles.items()
    }

    pub fn profile(&self, id: &EntityId) -> Option<&TestProfile> {
        self.profiles.get(id)
    }

    pub fn add_profile(&mut self, profile: TestProfile) -> Result<EntityId> {
        profile.validate()?;
        let id = profile.id;
        self.profiles.add(profile)?;
        Ok(id)
    }

    pub fn update_profile(&mut self, profile: TestProfile) -> Result<()> {
        profile.validate()?;
        self.profiles.update(profile)
    }

    pub fn delete_profile(&mut self, index: usize) -> Result<TestProfile> {
        self.profiles.delete_at(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{ToolkitError, ValidationError};
    use crate::core::store::MemoryStore;
    use crate::entities::test_profile::TestStep;

    fn profile() -> TestProfile {
        TestProfile::new(
            "FT1",
            vec![
                TestStep::new("continuity", 2.0).unwrap(),
                TestStep::new("functional", 3.0).unwrap(),
                TestStep::new("parametric", 5.0).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_estimate_scenario() {
        let est = TestTimeEstimate::compute(&profile(), 100, 2);
        assert!((est.time_per_device - 10.0).abs() < 1e-12);
        assert!((est.total_test_time - 1000.0).abs() < 1e-9);
        assert!((est.parallel_time - 500.0).abs() < 1e-9);
        assert!((est.parallel_throughput - 720.0).abs() < 1e-9);
        assert!((est.throughput - 360.0).abs() < 1e-9);
        assert!((total_test_time_for_profile(100, &profile()) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_guards() {
        assert_eq!(throughput(100, 0.0), 0.0);
        assert_eq!(throughput(100, -5.0), 0.0);
        assert_eq!(time_with_parallel(1000.0, 0), 1000.0);
        assert_eq!(time_with_parallel(1000.0, -3), 1000.0);
        assert!((throughput_with_parallel(100, 1000.0, 0) - 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_devices() {
        let est = TestTimeEstimate::compute(&profile(), 0, 4);
        assert_eq!(est.total_test_time, 0.0);
        assert_eq!(est.throughput, 0.0);
        assert_eq!(est.parallel_throughput, 0.0);
    }

    #[test]
    fn test_profile_crud() {
        let store = MemoryStore::shared();
        let mut engine = TestTimeEngine::open(store.clone());
        let id = engine.add_profile(profile()).unwrap();

        let mut edited = engine.profile(&id).unwrap().clone();
        edited.test_steps.pop();
        engine.update_profile(edited.clone()).unwrap();

        edited.test_steps.clear();
        assert!(engine.update_profile(edited).is_err());

        let reloaded = TestTimeEngine::open(store);
        let p = reloaded.profile(&id).unwrap();
        assert!((total_step_time(p) - 5.0).abs() < 1e-12);

        let mut engine = reloaded;
        engine.delete_profile(0).unwrap();
        assert!(engine.profiles().is_empty());
    }

    #[test]
    fn test_update_profile_keeps_invariants() {
        let mut engine = TestTimeEngine::open(MemoryStore::shared());
        let id = engine.add_profile(profile()).unwrap();
        let original = engine.profile(&id).unwrap().clone();

        let mut unnamed = original.clone();
        unnamed.name = String::new();
        assert!(matches!(
            engine.update_profile(unnamed),
            Err(ToolkitError::Validation(ValidationError::Empty { .. }))
        ));

        let mut negative = original.clone();
        negative.test_steps[0].duration = -10.0;
        assert!(matches!(
            engine.update_profile(negative),
            Err(ToolkitError::Validation(ValidationError::Negative { .. }))
        ));

        let mut endless = original.clone();
        endless.test_steps[1].duration = f64::INFINITY;
        assert!(engine.update_profile(endless).is_err());

        assert_eq!(engine.profile(&id).unwrap(), &original);
        assert!((total_step_time(&original) - 10.0).abs() < 1e-12);
    }
}
