use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use domain::SerialDevice;

type LockMap = DashMap<String, Arc<Mutex<()>>>;

/// One exclusive holder per device path.
///
/// Transactions on the same device queue behind each other; different
/// devices never contend. An entry lives only while someone holds or waits
/// for it.
#[derive(Clone, Default)]
pub struct DeviceLocks {
    locks: Arc<LockMap>,
}

impl DeviceLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, device: &SerialDevice) -> DeviceGuard {
        let key = device.as_str().to_string();
        // Clone the Arc out so no map shard stays locked across the await
        let lock = Arc::clone(&self.locks.entry(key.clone()).or_default());
        let guard = lock.lock_owned().await;

        DeviceGuard {
            guard: Some(guard),
            locks: Arc::clone(&self.locks),
            key,
        }
    }

    #[cfg(test)]
    fn tracked_devices(&self) -> usize {
        self.locks.len()
    }
}

/// Exclusive ownership of one device until dropped
pub struct DeviceGuard {
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<LockMap>,
    key: String,
}

impl Drop for DeviceGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map still refers to the mutex: nobody holds or waits for it.
        // Waiters clone the Arc under the shard lock, so they keep the entry alive.
        self.locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn device(path: &str) -> SerialDevice {
        SerialDevice::new(path).unwrap()
    }

    #[tokio::test]
    async fn test_same_device_is_exclusive() {
        let locks = DeviceLocks::new();
        let _held = locks.acquire(&device("/dev/ttyUSB0")).await;

        let contender_device = device("/dev/ttyUSB0");
        let contender = locks.acquire(&contender_device);
        let attempt = tokio::time::timeout(Duration::from_millis(50), contender).await;
        assert!(attempt.is_err(), "second holder must wait");
    }

    #[tokio::test]
    async fn test_different_devices_do_not_contend() {
        let locks = DeviceLocks::new();
        let _a = locks.acquire(&device("/dev/ttyUSB0")).await;
        let b = tokio::time::timeout(Duration::from_millis(50), locks.acquire(&device("/dev/ttyUSB1"))).await;
        assert!(b.is_ok());
        assert_eq!(locks.tracked_devices(), 2);
    }

    #[tokio::test]
    async fn test_released_lock_can_be_reacquired() {
        let locks = DeviceLocks::new();
        drop(locks.acquire(&device("COM3")).await);
        let again = tokio::time::timeout(Duration::from_millis(50), locks.acquire(&device("COM3"))).await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn test_released_devices_are_forgotten() {
        let locks = DeviceLocks::new();
        for n in 0..5 {
            let guard = locks.acquire(&device(&format!("/dev/ttyUSB{}", n))).await;
            assert_eq!(locks.tracked_devices(), 1);
            drop(guard);
        }
        assert_eq!(locks.tracked_devices(), 0);
    }

    #[tokio::test]
    async fn test_waiter_keeps_entry_until_it_releases() {
        let locks = DeviceLocks::new();
        let first = locks.acquire(&device("/dev/ttyUSB0")).await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _second = locks.acquire(&device("/dev/ttyUSB0")).await;
                tokio::time::sleep(Duration::from_millis(20)).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(first);
        assert_eq!(locks.tracked_devices(), 1, "waiter still refers to the lock");

        waiter.await.unwrap();
        assert_eq!(locks.tracked_devices(), 0);
    }

    #[tokio::test]
    async fn test_exclusion_holds_across_eviction() {
        let locks = DeviceLocks::new();
        drop(locks.acquire(&device("/dev/ttyACM0")).await);
        assert_eq!(locks.tracked_devices(), 0);

        let _held = locks.acquire(&device("/dev/ttyACM0")).await;
        let contender_device = device("/dev/ttyACM0");
        let contender = locks.acquire(&contender_device);
        let attempt = tokio::time::timeout(Duration::from_millis(50), contender).await;
        assert!(attempt.is_err());
    }
}
