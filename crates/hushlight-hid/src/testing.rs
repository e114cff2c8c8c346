//! In-memory device doubles shared by the unit tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::device::{DeviceId, DeviceIo, HidBackend};
use crate::error::{HidError, HidResult};
use crate::observer::DeviceObserver;
use crate::report::{INPUT_REPORT_LEN, TOUCH_OFFSET};

/// Build an input report carrying `value` in the touch byte.
pub fn touch_report(value: u8) -> Vec<u8> {
    let mut report = vec![0u8; INPUT_REPORT_LEN];
    report[TOUCH_OFFSET] = value;
    report
}

/// Poll `condition` for up to two seconds.
pub fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    condition()
}

#[derive(Default)]
pub struct FakeDevice {
    writes: Mutex<Vec<Vec<u8>>>,
    reports: Mutex<VecDeque<HidResult<Vec<u8>>>>,
    fail_writes: AtomicBool,
}

impl FakeDevice {
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().clone()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn push_report(&self, report: Vec<u8>) {
        self.reports.lock().push_back(Ok(report));
    }

    pub fn fail_next_read(&self) {
        self.reports.lock().push_back(Err(HidError::ReadFailed("unplugged".to_string())));
    }

    pub fn pending_reports(&self) -> usize {
        self.reports.lock().len()
    }
}

impl DeviceIo for FakeDevice {
    fn write_report(&self, report: &[u8]) -> HidResult<usize> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(HidError::WriteFailed("broken pipe".to_string()));
        }
        self.writes.lock().push(report.to_vec());
        Ok(report.len())
    }

    fn read_report(&self, buf: &mut [u8], timeout: Duration) -> HidResult<usize> {
        let next = self.reports.lock().pop_front();
        match next {
            Some(Ok(report)) => {
                let n = report.len().min(buf.len());
                buf[..n].copy_from_slice(&report[..n]);
                Ok(n)
            }
            Some(Err(e)) => Err(e),
            None => {
                std::thread::sleep(timeout.min(Duration::from_millis(2)));
                Ok(0)
            }
        }
    }
}

pub struct FakeBackend {
    present: AtomicBool,
    open_fails: AtomicBool,
    opens: AtomicUsize,
    device: Arc<FakeDevice>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            present: AtomicBool::new(true),
            open_fails: AtomicBool::new(false),
            opens: AtomicUsize::new(0),
            device: Arc::new(FakeDevice::default()),
        }
    }

    pub fn set_present(&self, present: bool) {
        self.present.store(present, Ordering::SeqCst);
    }

    pub fn set_open_fails(&self, fails: bool) {
        self.open_fails.store(fails, Ordering::SeqCst);
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn device(&self) -> Arc<FakeDevice> {
        Arc::clone(&self.device)
    }
}

impl HidBackend for FakeBackend {
    fn is_present(&self, _id: DeviceId) -> HidResult<bool> {
        Ok(self.present.load(Ordering::SeqCst))
    }

    fn open(&self, _id: DeviceId) -> HidResult<Arc<dyn DeviceIo>> {
        if self.open_fails.load(Ordering::SeqCst) {
            return Err(HidError::OpenFailed("permission denied".to_string()));
        }
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::clone(&self.device) as Arc<dyn DeviceIo>)
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    states: Mutex<Vec<(String, String)>>,
    connections: Mutex<Vec<bool>>,
}

impl RecordingObserver {
    pub fn states(&self) -> Vec<(String, String)> {
        self.states.lock().clone()
    }

    pub fn connections(&self) -> Vec<bool> {
        self.connections.lock().clone()
    }
}

impl DeviceObserver for RecordingObserver {
    fn state_update(&self, key: &str, value: &str) {
        self.states.lock().push((key.to_string(), value.to_string()));
    }

    fn connection_changed(&self, connected: bool) {
        self.connections.lock().push(connected);
    }
}
