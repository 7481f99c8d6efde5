//! Headless playback device
//!
//! Calls the playback from its own thread at the pace a sound card would, but throws the
//! samples away.  Useful on machines without audio output and for testing.
use crate::error::DeviceStage;
use crate::{playback, Error};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::{thread, time};

#[derive(Debug, Default)]
pub struct NullDevice {
    running: Arc<AtomicBool>,
    callbacks: Arc<AtomicUsize>,
    thread: Option<thread::JoinHandle<()>>,
}

impl NullDevice {
    pub fn new() -> NullDevice {
        Default::default()
    }

    /// Handle to the number of buffers requested so far
    ///
    /// Stays valid after the device is boxed or stopped.
    pub fn callbacks(&self) -> Arc<AtomicUsize> {
        self.callbacks.clone()
    }
}

impl playback::Device for NullDevice {
    fn start(
        &mut self,
        format: playback::StreamFormat,
        mut playback: playback::Playback,
    ) -> crate::Result<()> {
        if self.thread.is_some() {
            return Err(Error::device(DeviceStage::Start, "stream is already running"));
        }
        if format.rate == 0 || format.frames_per_buffer == 0 {
            return Err(Error::device(
                DeviceStage::Open,
                format!("unusable stream format {:?}", format),
            ));
        }

        let period = time::Duration::from_secs_f64(format.frames_per_buffer as f64 / format.rate as f64);
        let mut buffer = vec![0.0; format.frames_per_buffer * format.channels];

        log::debug!("Null Playback:");
        log::debug!("    Sample Rate = {:6}", format.rate);
        log::debug!("    Buffer Size = {:6}", format.frames_per_buffer);
        log::debug!("    Period      = {:?}", period);

        self.running.store(true, Ordering::SeqCst);
        let running = self.running.clone();
        let callbacks = self.callbacks.clone();

        let handle = thread::Builder::new()
            .name("null-playback".into())
            .spawn(move || {
                let start = time::Instant::now();
                let mut buffers = 0u32;

                // Deadlines are absolute so the pace does not drift with scheduling jitter
                while running.load(Ordering::SeqCst) {
                    playback.fill(&mut buffer);
                    callbacks.fetch_add(1, Ordering::SeqCst);

                    buffers += 1;
                    let deadline = start + period * buffers;
                    let now = time::Instant::now();
                    if deadline > now {
                        thread::sleep(deadline - now);
                    }
                }
            })
            .map_err(|e| Error::device(DeviceStage::Open, e))?;

        self.thread = Some(handle);
        Ok(())
    }

    fn stop(&mut self) -> crate::Result<()> {
        self.running.store(false, Ordering::SeqCst);

        match self.thread.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| Error::device(DeviceStage::Stop, "playback thread panicked")),
            None => Ok(()),
        }
    }
}

impl Drop for NullDevice {
    fn drop(&mut self) {
        if let Err(e) = playback::Device::stop(self) {
            log::error!("{}", e);
        }
    }
}
