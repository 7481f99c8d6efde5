use crate::playback::{Analysis, Device};
use std::{cell, rc, time};

type SharedInfo = rc::Rc<cell::RefCell<triple_buffer::Output<Analysis>>>;

pub struct Frame {
    pub time: f32,
    pub frame: usize,
    info: SharedInfo,
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Frame {{ time: {:?}, frame: {:?} }}", self.time, self.frame)
    }
}

impl Frame {
    /// Access the latest analysis published by the audio callback
    ///
    /// Never waits for the audio thread.  If nothing new was published since the last frame,
    /// the previous analysis is seen again.
    pub fn lock_info<F, O>(&self, f: F) -> O
    where
        F: FnOnce(&Analysis) -> O,
    {
        f(self.info.borrow_mut().read())
    }
}

/// A running playback
///
/// Iterating yields one [`Frame`](struct.Frame.html) per rendered frame until the end time is
/// reached.  The stream is closed by [`stop`](#method.stop), or on drop.
pub struct Frames {
    info: SharedInfo,
    device: Box<dyn Device>,
    start_time: time::Instant,
    end: f32,
    running: bool,
}

impl std::fmt::Debug for Frames {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Frames {{ device: {:?}, end: {:?}, running: {:?} }}",
            self.device, self.end, self.running,
        )
    }
}

impl Frames {
    /// Wrap an already started device
    ///
    /// `end` is the playback time in seconds after which no more frames are yielded.
    pub fn new(info: triple_buffer::Output<Analysis>, device: Box<dyn Device>, end: f32) -> Frames {
        Frames {
            info: rc::Rc::new(cell::RefCell::new(info)),
            device,
            start_time: time::Instant::now(),
            end,
            running: true,
        }
    }

    /// Playback time after which iteration ends
    pub fn end(&self) -> f32 {
        self.end
    }

    /// Seconds since playback started
    pub fn elapsed(&self) -> f32 {
        crate::helpers::time(self.start_time)
    }

    pub fn iter<'a>(&'a mut self) -> FramesIter<'a> {
        FramesIter {
            visualizer: self,
            frame: 0,
        }
    }

    /// Stop and close the playback stream
    pub fn stop(mut self) -> crate::Result<()> {
        self.running = false;
        log::debug!("Stopping playback after {:.3}s", self.elapsed());

        self.device.stop()
    }
}

impl Drop for Frames {
    fn drop(&mut self) {
        if self.running {
            self.running = false;
            if let Err(e) = self.device.stop() {
                log::error!("{}", e);
            }
        }
    }
}

#[derive(Debug)]
pub struct FramesIter<'a> {
    visualizer: &'a mut Frames,
    frame: usize,
}

impl<'a> Iterator for FramesIter<'a> {
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        let time = self.visualizer.elapsed();
        if time >= self.visualizer.end {
            log::debug!("Reached end of track at {:.3}s", time);
            return None;
        }

        let frame = self.frame;
        self.frame += 1;

        Some(Frame {
            time,
            frame,
            info: self.visualizer.info.clone(),
        })
    }
}
