use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{anyhow, Context};
use typed_builder::TypedBuilder;

use crate::gpu::Frame;
use crate::machine::{Button, GameBoy};

/// How long a stopped CPU waits for input before checking the stop flag.
const INPUT_POLL: Duration = Duration::from_millis(10);

#[derive(Clone, Debug, TypedBuilder)]
pub struct RunConfig {
    /// Stop after this many frames. `None` runs until stopped.
    #[builder(default)]
    pub max_frames: Option<u64>,
    /// Frames buffered for the observer. Further frames are dropped until
    /// it catches up.
    #[builder(default = 2)]
    pub frame_capacity: usize,
    /// Log progress every this many frames. 0 disables it.
    #[builder(default = 60)]
    pub log_every: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Runs a [`GameBoy`] on its own thread.
pub struct Runner {
    gb: GameBoy,
    config: RunConfig,
    stop: Arc<AtomicBool>,
    frames: SyncSender<Frame>,
    input: Receiver<(Button, bool)>,
    delivered: u64,
    dropped: u64,
}

/// The observer side of a running [`Runner`].
pub struct RunnerHandle {
    stop: Arc<AtomicBool>,
    frames: Receiver<Frame>,
    input: Sender<(Button, bool)>,
    worker: JoinHandle<GameBoy>,
}

impl Runner {
    /// Move `gb` onto a new worker thread and start emulating.
    pub fn spawn(gb: GameBoy, config: RunConfig) -> anyhow::Result<RunnerHandle> {
        let stop = Arc::new(AtomicBool::new(false));
        let (frame_tx, frame_rx) = mpsc::sync_channel(config.frame_capacity);
        let (input_tx, input_rx) = mpsc::channel();

        let runner = Runner {
            gb,
            config,
            stop: Arc::clone(&stop),
            frames: frame_tx,
            input: input_rx,
            delivered: 0,
            dropped: 0,
        };

        let worker = thread::Builder::new()
            .name("dotboy_runner".into())
            .spawn(move || runner.run())
            .context("failed to spawn emulation thread")?;

        Ok(RunnerHandle {
            stop,
            frames: frame_rx,
            input: input_tx,
            worker,
        })
    }

    fn run(mut self) -> GameBoy {
        log::info!(
            "runner started: max_frames={:?} capacity={}",
            self.config.max_frames,
            self.config.frame_capacity
        );

        while !self.stop.load(Ordering::Acquire) {
            self.drain_input();

            if let Some(max) = self.config.max_frames {
                if self.delivered + self.dropped >= max {
                    log::info!("runner reached frame limit {max}");
                    break;
                }
            }

            match self.gb.step_frame() {
                Some(frame) => self.deliver(frame),
                None if self.gb.cpu.is_locked() => {
                    log::info!(
                        "runner halted: CPU locked at pc=0x{:04X}",
                        self.gb.cpu.regs.pc
                    );
                    break;
                }
                None => self.wait_for_input(),
            }
        }

        // Input sent before the stop request still applies.
        self.drain_input();
        log::info!(
            "runner stopped after {} frames ({} dropped)",
            self.delivered + self.dropped,
            self.dropped
        );
        self.gb
    }

    fn drain_input(&mut self) {
        while let Ok((button, pressed)) = self.input.try_recv() {
            self.gb.set_button(button, pressed);
        }
    }

    /// The CPU is in STOP; only a button press moves it on.
    fn wait_for_input(&mut self) {
        match self.input.recv_timeout(INPUT_POLL) {
            Ok((button, pressed)) => self.gb.set_button(button, pressed),
            Err(RecvTimeoutError::Timeout) => {}
            // The handle is gone, nothing can wake the CPU any more.
            Err(RecvTimeoutError::Disconnected) => self.stop.store(true, Ordering::Release),
        }
    }

    fn deliver(&mut self, frame: Frame) {
        let number = frame.number();
        match self.frames.try_send(frame) {
            Ok(()) => self.delivered += 1,
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                log::trace!("frame {number} dropped, observer is behind");
            }
            // Nobody is watching; keep emulating until told to stop.
            Err(TrySendError::Disconnected(_)) => self.dropped += 1,
        }

        if self.config.log_every != 0 && number % self.config.log_every == 0 {
            log::debug!(
                "runner: frame {} (delivered={} dropped={})",
                number,
                self.delivered,
                self.dropped
            );
        }
    }
}

impl RunnerHandle {
    /// Next buffered frame, if any.
    pub fn try_recv(&self) -> Option<Frame> {
        self.frames.try_recv().ok()
    }

    /// Wait up to `timeout` for the next frame. `None` on timeout or once
    /// the worker has finished and the buffer is empty.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Frame> {
        self.frames.recv_timeout(timeout).ok()
    }

    /// Blocking iterator over frames; ends when the worker finishes.
    pub fn frames(&self) -> mpsc::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Forward a button change to the worker. Ignored once it has finished.
    pub fn press(&self, button: Button, pressed: bool) {
        if self.input.send((button, pressed)).is_err() {
            log::debug!("runner finished, dropping {:?} input", button);
        }
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Stop the worker and take the machine back.
    pub fn join(self) -> anyhow::Result<GameBoy> {
        self.stop();
        self.worker
            .join()
            .map_err(|_| anyhow!("emulation thread panicked"))
    }

    /// Wait for the worker to finish on its own (frame limit or locked
    /// CPU) without requesting a stop.
    pub fn wait(self) -> anyhow::Result<GameBoy> {
        self.worker
            .join()
            .map_err(|_| anyhow!("emulation thread panicked"))
    }
}

#[cfg(test)]
mod tests;
