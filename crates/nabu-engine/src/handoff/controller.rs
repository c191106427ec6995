use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use anyhow::anyhow;
use log::{debug, warn};
use thiserror::Error;

use crate::coords::Transform;
use crate::record::{Recorder, RecorderSurface};
use crate::surface::Surface;

use super::SurfaceWriter;

/// Hand-off protocol failure reported to the caller thread.
#[derive(Debug, Error)]
pub enum HandoffError {
    /// The writer (or a render pass inside it) failed; the original error
    /// is preserved as the source.
    #[error("graphics writer failed")]
    Writer(#[source] anyhow::Error),

    /// `image_complete` was called a second time. The first call's outcome
    /// stays authoritative.
    #[error("image_complete() called more than once")]
    AlreadyComplete,

    /// The writer returned without ever requesting a surface.
    #[error("graphics writer finished without requesting a surface")]
    NoSurface,

    #[error("failed to spawn writer thread")]
    Spawn(#[source] std::io::Error),
}

/// Protocol phase. `Replaying` covers zero or more replay passes; the
/// writer decides how many it needs.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HandoffPhase {
    WaitingForSurface,
    Recording,
    Replaying,
    Done,
}

struct HandoffInner {
    phase: HandoffPhase,
    journal: Option<Arc<Recorder>>,
    complete_requested: bool,
    writer_finished: bool,
    failure: Option<anyhow::Error>,
}

/// The single monitor both threads block on.
struct Shared {
    inner: Mutex<HandoffInner>,
    cond: Condvar,
}

impl Shared {
    fn new() -> Self {
        Self {
            inner: Mutex::new(HandoffInner {
                phase: HandoffPhase::WaitingForSurface,
                journal: None,
                complete_requested: false,
                writer_finished: false,
                failure: None,
            }),
            cond: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HandoffInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, HandoffInner>) -> MutexGuard<'a, HandoffInner> {
        self.cond.wait(guard).unwrap_or_else(|e| e.into_inner())
    }
}

/// Render entry point handed to the writer.
///
/// Routes each pass: the first surface seeds the journal and blocks the
/// worker until the caller signals completion; later surfaces receive a
/// replay of the recorded session and are handed straight back.
pub struct RenderGate<'a> {
    shared: &'a Shared,
    placement: Transform,
}

impl RenderGate<'_> {
    /// Runs one render pass over `surface` and returns it to the writer
    /// once the pass is finished (for the first pass, that is only after
    /// the caller signals completion).
    pub fn render(&mut self, mut surface: Box<dyn Surface>) -> anyhow::Result<Box<dyn Surface>> {
        if !self.placement.is_identity() {
            surface.concat_transform(self.placement)?;
        }

        let mut inner = self.shared.lock();
        match inner.phase {
            HandoffPhase::WaitingForSurface => {
                let recorder = Arc::new(Recorder::new(surface)?);
                inner.journal = Some(Arc::clone(&recorder));
                inner.phase = HandoffPhase::Recording;
                debug!("first render pass: surface published, recording");
                self.shared.cond.notify_all();

                // The caller thread draws now; hold this pass open until it
                // signals completion.
                while !inner.complete_requested {
                    inner = self.shared.wait(inner);
                }
                inner.phase = HandoffPhase::Replaying;
                drop(inner);

                recorder
                    .detach_base()
                    .ok_or_else(|| anyhow!("recording surface was already detached"))
            }
            HandoffPhase::Recording | HandoffPhase::Replaying => {
                let journal = inner
                    .journal
                    .clone()
                    .ok_or_else(|| anyhow!("no recorded session for a replay pass"))?;
                drop(inner);
                debug!("replay render pass");
                journal.playback(surface.as_mut())?;
                Ok(surface)
            }
            HandoffPhase::Done => Err(anyhow!("render pass requested after completion")),
        }
    }
}

/// Drives a callback-style [`SurfaceWriter`] from imperative code.
///
/// [`start`](Self::start) launches the worker thread and blocks until the
/// writer's first render pass supplies a live surface. The caller then
/// draws through [`create_graphics`](Self::create_graphics) and finishes
/// with [`image_complete`](Self::image_complete), which releases the worker
/// for any remaining (replay) passes and reports the writer's overall
/// outcome.
///
/// A caller that never calls `image_complete` leaves the worker thread
/// blocked forever; there is no timeout and no cancellation path.
pub struct ThreadedSurfaceWriter {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
    journal: Arc<Recorder>,
    completed: bool,
}

impl std::fmt::Debug for ThreadedSurfaceWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadedSurfaceWriter")
            .field("completed", &self.completed)
            .finish_non_exhaustive()
    }
}

impl ThreadedSurfaceWriter {
    /// Spawns the worker and blocks until the first live surface is ready.
    ///
    /// A writer that fails (or returns) before requesting a surface fails
    /// `start` directly instead of leaving the caller blocked.
    pub fn start<W: SurfaceWriter + 'static>(mut writer: W) -> Result<Self, HandoffError> {
        let shared = Arc::new(Shared::new());
        let worker_shared = Arc::clone(&shared);

        let worker = thread::Builder::new()
            .name("nabu-surface-writer".into())
            .spawn(move || {
                let placement = writer.placement();
                let mut gate = RenderGate { shared: &worker_shared, placement };
                let result = match catch_unwind(AssertUnwindSafe(|| writer.write(&mut gate))) {
                    Ok(result) => result,
                    Err(panic) => Err(anyhow!("graphics writer panicked: {}", panic_text(&panic))),
                };

                let mut inner = worker_shared.lock();
                if let Err(e) = result {
                    warn!("graphics writer failed: {e:#}");
                    if inner.failure.is_none() {
                        inner.failure = Some(e);
                    }
                }
                inner.writer_finished = true;
                inner.phase = HandoffPhase::Done;
                worker_shared.cond.notify_all();
            })
            .map_err(HandoffError::Spawn)?;

        let mut inner = shared.lock();
        while inner.journal.is_none() && !inner.writer_finished {
            inner = shared.wait(inner);
        }

        let journal = match inner.journal.clone() {
            Some(journal) => journal,
            None => {
                // The writer ended without ever supplying a surface.
                let failure = inner.failure.take();
                drop(inner);
                let _ = worker.join();
                return Err(match failure {
                    Some(e) => HandoffError::Writer(e),
                    None => HandoffError::NoSurface,
                });
            }
        };
        drop(inner);

        Ok(Self {
            shared,
            worker: Some(worker),
            journal,
            completed: false,
        })
    }

    /// A drawing context over the recorded session's root surface. May be
    /// called repeatedly while recording.
    pub fn create_graphics(&self) -> RecorderSurface {
        self.journal.create_graphics()
    }

    /// The underlying journal.
    pub fn recorder(&self) -> &Arc<Recorder> {
        &self.journal
    }

    pub fn phase(&self) -> HandoffPhase {
        self.shared.lock().phase
    }

    /// Signals that drawing is finished, releases the worker for its
    /// remaining passes, and blocks until the writer's whole operation has
    /// returned. Any error the worker captured (from the writer itself or
    /// from a replay pass) is re-raised here, wrapped; it is never
    /// silently dropped.
    pub fn image_complete(&mut self) -> Result<(), HandoffError> {
        if self.completed {
            return Err(HandoffError::AlreadyComplete);
        }
        self.completed = true;

        debug!("image complete: releasing writer thread");
        let mut inner = self.shared.lock();
        inner.complete_requested = true;
        self.shared.cond.notify_all();
        while !inner.writer_finished {
            inner = self.shared.wait(inner);
        }
        let failure = inner.failure.take();
        drop(inner);

        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }

        match failure {
            Some(e) => Err(HandoffError::Writer(e)),
            None => Ok(()),
        }
    }
}

fn panic_text(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}
