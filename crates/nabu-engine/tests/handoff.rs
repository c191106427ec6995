//! Hand-off protocol: liveness, replay routing, and failure surfacing.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use nabu_engine::coords::{Rect, Transform, Vec2};
use nabu_engine::handoff::{HandoffError, HandoffPhase, RenderGate, SurfaceWriter, ThreadedSurfaceWriter};
use nabu_engine::paint::Color;
use nabu_engine::surface::Surface;

use common::{TraceLog, TraceSurface};

/// Writer that requests `passes` render passes over fresh trace surfaces
/// and keeps every pass's log for inspection.
struct PassWriter {
    passes: usize,
    logs: Arc<Mutex<Vec<TraceLog>>>,
    completed_passes: Arc<AtomicUsize>,
}

impl PassWriter {
    fn new(passes: usize) -> (Self, Arc<Mutex<Vec<TraceLog>>>, Arc<AtomicUsize>) {
        let logs = Arc::new(Mutex::new(Vec::new()));
        let completed = Arc::new(AtomicUsize::new(0));
        (
            Self {
                passes,
                logs: Arc::clone(&logs),
                completed_passes: Arc::clone(&completed),
            },
            logs,
            completed,
        )
    }
}

impl SurfaceWriter for PassWriter {
    fn write(&mut self, gate: &mut RenderGate<'_>) -> anyhow::Result<()> {
        for _ in 0..self.passes {
            let (surface, log) = TraceSurface::new();
            self.logs.lock().unwrap().push(log);
            gate.render(Box::new(surface))?;
            self.completed_passes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

#[test]
fn two_pass_writer_records_then_replays() {
    let (writer, logs, completed) = PassWriter::new(2);
    let mut controller = ThreadedSurfaceWriter::start(writer).unwrap();

    // The caller is unblocked while the worker sits inside its first pass.
    assert_eq!(completed.load(Ordering::SeqCst), 0);
    assert_eq!(controller.phase(), HandoffPhase::Recording);

    let mut g = controller.create_graphics();
    g.set_color(Color::RED).unwrap();
    g.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
    let mut child = g.create_child(None).unwrap();
    child.draw_line(Vec2::zero(), Vec2::new(5.0, 5.0)).unwrap();

    let recorded = controller.recorder().len();
    controller.image_complete().unwrap();

    // Both passes finished before image_complete returned.
    assert_eq!(completed.load(Ordering::SeqCst), 2);
    assert_eq!(controller.phase(), HandoffPhase::Done);

    // The second pass replayed the session; nothing new was recorded.
    assert_eq!(controller.recorder().len(), recorded);

    let logs = logs.lock().unwrap();
    assert_eq!(logs[0].events(), logs[1].events());
    assert!(!logs[0].events().is_empty());
}

#[test]
fn single_pass_writer_never_replays() {
    let (writer, logs, _) = PassWriter::new(1);
    let mut controller = ThreadedSurfaceWriter::start(writer).unwrap();

    let mut g = controller.create_graphics();
    g.fill_rect(Rect::new(1.0, 1.0, 1.0, 1.0)).unwrap();
    controller.image_complete().unwrap();

    let logs = logs.lock().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].ops(), vec!["fill_rect (1,1,1,1)".to_owned()]);
}

#[test]
fn writer_placement_is_applied_to_every_pass() {
    struct PlacedWriter {
        logs: Arc<Mutex<Vec<TraceLog>>>,
    }

    impl SurfaceWriter for PlacedWriter {
        fn placement(&self) -> Transform {
            Transform::scaling(2.0, 2.0)
        }

        fn write(&mut self, gate: &mut RenderGate<'_>) -> anyhow::Result<()> {
            for _ in 0..2 {
                let (surface, log) = TraceSurface::new();
                self.logs.lock().unwrap().push(log);
                gate.render(Box::new(surface))?;
            }
            Ok(())
        }
    }

    let logs = Arc::new(Mutex::new(Vec::new()));
    let mut controller = ThreadedSurfaceWriter::start(PlacedWriter { logs: Arc::clone(&logs) }).unwrap();
    let mut g = controller.create_graphics();
    g.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0)).unwrap();
    controller.image_complete().unwrap();

    let logs = logs.lock().unwrap();
    for log in logs.iter() {
        assert_eq!(
            log.ops(),
            vec![
                "concat_transform [2 0 0 2 0 0]".to_owned(),
                "fill_rect (0,0,4,4)".to_owned(),
            ]
        );
    }
}

#[test]
fn failure_in_replay_pass_surfaces_from_image_complete() {
    struct FailingSecondPass;

    impl SurfaceWriter for FailingSecondPass {
        fn write(&mut self, gate: &mut RenderGate<'_>) -> anyhow::Result<()> {
            let (surface, _) = TraceSurface::new();
            gate.render(Box::new(surface))?;

            let (surface, _) = TraceSurface::new();
            gate.render(Box::new(surface.fail_on("fill_rect")))?;
            Ok(())
        }
    }

    let mut controller = ThreadedSurfaceWriter::start(FailingSecondPass).unwrap();
    let mut g = controller.create_graphics();
    g.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap();

    let err = controller.image_complete().unwrap_err();
    assert!(matches!(err, HandoffError::Writer(_)), "unexpected: {err:?}");
}

#[test]
fn second_image_complete_fails_loudly() {
    let (writer, _, _) = PassWriter::new(1);
    let mut controller = ThreadedSurfaceWriter::start(writer).unwrap();
    let mut g = controller.create_graphics();
    g.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap();

    controller.image_complete().unwrap();
    assert!(matches!(
        controller.image_complete(),
        Err(HandoffError::AlreadyComplete)
    ));
}

#[test]
fn writer_failing_before_any_surface_fails_start() {
    struct EarlyFailure;

    impl SurfaceWriter for EarlyFailure {
        fn write(&mut self, _gate: &mut RenderGate<'_>) -> anyhow::Result<()> {
            Err(anyhow!("device unavailable"))
        }
    }

    let err = ThreadedSurfaceWriter::start(EarlyFailure).unwrap_err();
    assert!(matches!(err, HandoffError::Writer(_)), "unexpected: {err:?}");
}

#[test]
fn writer_that_never_renders_fails_start() {
    struct NoRender;

    impl SurfaceWriter for NoRender {
        fn write(&mut self, _gate: &mut RenderGate<'_>) -> anyhow::Result<()> {
            Ok(())
        }
    }

    assert!(matches!(
        ThreadedSurfaceWriter::start(NoRender).unwrap_err(),
        HandoffError::NoSurface
    ));
}

#[test]
fn panicking_writer_is_reported_not_hung() {
    struct PanickingSecondPass;

    impl SurfaceWriter for PanickingSecondPass {
        fn write(&mut self, gate: &mut RenderGate<'_>) -> anyhow::Result<()> {
            let (surface, _) = TraceSurface::new();
            gate.render(Box::new(surface))?;
            panic!("writer bug");
        }
    }

    let mut controller = ThreadedSurfaceWriter::start(PanickingSecondPass).unwrap();
    let mut g = controller.create_graphics();
    g.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap();

    let err = controller.image_complete().unwrap_err();
    assert!(err.to_string().contains("writer failed"), "unexpected: {err}");
}
