//! Record/replay behavior across the full capability set.

mod common;

use std::sync::Arc;

use nabu_engine::coords::{FillRule, Outline, Path, Rect, Segment, Transform, Vec2};
use nabu_engine::paint::{Color, Stroke};
use nabu_engine::record::Recorder;
use nabu_engine::surface::Surface;

use common::TraceSurface;

fn recorder_over(surface: TraceSurface) -> Arc<Recorder> {
    Arc::new(Recorder::new(Box::new(surface)).unwrap())
}

#[test]
fn replay_reproduces_the_recorded_call_sequence() {
    let (base, live) = TraceSurface::new();
    let recorder = recorder_over(base);
    let mut g = recorder.create_graphics();

    g.set_color(Color::RED).unwrap();
    g.set_stroke(Stroke::new(2.0)).unwrap();
    g.translate(3.0, 4.0).unwrap();
    g.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
    g.draw_line(Vec2::zero(), Vec2::new(5.0, 5.0)).unwrap();
    g.draw_text("hello", Vec2::new(1.0, 9.0)).unwrap();

    let (mut target, replayed) = TraceSurface::new();
    recorder.playback(&mut target).unwrap();

    assert_eq!(live.events(), replayed.events());
}

#[test]
fn replay_can_run_more_than_once() {
    let (base, _) = TraceSurface::new();
    let recorder = recorder_over(base);
    let mut g = recorder.create_graphics();
    g.fill_rect(Rect::new(1.0, 1.0, 2.0, 2.0)).unwrap();

    let (mut first, first_log) = TraceSurface::new();
    let (mut second, second_log) = TraceSurface::new();
    recorder.playback(&mut first).unwrap();
    recorder.playback(&mut second).unwrap();

    assert_eq!(first_log.events(), second_log.events());
}

/// A caller-owned shape the recorder cannot structurally clone.
struct MovableSquare {
    origin: Vec2,
    side: f32,
}

impl Outline for MovableSquare {
    fn bounds(&self) -> Rect {
        Rect::new(self.origin.x, self.origin.y, self.side, self.side)
    }

    fn segments(&self) -> Vec<Segment> {
        let [a, b, c, d] = self.bounds().corners();
        vec![
            Segment::MoveTo(a),
            Segment::LineTo(b),
            Segment::LineTo(c),
            Segment::LineTo(d),
            Segment::Close,
        ]
    }

    fn fill_rule(&self) -> FillRule {
        FillRule::NonZero
    }
}

#[test]
fn mutating_a_shape_after_drawing_does_not_affect_replay() {
    let (base, _) = TraceSurface::new();
    let recorder = recorder_over(base);
    let mut g = recorder.create_graphics();

    let mut shape = MovableSquare { origin: Vec2::zero(), side: 10.0 };
    g.fill_outline(&shape).unwrap();

    // The caller moves the shape before the replay happens.
    shape.origin = Vec2::new(500.0, 500.0);

    let (mut target, replayed) = TraceSurface::new();
    recorder.playback(&mut target).unwrap();

    assert_eq!(replayed.ops(), vec!["fill_outline bounds=(0,0,10,10)".to_owned()]);
}

#[test]
fn absolute_transforms_are_anchored_to_the_target_base() {
    let (base, _) = TraceSurface::new();
    let recorder = recorder_over(base);
    let mut g = recorder.create_graphics();

    g.set_transform(Transform::translation(5.0, 5.0)).unwrap();
    g.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();

    // The target device hands out surfaces pre-translated by (100,100).
    let (mut target, replayed) = TraceSurface::with_base(Transform::translation(100.0, 100.0));
    recorder.playback(&mut target).unwrap();

    assert_eq!(
        replayed.ops(),
        vec![
            "set_transform [1 0 0 1 105 105]".to_owned(),
            "fill_rect (0,0,10,10)".to_owned(),
        ]
    );
}

#[test]
fn recorded_session_replays_onto_a_translated_target() {
    // setColor(red); fillRect; createChild; drawLine on the child: replay
    // onto a target pre-translated by (100,100) delivers the same calls in
    // order, with the placement carried by the target's own base state.
    let (base, _) = TraceSurface::new();
    let recorder = recorder_over(base);
    let mut g = recorder.create_graphics();

    g.set_color(Color::RED).unwrap();
    g.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
    let mut child = g.create_child(None).unwrap();
    child.draw_line(Vec2::zero(), Vec2::new(5.0, 5.0)).unwrap();

    let (mut target, replayed) = TraceSurface::with_base(Transform::translation(100.0, 100.0));
    recorder.playback(&mut target).unwrap();

    let events = replayed.events();
    assert_eq!(
        events,
        vec![
            (0, "set_color [255, 0, 0, 255]".to_owned()),
            (0, "fill_rect (0,0,10,10)".to_owned()),
            (0, "create_child -> 1".to_owned()),
            (1, "draw_line (0,0)->(5,5)".to_owned()),
        ]
    );

    // The child inherited the target's placement.
    assert_eq!(
        target.transform(),
        Transform::translation(100.0, 100.0)
    );
}

#[test]
fn identical_call_sequences_allocate_identical_child_ids() {
    let run = || {
        let (base, _) = TraceSurface::new();
        let recorder = recorder_over(base);
        let mut g = recorder.create_graphics();
        let mut a = g.create_child(None).unwrap();
        let _b = a.create_child(Some(Rect::new(0.0, 0.0, 4.0, 4.0))).unwrap();
        let _c = g.create_child(None).unwrap();

        let (mut target, replayed) = TraceSurface::new();
        recorder.playback(&mut target).unwrap();
        replayed.events()
    };

    assert_eq!(run(), run());
}

#[test]
fn nested_children_replay_against_fresh_children_of_the_target() {
    let (base, _) = TraceSurface::new();
    let recorder = recorder_over(base);
    let mut g = recorder.create_graphics();

    let mut child = g.create_child(Some(Rect::new(10.0, 10.0, 20.0, 20.0))).unwrap();
    child.fill_rect(Rect::new(12.0, 12.0, 4.0, 4.0)).unwrap();
    child.dispose().unwrap();
    g.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0)).unwrap();

    let (mut target, replayed) = TraceSurface::new();
    recorder.playback(&mut target).unwrap();

    assert_eq!(
        replayed.events(),
        vec![
            (0, "create_child -> 1 region=(10,10,20,20)".to_owned()),
            (1, "fill_rect (12,12,4,4)".to_owned()),
            (1, "dispose".to_owned()),
            (0, "fill_rect (0,0,2,2)".to_owned()),
        ]
    );
}

#[test]
fn replay_failure_names_the_failing_command() {
    let (base, _) = TraceSurface::new();
    let recorder = recorder_over(base);
    let mut g = recorder.create_graphics();
    g.set_color(Color::BLUE).unwrap();
    g.fill_oval(Rect::new(0.0, 0.0, 4.0, 4.0)).unwrap();

    let (target, _) = TraceSurface::new();
    let mut target = target.fail_on("fill_oval");
    let err = recorder.playback(&mut target).unwrap_err();
    let text = err.to_string();
    assert!(text.contains("fill_oval"), "unexpected error: {text}");
}

#[test]
fn getters_read_through_to_the_live_surface() {
    let (base, _) = TraceSurface::with_base(Transform::translation(100.0, 100.0));
    let recorder = recorder_over(base);
    let mut g = recorder.create_graphics();

    g.set_color(Color::GREEN).unwrap();
    g.translate(5.0, 5.0).unwrap();

    assert_eq!(g.color(), Color::GREEN);
    // The transform getter reports state relative to the session base, not
    // the device placement.
    assert_eq!(g.transform(), Transform::translation(5.0, 5.0));
}

#[test]
fn captured_paths_survive_caller_reuse() {
    let (base, _) = TraceSurface::new();
    let recorder = recorder_over(base);
    let mut g = recorder.create_graphics();

    let mut path = Path::new();
    path.move_to(Vec2::zero()).line_to(Vec2::new(8.0, 0.0)).line_to(Vec2::new(8.0, 8.0)).close();
    g.fill_outline(&path).unwrap();

    // Caller keeps building on the same path afterwards.
    path.line_to(Vec2::new(-50.0, -50.0));

    let (mut target, replayed) = TraceSurface::new();
    recorder.playback(&mut target).unwrap();
    assert_eq!(replayed.ops(), vec!["fill_outline bounds=(0,0,8,8)".to_owned()]);
}
