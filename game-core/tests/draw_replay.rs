use game_core::DrawEventLog;
use game_types::{CanvasPort, DrawPayload, Point, StampShape};

/// A minimal surface: remembers applied payloads in order. Good enough to
/// compare final drawing state, since payloads are applied verbatim.
#[derive(Default)]
struct TestCanvas {
    applied: Vec<DrawPayload>,
}

impl TestCanvas {
    fn apply(&mut self, payload: &DrawPayload) {
        self.applied.push(payload.clone());
    }
}

impl CanvasPort for TestCanvas {
    fn clear(&mut self) {
        self.applied.clear();
    }

    fn export_snapshot(&self) -> Vec<u8> {
        serde_json::to_vec(&self.applied).unwrap()
    }
}

fn stroke(x: f32) -> DrawPayload {
    DrawPayload::StrokeSegment {
        from: Point { x, y: 0.0 },
        to: Point { x, y: 10.0 },
        color: "#0000FF".to_string(),
        width: 8.0,
    }
}

fn spray() -> DrawPayload {
    // Particle positions come pre-generated from the drawer's client.
    DrawPayload::SprayBurst {
        particles: vec![
            Point { x: 3.7, y: 4.1 },
            Point { x: 5.2, y: 2.9 },
            Point { x: 4.4, y: 6.3 },
        ],
        color: "#FF0000".to_string(),
        radius: 20.0,
    }
}

fn stamp() -> DrawPayload {
    DrawPayload::Stamp {
        shape: StampShape::Star,
        at: Point { x: 50.0, y: 50.0 },
        size: 12.0,
        color: "#00FF00".to_string(),
    }
}

#[test]
fn test_replay_matches_live_application() {
    let mut log = DrawEventLog::new();
    let mut live = TestCanvas::default();

    for payload in [stroke(1.0), spray(), stroke(2.0), DrawPayload::Clear, stamp(), stroke(3.0)] {
        if let Some(event) = log.append(payload.clone()) {
            // Live application, as connected clients would do it.
            if event.payload.is_clear() {
                live.clear();
            } else {
                let payload = event.payload.clone();
                live.apply(&payload);
            }
        }
    }

    // A late joiner replays the log from an empty surface.
    let mut replayed = TestCanvas::default();
    log.replay_onto(&mut replayed, |canvas, payload| canvas.apply(payload));

    assert_eq!(live.export_snapshot(), replayed.export_snapshot());
    // The clear wiped the first three primitives.
    assert_eq!(replayed.applied.len(), 2);
}

#[test]
fn test_replay_is_deterministic() {
    let mut log = DrawEventLog::new();
    log.append(spray());
    log.append(stroke(1.0));
    log.append(stamp());

    let mut first = TestCanvas::default();
    let mut second = TestCanvas::default();
    log.replay_onto(&mut first, |canvas, payload| canvas.apply(payload));
    log.replay_onto(&mut second, |canvas, payload| canvas.apply(payload));

    assert_eq!(first.export_snapshot(), second.export_snapshot());
}

#[test]
fn test_spray_particles_are_echoed_verbatim() {
    let mut log = DrawEventLog::new();
    log.append(spray());

    let mut canvas = TestCanvas::default();
    log.replay_onto(&mut canvas, |canvas, payload| canvas.apply(payload));

    match &canvas.applied[0] {
        DrawPayload::SprayBurst { particles, .. } => {
            assert_eq!(particles[0], Point { x: 3.7, y: 4.1 });
            assert_eq!(particles.len(), 3);
        }
        other => panic!("expected spray burst, got {:?}", other),
    }
}

#[test]
fn test_clearing_twice_is_the_same_as_once() {
    // At the surface level: clear is idempotent.
    let mut canvas = TestCanvas::default();
    canvas.apply(&stroke(1.0));
    canvas.clear();
    let once = canvas.export_snapshot();
    canvas.clear();
    assert_eq!(canvas.export_snapshot(), once);

    // And at the log level a back-to-back clear collapses entirely.
    let mut log = DrawEventLog::new();
    log.append(stroke(1.0));
    log.append(DrawPayload::Clear);
    log.append(DrawPayload::Clear);

    let mut replayed = TestCanvas::default();
    log.replay_onto(&mut replayed, |canvas, payload| canvas.apply(payload));
    assert!(replayed.applied.is_empty());
    assert_eq!(log.len(), 2);
}
