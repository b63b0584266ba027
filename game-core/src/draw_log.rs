use game_types::{CanvasPort, DrawEvent, DrawPayload};
use tracing::debug;

/// Ordered, deduplicated record of the active round's drawing primitives.
///
/// Sequence numbers are assigned here, at serialization time, never by the
/// sender. The ordering is authoritative and identical for every replica
/// regardless of network jitter on the way in.
#[derive(Debug, Default)]
pub struct DrawEventLog {
    events: Vec<DrawEvent>,
    next_seq: u64,
}

impl DrawEventLog {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            next_seq: 1,
        }
    }

    /// Record a payload, assigning the next sequence number.
    ///
    /// Returns `None` when the payload is malformed, or when it is
    /// byte-identical to the immediately preceding event. The transport is
    /// at-least-once, so an exact repeat is treated as a redelivery. Both
    /// cases are dropped without error.
    pub fn append(&mut self, payload: DrawPayload) -> Option<&DrawEvent> {
        if !payload.is_well_formed() {
            debug!(?payload, "dropping malformed draw payload");
            return None;
        }
        if self.events.last().map(|e| &e.payload) == Some(&payload) {
            debug!(seq = self.next_seq - 1, "dropping redelivered draw payload");
            return None;
        }
        self.events.push(DrawEvent {
            seq: self.next_seq,
            payload,
        });
        self.next_seq += 1;
        self.events.last()
    }

    /// The full ordered log, `Clear` events included, for late-join replay.
    pub fn events(&self) -> &[DrawEvent] {
        &self.events
    }

    /// Events still contributing to the visible drawing: everything after
    /// the last `Clear`.
    pub fn effective_events(&self) -> &[DrawEvent] {
        let start = self
            .events
            .iter()
            .rposition(|e| e.payload.is_clear())
            .map(|i| i + 1)
            .unwrap_or(0);
        &self.events[start..]
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Start a fresh round: empty log, sequence numbers back to 1.
    pub fn reset(&mut self) {
        self.events.clear();
        self.next_seq = 1;
    }

    /// Fold the ordered log onto a surface, from empty state. `Clear` maps
    /// to `surface.clear()`; every other payload is handed to `apply`
    /// verbatim. Deterministic: same log, same final surface.
    pub fn replay_onto<C, F>(&self, surface: &mut C, mut apply: F)
    where
        C: CanvasPort,
        F: FnMut(&mut C, &DrawPayload),
    {
        for event in &self.events {
            if event.payload.is_clear() {
                surface.clear();
            } else {
                apply(surface, &event.payload);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_types::Point;

    fn stroke(x: f32) -> DrawPayload {
        DrawPayload::StrokeSegment {
            from: Point { x, y: 0.0 },
            to: Point { x, y: 10.0 },
            color: "#000000".to_string(),
            width: 4.0,
        }
    }

    #[test]
    fn test_sequence_numbers_start_at_one_and_increase() {
        let mut log = DrawEventLog::new();
        assert_eq!(log.append(stroke(1.0)).unwrap().seq, 1);
        assert_eq!(log.append(stroke(2.0)).unwrap().seq, 2);
        assert_eq!(log.append(DrawPayload::Clear).unwrap().seq, 3);
        let seqs: Vec<u64> = log.events().iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
    }

    #[test]
    fn test_malformed_payloads_are_dropped_silently() {
        let mut log = DrawEventLog::new();
        assert!(log
            .append(DrawPayload::StrokeSegment {
                from: Point { x: f32::NAN, y: 0.0 },
                to: Point { x: 1.0, y: 1.0 },
                color: "#000000".to_string(),
                width: 4.0,
            })
            .is_none());
        assert!(log
            .append(DrawPayload::SprayBurst {
                particles: vec![],
                color: "#ff0000".to_string(),
                radius: 10.0,
            })
            .is_none());
        assert!(log.is_empty());
        // The next good event still gets seq 1.
        assert_eq!(log.append(stroke(1.0)).unwrap().seq, 1);
    }

    #[test]
    fn test_redelivered_payload_recorded_once() {
        let mut log = DrawEventLog::new();
        log.append(stroke(1.0));
        assert!(log.append(stroke(1.0)).is_none());
        assert_eq!(log.len(), 1);
        // A different stroke is not a redelivery.
        assert!(log.append(stroke(2.0)).is_some());
        // And the original shape may legitimately come back later.
        assert!(log.append(stroke(1.0)).is_some());
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_clear_is_logged_but_truncates_effective_state() {
        let mut log = DrawEventLog::new();
        log.append(stroke(1.0));
        log.append(stroke(2.0));
        log.append(DrawPayload::Clear);
        log.append(stroke(3.0));
        assert_eq!(log.len(), 4);
        let effective: Vec<u64> = log.effective_events().iter().map(|e| e.seq).collect();
        assert_eq!(effective, vec![4]);
    }

    #[test]
    fn test_double_clear_collapses_to_one() {
        let mut log = DrawEventLog::new();
        log.append(stroke(1.0));
        log.append(DrawPayload::Clear);
        assert!(log.append(DrawPayload::Clear).is_none());
        assert_eq!(log.len(), 2);
        assert!(log.effective_events().is_empty());
    }

    #[test]
    fn test_reset_restarts_sequence() {
        let mut log = DrawEventLog::new();
        log.append(stroke(1.0));
        log.append(stroke(2.0));
        log.reset();
        assert!(log.is_empty());
        assert_eq!(log.append(stroke(9.0)).unwrap().seq, 1);
    }
}
