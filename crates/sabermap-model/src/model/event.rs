use serde::Serialize;

/// A lighting or other non-gameplay timeline marker.
///
/// Carried through unchanged; nothing in the analysis interprets events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Event {
    pub time: f64,
    pub kind: i64,
    pub value: i64,
}
