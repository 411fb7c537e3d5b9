/// Milliseconds since the node clock started
pub type Tick = u64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThermometerEvent {
    /// Periodic update; `None` when the reading could not be taken
    Update(Option<f32>),
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BatteryEvent {
    /// Periodic update; `None` when the voltage could not be measured
    Update(Option<f32>),
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionEvent {
    Motion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Press,
}

/// Everything an external collaborator can tell the node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeEvent {
    Thermometer(ThermometerEvent),
    Battery(BatteryEvent),
    Motion(MotionEvent),
    Button(ButtonEvent),
}

/// Contents of a report frame as seen by the receiving side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    pub voltage: Option<f32>,
    pub temperature: Option<f32>,
    pub motion_count: u16,
}

/// How a single report cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    Sent,
    Deferred,
}
