/// Node context, event dispatch and the report cycle
use log::{debug, error, info, warn};

use crate::config::NodeConfig;
use crate::drivers::{Indicator, Radio};
use crate::frame::encode;
use crate::models::{
    BatteryEvent, ButtonEvent, MotionEvent, NodeEvent, ReportOutcome, ThermometerEvent, Tick,
};
use crate::motion::MotionCounter;
use crate::scheduler::ReportScheduler;
use crate::stream::SampleStream;

/// All mutable node state, owned by the single event loop
///
/// Sensor callbacks and the report task both take `&mut self`, so they can
/// only run one after the other.
pub struct NodeContext<R: Radio, I: Indicator> {
    thermometer: SampleStream,
    voltage: SampleStream,
    motion: MotionCounter,
    scheduler: ReportScheduler,
    radio: R,
    indicator: I,
    report_interval_ms: Tick,
    retry_interval_ms: Tick,
    first_report_at_ms: Tick,
    startup_pulse_ms: Tick,
    success_pulse_ms: Tick,
}

impl<R: Radio, I: Indicator> NodeContext<R, I> {
    pub fn new(config: &NodeConfig, radio: R, indicator: I) -> Self {
        NodeContext {
            thermometer: SampleStream::new(config.stream_samples),
            voltage: SampleStream::new(config.stream_samples),
            motion: MotionCounter::new(config.motion_debounce_ms),
            scheduler: ReportScheduler::new(),
            radio,
            indicator,
            report_interval_ms: config.report_interval_ms,
            retry_interval_ms: config.retry_interval_ms,
            first_report_at_ms: config.first_report_at_ms,
            startup_pulse_ms: config.startup_pulse_ms,
            success_pulse_ms: config.success_pulse_ms,
        }
    }

    /// Blink once and plan the first report cycle
    pub fn init(&mut self) {
        self.indicator.pulse(self.startup_pulse_ms);
        self.scheduler.plan_absolute(self.first_report_at_ms);
        info!("Initialization finished");
    }

    pub fn handle_event(&mut self, event: NodeEvent, now: Tick) {
        match event {
            NodeEvent::Thermometer(ThermometerEvent::Update(Some(celsius))) => {
                debug!("Thermometer update event: {:.2} °C", celsius);
                self.thermometer.push(celsius);
            }
            NodeEvent::Thermometer(ThermometerEvent::Update(None)) => {
                warn!("Thermometer update without a reading, dropping trend");
                self.thermometer.clear();
            }
            NodeEvent::Thermometer(ThermometerEvent::Error) => {
                error!("Thermometer error event");
                self.thermometer.clear();
            }
            NodeEvent::Battery(BatteryEvent::Update(Some(volts))) => {
                debug!("Battery update event: {:.3} V", volts);
                self.voltage.push(volts);
            }
            NodeEvent::Battery(BatteryEvent::Update(None)) => {
                debug!("Battery update without a reading, keeping trend");
            }
            NodeEvent::Battery(BatteryEvent::Error) => {
                error!("Battery error event");
                self.voltage.clear();
            }
            NodeEvent::Motion(MotionEvent::Motion) => {
                let counted = self.motion.on_trigger(now);
                debug!(
                    "Motion event (counted: {}, total: {})",
                    counted,
                    self.motion.count()
                );
            }
            NodeEvent::Button(ButtonEvent::Press) => {
                debug!("Button event");
                self.scheduler.plan_now(now);
            }
        }
    }

    /// Run the report cycle if its wake tick has been reached
    pub fn run_due(&mut self, now: Tick) -> Option<ReportOutcome> {
        let nominal = self.scheduler.begin_due(now)?;
        debug!("Report task woke at {} (planned {})", now, nominal);

        let outcome = self.report_cycle();
        self.scheduler.finish();
        Some(outcome)
    }

    // One send attempt, replanned relative to the nominal wake
    fn report_cycle(&mut self) -> ReportOutcome {
        info!("Periodic task started");

        let frame = encode(
            self.voltage.average(),
            self.thermometer.average(),
            self.motion.count(),
        );

        if self.radio.send(&frame) {
            self.motion.reset();
            self.indicator.pulse(self.success_pulse_ms);
            self.scheduler.plan_current_relative(self.report_interval_ms);
            ReportOutcome::Sent
        } else {
            warn!("Transmission deferred");
            self.scheduler.plan_current_relative(self.retry_interval_ms);
            ReportOutcome::Deferred
        }
    }

    pub fn next_wake(&self) -> Option<Tick> {
        self.scheduler.next_wake()
    }

    pub fn thermometer(&self) -> &SampleStream {
        &self.thermometer
    }

    pub fn voltage(&self) -> &SampleStream {
        &self.voltage
    }

    pub fn motion(&self) -> &MotionCounter {
        &self.motion
    }

    pub fn scheduler(&self) -> &ReportScheduler {
        &self.scheduler
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ReportFrame;
    use crate::scheduler::TaskState;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct RecordingRadio {
        results: VecDeque<bool>,
        sent: Vec<ReportFrame>,
    }

    impl Radio for RecordingRadio {
        fn send(&mut self, frame: &ReportFrame) -> bool {
            self.sent.push(*frame);
            self.results.pop_front().unwrap_or(true)
        }
    }

    #[derive(Default)]
    struct RecordingIndicator {
        pulses: Vec<Tick>,
    }

    impl Indicator for RecordingIndicator {
        fn pulse(&mut self, duration_ms: Tick) {
            self.pulses.push(duration_ms);
        }
    }

    fn node(results: &[bool]) -> NodeContext<RecordingRadio, RecordingIndicator> {
        let radio = RecordingRadio {
            results: results.iter().copied().collect(),
            sent: Vec::new(),
        };
        let mut node = NodeContext::new(&NodeConfig::default(), radio, RecordingIndicator::default());
        node.init();
        node
    }

    fn motion(node: &mut NodeContext<RecordingRadio, RecordingIndicator>, now: Tick) {
        node.handle_event(NodeEvent::Motion(MotionEvent::Motion), now);
    }

    #[test]
    fn init_pulses_and_plans_first_report() {
        let node = node(&[]);
        assert_eq!(node.indicator().pulses, vec![1_000]);
        assert_eq!(node.next_wake(), Some(10_000));
    }

    #[test]
    fn nothing_runs_before_wake() {
        let mut node = node(&[]);
        assert_eq!(node.run_due(9_999), None);
        assert!(node.radio().sent.is_empty());
    }

    #[test]
    fn first_report_without_samples_uses_sentinels() {
        let mut node = node(&[]);
        assert_eq!(node.run_due(10_000), Some(ReportOutcome::Sent));
        assert_eq!(node.radio().sent[0].as_bytes(), &[0xFF, 0x7F, 0xFF, 0x00, 0x00]);
    }

    #[test]
    fn success_resets_motion_and_replans_from_nominal_wake() {
        let mut node = node(&[true]);
        node.handle_event(NodeEvent::Battery(BatteryEvent::Update(Some(3.67))), 1_000);
        node.handle_event(NodeEvent::Thermometer(ThermometerEvent::Update(Some(23.45))), 1_000);
        motion(&mut node, 2_000);
        motion(&mut node, 5_000);

        // Runs late; the next wake is still anchored on tick 10_000
        assert_eq!(node.run_due(10_400), Some(ReportOutcome::Sent));

        assert_eq!(node.radio().sent[0].as_bytes(), &[0x25, 0x00, 0xEA, 0x00, 0x02]);
        assert_eq!(node.motion().count(), 0);
        assert_eq!(node.next_wake(), Some(910_000));
        assert_eq!(node.indicator().pulses, vec![1_000, 5_000]);
        assert_eq!(node.scheduler().state(), TaskState::Pending { wake_at: 910_000 });
    }

    #[test]
    fn success_keeps_sample_streams() {
        let mut node = node(&[true]);
        node.handle_event(NodeEvent::Thermometer(ThermometerEvent::Update(Some(20.0))), 0);
        node.run_due(10_000);

        assert_eq!(node.thermometer().average(), Some(20.0));
    }

    #[test]
    fn failure_preserves_state_and_retries_quickly() {
        let mut node = node(&[false, false, true]);
        node.handle_event(NodeEvent::Thermometer(ThermometerEvent::Update(Some(20.0))), 0);
        motion(&mut node, 100);

        assert_eq!(node.run_due(10_050), Some(ReportOutcome::Deferred));
        assert_eq!(node.motion().count(), 1);
        assert_eq!(node.thermometer().len(), 1);
        assert_eq!(node.next_wake(), Some(11_000));
        assert_eq!(node.indicator().pulses, vec![1_000]);

        assert_eq!(node.run_due(11_020), Some(ReportOutcome::Deferred));
        assert_eq!(node.next_wake(), Some(12_000));

        assert_eq!(node.run_due(12_000), Some(ReportOutcome::Sent));
        assert_eq!(node.next_wake(), Some(912_000));

        let sent = &node.radio().sent;
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0], sent[2]);
        assert_eq!(node.motion().count(), 0);
    }

    #[test]
    fn motion_between_retries_is_carried_over() {
        let mut node = node(&[false, true]);
        motion(&mut node, 0);
        node.run_due(10_000);
        motion(&mut node, 10_500);
        node.run_due(11_000);

        assert_eq!(&node.radio().sent[1].as_bytes()[3..5], &[0x00, 0x02]);
    }

    #[test]
    fn button_preempts_long_wait() {
        let mut node = node(&[]);
        node.run_due(10_000);
        assert_eq!(node.next_wake(), Some(910_000));

        node.handle_event(NodeEvent::Button(ButtonEvent::Press), 60_000);
        assert_eq!(node.next_wake(), Some(60_000));
        assert_eq!(node.run_due(60_000), Some(ReportOutcome::Sent));
        assert_eq!(node.next_wake(), Some(960_000));
    }

    #[test]
    fn button_preempts_retry_backoff() {
        let mut node = node(&[false]);
        node.run_due(10_000);
        node.handle_event(NodeEvent::Button(ButtonEvent::Press), 10_200);

        assert_eq!(node.run_due(10_200), Some(ReportOutcome::Sent));
        assert_eq!(node.next_wake(), Some(910_200));
    }

    #[test]
    fn thermometer_failures_clear_the_stream() {
        let mut node = node(&[]);
        node.handle_event(NodeEvent::Thermometer(ThermometerEvent::Update(Some(20.0))), 0);
        node.handle_event(NodeEvent::Thermometer(ThermometerEvent::Error), 0);
        assert_eq!(node.thermometer().average(), None);

        node.handle_event(NodeEvent::Thermometer(ThermometerEvent::Update(Some(20.0))), 0);
        node.handle_event(NodeEvent::Thermometer(ThermometerEvent::Update(None)), 0);
        assert_eq!(node.thermometer().average(), None);
    }

    #[test]
    fn battery_error_clears_but_missing_reading_does_not() {
        let mut node = node(&[]);
        node.handle_event(NodeEvent::Battery(BatteryEvent::Update(Some(3.0))), 0);
        node.handle_event(NodeEvent::Battery(BatteryEvent::Update(None)), 0);
        assert_eq!(node.voltage().average(), Some(3.0));

        node.handle_event(NodeEvent::Battery(BatteryEvent::Error), 0);
        assert_eq!(node.voltage().average(), None);
    }

    #[test]
    fn motion_is_debounced() {
        let mut node = node(&[]);
        motion(&mut node, 1_000);
        motion(&mut node, 1_500);
        motion(&mut node, 2_999);
        motion(&mut node, 3_000);
        assert_eq!(node.motion().count(), 2);
    }
}
