//! Transition monitor
//!
//! Polls the pointer on a fixed interval, tracks which display it is on, and
//! hands every detected crossing to the flash coordinator.

use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::classifier;
use super::event::{PointerSample, TransitionEvent};
use crate::flash::{FlashCoordinator, FlashMode};
use crate::platform::{Desktop, PlatformError};
use crate::screen::{DisplayRegion, DisplayTopology, RegionId};
use crate::settings::StyleConfig;

/// How long `pending_flash` stays set after a trigger
pub const FLASH_COOLDOWN: Duration = Duration::from_secs(1);

/// Name reported when the pointer is not on a known display
pub const UNKNOWN_DISPLAY: &str = "Unknown";

/// Monitor errors
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Monitor already running")]
    AlreadyRunning,

    #[error("Monitor not running")]
    NotRunning,

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Monitor task failed: {0}")]
    Task(String),

    #[error("Desktop backend was lost after a task failure")]
    DesktopLost,
}

pub type MonitorResult<T> = Result<T, MonitorError>;

/// Polling parameters
#[derive(Debug, Clone)]
pub struct MonitorOptions {
    /// Pointer sampling interval
    pub poll_interval: Duration,
    /// How often the display set is re-read from the platform
    pub topology_refresh: Duration,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(20),
            topology_refresh: Duration::from_millis(1000),
        }
    }
}

/// Observable monitor status
#[derive(Debug, Clone)]
pub struct MonitorState {
    pub is_active: bool,
    pub current_region_id: Option<RegionId>,
    pub current_display_name: String,
    /// Crossings in the current session
    pub transition_count: u64,
    pub last_flash_at: Option<Instant>,
}

impl MonitorState {
    /// True during the cool-down window after a flash was triggered
    pub fn pending_flash(&self) -> bool {
        self.last_flash_at
            .map(|at| at.elapsed() < FLASH_COOLDOWN)
            .unwrap_or(false)
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        Self {
            is_active: false,
            current_region_id: None,
            current_display_name: UNKNOWN_DISPLAY.to_string(),
            transition_count: 0,
            last_flash_at: None,
        }
    }
}

/// Events emitted by the monitor
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// Monitoring started with the pointer on `region`
    Started { region: Option<DisplayRegion> },
    /// The pointer crossed to another display
    Transition(TransitionEvent),
    /// The platform reported a different display set
    TopologyChanged { displays: usize },
    /// Monitoring stopped
    Stopped { transitions: u64 },
}

/// Per-tick display membership tracking
///
/// Keeps only the current region and the previous pointer sample.
#[derive(Debug, Default)]
pub struct TransitionTracker {
    current: Option<DisplayRegion>,
    last_sample: Option<PointerSample>,
    transition_count: u64,
}

impl TransitionTracker {
    /// Start a fresh session at the region under `sample`
    pub fn begin(topology: &DisplayTopology, sample: Option<PointerSample>) -> Self {
        let current = sample
            .and_then(|sample| topology.locate(sample.position))
            .cloned();

        Self {
            current,
            last_sample: sample,
            transition_count: 0,
        }
    }

    /// Feed one poll; returns an event only when the pointer changed display
    pub fn observe(
        &mut self,
        topology: &DisplayTopology,
        sample: PointerSample,
    ) -> Option<TransitionEvent> {
        let previous = self.last_sample.replace(sample);

        let Some(located) = topology.locate(sample.position) else {
            tracing::trace!("Pointer at {} is outside every display", sample.position);
            return None;
        };

        match self.current.as_ref().map(|current| current.id) {
            Some(id) if id == located.id => {
                // Same display; pick up a refreshed frame if the topology changed
                if self.current.as_ref() != Some(located) {
                    self.current = Some(located.clone());
                }
                return None;
            }
            None => {
                self.current = Some(located.clone());
                return None;
            }
            Some(_) => {}
        }

        let to_region = located.clone();
        let from_region = self.current.replace(to_region.clone())?;
        let classification = classifier::classify(&from_region, &to_region, sample.position);
        self.transition_count += 1;

        Some(TransitionEvent {
            sequence: self.transition_count,
            from_region,
            to_region,
            direction: classification.direction,
            crossing_edge: classification.crossing_edge,
            boundary_position: classification.boundary_position,
            previous_position: previous.map(|sample| sample.position),
            pointer_position: sample.position,
            sample_gap_ms: previous
                .map(|prev| sample.at.saturating_duration_since(prev.at).as_millis() as u64),
        })
    }

    pub fn current(&self) -> Option<&DisplayRegion> {
        self.current.as_ref()
    }

    pub fn transition_count(&self) -> u64 {
        self.transition_count
    }
}

/// Everything the polling task needs exclusively; returned on stop
struct Session {
    desktop: Box<dyn Desktop>,
    topology: DisplayTopology,
    state_tx: watch::Sender<MonitorState>,
}

/// Watches the pointer and triggers flashes on display crossings
pub struct TransitionMonitor {
    options: MonitorOptions,
    coordinator: FlashCoordinator,
    style_rx: watch::Receiver<StyleConfig>,
    mode_tx: watch::Sender<FlashMode>,
    state_rx: watch::Receiver<MonitorState>,
    event_tx: mpsc::Sender<MonitorEvent>,
    event_rx: Option<mpsc::Receiver<MonitorEvent>>,
    /// Present while stopped
    parked: Option<Session>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    task: Option<JoinHandle<Session>>,
}

impl TransitionMonitor {
    /// Create a stopped monitor
    pub fn new(
        desktop: Box<dyn Desktop>,
        options: MonitorOptions,
        coordinator: FlashCoordinator,
        style_rx: watch::Receiver<StyleConfig>,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(MonitorState::default());
        let (mode_tx, _) = watch::channel(FlashMode::default());
        let (event_tx, event_rx) = mpsc::channel(256);

        Self {
            options,
            coordinator,
            style_rx,
            mode_tx,
            state_rx,
            event_tx,
            event_rx: Some(event_rx),
            parked: Some(Session {
                desktop,
                topology: DisplayTopology::new(),
                state_tx,
            }),
            shutdown_tx: None,
            task: None,
        }
    }

    /// Take the event receiver (can only be called once)
    pub fn take_event_receiver(&mut self) -> Option<mpsc::Receiver<MonitorEvent>> {
        self.event_rx.take()
    }

    /// Start polling
    ///
    /// The session begins on the display under the pointer with a zero
    /// transition count.
    pub async fn start(&mut self) -> MonitorResult<()> {
        if self.task.is_some() {
            return Err(MonitorError::AlreadyRunning);
        }
        let mut session = self.parked.take().ok_or(MonitorError::DesktopLost)?;

        match session.desktop.displays() {
            Ok(regions) => {
                session.topology.replace(regions);
            }
            Err(e) => {
                self.parked = Some(session);
                return Err(e.into());
            }
        }

        let sample = match session.desktop.pointer_position() {
            Ok(position) => Some(PointerSample::now(position)),
            Err(e) => {
                tracing::warn!("Could not read pointer position at start: {}", e);
                None
            }
        };

        let tracker = TransitionTracker::begin(&session.topology, sample);
        let region = tracker.current().cloned();
        let display_name = region
            .as_ref()
            .map(|r| session.topology.display_name(r))
            .unwrap_or_else(|| UNKNOWN_DISPLAY.to_string());

        tracing::info!(
            "Monitoring {} display(s), pointer on {}",
            session.topology.len(),
            display_name
        );

        session.state_tx.send_replace(MonitorState {
            is_active: true,
            current_region_id: region.as_ref().map(|r| r.id),
            current_display_name: display_name,
            transition_count: 0,
            last_flash_at: None,
        });
        let _ = self.event_tx.try_send(MonitorEvent::Started { region });

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
        let worker = Worker {
            session,
            tracker,
            options: self.options.clone(),
            coordinator: self.coordinator.clone(),
            style_rx: self.style_rx.clone(),
            mode_rx: self.mode_tx.subscribe(),
            event_tx: self.event_tx.clone(),
            shutdown_rx,
        };

        self.task = Some(tokio::spawn(worker.run()));
        self.shutdown_tx = Some(shutdown_tx);

        Ok(())
    }

    /// Stop polling
    ///
    /// Flashes that were already triggered keep running to completion.
    pub async fn stop(&mut self) -> MonitorResult<()> {
        let (Some(shutdown_tx), Some(task)) = (self.shutdown_tx.take(), self.task.take()) else {
            return Err(MonitorError::NotRunning);
        };

        let _ = shutdown_tx.send(()).await;
        let session = task
            .await
            .map_err(|e| MonitorError::Task(e.to_string()))?;

        let mut transitions = 0;
        session.state_tx.send_modify(|state| {
            state.is_active = false;
            transitions = state.transition_count;
        });
        let _ = self.event_tx.try_send(MonitorEvent::Stopped { transitions });
        tracing::info!("Monitoring stopped after {} transition(s)", transitions);

        self.parked = Some(session);
        Ok(())
    }

    /// Choose which presentations future transitions produce
    pub fn set_flash_mode(&self, mode: FlashMode) {
        tracing::debug!("Flash mode set to {}", mode);
        self.mode_tx.send_replace(mode);
    }

    pub fn flash_mode(&self) -> FlashMode {
        *self.mode_tx.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.state_rx.borrow().is_active
    }

    pub fn transition_count(&self) -> u64 {
        self.state_rx.borrow().transition_count
    }

    pub fn current_display_name(&self) -> String {
        self.state_rx.borrow().current_display_name.clone()
    }

    pub fn pending_flash(&self) -> bool {
        self.state_rx.borrow().pending_flash()
    }

    /// Snapshot of the monitor status
    pub fn state(&self) -> MonitorState {
        self.state_rx.borrow().clone()
    }

    /// Displays known when the monitor last stopped, empty while running
    pub fn regions(&self) -> Vec<DisplayRegion> {
        self.parked
            .as_ref()
            .map(|session| session.topology.regions().to_vec())
            .unwrap_or_default()
    }
}

/// The polling task
struct Worker {
    session: Session,
    tracker: TransitionTracker,
    options: MonitorOptions,
    coordinator: FlashCoordinator,
    style_rx: watch::Receiver<StyleConfig>,
    mode_rx: watch::Receiver<FlashMode>,
    event_tx: mpsc::Sender<MonitorEvent>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl Worker {
    async fn run(mut self) -> Session {
        let mut poll = time::interval(self.options.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // The display set was read by start(), so skip the immediate first tick
        let mut refresh = time::interval_at(
            Instant::now() + self.options.topology_refresh,
            self.options.topology_refresh,
        );
        refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown_rx.recv() => break,
                _ = refresh.tick() => self.refresh_topology(),
                _ = poll.tick() => self.poll(),
            }
        }

        self.session
    }

    fn poll(&mut self) {
        let position = match self.session.desktop.pointer_position() {
            Ok(position) => position,
            Err(e) => {
                tracing::debug!("Skipping tick, pointer read failed: {}", e);
                return;
            }
        };

        let event = self
            .tracker
            .observe(&self.session.topology, PointerSample::now(position));

        match event {
            Some(event) => self.dispatch(event),
            None => self.sync_current(),
        }
    }

    fn dispatch(&mut self, event: TransitionEvent) {
        let display_name = self.session.topology.display_name(&event.to_region);
        tracing::info!("Transition {} into {}", event, display_name);

        let now = Instant::now();
        self.session.state_tx.send_modify(|state| {
            state.current_region_id = Some(event.to_region.id);
            state.current_display_name = display_name;
            state.transition_count = event.sequence;
            state.last_flash_at = Some(now);
        });

        // Copy the style now so later edits never reach this flash
        let style = *self.style_rx.borrow();
        let mode = *self.mode_rx.borrow();

        if let Err(e) = self.event_tx.try_send(MonitorEvent::Transition(event.clone())) {
            tracing::trace!("Transition event not delivered: {}", e);
        }

        self.coordinator.trigger(event, style, mode);
    }

    /// Publish the current display when it changed without a transition
    fn sync_current(&mut self) {
        let current = self.tracker.current();
        let id = current.map(|region| region.id);
        if self.session.state_tx.borrow().current_region_id == id {
            return;
        }

        let display_name = current
            .map(|region| self.session.topology.display_name(region))
            .unwrap_or_else(|| UNKNOWN_DISPLAY.to_string());
        self.session.state_tx.send_modify(|state| {
            state.current_region_id = id;
            state.current_display_name = display_name;
        });
    }

    fn refresh_topology(&mut self) {
        match self.session.desktop.displays() {
            Ok(regions) => {
                if !self.session.topology.replace(regions) {
                    return;
                }
                let displays = self.session.topology.len();
                tracing::info!("Display topology changed: {} display(s)", displays);
                let _ = self
                    .event_tx
                    .try_send(MonitorEvent::TopologyChanged { displays });

                if let Some(region) = self.tracker.current() {
                    let display_name = self.session.topology.display_name(region);
                    self.session
                        .state_tx
                        .send_modify(|state| state.current_display_name = display_name);
                }
            }
            Err(e) => {
                tracing::warn!("Display query failed, keeping previous topology: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flash::{FlashOptions, PresentationRequest, RenderResult, Renderer};
    use crate::platform::simulated;
    use crate::screen::{Point, RegionEdge, TopologyBuilder};
    use crate::settings::Settings;
    use crate::transition::Direction;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    fn dual() -> DisplayTopology {
        TopologyBuilder::new()
            .display("A", 0.0, 0.0, 1920.0, 1080.0)
            .right_of("A", "B", 1920.0, 1080.0)
            .build()
    }

    fn sample(x: f64, y: f64) -> PointerSample {
        PointerSample::now(Point::new(x, y))
    }

    #[test]
    fn test_no_event_while_on_same_display() {
        let topology = dual();
        let mut tracker = TransitionTracker::begin(&topology, Some(sample(100.0, 100.0)));

        for x in [200.0, 900.0, 1919.0, 5.0] {
            assert!(tracker.observe(&topology, sample(x, 500.0)).is_none());
        }
        assert_eq!(tracker.transition_count(), 0);
    }

    #[test]
    fn test_crossing_produces_event() {
        let topology = dual();
        let mut tracker = TransitionTracker::begin(&topology, Some(sample(1900.0, 500.0)));

        let event = tracker
            .observe(&topology, sample(1950.0, 500.0))
            .expect("crossing");
        assert_eq!(event.sequence, 1);
        assert_eq!(event.from_region.label, "A");
        assert_eq!(event.to_region.label, "B");
        assert_eq!(event.direction, Direction::Right);
        assert_eq!(event.crossing_edge, Some(RegionEdge::MinX));
        assert_eq!(event.boundary_position, Point::new(1920.0, 500.0));
        assert_eq!(event.previous_position, Some(Point::new(1900.0, 500.0)));
        assert_eq!(tracker.transition_count(), 1);
    }

    #[test]
    fn test_crossing_reports_sample_gap() {
        let topology = dual();
        let at = Instant::now();
        let mut tracker = TransitionTracker::begin(
            &topology,
            Some(PointerSample::new(Point::new(1900.0, 500.0), at)),
        );

        let later = PointerSample::new(Point::new(1950.0, 500.0), at + Duration::from_millis(20));
        let event = tracker.observe(&topology, later).expect("crossing");
        assert_eq!(event.sample_gap_ms, Some(20));

        let fresh = TransitionTracker::begin(&topology, None)
            .observe(&topology, sample(1950.0, 500.0));
        assert!(fresh.is_none());
    }

    #[test]
    fn test_unresolved_sample_keeps_current() {
        let topology = dual();
        let mut tracker = TransitionTracker::begin(&topology, Some(sample(100.0, 100.0)));

        assert!(tracker.observe(&topology, sample(-50.0, 100.0)).is_none());
        assert_eq!(tracker.current().map(|r| r.label.as_str()), Some("A"));

        // Coming back onto A from nowhere is not a transition
        assert!(tracker.observe(&topology, sample(10.0, 100.0)).is_none());
        assert_eq!(tracker.transition_count(), 0);
    }

    #[test]
    fn test_begin_outside_adopts_first_display() {
        let topology = dual();
        let mut tracker = TransitionTracker::begin(&topology, Some(sample(-10.0, -10.0)));
        assert!(tracker.current().is_none());

        assert!(tracker.observe(&topology, sample(2000.0, 10.0)).is_none());
        assert_eq!(tracker.current().map(|r| r.label.as_str()), Some("B"));

        let event = tracker.observe(&topology, sample(10.0, 10.0));
        assert_eq!(event.map(|e| e.direction), Some(Direction::Left));
    }

    #[test]
    fn test_back_and_forth_each_count() {
        let topology = dual();
        let mut tracker = TransitionTracker::begin(&topology, Some(sample(1910.0, 10.0)));

        let mut events = Vec::new();
        for x in [1930.0, 1910.0, 1930.0, 1910.0] {
            events.extend(tracker.observe(&topology, sample(x, 10.0)));
        }

        let directions: Vec<Direction> = events.iter().map(|e| e.direction).collect();
        assert_eq!(
            directions,
            vec![
                Direction::Right,
                Direction::Left,
                Direction::Right,
                Direction::Left
            ]
        );
        assert_eq!(events.last().map(|e| e.sequence), Some(4));
    }

    #[derive(Default)]
    struct Recorder {
        requests: Mutex<Vec<PresentationRequest>>,
    }

    #[async_trait]
    impl Renderer for Recorder {
        async fn present(&self, request: &PresentationRequest) -> RenderResult<()> {
            self.requests.lock().unwrap().push(request.clone());
            time::sleep(request.duration).await;
            Ok(())
        }
    }

    fn monitor_over(
        topology: &DisplayTopology,
        start: Point,
    ) -> (TransitionMonitor, simulated::SimulatorHandle, Arc<Recorder>) {
        let (desktop, handle) = simulated::simulated(topology.regions().to_vec(), start);
        let recorder = Arc::new(Recorder::default());
        let coordinator = FlashCoordinator::new(recorder.clone(), FlashOptions::default());
        let settings = Settings::in_memory();
        let monitor = TransitionMonitor::new(
            Box::new(desktop),
            MonitorOptions::default(),
            coordinator,
            settings.subscribe(),
        );
        (monitor, handle, recorder)
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_stop_lifecycle() {
        let topology = dual();
        let (mut monitor, _handle, _) = monitor_over(&topology, Point::new(100.0, 100.0));

        assert!(!monitor.is_running());
        assert!(matches!(monitor.stop().await, Err(MonitorError::NotRunning)));

        monitor.start().await.unwrap();
        assert!(monitor.is_running());
        assert_eq!(monitor.current_display_name(), "Main Display");
        assert!(matches!(
            monitor.start().await,
            Err(MonitorError::AlreadyRunning)
        ));

        monitor.stop().await.unwrap();
        assert!(!monitor.is_running());
        assert_eq!(monitor.regions().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_resets_count() {
        let topology = dual();
        let (mut monitor, handle, _) = monitor_over(&topology, Point::new(1900.0, 500.0));

        monitor.start().await.unwrap();
        handle.move_to(Point::new(1950.0, 500.0));
        time::sleep(Duration::from_millis(60)).await;
        assert_eq!(monitor.transition_count(), 1);
        assert_eq!(monitor.current_display_name(), "Display 2");
        assert!(monitor.pending_flash());

        monitor.stop().await.unwrap();
        assert_eq!(monitor.transition_count(), 1);

        monitor.start().await.unwrap();
        assert_eq!(monitor.transition_count(), 0);
        assert_eq!(monitor.current_display_name(), "Display 2");
        monitor.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_flash_clears_after_cooldown() {
        let topology = dual();
        let (mut monitor, handle, _) = monitor_over(&topology, Point::new(1900.0, 500.0));

        monitor.start().await.unwrap();
        assert!(!monitor.pending_flash());

        handle.move_to(Point::new(1950.0, 500.0));
        time::sleep(Duration::from_millis(40)).await;
        assert!(monitor.pending_flash());

        time::sleep(FLASH_COOLDOWN).await;
        assert!(!monitor.pending_flash());
        monitor.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_lets_flashes_finish() {
        let topology = dual();
        let (mut monitor, handle, recorder) =
            monitor_over(&topology, Point::new(1900.0, 500.0));
        let (coordinator, mut completions) =
            FlashCoordinator::new(recorder.clone(), FlashOptions::default()).with_completions();
        monitor.coordinator = coordinator;

        monitor.start().await.unwrap();
        handle.move_to(Point::new(1950.0, 500.0));
        time::sleep(Duration::from_millis(30)).await;
        monitor.stop().await.unwrap();

        let outcome = completions.recv().await.expect("presentation completes");
        assert!(outcome.result.is_ok());
        assert_eq!(recorder.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_topology_change_is_picked_up() {
        let topology = dual();
        let (mut monitor, handle, _) = monitor_over(&topology, Point::new(100.0, 100.0));
        let mut events = monitor.take_event_receiver().unwrap();

        monitor.start().await.unwrap();
        assert!(matches!(
            events.recv().await,
            Some(MonitorEvent::Started { region: Some(_) })
        ));

        let single = vec![topology.regions()[0].clone()];
        handle.set_displays(single);
        time::sleep(Duration::from_millis(1100)).await;

        assert!(matches!(
            events.recv().await,
            Some(MonitorEvent::TopologyChanged { displays: 1 })
        ));
        monitor.stop().await.unwrap();
        assert_eq!(monitor.regions().len(), 1);
    }
}
