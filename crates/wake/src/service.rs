//! Tokio runtime for the wake-word monitor.
//!
//! One actor task owns the [`WakeWordMonitor`]. Engine callbacks, timer
//! fires, health ticks and control signals all arrive on a single channel,
//! which serializes them without a lock around the monitor.

use crate::microphone::{MicOwner, MicrophoneArbiter, MicrophoneLease};
use crate::monitor::{MonitorDeps, MonitorEvent, MonitorSettings, SinkFactory, WakeWordMonitor};
use crate::scheduler::{Scheduler, TimerTicket};
use crate::status::MonitorStatus;
use crate::{MonitorError, MonitorResult};
use murmur_config::AssistantConfig;
use murmur_events::ControlSignal;
use murmur_recognition::RecognitionSink;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

const MIN_HEALTH_INTERVAL: Duration = Duration::from_secs(1);

enum Envelope {
    Event(MonitorEvent),
    /// Acknowledged once the monitor has fully handled the event.
    Acked(MonitorEvent, oneshot::Sender<()>),
}

type EnvelopeTx = mpsc::UnboundedSender<Envelope>;

fn now() -> std::time::Instant {
    Instant::now().into_std()
}

/// Sleeps on the runtime and posts the ticket back to the actor.
struct TokioScheduler {
    tx: EnvelopeTx,
    parent: CancellationToken,
    current: CancellationToken,
}

impl TokioScheduler {
    fn new(tx: EnvelopeTx, parent: CancellationToken) -> Self {
        let current = parent.child_token();
        Self {
            tx,
            parent,
            current,
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, ticket: TimerTicket, delay: Duration) {
        let tx = self.tx.clone();
        let cancel = self.current.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = tx.send(Envelope::Event(MonitorEvent::TimerFired(ticket)));
                }
            }
        });
    }

    fn cancel_all(&mut self) {
        self.current.cancel();
        self.current = self.parent.child_token();
    }
}

/// Cloneable handle for talking to a running monitor.
#[derive(Clone)]
pub struct MonitorHandle {
    tx: EnvelopeTx,
    status: watch::Receiver<MonitorStatus>,
    microphone: MicrophoneArbiter,
}

impl MonitorHandle {
    /// Post a control signal without waiting for it to be handled.
    pub fn send(&self, signal: ControlSignal) -> MonitorResult<()> {
        self.tx
            .send(Envelope::Event(MonitorEvent::Control(signal)))
            .map_err(|_| MonitorError::NotRunning)
    }

    /// Post a control signal and wait until the monitor has handled it.
    pub async fn signal(&self, signal: ControlSignal) -> MonitorResult<()> {
        let (ack, done) = oneshot::channel();
        self.tx
            .send(Envelope::Acked(MonitorEvent::Control(signal), ack))
            .map_err(|_| MonitorError::NotRunning)?;
        done.await.map_err(|_| MonitorError::NotRunning)
    }

    pub async fn pause(&self) -> MonitorResult<()> {
        self.signal(ControlSignal::PauseListening).await
    }

    pub async fn resume(&self) -> MonitorResult<()> {
        self.signal(ControlSignal::ResumeListening).await
    }

    pub fn status(&self) -> MonitorStatus {
        self.status.borrow().clone()
    }

    pub fn watch_status(&self) -> watch::Receiver<MonitorStatus> {
        self.status.clone()
    }

    pub fn microphone(&self) -> &MicrophoneArbiter {
        &self.microphone
    }

    /// Suspend the monitor and take the microphone for a foreground session.
    ///
    /// The background engine is stopped before this returns. Dropping the
    /// returned session releases the microphone and signals the monitor to
    /// resume.
    pub async fn open_chat_session(&self) -> MonitorResult<ForegroundSession> {
        match self.signal(ControlSignal::ChatSessionOpened).await {
            Ok(()) | Err(MonitorError::NotRunning) => {}
            Err(e) => return Err(e),
        }

        match self.microphone.try_acquire(MicOwner::Foreground) {
            Ok(lease) => {
                tracing::debug!("Foreground session opened");
                Ok(ForegroundSession {
                    lease: Some(lease),
                    tx: self.tx.clone(),
                })
            }
            Err(busy) => {
                let _ = self.send(ControlSignal::ChatSessionClosed);
                Err(busy.into())
            }
        }
    }
}

/// Foreground ownership of the microphone.
pub struct ForegroundSession {
    lease: Option<MicrophoneLease>,
    tx: EnvelopeTx,
}

impl ForegroundSession {
    /// End the session; same as dropping it.
    pub fn close(self) {}
}

impl Drop for ForegroundSession {
    fn drop(&mut self) {
        self.lease.take();
        let _ = self.tx.send(Envelope::Event(MonitorEvent::Control(
            ControlSignal::ChatSessionClosed,
        )));
        tracing::debug!("Foreground session closed");
    }
}

/// A monitor running on its own task.
pub struct WakeWordService {
    handle: MonitorHandle,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl WakeWordService {
    /// Start the monitor if the config enables it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: &AssistantConfig, deps: MonitorDeps) -> MonitorResult<Option<Self>> {
        if !config.wake_word_enabled {
            tracing::info!("Wake word detection disabled");
            return Ok(None);
        }
        Self::spawn_with(MonitorSettings::from_config(config), deps).map(Some)
    }

    /// Start the monitor with explicit settings.
    pub fn spawn_with(settings: MonitorSettings, deps: MonitorDeps) -> MonitorResult<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let microphone = deps.microphone.clone();
        let health_interval = settings.health_check_interval.max(MIN_HEALTH_INTERVAL);

        let sink_tx = tx.clone();
        let sinks: SinkFactory = Arc::new(move |engine| {
            let tx = sink_tx.clone();
            let sink: RecognitionSink = Arc::new(move |event| {
                let _ = tx.send(Envelope::Event(MonitorEvent::Recognition { engine, event }));
            });
            sink
        });

        let scheduler = TokioScheduler::new(tx.clone(), cancel.clone());
        let mut monitor = WakeWordMonitor::new(settings, deps, Box::new(scheduler), sinks);
        monitor.start(now())?;

        let (status_tx, status_rx) = watch::channel(monitor.status().clone());
        let task = tokio::spawn(run_actor(
            monitor,
            rx,
            status_tx,
            health_interval,
            cancel.clone(),
        ));

        Ok(Self {
            handle: MonitorHandle {
                tx,
                status: status_rx,
                microphone,
            },
            cancel,
            task: Some(task),
        })
    }

    pub fn handle(&self) -> MonitorHandle {
        self.handle.clone()
    }

    pub fn status(&self) -> MonitorStatus {
        self.handle.status()
    }

    /// Stop the monitor and wait for the task to release the engine.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Wake word monitor task failed");
            }
        }
    }
}

impl Drop for WakeWordService {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_actor(
    mut monitor: WakeWordMonitor,
    mut rx: mpsc::UnboundedReceiver<Envelope>,
    status_tx: watch::Sender<MonitorStatus>,
    health_interval: Duration,
    cancel: CancellationToken,
) {
    let mut health = tokio::time::interval_at(Instant::now() + health_interval, health_interval);
    health.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let (event, ack) = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            envelope = rx.recv() => match envelope {
                Some(Envelope::Event(event)) => (event, None),
                Some(Envelope::Acked(event, ack)) => (event, Some(ack)),
                None => break,
            },
            _ = health.tick() => (MonitorEvent::HealthCheck, None),
        };

        monitor.handle(event, now());
        publish(&status_tx, &monitor);
        if let Some(ack) = ack {
            let _ = ack.send(());
        }
    }

    monitor.shutdown();
    publish(&status_tx, &monitor);
    tracing::debug!("Wake word monitor task exited");
}

fn publish(status_tx: &watch::Sender<MonitorStatus>, monitor: &WakeWordMonitor) {
    status_tx.send_if_modified(|current| {
        if current != monitor.status() {
            *current = monitor.status().clone();
            true
        } else {
            false
        }
    });
}
