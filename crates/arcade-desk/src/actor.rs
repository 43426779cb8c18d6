//! # Desk Actor
//!
//! Runs the [`RentalDesk`] on a single task. User commands and the periodic
//! clock tick are drained by one `select!` loop, so a tick can never
//! interleave with a settlement or publish a console after its session ended.
//!
//! ## Actor Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Desk Actor                                           │
//! │                                                                         │
//! │  DeskHandle ──── job (FnOnce + oneshot reply) ────┐                     │
//! │  DeskHandle ──── shutdown ───────────────────┐    │                     │
//! │                                              ▼    ▼                     │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  loop {                                                         │   │
//! │  │    select! (biased) {                                           │   │
//! │  │      shutdown        => break                                   │   │
//! │  │      job             => job(&mut desk)                          │   │
//! │  │      interval.tick() => desk.tick(clock.now())                  │   │
//! │  │    }                                                            │   │
//! │  │    for event in desk.drain_events() { broadcast(event) }        │   │
//! │  │  }                                                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                              │                          │
//! │                                              ▼                          │
//! │  subscribers ◄──────────── broadcast::Receiver<DeskEvent>              │
//! │                                                                         │
//! │  The interval is dropped with the loop: shutdown cancels the clock.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use arcade_core::{Billing, Customer, Floor, InventoryItem, NewCustomer, Session, Transaction};

use crate::desk::{DeskEvent, RentalDesk};
use crate::error::{DeskError, DeskResult};
use crate::state::{ConsoleView, RevenueSummary};

/// Pending commands before senders wait.
const JOB_QUEUE_DEPTH: usize = 64;

/// Events buffered per subscriber before the slowest one starts lagging.
const EVENT_BUFFER: usize = 256;

type Job = Box<dyn FnOnce(&mut RentalDesk) + Send>;

// =============================================================================
// Actor
// =============================================================================

pub struct DeskActor {
    desk: RentalDesk,
    tick_interval: Duration,
    jobs_rx: mpsc::Receiver<Job>,
    shutdown_rx: mpsc::Receiver<()>,
    events_tx: broadcast::Sender<DeskEvent>,
}

impl DeskActor {
    /// Creates the actor and its handle without starting it.
    pub fn new(desk: RentalDesk, tick_interval: Duration) -> (Self, DeskHandle) {
        let (jobs_tx, jobs_rx) = mpsc::channel(JOB_QUEUE_DEPTH);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let (events_tx, _) = broadcast::channel(EVENT_BUFFER);

        let actor = DeskActor {
            desk,
            tick_interval,
            jobs_rx,
            shutdown_rx,
            events_tx: events_tx.clone(),
        };
        let handle = DeskHandle {
            jobs_tx,
            shutdown_tx,
            events_tx,
        };
        (actor, handle)
    }

    /// Spawns the actor. The join handle yields the desk once it stops.
    pub fn spawn(desk: RentalDesk, tick_interval: Duration) -> (DeskHandle, JoinHandle<RentalDesk>) {
        let (actor, handle) = Self::new(desk, tick_interval);
        (handle, tokio::spawn(actor.run()))
    }

    /// Runs until shutdown or until every handle is dropped.
    pub async fn run(mut self) -> RentalDesk {
        info!(tick_ms = self.tick_interval.as_millis() as u64, "Rental desk starting");

        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown_rx.recv() => {
                    info!("Rental desk shutting down");
                    break;
                }

                job = self.jobs_rx.recv() => match job {
                    Some(job) => job(&mut self.desk),
                    None => {
                        debug!("All desk handles dropped");
                        break;
                    }
                },

                _ = interval.tick() => {
                    let now = self.desk.now();
                    self.desk.tick(now);
                }
            }

            self.publish();
        }

        info!("Rental desk stopped");
        self.desk
    }

    fn publish(&mut self) {
        for event in self.desk.drain_events() {
            // no subscribers is fine
            let _ = self.events_tx.send(event);
        }
    }
}

// =============================================================================
// Handle
// =============================================================================

/// Cloneable front door to a running desk.
#[derive(Clone)]
pub struct DeskHandle {
    jobs_tx: mpsc::Sender<Job>,
    shutdown_tx: mpsc::Sender<()>,
    events_tx: broadcast::Sender<DeskEvent>,
}

impl DeskHandle {
    /// Runs `f` on the actor task and returns its result.
    pub async fn call<R, F>(&self, f: F) -> DeskResult<R>
    where
        F: FnOnce(&mut RentalDesk) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job: Job = Box::new(move |desk| {
            let _ = reply_tx.send(f(desk));
        });
        self.jobs_tx
            .send(job)
            .await
            .map_err(|_| DeskError::ActorClosed)?;
        reply_rx.await.map_err(|_| DeskError::ActorClosed)
    }

    /// Events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<DeskEvent> {
        self.events_tx.subscribe()
    }

    /// Stops the actor and its clock.
    pub async fn shutdown(&self) -> DeskResult<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| DeskError::ActorClosed)
    }

    // =========================================================================
    // Session Operations
    // =========================================================================

    pub async fn start_session(
        &self,
        console_id: u32,
        customer_id: impl Into<String>,
        duration_hours: f64,
    ) -> DeskResult<Session> {
        let customer_id = customer_id.into();
        Ok(self
            .call(move |desk| desk.start_session(console_id, &customer_id, duration_hours))
            .await??)
    }

    pub async fn extend_session(
        &self,
        session_id: impl Into<String>,
        additional_hours: f64,
    ) -> DeskResult<Session> {
        let session_id = session_id.into();
        Ok(self
            .call(move |desk| desk.extend_session(&session_id, additional_hours))
            .await??)
    }

    pub async fn add_order_line(
        &self,
        session_id: impl Into<String>,
        menu_item_id: impl Into<String>,
    ) -> DeskResult<Session> {
        let (session_id, item_id) = (session_id.into(), menu_item_id.into());
        Ok(self
            .call(move |desk| desk.add_order_line(&session_id, &item_id))
            .await??)
    }

    pub async fn remove_order_line(
        &self,
        session_id: impl Into<String>,
        menu_item_id: impl Into<String>,
    ) -> DeskResult<Session> {
        let (session_id, item_id) = (session_id.into(), menu_item_id.into());
        Ok(self
            .call(move |desk| desk.remove_order_line(&session_id, &item_id))
            .await??)
    }

    pub async fn end_session(&self, session_id: impl Into<String>) -> DeskResult<Transaction> {
        let session_id = session_id.into();
        Ok(self.call(move |desk| desk.end_session(&session_id)).await??)
    }

    pub async fn billing(&self, session_id: impl Into<String>) -> DeskResult<Billing> {
        let session_id = session_id.into();
        Ok(self.call(move |desk| desk.billing(&session_id)).await??)
    }

    /// Forces a tick now, outside the interval.
    pub async fn tick_now(&self) -> DeskResult<Vec<ConsoleView>> {
        self.call(|desk| {
            let now = desk.now();
            desk.tick(now)
        })
        .await
    }

    // =========================================================================
    // Desk Management
    // =========================================================================

    pub async fn console_views(&self, floor: Option<Floor>) -> DeskResult<Vec<ConsoleView>> {
        self.call(move |desk| desk.console_views(floor)).await
    }

    pub async fn set_maintenance(&self, console_id: u32, on: bool) -> DeskResult<ConsoleView> {
        Ok(self
            .call(move |desk| desk.set_maintenance(console_id, on))
            .await??)
    }

    pub async fn add_customer(&self, input: NewCustomer) -> DeskResult<Customer> {
        Ok(self.call(move |desk| desk.add_customer(input)).await??)
    }

    pub async fn update_stock(&self, item_id: impl Into<String>, stock: i64) -> DeskResult<InventoryItem> {
        let item_id = item_id.into();
        Ok(self
            .call(move |desk| desk.update_stock(&item_id, stock))
            .await??)
    }

    pub async fn inventory(&self) -> DeskResult<Vec<InventoryItem>> {
        self.call(|desk| desk.inventory().to_vec()).await
    }

    pub async fn transactions(&self) -> DeskResult<Vec<Transaction>> {
        self.call(|desk| desk.transactions().iter().cloned().collect())
            .await
    }

    pub async fn revenue_summary(&self) -> DeskResult<RevenueSummary> {
        self.call(|desk| desk.revenue_summary()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use tokio::sync::broadcast::error::TryRecvError;

    use crate::clock::ManualClock;
    use crate::config::{DeskConfig, IdStrategy};

    const TICK: Duration = Duration::from_secs(1);

    fn desk() -> (RentalDesk, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        ));
        let mut config = DeskConfig::default();
        config.ids.strategy = IdStrategy::Sequential;
        (RentalDesk::from_config(&config, clock.clone()), clock)
    }

    fn customer() -> NewCustomer {
        NewCustomer {
            name: "Budi".into(),
            phone: "081234567890".into(),
            ..Default::default()
        }
    }

    fn drain(rx: &mut broadcast::Receiver<DeskEvent>) -> Vec<DeskEvent> {
        let mut events = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(_) => return events,
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_commands_round_trip() {
        let (desk, _clock) = desk();
        let (handle, join) = DeskActor::spawn(desk, TICK);

        let customer = handle.add_customer(customer()).await.unwrap();
        let session = handle.start_session(1, &customer.id, 1.0).await.unwrap();
        handle.add_order_line(&session.id, "fb1").await.unwrap();
        let tx = handle.end_session(&session.id).await.unwrap();
        assert_eq!(tx.total_cost.rupiah(), 23_000);

        let err = handle.end_session(&session.id).await.unwrap_err();
        assert!(matches!(err, DeskError::Core(ref e) if e.is_invalid_state()));

        handle.shutdown().await.unwrap();
        let desk = join.await.unwrap();
        assert_eq!(desk.transactions().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_publishes_active_consoles() {
        let (desk, _clock) = desk();
        let (handle, join) = DeskActor::spawn(desk, TICK);
        let customer = handle.add_customer(customer()).await.unwrap();
        handle.start_session(1, &customer.id, 1.0).await.unwrap();

        let mut rx = handle.subscribe();
        tokio::time::sleep(Duration::from_millis(3_500)).await;

        let ticks = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, DeskEvent::ConsoleUpdated(v) if v.console_id == 1))
            .count();
        assert!(ticks >= 3, "got {ticks} tick events");

        handle.shutdown().await.unwrap();
        join.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_tick_after_settlement() {
        let (desk, _clock) = desk();
        let (handle, join) = DeskActor::spawn(desk, TICK);
        let customer = handle.add_customer(customer()).await.unwrap();
        let session = handle.start_session(1, &customer.id, 1.0).await.unwrap();
        let other = handle.start_session(2, &customer.id, 1.0).await.unwrap();

        let mut rx = handle.subscribe();
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        handle.end_session(&session.id).await.unwrap();
        tokio::time::sleep(Duration::from_millis(3_500)).await;

        let events = drain(&mut rx);
        let settled_at = events
            .iter()
            .position(|e| matches!(e, DeskEvent::SessionSettled(_)))
            .unwrap();

        for event in &events[settled_at + 1..] {
            if let DeskEvent::ConsoleUpdated(view) = event {
                if view.console_id == 1 {
                    // only the release itself, never a session view
                    assert!(view.session_id.is_none(), "resurrected: {view:?}");
                }
            }
        }
        // the other console kept ticking
        assert!(events[settled_at + 1..].iter().any(
            |e| matches!(e, DeskEvent::ConsoleUpdated(v) if v.session_id.as_deref() == Some(other.id.as_str()))
        ));

        handle.shutdown().await.unwrap();
        join.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_handle_fails_after_shutdown() {
        let (desk, _clock) = desk();
        let (handle, join) = DeskActor::spawn(desk, TICK);
        handle.shutdown().await.unwrap();
        join.await.unwrap();

        let err = handle.revenue_summary().await.unwrap_err();
        assert!(matches!(err, DeskError::ActorClosed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_now_reads_desk_clock() {
        let (desk, clock) = desk();
        let (handle, join) = DeskActor::spawn(desk, TICK);
        let customer = handle.add_customer(customer()).await.unwrap();
        handle.start_session(1, &customer.id, 1.0).await.unwrap();

        clock.advance(chrono::Duration::minutes(61));
        let views = handle.tick_now().await.unwrap();
        assert_eq!(views.len(), 1);
        assert!(views[0].is_overtime);

        let bill = handle
            .billing(views[0].session_id.clone().unwrap())
            .await
            .unwrap();
        assert_eq!(bill.overtime_hours, 1);

        handle.shutdown().await.unwrap();
        join.await.unwrap();
    }
}
