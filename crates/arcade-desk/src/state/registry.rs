//! # Console Registry
//!
//! The fixed fleet and the one place console status changes.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Registry Operations                                  │
//! │                                                                         │
//! │  Operation            From          To            Session               │
//! │  ─────────            ────          ──            ───────               │
//! │  attach()             Available ──► InUse         set                   │
//! │  replace_session()    InUse     ──► InUse         swapped (same id,     │
//! │                                                   newer version)        │
//! │  detach()             InUse     ──► Available     cleared (id must      │
//! │                                                   match)                │
//! │  set_status()         Available ◄─► Maintenance   none                  │
//! │                                                                         │
//! │  Anything else is an InvalidTransition.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `status == InUse` if and only if `session.is_some()` holds after every
//! successful call. Failed calls leave the console untouched.

use chrono::{DateTime, Utc};
use serde::Serialize;

use arcade_core::catalog::standard_fleet;
use arcade_core::error::{CoreError, CoreResult};
use arcade_core::time::format_countdown;
use arcade_core::{Console, ConsoleStatus, ConsoleType, Floor, Session};

// =============================================================================
// Console View
// =============================================================================

/// Display projection of one console at one instant.
///
/// Carries the session id and version it was computed from, so a consumer
/// can drop views older than one it already rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleView {
    pub console_id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub console_type: ConsoleType,
    pub floor: Floor,
    pub status: ConsoleStatus,
    pub session_id: Option<String>,
    pub session_version: Option<u64>,
    pub customer_id: Option<String>,
    pub remaining_ms: i64,
    /// `HH:MM:SS`
    pub countdown: String,
    pub overtime_ms: i64,
    pub is_time_low: bool,
    /// Raised once the committed time has run out, from the exact end instant
    /// on. Overtime is only billed for time strictly past the end.
    pub is_overtime: bool,
}

impl ConsoleView {
    /// Projects `console` at `now`. `low_time_ms` is the "time low" threshold.
    pub fn project(console: &Console, now: DateTime<Utc>, low_time_ms: i64) -> Self {
        let (remaining_ms, overtime_ms) = console
            .session
            .as_ref()
            .map(|s| (s.remaining_ms(now), s.overtime_ms(now)))
            .unwrap_or((0, 0));
        let active = console.session.is_some();

        ConsoleView {
            console_id: console.id,
            name: console.name.clone(),
            console_type: console.console_type,
            floor: console.floor,
            status: console.status,
            session_id: console.session.as_ref().map(|s| s.id.clone()),
            session_version: console.session.as_ref().map(|s| s.version),
            customer_id: console.session.as_ref().map(|s| s.customer_id.clone()),
            remaining_ms,
            countdown: format_countdown(remaining_ms),
            overtime_ms,
            is_time_low: active && remaining_ms > 0 && remaining_ms < low_time_ms,
            is_overtime: active && remaining_ms <= 0,
        }
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Owns every console in the fleet.
#[derive(Debug, Clone)]
pub struct ConsoleRegistry {
    consoles: Vec<Console>,
}

impl ConsoleRegistry {
    pub fn new(consoles: Vec<Console>) -> Self {
        ConsoleRegistry { consoles }
    }

    /// The standard 49-unit fleet.
    pub fn standard() -> Self {
        Self::new(standard_fleet())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn get(&self, id: u32) -> CoreResult<&Console> {
        self.consoles
            .iter()
            .find(|c| c.id == id)
            .ok_or(CoreError::ConsoleNotFound(id))
    }

    pub fn list(&self) -> &[Console] {
        &self.consoles
    }

    pub fn list_by_floor(&self, floor: Floor) -> Vec<&Console> {
        self.consoles.iter().filter(|c| c.floor == floor).collect()
    }

    /// The console currently holding `session_id`, if any.
    pub fn find_by_session(&self, session_id: &str) -> Option<&Console> {
        self.consoles
            .iter()
            .find(|c| c.session.as_ref().map_or(false, |s| s.id == session_id))
    }

    /// The live value of an active session.
    pub fn active_session(&self, session_id: &str) -> CoreResult<&Session> {
        self.find_by_session(session_id)
            .and_then(|c| c.session.as_ref())
            .ok_or_else(|| CoreError::SessionNotActive(session_id.to_string()))
    }

    pub fn active_count(&self) -> usize {
        self.consoles.iter().filter(|c| c.is_in_use()).count()
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Puts a freshly started session on its console.
    pub fn attach(&mut self, session: Session) -> CoreResult<()> {
        let console = self.get_mut(session.console_id)?;
        if !console.is_available() {
            return Err(CoreError::ConsoleUnavailable {
                console: console.name.clone(),
                status: console.status,
            });
        }
        console.status = ConsoleStatus::InUse;
        console.session = Some(session);
        Ok(())
    }

    /// Swaps in a newer value of the session the console already holds.
    ///
    /// Rejects a different session id or a version that is not newer.
    pub fn replace_session(&mut self, session: Session) -> CoreResult<()> {
        let console = self.get_mut(session.console_id)?;
        match console.session.as_ref() {
            Some(current) if current.id == session.id && current.version < session.version => {
                console.session = Some(session);
                Ok(())
            }
            Some(current) => Err(CoreError::StaleSession {
                console: console.name.clone(),
                current: format!("{}@v{}", current.id, current.version),
                attempted: format!("{}@v{}", session.id, session.version),
            }),
            None => Err(CoreError::ConsoleNotInUse {
                console: console.name.clone(),
                status: console.status,
            }),
        }
    }

    /// Releases the console, returning the session it held.
    ///
    /// Only the holder of `session_id` can release it.
    pub fn detach(&mut self, console_id: u32, session_id: &str) -> CoreResult<Session> {
        let console = self.get_mut(console_id)?;
        match console.session.as_ref() {
            Some(current) if current.id == session_id => {
                console.status = ConsoleStatus::Available;
                console
                    .session
                    .take()
                    .ok_or_else(|| CoreError::SessionNotActive(session_id.to_string()))
            }
            Some(current) => Err(CoreError::StaleSession {
                console: console.name.clone(),
                current: current.id.clone(),
                attempted: session_id.to_string(),
            }),
            None => Err(CoreError::ConsoleNotInUse {
                console: console.name.clone(),
                status: console.status,
            }),
        }
    }

    /// Moves an idle console between `Available` and `Maintenance`.
    pub fn set_status(&mut self, console_id: u32, status: ConsoleStatus) -> CoreResult<&Console> {
        let console = self.get_mut(console_id)?;
        let allowed = matches!(
            (console.status, status),
            (ConsoleStatus::Available, ConsoleStatus::Maintenance)
                | (ConsoleStatus::Maintenance, ConsoleStatus::Available)
        ) || console.status == status && status != ConsoleStatus::InUse;

        if !allowed {
            return Err(CoreError::InvalidTransition {
                console: console.name.clone(),
                from: console.status,
                to: status,
            });
        }
        console.status = status;
        Ok(console)
    }

    /// Single entry point for a status change.
    ///
    /// - `(InUse, Some(s))`: attach, or replace if the console already holds `s`
    /// - `(Available, Some(s))`: detach `s`
    /// - `(Available | Maintenance, None)`: maintenance toggle
    pub fn apply_transition(
        &mut self,
        console_id: u32,
        status: ConsoleStatus,
        session: Option<Session>,
    ) -> CoreResult<()> {
        match (status, session) {
            (ConsoleStatus::InUse, Some(session)) => {
                if session.console_id != console_id {
                    let console = self.get(console_id)?;
                    return Err(CoreError::InvalidTransition {
                        console: console.name.clone(),
                        from: console.status,
                        to: status,
                    });
                }
                let holds = self
                    .get(console_id)?
                    .session
                    .as_ref()
                    .map_or(false, |s| s.id == session.id);
                if holds {
                    self.replace_session(session)
                } else {
                    self.attach(session)
                }
            }
            (ConsoleStatus::Available, Some(session)) => {
                self.detach(console_id, &session.id).map(|_| ())
            }
            (status, None) => self.set_status(console_id, status).map(|_| ()),
            (status, Some(_)) => {
                let console = self.get(console_id)?;
                Err(CoreError::InvalidTransition {
                    console: console.name.clone(),
                    from: console.status,
                    to: status,
                })
            }
        }
    }

    // =========================================================================
    // Projections
    // =========================================================================

    /// Fresh views of every console that is renting.
    pub fn refresh(&self, now: DateTime<Utc>, low_time_ms: i64) -> Vec<ConsoleView> {
        self.consoles
            .iter()
            .filter(|c| c.is_in_use())
            .map(|c| ConsoleView::project(c, now, low_time_ms))
            .collect()
    }

    /// Views of the whole fleet, or one floor.
    pub fn views(&self, floor: Option<Floor>, now: DateTime<Utc>, low_time_ms: i64) -> Vec<ConsoleView> {
        self.consoles
            .iter()
            .filter(|c| floor.map_or(true, |f| c.floor == f))
            .map(|c| ConsoleView::project(c, now, low_time_ms))
            .collect()
    }

    fn get_mut(&mut self, id: u32) -> CoreResult<&mut Console> {
        self.consoles
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CoreError::ConsoleNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_core::catalog::Catalog;
    use arcade_core::RentalHours;
    use chrono::{Duration, TimeZone};

    const LOW: i64 = 15 * 60_000;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    fn session_on(registry: &ConsoleRegistry, console_id: u32, id: &str) -> Session {
        Session::start(
            || id.to_string(),
            registry.get(console_id).unwrap(),
            "C1",
            RentalHours::from_whole_hours(1).unwrap(),
            &Catalog::standard(),
            t0(),
        )
        .unwrap()
    }

    fn assert_invariant(registry: &ConsoleRegistry) {
        for c in registry.list() {
            assert_eq!(c.is_in_use(), c.session.is_some(), "console {}", c.name);
        }
    }

    #[test]
    fn test_attach_and_detach() {
        let mut registry = ConsoleRegistry::standard();
        let session = session_on(&registry, 1, "S1");
        registry.attach(session).unwrap();
        assert!(registry.get(1).unwrap().is_in_use());
        assert_eq!(registry.find_by_session("S1").unwrap().id, 1);
        assert_invariant(&registry);

        let released = registry.detach(1, "S1").unwrap();
        assert_eq!(released.id, "S1");
        assert!(registry.get(1).unwrap().is_available());
        assert!(registry.find_by_session("S1").is_none());
        assert_invariant(&registry);
    }

    #[test]
    fn test_detach_requires_matching_session() {
        let mut registry = ConsoleRegistry::standard();
        let session = session_on(&registry, 1, "S1");
        registry.attach(session).unwrap();

        let err = registry.detach(1, "S0").unwrap_err();
        assert!(matches!(err, CoreError::StaleSession { .. }));
        assert!(registry.get(1).unwrap().is_in_use());

        let err = registry.detach(2, "S1").unwrap_err();
        assert!(matches!(err, CoreError::ConsoleNotInUse { .. }));
    }

    #[test]
    fn test_replace_rejects_stale_versions() {
        let mut registry = ConsoleRegistry::standard();
        let v0 = session_on(&registry, 1, "S1");
        registry.attach(v0.clone()).unwrap();

        let v1 = v0.extend(RentalHours::from_whole_hours(1).unwrap()).unwrap();
        registry.replace_session(v1.clone()).unwrap();

        // writing the older value back must not roll the console back
        let err = registry.replace_session(v0).unwrap_err();
        assert!(matches!(err, CoreError::StaleSession { .. }));
        assert_eq!(registry.active_session("S1").unwrap(), &v1);
    }

    #[test]
    fn test_maintenance_toggle() {
        let mut registry = ConsoleRegistry::standard();
        registry.set_status(1, ConsoleStatus::Maintenance).unwrap();
        assert_eq!(registry.get(1).unwrap().status, ConsoleStatus::Maintenance);
        registry.set_status(1, ConsoleStatus::Available).unwrap();

        let session = session_on(&registry, 1, "S1");
        registry.attach(session).unwrap();
        let err = registry.set_status(1, ConsoleStatus::Maintenance).unwrap_err();
        assert!(err.is_invalid_state());

        // InUse is only reachable through attach
        let err = registry.set_status(2, ConsoleStatus::InUse).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
        assert_invariant(&registry);
    }

    #[test]
    fn test_apply_transition_facade() {
        let mut registry = ConsoleRegistry::standard();
        let session = session_on(&registry, 3, "S1");

        registry
            .apply_transition(3, ConsoleStatus::InUse, Some(session.clone()))
            .unwrap();
        let extended = session.extend(RentalHours::from_whole_hours(2).unwrap()).unwrap();
        registry
            .apply_transition(3, ConsoleStatus::InUse, Some(extended.clone()))
            .unwrap();
        assert_eq!(registry.active_session("S1").unwrap().duration, 3 * 3600);

        registry
            .apply_transition(3, ConsoleStatus::Available, Some(extended))
            .unwrap();
        assert!(registry.get(3).unwrap().is_available());
        assert!(registry
            .apply_transition(3, ConsoleStatus::Maintenance, Some(session))
            .is_err());
        assert_invariant(&registry);
    }

    #[test]
    fn test_refresh_projects_only_active_consoles() {
        let mut registry = ConsoleRegistry::standard();
        let session = session_on(&registry, 1, "S1");
        registry.attach(session).unwrap();

        let views = registry.refresh(t0() + Duration::minutes(50), LOW);
        assert_eq!(views.len(), 1);
        let view = &views[0];
        assert_eq!(view.remaining_ms, 10 * 60_000);
        assert_eq!(view.countdown, "00:10:00");
        assert!(view.is_time_low);
        assert!(!view.is_overtime);
        assert_eq!(view.session_id.as_deref(), Some("S1"));

        let late = registry.refresh(t0() + Duration::minutes(61), LOW);
        assert_eq!(late[0].countdown, "00:00:00");
        assert!(late[0].is_overtime);
        assert!(!late[0].is_time_low);
    }

    #[test]
    fn test_time_up_exactly_shows_overtime() {
        let mut registry = ConsoleRegistry::standard();
        let session = session_on(&registry, 1, "S1");
        registry.attach(session).unwrap();

        let views = registry.refresh(t0() + Duration::hours(1), LOW);
        assert_eq!(views[0].remaining_ms, 0);
        assert_eq!(views[0].overtime_ms, 0);
        assert!(views[0].is_overtime);
        assert!(!views[0].is_time_low);

        let idle = ConsoleView::project(registry.get(2).unwrap(), t0(), LOW);
        assert!(!idle.is_overtime);
        assert!(!idle.is_time_low);
    }

    #[test]
    fn test_list_by_floor() {
        let registry = ConsoleRegistry::standard();
        assert_eq!(registry.list_by_floor(Floor::Reguler).len(), 27);
        assert_eq!(registry.list_by_floor(Floor::Vip).len(), 22);
        assert_eq!(registry.views(Some(Floor::Vip), t0(), LOW).len(), 22);
        assert!(matches!(registry.get(99), Err(CoreError::ConsoleNotFound(99))));
    }
}
