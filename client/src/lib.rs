//! `SiteBid` Console Client Library
//!
//! Backend for the desktop admin console: reactive session state and the
//! route guard that mirrors the server's authorization semantics so the
//! UI never renders a screen the server would reject. The guard operates
//! only on locally-known role state; the server remains authoritative.

pub mod guard;
pub mod session;

pub use guard::{evaluate_route, GuardState, NavTarget, RouteRequirement};
pub use session::{SessionManager, SessionSnapshot, SessionUser};
