//! # Notification Surfaces
//!
//! Host-side integration traits for expiry notifications. The sill never
//! draws anything itself: a [`DisplayHost`] opens full-screen surfaces and a
//! [`ToastHost`] posts system toasts, and the sill only cares about which
//! outcome the user picked. Tests drive these traits with mocks; a real host
//! wires them to its windowing and notification stacks.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Duration;
use uuid::Uuid;

/// Snooze length the overlay's snooze button applies.
pub const DEFAULT_SNOOZE_MINUTES: i64 = 5;

/// One display's position and size in the host's virtual screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// What a full-screen surface should show and where.
#[derive(Debug, Clone)]
pub struct SurfaceRequest {
    pub reminder_id: Uuid,
    pub title: String,
    /// Target display, or `None` for the host's default placement.
    pub bounds: Option<DisplayBounds>,
    /// Only one surface per fan-out plays the expiry sound.
    pub play_audio: bool,
}

/// How a notification surface was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceOutcome {
    /// The user dismissed the reminder; it is done.
    Dismissed,
    /// The user asked for more time.
    Snoozed(Duration),
    /// The surface went away without a decision.
    Closed,
}

/// A live full-screen notification.
///
/// `outcome` resolves exactly once per surface. `close` must be idempotent
/// and must cause a pending `outcome` to resolve (`Closed` unless the user
/// already decided); the notifier closes losing surfaces after the first
/// display answers, and closes everything left open at shutdown.
#[async_trait]
pub trait NotificationSurface: Send + Sync {
    async fn outcome(&self) -> SurfaceOutcome;
    fn close(&self);
}

/// Access to the host's displays and full-screen surface creation.
#[async_trait]
pub trait DisplayHost: Send + Sync {
    /// Current displays. May be empty (headless session); the notifier then
    /// falls back to a single default-placed surface.
    fn displays(&self) -> Vec<DisplayBounds>;

    async fn show(&self, request: SurfaceRequest) -> Result<Arc<dyn NotificationSurface>>;
}

/// A system toast carrying the reminder id as its activation argument.
#[derive(Debug, Clone)]
pub struct ToastRequest {
    /// Round-tripped back through toast activation; holds the reminder id.
    pub argument: String,
    pub title: String,
}

/// Access to the host's toast notifications. Toasts are fire-and-forget;
/// activation comes back later through the service's toast entry point.
#[async_trait]
pub trait ToastHost: Send + Sync {
    async fn show(&self, request: ToastRequest) -> Result<()>;
}
