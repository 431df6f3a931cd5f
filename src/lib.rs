// Core layer - shared types and sync configuration
pub mod core;

// Persistence layer - settings storage and the reminder list
pub mod settings;
pub mod store;

// Service layer - command loop, countdown scheduler, events
pub mod service;

// Notification layer - toasts and full-screen surfaces
pub mod notify;

// Sync layer - task-service providers, engine, and merge
pub mod sync;

// Host facade - activation lifecycle
pub mod sill;

// Re-export core types
pub use core::{Reminder, SyncConfig, SyncDirection, SyncProviderType};

// Re-export the host-facing surface
pub use notify::{
    // Full-screen notifications
    DisplayBounds, DisplayHost, NotificationSurface, Notifier, NotifyOutcome, SurfaceOutcome,
    SurfaceRequest, DEFAULT_SNOOZE_MINUTES,
    // Toast notifications
    ToastHost, ToastRequest,
};
pub use service::{ReminderView, SillEvent, SillHandle, SillViewItem, TickUpdate};
pub use settings::{SettingsBackend, SettingsStore};
pub use sill::{ReminderSill, DISPLAY_NAME};
pub use store::ReminderStore;
pub use sync::{GoogleTasksProvider, MicrosoftToDoProvider, SyncEngine, SyncError, SyncProvider};
