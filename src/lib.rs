//! IPT Portal - a browser-only business portal demo
//!
//! Core modules:
//! - `model`: Accounts, departments and the persisted database
//! - `persistence`: Whole-state save/load with seeding and corruption recovery
//! - `session`: Register/verify/login/logout and session restoration
//! - `router`: Hash routing with access control and render hooks
//! - `portal`: Context object wiring form flows to the router
//! - `platform`: Storage backends (LocalStorage on web, memory natively)
//! - `config`: Storage keys and log level

pub mod config;
pub mod error;
pub mod model;
pub mod persistence;
pub mod platform;
pub mod portal;
pub mod router;
pub mod session;

pub use config::{Config, LogLevel};
pub use error::{AuthError, StorageError};
pub use model::{Account, Database, Department, Role};
pub use persistence::Store;
pub use platform::{KeyValueStore, MemoryStorage};
pub use portal::{Portal, RegisterForm};
pub use router::{MemoryShell, Navigation, RenderContext, Route, Router, Severity, Shell};
pub use session::{Session, SessionManager};
