pub mod action;
mod heuristic;
pub mod host;
pub mod idle;
pub mod interpreter;
pub mod metrics;
pub mod recall;
pub mod registry;
pub mod resolver;
pub mod types;

pub use action::{declared_actions, Action, ACTIVE_TAB};
pub use host::{ContentReader, HostError, ReadError, TabDescriptor, TabHost};
pub use idle::IdleTracker;
pub use interpreter::{CommandInterpreter, GENERIC_APOLOGY};
pub use metrics::{Metrics, MetricsSnapshot};
pub use recall::{RecallMatch, RecallStore};
pub use registry::{CloseOutcome, TabRegistry};
pub use resolver::{ActionResolver, Resolution, SideEffect, SummaryFailed};
pub use types::{Tab, TabTemplate};
