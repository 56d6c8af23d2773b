//! triage-core: task prioritization engine for the Triage task tracker.
//!
//! Given open tasks and the user's ordering preferences, produce a total
//! order with a short reason per task. A remote text-generation provider is
//! consulted when one is configured; the deterministic ranker covers every
//! other case.

pub mod advisor;
pub mod audit;
pub mod engine;
pub mod error;
pub mod preferences;
pub mod provider;
pub mod ranker;
pub mod reason;
pub mod task;
pub mod time;

pub use advisor::{RankedEntry, RankingResponse, apply_ranking, build_prompt, parse_ranking, request_ranking};
pub use audit::AuditRecord;
pub use engine::{Mode, OrderingResult, Prioritizer, heuristic_order};
pub use error::AdvisorError;
pub use preferences::{PreferenceSource, Preferences};
pub use provider::{Credentials, DEFAULT_TIMEOUT, ProviderChoice, ProviderKind, TextGenerationProvider};
pub use ranker::{SENTINEL_DEADLINE, rank};
pub use reason::{AI_LABEL, HEURISTIC_LABEL, build_reason};
pub use task::{DEFAULT_PRIORITY, Task};
