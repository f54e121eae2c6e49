//! Engine crate: ports, services, and the application facade.
//!
//! The domain crate holds the rules; this crate wires them to storage, the
//! clock, and the random number generator, and exposes one `Engine` facade
//! a UI can drive.

pub mod app;
pub mod infrastructure;
pub mod services;

pub use app::{CompletionOutcome, Engine, EngineError, JournalOutcome};
pub use infrastructure::clock::SystemClock;
pub use infrastructure::memory::{MemoryStore, StoreState};
pub use infrastructure::ports::{
    AchievementRepo, CharacterRepo, ClockPort, JournalRepo, QuestFilter, QuestRepo, RepoError,
    SettingsRepo,
};
pub use services::journal::{EntryStats, SatisfactionCheck};
pub use services::progression::StatChange;
pub use services::quest_generator::{GenerationConstraints, SpecialTrigger};
