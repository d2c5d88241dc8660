pub mod profiles;
pub mod session;
pub mod sort;
pub mod storage;
pub mod watch;
pub mod watchlist;

pub use profiles::{avatar_url, builtin_profiles, ProfileRegistry};
pub use session::{protect_route, Page, RouteAction, SessionStore};
pub use sort::{sort_entries, SortOrder};
pub use storage::{keys, FileStore, KeyValueStore, MemoryStore};
pub use watch::{StoreChange, StoreWatcher};
pub use watchlist::{ToggleOutcome, WatchListStore};
