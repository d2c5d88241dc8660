pub mod movie;
pub mod profile;
pub mod session;
pub mod video;
pub mod watchlist;

pub use movie::{Genre, Movie};
pub use profile::{ProfileAttrs, ProfileSource, ResolvedProfile};
pub use session::{SelectedProfile, Session};
pub use video::Video;
pub use watchlist::{ListExport, WatchListEntry};
