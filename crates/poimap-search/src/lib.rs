//! Paginated search session: result accumulation, single-flight request
//! orchestration, scroll-to-load detection and the map-facing flows.

pub mod error;
pub mod map;
pub mod observer;
pub mod orchestrator;
pub mod session;
pub mod store;
pub mod trigger;

pub use error::{LocateError, SearchError};
pub use map::{locate_me, show_result, LocateOptions, LocationProvider, MapView};
pub use observer::{ChannelObserver, ObserverId, ObserverRegistry, SearchEvent, SearchObserver};
pub use orchestrator::{SearchHandle, SearchOrchestrator, SessionStatus};
pub use session::{Dispatch, LoadState, PageRequest, PageTarget, SearchSession, SkipReason};
pub use store::{ResultStore, Snapshot, StoreChange};
pub use trigger::{ScrollPosition, ScrollToLoad};
