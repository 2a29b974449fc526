pub mod capability;
pub mod clock;
pub mod config;
pub mod counter;
pub mod cursor;
pub mod easing;
pub mod error;
pub mod form;
pub mod format;
pub mod header;
pub mod menu;
pub mod observer;
pub mod page;
pub mod reveal;
pub mod runtime;
pub mod transport;

pub use capability::{Capabilities, CapabilityProbe, EnvProbe};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, EasingType, ScrollConfig};
pub use error::{Error, Result};
pub use observer::{Bounds, ElementId, Viewport};
pub use page::PageSpec;
pub use runtime::PageRuntime;
