pub mod clock;
pub mod events;
pub mod frame;
pub mod input;
pub mod lifecycle;
pub mod timer;
pub mod viewport;

pub use clock::{Clock, HostTime};
pub use events::{EventBus, HostEvent, ListenerId, PendingInput};
pub use frame::FrameInfo;
pub use input::{Button, InputCommand, ScrollController};
pub use lifecycle::{FrameHandle, FrameScheduler, ManualScheduler, SceneLifecycle};
pub use timer::{EveryNTicks, Throttled};
pub use viewport::Viewport;
