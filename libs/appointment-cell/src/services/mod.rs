pub mod cancellation;
pub mod clock;
pub mod lifecycle;
pub mod scheduler;
pub mod selection;

pub use cancellation::AppointmentCanceller;
pub use clock::{Clock, FixedClock, SystemClock};
pub use scheduler::AppointmentScheduler;
pub use selection::{LowestIdSelector, PhysicianSelector, RandomSelector, SeededSelector};
