pub mod params;
pub mod target;

pub use params::{AuthToken, Device, JobConfig, Task};
pub use target::{InputError, JobTarget};
