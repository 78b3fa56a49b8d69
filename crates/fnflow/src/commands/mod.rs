pub mod invoke;
pub mod setup;
pub mod status;
pub mod teardown;
