pub mod price;
pub mod scenario;
pub mod setup;
pub mod stats;
pub mod ui;
