pub mod clock;
pub mod config;
pub mod eip5792;
pub mod env;
pub mod notifier;

pub use clock::SystemClockAdapter;
pub use config::{RuntimeProfile, TransferAdapterConfig};
pub use eip5792::Eip5792Adapter;
pub use env::EnvConfigAdapter;
pub use notifier::{Toast, ToastNotifier};
