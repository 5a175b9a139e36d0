pub mod errors;
pub mod slack;
pub mod traits;

pub use errors::NotificationError;
pub use slack::SlackNotifier;
pub use traits::Notifier;
