//! Delivery channels implementing [`Notifier`](crate::notifier::Notifier).

pub mod email;
pub mod log_only;
