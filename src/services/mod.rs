pub mod booking;
pub mod messaging;
pub mod notifications;
pub mod scheduling;
