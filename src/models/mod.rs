pub mod booking;
pub mod business;
pub mod hours;
pub mod service;
pub mod slot;

pub use booking::{Booking, BookingRequest, BookingStatus, ValidBookingRequest};
pub use business::{Business, NewBusiness};
pub use hours::OperatingHours;
pub use service::{Service, ServiceFields};
pub use slot::Slot;
