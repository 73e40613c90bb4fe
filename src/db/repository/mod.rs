pub mod availability;
pub mod booking;
pub mod client;
pub mod series;

pub use availability::{AvailabilityRepository, SchedulingConfigRepository};
pub use booking::BookingRepository;
pub use client::ClientRepository;
pub use series::SeriesRepository;
