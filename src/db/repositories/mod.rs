mod availability_repository;
mod booking_repository;
mod event_type_repository;

pub use availability_repository::AvailabilityRepository;
pub use booking_repository::BookingRepository;
pub use event_type_repository::EventTypeRepository;
