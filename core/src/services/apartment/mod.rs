pub mod service;

pub use service::{ApartmentService, NewApartment, UpdateApartment};
