pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;

pub use r#trait::{ApartmentFilter, ApartmentRepository};

pub mod mock;
pub use mock::MockApartmentRepository;
