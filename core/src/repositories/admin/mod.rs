pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;

pub use r#trait::AdminRepository;

pub mod mock;
pub use mock::MockAdminRepository;
