pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;

pub use r#trait::ReportRepository;

pub mod mock;
pub use mock::MockReportRepository;
