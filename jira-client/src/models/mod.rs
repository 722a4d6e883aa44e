pub mod issue_input;
pub mod issue_link;
pub mod version;

pub use issue_input::*;
pub use issue_link::*;
pub use version::*;
