pub mod analysis;
pub mod profile;
pub mod value;

pub use analysis::*;
pub use profile::*;
pub use value::*;
