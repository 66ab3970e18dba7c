mod case;
mod meta;
mod project;
mod result;
mod run;
mod section;
mod template;

pub use case::*;
pub use meta::*;
pub use project::*;
pub use result::*;
pub use run::*;
pub use section::*;
pub use template::*;
