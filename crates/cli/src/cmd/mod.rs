mod build;
mod info;
mod package;
mod plan;
mod source;

pub use build::cmd_build;
pub use info::cmd_info;
pub use package::cmd_package;
pub use plan::cmd_plan;
pub use source::cmd_source;
