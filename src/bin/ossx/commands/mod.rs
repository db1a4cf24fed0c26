mod du;
mod exists;
mod get;
mod ls;
mod put;
mod rm;

pub use du::execute_du;
pub use exists::execute_exists;
pub use get::execute_get;
pub use ls::execute_ls;
pub use put::execute_put;
pub use rm::execute_rm;
