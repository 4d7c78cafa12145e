mod matter;
mod noop;

pub use matter::matter;
pub use noop::noop;
