mod frame;

pub use frame::{Shape, Table};
