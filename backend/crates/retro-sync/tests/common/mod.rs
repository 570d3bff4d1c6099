pub mod fakes;
pub mod fixtures;
pub mod test_db;

#[allow(unused_imports)]
pub use fakes::*;
#[allow(unused_imports)]
pub use fixtures::*;
pub use test_db::*;
