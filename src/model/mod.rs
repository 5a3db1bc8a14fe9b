pub mod aggregate;
pub mod algorithm;
pub mod command;
pub mod common;
pub mod container;
pub mod database;
pub mod definition;
pub mod named;
pub mod parameter;
pub mod privilege;
pub mod space_system;
pub mod user_context;

pub use aggregate::*;
pub use algorithm::*;
pub use command::*;
pub use common::*;
pub use container::*;
pub use database::*;
pub use definition::*;
pub use named::*;
pub use parameter::*;
pub use privilege::*;
pub use space_system::*;
pub use user_context::*;
