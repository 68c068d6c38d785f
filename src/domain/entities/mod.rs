//! Domain entities

mod installation;
mod instance;
mod payload;
mod release;
mod task;

pub use installation::Installation;
pub use instance::{
    Environment, Instance, InstanceError, Server, CURRENT_LINK, INSTALLATIONS_FOLDER,
    SHARED_FOLDER,
};
pub use payload::{CopyShared, Deploy, Payload, Rollback};
pub use release::Release;
pub use task::Task;
