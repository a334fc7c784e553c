mod parser;
mod tracing;

pub(crate) use parser::{Cli, Commands, ServeArgs};
pub(crate) use tracing::init as init_tracing;
