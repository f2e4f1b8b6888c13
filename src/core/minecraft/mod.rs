pub mod backend;
pub mod content;
pub mod paths;
pub mod rpc;
