pub mod config;
pub mod consts;
pub mod control;
pub mod detection;
pub mod error;
pub mod frame;
pub mod io;
pub mod link;
pub mod pipeline;
pub mod protocol;
pub mod region;
