pub mod config;
pub mod interaction;
pub mod pose;
pub mod projection;
pub mod render;
pub mod replay;
pub mod session;

#[cfg(test)]
mod testing;
