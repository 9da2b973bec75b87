pub mod apply;
pub mod config;
pub mod inquire;
pub mod legal;
pub mod preview;
pub mod prompt;
pub mod simulate;
