pub mod processes;
pub mod run;
pub mod testing;
