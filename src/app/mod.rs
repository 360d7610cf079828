mod runner;
mod summary;

pub(crate) use runner::run_local;
