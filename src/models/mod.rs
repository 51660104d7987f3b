pub mod worker;

pub use worker::{NewWorker, Precinct, Worker, WorkerPatch};
