pub mod benchmark;

pub use benchmark::{BenchmarkReport, InstanceResult, TourBenchmark};
