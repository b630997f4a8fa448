// Batch pipelines — multi-author operations built on the core engine.

pub mod scan;
