#![allow(unused_crate_dependencies)]

#[path = "integration/common/mod.rs"]
mod common;

#[path = "integration/workflow.rs"]
mod workflow;

#[path = "integration/auto_save.rs"]
mod auto_save;
