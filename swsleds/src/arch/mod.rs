//! Architecture-specific boot and exception glue.

pub mod arm;
