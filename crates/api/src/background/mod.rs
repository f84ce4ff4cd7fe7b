//! Background jobs spawned from `main`.

pub mod reminder;
