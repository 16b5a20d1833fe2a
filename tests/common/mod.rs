pub mod synthetic_corridor;
