pub mod backend;
pub mod held_gateway;
