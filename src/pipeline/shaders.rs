pub mod debug_vector;
pub mod lit;
pub mod unlit;
