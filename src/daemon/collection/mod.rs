pub mod attribution;
pub mod identity;
pub mod sampler;
