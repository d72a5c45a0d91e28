pub mod edit_buffer;
pub mod unicode;
