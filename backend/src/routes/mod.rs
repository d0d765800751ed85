pub mod demand;
pub mod landing;
pub mod patterns;
pub mod usage;
