pub mod upload;

pub use upload::FoodUpload;
