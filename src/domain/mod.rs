pub mod category;
pub mod dashboard;
pub mod order;
pub mod product;
