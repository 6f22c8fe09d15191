pub mod error_dto;
pub mod recipe_dto;
