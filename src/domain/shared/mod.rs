pub mod tier;
pub mod usage_dto;
