pub mod detail_dto;
pub mod profile_link_dto;
