pub mod attendance;
pub mod career;
pub mod contact;
pub mod document;
pub mod education;
pub mod employee;
pub mod handbook;
pub mod leave_request;
pub mod product;
pub mod resource;
pub mod task;
pub mod team_member;
