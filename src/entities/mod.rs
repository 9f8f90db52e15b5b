// content service
pub mod actor;
pub mod cast_member;
pub mod content;
pub mod director;
pub mod dub_set;
pub mod episode;
pub mod genre;
pub mod season;
pub mod subtitle_set;

// user service
pub mod subscription_plan;
pub mod user;

// interaction service
pub mod catalog_entry;
pub mod history;
pub mod like;
pub mod recommendation;
pub mod trending;
