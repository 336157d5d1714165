pub mod card;
pub mod hints;
pub mod money;
pub mod status;
pub mod tabs;
