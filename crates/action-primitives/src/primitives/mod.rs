pub mod click;
pub mod drag_drop;
pub mod hover;
pub mod misc;
pub mod navigate;
pub mod scroll;
pub mod select;
pub mod type_text;
pub mod upload;
pub mod wait;
