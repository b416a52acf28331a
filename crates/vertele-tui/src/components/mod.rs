pub mod channel_list;
pub mod help_overlay;
pub mod notice;
