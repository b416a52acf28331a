pub mod filter_input;
pub mod pane_chrome;
pub mod popup;
pub mod scrollable_list;
pub mod status_bar;
pub mod tab_bar;
pub mod toast;
