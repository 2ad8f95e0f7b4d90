pub mod header;
pub mod start_button;
pub mod loading_panel;
pub mod search_box;
pub mod contact_table;
pub mod bundle_summary;
pub mod error_panel;
