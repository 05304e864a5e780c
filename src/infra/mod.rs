pub mod episode_page;
pub mod itunes;
pub mod web_search;
