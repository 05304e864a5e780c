pub mod downloader;
pub mod ytdlp;
