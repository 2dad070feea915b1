pub mod animation;
pub mod config;
pub mod contact;
pub mod i18n;
pub mod news;
pub mod retry;
pub mod security;
pub mod server;
pub mod storage;
