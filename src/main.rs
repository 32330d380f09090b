#![allow(warnings)]
//! Team Board Frontend Entry Point

mod api;
mod app;
mod board;
mod components;
mod config;
mod context;
mod error;
mod forms;
mod models;
mod pages;
mod realtime;
mod routes;
mod scope;
mod session;
mod storage;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = rolling_logger::init_logger("TeamBoard", rolling_logger::DEFAULT_CAPACITY) {
        web_sys::console::warn_1(&format!("Logger already installed: {}", e).into());
    }
    log::info!("Team Board starting");
    mount_to_body(App);
}
