mod http_server;

pub use http_server::serve_web;
