pub mod core {
    pub mod config;
    pub mod error;
    pub mod routes;
    pub mod session;
    pub mod state;
    pub mod tracing_init;
}

pub mod api {
    pub mod client;
}

pub mod handlers {
    pub mod admin;
    pub mod entry;
    pub mod exit;
    pub mod fallback;
    pub mod health;
    pub mod home;
}

pub mod models {
    pub mod client;
    pub mod config;
    pub mod console;
    pub mod user;
}

pub mod stores {
    pub mod parking_state;
}

pub mod utils {
    pub mod auth;
}

pub mod validation {
    pub mod params;
}

pub mod workflows {
    pub mod admin;
    pub mod entry;
    pub mod exit;
}
