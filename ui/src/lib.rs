//! Shared UI crate for DataNarrator: the pipeline and conversation machines,
//! report assembly, and the views both launchers render.

pub mod chat;
pub mod core;
pub mod i18n;
pub mod pipeline;
pub mod report;
pub mod stats;
pub mod views;

pub mod components {
    // Localized application navbar (components/app_navbar.rs)
    pub mod app_navbar;
    pub use app_navbar::register_nav;
    pub use app_navbar::AppNavbar;
    pub use app_navbar::NavBuilder;
}

#[cfg(test)]
mod test_support;
