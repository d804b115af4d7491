//! UI Module - egui integration and AppController
//!
//! Handles the interface between the data pipeline and the egui frontend.
//! `controller` holds all state transitions and stays free of egui types;
//! `app`, `charts` and `widgets` only draw what the controller exposes.

pub mod controller;
pub mod app;
pub mod charts;
pub mod widgets;

pub use controller::{AppController, DisplayState};
pub use app::{AppUI, UIState};
