//! UI module - reusable rendering pieces shared by the form and its host

pub mod components;
