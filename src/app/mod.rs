//! App module - owns the runtime, the hosted form and the persisted settings

mod form;

pub use form::FormComponent;

use crate::lifecycle::Host;
use crate::settings::Settings;
use crate::theme;
use crate::types::FormProps;
use eframe::egui;
use std::path::PathBuf;
use tracing::info;

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) host: Host<FormComponent>,
    pub(crate) settings: Settings,
    pub(crate) data_dir: PathBuf,
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    // Declared last: dropped after the host
    pub(crate) runtime: tokio::runtime::Runtime,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        data_dir: PathBuf,
    ) -> std::io::Result<Self> {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Phosphor icons for the buttons
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let runtime = tokio::runtime::Runtime::new()?;
        let component = FormComponent::new(
            runtime.handle().clone(),
            settings.submit_delay(),
            settings.mount_fetch_delay(),
        );
        info!(
            submit_delay_ms = settings.submit_delay_ms,
            mount_fetch_delay_ms = settings.mount_fetch_delay_ms,
            "Form component created"
        );

        Ok(Self {
            host: Host::new(component, FormProps::default()),
            settings,
            data_dir,
            window_pos: None,
            window_size: None,
            needs_center: false,
            runtime,
        })
    }

    pub fn save_settings(&mut self) {
        self.settings.window_x = self.window_pos.map(|p| p.x);
        self.settings.window_y = self.window_pos.map(|p| p.y);
        self.settings.window_w = self.window_size.map(|s| s.x);
        self.settings.window_h = self.window_size.map(|s| s.y);
        self.settings.save(&self.data_dir);
    }
}
