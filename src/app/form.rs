//! The form component: two fields, a stubbed async submit and a fault trigger

use crate::boundary::{ErrorInfo, RenderFault};
use crate::constants::SIMULATED_FAULT_MESSAGE;
use crate::lifecycle::Component;
use crate::theme;
use crate::types::*;
use crate::ui::components::{error_line, labeled_input, loading_line, submitted_card};
use eframe::egui;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

fn lock(state: &Mutex<FormState>) -> MutexGuard<'_, FormState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Stubbed data fetch started on mount. Resolves to true if the timer fired.
struct MountFetch {
    token: CancellationToken,
    handle: JoinHandle<bool>,
}

/// Button presses reported by `render` and handled by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Submit,
    SimulateFault,
}

pub struct FormComponent {
    state: Arc<Mutex<FormState>>,
    runtime: Handle,
    submit_delay: Duration,
    mount_fetch_delay: Duration,
    mount_fetch: Option<MountFetch>,
}

impl FormComponent {
    pub fn new(runtime: Handle, submit_delay: Duration, mount_fetch_delay: Duration) -> Self {
        info!(phase = 1, "Constructor called");
        Self {
            state: Arc::new(Mutex::new(FormState::default())),
            runtime,
            submit_delay,
            mount_fetch_delay,
            mount_fetch: None,
        }
    }

    pub fn update_field(&self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        trace!(%field, len = value.len(), "Field updated");
        lock(&self.state).values.set(field, value);
    }

    /// Enter the loading state and validate whatever the fields hold once the
    /// delay elapses. Earlier submissions are left running.
    pub fn submit(&self, ctx: &egui::Context) -> JoinHandle<()> {
        info!("Form submitted");
        lock(&self.state).loading = true;

        let state = Arc::clone(&self.state);
        let ctx = ctx.clone();
        let delay = self.submit_delay;
        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut s = lock(&state);
                let outcome = match s.values.validate() {
                    Ok(data) => {
                        info!(name = %data.name, email = %data.email, "Submission accepted");
                        SubmitOutcome::Submitted(data)
                    }
                    Err(e) => {
                        warn!(error = %e, "Submission rejected");
                        SubmitOutcome::Rejected(e)
                    }
                };
                s.outcome = Some(outcome);
                s.loading = false;
            }
            ctx.request_repaint();
        })
    }

    /// Always fails; the host's boundary is expected to catch it.
    pub fn trigger_fault(&self) -> Result<(), RenderFault> {
        warn!("Simulating render fault");
        Err(RenderFault::new(SIMULATED_FAULT_MESSAGE))
    }

    fn render_form(&self, ui: &mut egui::Ui, values: &FormValues) -> Option<FormEvent> {
        let mut event = None;
        let mut submit_on_enter = false;

        for (field, hint) in [(FormField::Name, "Your name"), (FormField::Email, "you@example.com")] {
            let mut value = values.get(field).to_string();
            let response = labeled_input(ui, field.label(), &mut value, hint);
            if response.changed() {
                self.update_field(field, value);
            }
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submit_on_enter = true;
            }
        }

        ui.add_space(theme::SPACING_MD);
        ui.horizontal(|ui| {
            let submit = ui.add(theme::button_accent(format!(
                "{}  Submit",
                egui_phosphor::regular::PAPER_PLANE_TILT
            )));
            ui.add_space(theme::SPACING_MD);
            let fault = ui.add(theme::button_danger(format!(
                "{}  Simulate Error",
                egui_phosphor::regular::BUG
            )));
            if submit.clicked() || submit_on_enter {
                event = Some(FormEvent::Submit);
            }
            if fault.clicked() {
                event = Some(FormEvent::SimulateFault);
            }
        });

        event
    }
}

impl Component for FormComponent {
    type Props = FormProps;
    type State = FormState;
    type Snapshot = ();
    type Event = FormEvent;

    fn state(&self) -> FormState {
        lock(&self.state).clone()
    }

    fn set_state(&mut self, state: FormState) {
        *lock(&self.state) = state;
    }

    fn derive_state_from_props(_props: &FormProps, _state: &FormState) -> Option<FormState> {
        trace!(phase = 2, "derive_state_from_props called");
        None
    }

    fn render(&mut self, ui: &mut egui::Ui, props: &FormProps) -> Result<Option<FormEvent>, RenderFault> {
        let state = self.state();

        ui.label(
            egui::RichText::new(&props.title)
                .size(theme::FONT_TITLE)
                .strong()
                .color(theme::TEXT_PRIMARY),
        );
        ui.add_space(theme::SPACING_LG);

        let event = if state.loading {
            loading_line(ui);
            None
        } else {
            self.render_form(ui, &state.values)
        };

        ui.add_space(theme::SPACING_LG);
        if let Some(data) = state.submitted() {
            submitted_card(ui, data);
        }
        if let Some(err) = state.error() {
            error_line(ui, err);
        }
        Ok(event)
    }

    fn handle_event(&mut self, ctx: &egui::Context, event: FormEvent) -> Result<(), RenderFault> {
        match event {
            FormEvent::Submit => {
                self.submit(ctx);
                Ok(())
            }
            FormEvent::SimulateFault => self.trigger_fault(),
        }
    }

    fn did_mount(&mut self, ctx: &egui::Context) {
        info!(phase = 4, "did_mount called");

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let delay = self.mount_fetch_delay;
        let ctx = ctx.clone();
        let handle = self.runtime.spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {
                    debug!("Simulated data fetch cancelled");
                    false
                }
                _ = tokio::time::sleep(delay) => {
                    info!("Simulated data fetch completed");
                    ctx.request_repaint();
                    true
                }
            }
        });
        self.mount_fetch = Some(MountFetch { token, handle });
    }

    fn should_update(&self, _props: &FormProps, next_state: &FormState) -> bool {
        debug!(phase = 5, loading = next_state.loading, "should_update called");
        true
    }

    fn snapshot_before_update(&self, _prev_props: &FormProps, prev_state: &FormState) -> Option<()> {
        debug!(phase = 7, ?prev_state, "snapshot_before_update called");
        None
    }

    fn did_update(&mut self, _prev_props: &FormProps, prev_state: &FormState, snapshot: Option<()>) {
        debug!(phase = 8, ?prev_state, ?snapshot, "did_update called");
    }

    fn will_unmount(&mut self) {
        info!(phase = 9, "will_unmount called");
        if let Some(fetch) = &self.mount_fetch {
            if !fetch.handle.is_finished() {
                fetch.token.cancel();
            }
        }
    }

    fn derive_state_from_error(&mut self, fault: &RenderFault) {
        info!(error = %fault, "derive_state_from_error called");
    }

    fn did_catch(&mut self, fault: &RenderFault, info: &ErrorInfo) {
        info!(error = %fault, component = info.component, phase = %info.phase, "did_catch called");
    }
}
