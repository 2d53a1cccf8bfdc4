//! Component lifecycle: the hook trait and the host that drives it each frame

use crate::boundary::{Boundary, ErrorInfo, FaultPhase, RenderFault};
use crate::constants::FALLBACK_MESSAGE;
use crate::ui::components::fallback_view;
use eframe::egui;
use std::fmt::Debug;
use tracing::debug;

/// Hooks a hosted component can implement. Everything except state access and
/// `render` defaults to a no-op.
pub trait Component {
    type Props: Debug;
    type State: Clone + PartialEq + Debug;
    type Snapshot: Debug;
    /// Interaction reported by `render` and handled after the pass
    type Event: Debug;

    fn state(&self) -> Self::State;
    fn set_state(&mut self, state: Self::State);

    /// Called before every render. Returning `Some` replaces the current state.
    fn derive_state_from_props(_props: &Self::Props, _state: &Self::State) -> Option<Self::State> {
        None
    }

    fn render(
        &mut self,
        ui: &mut egui::Ui,
        props: &Self::Props,
    ) -> Result<Option<Self::Event>, RenderFault>;

    fn handle_event(&mut self, _ctx: &egui::Context, _event: Self::Event) -> Result<(), RenderFault> {
        Ok(())
    }

    fn did_mount(&mut self, _ctx: &egui::Context) {}

    fn should_update(&self, _props: &Self::Props, _next_state: &Self::State) -> bool {
        true
    }

    fn snapshot_before_update(
        &self,
        _prev_props: &Self::Props,
        _prev_state: &Self::State,
    ) -> Option<Self::Snapshot> {
        None
    }

    fn did_update(
        &mut self,
        _prev_props: &Self::Props,
        _prev_state: &Self::State,
        _snapshot: Option<Self::Snapshot>,
    ) {
    }

    fn will_unmount(&mut self) {}

    fn derive_state_from_error(&mut self, _fault: &RenderFault) {}

    fn did_catch(&mut self, _fault: &RenderFault, _info: &ErrorInfo) {}
}

/// Owns a component and runs its hooks in order. egui redraws every frame, so
/// `should_update` gates the update hooks rather than the redraw itself.
pub struct Host<C: Component> {
    component: C,
    props: C::Props,
    committed: Option<C::State>,
    mounted: bool,
    unmounted: bool,
    boundary: Boundary,
}

impl<C: Component> Host<C> {
    pub fn new(component: C, props: C::Props) -> Self {
        Self {
            component,
            props,
            committed: None,
            mounted: false,
            unmounted: false,
            boundary: Boundary::default(),
        }
    }

    pub fn component(&self) -> &C {
        &self.component
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted && !self.unmounted
    }

    pub fn is_faulted(&self) -> bool {
        self.boundary.is_faulted()
    }

    pub fn frame(&mut self, ui: &mut egui::Ui) {
        if self.unmounted {
            return;
        }
        if self.boundary.is_faulted() {
            fallback_view(ui, FALLBACK_MESSAGE);
            return;
        }

        let mut current = self.component.state();
        if let Some(derived) = C::derive_state_from_props(&self.props, &current) {
            self.component.set_state(derived.clone());
            current = derived;
        }

        let pending_update = match &self.committed {
            Some(prev) if *prev != current => {
                if self.component.should_update(&self.props, &current) {
                    let snapshot = self.component.snapshot_before_update(&self.props, prev);
                    Some((prev.clone(), snapshot))
                } else {
                    None
                }
            }
            _ => None,
        };

        let props = &self.props;
        let mut event = None;
        let rendered = self.boundary.guard(&mut self.component, FaultPhase::Render, |c| {
            event = c.render(ui, props)?;
            Ok(())
        });
        if !rendered {
            Self::replace_faulted_pass(ui);
            return;
        }

        if !self.mounted {
            self.mounted = true;
            debug!("Component mounted");
            self.component.did_mount(ui.ctx());
        } else if let Some((prev, snapshot)) = pending_update {
            self.component.did_update(&self.props, &prev, snapshot);
        }
        self.committed = Some(current);

        if let Some(event) = event {
            debug!(?event, "Dispatching component event");
            let ctx = ui.ctx().clone();
            if !self.dispatch(|c| c.handle_event(&ctx, event)) {
                Self::replace_faulted_pass(ui);
            }
        }
    }

    /// The component may have drawn part of itself before faulting. Throw the
    /// pass away so the frame that gets painted holds only the fallback.
    fn replace_faulted_pass(ui: &mut egui::Ui) {
        fallback_view(ui, FALLBACK_MESSAGE);
        ui.ctx().request_discard("component faulted");
        ui.ctx().request_repaint();
    }

    /// Run an event handler under the boundary. Returns false if it faulted.
    pub fn dispatch<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut C) -> Result<(), RenderFault>,
    {
        self.boundary.guard(&mut self.component, FaultPhase::Event, f)
    }

    pub fn unmount(&mut self) {
        if self.unmounted {
            return;
        }
        self.unmounted = true;
        if self.mounted {
            self.component.will_unmount();
        }
    }
}

#[cfg(test)]
pub(crate) mod recorder {
    use super::*;

    /// Records which hooks ran, in order
    #[derive(Debug, Default)]
    pub(crate) struct Recorder {
        pub value: u32,
        pub reject_updates: bool,
        pub fail_render: Option<&'static str>,
        pub panic_render: Option<&'static str>,
        pub failing_event: Option<&'static str>,
        pub renders: usize,
        pub log: Vec<&'static str>,
        pub last_update: Option<(u32, Option<u32>)>,
        pub caught_phase: Option<FaultPhase>,
        pub caught_component: Option<&'static str>,
    }

    impl Component for Recorder {
        type Props = Option<u32>;
        type State = u32;
        type Snapshot = u32;
        type Event = &'static str;

        fn state(&self) -> u32 {
            self.value
        }

        fn set_state(&mut self, state: u32) {
            self.value = state;
        }

        fn derive_state_from_props(max: &Option<u32>, state: &u32) -> Option<u32> {
            max.filter(|max| state > max)
        }

        fn render(
            &mut self,
            ui: &mut egui::Ui,
            _props: &Option<u32>,
        ) -> Result<Option<&'static str>, RenderFault> {
            self.renders += 1;
            ui.label(format!("value {}", self.value));
            if let Some(msg) = self.panic_render {
                panic!("{}", msg);
            }
            if let Some(msg) = self.fail_render {
                return Err(RenderFault::new(msg));
            }
            Ok(self.failing_event.take())
        }

        fn handle_event(&mut self, _ctx: &egui::Context, event: &'static str) -> Result<(), RenderFault> {
            self.log.push("handle_event");
            Err(RenderFault::new(event))
        }

        fn did_mount(&mut self, _ctx: &egui::Context) {
            self.log.push("did_mount");
        }

        fn should_update(&self, _props: &Option<u32>, _next: &u32) -> bool {
            !self.reject_updates
        }

        fn snapshot_before_update(&self, _props: &Option<u32>, prev: &u32) -> Option<u32> {
            Some(prev * 10)
        }

        fn did_update(&mut self, _props: &Option<u32>, prev: &u32, snapshot: Option<u32>) {
            self.log.push("did_update");
            self.last_update = Some((*prev, snapshot));
        }

        fn will_unmount(&mut self) {
            self.log.push("will_unmount");
        }

        fn derive_state_from_error(&mut self, _fault: &RenderFault) {
            self.log.push("derive_state_from_error");
        }

        fn did_catch(&mut self, _fault: &RenderFault, info: &ErrorInfo) {
            self.log.push("did_catch");
            self.caught_phase = Some(info.phase);
            self.caught_component = Some(info.component);
        }
    }
}

#[cfg(test)]
pub(crate) fn run_frame<C: Component>(ctx: &egui::Context, host: &mut Host<C>) -> egui::FullOutput {
    ctx.run(egui::RawInput::default(), |ctx| {
        egui::CentralPanel::default().show(ctx, |ui| host.frame(ui));
    })
}

/// Text of every shape painted by a frame, in paint order
#[cfg(test)]
pub(crate) fn painted_text(output: &egui::FullOutput) -> Vec<String> {
    fn collect(shape: &egui::epaint::Shape, out: &mut Vec<String>) {
        match shape {
            egui::epaint::Shape::Text(text) => out.push(text.galley.text().to_string()),
            egui::epaint::Shape::Vec(shapes) => shapes.iter().for_each(|s| collect(s, out)),
            _ => {}
        }
    }
    let mut out = Vec::new();
    for clipped in &output.shapes {
        collect(&clipped.shape, &mut out);
    }
    out
}

#[cfg(test)]
pub(crate) fn fallback_text() -> Vec<String> {
    vec![
        egui_phosphor::regular::WARNING_CIRCLE.to_string(),
        FALLBACK_MESSAGE.to_string(),
    ]
}

#[cfg(test)]
pub(crate) fn repaint_requested(output: &egui::FullOutput) -> bool {
    output
        .viewport_output
        .get(&egui::ViewportId::ROOT)
        .is_some_and(|viewport| viewport.repaint_delay.is_zero())
}

#[cfg(test)]
mod tests {
    use super::recorder::Recorder;
    use super::*;

    fn host(recorder: Recorder) -> (egui::Context, Host<Recorder>) {
        (egui::Context::default(), Host::new(recorder, None))
    }

    #[test]
    fn mounts_once() {
        let (ctx, mut host) = host(Recorder::default());
        assert!(!host.is_mounted());
        run_frame(&ctx, &mut host);
        run_frame(&ctx, &mut host);
        run_frame(&ctx, &mut host);
        assert!(host.is_mounted());
        assert_eq!(host.component().log, vec!["did_mount"]);
        assert_eq!(host.component().renders, 3);
    }

    #[test]
    fn state_change_runs_update_hooks() {
        let (ctx, mut host) = host(Recorder::default());
        run_frame(&ctx, &mut host);

        host.dispatch(|p| {
            p.value = 4;
            Ok(())
        });
        run_frame(&ctx, &mut host);
        assert_eq!(host.component().log, vec!["did_mount", "did_update"]);
        assert_eq!(host.component().last_update, Some((0, Some(0))));

        // unchanged state: no further update
        run_frame(&ctx, &mut host);
        assert_eq!(host.component().log.len(), 2);

        host.dispatch(|p| {
            p.value = 5;
            Ok(())
        });
        run_frame(&ctx, &mut host);
        assert_eq!(host.component().last_update, Some((4, Some(40))));
    }

    #[test]
    fn rejected_update_skips_hooks_but_commits() {
        let (ctx, mut host) = host(Recorder {
            reject_updates: true,
            ..Recorder::default()
        });
        run_frame(&ctx, &mut host);
        host.dispatch(|p| {
            p.value = 9;
            Ok(())
        });
        run_frame(&ctx, &mut host);
        assert_eq!(host.component().log, vec!["did_mount"]);

        host.dispatch(|p| {
            p.reject_updates = false;
            Ok(())
        });
        run_frame(&ctx, &mut host);
        assert_eq!(host.component().log, vec!["did_mount"]);
    }

    #[test]
    fn derived_state_replaces_current() {
        let ctx = egui::Context::default();
        let mut host = Host::new(
            Recorder {
                value: 50,
                ..Recorder::default()
            },
            Some(10),
        );
        run_frame(&ctx, &mut host);
        assert_eq!(host.component().value, 10);
    }

    #[test]
    fn render_fault_is_terminal() {
        let (ctx, mut host) = host(Recorder::default());
        run_frame(&ctx, &mut host);
        host.dispatch(|p| {
            p.fail_render = Some("render broke");
            Ok(())
        });
        run_frame(&ctx, &mut host);
        assert!(host.is_faulted());
        assert_eq!(host.component().renders, 2);

        host.dispatch(|p| {
            p.fail_render = None;
            Ok(())
        });
        for _ in 0..3 {
            run_frame(&ctx, &mut host);
        }
        assert_eq!(host.component().renders, 2);
        assert_eq!(
            host.component().log,
            vec!["did_mount", "derive_state_from_error", "did_catch"]
        );
        assert_eq!(host.component().caught_phase, Some(FaultPhase::Render));
    }

    #[test]
    fn render_panic_is_captured() {
        let (ctx, mut host) = host(Recorder {
            panic_render: Some("kaboom"),
            ..Recorder::default()
        });
        run_frame(&ctx, &mut host);
        assert!(host.is_faulted());
        assert!(!host.is_mounted());
        run_frame(&ctx, &mut host);
        assert_eq!(host.component().renders, 1);
    }

    #[test]
    fn event_fault_switches_to_fallback() {
        let (ctx, mut host) = host(Recorder::default());
        run_frame(&ctx, &mut host);
        assert!(!host.dispatch(|_| Err(RenderFault::new("clicked"))));
        run_frame(&ctx, &mut host);
        assert_eq!(host.component().renders, 1);
        assert_eq!(host.component().caught_phase, Some(FaultPhase::Event));
    }

    #[test]
    fn faulting_frame_paints_only_fallback() {
        let (ctx, mut host) = host(Recorder::default());
        let output = run_frame(&ctx, &mut host);
        assert_eq!(painted_text(&output), vec!["value 0".to_string()]);

        host.dispatch(|r| {
            r.fail_render = Some("render broke");
            Ok(())
        });
        let output = run_frame(&ctx, &mut host);
        assert!(host.is_faulted());
        assert_eq!(painted_text(&output), fallback_text());
        assert!(repaint_requested(&output));

        for _ in 0..2 {
            let output = run_frame(&ctx, &mut host);
            assert_eq!(painted_text(&output), fallback_text());
        }
    }

    #[test]
    fn render_panic_paints_only_fallback() {
        let (ctx, mut host) = host(Recorder {
            panic_render: Some("kaboom"),
            ..Recorder::default()
        });
        let output = run_frame(&ctx, &mut host);
        assert_eq!(painted_text(&output), fallback_text());
        assert!(repaint_requested(&output));
    }

    #[test]
    fn event_from_render_goes_through_boundary() {
        let (ctx, mut host) = host(Recorder::default());
        run_frame(&ctx, &mut host);

        host.dispatch(|r| {
            r.failing_event = Some("button broke");
            Ok(())
        });
        let output = run_frame(&ctx, &mut host);
        assert!(host.is_faulted());
        assert_eq!(host.component().caught_phase, Some(FaultPhase::Event));
        assert_eq!(
            host.component().log,
            vec!["did_mount", "handle_event", "derive_state_from_error", "did_catch"]
        );
        assert_eq!(painted_text(&output), fallback_text());
        assert!(repaint_requested(&output));

        let output = run_frame(&ctx, &mut host);
        assert_eq!(painted_text(&output), fallback_text());
        assert_eq!(host.component().renders, 2);
    }

    #[test]
    fn unmount_runs_once() {
        let (ctx, mut host) = host(Recorder::default());
        run_frame(&ctx, &mut host);
        host.unmount();
        host.unmount();
        assert!(!host.is_mounted());
        assert_eq!(host.component().log, vec!["did_mount", "will_unmount"]);
    }

    #[test]
    fn unmount_before_mount_skips_hook() {
        let (_ctx, mut host) = host(Recorder::default());
        host.unmount();
        assert!(host.component().log.is_empty());
    }
}
