#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use eframe::egui;
use egui::{Pos2, Vec2, pos2, vec2};
use egui_draggable::{
    DragHandle, DragHooks, DragOptions, DragOutcome, DragRegistry, ElementId, InputEvent, Limit,
    RegistryOptions, Scene, SceneStyle, SnapOffset, TargetSet,
};

#[derive(Default)]
struct StatusHooks {
    status: String,
}

impl DragHooks for StatusHooks {
    fn on_drag_start(&mut self, element: ElementId) {
        self.status = format!("dragging element {}", element.0);
    }

    fn on_drag_end(&mut self, _element: ElementId, outcome: &DragOutcome) {
        self.status = match outcome {
            DragOutcome::Dropped { position } => format!("dropped at {position:?}"),
            DragOutcome::Snapped { key, .. } => format!("docked into {key}"),
            DragOutcome::Returned { .. } => "no target, going back".to_owned(),
        };
    }

    fn on_target_enter(&mut self, key: &str) {
        self.status = format!("release to dock into {key}");
    }
}

struct App {
    scene: Scene,
    registry: DragRegistry,
    handles: Vec<DragHandle>,
    hooks: StatusHooks,
    style: SceneStyle,
}

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_title("egui_draggable demo"),
        ..Default::default()
    };

    eframe::run_native(
        "egui_draggable demo",
        options,
        Box::new(|_cc| Ok(Box::new(App::default()))),
    )
}

impl Default for App {
    fn default() -> Self {
        let mut scene = Scene::new(vec2(900.0, 560.0));
        let root = scene.root();

        let stage = scene.add_element(root, "#stage", pos2(20.0, 20.0), vec2(420.0, 320.0));
        let card = scene.add_element(stage, "#card", pos2(40.0, 40.0), vec2(80.0, 50.0));
        let token = scene.add_element(root, "#token", pos2(480.0, 60.0), Vec2::splat(60.0));
        scene.add_element(root, "#slot-a", pos2(480.0, 300.0), Vec2::splat(100.0));
        scene.add_element(root, "#slot-b", pos2(620.0, 300.0), Vec2::splat(100.0));

        let mut registry = DragRegistry::new(RegistryOptions {
            debug_event_log: true,
            ..Default::default()
        });
        let mut handles = Vec::new();

        let free = DragOptions::free().with_limit(Limit {
            top: 0.0,
            left: 0.0,
            width: 420.0,
            height: 320.0,
        });
        let once = DragOptions::snap_to(
            TargetSet::new()
                .with("#slot-a", SnapOffset::default())
                .with(
                    "#slot-b",
                    SnapOffset {
                        top: 20.0,
                        left: 20.0,
                    },
                ),
        );
        for (element, options) in [(card, &free), (token, &once)] {
            match registry.activate(&mut scene, element, options) {
                Ok(handle) => handles.push(handle),
                Err(err) => log::error!("failed to make {element:?} draggable: {err}"),
            }
        }

        Self {
            scene,
            registry,
            handles,
            hooks: StatusHooks::default(),
            style: SceneStyle::default(),
        }
    }
}

fn into_scene_space(event: InputEvent, origin: Vec2) -> InputEvent {
    let local = |pos: Pos2| pos - origin;
    match event {
        InputEvent::PointerDown(pos) => InputEvent::PointerDown(local(pos)),
        InputEvent::PointerMove(pos) => InputEvent::PointerMove(local(pos)),
        InputEvent::PointerUp(pos) => InputEvent::PointerUp(local(pos)),
        InputEvent::TransitionEnd(element) => InputEvent::TransitionEnd(element),
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("egui_draggable_demo_help").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Release all").clicked() {
                    for handle in self.handles.drain(..) {
                        self.registry.cancel(&mut self.scene, handle);
                    }
                }
                if ui.button("Reset").clicked() {
                    *self = Self::default();
                }
                ui.add(
                    egui::Label::new(
                        "Drag the card inside its stage. Drag the token into a slot, \
                         or release it anywhere else to send it back.",
                    )
                    .selectable(false),
                );
            });
            ui.label(&self.hooks.status);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let origin = ui.max_rect().min.to_vec2();

            for event in ctx.input(egui_draggable::collect_input_events) {
                self.registry.dispatch(
                    &mut self.scene,
                    &mut self.hooks,
                    into_scene_space(event, origin),
                );
            }

            let dt = ctx.input(|i| i.stable_dt);
            let ended = self.scene.advance(dt);
            for element in ended {
                self.registry.dispatch(
                    &mut self.scene,
                    &mut self.hooks,
                    InputEvent::TransitionEnd(element),
                );
            }

            egui_draggable::paint_scene(ui.painter(), &self.scene, origin, &self.style);

            ui.collapsing("Event log", |ui| {
                ui.label(self.registry.debug_log_text());
            });
        });

        ctx.request_repaint();
    }
}
