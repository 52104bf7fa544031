use glam::DVec3;
use log::{error, info};
use three_d::{
    AmbientLight, Camera, ClearState, Context, DirectionalLight, FrameInput, FrameOutput, GUI,
    PhysicalPoint, Srgba, Vec3, Viewport, degrees,
    window::{Window, WindowSettings},
};

use self::{
    camera::{CameraController, DEFAULT_LOOK_AT, DEFAULT_POSITION, control::OrbitControl},
    cfg::Settings,
    controls::ControlSurface,
    gfx::{
        picking::{PickSphere, pick_body, ray_sphere},
        scene::Scene,
        to_dmat4, to_dvec3, to_vec3,
    },
    gui::{Overlay, UiState},
    input::PointerState,
    sim::system::{Id, SolarSystem},
};

mod assets;
mod camera;
mod cfg;
mod controls;
mod gfx;
mod gui;
mod input;
mod keybinds;
mod logging;
mod sim;
mod theme;
#[cfg(target_family = "wasm")]
mod web;

const FIELD_OF_VIEW_DEGREES: f32 = 45.0;
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 5000.0;

pub(crate) struct Program {
    window: Option<Window>,
    camera: Camera,
    control: OrbitControl,
    controller: CameraController,
    gui: GUI,
    ui_state: UiState,
    pointer: PointerState,
    hovered: Option<Id>,

    top_light: DirectionalLight,
    ambient_light: AmbientLight,

    controls: ControlSurface,
    system: SolarSystem,
    scene: Scene,
}

impl Program {
    fn new_window() -> Window {
        let res = Window::new(WindowSettings {
            title: "3D Solar System".into(),
            min_size: (64, 64),
            ..Default::default()
        });
        match res {
            Ok(w) => w,
            Err(e) => {
                if cfg!(target_family = "wasm") {
                    panic!("Error when creating window: {e}");
                } else {
                    error!("Error when creating window: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
    fn new_camera(viewport: Viewport) -> Camera {
        Camera::new_perspective(
            viewport,
            to_vec3(DEFAULT_POSITION),
            to_vec3(DEFAULT_LOOK_AT),
            Vec3::unit_y(),
            degrees(FIELD_OF_VIEW_DEGREES),
            NEAR_PLANE,
            FAR_PLANE,
        )
    }
    fn new_dir_light(context: &Context) -> DirectionalLight {
        DirectionalLight::new(context, 1.0, Srgba::WHITE, Vec3::new(0.0, -0.5, -0.5))
    }
    fn new_ambient_light(context: &Context) -> AmbientLight {
        AmbientLight::new(context, 0.4, Srgba::new_opaque(0x88, 0x88, 0xff))
    }

    pub(crate) fn new(settings: Settings) -> Self {
        let window = Self::new_window();
        let context = window.gl();
        let camera = Self::new_camera(window.viewport());
        let control = OrbitControl::around(&camera, DEFAULT_LOOK_AT);
        let gui = gui::create(&context);

        let controls = ControlSurface::new(settings.initial_speeds(), settings.theme);
        let system = sim::create_system();
        let scene = Scene::new(&context, &system, controls.theme());

        info!(
            "created {} bodies, camera interpolation {}",
            system.get_bodies().len(),
            settings.interpolation
        );

        Self {
            window: Some(window),
            top_light: Self::new_dir_light(&context),
            ambient_light: Self::new_ambient_light(&context),
            camera,
            control,
            controller: CameraController::new(settings.interpolation),
            gui,
            ui_state: UiState::new(settings.show_fps),
            pointer: PointerState::default(),
            hovered: None,
            controls,
            system,
            scene,
        }
    }

    pub(crate) fn run(mut self) {
        if let Some(window) = self.window.take() {
            window.render_loop(move |frame_input| self.tick(frame_input));
        }
    }

    /// The body under a pixel, unless the sun is in front of it.
    fn pick(&self, pixel: PhysicalPoint) -> Option<Id> {
        let origin = to_dvec3(self.camera.position_at_pixel(pixel));
        let direction = to_dvec3(self.camera.view_direction_at_pixel(pixel));

        let spheres = self
            .system
            .get_bodies()
            .iter()
            .enumerate()
            .map(|(id, body)| PickSphere {
                id,
                center: body.transform().position,
                radius: body.radius,
            });
        let id = pick_body(origin, direction, spheres)?;

        let body = self.system.get_body(id)?;
        let body_hit = ray_sphere(origin, direction, body.transform().position, body.radius)?;
        match ray_sphere(origin, direction, DVec3::ZERO, self.system.sun().radius) {
            Some(sun_hit) if sun_hit < body_hit => None,
            _ => Some(id),
        }
    }

    fn tick(&mut self, mut frame_input: FrameInput) -> FrameOutput {
        let dt = frame_input.elapsed_time / 1000.0;
        self.camera.set_viewport(frame_input.viewport);

        let overlay = Overlay {
            system: &self.system,
            arcs: self.scene.arcs(),
            view_projection: to_dmat4(self.camera.projection() * self.camera.view()),
            hovered: self.hovered,
        };
        gui::update(
            &mut self.gui,
            &mut self.ui_state,
            &mut self.controls,
            &overlay,
            &mut frame_input.events,
            frame_input.accumulated_time,
            frame_input.viewport,
            frame_input.device_pixel_ratio,
            frame_input.elapsed_time,
        );

        let click = self.pointer.handle_events(&frame_input.events);
        self.hovered = self.pointer.hover().and_then(|pixel| self.pick(pixel));
        if let Some(id) = click.and_then(|pixel| self.pick(pixel))
            && let Some(position) = self.system.get_body_position(id)
        {
            self.controls.focus_body(id, position);
        }

        keybinds::handle_keybinds(
            &mut self.controls,
            &self.system,
            &mut frame_input.events,
            &self.gui,
        );

        self.system.tick(dt, &self.controls.frame_params());

        if let Some(anchor) = self
            .controller
            .apply_commands(self.controls.take_camera_commands())
        {
            self.control.anchor = anchor;
        }
        match self.controller.step(to_dvec3(self.camera.position()), dt) {
            Some(update) => {
                self.camera.set_view(
                    to_vec3(update.position),
                    to_vec3(update.look_at),
                    Vec3::unit_y(),
                );
                if let Some(anchor) = update.anchor {
                    self.control.sync(&mut self.camera, anchor);
                }
            }
            None => self.control.handle_events(
                &mut self.camera,
                &mut frame_input.events,
                frame_input.elapsed_time,
            ),
        }

        let theme = self.controls.theme();
        self.scene
            .update(&self.system, to_dvec3(self.camera.position()), theme);

        let clear = theme.clear_color();
        let render_result = frame_input
            .screen()
            .clear(ClearState::color_and_depth(
                clear.r as f32 / 255.0,
                clear.g as f32 / 255.0,
                clear.b as f32 / 255.0,
                1.0,
                1.0,
            ))
            .render(
                &self.camera,
                self.scene.objects(),
                &[&self.top_light, &self.ambient_light],
            )
            .write(|| self.gui.render());

        if let Err(e) = render_result {
            error!("failed to render GUI: {e}");
        }

        FrameOutput::default()
    }
}

/// Loads settings, opens the window and runs until it closes.
pub fn run() {
    logging::init();
    let settings = cfg::load();
    Program::new(settings).run();
}
