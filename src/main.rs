// src/main.rs
use nannou::prelude::*;
use rand::Rng;
use std::time::Instant;

use fieldwall::{
    config::Config,
    content::{AssignmentMode, AxisDirection, ContentOptions},
    controllers::{OscController, WallCommand},
    layout::LayoutId,
    models::{load_items, ContentItem, GridKey},
    physics::SimpleWorld,
    utilities::Tint,
    ContentWall,
};

// simple pinhole camera looking down -z
struct Projection {
    camera_z: f32,
    focal: f32,
}

impl Projection {
    fn fit(wall: &ContentWall<SimpleWorld>, window_height: f32) -> Self {
        let context = wall.engine().context();
        let extent = (wall.shape().columns.max(wall.shape().rows) as f32 * context.pitch()).max(1.0);
        let camera_z = extent * 1.6 + 4.0;
        Self {
            camera_z,
            focal: window_height * 0.42 * camera_z / (extent * 0.5 + 1.0),
        }
    }

    fn scale_at(&self, z: f32) -> Option<f32> {
        let depth = self.camera_z - z;
        (depth > 0.1).then(|| self.focal / depth)
    }

    fn project(&self, p: glam::Vec3) -> Option<(Point2, f32)> {
        let s = self.scale_at(p.z)?;
        Some((pt2(p.x * s, p.y * s), s))
    }

    // screen point back onto the plane z = `z`
    fn unproject(&self, screen: Point2, z: f32) -> Option<glam::Vec3> {
        let s = self.scale_at(z)?;
        Some(glam::Vec3::new(screen.x / s, screen.y / s, z))
    }
}

struct Model {
    // Core components:
    wall: ContentWall<SimpleWorld>,
    projection: Projection,
    morph_duration: f32,

    // Comms components:
    osc_controller: OscController,

    // Interaction
    dragging: Option<GridKey>,
    random: rand::rngs::ThreadRng,

    // FPS
    last_update: Instant,
    fps: f32,

    // Message
    debug_flag: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    nannou::app(model).update(update).run();
}

fn model(app: &App) -> Model {
    // Load config
    let config = Config::load().expect("Failed to load config file");

    // Load content, or fall back to a generated set
    let content_path = config.resolve_content_path();
    let items = match load_items(&content_path) {
        Ok(items) => items,
        Err(e) => {
            log::warn!("{}: {}, using demo content", content_path.display(), e);
            demo_items(48)
        }
    };

    // Create OSC controller
    let osc_controller =
        OscController::new(config.osc.rx_port).expect("Failed to create OSC Controller");

    // Create window
    app.new_window()
        .title("fieldwall 0.1.0")
        .size(config.window.width, config.window.height)
        .view(view)
        .key_pressed(key_pressed)
        .mouse_pressed(mouse_pressed)
        .mouse_released(mouse_released)
        .mouse_moved(mouse_moved)
        .build()
        .expect("Failed to create window");

    let mut wall = ContentWall::new(
        config.layout_context(),
        config.layout.initial,
        config.wall_settings(),
        SimpleWorld::new(config.physics),
    );
    wall.rebuild(config.grid.size, config.grid.tile_count);
    wall.set_content(items, config.content.clone());

    let projection = Projection::fit(&wall, config.window.height as f32);

    Model {
        wall,
        projection,
        morph_duration: config.layout.morph_duration,
        osc_controller,
        dragging: None,
        random: rand::thread_rng(),
        last_update: Instant::now(),
        fps: 0.0,
        debug_flag: false,
    }
}

fn demo_items(count: usize) -> Vec<ContentItem> {
    const DAYS: [&str; 5] = ["2024-03-01", "2024-03-02", "2024-03-03", "2024-03-04", "2024-03-05"];
    const ASPECTS: [f32; 4] = [1.0, 1.5, 0.75, 1.25];
    (0..count)
        .map(|i| {
            ContentItem::new(format!("demo-{:03}", i), format!("Demo item {}", i + 1))
                .with_sort_value((count - i) as f64)
                .with_axis_value("publishedDay", DAYS[(i * 7) % DAYS.len()])
                .with_aspect(ASPECTS[i % ASPECTS.len()])
        })
        .collect()
}

// ******************************* Input *****************************

fn key_pressed(app: &App, model: &mut Model, key: Key) {
    let layout_keys = [
        Key::Key1,
        Key::Key2,
        Key::Key3,
        Key::Key4,
        Key::Key5,
        Key::Key6,
        Key::Key7,
    ];
    if let Some(index) = layout_keys.iter().position(|k| *k == key) {
        model
            .wall
            .start_morph_to(LayoutId::ALL[index], model.morph_duration);
        return;
    }

    match key {
        Key::P => toggle_physics(model),
        Key::M => {
            let mut options = model.wall.content_options().clone();
            options.layout.mode = match options.layout.mode {
                AssignmentMode::Matrix => AssignmentMode::Axis,
                AssignmentMode::Axis => AssignmentMode::Matrix,
            };
            log::info!("content mode: {:?}", options.layout.mode);
            model.wall.set_content_options(options);
        }
        Key::Space => {
            let shape = model.wall.shape();
            if !shape.is_empty() {
                let index = model.random.gen_range(0..shape.total);
                let key = shape.key_of(fieldwall::models::CellId(index));
                model.wall.trigger_ripple(key);
            }
        }
        Key::D => model.debug_flag = !model.debug_flag,
        Key::F => model.projection = Projection::fit(&model.wall, app.window_rect().h()),
        _ => (),
    }
}

fn toggle_physics(model: &mut Model) {
    if model.wall.physics_enabled() {
        if let Some(key) = model.dragging.take() {
            model.wall.end_drag(key);
        }
        model.wall.disable_physics();
    } else {
        model.wall.enable_physics();
    }
}

// nearest cell whose projected tile contains the pointer
fn pick(model: &Model, point: Point2) -> Option<GridKey> {
    model
        .wall
        .cell_poses()
        .filter_map(|pose| {
            let (centre, s) = model.projection.project(pose.transform.translation)?;
            let half_w = pose.footprint.width * pose.transform.scale * s * 0.5;
            let half_h = pose.footprint.height * pose.transform.scale * s * 0.5;
            let inside = (point.x - centre.x).abs() <= half_w && (point.y - centre.y).abs() <= half_h;
            inside.then_some((pose.key, pose.transform.translation.z))
        })
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key)
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    let point = app.mouse.position();
    let picked = pick(model, point);
    match button {
        MouseButton::Left => match picked {
            Some(key) if model.wall.physics_enabled() && model.wall.begin_drag(key) => {
                model.dragging = Some(key);
            }
            Some(key) if model.wall.selected() == Some(key) => {
                model.wall.select_cell(None);
            }
            other => {
                model.wall.select_cell(other);
            }
        },
        MouseButton::Right => {
            if let Some(key) = picked {
                model.wall.trigger_ripple(key);
            }
        }
        _ => (),
    }
}

fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    let Some(key) = model.dragging else { return };
    let Some(z) = model.wall.cell(key).map(|cell| cell.current.translation.z) else {
        return;
    };
    if let Some(point) = model.projection.unproject(pos, z) {
        model.wall.update_drag(key, point);
    }
}

fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        if let Some(key) = model.dragging.take() {
            model.wall.end_drag(key);
        }
    }
}

// ******************************* OSC *****************************

fn launch_commands(model: &mut Model) {
    for command in model.osc_controller.take_commands() {
        match command {
            WallCommand::Select(key) => {
                model.wall.select_cell(Some(key));
            }
            WallCommand::Deselect => {
                model.wall.select_cell(None);
            }
            WallCommand::Ripple(key) => {
                model.wall.trigger_ripple(key);
            }
            WallCommand::Morph { layout, duration } => {
                model.wall.start_morph_to(layout, duration);
            }
            WallCommand::JumpTo(layout) => {
                model.wall.jump_to(layout);
            }
            WallCommand::Physics(enabled) => {
                if enabled != model.wall.physics_enabled() {
                    toggle_physics(model);
                }
            }
            WallCommand::Rebuild { size, tiles } => {
                model.dragging = None;
                model.wall.rebuild(size, tiles);
            }
            WallCommand::ContentMode(mode) => {
                let mut options: ContentOptions = model.wall.content_options().clone();
                options.layout.mode = mode;
                model.wall.set_content_options(options);
            }
            WallCommand::ContentRepeat(repeat) => {
                let mut options = model.wall.content_options().clone();
                options.repeat_content = repeat;
                model.wall.set_content_options(options);
            }
        }
    }
}

// ******************************* Frame *****************************

fn update(app: &App, model: &mut Model, _update: Update) {
    let now = Instant::now();
    let dt = (now - model.last_update).as_secs_f32();
    model.last_update = now;
    // FPS calculation
    if model.debug_flag && dt > 0.0 {
        model.fps = 1.0 / dt;
    }

    // Process OSC messages
    model.osc_controller.process_messages();
    launch_commands(model);

    /*********************  Main update method for the wall **********************/
    model.wall.backend_mut().advance(dt);
    model.wall.update(dt, app.time);
    /*****************************************************************************/
}

// Draw the state of Model into the given Frame
fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    // back to front
    let mut poses: Vec<_> = model.wall.cell_poses().collect();
    poses.sort_by(|a, b| a.transform.translation.z.total_cmp(&b.transform.translation.z));

    let selected = model.wall.selected();
    for pose in &poses {
        let Some((centre, s)) = model.projection.project(pose.transform.translation) else {
            continue;
        };
        let (yaw, _, roll) = pose.transform.rotation.to_euler(glam::EulerRot::YXZ);
        let w = pose.footprint.width * pose.transform.scale * s * yaw.cos().abs();
        let h = pose.footprint.height * pose.transform.scale * s;
        let tint = pose
            .content
            .and_then(|index| model.wall.items().get(index))
            .map_or(Tint::neutral(), |item| Tint::for_id(&item.id));
        let tint = if selected == Some(pose.key) {
            tint.highlighted(0.25)
        } else {
            tint
        };

        draw.rect()
            .xy(centre)
            .w_h(w, h)
            .rotate(roll)
            .color(tint.color);
    }

    draw_axis_labels(&draw, model);
    draw_selection_info(&draw, app, model);

    if model.debug_flag {
        for (_, anchor) in model.wall.anchor_positions() {
            if let Some((p, _)) = model.projection.project(anchor) {
                draw.ellipse().xy(p).radius(3.0).color(RED);
            }
        }
        let win = app.window_rect();
        let layout = match model.wall.engine().next_layout() {
            Some(next) => format!(
                "{} -> {} ({:.0}%)",
                model.wall.engine().current_layout(),
                next,
                model.wall.engine().progress() * 100.0
            ),
            None => model.wall.engine().current_layout().to_string(),
        };
        let text = format!(
            "FPS: {:.1}\nlayout: {}\nphysics: {} ({} unbacked)",
            model.fps,
            layout,
            model.wall.physics_enabled(),
            model.wall.unbacked_cells()
        );
        draw.text(&text)
            .x_y(win.left() + 110.0, win.top() - 40.0)
            .color(RED);
    }

    if let Err(e) = draw.to_frame(app, &frame) {
        log::error!("draw failed: {:?}", e);
    }
}

fn draw_axis_labels(draw: &Draw, model: &Model) {
    let axis = model.wall.label_axis();
    for (index, label) in model.wall.axis_labels().iter().enumerate() {
        if label.label.is_empty() {
            continue;
        }
        let key = match axis {
            AxisDirection::Rows => GridKey::new(0, index),
            AxisDirection::Columns => GridKey::new(index, 0),
        };
        let Some(cell) = model.wall.cell(key) else { continue };
        let Some((p, s)) = model.projection.project(cell.current.translation) else {
            continue;
        };
        let offset = match axis {
            AxisDirection::Rows => vec2(-cell.footprint.width * s - 40.0, 0.0),
            AxisDirection::Columns => vec2(0.0, cell.footprint.height * s + 20.0),
        };
        draw.text(&format!("{} ({})", label.label, label.count))
            .xy(p + offset)
            .color(GRAY);
    }
}

fn draw_selection_info(draw: &Draw, app: &App, model: &Model) {
    let Some(info) = model.wall.selection_info() else {
        return;
    };
    let win = app.window_rect();
    let text = match info.item {
        Some(item) => format!(
            "{}\n{}\n[{}, {}]",
            item.title, item.summary, info.key.column, info.key.row
        ),
        None => format!("(empty)\n[{}, {}]", info.key.column, info.key.row),
    };
    draw.rect()
        .x_y(0.0, win.bottom() + 50.0)
        .w_h(win.w() * 0.6, 80.0)
        .color(info.tint.color);
    draw.text(&text)
        .x_y(0.0, win.bottom() + 50.0)
        .w(win.w() * 0.55)
        .color(WHITE);
}
